// Tests for skin resolution and selection
