// Tests for the connection lifecycle

#[cfg(test)]
pub(crate) mod test_helpers;
