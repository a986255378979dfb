use thiserror::Error;

/// Failures of path tree operations.
///
/// Every variant carries the normalized path the operation was addressing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("path not found: {0}")]
    NotFound(String),

    #[error("allocation failed while creating nodes for: {0}")]
    AllocationFailure(String),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

pub type TreeResult<T> = Result<T, TreeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_path() {
        assert_eq!(
            TreeError::NotFound("/a/b".into()).to_string(),
            "path not found: /a/b"
        );
        assert_eq!(
            TreeError::InvalidOperation("cannot remove the root".into()).to_string(),
            "invalid operation: cannot remove the root"
        );
    }
}
