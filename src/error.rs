use thiserror::Error;

/// Failures raised while configuring or mining the ledger.
///
/// A block that fails validation is not an error; `validate` simply
/// returns `false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// No nonce below `max_nonce` satisfies the target. Usually means the
    /// difficulty is set too high for the configured search space.
    #[error("Nonce space exhausted: no nonce below {max_nonce} meets the target")]
    NonceSpaceExhausted { max_nonce: u64 },

    #[error("Mining thread panicked: {0}")]
    WorkerPanicked(&'static str),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::LedgerError;

    #[test]
    fn messages_name_the_failure() {
        let err = LedgerError::InvalidConfiguration("worker count must be positive".into());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: worker count must be positive"
        );

        let err = LedgerError::NonceSpaceExhausted { max_nonce: 16 };
        assert!(err.to_string().contains("below 16"));
    }
}
