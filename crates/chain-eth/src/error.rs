use thiserror::Error;

/// Errors from address handling, amount scaling, ABI encoding and signing.
#[derive(Debug, Error)]
pub enum EthError {
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("transaction build error: {0}")]
    TransactionBuildError(String),

    #[error("signing error: {0}")]
    SigningError(String),

    #[error("encoding error: {0}")]
    EncodingError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::parse_address;
    use crate::units::parse_units;

    #[test]
    fn address_errors_carry_the_reason() {
        let err = parse_address("0x1234").unwrap_err();
        assert!(matches!(err, EthError::InvalidAddress(_)));
        assert!(err.to_string().starts_with("invalid address: "));
    }

    #[test]
    fn amount_errors_are_invalid_amount() {
        let err = parse_units("1.0000001", 6).unwrap_err();
        assert!(matches!(err, EthError::InvalidAmount(_)));
    }

    #[test]
    fn boxes_as_std_error() {
        let err: Box<dyn std::error::Error + Send + Sync> =
            Box::new(EthError::TransactionBuildError("gas limit is zero".into()));
        assert_eq!(err.to_string(), "transaction build error: gas limit is zero");
    }
}
