use thiserror::Error;

/// Reason a spec was rejected by the validation engine.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecError {
    #[error("key type is not supported by the provider")]
    UnsupportedKeyType,
    #[error("spec fields are inconsistent")]
    InconsistentSpec,
    #[error("mode is not valid for the key type")]
    InvalidModeForKeyType,
    #[error("AAD mode is not allowed for this key type and block length")]
    DisallowedAad,
    #[error("block length is not allowed for this mode")]
    BlockLengthRestriction,
    #[error("padding does not match the mode")]
    InvalidPadding,
    #[error("PBE digest must be SHA2-512")]
    UnsupportedPbeDigest,
    #[error("PBE iteration count must be non-zero")]
    InvalidPbeIterations,
    #[error("stream cipher does not support AEAD")]
    AeadNotSupported,
    #[error("agreement kind is not valid for the key pair type")]
    InvalidAgreement,
}

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Invalid spec: {0}")]
    SpecInvalid(#[from] SpecError),
    #[error("Unknown algorithm identifier: {0}")]
    UnknownIdentifier(String),
    #[error("No identifier registered for spec: {0}")]
    UnknownSpec(String),
    #[error("Integrity check failed")]
    IntegrityCheckFailed,
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),
    #[error("Buffer too short: need {needed} bytes, have {actual}")]
    BufferTooShort { needed: usize, actual: usize },
    #[error("Input and output ranges overlap")]
    OverlapViolation,
    #[error("Key pair type does not match the agreement")]
    InvalidKeyPairType,
    #[error("KEM encapsulation failed: {0}")]
    EncapsulationFailure(String),
    #[error("Failed to destroy secret material")]
    SecretDestructionFailure,
    #[error("Invalid session state: expected {expected}, was {actual}")]
    InvalidState {
        expected: &'static str,
        actual: &'static str,
    },
    #[error("Agreement is not supported: {0}")]
    UnsupportedAgreement(String),
    #[error("Signature verification failed")]
    SignatureVerificationFailed,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Provider error: {0}")]
    Provider(String),
}

impl From<ed25519_dalek::SignatureError> for CryptoError {
    fn from(_: ed25519_dalek::SignatureError) -> Self {
        CryptoError::SignatureVerificationFailed
    }
}

impl From<bincode::Error> for CryptoError {
    fn from(err: bincode::Error) -> Self {
        CryptoError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CryptoError>;
