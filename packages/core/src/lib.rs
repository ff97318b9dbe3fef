// GordianKnot Core
// Algorithm identity, spec validation, generalized key wrap and key agreement

#![warn(clippy::all)]

// Модули
pub mod agreement;
pub mod asn1;
pub mod config;
pub mod crypto;
pub mod error;
pub mod factory;
pub mod pbe;
pub mod registry;
pub mod spec;
pub mod utils;
pub mod validation;
pub mod wrap;

// Re-exports для удобства
pub use agreement::{AgreementSession, ClientHello, Role, ServerHello, SessionState, SharedSecret};
pub use error::{CryptoError, Result, SpecError};
pub use factory::CryptoFactory;
pub use registry::{AlgorithmIdentifier, AlgorithmSpec, IdentityRegistry};
pub use validation::SpecValidator;
pub use wrap::{KeyWrapCodec, WrappedKeyEnvelope};
