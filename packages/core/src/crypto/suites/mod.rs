//! Криптографические наборы (Crypto Suites)
//!
//! Реализации [`CryptoProvider`](crate::crypto::provider::CryptoProvider).
//!
//! ### Classic Suite
//! - **Block cipher**: AES-128/192/256 (`aes`)
//! - **KEM**: X25519 (ephemeral-static DH на Curve25519)
//! - **Agreement**: X25519
//! - **Signatures**: Ed25519
//!
//! С feature `post-quantum` дополнительно:
//! - **KEM**: Kyber-768 (`pqcrypto-kyber`)

pub mod aes;
pub mod classic;
#[cfg(feature = "post-quantum")]
pub mod pq;
