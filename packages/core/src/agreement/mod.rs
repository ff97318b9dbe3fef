//! Согласование ключей (Key Agreement)
//!
//! ## Виды согласования
//!
//! | Kind      | Проходы | Секрет                                       |
//! |-----------|---------|----------------------------------------------|
//! | `KEM`     | 1       | encapsulate(peer static)                     |
//! | `ANON`    | 1       | DH(initiator ephemeral, responder static)    |
//! | `BASIC`   | 1       | DH(static, static)                           |
//! | `UNIFIED` | 2       | DH(static, static) ‖ DH(ephemeral, ephemeral) |
//! | `SIGNED`  | 2       | DH(ephemeral, ephemeral), ответ подписан     |
//! | `MQV`     | –       | не поддерживается ни одним backend           |
//!
//! Сырой секрет не используется напрямую: [`SharedSecret::derive_key`]
//! выводит из него ключ через HKDF-SHA256.

pub mod messages;
pub mod session;

pub use messages::{ClientHello, ServerHello};
pub use session::AgreementSession;

use crate::config::Config;
use crate::error::{CryptoError, Result};
use hkdf::Hkdf;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;
use zeroize::Zeroizing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Initiator,
    Responder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Init,
    HelloBuilt,
    HelloProcessed,
    Complete,
}

impl SessionState {
    pub fn name(self) -> &'static str {
        match self {
            SessionState::Init => "INIT",
            SessionState::HelloBuilt => "HELLO_BUILT",
            SessionState::HelloProcessed => "HELLO_PROCESSED",
            SessionState::Complete => "COMPLETE",
        }
    }
}

/// Agreed secret handed out by a completed session. Zeroized on drop.
pub struct SharedSecret(Zeroizing<Vec<u8>>);

impl SharedSecret {
    pub(crate) fn new(bytes: Zeroizing<Vec<u8>>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// HKDF-SHA256 expansion of the raw secret.
    pub fn derive_key(&self, salt: &[u8], info: &[u8], len: usize) -> Result<Zeroizing<Vec<u8>>> {
        let hkdf = Hkdf::<Sha256>::new(Some(salt), &self.0);
        let mut okm = Zeroizing::new(vec![0u8; len]);
        hkdf.expand(info, &mut okm)
            .map_err(|e| CryptoError::InvalidInput(format!("HKDF expand failed: {}", e)))?;
        Ok(okm)
    }

    /// Key of the configured length under the configured info string.
    pub fn derive_default_key(&self, salt: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        let config = Config::global();
        self.derive_key(salt, config.agreement_kdf_info, config.derived_key_length)
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedSecret({} bytes)", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_key_lengths() {
        let secret = SharedSecret::new(Zeroizing::new(vec![3u8; 32]));
        assert_eq!(secret.derive_key(b"salt", b"info", 16).unwrap().len(), 16);
        assert_eq!(secret.derive_default_key(b"salt").unwrap().len(), 32);
        assert!(secret.derive_key(b"salt", b"info", 255 * 32 + 1).is_err());
        assert_ne!(
            *secret.derive_key(b"salt", b"a", 32).unwrap(),
            *secret.derive_key(b"salt", b"b", 32).unwrap()
        );
    }

    #[test]
    fn test_debug_hides_secret() {
        let secret = SharedSecret::new(Zeroizing::new(vec![0xAB; 4]));
        assert_eq!(format!("{:?}", secret), "SharedSecret(4 bytes)");
    }
}
