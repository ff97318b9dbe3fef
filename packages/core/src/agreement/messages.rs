// Сообщения протокола согласования ключей

use crate::error::Result;
use crate::spec::AgreementSpec;
use crate::utils::serialization;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Initiator → responder.
///
/// Which optional fields are present depends on the agreement kind:
/// KEM sends an encapsulation, ANON an ephemeral key, BASIC a static key,
/// UNIFIED both keys, SIGNED an ephemeral key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientHello {
    pub session_id: Uuid,
    pub spec: AgreementSpec,
    #[serde(default, with = "serde_bytes")]
    pub static_public: Option<Vec<u8>>,
    #[serde(default, with = "serde_bytes")]
    pub ephemeral_public: Option<Vec<u8>>,
    #[serde(default, with = "serde_bytes")]
    pub encapsulation: Option<Vec<u8>>,
}

/// Responder → initiator, only for two-pass kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerHello {
    pub session_id: Uuid,
    #[serde(with = "serde_bytes")]
    pub ephemeral_public: Vec<u8>,
    /// Responder's signature over both ephemeral keys (SIGNED only)
    #[serde(default, with = "serde_bytes")]
    pub signature: Option<Vec<u8>>,
}

impl ClientHello {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serialization::to_bytes(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        serialization::from_bytes(bytes)
    }
}

impl ServerHello {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serialization::to_bytes(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        serialization::from_bytes(bytes)
    }
}
