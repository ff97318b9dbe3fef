//! Stream cipher specs.

use super::Length;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StreamKeyType {
    ChaCha20 = 0,
    XChaCha20 = 1,
    Salsa20 = 2,
    XSalsa20 = 3,
    Hc128 = 4,
    Hc256 = 5,
    Grain128 = 6,
    Zuc128 = 7,
    Zuc256 = 8,
    Rabbit = 9,
    Rc4 = 10,
}

impl StreamKeyType {
    pub const ALL: [StreamKeyType; 11] = [
        StreamKeyType::ChaCha20,
        StreamKeyType::XChaCha20,
        StreamKeyType::Salsa20,
        StreamKeyType::XSalsa20,
        StreamKeyType::Hc128,
        StreamKeyType::Hc256,
        StreamKeyType::Grain128,
        StreamKeyType::Zuc128,
        StreamKeyType::Zuc256,
        StreamKeyType::Rabbit,
        StreamKeyType::Rc4,
    ];

    pub fn ordinal(self) -> u32 {
        self as u32
    }

    pub fn from_ordinal(ordinal: u32) -> Option<StreamKeyType> {
        Self::ALL.get(ordinal as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            StreamKeyType::ChaCha20 => "CHACHA20",
            StreamKeyType::XChaCha20 => "XCHACHA20",
            StreamKeyType::Salsa20 => "SALSA20",
            StreamKeyType::XSalsa20 => "XSALSA20",
            StreamKeyType::Hc128 => "HC128",
            StreamKeyType::Hc256 => "HC256",
            StreamKeyType::Grain128 => "GRAIN128",
            StreamKeyType::Zuc128 => "ZUC128",
            StreamKeyType::Zuc256 => "ZUC256",
            StreamKeyType::Rabbit => "RABBIT",
            StreamKeyType::Rc4 => "RC4",
        }
    }

    pub fn key_lengths(self) -> &'static [Length] {
        match self {
            StreamKeyType::ChaCha20 | StreamKeyType::Salsa20 | StreamKeyType::Rc4 => {
                &[Length::Len128, Length::Len256]
            }
            StreamKeyType::XChaCha20
            | StreamKeyType::XSalsa20
            | StreamKeyType::Hc256
            | StreamKeyType::Zuc256 => &[Length::Len256],
            StreamKeyType::Hc128
            | StreamKeyType::Grain128
            | StreamKeyType::Zuc128
            | StreamKeyType::Rabbit => &[Length::Len128],
        }
    }

    /// Poly1305-capable stream ciphers.
    pub fn supports_aead(self) -> bool {
        matches!(self, StreamKeyType::ChaCha20 | StreamKeyType::XChaCha20)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StreamCipherSpec {
    pub key_type: StreamKeyType,
    pub key_length: Length,
    pub aead: bool,
}

impl StreamCipherSpec {
    pub fn new(key_type: StreamKeyType, key_length: Length, aead: bool) -> Self {
        Self {
            key_type,
            key_length,
            aead,
        }
    }

    pub fn chacha20_poly1305() -> Self {
        Self::new(StreamKeyType::ChaCha20, Length::Len256, true)
    }

    pub fn is_consistent(&self) -> bool {
        self.key_type.key_lengths().contains(&self.key_length)
    }
}

impl fmt::Display for StreamCipherSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.key_type.name(), self.key_length)?;
        if self.aead {
            f.write_str("-POLY1305")?;
        }
        Ok(())
    }
}
