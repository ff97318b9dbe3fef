//! Structured algorithm specs.
//!
//! Every enum here carries an explicit, stable ordinal. The ordinals feed the
//! synthesized algorithm identifiers in [`crate::registry`], so variants may be
//! appended but never reordered.

pub mod agreement;
pub mod pbe;
pub mod stream;
pub mod symmetric;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use agreement::{AgreementKind, AgreementSpec, KeyPairFamily, KeyPairType};
pub use pbe::{DigestType, PbeCipherSpec, PbeSpec};
pub use stream::{StreamCipherSpec, StreamKeyType};
pub use symmetric::{CipherMode, CipherSpec, Padding, SymKeySpec, SymKeyType};

/// Bit length used for block and key sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Length {
    Len64 = 0,
    Len128 = 1,
    Len192 = 2,
    Len256 = 3,
    Len512 = 4,
    Len1024 = 5,
}

impl Length {
    pub const ALL: [Length; 6] = [
        Length::Len64,
        Length::Len128,
        Length::Len192,
        Length::Len256,
        Length::Len512,
        Length::Len1024,
    ];

    pub fn bits(self) -> usize {
        match self {
            Length::Len64 => 64,
            Length::Len128 => 128,
            Length::Len192 => 192,
            Length::Len256 => 256,
            Length::Len512 => 512,
            Length::Len1024 => 1024,
        }
    }

    pub fn bytes(self) -> usize {
        self.bits() / 8
    }

    pub fn ordinal(self) -> u32 {
        self as u32
    }

    pub fn from_bits(bits: usize) -> Option<Length> {
        Self::ALL.into_iter().find(|l| l.bits() == bits)
    }

    pub fn from_ordinal(ordinal: u32) -> Option<Length> {
        Self::ALL.get(ordinal as usize).copied()
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_ordinals_are_positional() {
        for (i, len) in Length::ALL.iter().enumerate() {
            assert_eq!(len.ordinal() as usize, i);
            assert_eq!(Length::from_ordinal(i as u32), Some(*len));
        }
        assert_eq!(Length::from_ordinal(6), None);
    }

    #[test]
    fn test_length_from_bits() {
        assert_eq!(Length::from_bits(128), Some(Length::Len128));
        assert_eq!(Length::from_bits(1024), Some(Length::Len1024));
        assert_eq!(Length::from_bits(100), None);
        assert_eq!(Length::Len256.bytes(), 32);
    }
}
