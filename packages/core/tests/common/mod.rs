//! Shared helpers for integration tests.

#![allow(dead_code)]

use gordian_core::crypto::provider::SymmetricPrimitive;
use gordian_core::error::{CryptoError, Result};
use sha2::{Digest, Sha256};

const ROUNDS: u8 = 8;

/// Balanced Feistel network over SHA-256 with a configurable block size.
///
/// Not a real cipher. It gives the wrap codec a keyed permutation for block
/// sizes no production primitive offers (64 up to 512 bits).
pub struct FeistelPrimitive {
    block: usize,
    key: Option<Vec<u8>>,
    for_encryption: bool,
}

impl FeistelPrimitive {
    pub fn new(block: usize) -> Self {
        assert!(block % 2 == 0 && block <= 64);
        Self {
            block,
            key: None,
            for_encryption: true,
        }
    }

    pub fn boxed(block: usize) -> Box<dyn SymmetricPrimitive> {
        Box::new(Self::new(block))
    }

    fn round(&self, key: &[u8], round: u8, half: &[u8]) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(key);
        hasher.update([round]);
        hasher.update(half);
        hasher.finalize()[..half.len()].to_vec()
    }
}

impl SymmetricPrimitive for FeistelPrimitive {
    fn block_size(&self) -> usize {
        self.block
    }

    fn init(&mut self, for_encryption: bool, key: &[u8]) -> Result<()> {
        if key.is_empty() {
            return Err(CryptoError::InvalidInput("empty key".to_string()));
        }
        self.key = Some(key.to_vec());
        self.for_encryption = for_encryption;
        Ok(())
    }

    fn process_block(&mut self, input: &[u8], output: &mut [u8]) -> Result<()> {
        let key = self
            .key
            .as_ref()
            .ok_or_else(|| CryptoError::InvalidInput("not initialised".to_string()))?;
        let h = self.block / 2;
        let mut left = input[..h].to_vec();
        let mut right = input[h..self.block].to_vec();

        if self.for_encryption {
            for r in 0..ROUNDS {
                let f = self.round(key, r, &right);
                let next: Vec<u8> = left.iter().zip(&f).map(|(a, b)| a ^ b).collect();
                left = std::mem::replace(&mut right, next);
            }
        } else {
            for r in (0..ROUNDS).rev() {
                let f = self.round(key, r, &left);
                let prev: Vec<u8> = right.iter().zip(&f).map(|(a, b)| a ^ b).collect();
                right = std::mem::replace(&mut left, prev);
            }
        }

        output[..h].copy_from_slice(&left);
        output[h..self.block].copy_from_slice(&right);
        Ok(())
    }
}
