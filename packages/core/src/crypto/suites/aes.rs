use crate::crypto::provider::SymmetricPrimitive;
use crate::error::{CryptoError, Result};
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128, Aes192, Aes256};
use zeroize::Zeroize;

const AES_BLOCK: usize = 16;

enum CipherType {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

/// Raw AES block engine over the `aes` crate.
#[derive(Default)]
pub struct AesEngine {
    cipher: Option<CipherType>,
    for_encryption: bool,
}

impl AesEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SymmetricPrimitive for AesEngine {
    fn block_size(&self) -> usize {
        AES_BLOCK
    }

    fn init(&mut self, for_encryption: bool, key: &[u8]) -> Result<()> {
        let invalid = |e: aes::cipher::InvalidLength| {
            CryptoError::InvalidInput(format!("Invalid AES key: {}", e))
        };
        let cipher = match key.len() {
            16 => CipherType::Aes128(Aes128::new_from_slice(key).map_err(invalid)?),
            24 => CipherType::Aes192(Aes192::new_from_slice(key).map_err(invalid)?),
            32 => CipherType::Aes256(Aes256::new_from_slice(key).map_err(invalid)?),
            n => {
                return Err(CryptoError::InvalidInput(format!(
                    "Invalid AES key length: {}",
                    n
                )))
            }
        };
        self.cipher = Some(cipher);
        self.for_encryption = for_encryption;
        Ok(())
    }

    fn process_block(&mut self, input: &[u8], output: &mut [u8]) -> Result<()> {
        let cipher = self
            .cipher
            .as_ref()
            .ok_or_else(|| CryptoError::Provider("AES engine not initialised".to_string()))?;
        if input.len() != AES_BLOCK || output.len() != AES_BLOCK {
            return Err(CryptoError::InvalidInput(format!(
                "AES processes {}-byte blocks",
                AES_BLOCK
            )));
        }

        let mut block = [0u8; AES_BLOCK];
        block.copy_from_slice(input);
        match (cipher, self.for_encryption) {
            (CipherType::Aes128(c), true) => c.encrypt_block((&mut block).into()),
            (CipherType::Aes192(c), true) => c.encrypt_block((&mut block).into()),
            (CipherType::Aes256(c), true) => c.encrypt_block((&mut block).into()),
            (CipherType::Aes128(c), false) => c.decrypt_block((&mut block).into()),
            (CipherType::Aes192(c), false) => c.decrypt_block((&mut block).into()),
            (CipherType::Aes256(c), false) => c.decrypt_block((&mut block).into()),
        }
        output.copy_from_slice(&block);
        block.zeroize();
        Ok(())
    }
}
