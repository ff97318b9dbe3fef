//! Password-based key derivation for validated PBE specs.

use crate::config::Config;
use crate::error::{CryptoError, Result};
use crate::spec::PbeCipherSpec;
use crate::validation::SpecValidator;
use rand::rngs::OsRng;
use rand_core::RngCore;
use sha2::Sha512;
use zeroize::Zeroizing;

/// Fresh random salt of the configured length.
pub fn generate_salt() -> Vec<u8> {
    let mut salt = vec![0u8; Config::global().pbe_salt_length];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Derives a key sized for `spec.cipher` with PBKDF2-HMAC-SHA512.
pub fn derive_pbe_key(
    validator: &SpecValidator,
    spec: &PbeCipherSpec,
    password: &[u8],
    salt: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    use tracing::debug;

    validator.check_pbe_cipher_spec(spec)?;
    if password.is_empty() {
        return Err(CryptoError::InvalidInput("Password is empty".to_string()));
    }
    let min_salt = Config::global().pbe_salt_length;
    if salt.len() < min_salt {
        return Err(CryptoError::InvalidInput(format!(
            "Salt must be at least {} bytes, got {}",
            min_salt,
            salt.len()
        )));
    }

    let mut key = Zeroizing::new(vec![0u8; spec.cipher.key_spec.key_length.bytes()]);
    pbkdf2::pbkdf2_hmac::<Sha512>(password, salt, spec.pbe.iterations, &mut key);

    debug!(
        target: "crypto::factory",
        spec = %spec,
        key_len = key.len(),
        "PBE key derived"
    );
    Ok(key)
}
