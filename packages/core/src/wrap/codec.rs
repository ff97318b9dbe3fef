//! Generalized key wrap with padding.
//!
//! RFC 5649 widened to any block cipher with an even block of at least
//! 64 bits. Working unit is the half-block `h`. The plaintext buffer is
//!
//! ```text
//! [ pattern (h-4) | length u32 BE ] [ random (h) ] [ data | zero pad to h ]
//! ```
//!
//! For 64-bit ciphers (`h == 4`) the pattern takes the full half-block and the
//! length field becomes its own half-block. The first half-block is the
//! running integrity register; the rest is mixed with it over `WRAP_COUNT`
//! passes.

use crate::config::Config;
use crate::crypto::keys::KeyPair;
use crate::crypto::provider::{KeyPairEncoder, SymmetricPrimitive};
use crate::error::{CryptoError, Result};
use crate::spec::KeyPairType;
use crate::wrap::driver::BlockCipherDriver;
use rand::rngs::OsRng;
use rand_core::{CryptoRng, RngCore};
use subtle::{Choice, ConstantTimeEq, ConstantTimeGreater, ConstantTimeLess};
use zeroize::{Zeroize, Zeroizing};

pub const WRAP_COUNT: usize = 6;

const PATTERN_A: u8 = 0xA6;
const PATTERN_B: u8 = 0x59;
const LENGTH_FIELD: usize = 4;

/// Integrity pattern byte at position `i`.
fn pattern_byte(i: usize) -> u8 {
    if (i + 1) % 4 < 2 {
        PATTERN_A
    } else {
        PATTERN_B
    }
}

pub struct KeyWrapCodec {
    driver: BlockCipherDriver,
    half: usize,
}

impl KeyWrapCodec {
    pub fn new(engine: Box<dyn SymmetricPrimitive>) -> Result<Self> {
        let block = engine.block_size();
        if block % 2 != 0 || block < 2 * LENGTH_FIELD {
            return Err(CryptoError::InvalidInput(format!(
                "key wrap needs an even block of at least {} bytes, got {}",
                2 * LENGTH_FIELD,
                block
            )));
        }
        Ok(Self {
            driver: BlockCipherDriver::new(engine),
            half: block / 2,
        })
    }

    pub fn block_size(&self) -> usize {
        2 * self.half
    }

    /// Bytes a wrap adds on top of the half-block-aligned data.
    pub fn key_wrap_expansion(block_size: usize) -> usize {
        let half = block_size / 2;
        if half <= LENGTH_FIELD {
            3 * half
        } else {
            2 * half
        }
    }

    pub fn expansion(&self) -> usize {
        Self::key_wrap_expansion(self.block_size())
    }

    pub fn get_data_wrap_length(&self, data_len: usize) -> usize {
        self.aligned(data_len) + self.expansion()
    }

    pub fn get_key_wrap_length(&self, key_len: usize) -> usize {
        self.get_data_wrap_length(key_len)
    }

    fn aligned(&self, len: usize) -> usize {
        (len + self.half - 1) / self.half * self.half
    }

    fn check_len(&self) -> usize {
        if self.half == LENGTH_FIELD {
            self.half
        } else {
            self.half - LENGTH_FIELD
        }
    }

    fn header_len(&self) -> usize {
        self.check_len() + LENGTH_FIELD
    }

    pub fn secure_bytes(&mut self, key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
        self.secure_bytes_with_rng(key, data, &mut OsRng)
    }

    pub fn secure_bytes_with_rng<R: RngCore + CryptoRng>(
        &mut self,
        key: &[u8],
        data: &[u8],
        rng: &mut R,
    ) -> Result<Vec<u8>> {
        let mut out = vec![0u8; self.get_data_wrap_length(data.len())];
        self.secure_bytes_into(key, data, &mut out, rng)?;
        Ok(out)
    }

    /// Wraps into the front of `out`, returning the number of bytes written.
    pub fn secure_bytes_into<R: RngCore + CryptoRng>(
        &mut self,
        key: &[u8],
        data: &[u8],
        out: &mut [u8],
        rng: &mut R,
    ) -> Result<usize> {
        use tracing::trace;

        let max = Config::global().max_wrap_input_length;
        if data.len() > max || u32::try_from(data.len()).is_err() {
            return Err(CryptoError::InvalidInput(format!(
                "wrap input of {} bytes exceeds limit of {}",
                data.len(),
                max
            )));
        }
        let total = self.get_data_wrap_length(data.len());
        if out.len() < total {
            return Err(CryptoError::BufferTooShort {
                needed: total,
                actual: out.len(),
            });
        }

        let h = self.half;
        let check_len = self.check_len();
        let header = self.header_len();
        let buf = &mut out[..total];

        for (i, b) in buf[..check_len].iter_mut().enumerate() {
            *b = pattern_byte(i);
        }
        buf[check_len..header].copy_from_slice(&(data.len() as u32).to_be_bytes());
        rng.fill_bytes(&mut buf[header..header + h]);
        buf[header + h..header + h + data.len()].copy_from_slice(data);
        buf[header + h + data.len()..].fill(0);

        if let Err(e) = self.driver.init(true, key).and_then(|_| self.wrap_passes(buf)) {
            buf.zeroize();
            return Err(e);
        }

        trace!(target: "crypto::keywrap", data_len = data.len(), wrapped_len = total, "wrapped");
        Ok(total)
    }

    fn wrap_passes(&mut self, buf: &mut [u8]) -> Result<()> {
        let h = self.half;
        let blocks = buf.len() / h - 1;
        let mut block = Zeroizing::new(vec![0u8; 2 * h]);
        let mut t: u64 = 1;

        for _ in 0..WRAP_COUNT {
            for i in 1..=blocks {
                block[..h].copy_from_slice(&buf[..h]);
                block[h..].copy_from_slice(&buf[i * h..(i + 1) * h]);
                self.driver.update(&mut block, 0, 2 * h, 0)?;
                xor_counter(&mut block[..h], t);
                buf[..h].copy_from_slice(&block[..h]);
                buf[i * h..(i + 1) * h].copy_from_slice(&block[h..]);
                t += 1;
            }
        }
        Ok(())
    }

    fn unwrap_passes(&mut self, buf: &mut [u8]) -> Result<()> {
        let h = self.half;
        let blocks = buf.len() / h - 1;
        let mut block = Zeroizing::new(vec![0u8; 2 * h]);
        let mut t = (blocks * WRAP_COUNT) as u64;

        for _ in 0..WRAP_COUNT {
            for i in (1..=blocks).rev() {
                block[..h].copy_from_slice(&buf[..h]);
                block[h..].copy_from_slice(&buf[i * h..(i + 1) * h]);
                xor_counter(&mut block[..h], t);
                self.driver.update(&mut block, 0, 2 * h, 0)?;
                buf[..h].copy_from_slice(&block[..h]);
                buf[i * h..(i + 1) * h].copy_from_slice(&block[h..]);
                t -= 1;
            }
        }
        Ok(())
    }

    /// Inverse of [`Self::secure_bytes`] over `wrapped[offset..]`.
    pub fn derive_bytes(&mut self, key: &[u8], wrapped: &[u8], offset: usize) -> Result<Zeroizing<Vec<u8>>> {
        use tracing::{trace, warn};

        if offset > wrapped.len() {
            return Err(CryptoError::BufferTooShort {
                needed: offset,
                actual: wrapped.len(),
            });
        }
        let input = &wrapped[offset..];
        let h = self.half;
        if input.len() < self.expansion() || input.len() % h != 0 {
            warn!(target: "crypto::keywrap", len = input.len(), "wrapped input has impossible length");
            return Err(CryptoError::IntegrityCheckFailed);
        }

        let mut buf = Zeroizing::new(input.to_vec());
        self.driver.init(false, key)?;
        self.unwrap_passes(&mut buf)?;

        let check_len = self.check_len();
        let data_start = self.header_len() + h;
        let data_len = (buf.len() - data_start) as u64;

        let mut ok = Choice::from(1u8);
        for (i, &b) in buf[..check_len].iter().enumerate() {
            ok &= b.ct_eq(&pattern_byte(i));
        }

        let mut len_bytes = [0u8; LENGTH_FIELD];
        len_bytes.copy_from_slice(&buf[check_len..check_len + LENGTH_FIELD]);
        let declared = u64::from(u32::from_be_bytes(len_bytes));

        ok &= !declared.ct_gt(&data_len);
        let pad = data_len.wrapping_sub(declared);
        ok &= pad.ct_lt(&(h as u64));

        // Padding can only live in the final half-block.
        let tail_start = buf.len() - h.min(buf.len() - data_start);
        let mut nonzero_pad = Choice::from(0u8);
        for (p, &b) in buf.iter().enumerate().skip(tail_start) {
            let in_pad = !((p - data_start) as u64).ct_lt(&declared);
            nonzero_pad |= in_pad & !b.ct_eq(&0);
        }
        ok &= !nonzero_pad;

        if !bool::from(ok) {
            warn!(target: "crypto::keywrap", len = input.len(), "integrity check failed");
            return Err(CryptoError::IntegrityCheckFailed);
        }

        let end = data_start + declared as usize;
        trace!(target: "crypto::keywrap", data_len = declared, "unwrapped");
        Ok(Zeroizing::new(buf[data_start..end].to_vec()))
    }

    /// Wraps the standard encoding of a private key.
    pub fn secure_private_key(
        &mut self,
        key: &[u8],
        key_pair: &KeyPair,
        encoder: &dyn KeyPairEncoder,
    ) -> Result<Vec<u8>> {
        let encoded = encoder.encode_private(key_pair)?;
        self.secure_bytes(key, &encoded)
    }

    pub fn derive_private_key(
        &mut self,
        key: &[u8],
        wrapped: &[u8],
        key_type: KeyPairType,
        encoder: &dyn KeyPairEncoder,
    ) -> Result<KeyPair> {
        let encoded = self.derive_bytes(key, wrapped, 0)?;
        encoder.decode_private(key_type, &encoded)
    }
}

/// XORs `t` big-endian into the trailing bytes of `a`.
fn xor_counter(a: &mut [u8], t: u64) {
    for (k, byte) in t.to_be_bytes().iter().rev().enumerate().take(a.len()) {
        let idx = a.len() - 1 - k;
        a[idx] ^= byte;
    }
}
