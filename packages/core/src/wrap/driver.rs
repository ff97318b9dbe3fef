use crate::crypto::provider::SymmetricPrimitive;
use crate::error::{CryptoError, Result};
use zeroize::Zeroizing;

/// Drives a raw block primitive over caller buffers.
///
/// In-place processing is allowed as long as the output never runs ahead of
/// the input: `out_off <= in_off`, or the ranges are disjoint.
pub struct BlockCipherDriver {
    engine: Box<dyn SymmetricPrimitive>,
    keyed: bool,
}

impl BlockCipherDriver {
    pub fn new(engine: Box<dyn SymmetricPrimitive>) -> Self {
        Self {
            engine,
            keyed: false,
        }
    }

    pub fn block_size(&self) -> usize {
        self.engine.block_size()
    }

    pub fn init(&mut self, for_encryption: bool, key: &[u8]) -> Result<()> {
        self.keyed = false;
        self.engine.init(for_encryption, key)?;
        self.keyed = true;
        Ok(())
    }

    /// Processes `len` bytes of `buf` starting at `in_off`, writing the result
    /// at `out_off`. Returns the number of bytes written.
    pub fn update(&mut self, buf: &mut [u8], in_off: usize, len: usize, out_off: usize) -> Result<usize> {
        if !self.keyed {
            return Err(CryptoError::Provider("block cipher not initialised".to_string()));
        }
        let bs = self.block_size();
        if len % bs != 0 {
            return Err(CryptoError::InvalidInput(format!(
                "length {} is not a multiple of the {}-byte block",
                len, bs
            )));
        }
        check_bounds(buf.len(), in_off, len)?;
        check_bounds(buf.len(), out_off, len)?;
        check_overlap(in_off, len, out_off)?;

        let mut scratch = Zeroizing::new(vec![0u8; bs]);
        for k in (0..len).step_by(bs) {
            self.engine
                .process_block(&buf[in_off + k..in_off + k + bs], &mut scratch)?;
            buf[out_off + k..out_off + k + bs].copy_from_slice(&scratch);
        }
        Ok(len)
    }
}

fn check_bounds(buf_len: usize, off: usize, len: usize) -> Result<()> {
    let needed = off
        .checked_add(len)
        .ok_or_else(|| CryptoError::InvalidInput("offset overflow".to_string()))?;
    if needed > buf_len {
        return Err(CryptoError::BufferTooShort {
            needed,
            actual: buf_len,
        });
    }
    Ok(())
}

/// Output may trail the input inside one buffer, never lead it.
pub fn check_overlap(in_off: usize, len: usize, out_off: usize) -> Result<()> {
    if in_off < out_off && out_off < in_off + len {
        return Err(CryptoError::OverlapViolation);
    }
    Ok(())
}
