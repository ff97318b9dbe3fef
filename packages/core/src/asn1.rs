//! Minimal DER tag-length-value support.
//!
//! Only what the envelope needs: definite lengths, universal tags, strict
//! parsing (no indefinite or non-minimal lengths, no trailing bytes).

use crate::error::{CryptoError, Result};

pub const TAG_OCTET_STRING: u8 = 0x04;
pub const TAG_OID: u8 = 0x06;
pub const TAG_SEQUENCE: u8 = 0x30;

/// Bytes needed to encode a definite length.
pub fn length_len(len: usize) -> usize {
    if len < 0x80 {
        1
    } else {
        1 + (usize::BITS as usize / 8 - len.leading_zeros() as usize / 8)
    }
}

/// Total size of a TLV with `content_len` content bytes.
pub fn encoded_len(content_len: usize) -> usize {
    1 + length_len(content_len) + content_len
}

pub fn write_length(out: &mut Vec<u8>, len: usize) {
    if len < 0x80 {
        out.push(len as u8);
        return;
    }
    let bytes = len.to_be_bytes();
    let skip = len.leading_zeros() as usize / 8;
    out.push(0x80 | (bytes.len() - skip) as u8);
    out.extend_from_slice(&bytes[skip..]);
}

pub fn write_tlv(out: &mut Vec<u8>, tag: u8, content: &[u8]) {
    out.push(tag);
    write_length(out, content.len());
    out.extend_from_slice(content);
}

/// Cursor over a DER buffer.
pub struct DerReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> DerReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Reads one element with the expected tag and returns its content.
    pub fn read(&mut self, tag: u8) -> Result<&'a [u8]> {
        let found = *self
            .data
            .get(self.pos)
            .ok_or_else(|| malformed(format!("missing element with tag 0x{:02x}", tag)))?;
        if found != tag {
            return Err(malformed(format!(
                "expected tag 0x{:02x}, found 0x{:02x}",
                tag, found
            )));
        }
        self.pos += 1;
        let len = self.read_length()?;
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| malformed("element runs past end of input".to_string()))?;
        let content = &self.data[self.pos..end];
        self.pos = end;
        Ok(content)
    }

    /// Fails unless every byte has been consumed.
    pub fn finish(&self) -> Result<()> {
        if !self.is_empty() {
            return Err(malformed(format!(
                "{} trailing bytes",
                self.data.len() - self.pos
            )));
        }
        Ok(())
    }

    fn next_byte(&mut self) -> Result<u8> {
        let b = *self
            .data
            .get(self.pos)
            .ok_or_else(|| malformed("truncated length".to_string()))?;
        self.pos += 1;
        Ok(b)
    }

    fn read_length(&mut self) -> Result<usize> {
        let first = self.next_byte()?;
        if first < 0x80 {
            return Ok(first as usize);
        }
        let count = (first & 0x7f) as usize;
        if count == 0 {
            return Err(malformed("indefinite length".to_string()));
        }
        if count > std::mem::size_of::<usize>() {
            return Err(malformed("length too large".to_string()));
        }
        let mut len = 0usize;
        for i in 0..count {
            let b = self.next_byte()?;
            if i == 0 && b == 0 {
                return Err(malformed("non-minimal length".to_string()));
            }
            len = (len << 8) | b as usize;
        }
        if len < 0x80 {
            return Err(malformed("non-minimal length".to_string()));
        }
        Ok(len)
    }
}

fn malformed(what: String) -> CryptoError {
    CryptoError::MalformedEnvelope(what)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_forms() {
        for len in [0usize, 1, 127, 128, 255, 256, 65535, 65536, 1 << 24] {
            let mut out = Vec::new();
            write_length(&mut out, len);
            assert_eq!(out.len(), length_len(len), "len {}", len);
        }
        let mut out = Vec::new();
        write_length(&mut out, 300);
        assert_eq!(out, vec![0x82, 0x01, 0x2c]);
    }

    #[test]
    fn test_reader_round_trip() {
        let payload = vec![7u8; 200];
        let mut out = Vec::new();
        write_tlv(&mut out, TAG_OCTET_STRING, &payload);
        assert_eq!(out.len(), encoded_len(payload.len()));

        let mut reader = DerReader::new(&out);
        assert_eq!(reader.read(TAG_OCTET_STRING).unwrap(), &payload[..]);
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn test_reader_rejects_bad_lengths() {
        // indefinite
        assert!(DerReader::new(&[0x04, 0x80, 0x00, 0x00]).read(TAG_OCTET_STRING).is_err());
        // long form for a short length
        assert!(DerReader::new(&[0x04, 0x81, 0x05, 1, 2, 3, 4, 5]).read(TAG_OCTET_STRING).is_err());
        // leading zero length byte
        assert!(DerReader::new(&[0x04, 0x82, 0x00, 0x80]).read(TAG_OCTET_STRING).is_err());
        // content runs past end
        assert!(DerReader::new(&[0x04, 0x05, 1, 2]).read(TAG_OCTET_STRING).is_err());
        // wrong tag
        assert!(DerReader::new(&[0x30, 0x00]).read(TAG_OCTET_STRING).is_err());
    }

    #[test]
    fn test_trailing_bytes_detected() {
        let mut reader = DerReader::new(&[0x04, 0x01, 0xaa, 0x00]);
        reader.read(TAG_OCTET_STRING).unwrap();
        assert!(matches!(reader.finish(), Err(CryptoError::MalformedEnvelope(_))));
    }
}
