//! Hierarchical algorithm identifiers (ASN.1 object identifiers).

use crate::error::{CryptoError, Result};
use std::fmt;
use std::str::FromStr;

/// A canonical dotted identifier such as `2.16.840.1.101.3.4.1.6`.
///
/// Construction validates the first two arcs the way X.660 does, so every
/// value has a DER encoding.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlgorithmIdentifier(Vec<u32>);

impl AlgorithmIdentifier {
    pub fn new(arcs: Vec<u32>) -> Result<Self> {
        if arcs.len() < 2 {
            return Err(CryptoError::InvalidInput(
                "Identifier needs at least two arcs".to_string(),
            ));
        }
        if arcs[0] > 2 || (arcs[0] < 2 && arcs[1] >= 40) {
            return Err(CryptoError::InvalidInput(format!(
                "Invalid leading arcs {}.{}",
                arcs[0], arcs[1]
            )));
        }
        if arcs[0] == 2 && arcs[1] > u32::MAX - 80 {
            return Err(CryptoError::InvalidInput("Second arc too large".to_string()));
        }
        Ok(Self(arcs))
    }

    /// For compile-time tables whose leading arcs are known to be valid.
    pub(crate) fn known(arcs: &[u32]) -> Self {
        Self(arcs.to_vec())
    }

    /// Child identifier with extra arcs appended.
    pub fn branch(&self, arcs: &[u32]) -> Self {
        let mut child = self.0.clone();
        child.extend_from_slice(arcs);
        Self(child)
    }

    pub fn arcs(&self) -> &[u32] {
        &self.0
    }

    /// Whether `self` lies strictly below `root`.
    pub fn is_under(&self, root: &AlgorithmIdentifier) -> bool {
        self.0.len() > root.0.len() && self.0.starts_with(&root.0)
    }

    /// Arcs below `root`, if `self` lies under it.
    pub fn suffix(&self, root: &AlgorithmIdentifier) -> Option<&[u32]> {
        if self.is_under(root) {
            Some(&self.0[root.0.len()..])
        } else {
            None
        }
    }

    /// DER content octets (without tag and length).
    pub fn to_der_content(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.0.len() + 4);
        push_base128(&mut out, self.0[0] * 40 + self.0[1]);
        for &arc in &self.0[2..] {
            push_base128(&mut out, arc);
        }
        out
    }

    /// Length of [`Self::to_der_content`] without building it.
    pub fn der_content_len(&self) -> usize {
        base128_len(self.0[0] * 40 + self.0[1])
            + self.0[2..].iter().map(|&a| base128_len(a)).sum::<usize>()
    }

    pub fn from_der_content(content: &[u8]) -> Result<Self> {
        if content.is_empty() {
            return Err(malformed("empty object identifier"));
        }
        let mut subids = Vec::new();
        let mut value: u32 = 0;
        let mut fresh = true;
        for &byte in content {
            if fresh && byte == 0x80 {
                return Err(malformed("non-minimal identifier arc"));
            }
            if value > (u32::MAX >> 7) {
                return Err(malformed("identifier arc overflows 32 bits"));
            }
            value = (value << 7) | u32::from(byte & 0x7f);
            fresh = byte & 0x80 == 0;
            if fresh {
                subids.push(value);
                value = 0;
            }
        }
        if !fresh {
            return Err(malformed("truncated identifier arc"));
        }

        let first = subids[0];
        let mut arcs = Vec::with_capacity(subids.len() + 1);
        match first {
            0..=39 => arcs.extend([0, first]),
            40..=79 => arcs.extend([1, first - 40]),
            _ => arcs.extend([2, first - 80]),
        }
        arcs.extend_from_slice(&subids[1..]);
        Ok(Self(arcs))
    }
}

fn push_base128(out: &mut Vec<u8>, value: u32) {
    let len = base128_len(value);
    for i in (0..len).rev() {
        let mut byte = ((value >> (7 * i)) & 0x7f) as u8;
        if i != 0 {
            byte |= 0x80;
        }
        out.push(byte);
    }
}

fn base128_len(value: u32) -> usize {
    let bits = 32 - value.leading_zeros() as usize;
    ((bits + 6) / 7).max(1)
}

fn malformed(what: &str) -> CryptoError {
    CryptoError::MalformedEnvelope(what.to_string())
}

impl fmt::Display for AlgorithmIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arc) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", arc)?;
        }
        Ok(())
    }
}

impl fmt::Debug for AlgorithmIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AlgorithmIdentifier({})", self)
    }
}

impl FromStr for AlgorithmIdentifier {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        let arcs = s
            .split('.')
            .map(|part| {
                part.parse::<u32>()
                    .map_err(|_| CryptoError::UnknownIdentifier(s.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(arcs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_der_content_known_value() {
        // id-aes128-GCM
        let oid: AlgorithmIdentifier = "2.16.840.1.101.3.4.1.6".parse().unwrap();
        assert_eq!(
            oid.to_der_content(),
            vec![0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x01, 0x06]
        );
        assert_eq!(oid.der_content_len(), 9);
        assert_eq!(AlgorithmIdentifier::from_der_content(&oid.to_der_content()).unwrap(), oid);
    }

    #[test]
    fn test_large_arcs_round_trip() {
        let oid = AlgorithmIdentifier::new(vec![1, 3, 6, 1, 4, 1, 52299, u32::MAX, 0, 128]).unwrap();
        let der = oid.to_der_content();
        assert_eq!(der.len(), oid.der_content_len());
        assert_eq!(AlgorithmIdentifier::from_der_content(&der).unwrap(), oid);
    }

    #[test]
    fn test_rejects_bad_content() {
        assert!(AlgorithmIdentifier::from_der_content(&[]).is_err());
        assert!(AlgorithmIdentifier::from_der_content(&[0x2a, 0x80, 0x01]).is_err());
        assert!(AlgorithmIdentifier::from_der_content(&[0x2a, 0x86]).is_err());
        assert!(AlgorithmIdentifier::from_der_content(&[0x2a, 0x90, 0x80, 0x80, 0x80, 0x80, 0x01]).is_err());
    }

    #[test]
    fn test_parse_and_validate() {
        assert!("1.40.1".parse::<AlgorithmIdentifier>().is_err());
        assert!("3.1".parse::<AlgorithmIdentifier>().is_err());
        assert!("1".parse::<AlgorithmIdentifier>().is_err());
        assert!("1.2.x".parse::<AlgorithmIdentifier>().is_err());
        let oid: AlgorithmIdentifier = "1.2.410.200046.1.1.34".parse().unwrap();
        assert_eq!(oid.to_string(), "1.2.410.200046.1.1.34");
    }

    #[test]
    fn test_branching() {
        let root: AlgorithmIdentifier = "1.3.6.1.4.1.52299".parse().unwrap();
        let child = root.branch(&[1, 2, 3]);
        assert!(child.is_under(&root));
        assert!(!root.is_under(&root));
        assert_eq!(child.suffix(&root), Some(&[1u32, 2, 3][..]));
    }
}
