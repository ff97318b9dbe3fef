//! Persisted form of a wrapped key.
//!
//! ```text
//! WrappedKey ::= SEQUENCE {
//!     algorithm  SEQUENCE { OBJECT IDENTIFIER },
//!     wrappedKey OCTET STRING
//! }
//! ```

use crate::asn1::{self, DerReader, TAG_OCTET_STRING, TAG_OID, TAG_SEQUENCE};
use crate::error::{CryptoError, Result};
use crate::registry::AlgorithmIdentifier;
use crate::utils::b64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedKeyEnvelope {
    identifier: AlgorithmIdentifier,
    wrapped: Vec<u8>,
}

impl WrappedKeyEnvelope {
    pub fn new(identifier: AlgorithmIdentifier, wrapped: Vec<u8>) -> Self {
        Self {
            identifier,
            wrapped,
        }
    }

    pub fn identifier(&self) -> &AlgorithmIdentifier {
        &self.identifier
    }

    pub fn wrapped_bytes(&self) -> &[u8] {
        &self.wrapped
    }

    /// Exact size of [`Self::encode`] for an envelope with these parts.
    pub fn predicted_encoded_length(identifier: &AlgorithmIdentifier, wrapped_len: usize) -> usize {
        let (_, body) = Self::body_lengths(identifier, wrapped_len);
        asn1::encoded_len(body)
    }

    /// `(algorithm SEQUENCE content, outer SEQUENCE content)`
    fn body_lengths(identifier: &AlgorithmIdentifier, wrapped_len: usize) -> (usize, usize) {
        let algorithm = asn1::encoded_len(identifier.der_content_len());
        let body = asn1::encoded_len(algorithm) + asn1::encoded_len(wrapped_len);
        (algorithm, body)
    }

    pub fn encode(&self) -> Vec<u8> {
        let (algorithm, body) = Self::body_lengths(&self.identifier, self.wrapped.len());
        let mut out = Vec::with_capacity(asn1::encoded_len(body));

        out.push(TAG_SEQUENCE);
        asn1::write_length(&mut out, body);
        out.push(TAG_SEQUENCE);
        asn1::write_length(&mut out, algorithm);
        asn1::write_tlv(&mut out, TAG_OID, &self.identifier.to_der_content());
        asn1::write_tlv(&mut out, TAG_OCTET_STRING, &self.wrapped);
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut outer = DerReader::new(bytes);
        let body = outer.read(TAG_SEQUENCE)?;
        outer.finish()?;

        let mut fields = DerReader::new(body);
        let algorithm = fields.read(TAG_SEQUENCE)?;
        let wrapped = fields.read(TAG_OCTET_STRING)?;
        fields.finish()?;

        let mut alg = DerReader::new(algorithm);
        let oid = alg.read(TAG_OID)?;
        alg.finish()?;

        Ok(Self {
            identifier: AlgorithmIdentifier::from_der_content(oid)?,
            wrapped: wrapped.to_vec(),
        })
    }

    pub fn to_base64(&self) -> String {
        b64::encode(&self.encode())
    }

    pub fn from_base64(text: &str) -> Result<Self> {
        let bytes = b64::decode(text).map_err(CryptoError::MalformedEnvelope)?;
        Self::decode(&bytes)
    }
}
