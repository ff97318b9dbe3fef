//! Key wrap codec tests
//!
//! Covers:
//! - round trips for every half-block size the codec accepts
//! - tamper detection
//! - wrapped and encoded length prediction
//! - AES-backed wrapping of a 256-bit key

mod common;

use common::FeistelPrimitive;
use gordian_core::crypto::suites::aes::AesEngine;
use gordian_core::error::CryptoError;
use gordian_core::registry::AlgorithmIdentifier;
use gordian_core::wrap::{KeyWrapCodec, WrappedKeyEnvelope};
use proptest::prelude::*;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

const HALF_BLOCKS: [usize; 4] = [4, 8, 16, 32];

fn codec(half: usize) -> KeyWrapCodec {
    KeyWrapCodec::new(FeistelPrimitive::boxed(2 * half)).unwrap()
}

/// Every data length from empty up to 200 bytes survives a wrap for each half-block size
#[test]
fn test_round_trip_all_half_blocks() {
    let mut rng = ChaCha20Rng::seed_from_u64(1);
    for half in HALF_BLOCKS {
        let mut codec = codec(half);
        let key = [0x5Au8; 16];
        for len in 0..=200usize {
            let mut data = vec![0u8; len];
            rng.fill_bytes(&mut data);

            let wrapped = codec.secure_bytes_with_rng(&key, &data, &mut rng).unwrap();
            assert_eq!(wrapped.len(), codec.get_data_wrap_length(len), "h={} len={}", half, len);
            assert_eq!(wrapped.len() % half, 0);

            let unwrapped = codec.derive_bytes(&key, &wrapped, 0).unwrap();
            assert_eq!(*unwrapped, data, "h={} len={}", half, len);
        }
    }
}

/// 64-bit blocks spend an extra half-block on the length field
#[test]
fn test_expansion_per_block_size() {
    assert_eq!(KeyWrapCodec::key_wrap_expansion(8), 12);
    assert_eq!(KeyWrapCodec::key_wrap_expansion(16), 16);
    assert_eq!(KeyWrapCodec::key_wrap_expansion(32), 32);
    assert_eq!(KeyWrapCodec::key_wrap_expansion(64), 64);
    assert_eq!(codec(4).get_key_wrap_length(5), 8 + 12);
    assert_eq!(codec(8).get_key_wrap_length(0), 16);
}

/// Predicted wrapped and encoded lengths match the produced output
#[test]
fn test_length_prediction_random_inputs() {
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    let id: AlgorithmIdentifier = "1.3.6.1.4.1.52299.1.1.2.4.1.1".parse().unwrap();
    let mut codecs: Vec<KeyWrapCodec> = HALF_BLOCKS.iter().map(|&h| codec(h)).collect();

    for _ in 0..1000 {
        let codec = &mut codecs[rng.gen_range(0..HALF_BLOCKS.len())];
        let len = rng.gen_range(0..600);
        let mut data = vec![0u8; len];
        rng.fill_bytes(&mut data);

        let wrapped = codec.secure_bytes_with_rng(b"k", &data, &mut rng).unwrap();
        assert_eq!(wrapped.len(), codec.get_data_wrap_length(len));

        let envelope = WrappedKeyEnvelope::new(id.clone(), wrapped);
        assert_eq!(
            envelope.encode().len(),
            WrappedKeyEnvelope::predicted_encoded_length(&id, envelope.wrapped_bytes().len())
        );
    }
}

/// A 32-byte key wrapped with AES-256 becomes 48 bytes and unwraps only under the same key
#[test]
fn test_aes_256_wraps_32_byte_key() {
    let mut codec = KeyWrapCodec::new(Box::new(AesEngine::new())).unwrap();
    let kek = [0x11u8; 32];
    let key: Vec<u8> = (0u8..32).collect();

    let wrapped = codec.secure_bytes(&kek, &key).unwrap();
    assert_eq!(wrapped.len(), 48);
    assert_eq!(*codec.derive_bytes(&kek, &wrapped, 0).unwrap(), key);

    let mut other = kek;
    other[0] ^= 1;
    assert!(matches!(
        codec.derive_bytes(&other, &wrapped, 0),
        Err(CryptoError::IntegrityCheckFailed)
    ));
}

/// Wrapped data can sit behind a prefix in a larger buffer
#[test]
fn test_derive_with_offset() {
    let mut codec = codec(8);
    let wrapped = codec.secure_bytes(b"key", b"payload").unwrap();
    let mut framed = b"header".to_vec();
    framed.extend_from_slice(&wrapped);

    assert_eq!(&*codec.derive_bytes(b"key", &framed, 6).unwrap(), b"payload");
    assert!(matches!(
        codec.derive_bytes(b"key", &framed, framed.len() + 1),
        Err(CryptoError::BufferTooShort { .. })
    ));
}

/// Truncated and misaligned inputs are reported as integrity failures
#[test]
fn test_truncation_detected() {
    for half in HALF_BLOCKS {
        let mut codec = codec(half);
        let wrapped = codec.secure_bytes(b"key", &[9u8; 40]).unwrap();
        for cut in [1, half, wrapped.len() - 1] {
            assert!(matches!(
                codec.derive_bytes(b"key", &wrapped[..wrapped.len() - cut], 0),
                Err(CryptoError::IntegrityCheckFailed)
            ));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Flipping any bit of the wrapped output is detected
    #[test]
    fn prop_tamper_detected(
        half_idx in 0usize..4,
        data in proptest::collection::vec(any::<u8>(), 0..96),
        pos in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let mut codec = codec(HALF_BLOCKS[half_idx]);
        let mut wrapped = codec.secure_bytes(b"tamper key", &data).unwrap();
        let i = pos.index(wrapped.len());
        wrapped[i] ^= 1 << bit;

        let result = codec.derive_bytes(b"tamper key", &wrapped, 0);
        prop_assert!(matches!(result, Err(CryptoError::IntegrityCheckFailed)));
    }

    /// Wrap then unwrap is the identity for arbitrary keys and data
    #[test]
    fn prop_round_trip(
        half_idx in 0usize..4,
        key in proptest::collection::vec(any::<u8>(), 1..64),
        data in proptest::collection::vec(any::<u8>(), 0..256),
    ) {
        let mut codec = codec(HALF_BLOCKS[half_idx]);
        let wrapped = codec.secure_bytes(&key, &data).unwrap();
        prop_assert_eq!(&*codec.derive_bytes(&key, &wrapped, 0).unwrap(), &data);
    }
}
