//! Spec validation tests
//!
//! Covers:
//! - totality over the whole enumerated cipher space
//! - agreement with an independent rule table on every tuple
//! - the ordering of the rejection rules
//! - provider-restricted validation

use gordian_core::crypto::suites::classic::ClassicSuiteProvider;
use gordian_core::error::{CryptoError, SpecError};
use gordian_core::spec::{
    AgreementKind, AgreementSpec, CipherMode, CipherSpec, KeyPairType, Length, Padding,
    StreamCipherSpec, StreamKeyType, SymKeySpec, SymKeyType,
};
use gordian_core::validation::SpecValidator;
use std::sync::Arc;

/// A short-block legacy cipher under GCM is rejected with a spec error
#[test]
fn test_short_block_aead_rejected() {
    let validator = SpecValidator::permissive();
    let spec = CipherSpec::unpadded(SymKeySpec::of(SymKeyType::Blowfish, Length::Len128), CipherMode::Gcm);

    assert!(matches!(
        validator.check_cipher_spec(&spec),
        Err(CryptoError::SpecInvalid(SpecError::BlockLengthRestriction))
    ));
    assert!(!validator.is_valid_cipher_spec(&spec));
}

/// Every block/key/mode/padding tuple gets a decision, and the decision is stable
#[test]
fn test_validation_is_total_and_pure() {
    let validator = SpecValidator::permissive();
    let mut accepted = 0usize;
    let mut rejected = 0usize;

    for key_type in SymKeyType::ALL {
        for block in Length::ALL {
            for key in Length::ALL {
                for mode in CipherMode::ALL {
                    for padding in Padding::ALL {
                        let spec = CipherSpec::new(SymKeySpec::new(key_type, block, key), mode, padding);
                        let first = validator.check_cipher_spec(&spec);
                        let second = validator.check_cipher_spec(&spec);
                        match (&first, &second) {
                            (Ok(()), Ok(())) => accepted += 1,
                            (Err(CryptoError::SpecInvalid(a)), Err(CryptoError::SpecInvalid(b))) => {
                                assert_eq!(a, b, "{}", spec);
                                rejected += 1;
                            }
                            other => panic!("{}: unexpected {:?}", spec, other),
                        }
                    }
                }
            }
        }
    }

    assert!(accepted > 0);
    assert!(rejected > accepted);
}

/// Expected decision for one tuple, written out from the algorithm tables
/// independently of the library's own helpers.
fn expected_decision(
    key_type: SymKeyType,
    block: usize,
    key: usize,
    mode: CipherMode,
    padding: Padding,
) -> Result<(), SpecError> {
    use CipherMode::*;
    use SymKeyType::*;

    let (blocks, keys): (&[usize], &[usize]) = match key_type {
        Threefish => (&[256, 512, 1024], &[256, 512, 1024]),
        Kalyna => (&[128, 256, 512], &[128, 256, 512]),
        Rc5 => (&[64, 128], &[128, 192, 256]),
        Gost => (&[64], &[256]),
        Blowfish => (&[64], &[128, 192, 256]),
        DesEde => (&[64], &[128, 192]),
        Idea => (&[64], &[128]),
        Sm4 | Seed | Noekeon => (&[128], &[128]),
        Kuznyechik => (&[128], &[256]),
        Aes | Aria | Camellia | Serpent | Twofish | Rc6 | Cast6 => (&[128], &[128, 192, 256]),
    };
    let paired = match key_type {
        Threefish => block == key,
        Kalyna => key == block || key == 2 * block,
        _ => true,
    };
    if !blocks.contains(&block) || !keys.contains(&key) || !paired {
        return Err(SpecError::InconsistentSpec);
    }

    let mode_ok = match mode {
        G3413Cbc | G3413Cfb | G3413Ofb | G3413Ctr => key_type == Kuznyechik,
        Kctr | Kccm | Kgcm => key_type == Kalyna,
        Gofb | Gcfb => key_type == Gost,
        Ecb | Cbc | Sic | Cfb | Ofb => true,
        Cfb8 | Ofb8 | Eax | Ccm | Gcm | Ocb | GcmSiv => key_type != Gost,
    };
    if !mode_ok {
        return Err(SpecError::InvalidModeForKeyType);
    }

    let aead = matches!(mode, Eax | Ccm | Gcm | Ocb | GcmSiv | Kccm | Kgcm);
    if aead && key_type == Rc5 && block == 64 {
        return Err(SpecError::DisallowedAad);
    }

    let wide_only = matches!(mode, Ccm | Gcm | Ocb | GcmSiv | Kctr | Kccm | Kgcm);
    let exactly_128 = matches!(mode, Ccm | Gcm | Ocb | GcmSiv);
    if (block < 128 && wide_only) || (block != 128 && exactly_128) {
        return Err(SpecError::BlockLengthRestriction);
    }

    if !matches!(mode, Ecb | Cbc | G3413Cbc) && padding != Padding::None {
        return Err(SpecError::InvalidPadding);
    }
    Ok(())
}

/// The validator agrees with the written-out rule table on every tuple of the space
#[test]
fn test_validation_matches_rule_table() {
    let validator = SpecValidator::permissive();
    let mut accepted = std::collections::BTreeMap::new();

    for key_type in SymKeyType::ALL {
        for block in Length::ALL {
            for key in Length::ALL {
                for mode in CipherMode::ALL {
                    for padding in Padding::ALL {
                        let spec = CipherSpec::new(SymKeySpec::new(key_type, block, key), mode, padding);
                        let actual = match validator.check_cipher_spec(&spec) {
                            Ok(()) => Ok(()),
                            Err(CryptoError::SpecInvalid(reason)) => Err(reason),
                            Err(other) => panic!("{}: unexpected {:?}", spec, other),
                        };
                        let expected = expected_decision(key_type, block.bits(), key.bits(), mode, padding);
                        assert_eq!(actual, expected, "{}", spec);
                        if actual.is_ok() {
                            *accepted.entry(key_type).or_insert(0usize) += 1;
                        }
                    }
                }
            }
        }
    }

    // 12 modes per key length, ECB and CBC with all six paddings
    assert_eq!(accepted[&SymKeyType::Aes], 3 * (2 * 6 + 10));
    // short block drops CCM, GCM, OCB and GCM-SIV
    assert_eq!(accepted[&SymKeyType::Blowfish], 3 * (2 * 6 + 6));
    assert_eq!(accepted[&SymKeyType::Gost], 2 * 6 + 5);
}

/// Accepted specs always satisfy the padding rule
#[test]
fn test_accepted_specs_have_consistent_padding() {
    let validator = SpecValidator::permissive();
    for key_type in SymKeyType::ALL {
        for &key in key_type.key_lengths() {
            for &block in key_type.block_lengths() {
                for mode in CipherMode::ALL {
                    for padding in Padding::ALL {
                        let spec = CipherSpec::new(SymKeySpec::new(key_type, block, key), mode, padding);
                        if validator.is_valid_cipher_spec(&spec) && !mode.has_padding() {
                            assert_eq!(padding, Padding::None, "{}", spec);
                        }
                    }
                }
            }
        }
    }
}

/// Rules fire in order: consistency before mode, AAD before block length
#[test]
fn test_rule_order() {
    let validator = SpecValidator::permissive();

    let inconsistent = CipherSpec::unpadded(
        SymKeySpec::new(SymKeyType::Aes, Length::Len64, Length::Len128),
        CipherMode::Kgcm,
    );
    assert!(matches!(
        validator.check_cipher_spec(&inconsistent),
        Err(CryptoError::SpecInvalid(SpecError::InconsistentSpec))
    ));

    let wrong_mode = CipherSpec::unpadded(SymKeySpec::aes(Length::Len128), CipherMode::Gofb);
    assert!(matches!(
        validator.check_cipher_spec(&wrong_mode),
        Err(CryptoError::SpecInvalid(SpecError::InvalidModeForKeyType))
    ));

    let rc5_short = CipherSpec::unpadded(
        SymKeySpec::new(SymKeyType::Rc5, Length::Len64, Length::Len128),
        CipherMode::Gcm,
    );
    assert!(matches!(
        validator.check_cipher_spec(&rc5_short),
        Err(CryptoError::SpecInvalid(SpecError::DisallowedAad))
    ));

    let padded_stream_mode = CipherSpec::new(SymKeySpec::aes(Length::Len128), CipherMode::Sic, Padding::Pkcs7);
    assert!(matches!(
        validator.check_cipher_spec(&padded_stream_mode),
        Err(CryptoError::SpecInvalid(SpecError::InvalidPadding))
    ));
}

/// A provider only validates the families it can run
#[test]
fn test_provider_restricted_validator() {
    let validator = SpecValidator::for_provider(Arc::new(ClassicSuiteProvider::new()));

    assert!(validator.is_valid_cipher_spec(&CipherSpec::wrap(SymKeySpec::aes(Length::Len256))));
    assert!(matches!(
        validator.check_cipher_spec(&CipherSpec::wrap(SymKeySpec::of(SymKeyType::Aria, Length::Len128))),
        Err(CryptoError::SpecInvalid(SpecError::UnsupportedKeyType))
    ));
    assert!(!validator.is_valid_stream_spec(&StreamCipherSpec::chacha20_poly1305()));

    assert!(validator.is_valid_agreement_spec(&AgreementSpec::kem(KeyPairType::X25519)));
    assert!(matches!(
        validator.check_agreement_spec(&AgreementSpec::new(KeyPairType::Ed25519, AgreementKind::Basic)),
        Err(CryptoError::SpecInvalid(SpecError::InvalidAgreement))
    ));
}

/// Stream AEAD is only accepted for families that define it
#[test]
fn test_stream_aead_rule() {
    let validator = SpecValidator::permissive();
    for key_type in StreamKeyType::ALL {
        for &key in key_type.key_lengths() {
            let spec = StreamCipherSpec::new(key_type, key, true);
            assert_eq!(validator.is_valid_stream_spec(&spec), key_type.supports_aead(), "{}", spec);
        }
    }
}
