// Стандартные идентификаторы алгоритмов (NIST, KISA/NSRI, OSCCA, NTT, RFC 8103)
//
// Эти значения используются для совместимости с другими реализациями
// и не должны меняться.

use super::{AlgorithmIdentifier, AlgorithmSpec};
use crate::spec::{CipherMode, CipherSpec, Length, Padding, StreamCipherSpec, SymKeySpec, SymKeyType};

const NIST_AES: &[u32] = &[2, 16, 840, 1, 101, 3, 4, 1];
const ARIA: &[u32] = &[1, 2, 410, 200046, 1, 1];
const SM4: &[u32] = &[1, 2, 156, 10197, 1, 104];
const CAMELLIA_CBC: &[u32] = &[1, 2, 392, 200011, 61, 1, 1, 1];
const SEED_CBC: &[u32] = &[1, 2, 410, 200004, 1, 4];
const CHACHA20_POLY1305: &[u32] = &[1, 2, 840, 113549, 1, 9, 16, 3, 18];

const KEY_LENGTHS: [Length; 3] = [Length::Len128, Length::Len192, Length::Len256];

/// ECB and CBC identifiers carry PKCS7 padding; stream-like modes carry none.
fn padded(key_spec: SymKeySpec, mode: CipherMode) -> AlgorithmSpec {
    let padding = if mode.has_padding() {
        Padding::Pkcs7
    } else {
        Padding::None
    };
    AlgorithmSpec::Cipher(CipherSpec::new(key_spec, mode, padding))
}

fn under(root: &[u32], arc: u32) -> AlgorithmIdentifier {
    AlgorithmIdentifier::known(root).branch(&[arc])
}

pub(super) fn table() -> Vec<(AlgorithmIdentifier, AlgorithmSpec)> {
    let mut out = Vec::new();

    // id-aes{128,192,256}-{ECB,CBC,OFB,CFB,GCM,CCM}
    let aes_modes = [
        (1, CipherMode::Ecb),
        (2, CipherMode::Cbc),
        (3, CipherMode::Ofb),
        (4, CipherMode::Cfb),
        (6, CipherMode::Gcm),
        (7, CipherMode::Ccm),
    ];
    for (i, key) in KEY_LENGTHS.into_iter().enumerate() {
        let base = 20 * i as u32;
        for (arc, mode) in aes_modes {
            out.push((under(NIST_AES, base + arc), padded(SymKeySpec::aes(key), mode)));
        }
    }

    // aria{128,192,256}-{ecb,cbc,cfb,ofb,ctr}, -gcm, -ccm
    let aria_modes = [
        CipherMode::Ecb,
        CipherMode::Cbc,
        CipherMode::Cfb,
        CipherMode::Ofb,
        CipherMode::Sic,
    ];
    for (i, key) in KEY_LENGTHS.into_iter().enumerate() {
        let spec = SymKeySpec::of(SymKeyType::Aria, key);
        let base = 5 * i as u32;
        for (j, mode) in aria_modes.into_iter().enumerate() {
            out.push((under(ARIA, base + j as u32 + 1), padded(spec, mode)));
        }
        out.push((under(ARIA, 34 + i as u32), padded(spec, CipherMode::Gcm)));
        out.push((under(ARIA, 37 + i as u32), padded(spec, CipherMode::Ccm)));
    }

    let sm4 = SymKeySpec::of(SymKeyType::Sm4, Length::Len128);
    for (arc, mode) in [
        (1, CipherMode::Ecb),
        (2, CipherMode::Cbc),
        (3, CipherMode::Ofb),
        (4, CipherMode::Cfb),
        (6, CipherMode::Cfb8),
        (7, CipherMode::Sic),
        (8, CipherMode::Gcm),
        (9, CipherMode::Ccm),
    ] {
        out.push((under(SM4, arc), padded(sm4, mode)));
    }

    for (i, key) in KEY_LENGTHS.into_iter().enumerate() {
        out.push((
            under(CAMELLIA_CBC, 2 + i as u32),
            padded(SymKeySpec::of(SymKeyType::Camellia, key), CipherMode::Cbc),
        ));
    }

    out.push((
        AlgorithmIdentifier::known(SEED_CBC),
        padded(SymKeySpec::of(SymKeyType::Seed, Length::Len128), CipherMode::Cbc),
    ));

    out.push((
        AlgorithmIdentifier::known(CHACHA20_POLY1305),
        AlgorithmSpec::Stream(StreamCipherSpec::chacha20_poly1305()),
    ));

    out
}
