//! Block cipher key specs and cipher specs.

use super::Length;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Block cipher families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SymKeyType {
    Aes = 0,
    Aria = 1,
    Camellia = 2,
    Sm4 = 3,
    Seed = 4,
    Serpent = 5,
    Twofish = 6,
    Rc6 = 7,
    Cast6 = 8,
    Noekeon = 9,
    Threefish = 10,
    Kalyna = 11,
    Kuznyechik = 12,
    Gost = 13,
    Blowfish = 14,
    DesEde = 15,
    Rc5 = 16,
    Idea = 17,
}

const STD_BLOCK: &[Length] = &[Length::Len128];
const SHORT_BLOCK: &[Length] = &[Length::Len64];
const AES_KEYS: &[Length] = &[Length::Len128, Length::Len192, Length::Len256];
const LARGE_BLOCKS: &[Length] = &[Length::Len256, Length::Len512, Length::Len1024];
const KALYNA_LENGTHS: &[Length] = &[Length::Len128, Length::Len256, Length::Len512];

/// Modes a legacy GOST 28147 engine can drive.
const GOST_MODES: &[CipherMode] = &[
    CipherMode::Ecb,
    CipherMode::Cbc,
    CipherMode::Sic,
    CipherMode::Cfb,
    CipherMode::Ofb,
    CipherMode::Gofb,
    CipherMode::Gcfb,
];

impl SymKeyType {
    pub const ALL: [SymKeyType; 18] = [
        SymKeyType::Aes,
        SymKeyType::Aria,
        SymKeyType::Camellia,
        SymKeyType::Sm4,
        SymKeyType::Seed,
        SymKeyType::Serpent,
        SymKeyType::Twofish,
        SymKeyType::Rc6,
        SymKeyType::Cast6,
        SymKeyType::Noekeon,
        SymKeyType::Threefish,
        SymKeyType::Kalyna,
        SymKeyType::Kuznyechik,
        SymKeyType::Gost,
        SymKeyType::Blowfish,
        SymKeyType::DesEde,
        SymKeyType::Rc5,
        SymKeyType::Idea,
    ];

    pub fn ordinal(self) -> u32 {
        self as u32
    }

    pub fn from_ordinal(ordinal: u32) -> Option<SymKeyType> {
        Self::ALL.get(ordinal as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            SymKeyType::Aes => "AES",
            SymKeyType::Aria => "ARIA",
            SymKeyType::Camellia => "CAMELLIA",
            SymKeyType::Sm4 => "SM4",
            SymKeyType::Seed => "SEED",
            SymKeyType::Serpent => "SERPENT",
            SymKeyType::Twofish => "TWOFISH",
            SymKeyType::Rc6 => "RC6",
            SymKeyType::Cast6 => "CAST6",
            SymKeyType::Noekeon => "NOEKEON",
            SymKeyType::Threefish => "THREEFISH",
            SymKeyType::Kalyna => "KALYNA",
            SymKeyType::Kuznyechik => "KUZNYECHIK",
            SymKeyType::Gost => "GOST",
            SymKeyType::Blowfish => "BLOWFISH",
            SymKeyType::DesEde => "DESEDE",
            SymKeyType::Rc5 => "RC5",
            SymKeyType::Idea => "IDEA",
        }
    }

    pub fn block_lengths(self) -> &'static [Length] {
        match self {
            SymKeyType::Threefish => LARGE_BLOCKS,
            SymKeyType::Kalyna => KALYNA_LENGTHS,
            SymKeyType::Rc5 => &[Length::Len64, Length::Len128],
            SymKeyType::Gost | SymKeyType::Blowfish | SymKeyType::DesEde | SymKeyType::Idea => {
                SHORT_BLOCK
            }
            _ => STD_BLOCK,
        }
    }

    pub fn key_lengths(self) -> &'static [Length] {
        match self {
            SymKeyType::Sm4 | SymKeyType::Seed | SymKeyType::Noekeon | SymKeyType::Idea => {
                &[Length::Len128]
            }
            SymKeyType::Kuznyechik | SymKeyType::Gost => &[Length::Len256],
            SymKeyType::DesEde => &[Length::Len128, Length::Len192],
            SymKeyType::Threefish => LARGE_BLOCKS,
            SymKeyType::Kalyna => KALYNA_LENGTHS,
            _ => AES_KEYS,
        }
    }

    /// The block length used when a caller does not name one.
    pub fn default_block_length(self) -> Length {
        self.block_lengths()[0]
    }

    /// Checks a block/key length pair against the declared length sets and the
    /// pairing rules of the wide-block families.
    pub fn valid_block_and_key(self, block: Length, key: Length) -> bool {
        if !self.block_lengths().contains(&block) || !self.key_lengths().contains(&key) {
            return false;
        }
        match self {
            SymKeyType::Threefish => block == key,
            SymKeyType::Kalyna => key.bits() == block.bits() || key.bits() == block.bits() * 2,
            _ => true,
        }
    }

    /// Subset of modes supported by legacy engines, `None` when unrestricted.
    pub fn restricted_modes(self) -> Option<&'static [CipherMode]> {
        match self {
            SymKeyType::Gost => Some(GOST_MODES),
            _ => None,
        }
    }
}

/// A symmetric key family: algorithm plus block and key length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymKeySpec {
    pub key_type: SymKeyType,
    pub block_length: Length,
    pub key_length: Length,
}

impl SymKeySpec {
    pub fn new(key_type: SymKeyType, block_length: Length, key_length: Length) -> Self {
        Self {
            key_type,
            block_length,
            key_length,
        }
    }

    /// Spec with the family's default block length.
    pub fn of(key_type: SymKeyType, key_length: Length) -> Self {
        Self::new(key_type, key_type.default_block_length(), key_length)
    }

    pub fn aes(key_length: Length) -> Self {
        Self::of(SymKeyType::Aes, key_length)
    }

    /// Block and key length are members of the family's supported sets.
    pub fn is_consistent(&self) -> bool {
        self.key_type
            .valid_block_and_key(self.block_length, self.key_length)
    }

    /// Enumerates every consistent spec of the family for the given key length.
    pub fn all_for_key_length(key_length: Length) -> Vec<SymKeySpec> {
        let mut specs = Vec::new();
        for key_type in SymKeyType::ALL {
            for &block in key_type.block_lengths() {
                let spec = SymKeySpec::new(key_type, block, key_length);
                if spec.is_consistent() {
                    specs.push(spec);
                }
            }
        }
        specs
    }
}

impl fmt::Display for SymKeySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.key_type.block_lengths().len() > 1 {
            write!(
                f,
                "{}-{}-{}",
                self.key_type.name(),
                self.block_length,
                self.key_length
            )
        } else {
            write!(f, "{}-{}", self.key_type.name(), self.key_length)
        }
    }
}

/// Block cipher modes of operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CipherMode {
    Ecb = 0,
    Cbc = 1,
    Sic = 2,
    Cfb = 3,
    Cfb8 = 4,
    Ofb = 5,
    Ofb8 = 6,
    Eax = 7,
    Ccm = 8,
    Gcm = 9,
    Ocb = 10,
    GcmSiv = 11,
    Kctr = 12,
    Kccm = 13,
    Kgcm = 14,
    G3413Cbc = 15,
    G3413Cfb = 16,
    G3413Ofb = 17,
    G3413Ctr = 18,
    Gofb = 19,
    Gcfb = 20,
}

impl CipherMode {
    pub const ALL: [CipherMode; 21] = [
        CipherMode::Ecb,
        CipherMode::Cbc,
        CipherMode::Sic,
        CipherMode::Cfb,
        CipherMode::Cfb8,
        CipherMode::Ofb,
        CipherMode::Ofb8,
        CipherMode::Eax,
        CipherMode::Ccm,
        CipherMode::Gcm,
        CipherMode::Ocb,
        CipherMode::GcmSiv,
        CipherMode::Kctr,
        CipherMode::Kccm,
        CipherMode::Kgcm,
        CipherMode::G3413Cbc,
        CipherMode::G3413Cfb,
        CipherMode::G3413Ofb,
        CipherMode::G3413Ctr,
        CipherMode::Gofb,
        CipherMode::Gcfb,
    ];

    pub fn ordinal(self) -> u32 {
        self as u32
    }

    pub fn from_ordinal(ordinal: u32) -> Option<CipherMode> {
        Self::ALL.get(ordinal as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            CipherMode::Ecb => "ECB",
            CipherMode::Cbc => "CBC",
            CipherMode::Sic => "SIC",
            CipherMode::Cfb => "CFB",
            CipherMode::Cfb8 => "CFB8",
            CipherMode::Ofb => "OFB",
            CipherMode::Ofb8 => "OFB8",
            CipherMode::Eax => "EAX",
            CipherMode::Ccm => "CCM",
            CipherMode::Gcm => "GCM",
            CipherMode::Ocb => "OCB",
            CipherMode::GcmSiv => "GCMSIV",
            CipherMode::Kctr => "KCTR",
            CipherMode::Kccm => "KCCM",
            CipherMode::Kgcm => "KGCM",
            CipherMode::G3413Cbc => "G3413CBC",
            CipherMode::G3413Cfb => "G3413CFB",
            CipherMode::G3413Ofb => "G3413OFB",
            CipherMode::G3413Ctr => "G3413CTR",
            CipherMode::Gofb => "GOFB",
            CipherMode::Gcfb => "GCFB",
        }
    }

    /// Block-aligned modes that need a padding scheme.
    pub fn has_padding(self) -> bool {
        matches!(self, CipherMode::Ecb | CipherMode::Cbc | CipherMode::G3413Cbc)
    }

    pub fn is_aead(self) -> bool {
        matches!(
            self,
            CipherMode::Eax
                | CipherMode::Ccm
                | CipherMode::Gcm
                | CipherMode::Ocb
                | CipherMode::GcmSiv
                | CipherMode::Kccm
                | CipherMode::Kgcm
        )
    }

    pub fn valid_for_key_type(self, key_type: SymKeyType) -> bool {
        if let Some(modes) = key_type.restricted_modes() {
            if !modes.contains(&self) {
                return false;
            }
        }
        match self {
            CipherMode::G3413Cbc
            | CipherMode::G3413Cfb
            | CipherMode::G3413Ofb
            | CipherMode::G3413Ctr => key_type == SymKeyType::Kuznyechik,
            CipherMode::Kctr | CipherMode::Kccm | CipherMode::Kgcm => {
                key_type == SymKeyType::Kalyna
            }
            CipherMode::Gofb | CipherMode::Gcfb => key_type == SymKeyType::Gost,
            _ => true,
        }
    }

    /// Whether the mode can run over a block shorter than 128 bits.
    pub fn allows_short_block(self) -> bool {
        !matches!(
            self,
            CipherMode::Ccm
                | CipherMode::Gcm
                | CipherMode::Ocb
                | CipherMode::GcmSiv
                | CipherMode::Kctr
                | CipherMode::Kccm
                | CipherMode::Kgcm
        )
    }

    /// Whether the mode is only defined over exactly 128-bit blocks.
    pub fn needs_std_block(self) -> bool {
        matches!(
            self,
            CipherMode::Ccm | CipherMode::Gcm | CipherMode::Ocb | CipherMode::GcmSiv
        )
    }
}

/// Padding schemes for block-aligned modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Padding {
    None = 0,
    Pkcs7 = 1,
    Iso7816d4 = 2,
    X923 = 3,
    Tbc = 4,
    Cts = 5,
}

impl Padding {
    pub const ALL: [Padding; 6] = [
        Padding::None,
        Padding::Pkcs7,
        Padding::Iso7816d4,
        Padding::X923,
        Padding::Tbc,
        Padding::Cts,
    ];

    pub fn ordinal(self) -> u32 {
        self as u32
    }

    pub fn from_ordinal(ordinal: u32) -> Option<Padding> {
        Self::ALL.get(ordinal as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Padding::None => "NOPADDING",
            Padding::Pkcs7 => "PKCS7",
            Padding::Iso7816d4 => "ISO7816D4",
            Padding::X923 => "X923",
            Padding::Tbc => "TBC",
            Padding::Cts => "CTS",
        }
    }
}

/// Key spec plus mode and padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CipherSpec {
    pub key_spec: SymKeySpec,
    pub mode: CipherMode,
    pub padding: Padding,
}

impl CipherSpec {
    pub fn new(key_spec: SymKeySpec, mode: CipherMode, padding: Padding) -> Self {
        Self {
            key_spec,
            mode,
            padding,
        }
    }

    /// Spec for a mode without padding.
    pub fn unpadded(key_spec: SymKeySpec, mode: CipherMode) -> Self {
        Self::new(key_spec, mode, Padding::None)
    }

    /// The raw-block spec used to identify key-wrap output.
    pub fn wrap(key_spec: SymKeySpec) -> Self {
        Self::new(key_spec, CipherMode::Ecb, Padding::None)
    }

    pub fn is_wrap(&self) -> bool {
        self.mode == CipherMode::Ecb && self.padding == Padding::None
    }
}

impl fmt::Display for CipherSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.key_spec, self.mode.name())?;
        if self.mode.has_padding() {
            write!(f, "-{}", self.padding.name())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_match_positions() {
        for (i, t) in SymKeyType::ALL.iter().enumerate() {
            assert_eq!(t.ordinal() as usize, i);
        }
        for (i, m) in CipherMode::ALL.iter().enumerate() {
            assert_eq!(m.ordinal() as usize, i);
        }
        for (i, p) in Padding::ALL.iter().enumerate() {
            assert_eq!(p.ordinal() as usize, i);
        }
    }

    #[test]
    fn test_threefish_key_must_match_block() {
        let t = SymKeyType::Threefish;
        assert!(t.valid_block_and_key(Length::Len512, Length::Len512));
        assert!(!t.valid_block_and_key(Length::Len256, Length::Len512));
        assert!(!t.valid_block_and_key(Length::Len128, Length::Len128));
    }

    #[test]
    fn test_kalyna_key_pairing() {
        let k = SymKeyType::Kalyna;
        assert!(k.valid_block_and_key(Length::Len128, Length::Len128));
        assert!(k.valid_block_and_key(Length::Len128, Length::Len256));
        assert!(k.valid_block_and_key(Length::Len256, Length::Len512));
        assert!(!k.valid_block_and_key(Length::Len512, Length::Len256));
        assert!(!k.valid_block_and_key(Length::Len128, Length::Len512));
    }

    #[test]
    fn test_display_names() {
        let gcm = CipherSpec::unpadded(SymKeySpec::aes(Length::Len128), CipherMode::Gcm);
        assert_eq!(gcm.to_string(), "AES-128-GCM");

        let cbc = CipherSpec::new(
            SymKeySpec::of(SymKeyType::Aria, Length::Len256),
            CipherMode::Cbc,
            Padding::Pkcs7,
        );
        assert_eq!(cbc.to_string(), "ARIA-256-CBC-PKCS7");

        let rc5 = SymKeySpec::new(SymKeyType::Rc5, Length::Len64, Length::Len128);
        assert_eq!(rc5.to_string(), "RC5-64-128");
    }

    #[test]
    fn test_mode_restrictions() {
        assert!(CipherMode::Kgcm.valid_for_key_type(SymKeyType::Kalyna));
        assert!(!CipherMode::Kgcm.valid_for_key_type(SymKeyType::Aes));
        assert!(CipherMode::Gofb.valid_for_key_type(SymKeyType::Gost));
        assert!(!CipherMode::Cfb8.valid_for_key_type(SymKeyType::Gost));
        assert!(CipherMode::Gcm.valid_for_key_type(SymKeyType::Aes));
    }

    #[test]
    fn test_all_for_key_length_is_consistent() {
        let specs = SymKeySpec::all_for_key_length(Length::Len256);
        assert!(!specs.is_empty());
        assert!(specs.iter().all(SymKeySpec::is_consistent));
        assert!(specs.contains(&SymKeySpec::new(
            SymKeyType::Threefish,
            Length::Len256,
            Length::Len256
        )));
        assert!(!specs.iter().any(|s| s.key_type == SymKeyType::Sm4));
    }
}
