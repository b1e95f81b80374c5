//! PlayerPrefs File Header & Type Tags
//!
//! Layout:
//! ┌─────────────────────────────────────────────────────┐
//! │ Header (16 bytes, fixed)                            │
//! │   "UnityPrf" | u32 LE 0x00010000 | u32 LE 0x00100000│
//! ├─────────────────────────────────────────────────────┤
//! │ Entry* sampai EOF                                   │
//! │   u8 key_len | key | u8 tag | value                 │
//! └─────────────────────────────────────────────────────┘
//!
//! Version word tidak diinterpretasi, hanya dicocokkan.

use crate::error::{Error, Result};

pub const MAGIC: &[u8; 8] = b"UnityPrf";
pub const VERSION_MAJOR: u32 = 0x0001_0000;
pub const VERSION_MINOR: u32 = 0x0010_0000;
pub const HEADER_SIZE: usize = 16;

/// Tag untuk string dengan length prefix u32
pub const TAG_LONG_STRING: u8 = 0x80;
pub const TAG_FLOAT: u8 = 0xFD;
pub const TAG_INT: u8 = 0xFE;

pub const MAX_KEY_LEN: usize = u8::MAX as usize;

/// Header file - fixed 16 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefsHeader {
    pub magic: [u8; 8],
    pub version_major: u32,
    pub version_minor: u32,
}

impl Default for PrefsHeader {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefsHeader {
    /// Header dengan konstanta standar
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            magic: *MAGIC,
            version_major: VERSION_MAJOR,
            version_minor: VERSION_MINOR,
        }
    }

    /// Validasi header
    #[inline(always)]
    pub fn is_valid(&self) -> bool {
        &self.magic == MAGIC
            && self.version_major == VERSION_MAJOR
            && self.version_minor == VERSION_MINOR
    }

    /// Parse dan validasi header dari awal buffer
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        if buf.len() < HEADER_SIZE {
            return Err(Error::malformed_header(format!(
                "buffer is {} bytes, header needs {}",
                buf.len(),
                HEADER_SIZE
            )));
        }

        let mut magic = [0u8; 8];
        magic.copy_from_slice(&buf[..8]);
        let header = Self {
            magic,
            version_major: read_u32_le(&buf[8..12]),
            version_minor: read_u32_le(&buf[12..16]),
        };

        if &header.magic != MAGIC {
            return Err(Error::malformed_header(format!(
                "magic {:?} != {:?}",
                String::from_utf8_lossy(&header.magic),
                String::from_utf8_lossy(MAGIC)
            )));
        }
        if !header.is_valid() {
            return Err(Error::malformed_header(format!(
                "version words {:#010x}/{:#010x}, expected {:#010x}/{:#010x}",
                header.version_major, header.version_minor, VERSION_MAJOR, VERSION_MINOR
            )));
        }

        Ok(header)
    }

    #[inline(always)]
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[..8].copy_from_slice(&self.magic);
        out[8..12].copy_from_slice(&self.version_major.to_le_bytes());
        out[12..16].copy_from_slice(&self.version_minor.to_le_bytes());
        out
    }
}

/// Klasifikasi byte tag sebuah entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTag {
    /// Tag < 0x80: tag itu sendiri adalah panjang string
    ShortString(u8),
    LongString,
    Float,
    Int,
    Unknown(u8),
}

impl ValueTag {
    #[inline(always)]
    pub fn from_u8(v: u8) -> Self {
        match v {
            0..=0x7F => Self::ShortString(v),
            TAG_LONG_STRING => Self::LongString,
            TAG_FLOAT => Self::Float,
            TAG_INT => Self::Int,
            other => Self::Unknown(other),
        }
    }

    #[inline(always)]
    pub fn as_u8(self) -> u8 {
        match self {
            Self::ShortString(len) => len,
            Self::LongString => TAG_LONG_STRING,
            Self::Float => TAG_FLOAT,
            Self::Int => TAG_INT,
            Self::Unknown(tag) => tag,
        }
    }

    /// Nama pendek untuk output human-readable
    pub fn name(self) -> &'static str {
        match self {
            Self::ShortString(_) | Self::LongString => "string",
            Self::Float => "float",
            Self::Int => "int",
            Self::Unknown(_) => "unknown",
        }
    }
}

/// Caller harus menjamin `bytes.len() == 4`
#[inline(always)]
pub(crate) fn read_u32_le(bytes: &[u8]) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(bytes);
    u32::from_le_bytes(word)
}
