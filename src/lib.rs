//! Unity PlayerPrefs - Codec untuk format biner WebPlayer PlayerPrefs
//!
//! Arsitektur:
//! - Format: header 16 bytes + entry TLV (key, type tag, value)
//! - Decode: bounds-checked, urutan key dipertahankan
//! - Encode: satu buffer growable, tag paling ringkas per value
//! - Storage: mmap-backed load, atomic save
//!
//! ```
//! use unity_prefs::{decode, encode, PrefValue, Prefs};
//!
//! let mut prefs = Prefs::new();
//! prefs.insert("x".to_string(), PrefValue::Int(1));
//! prefs.insert("name".to_string(), PrefValue::from("abc"));
//!
//! let bytes = encode(&prefs).unwrap();
//! assert_eq!(decode(&bytes).unwrap(), prefs);
//! ```

pub mod error;
pub mod format;
pub mod storage;

pub use error::{Error, Result};
pub use format::{DecodeConfig, PrefValue, Prefs, UnknownTagPolicy};
pub use storage::{load, load_with_config, save};

use format::{encoded_len, Decoder, Encoder};

/// Decode buffer PlayerPrefs lengkap (tag tak dikenal ditolak)
#[inline(always)]
pub fn decode(buffer: &[u8]) -> Result<Prefs> {
    decode_with_config(buffer, DecodeConfig::default())
}

pub fn decode_with_config(buffer: &[u8], config: DecodeConfig) -> Result<Prefs> {
    Decoder::with_config(buffer, config)?.decode_all()
}

/// Encode mapping ke buffer PlayerPrefs, mengikuti urutan iterasi mapping
pub fn encode(prefs: &Prefs) -> Result<Vec<u8>> {
    let mut encoder = Encoder::with_capacity(encoded_len(prefs));
    for (key, value) in prefs {
        encoder.write_entry(key, value)?;
    }
    Ok(encoder.into_bytes())
}
