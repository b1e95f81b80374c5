//! Format Layer: PlayerPrefs TLV Encoding
//!
//! Prinsip desain:
//! - Fixed header 16 bytes, lalu entry sampai EOF
//! - Bounds-checked: decoder tidak pernah membaca melewati buffer
//! - Stateless: tidak ada state global, setiap call berdiri sendiri

mod codec;
mod header;
mod value;

pub use codec::{encoded_len, DecodeConfig, Decoder, Encoder, UnknownTagPolicy};
pub use header::{
    PrefsHeader, ValueTag, HEADER_SIZE, MAGIC, MAX_KEY_LEN, TAG_FLOAT, TAG_INT, TAG_LONG_STRING,
    VERSION_MAJOR, VERSION_MINOR,
};
pub use value::{PrefValue, Prefs};
