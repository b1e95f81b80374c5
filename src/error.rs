//! Error types untuk codec PlayerPrefs.
//!
//! Semua error dilaporkan secara sinkron di titik deteksi. Tidak ada retry:
//! parsing deterministik atas buffer yang tetap.

use std::io;

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Magic atau version word tidak cocok, atau buffer lebih pendek dari header
    #[error("malformed header: {reason}")]
    MalformedHeader { reason: String },

    /// Panjang yang dideklarasikan melewati akhir buffer
    #[error("truncated entry at offset {offset}: needed {needed} bytes, {available} available")]
    TruncatedEntry {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Nilai di luar {text, int, float}, atau tag tak dikenal saat decode strict
    #[error("unsupported value type: {detail}")]
    UnsupportedValueType { detail: String },

    #[error("key is {len} bytes long, the format allows at most 255")]
    KeyTooLong { len: usize },

    #[error("text value for key {key:?} is {len} bytes long, exceeds u32 length prefix")]
    ValueTooLong { key: String, len: usize },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn malformed_header(reason: impl Into<String>) -> Self {
        Error::MalformedHeader {
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported(detail: impl Into<String>) -> Self {
        Error::UnsupportedValueType {
            detail: detail.into(),
        }
    }

    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }

    /// True untuk error yang berarti "buffer ini bukan file PlayerPrefs valid"
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Error::MalformedHeader { .. }
                | Error::TruncatedEntry { .. }
                | Error::UnsupportedValueType { .. }
        )
    }
}
