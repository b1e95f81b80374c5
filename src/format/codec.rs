//! Encoder/Decoder untuk entry PlayerPrefs
//!
//! Decoder membaca langsung dari buffer pinjaman dengan cursor, setiap
//! read dicek batasnya dulu. Encoder menulis ke satu `Vec<u8>` yang
//! di-reserve di awal, tidak ada concat ulang per field.

use std::borrow::Cow;

use log::{debug, trace, warn};

use super::header::{
    read_u32_le, PrefsHeader, ValueTag, HEADER_SIZE, MAX_KEY_LEN, TAG_FLOAT, TAG_INT,
    TAG_LONG_STRING,
};
use super::value::{PrefValue, Prefs};
use crate::error::{Error, Result};

/// Perlakuan decoder terhadap tag di luar empat kasus yang dikenal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownTagPolicy {
    /// Gagal dengan `UnsupportedValueType`
    #[default]
    Reject,
    /// Simpan `PrefValue::Unknown(tag)`, konsumsi nol byte value
    Lenient,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeConfig {
    pub unknown_tags: UnknownTagPolicy,
}

impl DecodeConfig {
    pub fn lenient() -> Self {
        Self {
            unknown_tags: UnknownTagPolicy::Lenient,
        }
    }
}

/// Cursor decoder di atas buffer
pub struct Decoder<'a> {
    buffer: &'a [u8],
    read_pos: usize,
    config: DecodeConfig,
}

impl<'a> Decoder<'a> {
    /// Membuat decoder dan validasi header
    pub fn new(buffer: &'a [u8]) -> Result<Self> {
        Self::with_config(buffer, DecodeConfig::default())
    }

    pub fn with_config(buffer: &'a [u8], config: DecodeConfig) -> Result<Self> {
        PrefsHeader::from_bytes(buffer)?;
        Ok(Self {
            buffer,
            read_pos: HEADER_SIZE,
            config,
        })
    }

    /// Ambil `len` byte berikutnya, atau `TruncatedEntry` kalau tidak cukup
    #[inline(always)]
    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let available = self.remaining();
        if len > available {
            return Err(Error::TruncatedEntry {
                offset: self.read_pos,
                needed: len,
                available,
            });
        }
        let start = self.read_pos;
        self.read_pos += len;
        Ok(&self.buffer[start..self.read_pos])
    }

    #[inline(always)]
    fn take_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    #[inline(always)]
    fn take_u32(&mut self) -> Result<u32> {
        Ok(read_u32_le(self.take(4)?))
    }

    #[inline(always)]
    fn take_text(&mut self, len: usize) -> Result<String> {
        // Invalid UTF-8 diganti U+FFFD, sama seperti reader PlayerPrefs lain
        Ok(match String::from_utf8_lossy(self.take(len)?) {
            Cow::Borrowed(s) => s.to_owned(),
            Cow::Owned(s) => {
                debug!("invalid UTF-8 replaced at offset {}", self.read_pos - len);
                s
            }
        })
    }

    /// Decode entry berikutnya. `Ok(None)` saat buffer habis tepat di batas entry.
    pub fn next_entry(&mut self) -> Result<Option<(String, PrefValue)>> {
        if self.remaining() == 0 {
            return Ok(None);
        }

        let entry_offset = self.read_pos;
        let key_len = self.take_u8()? as usize;
        let key = self.take_text(key_len)?;
        let tag = self.take_u8()?;

        let value = match ValueTag::from_u8(tag) {
            ValueTag::ShortString(len) => PrefValue::Text(self.take_text(len as usize)?),
            ValueTag::LongString => {
                let len = self.take_u32()? as usize;
                PrefValue::Text(self.take_text(len)?)
            }
            ValueTag::Float => PrefValue::Float(f32::from_bits(self.take_u32()?)),
            ValueTag::Int => PrefValue::Int(self.take_u32()? as i32),
            ValueTag::Unknown(tag) => match self.config.unknown_tags {
                UnknownTagPolicy::Reject => {
                    return Err(Error::unsupported(format!(
                        "unknown type tag {:#04x} for key {:?} at offset {}",
                        tag, key, entry_offset
                    )));
                }
                UnknownTagPolicy::Lenient => {
                    warn!(
                        "unknown type tag {:#04x} for key {:?} at offset {}, no value consumed",
                        tag, key, entry_offset
                    );
                    PrefValue::Unknown(tag)
                }
            },
        };

        trace!("entry @{}: {:?} = {}", entry_offset, key, value);
        Ok(Some((key, value)))
    }

    /// Decode semua entry yang tersisa ke dalam `Prefs`
    pub fn decode_all(mut self) -> Result<Prefs> {
        let mut prefs = Prefs::new();
        while let Some((key, value)) = self.next_entry()? {
            // insert() menimpa value tapi posisi key pertama tetap
            prefs.insert(key, value);
        }
        debug!(
            "decoded {} entries from {} bytes",
            prefs.len(),
            self.buffer.len()
        );
        Ok(prefs)
    }

    /// Remaining bytes
    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.read_pos
    }

    #[inline(always)]
    pub fn position(&self) -> usize {
        self.read_pos
    }
}

impl<'a> Iterator for Decoder<'a> {
    type Item = Result<(String, PrefValue)>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_entry() {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => None,
            Err(e) => {
                // Berhenti setelah error pertama
                self.read_pos = self.buffer.len();
                Some(Err(e))
            }
        }
    }
}

/// Growable encoder buffer, header ditulis saat konstruksi
pub struct Encoder {
    buffer: Vec<u8>,
    entries: usize,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub fn new() -> Self {
        Self::with_capacity(HEADER_SIZE)
    }

    /// Membuat encoder dengan kapasitas awal (termasuk header)
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buffer = Vec::with_capacity(capacity.max(HEADER_SIZE));
        buffer.extend_from_slice(&PrefsHeader::new().to_bytes());
        Self { buffer, entries: 0 }
    }

    /// Encode satu entry. Buffer tidak berubah kalau error.
    pub fn write_entry(&mut self, key: &str, value: &PrefValue) -> Result<()> {
        if key.len() > MAX_KEY_LEN {
            return Err(Error::KeyTooLong { len: key.len() });
        }

        if let PrefValue::Text(s) = value {
            if s.len() > u32::MAX as usize {
                return Err(Error::ValueTooLong {
                    key: key.to_owned(),
                    len: s.len(),
                });
            }
        }

        let start = self.buffer.len();
        self.buffer.reserve(entry_len(key, value));
        self.buffer.push(key.len() as u8);
        self.buffer.extend_from_slice(key.as_bytes());

        match value {
            PrefValue::Text(s) => {
                if s.len() < TAG_LONG_STRING as usize {
                    // Short string: tag sekaligus panjang
                    self.buffer.push(s.len() as u8);
                } else {
                    self.buffer.push(TAG_LONG_STRING);
                    self.buffer
                        .extend_from_slice(&(s.len() as u32).to_le_bytes());
                }
                self.buffer.extend_from_slice(s.as_bytes());
            }
            PrefValue::Int(v) => {
                self.buffer.push(TAG_INT);
                self.buffer.extend_from_slice(&v.to_le_bytes());
            }
            PrefValue::Float(v) => {
                self.buffer.push(TAG_FLOAT);
                self.buffer.extend_from_slice(&v.to_le_bytes());
            }
            PrefValue::Unknown(tag) => {
                self.buffer.truncate(start);
                return Err(Error::unsupported(format!(
                    "key {:?} holds a value with unknown tag {:#04x}",
                    key, tag
                )));
            }
        }

        self.entries += 1;
        Ok(())
    }

    /// Jumlah byte yang sudah ditulis, termasuk header
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True kalau belum ada entry; header selalu ada
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        debug!(
            "encoded {} entries into {} bytes",
            self.entries,
            self.buffer.len()
        );
        self.buffer
    }
}

/// Ukuran satu entry ter-encode
fn entry_len(key: &str, value: &PrefValue) -> usize {
    let value_len = match value {
        PrefValue::Text(s) if s.len() < TAG_LONG_STRING as usize => s.len(),
        PrefValue::Text(s) => 4 + s.len(),
        PrefValue::Int(_) | PrefValue::Float(_) => 4,
        PrefValue::Unknown(_) => 0,
    };
    1 + key.len() + 1 + value_len
}

/// Ukuran total output `encode` untuk mapping ini
pub fn encoded_len(prefs: &Prefs) -> usize {
    HEADER_SIZE
        + prefs
            .iter()
            .map(|(key, value)| entry_len(key, value))
            .sum::<usize>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> Vec<u8> {
        PrefsHeader::new().to_bytes().to_vec()
    }

    #[test]
    fn test_encode_decode_single() {
        let mut encoder = Encoder::new();
        encoder.write_entry("volume", &PrefValue::Float(0.75)).unwrap();

        let mut decoder = Decoder::new(encoder.as_bytes()).unwrap();
        assert_eq!(decoder.position(), HEADER_SIZE);
        let (key, value) = decoder.next_entry().unwrap().unwrap();
        assert_eq!(key, "volume");
        assert_eq!(value, PrefValue::Float(0.75));
        // key_len + "volume" + tag + f32
        assert_eq!(decoder.position(), HEADER_SIZE + 1 + 6 + 1 + 4);
        assert_eq!(decoder.remaining(), 0);
        assert!(decoder.next_entry().unwrap().is_none());
    }

    #[test]
    fn test_encoder_int_layout() {
        let mut encoder = Encoder::new();
        encoder.write_entry("x", &PrefValue::Int(1)).unwrap();

        let mut expected = header();
        expected.extend_from_slice(&[0x01, b'x', 0xFE, 0x01, 0x00, 0x00, 0x00]);
        assert_eq!(encoder.into_bytes(), expected);
    }

    #[test]
    fn test_encoder_negative_int() {
        let mut encoder = Encoder::new();
        encoder.write_entry("n", &PrefValue::Int(-2)).unwrap();
        assert_eq!(&encoder.as_bytes()[HEADER_SIZE + 2..], &[0xFE, 0xFE, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_encoder_long_string_layout() {
        let text = "z".repeat(200);
        let mut encoder = Encoder::new();
        encoder.write_entry("k", &PrefValue::from(text.as_str())).unwrap();

        let bytes = encoder.as_bytes();
        assert_eq!(bytes[HEADER_SIZE + 2], TAG_LONG_STRING);
        assert_eq!(&bytes[HEADER_SIZE + 3..HEADER_SIZE + 7], &200u32.to_le_bytes());
        assert_eq!(bytes.len(), HEADER_SIZE + 1 + 1 + 1 + 4 + 200);
    }

    #[test]
    fn test_encoder_rejects_long_key() {
        let mut encoder = Encoder::new();
        let key = "k".repeat(256);
        let err = encoder.write_entry(&key, &PrefValue::Int(0)).unwrap_err();
        assert!(matches!(err, Error::KeyTooLong { len: 256 }));
        // tidak ada byte yang tertulis
        assert_eq!(encoder.len(), HEADER_SIZE);

        encoder.write_entry(&"k".repeat(255), &PrefValue::Int(0)).unwrap();
    }

    #[test]
    fn test_encoder_rejects_unknown_value() {
        let mut encoder = Encoder::new();
        let err = encoder
            .write_entry("legacy", &PrefValue::Unknown(0x90))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedValueType { .. }));
        assert!(encoder.is_empty());
        assert_eq!(encoder.len(), HEADER_SIZE);
    }

    #[test]
    fn test_decoder_unknown_tag_strict() {
        let mut buf = header();
        buf.extend_from_slice(&[0x01, b'a', 0x90]);

        let mut decoder = Decoder::new(&buf).unwrap();
        let err = decoder.next_entry().unwrap_err();
        assert!(matches!(err, Error::UnsupportedValueType { .. }));
    }

    #[test]
    fn test_decoder_unknown_tag_lenient() {
        let mut buf = header();
        buf.extend_from_slice(&[0x01, b'a', 0x90]);
        buf.extend_from_slice(&[0x01, b'b', 0x02, b'h', b'i']);

        let prefs = Decoder::with_config(&buf, DecodeConfig::lenient())
            .unwrap()
            .decode_all()
            .unwrap();
        assert_eq!(prefs.len(), 2);
        assert_eq!(prefs["a"], PrefValue::Unknown(0x90));
        assert_eq!(prefs["b"], PrefValue::from("hi"));
    }

    #[test]
    fn test_decoder_truncated_long_string() {
        let mut buf = header();
        // deklarasi 1000 byte, cuma ada 3
        buf.extend_from_slice(&[0x01, b'a', 0x80]);
        buf.extend_from_slice(&1000u32.to_le_bytes());
        buf.extend_from_slice(b"abc");

        let err = Decoder::new(&buf).unwrap().decode_all().unwrap_err();
        match err {
            Error::TruncatedEntry {
                offset,
                needed,
                available,
            } => {
                assert_eq!(offset, HEADER_SIZE + 7);
                assert_eq!(needed, 1000);
                assert_eq!(available, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decoder_truncated_key() {
        let mut buf = header();
        buf.extend_from_slice(&[0x05, b'a', b'b']);
        let err = Decoder::new(&buf).unwrap().decode_all().unwrap_err();
        assert!(matches!(err, Error::TruncatedEntry { needed: 5, .. }));
    }

    #[test]
    fn test_decoder_missing_tag() {
        let mut buf = header();
        buf.extend_from_slice(&[0x01, b'a']);
        let err = Decoder::new(&buf).unwrap().decode_all().unwrap_err();
        assert!(matches!(err, Error::TruncatedEntry { needed: 1, available: 0, .. }));
    }

    #[test]
    fn test_decoder_invalid_utf8_is_lossy() {
        let mut buf = header();
        buf.extend_from_slice(&[0x01, 0xFF, 0x01, 0xC3]);
        let prefs = Decoder::new(&buf).unwrap().decode_all().unwrap();
        assert_eq!(prefs["\u{FFFD}"], PrefValue::from("\u{FFFD}"));
    }

    #[test]
    fn test_decoder_duplicate_key_keeps_first_position() {
        let mut encoder = Encoder::new();
        encoder.write_entry("a", &PrefValue::Int(1)).unwrap();
        encoder.write_entry("b", &PrefValue::Int(2)).unwrap();
        encoder.write_entry("a", &PrefValue::Int(3)).unwrap();

        let prefs = Decoder::new(encoder.as_bytes())
            .unwrap()
            .decode_all()
            .unwrap();
        let entries: Vec<_> = prefs.iter().map(|(k, v)| (k.as_str(), v.clone())).collect();
        assert_eq!(
            entries,
            vec![("a", PrefValue::Int(3)), ("b", PrefValue::Int(2))]
        );
    }

    #[test]
    fn test_decoder_iterator_stops_after_error() {
        let mut buf = header();
        buf.extend_from_slice(&[0x01, b'a', 0x01, b'x']);
        buf.extend_from_slice(&[0x01, b'b', 0xFE, 0x01]);

        let results: Vec<_> = Decoder::new(&buf).unwrap().collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(Error::TruncatedEntry { .. })));
    }

    #[test]
    fn test_encoded_len_matches_output() {
        let mut prefs = Prefs::new();
        prefs.insert("short".into(), PrefValue::from("abc"));
        prefs.insert("long".into(), PrefValue::from("q".repeat(300)));
        prefs.insert("int".into(), PrefValue::Int(9));
        prefs.insert("float".into(), PrefValue::Float(1.25));

        let mut encoder = Encoder::with_capacity(encoded_len(&prefs));
        for (key, value) in &prefs {
            encoder.write_entry(key, value).unwrap();
        }
        assert_eq!(encoder.len(), encoded_len(&prefs));
    }
}
