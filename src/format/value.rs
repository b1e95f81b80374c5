//! Typed preference values

use std::fmt;

use indexmap::IndexMap;

use super::header::{ValueTag, TAG_LONG_STRING};
use crate::error::{Error, Result};

/// Mapping key -> value, urutan insert dipertahankan
pub type Prefs = IndexMap<String, PrefValue>;

#[derive(Debug, Clone, PartialEq)]
pub enum PrefValue {
    Text(String),
    Int(i32),
    Float(f32),
    /// Tag tak dikenal, hanya dihasilkan oleh decoder lenient.
    /// Tidak bisa di-encode.
    Unknown(u8),
}

impl PrefValue {
    /// Pilih Int untuk bilangan bulat, Float untuk yang punya bagian pecahan.
    ///
    /// NaN dan infinity tidak punya bagian bulat yang valid, jadi jatuh ke Float.
    /// Pecahan dibulatkan ke presisi f32; nilai bukan nol yang underflow
    /// jadi 0.0 di f32 (misal `1e-50`) ditolak dengan `UnsupportedValueType`.
    pub fn from_number(n: f64) -> Result<Self> {
        if !n.is_finite() || n.fract() != 0.0 {
            let narrowed = n as f32;
            if narrowed == 0.0 && n != 0.0 {
                return Err(Error::unsupported(format!(
                    "number {:e} underflows a 32-bit float",
                    n
                )));
            }
            return Ok(Self::Float(narrowed));
        }
        if n < i32::MIN as f64 || n > i32::MAX as f64 {
            return Err(Error::unsupported(format!(
                "whole number {} does not fit a 32-bit signed integer",
                n
            )));
        }
        Ok(Self::Int(n as i32))
    }

    /// Tag yang akan ditulis encoder untuk nilai ini
    pub fn tag(&self) -> ValueTag {
        match self {
            Self::Text(s) if s.len() < TAG_LONG_STRING as usize => {
                ValueTag::ShortString(s.len() as u8)
            }
            Self::Text(_) => ValueTag::LongString,
            Self::Int(_) => ValueTag::Int,
            Self::Float(_) => ValueTag::Float,
            Self::Unknown(tag) => ValueTag::Unknown(*tag),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<&str> for PrefValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for PrefValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<i32> for PrefValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for PrefValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl fmt::Display for PrefValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{:?}", s),
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Unknown(tag) => write!(f, "<unknown tag {:#04x}>", tag),
        }
    }
}
