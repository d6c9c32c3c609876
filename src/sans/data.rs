//! Base types and data record payloads.

use alloc::{string::String, vec::Vec};
use core::str::FromStr;

use thiserror::Error;
use tinyvec::ArrayVec;

/// Bytes of a single packed scalar.
pub type Packed = ArrayVec<[u8; 8]>;

/// A FIT base type.
///
/// Discriminants are the base type numbers from the protocol document.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Enum = 0,
    Sint8 = 1,
    Uint8 = 2,
    Sint16 = 3,
    Uint16 = 4,
    Sint32 = 5,
    Uint32 = 6,
    String = 7,
    Float32 = 8,
    Float64 = 9,
    Uint8z = 10,
    Uint16z = 11,
    Uint32z = 12,
    Byte = 13,
}

impl BaseType {
    /// Every base type, in base type number order.
    pub const ALL: [BaseType; 14] = [
        Self::Enum,
        Self::Sint8,
        Self::Uint8,
        Self::Sint16,
        Self::Uint16,
        Self::Sint32,
        Self::Uint32,
        Self::String,
        Self::Float32,
        Self::Float64,
        Self::Uint8z,
        Self::Uint16z,
        Self::Uint32z,
        Self::Byte,
    ];

    /// Base type number.
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Whether values of this type are subject to byte order (multi-byte).
    pub const fn is_endian(self) -> bool {
        self.size() > 1
    }

    /// The base type byte written into field definitions.
    ///
    /// This is the base type number, with the top bit set for types subject
    /// to byte order.
    pub const fn field(self) -> u8 {
        if self.is_endian() {
            0x80 | self.number()
        } else {
            self.number()
        }
    }

    /// Size of a single value in bytes.
    pub const fn size(self) -> usize {
        match self {
            Self::Enum | Self::Sint8 | Self::Uint8 | Self::String => 1,
            Self::Uint8z | Self::Byte => 1,
            Self::Sint16 | Self::Uint16 | Self::Uint16z => 2,
            Self::Sint32 | Self::Uint32 | Self::Uint32z | Self::Float32 => 4,
            Self::Float64 => 8,
        }
    }

    /// The 'invalid' marker, as the little-endian bit pattern of a value.
    pub const fn invalid(self) -> u64 {
        match self {
            Self::Enum | Self::Uint8 | Self::Byte => 0xFF,
            Self::Sint8 => 0x7F,
            Self::Sint16 => 0x7FFF,
            Self::Uint16 => 0xFFFF,
            Self::Sint32 => 0x7FFF_FFFF,
            Self::Uint32 | Self::Float32 => 0xFFFF_FFFF,
            Self::Float64 => 0xFFFF_FFFF_FFFF_FFFF,
            Self::String | Self::Uint8z | Self::Uint16z | Self::Uint32z => 0,
        }
    }

    /// Name as used in the protocol document.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Enum => "enum",
            Self::Sint8 => "sint8",
            Self::Uint8 => "uint8",
            Self::Sint16 => "sint16",
            Self::Uint16 => "uint16",
            Self::Sint32 => "sint32",
            Self::Uint32 => "uint32",
            Self::String => "string",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Uint8z => "uint8z",
            Self::Uint16z => "uint16z",
            Self::Uint32z => "uint32z",
            Self::Byte => "byte",
        }
    }

    /// Conventional single-character pack format code for this type.
    ///
    /// Upper case marks unsigned integers, lower case signed ones; `f` and
    /// `d` are 4 and 8 byte floats, `s` and `c` single characters.
    pub const fn format_code(self) -> char {
        match self {
            Self::Enum | Self::Uint8 | Self::Uint8z => 'B',
            Self::Sint8 => 'b',
            Self::Sint16 => 'h',
            Self::Uint16 | Self::Uint16z => 'H',
            Self::Sint32 => 'i',
            Self::Uint32 | Self::Uint32z => 'I',
            Self::String => 's',
            Self::Float32 => 'f',
            Self::Float64 => 'd',
            Self::Byte => 'c',
        }
    }

    /// Exclusive range of values which truncate to a representable integer.
    fn bounds(self) -> (f64, f64) {
        let (min, max) = match self {
            Self::Sint8 => (i8::MIN as f64, i8::MAX as f64),
            Self::Sint16 => (i16::MIN as f64, i16::MAX as f64),
            Self::Sint32 => (i32::MIN as f64, i32::MAX as f64),
            Self::Uint16 | Self::Uint16z => (0.0, u16::MAX as f64),
            Self::Uint32 | Self::Uint32z => (0.0, u32::MAX as f64),
            Self::Float32 | Self::Float64 => (f64::NEG_INFINITY, f64::INFINITY),
            _ => (0.0, u8::MAX as f64),
        };

        (min - 1.0, max + 1.0)
    }

    /// Encode a single value, little-endian.
    ///
    /// Values for integer types are truncated toward zero before packing, and
    /// must then fit the type. Out of range values are rejected rather than
    /// clamped or wrapped, as are values that would encode as the type's
    /// 'invalid' marker (readers would take them for absent fields).
    pub fn pack(self, value: f64) -> Result<Packed, PackError> {
        let mut packed = Packed::new();

        match self {
            Self::Float32 => packed.extend_from_slice(&(value as f32).to_le_bytes()),
            Self::Float64 => packed.extend_from_slice(&value.to_le_bytes()),
            _ => {
                let (min, max) = self.bounds();
                let out_of_range = PackError::OutOfRange {
                    base_type: self,
                    value,
                };

                // Comparisons with NaN are false, so it's rejected too.
                if !(value > min && value < max) {
                    Err(out_of_range)?;
                }

                // Casting truncates toward zero. Two's complement, so the low
                // bytes serve signed and unsigned types alike.
                let bytes = (value as i64).to_le_bytes();
                let size = self.size();

                let mut pattern = [0; 8];
                pattern[..size].copy_from_slice(&bytes[..size]);
                if u64::from_le_bytes(pattern) == self.invalid() {
                    Err(out_of_range)?;
                }

                packed.extend_from_slice(&bytes[..size]);
            }
        }

        Ok(packed)
    }

    /// Encode the 'invalid' marker value, little-endian.
    pub fn pack_invalid(self) -> Packed {
        let mut packed = Packed::new();
        packed.extend_from_slice(&self.invalid().to_le_bytes()[..self.size()]);
        packed
    }
}

impl TryFrom<u8> for BaseType {
    type Error = BaseTypeError;

    /// Look up a base type from the byte used in field definitions.
    fn try_from(field: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|t| t.field() == field)
            .ok_or(BaseTypeError::UnknownField(field))
    }
}

impl FromStr for BaseType {
    type Err = BaseTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| BaseTypeError::UnknownName(String::from(s)))
    }
}

/// An error looking up a base type.
#[derive(Debug, Error)]
pub enum BaseTypeError {
    /// No base type uses this definition byte.
    #[error("Unknown base type byte ({0:#04x}).")]
    UnknownField(u8),
    /// No base type has this name.
    #[error("Unknown base type name ({0}).")]
    UnknownName(String),
}

/// An error packing a value.
#[derive(Debug, Clone, Copy, Error)]
pub enum PackError {
    /// The value can't be represented by the base type, or would encode as
    /// its 'invalid' marker.
    #[error("Value {value} is out of range for {}.", .base_type.name())]
    OutOfRange { base_type: BaseType, value: f64 },
}

/// An error packing a value for a particular field.
#[derive(Debug, Error)]
#[error("Field {field}: {source}")]
pub struct FieldError {
    /// Field number.
    pub field: u8,
    #[source]
    pub source: PackError,
}

/// A field of a record, along with its value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldValue {
    /// Field number, meaningful within a single message.
    pub number: u8,
    pub base_type: BaseType,
    /// The value to encode, or `None` to write the 'invalid' marker.
    pub value: Option<f64>,
    /// Multiplier applied to the value before encoding.
    pub scale: Option<f64>,
}

/// Build the field definitions and data payload for a sequence of fields.
///
/// Returns the concatenated field definitions (number, size, base type byte
/// for each field) and the concatenated encoded values, both in the order
/// given. Absent values are replaced with the 'invalid' marker. Scaled values
/// are rounded to the nearest integer after scaling; unscaled values are
/// truncated by [`BaseType::pack`].
pub fn build_content_block(fields: &[FieldValue]) -> Result<(Vec<u8>, Vec<u8>), FieldError> {
    let mut definitions = Vec::with_capacity(fields.len() * 3);
    let mut values = Vec::new();

    for field in fields {
        let base_type = field.base_type;

        definitions.extend_from_slice(&[field.number, base_type.size() as u8, base_type.field()]);

        let packed = match (field.value, field.scale) {
            (None, _) => Ok(base_type.pack_invalid()),
            (Some(value), Some(scale)) => base_type.pack(round_scaled(value * scale, base_type)),
            (Some(value), None) => base_type.pack(value),
        }
        .map_err(|source| FieldError {
            field: field.number,
            source,
        })?;

        values.extend_from_slice(&packed);
    }

    Ok((definitions, values))
}

/// Offset a scaled value so that truncation rounds it half away from zero.
fn round_scaled(value: f64, base_type: BaseType) -> f64 {
    match base_type {
        BaseType::Float32 | BaseType::Float64 => value,
        _ if value < 0.0 => value - 0.5,
        _ => value + 0.5,
    }
}
