use thiserror::Error;

/// Errors while decoding an instrument bank or one of its structures.
///
/// None of these errors are recoverable for the structure being decoded.
/// Structures decoded before the error are unaffected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error(
        "{type_name} at offset {offset:#x} with size {width:#x} exceeds buffer length {len:#x}"
    )]
    OutOfBounds {
        offset: u64,
        width: u64,
        len: u64,
        type_name: &'static str,
    },

    #[error("unexpected table entry size, expected 0x08 or 0x10 bytes, but got {0:#x} bytes")]
    InvalidTableEntrySize(usize),

    #[error("invalid value {value} for enum {enum_name} at offset {offset:#x}")]
    InvalidEnumValue {
        offset: u64,
        value: i64,
        enum_name: &'static str,
    },

    #[error(
        "invalid coefficient count for order {order} and {num_predictors} predictors at offset {offset:#x}"
    )]
    InvalidLength {
        offset: u64,
        order: i32,
        num_predictors: i32,
    },

    #[error("envelope at offset {offset:#x} has no terminating opcode after {points} points")]
    MalformedSequence { offset: u64, points: usize },

    #[error("error reading data: {message}")]
    Binrw { message: String },
}

/// A raw value with no matching variant for a strict enum field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid value {value} for enum {enum_name}")]
pub struct UnknownVariant {
    pub value: i64,
    pub enum_name: &'static str,
}

impl DecodeError {
    /// Recover the original error from binrw's wrapping and backtrace context.
    pub(crate) fn from_binrw(err: binrw::Error) -> Self {
        if let Some(e) = err.custom_err::<DecodeError>() {
            return e.clone();
        }

        if let Some(e) = err.custom_err::<UnknownVariant>() {
            let offset = match err.root_cause() {
                binrw::Error::Custom { pos, .. } => *pos,
                _ => 0,
            };
            return DecodeError::InvalidEnumValue {
                offset,
                value: e.value,
                enum_name: e.enum_name,
            };
        }

        DecodeError::Binrw {
            message: err.root_cause().to_string(),
        }
    }
}

impl From<binrw::Error> for DecodeError {
    fn from(err: binrw::Error) -> Self {
        Self::from_binrw(err)
    }
}
