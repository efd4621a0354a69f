//! Scalar values and integer reinterpretations shared by all bank structures.
//!
//! Every multi-byte value in a bank is big endian.
use std::{any::type_name, io::Cursor, mem::size_of};

use binrw::{BinRead, BinReaderExt};

use crate::{
    check_range,
    error::{DecodeError, UnknownVariant},
};

/// The primitive types used by bank structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    U8,
    U16,
    U32,
    S8,
    S16,
    S32,
    F32,
}

impl ScalarKind {
    /// The size in bytes.
    pub const fn width(self) -> u64 {
        match self {
            ScalarKind::U8 | ScalarKind::S8 => 1,
            ScalarKind::U16 | ScalarKind::S16 => 2,
            ScalarKind::U32 | ScalarKind::S32 | ScalarKind::F32 => 4,
        }
    }
}

/// A decoded value for a [ScalarKind].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    U8(u8),
    U16(u16),
    U32(u32),
    S8(i8),
    S16(i16),
    S32(i32),
    F32(f32),
}

impl Scalar {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::U8(_) => ScalarKind::U8,
            Scalar::U16(_) => ScalarKind::U16,
            Scalar::U32(_) => ScalarKind::U32,
            Scalar::S8(_) => ScalarKind::S8,
            Scalar::S16(_) => ScalarKind::S16,
            Scalar::S32(_) => ScalarKind::S32,
            Scalar::F32(_) => ScalarKind::F32,
        }
    }
}

/// Decode a big endian value of type `kind` at `offset`.
pub fn decode_scalar(kind: ScalarKind, bytes: &[u8], offset: u64) -> Result<Scalar, DecodeError> {
    match kind {
        ScalarKind::U8 => read_scalar(bytes, offset).map(Scalar::U8),
        ScalarKind::U16 => read_scalar(bytes, offset).map(Scalar::U16),
        ScalarKind::U32 => read_scalar(bytes, offset).map(Scalar::U32),
        ScalarKind::S8 => read_scalar(bytes, offset).map(Scalar::S8),
        ScalarKind::S16 => read_scalar(bytes, offset).map(Scalar::S16),
        ScalarKind::S32 => read_scalar(bytes, offset).map(Scalar::S32),
        ScalarKind::F32 => read_scalar(bytes, offset).map(Scalar::F32),
    }
}

/// Decode a big endian [u32] at `offset` like a table slot or list offset.
pub fn read_u32(bytes: &[u8], offset: u64) -> Result<u32, DecodeError> {
    read_scalar(bytes, offset)
}

fn read_scalar<T>(bytes: &[u8], offset: u64) -> Result<T, DecodeError>
where
    for<'a> T: BinRead<Args<'a> = ()>,
{
    check_range(
        bytes.len() as u64,
        offset,
        size_of::<T>() as u64,
        type_name::<T>(),
    )?;

    let mut reader = Cursor::new(bytes);
    reader.set_position(offset);
    reader.read_be().map_err(DecodeError::from_binrw)
}

/// Any nonzero value is `true`.
pub fn as_bool(raw: u8) -> bool {
    raw != 0
}

/// An enum stored as a raw integer in the binary data.
pub trait IntEnum: Sized + Copy {
    type Raw: Copy + Into<i64>;

    /// The enum name for error messages.
    const NAME: &'static str;

    fn from_raw(raw: Self::Raw) -> Option<Self>;

    fn to_raw(self) -> Self::Raw;
}

/// Either a recognized enum variant or the unrecognized raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaybeKnown<T, R> {
    Known(T),
    Unknown(R),
}

impl<T: IntEnum> MaybeKnown<T, T::Raw> {
    /// The value as stored in the binary data.
    pub fn raw(&self) -> T::Raw {
        match self {
            MaybeKnown::Known(v) => v.to_raw(),
            MaybeKnown::Unknown(raw) => *raw,
        }
    }

    pub fn known(&self) -> Option<T> {
        match self {
            MaybeKnown::Known(v) => Some(*v),
            MaybeKnown::Unknown(_) => None,
        }
    }
}

/// Convert `raw` to `E` and reject values without a variant.
pub fn as_enum<E: IntEnum>(raw: E::Raw) -> Result<E, UnknownVariant> {
    E::from_raw(raw).ok_or(UnknownVariant {
        value: raw.into(),
        enum_name: E::NAME,
    })
}

/// Convert `raw` to `E` and keep values without a variant unchanged.
pub fn as_enum_or_raw<E: IntEnum>(raw: E::Raw) -> MaybeKnown<E, E::Raw> {
    match E::from_raw(raw) {
        Some(v) => MaybeKnown::Known(v),
        None => MaybeKnown::Unknown(raw),
    }
}

/// Define a fieldless enum with its [IntEnum] lookup table.
// binrw's repr enums can't keep unknown values or report the raw value in errors,
// so fields map through an explicit lookup instead.
macro_rules! int_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident: $raw:ty {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $value:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::codec::IntEnum for $name {
            type Raw = $raw;

            const NAME: &'static str = stringify!($name);

            fn from_raw(raw: $raw) -> Option<Self> {
                match raw {
                    $($value => Some(Self::$variant),)*
                    _ => None,
                }
            }

            fn to_raw(self) -> $raw {
                match self {
                    $(Self::$variant => $value,)*
                }
            }
        }
    };
}

pub(crate) use int_enum;
