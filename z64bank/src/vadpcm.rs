//! Loop points and predictor coefficients for ADPCM compressed samples.
//!
//! Both structures start with a fixed header followed by a coefficient array
//! whose length depends on the header values.
use std::io::{Read, Seek};

use binrw::{BinRead, BinResult, Endian, VecArgs};

use crate::{
    check_bounds,
    codec::ScalarKind,
    custom_error,
    error::DecodeError,
    round_up, Record,
};

/// The number of predictor coefficients for a [VadpcmLoop] that loops.
pub const LOOP_PREDICTOR_COUNT: usize = 16;

/// The largest supported coefficient count for a [VadpcmBook].
///
/// This allows up to 16 predictors of order 16.
pub const MAX_BOOK_COEFFICIENTS: i64 = 8 * 16 * 16;

/// `VadpcmLoop` in the decompilation projects.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct VadpcmLoop {
    pub header: VadpcmLoopHeader,
    /// The predictor state at the loop start
    /// or empty if [loop_start](struct.VadpcmLoopHeader.html#structfield.loop_start) is 0.
    pub predictors: Vec<i16>,
}

/// The fixed portion of a [VadpcmLoop].
#[derive(Debug, BinRead, PartialEq, Eq, Clone, Copy)]
#[br(big)]
pub struct VadpcmLoopHeader {
    pub loop_start: u32,
    pub loop_end: u32,
    #[br(map = |x: u32| LoopCount::from(x))]
    pub loop_count: LoopCount,
    pub num_samples: u32,
}

impl Record for VadpcmLoopHeader {
    const SIZE: u64 = ScalarKind::U32.width() * 4;
}

/// The number of times to repeat the loop.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum LoopCount {
    /// Play the sample once.
    NoLoop,
    /// Repeat the loop a fixed number of times.
    Count(u32),
    /// Repeat the loop until the note is released.
    Infinite,
}

impl From<u32> for LoopCount {
    fn from(value: u32) -> Self {
        match value {
            0 => Self::NoLoop,
            u32::MAX => Self::Infinite,
            n => Self::Count(n),
        }
    }
}

impl From<LoopCount> for u32 {
    fn from(value: LoopCount) -> Self {
        match value {
            LoopCount::NoLoop => 0,
            LoopCount::Count(n) => n,
            LoopCount::Infinite => u32::MAX,
        }
    }
}

impl VadpcmLoop {
    /// The size in bytes of the header and any predictors.
    /// This is either 0x10 or 0x30 bytes.
    pub fn size(&self) -> u64 {
        VadpcmLoopHeader::SIZE + self.predictors.len() as u64 * ScalarKind::S16.width()
    }
}

impl Record for VadpcmLoop {
    const SIZE: u64 = VadpcmLoopHeader::SIZE;
}

impl BinRead for VadpcmLoop {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let header = VadpcmLoopHeader::read_options(reader, endian, ())?;

        // The predictors are only present for samples with a loop start.
        let predictors = if header.loop_start == 0 {
            Vec::new()
        } else {
            let pos = reader.stream_position()?;
            check_bounds(
                reader,
                pos,
                LOOP_PREDICTOR_COUNT as u64 * ScalarKind::S16.width(),
                "VadpcmLoop predictors",
            )?;
            Vec::<i16>::read_options(
                reader,
                endian,
                VecArgs {
                    count: LOOP_PREDICTOR_COUNT,
                    inner: (),
                },
            )?
        };

        Ok(Self { header, predictors })
    }
}

/// `VadpcmBook` in the decompilation projects.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct VadpcmBook {
    pub header: VadpcmBookHeader,
    /// The `8 * order * num_predictors` predictor coefficients.
    pub predictors: Vec<i16>,
}

/// The fixed portion of a [VadpcmBook].
#[derive(Debug, BinRead, PartialEq, Eq, Clone, Copy)]
#[br(big)]
pub struct VadpcmBookHeader {
    pub order: i32,
    pub num_predictors: i32,
}

impl Record for VadpcmBookHeader {
    const SIZE: u64 = ScalarKind::S32.width() * 2;
}

impl VadpcmBookHeader {
    /// The number of coefficients following the header
    /// or `None` if the count is negative or larger than [MAX_BOOK_COEFFICIENTS].
    ///
    /// Only the product is checked, so two negative values still form a valid count.
    pub fn coefficient_count(&self) -> Option<usize> {
        let count = i64::from(self.order)
            .checked_mul(i64::from(self.num_predictors))?
            .checked_mul(8)?;
        (0..=MAX_BOOK_COEFFICIENTS)
            .contains(&count)
            .then_some(count as usize)
    }
}

impl VadpcmBook {
    /// The size in bytes of the header and predictors.
    pub fn size(&self) -> u64 {
        VadpcmBookHeader::SIZE + self.predictors.len() as u64 * ScalarKind::S16.width()
    }

    /// The size in bytes when placed in a bank.
    pub fn aligned_size(&self) -> u64 {
        round_up(self.size(), Self::ALIGNMENT)
    }
}

impl Record for VadpcmBook {
    const SIZE: u64 = VadpcmBookHeader::SIZE;
    const ALIGNMENT: u64 = 0x10;
}

impl BinRead for VadpcmBook {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let start = reader.stream_position()?;
        let header = VadpcmBookHeader::read_options(reader, endian, ())?;

        // Check the length before allocating anything.
        let count = header.coefficient_count().ok_or_else(|| {
            custom_error(
                start,
                DecodeError::InvalidLength {
                    offset: start,
                    order: header.order,
                    num_predictors: header.num_predictors,
                },
            )
        })?;

        let pos = reader.stream_position()?;
        check_bounds(
            reader,
            pos,
            count as u64 * ScalarKind::S16.width(),
            "VadpcmBook predictors",
        )?;
        let predictors = Vec::<i16>::read_options(reader, endian, VecArgs { count, inner: () })?;

        Ok(Self { header, predictors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read_record;
    use hexlit::hex;

    #[test]
    fn read_loop_no_predictors() {
        // Reading stops after the header.
        let bytes = hex!(00000000 00003000 00000000 00003000);
        let value: VadpcmLoop = read_record(&bytes, 0).unwrap();
        assert_eq!(
            VadpcmLoop {
                header: VadpcmLoopHeader {
                    loop_start: 0,
                    loop_end: 0x3000,
                    loop_count: LoopCount::NoLoop,
                    num_samples: 0x3000
                },
                predictors: Vec::new()
            },
            value
        );
        assert_eq!(0x10, value.size());
    }

    #[test]
    fn read_loop_predictors() {
        let bytes = hex!(
            00000010 00003000 0xFFFFFFFF 00003000
            0001 0002 0003 0004 0005 0006 0007 0008
            0x0009 0x000A 0x000B 0x000C 0x000D 0x000E 0x000F 0010
        );
        let value: VadpcmLoop = read_record(&bytes, 0).unwrap();
        assert_eq!(LoopCount::Infinite, value.header.loop_count);
        assert_eq!((1..=16).collect::<Vec<i16>>(), value.predictors);
        assert_eq!(0x30, value.size());
    }

    #[test]
    fn read_loop_predictors_out_of_bounds() {
        let bytes = hex!(
            00000010 00003000 00000002 00003000
            0001 0002 0003 0004
        );
        assert_eq!(
            Err(DecodeError::OutOfBounds {
                offset: 16,
                width: 32,
                len: 24,
                type_name: "VadpcmLoop predictors"
            }),
            read_record::<VadpcmLoop>(&bytes, 0)
        );
    }

    #[test]
    fn loop_count_values() {
        assert_eq!(LoopCount::NoLoop, LoopCount::from(0u32));
        assert_eq!(LoopCount::Count(3), LoopCount::from(3u32));
        assert_eq!(LoopCount::Infinite, LoopCount::from(0xFFFFFFFFu32));
        assert_eq!(0xFFFFFFFF, u32::from(LoopCount::Infinite));
        assert_eq!(3, u32::from(LoopCount::Count(3)));
    }

    #[test]
    fn read_book_order2_predictors3() {
        let mut bytes = hex!(00000002 00000003).to_vec();
        for i in 0..48i16 {
            bytes.extend_from_slice(&(-i).to_be_bytes());
        }
        // Trailing data is not part of the book.
        bytes.extend_from_slice(&[0x7f; 8]);

        let value: VadpcmBook = read_record(&bytes, 0).unwrap();
        assert_eq!(
            VadpcmBookHeader {
                order: 2,
                num_predictors: 3
            },
            value.header
        );
        assert_eq!(48, value.predictors.len());
        assert_eq!(-47, value.predictors[47]);
        assert_eq!(8 + 96, value.size());
        assert_eq!(112, value.aligned_size());
    }

    #[test]
    fn read_book_empty() {
        let bytes = hex!(00000000 00000004);
        let value: VadpcmBook = read_record(&bytes, 0).unwrap();
        assert!(value.predictors.is_empty());
    }

    #[test]
    fn read_book_negative_length() {
        let bytes = hex!(0xFFFFFFFE 00000003);
        assert_eq!(
            Err(DecodeError::InvalidLength {
                offset: 0,
                order: -2,
                num_predictors: 3
            }),
            read_record::<VadpcmBook>(&bytes, 0)
        );
    }

    #[test]
    fn read_book_negative_order_and_predictors() {
        let mut bytes = hex!(0xFFFFFFFE 0xFFFFFFFD).to_vec();
        bytes.extend_from_slice(&[0u8; 96]);

        let value: VadpcmBook = read_record(&bytes, 0).unwrap();
        assert_eq!(
            VadpcmBookHeader {
                order: -2,
                num_predictors: -3
            },
            value.header
        );
        assert_eq!(vec![0; 48], value.predictors);
        assert_eq!(8 + 96, value.size());
    }

    #[test]
    fn read_book_negative_order_zero_predictors() {
        let bytes = hex!(0xFFFFFFFF 00000000);
        let value: VadpcmBook = read_record(&bytes, 0).unwrap();
        assert!(value.predictors.is_empty());
        assert_eq!(8, value.size());
    }

    #[test]
    fn read_book_huge_length() {
        let bytes = hex!(00000000 0x7FFFFFFF 0x7FFFFFFF);
        assert_eq!(
            Err(DecodeError::InvalidLength {
                offset: 4,
                order: i32::MAX,
                num_predictors: i32::MAX
            }),
            read_record::<VadpcmBook>(&bytes, 4)
        );
    }

    #[test]
    fn read_book_truncated() {
        let bytes = hex!(00000002 00000001 0001 0002);
        assert!(matches!(
            read_record::<VadpcmBook>(&bytes, 0),
            Err(DecodeError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn coefficient_count_limits() {
        let header = |order, num_predictors| VadpcmBookHeader {
            order,
            num_predictors,
        };
        assert_eq!(Some(16), header(2, 1).coefficient_count());
        assert_eq!(Some(2048), header(16, 16).coefficient_count());
        assert_eq!(None, header(16, 17).coefficient_count());
        assert_eq!(Some(0), header(-1, 0).coefficient_count());
        assert_eq!(Some(48), header(-2, -3).coefficient_count());
        assert_eq!(None, header(-2, 3).coefficient_count());
        assert_eq!(None, header(i32::MIN, i32::MIN).coefficient_count());
    }
}
