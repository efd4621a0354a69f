//! Compressed audio sample descriptions.
//!
//! The audio data itself lives in a separate sample bank and is not decoded here.
use bilge::prelude::*;
use binrw::BinRead;

use crate::{
    codec::ScalarKind,
    parse_opt_ptr32,
    vadpcm::{VadpcmBook, VadpcmLoop},
    Record, POINTER_SIZE,
};

/// `Sample` in the decompilation projects.
#[derive(Debug, BinRead, PartialEq, Clone)]
#[br(big)]
pub struct Sample {
    pub flags: SampleFlags,
    /// The offset of the audio data in the sample bank.
    pub sample_addr: u32,
    #[br(parse_with = parse_opt_ptr32)]
    pub vadpcm_loop: Option<VadpcmLoop>,
    #[br(parse_with = parse_opt_ptr32)]
    pub book: Option<VadpcmBook>,
}

impl Record for Sample {
    const SIZE: u64 = ScalarKind::U32.width() * 2 + POINTER_SIZE * 2;
}

/// Packed flags and size for a [Sample].
/// Fields start from the least significant bit, so [size](#method.size) is the lower 24 bits.
#[bitsize(32)]
#[derive(DebugBits, FromBits, BinRead, Clone, Copy, PartialEq)]
#[br(map = u32::into)]
pub struct SampleFlags {
    /// The size of the audio data in bytes.
    pub size: u24,
    pub is_relocated: bool,
    pub is_cached: bool,
    pub medium: SampleMedium,
    pub codec: SampleCodec,
    pub unk_0: bool,
}

/// `AudioSampleCodec` in the decompilation projects.
#[bitsize(3)]
#[derive(Debug, FromBits, PartialEq, Eq, Clone, Copy)]
pub enum SampleCodec {
    /// 16 samples compressed into 4 bit samples.
    Adpcm = 0,
    /// 16 samples compressed into 8 bit samples.
    S8 = 1,
    /// Uncompressed 16 bit samples in memory.
    S16InMem = 2,
    /// 16 samples compressed into 2 bit samples.
    SmallAdpcm = 3,
    Reverb = 4,
    /// Uncompressed 16 bit samples.
    S16 = 5,
    Unk6 = 6,
    Unk7 = 7,
}

/// The subset of `AudioStorageMedium` that fits in [SampleFlags].
#[bitsize(2)]
#[derive(Debug, FromBits, PartialEq, Eq, Clone, Copy)]
pub enum SampleMedium {
    Ram = 0,
    Unk = 1,
    Cart = 2,
    DiskDrive = 3,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read_record;
    use hexlit::hex;

    #[test]
    fn sample_flags_bits() {
        // unk_0, codec 5, medium 2, cached, relocated, size 0x001234
        let flags = SampleFlags::from(0b1101_1011_0000_0000_0001_0010_0011_0100u32);
        assert!(flags.unk_0());
        assert_eq!(SampleCodec::S16, flags.codec());
        assert_eq!(SampleMedium::Cart, flags.medium());
        assert!(flags.is_cached());
        assert!(flags.is_relocated());
        assert_eq!(0x1234, flags.size().value());
    }

    #[test]
    fn read_sample_no_loop_or_book() {
        let bytes = hex!(0x08000100 00001000 00000000 00000000);
        let sample: Sample = read_record(&bytes, 0).unwrap();
        assert!(!sample.flags.unk_0());
        assert_eq!(SampleCodec::Adpcm, sample.flags.codec());
        assert_eq!(SampleMedium::Cart, sample.flags.medium());
        assert!(!sample.flags.is_cached());
        assert!(!sample.flags.is_relocated());
        assert_eq!(0x100, sample.flags.size().value());
        assert_eq!(0x1000, sample.sample_addr);
        assert_eq!(None, sample.vadpcm_loop);
        assert_eq!(None, sample.book);
    }

    #[test]
    fn read_sample_loop_and_book() {
        let bytes = hex!(
            // sample
            00000100 00000000 00000010 00000020
            // loop without predictors
            00000000 00000100 00000000 00000100
            // book with order 1 and 1 predictor
            00000001 00000001
            0001 0002 0003 0004 0005 0006 0007 0008
        );
        let sample: Sample = read_record(&bytes, 0).unwrap();

        let vadpcm_loop = sample.vadpcm_loop.unwrap();
        assert_eq!(0x100, vadpcm_loop.header.loop_end);
        assert!(vadpcm_loop.predictors.is_empty());

        let book = sample.book.unwrap();
        assert_eq!(1, book.header.order);
        assert_eq!(vec![1, 2, 3, 4, 5, 6, 7, 8], book.predictors);
    }

    #[test]
    fn sample_size() {
        assert_eq!(0x10, Sample::SIZE);
    }
}
