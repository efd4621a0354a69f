use binrw::BinRead;

use crate::{codec::ScalarKind, parse_opt_ptr32, sample::Sample, Record, POINTER_SIZE};

/// A [Sample] with a playback rate multiplier.
///
/// Sound effects are stored directly as tuned samples in the effect list.
///
/// `TunedSample` in the decompilation projects.
#[derive(Debug, BinRead, PartialEq, Clone)]
#[br(big)]
pub struct TunedSample {
    /// The offset of [sample](#structfield.sample) in the bank data or 0 if there is no sample.
    /// Tuned samples with the same offset refer to the same sample.
    #[br(restore_position)]
    pub sample_offset: u32,

    #[br(parse_with = parse_opt_ptr32)]
    pub sample: Option<Sample>,

    pub tuning: f32,
}

impl Record for TunedSample {
    const SIZE: u64 = POINTER_SIZE + ScalarKind::F32.width();
}
