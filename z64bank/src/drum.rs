use binrw::BinRead;

use crate::{
    codec::{as_bool, ScalarKind},
    envelope::Envelope,
    parse_opt_ptr32,
    tuned_sample::TunedSample,
    Record, POINTER_SIZE,
};

/// A single percussion sound.
///
/// `Drum` in the decompilation projects.
#[derive(Debug, BinRead, PartialEq, Clone)]
#[br(big)]
pub struct Drum {
    /// Index into the release rate table.
    pub decay_index: u8,
    pub pan: u8,
    #[br(map = as_bool, pad_after = 1)]
    pub is_relocated: bool,
    pub tuned_sample: TunedSample,
    #[br(parse_with = parse_opt_ptr32)]
    pub envelope: Option<Envelope>,
}

impl Record for Drum {
    const SIZE: u64 = ScalarKind::U8.width() * 4 + TunedSample::SIZE + POINTER_SIZE;
}
