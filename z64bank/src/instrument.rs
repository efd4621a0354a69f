use binrw::BinRead;

use crate::{
    codec::{as_bool, ScalarKind},
    envelope::Envelope,
    parse_opt_ptr32,
    tuned_sample::TunedSample,
    Record, POINTER_SIZE,
};

/// A melodic instrument split into up to three key regions.
///
/// `Instrument` in the decompilation projects.
#[derive(Debug, BinRead, PartialEq, Clone)]
#[br(big)]
pub struct Instrument {
    #[br(map = as_bool)]
    pub is_relocated: bool,
    /// Notes below this key use [low_key_region_sample](#structfield.low_key_region_sample).
    pub low_key_region: u8,
    /// Notes above this key use [high_key_region_sample](#structfield.high_key_region_sample).
    pub high_key_region: u8,
    /// Index into the release rate table.
    pub decay_index: u8,
    #[br(parse_with = parse_opt_ptr32)]
    pub envelope: Option<Envelope>,
    pub low_key_region_sample: TunedSample,
    pub prim_key_region_sample: TunedSample,
    pub high_key_region_sample: TunedSample,
}

impl Record for Instrument {
    const SIZE: u64 = ScalarKind::U8.width() * 4 + POINTER_SIZE + TunedSample::SIZE * 3;
}

impl Instrument {
    /// The low, primary, and high key region samples in that order.
    pub fn tuned_samples(&self) -> [&TunedSample; 3] {
        [
            &self.low_key_region_sample,
            &self.prim_key_region_sample,
            &self.high_key_region_sample,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::DecodeError, read_record};
    use hexlit::hex;

    #[test]
    fn read_instrument() {
        let bytes = hex!(
            // instrument
            0x01307F20 00000000
            00000000 00000000
            00000028 0x3F800000
            00000000 0x3F000000
            // padding
            00000000 00000000
            // sample
            00000100 00001000 00000000 00000000
        );
        let instrument: Instrument = read_record(&bytes, 0).unwrap();
        assert!(instrument.is_relocated);
        assert_eq!(0x30, instrument.low_key_region);
        assert_eq!(0x7F, instrument.high_key_region);
        assert_eq!(0x20, instrument.decay_index);
        assert_eq!(None, instrument.envelope);

        let [low, prim, high] = instrument.tuned_samples();
        assert_eq!(None, low.sample);
        assert_eq!(0x28, prim.sample_offset);
        assert_eq!(0x1000, prim.sample.as_ref().unwrap().sample_addr);
        assert_eq!(1.0, prim.tuning);
        assert_eq!(None, high.sample);
        assert_eq!(0.5, high.tuning);
    }

    #[test]
    fn read_instrument_bad_envelope_pointer() {
        let bytes = hex!(
            00000000 00001000
            00000000 00000000
            00000000 00000000
            00000000 00000000
        );
        assert_eq!(
            Err(DecodeError::OutOfBounds {
                offset: 0x1000,
                width: 4,
                len: 32,
                type_name: "Envelope"
            }),
            read_record::<Instrument>(&bytes, 0)
        );
    }

    #[test]
    fn instrument_size() {
        assert_eq!(0x20, Instrument::SIZE);
    }
}
