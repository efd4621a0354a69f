//! ADSR volume envelopes.
//!
//! An envelope is an array of points with no stored length.
//! The array ends with the first point whose time is an opcode.
use std::io::{Read, Seek};

use binrw::{BinRead, BinResult, Endian};

use crate::{
    codec::{as_enum_or_raw, int_enum, MaybeKnown, ScalarKind},
    custom_error,
    error::DecodeError,
    round_up, stream_len, Record,
};

/// `EnvelopePoint` in the decompilation projects.
#[derive(Debug, BinRead, PartialEq, Eq, Clone, Copy)]
#[br(big)]
pub struct EnvelopePoint {
    /// A duration if positive and an [AdsrOpcode] otherwise.
    pub time_or_opcode: i16,
    /// The target amplitude or the point index for [AdsrOpcode::Goto].
    pub amp_or_index: i16,
}

impl Record for EnvelopePoint {
    const SIZE: u64 = ScalarKind::S16.width() * 2;
}

impl EnvelopePoint {
    /// Returns `true` if this point ends the envelope.
    pub fn is_opcode(&self) -> bool {
        self.time_or_opcode <= 0
    }

    pub fn command(&self) -> EnvelopeCommand {
        if self.is_opcode() {
            EnvelopeCommand::Opcode(as_enum_or_raw::<AdsrOpcode>(self.time_or_opcode))
        } else {
            EnvelopeCommand::Time(self.time_or_opcode)
        }
    }
}

/// The interpretation of [time_or_opcode](struct.EnvelopePoint.html#structfield.time_or_opcode).
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EnvelopeCommand {
    /// Move to the amplitude over this many ticks.
    Time(i16),
    /// A control value that ends the envelope.
    /// Unrecognized values are kept as is.
    Opcode(MaybeKnown<AdsrOpcode, i16>),
}

int_enum! {
    /// `ADSR_DISABLE`, `ADSR_HANG`, `ADSR_GOTO`, and `ADSR_RESTART` in the decompilation projects.
    pub enum AdsrOpcode: i16 {
        /// Notes stop immediately and skip their release phase.
        Disable = 0,
        /// Notes keep sounding until their release phase.
        Hang = -1,
        /// Jump to the point index in [amp_or_index](struct.EnvelopePoint.html#structfield.amp_or_index).
        Goto = -2,
        /// Start again from the first point.
        Restart = -3,
    }
}

/// An array of [EnvelopePoint] terminated by an opcode.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Envelope {
    /// The points including the final opcode point.
    pub points: Vec<EnvelopePoint>,
}

impl Envelope {
    /// The size in bytes of all points.
    pub fn size(&self) -> u64 {
        self.points.len() as u64 * EnvelopePoint::SIZE
    }

    /// The size in bytes when placed in a bank.
    pub fn aligned_size(&self) -> u64 {
        round_up(self.size(), Self::ALIGNMENT)
    }
}

impl Record for Envelope {
    // An envelope always has at least the terminating point.
    const SIZE: u64 = EnvelopePoint::SIZE;
    const ALIGNMENT: u64 = 0x10;
}

impl BinRead for Envelope {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        _args: Self::Args<'_>,
    ) -> BinResult<Self> {
        let start = reader.stream_position()?;
        let len = stream_len(reader)?;

        // The scan is bounded by the data rather than a stored count.
        let mut points = Vec::new();
        let mut pos = start;
        loop {
            if pos + EnvelopePoint::SIZE > len {
                return Err(custom_error(
                    pos,
                    DecodeError::MalformedSequence {
                        offset: start,
                        points: points.len(),
                    },
                ));
            }

            let point = EnvelopePoint::read_options(reader, endian, ())?;
            points.push(point);
            pos += EnvelopePoint::SIZE;

            if point.is_opcode() {
                break;
            }
        }

        Ok(Self { points })
    }
}
