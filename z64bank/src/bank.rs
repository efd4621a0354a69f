//! Instrument banks in `.zbank` files or embedded in the `Audiobank` ROM file.
//!
//! # Overview
//! The bank data starts with the offsets of the drum and effect lists
//! followed by the instrument list.
//! The number of slots in each list is only stored in the [BankMetadata] table entry.
//!
//! | Offset | Data |
//! | --- | --- |
//! | 0x00 | drum list offset |
//! | 0x04 | effect list offset |
//! | 0x08 | instrument offsets |
//!
//! Drum and instrument slots are offsets to the structure.
//! Effect slots store a [TunedSample] directly.
//! A slot of 0 is empty and is skipped.
use indexmap::IndexMap;
use log::debug;
use rayon::prelude::*;

use crate::{
    codec::read_u32,
    drum::Drum,
    error::DecodeError,
    instrument::Instrument,
    metadata::BankMetadata,
    read_record,
    sample::Sample,
    tuned_sample::TunedSample,
    Record, POINTER_SIZE,
};

const TABLE_ENTRY_SIZE: usize = 0x10;
const TRUNCATED_TABLE_ENTRY_SIZE: usize = 0x08;

const DRUM_LIST_OFFSET_POSITION: u64 = 0x00;
const EFFECT_LIST_OFFSET_POSITION: u64 = 0x04;
const INSTRUMENT_LIST_OFFSET: u64 = 0x08;

/// A fully decoded instrument bank.
#[derive(Debug, PartialEq, Clone)]
pub struct Bank {
    pub metadata: BankMetadata,
    pub drum_list_offset: u32,
    pub effect_list_offset: u32,
    /// The drums for non empty slots in slot order.
    pub drums: Vec<Drum>,
    /// The sound effects for non empty slots in slot order.
    pub effects: Vec<TunedSample>,
    /// The instruments for non empty slots in slot order.
    pub instruments: Vec<Instrument>,
}

impl Bank {
    /// Decode the bank from its table entry and bank data.
    ///
    /// The `table_entry` may be the full 0x10 bytes
    /// or the last 0x08 bytes without the ROM address and size.
    /// Error offsets for the table entry are relative to the bytes passed in.
    pub fn from_bytes(table_entry: &[u8], bank_data: &[u8]) -> Result<Self, DecodeError> {
        let padding = TABLE_ENTRY_SIZE.saturating_sub(table_entry.len()) as u64;
        let table_entry = full_table_entry(table_entry)?;
        let metadata: BankMetadata =
            read_record(&table_entry, 0).map_err(|e| remove_padding(e, padding))?;

        let drum_list_offset = read_u32(bank_data, DRUM_LIST_OFFSET_POSITION)?;
        let effect_list_offset = read_u32(bank_data, EFFECT_LIST_OFFSET_POSITION)?;
        debug!(
            "drums: {} at {drum_list_offset:#x}, effects: {} at {effect_list_offset:#x}, instruments: {}",
            metadata.num_drums, metadata.num_effects, metadata.num_instruments
        );

        let drums = read_slots(metadata.num_drums as usize, |i| {
            let slot = drum_list_offset as u64 + i as u64 * POINTER_SIZE;
            read_pointer_slot(bank_data, slot)
        })?;

        // Effects are stored inline since a tuned sample is the same size as two pointers.
        let effects = read_slots(metadata.num_effects as usize, |i| {
            let slot = effect_list_offset as u64 + i as u64 * TunedSample::SIZE;
            read_inline_slot(bank_data, slot)
        })?;

        let instruments = read_slots(metadata.num_instruments as usize, |i| {
            let slot = INSTRUMENT_LIST_OFFSET + i as u64 * POINTER_SIZE;
            read_pointer_slot(bank_data, slot)
        })?;

        Ok(Self {
            metadata,
            drum_list_offset,
            effect_list_offset,
            drums,
            effects,
            instruments,
        })
    }

    /// Each sample used by the bank once keyed by its offset in the bank data.
    ///
    /// Samples are ordered by first use in drums, effects, and then instruments.
    pub fn unique_samples(&self) -> IndexMap<u32, &Sample> {
        let drum_samples = self.drums.iter().map(|d| &d.tuned_sample);
        let instrument_samples = self.instruments.iter().flat_map(|i| i.tuned_samples());

        let mut samples = IndexMap::new();
        for tuned_sample in drum_samples
            .chain(self.effects.iter())
            .chain(instrument_samples)
        {
            if let Some(sample) = &tuned_sample.sample {
                samples.entry(tuned_sample.sample_offset).or_insert(sample);
            }
        }
        samples
    }
}

fn full_table_entry(table_entry: &[u8]) -> Result<[u8; TABLE_ENTRY_SIZE], DecodeError> {
    // The truncated entry omits the ROM address and size at the start.
    let mut entry = [0u8; TABLE_ENTRY_SIZE];
    match table_entry.len() {
        TABLE_ENTRY_SIZE => entry.copy_from_slice(table_entry),
        TRUNCATED_TABLE_ENTRY_SIZE => {
            entry[TABLE_ENTRY_SIZE - TRUNCATED_TABLE_ENTRY_SIZE..].copy_from_slice(table_entry)
        }
        len => return Err(DecodeError::InvalidTableEntrySize(len)),
    }
    Ok(entry)
}

fn remove_padding(err: DecodeError, padding: u64) -> DecodeError {
    match err {
        DecodeError::InvalidEnumValue {
            offset,
            value,
            enum_name,
        } => DecodeError::InvalidEnumValue {
            offset: offset.saturating_sub(padding),
            value,
            enum_name,
        },
        e => e,
    }
}

fn read_slots<T, F>(count: usize, read_slot: F) -> Result<Vec<T>, DecodeError>
where
    T: Send,
    F: Fn(usize) -> Result<Option<T>, DecodeError> + Sync + Send,
{
    // Slots are independent, so order is only restored when collecting.
    // Collect every result first to always report the lowest failing slot.
    let slots: Vec<_> = (0..count).into_par_iter().map(read_slot).collect();
    let slots = slots.into_iter().collect::<Result<Vec<_>, _>>()?;
    Ok(slots.into_iter().flatten().collect())
}

fn read_pointer_slot<T: Record>(bank_data: &[u8], slot: u64) -> Result<Option<T>, DecodeError> {
    let offset = read_u32(bank_data, slot)?;
    if offset != 0 {
        read_record(bank_data, offset as u64).map(Some)
    } else {
        Ok(None)
    }
}

fn read_inline_slot<T: Record>(bank_data: &[u8], slot: u64) -> Result<Option<T>, DecodeError> {
    let bytes = slot
        .checked_add(T::SIZE)
        .and_then(|end| bank_data.get(slot as usize..end as usize))
        .ok_or(DecodeError::OutOfBounds {
            offset: slot,
            width: T::SIZE,
            len: bank_data.len() as u64,
            type_name: "effect slot",
        })?;

    // The entire slot must be zero and not just the sample pointer.
    if bytes.iter().any(|b| *b != 0) {
        read_record(bank_data, slot).map(Some)
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexlit::hex;

    #[test]
    fn full_table_entry_truncated() {
        let entry = full_table_entry(&hex!(02000102 03020005)).unwrap();
        assert_eq!(hex!(00000000 00000000 02000102 03020005), entry);
    }

    #[test]
    fn full_table_entry_invalid_sizes() {
        for len in [0, 7, 9, 15, 17, 32] {
            assert_eq!(
                Err(DecodeError::InvalidTableEntrySize(len)),
                full_table_entry(&vec![0u8; len])
            );
        }
    }

    #[test]
    fn inline_slot_all_zero_is_empty() {
        let bytes = [0u8; 16];
        assert_eq!(
            Ok(None),
            read_inline_slot::<TunedSample>(&bytes, 8)
        );
    }

    #[test]
    fn inline_slot_tuning_only() {
        // A null sample with a nonzero tuning still counts as an effect.
        let bytes = hex!(00000000 0x3F800000);
        let effect = read_inline_slot::<TunedSample>(&bytes, 0).unwrap().unwrap();
        assert_eq!(None, effect.sample);
        assert_eq!(1.0, effect.tuning);
    }

    #[test]
    fn inline_slot_out_of_bounds() {
        let bytes = [0u8; 12];
        assert_eq!(
            Err(DecodeError::OutOfBounds {
                offset: 8,
                width: 8,
                len: 12,
                type_name: "effect slot"
            }),
            read_inline_slot::<TunedSample>(&bytes, 8)
        );
    }

    #[test]
    fn pointer_slot_zero_is_empty() {
        let bytes = hex!(00000000);
        assert_eq!(Ok(None), read_pointer_slot::<Drum>(&bytes, 0));
    }

    #[test]
    fn read_slots_skips_empty_in_order() {
        let values = read_slots(6, |i| Ok((i % 2 == 1).then_some(i))).unwrap();
        assert_eq!(vec![1, 3, 5], values);
    }

    #[test]
    fn read_slots_propagates_errors() {
        let result = read_slots(4, |i| {
            if i == 2 {
                Err(DecodeError::InvalidTableEntrySize(i))
            } else {
                Ok(Some(i))
            }
        });
        assert_eq!(Err(DecodeError::InvalidTableEntrySize(2)), result);
    }

    #[test]
    fn read_slots_reports_lowest_failing_slot() {
        for _ in 0..64 {
            let result = read_slots(256, |i| {
                if i % 3 == 1 {
                    Err(DecodeError::InvalidTableEntrySize(i))
                } else {
                    Ok(Some(i))
                }
            });
            assert_eq!(Err(DecodeError::InvalidTableEntrySize(1)), result);
        }
    }

    #[test]
    fn remove_padding_enum_offset() {
        let err = DecodeError::InvalidEnumValue {
            offset: 9,
            value: 7,
            enum_name: "CacheLoadType",
        };
        assert_eq!(
            DecodeError::InvalidEnumValue {
                offset: 1,
                value: 7,
                enum_name: "CacheLoadType"
            },
            remove_padding(err.clone(), 8)
        );
        assert_eq!(err, remove_padding(err.clone(), 0));
    }
}
