//! The audiobank table entry describing a bank.
//!
//! The full entry from the audiobank table in `code` is 0x10 bytes.
//! Custom music files for the Ocarina of Time and Majora's Mask randomizers only store the last 0x08 bytes
//! since the address and size are assigned when the bank is inserted into the ROM.
use binrw::BinRead;

use crate::{
    codec::{as_enum, int_enum, ScalarKind},
    Record,
};

/// `AudiobankEntry` in the decompilation projects.
#[derive(Debug, BinRead, PartialEq, Eq, Clone)]
#[br(big)]
pub struct BankMetadata {
    /// The ROM address of the bank or 0 for truncated table entries.
    pub rom_addr: u32,
    /// The size of the bank data in bytes or 0 for truncated table entries.
    pub bank_size: u32,
    #[br(try_map = |x: u8| as_enum::<StorageMedium>(x))]
    pub medium: StorageMedium,
    #[br(try_map = |x: u8| as_enum::<CacheLoadType>(x))]
    pub cache_load_type: CacheLoadType,
    pub sample_bank_id_1: u8,
    pub sample_bank_id_2: u8,
    /// The number of slots in the instrument list.
    pub num_instruments: u8,
    /// The number of slots in the drum list.
    pub num_drums: u8,
    /// The number of slots in the sound effect list.
    pub num_effects: u16,
}

impl Record for BankMetadata {
    const SIZE: u64 =
        ScalarKind::U32.width() * 2 + ScalarKind::U8.width() * 6 + ScalarKind::U16.width();
}

int_enum! {
    /// `AudioStorageMedium` in the decompilation projects.
    pub enum StorageMedium: u8 {
        /// Random access memory.
        Ram = 0,
        Unk = 1,
        /// Read only memory on the cartridge.
        Cart = 2,
        /// The 64DD magnetic disk.
        DiskDrive = 3,
        /// Random access memory that has been unloaded.
        RamUnloaded = 5,
    }
}

int_enum! {
    /// `AudioCacheLoadType` in the decompilation projects.
    pub enum CacheLoadType: u8 {
        Permanent = 0,
        Persistent = 1,
        Temporary = 2,
        /// Either the persistent or temporary cache.
        Either = 3,
        /// Either the persistent or temporary cache without syncing.
        EitherNoSync = 4,
    }
}
