use thiserror::Error;

use crate::memory_map::MemoryRegion;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unsupported hardware feature {feature}: write {value:#04X} to {address:#06X}")]
    UnsupportedFeature {
        feature: &'static str,
        address: u16,
        value: u8,
    },

    #[error("cartridge image rejected by the bank controller ({len} bytes)")]
    InvalidRom { len: usize },

    #[error("memory map regions {first:?} and {second:?} overlap")]
    OverlappingRegions {
        first: MemoryRegion,
        second: MemoryRegion,
    },

    #[error("memory map region {region:?} spans {len:#X} bytes, backing store holds {capacity:#X}")]
    RegionTooLarge {
        region: MemoryRegion,
        len: usize,
        capacity: usize,
    },

    #[error("memory map region {region:?} lies outside the 0xFF00-0xFFFF register window")]
    OutsideIoWindow { region: MemoryRegion },
}
