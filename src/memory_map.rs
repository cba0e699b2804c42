// +---------------+-------------------------------------------------+
// | Range         | Description                                     |
// +---------------+-------------------------------------------------+
// | 0x0000-0x7FFF | Program area (cartridge ROM, boot overlay)      |
// | 0x8000-0x9FFF | Video RAM (banked, gated by the display mode)   |
// | 0xA000-0xBFFF | Cartridge RAM                                   |
// | 0xC000-0xDFFF | Work RAM (bank 0 + switchable bank)             |
// | 0xE000-0xFDFF | Echo RAM (mirror of 0xC000-0xDDFF)              |
// | 0xFE00-0xFE9F | Object attribute memory                         |
// | 0xFEA0-0xFEFF | Unusable                                        |
// | 0xFF00-0xFF7F | I/O ports                                       |
// | 0xFF80-0xFFFE | High RAM (ZRAM)                                 |
// | 0xFFFF        | Interrupt enable register                       |
// +---------------+-------------------------------------------------+
use std::fmt;

use crate::error::{Error, Result};

pub const VIDEO_RAM_SIZE: usize = 0x4000;
pub const OAM_SIZE: usize = 0xA0;
pub const ZRAM_SIZE: usize = 0x7F;
/// Video RAM visible at once; the second bank sits right above it.
pub const VIDEO_RAM_WINDOW: usize = VIDEO_RAM_SIZE / 2;
pub const IO_WINDOW_START: u16 = 0xFF00;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressRange {
    pub first: u16,
    pub last: u16,
}

impl AddressRange {
    pub const fn new(first: u16, last: u16) -> Self {
        Self { first, last }
    }

    pub const fn single(address: u16) -> Self {
        Self::new(address, address)
    }

    pub fn contains(&self, address: u16) -> bool {
        address >= self.first && address <= self.last
    }

    pub fn overlaps(&self, other: &AddressRange) -> bool {
        self.first <= other.last && other.first <= self.last
    }

    pub fn len(&self) -> usize {
        (self.last as usize + 1).saturating_sub(self.first as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.last < self.first
    }

    pub fn offset(&self, address: u16) -> usize {
        (address - self.first) as usize
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X} - 0x{:04X}", self.first, self.last)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryRegion {
    ProgramArea,
    VideoRam,
    BankRam,
    WorkRam,
    EchoRam,
    Oam,
    IoPorts,
    Zram,
    InterruptEnable,
    Invalid,
}

/// Partition of the 16-bit address space. Classification tests the regions in
/// declaration order and the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryMap {
    pub program_area: AddressRange,
    pub video_ram: AddressRange,
    pub bank_ram: AddressRange,
    pub work_ram: AddressRange,
    pub echo_ram: AddressRange,
    pub oam: AddressRange,
    pub io_ports: AddressRange,
    pub zram: AddressRange,
    pub interrupt_enable: u16,
}

impl MemoryMap {
    pub const STANDARD: MemoryMap = MemoryMap {
        program_area: AddressRange::new(0x0000, 0x7FFF),
        video_ram: AddressRange::new(0x8000, 0x9FFF),
        bank_ram: AddressRange::new(0xA000, 0xBFFF),
        work_ram: AddressRange::new(0xC000, 0xDFFF),
        echo_ram: AddressRange::new(0xE000, 0xFDFF),
        oam: AddressRange::new(0xFE00, 0xFE9F),
        io_ports: AddressRange::new(0xFF00, 0xFF7F),
        zram: AddressRange::new(0xFF80, 0xFFFE),
        interrupt_enable: 0xFFFF,
    };

    pub fn regions(&self) -> [(MemoryRegion, AddressRange); 9] {
        [
            (MemoryRegion::ProgramArea, self.program_area),
            (MemoryRegion::VideoRam, self.video_ram),
            (MemoryRegion::BankRam, self.bank_ram),
            (MemoryRegion::WorkRam, self.work_ram),
            (MemoryRegion::EchoRam, self.echo_ram),
            (MemoryRegion::Oam, self.oam),
            (MemoryRegion::IoPorts, self.io_ports),
            (MemoryRegion::Zram, self.zram),
            (
                MemoryRegion::InterruptEnable,
                AddressRange::single(self.interrupt_enable),
            ),
        ]
    }

    pub fn classify(&self, address: u16) -> MemoryRegion {
        self.regions()
            .iter()
            .find(|(_, range)| range.contains(address))
            .map(|(region, _)| *region)
            .unwrap_or(MemoryRegion::Invalid)
    }

    /// Rejects maps whose regions overlap, outgrow the buffers behind them, or
    /// place register traffic outside the register file.
    pub fn validate(&self) -> Result<()> {
        for (region, range, capacity) in [
            (MemoryRegion::VideoRam, self.video_ram, VIDEO_RAM_WINDOW),
            (MemoryRegion::Oam, self.oam, OAM_SIZE),
            (MemoryRegion::Zram, self.zram, ZRAM_SIZE),
        ] {
            if range.len() > capacity {
                return Err(Error::RegionTooLarge {
                    region,
                    len: range.len(),
                    capacity,
                });
            }
        }

        if self.io_ports.first < IO_WINDOW_START {
            return Err(Error::OutsideIoWindow {
                region: MemoryRegion::IoPorts,
            });
        }
        if self.interrupt_enable < IO_WINDOW_START {
            return Err(Error::OutsideIoWindow {
                region: MemoryRegion::InterruptEnable,
            });
        }

        let regions = self.regions();
        for (i, (first, a)) in regions.iter().enumerate() {
            for (second, b) in &regions[i + 1..] {
                if a.overlaps(b) {
                    return Err(Error::OverlappingRegions {
                        first: *first,
                        second: *second,
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for MemoryMap {
    fn default() -> Self {
        Self::STANDARD
    }
}
