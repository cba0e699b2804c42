use std::fmt::{self, Debug};

use serde::{Deserialize, Serialize};

pub const ROM_BANK_SIZE: usize = 0x4000;
pub const EXTERNAL_RAM_SIZE: usize = 0x2000;
pub const WORK_RAM_BANK_SIZE: usize = 0x1000;
pub const WORK_RAM_BANKS: usize = 8;

/// Cartridge and work RAM storage behind the program area and the
/// `0xA000-0xFDFF` window. Implementations own their own bank mapping.
#[typetag::serde(tag = "type")]
pub trait BankController: Debug {
    fn read(&mut self, address: u16) -> u8;
    fn write(&mut self, address: u16, value: u8);
    fn set_work_ram_bank(&mut self, bank: u8);
    fn is_rom_valid(&self) -> bool;
    fn rom_len(&self) -> usize;
}

/// Cartridge without a mapper: up to 32 KiB of ROM, 8 KiB of external RAM and
/// the eight 4 KiB work RAM banks, with echo RAM folded onto work RAM.
#[derive(Serialize, Deserialize, PartialEq, Clone)]
pub struct RomOnly {
    rom: Vec<u8>,
    ram: Vec<u8>,
    work_ram: Vec<u8>,
    work_ram_bank: usize,
}

impl RomOnly {
    pub fn new(rom: Vec<u8>) -> Self {
        RomOnly {
            rom,
            ram: vec![0xFF; EXTERNAL_RAM_SIZE],
            work_ram: vec![0; WORK_RAM_BANK_SIZE * WORK_RAM_BANKS],
            work_ram_bank: 1,
        }
    }

    pub fn rom(&self) -> &[u8] {
        &self.rom
    }

    pub fn work_ram_bank(&self) -> usize {
        self.work_ram_bank
    }

    fn work_ram_index(&self, address: u16) -> usize {
        // echo RAM lands 0x2000 lower
        let address = match address {
            0xE000..=0xFDFF => address - 0x2000,
            _ => address,
        } as usize;
        match address {
            0xC000..=0xCFFF => address - 0xC000,
            _ => self.work_ram_bank * WORK_RAM_BANK_SIZE + (address - 0xD000),
        }
    }
}

#[typetag::serde]
impl BankController for RomOnly {
    fn read(&mut self, address: u16) -> u8 {
        match address {
            0x0000..=0x7FFF => self.rom.get(address as usize).copied().unwrap_or(0xFF),
            0xA000..=0xBFFF => self.ram[(address - 0xA000) as usize],
            0xC000..=0xFDFF => self.work_ram[self.work_ram_index(address)],
            _ => {
                tracing::warn!("Bank controller read outside its window {:#06X}", address);
                0xFF
            }
        }
    }

    fn write(&mut self, address: u16, value: u8) {
        match address {
            0x0000..=0x7FFF => {
                tracing::trace!(
                    "Attempt to write to ROM address {:#06X} = {:#04X}",
                    address,
                    value
                );
            }
            0xA000..=0xBFFF => self.ram[(address - 0xA000) as usize] = value,
            0xC000..=0xFDFF => {
                let index = self.work_ram_index(address);
                self.work_ram[index] = value;
            }
            _ => {
                tracing::warn!(
                    "Bank controller write outside its window {:#06X} = {:#04X}",
                    address,
                    value
                );
            }
        }
    }

    fn set_work_ram_bank(&mut self, bank: u8) {
        // bank 0 always selects bank 1 in the switchable half
        self.work_ram_bank = match bank as usize & (WORK_RAM_BANKS - 1) {
            0 => 1,
            n => n,
        };
    }

    fn is_rom_valid(&self) -> bool {
        self.rom.len() >= 2 * ROM_BANK_SIZE && self.rom.len() % ROM_BANK_SIZE == 0
    }

    fn rom_len(&self) -> usize {
        self.rom.len()
    }
}

impl fmt::Debug for RomOnly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RomOnly")
            .field("rom_len", &self.rom.len())
            .field("work_ram_bank", &self.work_ram_bank)
            .finish()
    }
}
