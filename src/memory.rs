use derivative::Derivative;

use crate::{
    cartridge::BankController,
    error::{Error, Result},
    memory_map::{MemoryMap, OAM_SIZE, VIDEO_RAM_SIZE, ZRAM_SIZE},
};

pub const BOOT_ROM_SIZE: usize = 0x100;

/// Observer called with `(address, value)` before every access. Reads pass
/// zero as the value.
pub type AccessHook = Box<dyn FnMut(u16, u8)>;

/// Backing storage of the address space. Routing lives in [`crate::bus::Bus`],
/// which pairs this with the I/O registers and the sibling devices.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct Memory {
    pub map: MemoryMap,
    controller: Box<dyn BankController>,
    #[derivative(Debug = "ignore")]
    boot_rom: Option<[u8; BOOT_ROM_SIZE]>,
    boot_rom_enabled: bool,
    #[derivative(Debug = "ignore")]
    pub(crate) video_ram: [u8; VIDEO_RAM_SIZE],
    #[derivative(Debug = "ignore")]
    pub(crate) oam: [u8; OAM_SIZE],
    #[derivative(Debug = "ignore")]
    pub(crate) zram: [u8; ZRAM_SIZE],
    pub(crate) speed_factor: u8,
    #[derivative(Debug = "ignore")]
    read_hooks: Vec<AccessHook>,
    #[derivative(Debug = "ignore")]
    write_hooks: Vec<AccessHook>,
}

impl Memory {
    pub fn new(map: MemoryMap, controller: Box<dyn BankController>) -> Result<Self> {
        if !controller.is_rom_valid() {
            tracing::error!("Bank controller rejected the cartridge: {:?}", controller);
            return Err(Error::InvalidRom {
                len: controller.rom_len(),
            });
        }

        Ok(Self {
            map,
            controller,
            boot_rom: None,
            boot_rom_enabled: false,
            video_ram: [0; VIDEO_RAM_SIZE],
            oam: [0; OAM_SIZE],
            zram: [0; ZRAM_SIZE],
            speed_factor: 1,
            read_hooks: Vec::new(),
            write_hooks: Vec::new(),
        })
    }

    pub fn controller(&self) -> &(dyn BankController + 'static) {
        &*self.controller
    }

    pub fn controller_mut(&mut self) -> &mut (dyn BankController + 'static) {
        &mut *self.controller
    }

    pub(crate) fn replace_controller(&mut self, controller: Box<dyn BankController>) {
        self.controller = controller;
    }

    pub fn set_work_ram_bank(&mut self, bank: u8) {
        self.controller.set_work_ram_bank(bank);
    }

    /// Maps `image` over `0x0000-0x00FF` until [`Memory::disable_boot_rom`].
    pub fn install_boot_rom(&mut self, image: [u8; BOOT_ROM_SIZE]) {
        self.boot_rom = Some(image);
        self.boot_rom_enabled = true;
    }

    pub fn disable_boot_rom(&mut self) {
        self.boot_rom_enabled = false;
    }

    pub fn boot_rom_enabled(&self) -> bool {
        self.boot_rom_enabled && self.boot_rom.is_some()
    }

    pub(crate) fn set_boot_rom_enabled(&mut self, enabled: bool) {
        self.boot_rom_enabled = enabled;
    }

    pub(crate) fn read_program(&mut self, address: u16) -> u8 {
        match &self.boot_rom {
            Some(boot) if self.boot_rom_enabled && (address as usize) < BOOT_ROM_SIZE => {
                boot[address as usize]
            }
            _ => self.controller.read(address),
        }
    }

    pub fn speed_factor(&self) -> u8 {
        self.speed_factor
    }

    pub fn double_speed(&self) -> bool {
        self.speed_factor != 1
    }

    pub fn video_ram(&self) -> &[u8] {
        &self.video_ram
    }

    pub fn oam(&self) -> &[u8] {
        &self.oam
    }

    pub fn zram(&self) -> &[u8] {
        &self.zram
    }

    pub fn add_read_hook(&mut self, hook: impl FnMut(u16, u8) + 'static) {
        self.read_hooks.push(Box::new(hook));
    }

    pub fn add_write_hook(&mut self, hook: impl FnMut(u16, u8) + 'static) {
        self.write_hooks.push(Box::new(hook));
    }

    pub fn clear_hooks(&mut self) {
        self.read_hooks.clear();
        self.write_hooks.clear();
    }

    pub(crate) fn run_read_hooks(&mut self, address: u16) {
        for hook in self.read_hooks.iter_mut() {
            hook(address, 0x00);
        }
    }

    pub(crate) fn run_write_hooks(&mut self, address: u16, value: u8) {
        for hook in self.write_hooks.iter_mut() {
            hook(address, value);
        }
    }
}
