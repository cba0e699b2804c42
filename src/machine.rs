use once_cell::unsync::OnceCell;

use crate::{
    bus::Bus,
    cartridge::{BankController, RomOnly},
    cpu::{CycleCounter, Processor},
    display::DisplayState,
    error::Result,
    io::Io,
    memory::{Memory, BOOT_ROM_SIZE},
    memory_map::MemoryMap,
    utils::hexdump,
};

/// Header byte whose bit 7 flags colour-mode support.
pub const CGB_FLAG_ADDRESS: u16 = 0x0143;

pub struct Machine<P: Processor = CycleCounter> {
    pub cpu: P,
    pub memory: Memory,
    pub io: Io,
    pub display: DisplayState,
    cgb_mode: OnceCell<bool>,
}

impl Machine<CycleCounter> {
    pub fn new(rom: Vec<u8>) -> Result<Self> {
        MachineBuilder::new(rom).build()
    }
}

impl<P: Processor> Machine<P> {
    fn from_parts(cpu: P, memory: Memory) -> Self {
        let mut machine = Self {
            cpu,
            memory,
            io: Io::new(),
            display: DisplayState::new(),
            cgb_mode: OnceCell::new(),
        };
        // straight from the cartridge header, before any routing is involved
        let flag = machine.memory.controller_mut().read(CGB_FLAG_ADDRESS);
        machine.set_cgb_mode(flag & 0x80 != 0);
        machine
    }

    fn set_cgb_mode(&mut self, enabled: bool) {
        if self.cgb_mode.set(enabled).is_err() {
            tracing::warn!("Console mode already fixed, ignoring {}", enabled);
            return;
        }
        tracing::info!(
            "Console mode: {}",
            if enabled { "CGB" } else { "DMG" }
        );
    }

    pub fn cgb_mode(&self) -> bool {
        self.cgb_mode.get().copied().unwrap_or(false)
    }

    pub fn bus(&mut self) -> Bus<'_> {
        Bus::new(
            &mut self.memory,
            &mut self.io,
            &mut self.cpu,
            &self.display,
        )
    }

    pub fn read8(&mut self, address: u16) -> u8 {
        self.bus().read8(address)
    }

    pub fn write8(&mut self, address: u16, value: u8) -> Result<()> {
        self.bus().write8(address, value)
    }

    pub fn read16(&mut self, address: u16) -> u16 {
        self.bus().read16(address)
    }

    pub fn write16(&mut self, address: u16, value: u16) -> Result<()> {
        self.bus().write16(address, value)
    }

    pub fn switch_speed(&mut self) {
        self.bus().switch_speed();
    }

    pub fn speed_factor(&self) -> u8 {
        self.memory.speed_factor()
    }

    pub fn double_speed(&self) -> bool {
        self.memory.double_speed()
    }

    pub fn set_work_ram_bank(&mut self, bank: u8) {
        self.memory.set_work_ram_bank(bank);
    }

    pub fn disable_boot_rom(&mut self) {
        self.memory.disable_boot_rom();
    }

    pub fn add_read_hook(&mut self, hook: impl FnMut(u16, u8) + 'static) {
        self.memory.add_read_hook(hook);
    }

    pub fn add_write_hook(&mut self, hook: impl FnMut(u16, u8) + 'static) {
        self.memory.add_write_hook(hook);
    }

    pub fn vram_dump(&self) -> String {
        hexdump(self.memory.video_ram(), 0x8000)
    }

    pub fn oam_dump(&self) -> String {
        hexdump(self.memory.oam(), 0xFE00)
    }
}

pub struct MachineBuilder<P: Processor = CycleCounter> {
    controller: Box<dyn BankController>,
    boot_rom: Option<[u8; BOOT_ROM_SIZE]>,
    map: MemoryMap,
    cpu: P,
}

impl MachineBuilder<CycleCounter> {
    pub fn new(rom: Vec<u8>) -> Self {
        Self::with_controller(Box::new(RomOnly::new(rom)))
    }

    pub fn with_controller(controller: Box<dyn BankController>) -> Self {
        Self {
            controller,
            boot_rom: None,
            map: MemoryMap::STANDARD,
            cpu: CycleCounter::new(),
        }
    }
}

impl<P: Processor> MachineBuilder<P> {
    pub fn boot_rom(mut self, image: [u8; BOOT_ROM_SIZE]) -> Self {
        self.boot_rom = Some(image);
        self
    }

    pub fn memory_map(mut self, map: MemoryMap) -> Self {
        self.map = map;
        self
    }

    pub fn processor<Q: Processor>(self, cpu: Q) -> MachineBuilder<Q> {
        MachineBuilder {
            controller: self.controller,
            boot_rom: self.boot_rom,
            map: self.map,
            cpu,
        }
    }

    pub fn build(self) -> Result<Machine<P>> {
        self.map.validate()?;
        tracing::info!("Initializing machine with {:?}", self.controller);

        let mut memory = Memory::new(self.map, self.controller)?;
        if let Some(image) = self.boot_rom {
            memory.install_boot_rom(image);
        }
        Ok(Machine::from_parts(self.cpu, memory))
    }
}
