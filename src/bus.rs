use crate::{
    cpu::Processor,
    display::Display,
    error::Result,
    io::{io_handlers, Io, IoHandler},
    memory::Memory,
    memory_map::MemoryRegion,
    registers::REG_KEY1,
};

/// Borrowed view over every subsystem the address space reaches. It lives no
/// longer than the [`crate::Machine`] it was split from, and is what I/O
/// handlers receive to reach the processor, the display and memory itself.
pub struct Bus<'a> {
    pub memory: &'a mut Memory,
    pub io: &'a mut Io,
    pub cpu: &'a mut dyn Processor,
    pub display: &'a dyn Display,
}

impl<'a> Bus<'a> {
    pub fn new(
        memory: &'a mut Memory,
        io: &'a mut Io,
        cpu: &'a mut dyn Processor,
        display: &'a dyn Display,
    ) -> Self {
        Self {
            memory,
            io,
            cpu,
            display,
        }
    }

    pub fn read8(&mut self, address: u16) -> u8 {
        self.memory.run_read_hooks(address);

        let map = self.memory.map;
        match map.classify(address) {
            MemoryRegion::ProgramArea => self.memory.read_program(address),
            MemoryRegion::VideoRam => {
                let offset = self.display.video_offset() as usize;
                self.memory.video_ram[offset + map.video_ram.offset(address)]
            }
            MemoryRegion::BankRam | MemoryRegion::WorkRam | MemoryRegion::EchoRam => {
                self.memory.controller_mut().read(address)
            }
            MemoryRegion::Oam => self.memory.oam[map.oam.offset(address)],
            MemoryRegion::IoPorts | MemoryRegion::InterruptEnable => self.read_io(address),
            MemoryRegion::Zram => self.memory.zram[map.zram.offset(address)],
            MemoryRegion::Invalid => {
                tracing::warn!("Invalid memory read at {:#06X}", address);
                0xFF
            }
        }
    }

    pub fn write8(&mut self, address: u16, value: u8) -> Result<()> {
        self.memory.run_write_hooks(address, value);

        let map = self.memory.map;
        match map.classify(address) {
            MemoryRegion::ProgramArea
            | MemoryRegion::BankRam
            | MemoryRegion::WorkRam
            | MemoryRegion::EchoRam => self.memory.controller_mut().write(address, value),
            MemoryRegion::VideoRam => {
                if self.display.video_writable() {
                    let offset = self.display.video_offset() as usize;
                    self.memory.video_ram[offset + map.video_ram.offset(address)] = value;
                }
            }
            MemoryRegion::Oam => self.memory.oam[map.oam.offset(address)] = value,
            MemoryRegion::IoPorts | MemoryRegion::InterruptEnable => {
                return self.write_io(address, value);
            }
            MemoryRegion::Zram => self.memory.zram[map.zram.offset(address)] = value,
            MemoryRegion::Invalid => {
                tracing::warn!(
                    "Invalid memory write at {:#06X}, value {:#04X}",
                    address,
                    value
                );
            }
        }
        Ok(())
    }

    pub fn read16(&mut self, address: u16) -> u16 {
        let low = self.read8(address) as u16;
        let high = self.read8(address.wrapping_add(1)) as u16;
        (high << 8) | low
    }

    pub fn write16(&mut self, address: u16, value: u16) -> Result<()> {
        self.write8(address, (value & 0xFF) as u8)?;
        self.write8(address.wrapping_add(1), (value >> 8) as u8)
    }

    pub fn read_io(&mut self, address: u16) -> u8 {
        match io_handlers().lookup(address) {
            IoHandler::Custom { on_read, .. } => on_read(self, address),
            IoHandler::PassThrough => self.io.reg(address),
        }
    }

    pub fn write_io(&mut self, address: u16, value: u8) -> Result<()> {
        match io_handlers().lookup(address) {
            IoHandler::Custom { on_write, .. } => on_write(self, address, value),
            IoHandler::PassThrough => {
                *self.io.reg_mut(address) = value;
                Ok(())
            }
        }
    }

    /// Toggles between normal and double speed, mirroring the state into KEY1.
    pub fn switch_speed(&mut self) {
        let key1 = self.io.reg_mut(REG_KEY1);
        if *key1 != 0 {
            *key1 = 0x00;
            self.memory.speed_factor = 1;
        } else {
            *key1 = 0x80;
            self.memory.speed_factor = 2;
        }
        tracing::debug!("Speed factor now {}", self.memory.speed_factor);
    }
}
