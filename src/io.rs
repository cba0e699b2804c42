use std::fmt;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;

use crate::{
    bus::Bus,
    error::{Error, Result},
    registers::*,
};

pub type WriteHandler = fn(&mut Bus<'_>, u16, u8) -> Result<()>;
pub type ReadHandler = fn(&mut Bus<'_>, u16) -> u8;

#[derive(Clone, Copy)]
pub enum IoHandler {
    PassThrough,
    Custom {
        on_write: WriteHandler,
        on_read: ReadHandler,
    },
}

impl fmt::Debug for IoHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoHandler::PassThrough => write!(f, "PassThrough"),
            IoHandler::Custom { .. } => write!(f, "Custom"),
        }
    }
}

/// Register offset to handler mapping. Built once by [`DispatchTable::standard`]
/// and shared read-only for the rest of the process.
pub struct DispatchTable {
    entries: [IoHandler; IO_REGISTER_COUNT],
}

impl DispatchTable {
    pub fn new() -> Self {
        Self {
            entries: [IoHandler::PassThrough; IO_REGISTER_COUNT],
        }
    }

    pub fn install(&mut self, address: u16, on_write: WriteHandler, on_read: ReadHandler) {
        let entry = &mut self.entries[io_offset(address)];
        if let IoHandler::Custom { .. } = entry {
            panic!("I/O handler for {:#06X} installed twice", address);
        }
        *entry = IoHandler::Custom { on_write, on_read };
    }

    pub fn lookup(&self, address: u16) -> IoHandler {
        self.entries[io_offset(address)]
    }

    pub fn standard() -> Self {
        let mut table = Self::new();
        table.install(REG_P1, write_joypad, read_joypad);
        table.install(REG_DIV, write_div, read_raw);
        table.install(REG_DMA, write_dma, read_raw);
        for hdma in [REG_HDMA1, REG_HDMA2, REG_HDMA3, REG_HDMA4, REG_HDMA5] {
            table.install(hdma, write_hdma, read_raw);
        }
        table.install(REG_NR52, write_sound_on_off, read_raw);
        table.install(REG_KEY1, write_speed_switch, read_raw);
        table
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::new()
    }
}

static IO_HANDLERS: OnceCell<DispatchTable> = OnceCell::new();

pub fn io_handlers() -> &'static DispatchTable {
    IO_HANDLERS.get_or_init(DispatchTable::standard)
}

/// Register File of the memory-mapped hardware registers, indexed by offset
/// from `0xFF00`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Io {
    #[serde(with = "BigArray")]
    registers: [u8; IO_REGISTER_COUNT],
}

impl Io {
    pub fn new() -> Self {
        Self {
            registers: [0; IO_REGISTER_COUNT],
        }
    }

    pub fn reg(&self, address: u16) -> u8 {
        self.registers[io_offset(address)]
    }

    pub fn reg_mut(&mut self, address: u16) -> &mut u8 {
        &mut self.registers[io_offset(address)]
    }

    pub fn registers(&self) -> &[u8; IO_REGISTER_COUNT] {
        &self.registers
    }

    pub(crate) fn load_registers(&mut self, registers: [u8; IO_REGISTER_COUNT]) {
        self.registers = registers;
    }
}

impl Default for Io {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Io {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Io")
            .field("div", &self.reg(REG_DIV))
            .field("nr52", &self.reg(REG_NR52))
            .field("key1", &self.reg(REG_KEY1))
            .field("ie", &self.reg(REG_IE))
            .finish()
    }
}

fn read_raw(bus: &mut Bus<'_>, address: u16) -> u8 {
    bus.io.reg(address)
}

fn write_joypad(_bus: &mut Bus<'_>, address: u16, value: u8) -> Result<()> {
    // TODO: select the button/direction matrix from bits 4-5
    tracing::debug!("P1/JOYP register {:#06X} write {:#04X}", address, value);
    Ok(())
}

fn read_joypad(_bus: &mut Bus<'_>, _address: u16) -> u8 {
    JOYPAD_RELEASED
}

fn write_div(bus: &mut Bus<'_>, _address: u16, _value: u8) -> Result<()> {
    *bus.io.reg_mut(REG_DIV) = 0;
    bus.cpu.break_now();
    Ok(())
}

fn write_dma(bus: &mut Bus<'_>, _address: u16, value: u8) -> Result<()> {
    // the trigger value itself is not latched into the register
    let src = (value as u16) << 8;
    tracing::trace!("DMA copy from {:#06X} to {:#06X}", src, OAM_BASE);
    for i in 0..DMA_LENGTH {
        let byte = bus.read8(src.wrapping_add(i));
        bus.write8(OAM_BASE + i, byte)?;
    }
    bus.cpu.incr_cycles(DMA_CYCLES);
    Ok(())
}

fn write_hdma(_bus: &mut Bus<'_>, address: u16, value: u8) -> Result<()> {
    tracing::warn!("HDMA {:#06X} write {:#04X}", address, value);
    Err(Error::UnsupportedFeature {
        feature: "HDMA",
        address,
        value,
    })
}

fn write_sound_on_off(bus: &mut Bus<'_>, address: u16, value: u8) -> Result<()> {
    // only the master enable bit latches; clearing it is not modeled
    tracing::debug!("NR52 Sound ON/OFF {:#06X} write {:#04X}", address, value);
    *bus.io.reg_mut(REG_NR52) |= value & 0x80;
    Ok(())
}

fn write_speed_switch(bus: &mut Bus<'_>, _address: u16, _value: u8) -> Result<()> {
    bus.switch_speed();
    Ok(())
}
