use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;

use crate::{
    cartridge::BankController,
    cpu::Processor,
    io::Io,
    machine::Machine,
    memory_map::{OAM_SIZE, VIDEO_RAM_SIZE, ZRAM_SIZE},
};

/// Serializable capture of the memory subsystem, taken for post-mortem
/// inspection after a session aborts. The bank controller travels as its
/// tagged serde form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemorySnapshot {
    pub io: Io,
    #[serde(with = "BigArray")]
    pub video_ram: [u8; VIDEO_RAM_SIZE],
    #[serde(with = "BigArray")]
    pub oam: [u8; OAM_SIZE],
    #[serde(with = "BigArray")]
    pub zram: [u8; ZRAM_SIZE],
    pub speed_factor: u8,
    pub cgb_mode: bool,
    pub boot_rom_enabled: bool,
    pub cartridge: serde_json::Value,
}

impl MemorySnapshot {
    pub fn capture<P: Processor>(machine: &Machine<P>) -> anyhow::Result<Self> {
        let memory = &machine.memory;
        let cartridge = serde_json::to_value(memory.controller())
            .context("serializing bank controller")?;

        Ok(Self {
            io: machine.io.clone(),
            video_ram: memory.video_ram,
            oam: memory.oam,
            zram: memory.zram,
            speed_factor: memory.speed_factor,
            cgb_mode: machine.cgb_mode(),
            boot_rom_enabled: memory.boot_rom_enabled(),
            cartridge,
        })
    }

    /// Writes the captured state back. The console mode is fixed for the life
    /// of a machine and is left untouched.
    pub fn restore<P: Processor>(&self, machine: &mut Machine<P>) -> anyhow::Result<()> {
        let controller: Box<dyn BankController> = serde_json::from_value(self.cartridge.clone())
            .context("deserializing bank controller")?;
        if self.cgb_mode != machine.cgb_mode() {
            tracing::warn!(
                "Snapshot taken in {} mode, restoring into {} machine",
                if self.cgb_mode { "CGB" } else { "DMG" },
                if machine.cgb_mode() { "a CGB" } else { "a DMG" }
            );
        }

        let memory = &mut machine.memory;
        memory.replace_controller(controller);
        memory.video_ram = self.video_ram;
        memory.oam = self.oam;
        memory.zram = self.zram;
        memory.speed_factor = self.speed_factor;
        memory.set_boot_rom_enabled(self.boot_rom_enabled);
        machine.io.load_registers(*self.io.registers());
        Ok(())
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("parsing memory snapshot")
    }
}

impl<P: Processor> Machine<P> {
    pub fn snapshot(&self) -> anyhow::Result<MemorySnapshot> {
        MemorySnapshot::capture(self)
    }

    pub fn restore(&mut self, snapshot: &MemorySnapshot) -> anyhow::Result<()> {
        snapshot.restore(self)
    }
}
