pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod display;
pub mod error;
pub mod io;
pub mod machine;
pub mod memory;
pub mod memory_map;
pub mod registers;
pub mod snapshot;
pub mod utils;

pub use bus::Bus;
pub use cartridge::{BankController, RomOnly};
pub use cpu::{CycleCounter, Processor};
pub use display::{Display, DisplayState, LcdMode};
pub use error::{Error, Result};
pub use machine::{Machine, MachineBuilder};
pub use memory::Memory;
pub use memory_map::{AddressRange, MemoryMap, MemoryRegion};
pub use snapshot::MemorySnapshot;
pub use utils::hexdump;

use tracing_subscriber::EnvFilter;
use wasm_bindgen::prelude::*;

/// Installs a fmt subscriber filtered by `RUST_LOG` (default `info`). Safe to
/// call more than once.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

#[wasm_bindgen(js_name = Machine)]
pub struct JsMachine(Machine);

#[wasm_bindgen(js_class = Machine)]
impl JsMachine {
    #[wasm_bindgen(constructor)]
    pub fn new(rom_data: &[u8]) -> std::result::Result<JsMachine, JsValue> {
        console_error_panic_hook::set_once();
        let _ = tracing_wasm::try_set_as_global_default();

        Machine::new(rom_data.to_vec()).map(Self).map_err(js_error)
    }

    pub fn read(&mut self, address: u16) -> u8 {
        self.0.read8(address)
    }

    pub fn write(&mut self, address: u16, value: u8) -> std::result::Result<(), JsValue> {
        self.0.write8(address, value).map_err(js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn vram(&self) -> Vec<u8> {
        self.0.memory.video_ram().to_vec()
    }

    #[wasm_bindgen(getter)]
    pub fn oam(&self) -> Vec<u8> {
        self.0.memory.oam().to_vec()
    }

    #[wasm_bindgen(getter = speedFactor)]
    pub fn speed_factor(&self) -> u8 {
        self.0.speed_factor()
    }

    #[wasm_bindgen(getter = cgbMode)]
    pub fn cgb_mode(&self) -> bool {
        self.0.cgb_mode()
    }

    #[wasm_bindgen(getter)]
    pub fn cycles(&self) -> u64 {
        self.0.cpu.cycles()
    }

    pub fn snapshot(&self) -> std::result::Result<String, JsValue> {
        self.0
            .snapshot()
            .and_then(|snapshot| snapshot.to_json())
            .map_err(js_error)
    }
}
