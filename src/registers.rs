// Absolute addresses of the memory-mapped registers that carry side effects.
pub const REG_P1: u16 = 0xFF00;
pub const REG_DIV: u16 = 0xFF04;
pub const REG_NR52: u16 = 0xFF26;
pub const REG_DMA: u16 = 0xFF46;
pub const REG_KEY1: u16 = 0xFF4D;
pub const REG_HDMA1: u16 = 0xFF51;
pub const REG_HDMA2: u16 = 0xFF52;
pub const REG_HDMA3: u16 = 0xFF53;
pub const REG_HDMA4: u16 = 0xFF54;
pub const REG_HDMA5: u16 = 0xFF55;
pub const REG_IE: u16 = 0xFFFF;

pub const IO_BASE: u16 = 0xFF00;
/// One slot per offset from `IO_BASE`, which also covers `REG_IE`.
pub const IO_REGISTER_COUNT: usize = 0x100;

pub const OAM_BASE: u16 = 0xFE00;
pub const DMA_LENGTH: u16 = 160;
pub const DMA_CYCLES: u64 = 671;

/// Joypad matrix readout with every line high.
pub const JOYPAD_RELEASED: u8 = 0x0F;

pub fn io_offset(address: u16) -> usize {
    address.wrapping_sub(IO_BASE) as usize & (IO_REGISTER_COUNT - 1)
}
