/// What the memory subsystem needs from the display device. Both values are
/// queried on every video RAM access and never cached.
pub trait Display {
    /// Offset of the active bank into the video RAM buffer.
    fn video_offset(&self) -> u16;

    /// False while the renderer holds video RAM for a scanline transfer.
    fn video_writable(&self) -> bool;
}

pub const VRAM_BANK_SIZE: u16 = 0x2000;

pub const CHARACTER_DATA_BASE: u16 = 0x8000;
pub const BACKGROUND1_BASE: u16 = 0x9800;
pub const BACKGROUND2_BASE: u16 = 0x9C00;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LcdMode {
    HBlank,
    VBlank,
    OamScan,
    Transfer,
}

/// A named window into video RAM, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRegion {
    pub base: u16,
}

impl TileRegion {
    pub const fn new(base: u16) -> Self {
        Self { base }
    }

    /// Offset of the region inside a video RAM bank.
    pub fn bank_offset(&self) -> u16 {
        self.base - CHARACTER_DATA_BASE
    }
}

/// Display-device state owned by the machine. The renderer drives `mode` and
/// the VRAM bank select; memory only queries it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayState {
    pub character: TileRegion,
    pub background1: TileRegion,
    pub background2: TileRegion,
    mode: LcdMode,
    vram_bank: u8,
}

impl DisplayState {
    pub fn new() -> Self {
        Self {
            character: TileRegion::new(CHARACTER_DATA_BASE),
            background1: TileRegion::new(BACKGROUND1_BASE),
            background2: TileRegion::new(BACKGROUND2_BASE),
            mode: LcdMode::HBlank,
            vram_bank: 0,
        }
    }

    pub fn mode(&self) -> LcdMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: LcdMode) {
        self.mode = mode;
    }

    pub fn vram_bank(&self) -> u8 {
        self.vram_bank
    }

    pub fn set_vram_bank(&mut self, bank: u8) {
        self.vram_bank = bank & 0x01;
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for DisplayState {
    fn video_offset(&self) -> u16 {
        self.vram_bank as u16 * VRAM_BANK_SIZE
    }

    fn video_writable(&self) -> bool {
        self.mode != LcdMode::Transfer
    }
}
