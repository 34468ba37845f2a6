//! VGA timing constants and the OUT register bit layout.
//!
//! The hardware runs a 6.25 MHz clock against 640x480@60 VGA timing at a
//! quarter of the pixel rate, so every horizontal parameter is the VGA
//! value divided by four:
//!
//!   hTotal: 800/4 = 200 cycles  (front 16/4, pulse 96/4, back 48/4,
//!   visible 640/4)
//!
//! Vertically the frame runs 521 lines instead of the nominal 525, which
//! real monitors tolerate. The 8-bit OUT register carries both color and
//! sync:
//!
//! | Bits | Meaning              |
//! |------|----------------------|
//! | 0-1  | Red (2 bpp)          |
//! | 2-3  | Green                |
//! | 4-5  | Blue                 |
//! | 6    | hSync (active low)   |
//! | 7    | vSync (active low)   |

/// Native CPU clock in Hz (160 ns per cycle).
pub const CPU_CLOCK_HZ: u64 = 6_250_000;

/// Exactly 200 cycles per scanline, no exceptions.
pub const CYCLES_PER_LINE: u32 = 200;

/// Exactly 521 scanlines per frame.
pub const LINES_PER_FRAME: u16 = 521;

/// Horizontal front porch / sync pulse / back porch, in cycles.
pub const H_FRONT: u32 = 4;
pub const H_PULSE: u32 = 24;
pub const H_BACK: u32 = 12;

/// Cycles of horizontal blanking preceding the pixel burst. The audio
/// channel update and the scanline dispatch run inside this window.
pub const H_BLANK: u32 = H_FRONT + H_PULSE + H_BACK;

/// The visible pixel burst: one OUT write per cycle.
pub const PIXEL_BURST: u32 = 160;

/// Vertical blank region at the top of each frame.
pub const V_BLANK_LINES: u16 = 40;

/// vSync is held low for the first lines of the blank region.
pub const V_PULSE_LINES: u16 = 8;

/// Visible raster: 120 pixel rows, each emitted on 4 scanlines.
pub const VISIBLE_ROWS: u16 = 120;
pub const SUB_LINES_PER_ROW: u16 = 4;

/// Display resolution seen by the frontend.
pub const DISPLAY_WIDTH: u32 = 160;
pub const DISPLAY_HEIGHT: u32 = 120;

/// OUT register sync bits, active low.
pub const OUT_HSYNC: u8 = 0x40;
pub const OUT_VSYNC: u8 = 0x80;

/// Both sync lines idle (high).
pub const SYNC_IDLE: u8 = OUT_HSYNC | OUT_VSYNC;

/// Expand a 2:2:2 pixel byte to 8-bit RGB channels.
#[inline]
pub fn rgb(pixel: u8) -> (u8, u8, u8) {
    const LEVELS: [u8; 4] = [0, 85, 170, 255];
    (
        LEVELS[(pixel & 0x03) as usize],
        LEVELS[((pixel >> 2) & 0x03) as usize],
        LEVELS[((pixel >> 4) & 0x03) as usize],
    )
}
