//! ROM-embedded vCPU programs.
//!
//! Two small applications ship inside the ROM as GT1 streams. `Reset`
//! is what the reset stub ultimately executes: it restores the sound
//! table through the SYS surface and chains into `Loader`. `Loader`
//! drops the display to its sparsest scanline mode for bandwidth and
//! spins the serial protocol engine forever; a completed transfer
//! redirects vPC out of the loop.

use crate::core::ram::{self, zp, MODE_NO_PIXELS};
use crate::core::rom;
use crate::gt1::Gt1File;
use crate::sys::vector;
use crate::vcpu::asm::Asm;

/// Scratch pointer in guest variable space.
const TMP: u8 = zp::USER_VARS;

/// Entry addresses of the embedded programs.
pub const RESET_ENTRY: u16 = ram::USER_CODE;
pub const LOADER_ENTRY: u16 = 0x0300;

/// The Reset application as a GT1 stream.
pub fn reset_gt1() -> Vec<u8> {
    let mut a = Asm::new(RESET_ENTRY);

    // Unhide all pixel rows.
    a.ldwi(ram::p1::VIDEO_TOP).stw(TMP).ldi(0).poke(TMP);

    // All four sound channels audible, sound off until keyed.
    a.ldi(3).st(zp::CHANNEL_MASK);
    a.ldi(0).st(zp::SOUND_TIMER);

    // Rebuild the waveform table; the SYS call re-issues itself until
    // page 7 is complete.
    a.ldi(0).st(zp::SYS_ARGS + 7);
    a.ldwi(vector::RESET_WAVEFORMS).stw(zp::SYS_FN);
    a.sys(50);

    // Stir the freshly built noise waveform.
    a.ldwi(vector::SHUFFLE_NOISE).stw(zp::SYS_FN);
    a.sys(46);

    // Chain into the Loader through Exec; this never returns.
    a.ldwi(rom::LOADER_PAYLOAD).stw(zp::SYS_ARGS);
    a.ldwi(vector::EXEC).stw(zp::SYS_FN);
    a.sys(88);

    let code = a.into_bytes();
    let mut gt1 = Gt1File::new(RESET_ENTRY);
    gt1.push(RESET_ENTRY, &code);
    gt1.to_bytes()
}

/// The Loader application as a GT1 stream.
pub fn loader_gt1() -> Vec<u8> {
    let mut a = Asm::new(LOADER_ENTRY);

    // Scanline mode 3: three of four sub-lines go to the guest, which
    // is what keeps the payload cadence serviced.
    a.ldi(MODE_NO_PIXELS)
        .st(zp::VIDEO_MODE_B)
        .st(zp::VIDEO_MODE_C)
        .st(zp::VIDEO_MODE_D);

    // Fresh protocol engine: checksum clear, state = sync.
    a.ldi(0)
        .st(zp::SYS_ARGS + 2)
        .st(zp::SYS_ARGS + 4);

    a.ldwi(vector::LOADER_PROCESS_INPUT).stw(zp::SYS_FN);
    let poll = a.here();
    a.sys(48);
    a.bra(poll);

    let code = a.into_bytes();
    let mut gt1 = Gt1File::new(LOADER_ENTRY);
    gt1.push(LOADER_ENTRY, &code);
    gt1.to_bytes()
}
