//! FSM18 (exec half) — the GT1 loader and the GT1z decompressor.
//!
//! `SYS_Exec` streams a GT1 image out of ROM into RAM segment by
//! segment and finally redirects `vPC` to the image's entry point. A
//! stream opening with the 0x00 0x7a prefix is the compressed GT1z
//! form; its token scheme packs (nLit:3, mCnt:4, longOffset:1) per
//! token, with 7/15 escaping to a full count byte and short offsets
//! encoded relative to the current segment base. Matches copy from RAM
//! already written, so destinations may cross pages freely.
//!
//! Zero page usage while in flight:
//!   sysArgs[0:1] ROM read pointer        vT2 RAM write pointer
//!   plain: vT3 bytes left in segment
//!   GT1z:  vT3 match source, sysArgs[4] match left,
//!          sysArgs[5] literals left, sysArgs[6:7] segment base.

use super::{enter, leave, FSM18_PAGE};
use crate::core::Gigatron;
use crate::core::ram::{warm_pc, zp};

/// First fsmState value owned by this half of the page.
pub const ST_FIRST: u8 = 0x20;

pub const ST_SEG: u8 = 0x20;
pub const ST_DATA: u8 = 0x22;
pub const ST_Z_SEG: u8 = 0x30;
pub const ST_Z_TOKEN: u8 = 0x32;
pub const ST_Z_LIT: u8 = 0x34;
pub const ST_Z_MATCH: u8 = 0x36;

/// GT1z stream prefix. No useful plain GT1 starts with a zero-page
/// segment header, so the two bytes are unambiguous in practice.
pub const GT1Z_MAGIC: [u8; 2] = [0x00, 0x7a];

const STEP_OVERHEAD_TICKS: i32 = 8;
const PER_BYTE_TICKS: i32 = 2;
const MAX_BURST: u16 = 32;

/// Start executing the GT1 stream whose ROM address is in sysArgs[0:1].
pub(crate) fn begin(core: &mut Gigatron) {
    enter(core, FSM18_PAGE, ST_SEG);
}

pub(crate) fn step(core: &mut Gigatron, ticks: i32) {
    if ticks < STEP_OVERHEAD_TICKS + PER_BYTE_TICKS {
        return;
    }
    match core.zp(zp::FSM_STATE) {
        ST_SEG => step_seg(core),
        ST_DATA => step_data(core, ticks),
        ST_Z_SEG => step_z_seg(core),
        ST_Z_TOKEN => step_z_token(core),
        ST_Z_LIT => step_z_lit(core, ticks),
        ST_Z_MATCH => step_z_match(core, ticks),
        _ => leave(core),
    }
}

fn rom_ptr(core: &Gigatron) -> u16 {
    core.var16(zp::SYS_ARGS)
}

fn set_rom_ptr(core: &mut Gigatron, v: u16) {
    core.set_var16(zp::SYS_ARGS, v);
}

fn take_rom_byte(core: &mut Gigatron) -> u8 {
    let p = rom_ptr(core);
    let b = core.rom_read(p);
    set_rom_ptr(core, p.wrapping_add(1));
    b
}

/// Redirect vPC to the loaded image and hand control back.
fn finish(core: &mut Gigatron) {
    let hi = take_rom_byte(core);
    let lo = take_rom_byte(core);
    let exec = (hi as u16) << 8 | lo as u16;
    core.set_vpc(warm_pc(exec));
    leave(core);
}

fn step_seg(core: &mut Gigatron) {
    let p = rom_ptr(core);
    if core.rom_read(p) == GT1Z_MAGIC[0] && core.rom_read(p.wrapping_add(1)) == GT1Z_MAGIC[1] {
        set_rom_ptr(core, p.wrapping_add(2));
        core.set_zp(zp::FSM_STATE, ST_Z_SEG);
        return;
    }
    let hi = take_rom_byte(core);
    if hi == 0 {
        finish(core);
        return;
    }
    let lo = take_rom_byte(core);
    let n = take_rom_byte(core);
    let count = if n == 0 { 256 } else { n as u16 };
    core.set_var16(zp::V_T2, (hi as u16) << 8 | lo as u16);
    core.set_var16(zp::V_T3, count);
    core.set_zp(zp::FSM_STATE, ST_DATA);
}

fn step_data(core: &mut Gigatron, ticks: i32) {
    let count = core.var16(zp::V_T3);
    let budget = (ticks - STEP_OVERHEAD_TICKS) / PER_BYTE_TICKS;
    let n = count.min(budget.max(0) as u16).min(MAX_BURST);
    if n == 0 {
        return;
    }
    let mut dst = core.var16(zp::V_T2);
    for _ in 0..n {
        let b = take_rom_byte(core);
        core.wr(dst, b);
        dst = dst.wrapping_add(1);
    }
    core.set_var16(zp::V_T2, dst);
    core.set_var16(zp::V_T3, count - n);
    if count == n {
        core.set_zp(zp::FSM_STATE, ST_SEG);
    }
}

// ---- GT1z ----

fn step_z_seg(core: &mut Gigatron) {
    let hi = take_rom_byte(core);
    if hi == 0 {
        finish(core);
        return;
    }
    let lo = take_rom_byte(core);
    let addr = (hi as u16) << 8 | lo as u16;
    core.set_var16(zp::V_T2, addr);
    core.set_zp(zp::SYS_ARGS + 6, addr as u8);
    core.set_zp(zp::SYS_ARGS + 7, (addr >> 8) as u8);
    core.set_zp(zp::FSM_STATE, ST_Z_TOKEN);
}

fn step_z_token(core: &mut Gigatron) {
    let token = take_rom_byte(core);
    if token == 0 {
        core.set_zp(zp::FSM_STATE, ST_Z_SEG);
        return;
    }
    let mut nlit = token >> 5;
    let mut mcnt = (token >> 1) & 0x0f;
    let long_off = token & 1 != 0;
    if nlit == 7 {
        nlit = take_rom_byte(core);
    }
    if mcnt == 15 {
        mcnt = take_rom_byte(core);
    }
    core.set_zp(zp::SYS_ARGS + 5, nlit);
    core.set_zp(zp::SYS_ARGS + 4, mcnt);
    if mcnt > 0 {
        let src = if long_off {
            let lo = take_rom_byte(core);
            let hi = take_rom_byte(core);
            lo as u16 | (hi as u16) << 8
        } else {
            let off = take_rom_byte(core);
            let base = core.zp(zp::SYS_ARGS + 6) as u16
                | (core.zp(zp::SYS_ARGS + 7) as u16) << 8;
            base.wrapping_add(off as u16)
        };
        core.set_var16(zp::V_T3, src);
    }
    core.set_zp(
        zp::FSM_STATE,
        if nlit > 0 {
            ST_Z_LIT
        } else if mcnt > 0 {
            ST_Z_MATCH
        } else {
            ST_Z_TOKEN
        },
    );
}

fn step_z_lit(core: &mut Gigatron, ticks: i32) {
    let left = core.zp(zp::SYS_ARGS + 5) as u16;
    let budget = (ticks - STEP_OVERHEAD_TICKS) / PER_BYTE_TICKS;
    let n = left.min(budget.max(0) as u16).min(MAX_BURST);
    if n == 0 {
        return;
    }
    let mut dst = core.var16(zp::V_T2);
    for _ in 0..n {
        let b = take_rom_byte(core);
        core.wr(dst, b);
        dst = dst.wrapping_add(1);
    }
    core.set_var16(zp::V_T2, dst);
    core.set_zp(zp::SYS_ARGS + 5, (left - n) as u8);
    if left == n {
        let next = if core.zp(zp::SYS_ARGS + 4) > 0 {
            ST_Z_MATCH
        } else {
            ST_Z_TOKEN
        };
        core.set_zp(zp::FSM_STATE, next);
    }
}

fn step_z_match(core: &mut Gigatron, ticks: i32) {
    let left = core.zp(zp::SYS_ARGS + 4) as u16;
    let budget = (ticks - STEP_OVERHEAD_TICKS) / PER_BYTE_TICKS;
    let n = left.min(budget.max(0) as u16).min(MAX_BURST);
    if n == 0 {
        return;
    }
    let mut src = core.var16(zp::V_T3);
    let mut dst = core.var16(zp::V_T2);
    // Byte-at-a-time forward copy: overlapping matches replicate, the
    // way run-length matches rely on.
    for _ in 0..n {
        let b = core.rd(src);
        core.wr(dst, b);
        src = src.wrapping_add(1);
        dst = dst.wrapping_add(1);
    }
    core.set_var16(zp::V_T3, src);
    core.set_var16(zp::V_T2, dst);
    core.set_zp(zp::SYS_ARGS + 4, (left - n) as u8);
    if left == n {
        core.set_zp(zp::FSM_STATE, ST_Z_TOKEN);
    }
}
