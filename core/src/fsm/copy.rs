//! FSM18 (copy half) — bounded byte-block moves.
//!
//! Parameters while in flight: vT3 source pointer, vT2 destination
//! pointer, vAC bytes remaining. Pointers use full 16-bit arithmetic so
//! blocks may cross pages. The per-step burst is sized to the remaining
//! tick budget; a slice too small for even one byte yields without
//! committing, which is what makes the operation restartable.

use super::{enter, leave, FSM18_PAGE};
use crate::core::Gigatron;
use crate::core::ram::zp;

pub const ST_COPY: u8 = 0x02;

/// Ticks consumed before the first byte moves.
const STEP_OVERHEAD_TICKS: i32 = 6;
/// Ticks per byte moved.
const PER_BYTE_TICKS: i32 = 2;
/// Upper bound on one step's burst.
const MAX_BURST: u16 = 32;

pub(crate) fn begin_copy(core: &mut Gigatron, count: u16) {
    core.set_vac(count);
    enter(core, FSM18_PAGE, ST_COPY);
}

pub(crate) fn step(core: &mut Gigatron, ticks: i32) {
    match core.zp(zp::FSM_STATE) {
        ST_COPY => step_copy(core, ticks),
        _ => leave(core),
    }
}

fn step_copy(core: &mut Gigatron, ticks: i32) {
    let count = core.vac();
    if count == 0 {
        leave(core);
        return;
    }
    let budget = (ticks - STEP_OVERHEAD_TICKS) / PER_BYTE_TICKS;
    if budget < 1 {
        return;
    }
    let n = count.min(budget as u16).min(MAX_BURST);

    let mut src = core.var16(zp::V_T3);
    let mut dst = core.var16(zp::V_T2);
    for _ in 0..n {
        let b = core.rd(src);
        core.wr(dst, b);
        src = src.wrapping_add(1);
        dst = dst.wrapping_add(1);
    }
    core.set_var16(zp::V_T3, src);
    core.set_var16(zp::V_T2, dst);
    core.set_vac(count - n);
    if count == n {
        leave(core);
    }
}
