//! FSM22 — bounded memory fill.
//!
//! Parameters: vT2 destination pointer, vT3 low byte the fill value,
//! vAC bytes remaining.

use super::{enter, leave, FSM22_PAGE};
use crate::core::Gigatron;
use crate::core::ram::zp;

pub const ST_FILL: u8 = 0x02;

const STEP_OVERHEAD_TICKS: i32 = 6;
const PER_BYTE_TICKS: i32 = 1;
const MAX_BURST: u16 = 48;

pub(crate) fn begin(core: &mut Gigatron) {
    enter(core, FSM22_PAGE, ST_FILL);
}

pub(crate) fn step(core: &mut Gigatron, ticks: i32) {
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
    let value = core.zp(zp::V_T3);
    let mut dst = core.var16(zp::V_T2);
    for _ in 0..n {
        core.wr(dst, value);
        dst = dst.wrapping_add(1);
    }
    core.set_var16(zp::V_T2, dst);
    core.set_vac(count - n);
    if count == n {
        leave(core);
    }
}
