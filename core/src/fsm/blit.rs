//! FSM23 — rectangular screen-to-screen copy.
//!
//! The screen is one page per scanline, so a w x h blit copies w bytes,
//! then advances both pointers to the next page. Parameters: vT3
//! source, vT2 destination, sysArgs[6] width, sysArgs[7] rows left,
//! sysArgs[4] progress within the current row.

use super::{enter, leave, FSM23_PAGE};
use crate::core::Gigatron;
use crate::core::ram::zp;

pub const ST_BLIT: u8 = 0x02;

const STEP_OVERHEAD_TICKS: i32 = 8;
const PER_BYTE_TICKS: i32 = 2;
const MAX_BURST: u16 = 32;

pub(crate) fn begin(core: &mut Gigatron) {
    core.set_zp(zp::SYS_ARGS + 4, 0);
    enter(core, FSM23_PAGE, ST_BLIT);
}

pub(crate) fn step(core: &mut Gigatron, ticks: i32) {
    let rows = core.zp(zp::SYS_ARGS + 7);
    if rows == 0 {
        leave(core);
        return;
    }
    let w = core.zp(zp::SYS_ARGS + 6) as u16;
    let done = core.zp(zp::SYS_ARGS + 4) as u16;
    let budget = (ticks - STEP_OVERHEAD_TICKS) / PER_BYTE_TICKS;
    if budget < 1 {
        return;
    }
    let n = w.saturating_sub(done).min(budget as u16).min(MAX_BURST);

    let mut src = core.var16(zp::V_T3);
    let mut dst = core.var16(zp::V_T2);
    for _ in 0..n {
        let b = core.rd(src);
        core.wr(dst, b);
        src = src.wrapping_add(1);
        dst = dst.wrapping_add(1);
    }

    if done + n == w {
        // Row finished: hop to the same x on the next scanline page.
        src = src.wrapping_add(0x0100 - w);
        dst = dst.wrapping_add(0x0100 - w);
        core.set_zp(zp::SYS_ARGS + 4, 0);
        core.set_zp(zp::SYS_ARGS + 7, rows - 1);
        if rows == 1 {
            core.set_var16(zp::V_T3, src);
            core.set_var16(zp::V_T2, dst);
            leave(core);
            return;
        }
    } else {
        core.set_zp(zp::SYS_ARGS + 4, (done + n) as u8);
    }
    core.set_var16(zp::V_T3, src);
    core.set_var16(zp::V_T2, dst);
}
