//! FSM1D/1E — floating point accumulator staging.
//!
//! The external number format is the 5-byte layout used by classic
//! microcomputer BASICs: a bias-128 exponent byte, then 32 mantissa
//! bits with the sign replacing the redundant leading one of the top
//! byte. Internally the accumulator keeps the sign in vFAS, the
//! exponent in vFAE, and an explicit 40-bit mantissa in vLAX with the
//! leading one restored at bit 39, which gives the arithmetic helpers
//! eight guard bits to work with.

use super::{enter, leave, FSM1D_PAGE, FSM1E_PAGE};
use crate::core::Gigatron;
use crate::core::ram::zp;

pub const ST_LOAD: u8 = 0x02;
pub const ST_STORE: u8 = 0x04;

const STEP_TICKS: i32 = 30;

pub(crate) fn begin_load(core: &mut Gigatron) {
    enter(core, FSM1D_PAGE, ST_LOAD);
}

pub(crate) fn begin_store(core: &mut Gigatron) {
    enter(core, FSM1E_PAGE, ST_STORE);
}

pub(crate) fn step(core: &mut Gigatron, _page: u8, ticks: i32) {
    if ticks < STEP_TICKS {
        return;
    }
    match core.zp(zp::FSM_STATE) {
        ST_LOAD => step_load(core),
        ST_STORE => step_store(core),
        _ => leave(core),
    }
}

fn step_load(core: &mut Gigatron) {
    let base = core.vac();
    let exp = core.rd(base);
    if exp == 0 {
        // True zero: everything cleared.
        core.set_zp(zp::V_FAE, 0);
        core.set_zp(zp::V_FAS, 0);
        for k in 0..5 {
            core.set_zp(zp::V_LAX + k, 0);
        }
        leave(core);
        return;
    }
    let top = core.rd(base.wrapping_add(1));
    core.set_zp(zp::V_FAE, exp);
    core.set_zp(zp::V_FAS, top & 0x80);
    core.set_zp(zp::V_LAX + 4, 0x80 | (top & 0x7f));
    for k in 0..3u16 {
        let b = core.rd(base.wrapping_add(2 + k));
        core.set_zp(zp::V_LAX + 3 - k as u8, b);
    }
    core.set_zp(zp::V_LAX, 0);
    leave(core);
}

fn step_store(core: &mut Gigatron) {
    let base = core.vac();
    let exp = core.zp(zp::V_FAE);
    if exp == 0 || core.zp(zp::V_LAX + 4) & 0x80 == 0 {
        // Zero or denormal mantissa stores as true zero.
        for k in 0..5u16 {
            core.wr(base.wrapping_add(k), 0);
        }
        leave(core);
        return;
    }
    core.wr(base, exp);
    let top = (core.zp(zp::V_FAS) & 0x80) | (core.zp(zp::V_LAX + 4) & 0x7f);
    core.wr(base.wrapping_add(1), top);
    for k in 0..3u16 {
        let b = core.zp(zp::V_LAX + 3 - k as u8);
        core.wr(base.wrapping_add(2 + k), b);
    }
    leave(core);
}
