//! FSM14 — multiply, divide, and decimal conversion.
//!
//! Zero page usage while in flight:
//!   MULW:  vT2 product accumulator, vT3 shifted multiplicand,
//!          vAC multiplier (consumed), sysArgs[6] bits remaining.
//!   DIVW:  vT2 quotient, vT3 remainder, vAC dividend (consumed),
//!          sysArgs[4:5] divisor, sysArgs[6] bits remaining.
//!   CONVD: vT3 destination pointer, sysArgs[3..8] BCD digits,
//!          vTmp bits remaining.

use super::{enter, leave, FSM14_PAGE};
use crate::core::Gigatron;
use crate::core::ram::zp;

pub const ST_MUL: u8 = 0x02;
pub const ST_DIV: u8 = 0x04;
pub const ST_CONV: u8 = 0x06;
pub const ST_CONV_STORE: u8 = 0x08;

/// Bits processed per step; four keeps the worst case well inside a
/// minimal slice.
const BITS_PER_STEP: u8 = 4;
const STEP_TICKS: i32 = 28;

pub(crate) fn begin_mulw(core: &mut Gigatron, d: u8) {
    let m = core.var16(d);
    core.set_var16(zp::V_T2, 0);
    core.set_var16(zp::V_T3, m);
    core.set_zp(zp::SYS_ARGS + 6, 16);
    enter(core, FSM14_PAGE, ST_MUL);
}

pub(crate) fn begin_divw(core: &mut Gigatron, d: u8) {
    let m = core.var16(d);
    core.set_var16(zp::V_T2, 0);
    core.set_var16(zp::V_T3, 0);
    core.set_zp(zp::SYS_ARGS + 4, m as u8);
    core.set_zp(zp::SYS_ARGS + 5, (m >> 8) as u8);
    core.set_zp(zp::SYS_ARGS + 6, 16);
    enter(core, FSM14_PAGE, ST_DIV);
}

pub(crate) fn begin_convd(core: &mut Gigatron, d: u8) {
    let dest = core.var16(d);
    begin_convd_at(core, dest);
}

pub(crate) fn begin_convd_at(core: &mut Gigatron, dest: u16) {
    core.set_var16(zp::V_T3, dest);
    for k in 0..5 {
        core.set_zp(zp::SYS_ARGS + 3 + k, 0);
    }
    core.set_zp(zp::V_TMP, 16);
    enter(core, FSM14_PAGE, ST_CONV);
}

pub(crate) fn step(core: &mut Gigatron, ticks: i32) {
    if ticks < STEP_TICKS {
        return;
    }
    match core.zp(zp::FSM_STATE) {
        ST_MUL => step_mul(core),
        ST_DIV => step_div(core),
        ST_CONV => step_conv(core),
        ST_CONV_STORE => step_conv_store(core),
        _ => leave(core),
    }
}

fn step_mul(core: &mut Gigatron) {
    let mut acc = core.var16(zp::V_T2);
    let mut m = core.var16(zp::V_T3);
    let mut q = core.vac();
    for _ in 0..BITS_PER_STEP {
        if q & 1 != 0 {
            acc = acc.wrapping_add(m);
        }
        m <<= 1;
        q >>= 1;
    }
    core.set_var16(zp::V_T2, acc);
    core.set_var16(zp::V_T3, m);
    core.set_vac(q);

    let left = core.zp(zp::SYS_ARGS + 6).saturating_sub(BITS_PER_STEP);
    core.set_zp(zp::SYS_ARGS + 6, left);
    if left == 0 {
        core.set_vac(acc);
        leave(core);
    }
}

fn step_div(core: &mut Gigatron) {
    let mut q = core.var16(zp::V_T2);
    let mut rem = core.var16(zp::V_T3);
    let mut dividend = core.vac();
    let divisor = core.zp(zp::SYS_ARGS + 4) as u16
        | (core.zp(zp::SYS_ARGS + 5) as u16) << 8;
    for _ in 0..BITS_PER_STEP {
        rem = rem << 1 | dividend >> 15;
        dividend <<= 1;
        if rem >= divisor {
            rem = rem.wrapping_sub(divisor);
            q = q << 1 | 1;
        } else {
            q <<= 1;
        }
    }
    core.set_var16(zp::V_T2, q);
    core.set_var16(zp::V_T3, rem);
    core.set_vac(dividend);

    let left = core.zp(zp::SYS_ARGS + 6).saturating_sub(BITS_PER_STEP);
    core.set_zp(zp::SYS_ARGS + 6, left);
    if left == 0 {
        // Quotient to vAC, remainder stays readable in vT2.
        core.set_vac(q);
        core.set_var16(zp::V_T2, rem);
        leave(core);
    }
}

/// Double-dabble: shift vAC through five BCD digits, adding 3 to any
/// digit that is 5 or more before each shift.
fn step_conv(core: &mut Gigatron) {
    let mut ac = core.vac();
    for _ in 0..BITS_PER_STEP {
        for k in 0..5 {
            let d = core.zp(zp::SYS_ARGS + 3 + k);
            if d >= 5 {
                core.set_zp(zp::SYS_ARGS + 3 + k, d + 3);
            }
        }
        let mut carry = (ac >> 15) as u8;
        ac <<= 1;
        for k in 0..5 {
            let d = core.zp(zp::SYS_ARGS + 3 + k) << 1 | carry;
            carry = d >> 4;
            core.set_zp(zp::SYS_ARGS + 3 + k, d & 0x0f);
        }
    }
    core.set_vac(ac);

    let left = core.zp(zp::V_TMP).saturating_sub(BITS_PER_STEP);
    core.set_zp(zp::V_TMP, left);
    if left == 0 {
        core.set_zp(zp::FSM_STATE, ST_CONV_STORE);
    }
}

/// Write the digits as ASCII, most significant first.
fn step_conv_store(core: &mut Gigatron) {
    let dest = core.var16(zp::V_T3);
    for k in 0..5u16 {
        let digit = core.zp(zp::SYS_ARGS + 3 + (4 - k) as u8);
        core.wr(dest.wrapping_add(k), b'0' + digit);
    }
    leave(core);
}
