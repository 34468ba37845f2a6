//! FSM1A/1B/1C — 32-bit accumulator operations.
//!
//! Arithmetic (1A) and logic (1B) take their operand from [vAC] and
//! complete in a single bounded step. Shifts (1C) move up to eight bits
//! per slice, with the remaining count in vTmp.

use super::{enter, leave, FSM1A_PAGE, FSM1B_PAGE, FSM1C_PAGE};
use crate::core::Gigatron;
use crate::core::ram::zp;

pub const OP_ADD: u8 = 0x02;
pub const OP_SUB: u8 = 0x04;
pub const OP_AND: u8 = 0x06;
pub const OP_OR: u8 = 0x08;
pub const OP_XOR: u8 = 0x0a;
pub const ST_SHL: u8 = 0x0c;
pub const ST_SHR: u8 = 0x0e;

const STEP_TICKS: i32 = 30;
const BITS_PER_STEP: u8 = 8;

pub(crate) fn begin(core: &mut Gigatron, op: u8) {
    let page = match op {
        OP_ADD | OP_SUB => FSM1A_PAGE,
        _ => FSM1B_PAGE,
    };
    enter(core, page, op);
}

pub(crate) fn begin_shift(core: &mut Gigatron, n: u8, right: bool) {
    core.set_zp(zp::V_TMP, n);
    enter(core, FSM1C_PAGE, if right { ST_SHR } else { ST_SHL });
}

fn load_operand(core: &Gigatron) -> u32 {
    let base = core.vac();
    (0..4).fold(0u32, |acc, k| {
        acc | (core.rd(base.wrapping_add(k)) as u32) << (8 * k)
    })
}

pub(crate) fn step(core: &mut Gigatron, _page: u8, ticks: i32) {
    if ticks < STEP_TICKS {
        return;
    }
    let state = core.zp(zp::FSM_STATE);
    match state {
        OP_ADD | OP_SUB | OP_AND | OP_OR | OP_XOR => {
            let m = load_operand(core);
            let a = core.lac();
            let r = match state {
                OP_ADD => a.wrapping_add(m),
                OP_SUB => a.wrapping_sub(m),
                OP_AND => a & m,
                OP_OR => a | m,
                _ => a ^ m,
            };
            core.set_lac(r);
            leave(core);
        }
        ST_SHL | ST_SHR => {
            let left = core.zp(zp::V_TMP);
            let n = left.min(BITS_PER_STEP);
            let a = core.lac();
            let r = if state == ST_SHL { a << n } else { a >> n };
            core.set_lac(r);
            core.set_zp(zp::V_TMP, left - n);
            if left == n {
                leave(core);
            }
        }
        _ => leave(core),
    }
}
