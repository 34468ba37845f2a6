//! FSM21 — vIRQ delivery and context save/restore.
//!
//! Delivery runs at start of frame only (the video driver calls
//! [`deliver`]), so it can never race another FSM: whatever interpreter
//! was active is captured in the saved context and resumes on return.
//! The handler finishes with a plain RET; vLR points at the vRTI stub
//! in page 1, whose opcode restores the context inline so the
//! interrupted program can resume within the same slice.
//!
//! VSAVE/VRESTORE use the same machinery against a caller-provided
//! 16-byte block, giving guests cooperative context switching.

use super::{enter, leave, FSM21_PAGE};
use crate::core::Gigatron;
use crate::core::ram::{p1, warm_pc, zp};
use crate::vcpu::VCPU_PAGE;

pub const ST_DELIVER: u8 = 0x02;
pub const ST_VSAVE: u8 = 0x04;
pub const ST_VRESTORE: u8 = 0x06;

const STEP_TICKS: i32 = 30;

/// Begin vIRQ delivery. The current interpreter selection is captured
/// first; the save step owns the rest.
pub(crate) fn deliver(core: &mut Gigatron) {
    let select = core.zp(zp::V_CPU_SELECT);
    core.set_zp(zp::V_IRQ_SAVE + 6, select);
    enter(core, FSM21_PAGE, ST_DELIVER);
}

/// True while an earlier delivery has not returned yet.
pub(crate) fn in_handler(core: &Gigatron) -> bool {
    core.zp(zp::V_IRQ_SAVE + 6) != 0
}

pub(crate) fn begin_vsave(core: &mut Gigatron) {
    enter(core, FSM21_PAGE, ST_VSAVE);
}

pub(crate) fn begin_vrestore(core: &mut Gigatron) {
    enter(core, FSM21_PAGE, ST_VRESTORE);
}

pub(crate) fn step(core: &mut Gigatron, ticks: i32) {
    if ticks < STEP_TICKS {
        return;
    }
    match core.zp(zp::FSM_STATE) {
        ST_DELIVER => step_deliver(core),
        ST_VSAVE => step_vsave(core),
        ST_VRESTORE => step_vrestore(core),
        _ => leave(core),
    }
}

fn step_deliver(core: &mut Gigatron) {
    let vpc = core.vpc();
    let vac = core.vac();
    let vlr = core.vlr();
    core.set_var16(zp::V_IRQ_SAVE, vpc);
    core.set_var16(zp::V_IRQ_SAVE + 2, vac);
    core.set_var16(zp::V_IRQ_SAVE + 4, vlr);
    // The select byte was stashed at delivery time.

    let ctx = core.zp(zp::V_IRQ_CTX);
    if ctx != 0 {
        // ctx-style: mirror the context into the caller's page.
        let base = (ctx as u16) << 8 | 0xf0;
        for k in 0..7u16 {
            let b = core.zp(zp::V_IRQ_SAVE + k as u8);
            core.wr(base.wrapping_add(k), b);
        }
    }

    let handler = core.deek_word(p1::V_IRQ);
    core.set_vpc(warm_pc(handler));
    core.set_vlr(p1::V_RTI);
    core.set_zp(zp::V_CPU_SELECT, VCPU_PAGE);
}

impl Gigatron {
    /// Inline restore behind the vRTI stub opcode.
    pub(crate) fn virq_restore(&mut self) {
        let ctx = self.zp(zp::V_IRQ_CTX);
        if ctx != 0 {
            let base = (ctx as u16) << 8 | 0xf0;
            for k in 0..7u16 {
                let b = self.rd(base.wrapping_add(k));
                self.set_zp(zp::V_IRQ_SAVE + k as u8, b);
            }
        }
        let vpc = self.var16(zp::V_IRQ_SAVE);
        let vac = self.var16(zp::V_IRQ_SAVE + 2);
        let vlr = self.var16(zp::V_IRQ_SAVE + 4);
        let select = self.zp(zp::V_IRQ_SAVE + 6);
        self.set_vpc(vpc);
        self.set_vac(vac);
        self.set_vlr(vlr);
        self.set_zp(zp::V_CPU_SELECT, select);
        // Re-arm delivery.
        self.set_zp(zp::V_IRQ_SAVE + 6, 0);
    }
}

fn step_vsave(core: &mut Gigatron) {
    let base = core.vac();
    let words = [core.vpc(), core.vac(), core.vlr(), core.vsp()];
    for (k, w) in words.iter().enumerate() {
        core.wr(base.wrapping_add(2 * k as u16), *w as u8);
        core.wr(base.wrapping_add(2 * k as u16 + 1), (*w >> 8) as u8);
    }
    for k in 0..4u16 {
        let b = core.zp(zp::V_LAC + k as u8);
        core.wr(base.wrapping_add(8 + k), b);
    }
    for k in 0..4u16 {
        let b = core.zp(zp::V_T2 + k as u8); // vT2 then vT3
        core.wr(base.wrapping_add(12 + k), b);
    }
    leave(core);
}

fn step_vrestore(core: &mut Gigatron) {
    let base = core.vac();
    let mut words = [0u16; 4];
    for (k, w) in words.iter_mut().enumerate() {
        *w = core.rd(base.wrapping_add(2 * k as u16)) as u16
            | (core.rd(base.wrapping_add(2 * k as u16 + 1)) as u16) << 8;
    }
    for k in 0..4u16 {
        let b = core.rd(base.wrapping_add(8 + k));
        core.set_zp(zp::V_LAC + k as u8, b);
    }
    for k in 0..4u16 {
        let b = core.rd(base.wrapping_add(12 + k));
        core.set_zp(zp::V_T2 + k as u8, b);
    }
    core.set_vpc(words[0]);
    core.set_vac(words[1]);
    core.set_vlr(words[2]);
    core.set_vsp(words[3]);
    leave(core);
}
