//! Extension FSMs — cooperative long operations.
//!
//! Operations that cannot fit in one guest slice (block copy, multiply,
//! GT1 loading, ...) run as finite state machines. Starting one parks
//! its parameters in the zero page, points `vCpuSelect` at the owning
//! FSM page, and yields; on every subsequent slice the video driver
//! re-enters here and the machine advances exactly one bounded step,
//! tracked by `fsmState`. On completion the FSM hands `vCpuSelect` back
//! to the vCPU page.
//!
//! Every step checks the remaining tick budget against its own worst
//! case first and yields without committing anything when it does not
//! fit, so steps are restartable.

pub mod blit;
pub mod copy;
pub mod exec;
pub mod fill;
pub mod float;
pub mod longword;
pub mod math;
pub mod virq;

use crate::core::Gigatron;
use crate::core::ram::zp;
use crate::vcpu::VCPU_PAGE;

/// `vCpuSelect` values of the FSM pages.
pub const FSM14_PAGE: u8 = 0x14; // multiply / divide / decimal
pub const FSM18_PAGE: u8 = 0x18; // copy / exec / GT1z
pub const FSM1A_PAGE: u8 = 0x1a; // long add/sub
pub const FSM1B_PAGE: u8 = 0x1b; // long logic
pub const FSM1C_PAGE: u8 = 0x1c; // long shifts
pub const FSM1D_PAGE: u8 = 0x1d; // float load
pub const FSM1E_PAGE: u8 = 0x1e; // float store
pub const FSM21_PAGE: u8 = 0x21; // vIRQ and context save/restore
pub const FSM22_PAGE: u8 = 0x22; // fill
pub const FSM23_PAGE: u8 = 0x23; // blit

/// Park `vCpuSelect` on an FSM page with the given entry state.
pub(crate) fn enter(core: &mut Gigatron, page: u8, state: u8) {
    core.set_zp(zp::V_CPU_SELECT, page);
    core.set_zp(zp::FSM_STATE, state);
}

/// Return control to the vCPU.
pub(crate) fn leave(core: &mut Gigatron) {
    core.set_zp(zp::V_CPU_SELECT, VCPU_PAGE);
}

/// Advance the FSM selected by `page` by one step within `ticks`.
pub(crate) fn step(core: &mut Gigatron, page: u8, ticks: i32) {
    match page {
        FSM14_PAGE => math::step(core, ticks),
        FSM18_PAGE => {
            // The copy/move page also hosts the Exec loader and the GT1z
            // decompressor; fsmState ranges keep them apart.
            let state = core.zp(zp::FSM_STATE);
            if state < exec::ST_FIRST {
                copy::step(core, ticks)
            } else {
                exec::step(core, ticks)
            }
        }
        FSM1A_PAGE | FSM1B_PAGE | FSM1C_PAGE => longword::step(core, page, ticks),
        FSM1D_PAGE | FSM1E_PAGE => float::step(core, page, ticks),
        FSM21_PAGE => virq::step(core, ticks),
        FSM22_PAGE => fill::step(core, ticks),
        FSM23_PAGE => blit::step(core, ticks),
        // Unknown page: no interpreter lives there, the slice burns.
        _ => {}
    }
}
