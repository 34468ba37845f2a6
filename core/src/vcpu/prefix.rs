//! PREFIX35 — the two-byte opcode space.
//!
//! Opcode 0x35 dispatches a second table keyed on the following byte.
//! The conditional branches live here at their classic sub-opcode
//! values; the v7 extensions (long arithmetic, floating point staging,
//! copy/fill/blit, comparisons, context save/restore) fill the free
//! slots. Operations too big for one slice only *start* here: the
//! handler parks its parameters, points `vCpuSelect` at the owning FSM
//! page, and returns; the video driver steps the FSM on subsequent
//! slices.

use crate::core::Gigatron;
use crate::core::ram::zp;
use crate::fsm;

/// Sub-opcode bytes of the PREFIX35 table.
pub mod pfx {
    // Conditional branches (classic values). All test signed vAC.
    pub const BEQ: u8 = 0x3f;
    pub const BGT: u8 = 0x4d;
    pub const BLT: u8 = 0x50;
    pub const BGE: u8 = 0x53;
    pub const BLE: u8 = 0x56;
    pub const BNE: u8 = 0x72;

    // Multiply / divide / decimal conversion (FSM14).
    pub const MULW: u8 = 0x0c;
    pub const DIVW: u8 = 0x0e;
    pub const CONVD: u8 = 0x10;

    // Block operations.
    pub const COPY: u8 = 0x14; // FSM18
    pub const COPYN: u8 = 0x16; // FSM18
    pub const FILL: u8 = 0x18; // FSM22
    pub const BLIT: u8 = 0x1a; // FSM23

    // Long accumulator (vLAC).
    pub const LDLAC: u8 = 0x20;
    pub const STLAC: u8 = 0x22;
    pub const LADD: u8 = 0x24; // FSM1A
    pub const LSUB: u8 = 0x26; // FSM1A
    pub const LNEG: u8 = 0x28;
    pub const LAND: u8 = 0x2a; // FSM1B
    pub const LOR: u8 = 0x2c; // FSM1B
    pub const LXOR: u8 = 0x2e; // FSM1B
    pub const LSLN: u8 = 0x30; // FSM1C
    pub const LSRN: u8 = 0x32; // FSM1C

    // Floating point accumulator staging (FSM1D/FSM1E).
    pub const LDFAC: u8 = 0x40;
    pub const STFAC: u8 = 0x42;

    // Word comparisons, result in vAC as -1/0/+1.
    pub const CMPWS: u8 = 0x5a;
    pub const CMPWU: u8 = 0x5c;
    pub const CMPIS: u8 = 0x5e;
    pub const CMPIU: u8 = 0x60;

    // Context save/restore (FSM21).
    pub const VSAVE: u8 = 0x76;
    pub const VRESTORE: u8 = 0x78;

    // Add signed immediate to a zero page word.
    pub const ADDSV: u8 = 0x7a;
}

impl Gigatron {
    /// Dispatch a PREFIX35 sub-opcode. `pc` still addresses the 0x35
    /// byte; the baseline advance of 2 consumes it and the sub-opcode,
    /// handlers bump once more per extra operand byte.
    pub(crate) fn vcpu_execute_prefix(&mut self, sub: u8, pc: u16) -> u32 {
        match sub {
            // --- Conditional branches: [0x35, cc, off] ---
            pfx::BEQ => {
                let o = self.vcpu_operand(pc, 2);
                let ac = self.vac() as i16;
                self.branch_if(o, ac == 0)
            }
            pfx::BNE => {
                let o = self.vcpu_operand(pc, 2);
                let ac = self.vac() as i16;
                self.branch_if(o, ac != 0)
            }
            pfx::BGT => {
                let o = self.vcpu_operand(pc, 2);
                let ac = self.vac() as i16;
                self.branch_if(o, ac > 0)
            }
            pfx::BGE => {
                let o = self.vcpu_operand(pc, 2);
                let ac = self.vac() as i16;
                self.branch_if(o, ac >= 0)
            }
            pfx::BLT => {
                let o = self.vcpu_operand(pc, 2);
                let ac = self.vac() as i16;
                self.branch_if(o, ac < 0)
            }
            pfx::BLE => {
                let o = self.vcpu_operand(pc, 2);
                let ac = self.vac() as i16;
                self.branch_if(o, ac <= 0)
            }

            // --- Multiply / divide / decimal (FSM14) ---
            pfx::MULW => {
                let d = self.vcpu_operand(pc, 2);
                self.vpc_step(1);
                fsm::math::begin_mulw(self, d);
                24
            }
            pfx::DIVW => {
                let d = self.vcpu_operand(pc, 2);
                self.vpc_step(1);
                fsm::math::begin_divw(self, d);
                24
            }
            pfx::CONVD => {
                let d = self.vcpu_operand(pc, 2);
                self.vpc_step(1);
                fsm::math::begin_convd(self, d);
                24
            }

            // --- Block operations ---
            pfx::COPY => {
                let count = self.vac();
                fsm::copy::begin_copy(self, count);
                22
            }
            pfx::COPYN => {
                let n = self.vcpu_operand(pc, 2);
                self.vpc_step(1);
                let count = if n == 0 { 256 } else { n as u16 };
                fsm::copy::begin_copy(self, count);
                24
            }
            pfx::FILL => {
                fsm::fill::begin(self);
                22
            }
            pfx::BLIT => {
                fsm::blit::begin(self);
                22
            }

            // --- Long accumulator ---
            pfx::LDLAC => self.op_ldlac(),
            pfx::STLAC => self.op_stlac(),
            pfx::LNEG => self.op_lneg(),
            pfx::LADD => {
                fsm::longword::begin(self, fsm::longword::OP_ADD);
                22
            }
            pfx::LSUB => {
                fsm::longword::begin(self, fsm::longword::OP_SUB);
                22
            }
            pfx::LAND => {
                fsm::longword::begin(self, fsm::longword::OP_AND);
                22
            }
            pfx::LOR => {
                fsm::longword::begin(self, fsm::longword::OP_OR);
                22
            }
            pfx::LXOR => {
                fsm::longword::begin(self, fsm::longword::OP_XOR);
                22
            }
            pfx::LSLN => {
                let n = self.vcpu_operand(pc, 2);
                self.vpc_step(1);
                fsm::longword::begin_shift(self, n, false);
                24
            }
            pfx::LSRN => {
                let n = self.vcpu_operand(pc, 2);
                self.vpc_step(1);
                fsm::longword::begin_shift(self, n, true);
                24
            }

            // --- Floating point staging ---
            pfx::LDFAC => {
                fsm::float::begin_load(self);
                22
            }
            pfx::STFAC => {
                fsm::float::begin_store(self);
                22
            }

            // --- Comparisons ---
            pfx::CMPWS => {
                let d = self.vcpu_operand(pc, 2);
                self.vpc_step(1);
                let a = self.vac() as i16 as i32;
                let b = self.var16(d) as i16 as i32;
                self.set_vac((a - b).signum() as i16 as u16);
                28
            }
            pfx::CMPWU => {
                let d = self.vcpu_operand(pc, 2);
                self.vpc_step(1);
                let a = self.vac() as i32;
                let b = self.var16(d) as i32;
                self.set_vac((a - b).signum() as i16 as u16);
                28
            }
            pfx::CMPIS => {
                let i = self.vcpu_operand(pc, 2);
                self.vpc_step(1);
                let a = self.vac() as i16 as i32;
                self.set_vac((a - i as i32).signum() as i16 as u16);
                26
            }
            pfx::CMPIU => {
                let i = self.vcpu_operand(pc, 2);
                self.vpc_step(1);
                let a = self.vac() as i32;
                self.set_vac((a - i as i32).signum() as i16 as u16);
                26
            }

            // --- Context save/restore ---
            pfx::VSAVE => {
                fsm::virq::begin_vsave(self);
                22
            }
            pfx::VRESTORE => {
                fsm::virq::begin_vrestore(self);
                22
            }

            // --- ADDSV: [0x35, 0x7a, d, imm] ---
            pfx::ADDSV => {
                let d = self.vcpu_operand(pc, 2);
                let i = self.vcpu_operand(pc, 3);
                self.vpc_step(2);
                let v = self.var16(d).wrapping_add(i as i8 as u16);
                self.set_var16(d, v);
                30
            }

            // Unpopulated sub-opcode: dead stop, same as an unassigned
            // primary opcode.
            _ => {
                self.vpc_step(-2);
                28
            }
        }
    }

    /// LDLAC - vLAC = 32-bit little-endian word at [vAC].
    fn op_ldlac(&mut self) -> u32 {
        let base = self.vac();
        for k in 0..4u16 {
            let v = self.rd(base.wrapping_add(k));
            self.set_zp(zp::V_LAC + k as u8, v);
        }
        30
    }

    /// STLAC - 32-bit word at [vAC] = vLAC.
    fn op_stlac(&mut self) -> u32 {
        let base = self.vac();
        for k in 0..4u16 {
            let v = self.zp(zp::V_LAC + k as u8);
            self.wr(base.wrapping_add(k), v);
        }
        30
    }

    /// LNEG - Two's complement of vLAC.
    fn op_lneg(&mut self) -> u32 {
        let v = self.lac().wrapping_neg();
        self.set_lac(v);
        30
    }

    /// The 32-bit long accumulator as one value.
    pub(crate) fn lac(&self) -> u32 {
        (0..4).fold(0u32, |acc, k| {
            acc | (self.zp(zp::V_LAC + k) as u32) << (8 * k)
        })
    }

    pub(crate) fn set_lac(&mut self, v: u32) {
        for k in 0..4 {
            self.set_zp(zp::V_LAC + k, (v >> (8 * k)) as u8);
        }
    }
}
