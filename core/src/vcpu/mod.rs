//! vCPU — the 16-bit virtual processor.
//!
//! A bytecode interpreter whose register file lives in the zero page
//! (`vPC`, `vAC`, `vLR`, `vSP`). Dispatch is a straight table keyed on
//! the opcode byte; every handler has a declared cycle cost that the
//! central loop charges against `vTicks` (signed budget in 2-cycle
//! ticks). The loop exits when the budget goes negative or when an
//! instruction hands control to another interpreter through
//! `vCpuSelect`.
//!
//! Program counter discipline: `vPC` holds the address of the executing
//! instruction, and the dispatch loop pre-increments the *low byte* by
//! two before every fetch. Execution therefore never leaves a 256-byte
//! code page on its own; branch operands replace the low byte and are
//! encoded as target minus 2 so the pre-increment lands on the target.
//! One-byte instructions back the low byte up by one, three-byte
//! instructions advance it by one more.

pub mod asm;

mod alu;
mod branch;
mod indirect;
mod load_store;
pub(crate) mod prefix;
mod stack;

use crate::core::Gigatron;
use crate::core::ram::{next_in_page, zp};

/// `vCpuSelect` value of this interpreter (its classic dispatch page).
pub const VCPU_PAGE: u8 = 0x03;

/// Worst-case instruction cost in ticks; the slice entry reserves this.
/// (The v6502 has its own, larger figures in its module.)
pub const MAX_TICKS: i32 = 15;

/// Cycles the video driver reserves for re-entry on every slice.
pub const VCPU_OVERHEAD: u32 = 9;

/// Primary opcode bytes. The classic encodings keep their well-known
/// values; extensions sit in free slots (see DESIGN.md).
pub mod op {
    pub const LDWI: u8 = 0x11;
    pub const LD: u8 = 0x1a;
    pub const CMPHS: u8 = 0x1f;
    pub const LDW: u8 = 0x21;
    pub const STW: u8 = 0x2b;
    pub const PREFIX35: u8 = 0x35;
    pub const DEEKV: u8 = 0x3b;
    pub const RESET: u8 = 0x3d;
    pub const VRTI: u8 = 0x41;
    pub const LDI: u8 = 0x59;
    pub const ST: u8 = 0x5e;
    pub const POP: u8 = 0x63;
    pub const ADDV: u8 = 0x66;
    pub const SUBV: u8 = 0x68;
    pub const POKEA: u8 = 0x69;
    pub const DEEKA: u8 = 0x6f;
    pub const PUSH: u8 = 0x75;
    pub const PEEKV: u8 = 0x7b;
    pub const DOKEA: u8 = 0x7d;
    pub const LUP: u8 = 0x7f;
    pub const ANDI: u8 = 0x82;
    pub const CALLI: u8 = 0x85;
    pub const ORI: u8 = 0x88;
    pub const XORI: u8 = 0x8c;
    pub const BRA: u8 = 0x90;
    pub const INC: u8 = 0x93;
    pub const CMPHU: u8 = 0x97;
    pub const ADDW: u8 = 0x99;
    pub const PEEK: u8 = 0xad;
    pub const SYS: u8 = 0xb4;
    pub const SUBW: u8 = 0xb8;
    pub const DEF: u8 = 0xcd;
    pub const CALL: u8 = 0xcf;
    pub const ALLOC: u8 = 0xdf;
    pub const PEEKA: u8 = 0xe1;
    pub const ADDI: u8 = 0xe3;
    pub const SUBI: u8 = 0xe6;
    pub const LSLW: u8 = 0xe9;
    pub const STLW: u8 = 0xec;
    pub const LDLW: u8 = 0xee;
    pub const POKE: u8 = 0xf0;
    pub const DOKE: u8 = 0xf3;
    pub const DEEK: u8 = 0xf6;
    pub const ANDW: u8 = 0xf8;
    pub const ORW: u8 = 0xfa;
    pub const XORW: u8 = 0xfc;
    pub const RET: u8 = 0xff;
}

/// Declared cycle cost of a primary opcode, if it is one. `PREFIX35` and
/// `SYS` are variable; everything else is fixed and verified by the
/// timing tests.
pub fn declared_cost(opcode: u8) -> Option<u32> {
    let c = match opcode {
        op::LDWI => 20,
        op::LD => 22,
        op::CMPHS | op::CMPHU => 28,
        op::LDW | op::STW => 20,
        op::DEEKV | op::PEEKV => 28,
        op::RESET => 28,
        op::VRTI => 30,
        op::LDI => 16,
        op::ST => 16,
        op::POP | op::PUSH => 26,
        op::ADDV | op::SUBV => 30,
        op::POKEA | op::DOKEA | op::DEEKA | op::PEEKA => 28,
        op::LUP => 26,
        op::ANDI => 16,
        op::CALLI => 30,
        op::ORI | op::XORI => 14,
        op::BRA => 14,
        op::INC => 16,
        op::ADDW | op::SUBW | op::ANDW | op::ORW => 28,
        op::XORW => 26,
        op::PEEK => 26,
        op::DEF => 18,
        op::CALL => 26,
        op::ALLOC => 14,
        op::ADDI | op::SUBI | op::LSLW => 28,
        op::STLW | op::LDLW => 26,
        op::POKE | op::DOKE | op::DEEK => 28,
        op::RET => 16,
        _ => return None,
    };
    Some(c)
}

impl Gigatron {
    /// Run vCPU instructions until the tick budget runs out or control
    /// is handed to another interpreter. `ticks` has the `MAX_TICKS`
    /// reservation already deducted, so any single instruction may
    /// overshoot zero without exceeding the slice.
    pub(crate) fn vcpu_slice(&mut self, ticks: i32) {
        self.set_vticks(ticks);
        loop {
            let pc = self.vpc_step(2);
            let opcode = self.rd(pc);
            let cost = self.vcpu_execute(opcode, pc);
            let t = self.vticks() - (cost / 2) as i32;
            self.set_vticks(t);
            if t < 0 || self.halted {
                break;
            }
            if self.zp(zp::V_CPU_SELECT) != VCPU_PAGE {
                break;
            }
        }
    }

    /// Advance `vPC` by `d` within its page and return the new value.
    #[inline]
    pub(crate) fn vpc_step(&mut self, d: i8) -> u16 {
        let pc = self.vpc();
        let new = (pc & 0xff00) | (pc as u8).wrapping_add(d as u8) as u16;
        self.set_vpc(new);
        new
    }

    /// Operand byte `k` positions after the opcode, within the same page.
    #[inline]
    pub(crate) fn vcpu_operand(&self, pc: u16, k: u8) -> u8 {
        let mut addr = pc;
        for _ in 0..k {
            addr = next_in_page(addr);
        }
        self.rd(addr)
    }

    /// Replace the low byte of `vPC` (branch within the current page).
    #[inline]
    pub(crate) fn vpc_branch(&mut self, low: u8) {
        let pc = self.vpc();
        self.set_vpc((pc & 0xff00) | low as u16);
    }

    /// Full 16-bit word read/write used by the stack, which is the one
    /// structure allowed to cross pages (16-bit `vSP`).
    #[inline]
    pub(crate) fn rd16(&self, addr: u16) -> u16 {
        self.rd(addr) as u16 | (self.rd(addr.wrapping_add(1)) as u16) << 8
    }

    #[inline]
    pub(crate) fn wr16(&mut self, addr: u16, data: u16) {
        self.wr(addr, data as u8);
        self.wr(addr.wrapping_add(1), (data >> 8) as u8);
    }

    /// Zero-page word at `d`, wrapping within the zero page (the
    /// operand-addressed sibling of the named-register accessors).
    #[inline]
    pub(crate) fn var16(&self, d: u8) -> u16 {
        self.zp_word(d)
    }

    #[inline]
    pub(crate) fn set_var16(&mut self, d: u8, data: u16) {
        self.set_zp_word(d, data);
    }

    /// Execute one instruction; returns its cycle cost.
    fn vcpu_execute(&mut self, opcode: u8, pc: u16) -> u32 {
        match opcode {
            // --- Immediates and zero-page load/store ---
            op::LDWI => {
                let lo = self.vcpu_operand(pc, 1);
                let hi = self.vcpu_operand(pc, 2);
                self.vpc_step(1);
                self.op_ldwi(lo, hi)
            }
            op::LDI => {
                let i = self.vcpu_operand(pc, 1);
                self.op_ldi(i)
            }
            op::LD => {
                let d = self.vcpu_operand(pc, 1);
                self.op_ld(d)
            }
            op::LDW => {
                let d = self.vcpu_operand(pc, 1);
                self.op_ldw(d)
            }
            op::ST => {
                let d = self.vcpu_operand(pc, 1);
                self.op_st(d)
            }
            op::STW => {
                let d = self.vcpu_operand(pc, 1);
                self.op_stw(d)
            }
            op::INC => {
                let d = self.vcpu_operand(pc, 1);
                self.op_inc(d)
            }

            // --- Stack frame ---
            op::LDLW => {
                let o = self.vcpu_operand(pc, 1);
                self.op_ldlw(o)
            }
            op::STLW => {
                let o = self.vcpu_operand(pc, 1);
                self.op_stlw(o)
            }
            op::ALLOC => {
                let i = self.vcpu_operand(pc, 1);
                self.op_alloc(i)
            }
            op::PUSH => {
                self.vpc_step(-1);
                self.op_push()
            }
            op::POP => {
                self.vpc_step(-1);
                self.op_pop()
            }

            // --- Indirect memory ---
            op::PEEK => {
                self.vpc_step(-1);
                self.op_peek()
            }
            op::DEEK => {
                self.vpc_step(-1);
                self.op_deek()
            }
            op::POKE => {
                let d = self.vcpu_operand(pc, 1);
                self.op_poke(d)
            }
            op::DOKE => {
                let d = self.vcpu_operand(pc, 1);
                self.op_doke(d)
            }
            op::POKEA => {
                let d = self.vcpu_operand(pc, 1);
                self.op_pokea(d)
            }
            op::DOKEA => {
                let d = self.vcpu_operand(pc, 1);
                self.op_dokea(d)
            }
            op::PEEKA => {
                let d = self.vcpu_operand(pc, 1);
                self.op_peeka(d)
            }
            op::DEEKA => {
                let d = self.vcpu_operand(pc, 1);
                self.op_deeka(d)
            }
            op::PEEKV => {
                let d = self.vcpu_operand(pc, 1);
                self.op_peekv(d)
            }
            op::DEEKV => {
                let d = self.vcpu_operand(pc, 1);
                self.op_deekv(d)
            }
            op::LUP => {
                let o = self.vcpu_operand(pc, 1);
                self.op_lup(o)
            }

            // --- Arithmetic and logic ---
            op::ADDW => {
                let d = self.vcpu_operand(pc, 1);
                self.op_addw(d)
            }
            op::SUBW => {
                let d = self.vcpu_operand(pc, 1);
                self.op_subw(d)
            }
            op::ADDI => {
                let i = self.vcpu_operand(pc, 1);
                self.op_addi(i)
            }
            op::SUBI => {
                let i = self.vcpu_operand(pc, 1);
                self.op_subi(i)
            }
            op::ADDV => {
                let d = self.vcpu_operand(pc, 1);
                self.op_addv(d)
            }
            op::SUBV => {
                let d = self.vcpu_operand(pc, 1);
                self.op_subv(d)
            }
            op::ANDW => {
                let d = self.vcpu_operand(pc, 1);
                self.op_andw(d)
            }
            op::ORW => {
                let d = self.vcpu_operand(pc, 1);
                self.op_orw(d)
            }
            op::XORW => {
                let d = self.vcpu_operand(pc, 1);
                self.op_xorw(d)
            }
            op::ANDI => {
                let i = self.vcpu_operand(pc, 1);
                self.op_andi(i)
            }
            op::ORI => {
                let i = self.vcpu_operand(pc, 1);
                self.op_ori(i)
            }
            op::XORI => {
                let i = self.vcpu_operand(pc, 1);
                self.op_xori(i)
            }
            op::LSLW => {
                self.vpc_step(-1);
                self.op_lslw()
            }
            op::CMPHS => {
                let d = self.vcpu_operand(pc, 1);
                self.op_cmphs(d)
            }
            op::CMPHU => {
                let d = self.vcpu_operand(pc, 1);
                self.op_cmphu(d)
            }

            // --- Control flow ---
            op::BRA => {
                let o = self.vcpu_operand(pc, 1);
                self.op_bra(o)
            }
            op::DEF => {
                let o = self.vcpu_operand(pc, 1);
                self.op_def(pc, o)
            }
            op::CALL => {
                let d = self.vcpu_operand(pc, 1);
                self.op_call(pc, d)
            }
            op::CALLI => {
                let lo = self.vcpu_operand(pc, 1);
                let hi = self.vcpu_operand(pc, 2);
                self.op_calli(pc, lo, hi)
            }
            op::RET => {
                self.vpc_step(-1);
                self.op_ret()
            }
            op::SYS => {
                let d = self.vcpu_operand(pc, 1);
                self.op_sys(d)
            }
            op::RESET => self.op_reset(),
            op::VRTI => {
                self.vpc_step(-1);
                self.op_vrti()
            }

            // --- Two-byte prefix: branches and v7 extensions ---
            op::PREFIX35 => {
                let sub = self.vcpu_operand(pc, 1);
                self.vcpu_execute_prefix(sub, pc)
            }

            // Unassigned opcode bytes dispatch into unpopulated table
            // space; the observable effect is a dead stop until the next
            // soft reset.
            _ => {
                self.vpc_step(-2);
                28
            }
        }
    }
}
