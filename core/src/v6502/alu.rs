use super::p;
use crate::core::Gigatron;
use crate::core::ram::zp;

impl Gigatron {
    // ---- Lazy flag evidence ----
    //
    // Qn carries the last result byte (bit 7 is N); Qz is zero exactly
    // when the Z flag is set. Branches and P materialization read these
    // instead of recomputing flags on every operation.

    #[inline]
    pub(crate) fn q_set_nz(&mut self, v: u8) {
        self.set_zp(zp::V6502_QN, v);
        self.set_zp(zp::V6502_QZ, v);
    }

    #[inline]
    pub(crate) fn q_flag_n(&self) -> bool {
        self.zp(zp::V6502_QN) & 0x80 != 0
    }

    #[inline]
    pub(crate) fn q_flag_z(&self) -> bool {
        self.zp(zp::V6502_QZ) == 0
    }

    #[inline]
    pub(crate) fn q_set_flag(&mut self, flag: u8, set: bool) {
        let v = self.q_p();
        self.set_q_p(if set { v | flag } else { v & !flag });
    }

    /// Pack P into its architectural layout for a push. V moves from
    /// bit 7 to bit 6, N and Z materialize from Qn/Qz.
    pub(crate) fn q_materialize_p(&self, brk: bool) -> u8 {
        let held = self.q_p();
        let mut out = (held & (p::C | p::I | p::D)) | p::U;
        if held & p::V_INTERNAL != 0 {
            out |= p::V_PUSHED;
        }
        if brk {
            out |= p::B;
        }
        if self.q_flag_n() {
            out |= 0x80;
        }
        if self.q_flag_z() {
            out |= 0x02;
        }
        out
    }

    /// Unpack a pulled P byte back into the internal layout.
    pub(crate) fn q_write_p(&mut self, pulled: u8) {
        let mut held = (pulled & (p::C | p::I | p::D)) | p::U;
        if pulled & p::V_PUSHED != 0 {
            held |= p::V_INTERNAL;
        }
        self.set_q_p(held);
        self.set_zp(zp::V6502_QN, pulled);
        self.set_zp(zp::V6502_QZ, if pulled & 0x02 != 0 { 0 } else { 1 });
    }

    // ---- Arithmetic ----

    /// ADC. SBC dispatches here with the operand inverted; decimal mode
    /// is recognized but not honored, so the binary path is always
    /// correct for both.
    pub(crate) fn q_adc(&mut self, m: u8) {
        let a = self.q_a();
        let c = self.q_p() & p::C;
        let sum = a as u16 + m as u16 + c as u16;
        let r = sum as u8;
        self.q_set_flag(p::C, sum > 0xff);
        self.q_set_flag(p::V_INTERNAL, (a ^ r) & (m ^ r) & 0x80 != 0);
        self.set_q_a(r);
        self.q_set_nz(r);
    }

    /// CMP/CPX/CPY. Sets N, Z, C; registers untouched.
    pub(crate) fn q_compare(&mut self, reg: u8, m: u8) {
        let r = reg.wrapping_sub(m);
        self.q_set_flag(p::C, reg >= m);
        self.q_set_nz(r);
    }

    /// BIT. Z from A & M; N and V copied straight from the operand.
    pub(crate) fn q_bit(&mut self, m: u8) {
        let a = self.q_a();
        self.set_zp(zp::V6502_QZ, a & m);
        self.set_zp(zp::V6502_QN, m);
        self.q_set_flag(p::V_INTERNAL, m & 0x40 != 0);
    }

    // ---- Shifts and rotates ----

    pub(crate) fn q_asl(&mut self, v: u8) -> u8 {
        self.q_set_flag(p::C, v & 0x80 != 0);
        let r = v << 1;
        self.q_set_nz(r);
        r
    }

    pub(crate) fn q_lsr(&mut self, v: u8) -> u8 {
        self.q_set_flag(p::C, v & 0x01 != 0);
        let r = v >> 1;
        self.q_set_nz(r);
        r
    }

    pub(crate) fn q_rol(&mut self, v: u8) -> u8 {
        let c_in = self.q_p() & p::C;
        self.q_set_flag(p::C, v & 0x80 != 0);
        let r = v << 1 | c_in;
        self.q_set_nz(r);
        r
    }

    pub(crate) fn q_ror(&mut self, v: u8) -> u8 {
        let c_in = self.q_p() & p::C;
        self.q_set_flag(p::C, v & 0x01 != 0);
        let r = v >> 1 | c_in << 7;
        self.q_set_nz(r);
        r
    }

    /// Read-modify-write against memory.
    pub(crate) fn q_rmw(&mut self, addr: u16, f: fn(&mut Self, u8) -> u8) -> u32 {
        let v = self.rd(addr);
        let r = f(self, v);
        self.wr(addr, r);
        10
    }

    /// Read-modify-write against the accumulator.
    pub(crate) fn q_rmw_acc(&mut self, f: fn(&mut Self, u8) -> u8) -> u32 {
        let v = self.q_a();
        let r = f(self, v);
        self.set_q_a(r);
        4
    }
}
