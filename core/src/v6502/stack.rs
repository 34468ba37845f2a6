use crate::core::Gigatron;
use crate::core::ram::zp;

impl Gigatron {
    // The stack lives in the zero page, not page 1: page 1 is the video
    // table. S indexes 0x0000..0x00ff directly and wraps there.

    pub(crate) fn q_push(&mut self, v: u8) {
        let s = self.zp(zp::V6502_S);
        self.wr(s as u16, v);
        self.set_zp(zp::V6502_S, s.wrapping_sub(1));
    }

    pub(crate) fn q_pull(&mut self) -> u8 {
        let s = self.zp(zp::V6502_S).wrapping_add(1);
        self.set_zp(zp::V6502_S, s);
        self.rd(s as u16)
    }

    pub(crate) fn q_pha(&mut self) -> u32 {
        let a = self.q_a();
        self.q_push(a);
        6
    }

    pub(crate) fn q_pla(&mut self) -> u32 {
        let v = self.q_pull();
        self.set_q_a(v);
        self.q_set_nz(v);
        8
    }

    pub(crate) fn q_php(&mut self) -> u32 {
        let v = self.q_materialize_p(true);
        self.q_push(v);
        6
    }

    pub(crate) fn q_plp(&mut self) -> u32 {
        let v = self.q_pull();
        self.q_write_p(v);
        8
    }
}
