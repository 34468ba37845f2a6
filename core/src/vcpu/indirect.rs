use crate::core::Gigatron;

impl Gigatron {
    // Indirect memory access. Word accesses follow the hardware's
    // X-post-increment pattern: the second byte comes from the same
    // page, wrapping at the page boundary.

    /// PEEK (0xad) - vAC = byte at [vAC]. 1 byte.
    pub(crate) fn op_peek(&mut self) -> u32 {
        let v = self.rd(self.vac());
        self.set_vac(v as u16);
        26
    }

    /// DEEK (0xf6) - vAC = word at [vAC]. 1 byte.
    pub(crate) fn op_deek(&mut self) -> u32 {
        let v = self.deek_word(self.vac());
        self.set_vac(v);
        28
    }

    /// POKE (0xf0) - Byte at [[D]] = vAC.lo.
    pub(crate) fn op_poke(&mut self, d: u8) -> u32 {
        let addr = self.var16(d);
        let v = self.vac() as u8;
        self.wr(addr, v);
        28
    }

    /// DOKE (0xf3) - Word at [[D]] = vAC.
    pub(crate) fn op_doke(&mut self, d: u8) -> u32 {
        let addr = self.var16(d);
        let v = self.vac();
        self.doke_word(addr, v);
        28
    }

    /// POKEA (0x69) - Byte at [vAC] = zero page byte D.
    pub(crate) fn op_pokea(&mut self, d: u8) -> u32 {
        let v = self.zp(d);
        let addr = self.vac();
        self.wr(addr, v);
        28
    }

    /// DOKEA (0x7d) - Word at [vAC] = zero page word D.
    pub(crate) fn op_dokea(&mut self, d: u8) -> u32 {
        let v = self.var16(d);
        let addr = self.vac();
        self.doke_word(addr, v);
        28
    }

    /// PEEKA (0xe1) - Zero page byte D = byte at [vAC].
    pub(crate) fn op_peeka(&mut self, d: u8) -> u32 {
        let v = self.rd(self.vac());
        self.set_zp(d, v);
        28
    }

    /// DEEKA (0x6f) - Zero page word D = word at [vAC].
    pub(crate) fn op_deeka(&mut self, d: u8) -> u32 {
        let v = self.deek_word(self.vac());
        self.set_var16(d, v);
        28
    }

    /// PEEKV (0x7b) - vAC = byte at [[D]].
    pub(crate) fn op_peekv(&mut self, d: u8) -> u32 {
        let addr = self.var16(d);
        let v = self.rd(addr);
        self.set_vac(v as u16);
        28
    }

    /// DEEKV (0x3b) - vAC = word at [[D]].
    pub(crate) fn op_deekv(&mut self, d: u8) -> u32 {
        let addr = self.var16(d);
        let v = self.deek_word(addr);
        self.set_vac(v);
        28
    }
}
