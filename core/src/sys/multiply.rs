//! 16-bit multiply and divide.

use crate::core::Gigatron;
use crate::core::ram::zp;

impl Gigatron {
    /// SYS_Multiply_s16_66. vAC = sysArgs[4:5] + sysArgs[0:1] *
    /// sysArgs[2:3], modulo 2^16; the result also lands back in
    /// sysArgs[4:5]. Signed and unsigned agree modulo 2^16.
    pub(crate) fn sys_multiply_s16(&mut self) -> u32 {
        let a = self.zp_word(zp::SYS_ARGS);
        let b = self.zp_word(zp::SYS_ARGS + 2);
        let c = self.zp_word(zp::SYS_ARGS + 4);
        let r = c.wrapping_add(a.wrapping_mul(b));
        self.set_zp_word(zp::SYS_ARGS + 4, r);
        self.set_vac(r);
        66
    }

    /// SYS_Divide_u16_80. sysArgs[0:1] / sysArgs[2:3]: quotient to vAC
    /// and sysArgs[0:1], remainder to sysArgs[4:5]. Division by zero
    /// yields an all-ones quotient, the natural result of the restoring
    /// loop.
    pub(crate) fn sys_divide_u16(&mut self) -> u32 {
        let a = self.zp_word(zp::SYS_ARGS);
        let b = self.zp_word(zp::SYS_ARGS + 2);
        let (q, r) = if b == 0 { (0xffff, 0) } else { (a / b, a % b) };
        self.set_zp_word(zp::SYS_ARGS, q);
        self.set_zp_word(zp::SYS_ARGS + 4, r);
        self.set_vac(q);
        80
    }
}
