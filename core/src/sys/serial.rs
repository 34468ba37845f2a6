//! PWM serial output and raw serial input.
//!
//! Output rides on the sync pulses during vertical blank: one bit per
//! frame, width-modulated, which a host on the other end of the input
//! cable decodes at its leisure. This core accounts the handler's
//! cycles and latches completed bytes into the host-visible
//! `serial_out` capture buffer.

use crate::core::Gigatron;
use crate::core::ram::zp;

impl Gigatron {
    /// SYS_SendSerial1_80. Sends sysArgs[4:5] bytes starting at
    /// [sysArgs[0:1]], one byte's worth of pulse-width bits per
    /// re-issue. vAC ends at 0 on success.
    pub(crate) fn sys_send_serial1(&mut self) -> u32 {
        let count = self.zp_word(zp::SYS_ARGS + 4);
        if count == 0 {
            self.set_vac(0);
            return 80;
        }
        let src = self.zp_word(zp::SYS_ARGS);
        let b = self.rd(src);
        self.serial_out.push(b);
        self.set_zp_word(zp::SYS_ARGS, src.wrapping_add(1));
        self.set_zp_word(zp::SYS_ARGS + 4, count - 1);
        if count > 1 {
            self.sys_reissue();
        } else {
            self.set_vac(0);
        }
        80
    }

    /// SYS_ReceiveSerial1_32. Stores the current raw serial byte at
    /// [sysArgs[0:1]] and advances the pointer; vAC mirrors the byte.
    pub(crate) fn sys_receive_serial1(&mut self) -> u32 {
        let raw = self.zp(zp::SERIAL_RAW);
        let dst = self.zp_word(zp::SYS_ARGS);
        self.wr(dst, raw);
        self.set_zp_word(zp::SYS_ARGS, dst.wrapping_add(1));
        self.set_vac(raw as u16);
        32
    }
}
