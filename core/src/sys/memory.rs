//! Memory fill and copy, single-bank and cross-bank.

use crate::core::Gigatron;
use crate::core::ram::zp;

/// Bytes moved per slice by the self-re-issuing handlers.
const FILL_BURST: u16 = 8;
const COPY_BURST: u16 = 6;
const COPY_EXT_BURST: u16 = 4;

impl Gigatron {
    /// SYS_SetMemory_54. sysArgs[0] = count (0 means 256), sysArgs[1] =
    /// value, sysArgs[2:3] = destination. Re-issues until done.
    pub(crate) fn sys_set_memory(&mut self) -> u32 {
        let raw = self.zp(zp::SYS_ARGS);
        let count = if raw == 0 { 256 } else { raw as u16 };
        let value = self.zp(zp::SYS_ARGS + 1);
        let mut dst = self.zp_word(zp::SYS_ARGS + 2);

        let n = count.min(FILL_BURST);
        for _ in 0..n {
            self.wr(dst, value);
            dst = dst.wrapping_add(1);
        }
        self.set_zp_word(zp::SYS_ARGS + 2, dst);
        self.set_zp(zp::SYS_ARGS, (count - n) as u8);
        if count > n {
            self.sys_reissue();
        }
        54
    }

    /// SYS_CopyMemory_80. vAC = count, sysArgs[0:1] = destination,
    /// sysArgs[2:3] = source. Ascending byte copy; overlap behaves like
    /// the naive loop it is.
    pub(crate) fn sys_copy_memory(&mut self) -> u32 {
        let count = self.vac();
        if count == 0 {
            return 80;
        }
        let mut dst = self.zp_word(zp::SYS_ARGS);
        let mut src = self.zp_word(zp::SYS_ARGS + 2);

        let n = count.min(COPY_BURST);
        for _ in 0..n {
            let b = self.rd(src);
            self.wr(dst, b);
            src = src.wrapping_add(1);
            dst = dst.wrapping_add(1);
        }
        self.set_zp_word(zp::SYS_ARGS, dst);
        self.set_zp_word(zp::SYS_ARGS + 2, src);
        self.set_vac(count - n);
        if count > n {
            self.sys_reissue();
        }
        80
    }

    /// SYS_CopyMemoryExt_100. As SYS_CopyMemory, plus sysArgs[4]
    /// carrying expansion banks: bits 7:6 destination bank, bits 5:4
    /// source bank. Moves data between banks the CPU window cannot see
    /// at the same time.
    pub(crate) fn sys_copy_memory_ext(&mut self) -> u32 {
        let count = self.vac();
        if count == 0 {
            return 100;
        }
        let mut dst = self.zp_word(zp::SYS_ARGS);
        let mut src = self.zp_word(zp::SYS_ARGS + 2);
        let banks = self.zp(zp::SYS_ARGS + 4);
        let dst_ctrl = banks & 0xc0;
        let src_ctrl = (banks & 0x30) << 2;

        let n = count.min(COPY_EXT_BURST);
        for _ in 0..n {
            let b = self.ram.read(src, src_ctrl);
            self.ram.write(dst, b, dst_ctrl);
            src = src.wrapping_add(1);
            dst = dst.wrapping_add(1);
        }
        self.set_zp_word(zp::SYS_ARGS, dst);
        self.set_zp_word(zp::SYS_ARGS + 2, src);
        self.set_vac(count - n);
        if count > n {
            self.sys_reissue();
        }
        100
    }
}
