//! Sprite strips: 6-pixel-wide columns with four axis variants.
//!
//! Data format at sysArgs[0:1]: a row count byte, then count rows of
//! six pixel bytes. Destination in vAC. Zero pixels are transparent.
//! The y variants walk the destination upward (one page per scanline),
//! the x variants mirror each row. On completion sysArgs[0:1] ends up
//! past the data and vAC lands six pixels right of the strip's start,
//! so multi-strip images chain naturally.
//!
//! Callers start a strip with sysArgs[6] = 0; it carries the
//! remaining-row count between the self-re-issued slices, sysArgs[7]
//! the strip's total height.

use crate::core::Gigatron;
use crate::core::ram::zp;

/// Rows drawn per slice.
const ROW_BURST: u8 = 2;

impl Gigatron {
    /// SYS_Sprite6_64 and its x/y/xy mirrors.
    pub(crate) fn sys_sprite6(&mut self, flip_x: bool, flip_y: bool) -> u32 {
        let mut src = self.zp_word(zp::SYS_ARGS);

        if self.zp(zp::SYS_ARGS + 6) == 0 {
            let rows = self.rd(src);
            src = src.wrapping_add(1);
            self.set_zp_word(zp::SYS_ARGS, src);
            if rows == 0 {
                // Empty strip: advance to the next column and be done.
                let dst = self.vac();
                self.set_vac(dst.wrapping_add(6));
                return 64;
            }
            self.set_zp(zp::SYS_ARGS + 6, rows);
            self.set_zp(zp::SYS_ARGS + 7, rows);
        }

        let rows = self.zp(zp::SYS_ARGS + 6);
        let mut dst = self.vac();
        let n = rows.min(ROW_BURST);
        for _ in 0..n {
            for i in 0..6u16 {
                let b = self.rd(src.wrapping_add(i));
                if b != 0 {
                    let x = if flip_x { 5 - i } else { i };
                    self.wr(dst.wrapping_add(x), b);
                }
            }
            src = src.wrapping_add(6);
            dst = if flip_y {
                dst.wrapping_sub(0x0100)
            } else {
                dst.wrapping_add(0x0100)
            };
        }
        self.set_zp_word(zp::SYS_ARGS, src);
        self.set_zp(zp::SYS_ARGS + 6, rows - n);

        if rows > n {
            self.set_vac(dst);
            self.sys_reissue();
        } else {
            // Rewind to the strip's start scanline, next column over.
            let total = (self.zp(zp::SYS_ARGS + 7) as u16) << 8;
            let start = if flip_y {
                dst.wrapping_add(total)
            } else {
                dst.wrapping_sub(total)
            };
            self.set_vac(start.wrapping_add(6));
            self.set_zp(zp::SYS_ARGS + 7, 0);
        }
        64
    }
}
