//! The serial loader's SYS functions.
//!
//! The wire protocol delivers 65-byte frames phase-locked to the video:
//! the 'L' marker at videoY 207, a length byte at 219, the target
//! address at 235/251 (all in the blank region), up to 60 payload
//! bytes at videoY 2, 6, ..., 238, and the frame's rolling XOR checksum
//! at videoY 191 of the following blank region. A zero length ends the
//! transfer, with the address bytes carrying the entry point.
//!
//! The protocol engine lives entirely in sysArgs so the guest side is
//! a bare SYS loop:
//!   sysArgs[0:1] write pointer / entry staging   sysArgs[2] checksum
//!   sysArgs[3]   next expected videoY            sysArgs[4] state
//!   sysArgs[5]   payload bytes left              sysArgs[6] length
//!
//! A checksum mismatch restarts synchronization at the protocol byte;
//! the sender just keeps repeating the frame.

use crate::core::Gigatron;
use crate::core::ram::{warm_pc, zp};

/// Frame byte positions (videoY values).
pub const POS_CHECKSUM: u8 = 191;
pub const POS_PROTOCOL: u8 = 207;
pub const POS_LENGTH: u8 = 219;
pub const POS_ADDR_L: u8 = 235;
pub const POS_ADDR_H: u8 = 251;
pub const POS_PAYLOAD: u8 = 2;
pub const PAYLOAD_STEP: u8 = 4;
/// Payload bytes per frame.
pub const PAYLOAD_MAX: u8 = 60;

/// The protocol byte.
pub const PROTOCOL_BYTE: u8 = b'L';

/// Loader engine states in sysArgs[4].
mod state {
    pub const SYNC: u8 = 0;
    pub const LENGTH: u8 = 1;
    pub const ADDR_L: u8 = 2;
    pub const ADDR_H: u8 = 3;
    pub const PAYLOAD: u8 = 4;
    pub const CHECKSUM: u8 = 5;
}

impl Gigatron {
    /// SYS_LoaderNextByteIn_32: the positioned-read primitive. When the
    /// raster is at the expected videoY, read the serial byte into
    /// [sysArgs[0:1]], advance the pointer, fold the byte into the
    /// checksum, and step the expectation by the payload cadence.
    pub(crate) fn sys_loader_next_byte_in(&mut self) -> u32 {
        let video_y = self.zp(zp::VIDEO_Y);
        if video_y != self.zp(zp::SYS_ARGS + 3) {
            return 32;
        }
        let b = self.read_serial(video_y);
        let dst = self.zp_word(zp::SYS_ARGS);
        self.wr(dst, b);
        self.set_zp_word(zp::SYS_ARGS, dst.wrapping_add(1));
        let sum = self.zp(zp::SYS_ARGS + 2) ^ b;
        self.set_zp(zp::SYS_ARGS + 2, sum);
        let next = self.zp(zp::SYS_ARGS + 3).wrapping_add(PAYLOAD_STEP);
        self.set_zp(zp::SYS_ARGS + 3, next);
        32
    }

    /// SYS_LoaderProcessInput_48: one step of the full protocol engine.
    /// Call from every guest slice; only the slice whose videoY matches
    /// the expectation consumes a byte.
    pub(crate) fn sys_loader_process_input(&mut self) -> u32 {
        let st = self.zp(zp::SYS_ARGS + 4);
        let expected = match st {
            state::SYNC => POS_PROTOCOL,
            _ => self.zp(zp::SYS_ARGS + 3),
        };
        let video_y = self.zp(zp::VIDEO_Y);
        if video_y != expected {
            return 48;
        }
        let b = self.read_serial(video_y);
        match st {
            state::SYNC => {
                if b == PROTOCOL_BYTE {
                    self.set_zp(zp::SYS_ARGS + 2, b);
                    self.loader_goto(state::LENGTH, POS_LENGTH);
                }
            }
            state::LENGTH => {
                self.loader_fold(b);
                self.set_zp(zp::SYS_ARGS + 6, b.min(PAYLOAD_MAX));
                self.loader_goto(state::ADDR_L, POS_ADDR_L);
            }
            state::ADDR_L => {
                self.loader_fold(b);
                self.set_zp(zp::SYS_ARGS, b);
                self.loader_goto(state::ADDR_H, POS_ADDR_H);
            }
            state::ADDR_H => {
                self.loader_fold(b);
                self.set_zp(zp::SYS_ARGS + 1, b);
                let len = self.zp(zp::SYS_ARGS + 6);
                if len == 0 {
                    // End-of-transfer frame: the address is the entry
                    // point, pending the checksum.
                    self.loader_goto(state::CHECKSUM, POS_CHECKSUM);
                } else {
                    self.set_zp(zp::SYS_ARGS + 5, len);
                    self.loader_goto(state::PAYLOAD, POS_PAYLOAD);
                }
            }
            state::PAYLOAD => {
                self.loader_fold(b);
                let dst = self.zp_word(zp::SYS_ARGS);
                self.wr(dst, b);
                self.set_zp_word(zp::SYS_ARGS, dst.wrapping_add(1));
                let left = self.zp(zp::SYS_ARGS + 5).saturating_sub(1);
                self.set_zp(zp::SYS_ARGS + 5, left);
                if left == 0 {
                    self.loader_goto(state::CHECKSUM, POS_CHECKSUM);
                } else {
                    let next = video_y.wrapping_add(PAYLOAD_STEP);
                    self.set_zp(zp::SYS_ARGS + 3, next);
                }
            }
            _ => {
                let sum = self.zp(zp::SYS_ARGS + 2);
                let len = self.zp(zp::SYS_ARGS + 6);
                if b == sum && len == 0 {
                    let entry = self.zp_word(zp::SYS_ARGS);
                    self.set_vpc(warm_pc(entry));
                }
                // Good or bad, the next frame starts over at 'L'; a
                // mismatched data frame is simply resent.
                self.set_zp(zp::SYS_ARGS + 2, 0);
                self.loader_goto(state::SYNC, POS_PROTOCOL);
            }
        }
        48
    }

    /// SYS_LoaderPayloadCopy_34: move sysArgs[6] staged bytes from
    /// [sysArgs[0:1]] to [vAC], a few per slice.
    pub(crate) fn sys_loader_payload_copy(&mut self) -> u32 {
        let left = self.zp(zp::SYS_ARGS + 6);
        if left == 0 {
            return 34;
        }
        let n = left.min(4);
        let mut src = self.zp_word(zp::SYS_ARGS);
        let mut dst = self.vac();
        for _ in 0..n {
            let b = self.rd(src);
            self.wr(dst, b);
            src = src.wrapping_add(1);
            dst = dst.wrapping_add(1);
        }
        self.set_zp_word(zp::SYS_ARGS, src);
        self.set_vac(dst);
        self.set_zp(zp::SYS_ARGS + 6, left - n);
        if left > n {
            self.sys_reissue();
        }
        34
    }

    fn loader_fold(&mut self, b: u8) {
        let sum = self.zp(zp::SYS_ARGS + 2) ^ b;
        self.set_zp(zp::SYS_ARGS + 2, sum);
    }

    fn loader_goto(&mut self, st: u8, expect: u8) {
        self.set_zp(zp::SYS_ARGS + 4, st);
        self.set_zp(zp::SYS_ARGS + 3, expect);
    }
}
