//! The SYS call surface.
//!
//! The vCPU `SYS` opcode transfers to native code through the `sysFn`
//! zero-page vector, with the operand declaring the call's maximum
//! cycle cost: the encoded byte is (28 - max)/2, and a slice without
//! enough budget re-issues the instruction by rewinding vPC. Vector
//! addresses live in ROM page 0 at 0x0080..0x00ef and are stable
//! across revisions; the function name suffixes carry the declared
//! maximum.
//!
//! Handlers that need more than one slice self-dispatch the same way
//! SYS retries do: rewind vPC by 2, return, and pick their state back
//! up out of sysArgs on the next call.

pub mod control;
pub mod loaderfn;
pub mod memory;
pub mod misc;
pub mod multiply;
pub mod serial;
pub mod spi;
pub mod sprite;

use crate::core::Gigatron;
use crate::core::ram::zp;

/// Stable vector addresses in ROM page 0.
pub mod vector {
    pub const EXEC: u16 = 0x0080;
    pub const SET_MODE: u16 = 0x0082;
    pub const SET_MEMORY: u16 = 0x0084;
    pub const SEND_SERIAL1: u16 = 0x0086;
    pub const EXPANDER_CONTROL: u16 = 0x0088;
    pub const SPI_EXCHANGE_BYTES: u16 = 0x008a;
    pub const SPRITE6: u16 = 0x008c;
    pub const SPRITE6X: u16 = 0x008e;
    pub const SPRITE6Y: u16 = 0x0090;
    pub const SPRITE6XY: u16 = 0x0092;
    pub const RUN_6502: u16 = 0x0094;
    pub const RESET_WAVEFORMS: u16 = 0x0096;
    pub const SHUFFLE_NOISE: u16 = 0x0098;
    pub const RANDOM: u16 = 0x009a;
    pub const MULTIPLY_S16: u16 = 0x009c;
    pub const DIVIDE_U16: u16 = 0x009e;
    pub const COPY_MEMORY: u16 = 0x00a0;
    pub const COPY_MEMORY_EXT: u16 = 0x00a2;
    pub const READ_ROM_DIR: u16 = 0x00a4;
    pub const RECEIVE_SERIAL1: u16 = 0x00a6;
    pub const LOADER_NEXT_BYTE_IN: u16 = 0x00a8;
    pub const LOADER_PROCESS_INPUT: u16 = 0x00aa;
    pub const LOADER_PAYLOAD_COPY: u16 = 0x00ac;
    pub const CONVERT_DECIMAL: u16 = 0x00ae;
}

impl Gigatron {
    /// SYS (0xb4). The operand encodes the declared maximum as
    /// (28 - max)/2; a budget shortfall re-issues on the next slice.
    pub(crate) fn op_sys(&mut self, operand: u8) -> u32 {
        let extra_ticks = -(operand as i8) as i32;
        if self.vticks() < extra_ticks {
            self.vpc_step(-2);
            return 20;
        }
        let addr = self.zp_word(zp::SYS_FN);
        self.sys_dispatch(addr)
    }

    /// Route a vector address to its handler; each returns its cycle
    /// cost. An address outside the table burns the minimum and
    /// returns; the original jumps into unmapped native code instead.
    fn sys_dispatch(&mut self, addr: u16) -> u32 {
        match addr {
            vector::EXEC => self.sys_exec(),
            vector::SET_MODE => self.sys_set_mode(),
            vector::SET_MEMORY => self.sys_set_memory(),
            vector::SEND_SERIAL1 => self.sys_send_serial1(),
            vector::EXPANDER_CONTROL => self.sys_expander_control(),
            vector::SPI_EXCHANGE_BYTES => self.sys_spi_exchange_bytes(),
            vector::SPRITE6 => self.sys_sprite6(false, false),
            vector::SPRITE6X => self.sys_sprite6(true, false),
            vector::SPRITE6Y => self.sys_sprite6(false, true),
            vector::SPRITE6XY => self.sys_sprite6(true, true),
            vector::RUN_6502 => self.sys_run_6502(),
            vector::RESET_WAVEFORMS => self.sys_reset_waveforms(),
            vector::SHUFFLE_NOISE => self.sys_shuffle_noise(),
            vector::RANDOM => self.sys_random(),
            vector::MULTIPLY_S16 => self.sys_multiply_s16(),
            vector::DIVIDE_U16 => self.sys_divide_u16(),
            vector::COPY_MEMORY => self.sys_copy_memory(),
            vector::COPY_MEMORY_EXT => self.sys_copy_memory_ext(),
            vector::READ_ROM_DIR => self.sys_read_rom_dir(),
            vector::RECEIVE_SERIAL1 => self.sys_receive_serial1(),
            vector::LOADER_NEXT_BYTE_IN => self.sys_loader_next_byte_in(),
            vector::LOADER_PROCESS_INPUT => self.sys_loader_process_input(),
            vector::LOADER_PAYLOAD_COPY => self.sys_loader_payload_copy(),
            vector::CONVERT_DECIMAL => self.sys_convert_decimal(),
            _ => 28,
        }
    }

    /// Re-issue the active SYS instruction on the next slice.
    pub(crate) fn sys_reissue(&mut self) {
        self.vpc_step(-2);
    }
}
