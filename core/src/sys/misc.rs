//! Assorted SYS functions: Exec, randomness, waveforms, the 6502
//! bridge, ROM directory enumeration, decimal conversion.

use crate::core::Gigatron;
use crate::core::ram::{self, zp};
use crate::core::rom;
use crate::fsm;

impl Gigatron {
    /// SYS_Exec_88. sysArgs[0:1] holds the ROM address of a GT1 (or
    /// GT1z) stream; loading runs as an FSM and ends with vPC at the
    /// image's entry point.
    pub(crate) fn sys_exec(&mut self) -> u32 {
        fsm::exec::begin(self);
        88
    }

    /// SYS_Random_34. vAC = the low pool word; the pool advances so
    /// consecutive calls differ.
    pub(crate) fn sys_random(&mut self) -> u32 {
        self.entropy_advance();
        let v = self.zp(zp::ENTROPY) as u16 | (self.zp(zp::ENTROPY + 1) as u16) << 8;
        self.set_vac(v);
        34
    }

    /// SYS_ResetWaveforms_50. Rebuilds four page-7 waveform entries per
    /// call, cursor in sysArgs[7]; re-issues itself until the table is
    /// complete.
    pub(crate) fn sys_reset_waveforms(&mut self) -> u32 {
        use crate::audio::sound_table_entry;
        let idx = self.zp(zp::SYS_ARGS + 7) as u16 & 0x3f;
        for wave in 0..4u16 {
            let v = sound_table_entry(wave as u8, idx as u8);
            self.wr(ram::SOUND_TABLE | idx << 2 | wave, v);
        }
        if idx < 63 {
            self.set_zp(zp::SYS_ARGS + 7, idx as u8 + 1);
            self.sys_reissue();
        } else {
            self.set_zp(zp::SYS_ARGS + 7, 0);
        }
        50
    }

    /// SYS_ShuffleNoise_46. Swaps two entries of the noise waveform
    /// using the entropy pool, one swap per call.
    pub(crate) fn sys_shuffle_noise(&mut self) -> u32 {
        self.entropy_advance();
        let i = (self.zp(zp::ENTROPY) & 0x3f) as u16;
        let j = (self.zp(zp::ENTROPY + 1) & 0x3f) as u16;
        let ai = ram::SOUND_TABLE | i << 2 | crate::audio::WAVE_NOISE as u16;
        let aj = ram::SOUND_TABLE | j << 2 | crate::audio::WAVE_NOISE as u16;
        let (vi, vj) = (self.rd(ai), self.rd(aj));
        self.wr(ai, vj);
        self.wr(aj, vi);
        46
    }

    /// SYS_Run6502_80. Enters the v6502 at the address in vAC; control
    /// returns to the instruction after this SYS when the guest hits
    /// BRK.
    pub(crate) fn sys_run_6502(&mut self) -> u32 {
        let pc = self.vac();
        self.v6502_power_up(pc);
        80
    }

    /// SYS_ReadRomDir_80. vAC = 0 starts the walk; otherwise vAC is a
    /// record address. Returns the 8-byte name in sysArgs[0..8] and the
    /// next record address (or 0) in vAC. The payload pointer sits at
    /// record+8, readable with LUP.
    pub(crate) fn sys_read_rom_dir(&mut self) -> u32 {
        let record = match self.vac() {
            0 => rom::DIR_BASE,
            r => r,
        };
        for k in 0..8u16 {
            let b = self.rom_read(record + k);
            self.set_zp(zp::SYS_ARGS + k as u8, b);
        }
        let next = self.rom_read(record + 10) as u16
            | (self.rom_read(record + 11) as u16) << 8;
        self.set_vac(next);
        80
    }

    /// SYS_ConvertDecimal_36. Writes vAC as five ASCII digits at the
    /// address in sysArgs[0:1]; the double-dabble runs on FSM14.
    pub(crate) fn sys_convert_decimal(&mut self) -> u32 {
        let dest = self.zp_word(zp::SYS_ARGS);
        fsm::math::begin_convd_at(self, dest);
        36
    }
}
