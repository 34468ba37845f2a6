//! Power-on sequence and soft reset.
//!
//! Power-on: walk the address lines to size RAM (smaller boards alias,
//! which the marker write exposes), self-test a few locations, burn the
//! reset debounce, sweep all of memory into the entropy pool, lay out
//! the zero page and page-1 system region, build the waveform table,
//! and install the two-byte reset stub at `vReset`, the only clean way
//! to soft-reset without tearing the video loop. The very first guest
//! slice then executes that stub.
//!
//! Soft reset re-initializes the vCPU stack, disables vIRQ, clears the
//! timers, resets the expansion latch, and re-enters the embedded
//! `Reset` program through the Exec loader. The extended variant (Start
//! held twice as long) additionally restores the video table and wipes
//! screen memory.

use crate::audio::sound_table_entry;
use crate::core::Gigatron;
use crate::core::ram::{self, p1, warm_pc, zp};
use crate::core::rom;
use crate::fsm;
use crate::vcpu::{op, VCPU_PAGE};

/// ~10 ms of reset debounce at 6.25 MHz.
const DEBOUNCE_CYCLES: u64 = 62_500;

/// ROM identification byte exposed at `romType`.
pub const ROM_TYPE_V7: u8 = 0xf8;

impl Gigatron {
    pub(crate) fn power_on(&mut self) {
        // 1. RAM size: a marker at 0 changes under the aliased write on
        //    boards that do not decode address bit 15.
        self.wr(0x0000, 0x55);
        self.wr(0x8000, 0x33);
        let pages: u16 = if self.rd(0x0000) == 0x33 { 128 } else { 256 };
        self.set_zp(zp::MEM_SIZE, pages as u8);

        // 2. Integrity self test; a board with bad RAM freezes here
        //    with a black display.
        for &(addr, pattern) in &[(0x0022u16, 0xaau8), (0x4d2eu16, 0x55u8)] {
            self.wr(addr, pattern);
            if self.rd(addr) != pattern {
                self.halted = true;
                return;
            }
        }

        // 3. Debounce.
        self.cycle_count += DEBOUNCE_CYCLES;

        // 4. Entropy sweep over all 64K of address space; the 128K
        //    board hides a fourth pool byte in an alternate bank.
        let mut pool: u32 = 0;
        for addr in 0..=0xffffu16 {
            pool = pool
                .rotate_left(3)
                .wrapping_add(self.rd(addr) as u32)
                .wrapping_add(addr as u32);
        }
        self.set_zp(zp::ENTROPY, pool as u8);
        self.set_zp(zp::ENTROPY + 1, (pool >> 8) as u8);
        self.set_zp(zp::ENTROPY + 2, (pool >> 16) as u8);
        if self.ram.is_banked() {
            self.ram.write(0x8000, (pool >> 24) as u8, 0x80);
        }
        self.cycle_count += 0x10000 * 4;

        // 5. Zero page.
        self.set_zp(zp::ZERO, 0);
        self.set_zp(zp::CHANNEL, 0);
        self.set_zp(zp::SAMPLE, 0);
        self.set_zp(zp::VIDEO_Y, 0);
        self.set_zp(zp::NEXT_VIDEO, ram::VIDEO_A);
        self.set_video_mode(0);
        self.set_zp(zp::FRAME_COUNT, 0);
        self.set_zp(zp::SERIAL_RAW, 0xff);
        self.set_zp(zp::SERIAL_LAST, 0xff);
        self.set_zp(zp::BUTTON_STATE, 0xff);
        self.set_zp(zp::RESET_TIMER, 128);
        self.set_zp(zp::XOUT, 0);
        self.set_zp(zp::XOUT_MASK, 0);
        self.set_zp(zp::CHANNEL_MASK, 3);
        self.set_zp(zp::ROM_TYPE, ROM_TYPE_V7);
        self.set_zp(zp::SOUND_TIMER, 0);
        self.set_zp(zp::LED_TIMER, 0);
        self.set_zp(zp::LED_STATE, 0);
        self.set_zp(zp::LED_TEMPO, 3);
        self.set_zp(zp::V_IRQ_CTX, 0);
        self.set_zp(zp::V_IRQ_SAVE + 6, 0);
        self.set_zp(zp::V_CPU_SELECT, VCPU_PAGE);
        self.set_vsp(0);
        self.set_vlr(0);
        self.set_vac(0);

        // 6. Page 1: video table rows point at pages 8.. with no
        //    scroll offset; stubs and timers in the system region.
        for i in 0..p1::VIDEO_TABLE_ENTRIES as u16 {
            self.wr(p1::VIDEO_TABLE + 2 * i, ram::SCREEN_PAGE + i as u8);
            self.wr(p1::VIDEO_TABLE + 2 * i + 1, 0);
        }
        self.wr(p1::V_RESET, op::RESET);
        self.wr(p1::V_RESET + 1, 0);
        self.wr(p1::V_RTI, op::VRTI);
        self.wr(p1::V_RTI + 1, 0);
        self.doke_word(p1::FRAME_TIMER, 0);
        self.doke_word(p1::V_IRQ, 0);
        self.wr(p1::CTRL_BITS, self.ctrl_bits);
        self.wr(p1::VIDEO_TOP, 0);
        for ch in 1..=4u16 {
            for off in p1::WAV_A..=p1::OSC_H {
                self.wr(ch << 8 | off as u16, 0);
            }
        }

        // 7. Waveform table.
        self.reset_waveforms();

        // 8. First fetch lands on the reset stub.
        self.set_vpc(warm_pc(p1::V_RESET));
        self.cycle_count += DEBOUNCE_CYCLES; // table setup and sweep tail
    }

    /// Build all four waveforms into page 7.
    pub(crate) fn reset_waveforms(&mut self) {
        for i in 0..64u16 {
            for wave in 0..4u16 {
                let v = sound_table_entry(wave as u8, i as u8);
                self.wr(ram::SOUND_TABLE | i << 2 | wave, v);
            }
        }
    }

    /// The `vReset` path: also reached by the RESET stub opcode.
    pub(crate) fn soft_reset(&mut self, extended: bool) {
        self.set_vsp(0);
        self.set_vlr(0);
        self.doke_word(p1::V_IRQ, 0);
        self.set_zp(zp::V_IRQ_CTX, 0);
        self.set_zp(zp::V_IRQ_SAVE + 6, 0);
        self.doke_word(p1::FRAME_TIMER, 0);
        self.set_zp(zp::SOUND_TIMER, 0);
        // resetTimer keeps counting: a continued Start hold runs the
        // wrapped countdown on to the extended reset.
        self.set_zp(zp::CHANNEL_MASK, 3);
        self.set_zp(zp::SYS_FN, 0);
        self.set_zp(zp::SYS_FN + 1, 0);
        self.set_video_mode(0);
        self.wr(p1::VIDEO_TOP, 0);

        // Reset the expansion latch: bank 1, all SPI deselected.
        self.ctrl_write(0x7c);

        if extended {
            for i in 0..p1::VIDEO_TABLE_ENTRIES as u16 {
                self.wr(p1::VIDEO_TABLE + 2 * i, ram::SCREEN_PAGE + i as u8);
                self.wr(p1::VIDEO_TABLE + 2 * i + 1, 0);
            }
            for page in ram::SCREEN_PAGE..0x80 {
                for off in 0..=0xffu16 {
                    self.wr((page as u16) << 8 | off, 0);
                }
            }
        }

        // Re-enter the embedded Reset program through the Exec loader.
        self.set_zp(zp::SYS_ARGS, rom::RESET_PAYLOAD as u8);
        self.set_zp(zp::SYS_ARGS + 1, (rom::RESET_PAYLOAD >> 8) as u8);
        fsm::exec::begin(self);
    }

    /// Write the expansion control latch (the `ctrl` path). The
    /// configured latency models the hardware-defined settle time of a
    /// bank switch. Public so host tooling can drive the expansion the
    /// way SYS_ExpanderControl does.
    pub fn ctrl_write(&mut self, bits: u8) {
        self.ctrl_bits = bits;
        self.wr(p1::CTRL_BITS, bits);
        self.cycle_count += self.config.ctrl_latency as u64;
    }

    /// LED sequencer: a 24-step chaser advanced on the LED timer.
    /// `ledState` holds the step index; the pattern is a table lookup.
    pub(crate) fn led_sequencer(&mut self) {
        let t = self.zp(zp::LED_TIMER);
        if t > 0 {
            self.set_zp(zp::LED_TIMER, t - 1);
            return;
        }
        self.set_zp(zp::LED_TIMER, self.zp(zp::LED_TEMPO));
        let state = self.zp(zp::LED_STATE);
        self.set_zp(zp::LED_STATE, (state + 1) % LED_SEQUENCE.len() as u8);
    }

    /// Current LED nibble for the XOUT mask.
    pub fn led_pattern(&self) -> u8 {
        LED_SEQUENCE[self.zp(zp::LED_STATE) as usize % LED_SEQUENCE.len()]
    }
}

/// The power-on LED chaser: a bounce, a widening sweep, and a blink.
const LED_SEQUENCE: [u8; 24] = [
    0b0001, 0b0010, 0b0100, 0b1000, 0b0100, 0b0010, 0b0001, 0b0011,
    0b0110, 0b1100, 0b0110, 0b0011, 0b0001, 0b0000, 0b0001, 0b0000,
    0b0101, 0b1010, 0b0101, 0b1010, 0b1111, 0b0000, 0b1111, 0b0000,
];
