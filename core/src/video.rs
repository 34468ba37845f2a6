//! The scanline loop.
//!
//! Every scanline is exactly 200 cycles: 40 cycles of horizontal
//! blanking (sync edges, the sound channel update and the dispatch
//! decision all happen in this window) followed by 160 cycles that are
//! either a pixel burst or a guest slice. The dispatch goes through the
//! `nextVideo` zero-page byte to one of:
//!
//!   videoA  first sub-line of a pixel row: fetch (Yi, dXi) and burst
//!   videoB/C/D  later sub-lines: burst only if the matching
//!           `videoMode*` byte says pixels, else cede 160 cycles
//!   videoE  transition line into vertical blank
//!   videoF  black line for rows above `videoTop`; the burst budget
//!           goes to the guest
//!
//! Vertical blank does the once-per-frame housekeeping on line 0
//! (entropy, LED sequencer, timers, vIRQ), captures serial input late
//! in the blank, and decodes the controller in the back porch of the
//! first visible line.

use crate::core::Gigatron;
use crate::core::ram::{self, p1, zp};
use crate::core::vga;
use crate::fsm;
use crate::v6502;
use crate::vcpu;

/// Scanline index of the serial input capture: all eight controller
/// bits have shifted in by then. videoY = 177 + 2*38 = 253.
const INPUT_CAPTURE_LINE: u16 = 38;

/// Housekeeping costs, in cycles taken out of the guest budget.
const FRAME_HOUSEKEEPING: u32 = 60;
const INPUT_CAPTURE_COST: u32 = 8;

impl Gigatron {
    /// Emit one scanline: exactly 200 cycles of sync, color, sound and
    /// guest execution.
    pub fn step_scanline(&mut self) {
        let line = self.line;
        if line == 0 {
            self.begin_frame();
        }
        self.paint_blanking(line);

        if self.halted {
            // Failed self test: frozen black display, nothing else runs.
        } else if line < vga::V_BLANK_LINES {
            self.vblank_line(line);
        } else if line == vga::LINES_PER_FRAME - 1 {
            self.video_e();
        } else {
            self.visible_line(line);
        }

        self.line = (line + 1) % vga::LINES_PER_FRAME;
        self.cycle_count += vga::CYCLES_PER_LINE as u64;
    }

    /// Run a whole frame of scanlines.
    pub fn step_frame(&mut self) {
        for _ in 0..vga::LINES_PER_FRAME {
            self.step_scanline();
        }
    }

    // ---- Frame and line scaffolding -----------------------------------

    fn begin_frame(&mut self) {
        self.serial_current = self.serial_frames.pop_front();
        // 128K board: the video fetch bank follows the CPU latch only
        // across vertical blank, never mid-frame.
        self.ctrl_video = self.ctrl_bits;
    }

    /// Paint sync levels for the whole line and stamp the hSync edge.
    fn paint_blanking(&mut self, line: u16) {
        let mut base = vga::SYNC_IDLE;
        if line < vga::V_PULSE_LINES {
            base &= !vga::OUT_VSYNC;
        }
        self.out_line.fill(base);
        let pulse = vga::H_FRONT as usize..(vga::H_FRONT + vga::H_PULSE) as usize;
        for c in &mut self.out_line[pulse] {
            *c &= !vga::OUT_HSYNC;
        }
        self.last_hsync_fall = self.cycle_count + vga::H_FRONT as u64;
    }

    // ---- Vertical blank -----------------------------------------------

    fn vblank_line(&mut self, line: u16) {
        self.set_zp(zp::VIDEO_Y, (177 + 2 * line) as u8);
        self.sound_scanline(line & 3 == 3);

        let budget = match line {
            0 => {
                self.frame_housekeeping();
                vga::PIXEL_BURST - FRAME_HOUSEKEEPING
            }
            INPUT_CAPTURE_LINE => {
                self.input_capture();
                vga::PIXEL_BURST - INPUT_CAPTURE_COST
            }
            _ => vga::PIXEL_BURST,
        };
        self.run_vcpu(budget);

        if line == vga::V_BLANK_LINES - 1 {
            let first = if self.rd_video(p1::VIDEO_TOP) > 0 {
                ram::VIDEO_F
            } else {
                ram::VIDEO_A
            };
            self.set_zp(zp::NEXT_VIDEO, first);
        }
    }

    /// Once per frame, at the very start of vertical blank.
    fn frame_housekeeping(&mut self) {
        let fc = self.zp(zp::FRAME_COUNT).wrapping_add(1);
        self.set_zp(zp::FRAME_COUNT, fc);

        self.entropy_advance();
        self.led_sequencer();

        // Timers.
        let st = self.zp(zp::SOUND_TIMER);
        if st > 0 {
            self.set_zp(zp::SOUND_TIMER, st - 1);
        }
        let ft = self.deek_word(p1::FRAME_TIMER);
        if ft > 0 {
            self.doke_word(p1::FRAME_TIMER, ft - 1);
        }

        // Recompute the output enable mask: DAC nibble while sound is
        // keyed, LED pattern in the low bits.
        let audio = if self.zp(zp::SOUND_TIMER) > 0 { 0xf0 } else { 0x00 };
        let leds = self.led_pattern();
        self.set_zp(zp::XOUT_MASK, audio | leds);

        // Re-clamp the sound channel state; a corrupted pointer or mask
        // must not derail the update loop.
        let ch = self.zp(zp::CHANNEL) & 3;
        self.set_zp(zp::CHANNEL, ch);
        let mask = self.zp(zp::CHANNEL_MASK) & 3;
        self.set_zp(zp::CHANNEL_MASK, if mask == 2 { 3 } else { mask });

        // vIRQ is taken at start of frame only, never re-entered, and
        // never while the context FSM itself has a step pending.
        let handler = self.deek_word(p1::V_IRQ);
        if handler != 0
            && !fsm::virq::in_handler(self)
            && self.zp(zp::V_CPU_SELECT) != fsm::FSM21_PAGE
        {
            fsm::virq::deliver(self);
        }
    }

    // ---- Visible region -----------------------------------------------

    fn visible_line(&mut self, line: u16) {
        let l = line - vga::V_BLANK_LINES;
        let row = l / vga::SUB_LINES_PER_ROW;
        let sub = l % vga::SUB_LINES_PER_ROW;

        if line == vga::V_BLANK_LINES {
            // Controller decode runs in the back porch of the first
            // visible line, right after the blank region ends.
            self.input_decode();
        }
        if sub == 0 {
            self.set_zp(zp::VIDEO_Y, (2 * row) as u8);
        }
        self.sound_scanline(line & 3 == 3);

        match self.zp(zp::NEXT_VIDEO) {
            ram::VIDEO_A => self.pixel_burst(row),
            ram::VIDEO_B => self.sub_line(row, zp::VIDEO_MODE_B),
            ram::VIDEO_C => self.sub_line(row, zp::VIDEO_MODE_C),
            ram::VIDEO_D => self.sub_line(row, zp::VIDEO_MODE_D),
            ram::VIDEO_F => self.black_line(row),
            _ => self.run_vcpu(vga::PIXEL_BURST),
        }

        // Select the handler for the next scanline.
        let next = if line + 1 == vga::LINES_PER_FRAME - 1 {
            ram::VIDEO_E
        } else {
            let (row1, sub1) = if sub + 1 == vga::SUB_LINES_PER_ROW {
                (row + 1, 0)
            } else {
                (row, sub + 1)
            };
            let skipped = (2 * row1) < self.rd_video(p1::VIDEO_TOP) as u16;
            match (skipped, sub1) {
                (true, _) => ram::VIDEO_F,
                (false, 0) => ram::VIDEO_A,
                (false, 1) => ram::VIDEO_B,
                (false, 2) => ram::VIDEO_C,
                (false, _) => ram::VIDEO_D,
            }
        };
        self.set_zp(zp::NEXT_VIDEO, next);
    }

    /// Transition into vertical blank: no pixels, full budget to the
    /// guest.
    fn video_e(&mut self) {
        self.sound_scanline(self.line & 3 == 3);
        self.run_vcpu(vga::PIXEL_BURST);
    }

    fn sub_line(&mut self, row: u16, mode_var: u8) {
        if self.zp(mode_var) == ram::MODE_PIXELS {
            self.pixel_burst(row);
        } else {
            self.run_vcpu(vga::PIXEL_BURST);
        }
    }

    /// 160 sequential reads through the video table entry for this row,
    /// one OUT byte per cycle.
    fn pixel_burst(&mut self, row: u16) {
        let entry = p1::VIDEO_TABLE + 2 * row;
        let y = self.rd_video(entry) as u16;
        let dx = self.rd_video(entry + 1);
        for i in 0..vga::PIXEL_BURST as usize {
            let addr = y << 8 | (dx.wrapping_add(i as u8)) as u16;
            let pixel = self.rd_video(addr) & 0x3f;
            self.out_line[vga::H_BLANK as usize + i] = pixel | vga::SYNC_IDLE;
            self.frame[row as usize * 160 + i] = pixel;
        }
    }

    /// Skipped row: OUT stays black, the burst budget goes to the guest.
    fn black_line(&mut self, row: u16) {
        if row < vga::VISIBLE_ROWS {
            self.frame[row as usize * 160..(row as usize + 1) * 160].fill(0);
        }
        self.run_vcpu(vga::PIXEL_BURST);
    }

    // ---- Guest dispatch -----------------------------------------------

    /// Cede exactly `cycles` native cycles to the active interpreter.
    ///
    /// Odd budgets burn one alignment cycle; each interpreter's re-entry
    /// overhead and worst-case instruction reservation come off the
    /// budget before entry, and whatever the guest leaves unused is
    /// burned so the scanline total never moves.
    pub(crate) fn run_vcpu(&mut self, cycles: u32) {
        debug_assert!(cycles <= vga::PIXEL_BURST);
        let cycles = cycles as i32 & !1;
        match self.zp(zp::V_CPU_SELECT) {
            vcpu::VCPU_PAGE => {
                let ticks = (cycles - vcpu::VCPU_OVERHEAD as i32) / 2 - vcpu::MAX_TICKS;
                if ticks >= 0 {
                    self.vcpu_slice(ticks);
                }
            }
            v6502::ENTER_PAGE => {
                let ticks = (cycles - v6502::OVERHEAD as i32) / 2 - v6502::MAX_TICKS;
                if ticks >= 0 {
                    self.v6502_slice(ticks, false);
                }
            }
            v6502::RESUME_PAGE => {
                let ticks = (cycles - v6502::OVERHEAD as i32) / 2 - v6502::MAX_TICKS;
                if ticks >= 0 {
                    self.v6502_slice(ticks, true);
                }
            }
            page => {
                let ticks = (cycles - vcpu::VCPU_OVERHEAD as i32) / 2;
                if ticks > 0 {
                    fsm::step(self, page, ticks);
                }
            }
        }
    }
}
