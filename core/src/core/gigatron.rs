//! The core state machine: RAM, ROM, output latches, and raster position.
//!
//! There is exactly one mutable world here. The zero page of `ram` is the
//! register file for every component: the scanline sequencer, the sound
//! generator, the vCPU, the v6502, the extension FSMs, and the SYS
//! functions all communicate through the named offsets in [`ram::zp`].
//! The per-subsystem `impl Gigatron` blocks live in their own modules
//! (`video`, `audio`, `input`, `boot`, `vcpu`, `v6502`, `fsm`, `sys`);
//! this file holds the struct, construction, and the shared accessors.

use std::collections::VecDeque;

use crate::core::ram::{self, Ram, RamSize, next_in_page};
use crate::core::rom::Rom;
use crate::core::vga;
use crate::input::ControllerType;
use crate::loader::SerialFrame;
use crate::sys::spi::SpiPort;

/// Construction-time board configuration.
#[derive(Clone)]
pub struct CoreConfig {
    /// Installed RAM size class.
    pub ram: RamSize,
    /// Controller protocol decoded at end of vertical blank.
    pub controller: ControllerType,
    /// Extra cycles charged for a bank-switch `ctrl` write. The real
    /// latency is hardware-defined, so it is configurable here.
    pub ctrl_latency: u32,
    /// Start with all-zero RAM instead of the power-on decay pattern.
    /// Used by tests that assert exact memory contents.
    pub zeroed_ram: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            ram: RamSize::K64,
            controller: ControllerType::TypeB,
            ctrl_latency: 0,
            zeroed_ram: false,
        }
    }
}

/// The Gigatron core: a cycle-accounted scanline state machine.
pub struct Gigatron {
    pub(crate) ram: Ram,
    pub(crate) rom: Rom,
    pub(crate) config: CoreConfig,

    // Raster position
    pub(crate) line: u16,
    pub(crate) cycle_count: u64,
    pub(crate) last_hsync_fall: u64,
    /// OUT value for each cycle of the most recently emitted scanline.
    pub(crate) out_line: [u8; vga::CYCLES_PER_LINE as usize],
    /// 160x120 framebuffer, low 6 bits of each pixel byte.
    pub(crate) frame: Vec<u8>,
    /// Set when the boot self-test fails; the raster then emits black
    /// forever (the frozen-display failure mode).
    pub(crate) halted: bool,

    // Expansion bus
    pub(crate) ctrl_bits: u8,
    /// Bank seen by the video fetch path on the 128K board; reconciled
    /// with `ctrl_bits` at vertical blank.
    pub(crate) ctrl_video: u8,
    pub(crate) spi: [Option<Box<dyn SpiPort>>; 4],

    // Host-side I/O
    /// Live controller shift-register byte (active low).
    pub(crate) serial_in: u8,
    pub(crate) serial_frames: VecDeque<SerialFrame>,
    pub(crate) serial_current: Option<SerialFrame>,
    /// Bytes sent out through the PWM serial path.
    pub(crate) serial_out: Vec<u8>,
    pub(crate) audio_buffer: Vec<i16>,
    pub(crate) audio_phase: u64,
}

impl Gigatron {
    /// Power on a board: construct RAM, assemble the standard ROM image,
    /// and run the boot sequence up to the first scanline.
    pub fn new(config: CoreConfig) -> Self {
        let ram = Ram::new(config.ram, config.zeroed_ram);
        let mut core = Self {
            ram,
            rom: Rom::standard(),
            config,
            line: 0,
            cycle_count: 0,
            last_hsync_fall: 0,
            out_line: [0; vga::CYCLES_PER_LINE as usize],
            frame: vec![0; (vga::DISPLAY_WIDTH * vga::DISPLAY_HEIGHT) as usize],
            halted: false,
            ctrl_bits: 0x40, // bank 1, all SPI deselected is set in boot
            ctrl_video: 0x40,
            spi: [None, None, None, None],
            serial_in: 0xff,
            serial_frames: VecDeque::new(),
            serial_current: None,
            serial_out: Vec::new(),
            audio_buffer: Vec::new(),
            audio_phase: 0,
        };
        core.power_on();
        core
    }

    // ---- Memory access ------------------------------------------------

    /// CPU-path RAM read (through the CPU bank of the control latch).
    #[inline]
    pub fn rd(&self, addr: u16) -> u8 {
        self.ram.read(addr, self.ctrl_bits)
    }

    /// CPU-path RAM write.
    #[inline]
    pub fn wr(&mut self, addr: u16, data: u8) {
        self.ram.write(addr, data, self.ctrl_bits);
    }

    /// Video-path RAM read (through the video bank on the 128K board).
    #[inline]
    pub(crate) fn rd_video(&self, addr: u16) -> u8 {
        self.ram.read(addr, self.ctrl_video)
    }

    #[inline]
    pub fn zp(&self, off: u8) -> u8 {
        self.rd(off as u16)
    }

    #[inline]
    pub fn set_zp(&mut self, off: u8, data: u8) {
        self.wr(off as u16, data);
    }

    /// Little-endian word in the zero page (offsets never straddle the
    /// page boundary).
    #[inline]
    pub fn zp_word(&self, off: u8) -> u16 {
        self.zp(off) as u16 | (self.zp(off.wrapping_add(1)) as u16) << 8
    }

    #[inline]
    pub fn set_zp_word(&mut self, off: u8, data: u16) {
        self.set_zp(off, data as u8);
        self.set_zp(off.wrapping_add(1), (data >> 8) as u8);
    }

    /// Word read with the page-local high byte, the access pattern of the
    /// hardware's X-post-increment (DEEK wraps within its page).
    #[inline]
    pub fn deek_word(&self, addr: u16) -> u16 {
        self.rd(addr) as u16 | (self.rd(next_in_page(addr)) as u16) << 8
    }

    #[inline]
    pub fn doke_word(&mut self, addr: u16, data: u16) {
        self.wr(addr, data as u8);
        self.wr(next_in_page(addr), (data >> 8) as u8);
    }

    /// ROM byte read, serving the `LUP` opcode and the Exec/directory
    /// paths.
    #[inline]
    pub fn rom_read(&self, addr: u16) -> u8 {
        self.rom.read(addr)
    }

    /// Mutable ROM access, for installing additional payloads before a
    /// machine starts (development builds and tests).
    pub fn rom_mut(&mut self) -> &mut Rom {
        &mut self.rom
    }

    // ---- vCPU register file -------------------------------------------

    #[inline]
    pub fn vpc(&self) -> u16 {
        self.zp_word(ram::zp::V_PC)
    }

    #[inline]
    pub fn set_vpc(&mut self, v: u16) {
        self.set_zp_word(ram::zp::V_PC, v);
    }

    #[inline]
    pub fn vac(&self) -> u16 {
        self.zp_word(ram::zp::V_AC)
    }

    #[inline]
    pub fn set_vac(&mut self, v: u16) {
        self.set_zp_word(ram::zp::V_AC, v);
    }

    #[inline]
    pub fn vlr(&self) -> u16 {
        self.zp_word(ram::zp::V_LR)
    }

    #[inline]
    pub fn set_vlr(&mut self, v: u16) {
        self.set_zp_word(ram::zp::V_LR, v);
    }

    #[inline]
    pub fn vsp(&self) -> u16 {
        self.zp_word(ram::zp::V_SP)
    }

    #[inline]
    pub fn set_vsp(&mut self, v: u16) {
        self.set_zp_word(ram::zp::V_SP, v);
    }

    #[inline]
    pub(crate) fn vticks(&self) -> i32 {
        self.zp(ram::zp::V_TICKS) as i8 as i32
    }

    #[inline]
    pub(crate) fn set_vticks(&mut self, t: i32) {
        self.set_zp(ram::zp::V_TICKS, t as u8);
    }

    // ---- Host-facing probes and I/O -----------------------------------

    /// Total native cycles since power-on (boot included).
    pub fn cycles(&self) -> u64 {
        self.cycle_count
    }

    /// Cycle stamp of the most recent hSync falling edge.
    pub fn last_hsync_fall(&self) -> u64 {
        self.last_hsync_fall
    }

    /// Scanline index within the current frame, 0..520.
    pub fn line(&self) -> u16 {
        self.line
    }

    /// OUT values of the most recently emitted scanline, one per cycle.
    pub fn out_line(&self) -> &[u8] {
        &self.out_line
    }

    /// The 160x120 framebuffer; one byte per pixel, low 6 bits used.
    pub fn framebuffer(&self) -> &[u8] {
        &self.frame
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Latch the controller shift-register byte (active low). Overridden
    /// per-scanline while a loader serial frame is scheduled.
    pub fn set_serial_in(&mut self, raw: u8) {
        self.serial_in = raw;
    }

    /// Queue a loader serial frame; one frame is consumed per video frame.
    pub fn push_serial_frame(&mut self, frame: SerialFrame) {
        self.serial_frames.push_back(frame);
    }

    pub fn serial_frames_pending(&self) -> usize {
        self.serial_frames.len() + self.serial_current.is_some() as usize
    }

    /// Bytes sent by the core over the PWM serial output path.
    pub fn serial_out(&self) -> &[u8] {
        &self.serial_out
    }

    /// Attach an SPI device to one of the four expansion selects.
    pub fn attach_spi(&mut self, port: usize, dev: Box<dyn SpiPort>) {
        self.spi[port & 3] = dev.into();
    }

    /// Current expansion control latch (CPU view).
    pub fn ctrl_bits(&self) -> u8 {
        self.ctrl_bits
    }

    /// Hand the active interpreter one ad-hoc slice outside the raster
    /// loop, clamped to the largest budget a scanline can cede. Lets
    /// tests and tooling drive guest code without emitting video.
    pub fn run_slice(&mut self, cycles: u32) {
        self.run_vcpu(cycles.min(vga::PIXEL_BURST));
    }

    /// Drain resampled audio into `buffer`; returns samples written.
    pub fn fill_audio(&mut self, buffer: &mut [i16]) -> usize {
        let n = buffer.len().min(self.audio_buffer.len());
        buffer[..n].copy_from_slice(&self.audio_buffer[..n]);
        self.audio_buffer.drain(..n);
        n
    }

    /// The serial byte visible to the core at the given `videoY`.
    pub(crate) fn read_serial(&self, video_y: u8) -> u8 {
        match &self.serial_current {
            Some(frame) => frame.get(video_y).unwrap_or(0xff),
            None => self.serial_in,
        }
    }
}
