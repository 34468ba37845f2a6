use gigatron_core::core::machine::{InputButton, Machine};
use gigatron_core::core::ram::{warm_pc, RamSize};
use gigatron_core::core::vga;
use gigatron_core::core::{CoreConfig, Gigatron};
use gigatron_core::gt1::Gt1File;
use gigatron_core::input::{button, ControllerType};
use gigatron_core::loader::frames_for_gt1;
use gigatron_core::vcpu::VCPU_PAGE;

use crate::registry::MachineEntry;

// ---------------------------------------------------------------------------
// Input button IDs
// ---------------------------------------------------------------------------
pub const INPUT_RIGHT: u8 = 0;
pub const INPUT_LEFT: u8 = 1;
pub const INPUT_DOWN: u8 = 2;
pub const INPUT_UP: u8 = 3;
pub const INPUT_START: u8 = 4;
pub const INPUT_SELECT: u8 = 5;
pub const INPUT_B: u8 = 6;
pub const INPUT_A: u8 = 7;

const GIGATRON_INPUT_MAP: &[InputButton] = &[
    InputButton { id: INPUT_RIGHT, name: "Right" },
    InputButton { id: INPUT_LEFT, name: "Left" },
    InputButton { id: INPUT_DOWN, name: "Down" },
    InputButton { id: INPUT_UP, name: "Up" },
    InputButton { id: INPUT_START, name: "Start" },
    InputButton { id: INPUT_SELECT, name: "Select" },
    InputButton { id: INPUT_B, name: "B" },
    InputButton { id: INPUT_A, name: "A" },
];

/// Gigatron TTL microcomputer, 64K board.
///
/// Hardware: 8-bit TTL CPU at 6.25 MHz racing 640x480 VGA timing at a
/// quarter pixel rate. 160x120 visible pixels at 2:2:2 RGB, four
/// wavetable sound channels behind a 4-bit DAC, a game controller on
/// an 8-bit serial shift register. Everything (video, audio, input and
/// the vCPU/v6502 guest interpreters) is interleaved in one
/// cycle-accounted instruction stream; see the core crate.
pub struct Gigatron64k {
    core: Gigatron,
    config: CoreConfig,
    /// Pressed-button mask in TypeB bit positions.
    pressed: u8,
}

impl Gigatron64k {
    pub fn new() -> Self {
        Self::with_config(CoreConfig {
            ram: RamSize::K64,
            ..Default::default()
        })
    }

    pub fn with_config(config: CoreConfig) -> Self {
        Self {
            core: Gigatron::new(config.clone()),
            config,
            pressed: 0,
        }
    }

    /// Direct access to the core for probing and tooling.
    pub fn core(&self) -> &Gigatron {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut Gigatron {
        &mut self.core
    }

    /// Deposit a GT1 image straight into RAM and jump to its entry
    /// point, the way a development cable would.
    pub fn load_gt1(&mut self, gt1: &Gt1File) {
        for seg in &gt1.segments {
            for (k, &b) in seg.data.iter().enumerate() {
                self.core.wr(seg.addr + k as u16, b);
            }
        }
        self.core.set_vpc(warm_pc(gt1.entry));
        self.core
            .set_zp(gigatron_core::core::ram::zp::V_CPU_SELECT, VCPU_PAGE);
    }

    /// Send a GT1 image through the serial loader protocol instead:
    /// one frame per video frame, checksummed, consumed by whatever
    /// loader the guest is running.
    pub fn send_gt1(&mut self, gt1: &Gt1File) {
        for frame in frames_for_gt1(gt1) {
            self.core.push_serial_frame(frame);
        }
    }

    /// Frames still queued on the serial line.
    pub fn transfer_pending(&self) -> usize {
        self.core.serial_frames_pending()
    }

    fn update_serial(&mut self) {
        let raw = match self.config.controller {
            ControllerType::TypeB => !self.pressed,
            // Priority encoder: the lowest-numbered pressed button wins
            // and appears as a run of trailing ones.
            ControllerType::TypeC => match self.pressed.trailing_zeros() {
                8.. => 0xff,
                n => ((1u16 << n) - 1) as u8,
            },
        };
        self.core.set_serial_in(raw);
    }
}

impl Default for Gigatron64k {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine for Gigatron64k {
    fn display_size(&self) -> (u32, u32) {
        (vga::DISPLAY_WIDTH, vga::DISPLAY_HEIGHT)
    }

    fn run_frame(&mut self) {
        self.core.step_frame();
    }

    fn render_frame(&self, buffer: &mut [u8]) {
        for (k, &pixel) in self.core.framebuffer().iter().enumerate() {
            let (r, g, b) = vga::rgb(pixel);
            buffer[3 * k] = r;
            buffer[3 * k + 1] = g;
            buffer[3 * k + 2] = b;
        }
    }

    fn set_input(&mut self, button_id: u8, pressed: bool) {
        let bit = match button_id {
            INPUT_RIGHT => button::RIGHT,
            INPUT_LEFT => button::LEFT,
            INPUT_DOWN => button::DOWN,
            INPUT_UP => button::UP,
            INPUT_START => button::START,
            INPUT_SELECT => button::SELECT,
            INPUT_B => button::B,
            INPUT_A => button::A,
            _ => return,
        };
        if pressed {
            self.pressed |= bit;
        } else {
            self.pressed &= !bit;
        }
        self.update_serial();
    }

    fn input_map(&self) -> &[InputButton] {
        GIGATRON_INPUT_MAP
    }

    fn reset(&mut self) {
        // Power cycle: everything back through the boot walk.
        self.core = Gigatron::new(self.config.clone());
        self.pressed = 0;
    }

    fn audio_sample_rate(&self) -> u32 {
        gigatron_core::audio::OUTPUT_SAMPLE_RATE as u32
    }

    fn fill_audio(&mut self, buffer: &mut [i16]) -> usize {
        self.core.fill_audio(buffer)
    }
}

inventory::submit! {
    MachineEntry::new("gigatron64k", "Gigatron TTL microcomputer (64K)", || {
        Box::new(Gigatron64k::new())
    })
}
