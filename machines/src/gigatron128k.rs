use gigatron_core::core::machine::{InputButton, Machine};
use gigatron_core::core::ram::RamSize;
use gigatron_core::core::{CoreConfig, Gigatron};
use gigatron_core::sys::spi::SpiPort;

use crate::gigatron64k::Gigatron64k;
use crate::registry::MachineEntry;

/// Gigatron with the 128K RAM & I/O expansion board.
///
/// The classic 64K map stays put; three alternate 32K banks sit behind
/// the 0x8000-0xFFFF window under the expansion control latch, which
/// also drives four SPI slave selects. The video fetch path follows
/// the CPU's bank choice only across vertical blank.
pub struct Gigatron128k {
    inner: Gigatron64k,
}

impl Gigatron128k {
    pub fn new() -> Self {
        Self::with_config(CoreConfig::default())
    }

    /// Build with explicit configuration; the RAM size is always the
    /// expansion board's.
    pub fn with_config(config: CoreConfig) -> Self {
        Self {
            inner: Gigatron64k::with_config(CoreConfig {
                ram: RamSize::K128,
                ..config
            }),
        }
    }

    pub fn core(&self) -> &Gigatron {
        self.inner.core()
    }

    pub fn core_mut(&mut self) -> &mut Gigatron {
        self.inner.core_mut()
    }

    /// Attach an SPI device to one of the expansion's slave selects.
    pub fn attach_spi(&mut self, port: usize, dev: Box<dyn SpiPort>) {
        self.inner.core_mut().attach_spi(port, dev);
    }

    pub fn load_gt1(&mut self, gt1: &gigatron_core::gt1::Gt1File) {
        self.inner.load_gt1(gt1);
    }

    pub fn send_gt1(&mut self, gt1: &gigatron_core::gt1::Gt1File) {
        self.inner.send_gt1(gt1);
    }
}

impl Default for Gigatron128k {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine for Gigatron128k {
    fn display_size(&self) -> (u32, u32) {
        self.inner.display_size()
    }

    fn run_frame(&mut self) {
        self.inner.run_frame();
    }

    fn render_frame(&self, buffer: &mut [u8]) {
        self.inner.render_frame(buffer);
    }

    fn set_input(&mut self, button: u8, pressed: bool) {
        self.inner.set_input(button, pressed);
    }

    fn input_map(&self) -> &[InputButton] {
        self.inner.input_map()
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    fn audio_sample_rate(&self) -> u32 {
        self.inner.audio_sample_rate()
    }

    fn fill_audio(&mut self, buffer: &mut [i16]) -> usize {
        self.inner.fill_audio(buffer)
    }
}

inventory::submit! {
    MachineEntry::new("gigatron128k", "Gigatron with the 128K expansion", || {
        Box::new(Gigatron128k::new())
    })
}
