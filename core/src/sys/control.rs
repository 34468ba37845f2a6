//! Video mode and expansion-bus control.

use crate::core::Gigatron;

impl Gigatron {
    /// SYS_SetMode_80. vAC selects how many sub-lines of each pixel
    /// row are blanked (0..3); blanked lines become guest slices.
    pub(crate) fn sys_set_mode(&mut self) -> u32 {
        let mode = self.vac() as u8 & 3;
        self.set_video_mode(mode);
        80
    }

    /// SYS_ExpanderControl_40. Writes the expansion control latch from
    /// vAC: bits 7:6 bank select, bits 5:2 SPI slave selects (active
    /// low). A no-op on boards without the expansion, like the hardware
    /// instruction itself.
    pub(crate) fn sys_expander_control(&mut self) -> u32 {
        let bits = self.vac() as u8;
        self.ctrl_write(bits);
        40
    }
}
