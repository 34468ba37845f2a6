//! SPI exchange over the expansion bus.

use crate::core::Gigatron;
use crate::core::ram::zp;

/// A device behind one of the four expansion slave selects.
pub trait SpiPort {
    /// Exchange one byte: send `mosi`, return the device's reply.
    fn exchange(&mut self, mosi: u8) -> u8;
}

/// Bytes exchanged per slice.
const SPI_BURST: u16 = 4;

impl Gigatron {
    /// SYS_SpiExchangeBytes_134. Sends sysArgs[4] bytes (0 means 256)
    /// from [sysArgs[0:1]] and stores the replies at [sysArgs[2:3]].
    /// The addressed device is the first slave whose select bit is
    /// driven low in the control latch; with none selected (or nothing
    /// attached) the bus floats high and every reply reads 0xff.
    pub(crate) fn sys_spi_exchange_bytes(&mut self) -> u32 {
        let raw = self.zp(zp::SYS_ARGS + 4);
        let count = if raw == 0 { 256 } else { raw as u16 };
        let mut src = self.zp_word(zp::SYS_ARGS);
        let mut dst = self.zp_word(zp::SYS_ARGS + 2);

        let selected = self.selected_spi_port();
        let n = count.min(SPI_BURST);
        for _ in 0..n {
            let mosi = self.rd(src);
            let miso = match selected {
                Some(port) => match &mut self.spi[port] {
                    Some(dev) => dev.exchange(mosi),
                    None => 0xff,
                },
                None => 0xff,
            };
            self.wr(dst, miso);
            src = src.wrapping_add(1);
            dst = dst.wrapping_add(1);
        }
        self.set_zp_word(zp::SYS_ARGS, src);
        self.set_zp_word(zp::SYS_ARGS + 2, dst);
        self.set_zp(zp::SYS_ARGS + 4, (count - n) as u8);
        if count > n {
            self.sys_reissue();
        }
        134
    }

    /// Index of the first slave select driven low, if any.
    fn selected_spi_port(&self) -> Option<usize> {
        let ss = (self.ctrl_bits >> 2) & 0x0f;
        (0..4).find(|&k| ss & (1 << k) == 0)
    }
}
