//! The ROM image: SYS vectors, the application directory, and the
//! embedded GT1 payloads.
//!
//! The image is a flat 64 KiB byte space. Page 0 reserves
//! 0x0080..0x00ef for the SYS vector region; those addresses are the
//! values guests store into `sysFn`, stable across revisions. The
//! directory and payloads sit in fixed pages above that. `LUP` and the
//! Exec loader read bytes through [`Rom::read`]; there is no
//! trampoline convention to honor in this rendition.

use crate::core::programs;

/// First directory record. Records are 12 bytes: an 8-byte
/// space-padded name, the payload's ROM address, and the next record's
/// address (0 terminates the list).
pub const DIR_BASE: u16 = 0x0b00;

/// ROM addresses of the embedded GT1 streams.
pub const RESET_PAYLOAD: u16 = 0x0c00;
pub const LOADER_PAYLOAD: u16 = 0x0e00;

pub struct Rom {
    bytes: Vec<u8>,
}

impl Rom {
    /// Assemble the standard image: directory plus the Reset and
    /// Loader programs.
    pub fn standard() -> Self {
        let mut rom = Self { bytes: vec![0; 0x10000] };
        rom.install_record(DIR_BASE, "Reset", RESET_PAYLOAD, DIR_BASE + 12);
        rom.install_record(DIR_BASE + 12, "Loader", LOADER_PAYLOAD, 0);
        rom.install(RESET_PAYLOAD, &programs::reset_gt1());
        rom.install(LOADER_PAYLOAD, &programs::loader_gt1());
        rom
    }

    /// An empty image for tests that install their own payloads.
    pub fn blank() -> Self {
        Self { bytes: vec![0; 0x10000] }
    }

    #[inline]
    pub fn read(&self, addr: u16) -> u8 {
        self.bytes[addr as usize]
    }

    /// Place raw bytes at a fixed ROM address.
    pub fn install(&mut self, addr: u16, data: &[u8]) {
        let start = addr as usize;
        self.bytes[start..start + data.len()].copy_from_slice(data);
    }

    fn install_record(&mut self, at: u16, name: &str, payload: u16, next: u16) {
        let mut record = [b' '; 12];
        for (k, b) in name.bytes().take(8).enumerate() {
            record[k] = b;
        }
        record[8] = payload as u8;
        record[9] = (payload >> 8) as u8;
        record[10] = next as u8;
        record[11] = (next >> 8) as u8;
        self.install(at, &record);
    }
}
