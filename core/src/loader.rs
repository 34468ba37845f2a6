//! Host-side serial loader framing.
//!
//! The sender's half of the loader protocol: GT1 images are cut into
//! 65-byte frames phase-locked to videoY (see `sys::loaderfn` for the
//! receiving engine and the byte positions). Each frame also carries
//! the previous frame's checksum in the blank region, so a transfer of
//! n frames takes n+1 video frames to land.

use crate::gt1::Gt1File;
use crate::sys::loaderfn::{
    PAYLOAD_MAX, PAYLOAD_STEP, POS_ADDR_H, POS_ADDR_L, POS_CHECKSUM, POS_LENGTH,
    POS_PAYLOAD, POS_PROTOCOL, PROTOCOL_BYTE,
};

/// One video frame's worth of scheduled serial bytes, keyed by videoY.
pub struct SerialFrame {
    slots: Vec<(u8, u8)>,
}

impl SerialFrame {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn set(&mut self, video_y: u8, byte: u8) -> &mut Self {
        self.slots.retain(|&(y, _)| y != video_y);
        self.slots.push((video_y, byte));
        self
    }

    /// The byte on the wire at this videoY, if any is scheduled.
    pub fn get(&self, video_y: u8) -> Option<u8> {
        self.slots
            .iter()
            .find(|&&(y, _)| y == video_y)
            .map(|&(_, b)| b)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Default for SerialFrame {
    fn default() -> Self {
        Self::new()
    }
}

/// A data or end-of-transfer packet before framing.
struct Packet {
    len: u8,
    addr: u16,
    payload: Vec<u8>,
}

impl Packet {
    /// Rolling XOR over every byte the receiver folds.
    fn checksum(&self) -> u8 {
        let mut sum = PROTOCOL_BYTE ^ self.len ^ (self.addr as u8) ^ (self.addr >> 8) as u8;
        for &b in &self.payload {
            sum ^= b;
        }
        sum
    }

    fn fill(&self, frame: &mut SerialFrame) {
        frame.set(POS_PROTOCOL, PROTOCOL_BYTE);
        frame.set(POS_LENGTH, self.len);
        frame.set(POS_ADDR_L, self.addr as u8);
        frame.set(POS_ADDR_H, (self.addr >> 8) as u8);
        let mut y = POS_PAYLOAD;
        for &b in &self.payload {
            frame.set(y, b);
            y = y.wrapping_add(PAYLOAD_STEP);
        }
    }
}

/// Encode a GT1 image as loader frames, ready for
/// `Gigatron::push_serial_frame` one per video frame.
pub fn frames_for_gt1(gt1: &Gt1File) -> Vec<SerialFrame> {
    let mut packets = Vec::new();
    for seg in &gt1.segments {
        for (k, chunk) in seg.data.chunks(PAYLOAD_MAX as usize).enumerate() {
            packets.push(Packet {
                len: chunk.len() as u8,
                addr: seg.addr + (k * PAYLOAD_MAX as usize) as u16,
                payload: chunk.to_vec(),
            });
        }
    }
    packets.push(Packet {
        len: 0,
        addr: gt1.entry,
        payload: Vec::new(),
    });

    let mut frames = Vec::with_capacity(packets.len() + 1);
    let mut pending_checksum = None;
    for packet in &packets {
        let mut frame = SerialFrame::new();
        if let Some(sum) = pending_checksum {
            frame.set(POS_CHECKSUM, sum);
        }
        packet.fill(&mut frame);
        pending_checksum = Some(packet.checksum());
        frames.push(frame);
    }
    // Trailing frame: nothing but the final checksum.
    let mut last = SerialFrame::new();
    if let Some(sum) = pending_checksum {
        last.set(POS_CHECKSUM, sum);
    }
    frames.push(last);
    frames
}
