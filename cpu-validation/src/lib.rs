//! Conformance tooling for the v6502 emulator.
//!
//! Test cases are single instructions: an initial register/memory
//! state, and the expected state after exactly one instruction. The
//! JSON shape follows the single-step corpora commonly used for 6502
//! validation, with P stored in its architectural layout (V in bit 6,
//! N/Z materialized). The harness translates to and from the core's
//! internal layout (V in bit 7, lazy Qn/Qz).

use gigatron_core::core::ram::zp;
use gigatron_core::core::{CoreConfig, Gigatron};
use gigatron_core::v6502::ENTER_PAGE;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct V6502State {
    pub pc: u16,
    pub s: u8,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    /// Architectural P: NV1BDIZC with B clear, unused set.
    pub p: u8,
    /// Sparse memory: (address, value) pairs.
    pub ram: Vec<(u16, u8)>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct V6502TestCase {
    pub name: String,
    pub initial: V6502State,
    #[serde(rename = "final")]
    pub final_state: V6502State,
}

/// A fresh core with zeroed RAM for deterministic cases.
pub fn harness_core() -> Gigatron {
    Gigatron::new(CoreConfig {
        zeroed_ram: true,
        ..Default::default()
    })
}

/// Load a case's initial state into the zero-page register file.
pub fn apply_state(core: &mut Gigatron, st: &V6502State) {
    core.set_zp_word(zp::V6502_PC, st.pc);
    core.set_zp(zp::V6502_S, st.s);
    core.set_zp(zp::V6502_A, st.a);
    core.set_zp(zp::V6502_X, st.x);
    core.set_zp(zp::V6502_Y, st.y);
    // Architectural -> internal: V moves to bit 7, N/Z become lazy
    // evidence bytes.
    let mut held = (st.p & 0x0d) | 0x20;
    if st.p & 0x40 != 0 {
        held |= 0x80;
    }
    core.set_zp(zp::V6502_P, held);
    core.set_zp(zp::V6502_QN, st.p);
    core.set_zp(zp::V6502_QZ, if st.p & 0x02 != 0 { 0 } else { 1 });
    core.set_zp(zp::V_CPU_SELECT, ENTER_PAGE);
    for &(addr, value) in &st.ram {
        core.wr(addr, value);
    }
}

/// Read the architectural view of the register file back out.
pub fn read_state(core: &Gigatron, ram_probe: &[(u16, u8)]) -> V6502State {
    let held = core.zp(zp::V6502_P);
    let mut p = (held & 0x0d) | 0x20;
    if held & 0x80 != 0 {
        p |= 0x40;
    }
    if core.zp(zp::V6502_QN) & 0x80 != 0 {
        p |= 0x80;
    }
    if core.zp(zp::V6502_QZ) == 0 {
        p |= 0x02;
    }
    V6502State {
        pc: core.zp_word(zp::V6502_PC),
        s: core.zp(zp::V6502_S),
        a: core.zp(zp::V6502_A),
        x: core.zp(zp::V6502_X),
        y: core.zp(zp::V6502_Y),
        p,
        ram: ram_probe
            .iter()
            .map(|&(addr, _)| (addr, core.rd(addr)))
            .collect(),
    }
}

/// Run one case; returns a description of the first mismatch.
pub fn run_case(tc: &V6502TestCase) -> Result<(), String> {
    let mut core = harness_core();
    apply_state(&mut core, &tc.initial);
    core.v6502_step_one();
    let got = read_state(&core, &tc.final_state.ram);

    let want = &tc.final_state;
    let checks: [(&str, u16, u16); 6] = [
        ("PC", got.pc, want.pc),
        ("S", got.s as u16, want.s as u16),
        ("A", got.a as u16, want.a as u16),
        ("X", got.x as u16, want.x as u16),
        ("Y", got.y as u16, want.y as u16),
        ("P", got.p as u16, want.p as u16),
    ];
    for (what, g, w) in checks {
        if g != w {
            return Err(format!("{}: {what} = {g:#06x}, want {w:#06x}", tc.name));
        }
    }
    for (&(addr, want_v), &(_, got_v)) in want.ram.iter().zip(got.ram.iter()) {
        if got_v != want_v {
            return Err(format!(
                "{}: RAM[{addr:#06x}] = {got_v:#04x}, want {want_v:#04x}",
                tc.name
            ));
        }
    }
    Ok(())
}

/// The legal NMOS opcodes the generator sweeps. BRK is excluded: its
/// hand-off to the vCPU is covered by the core's integration tests.
pub const LEGAL_OPCODES: &[u8] = &[
    0x01, 0x05, 0x06, 0x08, 0x09, 0x0a, 0x0d, 0x0e, 0x10, 0x11, 0x15, 0x16,
    0x18, 0x19, 0x1d, 0x1e, 0x20, 0x21, 0x24, 0x25, 0x26, 0x28, 0x29, 0x2a,
    0x2c, 0x2d, 0x2e, 0x30, 0x31, 0x35, 0x36, 0x38, 0x39, 0x3d, 0x3e, 0x40,
    0x41, 0x45, 0x46, 0x48, 0x49, 0x4a, 0x4c, 0x4d, 0x4e, 0x50, 0x51, 0x55,
    0x56, 0x58, 0x59, 0x5d, 0x5e, 0x60, 0x61, 0x65, 0x66, 0x68, 0x69, 0x6a,
    0x6c, 0x6d, 0x6e, 0x70, 0x71, 0x75, 0x76, 0x78, 0x79, 0x7d, 0x7e, 0x81,
    0x84, 0x85, 0x86, 0x88, 0x8a, 0x8c, 0x8d, 0x8e, 0x90, 0x91, 0x94, 0x95,
    0x96, 0x98, 0x99, 0x9a, 0x9d, 0xa0, 0xa1, 0xa2, 0xa4, 0xa5, 0xa6, 0xa8,
    0xa9, 0xaa, 0xac, 0xad, 0xae, 0xb0, 0xb1, 0xb4, 0xb5, 0xb6, 0xb8, 0xb9,
    0xba, 0xbc, 0xbd, 0xbe, 0xc0, 0xc1, 0xc4, 0xc5, 0xc6, 0xc8, 0xc9, 0xca,
    0xcc, 0xcd, 0xce, 0xd0, 0xd1, 0xd5, 0xd6, 0xd8, 0xd9, 0xdd, 0xde, 0xe0,
    0xe1, 0xe4, 0xe5, 0xe6, 0xe8, 0xe9, 0xea, 0xec, 0xed, 0xee, 0xf0, 0xf1,
    0xf5, 0xf6, 0xf8, 0xf9, 0xfd, 0xfe,
];
