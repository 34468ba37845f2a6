use gigatron_core::core::ram::{warm_pc, zp};
use gigatron_core::vcpu::asm::Asm;

mod common;
use common::{aim, aim_asm, run_slices, test_core};

// =================================================================
// Unconditional flow
// =================================================================

#[test]
fn test_bra_is_page_local() {
    let mut core = test_core();
    // 0x0200: BRA 0x0210; filler; 0x0210: INC 0x60
    let mut a = Asm::new(0x0200);
    a.bra(0x0210);
    let mut code = a.into_bytes();
    code.resize(0x10, 0);
    let mut b = Asm::new(0x0210);
    b.inc(0x60);
    code.extend(b.into_bytes());
    aim(&mut core, 0x0200, &code);

    common::run_one_instruction(&mut core);
    common::run_one_instruction(&mut core);
    assert_eq!(core.zp(0x60), 1);
    assert_eq!(core.vpc(), 0x0210);
}

#[test]
fn test_def_skips_body_and_points_at_it() {
    let mut core = test_core();
    // DEF over a one-byte body at 0x0202.
    let mut a = Asm::new(0x0200);
    a.def(0x0203).db(&[0xff]); // body: RET
    a.inc(0x60);
    let code = a.into_bytes();
    aim(&mut core, 0x0200, &code);
    common::run_one_instruction(&mut core);
    assert_eq!(core.vac(), 0x0202); // points at the body
    common::run_one_instruction(&mut core);
    assert_eq!(core.zp(0x60), 1); // landed after it
}

// =================================================================
// Conditional branches: signed tests of vAC
// =================================================================

fn branch_taken(cc: fn(&mut Asm, u16) -> &mut Asm, vac: u16) -> bool {
    let mut core = test_core();
    let mut a = Asm::new(0x0200);
    cc(&mut a, 0x0220);
    let mut code = a.into_bytes();
    code.resize(0x20, 0);
    let mut b = Asm::new(0x0220);
    b.inc(0x61);
    code.extend(b.into_bytes());
    core.set_vac(vac);
    aim(&mut core, 0x0200, &code);
    core.set_vac(vac); // aim clears nothing, but be explicit
    common::run_one_instruction(&mut core);
    common::run_one_instruction(&mut core);
    core.zp(0x61) == 1
}

#[test]
fn test_conditional_branch_matrix() {
    // (assembler method, vAC, expected taken)
    let cases: &[(fn(&mut Asm, u16) -> &mut Asm, u16, bool)] = &[
        (Asm::beq, 0, true),
        (Asm::beq, 1, false),
        (Asm::bne, 0, false),
        (Asm::bne, 0xffff, true),
        (Asm::bgt, 1, true),
        (Asm::bgt, 0, false),
        (Asm::bgt, 0x8000, false),
        (Asm::bge, 0, true),
        (Asm::bge, 0xffff, false),
        (Asm::blt, 0xffff, true),
        (Asm::blt, 0, false),
        (Asm::ble, 0, true),
        (Asm::ble, 0xfffe, true),
        (Asm::ble, 2, false),
    ];
    for &(cc, vac, expect) in cases {
        assert_eq!(branch_taken(cc, vac), expect, "vAC = {vac:#06x}");
    }
}

#[test]
fn test_branch_not_taken_falls_through() {
    let mut core = test_core();
    core.set_vac(5);
    aim_asm(&mut core, 0x0200, |a| {
        a.beq(0x0280).inc(0x60);
    });
    run_slices(&mut core, 1);
    assert_eq!(core.zp(0x60), 1);
}

// =================================================================
// Calls and returns
// =================================================================

#[test]
fn test_call_through_variable_and_ret() {
    let mut core = test_core();
    // Subroutine at 0x0300: INC 0x60; RET.
    let mut sub = Asm::new(0x0300);
    sub.inc(0x60).ret();
    let sub = sub.into_bytes();
    for (k, &b) in sub.iter().enumerate() {
        core.wr(0x0300 + k as u16, b);
    }
    aim_asm(&mut core, 0x0200, |a| {
        a.ldwi(0x0300).stw(0x70).call(0x70).inc(0x61);
    });
    run_slices(&mut core, 2);
    assert_eq!(core.zp(0x60), 1);
    assert_eq!(core.zp(0x61), 1, "RET did not land after the CALL");
}

#[test]
fn test_calli_ret_returns_to_next_instruction() {
    // The §CALLI contract: CALLI addr; RET with vLR unchanged comes
    // back to the instruction after the CALLI.
    let mut core = test_core();
    let mut sub = Asm::new(0x0300);
    sub.inc(0x60).ret();
    let sub = sub.into_bytes();
    for (k, &b) in sub.iter().enumerate() {
        core.wr(0x0300 + k as u16, b);
    }
    aim_asm(&mut core, 0x0200, |a| {
        a.calli(0x0300).inc(0x61);
    });
    run_slices(&mut core, 2);
    assert_eq!(core.zp(0x60), 1);
    assert_eq!(core.zp(0x61), 1);
    assert_eq!(core.vlr(), 0x0203); // the instruction after CALLI
}

#[test]
fn test_call_crosses_pages() {
    let mut core = test_core();
    let mut sub = Asm::new(0x0500);
    sub.inc(0x60).ret();
    let bytes = sub.into_bytes();
    for (k, &b) in bytes.iter().enumerate() {
        core.wr(0x0500 + k as u16, b);
    }
    aim_asm(&mut core, 0x0200, |a| {
        a.calli(0x0500).inc(0x61);
    });
    run_slices(&mut core, 2);
    assert_eq!(core.zp(0x60), 1);
    assert_eq!(core.zp(0x61), 1);
}

// =================================================================
// The reset stub
// =================================================================

#[test]
fn test_reset_stub_chains_to_loader() {
    let mut core = test_core();
    // Jump into the stub the way a hung guest would be rescued.
    core.set_vpc(warm_pc(gigatron_core::core::ram::p1::V_RESET));
    core.set_zp(zp::V_CPU_SELECT, gigatron_core::vcpu::VCPU_PAGE);
    // Enough slices for Exec to stream Reset in, Reset to rebuild the
    // waveform table, and the chain to land in the Loader poll loop.
    for _ in 0..400 {
        core.run_slice(160);
    }
    assert_eq!(core.vpc() & 0xff00, 0x0300, "not in the Loader loop");
    // Reset's side effects: waveforms rebuilt, loader display mode on.
    assert_eq!(core.rd(0x0700 | 63 << 2), 63); // sawtooth tops out
    assert_eq!(core.zp(zp::VIDEO_MODE_B), 1);
}
