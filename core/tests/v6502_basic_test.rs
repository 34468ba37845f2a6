use gigatron_core::core::ram::zp;
use gigatron_core::sys::vector;
use gigatron_core::vcpu::VCPU_PAGE;

mod common;
use common::{aim_asm, test_core};

/// Load a 6502 program, enter it through SYS_Run6502, and run until
/// BRK hands control back to the vCPU.
fn run_6502(core: &mut gigatron_core::core::Gigatron, addr: u16, program: &[u8]) {
    for (k, &b) in program.iter().enumerate() {
        core.wr(addr + k as u16, b);
    }
    aim_asm(core, 0x0200, |a| {
        a.ldwi(vector::RUN_6502).stw(zp::SYS_FN);
        a.ldwi(addr);
        a.sys(80);
        a.inc(0x64); // resumes here after BRK
    });
    for _ in 0..400 {
        core.run_slice(160);
        if core.zp(0x64) == 1 {
            return;
        }
    }
    panic!("6502 program did not BRK back to the vCPU");
}

// =================================================================
// Entry, exit, and the zero-page register file
// =================================================================

#[test]
fn test_lda_sta_brk_scenario() {
    let mut core = test_core();
    // LDA #$42; STA $2000; BRK
    run_6502(&mut core, 0x7000, &[0xa9, 0x42, 0x8d, 0x00, 0x20, 0x00]);
    assert_eq!(core.rd(0x2000), 0x42);
    assert_eq!(core.zp(zp::V6502_A), 0x42);
    assert_eq!(core.zp(zp::V_CPU_SELECT), VCPU_PAGE);
}

#[test]
fn test_illegal_opcode_aliases_to_brk() {
    let mut core = test_core();
    // 0x02 is unassigned on the NMOS part.
    run_6502(&mut core, 0x7000, &[0xa2, 0x07, 0x02]);
    assert_eq!(core.zp(zp::V6502_X), 0x07);
}

#[test]
fn test_register_file_is_guest_visible() {
    let mut core = test_core();
    // LDX #$11; LDY #$22; TXS; BRK
    run_6502(&mut core, 0x7000, &[0xa2, 0x11, 0xa0, 0x22, 0x9a, 0x00]);
    assert_eq!(core.zp(zp::V6502_X), 0x11);
    assert_eq!(core.zp(zp::V6502_Y), 0x22);
    assert_eq!(core.zp(zp::V6502_S), 0x11);
}

// =================================================================
// Addressing modes
// =================================================================

#[test]
fn test_zero_page_indexed_wraps() {
    let mut core = test_core();
    core.wr(0x0010, 0x5e);
    // LDX #$20; LDA $F0,X  (0xf0 + 0x20 wraps to 0x10); BRK
    run_6502(&mut core, 0x7000, &[0xa2, 0x20, 0xb5, 0xf0, 0x00]);
    assert_eq!(core.zp(zp::V6502_A), 0x5e);
}

#[test]
fn test_absolute_indexed() {
    let mut core = test_core();
    core.wr(0x20ff, 0x77);
    // LDX #$0F; LDA $20F0,X; BRK
    run_6502(&mut core, 0x7000, &[0xa2, 0x0f, 0xbd, 0xf0, 0x20, 0x00]);
    assert_eq!(core.zp(zp::V6502_A), 0x77);
}

#[test]
fn test_indirect_indexed() {
    let mut core = test_core();
    core.wr(0x00a0, 0x00);
    core.wr(0x00a1, 0x21);
    core.wr(0x2105, 0x3c);
    // LDY #$05; LDA ($A0),Y; BRK
    run_6502(&mut core, 0x7000, &[0xa0, 0x05, 0xb1, 0xa0, 0x00]);
    assert_eq!(core.zp(zp::V6502_A), 0x3c);
}

#[test]
fn test_indexed_indirect() {
    let mut core = test_core();
    core.wr(0x00a4, 0x34);
    core.wr(0x00a5, 0x21);
    core.wr(0x2134, 0x99);
    // LDX #$04; LDA ($A0,X); BRK
    run_6502(&mut core, 0x7000, &[0xa2, 0x04, 0xa1, 0xa0, 0x00]);
    assert_eq!(core.zp(zp::V6502_A), 0x99);
}

#[test]
fn test_jmp_indirect_page_wrap_bug() {
    let mut core = test_core();
    // Pointer at $21FF: low byte from $21FF, high byte from $2100 (the
    // NMOS wrap), landing on INX; BRK at $3005.
    core.wr(0x21ff, 0x05);
    core.wr(0x2100, 0x30);
    core.wr(0x2200, 0x99); // would be the "fixed" high byte
    core.wr(0x3005, 0xe8); // INX
    core.wr(0x3006, 0x00); // BRK
    run_6502(&mut core, 0x7000, &[0xa2, 0x00, 0x6c, 0xff, 0x21]);
    assert_eq!(core.zp(zp::V6502_X), 0x01);
}

// =================================================================
// Stack in the zero page
// =================================================================

#[test]
fn test_stack_lives_in_zero_page() {
    let mut core = test_core();
    // LDX #$F0; TXS; LDA #$AB; PHA; BRK. The pushed byte must land in
    // page 0, not page 1 (page 1 is the video table).
    run_6502(&mut core, 0x7000, &[0xa2, 0xf0, 0x9a, 0xa9, 0xab, 0x48, 0x00]);
    assert_eq!(core.rd(0x00f0), 0xab);
    assert_eq!(core.zp(zp::V6502_S), 0xef);
}

#[test]
fn test_jsr_rts() {
    let mut core = test_core();
    // JSR $7010; BRK ... $7010: INX; RTS
    core.wr(0x7010, 0xe8);
    core.wr(0x7011, 0x60);
    run_6502(&mut core, 0x7000, &[0xa2, 0x00, 0x20, 0x10, 0x70, 0xe8, 0x00]);
    assert_eq!(core.zp(zp::V6502_X), 2); // once in the sub, once after
}

#[test]
fn test_pha_pla_roundtrip() {
    let mut core = test_core();
    run_6502(
        &mut core,
        0x7000,
        // LDA #$5A; PHA; LDA #$00; PLA; BRK
        &[0xa9, 0x5a, 0x48, 0xa9, 0x00, 0x68, 0x00],
    );
    assert_eq!(core.zp(zp::V6502_A), 0x5a);
}

// =================================================================
// Decimal flag: preserved, not honored
// =================================================================

#[test]
fn test_decimal_mode_is_binary() {
    let mut core = test_core();
    // SED; CLC; LDA #$09; ADC #$01; BRK. A real NMOS gives $10 in
    // decimal mode, this core stays binary at $0A with D preserved.
    run_6502(&mut core, 0x7000, &[0xf8, 0x18, 0xa9, 0x09, 0x69, 0x01, 0x00]);
    assert_eq!(core.zp(zp::V6502_A), 0x0a);
    assert_ne!(core.zp(zp::V6502_P) & 0x08, 0, "D flag not preserved");
}

// =================================================================
// Crash loop
// =================================================================

#[test]
fn test_opcode_ff_spins_forever() {
    let mut core = test_core();
    core.wr(0x7000, 0xff);
    aim_asm(&mut core, 0x0200, |a| {
        a.ldwi(vector::RUN_6502).stw(zp::SYS_FN);
        a.ldwi(0x7000);
        a.sys(80);
        a.inc(0x64);
    });
    for _ in 0..100 {
        core.run_slice(160);
    }
    // Still stuck at the un-trapped opcode, never back to the vCPU.
    assert_eq!(core.zp(0x64), 0);
    assert_eq!(core.zp_word(zp::V6502_PC), 0x7000);
}
