use gigatron_core::core::ram::zp;

mod common;
use common::{aim, aim_asm, run_slices, test_core};

// =================================================================
// Immediates and zero-page load/store
// =================================================================

#[test]
fn test_ldwi_loads_word() {
    let mut core = test_core();
    aim_asm(&mut core, 0x0200, |a| {
        a.ldwi(0x1234);
    });
    run_slices(&mut core, 1);
    assert_eq!(core.vac(), 0x1234);
}

#[test]
fn test_ldi_clears_high_byte() {
    let mut core = test_core();
    core.set_vac(0xffff);
    aim_asm(&mut core, 0x0200, |a| {
        a.ldi(0x42);
    });
    run_slices(&mut core, 1);
    assert_eq!(core.vac(), 0x0042);
}

#[test]
fn test_ld_st_byte() {
    let mut core = test_core();
    core.set_zp(0x60, 0x99);
    aim_asm(&mut core, 0x0200, |a| {
        a.ld(0x60).st(0x61);
    });
    run_slices(&mut core, 1);
    assert_eq!(core.vac(), 0x0099);
    assert_eq!(core.zp(0x61), 0x99);
}

#[test]
fn test_ldw_stw_word() {
    let mut core = test_core();
    core.set_zp(0x60, 0xcd);
    core.set_zp(0x61, 0xab);
    aim_asm(&mut core, 0x0200, |a| {
        a.ldw(0x60).stw(0x62);
    });
    run_slices(&mut core, 1);
    assert_eq!(core.vac(), 0xabcd);
    assert_eq!(core.zp(0x62), 0xcd);
    assert_eq!(core.zp(0x63), 0xab);
}

#[test]
fn test_inc_byte_only() {
    let mut core = test_core();
    core.set_zp(0x60, 0xff);
    core.set_zp(0x61, 0x10);
    aim_asm(&mut core, 0x0200, |a| {
        a.inc(0x60);
    });
    run_slices(&mut core, 1);
    assert_eq!(core.zp(0x60), 0x00); // wraps, no carry into 0x61
    assert_eq!(core.zp(0x61), 0x10);
}

// =================================================================
// Arithmetic and logic
// =================================================================

#[test]
fn test_addw_subw() {
    let mut core = test_core();
    core.set_zp(0x60, 0x34);
    core.set_zp(0x61, 0x12);
    aim_asm(&mut core, 0x0200, |a| {
        a.ldwi(0xf000).addw(0x60);
    });
    run_slices(&mut core, 1);
    assert_eq!(core.vac(), 0x0234); // wraps at 16 bits

    aim_asm(&mut core, 0x0220, |a| {
        a.ldwi(0x0234).subw(0x60);
    });
    run_slices(&mut core, 1);
    assert_eq!(core.vac(), 0xf000);
}

#[test]
fn test_addi_subi_are_unsigned_bytes() {
    let mut core = test_core();
    aim_asm(&mut core, 0x0200, |a| {
        a.ldwi(0x00ff).addi(0x01).subi(0x02);
    });
    run_slices(&mut core, 1);
    assert_eq!(core.vac(), 0x00fe);
}

#[test]
fn test_addv_subv_modify_variable() {
    let mut core = test_core();
    core.set_zp(0x60, 0x00);
    core.set_zp(0x61, 0x10);
    aim_asm(&mut core, 0x0200, |a| {
        a.ldwi(0x0234).addv(0x60);
    });
    run_slices(&mut core, 1);
    assert_eq!(core.zp(0x60), 0x34);
    assert_eq!(core.zp(0x61), 0x12);
    assert_eq!(core.vac(), 0x0234); // vAC untouched
}

#[test]
fn test_andi_clears_high_byte() {
    let mut core = test_core();
    aim_asm(&mut core, 0x0200, |a| {
        a.ldwi(0xabcd).andi(0xf0);
    });
    run_slices(&mut core, 1);
    assert_eq!(core.vac(), 0x00c0);
}

#[test]
fn test_ori_xori_leave_high_byte() {
    let mut core = test_core();
    aim_asm(&mut core, 0x0200, |a| {
        a.ldwi(0xab00).ori(0x0f).xori(0x03);
    });
    run_slices(&mut core, 1);
    assert_eq!(core.vac(), 0xab0c);
}

#[test]
fn test_word_logic() {
    let mut core = test_core();
    core.set_zp(0x60, 0x0f);
    core.set_zp(0x61, 0xf0);
    aim_asm(&mut core, 0x0200, |a| {
        a.ldwi(0x3c3c).andw(0x60);
    });
    run_slices(&mut core, 1);
    assert_eq!(core.vac(), 0x300c);

    aim_asm(&mut core, 0x0220, |a| {
        a.ldwi(0x3c3c).orw(0x60);
    });
    run_slices(&mut core, 1);
    assert_eq!(core.vac(), 0xfc3f);

    aim_asm(&mut core, 0x0240, |a| {
        a.ldwi(0x3c3c).xorw(0x60);
    });
    run_slices(&mut core, 1);
    assert_eq!(core.vac(), 0xcc33);
}

#[test]
fn test_lslw_is_addw_of_self() {
    let mut core = test_core();
    aim_asm(&mut core, 0x0200, |a| {
        a.ldwi(0x4321).stw(0x60).lslw();
    });
    run_slices(&mut core, 1);
    let shifted = core.vac();

    aim_asm(&mut core, 0x0220, |a| {
        a.ldwi(0x4321).addw(0x60);
    });
    run_slices(&mut core, 1);
    assert_eq!(shifted, core.vac());
    assert_eq!(shifted, 0x8642);
}

// =================================================================
// Program counter discipline
// =================================================================

#[test]
fn test_vpc_advances_by_width() {
    let mut core = test_core();
    // LDWI (3 bytes) at 0x0200, LDI (2) at 0x0203, LSLW (1) at 0x0205.
    aim_asm(&mut core, 0x0200, |a| {
        a.ldwi(1).ldi(2).lslw();
    });
    common::run_one_instruction(&mut core);
    assert_eq!(core.vpc(), 0x0201); // 3-byte: net +3 against the base +2
    common::run_one_instruction(&mut core);
    assert_eq!(core.vpc(), 0x0203); // 2-byte: the base advance alone
    common::run_one_instruction(&mut core);
    assert_eq!(core.vpc(), 0x0204); // 1-byte: backed up one
    assert_eq!(core.vac(), 4);
}

#[test]
fn test_execution_wraps_within_code_page() {
    let mut core = test_core();
    // An INC at the very end of the page: the next fetch wraps to the
    // page start, never into the next page.
    aim(&mut core, 0x04fe, &[0x93, 0x60]); // INC 0x60
    aim(&mut core, 0x0400, &[0x93, 0x61]); // INC 0x61
    core.set_vpc(gigatron_core::core::ram::warm_pc(0x04fe));
    run_slices(&mut core, 1);
    assert!(core.zp(0x60) >= 1);
    assert!(core.zp(0x61) >= 1, "fetch did not wrap into the page start");
    assert_eq!(core.vpc() & 0xff00, 0x0400);
}

// =================================================================
// Comparison helpers
// =================================================================

#[test]
fn test_cmphs_orders_mixed_signs() {
    // -1 < 1 signed: after CMPHS, SUBW's high byte must be negative.
    let mut core = test_core();
    core.set_zp(0x60, 0x01);
    core.set_zp(0x61, 0x00);
    aim_asm(&mut core, 0x0200, |a| {
        a.ldwi(0xffff).cmphs(0x61).subw(0x60);
    });
    run_slices(&mut core, 1);
    assert!((core.vac() as i16) < 0);
}

#[test]
fn test_cmphu_orders_mixed_signs() {
    // 0xffff > 1 unsigned: after CMPHU the difference must be positive.
    let mut core = test_core();
    core.set_zp(0x60, 0x01);
    core.set_zp(0x61, 0x00);
    aim_asm(&mut core, 0x0200, |a| {
        a.ldwi(0xffff).cmphu(0x61).subw(0x60);
    });
    run_slices(&mut core, 1);
    assert!((core.vac() as i16) > 0);
}

// =================================================================
// LUP
// =================================================================

#[test]
fn test_lup_reads_rom() {
    let mut core = test_core();
    core.rom_mut().install(0x5000, &[0xde, 0xad]);
    aim_asm(&mut core, 0x0200, |a| {
        a.ldwi(0x5000).lup(1);
    });
    run_slices(&mut core, 1);
    assert_eq!(core.vac(), 0x00ad);
}

#[test]
fn test_unknown_opcode_dead_stops() {
    let mut core = test_core();
    aim(&mut core, 0x0200, &[0x02, 0x00]); // unassigned byte
    run_slices(&mut core, 3);
    // No progress: vPC rewound so the pre-increment refetches the same
    // instruction forever.
    assert_eq!(core.vpc(), 0x02fe);
    assert_eq!(core.zp(zp::V_CPU_SELECT), gigatron_core::vcpu::VCPU_PAGE);
}
