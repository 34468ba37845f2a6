//! SYS_Exec: streaming GT1 and GT1z images out of ROM.

use gigatron_core::core::ram::zp;
use gigatron_core::gt1::Gt1File;
use gigatron_core::sys::vector;

mod common;
use common::{aim_asm, run_slices, test_core};

/// Install a payload in spare ROM and invoke SYS_Exec on it.
fn exec_rom_payload(core: &mut gigatron_core::core::Gigatron, payload: &[u8]) {
    const SPARE: u16 = 0x4000;
    core.rom_mut().install(SPARE, payload);
    aim_asm(core, 0x0600, |a| {
        a.ldwi(SPARE).stw(zp::SYS_ARGS);
        a.ldwi(vector::EXEC).stw(zp::SYS_FN);
        a.sys(88);
    });
    run_slices(core, 100);
}

#[test]
fn test_exec_plain_gt1() {
    let mut core = test_core();
    let mut gt1 = Gt1File::new(0x0200);
    gt1.push(0x2000, &[0xaa, 0xbb, 0xcc]);
    gt1.push(0x0200, &[0x90, 0xfe]); // spin loop at the entry
    exec_rom_payload(&mut core, &gt1.to_bytes());

    assert_eq!(core.rd(0x2000), 0xaa);
    assert_eq!(core.rd(0x2002), 0xcc);
    assert_eq!(core.vpc() & 0xff00, 0x0200);
}

#[test]
fn test_exec_full_page_segment() {
    let mut core = test_core();
    let page: Vec<u8> = (0..=255u8).collect();
    let mut gt1 = Gt1File::new(0x0200);
    gt1.push(0x3000, &page);
    gt1.push(0x0200, &[0x90, 0xfe]);
    exec_rom_payload(&mut core, &gt1.to_bytes());

    for (k, &b) in page.iter().enumerate() {
        assert_eq!(core.rd(0x3000 + k as u16), b);
    }
}

#[test]
fn test_exec_gt1z_roundtrips_through_the_fsm() {
    let mut core = test_core();
    // Compressible content: long runs and a repeated motif.
    let mut data = vec![0u8; 0];
    data.extend(std::iter::repeat_n(0x11, 40));
    data.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
    data.extend(std::iter::repeat_n(0x22, 60));
    data.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
    let mut gt1 = Gt1File::new(0x0200);
    gt1.push(0x3800, &data);
    gt1.push(0x0200, &[0x90, 0xfe]);

    let z = gt1.to_gt1z();
    assert!(z.len() < gt1.to_bytes().len(), "compressor made it bigger");
    exec_rom_payload(&mut core, &z);

    for (k, &b) in data.iter().enumerate() {
        assert_eq!(core.rd(0x3800 + k as u16), b, "offset {k}");
    }
    assert_eq!(core.vpc() & 0xff00, 0x0200);
}

#[test]
fn test_exec_gt1z_page_crossing_writes() {
    // GT1z segments are not page-bound on the way out: a match can run
    // a fill across the page seam.
    let mut core = test_core();
    const SPARE: u16 = 0x4000;
    // Hand-built stream: segment at 0x38f8, 4 literals, then a match
    // replicating them 12 times across the 0x3900 boundary.
    let stream = [
        0x00, 0x7a, // magic
        0x38, 0xf8, // segment base
        0b100_0000_0, 0xde, 0xad, 0xbe, 0xef, // 4 literals, no match
        0b000_1100_0, 0x00, // 12-byte match from base+0
        0x00, // end of segment
        0x00, 0x02, 0x00, // entry 0x0200
    ];
    core.rom_mut().install(SPARE, &stream);
    aim_asm(&mut core, 0x0600, |a| {
        a.ldwi(SPARE).stw(zp::SYS_ARGS);
        a.ldwi(vector::EXEC).stw(zp::SYS_FN);
        a.sys(88);
    });
    run_slices(&mut core, 60);

    let motif = [0xde, 0xad, 0xbe, 0xef];
    for k in 0..16u16 {
        assert_eq!(
            core.rd(0x38f8 + k),
            motif[k as usize % 4],
            "offset {k} around the page seam"
        );
    }
}

#[test]
fn test_exec_restarts_on_short_slices() {
    // Budget-starved slices must not corrupt the stream position: the
    // FSM yields without committing and picks up later.
    let mut core = test_core();
    let payload: Vec<u8> = (0..200u8).collect();
    let mut gt1 = Gt1File::new(0x0200);
    gt1.push(0x3c00, &payload);
    gt1.push(0x0200, &[0x90, 0xfe]);
    const SPARE: u16 = 0x4400;
    core.rom_mut().install(SPARE, &gt1.to_bytes());
    aim_asm(&mut core, 0x0600, |a| {
        a.ldwi(SPARE).stw(zp::SYS_ARGS);
        a.ldwi(vector::EXEC).stw(zp::SYS_FN);
        a.sys(88);
    });
    run_slices(&mut core, 2);
    // Alternate starved and normal slices while the FSM works.
    for _ in 0..200 {
        core.run_slice(30);
        core.run_slice(160);
    }
    for (k, &b) in payload.iter().enumerate() {
        assert_eq!(core.rd(0x3c00 + k as u16), b);
    }
}
