use gigatron_core::core::ram::{warm_pc, zp};
use gigatron_core::core::{CoreConfig, Gigatron};
use gigatron_core::vcpu::asm::Asm;
use gigatron_core::vcpu::VCPU_PAGE;

/// A powered-on 64K board with deterministic (zeroed) RAM.
pub fn test_core() -> Gigatron {
    Gigatron::new(CoreConfig {
        zeroed_ram: true,
        ..Default::default()
    })
}

/// Write a code blob and aim the vCPU at it, overriding whatever the
/// boot chain was about to do.
pub fn aim(core: &mut Gigatron, addr: u16, code: &[u8]) {
    for (k, &b) in code.iter().enumerate() {
        core.wr(addr + k as u16, b);
    }
    core.set_vpc(warm_pc(addr));
    core.set_zp(zp::V_CPU_SELECT, VCPU_PAGE);
}

/// Assemble with `f` at `addr`, install, and aim the vCPU at it.
pub fn aim_asm(core: &mut Gigatron, addr: u16, f: impl FnOnce(&mut Asm)) {
    let mut a = Asm::new(addr);
    f(&mut a);
    let code = a.into_bytes();
    aim(core, addr, &code);
}

/// Give the guest `n` full slices.
pub fn run_slices(core: &mut Gigatron, n: u32) {
    for _ in 0..n {
        core.run_slice(160);
    }
}

/// The smallest slice that executes exactly one vCPU instruction: the
/// entry budget lands on zero ticks, the first instruction runs, and
/// its cost shows up as the negated tick balance.
pub fn run_one_instruction(core: &mut Gigatron) -> u32 {
    core.run_slice(40);
    let t = core.zp(zp::V_TICKS) as i8 as i32;
    assert!(t < 0, "slice ended with budget to spare");
    (-t * 2) as u32
}
