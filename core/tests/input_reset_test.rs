use gigatron_core::core::ram::zp;
use gigatron_core::core::{CoreConfig, Gigatron};
use gigatron_core::input::{button, ControllerType};

mod common;
use common::{aim_asm, test_core};

/// A core running an idle guest loop (the boot chain replaced). The
/// loop sits at 0x0400 so a soft reset's jump to the Reset program at
/// 0x0200 is observable.
fn idle_core() -> Gigatron {
    let mut core = test_core();
    aim_asm(&mut core, 0x0400, |a| {
        let l = a.org();
        a.bra(l);
    });
    core
}

// =================================================================
// TypeB decoding: debounced latch
// =================================================================

#[test]
fn test_button_latches_after_two_frames() {
    let mut core = idle_core();
    core.set_serial_in(!button::A);
    core.step_frame();
    // One frame low: not yet latched.
    assert_eq!(core.zp(zp::BUTTON_STATE) & button::A, button::A);
    core.step_frame();
    assert_eq!(core.zp(zp::BUTTON_STATE) & button::A, 0);
}

#[test]
fn test_button_stays_latched_until_acknowledged() {
    let mut core = idle_core();
    core.set_serial_in(!button::B);
    core.step_frame();
    core.step_frame();
    assert_eq!(core.zp(zp::BUTTON_STATE) & button::B, 0);
    // Release: the latch holds.
    core.set_serial_in(0xff);
    core.step_frame();
    core.step_frame();
    assert_eq!(core.zp(zp::BUTTON_STATE) & button::B, 0);
    // Guest acknowledges by writing the bit back high.
    core.set_zp(zp::BUTTON_STATE, 0xff);
    core.step_frame();
    assert_eq!(core.zp(zp::BUTTON_STATE), 0xff);
}

#[test]
fn test_serial_raw_and_last_track_frames() {
    let mut core = idle_core();
    core.set_serial_in(0xf7);
    core.step_frame();
    assert_eq!(core.zp(zp::SERIAL_RAW), 0xf7);
    core.set_serial_in(0xff);
    core.step_frame();
    assert_eq!(core.zp(zp::SERIAL_LAST), 0xff);
}

// =================================================================
// TypeC decoding
// =================================================================

#[test]
fn test_type_c_board_decodes_priority_codes() {
    let mut core = Gigatron::new(CoreConfig {
        zeroed_ram: true,
        controller: ControllerType::TypeC,
        ..Default::default()
    });
    aim_asm(&mut core, 0x0200, |a| {
        let l = a.org();
        a.bra(l);
    });
    core.set_serial_in(15); // TypeC code for Start
    core.step_frame();
    core.step_frame();
    assert_eq!(core.zp(zp::BUTTON_STATE), !button::START);
}

// =================================================================
// Soft reset by Start hold (end-to-end scenario)
// =================================================================

#[test]
fn test_start_held_128_frames_triggers_reset() {
    let mut core = idle_core();
    // Scramble some state a reset must clear.
    core.set_zp(zp::SOUND_TIMER, 99);
    core.set_vsp(0x1234);
    core.set_serial_in(!button::START);
    for _ in 0..127 {
        core.step_frame();
    }
    // Not yet: the countdown is still running.
    assert_eq!(core.vpc() & 0xff00, 0x0400);
    for _ in 0..40 {
        core.step_frame();
    }
    // The reset fired and the embedded Reset program took over.
    assert_eq!(core.vpc() & 0xff00, 0x0200, "vReset did not fire");
    assert_eq!(core.zp(zp::SOUND_TIMER), 0);
    assert_eq!(core.vsp() & 0xff00, 0x0000);
}

#[test]
fn test_other_buttons_do_not_reset() {
    let mut core = idle_core();
    // Start plus A held together: no reset, ever.
    core.set_serial_in(!(button::START | button::A));
    for _ in 0..200 {
        core.step_frame();
    }
    assert_eq!(core.vpc() & 0xff00, 0x0400, "combination must not reset");
    assert_eq!(core.zp(zp::RESET_TIMER), 128);
}

#[test]
fn test_release_rearms_the_countdown() {
    let mut core = idle_core();
    core.set_serial_in(!button::START);
    for _ in 0..100 {
        core.step_frame();
    }
    core.set_serial_in(0xff);
    core.step_frame();
    assert_eq!(core.zp(zp::RESET_TIMER), 128);
}

// =================================================================
// Select cycles the video mode
// =================================================================

#[test]
fn test_select_alone_cycles_video_mode() {
    let mut core = idle_core();
    core.set_video_mode(0);
    // Press, hold a few frames, release: exactly one step.
    core.set_serial_in(!button::SELECT);
    for _ in 0..5 {
        core.step_frame();
    }
    core.set_serial_in(0xff);
    core.step_frame();
    assert_eq!(core.video_mode(), 1);
    // Again.
    core.set_serial_in(!button::SELECT);
    core.step_frame();
    core.set_serial_in(0xff);
    core.step_frame();
    assert_eq!(core.video_mode(), 2);
}

// =================================================================
// Entropy
// =================================================================

#[test]
fn test_entropy_pool_advances_every_frame() {
    let mut core = idle_core();
    let e0 = (core.zp(zp::ENTROPY), core.zp(zp::ENTROPY + 1), core.zp(zp::ENTROPY + 2));
    core.step_frame();
    let e1 = (core.zp(zp::ENTROPY), core.zp(zp::ENTROPY + 1), core.zp(zp::ENTROPY + 2));
    assert_ne!(e0, e1);
}
