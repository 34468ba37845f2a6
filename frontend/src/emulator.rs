use gigatron_core::core::machine::Machine;
use sdl2::event::Event;
use sdl2::keyboard::Scancode;

use crate::audio;
use crate::input::KeyMap;
use crate::video::{save_png, Video};

pub fn run(machine: &mut dyn Machine, key_map: &KeyMap, scale: u32) {
    let sdl_context = sdl2::init().expect("Failed to initialize SDL2");
    let sdl_video = sdl_context.video().expect("Failed to init SDL video");
    let sdl_audio = sdl_context.audio().expect("Failed to init SDL audio");

    let (width, height) = machine.display_size();
    let mut video = Video::new(&sdl_video, "Gigatron", width, height, scale);
    let mut event_pump = sdl_context.event_pump().expect("Failed to get event pump");

    let sample_rate = machine.audio_sample_rate();
    let playback = (sample_rate > 0).then(|| audio::init(&sdl_audio, sample_rate));
    let mut audio_started = false;

    let buffer_size = (width * height * 3) as usize;
    let mut framebuffer = vec![0u8; buffer_size];
    let mut samples = [0i16; 2048];
    let mut screenshot_serial = 0u32;

    'main: loop {
        // Poll all pending SDL events, translate to machine input
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => break 'main,

                Event::KeyDown {
                    scancode: Some(Scancode::Escape),
                    ..
                } => break 'main,

                Event::KeyDown {
                    scancode: Some(Scancode::F12),
                    repeat: false,
                    ..
                } => {
                    machine.render_frame(&mut framebuffer);
                    let path = format!("gigatron-{screenshot_serial:03}.png");
                    screenshot_serial += 1;
                    match save_png(path.as_ref(), &framebuffer, width, height) {
                        Ok(()) => eprintln!("wrote {path}"),
                        Err(e) => eprintln!("screenshot failed: {e}"),
                    }
                }

                Event::KeyDown {
                    scancode: Some(sc),
                    repeat: false,
                    ..
                } => {
                    if let Some(button_id) = key_map.get(sc) {
                        machine.set_input(button_id, true);
                    }
                }

                Event::KeyUp {
                    scancode: Some(sc), ..
                } => {
                    if let Some(button_id) = key_map.get(sc) {
                        machine.set_input(button_id, false);
                    }
                }

                _ => {}
            }
        }

        // Run one frame of emulation
        machine.run_frame();

        // Move the frame's audio into the playback ring
        if let Some((device, ring, _)) = &playback {
            let n = machine.fill_audio(&mut samples);
            if n > 0 {
                let mut buf = ring.lock().unwrap();
                buf.extend(&samples[..n]);
            }
            if !audio_started {
                device.resume();
                audio_started = true;
            }
        }

        // Render the framebuffer and present; frame timing rides the
        // display's vertical sync
        machine.render_frame(&mut framebuffer);
        video.present(&framebuffer);
    }

    // Fade the audio before tearing the device down
    if let Some((device, _, fade_out)) = &playback {
        fade_out.store(true, std::sync::atomic::Ordering::Relaxed);
        std::thread::sleep(audio::fade_out_duration());
        device.pause();
    }
}
