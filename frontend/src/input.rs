use std::collections::HashMap;

use gigatron_core::core::machine::InputButton;
use sdl2::keyboard::Scancode;

use crate::config::Config;

/// Maps SDL scancodes to machine button IDs.
pub struct KeyMap {
    map: HashMap<Scancode, u8>,
}

impl KeyMap {
    pub fn new() -> Self {
        Self { map: HashMap::new() }
    }

    /// Bind a scancode to a machine button ID.
    pub fn bind(&mut self, scancode: Scancode, button_id: u8) {
        self.map.insert(scancode, button_id);
    }

    /// Look up the machine button ID for a scancode.
    pub fn get(&self, scancode: Scancode) -> Option<u8> {
        self.map.get(&scancode).copied()
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the key map for a machine: sensible defaults by button name,
/// then config-file overrides.
pub fn key_map(buttons: &[InputButton], cfg: &Config) -> KeyMap {
    let mut km = KeyMap::new();

    for button in buttons {
        let scancode = match button.name {
            "Left" => Some(Scancode::Left),
            "Right" => Some(Scancode::Right),
            "Up" => Some(Scancode::Up),
            "Down" => Some(Scancode::Down),
            "Start" => Some(Scancode::Return),
            "Select" => Some(Scancode::Space),
            "A" => Some(Scancode::Z),
            "B" => Some(Scancode::X),
            _ => None,
        };
        if let Some(sc) = scancode {
            km.bind(sc, button.id);
        }
    }

    for (name, key) in &cfg.keys {
        let Some(button) = buttons.iter().find(|b| b.name == name.as_str()) else {
            eprintln!("config: unknown button name {name:?}");
            continue;
        };
        match Scancode::from_name(key) {
            Some(sc) => km.bind(sc, button.id),
            None => eprintln!("config: unknown key {key:?} for {name:?}"),
        }
    }

    km
}
