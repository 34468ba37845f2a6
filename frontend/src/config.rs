//! Frontend configuration: a small TOML file in the user's config
//! directory.
//!
//! ```toml
//! scale = 4
//! controller = "type-b"
//!
//! [keys]
//! "A" = "Z"
//! "B" = "X"
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Window scale factor.
    pub scale: Option<u32>,
    /// Controller protocol: "type-b" or "type-c".
    pub controller: Option<String>,
    /// Button-name to SDL-scancode-name overrides.
    #[serde(default)]
    pub keys: HashMap<String, String>,
}

fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("gigatron").join("config.toml"))
}

/// Load the config file, or defaults when there is none. A malformed
/// file is an error the user will want to hear about.
pub fn load(explicit: Option<&Path>) -> Config {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match default_path() {
            Some(p) if p.exists() => p,
            _ => return Config::default(),
        },
    };
    match std::fs::read_to_string(&path) {
        Ok(text) => match toml::from_str(&text) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{}: {e}", path.display());
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("{}: {e}", path.display());
            std::process::exit(1);
        }
    }
}
