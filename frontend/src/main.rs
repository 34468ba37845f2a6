use std::path::PathBuf;

use clap::Parser;
use gigatron_core::core::machine::Machine;
use gigatron_core::core::CoreConfig;
use gigatron_core::input::ControllerType;
use gigatron_machines::{registry, Gigatron128k, Gigatron64k};

mod audio;
mod config;
mod emulator;
mod input;
mod video;

/// Gigatron TTL microcomputer emulator.
#[derive(Parser)]
#[command(name = "gigatron", version, about)]
struct Cli {
    /// GT1 program to run (loaded directly after boot).
    gt1: Option<PathBuf>,

    /// Board variant to emulate.
    #[arg(short, long, default_value = "gigatron64k")]
    machine: String,

    /// Feed the GT1 through the serial loader protocol instead of
    /// depositing it directly.
    #[arg(long)]
    serial: bool,

    /// Window scale factor (overrides the config file).
    #[arg(short, long)]
    scale: Option<u32>,

    /// Controller protocol: type-b or type-c.
    #[arg(long)]
    controller: Option<String>,

    /// Alternative config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// List available machines and exit.
    #[arg(long)]
    list: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.list {
        for entry in registry::all() {
            println!("{:<14} {}", entry.name, entry.description);
        }
        return;
    }

    let cfg = config::load(cli.config.as_deref());
    let scale = cli.scale.or(cfg.scale).unwrap_or(4);
    let controller = match cli
        .controller
        .as_deref()
        .or(cfg.controller.as_deref())
        .unwrap_or("type-b")
    {
        "type-c" => ControllerType::TypeC,
        _ => ControllerType::TypeB,
    };

    let gt1 = cli.gt1.as_deref().map(|path| {
        gigatron_machines::gt1_loader::load_gt1_file(path).unwrap_or_else(|e| {
            eprintln!("{}: {e}", path.display());
            std::process::exit(1);
        })
    });

    let core_config = CoreConfig {
        controller,
        ..Default::default()
    };

    let mut machine: Box<dyn Machine> = match cli.machine.as_str() {
        "gigatron64k" => {
            let mut sys = Gigatron64k::with_config(core_config);
            if let Some(gt1) = &gt1 {
                if cli.serial {
                    sys.send_gt1(gt1);
                } else {
                    sys.load_gt1(gt1);
                }
            }
            Box::new(sys)
        }
        "gigatron128k" => {
            let mut sys = Gigatron128k::with_config(core_config);
            if let Some(gt1) = &gt1 {
                if cli.serial {
                    sys.send_gt1(gt1);
                } else {
                    sys.load_gt1(gt1);
                }
            }
            Box::new(sys)
        }
        other => {
            eprintln!("Unknown machine: {other}");
            eprintln!("Available:");
            for entry in registry::all() {
                eprintln!("  {}", entry.name);
            }
            std::process::exit(1);
        }
    };

    let key_map = input::key_map(machine.input_map(), &cfg);
    emulator::run(machine.as_mut(), &key_map, scale);
}
