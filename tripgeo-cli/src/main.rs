//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use env_logger::{Builder, Env, Target};

fn main() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .format_module_path(false)
        .target(Target::Stderr)
        .init();

    if let Err(err) = tripgeo_cli::run() {
        eprintln!("tripgeo: {err}");
        std::process::exit(1);
    }
}
