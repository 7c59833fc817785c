//! `callinfo info`: Display version, effective options and environment.

use std::path::Path;

use callinfo_runtime::{Runtime, DEFAULT_CONFIG_FILE};

pub fn execute(config: Option<&Path>) -> anyhow::Result<()> {
    // Version
    println!("callinfo v{}", env!("CARGO_PKG_VERSION"));
    println!();

    // Platform
    println!("Platform:     {} ({})", std::env::consts::OS, std::env::consts::ARCH);

    // Config source
    match config {
        Some(path) => println!("Config:       {}", path.display()),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            println!("Config:       {}", DEFAULT_CONFIG_FILE)
        }
        None => println!("Config:       (defaults)"),
    }

    // Effective options
    let options = super::load_options(config)?;
    let engine = &options.engine;
    println!();
    println!("Engine:");
    println!("  max_prototype_depth    = {}", engine.max_prototype_depth);
    println!("  max_call_depth         = {}", engine.max_call_depth);
    println!("  lazy_string_min_length = {}", engine.lazy_string_min_length);
    println!("  implicit_receiver      = {:?}", engine.implicit_receiver);
    println!("  host_interop           = {}", engine.host_interop);

    // Loaded adapters
    let runtime = Runtime::new(&options)?;
    println!();
    println!("Adapters:");
    for name in runtime.registry().names() {
        println!("  {}", name);
    }

    // Environment
    println!();
    println!("Environment:");
    print_env("  CALLINFO_LOG", "CALLINFO_LOG");
    print_env("  NO_COLOR", "NO_COLOR");

    Ok(())
}

fn print_env(label: &str, var: &str) {
    match std::env::var(var) {
        Ok(val) => println!("{} = {}", label, val),
        Err(_) => println!("{} = (default)", label),
    }
}
