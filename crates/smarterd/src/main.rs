use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use clap::Subcommand;

use smarterd::Config;
use smarterd::DeviceRegistry;

/// Inspect and validate Smarter device configurations.
#[derive(Parser)]
#[command(name = "smarterd", version)]
struct Cli {
    /// Path to the daemon configuration file.
    #[arg(long, default_value = "smarterd.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every known device configuration and its products.
    List,
    /// Show the configuration a product model resolves to.
    Resolve { model: String },
    /// Load all descriptors and report the first error, if any.
    Validate,
}

fn load_registry(config: &Config) -> anyhow::Result<DeviceRegistry> {
    let mut registry = DeviceRegistry::builtin()?;
    if let Some(dir) = &config.devices.config_dir {
        registry
            .extend_from_dir(dir)
            .with_context(|| format!("loading descriptors from {}", dir.display()))?;
    }
    Ok(registry)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // A missing config file is fine for descriptor-only commands.
    let config = if cli.config.exists() {
        Config::from_file(&cli.config)?
    } else {
        Config::default()
    };

    tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::from(
            config.system.log_level,
        ))
        .init();

    match cli.command {
        Command::List => {
            let registry = load_registry(&config)?;
            for device_config in registry.iter() {
                println!(
                    "{} [{}]",
                    device_config.name(),
                    device_config.products().join(", ")
                );
                for entity in device_config.all_entities() {
                    println!("  {} {}", entity.kind(), entity.config_id());
                }
            }
        }
        Command::Resolve { model } => {
            let registry = load_registry(&config)?;
            let device_config = registry.resolve(&model)?;
            println!("{} ({})", device_config.name(), device_config.source());
            for service in device_config.services() {
                println!("  service {} -> {}", service.name, service.command);
            }
        }
        Command::Validate => {
            let registry = load_registry(&config)?;
            println!("{} configuration(s) loaded", registry.len());
        }
    }

    Ok(())
}
