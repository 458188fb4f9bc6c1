use anyhow::Result;
use clap::Parser;

pub mod cli;
pub mod output;
pub mod pipeline;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config, appliquer les overrides CLI, valider
    let mut config = resolve_config(&cli)?;
    cli.apply_overrides(&mut config)?;
    config.validate()?;

    // 4. Convertir
    let frames = pipeline::render_file(&cli.image, &config)?;

    // 5. Sortie
    if let Some(ref path) = cli.output {
        output::write_frames(path, &frames)?;
        println!("ASCII art saved to {}", path.display());
    } else if frames.len() > 1 {
        output::play(&frames, cli.loops)?;
    } else if let Some(frame) = frames.first() {
        println!("{frame}");
    }

    Ok(())
}

/// Load `--config` if it exists, otherwise fall back to defaults.
fn resolve_config(cli: &cli::Cli) -> Result<af_core::config::RenderConfig> {
    if cli.config.exists() {
        af_core::config::load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(af_core::config::RenderConfig::default())
    }
}
