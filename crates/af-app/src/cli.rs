use std::path::PathBuf;

use af_core::charset;
use af_core::config::{DitherMode, RenderConfig};
use af_core::error::CoreError;
use clap::Parser;

/// asciify : convertit une image ou un GIF animé en art ASCII.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Chemin vers l'image (PNG, JPEG, BMP, GIF).
    pub image: PathBuf,

    /// Largeur de la sortie en caractères (défaut : 100).
    #[arg(short, long)]
    pub width: Option<u32>,

    /// Caractères à utiliser, du plus clair au plus dense.
    #[arg(short = 'c', long)]
    pub chars: Option<String>,

    /// Charset prédéfini : compact, standard, blocks, minimal, digital.
    #[arg(long, conflicts_with = "chars")]
    pub preset: Option<String>,

    /// Fichier de sortie (sinon : console).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Inverser le charset (dense → clair).
    #[arg(short, long, default_value_t = false)]
    pub reverse: bool,

    /// Animer les GIFs animés.
    #[arg(short, long, default_value_t = false)]
    pub animate: bool,

    /// Délai entre frames en secondes ; remplace celui du GIF.
    #[arg(short, long)]
    pub delay: Option<f64>,

    /// Dithering : none, ordered, floyd-steinberg, atkinson.
    #[arg(long)]
    pub dither: Option<String>,

    /// Utiliser les blocs de trame ░▒▓█ au lieu du charset.
    #[arg(short, long, default_value_t = false)]
    pub pattern: bool,

    /// Détection de contours avec caractères de tracé.
    #[arg(short, long, default_value_t = false)]
    pub edges: bool,

    /// Seuil de détection de contours [0.0, 1.0].
    #[arg(long)]
    pub edge_threshold: Option<f32>,

    /// Nombre de boucles d'animation (défaut : jusqu'à Ctrl-C).
    #[arg(long)]
    pub loops: Option<u32>,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Apply command-line overrides on top of a loaded configuration.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] for an unknown preset or dither mode.
    pub fn apply_overrides(&self, config: &mut RenderConfig) -> Result<(), CoreError> {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(ref chars) = self.chars {
            config.charset.clone_from(chars);
        }
        if let Some(ref name) = self.preset {
            let set = charset::preset(name)
                .ok_or_else(|| CoreError::Config(format!("preset inconnu : {name}")))?;
            config.charset = set.to_string();
        }
        if self.reverse {
            config.reverse = true;
        }
        if self.animate {
            config.animate = true;
        }
        if let Some(delay) = self.delay {
            config.frame_delay = delay;
            config.override_delay = true;
        }
        if let Some(ref mode) = self.dither {
            config.dither_mode = mode.parse::<DitherMode>()?;
        }
        if self.pattern {
            config.pattern_mode = true;
        }
        if self.edges {
            config.edge_detection = true;
        }
        if let Some(threshold) = self.edge_threshold {
            config.edge_threshold = threshold;
        }
        config.clamp_all();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("asciify").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn short_flags_parse() {
        let cli = parse(&["cat.gif", "-w", "40", "-r", "-a", "-d", "0.2", "-e"]);
        assert_eq!(cli.width, Some(40));
        assert!(cli.reverse && cli.animate && cli.edges);
        assert_eq!(cli.delay, Some(0.2));
    }

    #[test]
    fn overrides_apply_on_defaults() {
        let cli = parse(&["img.png", "-c", "ab", "--dither", "atkinson", "-d", "0.3"]);
        let mut config = RenderConfig::default();
        cli.apply_overrides(&mut config).unwrap();
        assert_eq!(config.charset, "ab");
        assert_eq!(config.dither_mode, DitherMode::Atkinson);
        assert!(config.override_delay);
        assert!((config.frame_delay - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_dither_is_config_error() {
        let cli = parse(&["img.png", "--dither", "sierra"]);
        let mut config = RenderConfig::default();
        assert!(matches!(
            cli.apply_overrides(&mut config),
            Err(CoreError::Config(_))
        ));
    }

    #[test]
    fn preset_resolves() {
        let cli = parse(&["img.png", "--preset", "blocks"]);
        let mut config = RenderConfig::default();
        cli.apply_overrides(&mut config).unwrap();
        assert_eq!(config.charset, charset::CHARSET_BLOCKS);

        let bad = parse(&["img.png", "--preset", "nope"]);
        assert!(bad.apply_overrides(&mut config).is_err());
    }

    #[test]
    fn empty_chars_fail_validation() {
        let cli = parse(&["img.png", "-c", ""]);
        let mut config = RenderConfig::default();
        cli.apply_overrides(&mut config).unwrap();
        assert!(config.validate().is_err());
    }
}
