use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::charset::{CHARSET_BLOCKS, CHARSET_COMPACT, Ramp};
use crate::error::CoreError;

/// Largeur par défaut de la grille, en caractères.
pub const DEFAULT_WIDTH: u32 = 100;

/// Délai par défaut entre deux frames animées, en secondes.
pub const DEFAULT_FRAME_DELAY: f64 = 0.1;

/// Correction d'aspect d'une cellule terminal (largeur / hauteur).
pub const DEFAULT_CHAR_ASPECT: f32 = 0.55;

/// Seuil de magnitude normalisée au-delà duquel un pixel est un contour.
pub const DEFAULT_EDGE_THRESHOLD: f32 = 0.25;

/// Configuration complète du rendu.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use af_core::config::RenderConfig;
/// let config = RenderConfig::default();
/// assert_eq!(config.width, 100);
/// assert_eq!(config.charset, " .:-=+*#%@");
/// ```
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct RenderConfig {
    // === Grille ===
    /// Largeur cible en caractères.
    pub width: u32,
    /// Correction aspect ratio appliquée à la hauteur dérivée.
    pub char_aspect: f32,

    // === Ramp ===
    /// Charset du plus clair au plus dense.
    pub charset: String,
    /// Inverser l'ordre du ramp (pour fond clair).
    pub reverse: bool,
    /// Remplace le charset par les blocs de trame ` ░▒▓█`.
    pub pattern_mode: bool,

    // === Enhancer ===
    /// Dithering mode.
    pub dither_mode: DitherMode,
    /// Détection de contours directionnelle. Exclusif avec le dithering.
    pub edge_detection: bool,
    /// Seuil de magnitude normalisée [0.0, 1.0].
    pub edge_threshold: f32,

    // === Animation ===
    /// Rendre toutes les frames d'un GIF animé.
    pub animate: bool,
    /// Délai (s) utilisé quand la source n'en fournit pas.
    pub frame_delay: f64,
    /// Si vrai, `frame_delay` remplace le délai de chaque frame.
    pub override_delay: bool,
}

/// Dithering mode for luminance quantization.
///
/// # Example
/// ```
/// use af_core::config::DitherMode;
/// let mode: DitherMode = "floyd-steinberg".parse().unwrap();
/// assert_eq!(mode, DitherMode::FloydSteinberg);
/// assert!("sierra".parse::<DitherMode>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum DitherMode {
    /// Direct rounding to the nearest ramp level.
    #[default]
    #[serde(alias = "none")]
    None,
    /// Bayer 8×8 ordered dithering.
    #[serde(alias = "Bayer8x8", alias = "ordered", alias = "bayer")]
    Ordered,
    /// Floyd-Steinberg error diffusion.
    #[serde(alias = "floyd-steinberg", alias = "floyd_steinberg", alias = "fs")]
    FloydSteinberg,
    /// Atkinson error diffusion (6/8 of the error).
    #[serde(alias = "atkinson")]
    Atkinson,
}

impl FromStr for DitherMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "ordered" | "bayer" => Ok(Self::Ordered),
            "floyd-steinberg" | "floyd_steinberg" | "fs" => Ok(Self::FloydSteinberg),
            "atkinson" => Ok(Self::Atkinson),
            other => Err(CoreError::Config(format!("mode de dithering inconnu : {other}"))),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            char_aspect: DEFAULT_CHAR_ASPECT,
            charset: CHARSET_COMPACT.to_string(),
            reverse: false,
            pattern_mode: false,
            dither_mode: DitherMode::None,
            edge_detection: false,
            edge_threshold: DEFAULT_EDGE_THRESHOLD,
            animate: false,
            frame_delay: DEFAULT_FRAME_DELAY,
            override_delay: false,
        }
    }
}

impl RenderConfig {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    pub fn clamp_all(&mut self) {
        self.edge_threshold = self.edge_threshold.clamp(0.0, 1.0);
        self.char_aspect = self.char_aspect.clamp(0.1, 4.0);
    }

    /// Reject configurations that cannot be rendered.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] for an empty charset, a zero width,
    /// a negative or non-finite frame delay, or edge detection combined
    /// with a dither mode.
    ///
    /// # Example
    /// ```
    /// use af_core::config::{DitherMode, RenderConfig};
    /// let mut config = RenderConfig::default();
    /// assert!(config.validate().is_ok());
    /// config.edge_detection = true;
    /// config.dither_mode = DitherMode::Atkinson;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.charset.is_empty() && !self.pattern_mode {
            return Err(CoreError::Config("le ramp de caractères est vide".into()));
        }
        if self.width == 0 {
            return Err(CoreError::Config("la largeur doit être positive".into()));
        }
        if !self.frame_delay.is_finite() || self.frame_delay < 0.0 {
            return Err(CoreError::Config(format!(
                "délai de frame invalide : {}",
                self.frame_delay
            )));
        }
        if self.edge_detection && self.dither_mode != DitherMode::None {
            return Err(CoreError::Config(format!(
                "la détection de contours est incompatible avec le dithering {:?}",
                self.dither_mode
            )));
        }
        Ok(())
    }

    /// Effective ramp: block shades in pattern mode, reversed on request.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] if the charset is empty.
    ///
    /// # Example
    /// ```
    /// use af_core::config::RenderConfig;
    /// let config = RenderConfig { reverse: true, ..RenderConfig::default() };
    /// assert_eq!(config.ramp().unwrap().to_string(), "@%#*+=-:. ");
    /// ```
    pub fn ramp(&self) -> Result<Ramp, CoreError> {
        let charset = if self.pattern_mode {
            CHARSET_BLOCKS
        } else {
            self.charset.as_str()
        };
        let ramp = Ramp::new(charset)?;
        Ok(if self.reverse { ramp.reversed() } else { ramp })
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    render: Option<RenderSection>,
    animation: Option<AnimationSection>,
}

/// Render section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
struct RenderSection {
    width: Option<u32>,
    char_aspect: Option<f32>,
    charset: Option<String>,
    reverse: Option<bool>,
    pattern_mode: Option<bool>,
    dither_mode: Option<DitherMode>,
    edge_detection: Option<bool>,
    edge_threshold: Option<f32>,
}

/// Animation section of the TOML config, all fields optional.
#[derive(Deserialize)]
struct AnimationSection {
    animate: Option<bool>,
    frame_delay: Option<f64>,
    override_delay: Option<bool>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use af_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<RenderConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Erreur de parsing TOML dans {}", path.display()))
}

/// Parse TOML text and merge it over [`RenderConfig::default`].
///
/// # Errors
/// Returns an error if the text is not valid TOML for this schema.
///
/// # Example
/// ```
/// use af_core::config::{parse_config, DitherMode};
/// let config = parse_config("[render]\ndither_mode = \"Atkinson\"\n").unwrap();
/// assert_eq!(config.dither_mode, DitherMode::Atkinson);
/// assert_eq!(config.width, 100);
/// ```
pub fn parse_config(content: &str) -> Result<RenderConfig> {
    let file: ConfigFile = toml::from_str(content)?;
    let mut config = RenderConfig::default();

    if let Some(r) = file.render {
        if let Some(v) = r.width {
            config.width = v;
        }
        if let Some(v) = r.char_aspect {
            config.char_aspect = v;
        }
        if let Some(v) = r.charset {
            config.charset = v;
        }
        if let Some(v) = r.reverse {
            config.reverse = v;
        }
        if let Some(v) = r.pattern_mode {
            config.pattern_mode = v;
        }
        if let Some(v) = r.dither_mode {
            config.dither_mode = v;
        }
        if let Some(v) = r.edge_detection {
            config.edge_detection = v;
        }
        if let Some(v) = r.edge_threshold {
            config.edge_threshold = v;
        }
    }

    if let Some(a) = file.animation {
        if let Some(v) = a.animate {
            config.animate = v;
        }
        if let Some(v) = a.frame_delay {
            config.frame_delay = v;
        }
        if let Some(v) = a.override_delay {
            config.override_delay = v;
        }
    }

    config.clamp_all();
    log::debug!("Configuration chargée : {config:?}");
    Ok(config)
}
