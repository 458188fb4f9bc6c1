use crate::error::CoreError;

/// 10 caractères, compact, bon contraste. Ramp par défaut.
pub const CHARSET_COMPACT: &str = " .:-=+*#%@";

/// 70 caractères, Paul Bourke extended, bon équilibre.
pub const CHARSET_STANDARD: &str =
    " .'`^\",:;Il!i><~+_-?][}{1)(|/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$";

/// Blocs Unicode : pseudo-pixels. Utilisé par le pattern mode.
pub const CHARSET_BLOCKS: &str = " ░▒▓█";

/// Minimal : haut contraste.
pub const CHARSET_MINIMAL: &str = " .:░▒▓█";

/// Digital : purisme binaire.
pub const CHARSET_DIGITAL: &str = " 01";

/// Resolve a named preset to its charset.
///
/// # Example
/// ```
/// use af_core::charset::{preset, CHARSET_BLOCKS};
/// assert_eq!(preset("blocks"), Some(CHARSET_BLOCKS));
/// assert_eq!(preset("nope"), None);
/// ```
#[must_use]
pub fn preset(name: &str) -> Option<&'static str> {
    match name.to_ascii_lowercase().as_str() {
        "compact" => Some(CHARSET_COMPACT),
        "standard" => Some(CHARSET_STANDARD),
        "blocks" => Some(CHARSET_BLOCKS),
        "minimal" => Some(CHARSET_MINIMAL),
        "digital" => Some(CHARSET_DIGITAL),
        _ => None,
    }
}

/// Ordered character palette used as the quantization target.
///
/// Index 0 is the first character of the charset. Intensity maps
/// proportionally onto indices: black → `ramp[0]`, white → `ramp[N-1]`.
/// With [`CHARSET_COMPACT`] bright pixels get dense glyphs, which suits a
/// dark terminal; [`Ramp::reversed`] flips it for light backgrounds.
///
/// # Example
/// ```
/// use af_core::charset::Ramp;
/// let ramp = Ramp::new(" .:#@").unwrap();
/// assert_eq!(ramp.len(), 5);
/// assert_eq!(ramp.glyph(0), ' ');
/// assert_eq!(ramp.glyph(4), '@');
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ramp {
    chars: Vec<char>,
}

impl Ramp {
    /// Build a ramp from a charset ordered lightest→densest.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] if the charset is empty.
    pub fn new(charset: &str) -> Result<Self, CoreError> {
        let chars: Vec<char> = charset.chars().collect();
        if chars.is_empty() {
            return Err(CoreError::Config("le ramp de caractères est vide".into()));
        }
        Ok(Self { chars })
    }

    /// Same characters, opposite order.
    ///
    /// # Example
    /// ```
    /// use af_core::charset::Ramp;
    /// let ramp = Ramp::new("ABC").unwrap().reversed();
    /// assert_eq!(ramp.to_string(), "CBA");
    /// ```
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut chars = self.chars.clone();
        chars.reverse();
        Self { chars }
    }

    /// Number of characters (always >= 1).
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Character at `index`, clamped to the last one.
    #[inline(always)]
    #[must_use]
    pub fn glyph(&self, index: usize) -> char {
        self.chars[index.min(self.chars.len() - 1)]
    }
}

impl std::fmt::Display for Ramp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for ch in &self.chars {
            write!(f, "{ch}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ramp_is_config_error() {
        assert!(matches!(Ramp::new(""), Err(CoreError::Config(_))));
    }

    #[test]
    fn reverse_is_an_involution() {
        let ramp = Ramp::new("ABCDEFGHIJKLMNOPQRSTUVWXYZ").unwrap();
        let rev = ramp.reversed();
        assert_eq!(rev.to_string(), "ZYXWVUTSRQPONMLKJIHGFEDCBA");
        assert_eq!(rev.reversed(), ramp);
    }

    #[test]
    fn glyph_clamps_out_of_range_index() {
        let ramp = Ramp::new(" .:#@").unwrap();
        assert_eq!(ramp.glyph(99), '@');
        let single = Ramp::new("x").unwrap();
        assert_eq!(single.glyph(0), 'x');
        assert_eq!(single.glyph(3), 'x');
    }

    #[test]
    fn unicode_ramp_counts_chars_not_bytes() {
        let ramp = Ramp::new(CHARSET_BLOCKS).unwrap();
        assert_eq!(ramp.len(), 5);
        assert_eq!(ramp.glyph(4), '█');
    }

    #[test]
    fn presets_resolve_case_insensitively() {
        assert_eq!(preset("Compact"), Some(CHARSET_COMPACT));
        assert_eq!(preset("DIGITAL"), Some(CHARSET_DIGITAL));
    }
}
