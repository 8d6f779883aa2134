//! Colour helpers for the grid theme.
//!
//! Colours travel as CSS strings (directly usable by Canvas 2D); [`Rgb`]
//! is used where the renderer needs to reason about a colour.

/// A CSS color string (e.g., "#FF0000", "rgba(255, 0, 0, 0.5)")
pub type CssColor = String;

/// RGB color with u8 components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse from a hex string (with or without #).
    /// Returns None if the format is invalid.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
        Some(Self { r, g, b })
    }

    /// Convert to CSS hex string (#RRGGBB).
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// CSS `rgba()` string with the given opacity.
    pub fn to_rgba(self, alpha: f64) -> String {
        format!(
            "rgba({}, {}, {}, {:.2})",
            self.r,
            self.g,
            self.b,
            alpha.clamp(0.0, 1.0)
        )
    }

    /// Relative luminance (0.0 to 1.0): 0.299*R + 0.587*G + 0.114*B
    pub fn luminance(self) -> f64 {
        let r = f64::from(self.r);
        let g = f64::from(self.g);
        let b = f64::from(self.b);
        (0.299 * r + 0.587 * g + 0.114 * b) / 255.0
    }

    pub fn is_light(self) -> bool {
        self.luminance() > 0.5
    }
}

/// Normalize a user-supplied colour to `#RRGGBB`.
pub fn parse_color(s: &str) -> Option<CssColor> {
    Rgb::from_hex(s).map(Rgb::to_hex)
}

/// Translucent version of a theme colour, for overlays drawn above text.
///
/// Falls back to the input when it is not a hex colour.
pub fn overlay(color: &str, alpha: f64) -> CssColor {
    Rgb::from_hex(color).map_or_else(|| color.to_string(), |rgb| rgb.to_rgba(alpha))
}

/// Text colour readable on top of `background`.
pub fn text_on(background: &str, default: &str) -> CssColor {
    match Rgb::from_hex(background) {
        Some(rgb) if !rgb.is_light() => "#FFFFFF".to_string(),
        _ => default.to_string(),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_color("#ff8040").unwrap(), "#FF8040");
        assert_eq!(parse_color("FF0000").unwrap(), "#FF0000");
        assert!(parse_color("red").is_none());
        assert!(parse_color("#FFF").is_none());
    }

    #[test]
    fn test_overlay() {
        assert_eq!(overlay("#E0F2F7", 0.5), "rgba(224, 242, 247, 0.50)");
        assert_eq!(overlay("transparent", 0.5), "transparent");
    }

    #[test]
    fn test_text_on_dark_background() {
        assert_eq!(text_on("#084B8A", "#000000"), "#FFFFFF");
        assert_eq!(text_on("#F4F4F3", "#000000"), "#000000");
    }
}
