//! Light/dark theme context.
//!
//! Owned by the composition root and passed to whoever renders; there is no
//! process-global theme state in core.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// User-facing color scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The other scheme.
    pub fn flipped(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl Display for ColorScheme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorScheme {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!(
                "unsupported color scheme `{other}`; expected light|dark"
            )),
        }
    }
}

/// Named colors used by both screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub text: &'static str,
    pub background: &'static str,
    pub icon: &'static str,
    pub button: &'static str,
}

pub const LIGHT_PALETTE: Palette = Palette {
    text: "black",
    background: "white",
    icon: "black",
    button: "royalblue",
};

pub const DARK_PALETTE: Palette = Palette {
    text: "white",
    background: "black",
    icon: "white",
    button: "royalblue",
};

/// Read/write theme preference handed to the UI layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeContext {
    color_scheme: ColorScheme,
}

impl ThemeContext {
    /// Starts from the system appearance; `None` means unknown and maps to
    /// light.
    pub fn new(system: Option<ColorScheme>) -> Self {
        Self {
            color_scheme: system.unwrap_or_default(),
        }
    }

    pub fn color_scheme(&self) -> ColorScheme {
        self.color_scheme
    }

    pub fn set_color_scheme(&mut self, scheme: ColorScheme) {
        self.color_scheme = scheme;
    }

    /// Switches light <-> dark and returns the new scheme.
    pub fn toggle(&mut self) -> ColorScheme {
        self.color_scheme = self.color_scheme.flipped();
        self.color_scheme
    }

    /// Palette for the active scheme.
    pub fn theme(&self) -> &'static Palette {
        match self.color_scheme {
            ColorScheme::Light => &LIGHT_PALETTE,
            ColorScheme::Dark => &DARK_PALETTE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ColorScheme, ThemeContext, DARK_PALETTE, LIGHT_PALETTE};

    #[test]
    fn unknown_system_appearance_defaults_to_light() {
        let ctx = ThemeContext::new(None);
        assert_eq!(ctx.color_scheme(), ColorScheme::Light);
        assert_eq!(ctx.theme(), &LIGHT_PALETTE);
    }

    #[test]
    fn toggle_switches_palette_both_ways() {
        let mut ctx = ThemeContext::new(Some(ColorScheme::Light));
        assert_eq!(ctx.toggle(), ColorScheme::Dark);
        assert_eq!(ctx.theme(), &DARK_PALETTE);
        assert_eq!(ctx.toggle(), ColorScheme::Light);
    }

    #[test]
    fn parse_accepts_case_insensitive_names() {
        assert_eq!(" Dark ".parse::<ColorScheme>(), Ok(ColorScheme::Dark));
        assert!("sepia".parse::<ColorScheme>().is_err());
    }
}
