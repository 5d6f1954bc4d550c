//! Theme mode handling and accent-to-palette resolution.
//!
//! `resolve` is the heart of the engine: a pure function from
//! (mode, accent, system preference) to a full [`ResolvedTheme`]. Every call
//! is independent; recomputation supersedes the previous value rather than
//! patching it.

use serde::{Deserialize, Serialize};

use crate::color::{hex_to_rgb, hsl_to_rgb, rgb_to_hex, rgb_to_hsl};
use crate::resolve::ensure_contrast;

/// Fixed background for light mode; never derived from the accent.
pub const LIGHT_BACKGROUND: &str = "#ffffff";
/// Fixed background for dark mode. Near-black rather than pure black.
pub const DARK_BACKGROUND: &str = "#121212";
/// Accent-independent secondary text on dark backgrounds. A desaturated
/// light gray reads consistently no matter which accent is active.
pub const DARK_TEXT_SECONDARY: &str = "#cccccc";
/// WCAG AA minimum contrast for normal text.
pub const CONTRAST_THRESHOLD: f64 = 4.5;

/// Lightness drop from primary to secondary text in light mode.
const SECONDARY_LIGHTNESS_OFFSET: f64 = 20.0;

/// Safe defaults when the accent fails to parse.
const FALLBACK_LIGHT_TEXT: &str = "#000000";
const FALLBACK_DARK_TEXT: &str = "#ffffff";

/// The user's theme preference. `Auto` follows the system setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    #[default]
    Auto,
    Light,
    Dark,
}

impl ThemeMode {
    /// Human-readable label for UI display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Auto => "Auto",
            Self::Light => "Light",
            Self::Dark => "Dark",
        }
    }

    /// All available modes for pickers.
    pub const ALL: [Self; 3] = [Self::Auto, Self::Light, Self::Dark];
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// `Auto` resolved against the system preference at computation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedMode {
    Light,
    Dark,
}

impl ResolvedMode {
    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }
}

/// The complete output of one resolution: background, two text colors, and
/// the mode they were resolved for. All colors are `#rrggbb` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTheme {
    pub background: String,
    pub text_primary: String,
    pub text_secondary: String,
    pub mode: ResolvedMode,
}

/// Resolve the palette for an accent color. Pure and deterministic: the same
/// three inputs always produce the same output.
///
/// A malformed accent falls back to fixed safe colors instead of erroring;
/// the engine never surfaces a failure to the UI.
pub fn resolve(mode: ThemeMode, accent: &str, system_prefers_dark: bool) -> ResolvedTheme {
    let resolved_mode = match mode {
        ThemeMode::Auto => {
            if system_prefers_dark {
                ResolvedMode::Dark
            } else {
                ResolvedMode::Light
            }
        }
        ThemeMode::Light => ResolvedMode::Light,
        ThemeMode::Dark => ResolvedMode::Dark,
    };

    let background = match resolved_mode {
        ResolvedMode::Light => LIGHT_BACKGROUND,
        ResolvedMode::Dark => DARK_BACKGROUND,
    };

    // Short-circuit unparsable accents to the fallback palette rather than
    // running the contrast search on degenerate input.
    if hex_to_rgb(accent).is_none() {
        tracing::debug!(accent, "accent color failed to parse, using fallback palette");
        let text_primary = match resolved_mode {
            ResolvedMode::Light => FALLBACK_LIGHT_TEXT,
            ResolvedMode::Dark => FALLBACK_DARK_TEXT,
        };
        return ResolvedTheme {
            background: background.to_string(),
            text_primary: text_primary.to_string(),
            text_secondary: secondary_text(text_primary, resolved_mode),
            mode: resolved_mode,
        };
    }

    let text_primary = ensure_contrast(accent, background, CONTRAST_THRESHOLD);
    let text_secondary = secondary_text(&text_primary, resolved_mode);

    ResolvedTheme {
        background: background.to_string(),
        text_primary,
        text_secondary,
        mode: resolved_mode,
    }
}

/// Secondary text color for a resolved primary.
///
/// Dark mode uses a fixed gray for consistent legibility across accents.
/// Light mode drops the primary's lightness by a fixed offset; on a light
/// background that can only increase contrast, so the secondary inherits the
/// primary's verified ratio without a re-check.
fn secondary_text(primary: &str, mode: ResolvedMode) -> String {
    if mode.is_dark() {
        return DARK_TEXT_SECONDARY.to_string();
    }

    let Some(rgb) = hex_to_rgb(primary) else {
        return primary.to_string();
    };
    let mut hsl = rgb_to_hsl(rgb);
    hsl.l = (hsl.l - SECONDARY_LIGHTNESS_OFFSET).max(0.0);
    rgb_to_hex(hsl_to_rgb(hsl))
}
