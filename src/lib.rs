//! Accessible theme color engine.
//!
//! Derives a full palette from a single user-chosen accent color and a theme
//! mode (auto/light/dark): a fixed background per mode plus primary and
//! secondary text colors guaranteed to meet WCAG AA contrast against it.
//! Text colors keep the accent's hue and saturation; only lightness moves,
//! and only as far as necessary.
//!
//! Three operations cover the external surface:
//! - [`calculate_theme_colors`]: pure preview of the resolved palette.
//! - [`apply::ThemeApplier::apply`]: write the palette to shared state.
//! - [`apply::ThemeApplier::listen`]: in auto mode, keep the state in sync
//!   with the OS preference; returns a disposable guard.

pub mod apply;
pub mod color;
pub mod config;
pub mod contrast;
pub mod resolve;
pub mod theme;

pub use apply::{
    AppliedTheme, FixedPreference, ListenerGuard, PreferenceSource, SharedTheme,
    SystemPreference, ThemeApplier,
};
pub use theme::{ResolvedMode, ResolvedTheme, ThemeMode};

/// Resolve the palette for an accent color against the live system
/// preference. Pure preview for settings UIs; touches no shared state.
pub fn calculate_theme_colors(accent: &str, mode: ThemeMode) -> ResolvedTheme {
    theme::resolve(mode, accent, apply::system_prefers_dark())
}
