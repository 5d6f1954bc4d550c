//! huesafe - accent-driven theme colors with guaranteed WCAG contrast
//!
//! Terminal front-end for the engine: preview palettes, check contrast
//! ratios, persist the accent/mode settings, and watch the system
//! preference live.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use crossterm::style::{Color, Stylize};
use std::time::Duration;

use huesafe::apply::{SystemPreference, ThemeApplier};
use huesafe::color::hex_to_rgb;
use huesafe::config::{is_valid_hex_color, ThemeSettings};
use huesafe::contrast::contrast_ratio_hex;
use huesafe::theme::{ResolvedTheme, ThemeMode, CONTRAST_THRESHOLD};

#[derive(Parser)]
#[command(name = "huesafe")]
#[command(about = "Accent-driven theme colors with guaranteed WCAG contrast", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ModeArg {
    Auto,
    Light,
    Dark,
}

impl From<ModeArg> for ThemeMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Auto => ThemeMode::Auto,
            ModeArg::Light => ThemeMode::Light,
            ModeArg::Dark => ThemeMode::Dark,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve theme colors for an accent without touching saved settings
    Preview {
        /// Accent color (#RRGGBB)
        accent: String,

        /// Theme mode to resolve for
        #[arg(short, long, value_enum, default_value = "auto")]
        mode: ModeArg,

        /// Emit the resolved palette as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the WCAG contrast ratio between two colors
    Check {
        /// Foreground color (#RRGGBB)
        foreground: String,

        /// Background color (#RRGGBB)
        background: String,
    },

    /// Persist the accent color and/or theme mode
    Set {
        /// Accent color (#RRGGBB)
        #[arg(long)]
        accent: Option<String>,

        /// Theme mode
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
    },

    /// Preview the persisted settings
    Show {
        /// Emit the resolved palette as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply the persisted theme and re-apply on system preference changes
    Watch,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Preview { accent, mode, json } => preview(&accent, mode.into(), json),
        Commands::Check { foreground, background } => check(&foreground, &background),
        Commands::Set { accent, mode } => set(accent, mode),
        Commands::Show { json } => {
            let settings = ThemeSettings::load()?;
            preview(&settings.accent_color, settings.mode, json)
        }
        Commands::Watch => watch(),
    }
}

fn preview(accent: &str, mode: ThemeMode, json: bool) -> Result<()> {
    if hex_to_rgb(accent).is_none() {
        bail!("`{accent}` is not a valid #RRGGBB color");
    }

    let resolved = huesafe::calculate_theme_colors(accent, mode);
    if json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
    } else {
        print_theme(&resolved);
    }
    Ok(())
}

fn check(foreground: &str, background: &str) -> Result<()> {
    for color in [foreground, background] {
        if hex_to_rgb(color).is_none() {
            bail!("`{color}` is not a valid #RRGGBB color");
        }
    }

    let ratio = contrast_ratio_hex(foreground, background);
    println!("Contrast ratio: {ratio:.2}:1");
    if ratio >= CONTRAST_THRESHOLD {
        println!("✓ Passes WCAG AA for normal text ({CONTRAST_THRESHOLD}:1)");
    } else {
        println!("✗ Fails WCAG AA for normal text (needs {CONTRAST_THRESHOLD}:1)");
    }
    Ok(())
}

fn set(accent: Option<String>, mode: Option<ModeArg>) -> Result<()> {
    if accent.is_none() && mode.is_none() {
        bail!("Nothing to set; pass --accent and/or --mode");
    }

    let mut settings = ThemeSettings::load()?;
    if let Some(accent) = accent {
        if !is_valid_hex_color(&accent) {
            bail!("`{accent}` is not a valid #RRGGBB color");
        }
        settings.accent_color = accent.to_lowercase();
    }
    if let Some(mode) = mode {
        settings.mode = mode.into();
    }
    settings.save()?;

    println!("✓ Saved: accent {} mode {}", settings.accent_color, settings.mode);
    Ok(())
}

fn watch() -> Result<()> {
    let settings = ThemeSettings::load()?;
    let applier = ThemeApplier::new(SystemPreference::default());

    let resolved = applier.apply(settings.mode, &settings.accent_color);
    print_theme(&resolved);

    if settings.mode != ThemeMode::Auto {
        println!("Mode is {}; there is no system preference to follow.", settings.mode);
        return Ok(());
    }

    println!("Watching for system theme changes (Ctrl-C to stop)...");
    let _guard = applier.listen(
        settings.mode,
        &settings.accent_color,
        Some(Box::new(|resolved: &ResolvedTheme| {
            println!("System preference changed:");
            print_theme(resolved);
        })),
    );

    loop {
        std::thread::sleep(Duration::from_secs(60));
    }
}

fn print_theme(resolved: &ResolvedTheme) {
    println!("Mode:            {}", if resolved.mode.is_dark() { "dark" } else { "light" });
    print_swatch("Background", &resolved.background);
    print_swatch("Text primary", &resolved.text_primary);
    print_swatch("Text secondary", &resolved.text_secondary);

    let primary = contrast_ratio_hex(&resolved.text_primary, &resolved.background);
    let secondary = contrast_ratio_hex(&resolved.text_secondary, &resolved.background);
    println!("Contrast:        primary {primary:.2}:1, secondary {secondary:.2}:1");
}

fn print_swatch(label: &str, hex: &str) {
    let swatch = match hex_to_rgb(hex) {
        Some(rgb) => "      "
            .on(Color::Rgb { r: rgb.r, g: rgb.g, b: rgb.b })
            .to_string(),
        None => String::new(),
    };
    println!("{label:<16} {hex}  {swatch}");
}
