//! Accessible color resolver.
//!
//! Adjusts a candidate color's HSL lightness, and nothing else, until it
//! meets a contrast threshold against a background. Hue and saturation are
//! the user's choice and are never touched; lightness moves as little as
//! possible.

use crate::color::{hex_to_rgb, hsl_to_rgb, rgb_to_hex, rgb_to_hsl, Hsl};
use crate::contrast::{contrast_ratio, relative_luminance};

const MAX_ITERATIONS: u32 = 30;
/// Stop once the search interval is narrower than this many lightness units.
const TOLERANCE: f64 = 0.1;
/// Last-resort lightness when the search fails to converge.
const FALLBACK_DARKEN_LIGHTNESS: f64 = 10.0;
const FALLBACK_LIGHTEN_LIGHTNESS: f64 = 90.0;

/// Return `candidate` adjusted to reach at least `threshold` contrast
/// against `background`, keeping its hue and saturation.
///
/// A candidate that already meets the threshold comes back unchanged
/// (canonicalized to lowercase `#rrggbb`). Unparsable input comes back
/// verbatim; callers validate the accent first (see [`crate::theme::resolve`]).
pub fn ensure_contrast(candidate: &str, background: &str, threshold: f64) -> String {
    let (Some(fg), Some(bg)) = (hex_to_rgb(candidate), hex_to_rgb(background)) else {
        return candidate.to_string();
    };

    if contrast_ratio(fg, bg) >= threshold {
        return rgb_to_hex(fg);
    }

    // Adjustment direction. Against a near-extreme background only one side
    // of the luminance range can reach the threshold at all; when both sides
    // can, stay on the candidate's side of the background to keep the change
    // small.
    let bg_lum = relative_luminance(bg);
    let can_darken = (bg_lum + 0.05) / threshold - 0.05 >= 0.0;
    let can_lighten = threshold * (bg_lum + 0.05) - 0.05 <= 1.0;
    let darken = match (can_darken, can_lighten) {
        (true, false) => true,
        (false, true) => false,
        _ => relative_luminance(fg) < bg_lum,
    };
    let base = rgb_to_hsl(fg);

    let mut lo = 0.0_f64;
    let mut hi = 100.0_f64;
    let mut best: Option<f64> = None;

    for _ in 0..MAX_ITERATIONS {
        if hi - lo < TOLERANCE {
            break;
        }
        let mid = (lo + hi) / 2.0;
        let probe = hsl_to_rgb(Hsl { l: mid, ..base });
        if contrast_ratio(probe, bg) >= threshold {
            best = Some(mid);
            // Meets the bar; pull the interval back toward the original
            // lightness to minimize the visual change.
            if darken {
                lo = mid;
            } else {
                hi = mid;
            }
        } else if darken {
            hi = mid;
        } else {
            lo = mid;
        }
    }

    // Re-verify the winner; near-achromatic extremes can leave the search
    // without a valid point.
    if let Some(l) = best {
        let resolved = hsl_to_rgb(Hsl { l, ..base });
        if contrast_ratio(resolved, bg) >= threshold {
            return rgb_to_hex(resolved);
        }
    }

    tracing::warn!(candidate, background, "contrast search did not converge, using extreme lightness");
    let l = if darken {
        FALLBACK_DARKEN_LIGHTNESS
    } else {
        FALLBACK_LIGHTEN_LIGHTNESS
    };
    rgb_to_hex(hsl_to_rgb(Hsl { l, ..base }))
}
