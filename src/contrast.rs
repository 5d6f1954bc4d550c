//! WCAG 2.1 relative luminance and contrast ratio.

use crate::color::{hex_to_rgb, Rgb};

/// Linearize one sRGB channel per the WCAG 2.1 definition.
fn linearize(channel: u8) -> f64 {
    let c = channel as f64 / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Relative luminance in [0, 1], where 0 is black and 1 is white.
pub fn relative_luminance(color: Rgb) -> f64 {
    0.2126 * linearize(color.r) + 0.7152 * linearize(color.g) + 0.0722 * linearize(color.b)
}

/// Contrast ratio in [1, 21]: `(L_lighter + 0.05) / (L_darker + 0.05)`.
/// Symmetric in its arguments.
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Contrast ratio between two hex strings. Returns the minimum ratio (1.0)
/// when either side fails to parse, which is always below any threshold.
pub fn contrast_ratio_hex(a: &str, b: &str) -> f64 {
    match (hex_to_rgb(a), hex_to_rgb(b)) {
        (Some(a), Some(b)) => contrast_ratio(a, b),
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };

    #[test]
    fn test_luminance_extremes() {
        assert!(relative_luminance(BLACK).abs() < 1e-9);
        assert!((relative_luminance(WHITE) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_luminance_channel_weights() {
        // Each pure channel contributes exactly its WCAG weight
        let red = relative_luminance(Rgb { r: 255, g: 0, b: 0 });
        let green = relative_luminance(Rgb { r: 0, g: 255, b: 0 });
        let blue = relative_luminance(Rgb { r: 0, g: 0, b: 255 });
        assert!((red - 0.2126).abs() < 1e-6);
        assert!((green - 0.7152).abs() < 1e-6);
        assert!((blue - 0.0722).abs() < 1e-6);
    }

    #[test]
    fn test_contrast_black_on_white_is_21() {
        assert!((contrast_ratio(BLACK, WHITE) - 21.0).abs() < 0.001);
    }

    #[test]
    fn test_contrast_same_color_is_1() {
        let c = Rgb { r: 120, g: 80, b: 200 };
        assert!((contrast_ratio(c, c) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_contrast_is_symmetric() {
        let a = Rgb { r: 200, g: 50, b: 80 };
        let b = Rgb { r: 25, g: 25, b: 100 };
        assert_eq!(contrast_ratio(a, b), contrast_ratio(b, a));
    }

    #[test]
    fn test_contrast_hex_sentinel_on_parse_failure() {
        assert_eq!(contrast_ratio_hex("not-a-color", "#ffffff"), 1.0);
        assert_eq!(contrast_ratio_hex("#ffffff", "nope"), 1.0);
        assert_eq!(contrast_ratio_hex("", ""), 1.0);
    }

    #[test]
    fn test_contrast_hex_matches_typed() {
        let via_hex = contrast_ratio_hex("#000000", "#ffffff");
        assert!((via_hex - 21.0).abs() < 0.001);
    }
}
