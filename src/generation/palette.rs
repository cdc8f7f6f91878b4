//! Building and district colors.
//!
//! Colors are linear-ish RGB in [0,1] stored as `Vec3`. Language colors
//! follow the conventions code hosts use so the city reads familiar.

use crate::core::types::Vec3;

/// Color for languages not in the table
pub const UNKNOWN_COLOR: Vec3 = Vec3::new(0.54, 0.54, 0.54);

/// Target of the decay blend
pub const MOSS: Vec3 = Vec3::new(0.36, 0.45, 0.24);

/// Fallback district color when the supplied hex string does not parse
pub const NEUTRAL_GREY: Vec3 = Vec3::new(0.5, 0.5, 0.5);

/// Decay level above which buildings start to moss over
pub const DECAY_ONSET: f32 = 0.5;

const LANGUAGE_COLORS: &[(&str, u32)] = &[
    ("python", 0x3572A5),
    ("javascript", 0xF1E05A),
    ("typescript", 0x3178C6),
    ("rust", 0xDEA584),
    ("go", 0x00ADD8),
    ("java", 0xB07219),
    ("kotlin", 0xA97BFF),
    ("scala", 0xC22D40),
    ("c", 0x555555),
    ("cpp", 0xF34B7D),
    ("csharp", 0x178600),
    ("ruby", 0x701516),
    ("php", 0x4F5D95),
    ("swift", 0xF05138),
    ("html", 0xE34C26),
    ("css", 0x563D7C),
    ("shell", 0x89E051),
    ("markdown", 0x083FA1),
];

fn rgb(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
    )
}

/// Base color for a (lowercase) language tag
pub fn language_color(language: &str) -> Vec3 {
    LANGUAGE_COLORS
        .iter()
        .find(|(name, _)| *name == language)
        .map(|&(_, hex)| rgb(hex))
        .unwrap_or(UNKNOWN_COLOR)
}

/// Parse `#rrggbb` or `#rgb` (leading `#` optional)
pub fn parse_hex_color(s: &str) -> Option<Vec3> {
    let digits = s.trim().trim_start_matches('#');
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match digits.len() {
        6 => u32::from_str_radix(digits, 16).ok().map(rgb),
        3 => {
            let short = u32::from_str_radix(digits, 16).ok()?;
            let (r, g, b) = ((short >> 8) & 0xF, (short >> 4) & 0xF, short & 0xF);
            Some(rgb((r * 17) << 16 | (g * 17) << 8 | b * 17))
        }
        _ => None,
    }
}

/// District color with the neutral fallback
pub fn district_color(s: &str) -> Vec3 {
    parse_hex_color(s).unwrap_or(NEUTRAL_GREY)
}

fn luminance(c: Vec3) -> f32 {
    c.dot(Vec3::new(0.299, 0.587, 0.114))
}

/// Blend a base color toward moss. Zero effect up to `DECAY_ONSET`, then
/// a continuous ramp reaching full strength at decay 1.0.
pub fn apply_decay(base: Vec3, decay_level: f32) -> Vec3 {
    let t = ((decay_level - DECAY_ONSET) / (1.0 - DECAY_ONSET)).clamp(0.0, 1.0);
    if t == 0.0 {
        return base;
    }
    let desaturated = base.lerp(Vec3::splat(luminance(base)), 0.6 * t);
    desaturated.lerp(MOSS, 0.55 * t)
}

/// Final body color of a building
pub fn body_color(language: &str, decay_level: f32) -> Vec3 {
    apply_decay(language_color(language), decay_level)
}

/// Scale brightness, staying in range
pub fn shade(color: Vec3, factor: f32) -> Vec3 {
    (color * factor).clamp(Vec3::ZERO, Vec3::ONE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec3_approx_eq(a: Vec3, b: Vec3, eps: f32) -> bool {
        (a - b).abs().max_element() < eps
    }

    #[test]
    fn test_parse_long_and_short() {
        assert!(vec3_approx_eq(parse_hex_color("#FF0000").unwrap(), Vec3::X, 1e-6));
        assert!(vec3_approx_eq(parse_hex_color("#0f0").unwrap(), Vec3::Y, 1e-6));
        assert!(vec3_approx_eq(parse_hex_color("0000ff").unwrap(), Vec3::Z, 1e-6));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_hex_color(""), None);
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#gggggg"), None);
        assert_eq!(parse_hex_color("#+12345"), None);
        assert_eq!(district_color("teal"), NEUTRAL_GREY);
    }

    #[test]
    fn test_language_lookup() {
        assert!(vec3_approx_eq(language_color("python"), rgb(0x3572A5), 1e-6));
        assert_eq!(language_color("brainfuck"), UNKNOWN_COLOR);
        assert_eq!(language_color("unknown"), UNKNOWN_COLOR);
    }

    #[test]
    fn test_no_decay_below_onset() {
        let base = language_color("rust");
        assert_eq!(apply_decay(base, 0.0), base);
        assert_eq!(apply_decay(base, 0.5), base);
    }

    #[test]
    fn test_decay_is_continuous() {
        let base = language_color("javascript");
        let just_above = apply_decay(base, 0.501);
        assert!(vec3_approx_eq(just_above, base, 0.01));
    }

    #[test]
    fn test_decay_is_monotonic_toward_moss() {
        let base = language_color("javascript");
        let mut last = (base - MOSS).length();
        for step in 1..=10 {
            let d = 0.5 + step as f32 * 0.05;
            let dist = (apply_decay(base, d) - MOSS).length();
            assert!(dist < last, "decay {} did not move closer to moss", d);
            last = dist;
        }
    }

    #[test]
    fn test_shade_clamps() {
        let c = shade(Vec3::splat(0.8), 2.0);
        assert_eq!(c, Vec3::ONE);
    }
}
