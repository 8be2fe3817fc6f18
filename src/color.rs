use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{FromColor, Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Fixed type colours
// ---------------------------------------------------------------------------

/// The conventional colour of each creature type.
pub const TYPE_COLORS: [(&str, &str); 18] = [
    ("Normal", "#A8A77A"),
    ("Fire", "#EE8130"),
    ("Water", "#6390F0"),
    ("Electric", "#F7D02C"),
    ("Grass", "#7AC74C"),
    ("Ice", "#96D9D6"),
    ("Fighting", "#C22E28"),
    ("Poison", "#A33EA1"),
    ("Ground", "#E2BF65"),
    ("Flying", "#A98FF3"),
    ("Psychic", "#F95587"),
    ("Bug", "#A6B91A"),
    ("Rock", "#B6A136"),
    ("Ghost", "#735797"),
    ("Dragon", "#6F35FC"),
    ("Dark", "#705746"),
    ("Steel", "#B7B7CE"),
    ("Fairy", "#D685AD"),
];

/// Radar fallbacks when a type has no fixed colour.
pub const RADAR_PRIMARY_FALLBACK: Color32 = Color32::from_rgb(0x1f, 0x77, 0xb4);
pub const RADAR_SECONDARY_FALLBACK: Color32 = Color32::from_rgb(0xff, 0x7f, 0x0e);

/// Hue rotation applied to the second radar series when both share a type.
pub const SAME_TYPE_HUE_SHIFT: f32 = 40.0;

fn parse_hex(hex: &str) -> Option<Color32> {
    let rgb: Srgb<u8> = hex.parse().ok()?;
    Some(Color32::from_rgb(rgb.red, rgb.green, rgb.blue))
}

/// Fixed colour for `type_name`, if it is one of the 18 known types.
pub fn type_color(type_name: &str) -> Option<Color32> {
    TYPE_COLORS
        .iter()
        .find(|(name, _)| *name == type_name)
        .and_then(|(_, hex)| parse_hex(hex))
}

/// Rotate the hue of `color` by `degrees`, keeping saturation and lightness.
pub fn shift_hue(color: Color32, degrees: f32) -> Color32 {
    let rgb = Srgb::new(
        color.r() as f32 / 255.0,
        color.g() as f32 / 255.0,
        color.b() as f32 / 255.0,
    );
    let hsl: Hsl = Hsl::from_color(rgb);
    let shifted: Hsl = Hsl::new(
        hsl.hue.into_positive_degrees() + degrees,
        hsl.saturation,
        hsl.lightness,
    );
    let out: Srgb = shifted.into_color();
    Color32::from_rgb(
        (out.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (out.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (out.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

/// Colours for the two radar series. Same primary type → the second colour
/// is the first one rotated by [`SAME_TYPE_HUE_SHIFT`].
pub fn radar_colors(primary_type: &str, secondary_type: &str) -> (Color32, Color32) {
    let first = type_color(primary_type).unwrap_or(RADAR_PRIMARY_FALLBACK);
    let second = if primary_type == secondary_type {
        shift_hue(first, SAME_TYPE_HUE_SHIFT)
    } else {
        type_color(secondary_type).unwrap_or(RADAR_SECONDARY_FALLBACK)
    };
    (first, second)
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl: Hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// TypePalette: type name → Color32 for one dataset
// ---------------------------------------------------------------------------

/// Colours for every type in a dataset: known types get their fixed colour,
/// anything else a generated one.
#[derive(Debug, Clone, Default)]
pub struct TypePalette {
    mapping: BTreeMap<String, Color32>,
}

impl TypePalette {
    pub const DEFAULT_COLOR: Color32 = Color32::GRAY;

    pub fn new(types: &[String]) -> Self {
        let unknown: Vec<&String> = types.iter().filter(|t| type_color(t).is_none()).collect();
        if !unknown.is_empty() {
            log::debug!("generating colours for unknown types {unknown:?}");
        }
        let generated = generate_palette(unknown.len());

        let mut mapping: BTreeMap<String, Color32> = types
            .iter()
            .filter_map(|t| type_color(t).map(|c| (t.clone(), c)))
            .collect();
        mapping.extend(unknown.into_iter().cloned().zip(generated));

        TypePalette { mapping }
    }

    /// Look up the colour for a type.
    pub fn color_for(&self, type_name: &str) -> Color32 {
        self.mapping
            .get(type_name)
            .copied()
            .unwrap_or(Self::DEFAULT_COLOR)
    }

    /// Legend entries (type → colour), sorted by type.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        self.mapping
            .iter()
            .map(|(t, c)| (t.clone(), *c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_types_use_fixed_colors() {
        assert_eq!(type_color("Fire"), Some(Color32::from_rgb(0xEE, 0x81, 0x30)));
        assert_eq!(type_color("Shadow"), None);
        assert_eq!(type_color("fire"), None);
    }

    #[test]
    fn hue_shift_rotates_red_to_green() {
        let shifted = shift_hue(Color32::from_rgb(255, 0, 0), 120.0);
        assert!(shifted.g() > 250, "{shifted:?}");
        assert!(shifted.r() < 5 && shifted.b() < 5, "{shifted:?}");
    }

    #[test]
    fn radar_colors_differ_for_same_type() {
        let (a, b) = radar_colors("Water", "Water");
        assert_eq!(Some(a), type_color("Water"));
        assert_ne!(a, b);

        let (a, b) = radar_colors("Fire", "Grass");
        assert_eq!(Some(a), type_color("Fire"));
        assert_eq!(Some(b), type_color("Grass"));

        let (a, b) = radar_colors("Shadow", "Cosmic");
        assert_eq!((a, b), (RADAR_PRIMARY_FALLBACK, RADAR_SECONDARY_FALLBACK));
    }

    #[test]
    fn palette_covers_unknown_types() {
        let types = vec!["Fire".to_string(), "Shadow".to_string(), "Water".to_string()];
        let palette = TypePalette::new(&types);

        assert_eq!(palette.legend_entries().len(), 3);
        assert_eq!(Some(palette.color_for("Fire")), type_color("Fire"));
        assert_ne!(palette.color_for("Shadow"), TypePalette::DEFAULT_COLOR);
        assert_eq!(palette.color_for("Missing"), TypePalette::DEFAULT_COLOR);
        assert_eq!(generate_palette(0).len(), 0);
    }
}
