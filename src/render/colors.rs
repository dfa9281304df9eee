//! Colour palettes for fish and pill variants

use crate::entity::fish::FISH_VARIANTS;
use crate::entity::pill::PILL_VARIANTS;

/// RGBA color (0.0 to 1.0 per channel)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Opaque colour from a 0xRRGGBB literal
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as f32 / 255.0,
            g: ((rgb >> 8) & 0xff) as f32 / 255.0,
            b: (rgb & 0xff) as f32 / 255.0,
            a: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FishPalette {
    pub body: Color,
    pub fin: Color,
    pub belly: Color,
}

/// Two-tone capsule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PillPalette {
    pub top: Color,
    pub bottom: Color,
}

const fn fish(body: u32, fin: u32, belly: u32) -> FishPalette {
    FishPalette {
        body: Color::hex(body),
        fin: Color::hex(fin),
        belly: Color::hex(belly),
    }
}

const fn pill(top: u32, bottom: u32) -> PillPalette {
    PillPalette {
        top: Color::hex(top),
        bottom: Color::hex(bottom),
    }
}

const FISH_PALETTES: [FishPalette; FISH_VARIANTS] = [
    fish(0x4a9fd8, 0x3580b8, 0xa0d4f0), // Blue
    fish(0xe88040, 0xc86020, 0xf8c090), // Orange
    fish(0x58b868, 0x408848, 0xa0e0a8), // Green
    fish(0xd86888, 0xb84868, 0xf0a0b8), // Pink
    fish(0x8878c8, 0x6858a8, 0xb8b0e0), // Lavender
    fish(0xd8a840, 0xb88820, 0xf0d888), // Gold
    fish(0x48b8b8, 0x289898, 0x90e0e0), // Teal
    fish(0xc87898, 0xa85878, 0xe8b0c8), // Rose
];

const PILL_PALETTES: [PillPalette; PILL_VARIANTS] = [
    pill(0xff6b6b, 0xffffff),
    pill(0x4ecdc4, 0xffffff),
    pill(0xffe66d, 0xffffff),
    pill(0xa06cd5, 0xffffff),
    pill(0xff9a9e, 0xfad0c4),
    pill(0x2196f3, 0xffffff),
    pill(0x66bb6a, 0xffffff),
    pill(0xff7043, 0xffccbc),
];

/// Palette for a fish colour index; indices wrap
pub fn fish_palette(color_idx: usize) -> FishPalette {
    FISH_PALETTES[color_idx % FISH_VARIANTS]
}

pub fn pill_palette(color_idx: usize) -> PillPalette {
    PILL_PALETTES[color_idx % PILL_VARIANTS]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_channels() {
        let c = Color::hex(0xff8000);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn test_palette_indices_wrap() {
        assert_eq!(fish_palette(1), fish_palette(1 + FISH_VARIANTS));
        assert_eq!(pill_palette(3), pill_palette(3 + PILL_VARIANTS));
    }

    #[test]
    fn test_fish_variants_distinct() {
        for i in 0..FISH_VARIANTS {
            for j in (i + 1)..FISH_VARIANTS {
                assert_ne!(fish_palette(i).body, fish_palette(j).body);
            }
        }
    }
}
