use std::collections::HashMap;

use palette::rgb::Rgb as PaletteRgb;
use palette::stimulus::FromStimulus;
use palette::{FromColor, Lch};

use crate::engine::grid::Tile;

use super::renderer::Modifier;

#[derive(Clone, Default)]
pub(crate) struct Rgb {
    color: PaletteRgb,
}

impl Rgb {
    pub(crate) fn new(r: u8, g: u8, b: u8) -> Self {
        Self {
            color: PaletteRgb::new(
                f32::from_stimulus(r),
                f32::from_stimulus(g),
                f32::from_stimulus(b),
            ),
        }
    }

    #[inline(always)]
    pub(crate) fn r(&self) -> u8 {
        u8::from_stimulus(self.color.red)
    }

    #[inline(always)]
    pub(crate) fn g(&self) -> u8 {
        u8::from_stimulus(self.color.green)
    }

    #[inline(always)]
    pub(crate) fn b(&self) -> u8 {
        u8::from_stimulus(self.color.blue)
    }

    /// The same hue with its lightness scaled by `factor`, clamped to the
    /// visible range.
    pub(crate) fn shaded(&self, factor: f32) -> Rgb {
        let mut lch = Lch::from_color(self.color);
        lch.l = (lch.l * factor).clamp(0.0, 100.0);
        Rgb {
            color: PaletteRgb::from_color(lch),
        }
    }
}

const BG_HUE: f32 = 28.0;

/// TilePalette maps every tile value the game can produce to a background
/// and foreground pair. Backgrounds are spread around the hue wheel so
/// neighbors in the doubling sequence stay easy to tell apart.
pub(crate) struct TilePalette {
    card_colors: HashMap<Tile, (Rgb, Rgb)>,
}

impl TilePalette {
    pub(crate) fn new() -> Self {
        let fg_hue = BG_HUE + 180.0;
        let card_colors = HashMap::from_iter((1..=13u32).map(|i| {
            let bg = Lch::new(80.0, 90.0, BG_HUE + i as f32 * 360.0 / 13.0);
            let fg = Lch::new(20.0, 50.0, fg_hue);
            (
                2u16.pow(i),
                (
                    Rgb {
                        color: PaletteRgb::from_color(bg),
                    },
                    Rgb {
                        color: PaletteRgb::from_color(fg),
                    },
                ),
            )
        }));
        Self { card_colors }
    }

    /// Background and foreground modifiers for a tile value, dimmed by
    /// `shade`. Values outside the table (unreachable in play) fall back to
    /// white on dark red.
    pub(crate) fn modifiers(&self, value: Tile, shade: f32) -> (Modifier, Modifier) {
        let (background, foreground) = self
            .card_colors
            .get(&value)
            .cloned()
            .unwrap_or((Rgb::new(255, 255, 255), Rgb::new(90, 0, 0)));
        let (background, foreground) = (background.shaded(shade), foreground.shaded(shade));
        (
            Modifier::BackgroundColor(background.r(), background.g(), background.b()),
            Modifier::ForegroundColor(foreground.r(), foreground.g(), foreground.b()),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn palette_covers_the_doubling_sequence() {
        let palette = TilePalette::new();
        for i in 1..=13u32 {
            assert!(palette.card_colors.contains_key(&2u16.pow(i)), "2^{}", i);
        }
    }

    #[test]
    fn distinct_values_get_distinct_backgrounds() {
        let palette = TilePalette::new();
        let (bg_2, _) = palette.modifiers(2, 1.0);
        let (bg_4, _) = palette.modifiers(4, 1.0);
        assert_ne!(bg_2, bg_4);
    }

    #[test]
    fn shading_darkens() {
        let color = Rgb::new(200, 120, 40);
        let dimmed = color.shaded(0.5);
        let brightness = |c: &Rgb| c.r() as u16 + c.g() as u16 + c.b() as u16;
        assert!(brightness(&dimmed) < brightness(&color));
    }
}
