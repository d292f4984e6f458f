//! Farbpalette für das Einschalten per Taste

use crate::types::ColorValue;

/// Feste Reihenfolge der Preset-Farben (gepackt: Rot in Bit 0-7)
pub const PRESET_COLORS: [ColorValue; 9] = [
    ColorValue::from_packed(0xffffff),
    ColorValue::from_packed(0xff4e00),
    ColorValue::from_packed(0xff1123),
    ColorValue::from_packed(0xec05ff),
    ColorValue::from_packed(0x00d3ff),
    ColorValue::from_packed(0x00ff2e),
    ColorValue::from_packed(0xff3588),
    ColorValue::from_packed(0xb981ff),
    ColorValue::from_packed(0x67ffa3),
];

/// Palette mit Cursor
///
/// `pick_next()` liefert die Farbe unter dem Cursor und schiebt ihn dann
/// weiter (modulo Palettengröße). Eine frische Palette beginnt also mit
/// dem ersten Preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Palette {
    cursor: usize,
}

impl Palette {
    pub const fn new() -> Self {
        Self { cursor: 0 }
    }

    pub const fn len(&self) -> usize {
        PRESET_COLORS.len()
    }

    pub const fn is_empty(&self) -> bool {
        PRESET_COLORS.is_empty()
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Farbe unter dem Cursor, ohne ihn zu bewegen
    pub const fn current(&self) -> ColorValue {
        PRESET_COLORS[self.cursor]
    }

    pub fn pick_next(&mut self) -> ColorValue {
        let color = self.current();
        debug!("Palette: [{}] picked", self.cursor);
        self.cursor = (self.cursor + 1) % PRESET_COLORS.len();
        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_pick_is_first_preset() {
        let mut palette = Palette::new();
        assert_eq!(palette.pick_next(), PRESET_COLORS[0]);
        assert_eq!(palette.cursor(), 1);
    }

    #[test]
    fn test_pick_wraps_after_all_presets() {
        let mut palette = Palette::new();
        for expected in PRESET_COLORS {
            assert_eq!(palette.pick_next(), expected);
        }
        assert_eq!(palette.cursor(), 0);
        assert_eq!(palette.pick_next(), PRESET_COLORS[0]);
    }

    #[test]
    fn test_current_does_not_advance() {
        let palette = Palette::new();
        assert_eq!(palette.current(), palette.current());
        assert_eq!(palette.cursor(), 0);
    }
}
