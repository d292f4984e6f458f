//! Pure Business Logic Functions
//!
//! Funktionen ohne Hardware-Dependencies (testbar!)

use rgb::RGB8;

use crate::types::{ButtonPress, ColorValue, EffectKind, EffectRequest};

/// Anzahl Frames eines Gradient-Übergangs
pub const GRADIENT_STEPS: u32 = 32;

/// Skaliert eine Farbe auf die Helligkeit `brightness` (0-255)
///
/// # Beispiele
///
/// ```
/// # use rgb::RGB8;
/// # use voice_led_core::{ColorValue, dim};
/// let color = ColorValue::from_rgb(255, 128, 0);
/// assert_eq!(dim(color, 10), RGB8 { r: 10, g: 5, b: 0 });
/// ```
pub fn dim(color: ColorValue, brightness: u8) -> RGB8 {
    let scale = |c: u8| ((c as u16 * brightness as u16) / 255) as u8;
    RGB8 {
        r: scale(color.r()),
        g: scale(color.g()),
        b: scale(color.b()),
    }
}

/// Lineare Mischung zwischen `from` und `to` bei `step / steps`
pub fn blend(from: ColorValue, to: ColorValue, step: u32, steps: u32) -> ColorValue {
    if steps == 0 || step >= steps {
        return to;
    }
    let mix = |a: u8, b: u8| {
        let a = a as i64;
        let b = b as i64;
        (a + (b - a) * step as i64 / steps as i64) as u8
    };
    ColorValue::from_rgb(
        mix(from.r(), to.r()),
        mix(from.g(), to.g()),
        mix(from.b(), to.b()),
    )
}

/// Klassifiziert das Loslassen der Taste nach Haltedauer
pub fn classify_release(held_ms: u64, long_press_ms: u64) -> ButtonPress {
    if held_ms >= long_press_ms {
        ButtonPress::LongRelease
    } else {
        ButtonPress::ShortRelease
    }
}

/// Frames, die für eine Effekt-Anfrage auf den Strip geschrieben werden
///
/// - Fill: ein Frame mit der Ziel-Farbe
/// - AllOff: ein schwarzer Frame
/// - Gradient: `steps` Frames von der aktuell angezeigten Farbe zur
///   Ziel-Farbe, der letzte Frame ist genau die Ziel-Farbe
#[derive(Debug, Clone)]
pub struct EffectFrames {
    from: ColorValue,
    to: ColorValue,
    steps: u32,
    next: u32,
}

impl EffectFrames {
    pub fn new(request: EffectRequest, shown: ColorValue) -> Self {
        Self::with_steps(request, shown, GRADIENT_STEPS)
    }

    pub fn with_steps(request: EffectRequest, shown: ColorValue, steps: u32) -> Self {
        let (to, steps) = match request.kind {
            EffectKind::Fill => (request.color, 1),
            EffectKind::AllOff => (ColorValue::OFF, 1),
            EffectKind::Gradient => (request.color, steps.max(1)),
        };
        Self {
            from: shown,
            to,
            steps,
            next: 1,
        }
    }

    /// Farbe nach dem letzten Frame
    pub const fn target(&self) -> ColorValue {
        self.to
    }
}

impl Iterator for EffectFrames {
    type Item = ColorValue;

    fn next(&mut self) -> Option<ColorValue> {
        if self.next > self.steps {
            return None;
        }
        let frame = blend(self.from, self.to, self.next, self.steps);
        self.next += 1;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.steps as usize + 1).saturating_sub(self.next as usize);
        (left, Some(left))
    }
}

impl ExactSizeIterator for EffectFrames {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dim_full_brightness_is_identity() {
        let color = ColorValue::from_rgb(12, 34, 56);
        assert_eq!(dim(color, 255), RGB8::from(color));
    }

    #[test]
    fn test_dim_zero_is_black() {
        assert_eq!(dim(ColorValue::from_packed(0xffffff), 0), RGB8::default());
    }

    #[test]
    fn test_blend_endpoints() {
        let from = ColorValue::from_rgb(0, 100, 200);
        let to = ColorValue::from_rgb(200, 100, 0);
        assert_eq!(blend(from, to, 0, 4), from);
        assert_eq!(blend(from, to, 4, 4), to);
        assert_eq!(blend(from, to, 2, 4), ColorValue::from_rgb(100, 100, 100));
    }

    #[test]
    fn test_fill_is_single_frame() {
        let frames: Vec<_> =
            EffectFrames::new(EffectRequest::fill(ColorValue::from_packed(0x00d3ff)), ColorValue::OFF)
                .collect();
        assert_eq!(frames, vec![ColorValue::from_packed(0x00d3ff)]);
    }

    #[test]
    fn test_all_off_is_single_black_frame() {
        let frames: Vec<_> =
            EffectFrames::new(EffectRequest::all_off(), ColorValue::from_packed(0xffffff)).collect();
        assert_eq!(frames, vec![ColorValue::OFF]);
    }

    #[test]
    fn test_gradient_ends_on_target() {
        let target = ColorValue::from_rgb(255, 0, 0);
        let frames = EffectFrames::with_steps(EffectRequest::gradient(target), ColorValue::OFF, 8);
        assert_eq!(frames.len(), 8);
        let frames: Vec<_> = frames.collect();
        assert_eq!(frames.last(), Some(&target));
        // monoton steigend im Rot-Kanal
        assert!(frames.windows(2).all(|w| w[0].r() <= w[1].r()));
    }

    #[test]
    fn test_classify_release() {
        assert_eq!(classify_release(100, 2000), ButtonPress::ShortRelease);
        assert_eq!(classify_release(2000, 2000), ButtonPress::LongRelease);
        assert_eq!(classify_release(5000, 2000), ButtonPress::LongRelease);
    }
}
