//! Core Types für die LED-Steuerung
//!
//! Datenstrukturen ohne Hardware-Dependencies: Farbwert, Bus-Nachrichten
//! und Effekt-Anfragen.

use rgb::RGB8;

/// 24-Bit RGB-Farbwert, gepackt wie auf dem Draht
///
/// Rot liegt in Bit 0-7, Grün in Bit 8-15, Blau in Bit 16-23.
/// Kein Alpha. `0` bedeutet im SetColor-Pfad "aus".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorValue(u32);

impl ColorValue {
    /// Schwarz / aus
    pub const OFF: Self = Self(0);

    /// Erstellt einen Farbwert aus einem gepackten Wert (obere 8 Bit werden verworfen)
    pub const fn from_packed(packed: u32) -> Self {
        Self(packed & 0x00ff_ffff)
    }

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self((r as u32) | (g as u32) << 8 | (b as u32) << 16)
    }

    /// Liest die Wire-Reihenfolge `[r, g, b]`
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::from_rgb(bytes[0], bytes[1], bytes[2])
    }

    pub const fn packed(self) -> u32 {
        self.0
    }

    pub const fn r(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    pub const fn g(self) -> u8 {
        ((self.0 >> 8) & 0xff) as u8
    }

    pub const fn b(self) -> u8 {
        ((self.0 >> 16) & 0xff) as u8
    }

    /// Wire-Reihenfolge `[r, g, b]` (gleiche Reihenfolge wie bei SetColor)
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.r(), self.g(), self.b()]
    }

    pub const fn is_off(self) -> bool {
        self.0 == 0
    }
}

impl From<RGB8> for ColorValue {
    fn from(color: RGB8) -> Self {
        Self::from_rgb(color.r, color.g, color.b)
    }
}

impl From<ColorValue> for RGB8 {
    fn from(color: ColorValue) -> Self {
        RGB8 {
            r: color.r(),
            g: color.g(),
            b: color.b(),
        }
    }
}

/// Tasten-Ereignis vom (extern entprellten) Button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonPress {
    /// Taste wurde gedrückt
    Pressed,
    /// Taste wird länger als die Long-Press-Schwelle gehalten
    LongHold,
    /// Kurzer Druck wurde losgelassen
    ShortRelease,
    /// Langer Druck wurde losgelassen
    LongRelease,
}

impl ButtonPress {
    /// Numerischer Code für die Raw-Ansicht einer Nachricht (`param2`)
    pub const fn code(self) -> u32 {
        match self {
            ButtonPress::Pressed => 0,
            ButtonPress::LongHold => 1,
            ButtonPress::ShortRelease => 2,
            ButtonPress::LongRelease => 3,
        }
    }

    pub const fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(ButtonPress::Pressed),
            1 => Some(ButtonPress::LongHold),
            2 => Some(ButtonPress::ShortRelease),
            3 => Some(ButtonPress::LongRelease),
            _ => None,
        }
    }
}

/// Typ einer Bus-Nachricht ohne Parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventKind {
    Startup,
    SmartConfigStart,
    SmartConfigStop,
    ButtonEvent,
    ColorUpdated,
}

/// Nachricht auf dem Event-Bus
///
/// Nach dem Publizieren unveränderlich (Handler bekommen nur `&EventMessage`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventMessage {
    /// System ist hochgefahren
    Startup,
    /// Provisioning (Smart Config) hat begonnen
    SmartConfigStart,
    /// Provisioning ist beendet (Erfolg oder Fehler)
    SmartConfigStop,
    /// Tasten-Ereignis von einer GPIO-Quelle
    Button { source: u8, press: ButtonPress },
    /// Die angezeigte Farbe hat sich geändert
    ColorUpdated(ColorValue),
}

impl EventMessage {
    pub const fn kind(&self) -> EventKind {
        match self {
            EventMessage::Startup => EventKind::Startup,
            EventMessage::SmartConfigStart => EventKind::SmartConfigStart,
            EventMessage::SmartConfigStop => EventKind::SmartConfigStop,
            EventMessage::Button { .. } => EventKind::ButtonEvent,
            EventMessage::ColorUpdated(_) => EventKind::ColorUpdated,
        }
    }

    /// Raw-Ansicht `(typ, param1, param2)`
    ///
    /// - Button: `param1` = Quelle, `param2` = Press-Code
    /// - ColorUpdated: `param1` = gepackte Farbe
    /// - sonst: `0, 0`
    pub const fn to_raw(&self) -> (EventKind, u32, u32) {
        match *self {
            EventMessage::Button { source, press } => {
                (EventKind::ButtonEvent, source as u32, press.code())
            }
            EventMessage::ColorUpdated(color) => (EventKind::ColorUpdated, color.packed(), 0),
            _ => (self.kind(), 0, 0),
        }
    }

    /// Gegenstück zu [`EventMessage::to_raw`]
    ///
    /// Gibt `None` zurück bei unbekanntem Press-Code oder einer Quelle > 255.
    pub fn from_raw(kind: EventKind, param1: u32, param2: u32) -> Option<Self> {
        match kind {
            EventKind::Startup => Some(EventMessage::Startup),
            EventKind::SmartConfigStart => Some(EventMessage::SmartConfigStart),
            EventKind::SmartConfigStop => Some(EventMessage::SmartConfigStop),
            EventKind::ButtonEvent => Some(EventMessage::Button {
                source: u8::try_from(param1).ok()?,
                press: ButtonPress::from_code(param2)?,
            }),
            EventKind::ColorUpdated => {
                Some(EventMessage::ColorUpdated(ColorValue::from_packed(param1)))
            }
        }
    }
}

/// Art des LED-Effekts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EffectKind {
    /// Alle LEDs sofort auf eine Farbe
    Fill,
    /// Weicher Übergang von der aktuellen zur Ziel-Farbe
    Gradient,
    /// Alle LEDs aus (Farbe wird ignoriert)
    AllOff,
}

/// Anfrage an die LED-Effekt-Engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectRequest {
    pub kind: EffectKind,
    pub color: ColorValue,
}

impl EffectRequest {
    pub const fn fill(color: ColorValue) -> Self {
        Self {
            kind: EffectKind::Fill,
            color,
        }
    }

    pub const fn gradient(color: ColorValue) -> Self {
        Self {
            kind: EffectKind::Gradient,
            color,
        }
    }

    pub const fn all_off() -> Self {
        Self {
            kind: EffectKind::AllOff,
            color: ColorValue::OFF,
        }
    }
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for ColorValue {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "rgb({}, {}, {})", self.r(), self.g(), self.b())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for EventMessage {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            EventMessage::Startup => defmt::write!(fmt, "Startup"),
            EventMessage::SmartConfigStart => defmt::write!(fmt, "SmartConfigStart"),
            EventMessage::SmartConfigStop => defmt::write!(fmt, "SmartConfigStop"),
            EventMessage::Button { source, press } => {
                defmt::write!(fmt, "Button {{ source: {}, press: {} }}", source, press)
            }
            EventMessage::ColorUpdated(color) => defmt::write!(fmt, "ColorUpdated({})", color),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for EffectRequest {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{} {}", self.kind, self.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_value_channel_layout() {
        let color = ColorValue::from_rgb(0x11, 0x22, 0x33);
        assert_eq!(color.packed(), 0x0033_2211);
        assert_eq!(color.to_bytes(), [0x11, 0x22, 0x33]);
    }

    #[test]
    fn test_color_value_masks_upper_byte() {
        let color = ColorValue::from_packed(0xff12_3456);
        assert_eq!(color.packed(), 0x0012_3456);
    }

    #[test]
    fn test_color_value_rgb8_conversion() {
        let rgb = RGB8 { r: 1, g: 2, b: 3 };
        let color = ColorValue::from(rgb);
        assert_eq!(RGB8::from(color), rgb);
    }

    #[test]
    fn test_raw_view_roundtrip() {
        let messages = [
            EventMessage::Startup,
            EventMessage::SmartConfigStart,
            EventMessage::SmartConfigStop,
            EventMessage::Button {
                source: 9,
                press: ButtonPress::LongRelease,
            },
            EventMessage::ColorUpdated(ColorValue::from_packed(0xec05ff)),
        ];
        for msg in messages {
            let (kind, p1, p2) = msg.to_raw();
            assert_eq!(EventMessage::from_raw(kind, p1, p2), Some(msg));
        }
    }

    #[test]
    fn test_from_raw_rejects_unknown_press_code() {
        assert_eq!(EventMessage::from_raw(EventKind::ButtonEvent, 9, 42), None);
        assert_eq!(EventMessage::from_raw(EventKind::ButtonEvent, 300, 2), None);
    }
}
