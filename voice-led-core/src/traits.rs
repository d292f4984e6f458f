//! Ports zu externen Kollaborateuren
//!
//! Diese Traits definieren Schnittstellen zu LED-Treiber, WiFi-Provisioning
//! und Netzwerk-Kanal ohne konkrete Implementierung.
//!
//! # Implementierungen
//! - **Production:** Channel-/Signal-Adapter in `voice-led-firmware`
//! - **Testing:** Mocks in `voice-led-tests`

use rgb::RGB8;

use crate::types::EffectRequest;

/// Fehler-Typ für LED-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedError {
    InitFailed,
    WriteFailed,
}

/// Trait für SmartLED Hardware-Zugriff
///
/// Abstrahiert den Zugriff auf einen RGB LED-Strip (WS2812/Neopixel).
pub trait SmartLedWriter: Send {
    /// Setzt alle LEDs des Strips auf eine Farbe
    ///
    /// # Fehlerbehandlung
    /// Gibt `LedError::WriteFailed` zurück wenn Hardware-Zugriff fehlschlägt
    fn write(&mut self, color: RGB8) -> Result<(), LedError>;
}

/// LED-Effekt-Engine (fire-and-forget)
///
/// Muss sofort zurückkehren; die Engine puffert intern oder verwirft.
pub trait EffectEngine: Sync {
    fn request_effect(&self, request: EffectRequest);
}

/// WiFi-Provisioning (Smart Config)
pub trait Provisioner: Sync {
    /// Startet den Provisioning-Ablauf. Timeouts gehören dem Kollaborateur.
    fn begin_provisioning(&self);
}

/// Push-Kanal zu verbundenen Netzwerk-Peers
pub trait ColorNotifier: Sync {
    /// Sendet `bytes` an alle Peers. Kein Peer verbunden ist kein Fehler.
    fn notify(&self, bytes: &[u8]);
}
