//! Geräte-Zustand (an/aus, letzte Farbe, Paletten-Cursor)
//!
//! Es gibt genau eine Instanz pro Prozess. Sie wird als [`SharedState`]
//! explizit erzeugt und per Referenz an Zustandsautomat, Notifier und
//! Kommando-Handler übergeben.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use crate::palette::Palette;
use crate::types::{ColorValue, EffectRequest};

/// Zustand des Geräts
///
/// Alle Read-Modify-Write Übergänge sind hier als Methoden gebündelt,
/// damit sie in einem einzigen kritischen Abschnitt laufen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceState {
    on: bool,
    last_color: ColorValue,
    palette: Palette,
}

impl DeviceState {
    /// Startzustand: aus, keine Farbe, Cursor auf dem ersten Preset
    pub const fn new() -> Self {
        Self {
            on: false,
            last_color: ColorValue::OFF,
            palette: Palette::new(),
        }
    }

    pub const fn is_on(&self) -> bool {
        self.on
    }

    pub const fn last_color(&self) -> ColorValue {
        self.last_color
    }

    pub const fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Kurzer Tastendruck: aus → an mit nächster Palettenfarbe, an → aus
    ///
    /// Gibt den Effekt zurück, den der Aufrufer nach dem Lock anfordern muss.
    /// Beim Ausschalten bleibt `last_color` unverändert.
    pub fn toggle(&mut self) -> EffectRequest {
        if self.on {
            self.on = false;
            EffectRequest::all_off()
        } else {
            self.on = true;
            self.last_color = self.palette.pick_next();
            EffectRequest::fill(self.last_color)
        }
    }

    /// Farbe per Netzwerk gesetzt
    ///
    /// `on` wird für Farben != 0 auf `false` und für 0 auf `true` gesetzt.
    /// Das ist das beobachtete Verhalten der bestehenden Geräte und bleibt so.
    pub fn apply_remote_color(&mut self, color: ColorValue) {
        self.on = color.is_off();
        self.last_color = color;
    }

    /// Provisioning beendet: Gerät gilt als an
    pub fn finish_provisioning(&mut self) {
        self.on = true;
    }

    /// Von der Effekt-Engine gemeldete Farbe übernehmen
    pub fn record_color(&mut self, color: ColorValue) {
        self.last_color = color;
    }
}

impl Default for DeviceState {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutex-geschützter Geräte-Zustand
///
/// Ein einziger Lock für alles; der Zustand ist klein und Änderungen
/// kommen im Takt von Tastendrücken und gelegentlichen Netzwerk-Kommandos.
pub struct SharedState {
    inner: Mutex<CriticalSectionRawMutex, RefCell<DeviceState>>,
}

impl SharedState {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(DeviceState::new())),
        }
    }

    /// Führt `f` als einen kritischen Abschnitt aus
    ///
    /// `f` darf weder den Zustand erneut sperren noch auf den Bus publizieren.
    pub fn with<R>(&self, f: impl FnOnce(&mut DeviceState) -> R) -> R {
        self.inner.lock(|state| f(&mut state.borrow_mut()))
    }

    /// Kopie des aktuellen Zustands
    pub fn snapshot(&self) -> DeviceState {
        self.inner.lock(|state| *state.borrow())
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
