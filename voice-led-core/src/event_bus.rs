//! In-Process Publish/Subscribe Bus
//!
//! Entkoppelt die Event-Quellen (Button, WiFi, Effekt-Engine) von den
//! Konsumenten (Zustandsautomat, Notifier). Zustellung ist synchron auf
//! dem Kontext des Publishers, ohne Queue und ohne Replay.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use crate::error::{Error, Result};
use crate::types::EventMessage;

/// Antwort eines Handlers: weiterreichen oder Zustellung abbrechen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Propagation {
    Continue,
    Stop,
}

/// Konsument von Bus-Nachrichten
///
/// `handle()` läuft auf dem Kontext des Publishers und muss kurz bleiben.
pub trait EventHandler: Sync {
    fn handle(&self, message: &EventMessage) -> Propagation;
}

/// Feste Handler-Tabelle ohne Drop, damit Handler den Bus selbst
/// referenzieren dürfen (`&'a EventBus<'a, N>`)
#[derive(Clone, Copy)]
struct HandlerTable<'a, const N: usize> {
    slots: [Option<&'a dyn EventHandler>; N],
    len: usize,
}

impl<'a, const N: usize> HandlerTable<'a, N> {
    const fn new() -> Self {
        Self {
            slots: [None; N],
            len: 0,
        }
    }

    fn push(&mut self, handler: &'a dyn EventHandler) -> Result<()> {
        let slot = self.slots.get_mut(self.len).ok_or(Error::CapacityExceeded)?;
        *slot = Some(handler);
        self.len += 1;
        Ok(())
    }

    fn iter(&self) -> impl Iterator<Item = &'a dyn EventHandler> + '_ {
        self.slots[..self.len].iter().flatten().copied()
    }
}

/// Event-Bus mit maximal `N` Handlern
///
/// `register()` nimmt `&self`, damit Handler selbst eine Referenz auf den
/// Bus halten können (z.B. die Effekt-Engine, die `ColorUpdated` publiziert).
pub struct EventBus<'a, const N: usize> {
    handlers: Mutex<CriticalSectionRawMutex, RefCell<HandlerTable<'a, N>>>,
}

impl<'a, const N: usize> EventBus<'a, N> {
    pub const fn new() -> Self {
        Self {
            handlers: Mutex::new(RefCell::new(HandlerTable::new())),
        }
    }

    /// Hängt einen Handler an (Reihenfolge = Zustellreihenfolge)
    ///
    /// Doppelte Registrierung wird nicht erkannt, beide Einträge feuern.
    pub fn register(&self, handler: &'a dyn EventHandler) -> Result<()> {
        self.handlers
            .lock(|handlers| handlers.borrow_mut().push(handler))?;
        debug!("EventBus: handler registered ({}/{})", self.len(), N);
        Ok(())
    }

    /// Stellt `message` allen Handlern in Registrierungsreihenfolge zu
    ///
    /// Die Handler-Tabelle wird vorher kopiert, die Handler laufen also
    /// außerhalb des Locks und dürfen selbst publizieren.
    pub fn publish(&self, message: &EventMessage) {
        let handlers = self.handlers.lock(|handlers| *handlers.borrow());
        for handler in handlers.iter() {
            if handler.handle(message) == Propagation::Stop {
                break;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.lock(|handlers| handlers.borrow().len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for EventBus<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}
