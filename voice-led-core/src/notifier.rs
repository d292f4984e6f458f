//! Farb-Änderungen an verbundene Peers pushen

use crate::event_bus::{EventHandler, Propagation};
use crate::state::SharedState;
use crate::traits::ColorNotifier;
use crate::types::EventMessage;

/// Bus-Handler für `ColorUpdated`
///
/// Übernimmt die gemeldete Farbe als `last_color` und schickt sie als
/// `[r, g, b]` an den Netzwerk-Kanal, damit Peers nicht pollen müssen.
pub struct ColorChangeNotifier<'a, N: ColorNotifier> {
    state: &'a SharedState,
    channel: &'a N,
}

impl<'a, N: ColorNotifier> ColorChangeNotifier<'a, N> {
    pub const fn new(state: &'a SharedState, channel: &'a N) -> Self {
        Self { state, channel }
    }
}

impl<N: ColorNotifier> EventHandler for ColorChangeNotifier<'_, N> {
    fn handle(&self, message: &EventMessage) -> Propagation {
        if let EventMessage::ColorUpdated(color) = *message {
            debug!("Notifier: color updated {}", color);
            self.state.with(|s| s.record_color(color));
            self.channel.notify(&color.to_bytes());
        }
        Propagation::Continue
    }
}
