//! Zustandsautomat des Geräts (Off ↔ On)
//!
//! Konsumiert Bus-Nachrichten und setzt sie in Zustandsänderungen,
//! Effekt-Anfragen und Provisioning-Starts um.

use crate::event_bus::{EventHandler, Propagation};
use crate::state::SharedState;
use crate::traits::{EffectEngine, Provisioner};
use crate::types::{ButtonPress, EffectKind, EventMessage};

/// Bus-Handler für Taste und Provisioning
///
/// | Nachricht | Wirkung |
/// |---|---|
/// | ShortRelease (eigene Taste) | Off → On mit nächster Palettenfarbe (Fill), On → Off (AllOff) |
/// | LongRelease (eigene Taste) | Provisioning starten, Zustand unverändert |
/// | SmartConfigStop | `on = true`, kein Effekt |
/// | alles andere | ignoriert |
pub struct DeviceController<'a, E: EffectEngine, P: Provisioner> {
    state: &'a SharedState,
    effects: &'a E,
    provisioner: &'a P,
    button_source: u8,
}

impl<'a, E: EffectEngine, P: Provisioner> DeviceController<'a, E, P> {
    /// `button_source` ist die einzige GPIO-Quelle, auf die reagiert wird
    pub const fn new(
        state: &'a SharedState,
        effects: &'a E,
        provisioner: &'a P,
        button_source: u8,
    ) -> Self {
        Self {
            state,
            effects,
            provisioner,
            button_source,
        }
    }

    fn on_button(&self, press: ButtonPress) {
        match press {
            ButtonPress::ShortRelease => {
                // Zustand im Lock ändern, Effekt erst danach anfordern:
                // die Engine darf synchron auf den Bus zurück publizieren.
                let effect = self.state.with(|s| s.toggle());
                match effect.kind {
                    EffectKind::AllOff => info!("Controller: turn off"),
                    _ => info!("Controller: turn on {}", effect.color),
                }
                self.effects.request_effect(effect);
            }
            ButtonPress::LongRelease => {
                info!("Controller: smart config");
                self.provisioner.begin_provisioning();
            }
            ButtonPress::Pressed | ButtonPress::LongHold => {}
        }
    }
}

impl<E: EffectEngine, P: Provisioner> EventHandler for DeviceController<'_, E, P> {
    fn handle(&self, message: &EventMessage) -> Propagation {
        match *message {
            EventMessage::Startup => info!("Controller: startup"),
            EventMessage::SmartConfigStart => info!("Controller: smart config started"),
            EventMessage::SmartConfigStop => {
                info!("Controller: smart config stopped");
                self.state.with(|s| s.finish_provisioning());
            }
            EventMessage::Button { source, press } if source == self.button_source => {
                self.on_button(press)
            }
            EventMessage::Button { .. } | EventMessage::ColorUpdated(_) => {}
        }
        Propagation::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PRESET_COLORS;
    use crate::types::EffectRequest;
    use std::sync::Mutex;

    const BUTTON: u8 = 9;

    #[derive(Default)]
    struct RecordingEngine {
        requests: Mutex<Vec<EffectRequest>>,
    }

    impl EffectEngine for RecordingEngine {
        fn request_effect(&self, request: EffectRequest) {
            self.requests.lock().unwrap().push(request);
        }
    }

    #[derive(Default)]
    struct CountingProvisioner {
        calls: Mutex<usize>,
    }

    impl Provisioner for CountingProvisioner {
        fn begin_provisioning(&self) {
            *self.calls.lock().unwrap() += 1;
        }
    }

    fn short(source: u8) -> EventMessage {
        EventMessage::Button {
            source,
            press: ButtonPress::ShortRelease,
        }
    }

    #[test]
    fn test_short_release_turns_on_with_first_preset() {
        let state = SharedState::new();
        let engine = RecordingEngine::default();
        let provisioner = CountingProvisioner::default();
        let controller = DeviceController::new(&state, &engine, &provisioner, BUTTON);

        assert_eq!(controller.handle(&short(BUTTON)), Propagation::Continue);

        assert!(state.snapshot().is_on());
        assert_eq!(state.snapshot().last_color(), PRESET_COLORS[0]);
        assert_eq!(
            engine.requests.lock().unwrap().as_slice(),
            &[EffectRequest::fill(PRESET_COLORS[0])]
        );
    }

    #[test]
    fn test_second_short_release_turns_off() {
        let state = SharedState::new();
        let engine = RecordingEngine::default();
        let provisioner = CountingProvisioner::default();
        let controller = DeviceController::new(&state, &engine, &provisioner, BUTTON);

        controller.handle(&short(BUTTON));
        controller.handle(&short(BUTTON));

        assert!(!state.snapshot().is_on());
        let requests = engine.requests.lock().unwrap();
        assert_eq!(requests.last().map(|r| r.kind), Some(EffectKind::AllOff));
    }

    #[test]
    fn test_other_button_source_is_ignored() {
        let state = SharedState::new();
        let engine = RecordingEngine::default();
        let provisioner = CountingProvisioner::default();
        let controller = DeviceController::new(&state, &engine, &provisioner, BUTTON);

        controller.handle(&short(BUTTON + 1));

        assert!(!state.snapshot().is_on());
        assert!(engine.requests.lock().unwrap().is_empty());
    }

    #[test]
    fn test_long_release_starts_provisioning() {
        let state = SharedState::new();
        let engine = RecordingEngine::default();
        let provisioner = CountingProvisioner::default();
        let controller = DeviceController::new(&state, &engine, &provisioner, BUTTON);

        controller.handle(&EventMessage::Button {
            source: BUTTON,
            press: ButtonPress::LongRelease,
        });

        assert_eq!(*provisioner.calls.lock().unwrap(), 1);
        assert_eq!(state.snapshot(), SharedState::new().snapshot());
        assert!(engine.requests.lock().unwrap().is_empty());
    }

    #[test]
    fn test_smart_config_stop_forces_on_without_effect() {
        let state = SharedState::new();
        let engine = RecordingEngine::default();
        let provisioner = CountingProvisioner::default();
        let controller = DeviceController::new(&state, &engine, &provisioner, BUTTON);

        controller.handle(&EventMessage::SmartConfigStop);

        assert!(state.snapshot().is_on());
        assert!(engine.requests.lock().unwrap().is_empty());
    }
}
