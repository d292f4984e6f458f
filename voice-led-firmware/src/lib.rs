// Library-Root: Adapter zwischen Core und Embassy, Tasks und Hardware
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;

use defmt::warn;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver};
use embassy_sync::pubsub::{PubSubChannel, Subscriber};
use embassy_sync::signal::Signal;

use voice_led_core::{
    ColorChangeNotifier, ColorNotifier, CommandHandler, DeviceController, EffectEngine,
    EffectRequest, EventBus, Provisioner,
};

use crate::config::{BUS_CAPACITY, CONTROL_TASK_POOL, EFFECT_QUEUE_DEPTH, NOTIFY_QUEUE_DEPTH};

// ============================================================================
// Type-Aliase
// ============================================================================
//
// Alle Kanäle nutzen CriticalSectionRawMutex: die Bus-Handler halten
// Referenzen darauf und müssen `Sync` sein.

/// Event-Bus des Geräts
pub type Bus = EventBus<'static, BUS_CAPACITY>;

/// Channel für Effekt-Anfragen (Zustandsautomat/Kommandos → Effekt-Task)
pub type EffectChannel = Channel<CriticalSectionRawMutex, EffectRequest, EFFECT_QUEUE_DEPTH>;

/// Receiver für Effekt-Anfragen (Effekt-Task empfängt)
pub type EffectReceiver = Receiver<'static, CriticalSectionRawMutex, EffectRequest, EFFECT_QUEUE_DEPTH>;

/// PubSubChannel für Farb-Notifications `[r, g, b]`
/// - NOTIFY_QUEUE_DEPTH: Nachrichten-Kapazität
/// - CONTROL_TASK_POOL: ein Subscriber pro Kontroll-Verbindung
/// - 1: Publisher-Slot (der Notifier nutzt den ImmediatePublisher)
pub type NotifyChannel =
    PubSubChannel<CriticalSectionRawMutex, [u8; 3], NOTIFY_QUEUE_DEPTH, CONTROL_TASK_POOL, 1>;

/// Subscriber einer Kontroll-Verbindung
pub type NotifySubscriber =
    Subscriber<'static, CriticalSectionRawMutex, [u8; 3], NOTIFY_QUEUE_DEPTH, CONTROL_TASK_POOL, 1>;

/// Signal: Taste lang gedrückt → WiFi-Task startet Provisioning
pub type ProvisionSignal = Signal<CriticalSectionRawMutex, ()>;

/// Zustandsautomat mit den Firmware-Adaptern
pub type Controller = DeviceController<'static, ChannelEffectEngine, SignalProvisioner>;

/// Notifier mit PubSub-Ausgang
pub type Notifier = ColorChangeNotifier<'static, PubSubNotifier>;

/// Kommando-Handler des Kontrollkanals
pub type Commands = CommandHandler<'static, ChannelEffectEngine>;

// ============================================================================
// Port-Adapter
// ============================================================================

/// `EffectEngine` über einen Embassy-Channel
///
/// Blockiert nie: ist die Queue voll, wird die Anfrage verworfen.
pub struct ChannelEffectEngine {
    channel: &'static EffectChannel,
}

impl ChannelEffectEngine {
    pub const fn new(channel: &'static EffectChannel) -> Self {
        Self { channel }
    }
}

impl EffectEngine for ChannelEffectEngine {
    fn request_effect(&self, request: EffectRequest) {
        if self.channel.try_send(request).is_err() {
            warn!("Effects: queue full, dropping {}", request.kind);
        }
    }
}

/// `Provisioner` über ein Embassy-Signal an den WiFi-Task
pub struct SignalProvisioner {
    signal: &'static ProvisionSignal,
}

impl SignalProvisioner {
    pub const fn new(signal: &'static ProvisionSignal) -> Self {
        Self { signal }
    }
}

impl Provisioner for SignalProvisioner {
    fn begin_provisioning(&self) {
        self.signal.signal(());
    }
}

/// `ColorNotifier` als Broadcast an alle Kontroll-Verbindungen
pub struct PubSubNotifier {
    channel: &'static NotifyChannel,
}

impl PubSubNotifier {
    pub const fn new(channel: &'static NotifyChannel) -> Self {
        Self { channel }
    }
}

impl ColorNotifier for PubSubNotifier {
    fn notify(&self, bytes: &[u8]) {
        match <[u8; 3]>::try_from(bytes) {
            // Ohne Subscriber geht die Nachricht einfach verloren
            Ok(rgb) => self.channel.immediate_publisher().publish_immediate(rgb),
            Err(_) => warn!("Notify: unexpected payload of {} bytes", bytes.len()),
        }
    }
}
