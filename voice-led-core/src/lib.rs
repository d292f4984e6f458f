//! VOICE LED Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Event-Bus, Kommando-Protokoll, Zustandsautomat und die Ports
//! zu LED-Treiber, WiFi-Provisioning und Netzwerk-Kanal.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod controller;
pub mod error;
pub mod event_bus;
pub mod frame;
pub mod logic;
pub mod notifier;
pub mod palette;
pub mod protocol;
pub mod state;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use controller::DeviceController;
pub use error::{Error, Result};
pub use event_bus::{EventBus, EventHandler, Propagation};
pub use frame::{Frame, FrameKind};
pub use logic::{EffectFrames, blend, classify_release, dim};
pub use notifier::ColorChangeNotifier;
pub use palette::{PRESET_COLORS, Palette};
pub use protocol::{CommandHandler, Opcode, ResultCode};
pub use state::{DeviceState, SharedState};
pub use traits::{ColorNotifier, EffectEngine, LedError, Provisioner, SmartLedWriter};
pub use types::{ButtonPress, ColorValue, EffectKind, EffectRequest, EventKind, EventMessage};
