// Hardware Abstraction Layer (HAL) Module
//
// Konkrete Implementierungen der Core-Ports für ESP32-C6 Peripherie.
// Der Trait selbst (`SmartLedWriter`) liegt in voice-led-core.

pub mod led_writer;

pub use led_writer::{LED_BUFFER_SIZE, RmtLedWriter};
