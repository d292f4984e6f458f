// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
#![allow(dead_code)]

// ============================================================================
// LED Konfiguration
// ============================================================================

/// GPIO-Pin für den RGB LED-Strip (WS2812/Neopixel)
pub const LED_GPIO_PIN: u8 = 8;

/// Helligkeits-Level für den Strip (0-255)
/// Jeder Frame wird vor dem Schreiben damit skaliert
pub const LED_BRIGHTNESS: u8 = 48;

/// RMT Taktfrequenz in MHz
/// 80 MHz ist optimal für WS2812 LED-Timing
pub const RMT_CLOCK_MHZ: u32 = 80;

/// Anzahl der LEDs im Strip
pub const LED_COUNT: usize = 16;

/// Abstand zwischen zwei Gradient-Frames in Millisekunden
pub const GRADIENT_FRAME_INTERVAL_MS: u64 = 15;

/// Warteschlange der Effekt-Anfragen
/// Volle Queue → Anfrage wird verworfen
pub const EFFECT_QUEUE_DEPTH: usize = 4;

// ============================================================================
// Taste
// ============================================================================

/// GPIO-Pin der Taste (gegen GND, interner Pull-Up)
/// Dient gleichzeitig als `source` in Button-Nachrichten
pub const BUTTON_GPIO_PIN: u8 = 9;

/// Entprell-Zeit in Millisekunden
pub const BUTTON_DEBOUNCE_MS: u64 = 30;

/// Ab dieser Haltedauer gilt ein Druck als lang
pub const BUTTON_LONG_PRESS_MS: u64 = 2000;

// ============================================================================
// Event-Bus
// ============================================================================

/// Maximale Anzahl Handler (Zustandsautomat + Notifier + Reserve)
pub const BUS_CAPACITY: usize = 4;

// ============================================================================
// WiFi Konfiguration
// ============================================================================

/// WiFi SSID (Netzwerk-Name)
/// Wird zur Build-Zeit aus der Environment Variable WIFI_SSID geladen
/// Setze diese in .env file
pub const WIFI_SSID: &str = env!(
    "WIFI_SSID",
    "WiFi SSID nicht gesetzt! Erstelle .env file mit WIFI_SSID=..."
);

/// WiFi Passwort
/// Wird zur Build-Zeit aus der Environment Variable WIFI_PASSWORD geladen
pub const WIFI_PASSWORD: &str = env!(
    "WIFI_PASSWORD",
    "WiFi Password nicht gesetzt! Erstelle .env file mit WIFI_PASSWORD=..."
);

/// Wartezeit nach fehlgeschlagenem Start/Connect
pub const WIFI_RETRY_DELAY_SECS: u64 = 5;

/// Wie lange ein Provisioning-Durchlauf auf die Verbindung wartet
pub const PROVISIONING_TIMEOUT_SECS: u64 = 60;

/// Heap-Größe für WiFi (Bytes)
/// WiFi benötigt dynamischen Speicher für Pakete
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

// ============================================================================
// Kontrollkanal (TCP)
// ============================================================================

/// TCP-Port des Kontrollkanals
pub const CONTROL_PORT: u16 = 3333;

/// Anzahl gleichzeitiger Peers (= Task-Pool)
pub const CONTROL_TASK_POOL: usize = 2;

/// Geräte-Klasse im Hello-Frame
pub const DEVICE_CLASS_ID: u8 = 0x02;

/// Geräte-Name im Hello-Frame
pub const DEVICE_NAME: &str = "VOICE LED";

/// Arbeits-Buffer für den Kommando-Handler
/// Anfrage steht ab Offset 0, Antwort wird in denselben Buffer geschrieben
pub const COMMAND_BUFFER_SIZE: usize = 64;

/// TCP RX Buffer-Größe in Bytes
pub const TCP_RX_BUFFER_SIZE: usize = 512;

/// TCP TX Buffer-Größe in Bytes
pub const TCP_TX_BUFFER_SIZE: usize = 512;

/// Farb-Notifications, die ein langsamer Peer verpassen darf
pub const NOTIFY_QUEUE_DEPTH: usize = 4;

/// Anzahl Sockets im embassy-net Stack
/// DHCP (1) + DNS (1) + Kontrollkanal
pub const NET_SOCKETS: usize = 2 + CONTROL_TASK_POOL;
