// Button Task - Entprellt die Taste und publiziert Button-Nachrichten
use defmt::{debug, info};
use embassy_futures::select::{Either, select};
use embassy_time::{Duration, Instant, Timer};
use esp_hal::gpio::{Input, InputConfig, Pull};
use voice_led_core::{ButtonPress, EventMessage, classify_release};

use crate::Bus;
use crate::config::{BUTTON_DEBOUNCE_MS, BUTTON_GPIO_PIN, BUTTON_LONG_PRESS_MS};

fn publish(bus: &Bus, press: ButtonPress) {
    debug!("Button: {}", press);
    bus.publish(&EventMessage::Button {
        source: BUTTON_GPIO_PIN,
        press,
    });
}

/// Button Task
///
/// Ablauf pro Druck:
/// 1. Fallende Flanke, nach Entprellen noch low → `Pressed`
/// 2. Nach `BUTTON_LONG_PRESS_MS` noch gedrückt → `LongHold`
/// 3. Loslassen (entprellt) → `ShortRelease` oder `LongRelease`
#[embassy_executor::task]
pub async fn button_task(pin: esp_hal::peripherals::GPIO9<'static>, bus: &'static Bus) {
    let mut button = Input::new(pin, InputConfig::default().with_pull(Pull::Up));
    let debounce = Duration::from_millis(BUTTON_DEBOUNCE_MS);
    info!("Button: listening on GPIO{}", BUTTON_GPIO_PIN);

    loop {
        button.wait_for_falling_edge().await;
        Timer::after(debounce).await;
        if button.is_high() {
            // Prellen
            continue;
        }

        let pressed_at = Instant::now();
        publish(bus, ButtonPress::Pressed);

        if let Either::Second(()) = select(
            button.wait_for_high(),
            Timer::after(Duration::from_millis(BUTTON_LONG_PRESS_MS)),
        )
        .await
        {
            publish(bus, ButtonPress::LongHold);
            button.wait_for_high().await;
        }

        let held_ms = pressed_at.elapsed().as_millis();
        Timer::after(debounce).await;
        publish(bus, classify_release(held_ms, BUTTON_LONG_PRESS_MS));
    }
}
