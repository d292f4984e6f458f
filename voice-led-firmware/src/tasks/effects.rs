// Effekt Task - Spielt Effekt-Anfragen auf dem LED-Strip ab
use defmt::{error, info};
use embassy_futures::select::{Either, select};
use embassy_time::{Duration, Timer};
use esp_hal_smartled::smart_led_buffer;
use voice_led_core::{
    ColorValue, EffectFrames, EffectKind, EffectRequest, EventMessage, SmartLedWriter, dim,
};

use crate::config::{GRADIENT_FRAME_INTERVAL_MS, LED_BRIGHTNESS, LED_COUNT, RMT_CLOCK_MHZ};
use crate::hal::RmtLedWriter;
use crate::{Bus, EffectReceiver};

/// Effekt-Logik ohne Hardware-Initialisierung
///
/// - Fill/AllOff: ein Frame
/// - Gradient: Frames im Abstand von `GRADIENT_FRAME_INTERVAL_MS`,
///   eine neue Anfrage bricht den laufenden Gradient ab
/// - Nach Fill/Gradient: `ColorUpdated` auf dem Bus (AllOff nicht)
///
/// # Parameter
/// - `led`: LED Writer (Hardware)
/// - `requests`: Channel Receiver für Effekt-Anfragen
/// - `bus`: Event-Bus für die Fertig-Meldung
pub async fn effects_logic<L: SmartLedWriter>(
    mut led: L,
    requests: EffectReceiver,
    bus: &'static Bus,
) -> ! {
    // Aktuell angezeigte Farbe (Startpunkt für Gradients)
    let mut shown = ColorValue::OFF;
    let mut next: Option<EffectRequest> = None;

    loop {
        let request = match next.take() {
            Some(request) => request,
            None => requests.receive().await,
        };
        info!("Effects: {} {}", request.kind, request.color);

        let frames = EffectFrames::new(request, shown);
        let target = frames.target();
        let last = frames.len().saturating_sub(1);

        for (index, frame) in frames.enumerate() {
            if led.write(dim(frame, LED_BRIGHTNESS)).is_err() {
                error!("Effects: failed to write to LED strip");
            }
            shown = frame;

            if index == last {
                break;
            }

            // Nächster Frame oder neue Anfrage, je nachdem was zuerst kommt
            match select(
                Timer::after(Duration::from_millis(GRADIENT_FRAME_INTERVAL_MS)),
                requests.receive(),
            )
            .await
            {
                Either::First(()) => {}
                Either::Second(preempt) => {
                    info!("Effects: preempted at {}", frame);
                    next = Some(preempt);
                    break;
                }
            }
        }

        if next.is_none() && request.kind != EffectKind::AllOff {
            bus.publish(&EventMessage::ColorUpdated(target));
        }
    }
}

/// Effekt Task - Embassy Task für parallele Ausführung
///
/// Übernimmt die Hardware-Initialisierung und ruft dann `effects_logic()` auf.
///
/// # Parameter
/// - `gpio8`: GPIO8 Peripheral für LED-Datenleitung
/// - `rmt_peripheral`: RMT Peripheral für präzises Timing
/// - `requests`: Channel Receiver für Effekt-Anfragen
/// - `bus`: Event-Bus
#[embassy_executor::task]
pub async fn effects_task(
    gpio8: esp_hal::peripherals::GPIO8<'static>,
    rmt_peripheral: esp_hal::peripherals::RMT<'static>,
    requests: EffectReceiver,
    bus: &'static Bus,
) {
    // Buffer für SmartLED Daten (LED_COUNT LEDs)
    let mut rmt_buffer = smart_led_buffer!(LED_COUNT);

    let led = match RmtLedWriter::new(gpio8, rmt_peripheral, RMT_CLOCK_MHZ, &mut rmt_buffer) {
        Ok(led) => led,
        Err(e) => {
            error!("Effects: LED strip init failed: {}", e);
            return;
        }
    };

    effects_logic(led, requests, bus).await
}
