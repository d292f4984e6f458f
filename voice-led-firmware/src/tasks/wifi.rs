// WiFi Task - Verbindet mit WLAN, managed Connection und Provisioning
use defmt::{Debug2Format, error, info, warn};
use embassy_futures::select::{Either, select};
use embassy_net::{Runner, Stack};
use embassy_time::{Duration, Timer, with_timeout};
use esp_radio::wifi::{ClientConfig, ModeConfig, WifiController, WifiDevice, WifiEvent};
use voice_led_core::EventMessage;

use crate::config::{PROVISIONING_TIMEOUT_SECS, WIFI_PASSWORD, WIFI_RETRY_DELAY_SECS, WIFI_SSID};
use crate::{Bus, ProvisionSignal};

fn client_config() -> ModeConfig {
    ModeConfig::Client(
        ClientConfig::default()
            .with_ssid(WIFI_SSID.into())
            .with_password(WIFI_PASSWORD.into()),
    )
}

/// Ein Provisioning-Durchlauf
///
/// Trennt die Verbindung, übernimmt die Zugangsdaten neu und verbindet
/// mit Timeout. Start und Ende gehen als SmartConfigStart/-Stop auf den Bus,
/// Stop auch im Fehlerfall.
async fn provision(controller: &mut WifiController<'static>, bus: &'static Bus) {
    info!("WiFi: Provisioning started");
    bus.publish(&EventMessage::SmartConfigStart);

    if let Err(e) = controller.disconnect_async().await {
        warn!("WiFi: Disconnect failed: {}", Debug2Format(&e));
    }

    let connected = match controller.set_config(&client_config()) {
        Ok(()) => with_timeout(
            Duration::from_secs(PROVISIONING_TIMEOUT_SECS),
            controller.connect_async(),
        )
        .await,
        Err(e) => {
            error!("WiFi: Failed to set configuration: {}", Debug2Format(&e));
            Ok(Err(e))
        }
    };

    match connected {
        Ok(Ok(())) => info!("WiFi: Provisioning finished, connected to '{}'", WIFI_SSID),
        Ok(Err(e)) => error!("WiFi: Provisioning failed: {}", Debug2Format(&e)),
        Err(_) => error!("WiFi: Provisioning timed out"),
    }

    bus.publish(&EventMessage::SmartConfigStop);
}

/// WiFi Connection Task
///
/// Managed die WiFi-Verbindung:
/// - Verbindet mit Access Point (Zugangsdaten aus .env)
/// - Überwacht Verbindung und reconnected bei Bedarf
/// - Führt Provisioning aus, wenn `provision_signal` ausgelöst wird
#[embassy_executor::task]
pub async fn connection_task(
    mut controller: WifiController<'static>,
    provision_signal: &'static ProvisionSignal,
    bus: &'static Bus,
) {
    info!("WiFi: Starting connection task");

    loop {
        if matches!(controller.is_started(), Ok(false)) {
            info!("WiFi: Configuring and starting...");

            if let Err(e) = controller.set_config(&client_config()) {
                error!("WiFi: Failed to set configuration: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
                continue;
            }

            if let Err(e) = controller.start_async().await {
                error!("WiFi: Failed to start: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
                continue;
            }

            info!("WiFi: Started successfully");
        }

        info!("WiFi: Connecting to '{}'...", WIFI_SSID);
        match controller.connect_async().await {
            Ok(_) => {
                info!("WiFi: Connected successfully!");
            }
            Err(e) => {
                error!("WiFi: Connection failed: {}", Debug2Format(&e));
                // Provisioning auch ohne Verbindung erlauben
                if provision_signal.signaled() {
                    provision_signal.reset();
                    provision(&mut controller, bus).await;
                    continue;
                }
                Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
                continue;
            }
        }

        // Verbunden: auf Disconnect oder Provisioning-Anfrage warten
        match select(
            controller.wait_for_event(WifiEvent::StaDisconnected),
            provision_signal.wait(),
        )
        .await
        {
            Either::First(()) => {
                warn!("WiFi: Disconnected from AP, will retry...");
                Timer::after(Duration::from_secs(2)).await;
            }
            Either::Second(()) => provision(&mut controller, bus).await,
        }
    }
}

/// Network Task
///
/// Überwacht den Netzwerk-Stack:
/// - Prozessiert Netzwerk-Pakete
/// - Managed TCP/IP Stack
#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}

/// DHCP Monitor Task
///
/// Wartet bis eine IP-Adresse vom DHCP-Server erhalten wurde
/// und loggt dann die Netzwerk-Konfiguration
#[embassy_executor::task]
pub async fn dhcp_task(stack: &'static Stack<'static>) {
    loop {
        if stack.is_link_up() {
            break;
        }
        Timer::after(Duration::from_millis(500)).await;
    }

    info!("WiFi: Link is up, waiting for IP address...");

    loop {
        if let Some(config) = stack.config_v4() {
            info!("WiFi: Got IP address!");
            info!("  IP:      {}", Debug2Format(&config.address.address()));
            info!("  Gateway: {}", Debug2Format(&config.gateway));
            info!("  DNS:     {}", Debug2Format(&config.dns_servers));
            break;
        }
        Timer::after(Duration::from_millis(500)).await;
    }
}
