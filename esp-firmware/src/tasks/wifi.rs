// WiFi Tasks - Station-Modus, Netzwerk-Stack, DHCP
use defmt::{Debug2Format, info, warn};
use embassy_net::{Runner, Stack};
use embassy_time::{Duration, Timer};
use esp_radio::wifi::{ClientConfig, ModeConfig, WifiController, WifiDevice, WifiError, WifiEvent};

use crate::config::{WIFI_PASSWORD, WIFI_RETRY_DELAY_SECS, WIFI_SSID};

/// Konfiguriert und startet den Station-Modus, falls noch nicht gestartet
async fn ensure_started(controller: &mut WifiController<'static>) -> Result<(), WifiError> {
    if matches!(controller.is_started(), Ok(true)) {
        return Ok(());
    }

    let station = ModeConfig::Client(
        ClientConfig::default()
            .with_ssid(WIFI_SSID.into())
            .with_password(WIFI_PASSWORD.into()),
    );
    controller.set_config(&station)?;
    controller.start_async().await?;
    info!("WiFi: Station started");
    Ok(())
}

/// WiFi Connection Task
///
/// Hält die Verbindung zum Access Point: starten, verbinden, auf
/// Disconnect warten, neu verbinden.
#[embassy_executor::task]
pub async fn connection_task(mut controller: WifiController<'static>) {
    let retry = Duration::from_secs(WIFI_RETRY_DELAY_SECS);

    loop {
        if let Err(e) = ensure_started(&mut controller).await {
            warn!("WiFi: Start failed: {}", Debug2Format(&e));
            Timer::after(retry).await;
            continue;
        }

        info!("WiFi: Connecting to '{}'...", WIFI_SSID);
        if let Err(e) = controller.connect_async().await {
            warn!("WiFi: Connect failed: {}", Debug2Format(&e));
            Timer::after(retry).await;
            continue;
        }
        info!("WiFi: Connected");

        controller.wait_for_event(WifiEvent::StaDisconnected).await;
        warn!("WiFi: Disconnected, reconnecting...");
    }
}

/// Network Task - treibt den embassy-net Stack
#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}

/// DHCP Monitor Task - loggt die erhaltene Adresse einmalig
#[embassy_executor::task]
pub async fn dhcp_task(stack: &'static Stack<'static>) {
    stack.wait_config_up().await;

    if let Some(config) = stack.config_v4() {
        info!(
            "WiFi: IP {} via gateway {}",
            Debug2Format(&config.address),
            Debug2Format(&config.gateway)
        );
    }
}
