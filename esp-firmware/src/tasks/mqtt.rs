// MQTT Task - Published Farbsensor-Messwerte an MQTT Broker
use defmt::{Debug2Format, error, info, warn};
use embassy_futures::select::{Either, select};
use embassy_net::{IpAddress, Ipv4Address, Stack, dns::DnsQueryType, tcp::TcpSocket};
use embassy_time::{Duration, Instant, Timer, with_timeout};

use rust_mqtt::client::client::MqttClient;
use rust_mqtt::client::client_config::{ClientConfig, MqttVersion};
use rust_mqtt::packet::v5::publish_packet::QualityOfService;
use rust_mqtt::utils::rng_generator::CountingRng;
use rust_mqtt::utils::types::EncodedString;

use crate::config::*;
use crate::telemetry::encode_report;
use crate::{ReportSubscriber, SensorReport};

/// MQTT Task - läuft parallel zum Sensor-Poll Task
///
/// - Wartet auf Netzwerk-Verbindung
/// - Verbindet sich mit dem Broker
/// - Published den jeweils neuesten Messwert als JSON, höchstens alle
///   `MQTT_PUBLISH_INTERVAL_MS`
/// - Automatisches Reconnect bei Fehlern
#[embassy_executor::task]
pub async fn mqtt_task(stack: &'static Stack<'static>, mut reports: ReportSubscriber) {
    info!("MQTT: Task started, waiting for network...");
    wait_for_network(stack).await;
    info!("MQTT: Network ready");

    loop {
        if let Err(e) = publish_session(stack, &mut reports).await {
            error!("MQTT: {}", e);
        }
        info!("MQTT: Reconnecting in {}s...", MQTT_RECONNECT_DELAY_SECS);
        Timer::after(Duration::from_secs(MQTT_RECONNECT_DELAY_SECS)).await;
    }
}

async fn wait_for_network(stack: &'static Stack<'static>) {
    while !(stack.is_link_up() && stack.config_v4().is_some()) {
        Timer::after(Duration::from_millis(500)).await;
    }
}

/// Wartet auf den nächsten Messwert und überspringt alles, was sich
/// währenddessen angestaut hat
async fn latest_report(reports: &mut ReportSubscriber) -> SensorReport {
    let mut report = reports.next_message_pure().await;
    while let Some(newer) = reports.try_next_message_pure() {
        report = newer;
    }
    report
}

/// Eine Broker-Session: DNS, TCP, CONNECT, dann Publish-Schleife
///
/// Kehrt nur mit einem Fehler zurück, der Aufrufer verbindet neu.
async fn publish_session(
    stack: &'static Stack<'static>,
    reports: &mut ReportSubscriber,
) -> Result<(), MqttError> {
    info!("MQTT: Resolving '{}'...", MQTT_BROKER);
    let broker_ip = resolve_hostname(stack, MQTT_BROKER).await?;
    info!("MQTT: Resolved to {}", Debug2Format(&broker_ip));

    let mut rx_buffer = [0u8; MQTT_SOCKET_BUFFER_SIZE];
    let mut tx_buffer = [0u8; MQTT_SOCKET_BUFFER_SIZE];
    let mut socket = TcpSocket::new(*stack, &mut rx_buffer, &mut tx_buffer);
    socket.set_timeout(Some(Duration::from_secs(10)));
    socket
        .connect((broker_ip, MQTT_PORT))
        .await
        .map_err(|_| MqttError::ConnectionFailed)?;

    let mut config = ClientConfig::<5, _>::new(MqttVersion::MQTTv5, CountingRng(20000));
    config.client_id = EncodedString {
        string: MQTT_CLIENT_ID,
        len: MQTT_CLIENT_ID.len() as u16,
    };
    config.keep_alive = MQTT_KEEP_ALIVE_SECS;
    config.max_packet_size = MQTT_BUFFER_SIZE as u32;

    let mut send_buffer = [0u8; MQTT_BUFFER_SIZE];
    let mut recv_buffer = [0u8; MQTT_BUFFER_SIZE];
    let mut client = MqttClient::<_, 5, _>::new(
        socket,
        &mut send_buffer,
        MQTT_BUFFER_SIZE,
        &mut recv_buffer,
        MQTT_BUFFER_SIZE,
        config,
    );
    client
        .connect_to_broker()
        .await
        .map_err(|_| MqttError::ProtocolError)?;
    info!("MQTT: Connected, publishing to '{}'", MQTT_TOPIC_CHANNELS);

    let interval = Duration::from_millis(MQTT_PUBLISH_INTERVAL_MS);
    let ping_after = Duration::from_secs(u64::from(MQTT_KEEP_ALIVE_SECS) / 2);
    let mut json = [0u8; JSON_REPORT_BUFFER_SIZE];
    let mut next_publish = Instant::now();

    loop {
        // Drosselung: dazwischen fertige Zyklen stauen sich im Channel
        Timer::at(next_publish).await;

        let report = match select(latest_report(reports), Timer::after(ping_after)).await {
            Either::First(report) => report,
            Either::Second(()) => {
                // Keine Messwerte (z.B. Sensor hängt): Verbindung trotzdem halten
                if let Err(e) = client.send_ping().await {
                    warn!("MQTT: Ping failed: {}", Debug2Format(&e));
                    return Err(MqttError::ProtocolError);
                }
                continue;
            }
        };

        let len = match encode_report(&report, &mut json) {
            Ok(len) => len,
            Err(e) => {
                warn!("MQTT: Dropping cycle {}: {}", report.cycle, e);
                continue;
            }
        };

        client
            .send_message(
                MQTT_TOPIC_CHANNELS,
                &json[..len],
                QualityOfService::QoS0,
                false,
            )
            .await
            .map_err(|_| MqttError::PublishFailed)?;
        next_publish = Instant::now() + interval;
    }
}

async fn resolve_hostname(
    stack: &'static Stack<'static>,
    hostname: &str,
) -> Result<Ipv4Address, MqttError> {
    let addrs = with_timeout(
        Duration::from_secs(DNS_TIMEOUT_SECS),
        stack.dns_query(hostname, DnsQueryType::A),
    )
    .await
    .map_err(|_| MqttError::DnsTimeout)?
    .map_err(|_| MqttError::DnsResolutionFailed)?;

    addrs
        .iter()
        .find_map(|addr| {
            if let IpAddress::Ipv4(ipv4) = addr {
                Some(*ipv4)
            } else {
                None
            }
        })
        .ok_or(MqttError::DnsResolutionFailed)
}

/// MQTT Fehler-Typen
#[derive(Debug)]
enum MqttError {
    DnsResolutionFailed,
    DnsTimeout,
    ConnectionFailed,
    ProtocolError,
    PublishFailed,
}

impl defmt::Format for MqttError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            MqttError::DnsResolutionFailed => defmt::write!(fmt, "DNS failed"),
            MqttError::DnsTimeout => defmt::write!(fmt, "DNS timeout"),
            MqttError::ConnectionFailed => defmt::write!(fmt, "Connection failed"),
            MqttError::ProtocolError => defmt::write!(fmt, "Protocol error"),
            MqttError::PublishFailed => defmt::write!(fmt, "Publish failed"),
        }
    }
}
