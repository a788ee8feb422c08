// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
#![allow(dead_code)]

// ============================================================================
// Sensor-Bus Konfiguration
// ============================================================================

// Pins: SDA = GPIO6, SCL = GPIO7, Reset-Taster = GPIO9 (BOOT, aktiv low).
// Sie sind über die Peripheral-Typen in main.rs fest verdrahtet.

/// I²C Taktfrequenz in kHz
/// Der TCS3472 kann bis 400 kHz, 100 kHz ist robust bei langen Leitungen
pub const I2C_FREQUENCY_KHZ: u32 = 100;

// ============================================================================
// Poll-Controller Konfiguration
// ============================================================================

/// Anzahl Ticks pro Durchlauf, bevor der Poll-Task die CPU abgibt
pub const TICKS_PER_YIELD: u32 = 64;

/// Pause nach jedem Durchlauf in Mikrosekunden
/// 0 = nur yield, der Poll-Takt ist dann durch den I²C-Bus begrenzt
pub const TICK_BATCH_PAUSE_US: u64 = 0;

/// Watchdog: Ticks im selben Zustand bis zum automatischen Neustart
/// Ein Byte bei 100 kHz dauert ~90 µs, ein Tick ohne Transfer nur wenige µs.
/// 20_000 Ticks entsprechen damit deutlich mehr als einer Sekunde Stillstand.
pub const WATCHDOG_STALL_TICKS: u32 = 20_000;

/// Jeder n-te fertige Lese-Zyklus wird geloggt
pub const LOG_EVERY_CYCLES: u32 = 500;

// ============================================================================
// WiFi Konfiguration
// ============================================================================

/// WiFi SSID (Netzwerk-Name)
/// Wird zur Build-Zeit aus der Environment Variable WIFI_SSID geladen
pub const WIFI_SSID: &str = env!(
    "WIFI_SSID",
    "WiFi SSID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// WiFi Passwort
/// Wird zur Build-Zeit aus der Environment Variable WIFI_PASSWORD geladen
pub const WIFI_PASSWORD: &str = env!(
    "WIFI_PASSWORD",
    "WiFi Password nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Wartezeit nach fehlgeschlagenem Start/Connect in Sekunden
pub const WIFI_RETRY_DELAY_SECS: u64 = 5;

/// Heap-Größe für WiFi (Bytes)
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

/// Anzahl Sockets im embassy-net Stack (DHCP + DNS + MQTT)
pub const NET_SOCKET_COUNT: usize = 4;

// ============================================================================
// MQTT Konfiguration
// ============================================================================

/// MQTT Broker Hostname oder IP-Adresse
pub const MQTT_BROKER: &str = env!(
    "MQTT_BROKER",
    "MQTT Broker nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// MQTT Broker Port
/// Standard: 1883 (unverschlüsselt)
pub const MQTT_PORT: u16 = 1883;

/// MQTT Client ID
pub const MQTT_CLIENT_ID: &str = env!(
    "MQTT_CLIENT_ID",
    "MQTT Client ID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// MQTT Publish Topic für die Kanal-Messwerte (JSON)
pub const MQTT_TOPIC_CHANNELS: &str = env!(
    "MQTT_TOPIC_CHANNELS",
    "MQTT Topic Channels nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Minimaler Abstand zwischen zwei Publishes in Millisekunden
/// Der Sensor liefert viel schneller neue Werte als der Broker sehen muss
pub const MQTT_PUBLISH_INTERVAL_MS: u64 = 1000;

/// MQTT Keep-Alive in Sekunden
/// Ohne Messwerte wird nach der halben Zeit ein PINGREQ gesendet
pub const MQTT_KEEP_ALIVE_SECS: u16 = 30;

/// MQTT Reconnect Delay in Sekunden
pub const MQTT_RECONNECT_DELAY_SECS: u64 = 5;

/// MQTT Buffer-Größe in Bytes
pub const MQTT_BUFFER_SIZE: usize = 1024;

/// TCP RX/TX Buffer-Größe für die Broker-Verbindung in Bytes
pub const MQTT_SOCKET_BUFFER_SIZE: usize = 2048;

/// DNS Query Timeout in Sekunden
pub const DNS_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Telemetrie
// ============================================================================

/// JSON Serialisierungs-Buffer für einen Messwert
/// {"channels":{"clear":65535,"red":65535,"green":65535,"blue":65535},"rgb":"#ffffff","cycle":4294967295}
pub const JSON_REPORT_BUFFER_SIZE: usize = 128;
