// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Heap Allocator (WiFi benötigt dynamischen Speicher)
extern crate alloc;

use defmt::info;
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, Stack, StackResources};
use embassy_time::{Duration, Timer};
use esp_hal::clock::CpuClock;
use esp_hal::rng::Rng;
use esp_hal::timer::timg::TimerGroup;
use static_cell::StaticCell;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

use esp_farbsensor::ReportChannel;
use esp_farbsensor::config::{EXTRA_HEAP_SIZE, NET_SOCKET_COUNT, WIFI_HEAP_SIZE};
use esp_farbsensor::tasks::{connection_task, dhcp_task, mqtt_task, net_task, sensor_poll_task};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert Hardware und WiFi, spawnt Sensor-Poll, WiFi und MQTT Tasks
/// und schläft danach.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // Messwert-Channel: Sensor-Poll → MQTT
    static REPORTS: StaticCell<ReportChannel> = StaticCell::new();
    let reports = &*REPORTS.init(ReportChannel::new());

    // Sensor zuerst: läuft auch ohne WiFi
    spawner
        .spawn(sensor_poll_task(
            peripherals.I2C0,
            peripherals.GPIO6,
            peripherals.GPIO7,
            peripherals.GPIO9,
            reports.publisher().expect("Report publisher slot taken"),
        ))
        .expect("Failed to spawn sensor poll task");

    // WiFi Hardware
    static RADIO_INIT: StaticCell<esp_radio::Controller> = StaticCell::new();
    let radio_init =
        RADIO_INIT.init(esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller"));
    let (wifi_controller, wifi_interface) =
        esp_radio::wifi::new(radio_init, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi");

    // Netzwerk-Stack (Seed vom Hardware-RNG)
    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    static RESOURCES: StaticCell<StackResources<NET_SOCKET_COUNT>> = StaticCell::new();
    let (stack, runner) = embassy_net::new(
        wifi_interface.sta,
        NetConfig::dhcpv4(Default::default()),
        RESOURCES.init(StackResources::new()),
        seed,
    );
    static STACK: StaticCell<Stack<'static>> = StaticCell::new();
    let stack = &*STACK.init(stack);

    spawner
        .spawn(connection_task(wifi_controller))
        .expect("Failed to spawn WiFi task");
    spawner
        .spawn(net_task(runner))
        .expect("Failed to spawn net task");
    spawner
        .spawn(dhcp_task(stack))
        .expect("Failed to spawn DHCP task");
    spawner
        .spawn(mqtt_task(
            stack,
            reports.subscriber().expect("Report subscriber slot taken"),
        ))
        .expect("Failed to spawn MQTT task");

    info!("Main: All tasks running");
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
