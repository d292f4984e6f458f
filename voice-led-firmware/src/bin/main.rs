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

// Embassy Async Runtime
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, Stack, StackResources};
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::rng::Rng;
use esp_hal::timer::timg::TimerGroup;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use defmt::{error, info};
use static_cell::StaticCell;
use voice_led::config::{
    BUTTON_GPIO_PIN, CONTROL_TASK_POOL, EXTRA_HEAP_SIZE, NET_SOCKETS, WIFI_HEAP_SIZE,
};
use voice_led::tasks::{
    button_task, connection_task, control_task, dhcp_task, effects_task, net_task,
};
use voice_led::{
    Bus, ChannelEffectEngine, Commands, Controller, EffectChannel, Notifier, NotifyChannel,
    ProvisionSignal, PubSubNotifier, SignalProvisioner,
};
use voice_led_core::{
    ColorChangeNotifier, CommandHandler, DeviceController, EventHandler, EventMessage,
    SharedState,
};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert Hardware, WiFi und die Core-Objekte, verdrahtet den
/// Event-Bus und spawnt die Tasks. Danach schläft main().
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Heap Allocator initialisieren (WiFi braucht dynamischen Speicher!)
    // Zwei Bereiche: reclaimed RAM (64 KB) + extra (36 KB) = 100 KB total
    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // WiFi Hardware initialisieren
    static RADIO_INIT: StaticCell<esp_radio::Controller> = StaticCell::new();
    let radio_init =
        RADIO_INIT.init(esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller"));

    let (wifi_controller, wifi_interface) =
        esp_radio::wifi::new(radio_init, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi");

    // Netzwerk-Stack erstellen
    // Random seed für TCP/IP Stack (von Hardware RNG)
    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    static RESOURCES: StaticCell<StackResources<NET_SOCKETS>> = StaticCell::new();
    let resources = RESOURCES.init(StackResources::new());

    // embassy-net erstellt Stack + Runner (nutzt STA interface für Client-Modus)
    let (stack, runner) = embassy_net::new(
        wifi_interface.sta,
        NetConfig::dhcpv4(Default::default()),
        resources,
        seed,
    );

    // Stack muss 'static sein für Tasks
    static STACK: StaticCell<Stack<'static>> = StaticCell::new();
    let stack = &*STACK.init(stack);

    info!("Main: free heap {} bytes", esp_alloc::HEAP.free());

    // ------------------------------------------------------------------
    // Core-Objekte: ein Zustand, ein Bus, Adapter zu den Tasks
    // ------------------------------------------------------------------

    static STATE: StaticCell<SharedState> = StaticCell::new();
    let state = &*STATE.init(SharedState::new());

    static BUS: StaticCell<Bus> = StaticCell::new();
    let bus = &*BUS.init(Bus::new());

    static EFFECT_CHANNEL: StaticCell<EffectChannel> = StaticCell::new();
    let effect_channel = &*EFFECT_CHANNEL.init(EffectChannel::new());

    static EFFECT_ENGINE: StaticCell<ChannelEffectEngine> = StaticCell::new();
    let effect_engine = &*EFFECT_ENGINE.init(ChannelEffectEngine::new(effect_channel));

    static PROVISION_SIGNAL: StaticCell<ProvisionSignal> = StaticCell::new();
    let provision_signal = &*PROVISION_SIGNAL.init(ProvisionSignal::new());

    static PROVISIONER: StaticCell<SignalProvisioner> = StaticCell::new();
    let provisioner = &*PROVISIONER.init(SignalProvisioner::new(provision_signal));

    // Farb-Channel: PubSub Broadcast an alle Kontroll-Verbindungen
    static NOTIFY_CHANNEL: StaticCell<NotifyChannel> = StaticCell::new();
    let notify_channel = &*NOTIFY_CHANNEL.init(NotifyChannel::new());

    static NOTIFY_PORT: StaticCell<PubSubNotifier> = StaticCell::new();
    let notify_port = &*NOTIFY_PORT.init(PubSubNotifier::new(notify_channel));

    static CONTROLLER: StaticCell<Controller> = StaticCell::new();
    let controller = &*CONTROLLER.init(DeviceController::new(
        state,
        effect_engine,
        provisioner,
        BUTTON_GPIO_PIN,
    ));

    static NOTIFIER: StaticCell<Notifier> = StaticCell::new();
    let notifier = &*NOTIFIER.init(ColorChangeNotifier::new(state, notify_port));

    static COMMANDS: StaticCell<Commands> = StaticCell::new();
    let commands = &*COMMANDS.init(CommandHandler::new(state, effect_engine));

    // Reihenfolge = Zustellreihenfolge: erst Zustandsautomat, dann Notifier
    for handler in [controller as &dyn EventHandler, notifier] {
        if let Err(e) = bus.register(handler) {
            error!("Main: failed to register bus handler: {}", e);
        }
    }
    bus.publish(&EventMessage::Startup);

    // ------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------

    spawner
        .spawn(effects_task(
            peripherals.GPIO8,
            peripherals.RMT,
            effect_channel.receiver(),
            bus,
        ))
        .unwrap();
    spawner.spawn(button_task(peripherals.GPIO9, bus)).unwrap();

    // WiFi Tasks
    spawner
        .spawn(connection_task(wifi_controller, provision_signal, bus))
        .unwrap();
    spawner.spawn(net_task(runner)).unwrap();
    spawner.spawn(dhcp_task(stack)).unwrap();

    // Kontrollkanal (eine Task-Instanz pro gleichzeitiger Verbindung)
    for task_id in 0..CONTROL_TASK_POOL {
        spawner
            .spawn(control_task(task_id, stack, commands, notify_channel))
            .unwrap();
    }

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
