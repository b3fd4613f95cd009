#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(not(target_os = "none"))]
mod host;

#[cfg(feature = "menu")]
type Variant = pico_cdc_repl::Menu;
#[cfg(not(feature = "menu"))]
type Variant = pico_cdc_repl::Shell;

/// Delay between main loop iterations.
const TICK_MS: u64 = 1;

#[cfg(not(target_os = "none"))]
fn main() {
    host::run(Variant::new());
}

#[cfg(target_os = "none")]
use {defmt_rtt as _, panic_probe as _};

#[cfg(target_os = "none")]
#[unsafe(link_section = ".start_block")]
#[used]
pub static IMAGE_DEF: embassy_rp::block::ImageDef = embassy_rp::block::ImageDef::secure_exe();

#[cfg(target_os = "none")]
#[embassy_executor::main]
async fn main(spawner: embassy_executor::Spawner) {
    use embassy_rp::gpio::{Level, Output};
    use embassy_time::{Delay, Duration, Instant, Timer};
    use embassy_usb::class::cdc_acm::State;
    use pico_cdc_repl::App;
    use pico_cdc_repl::usb::{self, UsbStatusHandler, UsbTransport};
    use static_cell::StaticCell;

    static STATE: StaticCell<State> = StaticCell::new();
    static CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
    static BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
    static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();
    static HANDLER: StaticCell<UsbStatusHandler> = StaticCell::new();

    let p = embassy_rp::init(Default::default());
    defmt::info!("Pico CDC console starting");

    let led = Output::new(p.PIN_25, Level::Low);

    let (device, class) = usb::setup_usb(
        p.USB,
        usb::serial_number(),
        STATE.init(State::new()),
        CONFIG_DESC.init([0; 256]),
        BOS_DESC.init([0; 256]),
        CONTROL_BUF.init([0; 64]),
        HANDLER.init(UsbStatusHandler),
    );
    let (sender, receiver) = class.split();

    spawner.spawn(usb::usb_task(device)).unwrap();
    spawner.spawn(usb::rx_task(receiver)).unwrap();
    spawner.spawn(usb::tx_task(sender)).unwrap();

    let mut app = App::new(UsbTransport, led, Delay, Variant::new());
    loop {
        app.tick(Instant::now().as_millis()).await;
        Timer::after(Duration::from_millis(TICK_MS)).await;
    }
}
