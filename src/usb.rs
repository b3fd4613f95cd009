//! embassy-usb CDC-ACM device and the pipes that connect it to the console.

use core::fmt::Write;
use core::sync::atomic::{AtomicBool, Ordering};

use embassy_futures::select::{Either, select};
use embassy_futures::yield_now;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::USB;
use embassy_rp::usb::{Driver, InterruptHandler};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::pipe::Pipe;
use embassy_time::{Duration, Timer};
use embassy_usb::class::cdc_acm::{CdcAcmClass, Receiver, Sender, State};
use embassy_usb::driver::EndpointError;
use embassy_usb::{Builder, Config, Handler, UsbDevice};
use static_cell::StaticCell;

use crate::Error;
use crate::config::{
    RX_PIPE_SIZE, TX_PIPE_SIZE, USB_DEFAULT_SERIAL, USB_MANUFACTURER, USB_PACKET_SIZE, USB_PID,
    USB_PRODUCT, USB_VID,
};
use crate::indicator::UsbEvent;
use crate::transport::{LinkEdge, LinkWatch, Transport};

// Bind USB interrupts
bind_interrupts!(pub struct Irqs {
    USBCTRL_IRQ => InterruptHandler<USB>;
});

pub type UsbDriver = Driver<'static, USB>;

const DTR_POLL_INTERVAL: Duration = Duration::from_millis(10);

static RX_PIPE: Pipe<CriticalSectionRawMutex, RX_PIPE_SIZE> = Pipe::new();
static TX_PIPE: Pipe<CriticalSectionRawMutex, TX_PIPE_SIZE> = Pipe::new();
static USB_EVENTS: Channel<CriticalSectionRawMutex, UsbEvent, 8> = Channel::new();
static MOUNTED: AtomicBool = AtomicBool::new(false);
static CONNECTED: AtomicBool = AtomicBool::new(false);

/// Handles conversion of USB endpoint errors to our Error type
impl From<EndpointError> for Error {
    fn from(val: EndpointError) -> Self {
        match val {
            EndpointError::BufferOverflow => Error::BufferOverflow,
            EndpointError::Disabled => Error::Disconnected,
        }
    }
}

fn notify(event: UsbEvent) {
    if USB_EVENTS.try_send(event).is_err() {
        warn!("usb event queue full, dropping {:?}", event);
    }
}

/// Forwards device lifecycle callbacks to the console as [`UsbEvent`]s.
pub struct UsbStatusHandler;

impl Handler for UsbStatusHandler {
    fn reset(&mut self) {
        if MOUNTED.swap(false, Ordering::Relaxed) {
            notify(UsbEvent::Unmounted);
        }
    }

    fn configured(&mut self, configured: bool) {
        MOUNTED.store(configured, Ordering::Relaxed);
        notify(if configured {
            UsbEvent::Mounted
        } else {
            UsbEvent::Unmounted
        });
    }

    fn suspended(&mut self, suspended: bool) {
        notify(if suspended {
            UsbEvent::Suspended
        } else {
            UsbEvent::Resumed
        });
    }
}

/// Serial number string built from the chip id, falling back to a fixed one.
pub fn serial_number() -> &'static str {
    static SERIAL: StaticCell<heapless::String<16>> = StaticCell::new();

    match embassy_rp::otp::get_chipid() {
        Ok(id) => {
            let serial = SERIAL.init(heapless::String::new());
            if write!(serial, "{:016X}", id).is_err() {
                return USB_DEFAULT_SERIAL;
            }
            serial.as_str()
        }
        Err(_) => USB_DEFAULT_SERIAL,
    }
}

/// Initializes the USB CDC ACM (serial) device
pub fn setup_usb(
    usb_peripheral: USB,
    serial_number: &'static str,
    state: &'static mut State<'static>,
    config_desc: &'static mut [u8; 256],
    bos_desc: &'static mut [u8; 256],
    control_buf: &'static mut [u8; 64],
    handler: &'static mut UsbStatusHandler,
) -> (UsbDevice<'static, UsbDriver>, CdcAcmClass<'static, UsbDriver>) {
    let driver = Driver::new(usb_peripheral, Irqs);

    // Configure USB device
    let mut config = Config::new(USB_VID, USB_PID);
    config.manufacturer = Some(USB_MANUFACTURER);
    config.product = Some(USB_PRODUCT);
    config.serial_number = Some(serial_number);
    config.max_power = 100;

    // Create USB builder
    let mut builder = Builder::new(driver, config, config_desc, bos_desc, &mut [], control_buf);
    builder.handler(handler);

    // Create CDC ACM class
    let class = CdcAcmClass::new(&mut builder, state, USB_PACKET_SIZE);

    (builder.build(), class)
}

#[embassy_executor::task]
pub async fn usb_task(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    device.run().await
}

/// Moves received packets into the inbound pipe and tracks DTR.
#[embassy_executor::task]
pub async fn rx_task(mut receiver: Receiver<'static, UsbDriver>) {
    let mut buf = [0u8; USB_PACKET_SIZE as usize];
    let mut terminal = LinkWatch::new();
    loop {
        receiver.wait_connection().await;
        debug!("cdc receiver enabled");
        if let Err(e) = pump_rx(&mut receiver, &mut terminal, &mut buf).await {
            warn!("cdc receive stopped: {:?}", e);
        }
        update_dtr(&mut terminal, false);
    }
}

fn update_dtr(terminal: &mut LinkWatch, dtr: bool) {
    CONNECTED.store(dtr, Ordering::Relaxed);
    if terminal.update(dtr) == Some(LinkEdge::Down) {
        // Output queued for the departed terminal must not precede the next
        // session's first redraw.
        TX_PIPE.clear();
    }
}

async fn pump_rx(
    receiver: &mut Receiver<'static, UsbDriver>,
    terminal: &mut LinkWatch,
    buf: &mut [u8],
) -> Result<(), Error> {
    loop {
        update_dtr(terminal, receiver.dtr());
        // Wake up periodically so DTR changes are seen without traffic.
        let n = match select(receiver.read_packet(buf), Timer::after(DTR_POLL_INTERVAL)).await {
            Either::First(read) => read?,
            Either::Second(()) => continue,
        };

        // Keep tracking DTR while the console has not made room yet.
        let mut pending = &buf[..n];
        while !pending.is_empty() {
            match select(RX_PIPE.write(pending), Timer::after(DTR_POLL_INTERVAL)).await {
                Either::First(written) => pending = &pending[written..],
                Either::Second(()) => update_dtr(terminal, receiver.dtr()),
            }
        }
    }
}

/// Drains the outbound pipe into IN packets.
#[embassy_executor::task]
pub async fn tx_task(mut sender: Sender<'static, UsbDriver>) {
    let mut buf = [0u8; USB_PACKET_SIZE as usize];
    loop {
        sender.wait_connection().await;
        debug!("cdc sender enabled");
        TX_PIPE.clear();
        if let Err(e) = pump_tx(&mut sender, &mut buf).await {
            warn!("cdc send stopped: {:?}", e);
        }
    }
}

async fn pump_tx(sender: &mut Sender<'static, UsbDriver>, buf: &mut [u8]) -> Result<(), Error> {
    loop {
        let n = TX_PIPE.read(buf).await;
        sender.write_packet(&buf[..n]).await?;
        // A full packet leaves the host waiting for more; end the transfer.
        if n == buf.len() && TX_PIPE.is_empty() {
            sender.write_packet(&[]).await?;
        }
    }
}

/// Console side of the pipes.
pub struct UsbTransport;

impl Transport for UsbTransport {
    fn is_connected(&self) -> bool {
        CONNECTED.load(Ordering::Relaxed)
    }

    fn is_mounted(&self) -> bool {
        MOUNTED.load(Ordering::Relaxed)
    }

    fn bytes_available(&self) -> bool {
        !RX_PIPE.is_empty()
    }

    fn read_byte(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        match RX_PIPE.try_read(&mut byte) {
            Ok(1) => Some(byte[0]),
            _ => None,
        }
    }

    fn write(&mut self, data: &[u8]) -> usize {
        TX_PIPE.try_write(data).unwrap_or(0)
    }

    fn flush(&mut self) {
        // tx_task sends whatever reaches the pipe without waiting for more.
    }

    fn poll_event(&mut self) -> Option<UsbEvent> {
        USB_EVENTS.try_receive().ok()
    }

    async fn service(&mut self) {
        yield_now().await
    }
}
