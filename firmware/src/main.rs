#![no_std]
#![no_main]

use akc695x::{Akc695x, Akc695xRadio, AmBand, Config, Error, FmBand, Mode, SeekDirection};
use embassy_executor::Spawner;
use embassy_futures::select::{Either, select};
use embassy_nrf::gpio::{Level, Output, OutputDrive};
use embassy_nrf::peripherals::{SERIAL0, SERIAL1};
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::{bind_interrupts, uarte};
use embassy_time::{Delay, Timer};
use log::{error, info, warn};
use panic_probe as _;
use static_cell::ConstStaticCell;

mod cli;
pub mod console;
pub mod events;
mod serial_logger;

use events::{NotifyPublisher, SystemEvent, SystemNotify};

bind_interrupts!(struct Irqs {
    SERIAL0 => uarte::InterruptHandler<SERIAL0>;
    SERIAL1 => twim::InterruptHandler<SERIAL1>;
});

const HEARTBEAT_MS: u64 = 500;

async fn publish_band<R: Akc695xRadio>(radio: &R, publisher: &NotifyPublisher<'_>) {
    let session = radio.session();
    publisher
        .publish(SystemNotify::BandChanged {
            mode: session.mode,
            band: session.band,
            min: session.min,
            max: session.max,
        })
        .await;
}

async fn publish_volume<R: Akc695xRadio>(radio: &R, publisher: &NotifyPublisher<'_>) {
    publisher
        .publish(SystemNotify::VolumeChanged(radio.session().volume))
        .await;
}

async fn publish_tune_status<R: Akc695xRadio>(
    radio: &mut R,
    publisher: &NotifyPublisher<'_>,
) -> Result<(), Error> {
    let status = radio.tune_status().await?;
    publisher.publish(SystemNotify::TuneStatus(status)).await;
    Ok(())
}

async fn handle_event<R: Akc695xRadio>(
    radio: &mut R,
    event: SystemEvent,
    publisher: &NotifyPublisher<'_>,
) -> Result<(), Error> {
    match event {
        SystemEvent::RadioFmOn => {
            radio.set_fm_band(FmBand::Fm1).await?;
            publisher.publish(SystemNotify::RadioFmOn).await;
            publish_band(radio, publisher).await;
            publish_tune_status(radio, publisher).await?;
        }
        SystemEvent::RadioAmOn => {
            radio.set_am_band(AmBand::Mw1).await?;
            publisher.publish(SystemNotify::RadioAmOn).await;
            publish_band(radio, publisher).await;
            publish_tune_status(radio, publisher).await?;
        }
        SystemEvent::RadioOff => {
            radio.power_off().await?;
            publisher.publish(SystemNotify::RadioOff).await;
        }
        SystemEvent::RadioBand(index) => {
            match radio.session().mode {
                Mode::Fm => {
                    let band = FmBand::from_index(index).ok_or(Error::InvalidBand)?;
                    radio.set_fm_band(band).await?;
                }
                Mode::Am => {
                    let band = AmBand::from_index(index).ok_or(Error::InvalidBand)?;
                    radio.set_am_band(band).await?;
                }
            }
            publish_band(radio, publisher).await;
            publish_tune_status(radio, publisher).await?;
        }
        SystemEvent::RadioSeekUp | SystemEvent::RadioSeekDown => {
            let direction = if event == SystemEvent::RadioSeekUp {
                SeekDirection::Up
            } else {
                SeekDirection::Down
            };
            let result = radio.seek_station(direction).await;
            // a timed out seek still leaves the receiver on some channel
            publish_tune_status(radio, publisher).await?;
            let frequency = result?;
            info!("Seek stopped at {}", frequency);
        }
        SystemEvent::RadioStepUp => {
            radio.frequency_up().await?;
            publish_tune_status(radio, publisher).await?;
        }
        SystemEvent::RadioStepDown => {
            radio.frequency_down().await?;
            publish_tune_status(radio, publisher).await?;
        }
        SystemEvent::RadioSetFrequency(frequency) => {
            radio.set_frequency(frequency).await?;
            publish_tune_status(radio, publisher).await?;
        }
        SystemEvent::RadioSetStep(step) => {
            radio.set_step(step).await?;
            publisher.publish(SystemNotify::StepChanged(step)).await;
        }
        SystemEvent::RadioMute => {
            radio.set_mute(true).await?;
            publisher.publish(SystemNotify::RadioMute).await;
        }
        SystemEvent::RadioUnmute => {
            radio.set_mute(false).await?;
            publisher.publish(SystemNotify::RadioUnmute).await;
        }
        SystemEvent::RadioVolumeUp => {
            radio.volume_up().await?;
            publish_volume(radio, publisher).await;
        }
        SystemEvent::RadioVolumeDown => {
            radio.volume_down().await?;
            publish_volume(radio, publisher).await;
        }
        SystemEvent::RadioVolumeSet(level) => {
            radio.set_volume(level).await?;
            publish_volume(radio, publisher).await;
        }
        SystemEvent::RadioStatus => {
            publish_band(radio, publisher).await;
            publish_tune_status(radio, publisher).await?;
        }
    }
    Ok(())
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    let mut led = Output::new(p.P0_28, Level::Low, OutputDrive::Standard);

    let mut uart_config = uarte::Config::default();
    uart_config.parity = uarte::Parity::EXCLUDED;
    uart_config.baudrate = uarte::Baudrate::BAUD115200;
    let uart: uarte::Uarte<'static> =
        uarte::Uarte::new(p.SERIAL0, p.P0_22, p.P0_20, Irqs, uart_config);
    let (tx, rx) = uart.split();
    console::init(tx);
    let _ = serial_logger::init();

    static RAM_BUFFER: ConstStaticCell<[u8; 16]> = ConstStaticCell::new([0; 16]);
    let twi = Twim::new(
        p.SERIAL1,
        Irqs,
        p.P1_14,
        p.P1_13,
        twim::Config::default(),
        RAM_BUFFER.take(),
    );
    let reset_pin = Output::new(p.P1_03, Level::High, OutputDrive::Standard);
    let mut radio: Akc695x<_, _, _> = Akc695x::new(twi, reset_pin, Delay).with_config(Config {
        seek_timeout_ms: 5000,
        ..Config::default()
    });

    let Ok(publisher) = events::notify_publisher() else {
        error!("No notification publisher left");
        return;
    };
    match events::notify_subscriber() {
        Ok(subscriber) => {
            let _ = spawner.spawn(cli::notify_task(subscriber));
        }
        Err(e) => error!("No notification subscriber left: {:?}", e),
    }
    let _ = spawner.spawn(cli::console_task(rx));

    let started = async {
        radio.setup().await?;
        radio.set_fm_band(FmBand::Fm1).await?;
        radio.set_volume(40).await?;
        radio.supply_voltage_mv().await
    }
    .await;
    match started {
        Ok(mv) => {
            info!("Radio initialized");
            publisher.publish(SystemNotify::RadioFmOn).await;
            publisher.publish(SystemNotify::SupplyVoltage(mv)).await;
            publish_band(&radio, &publisher).await;
            if let Err(e) = publish_tune_status(&mut radio, &publisher).await {
                warn!("Tune status unavailable: {:?}", e);
            }
        }
        Err(e) => {
            error!("Radio init failed: {:?}", e);
            publisher.publish(SystemNotify::RadioError(e)).await;
        }
    }

    loop {
        match select(events::event_receive(), Timer::after_millis(HEARTBEAT_MS)).await {
            Either::First(event) => {
                info!("Received event: {:?}", event);
                led.set_high();
                if let Err(e) = handle_event(&mut radio, event, &publisher).await {
                    warn!("{:?} failed: {:?}", event, e);
                    publisher.publish(SystemNotify::RadioError(e)).await;
                }
                led.set_low();
            }
            Either::Second(()) => led.toggle(),
        }
    }
}
