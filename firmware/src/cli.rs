use core::fmt::Write;

use akc695x::Mode;
use embassy_nrf::uarte;
use embedded_cli::cli::CliBuilder;
use embedded_cli::{Command, codes};
use heapless::String;
use log::{error, warn};
use static_cell::ConstStaticCell;

use crate::console;
use crate::events::{self, NotifySubscriber, SystemEvent, SystemNotify};

pub const DEL: u8 = 127;

#[derive(Debug, Command)]
enum BaseCommand {
    Mode {
        #[command(subcommand)]
        command: RadioMode,
    },
    /// Select a band preset of the current mode
    Band {
        /// FM 0-6, AM 0-18
        index: u8,
    },
    Volume {
        #[command(subcommand)]
        command: VolumeCommand,
    },
    Tune {
        #[command(subcommand)]
        command: TuneCommand,
    },
    /// Set the tuning step, 3 or 5 (kHz in AM, x100 kHz in FM)
    Step {
        step: u16,
    },
    Mute,
    Unmute,
    /// Show tuning status
    Status,
}

#[derive(Debug, Command)]
enum RadioMode {
    /// FM mode
    Fm,
    /// AM mode
    Am,
    /// Power down the receiver
    Off,
}

#[derive(Debug, Command)]
enum TuneCommand {
    /// Seek to the next station up
    Up,
    /// Seek to the next station down
    Down,
    /// One step up
    Next,
    /// One step down
    Prev,
    /// Tune to a frequency
    Frequency {
        /// 100 kHz units in FM (1015 = 101.5 MHz), kHz in AM
        frequency: u16,
    },
}

#[derive(Debug, Command)]
enum VolumeCommand {
    /// Increase volume
    Up,
    /// Decrease volume
    Down,
    /// Set volume level
    Set {
        /// 25-63, lower values mute
        level: u8,
    },
}

fn send(writer: &mut impl Write, event: SystemEvent, ack: &str) {
    if events::event_try_send(event) {
        let _ = writer.write_str(ack);
    } else {
        let _ = writer.write_str("Radio busy, try again");
    }
}

#[embassy_executor::task]
pub async fn console_task(mut rx: uarte::UarteRx<'static>) {
    static COMMAND_BUFFER: ConstStaticCell<[u8; 40]> = ConstStaticCell::new([0; 40]);
    static HISTORY_BUFFER: ConstStaticCell<[u8; 64]> = ConstStaticCell::new([0; 64]);

    let Ok(mut cli) = CliBuilder::default()
        .writer(console::stdout())
        .command_buffer(COMMAND_BUFFER.take().as_mut_slice())
        .history_buffer(HISTORY_BUFFER.take().as_mut_slice())
        .build()
    else {
        error!("Console init failed");
        return;
    };

    loop {
        let mut byte = [0u8; 1];
        if let Err(e) = rx.read(&mut byte).await {
            warn!("UART read failed: {:?}", e);
            continue;
        }
        // the CLI only knows BACKSPACE
        if byte[0] == DEL {
            byte[0] = codes::BACKSPACE;
        }

        let _ = cli.process_byte::<BaseCommand, _>(
            byte[0],
            &mut BaseCommand::processor(|cli, command| {
                let out = cli.writer();
                match command {
                    BaseCommand::Status => send(out, SystemEvent::RadioStatus, "Reading status"),
                    BaseCommand::Mode { command } => match command {
                        RadioMode::Fm => send(out, SystemEvent::RadioFmOn, "Switching to FM"),
                        RadioMode::Am => send(out, SystemEvent::RadioAmOn, "Switching to AM"),
                        RadioMode::Off => send(out, SystemEvent::RadioOff, "Powering off"),
                    },
                    BaseCommand::Band { index } => {
                        send(out, SystemEvent::RadioBand(index), "Selecting band")
                    }
                    BaseCommand::Volume { command } => match command {
                        VolumeCommand::Up => send(out, SystemEvent::RadioVolumeUp, "Volume up"),
                        VolumeCommand::Down => {
                            send(out, SystemEvent::RadioVolumeDown, "Volume down")
                        }
                        VolumeCommand::Set { level } => {
                            send(out, SystemEvent::RadioVolumeSet(level), "Setting volume")
                        }
                    },
                    BaseCommand::Tune { command } => match command {
                        TuneCommand::Up => send(out, SystemEvent::RadioSeekUp, "Seeking up"),
                        TuneCommand::Down => send(out, SystemEvent::RadioSeekDown, "Seeking down"),
                        TuneCommand::Next => send(out, SystemEvent::RadioStepUp, "Step up"),
                        TuneCommand::Prev => send(out, SystemEvent::RadioStepDown, "Step down"),
                        TuneCommand::Frequency { frequency } => send(
                            out,
                            SystemEvent::RadioSetFrequency(frequency),
                            "Tuning",
                        ),
                    },
                    BaseCommand::Step { step } => {
                        send(out, SystemEvent::RadioSetStep(step), "Setting step")
                    }
                    BaseCommand::Mute => send(out, SystemEvent::RadioMute, "Muting"),
                    BaseCommand::Unmute => send(out, SystemEvent::RadioUnmute, "Unmuting"),
                }
                Ok(())
            }),
        );
    }
}

/// "101.5 MHz" in FM, "810 kHz" in AM.
fn format_frequency(mode: Mode, frequency: u16) -> String<16> {
    let mut text = String::new();
    let _ = match mode {
        Mode::Fm => write!(text, "{}.{} MHz", frequency / 10, frequency % 10),
        Mode::Am => write!(text, "{} kHz", frequency),
    };
    text
}

/// Prints radio notifications to the console.
#[embassy_executor::task]
pub async fn notify_task(mut notifications: NotifySubscriber<'static>) {
    let mut out = console::stdout();
    loop {
        let _ = match notifications.next_message_pure().await {
            SystemNotify::TuneStatus(status) => writeln!(
                out,
                "{} ({}) RSSI {} dBuV CNR {} dB{}{}",
                format_frequency(status.mode, status.frequency),
                status.channel,
                status.rssi,
                status.cnr,
                if status.tuned { " tuned" } else { "" },
                if status.stereo { " stereo" } else { "" },
            ),
            SystemNotify::BandChanged {
                mode,
                band,
                min,
                max,
            } => writeln!(
                out,
                "Band {}: {} - {}",
                band,
                format_frequency(mode, min),
                format_frequency(mode, max)
            ),
            SystemNotify::StepChanged(step) => writeln!(out, "Step {}", step),
            SystemNotify::SupplyVoltage(mv) => writeln!(out, "Supply {} mV", mv),
            SystemNotify::RadioFmOn => writeln!(out, "FM on"),
            SystemNotify::RadioAmOn => writeln!(out, "AM on"),
            SystemNotify::RadioOff => writeln!(out, "Radio off"),
            SystemNotify::RadioMute => writeln!(out, "Muted"),
            SystemNotify::RadioUnmute => writeln!(out, "Unmuted"),
            SystemNotify::VolumeChanged(volume) => writeln!(out, "Volume {}", volume),
            SystemNotify::RadioError(e) => writeln!(out, "Radio error: {:?}", e),
        };
    }
}
