#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

//! Async driver for the AKC695X family (AKC6951, AKC6955, AKC6959) of
//! AM/FM/SW receivers.
//!
//! The chip is controlled through byte registers over I2C. The driver keeps
//! a small session (mode, band bounds, step, frequency, volume) next to the
//! bus handle and converts between human frequencies and chip channels.
//!
//! ```ignore
//! let mut radio: Akc695x<_, _, _> = Akc695x::new(i2c, reset_pin, Delay);
//! radio.setup().await?;
//! radio.set_fm_band(FmBand::Fm1).await?;
//! radio.set_volume(40).await?;
//! let station = radio.seek_station(SeekDirection::Up).await?;
//! ```

pub mod audio;
pub mod band;
mod device;
pub mod register;
pub mod status;

pub use audio::{
    DeEmphasis, FmBandwidth, FmSeekSpacing, SeekThresholds, StereoMode, VolumeControl,
};
pub use band::{AmBand, BandInfo, FmBand, Mode, OutOfBand};
pub use device::{Akc695x, Akc695xRadio, NoResetPin, SeekDirection, Session};
pub use register::Register;
pub use status::TuneStatus;

/// Default 7-bit I2C address.
pub const DEFAULT_I2C_ADDRESS: u8 = 0x10;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// I2C communication error
    I2c(embedded_hal_async::i2c::ErrorKind),
    /// Reset pin could not be driven
    Pin,
    /// Frequency or channel out of range
    InvalidParameter,
    /// Band index not in the chip's band table
    InvalidBand,
    /// Step not accepted in the current mode
    InvalidStep,
    /// Attempt to write a status register
    ReadOnlyRegister,
    /// Address with no documented behaviour
    UndocumentedRegister(u8),
    /// Seek or tune did not complete in time
    Timeout,
}

/// Reference clock attached to the chip.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Crystal {
    #[default]
    Khz32768,
    Mhz12,
}

/// Driver timing and policy settings.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Delay after every register transaction
    pub settle_time_us: u32,
    pub seek_timeout_ms: u32,
    pub tune_timeout_ms: u32,
    /// Pause between STC polls
    pub seek_poll_interval_ms: u32,
    pub crystal: Crystal,
    pub volume_control: VolumeControl,
    pub out_of_band: OutOfBand,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settle_time_us: 3000,
            seek_timeout_ms: 3000,
            tune_timeout_ms: 1000,
            seek_poll_interval_ms: 10,
            crystal: Crystal::Khz32768,
            volume_control: VolumeControl::Register,
            out_of_band: OutOfBand::Wrap,
        }
    }
}
