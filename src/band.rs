//! Band tables and frequency/channel arithmetic.
//!
//! FM frequencies are expressed in 100 kHz units (988 is 98.8 MHz) and AM
//! frequencies in kHz, matching the chip's native band boundaries.

use crate::Error;
use crate::register::CHANNEL_MAX;

/// Receiver operating mode.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Am,
    Fm,
}

/// Frequency bounds and default tuning values of a band.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BandInfo {
    pub index: u8,
    pub min: u16,
    pub max: u16,
    pub default_frequency: u16,
    pub step: u16,
}

impl BandInfo {
    const fn new(index: u8, min: u16, max: u16, default_frequency: u16, step: u16) -> Self {
        Self {
            index,
            min,
            max,
            default_frequency,
            step,
        }
    }

    pub const fn contains(&self, frequency: u16) -> bool {
        frequency >= self.min && frequency <= self.max
    }
}

/// Band select index of the FM custom band.
pub const FM_CUSTOM_BAND: u8 = 7;
/// Band select index of the AM custom band.
pub const AM_CUSTOM_BAND: u8 = 17;
/// Highest valid FM band select index.
pub const FM_BAND_MAX: u8 = 7;
/// Highest valid AM band select index.
pub const AM_BAND_MAX: u8 = 18;

/// Lowest FM frequency the channel arithmetic can express (30 MHz).
pub const FM_BASE: u16 = 300;
/// Channels per custom band boundary register unit.
pub const CUSTOM_BAND_BLOCK: u16 = 32;

/// Preset FM bands.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FmBand {
    /// 87.0 - 108.0 MHz
    Fm1,
    /// 76.0 - 108.0 MHz
    Fm2,
    /// 70.0 - 93.0 MHz
    Fm3,
    /// 76.0 - 90.0 MHz
    Fm4,
    /// 64.0 - 88.0 MHz
    Fm5,
    /// TV1 audio, 56.25 - 91.75 MHz
    Tv1,
    /// TV2 audio, 174.75 - 222.25 MHz
    Tv2,
}

impl FmBand {
    pub const fn info(self) -> BandInfo {
        match self {
            FmBand::Fm1 => BandInfo::new(0, 870, 1080, 1039, 1),
            FmBand::Fm2 => BandInfo::new(1, 760, 1080, 1039, 1),
            FmBand::Fm3 => BandInfo::new(2, 700, 930, 880, 1),
            FmBand::Fm4 => BandInfo::new(3, 760, 900, 800, 1),
            FmBand::Fm5 => BandInfo::new(4, 640, 880, 700, 1),
            // TV band edges rounded inward to 100 kHz
            FmBand::Tv1 => BandInfo::new(5, 563, 917, 600, 1),
            FmBand::Tv2 => BandInfo::new(6, 1748, 2222, 1800, 1),
        }
    }

    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(FmBand::Fm1),
            1 => Some(FmBand::Fm2),
            2 => Some(FmBand::Fm3),
            3 => Some(FmBand::Fm4),
            4 => Some(FmBand::Fm5),
            5 => Some(FmBand::Tv1),
            6 => Some(FmBand::Tv2),
            _ => None,
        }
    }
}

/// Preset AM bands. The AKC6951 lacks the short-wave presets.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AmBand {
    Lw,
    Mw1,
    Mw2,
    Mw3,
    Sw1,
    Sw2,
    Sw3,
    Sw4,
    Sw5,
    Sw6,
    Sw7,
    Sw8,
    Sw9,
    Sw10,
    Sw11,
    Sw12,
    Sw13,
    Mw4,
}

impl AmBand {
    pub const fn info(self) -> BandInfo {
        match self {
            AmBand::Lw => BandInfo::new(0, 150, 285, 198, 3),
            AmBand::Mw1 => BandInfo::new(1, 520, 1710, 810, 5),
            AmBand::Mw2 => BandInfo::new(2, 522, 1620, 810, 3),
            AmBand::Mw3 => BandInfo::new(3, 520, 1710, 810, 5),
            AmBand::Sw1 => BandInfo::new(4, 4700, 10000, 6000, 5),
            AmBand::Sw2 => BandInfo::new(5, 3200, 4100, 3300, 5),
            AmBand::Sw3 => BandInfo::new(6, 4700, 5600, 4800, 5),
            AmBand::Sw4 => BandInfo::new(7, 5700, 6400, 6000, 5),
            AmBand::Sw5 => BandInfo::new(8, 6800, 7600, 7200, 5),
            AmBand::Sw6 => BandInfo::new(9, 9200, 10000, 9600, 5),
            AmBand::Sw7 => BandInfo::new(10, 11400, 12200, 11700, 5),
            AmBand::Sw8 => BandInfo::new(11, 13500, 14300, 13600, 5),
            AmBand::Sw9 => BandInfo::new(12, 15000, 15900, 15200, 5),
            AmBand::Sw10 => BandInfo::new(13, 17400, 17900, 17500, 5),
            AmBand::Sw11 => BandInfo::new(14, 18900, 19700, 19000, 5),
            AmBand::Sw12 => BandInfo::new(15, 21400, 21900, 21500, 5),
            AmBand::Sw13 => BandInfo::new(16, 11400, 17900, 11700, 5),
            AmBand::Mw4 => BandInfo::new(18, 520, 1730, 810, 5),
        }
    }

    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(AmBand::Lw),
            1 => Some(AmBand::Mw1),
            2 => Some(AmBand::Mw2),
            3 => Some(AmBand::Mw3),
            4 => Some(AmBand::Sw1),
            5 => Some(AmBand::Sw2),
            6 => Some(AmBand::Sw3),
            7 => Some(AmBand::Sw4),
            8 => Some(AmBand::Sw5),
            9 => Some(AmBand::Sw6),
            10 => Some(AmBand::Sw7),
            11 => Some(AmBand::Sw8),
            12 => Some(AmBand::Sw9),
            13 => Some(AmBand::Sw10),
            14 => Some(AmBand::Sw11),
            15 => Some(AmBand::Sw12),
            16 => Some(AmBand::Sw13),
            18 => Some(AmBand::Mw4),
            _ => None,
        }
    }
}

/// What to do with a frequency outside the current band.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutOfBand {
    /// Above the maximum goes to the minimum and below the minimum goes to
    /// the maximum, so stepping past an edge wraps around the band.
    #[default]
    Wrap,
    /// Snap to the nearest band edge.
    Saturate,
}

impl OutOfBand {
    pub const fn apply(self, frequency: u16, min: u16, max: u16) -> u16 {
        match self {
            OutOfBand::Wrap => {
                if frequency > max {
                    min
                } else if frequency < min {
                    max
                } else {
                    frequency
                }
            }
            OutOfBand::Saturate => {
                if frequency > max {
                    max
                } else if frequency < min {
                    min
                } else {
                    frequency
                }
            }
        }
    }
}

/// Steps accepted by `set_step`, the AM channel spacings in kHz.
pub const fn is_selectable_step(step: u16) -> bool {
    step == 3 || step == 5
}

/// Valid band step for the mode: 3 or 5 kHz on AM, 1..=10 (x100 kHz) on FM.
pub const fn is_valid_step(mode: Mode, step: u16) -> bool {
    match mode {
        Mode::Am => step == 3 || step == 5,
        Mode::Fm => step >= 1 && step <= 10,
    }
}

/// FM channel: `(frequency - 300) * 4`, 25 kHz per channel above 30 MHz.
pub fn fm_frequency_to_channel(frequency: u16) -> Result<u16, Error> {
    let channel = frequency
        .checked_sub(FM_BASE)
        .and_then(|f| f.checked_mul(4))
        .ok_or(Error::InvalidParameter)?;
    if channel > CHANNEL_MAX {
        return Err(Error::InvalidParameter);
    }
    Ok(channel)
}

pub const fn fm_channel_to_frequency(channel: u16) -> u16 {
    channel / 4 + FM_BASE
}

/// AM channel: `frequency / step`.
pub fn am_frequency_to_channel(frequency: u16, step: u16) -> Result<u16, Error> {
    if step == 0 {
        return Err(Error::InvalidStep);
    }
    let channel = frequency / step;
    if channel > CHANNEL_MAX {
        return Err(Error::InvalidParameter);
    }
    Ok(channel)
}

pub const fn am_channel_to_frequency(channel: u16, step: u16) -> u16 {
    channel.saturating_mul(step)
}

/// Mode-dependent frequency to channel conversion. `step` only matters on AM.
pub fn frequency_to_channel(mode: Mode, frequency: u16, step: u16) -> Result<u16, Error> {
    match mode {
        Mode::Fm => fm_frequency_to_channel(frequency),
        Mode::Am => am_frequency_to_channel(frequency, step),
    }
}

pub const fn channel_to_frequency(mode: Mode, channel: u16, step: u16) -> u16 {
    match mode {
        Mode::Fm => fm_channel_to_frequency(channel),
        Mode::Am => am_channel_to_frequency(channel, step),
    }
}

/// Value of a custom band boundary register for `frequency`.
pub fn custom_band_register(mode: Mode, frequency: u16, step: u16) -> Result<u8, Error> {
    let channel = frequency_to_channel(mode, frequency, step)?;
    Ok((channel / CUSTOM_BAND_BLOCK) as u8)
}
