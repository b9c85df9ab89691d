use core::convert::Infallible;

use embedded_hal::digital::{ErrorType as PinErrorType, OutputPin};
use embedded_hal::i2c::Error as I2cErrorTrait;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use log::{debug, trace, warn};

use crate::audio::{
    self, DeEmphasis, FmBandwidth, FmSeekSpacing, SeekThresholds, StereoMode, VolumeControl,
};
use crate::band::{
    self, AM_BAND_MAX, AM_CUSTOM_BAND, AmBand, FM_BAND_MAX, FM_CUSTOM_BAND, FmBand, Mode,
};
use crate::register::{
    AmCnrReg, AudioReg, BandReg, BatteryReg, ChannelHighReg, ControlReg, FmCnrReg, GainLevelReg,
    PowerReg, Register, RssiReg, SpacingReg, StatusReg, ThresholdReg, ToneReg, join_channel,
    split_channel,
};
use crate::status::{self, TuneStatus};
use crate::{Config, Crystal, Error};

const RESET_PULSE_MS: u32 = 10;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SeekDirection {
    Down,
    Up,
}

/// Driver-side mirror of the receiver configuration.
///
/// Kept in step with every call the driver makes. After a seek the device
/// picks its own channel; `frequency` is refreshed from the read channel
/// registers when the seek loop ends or on [`Akc695x::update_frequency`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Session {
    pub mode: Mode,
    pub band: u8,
    pub min: u16,
    pub max: u16,
    pub step: u16,
    pub frequency: u16,
    pub volume: u8,
}

impl Default for Session {
    fn default() -> Self {
        let info = FmBand::Fm1.info();
        Self {
            mode: Mode::Fm,
            band: info.index,
            min: info.min,
            max: info.max,
            step: info.step,
            frequency: info.default_frequency,
            volume: 40,
        }
    }
}

/// Stand-in for boards where the chip shares the host's reset line.
#[derive(Debug, Copy, Clone, Default)]
pub struct NoResetPin;

impl PinErrorType for NoResetPin {
    type Error = Infallible;
}

impl OutputPin for NoResetPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// AKC695X device driver
#[derive(Debug)]
pub struct Akc695x<T: I2c, R: OutputPin, D: DelayNs, const A: u8 = 0x10> {
    i2c: T,
    reset_pin: Option<R>,
    delay: D,
    config: Config,
    session: Session,
}

/// High-level receiver operations.
///
/// Implemented by [`Akc695x`] so applications can be written against the
/// trait instead of the concrete bus, pin and delay types.
pub trait Akc695xRadio {
    /// Reset the chip and program the board configuration.
    async fn setup(&mut self) -> Result<(), Error>;
    async fn power_on(&mut self) -> Result<(), Error>;
    async fn power_off(&mut self) -> Result<(), Error>;
    /// Switch to FM and select a preset band.
    async fn set_fm_band(&mut self, band: FmBand) -> Result<(), Error>;
    /// Switch to AM and select a preset band.
    async fn set_am_band(&mut self, band: AmBand) -> Result<(), Error>;
    /// Tune to `frequency` in the current mode's units.
    async fn set_frequency(&mut self, frequency: u16) -> Result<(), Error>;
    async fn frequency_up(&mut self) -> Result<(), Error>;
    async fn frequency_down(&mut self) -> Result<(), Error>;
    /// Seek the next station; returns the frequency the chip stopped on.
    async fn seek_station(&mut self, direction: SeekDirection) -> Result<u16, Error>;
    async fn set_step(&mut self, step: u16) -> Result<(), Error>;
    async fn set_volume(&mut self, volume: u8) -> Result<(), Error>;
    async fn volume_up(&mut self) -> Result<(), Error>;
    async fn volume_down(&mut self) -> Result<(), Error>;
    async fn set_mute(&mut self, mute: bool) -> Result<(), Error>;
    /// Read the status registers.
    async fn tune_status(&mut self) -> Result<TuneStatus, Error>;
    /// Current driver session.
    fn session(&self) -> &Session;
}

impl<T: I2c, R: OutputPin, D: DelayNs, const A: u8> Akc695xRadio for Akc695x<T, R, D, A> {
    async fn setup(&mut self) -> Result<(), Error> {
        self.setup().await
    }
    async fn power_on(&mut self) -> Result<(), Error> {
        self.power_on().await
    }
    async fn power_off(&mut self) -> Result<(), Error> {
        self.power_off().await
    }
    async fn set_fm_band(&mut self, band: FmBand) -> Result<(), Error> {
        self.set_fm_band(band).await
    }
    async fn set_am_band(&mut self, band: AmBand) -> Result<(), Error> {
        self.set_am_band(band).await
    }
    async fn set_frequency(&mut self, frequency: u16) -> Result<(), Error> {
        self.set_frequency(frequency).await
    }
    async fn frequency_up(&mut self) -> Result<(), Error> {
        self.frequency_up().await
    }
    async fn frequency_down(&mut self) -> Result<(), Error> {
        self.frequency_down().await
    }
    async fn seek_station(&mut self, direction: SeekDirection) -> Result<u16, Error> {
        self.seek_station(direction).await
    }
    async fn set_step(&mut self, step: u16) -> Result<(), Error> {
        self.set_step(step).await
    }
    async fn set_volume(&mut self, volume: u8) -> Result<(), Error> {
        self.set_volume(volume).await
    }
    async fn volume_up(&mut self) -> Result<(), Error> {
        self.volume_up().await
    }
    async fn volume_down(&mut self) -> Result<(), Error> {
        self.volume_down().await
    }
    async fn set_mute(&mut self, mute: bool) -> Result<(), Error> {
        self.set_mute(mute).await
    }
    async fn tune_status(&mut self) -> Result<TuneStatus, Error> {
        self.tune_status().await
    }
    fn session(&self) -> &Session {
        &self.session
    }
}

fn i2c_error<E: I2cErrorTrait>(e: E) -> Error {
    Error::I2c(e.kind())
}

impl<T: I2c, D: DelayNs, const A: u8> Akc695x<T, NoResetPin, D, A> {
    /// Create a driver for a chip whose reset is handled elsewhere.
    pub fn new_without_reset(i2c: T, delay: D) -> Self {
        Self {
            i2c,
            reset_pin: None,
            delay,
            config: Config::default(),
            session: Session::default(),
        }
    }
}

impl<T: I2c, R: OutputPin, D: DelayNs, const A: u8> Akc695x<T, R, D, A> {
    const I2C_ADDRESS: u8 = A;

    /// Create a new driver from the given I2C bus, reset pin and delay source
    pub fn new(i2c: T, reset_pin: R, delay: D) -> Self {
        Self {
            i2c,
            reset_pin: Some(reset_pin),
            delay,
            config: Config::default(),
            session: Session::default(),
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn mode(&self) -> Mode {
        self.session.mode
    }

    /// Last frequency tuned or read back, FM in 100 kHz units, AM in kHz.
    pub fn frequency(&self) -> u16 {
        self.session.frequency
    }

    pub fn volume(&self) -> u8 {
        self.session.volume
    }

    pub fn step(&self) -> u16 {
        self.session.step
    }

    /// Give the bus, pin and delay back.
    pub fn release(self) -> (T, Option<R>, D) {
        (self.i2c, self.reset_pin, self.delay)
    }

    async fn settle(&mut self) {
        self.delay.delay_us(self.config.settle_time_us).await;
    }

    /// Write one register and wait for the chip to settle.
    pub async fn register_set(&mut self, reg: Register, value: u8) -> Result<(), Error> {
        if !reg.is_writable() {
            return Err(Error::ReadOnlyRegister);
        }
        trace!("akc695x: {:?} <- {:#04x}", reg, value);
        self.i2c
            .write(Self::I2C_ADDRESS, &[reg.addr(), value])
            .await
            .map_err(i2c_error)?;
        self.settle().await;
        Ok(())
    }

    /// Address a register, wait for the chip to settle and read it back.
    pub async fn register_get(&mut self, reg: Register) -> Result<u8, Error> {
        self.i2c
            .write(Self::I2C_ADDRESS, &[reg.addr()])
            .await
            .map_err(i2c_error)?;
        self.settle().await;
        let mut value = [0u8; 1];
        self.i2c
            .read(Self::I2C_ADDRESS, &mut value)
            .await
            .map_err(i2c_error)?;
        trace!("akc695x: {:?} -> {:#04x}", reg, value[0]);
        Ok(value[0])
    }

    /// Replace the bits selected by `mask` with `bits`, keeping the rest of
    /// the byte as read from the chip.
    pub async fn register_update(&mut self, reg: Register, mask: u8, bits: u8) -> Result<(), Error> {
        self.modify(reg, |raw| (raw & !mask) | (bits & mask))
            .await
            .map(|_| ())
    }

    async fn modify<F: FnOnce(u8) -> u8>(&mut self, reg: Register, f: F) -> Result<u8, Error> {
        let raw = self.register_get(reg).await?;
        let value = f(raw);
        self.register_set(reg, value).await?;
        Ok(value)
    }

    /// Pulse the reset pin. Does nothing without one.
    pub async fn reset(&mut self) -> Result<(), Error> {
        if let Some(pin) = self.reset_pin.as_mut() {
            pin.set_low().map_err(|_| Error::Pin)?;
            self.delay.delay_ms(RESET_PULSE_MS).await;
            pin.set_high().map_err(|_| Error::Pin)?;
            self.delay.delay_ms(RESET_PULSE_MS).await;
        }
        Ok(())
    }

    /// Reset the chip, then program the crystal and the volume source.
    pub async fn setup(&mut self) -> Result<(), Error> {
        self.reset().await?;
        let crystal = self.config.crystal;
        self.modify(Register::ChannelHigh, |raw| {
            ChannelHighReg(raw)
                .with_ref_32k(crystal == Crystal::Khz32768)
                .0
        })
        .await?;
        self.set_volume_control(self.config.volume_control).await?;
        debug!("akc695x: setup done, crystal {:?}", crystal);
        Ok(())
    }

    pub async fn power_on(&mut self) -> Result<(), Error> {
        self.modify(Register::Power, |raw| PowerReg(raw).with_power_on(true).0)
            .await
            .map(|_| ())
    }

    /// Standby; register contents are kept.
    pub async fn power_off(&mut self) -> Result<(), Error> {
        self.modify(Register::Power, |raw| PowerReg(raw).with_power_on(false).0)
            .await
            .map(|_| ())
    }

    /// Switch to FM with explicit band bounds.
    ///
    /// `band` is the band select index (0..=7, 7 is the custom band whose
    /// boundaries come from `min` and `max`). Frequencies are in 100 kHz
    /// units and `step` is 1..=10.
    pub async fn set_fm(
        &mut self,
        band: u8,
        min: u16,
        max: u16,
        frequency: u16,
        step: u16,
    ) -> Result<(), Error> {
        if band > FM_BAND_MAX {
            return Err(Error::InvalidBand);
        }
        if !band::is_valid_step(Mode::Fm, step) {
            return Err(Error::InvalidStep);
        }
        if min > max {
            return Err(Error::InvalidParameter);
        }
        band::fm_frequency_to_channel(min)?;
        band::fm_frequency_to_channel(max)?;
        self.select_band(Mode::Fm, band, min, max, frequency, step)
            .await
    }

    /// Switch to AM with explicit band bounds in kHz.
    ///
    /// `band` is the band select index (0..=18, 17 is the custom band).
    /// `step` is 3 or 5 kHz.
    pub async fn set_am(
        &mut self,
        band: u8,
        min: u16,
        max: u16,
        frequency: u16,
        step: u16,
    ) -> Result<(), Error> {
        if band > AM_BAND_MAX {
            return Err(Error::InvalidBand);
        }
        if !band::is_valid_step(Mode::Am, step) {
            return Err(Error::InvalidStep);
        }
        if min > max {
            return Err(Error::InvalidParameter);
        }
        band::am_frequency_to_channel(max, step)?;
        self.select_band(Mode::Am, band, min, max, frequency, step)
            .await
    }

    pub async fn set_fm_band(&mut self, band: FmBand) -> Result<(), Error> {
        let info = band.info();
        self.set_fm(info.index, info.min, info.max, info.default_frequency, info.step)
            .await
    }

    pub async fn set_am_band(&mut self, band: AmBand) -> Result<(), Error> {
        let info = band.info();
        self.set_am(info.index, info.min, info.max, info.default_frequency, info.step)
            .await
    }

    /// Use a custom band in the current mode and tune to its lower edge.
    pub async fn set_custom_band(&mut self, min: u16, max: u16) -> Result<(), Error> {
        let step = self.session.step;
        match self.session.mode {
            Mode::Fm => self.set_fm(FM_CUSTOM_BAND, min, max, min, step).await,
            Mode::Am => self.set_am(AM_CUSTOM_BAND, min, max, min, step).await,
        }
    }

    async fn select_band(
        &mut self,
        mode: Mode,
        band: u8,
        min: u16,
        max: u16,
        frequency: u16,
        step: u16,
    ) -> Result<(), Error> {
        let previous = self.session;
        let result = self
            .program_band(mode, band, min, max, frequency, step)
            .await;
        if result.is_err() {
            self.session = previous;
        }
        result
    }

    async fn program_band(
        &mut self,
        mode: Mode,
        band: u8,
        min: u16,
        max: u16,
        frequency: u16,
        step: u16,
    ) -> Result<(), Error> {
        self.session.mode = mode;
        self.session.band = band;
        self.session.min = min;
        self.session.max = max;
        self.session.step = step;

        self.modify(Register::Power, |raw| {
            PowerReg(raw)
                .with_power_on(true)
                .with_fm_en(mode == Mode::Fm)
                .with_tune(false)
                .with_seek(false)
                .0
        })
        .await?;
        self.modify(Register::Band, |raw| match mode {
            Mode::Fm => BandReg(raw).with_fm_band(band).0,
            Mode::Am => BandReg(raw).with_am_band(band).0,
        })
        .await?;

        let custom = match mode {
            Mode::Fm => band == FM_CUSTOM_BAND,
            Mode::Am => band == AM_CUSTOM_BAND,
        };
        if custom {
            let start = band::custom_band_register(mode, min, step)?;
            let stop = band::custom_band_register(mode, max, step)?;
            self.register_set(Register::CustomBandStart, start).await?;
            self.register_set(Register::CustomBandStop, stop).await?;
        }
        debug!(
            "akc695x: {:?} band {} [{}, {}] step {}",
            mode, band, min, max, step
        );
        self.set_frequency(frequency).await
    }

    /// Change the tuning step to 3 or 5.
    ///
    /// A rejected step leaves the previous one in place. In AM the channel
    /// unit follows the step, so the current frequency is retuned in the new
    /// units. In FM the step only affects `frequency_up`/`frequency_down`.
    pub async fn set_step(&mut self, step: u16) -> Result<(), Error> {
        if !band::is_selectable_step(step) {
            return Err(Error::InvalidStep);
        }
        let previous = self.session.step;
        self.session.step = step;
        if self.session.mode == Mode::Am {
            if let Err(e) = self.set_frequency(self.session.frequency).await {
                self.session.step = previous;
                return Err(e);
            }
        }
        Ok(())
    }

    /// Channel high bits, and in AM the 3 kHz mode bit, in one update.
    async fn write_channel(&mut self, channel: u16) -> Result<(), Error> {
        let (high, low) = split_channel(channel);
        let am_mode3k = match self.session.mode {
            Mode::Am => Some(self.session.step == 3),
            Mode::Fm => None,
        };
        self.modify(Register::ChannelHigh, |raw| {
            let reg = ChannelHighReg(raw).with_channel_high(high);
            match am_mode3k {
                Some(on) => reg.with_mode3k(on).0,
                None => reg.0,
            }
        })
        .await?;
        self.register_set(Register::ChannelLow, low).await
    }

    /// Pulse the tune trigger bit of register 0.
    async fn commit_tune(&mut self) -> Result<(), Error> {
        let reg0 = PowerReg(self.register_get(Register::Power).await?)
            .with_power_on(true)
            .with_fm_en(self.session.mode == Mode::Fm)
            .with_seek(false);
        self.register_set(Register::Power, reg0.with_tune(true).0)
            .await?;
        self.register_set(Register::Power, reg0.with_tune(false).0)
            .await
    }

    /// Tune to `frequency` without waiting for the chip to settle on it.
    ///
    /// Frequencies outside the band are moved to a band edge according to
    /// [`Config::out_of_band`].
    pub async fn set_frequency(&mut self, frequency: u16) -> Result<(), Error> {
        let session = self.session;
        let frequency = self
            .config
            .out_of_band
            .apply(frequency, session.min, session.max);
        let channel = band::frequency_to_channel(session.mode, frequency, session.step)?;
        self.write_channel(channel).await?;
        self.commit_tune().await?;
        self.session.frequency = frequency;
        trace!("akc695x: tuned {} (channel {})", frequency, channel);
        Ok(())
    }

    pub async fn frequency_up(&mut self) -> Result<(), Error> {
        let next = self.session.frequency.saturating_add(self.session.step);
        self.set_frequency(next).await
    }

    pub async fn frequency_down(&mut self) -> Result<(), Error> {
        let next = self.session.frequency.saturating_sub(self.session.step);
        self.set_frequency(next).await
    }

    /// Tune and wait for the seek/tune complete flag.
    pub async fn tune_frequency(&mut self, frequency: u16) -> Result<TuneStatus, Error> {
        self.set_frequency(frequency).await?;
        let timeout_ms = self.config.tune_timeout_ms;
        if let Err(e) = self.wait_seek_tune_complete(timeout_ms).await {
            warn!("akc695x: tune to {} did not complete", frequency);
            return Err(e);
        }
        self.tune_status().await
    }

    /// Poll STC until it is set or `timeout_ms` of bus and poll delays pass.
    pub async fn wait_seek_tune_complete(&mut self, timeout_ms: u32) -> Result<(), Error> {
        let budget_us = timeout_ms.saturating_mul(1000);
        let mut elapsed_us: u32 = 0;
        loop {
            if self.is_seek_tune_complete().await? {
                return Ok(());
            }
            elapsed_us = elapsed_us.saturating_add(self.poll_cost_us(1));
            if elapsed_us >= budget_us {
                return Err(Error::Timeout);
            }
            self.delay
                .delay_ms(self.config.seek_poll_interval_ms)
                .await;
        }
    }

    fn poll_cost_us(&self, transactions: u32) -> u32 {
        self.config
            .settle_time_us
            .saturating_mul(transactions)
            .saturating_add(self.config.seek_poll_interval_ms.saturating_mul(1000))
    }

    /// Seek the next station in `direction`.
    ///
    /// Returns the frequency the chip stopped on, or [`Error::Timeout`] when
    /// the seek did not complete within [`Config::seek_timeout_ms`]. In both
    /// cases the seek bit is cleared and the session frequency refreshed.
    pub async fn seek_station(&mut self, direction: SeekDirection) -> Result<u16, Error> {
        self.seek(direction, None).await
    }

    /// Like [`Self::seek_station`], calling `on_progress` with the frequency
    /// the chip reports on every poll.
    pub async fn seek_station_with<F: FnMut(u16)>(
        &mut self,
        direction: SeekDirection,
        mut on_progress: F,
    ) -> Result<u16, Error> {
        self.seek(direction, Some(&mut on_progress)).await
    }

    async fn seek(
        &mut self,
        direction: SeekDirection,
        mut on_progress: Option<&mut dyn FnMut(u16)>,
    ) -> Result<u16, Error> {
        let reg0 = PowerReg(self.register_get(Register::Power).await?)
            .with_power_on(true)
            .with_fm_en(self.session.mode == Mode::Fm)
            .with_tune(false)
            .with_seek_up(direction == SeekDirection::Up)
            .with_seek(true);
        let budget_us = self.config.seek_timeout_ms.saturating_mul(1000);
        // trigger write and status read, plus the channel readback for progress
        let poll_us = self.poll_cost_us(if on_progress.is_some() { 4 } else { 2 });
        let mut elapsed_us: u32 = 0;

        let complete = loop {
            self.register_set(Register::Power, reg0.0).await?;
            let status = StatusReg(self.register_get(Register::Status).await?);
            if let Some(callback) = on_progress.as_mut() {
                let frequency = self.update_frequency().await?;
                callback(frequency);
            }
            if status.stc() {
                break true;
            }
            elapsed_us = elapsed_us.saturating_add(poll_us);
            if elapsed_us >= budget_us {
                break false;
            }
            self.delay
                .delay_ms(self.config.seek_poll_interval_ms)
                .await;
        };

        self.register_set(Register::Power, reg0.with_seek(false).0)
            .await?;
        let frequency = self.update_frequency().await?;
        if complete {
            debug!("akc695x: seek {:?} stopped at {}", direction, frequency);
            Ok(frequency)
        } else {
            warn!("akc695x: seek {:?} timed out at {}", direction, frequency);
            Err(Error::Timeout)
        }
    }

    /// Channel the chip is currently tuned to.
    pub async fn current_channel(&mut self) -> Result<u16, Error> {
        let high = StatusReg(self.register_get(Register::Status).await?).channel_high();
        let low = self.register_get(Register::ReadChannel).await?;
        Ok(join_channel(high, low))
    }

    /// Read the tuned channel back and refresh the session frequency.
    pub async fn update_frequency(&mut self) -> Result<u16, Error> {
        let channel = self.current_channel().await?;
        let frequency =
            band::channel_to_frequency(self.session.mode, channel, self.session.step);
        self.session.frequency = frequency;
        Ok(frequency)
    }

    pub async fn is_seek_tune_complete(&mut self) -> Result<bool, Error> {
        Ok(StatusReg(self.register_get(Register::Status).await?).stc())
    }

    pub async fn is_tuned(&mut self) -> Result<bool, Error> {
        Ok(StatusReg(self.register_get(Register::Status).await?).tuned())
    }

    pub async fn is_stereo(&mut self) -> Result<bool, Error> {
        Ok(StatusReg(self.register_get(Register::Status).await?).stereo())
    }

    /// Received signal strength in dBuV.
    pub async fn rssi(&mut self) -> Result<i16, Error> {
        let rssi = RssiReg(self.register_get(Register::Rssi).await?);
        let gain = GainLevelReg(self.register_get(Register::GainLevel).await?);
        Ok(status::decode_rssi(self.session.mode, rssi, gain))
    }

    pub async fn supply_voltage_mv(&mut self) -> Result<u16, Error> {
        let battery = BatteryReg(self.register_get(Register::Battery).await?);
        Ok(status::decode_supply_voltage_mv(battery))
    }

    pub async fn cnr_am(&mut self) -> Result<u8, Error> {
        Ok(AmCnrReg(self.register_get(Register::AmCnr).await?).cnr())
    }

    pub async fn cnr_fm(&mut self) -> Result<u8, Error> {
        Ok(FmCnrReg(self.register_get(Register::FmCnr).await?).cnr())
    }

    /// Carrier-to-noise ratio of the current mode in dB.
    pub async fn cnr(&mut self) -> Result<u8, Error> {
        match self.session.mode {
            Mode::Am => self.cnr_am().await,
            Mode::Fm => self.cnr_fm().await,
        }
    }

    pub async fn tune_status(&mut self) -> Result<TuneStatus, Error> {
        let status = StatusReg(self.register_get(Register::Status).await?);
        let low = self.register_get(Register::ReadChannel).await?;
        let channel = join_channel(status.channel_high(), low);
        let mode = self.session.mode;
        let frequency = band::channel_to_frequency(mode, channel, self.session.step);
        let rssi = self.rssi().await?;
        let cnr = self.cnr().await?;
        Ok(TuneStatus {
            mode,
            frequency,
            channel,
            stc: status.stc(),
            tuned: status.tuned(),
            stereo: status.stereo(),
            rssi,
            cnr,
        })
    }

    /// Set output phase, line input and volume in one register update.
    pub async fn set_audio(&mut self, phase_inv: bool, line: bool, volume: u8) -> Result<(), Error> {
        let volume = audio::clamp_volume(volume);
        self.modify(Register::Audio, |raw| {
            AudioReg(raw)
                .with_phase_inv(phase_inv)
                .with_line(line)
                .with_volume(volume)
                .0
        })
        .await?;
        self.session.volume = volume;
        Ok(())
    }

    /// Set the volume, saturating at 63. Levels up to 24 mute the output.
    pub async fn set_volume(&mut self, volume: u8) -> Result<(), Error> {
        let volume = audio::clamp_volume(volume);
        self.modify(Register::Audio, |raw| AudioReg(raw).with_volume(volume).0)
            .await?;
        self.session.volume = volume;
        Ok(())
    }

    pub async fn volume_up(&mut self) -> Result<(), Error> {
        self.set_volume(audio::volume_step_up(self.session.volume))
            .await
    }

    pub async fn volume_down(&mut self) -> Result<(), Error> {
        self.set_volume(audio::volume_step_down(self.session.volume))
            .await
    }

    pub async fn set_volume_control(&mut self, control: VolumeControl) -> Result<(), Error> {
        self.modify(Register::Control, |raw| {
            ControlReg(raw)
                .with_pd_adc_vol(control == VolumeControl::Register)
                .0
        })
        .await
        .map(|_| ())
    }

    pub async fn set_mute(&mut self, mute: bool) -> Result<(), Error> {
        self.modify(Register::Power, |raw| PowerReg(raw).with_mute(mute).0)
            .await
            .map(|_| ())
    }

    pub async fn set_de_emphasis(&mut self, de: DeEmphasis) -> Result<(), Error> {
        self.modify(Register::Tone, |raw| {
            ToneReg(raw).with_de(de == DeEmphasis::Us50).0
        })
        .await
        .map(|_| ())
    }

    pub async fn set_bass_boost(&mut self, on: bool) -> Result<(), Error> {
        self.modify(Register::Tone, |raw| ToneReg(raw).with_bass_boost(on).0)
            .await
            .map(|_| ())
    }

    pub async fn set_stereo_mode(&mut self, stereo: StereoMode) -> Result<(), Error> {
        self.modify(Register::Tone, |raw| {
            ToneReg(raw).with_stereo(stereo as u8).0
        })
        .await
        .map(|_| ())
    }

    pub async fn set_fm_bandwidth(&mut self, bandwidth: FmBandwidth) -> Result<(), Error> {
        self.modify(Register::Tone, |raw| {
            ToneReg(raw).with_bandwidth(bandwidth as u8).0
        })
        .await
        .map(|_| ())
    }

    /// Drive the stereo/tuned indicator lamp.
    pub async fn set_tune_lamp(&mut self, on: bool) -> Result<(), Error> {
        self.modify(Register::Control, |raw| ControlReg(raw).with_st_led(on).0)
            .await
            .map(|_| ())
    }

    /// Let the chip lower the volume as the supply voltage drops.
    pub async fn set_low_voltage_volume(&mut self, on: bool) -> Result<(), Error> {
        self.modify(Register::Control, |raw| ControlReg(raw).with_lv_en(on).0)
            .await
            .map(|_| ())
    }

    pub async fn set_fm_seek_spacing(&mut self, spacing: FmSeekSpacing) -> Result<(), Error> {
        self.modify(Register::Spacing, |raw| {
            SpacingReg(raw).with_fm_space(spacing as u8).0
        })
        .await
        .map(|_| ())
    }

    pub async fn set_seek_thresholds(&mut self, thresholds: SeekThresholds) -> Result<(), Error> {
        self.modify(Register::Threshold, |raw| {
            ThresholdReg(raw)
                .with_stereo_th(thresholds.stereo)
                .with_fm_cnr_th(thresholds.fm_cnr)
                .with_am_cnr_th(thresholds.am_cnr)
                .with_fd_th(thresholds.frequency_deviation)
                .0
        })
        .await
        .map(|_| ())
    }
}
