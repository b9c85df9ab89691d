//! Band selection, tuning, seek, status and audio behaviour against a
//! register-file model of the chip.
//!
//! Run with: cargo test --test driver

mod common;

use akc695x::{
    Akc695xRadio, AmBand, Config, DeEmphasis, Error, FmBand, FmBandwidth, FmSeekSpacing, Mode,
    OutOfBand, SeekDirection, SeekThresholds, StereoMode, TuneStatus, VolumeControl,
};
use embassy_futures::block_on;

use common::{FakeChip, radio, radio_with_config};

// ---------------------------------------------------------------------------
// Band and mode
// ---------------------------------------------------------------------------

#[test]
fn set_fm_writes_power_band_and_channel() {
    let chip = FakeChip::new();
    let mut radio = radio(&chip);
    block_on(radio.setup()).unwrap();
    chip.clear_writes();

    block_on(radio.set_fm(0, 870, 1080, 988, 1)).unwrap();

    // (988 - 300) * 4 = 2752 = 0x0AC0, crystal bit 0x20 kept in 0x02
    assert_eq!(
        chip.writes(),
        vec![
            (0x00, 0xC0),
            (0x01, 0x00),
            (0x02, 0x0A | 0x20),
            (0x03, 0xC0),
            (0x00, 0xE0),
            (0x00, 0xC0),
        ]
    );
    assert_eq!(radio.frequency(), 988);
    assert_eq!(block_on(radio.update_frequency()), Ok(988));
}

#[test]
fn switching_modes_updates_flag_and_bounds() {
    let chip = FakeChip::new();
    let mut radio = radio(&chip);

    block_on(radio.set_fm_band(FmBand::Fm1)).unwrap();
    assert_eq!(radio.mode(), Mode::Fm);
    assert_eq!((radio.session().min, radio.session().max), (870, 1080));
    assert_eq!(chip.reg(0x00) & 0x40, 0x40);

    block_on(radio.set_am_band(AmBand::Mw1)).unwrap();
    let session = *radio.session();
    assert_eq!(session.mode, Mode::Am);
    assert_eq!((session.min, session.max, session.step), (520, 1710, 5));
    assert_eq!(session.frequency, 810);
    assert_eq!(chip.reg(0x00), 0x80);
    assert_eq!(chip.reg(0x01), 1 << 3);
    // 810 / 5 = 162, 5 kHz spacing
    assert_eq!(chip.reg(0x03), 162);
    assert_eq!(chip.reg(0x02) & 0x40, 0);

    block_on(radio.set_fm_band(FmBand::Fm2)).unwrap();
    assert_eq!(radio.mode(), Mode::Fm);
    assert_eq!((radio.session().min, radio.session().max), (760, 1080));
    assert_eq!(chip.reg(0x00), 0xC0);
    // AM band field left as it was
    assert_eq!(chip.reg(0x01), (1 << 3) | 1);
}

#[test]
fn custom_fm_band_programs_boundary_registers() {
    let chip = FakeChip::new();
    let mut radio = radio(&chip);

    block_on(radio.set_fm(7, 650, 750, 700, 1)).unwrap();

    assert_eq!(chip.reg(0x01) & 0x07, 7);
    assert_eq!(chip.reg(0x04), 43);
    assert_eq!(chip.reg(0x05), 56);
    assert_eq!(radio.frequency(), 700);
}

#[test]
fn custom_am_band_uses_current_step() {
    let chip = FakeChip::new();
    let mut radio = radio(&chip);
    block_on(radio.set_am_band(AmBand::Mw1)).unwrap();

    block_on(radio.set_custom_band(600, 1200)).unwrap();

    assert_eq!(chip.reg(0x01) >> 3, 17);
    assert_eq!(chip.reg(0x04), 3);
    assert_eq!(chip.reg(0x05), 7);
    assert_eq!(radio.frequency(), 600);
    assert_eq!((radio.session().min, radio.session().max), (600, 1200));
}

#[test]
fn invalid_band_arguments_touch_nothing() {
    let chip = FakeChip::new();
    let mut radio = radio(&chip);

    assert_eq!(
        block_on(radio.set_fm(8, 870, 1080, 988, 1)),
        Err(Error::InvalidBand)
    );
    assert_eq!(
        block_on(radio.set_am(19, 520, 1710, 810, 5)),
        Err(Error::InvalidBand)
    );
    assert_eq!(
        block_on(radio.set_am(1, 520, 1710, 810, 4)),
        Err(Error::InvalidStep)
    );
    assert_eq!(
        block_on(radio.set_fm(0, 200, 1080, 988, 1)),
        Err(Error::InvalidParameter)
    );
    assert_eq!(
        block_on(radio.set_fm(0, 1080, 870, 988, 1)),
        Err(Error::InvalidParameter)
    );
    assert!(chip.writes().is_empty());
    assert_eq!(radio.mode(), Mode::Fm);
}

// ---------------------------------------------------------------------------
// Channel arithmetic
// ---------------------------------------------------------------------------

#[test]
fn channel_write_keeps_crystal_and_spacing_flags() {
    let chip = FakeChip::with_regs(&[(0x02, 0xFF)]);
    let mut radio = radio(&chip);
    let before = chip.reg(0x02);

    block_on(radio.set_frequency(1000)).unwrap();

    // (1000 - 300) * 4 = 2800 = 0x0AF0
    let after = chip.reg(0x02);
    assert_eq!(before & 0xE0, after & 0xE0);
    assert_eq!(after, 0xE0 | 0x0A);
    assert_eq!(chip.reg(0x03), 0xF0);
    assert_eq!(chip.writes_to(0x02), vec![0xEA]);
}

#[test]
fn am_step_changes_channel_arithmetic() {
    let chip = FakeChip::new();
    let mut radio = radio(&chip);
    block_on(radio.set_am_band(AmBand::Mw1)).unwrap();

    block_on(radio.set_step(3)).unwrap();
    assert_eq!(radio.step(), 3);
    block_on(radio.set_frequency(999)).unwrap();
    // 999 / 3 = 333 = 0x014D, mode3k set
    assert_eq!(chip.reg(0x02), 0x40 | 0x01);
    assert_eq!(chip.reg(0x03), 0x4D);

    chip.clear_writes();
    assert_eq!(block_on(radio.set_step(4)), Err(Error::InvalidStep));
    assert_eq!(radio.step(), 3);
    assert!(chip.writes().is_empty());

    block_on(radio.set_step(5)).unwrap();
    block_on(radio.set_frequency(1000)).unwrap();
    assert_eq!(chip.reg(0x02), 0x00);
    assert_eq!(chip.reg(0x03), 200);
}

#[test]
fn am_step_change_retunes_in_new_units() {
    let chip = FakeChip::new();
    let mut radio = radio(&chip);
    block_on(radio.set_am_band(AmBand::Mw1)).unwrap();

    block_on(radio.set_step(3)).unwrap();

    // 810 / 3 = 270 = 0x010E, written together with mode3k
    assert_eq!(chip.reg(0x02), 0x40 | 0x01);
    assert_eq!(chip.reg(0x03), 0x0E);
    assert_eq!(block_on(radio.update_frequency()), Ok(810));
    assert_eq!(radio.frequency(), 810);
}

#[test]
fn fm_step_accepts_only_three_or_five() {
    let chip = FakeChip::new();
    let mut radio = radio(&chip);

    assert_eq!(block_on(radio.set_step(4)), Err(Error::InvalidStep));
    assert_eq!(radio.step(), 1);

    block_on(radio.set_step(5)).unwrap();
    assert_eq!(radio.step(), 5);
    // FM channels do not depend on the step
    assert!(chip.writes().is_empty());

    block_on(radio.frequency_up()).unwrap();
    assert_eq!(radio.frequency(), 1044);
}

#[test]
fn out_of_band_frequencies_wrap_by_default() {
    let chip = FakeChip::new();
    let mut radio = radio(&chip);

    block_on(radio.set_frequency(1085)).unwrap();
    assert_eq!(radio.frequency(), 870);
    // (870 - 300) * 4 = 2280 = 0x08E8
    assert_eq!(chip.reg(0x03), 0xE8);

    block_on(radio.frequency_down()).unwrap();
    assert_eq!(radio.frequency(), 1080);
    block_on(radio.frequency_up()).unwrap();
    assert_eq!(radio.frequency(), 870);
    block_on(radio.frequency_up()).unwrap();
    assert_eq!(radio.frequency(), 871);
}

#[test]
fn saturate_policy_stops_at_band_edges() {
    let chip = FakeChip::new();
    let config = Config {
        out_of_band: OutOfBand::Saturate,
        ..Config::default()
    };
    let mut radio = radio_with_config(&chip, config);

    block_on(radio.set_frequency(1085)).unwrap();
    assert_eq!(radio.frequency(), 1080);
    block_on(radio.frequency_up()).unwrap();
    assert_eq!(radio.frequency(), 1080);
    block_on(radio.set_frequency(100)).unwrap();
    assert_eq!(radio.frequency(), 870);
}

// ---------------------------------------------------------------------------
// Tune and seek
// ---------------------------------------------------------------------------

#[test]
fn tune_frequency_waits_for_stc_and_reports_status() {
    let chip = FakeChip::with_regs(&[(0x14, 0xA0), (0x17, 30), (0x19, (2 << 3) | 1), (0x1B, 40)]);
    chip.0.borrow_mut().stc_on_tune = true;
    let mut radio = radio(&chip);

    let status = block_on(radio.tune_frequency(1015)).unwrap();

    assert_eq!(
        status,
        TuneStatus {
            mode: Mode::Fm,
            frequency: 1015,
            channel: 2860,
            stc: true,
            tuned: true,
            stereo: true,
            rssi: 103 - 40 - 12 - 6,
            cnr: 30,
        }
    );
}

#[test]
fn tune_without_stc_times_out() {
    let chip = FakeChip::new();
    let config = Config {
        tune_timeout_ms: 50,
        ..Config::default()
    };
    let mut radio = radio_with_config(&chip, config);

    assert_eq!(block_on(radio.tune_frequency(1015)), Err(Error::Timeout));
    // the tune itself went out
    assert_eq!(radio.frequency(), 1015);
}

#[test]
fn seek_up_repeats_trigger_until_stc() {
    let chip = FakeChip::new();
    chip.set_read_channel((1015 - 300) * 4);
    chip.raise_stc_after(3);
    let mut radio = radio(&chip);

    let frequency = block_on(radio.seek_station(SeekDirection::Up)).unwrap();

    assert_eq!(frequency, 1015);
    assert_eq!(radio.frequency(), 1015);
    // power_on | fm_en | seek | seek_up, then seek cleared
    assert_eq!(chip.writes_to(0x00), vec![0xD8, 0xD8, 0xD8, 0xD8, 0xC8]);
}

#[test]
fn seek_down_clears_direction_bit() {
    let chip = FakeChip::new();
    chip.set_read_channel((900 - 300) * 4);
    chip.raise_stc_after(0);
    let mut radio = radio(&chip);

    assert_eq!(block_on(radio.seek_station(SeekDirection::Down)), Ok(900));
    assert_eq!(chip.writes_to(0x00), vec![0xD0, 0xC0]);
}

#[test]
fn seek_timeout_is_distinct_from_success() {
    let chip = FakeChip::new();
    chip.set_read_channel(2400);
    let config = Config {
        seek_timeout_ms: 100,
        ..Config::default()
    };
    let mut radio = radio_with_config(&chip, config);

    assert_eq!(
        block_on(radio.seek_station(SeekDirection::Up)),
        Err(Error::Timeout)
    );

    // 16 ms per poll (two 3 ms transactions and a 10 ms pause) against 100 ms
    let writes = chip.writes_to(0x00);
    assert_eq!(writes.len(), 8);
    assert_eq!(*writes.last().unwrap() & 0x10, 0);
    // session follows the chip even after a timeout
    assert_eq!(radio.frequency(), 2400 / 4 + 300);
}

#[test]
fn seek_progress_readback_counts_against_timeout() {
    let chip = FakeChip::new();
    let config = Config {
        seek_timeout_ms: 100,
        ..Config::default()
    };
    let mut radio = radio_with_config(&chip, config);
    let mut polls = 0;

    assert_eq!(
        block_on(radio.seek_station_with(SeekDirection::Down, |_| polls += 1)),
        Err(Error::Timeout)
    );

    // 22 ms per poll (four 3 ms transactions and a 10 ms pause) against 100 ms
    assert_eq!(polls, 5);
    assert_eq!(chip.writes_to(0x00).len(), 6);
}

#[test]
fn seek_progress_reports_every_poll() {
    let chip = FakeChip::new();
    chip.set_read_channel((1015 - 300) * 4);
    chip.raise_stc_after(2);
    let mut radio = radio(&chip);
    let mut seen = Vec::new();

    let frequency =
        block_on(radio.seek_station_with(SeekDirection::Up, |f| seen.push(f))).unwrap();

    assert_eq!(frequency, 1015);
    assert_eq!(seen, vec![1015, 1015]);
}

async fn band_scan<R: Akc695xRadio>(radio: &mut R) -> Result<u16, Error> {
    radio.set_fm_band(FmBand::Fm4).await?;
    radio.seek_station(SeekDirection::Up).await
}

#[test]
fn radio_trait_drives_the_device() {
    let chip = FakeChip::new();
    chip.seek_lands_on((885 - 300) * 4);
    chip.raise_stc_after(1);
    let mut radio = radio(&chip);

    assert_eq!(block_on(band_scan(&mut radio)), Ok(885));
    assert_eq!(Akc695xRadio::session(&radio).band, 3);
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[test]
fn am_status_decoding() {
    let chip = FakeChip::with_regs(&[
        (0x16, 0x80 | 20),
        (0x17, 33),
        (0x18, 24),
        (0x19, (2 << 3) | 1),
        (0x1B, 40),
    ]);
    let mut radio = radio(&chip);
    block_on(radio.set_am_band(AmBand::Mw1)).unwrap();

    assert_eq!(block_on(radio.rssi()), Ok(123 - 40 - 12 - 6));
    assert_eq!(block_on(radio.supply_voltage_mv()), Ok(3000));
    assert_eq!(block_on(radio.cnr_am()), Ok(20));
    assert_eq!(block_on(radio.cnr_fm()), Ok(33));
    assert_eq!(block_on(radio.cnr()), Ok(20));
    assert_eq!(block_on(radio.is_stereo()), Ok(false));
}

#[test]
fn status_flags() {
    let chip = FakeChip::with_regs(&[(0x14, 0x80 | 0x20)]);
    let mut radio = radio(&chip);

    assert_eq!(block_on(radio.is_stereo()), Ok(true));
    assert_eq!(block_on(radio.is_tuned()), Ok(true));
    assert_eq!(block_on(radio.is_seek_tune_complete()), Ok(false));
    chip.set_reg(0x14, 0x40);
    assert_eq!(block_on(radio.is_seek_tune_complete()), Ok(true));
    assert_eq!(block_on(radio.wait_seek_tune_complete(10)), Ok(()));
}

// ---------------------------------------------------------------------------
// Audio and power
// ---------------------------------------------------------------------------

#[test]
fn volume_is_clamped_and_steps_stay_audible() {
    let chip = FakeChip::with_regs(&[(0x06, 0b11)]);
    let mut radio = radio(&chip);

    block_on(radio.set_volume(70)).unwrap();
    assert_eq!(radio.volume(), 63);
    assert_eq!(chip.reg(0x06), 0xFF);
    block_on(radio.volume_up()).unwrap();
    assert_eq!(radio.volume(), 63);

    block_on(radio.set_volume(40)).unwrap();
    assert_eq!(chip.reg(0x06), (40 << 2) | 0b11);
    block_on(radio.volume_up()).unwrap();
    assert_eq!(radio.volume(), 41);

    block_on(radio.set_volume(25)).unwrap();
    block_on(radio.volume_down()).unwrap();
    assert_eq!(radio.volume(), 25);
    assert_eq!(chip.reg(0x06), (25 << 2) | 0b11);

    block_on(radio.set_volume(10)).unwrap();
    assert_eq!(radio.volume(), 10);
}

#[test]
fn audio_path_and_volume_source() {
    let chip = FakeChip::with_regs(&[(0x06, 0b11), (0x09, 0x08)]);
    let mut radio = radio(&chip);

    block_on(radio.set_audio(false, true, 30)).unwrap();
    assert_eq!(chip.reg(0x06), (30 << 2) | 0b10);
    assert_eq!(radio.volume(), 30);

    block_on(radio.set_volume_control(VolumeControl::Potentiometer)).unwrap();
    assert_eq!(chip.reg(0x09), 0x00);
    block_on(radio.set_volume_control(VolumeControl::Register)).unwrap();
    assert_eq!(chip.reg(0x09), 0x08);
}

#[test]
fn tone_and_seek_settings() {
    let chip = FakeChip::with_regs(&[(0x07, 0xC0)]);
    let mut radio = radio(&chip);

    block_on(radio.set_de_emphasis(DeEmphasis::Us50)).unwrap();
    block_on(radio.set_bass_boost(true)).unwrap();
    block_on(radio.set_stereo_mode(StereoMode::ForceMono)).unwrap();
    block_on(radio.set_fm_bandwidth(FmBandwidth::Khz100)).unwrap();
    assert_eq!(chip.reg(0x07), 0xFF);

    block_on(radio.set_stereo_mode(StereoMode::Auto)).unwrap();
    assert_eq!(chip.reg(0x07), 0xF3);

    block_on(radio.set_fm_seek_spacing(FmSeekSpacing::Khz200)).unwrap();
    assert_eq!(chip.reg(0x0B), 0x30);

    let thresholds = SeekThresholds {
        stereo: 1,
        fm_cnr: 2,
        am_cnr: 3,
        frequency_deviation: 0,
    };
    block_on(radio.set_seek_thresholds(thresholds)).unwrap();
    assert_eq!(chip.reg(0x08), 0x6C);

    block_on(radio.set_tune_lamp(true)).unwrap();
    block_on(radio.set_low_voltage_volume(true)).unwrap();
    assert_eq!(chip.reg(0x09), 0x11);
}

#[test]
fn mute_and_power_share_register_zero() {
    let chip = FakeChip::with_regs(&[(0x00, 0xC3)]);
    let mut radio = radio(&chip);

    block_on(radio.set_mute(true)).unwrap();
    assert_eq!(chip.reg(0x00), 0xC7);
    block_on(radio.power_off()).unwrap();
    assert_eq!(chip.reg(0x00), 0x47);
    block_on(radio.power_on()).unwrap();
    block_on(radio.set_mute(false)).unwrap();
    assert_eq!(chip.reg(0x00), 0xC3);
}
