//! Audio path settings.

/// Largest volume register value.
pub const VOLUME_MAX: u8 = 63;
/// Lowest audible volume; 0..=24 mute the output.
pub const VOLUME_MIN: u8 = 25;

/// Volume values above the 6-bit field saturate at [`VOLUME_MAX`].
pub const fn clamp_volume(volume: u8) -> u8 {
    if volume > VOLUME_MAX { VOLUME_MAX } else { volume }
}

pub const fn volume_step_up(volume: u8) -> u8 {
    if volume < VOLUME_MAX { volume + 1 } else { VOLUME_MAX }
}

/// One step down, stopping at [`VOLUME_MIN`]. Muted levels are left as they are.
pub const fn volume_step_down(volume: u8) -> u8 {
    if volume > VOLUME_MIN { volume - 1 } else { volume }
}

/// Source of the output volume.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VolumeControl {
    /// External potentiometer on the VOL pin
    Potentiometer,
    /// Register 0x06 volume field
    #[default]
    Register,
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeEmphasis {
    #[default]
    Us75,
    Us50,
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StereoMode {
    #[default]
    Auto = 0b00,
    ForceStereo = 0b10,
    ForceMono = 0b11,
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FmBandwidth {
    #[default]
    Khz150 = 0b00,
    Khz200 = 0b01,
    Khz50 = 0b10,
    Khz100 = 0b11,
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FmSeekSpacing {
    Khz25 = 0b00,
    Khz50 = 0b01,
    #[default]
    Khz100 = 0b10,
    Khz200 = 0b11,
}

/// Seek and stereo decision thresholds, each a 2-bit level.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SeekThresholds {
    pub stereo: u8,
    pub fm_cnr: u8,
    pub am_cnr: u8,
    pub frequency_deviation: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_clamps_to_field_width() {
        assert_eq!(clamp_volume(64), 63);
        assert_eq!(clamp_volume(255), 63);
        for v in VOLUME_MIN..=VOLUME_MAX {
            assert_eq!(clamp_volume(v), v);
        }
    }

    #[test]
    fn volume_steps_stay_in_audible_range() {
        assert_eq!(volume_step_up(62), 63);
        assert_eq!(volume_step_up(63), 63);
        assert_eq!(volume_step_down(26), 25);
        assert_eq!(volume_step_down(25), 25);
        assert_eq!(volume_step_down(10), 10);
    }
}
