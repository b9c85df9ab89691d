//! AKC695X register map and bit-field accessors.
//!
//! Every register is a single byte. Fields are read and written through
//! shift/mask accessors on small newtypes so a partial update always starts
//! from the byte read back from the chip.

use crate::Error;

/// Documented register addresses.
///
/// 0x00..=0x0D (except 0x0A) are read-write configuration registers,
/// 0x14..=0x1B are read-only status registers. The remaining addresses are
/// undocumented and cannot be expressed with this type.
#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    /// Power, mode, tune/seek triggers, mute
    Power = 0x00,
    /// AM and FM band select
    Band = 0x01,
    /// Channel high bits, crystal and AM 3 kHz mode
    ChannelHigh = 0x02,
    /// Channel low byte
    ChannelLow = 0x03,
    /// Custom band start (channel / 32)
    CustomBandStart = 0x04,
    /// Custom band stop (channel / 32)
    CustomBandStop = 0x05,
    /// Volume, line input, output phase
    Audio = 0x06,
    /// De-emphasis, bass boost, stereo mode, FM bandwidth
    Tone = 0x07,
    /// Seek and stereo thresholds
    Threshold = 0x08,
    /// Volume control source, tune lamp, low-voltage volume reduction
    Control = 0x09,
    /// FM seek spacing
    Spacing = 0x0B,
    /// Reserved
    Misc0C = 0x0C,
    /// Reserved
    Misc0D = 0x0D,
    /// Stereo, STC and tuned flags, read channel high bits
    Status = 0x14,
    /// Read channel low byte
    ReadChannel = 0x15,
    /// AM carrier-to-noise ratio
    AmCnr = 0x16,
    /// FM carrier-to-noise ratio
    FmCnr = 0x17,
    /// Supply voltage
    Battery = 0x18,
    /// RF and IF gain stage levels
    GainLevel = 0x19,
    /// FM frequency offset
    FrequencyOffset = 0x1A,
    /// Raw RSSI
    Rssi = 0x1B,
}

impl Register {
    pub const fn addr(self) -> u8 {
        self as u8
    }

    /// Status registers (0x14 and above) are read-only.
    pub const fn is_writable(self) -> bool {
        (self as u8) < 0x14
    }
}

impl TryFrom<u8> for Register {
    type Error = Error;

    fn try_from(addr: u8) -> Result<Self, Self::Error> {
        let reg = match addr {
            0x00 => Register::Power,
            0x01 => Register::Band,
            0x02 => Register::ChannelHigh,
            0x03 => Register::ChannelLow,
            0x04 => Register::CustomBandStart,
            0x05 => Register::CustomBandStop,
            0x06 => Register::Audio,
            0x07 => Register::Tone,
            0x08 => Register::Threshold,
            0x09 => Register::Control,
            0x0B => Register::Spacing,
            0x0C => Register::Misc0C,
            0x0D => Register::Misc0D,
            0x14 => Register::Status,
            0x15 => Register::ReadChannel,
            0x16 => Register::AmCnr,
            0x17 => Register::FmCnr,
            0x18 => Register::Battery,
            0x19 => Register::GainLevel,
            0x1A => Register::FrequencyOffset,
            0x1B => Register::Rssi,
            other => return Err(Error::UndocumentedRegister(other)),
        };
        Ok(reg)
    }
}

const fn field_mask(shift: u8, width: u8) -> u8 {
    (((1u16 << width) - 1) as u8) << shift
}

const fn field_get(raw: u8, shift: u8, width: u8) -> u8 {
    (raw & field_mask(shift, width)) >> shift
}

const fn field_set(raw: u8, shift: u8, width: u8, value: u8) -> u8 {
    let mask = field_mask(shift, width);
    (raw & !mask) | ((value << shift) & mask)
}

macro_rules! register_bits {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( flags {
                $( $(#[$fmeta:meta])* $fget:ident / $fset:ident @ $bit:literal; )*
            } )?
            $( fields {
                $( $(#[$vmeta:meta])* $get:ident / $set:ident / $mask:ident @ $shift:literal : $width:literal; )*
            } )?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        pub struct $name(pub u8);

        #[allow(dead_code)]
        impl $name {
            $( $(
                $(#[$fmeta])*
                pub const fn $fget(self) -> bool {
                    self.0 & (1 << $bit) != 0
                }

                pub const fn $fset(self, on: bool) -> Self {
                    Self(field_set(self.0, $bit, 1, on as u8))
                }
            )* )?
            $( $(
                pub const $mask: u8 = field_mask($shift, $width);

                $(#[$vmeta])*
                pub const fn $get(self) -> u8 {
                    field_get(self.0, $shift, $width)
                }

                pub const fn $set(self, value: u8) -> Self {
                    Self(field_set(self.0, $shift, $width, value))
                }
            )* )?
        }

        impl From<u8> for $name {
            fn from(raw: u8) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for u8 {
            fn from(reg: $name) -> u8 {
                reg.0
            }
        }
    };
}

register_bits! {
    /// Register 0x00. Bits 1..0 are reserved for debug and must be preserved.
    PowerReg {
        flags {
            /// Chip on
            power_on / with_power_on @ 7;
            /// FM mode when set, AM otherwise
            fm_en / with_fm_en @ 6;
            /// 0 -> 1 triggers a tune
            tune / with_tune @ 5;
            /// 0 -> 1 triggers a seek
            seek / with_seek @ 4;
            seek_up / with_seek_up @ 3;
            mute / with_mute @ 2;
        }
    }
}

register_bits! {
    /// Register 0x01
    BandReg {
        fields {
            am_band / with_am_band / AM_BAND_MASK @ 3 : 5;
            fm_band / with_fm_band / FM_BAND_MASK @ 0 : 3;
        }
    }
}

register_bits! {
    /// Register 0x02. Shares the channel high bits with crystal and AM
    /// spacing flags.
    ChannelHighReg {
        flags {
            /// AM channel is 3 kHz when set, 5 kHz otherwise
            mode3k / with_mode3k @ 6;
            /// 32.768 kHz crystal when set, 12 MHz otherwise
            ref_32k / with_ref_32k @ 5;
        }
        fields {
            channel_high / with_channel_high / CHANNEL_HIGH_MASK @ 0 : 5;
        }
    }
}

register_bits! {
    /// Register 0x06
    AudioReg {
        flags {
            line / with_line @ 1;
            phase_inv / with_phase_inv @ 0;
        }
        fields {
            /// 0..=24 mutes, 25..=63 is the audible range
            volume / with_volume / VOLUME_MASK @ 2 : 6;
        }
    }
}

register_bits! {
    /// Register 0x07
    ToneReg {
        flags {
            /// 50 us de-emphasis when set, 75 us otherwise
            de / with_de @ 5;
            bass_boost / with_bass_boost @ 4;
        }
        fields {
            stereo / with_stereo / STEREO_MASK @ 2 : 2;
            bandwidth / with_bandwidth / BANDWIDTH_MASK @ 0 : 2;
        }
    }
}

register_bits! {
    /// Register 0x08
    ThresholdReg {
        fields {
            stereo_th / with_stereo_th / STEREO_TH_MASK @ 6 : 2;
            fm_cnr_th / with_fm_cnr_th / FM_CNR_TH_MASK @ 4 : 2;
            am_cnr_th / with_am_cnr_th / AM_CNR_TH_MASK @ 2 : 2;
            fd_th / with_fd_th / FD_TH_MASK @ 0 : 2;
        }
    }
}

register_bits! {
    /// Register 0x09
    ControlReg {
        flags {
            /// Stereo / tuned indicator lamp output
            st_led / with_st_led @ 4;
            /// Volume taken from register 0x06 when set, from the potentiometer otherwise
            pd_adc_vol / with_pd_adc_vol @ 3;
            /// Reduce volume automatically as the battery drops
            lv_en / with_lv_en @ 0;
        }
    }
}

register_bits! {
    /// Register 0x0B
    SpacingReg {
        fields {
            fm_space / with_fm_space / FM_SPACE_MASK @ 4 : 2;
        }
    }
}

register_bits! {
    /// Register 0x14
    StatusReg {
        flags {
            stereo / with_stereo @ 7;
            /// Seek/tune complete
            stc / with_stc @ 6;
            tuned / with_tuned @ 5;
        }
        fields {
            channel_high / with_channel_high / CHANNEL_HIGH_MASK @ 0 : 5;
        }
    }
}

register_bits! {
    /// Register 0x16
    AmCnrReg {
        flags {
            mode3k / with_mode3k @ 7;
        }
        fields {
            cnr / with_cnr / CNR_MASK @ 0 : 7;
        }
    }
}

register_bits! {
    /// Register 0x17
    FmCnrReg {
        fields {
            cnr / with_cnr / CNR_MASK @ 0 : 7;
        }
    }
}

register_bits! {
    /// Register 0x18
    BatteryReg {
        fields {
            vbat / with_vbat / VBAT_MASK @ 0 : 6;
        }
    }
}

register_bits! {
    /// Register 0x19
    GainLevelReg {
        fields {
            pgalevel_rf / with_pgalevel_rf / RF_MASK @ 3 : 3;
            pgalevel_if / with_pgalevel_if / IF_MASK @ 0 : 3;
        }
    }
}

register_bits! {
    /// Register 0x1B
    RssiReg {
        fields {
            rssi / with_rssi / RSSI_MASK @ 0 : 7;
        }
    }
}

/// Largest value the 13-bit channel field can hold.
pub const CHANNEL_MAX: u16 = 0x1FFF;

/// Split a 13-bit channel into its (high 5 bits, low byte) register halves.
pub const fn split_channel(channel: u16) -> (u8, u8) {
    (((channel >> 8) & 0x1F) as u8, (channel & 0xFF) as u8)
}

/// Join the channel halves read back from 0x14 and 0x15.
pub const fn join_channel(high: u8, low: u8) -> u16 {
    (((high & 0x1F) as u16) << 8) | low as u16
}
