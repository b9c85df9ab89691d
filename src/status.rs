//! Decoding of the read-only status registers.

use crate::band::Mode;
use crate::register::{BatteryReg, GainLevelReg, RssiReg};

/// Snapshot of the tuning status registers.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TuneStatus {
    pub mode: Mode,
    /// FM in 100 kHz units, AM in kHz
    pub frequency: u16,
    pub channel: u16,
    /// Seek/tune complete
    pub stc: bool,
    pub tuned: bool,
    pub stereo: bool,
    /// dBuV
    pub rssi: i16,
    /// dB
    pub cnr: u8,
}

/// RSSI in dBuV.
///
/// The raw RSSI and both gain stage levels are subtracted from 103 on FM
/// and 123 on AM, each gain level step weighing 6 dB.
pub const fn decode_rssi(mode: Mode, rssi: RssiReg, gain: GainLevelReg) -> i16 {
    let base: i16 = match mode {
        Mode::Fm => 103,
        Mode::Am => 123,
    };
    base - rssi.rssi() as i16 - 6 * gain.pgalevel_rf() as i16 - 6 * gain.pgalevel_if() as i16
}

/// Supply voltage in millivolts: 1.8 V + 50 mV per step.
pub const fn decode_supply_voltage_mv(battery: BatteryReg) -> u16 {
    1800 + 50 * battery.vbat() as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rssi_formula() {
        let rssi = RssiReg(40);
        let gain = GainLevelReg(0).with_pgalevel_rf(2).with_pgalevel_if(1);
        assert_eq!(decode_rssi(Mode::Fm, rssi, gain), 103 - 40 - 12 - 6);
        assert_eq!(decode_rssi(Mode::Am, rssi, gain), 123 - 40 - 12 - 6);
    }

    #[test]
    fn rssi_ignores_reserved_bits() {
        assert_eq!(
            decode_rssi(Mode::Fm, RssiReg(0x80 | 3), GainLevelReg(0xC0)),
            100
        );
    }

    #[test]
    fn supply_voltage_scale() {
        assert_eq!(decode_supply_voltage_mv(BatteryReg(0)), 1800);
        assert_eq!(decode_supply_voltage_mv(BatteryReg(24)), 3000);
        assert_eq!(decode_supply_voltage_mv(BatteryReg(0xFF)), 1800 + 50 * 63);
    }
}
