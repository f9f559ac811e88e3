//! Command codes understood by the SHT3x.
//!
//! Every command is a 16-bit opcode sent MSB first.

/// Measurement repeatability.
///
/// Higher repeatability lowers noise at the cost of a longer conversion.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Repeatability {
    /// 0.10 %RH / 0.06 °C.
    #[default]
    High,
    /// 0.15 %RH / 0.12 °C.
    Medium,
    /// 0.25 %RH / 0.24 °C.
    Low,
}

/// Sampling rate of the periodic acquisition mode, in measurements per second.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Frequency {
    /// 0.5 Hz
    Hz0_5,
    /// 1 Hz
    Hz1,
    /// 2 Hz
    Hz2,
    /// 4 Hz
    Hz4,
    /// 10 Hz
    Hz10,
}

/// Periodic mode commands, indexed by `[frequency][repeatability]`.
const PERIODIC_COMMANDS: [[u16; 3]; 5] = [
    [0x2032, 0x2024, 0x202F],
    [0x2130, 0x2126, 0x212D],
    [0x2236, 0x2220, 0x222B],
    [0x2334, 0x2322, 0x2329],
    [0x2737, 0x2721, 0x272A],
];

/// A command understood by the sensor.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Single-shot measurement without clock stretching.
    SingleShot(Repeatability),
    /// Single-shot measurement with clock stretching enabled.
    SingleShotStretched(Repeatability),
    /// Enter periodic acquisition mode.
    StartPeriodic(Frequency, Repeatability),
    /// Read out the latest periodic measurement.
    FetchData,
    /// Leave periodic acquisition mode.
    StopPeriodic,
    SoftReset,
    HeaterEnable,
    HeaterDisable,
    ReadStatus,
    ClearStatus,
    ReadSerialNumber,
    /// Read an alert limit word.
    ReadLimit(crate::limits::LimitSlot),
    /// Write an alert limit word. The word and its CRC follow the opcode.
    WriteLimit(crate::limits::LimitSlot),
}

impl Command {
    /// Returns the 16-bit opcode of this command.
    pub const fn code(self) -> u16 {
        use crate::limits::LimitSlot;

        match self {
            Self::SingleShot(r) => match r {
                Repeatability::High => 0x2400,
                Repeatability::Medium => 0x240B,
                Repeatability::Low => 0x2416,
            },
            Self::SingleShotStretched(r) => match r {
                Repeatability::High => 0x2C06,
                Repeatability::Medium => 0x2C0D,
                Repeatability::Low => 0x2C10,
            },
            Self::StartPeriodic(f, r) => PERIODIC_COMMANDS[f as usize][r as usize],
            Self::FetchData => 0xE000,
            Self::StopPeriodic => 0x3093,
            Self::SoftReset => 0x30A2,
            Self::HeaterEnable => 0x306D,
            Self::HeaterDisable => 0x3066,
            Self::ReadStatus => 0xF32D,
            Self::ClearStatus => 0x3041,
            Self::ReadSerialNumber => 0x3780,
            Self::ReadLimit(slot) => match slot {
                LimitSlot::HighSet => 0xE11F,
                LimitSlot::HighClear => 0xE114,
                LimitSlot::LowClear => 0xE109,
                LimitSlot::LowSet => 0xE102,
            },
            Self::WriteLimit(slot) => match slot {
                LimitSlot::HighSet => 0x611D,
                LimitSlot::HighClear => 0x6116,
                LimitSlot::LowClear => 0x610B,
                LimitSlot::LowSet => 0x6100,
            },
        }
    }

    /// Opcode serialized big-endian, as it goes on the wire.
    pub const fn to_bytes(self) -> [u8; 2] {
        self.code().to_be_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::LimitSlot;

    const FREQUENCIES: [Frequency; 5] = [
        Frequency::Hz0_5,
        Frequency::Hz1,
        Frequency::Hz2,
        Frequency::Hz4,
        Frequency::Hz10,
    ];
    const REPEATABILITIES: [Repeatability; 3] =
        [Repeatability::High, Repeatability::Medium, Repeatability::Low];

    #[test]
    fn test_periodic_table() {
        let expected = [
            0x2032, 0x2024, 0x202F, 0x2130, 0x2126, 0x212D, 0x2236, 0x2220, 0x222B, 0x2334,
            0x2322, 0x2329, 0x2737, 0x2721, 0x272A,
        ];

        let codes: Vec<u16> = FREQUENCIES
            .iter()
            .flat_map(|f| {
                REPEATABILITIES
                    .iter()
                    .map(move |r| Command::StartPeriodic(*f, *r).code())
            })
            .collect();

        assert_eq!(codes, expected);
    }

    #[test]
    fn test_periodic_4hz_low() {
        assert_eq!(
            Command::StartPeriodic(Frequency::Hz4, Repeatability::Low).code(),
            0x2329
        );
    }

    #[test]
    fn test_to_bytes_is_big_endian() {
        assert_eq!(Command::ReadStatus.to_bytes(), [0xF3, 0x2D]);
        assert_eq!(
            Command::SingleShot(Repeatability::Medium).to_bytes(),
            [0x24, 0x0B]
        );
    }

    #[test]
    fn test_limit_commands() {
        assert_eq!(Command::ReadLimit(LimitSlot::HighSet).code(), 0xE11F);
        assert_eq!(Command::WriteLimit(LimitSlot::LowSet).code(), 0x6100);
    }
}
