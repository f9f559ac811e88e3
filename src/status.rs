/// Snapshot of the 16-bit SHT3x status register.
///
/// | bit   | meaning                                                   |
/// |-------|-----------------------------------------------------------|
/// | 15    | alert pending (at least one pending alert)                |
/// | 14    | reserved                                                  |
/// | 13    | heater on                                                 |
/// | 12    | reserved                                                  |
/// | 11    | humidity tracking alert                                   |
/// | 10    | temperature tracking alert                                |
/// | 9..5  | reserved                                                  |
/// | 4     | reset detected since the last clear                       |
/// | 3..2  | reserved                                                  |
/// | 1     | last command not processed                                |
/// | 0     | checksum of the last write transfer failed                |
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct StatusRegister(u16);

const WRITE_CHECKSUM_FAILED: u16 = 1 << 0;
const COMMAND_FAILED: u16 = 1 << 1;
const RESET_DETECTED: u16 = 1 << 4;
const TEMPERATURE_ALERT: u16 = 1 << 10;
const HUMIDITY_ALERT: u16 = 1 << 11;
const HEATER_ON: u16 = 1 << 13;
const ALERT_PENDING: u16 = 1 << 15;

impl StatusRegister {
    /// Wraps a raw register word.
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Raw register word.
    pub const fn raw(self) -> u16 {
        self.0
    }

    const fn bit(self, mask: u16) -> bool {
        self.0 & mask != 0
    }

    pub const fn write_checksum_failed(self) -> bool {
        self.bit(WRITE_CHECKSUM_FAILED)
    }

    pub const fn command_failed(self) -> bool {
        self.bit(COMMAND_FAILED)
    }

    pub const fn reset_detected(self) -> bool {
        self.bit(RESET_DETECTED)
    }

    pub const fn temperature_alert(self) -> bool {
        self.bit(TEMPERATURE_ALERT)
    }

    pub const fn humidity_alert(self) -> bool {
        self.bit(HUMIDITY_ALERT)
    }

    pub const fn heater_on(self) -> bool {
        self.bit(HEATER_ON)
    }

    pub const fn alert_pending(self) -> bool {
        self.bit(ALERT_PENDING)
    }

    /// True when either tracking alert is raised.
    pub const fn any_alert(self) -> bool {
        self.temperature_alert() || self.humidity_alert()
    }
}
