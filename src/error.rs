use core::fmt;

use embedded_hal::digital::ErrorKind as PinErrorKind;

use crate::limits::LimitSlot;

/// Possible errors from the SHT3x driver.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Sht3xError<E> {
    /// Error from the I2C bus.
    I2c(E),
    /// Error from the reset pin.
    PinError(PinErrorKind),
    /// The serial number probe in `begin` did not return a valid answer.
    NotDetected,
    /// A received word did not match its CRC byte.
    CrcMismatch,
    /// Alert thresholds are not ordered as high set > high clear > low clear > low set.
    InvalidOrdering,
    /// An alert threshold lies outside the sensor's measurement range.
    OutOfRange,
    /// Reading back an alert limit slot failed; writes to earlier slots may
    /// already have been applied.
    LimitIo(LimitSlot),
    /// The status register did not confirm the last command.
    CommandFailed,
    /// A pin reset did not set the reset-detected flag.
    ResetNotDetected,
}

impl<E> From<E> for Sht3xError<E> {
    fn from(value: E) -> Self {
        Self::I2c(value)
    }
}

impl<E: fmt::Debug> fmt::Display for Sht3xError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I2c(e) => write!(f, "I2C error: {e:?}"),
            Self::PinError(kind) => write!(f, "reset pin error: {kind:?}"),
            Self::NotDetected => f.write_str("sensor not detected on the bus"),
            Self::CrcMismatch => f.write_str("CRC mismatch"),
            Self::InvalidOrdering => {
                f.write_str("thresholds must satisfy high set > high clear > low clear > low set")
            }
            Self::OutOfRange => f.write_str("threshold outside the sensor range"),
            Self::LimitIo(slot) => write!(f, "failed to read alert limit {slot:?}"),
            Self::CommandFailed => f.write_str("command not confirmed by the status register"),
            Self::ResetNotDetected => f.write_str("reset not detected"),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for Sht3xError<E> {}
