//! Alert limit encoding and environment classification.
//!
//! Each of the four limit slots holds one 16-bit word packing both
//! quantities:
//!
//! ```text
//!  15          9 8                 0
//! +-------------+-------------------+
//! | humidity    | temperature       |
//! | raw[15..9]  | raw[15..7]        |
//! +-------------+-------------------+
//! ```
//!
//! Humidity keeps the 7 most significant bits of its raw value in place,
//! temperature keeps its 9 most significant bits shifted down by 7.

use libm::roundf;

use crate::measurement::{
    celsius_to_fahrenheit, humidity_rh, raw_humidity, raw_temperature, temperature_c, Measurement,
};
use crate::status::StatusRegister;

const HUMIDITY_MASK: u16 = 0xFE00;
const TEMPERATURE_MASK: u16 = 0x01FF;

/// Low-order bits filled in when expanding a stored temperature field back
/// to a raw word.
const TEMPERATURE_FILL: u16 = 0x1A;
/// Low-order bits filled in when expanding a stored humidity field back to
/// a raw word.
const HUMIDITY_FILL: u16 = 0xCD;

pub const TEMPERATURE_RANGE_C: (f32, f32) = (-40.0, 125.0);
pub const HUMIDITY_RANGE_RH: (f32, f32) = (0.0, 100.0);

/// One of the four alert limit registers.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LimitSlot {
    /// Alert raised above this value.
    HighSet,
    /// High alert cleared below this value.
    HighClear,
    /// Low alert cleared above this value.
    LowClear,
    /// Alert raised below this value.
    LowSet,
}

impl LimitSlot {
    /// Order in which slots are read and written.
    pub const ALL: [LimitSlot; 4] = [
        LimitSlot::HighSet,
        LimitSlot::HighClear,
        LimitSlot::LowClear,
        LimitSlot::LowSet,
    ];
}

/// Unit of the values held in a [`LimitThresholds`].
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LimitUnit {
    Celsius,
    Fahrenheit,
    RelativeHumidity,
}

/// The four alert thresholds for one quantity.
///
/// Writes require `high_set > high_clear > low_clear > low_set`. Values read
/// back from the sensor are rounded to whole units and may not keep that
/// ordering.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct LimitThresholds {
    pub high_set: f32,
    pub high_clear: f32,
    pub low_set: f32,
    pub low_clear: f32,
}

impl LimitThresholds {
    pub fn new(high_set: f32, high_clear: f32, low_set: f32, low_clear: f32) -> Self {
        LimitThresholds {
            high_set,
            high_clear,
            low_set,
            low_clear,
        }
    }

    /// True when `high_set > high_clear > low_clear > low_set`.
    pub fn is_ordered(&self) -> bool {
        self.high_set > self.high_clear
            && self.high_clear > self.low_clear
            && self.low_clear > self.low_set
    }

    /// True when every threshold lies within `min..=max`.
    pub fn within(&self, (min, max): (f32, f32)) -> bool {
        [self.high_set, self.high_clear, self.low_set, self.low_clear]
            .iter()
            .all(|v| (min..=max).contains(v))
    }

    pub fn get(&self, slot: LimitSlot) -> f32 {
        match slot {
            LimitSlot::HighSet => self.high_set,
            LimitSlot::HighClear => self.high_clear,
            LimitSlot::LowClear => self.low_clear,
            LimitSlot::LowSet => self.low_set,
        }
    }

    pub fn set(&mut self, slot: LimitSlot, value: f32) {
        match slot {
            LimitSlot::HighSet => self.high_set = value,
            LimitSlot::HighClear => self.high_clear = value,
            LimitSlot::LowClear => self.low_clear = value,
            LimitSlot::LowSet => self.low_set = value,
        }
    }

    /// Converts every threshold with `f`.
    pub fn map(&self, f: impl Fn(f32) -> f32) -> Self {
        LimitThresholds {
            high_set: f(self.high_set),
            high_clear: f(self.high_clear),
            low_set: f(self.low_set),
            low_clear: f(self.low_clear),
        }
    }
}

/// Replaces the temperature field of `word`, keeping its humidity bits.
pub fn merge_temperature(word: u16, celsius: f32) -> u16 {
    (raw_temperature(celsius) >> 7) | (word & HUMIDITY_MASK)
}

/// Replaces the humidity field of `word`, keeping its temperature bits.
pub fn merge_humidity(word: u16, humidity: f32) -> u16 {
    (raw_humidity(humidity) & HUMIDITY_MASK) | (word & TEMPERATURE_MASK)
}

/// Decodes the temperature field of a limit word to degrees Celsius.
pub fn decode_temperature(word: u16) -> f32 {
    let raw = ((word << 7) & 0xFF80) | TEMPERATURE_FILL;
    temperature_c(raw)
}

/// Decodes the humidity field of a limit word to percent relative humidity.
pub fn decode_humidity(word: u16) -> f32 {
    let raw = (word & HUMIDITY_MASK) | HUMIDITY_FILL;
    humidity_rh(raw)
}

/// Read-back decoders, rounded to whole units.
pub fn read_back_c(word: u16) -> f32 {
    roundf(decode_temperature(word))
}

pub fn read_back_f(word: u16) -> f32 {
    roundf(celsius_to_fahrenheit(decode_temperature(word)))
}

pub fn read_back_rh(word: u16) -> f32 {
    roundf(decode_humidity(word))
}

/// Position of a value relative to its alert thresholds.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AlertLevel {
    #[default]
    Normal = 0,
    BelowLow = 1,
    AboveHigh = 2,
}

impl AlertLevel {
    /// Compares `value` with the set thresholds of `limits`.
    pub fn classify(value: f32, limits: &LimitThresholds) -> Self {
        if value > limits.high_set {
            AlertLevel::AboveHigh
        } else if value < limits.low_set {
            AlertLevel::BelowLow
        } else {
            AlertLevel::Normal
        }
    }
}

/// Combined alert classification of temperature and humidity.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct EnvironmentState {
    pub temperature: AlertLevel,
    pub humidity: AlertLevel,
}

impl EnvironmentState {
    /// Classifies a measurement. A quantity is only reported when the status
    /// register has its alert flag raised.
    pub fn evaluate(
        status: StatusRegister,
        measurement: &Measurement,
        temperature_limits_c: &LimitThresholds,
        humidity_limits_rh: &LimitThresholds,
    ) -> Self {
        let temperature = if status.temperature_alert() {
            AlertLevel::classify(measurement.temperature_c, temperature_limits_c)
        } else {
            AlertLevel::Normal
        };
        let humidity = if status.humidity_alert() {
            AlertLevel::classify(measurement.humidity_rh, humidity_limits_rh)
        } else {
            AlertLevel::Normal
        };

        EnvironmentState {
            temperature,
            humidity,
        }
    }

    /// Two-digit code: tens digit temperature, units digit humidity.
    ///
    /// `0` normal, `1` below the low threshold, `2` above the high threshold.
    /// For example `21` means temperature high and humidity low.
    pub fn code(&self) -> u8 {
        self.temperature as u8 * 10 + self.humidity as u8
    }

    pub fn is_normal(&self) -> bool {
        self.temperature == AlertLevel::Normal && self.humidity == AlertLevel::Normal
    }
}
