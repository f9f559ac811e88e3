/// Full scale of the 16-bit raw sensor values.
const RAW_FULL_SCALE: f32 = 65535.0;

/// Converts a raw temperature word to degrees Celsius.
pub fn temperature_c(raw: u16) -> f32 {
    175.0 * raw as f32 / RAW_FULL_SCALE - 45.0
}

/// Converts a raw humidity word to percent relative humidity.
pub fn humidity_rh(raw: u16) -> f32 {
    100.0 * raw as f32 / RAW_FULL_SCALE
}

pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    celsius * 1.8 + 32.0
}

pub fn fahrenheit_to_celsius(fahrenheit: f32) -> f32 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

/// Inverse of [`temperature_c`], truncating toward zero.
///
/// Values outside the sensor range saturate at the ends of the raw scale.
pub fn raw_temperature(celsius: f32) -> u16 {
    ((celsius + 45.0) / 175.0 * RAW_FULL_SCALE) as u16
}

/// Inverse of [`humidity_rh`], truncating toward zero.
pub fn raw_humidity(humidity: f32) -> u16 {
    (humidity / 100.0 * RAW_FULL_SCALE) as u16
}

/// Reading returned by the SHT3x sensor.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    /// Temperature in degrees Celsius.
    pub temperature_c: f32,
    /// Temperature in degrees Fahrenheit.
    pub temperature_f: f32,
    /// Relative humidity in percent.
    pub humidity_rh: f32,
}

impl Measurement {
    /// Builds a measurement from the raw temperature and humidity words.
    pub fn from_raw(raw_temperature: u16, raw_humidity: u16) -> Self {
        let temperature_c = temperature_c(raw_temperature);
        Measurement {
            temperature_c,
            temperature_f: celsius_to_fahrenheit(temperature_c),
            humidity_rh: humidity_rh(raw_humidity),
        }
    }
}
