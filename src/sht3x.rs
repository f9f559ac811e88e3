use embedded_hal::{
    delay::DelayNs,
    digital::{Error as _, OutputPin},
    i2c::I2c,
};

use crate::command::{Command, Frequency, Repeatability};
use crate::crc::{WORD_LEN, crc8, verify_word};
use crate::error::Sht3xError;
use crate::limits::{
    self, EnvironmentState, HUMIDITY_RANGE_RH, LimitSlot, LimitThresholds, LimitUnit,
    TEMPERATURE_RANGE_C,
};
use crate::measurement::{Measurement, fahrenheit_to_celsius};
use crate::status::StatusRegister;

/// Wait (in milliseconds) after a control command before its effect can be
/// read back from the status register.
const COMMAND_DELAY_MS: u32 = 1;

/// Conversion time (in milliseconds) of a polled single-shot measurement.
const MEASUREMENT_DELAY_MS: u32 = 15;

/// Wait (in milliseconds) after clearing the status register.
const CLEAR_STATUS_DELAY_MS: u32 = 10;

/// Number of command/read cycles tried before a status read gives up.
const STATUS_READ_ATTEMPTS: u8 = 10;

/// Largest response: two words with their CRC bytes.
const MAX_FRAME_LEN: usize = 2 * WORD_LEN;

/// I2C address of the sensor, selected by the level of its ADDR pin.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Address {
    /// ADDR tied to GND.
    Low = 0x44,
    /// ADDR tied to VDD.
    #[default]
    High = 0x45,
}

/// Current acquisition state of the sensor.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AcquisitionMode {
    /// Every measurement is triggered by the host.
    #[default]
    OneShot,
    /// The sensor samples on its own; the host fetches the latest result.
    Periodic {
        frequency: Frequency,
        repeatability: Repeatability,
    },
}

/// Placeholder for a driver built without a reset pin.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoResetPin;

/// Driver for the SHT3x temperature and humidity sensor.
pub struct Sht3x<I2C, D, RST = NoResetPin> {
    i2c: I2C,
    delay: D,
    reset: RST,
    address: u8,
    mode: AcquisitionMode,
    last_measurement: Option<Measurement>,
    limits: Option<(LimitUnit, LimitThresholds)>,
}

impl<I2C, D> Sht3x<I2C, D, NoResetPin> {
    /// Creates a new instance of the SHT3x driver without a reset pin.
    ///
    /// # Arguments
    ///
    /// * `i2c` - The I2C bus the sensor is attached to.
    /// * `delay` - A delay provider implementing the `DelayNs` trait.
    /// * `address` - The address selected by the sensor's ADDR pin.
    pub fn new(i2c: I2C, delay: D, address: Address) -> Self {
        Sht3x {
            i2c,
            delay,
            reset: NoResetPin,
            address: address as u8,
            mode: AcquisitionMode::OneShot,
            last_measurement: None,
            limits: None,
        }
    }
}

impl<I2C, D, RST, E> Sht3x<I2C, D, RST>
where
    I2C: I2c<Error = E>,
    RST: OutputPin,
{
    /// Creates a new instance of the SHT3x driver with a hardware reset pin.
    ///
    /// The reset line is active low; it is driven to its idle high level here.
    pub fn with_reset_pin(
        i2c: I2C,
        delay: D,
        address: Address,
        mut reset: RST,
    ) -> Result<Self, Sht3xError<E>> {
        reset
            .set_high()
            .map_err(|e| Sht3xError::PinError(e.kind()))?;

        Ok(Sht3x {
            i2c,
            delay,
            reset,
            address: address as u8,
            mode: AcquisitionMode::OneShot,
            last_measurement: None,
            limits: None,
        })
    }
}

impl<I2C, D, RST> Sht3x<I2C, D, RST> {
    /// Releases the bus, delay and reset pin.
    pub fn release(self) -> (I2C, D, RST) {
        (self.i2c, self.delay, self.reset)
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn mode(&self) -> AcquisitionMode {
        self.mode
    }

    /// The last successful measurement, if any.
    pub fn last_measurement(&self) -> Option<Measurement> {
        self.last_measurement
    }

    /// The limits stored by the last `measure_*_limit_*` call, if they were
    /// read in `unit`.
    pub fn cached_limits(&self, unit: LimitUnit) -> Option<LimitThresholds> {
        match self.limits {
            Some((cached, limits)) if cached == unit => Some(limits),
            _ => None,
        }
    }

    fn cached_limit(&self, unit: LimitUnit, slot: LimitSlot) -> Option<f32> {
        self.cached_limits(unit).map(|limits| limits.get(slot))
    }

    pub fn temperature_high_set_c(&self) -> Option<f32> {
        self.cached_limit(LimitUnit::Celsius, LimitSlot::HighSet)
    }

    pub fn temperature_high_clear_c(&self) -> Option<f32> {
        self.cached_limit(LimitUnit::Celsius, LimitSlot::HighClear)
    }

    pub fn temperature_low_clear_c(&self) -> Option<f32> {
        self.cached_limit(LimitUnit::Celsius, LimitSlot::LowClear)
    }

    pub fn temperature_low_set_c(&self) -> Option<f32> {
        self.cached_limit(LimitUnit::Celsius, LimitSlot::LowSet)
    }

    pub fn temperature_high_set_f(&self) -> Option<f32> {
        self.cached_limit(LimitUnit::Fahrenheit, LimitSlot::HighSet)
    }

    pub fn temperature_high_clear_f(&self) -> Option<f32> {
        self.cached_limit(LimitUnit::Fahrenheit, LimitSlot::HighClear)
    }

    pub fn temperature_low_clear_f(&self) -> Option<f32> {
        self.cached_limit(LimitUnit::Fahrenheit, LimitSlot::LowClear)
    }

    pub fn temperature_low_set_f(&self) -> Option<f32> {
        self.cached_limit(LimitUnit::Fahrenheit, LimitSlot::LowSet)
    }

    pub fn humidity_high_set_rh(&self) -> Option<f32> {
        self.cached_limit(LimitUnit::RelativeHumidity, LimitSlot::HighSet)
    }

    pub fn humidity_high_clear_rh(&self) -> Option<f32> {
        self.cached_limit(LimitUnit::RelativeHumidity, LimitSlot::HighClear)
    }

    pub fn humidity_low_clear_rh(&self) -> Option<f32> {
        self.cached_limit(LimitUnit::RelativeHumidity, LimitSlot::LowClear)
    }

    pub fn humidity_low_set_rh(&self) -> Option<f32> {
        self.cached_limit(LimitUnit::RelativeHumidity, LimitSlot::LowSet)
    }
}

impl<I2C, D, RST, E> Sht3x<I2C, D, RST>
where
    I2C: I2c<Error = E>,
    D: DelayNs,
{
    /// Probes the sensor by reading its serial number.
    ///
    /// # Returns
    ///
    /// * `Ok(u32)` with the serial number if the sensor answered.
    /// * `Err(Sht3xError::NotDetected)` if the answer failed its CRC or was zero.
    pub fn begin(&mut self) -> Result<u32, Sht3xError<E>> {
        match self.read_serial_number() {
            Ok(0) | Err(Sht3xError::CrcMismatch) => {
                warn!("SHT3x did not answer the serial number probe");
                Err(Sht3xError::NotDetected)
            }
            other => other,
        }
    }

    /// Reads the 32-bit serial number of the chip.
    pub fn read_serial_number(&mut self) -> Result<u32, Sht3xError<E>> {
        self.send_command(Command::ReadSerialNumber)?;
        self.delay.delay_ms(COMMAND_DELAY_MS);
        let [high, low] = self.read_words::<2>()?;
        Ok(((high as u32) << 16) | low as u32)
    }

    /// Resets the sensor with the soft reset command.
    ///
    /// The sensor comes back in single-shot mode with the heater off.
    pub fn soft_reset(&mut self) -> Result<(), Sht3xError<E>> {
        self.send_command(Command::SoftReset)?;
        self.delay.delay_ms(COMMAND_DELAY_MS);
        self.confirm_command()?;
        debug!("SHT3x soft reset");
        self.mode = AcquisitionMode::OneShot;
        Ok(())
    }

    /// Sets all alert flags in the status register back to zero.
    ///
    /// The ALERT pin only re-arms after the pending alert flag is cleared.
    pub fn clear_status_register(&mut self) -> Result<(), Sht3xError<E>> {
        self.send_command(Command::ClearStatus)?;
        self.delay.delay_ms(CLEAR_STATUS_DELAY_MS);
        Ok(())
    }

    /// Reads the status register.
    ///
    /// The command/read cycle is retried until the CRC matches, up to ten
    /// times. `Err(Sht3xError::CrcMismatch)` is returned if every attempt fails.
    pub fn read_status_register(&mut self) -> Result<StatusRegister, Sht3xError<E>> {
        for attempt in 1..=STATUS_READ_ATTEMPTS {
            self.send_command(Command::ReadStatus)?;
            self.delay.delay_ms(COMMAND_DELAY_MS);
            match self.read_words::<1>() {
                Ok([raw]) => return Ok(StatusRegister::from_raw(raw)),
                Err(Sht3xError::CrcMismatch) => {
                    warn!("status register CRC mismatch, attempt {}", attempt);
                }
                Err(e) => return Err(e),
            }
        }
        Err(Sht3xError::CrcMismatch)
    }

    /// Returns `true` if the status register reports a temperature or
    /// humidity alert, which is what drives the ALERT pin.
    pub fn read_alert_state(&mut self) -> Result<bool, Sht3xError<E>> {
        self.delay.delay_ms(COMMAND_DELAY_MS);
        Ok(self.read_status_register()?.any_alert())
    }

    /// Turns on the internal heater.
    ///
    /// Only meant to evaporate condensation; readings are offset while it runs.
    pub fn heater_enable(&mut self) -> Result<(), Sht3xError<E>> {
        self.set_heater(Command::HeaterEnable, true)
    }

    /// Turns off the internal heater.
    pub fn heater_disable(&mut self) -> Result<(), Sht3xError<E>> {
        self.set_heater(Command::HeaterDisable, false)
    }

    fn set_heater(&mut self, command: Command, on: bool) -> Result<(), Sht3xError<E>> {
        self.send_command(command)?;
        self.delay.delay_ms(COMMAND_DELAY_MS);
        if self.read_status_register()?.heater_on() == on {
            Ok(())
        } else {
            Err(Sht3xError::CommandFailed)
        }
    }

    /// Enters periodic acquisition mode.
    ///
    /// The sensor then samples at `frequency` until [`Self::stop_periodic_mode`]
    /// or a reset. Alerts are only evaluated by the sensor in this mode.
    pub fn start_periodic_mode(
        &mut self,
        frequency: Frequency,
        repeatability: Repeatability,
    ) -> Result<(), Sht3xError<E>> {
        self.mode = AcquisitionMode::Periodic {
            frequency,
            repeatability,
        };
        debug!("SHT3x periodic mode {:?} {:?}", frequency, repeatability);
        self.send_command(Command::StartPeriodic(frequency, repeatability))?;
        self.delay.delay_ms(COMMAND_DELAY_MS);
        self.confirm_command()
    }

    /// Leaves periodic acquisition mode.
    pub fn stop_periodic_mode(&mut self) -> Result<(), Sht3xError<E>> {
        self.mode = AcquisitionMode::OneShot;
        debug!("SHT3x one-shot mode");
        self.send_command(Command::StopPeriodic)?;
        self.delay.delay_ms(COMMAND_DELAY_MS);
        self.confirm_command()
    }

    /// Triggers a single-shot measurement and polls for the result.
    ///
    /// This ignores the current acquisition mode.
    ///
    /// # Returns
    ///
    /// * `Ok(Measurement)` if both words pass their CRC check.
    /// * `Err(Sht3xError::CrcMismatch)` if either word is corrupted. The
    ///   cached last measurement is left untouched.
    pub fn read_temperature_and_humidity(
        &mut self,
        repeatability: Repeatability,
    ) -> Result<Measurement, Sht3xError<E>> {
        self.send_command(Command::SingleShot(repeatability))?;
        self.delay.delay_ms(MEASUREMENT_DELAY_MS);
        self.read_measurement()
    }

    /// Triggers a single-shot measurement with clock stretching.
    ///
    /// The read follows the command immediately; the sensor holds SCL low
    /// until the conversion is done.
    pub fn read_temperature_and_humidity_stretched(
        &mut self,
        repeatability: Repeatability,
    ) -> Result<Measurement, Sht3xError<E>> {
        self.send_command(Command::SingleShotStretched(repeatability))?;
        self.read_measurement()
    }

    /// Fetches the latest result of periodic acquisition mode.
    ///
    /// No conversion delay is applied; the sensor is expected to already hold
    /// a result.
    pub fn fetch_periodic_measurement(&mut self) -> Result<Measurement, Sht3xError<E>> {
        self.send_command(Command::FetchData)?;
        self.read_measurement()
    }

    /// Acquires a fresh measurement the way the current mode requires: a high
    /// repeatability single-shot in one-shot mode, a fetch in periodic mode.
    pub fn measure(&mut self) -> Result<Measurement, Sht3xError<E>> {
        match self.mode {
            AcquisitionMode::OneShot => self.read_temperature_and_humidity(Repeatability::High),
            AcquisitionMode::Periodic { .. } => self.fetch_periodic_measurement(),
        }
    }

    /// Measures and returns the temperature in degrees Celsius.
    pub fn read_temperature_c(&mut self) -> Result<f32, Sht3xError<E>> {
        Ok(self.measure()?.temperature_c)
    }

    /// Measures and returns the temperature in degrees Fahrenheit.
    pub fn read_temperature_f(&mut self) -> Result<f32, Sht3xError<E>> {
        Ok(self.measure()?.temperature_f)
    }

    /// Measures and returns the relative humidity in percent.
    pub fn read_humidity_rh(&mut self) -> Result<f32, Sht3xError<E>> {
        Ok(self.measure()?.humidity_rh)
    }

    /// Programs the temperature alert thresholds, in degrees Celsius.
    ///
    /// Each slot is read back first so its humidity field is preserved.
    /// The four slots are written one after another: if a read fails with
    /// `Sht3xError::LimitIo`, the slots before it keep their new value.
    pub fn set_temperature_limit_c(
        &mut self,
        thresholds: LimitThresholds,
    ) -> Result<(), Sht3xError<E>> {
        if !thresholds.is_ordered() {
            return Err(Sht3xError::InvalidOrdering);
        }
        if !thresholds.within(TEMPERATURE_RANGE_C) {
            return Err(Sht3xError::OutOfRange);
        }
        self.write_limits(&thresholds, limits::merge_temperature)
    }

    /// Programs the temperature alert thresholds, in degrees Fahrenheit.
    pub fn set_temperature_limit_f(
        &mut self,
        thresholds: LimitThresholds,
    ) -> Result<(), Sht3xError<E>> {
        self.set_temperature_limit_c(thresholds.map(fahrenheit_to_celsius))
    }

    /// Programs the humidity alert thresholds, in percent relative humidity.
    ///
    /// Same sequencing as [`Self::set_temperature_limit_c`].
    pub fn set_humidity_limit_rh(
        &mut self,
        thresholds: LimitThresholds,
    ) -> Result<(), Sht3xError<E>> {
        if !thresholds.is_ordered() {
            return Err(Sht3xError::InvalidOrdering);
        }
        if !thresholds.within(HUMIDITY_RANGE_RH) {
            return Err(Sht3xError::OutOfRange);
        }
        self.write_limits(&thresholds, limits::merge_humidity)
    }

    /// Reads the temperature alert thresholds in degrees Celsius, rounded to
    /// whole degrees, and caches them.
    pub fn measure_temperature_limit_c(&mut self) -> Result<LimitThresholds, Sht3xError<E>> {
        self.read_limits(LimitUnit::Celsius, limits::read_back_c)
    }

    /// Reads the temperature alert thresholds in degrees Fahrenheit, rounded
    /// to whole degrees, and caches them.
    pub fn measure_temperature_limit_f(&mut self) -> Result<LimitThresholds, Sht3xError<E>> {
        self.read_limits(LimitUnit::Fahrenheit, limits::read_back_f)
    }

    /// Reads the humidity alert thresholds in percent relative humidity,
    /// rounded to whole percent, and caches them.
    pub fn measure_humidity_limit_rh(&mut self) -> Result<LimitThresholds, Sht3xError<E>> {
        self.read_limits(LimitUnit::RelativeHumidity, limits::read_back_rh)
    }

    /// Classifies the current readings against the programmed thresholds.
    ///
    /// Reads the status register, takes a fresh measurement and reads both
    /// sets of limits. The humidity limits are left in the cache.
    pub fn environment_state(&mut self) -> Result<EnvironmentState, Sht3xError<E>> {
        self.delay.delay_ms(COMMAND_DELAY_MS);
        let status = self.read_status_register()?;
        let measurement = self.measure()?;
        let temperature_limits = self.measure_temperature_limit_c()?;
        let humidity_limits = self.measure_humidity_limit_rh()?;

        Ok(EnvironmentState::evaluate(
            status,
            &measurement,
            &temperature_limits,
            &humidity_limits,
        ))
    }

    /// Writes a command opcode to the sensor. No response is read.
    fn send_command(&mut self, command: Command) -> Result<(), Sht3xError<E>> {
        trace!("SHT3x command {:#x}", command.code());
        self.i2c.write(self.address, &command.to_bytes())?;
        Ok(())
    }

    /// Reads `N` words, each followed by its CRC byte.
    ///
    /// Fails with `Sht3xError::CrcMismatch` if any word is corrupted; no word
    /// of a failed frame is returned.
    fn read_words<const N: usize>(&mut self) -> Result<[u16; N], Sht3xError<E>> {
        let mut buf = [0u8; MAX_FRAME_LEN];
        let frame = &mut buf[..N * WORD_LEN];
        self.i2c.read(self.address, frame)?;

        let mut words = [0u16; N];
        for (word, group) in words.iter_mut().zip(frame.chunks_exact(WORD_LEN)) {
            *word = verify_word(group).ok_or_else(|| {
                warn!("SHT3x CRC mismatch");
                Sht3xError::CrcMismatch
            })?;
        }
        Ok(words)
    }

    fn read_measurement(&mut self) -> Result<Measurement, Sht3xError<E>> {
        let [raw_temperature, raw_humidity] = self.read_words::<2>()?;
        let measurement = Measurement::from_raw(raw_temperature, raw_humidity);
        self.last_measurement = Some(measurement);
        Ok(measurement)
    }

    /// Fails with `Sht3xError::CommandFailed` if the status register flags the
    /// last command as not processed.
    fn confirm_command(&mut self) -> Result<(), Sht3xError<E>> {
        if self.read_status_register()?.command_failed() {
            Err(Sht3xError::CommandFailed)
        } else {
            Ok(())
        }
    }

    fn read_limit_word(&mut self, slot: LimitSlot) -> Result<u16, Sht3xError<E>> {
        self.send_command(Command::ReadLimit(slot))?;
        match self.read_words::<1>() {
            Ok([word]) => Ok(word),
            Err(Sht3xError::CrcMismatch) => Err(Sht3xError::LimitIo(slot)),
            Err(e) => Err(e),
        }
    }

    fn write_limit_word(&mut self, slot: LimitSlot, word: u16) -> Result<(), Sht3xError<E>> {
        let [cmd_msb, cmd_lsb] = Command::WriteLimit(slot).to_bytes();
        let [msb, lsb] = word.to_be_bytes();
        let crc = crc8(&[msb, lsb]);
        trace!("SHT3x limit {:?} <- {:#x}", slot, word);
        self.i2c
            .write(self.address, &[cmd_msb, cmd_lsb, msb, lsb, crc])?;
        Ok(())
    }

    fn write_limits(
        &mut self,
        thresholds: &LimitThresholds,
        merge: fn(u16, f32) -> u16,
    ) -> Result<(), Sht3xError<E>> {
        for slot in LimitSlot::ALL {
            let current = self.read_limit_word(slot)?;
            self.write_limit_word(slot, merge(current, thresholds.get(slot)))?;
        }
        Ok(())
    }

    fn read_limits(
        &mut self,
        unit: LimitUnit,
        decode: fn(u16) -> f32,
    ) -> Result<LimitThresholds, Sht3xError<E>> {
        let mut thresholds = LimitThresholds::default();
        for slot in LimitSlot::ALL {
            thresholds.set(slot, decode(self.read_limit_word(slot)?));
        }
        self.limits = Some((unit, thresholds));
        Ok(thresholds)
    }
}

impl<I2C, D, RST, E> Sht3x<I2C, D, RST>
where
    I2C: I2c<Error = E>,
    D: DelayNs,
    RST: OutputPin,
{
    /// Resets the sensor through its reset pin.
    ///
    /// The status register is cleared first, so a set reset-detected flag
    /// afterwards confirms the reset took place.
    pub fn pin_reset(&mut self) -> Result<(), Sht3xError<E>> {
        self.clear_status_register()?;
        self.reset
            .set_low()
            .map_err(|e| Sht3xError::PinError(e.kind()))?;
        self.delay.delay_ms(1);
        self.reset
            .set_high()
            .map_err(|e| Sht3xError::PinError(e.kind()))?;
        // Back to idle after the reset pulse
        self.delay.delay_ms(1);

        if self.read_status_register()?.reset_detected() {
            debug!("SHT3x pin reset");
            self.mode = AcquisitionMode::OneShot;
            Ok(())
        } else {
            Err(Sht3xError::ResetNotDetected)
        }
    }
}
