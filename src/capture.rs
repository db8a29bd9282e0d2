//! Start sequence and pulse width capture.
//!
//! After the start signal, the sensor acknowledges with an ~80us low pulse
//! followed by an ~80us high pulse, then sends 40 bits. Each bit is a ~50us
//! low separator followed by a high pulse whose width encodes the bit value.
//! Every wait is bounded; a capture either yields all 40 widths or fails.

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
};

use crate::clock::Clock;
use crate::config::DhtConfig;
use crate::error::DhtError;
use crate::sensor_type::SensorType;

/// Number of data bits in a frame.
pub const PULSE_COUNT: usize = 40;

/// Measures the sensor's pulses on a borrowed line.
pub struct PulseCapture<'a, L, C> {
    line: &'a mut L,
    clock: &'a mut C,
    ack_timeout_us: u32,
    bit_timeout_us: u32,
}

impl<'a, L, C, E> PulseCapture<'a, L, C>
where
    L: InputPin<Error = E> + OutputPin<Error = E>,
    C: Clock,
{
    /// Borrows the line and clock for one attempt, taking the timeouts from `config`.
    pub fn new(line: &'a mut L, clock: &'a mut C, config: &DhtConfig) -> Self {
        PulseCapture {
            line,
            clock,
            ack_timeout_us: config.ack_timeout_us,
            bit_timeout_us: config.bit_timeout_us,
        }
    }

    /// Pulls the line low for the sensor's start duration, then releases it.
    ///
    /// Releasing (`set_high`) lets the pull-up float the line high and hands
    /// it over to the sensor.
    pub fn send_start<D: DelayNs>(
        &mut self,
        delay: &mut D,
        sensor_type: SensorType,
    ) -> Result<(), DhtError<E>> {
        self.line.set_low()?;
        delay.delay_ms(sensor_type.start_signal_ms());
        self.line.set_high()?;
        Ok(())
    }

    /// Waits for the sensor's 80us low and 80us high response.
    pub fn await_ack(&mut self) -> Result<(), DhtError<E>> {
        let timeout = self.ack_timeout_us;
        self.wait_for_low(timeout, || DhtError::AckTimeout)?; // 80us
        self.wait_for_high(timeout, || DhtError::AckTimeout)?; // 80us
        Ok(())
    }

    /// Captures the high pulse width of all 40 bits, in transmission order.
    pub fn capture_pulses(&mut self) -> Result<[u32; PULSE_COUNT], DhtError<E>> {
        let mut pulses = [0; PULSE_COUNT];

        for (bit, pulse) in (0u8..).zip(pulses.iter_mut()) {
            *pulse = self.read_pulse(bit)?;
        }

        Ok(pulses)
    }

    /// Measures one bit's high pulse in microseconds.
    fn read_pulse(&mut self, bit: u8) -> Result<u32, DhtError<E>> {
        let timeout = self.bit_timeout_us;
        let on_timeout = || DhtError::BitTimeout { bit };

        // Start of the ~50us separator
        self.wait_for_low(timeout, on_timeout)?;
        // Start of the data pulse
        self.wait_for_high(timeout, on_timeout)?;
        // End of the data pulse
        self.wait_for_low(timeout, on_timeout)
    }

    /// Waits until the data line goes high, returning the elapsed microseconds.
    fn wait_for_high<F>(&mut self, timeout_us: u32, on_timeout: F) -> Result<u32, DhtError<E>>
    where
        F: FnOnce() -> DhtError<E>,
    {
        Self::wait_for_state(self.clock, timeout_us, on_timeout, || self.line.is_high())
    }

    /// Waits until the data line goes low, returning the elapsed microseconds.
    fn wait_for_low<F>(&mut self, timeout_us: u32, on_timeout: F) -> Result<u32, DhtError<E>>
    where
        F: FnOnce() -> DhtError<E>,
    {
        Self::wait_for_state(self.clock, timeout_us, on_timeout, || self.line.is_low())
    }

    /// Polls a pin condition until it holds or `timeout_us` is exceeded.
    ///
    /// # Errors
    ///
    /// Returns the error built by `on_timeout` if the timeout is exceeded
    fn wait_for_state<F, T>(
        clock: &mut C,
        timeout_us: u32,
        on_timeout: T,
        mut condition: F,
    ) -> Result<u32, DhtError<E>>
    where
        F: FnMut() -> Result<bool, E>,
        T: FnOnce() -> DhtError<E>,
    {
        let start = clock.now_us();
        loop {
            let satisfied = condition()?;
            let elapsed = u32::try_from(clock.now_us().saturating_sub(start)).unwrap_or(u32::MAX);
            if satisfied {
                return Ok(elapsed);
            }
            if elapsed > timeout_us {
                return Err(on_timeout());
            }
        }
    }
}
