//! Reading orchestration and the read state machine.

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
};

use crate::capture::PulseCapture;
use crate::clock::Clock;
use crate::config::DhtConfig;
use crate::error::{DhtError, ReadOutcome};
use crate::frame::{ChecksumMismatch, RawFrame};
use crate::reading::Reading;
use crate::sensor_type::SensorType;

/// Progress of the most recent read attempt.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// No attempt has been made yet.
    Idle,
    /// Holding the line low for the start signal.
    DrivingStart,
    /// Waiting for the sensor's low/high acknowledgement.
    AwaitingAck,
    /// Measuring the 40 data pulses.
    CapturingBits,
    /// Checking the checksum and converting the frame.
    Validating,
    /// The last attempt produced a reading.
    Success,
    /// The last attempt failed or was rejected.
    Failed,
}

/// Driver for the DHT11 and DHT22 temperature and humidity sensors.
///
/// Performs exactly one protocol attempt per [`read`](Dht::read) call and
/// never retries on its own. Attempts closer together than
/// [`DhtConfig::min_interval_us`] are rejected without touching the line.
pub struct Dht<D, C> {
    sensor_type: SensorType,
    config: DhtConfig,
    delay: D,
    clock: C,
    last_attempt_us: Option<u64>,
    state: State,
}

impl<D, C> Dht<D, C>
where
    D: DelayNs,
    C: Clock,
{
    /// Creates a new driver with the datasheet defaults for `sensor_type`.
    ///
    /// # Arguments
    ///
    /// * `sensor_type` - The sensor model attached to the line.
    /// * `delay` - A delay provider implementing the `DelayNs` trait.
    /// * `clock` - A monotonic microsecond clock.
    pub fn new(sensor_type: SensorType, delay: D, clock: C) -> Self {
        Self::with_config(sensor_type, DhtConfig::for_sensor(sensor_type), delay, clock)
    }

    /// Creates a new driver with custom timing and conversion settings.
    pub fn with_config(sensor_type: SensorType, config: DhtConfig, delay: D, clock: C) -> Self {
        Dht {
            sensor_type,
            config,
            delay,
            clock,
            last_attempt_us: None,
            state: State::Idle,
        }
    }

    /// The sensor model this driver decodes for.
    pub fn sensor_type(&self) -> SensorType {
        self.sensor_type
    }

    /// Timing and conversion settings in use.
    pub fn config(&self) -> &DhtConfig {
        &self.config
    }

    /// State reached by the most recent attempt.
    pub fn state(&self) -> State {
        self.state
    }

    /// Releases the delay provider and the clock.
    pub fn release(self) -> (D, C) {
        (self.delay, self.clock)
    }

    /// Reads a temperature and humidity measurement.
    ///
    /// This method performs the complete communication sequence on `line`:
    /// sending a start signal, waiting for the sensor's response, capturing
    /// 40 pulse widths, validating the checksum, and converting the result.
    /// The line is only borrowed for the duration of the call.
    ///
    /// # Returns
    ///
    /// * `Ok(Reading)` if the read is successful and the checksum is valid.
    /// * `Err(DhtError::TooSoon)` if called before the minimum interval elapsed.
    /// * `Err(DhtError)` if a communication or checksum error occurs.
    pub fn read<L, E>(&mut self, line: &mut L) -> ReadOutcome<E>
    where
        L: InputPin<Error = E> + OutputPin<Error = E>,
    {
        self.state = State::Idle;
        let outcome = self.attempt(line);

        match &outcome {
            Ok(_) => {
                self.state = State::Success;
                trace!("{} read succeeded", self.sensor_type.name());
            }
            Err(DhtError::AckTimeout) => {
                self.state = State::Failed;
                warn!("{} did not acknowledge the start signal", self.sensor_type.name());
            }
            Err(DhtError::BitTimeout { bit }) => {
                self.state = State::Failed;
                warn!("{} timed out at bit {}", self.sensor_type.name(), *bit);
            }
            Err(DhtError::ChecksumMismatch { expected, received }) => {
                self.state = State::Failed;
                warn!("checksum mismatch: expected {}, received {}", *expected, *received);
            }
            Err(DhtError::TooSoon { remaining_us }) => {
                self.state = State::Failed;
                debug!("read rejected, {} us until next attempt", *remaining_us);
            }
            Err(DhtError::PinError(_)) => {
                self.state = State::Failed;
                warn!("{} pin error", self.sensor_type.name());
            }
        }

        outcome
    }

    fn attempt<L, E>(&mut self, line: &mut L) -> ReadOutcome<E>
    where
        L: InputPin<Error = E> + OutputPin<Error = E>,
    {
        let now = self.clock.now_us();
        if let Some(last) = self.last_attempt_us {
            let elapsed = now.saturating_sub(last);
            if elapsed < self.config.min_interval_us {
                return Err(DhtError::TooSoon {
                    remaining_us: self.config.min_interval_us - elapsed,
                });
            }
        }
        self.last_attempt_us = Some(now);

        let mut capture = PulseCapture::new(line, &mut self.clock, &self.config);

        self.state = State::DrivingStart;
        capture.send_start(&mut self.delay, self.sensor_type)?;
        trace!("start signal sent");

        self.state = State::AwaitingAck;
        capture.await_ack()?;
        trace!("sensor acknowledged");

        self.state = State::CapturingBits;
        let pulses = capture.capture_pulses()?;

        self.state = State::Validating;
        let frame = RawFrame::from_pulses(&pulses);
        debug!(
            "frame {} {} {} {} {}",
            frame.humidity_high(),
            frame.humidity_low(),
            frame.temperature_high(),
            frame.temperature_low(),
            frame.checksum()
        );
        frame
            .validate()
            .map_err(|ChecksumMismatch { expected, received }| {
                DhtError::ChecksumMismatch { expected, received }
            })?;

        Ok(Reading::from_frame(
            self.sensor_type,
            &frame,
            self.config.dht11_fraction,
        ))
    }
}
