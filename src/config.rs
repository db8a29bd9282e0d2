//! Tunable timing and conversion settings.

use crate::sensor_type::SensorType;

/// How the DHT11 low bytes (humidity and temperature decimals) are used.
///
/// Most DHT11 revisions send zero in both low bytes, newer ones send tenths.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Dht11Fraction {
    /// Add the low byte as tenths: `high + low / 10`.
    #[default]
    Tenths,
    /// Use the high byte only.
    Ignore,
}

/// Configuration for a [`Dht`](crate::Dht) instance.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DhtConfig {
    /// Minimum time between the start of two read attempts (microseconds)
    pub min_interval_us: u64,
    /// Timeout of each wait while the sensor acknowledges the start signal (microseconds)
    pub ack_timeout_us: u32,
    /// Timeout of each wait while a data bit is received (microseconds)
    pub bit_timeout_us: u32,
    /// DHT11 decimal byte handling, ignored for other sensors
    pub dht11_fraction: Dht11Fraction,
}

impl Default for DhtConfig {
    fn default() -> Self {
        Self::for_sensor(SensorType::Dht22)
    }
}

impl DhtConfig {
    /// Datasheet defaults for the given sensor.
    pub const fn for_sensor(sensor_type: SensorType) -> Self {
        Self {
            min_interval_us: sensor_type.min_interval_ms() as u64 * 1_000,
            ack_timeout_us: 300,
            bit_timeout_us: 200,
            dht11_fraction: Dht11Fraction::Tenths,
        }
    }

    /// Sets the minimum time between read attempts, in milliseconds.
    pub const fn with_min_interval_ms(mut self, ms: u64) -> Self {
        self.min_interval_us = ms * 1_000;
        self
    }

    /// Sets the bound on each acknowledgement wait.
    pub const fn with_ack_timeout_us(mut self, us: u32) -> Self {
        self.ack_timeout_us = us;
        self
    }

    /// Sets the bound on each wait inside a bit.
    pub const fn with_bit_timeout_us(mut self, us: u32) -> Self {
        self.bit_timeout_us = us;
        self
    }

    /// Sets how DHT11 fractional bytes are handled.
    pub const fn with_dht11_fraction(mut self, fraction: Dht11Fraction) -> Self {
        self.dht11_fraction = fraction;
        self
    }
}
