//! Sensor model selection.

use core::fmt;
use core::str::FromStr;

/// Supported sensor models.
///
/// Both models share the same wire protocol and bit timing. They differ in
/// the start signal length, the minimum interval between reads and the way
/// the data bytes are converted into physical values.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SensorType {
    /// DHT11: integer-resolution humidity and temperature.
    Dht11,
    /// DHT22 (AM2302): 0.1 resolution, signed temperature.
    Dht22,
}

impl SensorType {
    /// How long the host holds the line low to request a reading.
    pub const fn start_signal_ms(self) -> u32 {
        match self {
            SensorType::Dht11 => 20,
            SensorType::Dht22 => 18,
        }
    }

    /// Minimum time between two reads, as mandated by the datasheets.
    pub const fn min_interval_ms(self) -> u32 {
        match self {
            SensorType::Dht11 => 1_000,
            SensorType::Dht22 => 2_000,
        }
    }

    /// Upper-case model name, as accepted by `FromStr`.
    pub const fn name(self) -> &'static str {
        match self {
            SensorType::Dht11 => "DHT11",
            SensorType::Dht22 => "DHT22",
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when parsing a sensor name other than `DHT11` or `DHT22`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnknownSensorType;

impl fmt::Display for UnknownSensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unsupported DHT sensor type, expected DHT11 or DHT22")
    }
}

impl core::error::Error for UnknownSensorType {}

impl FromStr for SensorType {
    type Err = UnknownSensorType;

    /// Parses a sensor name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("DHT11") {
            Ok(SensorType::Dht11)
        } else if s.eq_ignore_ascii_case("DHT22") {
            Ok(SensorType::Dht22)
        } else {
            Err(UnknownSensorType)
        }
    }
}
