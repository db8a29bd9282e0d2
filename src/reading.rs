//! Physical values decoded from a frame.

use core::fmt;

use crate::config::Dht11Fraction;
use crate::frame::RawFrame;
use crate::sensor_type::SensorType;

/// Reading returned by a DHT sensor.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    /// Temperature in degrees Celsius.
    pub temperature: f32,
    /// Relative humidity in percent.
    pub relative_humidity: f32,
}

impl Reading {
    /// Converts a checksum-valid frame using the formulas of `sensor_type`.
    pub fn from_frame(sensor_type: SensorType, frame: &RawFrame, fraction: Dht11Fraction) -> Self {
        match sensor_type {
            SensorType::Dht11 => parse_dht11(frame, fraction),
            SensorType::Dht22 => parse_dht22(frame),
        }
    }

    /// Temperature in degrees Fahrenheit.
    pub fn temperature_fahrenheit(&self) -> f32 {
        self.temperature * 9.0 / 5.0 + 32.0
    }
}

/// Formats as `Humidity: 60.1% Temperature: 22.4°C 72.3°F`.
impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Humidity: {:.1}% Temperature: {:.1}°C {:.1}°F",
            self.relative_humidity,
            self.temperature,
            self.temperature_fahrenheit()
        )
    }
}

/// DHT11: integer part in the high byte, tenths (on some revisions) in the low byte.
fn parse_dht11(frame: &RawFrame, fraction: Dht11Fraction) -> Reading {
    // Scaled by ten so the result is a single rounding step
    let tenths = |high: u8, low: u8| -> f32 {
        let low = match fraction {
            Dht11Fraction::Tenths => u16::from(low),
            Dht11Fraction::Ignore => 0,
        };
        (u16::from(high) * 10 + low) as f32 / 10.0
    };

    Reading {
        temperature: tenths(frame.temperature_high(), frame.temperature_low()),
        relative_humidity: tenths(frame.humidity_high(), frame.humidity_low()),
    }
}

/// DHT22: 16-bit tenths, temperature in sign-magnitude.
fn parse_dht22(frame: &RawFrame) -> Reading {
    let joined_humidity = u16::from_be_bytes([frame.humidity_high(), frame.humidity_low()]);
    let relative_humidity = joined_humidity as f32 / 10.0;

    let temp_hi = frame.temperature_high();
    let is_temp_negative = (temp_hi >> 7) != 0;
    let joined_temp = u16::from_be_bytes([temp_hi & 0b0111_1111, frame.temperature_low()]);
    let mut temperature = joined_temp as f32 / 10.0;
    if is_temp_negative {
        temperature = -temperature;
    }

    Reading {
        temperature,
        relative_humidity,
    }
}
