//! Periodically reads a DHT11 or DHT22 sensor on a Linux GPIO line.
//!
//! ```text
//! dht-reader <DHT11|DHT22> <chip_path> <line_offset> <reading_delay_seconds>
//! ```
//!
//! Each successful reading is printed to stdout as
//! `Humidity: 60.1% Temperature: 22.4°C 72.3°F`. Failed readings are reported
//! on stderr through the log and the next reading is attempted after the configured delay.

mod cli;
mod line;

use std::thread;

use anyhow::Context;
use clap::Parser;
use dht_reader::{Dht, DhtError, Reading, StdClock};
use linux_embedded_hal::Delay;
use log::{Level, info, log};

use cli::{Args, Settings};
use line::GpioLine;

fn main() -> anyhow::Result<()> {
    let settings = Settings::try_from(Args::parse())?;

    simple_logging::log_to_stderr(settings.log_level);

    let mut line = GpioLine::open(
        &settings.chip_path,
        settings.line_offset,
        settings.sensor_type.name(),
    )
    .with_context(|| format!("failed to set up {}", settings.sensor_type))?;

    info!(
        "reading {} on {} line {} every {:?}",
        settings.sensor_type,
        settings.chip_path.display(),
        settings.line_offset,
        settings.reading_delay
    );

    let mut dht = Dht::new(settings.sensor_type, Delay, StdClock::new());

    loop {
        match dht.read(&mut line) {
            Ok(reading) => println!("{}", format_reading(&reading, settings.celsius_only)),
            Err(e) => log!(failure_level(&e), "{} reading failed: {e}", settings.sensor_type),
        }

        thread::sleep(settings.reading_delay);
    }
}

fn format_reading(reading: &Reading, celsius_only: bool) -> String {
    if celsius_only {
        format!(
            "Humidity: {:.1}% Temperature: {:.1}°C",
            reading.relative_humidity, reading.temperature
        )
    } else {
        reading.to_string()
    }
}

/// Protocol failures are expected now and then, pin errors point at the setup.
fn failure_level<E>(error: &DhtError<E>) -> Level {
    if error.is_retryable() {
        Level::Warn
    } else {
        Level::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_level() {
        assert_eq!(failure_level(&DhtError::<()>::AckTimeout), Level::Warn);
        assert_eq!(failure_level(&DhtError::<()>::BitTimeout { bit: 12 }), Level::Warn);
        assert_eq!(
            failure_level(&DhtError::<()>::ChecksumMismatch {
                expected: 0x87,
                received: 0x81,
            }),
            Level::Warn
        );
        assert_eq!(
            failure_level(&DhtError::<()>::TooSoon { remaining_us: 5 }),
            Level::Warn
        );
        assert_eq!(failure_level(&DhtError::PinError(())), Level::Error);
    }

    #[test]
    fn test_format_reading() {
        let reading = Reading {
            relative_humidity: 60.1,
            temperature: 22.4,
        };
        assert_eq!(
            format_reading(&reading, false),
            "Humidity: 60.1% Temperature: 22.4°C 72.3°F"
        );
        assert_eq!(
            format_reading(&reading, true),
            "Humidity: 60.1% Temperature: 22.4°C"
        );
    }
}
