use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use dht_reader::{SensorType, UnknownSensorType};
use log::LevelFilter;
use thiserror::Error;

/// Reads a DHT11 or DHT22 sensor attached to a Linux GPIO line.
#[derive(Debug, Parser)]
#[command(name = "dht-reader", version, about)]
pub struct Args {
    /// Sensor model: DHT11 or DHT22
    pub dht_type: String,
    /// Path to the GPIO chip, e.g. /dev/gpiochip0
    pub chip_path: PathBuf,
    /// Offset of the GPIO line connected to the sensor data pin
    pub line_offset: u32,
    /// Delay between sensor readings in seconds
    pub reading_delay_seconds: f64,
    /// Print the temperature in Celsius only
    #[arg(long)]
    pub celsius_only: bool,
    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Fatal errors detected before any reading is attempted.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    UnknownSensorType(#[from] UnknownSensorType),

    #[error("cannot open GPIO chip {path}: {source}")]
    Chip {
        path: PathBuf,
        source: gpio_cdev::Error,
    },

    #[error("line offset {offset} is out of range, {chip} has {lines} lines")]
    InvalidLineOffset {
        offset: u32,
        chip: PathBuf,
        lines: u32,
    },

    #[error("cannot request GPIO line {offset}: {source}")]
    LineRequest {
        offset: u32,
        source: gpio_cdev::Error,
    },

    #[error("reading delay must be a number of at least {min_seconds} seconds for {sensor}, got {got}")]
    InvalidDelay {
        sensor: SensorType,
        min_seconds: f64,
        got: f64,
    },
}

/// Validated command line settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub sensor_type: SensorType,
    pub chip_path: PathBuf,
    pub line_offset: u32,
    pub reading_delay: Duration,
    pub celsius_only: bool,
    pub log_level: LevelFilter,
}

impl TryFrom<Args> for Settings {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let sensor_type: SensorType = args.dht_type.parse()?;

        // The datasheets mandate a pause between reads
        let min_seconds = f64::from(sensor_type.min_interval_ms()) / 1_000.0;
        let delay = args.reading_delay_seconds;
        if !delay.is_finite() || delay < min_seconds {
            return Err(ConfigError::InvalidDelay {
                sensor: sensor_type,
                min_seconds,
                got: delay,
            });
        }

        let log_level = match args.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };

        Ok(Settings {
            sensor_type,
            chip_path: args.chip_path,
            line_offset: args.line_offset,
            reading_delay: Duration::from_secs_f64(delay),
            celsius_only: args.celsius_only,
            log_level,
        })
    }
}
