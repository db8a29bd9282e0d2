//! Open-drain style access to a Linux GPIO character device line.

use std::path::Path;

use embedded_hal::digital::{self, ErrorKind, ErrorType, InputPin, OutputPin};
use gpio_cdev::{Chip, Line, LineHandle, LineRequestFlags};
use thiserror::Error;

use crate::cli::ConfigError;

#[derive(Debug, Error)]
#[error("GPIO line error: {0}")]
pub struct LineError(#[from] gpio_cdev::Error);

impl digital::Error for LineError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Input,
    Output,
}

impl Direction {
    fn flags(self) -> LineRequestFlags {
        match self {
            Direction::Input => LineRequestFlags::INPUT,
            Direction::Output => LineRequestFlags::OUTPUT,
        }
    }
}

/// A GPIO line that switches direction on demand.
///
/// `set_low` requests the line as an output driven low, `set_high` requests
/// it as an input so the pull-up floats it high, and `is_high` reads the
/// current level. The character device API cannot change the direction of
/// a held request, so every switch re-requests the line.
pub struct GpioLine {
    line: Line,
    consumer: &'static str,
    handle: Option<LineHandle>,
    direction: Direction,
}

impl GpioLine {
    /// Opens `offset` on the chip at `chip_path` as an input.
    pub fn open(chip_path: &Path, offset: u32, consumer: &'static str) -> Result<Self, ConfigError> {
        let mut chip = Chip::new(chip_path).map_err(|source| ConfigError::Chip {
            path: chip_path.to_path_buf(),
            source,
        })?;

        let lines = chip.num_lines();
        if offset >= lines {
            return Err(ConfigError::InvalidLineOffset {
                offset,
                chip: chip_path.to_path_buf(),
                lines,
            });
        }

        let line_request = |source| ConfigError::LineRequest { offset, source };
        let line = chip.get_line(offset).map_err(line_request)?;
        let handle = line
            .request(LineRequestFlags::INPUT, 0, consumer)
            .map_err(line_request)?;

        Ok(GpioLine {
            line,
            consumer,
            handle: Some(handle),
            direction: Direction::Input,
        })
    }

    fn request(&mut self, direction: Direction, value: u8) -> Result<(), LineError> {
        if self.direction == direction {
            if let Some(handle) = &self.handle {
                if direction == Direction::Output {
                    handle.set_value(value)?;
                }
                return Ok(());
            }
        }

        // The previous request must be released before the line can be requested again
        self.handle = None;
        let handle = self.line.request(direction.flags(), value, self.consumer)?;
        self.handle = Some(handle);
        self.direction = direction;
        Ok(())
    }
}

impl ErrorType for GpioLine {
    type Error = LineError;
}

impl OutputPin for GpioLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.request(Direction::Output, 0)
    }

    /// Releases the line to the pull-up.
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.request(Direction::Input, 0)
    }
}

impl InputPin for GpioLine {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        // Only missing after a failed re-request
        let handle = match self.handle.take() {
            Some(handle) => handle,
            None => {
                self.direction = Direction::Input;
                self.line.request(Direction::Input.flags(), 0, self.consumer)?
            }
        };
        let value = handle.get_value();
        self.handle = Some(handle);
        Ok(value? != 0)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}
