//! Error types.

use core::fmt;

use crate::reading::Reading;

/// Possible errors from a DHT read attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum DhtError<E> {
    /// The sensor did not acknowledge the start signal in time.
    AckTimeout,
    /// Timed out waiting for a pin state change while receiving data bit `bit` (0-39).
    BitTimeout {
        /// Index of the bit being received, in transmission order.
        bit: u8,
    },
    /// Checksum did not match the received data.
    ChecksumMismatch {
        /// Low 8 bits of the sum of the four data bytes.
        expected: u8,
        /// Checksum byte sent by the sensor.
        received: u8,
    },
    /// A read was requested before the minimum interval since the last attempt elapsed.
    /// The line was not touched.
    TooSoon {
        /// Microseconds left until the next attempt is allowed.
        remaining_us: u64,
    },
    /// Error from the GPIO pin (input/output).
    PinError(E),
}

/// Terminal outcome of one read attempt.
pub type ReadOutcome<E> = Result<Reading, DhtError<E>>;

impl<E> DhtError<E> {
    /// Whether waiting for the minimum interval and trying again may succeed.
    ///
    /// Protocol failures are transient; pin errors usually are not.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::PinError(_))
    }
}

impl<E> From<E> for DhtError<E> {
    fn from(value: E) -> Self {
        Self::PinError(value)
    }
}

impl<E: fmt::Debug> fmt::Display for DhtError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AckTimeout => f.write_str("sensor did not respond to the start signal"),
            Self::BitTimeout { bit } => write!(f, "timed out receiving bit {bit} of 40"),
            Self::ChecksumMismatch { expected, received } => write!(
                f,
                "invalid checksum: expected {expected:#04x}, received {received:#04x}"
            ),
            Self::TooSoon { remaining_us } => write!(
                f,
                "read attempted too soon, retry in {} ms",
                remaining_us.div_ceil(1000)
            ),
            Self::PinError(e) => write!(f, "pin error: {e:?}"),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for DhtError<E> {}
