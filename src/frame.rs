//! Bit decoding, frame assembly and checksum validation.

use crate::capture::PULSE_COUNT;

/// High pulses longer than this (microseconds) are ones, the rest are zeros.
///
/// A zero is sent as a ~26-28us high pulse and a one as a ~70us high pulse,
/// for every supported sensor.
pub const BIT_THRESHOLD_US: u32 = 50;

/// Number of bytes in a frame.
pub const FRAME_LEN: usize = 5;

/// Decodes one data bit from the width of its high pulse.
pub const fn decode_bit(high_us: u32) -> bool {
    high_us > BIT_THRESHOLD_US
}

/// Decodes every captured pulse, keeping transmission order.
pub fn decode_bits(pulses: &[u32; PULSE_COUNT]) -> [bool; PULSE_COUNT] {
    (*pulses).map(decode_bit)
}

/// The five bytes sent by the sensor, in transmission order.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawFrame([u8; FRAME_LEN]);

/// The checksum byte did not match the data bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChecksumMismatch {
    /// Low 8 bits of the sum of the four data bytes.
    pub expected: u8,
    /// Checksum byte sent by the sensor.
    pub received: u8,
}

impl RawFrame {
    /// Wraps already assembled bytes.
    pub const fn new(bytes: [u8; FRAME_LEN]) -> Self {
        RawFrame(bytes)
    }

    /// Packs 40 bits into 5 bytes, most significant bit first.
    pub fn from_bits(bits: &[bool; PULSE_COUNT]) -> Self {
        let mut bytes = [0u8; FRAME_LEN];

        for (byte, chunk) in bytes.iter_mut().zip(bits.chunks_exact(8)) {
            *byte = chunk
                .iter()
                .fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit));
        }

        RawFrame(bytes)
    }

    /// Decodes and packs captured high pulse widths.
    pub fn from_pulses(pulses: &[u32; PULSE_COUNT]) -> Self {
        Self::from_bits(&decode_bits(pulses))
    }

    /// All five bytes in wire order, checksum last.
    pub const fn bytes(&self) -> [u8; FRAME_LEN] {
        self.0
    }

    /// Byte 0: humidity integer part (DHT11) or high byte (DHT22).
    pub const fn humidity_high(&self) -> u8 {
        self.0[0]
    }

    /// Byte 1.
    pub const fn humidity_low(&self) -> u8 {
        self.0[1]
    }

    /// Byte 2, sign bit included for DHT22.
    pub const fn temperature_high(&self) -> u8 {
        self.0[2]
    }

    /// Byte 3.
    pub const fn temperature_low(&self) -> u8 {
        self.0[3]
    }

    /// Checksum byte as received.
    pub const fn checksum(&self) -> u8 {
        self.0[4]
    }

    /// Low 8 bits of the sum of the four data bytes.
    pub fn expected_checksum(&self) -> u8 {
        self.0[..4].iter().fold(0u8, |sum, v| sum.wrapping_add(*v))
    }

    /// Checks the received checksum against the data bytes.
    pub fn validate(&self) -> Result<(), ChecksumMismatch> {
        let expected = self.expected_checksum();
        if expected == self.checksum() {
            Ok(())
        } else {
            Err(ChecksumMismatch {
                expected,
                received: self.checksum(),
            })
        }
    }
}
