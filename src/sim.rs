//! Simulated sensor for tests.
//!
//! A [`SimLine`], [`SimClock`] and [`SimDelay`] share one virtual timeline.
//! Every pin read costs one microsecond and delays advance time by their
//! length, so busy-polling code sees realistic pulse widths.

use std::cell::Cell;
use std::rc::Rc;
use std::vec::Vec;

use core::convert::Infallible;
use embedded_hal::{
    delay::DelayNs,
    digital::{ErrorType, InputPin, OutputPin},
};

use crate::clock::Clock;

pub const RESPONSE_DELAY_US: u32 = 30;
pub const ACK_US: u32 = 80;
pub const SEPARATOR_US: u32 = 50;
pub const ZERO_HIGH_US: u32 = 27;
pub const ONE_HIGH_US: u32 = 70;

/// Segments sent before the first data bit: response delay, ack low, ack high.
pub const ACK_SEGMENTS: usize = 3;

/// A stretch of constant line level driven by the sensor.
#[derive(Clone, Copy, Debug)]
pub struct Segment {
    pub high: bool,
    pub duration_us: u32,
}

impl Segment {
    pub const fn high(duration_us: u32) -> Self {
        Segment {
            high: true,
            duration_us,
        }
    }

    pub const fn low(duration_us: u32) -> Self {
        Segment {
            high: false,
            duration_us,
        }
    }
}

/// The full response to a start signal for the given frame bytes.
pub fn frame_waveform(bytes: &[u8; 5]) -> Vec<Segment> {
    let mut waveform = vec![
        Segment::high(RESPONSE_DELAY_US),
        Segment::low(ACK_US),
        Segment::high(ACK_US),
    ];

    for i in 0..40 {
        let bit = (bytes[i / 8] >> (7 - i % 8)) & 1;
        waveform.push(Segment::low(SEPARATOR_US));
        waveform.push(Segment::high(if bit == 1 { ONE_HIGH_US } else { ZERO_HIGH_US }));
    }

    // Sensor pulls low once more, then releases the line
    waveform.push(Segment::low(SEPARATOR_US));
    waveform
}

/// A line with a sensor attached, a clock and a delay on a fresh timeline.
pub fn setup(waveform: Vec<Segment>) -> (SimLine, SimClock, SimDelay) {
    let now = Rc::new(Cell::new(0));
    let line = SimLine {
        now: now.clone(),
        waveform,
        driven_low: false,
        released_at: None,
        writes: 0,
        reads: 0,
    };
    (line, SimClock { now: now.clone() }, SimDelay { now })
}

/// Open-drain line: `set_low` drives it, `set_high` releases it to the sensor.
///
/// The waveform replays from the start each time the line is released after
/// being driven low. Outside the waveform the pull-up keeps the line high.
pub struct SimLine {
    now: Rc<Cell<u64>>,
    waveform: Vec<Segment>,
    driven_low: bool,
    released_at: Option<u64>,
    pub writes: usize,
    pub reads: usize,
}

impl SimLine {
    /// Starts the waveform immediately, as if a start signal had just ended.
    pub fn release(&mut self) {
        self.driven_low = false;
        self.released_at = Some(self.now.get());
    }

    fn level(&self) -> bool {
        if self.driven_low {
            return false;
        }
        let Some(released_at) = self.released_at else {
            return true;
        };

        let mut t = self.now.get() - released_at;
        for segment in &self.waveform {
            let duration = u64::from(segment.duration_us);
            if t < duration {
                return segment.high;
            }
            t -= duration;
        }
        true
    }
}

impl ErrorType for SimLine {
    type Error = Infallible;
}

impl InputPin for SimLine {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.reads += 1;
        self.now.set(self.now.get() + 1);
        Ok(self.level())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

impl OutputPin for SimLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.writes += 1;
        self.driven_low = true;
        self.released_at = None;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.writes += 1;
        if self.driven_low {
            self.release();
        }
        Ok(())
    }
}

pub struct SimClock {
    now: Rc<Cell<u64>>,
}

impl Clock for SimClock {
    fn now_us(&mut self) -> u64 {
        self.now.get()
    }
}

pub struct SimDelay {
    now: Rc<Cell<u64>>,
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.now.set(self.now.get() + u64::from(ns.div_ceil(1_000)));
    }
}

/// Clock that advances one microsecond on every call.
#[derive(Default)]
pub struct TickClock {
    now: u64,
}

impl Clock for TickClock {
    fn now_us(&mut self) -> u64 {
        self.now += 1;
        self.now
    }
}
