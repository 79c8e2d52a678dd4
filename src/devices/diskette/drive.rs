//! Apple II disk drive: stepper-motor phase tracking and track-reader
//! hand-off to the inserted image (or a noise reader when empty).
//!
//! Ported from `retro/emu/device/diskette/drive.go`.

use super::image::Image;
use super::reader::TrackReader;

const P0: u8 = 0;
const P1: u8 = 1;
const P2: u8 = 2;
const P3: u8 = 3;

/// `(this, last, moves_inward)` — maps a phase transition to a stepper
/// direction. Outward transitions move toward track 0 (outermost); inward
/// transitions move toward track 34.
const PHASE_TRANSITIONS: [(u8, u8, bool); 8] = [
    (P0, P1, false),
    (P1, P2, false),
    (P2, P3, false),
    (P3, P0, false),
    (P0, P3, true),
    (P1, P0, true),
    (P2, P1, true),
    (P3, P2, true),
];

pub struct Drive {
    image: Option<Image>,
    noise: TrackReader,
    phase: [u8; 2],
    motor: bool,
}

impl Drive {
    pub fn new() -> Self {
        Self {
            image: None,
            noise: TrackReader::new(vec![0x44, 0x54, 0x47, 0x00]),
            phase: [0xFF, 0xFF],
            motor: false,
        }
    }

    pub fn insert(&mut self, image: Image) {
        self.image = Some(image);
    }

    pub fn eject(&mut self) {
        self.image = None;
    }

    pub fn motor_on(&self) -> bool {
        self.motor
    }

    /// Turns the drive motor on/off and resets the stepper's phase history
    /// to the sentinel value, matching a freshly powered-up drive.
    pub fn motor(&mut self, state: bool) {
        self.phase = [0xFF, 0xFF];
        self.motor = state;
    }

    /// Updates stepper state for a phase-line transition. A no-op unless
    /// an image is loaded and `state` is an ON event — matching phase-OFF
    /// events never touching head position.
    pub fn phase(&mut self, phase: u8, state: bool) {
        let Some(image) = self.image.as_mut() else {
            return;
        };
        if !state {
            return;
        }

        self.phase[1] = self.phase[0];
        self.phase[0] = phase & 0x03;

        for &(this, last, inward) in PHASE_TRANSITIONS.iter() {
            if self.phase[0] == this && self.phase[1] == last {
                if inward {
                    image.half_track_in();
                } else {
                    image.half_track_out();
                }
                break;
            }
        }
    }

    pub fn track_reader(&mut self) -> &mut TrackReader {
        match self.image.as_mut() {
            Some(image) => image.track_reader(),
            None => &mut self.noise,
        }
    }
}

impl Default for Drive {
    fn default() -> Self {
        Self::new()
    }
}
