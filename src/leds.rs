//! # Charlieplexed LEDs
//!
//! The 12 bi-colour note LEDs share 6 pins. Each LED sits between a unique pair of pins, and which of its two colours
//! lights depends on which pin of the pair is driven high. All other pins float so that no other LED sees a voltage.
//!
//! Only one LED is ever lit at a time. Each call to [`LedDriver::step`] lights the next LED in turn (or nothing, if
//! that LED should be dark), and persistence of vision does the rest. The step must be called often enough that the
//! panel doesn't flicker.
//!
//! | LED | pin A | pin B |
//! |-----|-------|-------|
//! | 0   | 1     | 2     |
//! | 1   | 1     | 3     |
//! | 2   | 1     | 4     |
//! | 3   | 2     | 3     |
//! | 4   | 2     | 4     |
//! | 5   | 2     | 5     |
//! | 6   | 3     | 4     |
//! | 7   | 3     | 5     |
//! | 8   | 3     | 6     |
//! | 9   | 4     | 5     |
//! | 10  | 4     | 6     |
//! | 11  | 5     | 6     |

use crate::{
    hal::{LedLine, LineDrive, PanelPins},
    note::{Note, NoteMask, NUM_NOTES},
};

/// The two pins an LED sits between
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LedPair {
    pub a: LedLine,
    pub b: LedLine,
}

/// The colours each LED can show
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Colour {
    /// The note currently sounding at the output, pin A high
    Playing,
    /// A note enabled in the scale, pin B high
    Enabled,
}

/// The LED multiplexer is represented here.
pub struct LedDriver {
    // the LED that the next step will show
    current: Note,
}

impl LedDriver {
    /// `LedDriver::new()` is a new LED driver starting at the first LED
    pub const fn new() -> Self {
        Self { current: Note::C }
    }

    /// `ld.step(p, m, s)` shows the next LED through pins `p`, for scale mask `m` and sounding note `s`
    ///
    /// The sounding note lights in the playing colour, other enabled notes light in the enabled colour, the rest stay
    /// dark. The playing colour wins when a note is both.
    pub fn step<P: PanelPins>(&mut self, pins: &mut P, enabled: NoteMask, sounding: Option<Note>) {
        all_off(pins);

        let led = self.current;

        if sounding == Some(led) {
            light(pins, led, Colour::Playing);
        } else if enabled.is_allowed(led) {
            light(pins, led, Colour::Enabled);
        }

        self.current = led.next();
    }

    /// `ld.current()` is the LED that the next step will show
    pub fn current(&self) -> Note {
        self.current
    }
}

impl Default for LedDriver {
    fn default() -> Self {
        Self::new()
    }
}

/// `all_off(p)` floats every LED line so that no LED can light
pub fn all_off<P: PanelPins>(pins: &mut P) {
    LedLine::ALL
        .into_iter()
        .for_each(|line| pins.drive_led_line(line, LineDrive::Floating));
}

/// `light(p, n, c)` drives the pin pair for LED `n` to show colour `c`, all other lines must already be floating
fn light<P: PanelPins>(pins: &mut P, led: Note, colour: Colour) {
    let pair = CHARLIEPLEX_TABLE[led.index()];

    let (a, b) = match colour {
        Colour::Playing => (LineDrive::High, LineDrive::Low),
        Colour::Enabled => (LineDrive::Low, LineDrive::High),
    };

    pins.drive_led_line(pair.a, a);
    pins.drive_led_line(pair.b, b);
}

const fn pair(a: LedLine, b: LedLine) -> LedPair {
    LedPair { a, b }
}

/// The pin pair for each LED, indexed by note
pub static CHARLIEPLEX_TABLE: [LedPair; NUM_NOTES] = [
    pair(LedLine::L1, LedLine::L2),
    pair(LedLine::L1, LedLine::L3),
    pair(LedLine::L1, LedLine::L4),
    pair(LedLine::L2, LedLine::L3),
    pair(LedLine::L2, LedLine::L4),
    pair(LedLine::L2, LedLine::L5),
    pair(LedLine::L3, LedLine::L4),
    pair(LedLine::L3, LedLine::L5),
    pair(LedLine::L3, LedLine::L6),
    pair(LedLine::L4, LedLine::L5),
    pair(LedLine::L4, LedLine::L6),
    pair(LedLine::L5, LedLine::L6),
];
