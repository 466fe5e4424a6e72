//! # Button matrix
//!
//! The 12 panel buttons sit in a 3 row by 4 column matrix. Each call to [`ButtonMatrix::scan_step`] reads a single
//! button, so a full pass over the panel takes 12 steps. This keeps each step short enough to share time with the
//! sample interrupt.
//!
//! Mechanical switches bounce, so every button has a small debouncer. A press is only registered once the button has
//! read as held for `DEBOUNCE_SAMPLES` scans in a row, and a release only once it has read as released for the same
//! number of scans in a row.

use crate::{
    config::DEBOUNCE_SAMPLES,
    hal::{Column, PanelPins, Row, NUM_COLUMNS},
    note::{Note, NUM_NOTES},
};

/// A rising edge on one of the panel buttons, the user just pressed it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonEdge {
    /// The button that was pressed, buttons are numbered the same as the notes they toggle
    pub note: Note,
}

/// A single debounced button is represented here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Debouncer {
    // the most recent raw readings, newest in the lowest bit
    history: u8,

    // the debounced state
    pressed: bool,
}

impl Debouncer {
    /// `Debouncer::new()` is a new debouncer for a released button
    pub const fn new() -> Self {
        Self {
            history: 0,
            pressed: false,
        }
    }

    /// `db.update(a)` feeds raw reading `a` into the debouncer, true iff this reading completed a new press
    ///
    /// A press registers once the window is all active readings. A press stays registered until the window is all
    /// inactive readings, so bounce on release can't produce a second press.
    pub fn update(&mut self, active: bool) -> bool {
        self.history = ((self.history << 1) | active as u8) & WINDOW_MASK;

        let was_pressed = self.pressed;

        self.pressed = if was_pressed {
            self.history != 0
        } else {
            self.history == WINDOW_MASK
        };

        !was_pressed && self.pressed
    }

    /// `db.is_pressed()` is true iff the debounced button is held down
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}

/// The round-robin button matrix scanner is represented here.
pub struct ButtonMatrix {
    row: Row,
    column: Column,
    debouncers: [Debouncer; NUM_NOTES],
}

impl ButtonMatrix {
    /// `ButtonMatrix::new()` is a new scanner starting at the first button, with every button released
    pub const fn new() -> Self {
        Self {
            row: Row::R0,
            column: Column::C0,
            debouncers: [Debouncer::new(); NUM_NOTES],
        }
    }

    /// `bm.scan_step(p)` reads the next button in the matrix through pins `p`
    ///
    /// Returns the edge if the button was just pressed.
    pub fn scan_step<P: PanelPins>(&mut self, pins: &mut P) -> Option<ButtonEdge> {
        pins.set_row_active(self.row, true);
        let active = pins.column_is_active(self.column);
        pins.set_row_active(self.row, false);

        let note = button_note(self.row, self.column);
        let just_pressed = self.debouncers[note.index()].update(active);

        self.advance();

        just_pressed.then_some(ButtonEdge { note })
    }

    /// `bm.is_pressed(n)` is true iff the button for note `n` is currently held down
    pub fn is_pressed(&self, note: Note) -> bool {
        self.debouncers[note.index()].is_pressed()
    }

    /// `bm.position()` is the row and column that the next scan step will read
    pub fn position(&self) -> (Row, Column) {
        (self.row, self.column)
    }

    fn advance(&mut self) {
        self.column = match self.column {
            Column::C0 => Column::C1,
            Column::C1 => Column::C2,
            Column::C2 => Column::C3,
            Column::C3 => {
                self.row = match self.row {
                    Row::R0 => Row::R1,
                    Row::R1 => Row::R2,
                    Row::R2 => Row::R0,
                };
                Column::C0
            }
        };
    }
}

impl Default for ButtonMatrix {
    fn default() -> Self {
        Self::new()
    }
}

/// `button_note(r, c)` is the note toggled by the button at row `r` and column `c`, numbered row-major
pub const fn button_note(row: Row, column: Column) -> Note {
    Note::new((row.index() * NUM_COLUMNS + column.index()) as u8)
}

const WINDOW_MASK: u8 = ((1_u16 << DEBOUNCE_SAMPLES) - 1) as u8;
