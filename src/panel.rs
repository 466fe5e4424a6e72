//! # Front panel scanner
//!
//! The front panel has 12 buttons and 12 LEDs, one of each per note. Pressing a button toggles its note in or out of
//! the scale, the LEDs show which notes are in the scale and which one is sounding right now.
//!
//! The panel scanner owns the panel pins and the scale mask. It is stepped round-robin from the main loop, each step
//! reads one button and shows one LED.

use crate::{
    buttons::{ButtonEdge, ButtonMatrix},
    hal::PanelPins,
    leds::LedDriver,
    note::{Note, NoteMask},
};

/// The front panel is represented here.
pub struct Panel<P> {
    pins: P,
    buttons: ButtonMatrix,
    leds: LedDriver,

    // notes toggled on by the user
    mask: NoteMask,
}

impl<P: PanelPins> Panel<P> {
    /// `Panel::new(p, m)` is a new panel on pins `p` starting with scale mask `m`, all LEDs dark
    pub fn new(mut pins: P, mask: NoteMask) -> Self {
        crate::leds::all_off(&mut pins);

        Self {
            pins,
            buttons: ButtonMatrix::new(),
            leds: LedDriver::new(),
            mask,
        }
    }

    /// `panel.step(s)` reads one button and shows one LED, with `s` as the currently sounding note
    ///
    /// A fresh press toggles the button's note in the mask and is returned as an edge.
    pub fn step(&mut self, sounding: Option<Note>) -> Option<ButtonEdge> {
        let edge = self.buttons.scan_step(&mut self.pins);

        if let Some(ButtonEdge { note }) = edge {
            self.mask.toggle(note);
        }

        self.leds.step(&mut self.pins, self.mask, sounding);

        edge
    }

    /// `panel.mask()` is the set of notes the user has enabled
    pub fn mask(&self) -> NoteMask {
        self.mask
    }

    /// `panel.pins()` is a reference to the panel pins
    pub fn pins(&self) -> &P {
        &self.pins
    }

    /// `panel.pins_mut()` is a mutable reference to the panel pins
    pub fn pins_mut(&mut self) -> &mut P {
        &mut self.pins
    }
}
