//! # Shared state
//!
//! The sample pipeline runs in an interrupt and the control loop runs in the main loop. The few values they share live
//! here, each in its own critical section protected cell with exactly one writer.
//!
//! | cell          | written by                                  | read by                |
//! |---------------|---------------------------------------------|------------------------|
//! | mask          | control loop                                | pipeline               |
//! | sounding note | pipeline                                    | control loop, for LEDs |
//! | autosave flag | pipeline raises and clears it               | control loop takes it  |
//! | touched flag  | control loop, for presses the queue dropped | pipeline takes it      |

use core::cell::Cell;

use critical_section::Mutex;

use crate::note::{Note, NoteMask};

/// The state shared between the pipeline interrupt and the control loop is represented here.
///
/// Meant to live in a `static`.
pub struct SharedState {
    mask: Mutex<Cell<NoteMask>>,
    sounding: Mutex<Cell<Option<Note>>>,
    autosave: Mutex<Cell<bool>>,
    touched: Mutex<Cell<bool>>,
}

impl SharedState {
    /// `SharedState::new(m)` is new shared state with mask `m`, no note sounding and no save pending
    pub const fn new(mask: NoteMask) -> Self {
        Self {
            mask: Mutex::new(Cell::new(mask)),
            sounding: Mutex::new(Cell::new(None)),
            autosave: Mutex::new(Cell::new(false)),
            touched: Mutex::new(Cell::new(false)),
        }
    }

    /// `s.publish_mask(m)` makes `m` the mask the pipeline quantizes to
    pub fn publish_mask(&self, mask: NoteMask) {
        critical_section::with(|cs| self.mask.borrow(cs).set(mask));
    }

    /// `s.mask()` is the most recently published mask
    pub fn mask(&self) -> NoteMask {
        critical_section::with(|cs| self.mask.borrow(cs).get())
    }

    /// `s.set_sounding(n)` records `n` as the note at the output, none when nothing is sounding
    pub fn set_sounding(&self, note: Option<Note>) {
        critical_section::with(|cs| self.sounding.borrow(cs).set(note));
    }

    /// `s.sounding()` is the note at the output, if any
    pub fn sounding(&self) -> Option<Note> {
        critical_section::with(|cs| self.sounding.borrow(cs).get())
    }

    /// `s.raise_autosave()` asks the control loop to save the scale
    pub fn raise_autosave(&self) {
        critical_section::with(|cs| self.autosave.borrow(cs).set(true));
    }

    /// `s.clear_autosave()` withdraws a save request that hasn't been taken yet
    pub fn clear_autosave(&self) {
        critical_section::with(|cs| self.autosave.borrow(cs).set(false));
    }

    /// `s.take_autosave()` is true iff a save was requested, the request is cleared in the same critical section
    pub fn take_autosave(&self) -> bool {
        critical_section::with(|cs| self.autosave.borrow(cs).replace(false))
    }

    /// `s.mark_touched()` tells the pipeline the panel was pressed, for presses that didn't fit in the edge queue
    pub fn mark_touched(&self) {
        critical_section::with(|cs| self.touched.borrow(cs).set(true));
    }

    /// `s.take_touched()` is true iff the panel was marked touched, the mark is cleared in the same critical section
    pub fn take_touched(&self) -> bool {
        critical_section::with(|cs| self.touched.borrow(cs).replace(false))
    }
}
