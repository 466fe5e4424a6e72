//! # Notes and scales
//!
//! The quantizer works on a fixed 12-tone-per-octave grid. Users build a scale by enabling any subset of the 12 notes
//! from the front panel, the set of enabled notes is stored as a 12-bit mask.

/// A note within one octave, `C` through `B`, is represented here.
///
/// Notes double as indices for the 12 panel buttons and the 12 panel LEDs, so a `Note` is always in `[0..11]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Note(u8);

impl Note {
    pub const C: Self = Self::new(0);
    pub const CSHARP: Self = Self::new(1);
    pub const D: Self = Self::new(2);
    pub const DSHARP: Self = Self::new(3);
    pub const E: Self = Self::new(4);
    pub const F: Self = Self::new(5);
    pub const FSHARP: Self = Self::new(6);
    pub const G: Self = Self::new(7);
    pub const GSHARP: Self = Self::new(8);
    pub const A: Self = Self::new(9);
    pub const ASHARP: Self = Self::new(10);
    pub const B: Self = Self::new(11);

    /// All 12 notes in ascending order
    pub const ALL: [Self; NUM_NOTES] = [
        Self::C,
        Self::CSHARP,
        Self::D,
        Self::DSHARP,
        Self::E,
        Self::F,
        Self::FSHARP,
        Self::G,
        Self::GSHARP,
        Self::A,
        Self::ASHARP,
        Self::B,
    ];

    /// `Note::new(n)` is a new note from `n` clamped to `[0..11]`
    pub const fn new(n: u8) -> Self {
        Self(if n <= 11 { n } else { 11 })
    }

    /// `n.index()` is the note as an index in `[0..11]`, safe to use with any 12 element table
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// `n.next()` is the note above `n`, wrapping from `B` back around to `C`
    pub const fn next(self) -> Self {
        Self(if self.0 < 11 { self.0 + 1 } else { 0 })
    }

    const fn bit(self) -> u16 {
        1 << self.0
    }
}

impl From<u8> for Note {
    fn from(n: u8) -> Self {
        Self::new(n)
    }
}

impl From<Note> for u8 {
    fn from(n: Note) -> Self {
        n.0
    }
}

/// The set of notes enabled on the front panel is represented here.
///
/// The 12 lowest bits represent C, C#, D, ... B. A set bit means the note is allowed as a quantization target. An
/// empty mask is perfectly valid, it means there is nothing to quantize to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NoteMask(u16);

impl NoteMask {
    /// No notes enabled
    pub const EMPTY: Self = Self(0);

    /// Every note enabled, the chromatic scale
    pub const ALL: Self = Self(MASK_BITS);

    /// `NoteMask::from_bits(b)` is the mask from the low 12 bits of `b`, any higher bits are discarded
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits & MASK_BITS)
    }

    /// `NoteMask::from_notes(ns)` is the mask with exactly notes `ns` enabled
    pub fn from_notes(notes: &[Note]) -> Self {
        let mut mask = Self::EMPTY;
        mask.allow(notes);
        mask
    }

    /// `m.bits()` is the mask as a 12-bit integer
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// `m.is_empty()` is true iff no notes are enabled
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// `m.is_allowed(n)` is true iff note `n` is enabled
    pub const fn is_allowed(self, note: Note) -> bool {
        self.0 & note.bit() != 0
    }

    /// `m.allow(ns)` enables notes `ns`, notes already enabled are left unchanged
    pub fn allow(&mut self, notes: &[Note]) {
        notes.iter().for_each(|n| self.0 |= n.bit());
    }

    /// `m.forbid(ns)` disables notes `ns`, notes already disabled are left unchanged
    ///
    /// Unlike a [`Scale`], a mask may end up with every note forbidden.
    pub fn forbid(&mut self, notes: &[Note]) {
        notes.iter().for_each(|n| self.0 &= !n.bit());
    }

    /// `m.toggle(n)` flips note `n` between enabled and disabled
    pub fn toggle(&mut self, note: Note) {
        self.0 ^= note.bit();
    }

    /// `m.scale()` is the mask as a [`Scale`], or `None` if the mask is empty
    pub const fn scale(self) -> Option<Scale> {
        if self.is_empty() {
            None
        } else {
            Some(Scale(self))
        }
    }
}

/// A non-empty set of enabled notes is represented here.
///
/// The quantizer only accepts a `Scale`, which makes it impossible to ask for the nearest note of an empty mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Scale(NoteMask);

impl Scale {
    /// The chromatic scale, every note enabled
    pub const CHROMATIC: Self = Self(NoteMask::ALL);

    /// `s.mask()` is the scale as a plain note mask
    pub const fn mask(self) -> NoteMask {
        self.0
    }

    /// `s.notes()` is an iterator over the enabled notes in ascending order
    pub fn notes(self) -> impl Iterator<Item = Note> {
        Note::ALL.into_iter().filter(move |n| self.0.is_allowed(*n))
    }
}

impl From<Scale> for NoteMask {
    fn from(s: Scale) -> Self {
        s.0
    }
}

/// The number of notes in one octave
pub const NUM_NOTES: usize = 12;

const MASK_BITS: u16 = 0x0FFF;
