//! Fake hardware for host tests.
//!
//! The analog fakes are thin handles onto probe structs that the test keeps hold of, so a test can change the CV
//! input or inspect the DAC while the pipeline owns the handle.

use core::cell::Cell;

use crate::{
    buttons::button_note,
    hal::{
        AnalogInput, AnalogOutput, Column, GateInput, LedLine, LineDrive, NvStorage, PanelPins, Row, NUM_LED_LINES,
    },
    leds::{Colour, CHARLIEPLEX_TABLE},
    note::{Note, NUM_NOTES},
    pitch_table::AnalogCode,
};

/// Panel pins with buttons that can be held down by hand
pub struct MockPanel {
    held: [bool; NUM_NOTES],
    active_row: Option<Row>,
    lines: [LineDrive; NUM_LED_LINES],
}

impl MockPanel {
    pub fn new() -> Self {
        Self {
            held: [false; NUM_NOTES],
            active_row: None,
            lines: [LineDrive::Floating; NUM_LED_LINES],
        }
    }

    pub fn hold(&mut self, note: Note) {
        self.held[note.index()] = true;
    }

    pub fn release(&mut self, note: Note) {
        self.held[note.index()] = false;
    }

    pub fn active_row(&self) -> Option<Row> {
        self.active_row
    }

    /// the number of LED lines not floating
    pub fn driven_lines(&self) -> usize {
        self.lines.iter().filter(|d| **d != LineDrive::Floating).count()
    }

    /// the LED lit by the current line drive, if exactly one is
    pub fn lit_led(&self) -> Option<(Note, Colour)> {
        if self.driven_lines() != 2 {
            return None;
        }

        let drive = |line: LedLine| self.lines[line.index()];

        CHARLIEPLEX_TABLE.iter().enumerate().find_map(|(i, pair)| {
            let note = Note::new(i as u8);
            match (drive(pair.a), drive(pair.b)) {
                (LineDrive::High, LineDrive::Low) => Some((note, Colour::Playing)),
                (LineDrive::Low, LineDrive::High) => Some((note, Colour::Enabled)),
                _ => None,
            }
        })
    }
}

impl PanelPins for MockPanel {
    fn set_row_active(&mut self, row: Row, active: bool) {
        if active {
            assert!(self.active_row.is_none(), "two rows active at once");
            self.active_row = Some(row);
        } else if self.active_row == Some(row) {
            self.active_row = None;
        }
    }

    fn column_is_active(&mut self, column: Column) -> bool {
        self.active_row
            .map_or(false, |row| self.held[button_note(row, column).index()])
    }

    fn drive_led_line(&mut self, line: LedLine, drive: LineDrive) {
        self.lines[line.index()] = drive;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockEepromError {
    ReadFault,
    WriteFault,
}

/// An EEPROM that starts erased and can be told to fail
pub struct MockEeprom {
    bytes: [u8; EEPROM_SIZE],
    writes: usize,
    writes_before_failure: Option<usize>,
    fail_reads: bool,
}

impl MockEeprom {
    pub fn new() -> Self {
        Self {
            bytes: [0xFF; EEPROM_SIZE],
            writes: 0,
            writes_before_failure: None,
            fail_reads: false,
        }
    }

    /// the total number of successful byte writes
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// let `n` more writes succeed, then fail every write after that
    pub fn fail_writes_after(&mut self, n: usize) {
        self.writes_before_failure = Some(n);
    }

    pub fn heal(&mut self) {
        self.writes_before_failure = None;
        self.fail_reads = false;
    }

    pub fn fail_reads(&mut self) {
        self.fail_reads = true;
    }

    /// overwrite a byte behind the log's back, as a power cut mid-write would
    pub fn corrupt(&mut self, addr: u16, byte: u8) {
        self.bytes[addr as usize] = byte;
    }

    pub fn peek(&self, addr: u16) -> u8 {
        self.bytes[addr as usize]
    }
}

impl NvStorage for MockEeprom {
    type Error = MockEepromError;

    fn read_byte(&mut self, addr: u16) -> Result<u8, Self::Error> {
        if self.fail_reads {
            return Err(MockEepromError::ReadFault);
        }
        Ok(self.bytes[addr as usize])
    }

    fn write_byte(&mut self, addr: u16, byte: u8) -> Result<(), Self::Error> {
        match self.writes_before_failure {
            Some(0) => return Err(MockEepromError::WriteFault),
            Some(ref mut n) => *n -= 1,
            None => (),
        }
        self.bytes[addr as usize] = byte;
        self.writes += 1;
        Ok(())
    }
}

const EEPROM_SIZE: usize = 512;

/// An ADC that reads whatever the test put in the cell
pub struct MockAdc<'a>(pub &'a Cell<u16>);

impl AnalogInput for MockAdc<'_> {
    fn read_sample(&mut self) -> AnalogCode {
        AnalogCode::new(self.0.get())
    }
}

/// What the pipeline has done to the DAC so far
#[derive(Default)]
pub struct DacProbe {
    pub code: Cell<Option<u8>>,
    pub writes: Cell<usize>,
    pub gate_open: Cell<bool>,
}

pub struct MockDac<'a>(pub &'a DacProbe);

impl AnalogOutput for MockDac<'_> {
    fn begin_output(&mut self, code: u8) {
        self.0.code.set(Some(code));
        self.0.writes.set(self.0.writes.get() + 1);
        self.0.gate_open.set(true);
    }

    fn finish_output(&mut self) {
        self.0.gate_open.set(false);
    }
}

/// The trigger jack, `pending` is cleared when the pipeline reads it
#[derive(Default)]
pub struct GateProbe {
    pub connected: Cell<bool>,
    pub pending: Cell<bool>,
}

impl GateProbe {
    pub fn fire(&self) {
        self.pending.set(true);
    }
}

pub struct MockGate<'a>(pub &'a GateProbe);

impl GateInput for MockGate<'_> {
    fn is_connected(&mut self) -> bool {
        self.0.connected.get()
    }

    fn triggered(&mut self) -> bool {
        self.0.pending.replace(false)
    }
}
