//! # Hardware collaborators
//!
//! The quantizer core never touches peripheral registers. Instead it talks to the board through the small traits in
//! this module, which a board support crate implements for its own ADC, DAC, GPIO and EEPROM drivers. This keeps every
//! part of the core testable on the host with fake hardware.

use crate::pitch_table::AnalogCode;

/// The CV input ADC
pub trait AnalogInput {
    /// `adc.read_sample()` is a fresh conversion of the CV input
    fn read_sample(&mut self) -> AnalogCode;
}

/// The pitch output DAC, which also carries the gate
pub trait AnalogOutput {
    /// `dac.begin_output(c)` starts driving the output at code `c` and raises the gate
    ///
    /// Two codes make one semitone.
    fn begin_output(&mut self, code: u8);

    /// `dac.finish_output()` returns the DAC to idle, ending the gate pulse but holding the pitch
    fn finish_output(&mut self);
}

/// The external trigger jack
pub trait GateInput {
    /// `gate.is_connected()` is true iff a cable is patched into the trigger jack
    fn is_connected(&mut self) -> bool;

    /// `gate.triggered()` is true iff a rising edge arrived at the trigger jack since the last call. Self clearing.
    fn triggered(&mut self) -> bool;
}

/// A row of the button matrix
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Row {
    R0,
    R1,
    R2,
}

impl Row {
    /// `r.index()` is the row number in `[0..2]`
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A column of the button matrix
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Column {
    C0,
    C1,
    C2,
    C3,
}

impl Column {
    /// `c.index()` is the column number in `[0..3]`
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One of the six pins shared by the charlieplexed LEDs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedLine {
    L1,
    L2,
    L3,
    L4,
    L5,
    L6,
}

impl LedLine {
    pub const ALL: [Self; NUM_LED_LINES] = [Self::L1, Self::L2, Self::L3, Self::L4, Self::L5, Self::L6];

    /// `l.index()` is the line number in `[0..5]`
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// How an LED line is driven
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineDrive {
    /// Input, no pullup. The line sinks and sources nothing.
    Floating,
    /// Output, driven high
    High,
    /// Output, driven low
    Low,
}

/// The front panel pins, button matrix rows and columns plus the LED lines
///
/// Only the panel scanner uses these pins.
pub trait PanelPins {
    /// `pins.set_row_active(r, a)` pulls row `r` to its active level if `a`, else lets it go idle
    fn set_row_active(&mut self, row: Row, active: bool);

    /// `pins.column_is_active(c)` is true iff column `c` reads at its active level, meaning the button at the
    /// crossing of the active row and this column is held down
    fn column_is_active(&mut self, column: Column) -> bool;

    /// `pins.drive_led_line(l, d)` sets LED line `l` to drive mode `d`
    fn drive_led_line(&mut self, line: LedLine, drive: LineDrive);
}

/// Byte addressable non-volatile memory, such as the internal EEPROM
///
/// Only the note log uses this storage.
pub trait NvStorage {
    type Error: core::fmt::Debug;

    /// `nv.read_byte(a)` is the byte stored at address `a`
    fn read_byte(&mut self, addr: u16) -> Result<u8, Self::Error>;

    /// `nv.write_byte(a, b)` stores byte `b` at address `a`, blocking until the write completes
    fn write_byte(&mut self, addr: u16, byte: u8) -> Result<(), Self::Error>;
}

pub const NUM_COLUMNS: usize = 4;
pub const NUM_LED_LINES: usize = 6;
