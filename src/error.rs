//! Error types for the note log.
//!
//! These never leave the [`persistence`](crate::persistence) module, the log turns them into a well defined outcome
//! and carries on.

use core::fmt;

/// Errors that can occur while reading or writing the note log storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogError<E> {
    /// The storage failed to read the byte at this address.
    Read { addr: u16, error: E },

    /// The storage failed to write the byte at this address.
    Write { addr: u16, error: E },
}

impl<E: fmt::Debug> fmt::Display for LogError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LogError::Read { addr, error } => write!(f, "read failed at {:#05x}: {:?}", addr, error),
            LogError::Write { addr, error } => write!(f, "write failed at {:#05x}: {:?}", addr, error),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: fmt::Debug> defmt::Format for LogError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            LogError::Read { addr, error } => {
                defmt::write!(f, "read failed at {=u16:#x}: {}", addr, defmt::Debug2Format(error))
            }
            LogError::Write { addr, error } => {
                defmt::write!(f, "write failed at {=u16:#x}: {}", addr, defmt::Debug2Format(error))
            }
        }
    }
}
