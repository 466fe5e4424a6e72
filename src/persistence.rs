//! # Note log
//!
//! The enabled notes survive power cycles in a small wear levelled log on byte addressable non-volatile storage.
//!
//! The log is a ring of slots. Each slot holds a 16 bit payload (the note mask) and an 8 bit sequence number, the
//! sequence numbers of consecutive writes count up by one and wrap at 256. Every save goes to the slot after the
//! current one, so the writes are spread evenly over the whole ring.
//!
//! | address           | contents                           |
//! |-------------------|------------------------------------|
//! | `2*i`, `2*i + 1`  | payload of slot `i`, little endian |
//! | `256 + i`         | sequence number of slot `i`        |
//!
//! The payload is always written before the sequence number, so a slot only joins the log once it is complete. If the
//! power fails halfway through a save the sequence byte never lands and the previous slot stays current.
//!
//! With 128 slots and EEPROM cells rated for about 100k writes, the log lasts for roughly 12.8 million saves.

use crate::{error::LogError, hal::NvStorage, note::NoteMask};

/// The result of asking the log to save a mask
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WriteOutcome {
    /// The mask was already saved, nothing was written
    Unchanged,
    /// The mask was saved in this slot, which is now the current one
    Written { slot: u8 },
    /// The storage failed, the previous save is still current
    Failed,
}

/// A wear levelled note mask log is represented here.
pub struct NoteLog<S> {
    storage: S,

    // the newest complete slot
    slot: u8,
    seq: u8,

    // raw payload of the current slot, kept so that unchanged saves can be skipped without reading
    payload: u16,
}

impl<S: NvStorage> NoteLog<S> {
    /// `NoteLog::open(s)` is the log stored in `s`, with the newest complete slot found and made current
    ///
    /// Erased storage reads back as every note enabled. If the storage can't be read at all the log starts over from
    /// the first slot, again with every note enabled.
    pub fn open(mut storage: S) -> Self {
        let (slot, seq, payload) = match find_newest(&mut storage) {
            Ok(newest) => newest,
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("note log unreadable, {}", _e);
                (0, ERASED, NoteMask::ALL.bits())
            }
        };

        #[cfg(feature = "defmt")]
        defmt::info!("note log at slot {=u8}, seq {=u8}, mask {=u16:#x}", slot, seq, payload);

        Self {
            storage,
            slot,
            seq,
            payload,
        }
    }

    /// `log.read_mask()` is the mask from the newest complete save
    pub fn read_mask(&self) -> NoteMask {
        NoteMask::from_bits(self.payload)
    }

    /// `log.write_mask(m)` saves mask `m` in the next slot of the ring, unless it is already the current mask
    pub fn write_mask(&mut self, mask: NoteMask) -> WriteOutcome {
        if mask == self.read_mask() {
            return WriteOutcome::Unchanged;
        }

        let slot = next_slot(self.slot);
        let seq = self.seq.wrapping_add(1);

        match self.commit(slot, seq, mask.bits()) {
            Ok(()) => {
                self.slot = slot;
                self.seq = seq;
                self.payload = mask.bits();

                #[cfg(feature = "defmt")]
                defmt::debug!("saved mask {=u16:#x} to slot {=u8}", self.payload, slot);

                WriteOutcome::Written { slot }
            }
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("save failed, {}", _e);

                WriteOutcome::Failed
            }
        }
    }

    /// `log.current_slot()` is the slot holding the newest complete save
    pub fn current_slot(&self) -> u8 {
        self.slot
    }

    /// `log.storage()` is a reference to the underlying storage
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// `log.into_storage()` gives the storage back, e.g. to reopen it
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn commit(&mut self, slot: u8, seq: u8, payload: u16) -> Result<(), LogError<S::Error>> {
        let [lo, hi] = payload.to_le_bytes();
        let addr = payload_addr(slot);

        write(&mut self.storage, addr, lo)?;
        write(&mut self.storage, addr + 1, hi)?;

        // the sequence byte goes last, it is what makes the slot count
        write(&mut self.storage, seq_addr(slot), seq)
    }
}

/// `find_newest(s)` is the `(slot, seq, payload)` at the end of the unbroken run of sequence numbers
///
/// The run normally starts at slot 0. A slot 0 that neither follows the last slot nor leads into slot 1 is a save that
/// never completed, and the run starts at slot 1 instead.
fn find_newest<S: NvStorage>(storage: &mut S) -> Result<(u8, u8, u16), LogError<S::Error>> {
    let first = read(storage, seq_addr(0))?;
    let second = read(storage, seq_addr(1))?;
    let last = read(storage, seq_addr(LAST_SLOT))?;

    let torn_first = second != first.wrapping_add(1) && first != last.wrapping_add(1) && second != ERASED;

    let (mut slot, mut seq) = if torn_first { (1, second) } else { (0, first) };

    // the ring is shorter than the sequence period, so the run always breaks before coming back round
    while slot < LAST_SLOT {
        let next = next_slot(slot);
        let next_seq = read(storage, seq_addr(next))?;
        if next_seq != seq.wrapping_add(1) {
            break;
        }
        slot = next;
        seq = next_seq;
    }

    let addr = payload_addr(slot);
    let payload = u16::from_le_bytes([read(storage, addr)?, read(storage, addr + 1)?]);

    Ok((slot, seq, payload))
}

fn read<S: NvStorage>(storage: &mut S, addr: u16) -> Result<u8, LogError<S::Error>> {
    storage.read_byte(addr).map_err(|error| LogError::Read { addr, error })
}

fn write<S: NvStorage>(storage: &mut S, addr: u16, byte: u8) -> Result<(), LogError<S::Error>> {
    storage
        .write_byte(addr, byte)
        .map_err(|error| LogError::Write { addr, error })
}

const fn next_slot(slot: u8) -> u8 {
    ((slot as usize + 1) % RING_LEN) as u8
}

const fn payload_addr(slot: u8) -> u16 {
    2 * slot as u16
}

const fn seq_addr(slot: u8) -> u16 {
    SEQ_BASE + slot as u16
}

/// The number of slots in the ring
pub const RING_LEN: usize = 128;

/// The number of storage bytes the log occupies
pub const LOG_SIZE: usize = SEQ_BASE as usize + RING_LEN;

const SEQ_BASE: u16 = 256;

const LAST_SLOT: u8 = (RING_LEN - 1) as u8;

// the value of an erased byte
const ERASED: u8 = 0xFF;

const _: () = assert!(RING_LEN.is_power_of_two() && RING_LEN < 256);
const _: () = assert!(2 * RING_LEN <= SEQ_BASE as usize);
