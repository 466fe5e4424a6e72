//! # Control loop
//!
//! The slow half of the firmware, polled from the main loop while the sample pipeline runs in the interrupt. It scans
//! the panel, passes button presses on to the pipeline, and saves the scale when the pipeline says the panel has been
//! left alone long enough.

use heapless::spsc::Producer;

use crate::{
    buttons::ButtonEdge,
    config::EDGE_QUEUE_LEN,
    hal::{NvStorage, PanelPins},
    panel::Panel,
    persistence::{NoteLog, WriteOutcome},
    shared::SharedState,
};

/// The main loop side of the quantizer is represented here.
pub struct ControlLoop<'a, P, S> {
    panel: Panel<P>,
    log: NoteLog<S>,
    edges: Producer<'a, ButtonEdge, EDGE_QUEUE_LEN>,
}

impl<'a, P, S> ControlLoop<'a, P, S>
where
    P: PanelPins,
    S: NvStorage,
{
    /// `ControlLoop::boot(p, s, e, sh)` restores the saved scale from storage `s` onto panel pins `p` and publishes it
    /// in shared state `sh`, button presses will be sent to the pipeline through queue producer `e`
    pub fn boot(pins: P, storage: S, edges: Producer<'a, ButtonEdge, EDGE_QUEUE_LEN>, shared: &SharedState) -> Self {
        let log = NoteLog::open(storage);
        let mask = log.read_mask();

        shared.publish_mask(mask);

        Self {
            panel: Panel::new(pins, mask),
            log,
            edges,
        }
    }

    /// `cl.poll(sh)` runs one step of the control loop with shared state `sh`
    ///
    /// Returns the outcome of the save if one was due on this step.
    pub fn poll(&mut self, shared: &SharedState) -> Option<WriteOutcome> {
        if let Some(edge) = self.panel.step(shared.sounding()) {
            // the mask goes out first so the pipeline never sees an edge before its mask
            shared.publish_mask(self.panel.mask());

            if let Err(_edge) = self.edges.enqueue(edge) {
                #[cfg(feature = "defmt")]
                defmt::warn!("edge queue full, dropped {}", _edge);

                // the press still has to restart the autosave delay
                shared.mark_touched();
            }
        }

        shared
            .take_autosave()
            .then(|| self.log.write_mask(self.panel.mask()))
    }

    /// `cl.panel()` is a reference to the front panel
    pub fn panel(&self) -> &Panel<P> {
        &self.panel
    }

    /// `cl.panel_mut()` is a mutable reference to the front panel
    pub fn panel_mut(&mut self) -> &mut Panel<P> {
        &mut self.panel
    }

    /// `cl.log()` is a reference to the note log
    pub fn log(&self) -> &NoteLog<S> {
        &self.log
    }
}
