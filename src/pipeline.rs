//! # Sample pipeline
//!
//! Everything that happens at the sample rate. The pipeline is ticked from the ADC interrupt, each tick reads the CV
//! input, smooths it, snaps it to the current scale and drives the DAC and gate whenever the quantized pitch changes.
//!
//! With a cable in the trigger jack the pipeline turns into a sample and hold, the input is only requantized on a
//! rising trigger edge. Without one it quantizes continuously.
//!
//! The pipeline also keeps the autosave countdown. Every button press restarts it, and once the panel has been left
//! alone for the whole autosave delay the pipeline raises the shared autosave flag for the control loop to act on.

use heapless::spsc::Consumer;

use crate::{
    buttons::ButtonEdge,
    config::{AUTOSAVE_TICKS, DAC_CODES_PER_SEMITONE, DEADBAND_THRESHOLD, EDGE_QUEUE_LEN, GATE_TICKS},
    countdown::{Countdown, TimerState},
    filter::SmoothingFilter,
    hal::{AnalogInput, AnalogOutput, GateInput},
    note::NoteMask,
    pitch_table::{AnalogCode, Semitone},
    quantizer::Quantizer,
    shared::SharedState,
};

/// The sample rate processing chain is represented here.
pub struct SamplePipeline<'a, A, D, G> {
    adc: A,
    dac: D,
    gate: G,
    edges: Consumer<'a, ButtonEdge, EDGE_QUEUE_LEN>,

    filter: SmoothingFilter,
    quantizer: Quantizer,

    gate_timer: Countdown<GATE_TICKS>,
    autosave_timer: Countdown<AUTOSAVE_TICKS>,

    // the pitch most recently sent to the DAC, none after an empty mask or before the first output
    last_pitch: Option<Semitone>,
}

impl<'a, A, D, G> SamplePipeline<'a, A, D, G>
where
    A: AnalogInput,
    D: AnalogOutput,
    G: GateInput,
{
    /// `SamplePipeline::new(a, d, g, e)` is a new pipeline reading ADC `a`, writing DAC `d`, watching trigger jack `g`
    /// and receiving button edges from queue consumer `e`
    ///
    /// The autosave countdown starts idle, nothing is saved until a button is pressed.
    pub fn new(adc: A, dac: D, gate: G, edges: Consumer<'a, ButtonEdge, EDGE_QUEUE_LEN>) -> Self {
        Self {
            adc,
            dac,
            gate,
            edges,
            filter: SmoothingFilter::new(),
            quantizer: Quantizer::new(DEADBAND_THRESHOLD),
            gate_timer: Countdown::new(),
            autosave_timer: Countdown::new(),
            last_pitch: None,
        }
    }

    /// `p.tick(s)` runs one sample period, with `s` as the state shared with the control loop
    pub fn tick(&mut self, shared: &SharedState) {
        let code = self.filter.process(self.adc.read_sample());

        // both sources are cleared every tick
        if self.drain_edges() | shared.take_touched() {
            self.autosave_timer.start();
            shared.clear_autosave();
        }

        let mask = shared.mask();

        if !self.gate.is_connected() || self.gate.triggered() {
            self.update_pitch(mask, code, shared);
        }

        if self.gate_timer.tick() == TimerState::Expired {
            self.dac.finish_output();
        }

        if self.autosave_timer.tick() == TimerState::Expired {
            #[cfg(feature = "defmt")]
            defmt::debug!("panel idle, requesting save");

            shared.raise_autosave();
        }
    }

    /// `p.last_pitch()` is the pitch most recently sent to the DAC, if it is still sounding
    pub fn last_pitch(&self) -> Option<Semitone> {
        self.last_pitch
    }

    fn update_pitch(&mut self, mask: NoteMask, code: AnalogCode, shared: &SharedState) {
        let Some(scale) = mask.scale() else {
            // nothing to quantize to, hold the DAC where it is
            self.last_pitch = None;
            shared.set_sounding(None);
            return;
        };

        let pitch = self.quantizer.convert(scale, code);

        if self.last_pitch != Some(pitch) {
            self.dac.begin_output(pitch.value() * DAC_CODES_PER_SEMITONE);
            self.gate_timer.start();
            self.last_pitch = Some(pitch);
            shared.set_sounding(Some(pitch.note()));
        }
    }

    /// `p.drain_edges()` empties the edge queue, true iff there was anything in it
    fn drain_edges(&mut self) -> bool {
        let mut touched = false;
        while let Some(_edge) = self.edges.dequeue() {
            #[cfg(feature = "defmt")]
            defmt::trace!("{}", _edge);

            touched = true;
        }
        touched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        mock::{DacProbe, GateProbe, MockAdc, MockDac, MockGate},
        note::Note,
    };
    use core::cell::Cell;
    use heapless::spsc::Queue;

    type TestPipeline<'a> = SamplePipeline<'a, MockAdc<'a>, MockDac<'a>, MockGate<'a>>;

    // comfortably longer than the smoothing filter and the gate take to settle
    const SETTLE_TICKS: usize = 200;

    fn run(pipeline: &mut TestPipeline, shared: &SharedState, ticks: usize) {
        (0..ticks).for_each(|_| pipeline.tick(shared));
    }

    const PRESS: ButtonEdge = ButtonEdge { note: Note::C };

    #[test]
    fn settles_on_the_nearest_note() {
        let cv = Cell::new(512);
        let dac = DacProbe::default();
        let gate = GateProbe::default();
        let mut queue: Queue<ButtonEdge, EDGE_QUEUE_LEN> = Queue::new();
        let (_, rx) = queue.split();
        let shared = SharedState::new(NoteMask::ALL);
        let mut pipeline = SamplePipeline::new(MockAdc(&cv), MockDac(&dac), MockGate(&gate), rx);

        run(&mut pipeline, &shared, SETTLE_TICKS);

        assert_eq!(pipeline.last_pitch(), Some(Semitone::new(60)));
        assert_eq!(dac.code.get(), Some(120));
        assert_eq!(shared.sounding(), Some(Note::C));
        assert!(!dac.gate_open.get());
    }

    #[test]
    fn steady_input_writes_the_dac_once_settled() {
        let cv = Cell::new(700);
        let dac = DacProbe::default();
        let gate = GateProbe::default();
        let mut queue: Queue<ButtonEdge, EDGE_QUEUE_LEN> = Queue::new();
        let (_, rx) = queue.split();
        let shared = SharedState::new(NoteMask::ALL);
        let mut pipeline = SamplePipeline::new(MockAdc(&cv), MockDac(&dac), MockGate(&gate), rx);

        run(&mut pipeline, &shared, SETTLE_TICKS);
        let writes = dac.writes.get();
        assert_eq!(dac.code.get(), Some(164));

        run(&mut pipeline, &shared, 10 * SETTLE_TICKS);
        assert_eq!(dac.writes.get(), writes);
    }

    #[test]
    fn jitter_across_a_note_boundary_does_not_retrigger() {
        let cv = Cell::new(507);
        let dac = DacProbe::default();
        let gate = GateProbe::default();
        let mut queue: Queue<ButtonEdge, EDGE_QUEUE_LEN> = Queue::new();
        let (_, rx) = queue.split();
        let shared = SharedState::new(NoteMask::ALL);
        let mut pipeline = SamplePipeline::new(MockAdc(&cv), MockDac(&dac), MockGate(&gate), rx);

        run(&mut pipeline, &shared, SETTLE_TICKS);
        let writes = dac.writes.get();

        for i in 0..1_000 {
            cv.set(if i % 2 == 0 { 506 } else { 507 });
            pipeline.tick(&shared);
        }
        assert_eq!(dac.writes.get(), writes);
    }

    #[test]
    fn gate_pulse_lasts_the_gate_length() {
        let cv = Cell::new(512);
        let dac = DacProbe::default();
        let gate = GateProbe::default();
        gate.connected.set(true);
        let mut queue: Queue<ButtonEdge, EDGE_QUEUE_LEN> = Queue::new();
        let (_, rx) = queue.split();
        let shared = SharedState::new(NoteMask::ALL);
        let mut pipeline = SamplePipeline::new(MockAdc(&cv), MockDac(&dac), MockGate(&gate), rx);

        run(&mut pipeline, &shared, SETTLE_TICKS);

        gate.fire();
        pipeline.tick(&shared);
        assert!(dac.gate_open.get());

        // the trigger tick counts as the first gate tick
        run(&mut pipeline, &shared, GATE_TICKS as usize - 2);
        assert!(dac.gate_open.get());

        pipeline.tick(&shared);
        assert!(!dac.gate_open.get());
        assert_eq!(dac.code.get(), Some(120));
    }

    #[test]
    fn empty_mask_silences_the_indicator_and_holds_the_dac() {
        let cv = Cell::new(512);
        let dac = DacProbe::default();
        let gate = GateProbe::default();
        let mut queue: Queue<ButtonEdge, EDGE_QUEUE_LEN> = Queue::new();
        let (_, rx) = queue.split();
        let shared = SharedState::new(NoteMask::ALL);
        let mut pipeline = SamplePipeline::new(MockAdc(&cv), MockDac(&dac), MockGate(&gate), rx);

        run(&mut pipeline, &shared, SETTLE_TICKS);
        let writes = dac.writes.get();

        shared.publish_mask(NoteMask::EMPTY);
        run(&mut pipeline, &shared, SETTLE_TICKS);

        assert_eq!(pipeline.last_pitch(), None);
        assert_eq!(shared.sounding(), None);
        assert_eq!(dac.writes.get(), writes);
        assert_eq!(dac.code.get(), Some(120));

        // the same pitch goes out again once there is a scale
        shared.publish_mask(NoteMask::ALL);
        pipeline.tick(&shared);
        assert_eq!(dac.writes.get(), writes + 1);
        assert_eq!(dac.code.get(), Some(120));
        assert!(dac.gate_open.get());
    }

    #[test]
    fn scale_change_moves_the_output() {
        let cv = Cell::new(512);
        let dac = DacProbe::default();
        let gate = GateProbe::default();
        let mut queue: Queue<ButtonEdge, EDGE_QUEUE_LEN> = Queue::new();
        let (_, rx) = queue.split();
        let shared = SharedState::new(NoteMask::ALL);
        let mut pipeline = SamplePipeline::new(MockAdc(&cv), MockDac(&dac), MockGate(&gate), rx);

        run(&mut pipeline, &shared, SETTLE_TICKS);

        shared.publish_mask(NoteMask::from_notes(&[Note::G]));
        pipeline.tick(&shared);
        assert_eq!(pipeline.last_pitch(), Some(Semitone::new(55)));
        assert_eq!(shared.sounding(), Some(Note::G));
    }

    #[test]
    fn autosave_is_requested_after_the_delay() {
        let cv = Cell::new(0);
        let dac = DacProbe::default();
        let gate = GateProbe::default();
        let mut queue: Queue<ButtonEdge, EDGE_QUEUE_LEN> = Queue::new();
        let (mut tx, rx) = queue.split();
        let shared = SharedState::new(NoteMask::ALL);
        let mut pipeline = SamplePipeline::new(MockAdc(&cv), MockDac(&dac), MockGate(&gate), rx);

        tx.enqueue(PRESS).unwrap();

        // the tick that sees the press counts as the first one
        run(&mut pipeline, &shared, AUTOSAVE_TICKS as usize - 1);
        assert!(!shared.take_autosave());

        pipeline.tick(&shared);
        assert!(shared.take_autosave());

        run(&mut pipeline, &shared, 2 * AUTOSAVE_TICKS as usize);
        assert!(!shared.take_autosave());
    }

    #[test]
    fn another_press_restarts_the_autosave_delay() {
        let cv = Cell::new(0);
        let dac = DacProbe::default();
        let gate = GateProbe::default();
        let mut queue: Queue<ButtonEdge, EDGE_QUEUE_LEN> = Queue::new();
        let (mut tx, rx) = queue.split();
        let shared = SharedState::new(NoteMask::ALL);
        let mut pipeline = SamplePipeline::new(MockAdc(&cv), MockDac(&dac), MockGate(&gate), rx);

        tx.enqueue(PRESS).unwrap();
        run(&mut pipeline, &shared, AUTOSAVE_TICKS as usize / 2);

        tx.enqueue(PRESS).unwrap();
        run(&mut pipeline, &shared, AUTOSAVE_TICKS as usize - 1);
        assert!(!shared.take_autosave());

        pipeline.tick(&shared);
        assert!(shared.take_autosave());
    }

    #[test]
    fn press_withdraws_a_pending_autosave() {
        let cv = Cell::new(0);
        let dac = DacProbe::default();
        let gate = GateProbe::default();
        let mut queue: Queue<ButtonEdge, EDGE_QUEUE_LEN> = Queue::new();
        let (mut tx, rx) = queue.split();
        let shared = SharedState::new(NoteMask::ALL);
        let mut pipeline = SamplePipeline::new(MockAdc(&cv), MockDac(&dac), MockGate(&gate), rx);

        shared.raise_autosave();
        tx.enqueue(PRESS).unwrap();
        pipeline.tick(&shared);
        assert!(!shared.take_autosave());
    }

    #[test]
    fn touch_without_an_edge_restarts_the_autosave_delay() {
        let cv = Cell::new(0);
        let dac = DacProbe::default();
        let gate = GateProbe::default();
        let mut queue: Queue<ButtonEdge, EDGE_QUEUE_LEN> = Queue::new();
        let (_, rx) = queue.split();
        let shared = SharedState::new(NoteMask::ALL);
        let mut pipeline = SamplePipeline::new(MockAdc(&cv), MockDac(&dac), MockGate(&gate), rx);

        shared.mark_touched();
        run(&mut pipeline, &shared, AUTOSAVE_TICKS as usize - 1);
        assert!(!shared.take_autosave());
        assert!(!shared.take_touched());

        pipeline.tick(&shared);
        assert!(shared.take_autosave());
    }

    #[test]
    fn no_autosave_without_a_press() {
        let cv = Cell::new(0);
        let dac = DacProbe::default();
        let gate = GateProbe::default();
        let mut queue: Queue<ButtonEdge, EDGE_QUEUE_LEN> = Queue::new();
        let (_, rx) = queue.split();
        let shared = SharedState::new(NoteMask::ALL);
        let mut pipeline = SamplePipeline::new(MockAdc(&cv), MockDac(&dac), MockGate(&gate), rx);

        run(&mut pipeline, &shared, 2 * AUTOSAVE_TICKS as usize);
        assert!(!shared.take_autosave());
    }

    #[test]
    fn patched_trigger_samples_and_holds() {
        let cv = Cell::new(512);
        let dac = DacProbe::default();
        let gate = GateProbe::default();
        gate.connected.set(true);
        let mut queue: Queue<ButtonEdge, EDGE_QUEUE_LEN> = Queue::new();
        let (_, rx) = queue.split();
        let shared = SharedState::new(NoteMask::ALL);
        let mut pipeline = SamplePipeline::new(MockAdc(&cv), MockDac(&dac), MockGate(&gate), rx);

        run(&mut pipeline, &shared, SETTLE_TICKS);
        assert_eq!(dac.writes.get(), 0);

        gate.fire();
        pipeline.tick(&shared);
        assert_eq!(dac.code.get(), Some(120));

        cv.set(1000);
        run(&mut pipeline, &shared, SETTLE_TICKS);
        assert_eq!(dac.code.get(), Some(120));
        assert_eq!(dac.writes.get(), 1);

        gate.fire();
        pipeline.tick(&shared);
        assert_eq!(dac.code.get(), Some(234));
        assert_eq!(dac.writes.get(), 2);
    }

    #[test]
    fn unpatching_the_trigger_goes_back_to_free_running() {
        let cv = Cell::new(512);
        let dac = DacProbe::default();
        let gate = GateProbe::default();
        gate.connected.set(true);
        let mut queue: Queue<ButtonEdge, EDGE_QUEUE_LEN> = Queue::new();
        let (_, rx) = queue.split();
        let shared = SharedState::new(NoteMask::ALL);
        let mut pipeline = SamplePipeline::new(MockAdc(&cv), MockDac(&dac), MockGate(&gate), rx);

        run(&mut pipeline, &shared, SETTLE_TICKS);
        assert_eq!(pipeline.last_pitch(), None);

        gate.connected.set(false);
        pipeline.tick(&shared);
        assert_eq!(pipeline.last_pitch(), Some(Semitone::new(60)));
    }
}
