//! Event bus for a relaxation run.
//!
//! Events raised during a frame (parameter edits, new anchors) are queued
//! and handed to every sink together when the driver flushes at the frame
//! boundary, so sinks always see them in emission order.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::events::SimulationEvent;
use crate::sinks::EventSink;

/// Queues simulation events and fans them out to sinks on flush.
pub struct EventBus {
    queue: Sender<SimulationEvent>,
    pending: Receiver<SimulationEvent>,
    sinks: Vec<Box<dyn EventSink>>,
    enabled: bool,
}

impl EventBus {
    /// An enabled bus with no sinks.
    pub fn new() -> Self {
        let (queue, pending) = mpsc::channel();
        Self {
            queue,
            pending,
            sinks: Vec::new(),
            enabled: true,
        }
    }

    /// Adds a sink. It receives events flushed from now on.
    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Turns event collection on or off.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether events are being collected.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Queues `event` for the next flush.
    ///
    /// Dropped when the bus is disabled or nothing is listening.
    pub fn emit(&self, event: SimulationEvent) {
        if !self.enabled || self.sinks.is_empty() {
            return;
        }
        // `pending` is owned by the bus, so the channel is never closed here.
        let _ = self.queue.send(event);
    }

    /// Delivers every queued event to every sink, oldest first.
    pub fn flush(&mut self) {
        for event in self.pending.try_iter() {
            for sink in self.sinks.iter_mut() {
                sink.handle(&event);
            }
        }
    }

    /// Final flush at the end of a run, then `finalize` on each sink.
    pub fn finish(&mut self) {
        self.flush();
        self.sinks.iter_mut().for_each(|sink| sink.finalize());
    }

    /// Number of sinks attached.
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
