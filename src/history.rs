//! Digital phosphor history.
//!
//! [`HistoryBuffer`] keeps the most recently captured [`Frame`]s, newest
//! first. Inserting a frame recycles the oldest slot instead of allocating a
//! new one, so at a steady capacity the vertex buffers are reused forever.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::geom::Point;

/// Vertex geometry of one channel inside a frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelTrace {
    vertices: Vec<Point>,
    used: bool,
}

impl ChannelTrace {
    /// Create a trace from vertices and the channel's used flag.
    pub fn new(vertices: Vec<Point>, used: bool) -> Self {
        Self { vertices, used }
    }

    /// Trace vertices in grid divisions.
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Used flag captured when the frame was inserted.
    pub fn is_used(&self) -> bool {
        self.used
    }

    pub(crate) fn refill(&mut self, used: bool, vertices: impl IntoIterator<Item = Point>) {
        self.used = used;
        self.vertices.clear();
        self.vertices.extend(vertices);
    }
}

/// One rendering snapshot: per-channel voltage and spectrum geometry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    voltage: Vec<ChannelTrace>,
    spectrum: Vec<ChannelTrace>,
    filled: bool,
}

impl Frame {
    /// Create a frame from voltage and spectrum traces.
    pub fn new(voltage: Vec<ChannelTrace>, spectrum: Vec<ChannelTrace>) -> Self {
        Self {
            voltage,
            spectrum,
            filled: true,
        }
    }

    /// Voltage trace of a channel.
    pub fn voltage(&self, channel: usize) -> Option<&ChannelTrace> {
        self.voltage.get(channel)
    }

    /// Spectrum trace of a channel. Absent outside T-Y mode.
    pub fn spectrum(&self, channel: usize) -> Option<&ChannelTrace> {
        self.spectrum.get(channel)
    }

    /// Number of voltage channels in the frame.
    pub fn channels(&self) -> usize {
        self.voltage.len()
    }

    /// Whether the slot holds captured data.
    pub fn is_filled(&self) -> bool {
        self.filled
    }

    /// Overwrite this frame with another, reusing allocations.
    pub(crate) fn overwrite(&mut self, other: &Frame) {
        self.voltage.clone_from(&other.voltage);
        self.spectrum.clone_from(&other.spectrum);
        self.filled = other.filled;
    }

    /// Prepare the frame for refilling with `channels` voltage traces and
    /// `spectrum_channels` spectrum traces.
    pub(crate) fn reset(
        &mut self,
        channels: usize,
        spectrum_channels: usize,
    ) -> (&mut [ChannelTrace], &mut [ChannelTrace]) {
        self.voltage.resize_with(channels, ChannelTrace::default);
        self.spectrum.resize_with(spectrum_channels, ChannelTrace::default);
        self.filled = true;
        (self.voltage.as_mut_slice(), self.spectrum.as_mut_slice())
    }
}

/// Bounded, newest-first ring of frames.
#[derive(Debug, Clone, Default)]
pub struct HistoryBuffer {
    slots: VecDeque<Frame>,
    capacity: usize,
}

impl HistoryBuffer {
    /// Create a buffer with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let mut buffer = Self::default();
        buffer.set_capacity(capacity);
        buffer
    }

    /// Configured capacity. Zero keeps only the latest frame.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Resize the buffer: drop the oldest slots when shrinking, append empty
    /// slots when growing.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        if self.slots.len() > capacity {
            debug!(
                from = self.slots.len(),
                to = capacity,
                "dropping oldest history frames"
            );
            self.slots.truncate(capacity);
        }
        while self.slots.len() < capacity {
            self.slots.push_back(Frame::default());
        }
    }

    /// Insert a frame as the newest entry, recycling the oldest slot.
    pub fn insert(&mut self, frame: &Frame) {
        self.insert_with(|slot| slot.overwrite(frame));
    }

    /// Insert a frame built in place into the recycled slot.
    pub fn insert_with(&mut self, fill: impl FnOnce(&mut Frame)) {
        if self.slots.is_empty() {
            self.slots.push_back(Frame::default());
        }
        let mut slot = self.slots.pop_back().unwrap_or_default();
        fill(&mut slot);
        self.slots.push_front(slot);
        trace!(retained = self.len(), "history frame inserted");
    }

    /// Number of filled frames.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|frame| frame.is_filled()).count()
    }

    /// Whether no frame has been captured yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Filled frames, newest first, with their age index.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Frame)> + '_ {
        self.slots
            .iter()
            .filter(|frame| frame.is_filled())
            .enumerate()
    }

    /// The newest frame.
    pub fn latest(&self) -> Option<&Frame> {
        self.slots.front().filter(|frame| frame.is_filled())
    }

    /// Intensity of a frame by age: the newest is drawn at full intensity,
    /// each older one 10% darker than the base color.
    pub fn fade(age: usize) -> f32 {
        1.0 / (1.0 + 0.1 * age as f32)
    }
}
