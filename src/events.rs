//! Typed change notifications.
//!
//! Every mutation performed by [`Scope`](crate::scope::Scope) produces one or
//! more [`ScopeEvent`]s. Collaborators (slider mirrors, label panels,
//! renderers) subscribe through [`EventController::subscribe`] with an
//! [`EventFilter`] and receive the matching events on an `mpsc` channel, in
//! the order the mutations happened.

use std::sync::mpsc::{Receiver, Sender};

use crate::cursor::{CursorId, CursorShape, MarkerIndex};
use crate::geom::Point;
use crate::transform::DependentControl;

/// Bit mask of event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventKind(pub u32);

impl EventKind {
    /// A marker position changed.
    pub const MARKER: Self = Self(1 << 0);
    /// A cursor shape changed.
    pub const SHAPE: Self = Self(1 << 1);
    /// The selected cursor changed.
    pub const SELECTION: Self = Self(1 << 2);
    /// The zoomed trigger-position control changed.
    pub const ZOOM_CONTROL: Self = Self(1 << 3);
    /// The trigger position changed.
    pub const TRIGGER: Self = Self(1 << 4);
    /// A frame entered the history.
    pub const FRAME: Self = Self(1 << 5);
    /// The history capacity changed.
    pub const HISTORY: Self = Self(1 << 6);
    /// A channel scale or used flag changed.
    pub const CHANNEL: Self = Self(1 << 7);
    /// A horizontal setting (timebase, frequencybase, format, zoom) changed.
    pub const HORIZONTAL: Self = Self(1 << 8);

    /// Wildcard matching every kind.
    pub const ALL: Self = Self(u32::MAX);

    /// Combine two kinds.
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Check whether the kinds share at least one bit.
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }
}

impl std::ops::BitOr for EventKind {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// A change notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScopeEvent {
    /// A marker of a cursor moved.
    MarkerMoved {
        /// Cursor that owns the marker.
        cursor: CursorId,
        /// Which marker moved.
        marker: MarkerIndex,
        /// New position in divisions.
        position: Point,
    },
    /// A cursor changed shape.
    ShapeChanged {
        /// Affected cursor.
        cursor: CursorId,
        /// New shape.
        shape: CursorShape,
    },
    /// A different cursor is selected.
    SelectionChanged {
        /// Previously selected cursor.
        from: CursorId,
        /// Newly selected cursor.
        to: CursorId,
    },
    /// The zoomed trigger-position control was recomputed and differs from
    /// its previous state.
    ZoomControlChanged(DependentControl),
    /// The trigger position (fraction of the record) changed.
    TriggerPositionChanged(f64),
    /// A frame was inserted into the history.
    FrameInserted {
        /// Frames retained after the insertion.
        retained: usize,
    },
    /// The history capacity changed.
    HistoryResized {
        /// New capacity.
        capacity: usize,
    },
    /// A channel was switched on or off.
    ChannelUsedChanged {
        /// Cursor of the affected channel.
        cursor: CursorId,
        /// New used flag.
        used: bool,
    },
    /// A channel scale (gain, magnitude, offset) changed.
    ChannelScaleChanged {
        /// Cursor of the affected channel.
        cursor: CursorId,
    },
    /// A horizontal setting changed.
    HorizontalChanged,
}

impl ScopeEvent {
    /// Category of the event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::MarkerMoved { .. } => EventKind::MARKER,
            Self::ShapeChanged { .. } => EventKind::SHAPE,
            Self::SelectionChanged { .. } => EventKind::SELECTION,
            Self::ZoomControlChanged(_) => EventKind::ZOOM_CONTROL,
            Self::TriggerPositionChanged(_) => EventKind::TRIGGER,
            Self::FrameInserted { .. } => EventKind::FRAME,
            Self::HistoryResized { .. } => EventKind::HISTORY,
            Self::ChannelUsedChanged { .. } | Self::ChannelScaleChanged { .. } => {
                EventKind::CHANNEL
            }
            Self::HorizontalChanged => EventKind::HORIZONTAL,
        }
    }
}

/// Subscriber filter: an event is delivered when its kind intersects the
/// mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventFilter {
    mask: EventKind,
}

impl EventFilter {
    /// Accept every event.
    pub const fn all() -> Self {
        Self {
            mask: EventKind::ALL,
        }
    }

    /// Accept only events matching `mask`.
    pub const fn only(mask: EventKind) -> Self {
        Self { mask }
    }

    /// Check whether an event passes the filter.
    pub fn matches(&self, event: &ScopeEvent) -> bool {
        event.kind().intersects(self.mask)
    }
}

impl Default for EventFilter {
    fn default() -> Self {
        Self::all()
    }
}

#[derive(Debug)]
struct Subscriber {
    filter: EventFilter,
    sender: Sender<ScopeEvent>,
}

/// Distributes change notifications to subscribers.
#[derive(Debug, Default)]
pub struct EventController {
    subscribers: Vec<Subscriber>,
}

impl EventController {
    /// Create a controller without subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to events matching `filter`.
    pub fn subscribe(&mut self, filter: EventFilter) -> Receiver<ScopeEvent> {
        let (sender, receiver) = std::sync::mpsc::channel();
        self.subscribers.push(Subscriber { filter, sender });
        receiver
    }

    /// Subscribe to every event.
    pub fn subscribe_all(&mut self) -> Receiver<ScopeEvent> {
        self.subscribe(EventFilter::all())
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Deliver events in order. Subscribers whose receiver was dropped are
    /// removed.
    pub fn emit_all(&mut self, events: &[ScopeEvent]) {
        if events.is_empty() {
            return;
        }
        self.subscribers.retain(|subscriber| {
            events
                .iter()
                .filter(|event| subscriber.filter.matches(event))
                .all(|event| subscriber.sender.send(*event).is_ok())
        });
    }
}
