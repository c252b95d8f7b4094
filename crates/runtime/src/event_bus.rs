use crate::frame::Frame;

/// What part of the planner produced an event.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    Search,
    Route,
    Trip,
    Alert,
    Camera,
    View,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Search => "search",
            EventKind::Route => "route",
            EventKind::Trip => "trip",
            EventKind::Alert => "alert",
            EventKind::Camera => "camera",
            EventKind::View => "view",
        }
    }
}

/// Frame-stamped record of a state change, kept for replay and inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub frame_index: u64,
    pub kind: EventKind,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, frame: Frame, kind: EventKind, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(frame = frame.index, kind = kind.as_str(), "{message}");
        self.events.push(Event {
            frame_index: frame.index,
            kind,
            message,
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn of_kind(&self, kind: EventKind) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
