use std::collections::VecDeque;

use tracing::trace;

use crate::error::DxgiResult;
use crate::presentation_loop::EventSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimEvent {
    Paint,
    Key(u32),
    /// Like closing the window: this event is still delivered, nothing after it.
    Close,
}

/// Replays a fixed list of events, then reports exit.
#[derive(Debug, Default)]
pub struct ScriptedEvents {
    pending: VecDeque<SimEvent>,
    dispatched: Vec<SimEvent>,
    closed: bool,
}

impl ScriptedEvents {
    pub fn new(events: impl IntoIterator<Item = SimEvent>) -> Self {
        Self {
            pending: events.into_iter().collect(),
            ..Self::default()
        }
    }

    /// `frames` paint events followed by a close.
    pub fn frames(frames: usize) -> Self {
        Self::new(
            std::iter::repeat_n(SimEvent::Paint, frames).chain(std::iter::once(SimEvent::Close)),
        )
    }

    pub fn dispatched(&self) -> &[SimEvent] {
        &self.dispatched
    }
}

impl EventSource for ScriptedEvents {
    type Event = SimEvent;

    fn next_event(&mut self) -> DxgiResult<Option<SimEvent>> {
        if self.closed {
            return Ok(None);
        }
        Ok(self.pending.pop_front())
    }

    fn dispatch(&mut self, event: &SimEvent) {
        trace!(?event, "dispatching scripted event");
        if *event == SimEvent::Close {
            self.closed = true;
        }
        self.dispatched.push(*event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_is_delivered_after_close() {
        let mut events = ScriptedEvents::new([SimEvent::Key(27), SimEvent::Close, SimEvent::Paint]);
        while let Some(event) = events.next_event().unwrap() {
            events.dispatch(&event);
        }
        assert_eq!(events.dispatched(), &[SimEvent::Key(27), SimEvent::Close]);
    }

    #[test]
    fn frames_ends_with_close() {
        let events = ScriptedEvents::frames(3);
        assert_eq!(events.pending.len(), 4);
        assert_eq!(events.pending.back(), Some(&SimEvent::Close));
    }
}
