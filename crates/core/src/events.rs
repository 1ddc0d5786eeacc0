//! Observer bus for widget notifications

use std::collections::HashMap;

use crate::game::{GameOutcome, MoveRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Move,
    GameOver,
    Change,
    Check,
    Checkmate,
    Draw,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Move(MoveRecord),
    GameOver(GameOutcome),
    /// Carries the FEN composed after the mutation settled
    Change { fen: String },
    Check,
    Checkmate,
    Draw,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Move(_) => EventKind::Move,
            Event::GameOver(_) => EventKind::GameOver,
            Event::Change { .. } => EventKind::Change,
            Event::Check => EventKind::Check,
            Event::Checkmate => EventKind::Checkmate,
            Event::Draw => EventKind::Draw,
        }
    }
}

pub type Listener = Box<dyn FnMut(&Event)>;

/// Listeners per event kind, called in registration order
#[derive(Default)]
pub struct EventBus {
    listeners: HashMap<EventKind, Vec<Listener>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(&mut self, kind: EventKind, callback: F)
    where
        F: FnMut(&Event) + 'static,
    {
        self.listeners.entry(kind).or_default().push(Box::new(callback));
    }

    pub fn emit(&mut self, event: Event) {
        if let Some(listeners) = self.listeners.get_mut(&event.kind()) {
            for listener in listeners.iter_mut() {
                listener(&event);
            }
        }
    }
}
