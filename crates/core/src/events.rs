use crate::HandType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    RoundStarted {
        target_score: i64,
        hands: u32,
        discards: u32,
    },
    RoundEnded {
        victory: bool,
        final_score: i64,
    },
    HandScored {
        hand: HandType,
        chips: i64,
        mult: i64,
        x_mult: f64,
        score: i64,
    },
    HandDiscarded {
        count: usize,
        discards_remaining: u32,
    },
    JokerAdded { id: String, instance_id: u64 },
    JokerRemoved { id: String, instance_id: u64 },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
