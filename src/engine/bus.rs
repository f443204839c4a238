//! FIFO event queue. Events are reduced strictly in push order.

use std::collections::VecDeque;

use super::events::Event;

#[derive(Debug, Default)]
pub struct EventBus {
    queue: VecDeque<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    pub fn pop(&mut self) -> Option<Event> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut bus = EventBus::new();
        bus.push(Event::Timer { ts: 1 });
        bus.push(Event::Timer { ts: 2 });
        assert_eq!(bus.len(), 2);
        assert_eq!(bus.pop(), Some(Event::Timer { ts: 1 }));
        assert_eq!(bus.pop(), Some(Event::Timer { ts: 2 }));
        assert!(bus.is_empty());
    }
}
