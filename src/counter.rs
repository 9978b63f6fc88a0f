// The click counter from the first iteration of the demo.
// Every change is announced on the event channel.

use std::sync::mpsc::Sender;

use tracing::debug;

use crate::events::Event;

pub struct Counter {
    count: i64,
    events: Sender<Event>,
}

impl Counter {
    pub fn new(events: Sender<Event>) -> Self {
        Self { count: 0, events }
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    pub fn increment(&mut self) -> i64 {
        self.count += 1;
        self.emit()
    }

    pub fn decrement(&mut self) -> i64 {
        self.count -= 1;
        self.emit()
    }

    pub fn reset(&mut self) -> i64 {
        self.count = 0;
        self.emit()
    }

    fn emit(&self) -> i64 {
        debug!(count = self.count, "sent counter");
        // receiver gone means the window closed; nothing left to tell
        let _ = self.events.send(Event::CountChanged(self.count));
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events;

    #[test]
    fn counts_and_announces() {
        let (tx, rx) = events::channel();
        let mut c = Counter::new(tx);
        assert_eq!(c.increment(), 1);
        assert_eq!(c.increment(), 2);
        assert_eq!(c.decrement(), 1);
        assert_eq!(c.decrement(), 0);
        assert_eq!(c.decrement(), -1);
        assert_eq!(c.reset(), 0);

        let seen: Vec<Event> = rx.try_iter().collect();
        let counts: Vec<i64> = seen
            .into_iter()
            .map(|e| match e {
                Event::CountChanged(n) => n,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(counts, vec![1, 2, 1, 0, -1, 0]);
    }

    #[test]
    fn survives_closed_channel() {
        let (tx, rx) = events::channel();
        drop(rx);
        let mut c = Counter::new(tx);
        assert_eq!(c.increment(), 1);
    }
}
