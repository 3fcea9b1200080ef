use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};

#[derive(Clone, Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Blocking event source for the single-threaded poll loop. `next` waits
/// for terminal input up to the remainder of the current tick and emits
/// `Tick` when the interval elapses, so sampling cadence survives bursts
/// of key presses.
pub struct EventHandler {
    tick_rate: Duration,
    last_tick: Instant,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        EventHandler {
            tick_rate,
            last_tick: Instant::now(),
        }
    }

    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    pub fn set_tick_rate(&mut self, tick_rate: Duration) {
        self.tick_rate = tick_rate;
    }

    pub fn next(&mut self) -> io::Result<Event> {
        loop {
            let elapsed = self.last_tick.elapsed();
            if elapsed >= self.tick_rate {
                self.last_tick = Instant::now();
                return Ok(Event::Tick);
            }

            if event::poll(self.tick_rate - elapsed)? {
                match event::read()? {
                    CrosstermEvent::Key(key) => return Ok(Event::Key(key)),
                    CrosstermEvent::Resize(_, _) => return Ok(Event::Resize),
                    _ => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_rate_is_adjustable() {
        let mut events = EventHandler::new(Duration::from_millis(2000));
        assert_eq!(events.tick_rate(), Duration::from_millis(2000));
        events.set_tick_rate(Duration::from_millis(500));
        assert_eq!(events.tick_rate(), Duration::from_millis(500));
    }
}
