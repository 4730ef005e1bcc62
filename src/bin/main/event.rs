//! Terminal event plumbing: a polling thread turns crossterm events and a
//! fixed tick into one channel the main loop can block on.

use color_eyre::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug)]
pub enum Event {
    /// A regular heartbeat; the app runs its deferred transitions on it.
    Tick,
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
}

#[derive(Debug)]
pub struct EventHandler {
    receiver: mpsc::Receiver<Event>,
    #[allow(dead_code)]
    handler: thread::JoinHandle<()>,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        let tick_rate = Duration::from_millis(tick_rate_ms);
        let (sender, receiver) = mpsc::channel();

        let handler = thread::spawn(move || {
            let mut last_tick = Instant::now();

            loop {
                let timeout = tick_rate.saturating_sub(last_tick.elapsed());

                if event::poll(timeout).expect("couldn't poll for terminal events") {
                    let forwarded = match event::read().expect("couldn't read a terminal event") {
                        // key releases are only reported on some platforms;
                        // act on presses alone so every platform behaves the
                        // same
                        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                            Some(Event::Key(key))
                        }
                        CrosstermEvent::Key(_) => None,
                        CrosstermEvent::Mouse(mouse) => Some(Event::Mouse(mouse)),
                        CrosstermEvent::Resize(width, height) => {
                            Some(Event::Resize(width, height))
                        }
                        _ => None,
                    };

                    if let Some(event) = forwarded {
                        if sender.send(event).is_err() {
                            break;
                        }
                    }
                }

                if last_tick.elapsed() >= tick_rate {
                    if sender.send(Event::Tick).is_err() {
                        break;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        EventHandler { receiver, handler }
    }

    /// Blocks until the next event.
    pub fn next(&self) -> Result<Event> {
        Ok(self.receiver.recv()?)
    }
}
