use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent};

use crate::definition::DefinitionResult;
use crate::timer::{FeedbackTimer, TimerId};

/// Unified event type consumed by the session loop
#[derive(Clone, Debug, PartialEq)]
pub enum SpellEvent {
    Key(KeyEvent),
    Resize,
    Tick,
    /// The armed feedback timer expired.
    TimerExpired(TimerId),
    /// A definition lookup resolved.
    Definition {
        word: String,
        result: DefinitionResult,
    },
    /// Every producer hung up.
    Closed,
}

/// Source of session events (keyboard, resize, lookup completions)
pub trait SpellEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<SpellEvent, RecvTimeoutError>;

    /// Handle for background producers such as definition lookups.
    fn sender(&self) -> Sender<SpellEvent>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    tx: Sender<SpellEvent>,
    rx: Receiver<SpellEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let input_tx = tx.clone();

        std::thread::spawn(move || loop {
            let ev = match event::read() {
                Ok(CtEvent::Key(key)) => SpellEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => SpellEvent::Resize,
                Ok(_) => continue,
                Err(e) => {
                    log::warn!("terminal input failed: {e}");
                    let _ = input_tx.send(SpellEvent::Closed);
                    break;
                }
            };
            if input_tx.send(ev).is_err() {
                break;
            }
        });

        Self { tx, rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SpellEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<SpellEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn sender(&self) -> Sender<SpellEvent> {
        self.tx.clone()
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Event source fed by the test through a channel
pub struct TestEventSource {
    tx: Sender<SpellEvent>,
    rx: Receiver<SpellEvent>,
}

impl TestEventSource {
    pub fn new() -> (Self, Sender<SpellEvent>) {
        let (tx, rx) = mpsc::channel();
        (
            Self {
                tx: tx.clone(),
                rx,
            },
            tx,
        )
    }
}

impl SpellEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<SpellEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn sender(&self) -> Sender<SpellEvent> {
        self.tx.clone()
    }
}

/// Runner that advances the session one event at a time.
///
/// Owns the feedback timer so its expiry is delivered in sequence with input,
/// never concurrently with it.
pub struct Runner<E: SpellEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    timer: FeedbackTimer,
}

impl<E: SpellEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
            timer: FeedbackTimer::new(),
        }
    }

    pub fn timer(&self) -> &FeedbackTimer {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut FeedbackTimer {
        &mut self.timer
    }

    /// Blocks until the next event, the timer deadline or the tick interval,
    /// whichever comes first.
    pub fn step(&mut self) -> SpellEvent {
        let now = Instant::now();
        if let Some(id) = self.timer.take_expired(now) {
            return SpellEvent::TimerExpired(id);
        }

        let tick = self.ticker.interval();
        let wait = self.timer.remaining(now).map_or(tick, |r| r.min(tick));

        match self.event_source.recv_timeout(wait) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => match self.timer.take_expired(Instant::now()) {
                Some(id) => SpellEvent::TimerExpired(id),
                None => SpellEvent::Tick,
            },
            Err(RecvTimeoutError::Disconnected) => SpellEvent::Closed,
        }
    }
}
