//! Background input polling.
//!
//! ```text
//! ┌──────────────────┐   sync_channel(n)   ┌──────────────────┐
//! │   Input Thread   │ ──────────────────▶ │ Application loop │
//! │  EventSource::   │    InputEvent       │  recv_timeout()  │
//! │     poll()       │                     │  layout + paint  │
//! └──────────────────┘                     └──────────────────┘
//! ```
//!
//! The polling thread never touches the control tree; the single consumer
//! owns every layout and paint pass.

use crate::input::convert_key;
use crossterm::event::{self, Event};
use fogterm_core::KeyInfo;
use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TryRecvError, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

/// Event forwarded from the input thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A key was pressed.
    Key(KeyInfo),
    /// The terminal now has this many columns and rows.
    Resize(u16, u16),
}

/// Something that can be polled for input events.
pub trait EventSource: Send + 'static {
    /// Wait up to `timeout` for the next event.
    ///
    /// # Errors
    ///
    /// An error ends the polling thread.
    fn poll(&mut self, timeout: Duration) -> io::Result<Option<InputEvent>>;
}

/// Events from the real terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn poll(&mut self, timeout: Duration) -> io::Result<Option<InputEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        Ok(match event::read()? {
            Event::Key(key) => convert_key(&key).map(InputEvent::Key),
            Event::Resize(width, height) => Some(InputEvent::Resize(width, height)),
            _ => None,
        })
    }
}

/// Fixed list of events, handed out one per poll.
#[derive(Debug, Default, Clone)]
pub struct ScriptedEvents {
    events: VecDeque<InputEvent>,
}

impl ScriptedEvents {
    /// Source that yields `events` in order, then nothing.
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
}

impl EventSource for ScriptedEvents {
    fn poll(&mut self, timeout: Duration) -> io::Result<Option<InputEvent>> {
        match self.events.pop_front() {
            Some(event) => Ok(Some(event)),
            None => {
                thread::sleep(timeout);
                Ok(None)
            }
        }
    }
}

/// Handle to the polling thread and the receiving end of its queue.
#[derive(Debug)]
pub struct InputSource {
    rx: Receiver<InputEvent>,
    shutdown: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<()>>,
}

impl InputSource {
    /// Spawn a thread polling `source` every `poll_interval`, queueing at
    /// most `capacity` events.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn<S: EventSource>(
        source: S,
        poll_interval: Duration,
        capacity: usize,
    ) -> io::Result<Self> {
        let (tx, rx) = mpsc::sync_channel(capacity.max(1));
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = Arc::clone(&shutdown);

        let thread_handle = thread::Builder::new()
            .name("fogterm-input".to_string())
            .spawn(move || input_loop(source, &tx, &shutdown_clone, poll_interval))?;
        debug!(?poll_interval, capacity, "input thread started");

        Ok(Self {
            rx,
            shutdown,
            thread_handle: Some(thread_handle),
        })
    }

    /// Next queued event, if any (non-blocking).
    pub fn try_recv(&self) -> Option<InputEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Wait up to `timeout` for the next event.
    ///
    /// # Errors
    ///
    /// [`RecvTimeoutError::Timeout`] if nothing arrived, `Disconnected` once
    /// the thread has ended and the queue is empty.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<InputEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    /// Whether the polling thread is still alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.thread_handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Signal the thread and wait for it to exit. Safe to call twice.
    pub fn stop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread_handle.take() {
            if handle.join().is_err() {
                warn!("input thread panicked");
            }
            debug!("input thread stopped");
        }
    }
}

impl Drop for InputSource {
    fn drop(&mut self) {
        self.stop();
    }
}

fn input_loop<S: EventSource>(
    mut source: S,
    tx: &SyncSender<InputEvent>,
    shutdown: &AtomicBool,
    poll_interval: Duration,
) {
    while !shutdown.load(Ordering::Relaxed) {
        let event = match source.poll(poll_interval) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(err) => {
                warn!(%err, "input polling failed");
                return;
            }
        };

        let mut pending = event;
        loop {
            match tx.try_send(pending) {
                Ok(()) => break,
                Err(TrySendError::Full(event)) => {
                    if shutdown.load(Ordering::Relaxed) {
                        return;
                    }
                    pending = event;
                    thread::sleep(poll_interval);
                }
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fogterm_core::Key;
    use std::time::Instant;

    const INTERVAL: Duration = Duration::from_millis(5);

    fn key(c: char) -> InputEvent {
        InputEvent::Key(KeyInfo::new(Key::Char(c)))
    }

    #[test]
    fn test_events_arrive_in_order() {
        let script = ScriptedEvents::new([key('a'), InputEvent::Resize(40, 10), key('b')]);
        let mut source = InputSource::spawn(script, INTERVAL, 8).unwrap();

        let timeout = Duration::from_secs(2);
        assert_eq!(source.recv_timeout(timeout).unwrap(), key('a'));
        assert_eq!(source.recv_timeout(timeout).unwrap(), InputEvent::Resize(40, 10));
        assert_eq!(source.recv_timeout(timeout).unwrap(), key('b'));
        source.stop();
    }

    #[test]
    fn test_stop_is_prompt_and_idempotent() {
        let mut source = InputSource::spawn(ScriptedEvents::default(), INTERVAL, 4).unwrap();
        assert!(source.is_running());

        let start = Instant::now();
        source.stop();
        source.stop();
        assert!(start.elapsed() < Duration::from_millis(500));
        assert!(!source.is_running());
        assert!(source.try_recv().is_none());
    }

    #[test]
    fn test_full_queue_does_not_block_shutdown() {
        let script = ScriptedEvents::new((0..10).map(|i| key(char::from(b'a' + i))));
        let mut source = InputSource::spawn(script, INTERVAL, 1).unwrap();
        thread::sleep(Duration::from_millis(30));

        let start = Instant::now();
        source.stop();
        assert!(start.elapsed() < Duration::from_millis(500));
        assert_eq!(source.try_recv(), Some(key('a')));
    }

    #[test]
    fn test_failing_source_ends_thread() {
        struct Broken;
        impl EventSource for Broken {
            fn poll(&mut self, _timeout: Duration) -> io::Result<Option<InputEvent>> {
                Err(io::Error::other("no tty"))
            }
        }

        let source = InputSource::spawn(Broken, INTERVAL, 1).unwrap();
        assert_eq!(
            source.recv_timeout(Duration::from_secs(2)),
            Err(RecvTimeoutError::Disconnected)
        );
    }
}
