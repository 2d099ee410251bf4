//! Dedicated OS-thread hotkey listener using `rdev::listen`.
//!
//! `rdev::listen` has no graceful shutdown API. Dropping [`HotkeyListener`]
//! sets a stop flag so the callback discards further events, but the thread
//! stays blocked in the rdev event loop until the process exits.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tokio::sync::mpsc;

use super::HotkeyEvent;

/// Handle to a running hotkey listener thread.
pub struct HotkeyListener {
    stop: Arc<AtomicBool>,
    /// Never joined: `rdev::listen` does not return.
    _thread: std::thread::JoinHandle<()>,
}

impl HotkeyListener {
    /// Spawn the listener thread.
    ///
    /// Each press of `key` sends [`HotkeyEvent::ToggleMenu`] on `tx` and then
    /// calls `wake` so the UI thread picks the event up even while its
    /// window is hidden. The send never blocks: the callback runs inside the
    /// OS input hook, so a press is dropped when the channel is full.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the OS refuses to create the thread.
    pub fn start<W>(
        key: rdev::Key,
        tx: mpsc::Sender<HotkeyEvent>,
        wake: W,
    ) -> std::io::Result<Self>
    where
        W: Fn() + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_clone = Arc::clone(&stop);

        let thread = std::thread::Builder::new()
            .name("hotkey-listener".into())
            .spawn(move || {
                let result = rdev::listen(move |event| {
                    if stop_clone.load(Ordering::Relaxed) {
                        return;
                    }
                    match event.event_type {
                        rdev::EventType::KeyPress(k) if k == key => {
                            forward(&tx, HotkeyEvent::ToggleMenu, &wake);
                        }
                        _ => {}
                    }
                });

                if let Err(e) = result {
                    log::error!("hotkey-listener: rdev::listen exited with error: {:?}", e);
                }
            })?;

        Ok(Self {
            stop,
            _thread: thread,
        })
    }
}

/// Queue `event` without blocking and wake the UI. Returns whether the event
/// was queued.
fn forward<W: Fn()>(tx: &mpsc::Sender<HotkeyEvent>, event: HotkeyEvent, wake: &W) -> bool {
    match tx.try_send(event) {
        Ok(()) => {
            wake();
            true
        }
        Err(mpsc::error::TrySendError::Full(_)) => {
            log::warn!("hotkey-listener: event queue full, dropping {event:?}");
            wake();
            false
        }
        Err(mpsc::error::TrySendError::Closed(_)) => false,
    }
}

impl Drop for HotkeyListener {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn forward_queues_and_wakes() {
        let (tx, mut rx) = mpsc::channel(2);
        let wakes = Cell::new(0);

        assert!(forward(&tx, HotkeyEvent::ToggleMenu, &|| wakes.set(wakes.get() + 1)));
        assert_eq!(rx.try_recv().unwrap(), HotkeyEvent::ToggleMenu);
        assert_eq!(wakes.get(), 1);
    }

    #[test]
    fn forward_drops_instead_of_blocking_when_full() {
        let (tx, mut rx) = mpsc::channel(1);
        let wakes = Cell::new(0);
        let wake = || wakes.set(wakes.get() + 1);

        assert!(forward(&tx, HotkeyEvent::ToggleMenu, &wake));
        assert!(!forward(&tx, HotkeyEvent::ToggleMenu, &wake));

        // The queued event is still delivered and the UI was woken to drain it.
        assert_eq!(rx.try_recv().unwrap(), HotkeyEvent::ToggleMenu);
        assert!(rx.try_recv().is_err());
        assert_eq!(wakes.get(), 2);
    }

    #[test]
    fn forward_to_closed_channel_is_ignored() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let wakes = Cell::new(0);

        assert!(!forward(&tx, HotkeyEvent::ToggleMenu, &|| wakes.set(wakes.get() + 1)));
        assert_eq!(wakes.get(), 0);
    }
}
