//! Observable state container.

use tokio::sync::watch;

/// A value that consumers can read and subscribe to.
///
/// Every update notifies all receivers handed out by [`subscribe`](Self::subscribe).
/// Receivers only ever see the latest value; intermediate states may be skipped.
#[derive(Debug)]
pub struct Observable<S> {
    tx: watch::Sender<S>,
}

impl<S: Clone> Observable<S> {
    /// Wrap an initial value.
    pub fn new(initial: S) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Snapshot of the current value.
    pub fn get_state(&self) -> S {
        self.tx.borrow().clone()
    }

    /// Receiver notified on every change.
    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }

    /// Mutate in place and notify.
    pub fn update(&self, f: impl FnOnce(&mut S)) {
        self.tx.send_modify(f);
    }

    /// Mutate in place; notify only if `f` reports a change.
    pub fn update_if(&self, f: impl FnOnce(&mut S) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }
}
