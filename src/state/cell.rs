//! Read/write-split reactive cells.
//!
//! Every independent piece of state is its own [`Cell`]: a single mutable
//! slot whose Query side ([`ReadHandle`]) and Command side ([`WriteHandle`])
//! are handed out separately, so a consumer subscribes only to the slice it
//! needs and is never invalidated by writes to an unrelated slice.
//!
//! Writes always replace the cell value wholesale. A new value is computed
//! from `&T` and swapped in; nested containers are never edited in place, so
//! observers can treat every notification as "the whole value changed".

use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// A provider-owned state slice.
///
/// The cell itself stays with whichever scope owns the state (the session,
/// or a mounted search flow); consumers receive handles. Dropping the cell
/// ends the slice's lifetime: readers keep the last value but are no longer
/// notified.
pub struct Cell<T> {
    tx: watch::Sender<T>,
}

impl<T> Cell<T> {
    /// Creates a cell holding `initial`.
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Hands out the Query side.
    pub fn reader(&self) -> ReadHandle<T> {
        ReadHandle {
            rx: self.tx.subscribe(),
        }
    }

    /// Hands out the Command side.
    pub fn writer(&self) -> WriteHandle<T> {
        WriteHandle {
            tx: self.tx.clone(),
        }
    }

    /// Reads the current value without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.tx.borrow())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Cell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.read(|v| f.debug_struct("Cell").field("value", v).finish())
    }
}

impl<T: Clone> Cell<T> {
    /// Clones the current value.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }
}

/// Query handle for one cell.
pub struct ReadHandle<T> {
    rx: watch::Receiver<T>,
}

impl<T> Clone for ReadHandle<T> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
        }
    }
}

impl<T> ReadHandle<T> {
    /// Returns true if the cell was written since this handle last read it.
    ///
    /// A dropped provider counts as unchanged: the last value stands.
    pub fn is_stale(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Suspends until the next write to this cell.
    ///
    /// Returns false if the provider was dropped and no further writes can
    /// arrive.
    pub async fn invalidated(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

impl<T: Clone> ReadHandle<T> {
    /// Clones the current value without consuming the change flag.
    pub fn get(&self) -> T {
        self.rx.borrow().clone()
    }

    /// Clones the current value and marks it seen.
    pub fn latest(&mut self) -> T {
        self.rx.borrow_and_update().clone()
    }
}

impl<T: Clone + Send + Sync + 'static> ReadHandle<T> {
    /// Spawns a task that invokes `callback` with a copy of the value after
    /// every write, until the provider is dropped.
    ///
    /// The subscription is tied to the callback *handle*, not the closure
    /// inside it; swap the closure with [`Callback::replace`] at any time
    /// without re-subscribing.
    pub fn spawn_watcher(mut self, callback: Callback<T>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while self.rx.changed().await.is_ok() {
                let value = self.rx.borrow_and_update().clone();
                callback.invoke(&value);
            }
        })
    }
}

/// Command handle for one cell.
pub struct WriteHandle<T> {
    tx: watch::Sender<T>,
}

impl<T> Clone for WriteHandle<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> WriteHandle<T> {
    /// Replaces the value and notifies readers.
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Replaces the value with one computed from the previous value.
    ///
    /// This is the toggle-style update path: the closure receives `&T` and
    /// returns the complete next value.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        self.tx.send_modify(|value| *value = f(value));
    }

    /// Applies a fallible replacement.
    ///
    /// On `Err` the cell is left untouched and readers see no change
    /// notification, so a failed operation is invisible to observers.
    pub fn try_update<E>(&self, f: impl FnOnce(&T) -> Result<T, E>) -> Result<(), E> {
        let mut outcome = Ok(());
        self.tx.send_if_modified(|value| match f(value) {
            Ok(next) => {
                *value = next;
                true
            }
            Err(err) => {
                outcome = Err(err);
                false
            }
        });
        outcome
    }
}

/// A stable-identity callback slot.
///
/// Long-lived subscribers (watcher tasks) hold one clone of the handle; the
/// closure behind it can be swapped freely without forcing the subscriber to
/// re-subscribe.
pub struct Callback<T> {
    slot: Arc<Mutex<Box<dyn FnMut(&T) + Send>>>,
}

impl<T> Clone for Callback<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> Callback<T> {
    /// Creates a callback holding `f`.
    pub fn new(f: impl FnMut(&T) + Send + 'static) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Box::new(f))),
        }
    }

    /// Swaps the closure. Every existing handle now invokes the new one.
    pub fn replace(&self, f: impl FnMut(&T) + Send + 'static) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Box::new(f);
        }
    }

    /// Invokes the current closure.
    pub fn invoke(&self, value: &T) {
        if let Ok(mut slot) = self.slot.lock() {
            (slot)(value);
        }
    }
}
