//! RwMonitor: a reader/writer monitor with writer preference.
//!
//! One mutex guards three counters (active readers, writer-active flag,
//! waiting writers) and one condition variable wakes everyone on state
//! changes. A waiting writer blocks new readers from acquiring, which
//! bounds writer starvation under a steady reader stream; symmetrically,
//! readers already inside drain before the writer enters.
//!
//! The monitor owns the protected value and hands out RAII guards, so
//! every acquisition is released on all exit paths, early returns and
//! panics included. There is no timeout and no cancellation: a blocked
//! caller waits until the monitor admits it.

use core::cell::UnsafeCell;
use core::ops::{Deref, DerefMut};

use parking_lot::{Condvar, Mutex};

#[derive(Default)]
struct State {
    readers: usize,
    writer: bool,
    writers_waiting: usize,
}

/// A writer-preference reader/writer lock owning its data.
///
/// `read()` admits any number of concurrent holders as long as no
/// writer is active or waiting; `write()` is exclusive against both
/// readers and other writers.
pub struct RwMonitor<T: ?Sized> {
    state: Mutex<State>,
    cond: Condvar,
    data: UnsafeCell<T>,
}

// Same bounds as std::sync::RwLock: the monitor moves T across threads
// (Send) and shares &T between concurrent readers (Sync).
unsafe impl<T: ?Sized + Send> Send for RwMonitor<T> {}
unsafe impl<T: ?Sized + Send + Sync> Sync for RwMonitor<T> {}

impl<T> RwMonitor<T> {
    pub fn new(data: T) -> Self {
        Self {
            state: Mutex::new(State::default()),
            cond: Condvar::new(),
            data: UnsafeCell::new(data),
        }
    }

    /// Unwrap the protected value. Consumes the monitor, so no guard
    /// can be outstanding.
    pub fn into_inner(self) -> T {
        self.data.into_inner()
    }
}

impl<T: ?Sized> RwMonitor<T> {
    /// Acquire shared access, blocking while a writer is active or
    /// waiting.
    pub fn read(&self) -> ReadGuard<'_, T> {
        let mut state = self.state.lock();
        while state.writer || state.writers_waiting > 0 {
            self.cond.wait(&mut state);
        }
        state.readers += 1;
        ReadGuard { monitor: self }
    }

    /// Acquire exclusive access. Registers as waiting before blocking,
    /// so readers arriving later queue behind this writer.
    pub fn write(&self) -> WriteGuard<'_, T> {
        let mut state = self.state.lock();
        state.writers_waiting += 1;
        while state.writer || state.readers > 0 {
            self.cond.wait(&mut state);
        }
        state.writers_waiting -= 1;
        state.writer = true;
        WriteGuard { monitor: self }
    }

    /// Exclusive access through `&mut self`; no locking needed.
    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }
}

/// Shared access to the protected value. Dropping the last reader wakes
/// all waiters.
pub struct ReadGuard<'a, T: ?Sized> {
    monitor: &'a RwMonitor<T>,
}

impl<T: ?Sized> Deref for ReadGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &T {
        // Safety: readers > 0 excludes any writer for the guard's
        // lifetime, so shared access is sound.
        unsafe { &*self.monitor.data.get() }
    }
}

impl<T: ?Sized> Drop for ReadGuard<'_, T> {
    fn drop(&mut self) {
        let mut state = self.monitor.state.lock();
        state.readers -= 1;
        if state.readers == 0 {
            self.monitor.cond.notify_all();
        }
    }
}

/// Exclusive access to the protected value. Dropping wakes all waiters.
pub struct WriteGuard<'a, T: ?Sized> {
    monitor: &'a RwMonitor<T>,
}

impl<T: ?Sized> Deref for WriteGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &T {
        // Safety: the writer flag excludes every other party.
        unsafe { &*self.monitor.data.get() }
    }
}

impl<T: ?Sized> DerefMut for WriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // Safety: as above, and the guard itself is borrowed mutably.
        unsafe { &mut *self.monitor.data.get() }
    }
}

impl<T: ?Sized> Drop for WriteGuard<'_, T> {
    fn drop(&mut self) {
        let mut state = self.monitor.state.lock();
        state.writer = false;
        self.monitor.cond.notify_all();
    }
}
