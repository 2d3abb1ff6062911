// Copyright © 2020 Lexi Frydl
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Registers worker threads and their closers so an application can
//! initiate shutdown and join every associated worker deterministically.
//!
//! The scheduler does not reuse [`crate::thread::Thread`]: that handle
//! joins on drop from whichever thread drops it, but `wait()` needs to
//! join workers registered by other threads on its own call stack, and a
//! worker that outlives its registering thread must not be joined twice
//! or joined implicitly by a `Drop` impl racing with `wait()`. So the
//! scheduler stores raw `JoinHandle`s and joins them itself, once, inside
//! `wait()`.

use crate::channel::Closer;
use crate::error::Error;
use crate::sync::{Condvar, Mutex};
use log_crate::debug;
use std::thread::JoinHandle;

/// The join handle type the scheduler registers and joins: a signal
/// worker's thread always returns a `Result<(), Error>`.
pub type Worker = JoinHandle<Result<(), Error>>;
type ErasedCloser = Box<dyn Fn() + Send + Sync>;

struct Inner {
  workers: Vec<Worker>,
  closers: Vec<ErasedCloser>,
  halted: bool,
}

/// A registry of worker threads and their cancellation handles.
///
/// Each application owns its own `Scheduler` instance; it is not a
/// singleton. `connect` registers workers until [`halt`](Scheduler::halt)
/// is called; after that, further `connect` calls close the passed
/// closer and join the worker immediately instead of retaining it.
pub struct Scheduler {
  inner: Mutex<Inner>,
  halted_notifier: Condvar,
}

impl Scheduler {
  /// Creates a new, idle scheduler.
  pub fn new() -> Self {
    Self {
      inner: Mutex::new(Inner { workers: Vec::new(), closers: Vec::new(), halted: false }),
      halted_notifier: Condvar::new(),
    }
  }

  /// Registers an unmanaged worker with no associated closer. If the
  /// scheduler is already halted, the worker is joined immediately.
  pub fn connect(&self, worker: Worker) {
    let mut inner = self.inner.lock();

    if inner.halted {
      drop(inner);
      join(worker);
      return;
    }

    inner.workers.push(worker);
  }

  /// Registers a worker and its closer. If the scheduler is already
  /// halted, the closer is closed and the worker joined immediately.
  pub fn connect_with_closer<T>(&self, worker: Worker, closer: Closer<T>)
  where
    T: 'static,
  {
    self.connect_many(vec![worker], closer)
  }

  /// Registers a list of workers sharing one closer. If the scheduler is
  /// already halted, the closer is closed and every worker joined
  /// immediately.
  pub fn connect_many<T>(&self, workers: Vec<Worker>, closer: Closer<T>)
  where
    T: 'static,
  {
    let erased: ErasedCloser = Box::new(move || closer.close());

    let mut inner = self.inner.lock();

    if inner.halted {
      drop(inner);
      erased();
      for worker in workers {
        join(worker);
      }
      return;
    }

    inner.workers.extend(workers);
    inner.closers.push(erased);
  }

  /// Halts the scheduler: closes every registered closer and wakes every
  /// waiter in [`wait`](Scheduler::wait). Idempotent.
  pub fn halt(&self) {
    let mut inner = self.inner.lock();

    if inner.halted {
      return;
    }

    inner.halted = true;

    debug!("scheduler halting; closing {} closer(s)", inner.closers.len());

    for closer in inner.closers.drain(..) {
      closer();
    }

    drop(inner);
    self.halted_notifier.notify_all();
  }

  /// Blocks until [`halt`](Scheduler::halt) has been called, then joins
  /// every registered worker.
  pub fn wait(&self) {
    let mut inner = self.inner.lock();

    while !inner.halted {
      self.halted_notifier.wait(&mut inner);
    }

    let workers = std::mem::take(&mut inner.workers);
    drop(inner);

    for worker in workers {
      join(worker);
    }
  }
}

impl Default for Scheduler {
  fn default() -> Self {
    Self::new()
  }
}

fn join(worker: Worker) {
  match worker.join() {
    Ok(Ok(())) => {}
    Ok(Err(error)) => panic!("signal worker returned an error: {error}"),
    Err(panic) => std::panic::resume_unwind(panic),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::channel::make_channel;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Arc;

  #[test]
  fn halt_is_idempotent() {
    let scheduler = Scheduler::new();

    scheduler.halt();
    scheduler.halt();

    scheduler.wait();
  }

  #[test]
  fn connect_after_halt_closes_and_joins_immediately() {
    let scheduler = Scheduler::new();
    scheduler.halt();

    let (_tx, rx) = make_channel::<i32>();
    let closer = rx.closer();
    let ran = Arc::new(AtomicUsize::new(0));

    let worker = {
      let ran = ran.clone();
      std::thread::spawn(move || -> Result<(), Error> {
        ran.fetch_add(1, Ordering::SeqCst);
        Ok(())
      })
    };

    scheduler.connect_with_closer(worker, closer.clone());

    assert!(!closer.valid());
    assert_eq!(ran.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn wait_joins_every_registered_worker_exactly_once() {
    let scheduler = Scheduler::new();
    let counter = Arc::new(AtomicUsize::new(0));

    let (_tx, rx) = make_channel::<i32>();
    let closer = rx.closer();

    let workers: Vec<Worker> = (0..5)
      .map(|_| {
        let counter = counter.clone();
        std::thread::spawn(move || -> Result<(), Error> {
          counter.fetch_add(1, Ordering::SeqCst);
          Ok(())
        })
      })
      .collect();

    scheduler.connect_many(workers, closer);

    scheduler.halt();
    scheduler.wait();

    assert_eq!(counter.load(Ordering::SeqCst), 5);
  }
}
