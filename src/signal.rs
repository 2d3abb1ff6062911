// Copyright © 2020 Lexi Frydl
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A `Signal` binds a receiver to a transformation pipeline plus a
//! finalizer list, and knows how to run that pipeline on one or many
//! worker threads.

use crate::channel::{Channel, Closer, Receiver, SharedReceiver};
use crate::error::Error;
use crate::scheduler::Scheduler;
use crate::stage::{identity_thunk, Stage};
use log_crate::{debug, trace, warn};
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

enum Source<T> {
  Owned(Receiver<T>),
  Shared(SharedReceiver<T>),
}

impl<T> Source<T> {
  fn recv(&mut self) -> Result<T, Error> {
    match self {
      Source::Owned(rx) => rx.next(),
      Source::Shared(rx) => rx.next(),
    }
  }
}

type Finalizer = Box<dyn FnOnce() + Send>;

/// A runnable pipeline: a receiver, a composed transformation stage, and
/// a list of finalizers run exactly once when the channel closes.
pub struct Signal<T, U> {
  source: Source<T>,
  closer: Closer<T>,
  stage: Stage<T, U>,
  finalizers: Vec<Finalizer>,
}

/// Starts a new signal with the identity stage and no finalizers, bound
/// to `channel`'s receiver and closer.
pub fn signal_from<T: 'static>(channel: Channel<T>) -> Signal<T, T> {
  let receiver = channel.into_receiver();
  let closer = receiver.closer();

  Signal { source: Source::Owned(receiver), closer, stage: identity_thunk(), finalizers: Vec::new() }
}

impl<T: Send + 'static, U: Send + 'static> Signal<T, U> {
  /// Extends the stage with `T -> Some(f(T))`.
  pub fn map<V: 'static>(self, f: impl Fn(U) -> V + Send + Sync + 'static) -> Signal<T, V> {
    Signal { source: self.source, closer: self.closer, stage: self.stage.map(f), finalizers: self.finalizers }
  }

  /// Extends the stage with `T -> Some(T) if p(T) else None`.
  pub fn filter(self, p: impl Fn(&U) -> bool + Send + Sync + 'static) -> Signal<T, U> {
    Signal { source: self.source, closer: self.closer, stage: self.stage.filter(p), finalizers: self.finalizers }
  }

  /// Extends the stage with `T -> f(T)`, dropping items where `f` returns
  /// `None`.
  pub fn try_map<V: 'static>(self, f: impl Fn(U) -> Option<V> + Send + Sync + 'static) -> Signal<T, V> {
    Signal { source: self.source, closer: self.closer, stage: self.stage.try_map(f), finalizers: self.finalizers }
  }

  /// Extends the stage with a side effect; the value passes through
  /// unchanged.
  pub fn then(self, f: impl Fn(&U) + Send + Sync + 'static) -> Signal<T, U> {
    Signal { source: self.source, closer: self.closer, stage: self.stage.then(f), finalizers: self.finalizers }
  }

  /// Appends a finalizer, run exactly once (across however many worker
  /// threads end up executing this signal) when the channel closes.
  pub fn finally(mut self, f: impl FnOnce() + Send + 'static) -> Signal<T, U> {
    self.finalizers.push(Box::new(f));
    self
  }

  /// Runs the pipeline on the current thread until the channel closes,
  /// then runs finalizers once and returns.
  pub fn run(mut self) -> Result<(), Error> {
    loop {
      match self.source.recv() {
        Ok(item) => {
          self.stage.call(item);
        }
        Err(Error::Closed) => {
          run_finalizers(self.finalizers);
          return Ok(());
        }
        Err(other) => return Err(other),
      }
    }
  }

  /// Pulls and transforms a single item. Returns `None` on close, running
  /// finalizers on the first `None` only.
  pub fn next(&mut self) -> Option<U> {
    match self.source.recv() {
      Ok(item) => self.stage.call(item),
      Err(_) => {
        let finalizers = std::mem::take(&mut self.finalizers);
        run_finalizers(finalizers);
        None
      }
    }
  }

  /// Spawns one worker thread running [`run`](Signal::run) and registers
  /// it with `scheduler`.
  pub fn run_on(self, scheduler: &Scheduler) {
    let closer = self.closer.clone();

    let handle = std::thread::Builder::new()
      .name("signal-worker".into())
      .spawn(move || self.run())
      .expect("failed to spawn signal worker");

    scheduler.connect_with_closer(handle, closer);
  }

  /// Promotes the receiver to a [`SharedReceiver`] and spawns `parallelism`
  /// worker threads against it, all sharing one closer and one
  /// exactly-once finalizer pass.
  pub fn run_on_parallel(self, scheduler: &Scheduler, parallelism: usize)
  where
    U: 'static,
  {
    assert!(parallelism >= 1, "parallelism must be at least 1");

    let shared = match self.source {
      Source::Owned(receiver) => receiver.share(),
      Source::Shared(shared) => shared,
    };

    let closer = self.closer.clone();
    let stage = Arc::new(self.stage);
    let finalizers = Arc::new(Mutex::new(self.finalizers));
    let finalized = Arc::new(AtomicBool::new(false));

    let mut handles: Vec<JoinHandle<Result<(), Error>>> = Vec::with_capacity(parallelism);

    for worker_index in 0..parallelism {
      let shared = shared.clone();
      let stage = stage.clone();
      let finalizers = finalizers.clone();
      let finalized = finalized.clone();

      let handle = std::thread::Builder::new()
        .name(format!("signal-worker-{worker_index}"))
        .spawn(move || run_shared(shared, stage, finalizers, finalized))
        .expect("failed to spawn signal worker");

      handles.push(handle);
    }

    scheduler.connect_many(handles, closer);
  }
}

fn run_shared<T: Send + 'static, U: Send + 'static>(
  mut receiver: SharedReceiver<T>,
  stage: Arc<Stage<T, U>>,
  finalizers: Arc<Mutex<Vec<Finalizer>>>,
  finalized: Arc<AtomicBool>,
) -> Result<(), Error> {
  loop {
    match receiver.next() {
      Ok(item) => {
        stage.call(item);
      }
      Err(Error::Closed) => {
        if finalized.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok() {
          let owned = std::mem::take(&mut *finalizers.lock().unwrap());
          run_finalizers(owned);
        } else {
          trace!("signal worker exiting; finalizers already ran on another worker");
        }

        return Ok(());
      }
      Err(other) => return Err(other),
    }
  }
}

/// Runs every finalizer in insertion order. A panicking finalizer is
/// caught, logged, and does not prevent the rest from running — see
/// `SPEC_FULL.md` §7 for why "log and continue" was chosen over aborting
/// the rest of the list.
fn run_finalizers(finalizers: Vec<Finalizer>) {
  debug!("channel closed; running {} finalizer(s)", finalizers.len());

  for (index, finalizer) in finalizers.into_iter().enumerate() {
    if let Err(panic) = panic::catch_unwind(panic::AssertUnwindSafe(finalizer)) {
      warn!("finalizer {index} panicked: {:?}", panic_message(&panic));
    }
  }
}

fn panic_message(payload: &Box<dyn std::any::Any + Send>) -> &str {
  if let Some(message) = payload.downcast_ref::<&str>() {
    message
  } else if let Some(message) = payload.downcast_ref::<String>() {
    message
  } else {
    "non-string panic payload"
  }
}
