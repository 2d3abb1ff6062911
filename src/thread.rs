// Copyright © 2020 Lexi Frydl
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Thread utilities.
//!
//! This is a general-purpose join handle, independent of the channel,
//! signal, and scheduler machinery. The scheduler does not build on it
//! directly (see `scheduler` module docs for why); it is exposed for
//! callers who just want a simple join-on-drop thread, e.g. to run a
//! producer.

use std::thread::{Builder, JoinHandle};
use std::time::Duration;

/// A handle to a spawned thread.
///
/// When this handle is dropped, the thread is joined. Use [`detach`] to
/// prevent this.
///
/// [`detach`]: Thread::detach
#[must_use = "Threads get joined when dropped. Use `.detach()` to run them in the background."]
pub struct Thread<T> {
  detached: bool,
  handle: Option<JoinHandle<T>>,
}

/// Sleeps the current thread for a given duration.
pub fn sleep(dur: Duration) {
  std::thread::sleep(dur);
}

impl<T: Send + 'static> Thread<T> {
  /// Spawns a new named thread.
  pub fn spawn(name: impl Into<String>, func: impl FnOnce() -> T + Send + 'static) -> Self {
    let name = name.into();

    Self {
      detached: false,
      handle: Builder::new().name(name).spawn(func).expect("failed to spawn thread").into(),
    }
  }
}

impl<T> Thread<T> {
  /// Blocks the current thread until this thread completes and returns its
  /// output.
  pub fn join(mut self) -> T {
    self.join_mut().unwrap()
  }

  /// Detaches this handle so that the thread will continue running when it
  /// is dropped.
  pub fn detach(&mut self) {
    self.detached = true;
  }

  /// Internal `join` implementation that makes it possible to join in
  /// `drop`.
  fn join_mut(&mut self) -> Option<T> {
    self.handle.take()?.join().expect("the thread panicked").into()
  }
}

// Implement `Drop` to join threads that are not detached.

impl<T> Drop for Thread<T> {
  fn drop(&mut self) {
    if !self.detached {
      self.join_mut();
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicBool, Ordering};
  use std::sync::Arc;

  #[test]
  fn join_returns_output() {
    let thread = Thread::spawn("join-returns-output", || 1 + 1);

    assert_eq!(thread.join(), 2);
  }

  #[test]
  fn drop_joins_unless_detached() {
    let ran = Arc::new(AtomicBool::new(false));
    let ran_clone = ran.clone();

    let mut thread = Thread::spawn("drop-joins", move || {
      ran_clone.store(true, Ordering::SeqCst);
    });

    thread.detach();
    drop(thread);

    // Detached: no join guarantee, but give it a moment to finish so the
    // assertion below is meaningful rather than flaky-by-luck.
    sleep(Duration::from_millis(50));
    assert!(ran.load(Ordering::SeqCst));
  }
}
