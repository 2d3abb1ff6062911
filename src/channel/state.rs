// Copyright © 2020 Lexi Frydl
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The shared buffer and synchronization backing one channel.

use crate::error::Error;
use crate::sync::{Condvar, Mutex};
use std::collections::VecDeque;

/// State shared among all handles of one channel.
///
/// All mutation happens under `inner`; `notifier` is signalled on every
/// push (one waiter) and on close (every waiter).
pub(crate) struct ChannelState<T> {
  inner: Mutex<Inner<T>>,
  notifier: Condvar,
}

struct Inner<T> {
  buffer: VecDeque<T>,
  has_receiver: bool,
  closed: bool,
}

impl<T> ChannelState<T> {
  pub(crate) fn new() -> Self {
    Self {
      inner: Mutex::new(Inner { buffer: VecDeque::new(), has_receiver: false, closed: false }),
      notifier: Condvar::new(),
    }
  }

  /// Marks a receiver as attached. Fails if one is already attached or the
  /// channel is already closed.
  pub(crate) fn attach_receiver(&self) -> Result<(), Error> {
    let mut inner = self.inner.lock();

    if inner.has_receiver {
      return Err(Error::ReceiverAlreadyTaken);
    }

    if inner.closed {
      return Err(Error::AlreadyClosed);
    }

    inner.has_receiver = true;

    Ok(())
  }

  /// Fails if the channel is already closed. Used by `Sender` construction,
  /// which otherwise imposes no state of its own.
  pub(crate) fn check_not_closed(&self) -> Result<(), Error> {
    if self.inner.lock().closed {
      return Err(Error::AlreadyClosed);
    }

    Ok(())
  }

  /// Pushes an item to the tail of the buffer.
  ///
  /// Silently dropped if no receiver has ever been attached, or if the
  /// channel is already closed. This mirrors the behavior of the system
  /// this crate is modeled on: a push before a receiver exists is
  /// discarded rather than buffered, so that closing a channel nobody is
  /// listening to can never leak memory. See `SPEC_FULL.md` §9.
  pub(crate) fn push(&self, item: T) {
    let mut inner = self.inner.lock();

    if !inner.has_receiver || inner.closed {
      return;
    }

    inner.buffer.push_back(item);
    drop(inner);

    self.notifier.notify_one();
  }

  /// Closes the channel. Idempotent.
  pub(crate) fn close(&self) {
    let mut inner = self.inner.lock();

    if inner.closed {
      return;
    }

    inner.closed = true;
    drop(inner);

    self.notifier.notify_all();
  }

  pub(crate) fn is_closed(&self) -> bool {
    self.inner.lock().closed
  }

  /// Blocks until an item is available or the channel is closed and
  /// drained.
  ///
  /// Drain-on-close: an item already buffered at wake time is always
  /// delivered before the close signal is surfaced, even if the close
  /// happened first — the predicate below only reports "closed" once the
  /// buffer is empty.
  pub(crate) fn recv(&self) -> Result<T, Error> {
    let mut inner = self.inner.lock();

    loop {
      if let Some(item) = inner.buffer.pop_front() {
        return Ok(item);
      }

      if inner.closed {
        return Err(Error::Closed);
      }

      self.notifier.wait(&mut inner);
    }
  }
}
