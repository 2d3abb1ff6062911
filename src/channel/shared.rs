// Copyright © 2020 Lexi Frydl
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::closer::Closer;
use super::state::ChannelState;
use crate::error::Error;
use std::sync::Arc;

/// A fan-out adapter over a single channel, safe to call `next` on
/// concurrently from any number of threads.
///
/// Delivery is at-most-once: each item goes to exactly one caller of
/// `next`, but the order in which concurrent callers receive items is
/// unspecified. Internally this just shares the channel's `Arc` and
/// relies on the channel's own mutex to serialize `pop_front` — no
/// second layer of locking is needed.
pub struct SharedReceiver<T> {
  state: Arc<ChannelState<T>>,
}

impl<T> SharedReceiver<T> {
  pub(crate) fn new(state: Arc<ChannelState<T>>) -> Self {
    Self { state }
  }

  /// Returns a [`Closer`] bound to the same channel.
  pub fn closer(&self) -> Closer<T> {
    Closer::new(self.state.clone())
  }

  /// Blocks until an item is available or the channel is closed and
  /// drained, in which case this returns [`Error::Closed`].
  pub fn next(&self) -> Result<T, Error> {
    self.state.recv()
  }

  /// Returns `true` if the channel is closed.
  pub fn is_closed(&self) -> bool {
    self.state.is_closed()
  }
}

impl<T> Clone for SharedReceiver<T> {
  fn clone(&self) -> Self {
    Self { state: self.state.clone() }
  }
}
