// Copyright © 2020 Lexi Frydl
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::state::ChannelState;
use crate::error::Error;
use std::sync::Arc;

/// The producer half of a channel. Cheaply cloneable; many may exist.
pub struct Sender<T> {
  state: Arc<ChannelState<T>>,
}

impl<T> Sender<T> {
  pub(crate) fn new(state: Arc<ChannelState<T>>) -> Result<Self, Error> {
    state.check_not_closed()?;

    Ok(Self { state })
  }

  /// Pushes an item onto the channel.
  ///
  /// Thread-safe and non-blocking — the channel buffer is unbounded.
  /// Silently dropped if the channel has no receiver yet or is already
  /// closed. This is intentional, not an oversight: see the crate's
  /// design notes on "silent drop on no receiver".
  pub fn push(&self, item: T) {
    self.state.push(item);
  }

  /// Closes the channel. Idempotent.
  pub fn close(&self) {
    self.state.close();
  }

  /// Returns `true` if the channel is closed.
  pub fn is_closed(&self) -> bool {
    self.state.is_closed()
  }
}

impl<T> Clone for Sender<T> {
  fn clone(&self) -> Self {
    Self { state: self.state.clone() }
  }
}
