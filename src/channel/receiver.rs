// Copyright © 2020 Lexi Frydl
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::closer::Closer;
use super::shared::SharedReceiver;
use super::state::ChannelState;
use crate::error::Error;
use std::sync::Arc;

/// The single consumer half of a channel.
///
/// Move-only: at most one `Receiver` exists per channel for its entire
/// lifetime. Convert it into a [`SharedReceiver`] once via [`share`] to
/// fan it out to multiple worker threads.
///
/// [`share`]: Receiver::share
pub struct Receiver<T> {
  state: Arc<ChannelState<T>>,
}

impl<T> Receiver<T> {
  pub(crate) fn new(state: Arc<ChannelState<T>>) -> Result<Self, Error> {
    state.attach_receiver()?;

    Ok(Self { state })
  }

  pub(crate) fn state(&self) -> Arc<ChannelState<T>> {
    self.state.clone()
  }

  /// Returns a [`Closer`] bound to the same channel.
  pub fn closer(&self) -> Closer<T> {
    Closer::new(self.state.clone())
  }

  /// Blocks until an item is available or the channel is closed and
  /// drained, in which case this returns [`Error::Closed`].
  pub fn next(&mut self) -> Result<T, Error> {
    self.state.recv()
  }

  /// Consumes this receiver and returns a fan-out adapter safe to call
  /// `next` on concurrently from multiple threads.
  pub fn share(self) -> SharedReceiver<T> {
    SharedReceiver::new(self.state)
  }

  /// Returns `true` if the channel is closed.
  pub fn is_closed(&self) -> bool {
    self.state.is_closed()
  }
}
