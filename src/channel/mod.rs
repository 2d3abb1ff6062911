// Copyright © 2020 Lexi Frydl
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A multi-producer channel with a single owning consumer or a shared
//! fan-out consumer.
//!
//! The channel buffer is unbounded: `push` never blocks and never
//! applies back-pressure. Cancellation is close-based, not timeout-based
//! — see [`Closer`].

mod closer;
mod receiver;
mod sender;
mod shared;
mod state;

pub use self::closer::Closer;
pub use self::receiver::Receiver;
pub use self::sender::Sender;
pub use self::shared::SharedReceiver;

use self::state::ChannelState;
use std::sync::Arc;

/// Creates a new channel and returns its `Sender` and owning `Receiver`.
pub fn make_channel<T>() -> (Sender<T>, Receiver<T>) {
  let state = Arc::new(ChannelState::new());

  // Construction against a fresh channel state can never fail: it has
  // neither a receiver nor a close yet.
  let sender = Sender::new(state.clone()).expect("a fresh channel is never closed");
  let receiver = Receiver::new(state).expect("a fresh channel has no receiver yet");

  (sender, receiver)
}

/// A channel whose `Sender` and `Receiver` have not yet been split apart.
///
/// This is a convenience for building a [`Signal`](crate::signal::Signal)
/// in one expression via [`signal_from`](crate::signal::signal_from):
/// rather than plumbing a freshly-made receiver and its closer through
/// separately, `Channel` holds both ends and is consumed by `signal_from`.
pub struct Channel<T> {
  sender: Sender<T>,
  receiver: Receiver<T>,
}

impl<T> Channel<T> {
  /// Creates a new channel.
  pub fn new() -> Self {
    let (sender, receiver) = make_channel();

    Self { sender, receiver }
  }

  /// Returns a clone of this channel's sender without consuming it.
  pub fn sender(&self) -> Sender<T> {
    self.sender.clone()
  }

  /// Pushes an item through this channel's sender.
  pub fn push(&self, item: T) {
    self.sender.push(item);
  }

  /// Closes this channel.
  pub fn close(&self) {
    self.sender.close();
  }

  /// Splits this channel into its sender and receiver.
  pub fn split(self) -> (Sender<T>, Receiver<T>) {
    (self.sender, self.receiver)
  }

  pub(crate) fn into_receiver(self) -> Receiver<T> {
    self.receiver
  }
}

impl<T> Default for Channel<T> {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::Error;

  #[test]
  fn construction_against_a_closed_channel_fails() {
    let state = Arc::new(ChannelState::<i32>::new());
    state.close();

    assert_eq!(Receiver::new(state.clone()).err(), Some(Error::AlreadyClosed));
    assert_eq!(Sender::new(state).map(|_| ()), Err(Error::AlreadyClosed));
  }

  #[test]
  fn split_round_trips_sender_and_receiver() {
    let ch = Channel::<i32>::new();
    ch.push(1);

    let (sender, mut receiver) = ch.split();
    sender.close();

    assert_eq!(receiver.next(), Ok(1));
    assert_eq!(receiver.next(), Err(Error::Closed));
  }
}
