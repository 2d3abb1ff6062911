// Copyright © 2020 Lexi Frydl
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::state::ChannelState;
use std::sync::Arc;

/// A handle that can close a channel and nothing else.
///
/// `Closer` deliberately exposes no way to push or receive; it exists so
/// that cancellation capability can be handed to a scheduler without also
/// handing it consumer or producer capability.
#[derive(Clone)]
pub struct Closer<T> {
  state: Arc<ChannelState<T>>,
}

impl<T> Closer<T> {
  pub(crate) fn new(state: Arc<ChannelState<T>>) -> Self {
    Self { state }
  }

  /// Closes the channel. Idempotent and safe from any thread.
  pub fn close(&self) {
    self.state.close();
  }

  /// Returns `true` if the channel is not yet closed.
  pub fn valid(&self) -> bool {
    !self.state.is_closed()
  }
}
