// Copyright © 2020 Lexi Frydl
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error types surfaced at the crate boundary.

use derive_more::{Display, Error};

/// Errors surfaced by channels, signals, and the scheduler.
///
/// [`Error::Closed`] is a control-flow signal, not a logical error: it is
/// the normal way a consumer learns that a channel has been drained and
/// closed. The remaining variants indicate misuse of the API and should
/// be handled by fixing the caller, not by retrying.
#[derive(Clone, Copy, Debug, Display, Error, PartialEq, Eq)]
pub enum Error {
  /// The channel was closed and fully drained.
  #[display(fmt = "channel is closed")]
  Closed,

  /// A `Sender` or `Receiver` was constructed against a channel that is
  /// already closed.
  #[display(fmt = "channel is already closed")]
  AlreadyClosed,

  /// A second `Receiver` was constructed against a channel that already
  /// has one.
  #[display(fmt = "receiver already taken")]
  ReceiverAlreadyTaken,

  /// Reserved for a `Signal` run whose receiver handle is already moved
  /// into a previous `run`/`run_on`/`run_on_parallel` call. `Signal`'s
  /// methods consume `self`, so the borrow checker rejects that call
  /// pattern at compile time and this variant is never constructed by
  /// this crate — it exists for parity with the error taxonomy this
  /// crate's API is modeled on. See DESIGN.md.
  #[display(fmt = "signal has no receiver")]
  InvalidSignal,
}

/// Convenience alias for results returned by this crate's public API.
pub type Result<T> = std::result::Result<T, Error>;
