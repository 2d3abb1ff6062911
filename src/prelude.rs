// Copyright © 2020 Lexi Frydl
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A "prelude" module containing common imports.

#[doc(no_inline)]
pub use crate::channel::{make_channel, Channel, Closer, Receiver, Sender, SharedReceiver};
#[doc(no_inline)]
pub use crate::error::{Error, Result};
#[doc(no_inline)]
pub use crate::scheduler::Scheduler;
#[doc(no_inline)]
pub use crate::signal::{signal_from, Signal};
#[doc(no_inline)]
pub use crate::stage::{filter, identity_thunk, map, then, try_map, Bundle, Stage};
