// Copyright © 2020 Alexandra Frydl
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Blocking synchronization primitives.
//!
//! Operations in this module may block the current thread. Everything
//! here is a thin re-export of `parking_lot`, which the rest of the crate
//! builds on instead of `std::sync` directly.

#[doc(inline)]
pub use parking_lot::{Condvar, Mutex, MutexGuard};
