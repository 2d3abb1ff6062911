// Copyright © 2020 Lexi Frydl
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The compile-time composable transformation algebra: `map`, `filter`,
//! `try_map`, `then`, and `bundle`.
//!
//! A [`Stage`] is a unary function from `T` to `Option<U>`. Composition is
//! dynamically dispatched (`Box<dyn Fn>`) rather than a growing nest of
//! generic types, so a [`crate::signal::Signal`] can hold one without its
//! own type parameter ballooning with every `.map`/`.filter` call.

/// A single transformation step from `T` to `Option<U>`.
///
/// Once any stage in a chain yields `None`, no later stage runs for that
/// item — this is enforced by `compose`, the single primitive every
/// fluent method below is built on.
pub struct Stage<T, U> {
  apply: Box<dyn Fn(T) -> Option<U> + Send + Sync>,
}

impl<T: 'static, U: 'static> Stage<T, U> {
  /// Applies this stage to an input.
  pub fn call(&self, input: T) -> Option<U> {
    (self.apply)(input)
  }

  /// Composes this stage with another, short-circuiting on `None`.
  ///
  /// `compose(identity, s) == compose(s, identity) == s` by construction:
  /// `identity_thunk` is exactly `Stage::new(Some)`, which this simply
  /// forwards through unchanged.
  fn compose<V: 'static>(self, next: impl Fn(U) -> Option<V> + Send + Sync + 'static) -> Stage<T, V> {
    Stage { apply: Box::new(move |input| (self.apply)(input).and_then(&next)) }
  }

  /// Extends the chain with `T -> Some(f(T))`.
  pub fn map<V: 'static>(self, f: impl Fn(U) -> V + Send + Sync + 'static) -> Stage<T, V> {
    self.compose(move |item| Some(f(item)))
  }

  /// Extends the chain with `T -> Some(T) if p(T) else None`.
  pub fn filter(self, p: impl Fn(&U) -> bool + Send + Sync + 'static) -> Stage<T, U> {
    self.compose(move |item| if p(&item) { Some(item) } else { None })
  }

  /// Extends the chain with `T -> f(T)`, dropping items where `f` returns
  /// `None`.
  pub fn try_map<V: 'static>(self, f: impl Fn(U) -> Option<V> + Send + Sync + 'static) -> Stage<T, V> {
    self.compose(f)
  }

  /// Extends the chain with a side effect; the value passes through
  /// unchanged.
  pub fn then(self, f: impl Fn(&U) + Send + Sync + 'static) -> Stage<T, U> {
    self.compose(move |item| {
      f(&item);
      Some(item)
    })
  }
}

impl<T: 'static> Stage<T, T> {
  fn new_identity() -> Self {
    Stage { apply: Box::new(Some) }
  }
}

/// The identity stage: `T -> Some(T)`.
pub fn identity_thunk<T: 'static>() -> Stage<T, T> {
  Stage::new_identity()
}

/// Builds a stage performing `T -> Some(f(T))`.
pub fn map<T: 'static, U: 'static>(f: impl Fn(T) -> U + Send + Sync + 'static) -> Stage<T, U> {
  identity_thunk().map(f)
}

/// Builds a stage performing `T -> Some(T) if p(T) else None`.
pub fn filter<T: 'static>(p: impl Fn(&T) -> bool + Send + Sync + 'static) -> Stage<T, T> {
  identity_thunk().filter(p)
}

/// Builds a stage performing `T -> f(T)`.
pub fn try_map<T: 'static, U: 'static>(f: impl Fn(T) -> Option<U> + Send + Sync + 'static) -> Stage<T, U> {
  identity_thunk().try_map(f)
}

/// Builds a stage performing a side effect and passing `T` through.
pub fn then<T: 'static>(f: impl Fn(&T) + Send + Sync + 'static) -> Stage<T, T> {
  identity_thunk().then(f)
}

/// An ordered collection of stages applied to the same input for side
/// effects.
///
/// All but the last stage receive the input by reference; the last stage
/// receives it by move. This mirrors the "forward by reference to all
/// stages except the last" rule: earlier stages may only observe, and
/// only the final stage may consume.
pub struct Bundle<T> {
  by_ref: Vec<Box<dyn Fn(&T) + Send + Sync>>,
  last: Box<dyn Fn(T) + Send + Sync>,
}

impl<T: Clone + 'static> Bundle<T> {
  /// Seeds a bundle with a single stage, which is therefore the last (and
  /// only) stage. The stage's output is discarded — a bundle entry's
  /// purpose is its side effects.
  pub fn new<U: 'static>(last: Stage<T, U>) -> Self {
    Self { by_ref: Vec::new(), last: Box::new(move |item| { last.call(item); }) }
  }

  /// Appends another stage, demoting the current last stage to a
  /// by-reference slot (invoked against a clone of the input, since it no
  /// longer owns it) and making the new stage last.
  pub fn bundle_with<U: 'static>(mut self, next: Stage<T, U>) -> Self {
    let previous_last = self.last;
    self.by_ref.push(Box::new(move |item: &T| previous_last(item.clone())));
    self.last = Box::new(move |item| { next.call(item); });
    self
  }

  /// Invokes every stage against `input`: by-reference stages first, in
  /// insertion order, then the last stage by move.
  pub fn call(&self, input: T) {
    for stage in &self.by_ref {
      stage(&input);
    }

    (self.last)(input);
  }
}
