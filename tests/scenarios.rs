//! End-to-end scenarios against the public API only, in the style of a
//! small integration suite: real threads, real sleeps to force
//! interleaving, no mocking of the channel or scheduler internals.

use conduit::stage::Bundle;
use conduit::{filter, make_channel, signal_from, then, Channel, Scheduler};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Scenarios below exercise the scheduler and signal worker logging paths
/// (`halt`'s closer count, finalizer panics); initialize a logger once per
/// test process so `RUST_LOG=debug` surfaces them when diagnosing a failure.
fn init_logger() {
  let _ = env_logger::try_init();
}

#[test]
fn single_producer_single_consumer_in_order_then_close() {
  let (tx, mut rx) = make_channel::<i32>();
  let items = [1, 2, 4, 5, 6, 7, 6, 7, 6, 4, 3, 52, 256, 2, 52, 44, 24, 1, 3, 2, 4, 1, 1, 4131, 4, 13, 21, 1, 34, 3];

  let producer = {
    let tx = tx.clone();
    let items = items;
    thread::spawn(move || {
      for item in items {
        tx.push(item);
      }
      tx.close();
    })
  };

  let mut received = Vec::new();
  loop {
    match rx.next() {
      Ok(item) => received.push(item),
      Err(_) => break,
    }
  }

  producer.join().unwrap();
  assert_eq!(received, items);
}

#[test]
fn fan_out_with_ten_consumers_preserves_multiset() {
  let (tx, rx) = make_channel::<i32>();
  let shared = rx.share();
  let items: Vec<i32> = (0..500).collect();

  let producer = {
    let tx = tx.clone();
    let items = items.clone();
    thread::spawn(move || {
      for item in items {
        tx.push(item);
      }
      tx.close();
    })
  };

  let consumers: Vec<_> = (0..10)
    .map(|_| {
      let shared = shared.clone();
      thread::spawn(move || {
        let mut received = Vec::new();
        while let Ok(item) = shared.next() {
          received.push(item);
        }
        received
      })
    })
    .collect();

  producer.join().unwrap();

  let mut union = Vec::new();
  for consumer in consumers {
    union.extend(consumer.join().unwrap());
  }
  union.sort_unstable();

  let mut expected = items;
  expected.sort_unstable();

  assert_eq!(union, expected);
}

#[test]
fn fizz_buzz_bundle_over_range() {
  let output = Arc::new(Mutex::new(String::new()));

  let emit = {
    let output = output.clone();
    move |s: &str| output.lock().unwrap().push_str(s)
  };

  let fizz = {
    let emit = emit.clone();
    filter(|n: &i32| n % 3 == 0).then(move |_| emit("Fizz"))
  };
  let buzz = {
    let emit = emit.clone();
    filter(|n: &i32| n % 5 == 0).then(move |_| emit("Buzz"))
  };
  let plain = {
    let emit = emit.clone();
    filter(|n: &i32| n % 3 != 0 && n % 5 != 0).then(move |n| emit(&n.to_string()))
  };
  let space = then(move |_: &i32| emit(" "));

  let bundle = Bundle::new(fizz).bundle_with(buzz).bundle_with(plain).bundle_with(space);

  for i in 1..20 {
    bundle.call(i);
  }

  assert_eq!(
    *output.lock().unwrap(),
    "1 2 Fizz 4 Buzz Fizz 7 8 Fizz Buzz 11 Fizz 13 14 FizzBuzz 16 17 Fizz 19 "
  );
}

#[test]
fn signal_pipeline_collects_expected_output_and_halts_cleanly() {
  init_logger();

  let channel = Channel::<i32>::new();
  let sender = channel.sender();
  let collected = Arc::new(Mutex::new(Vec::new()));

  let signal = {
    let collected = collected.clone();
    signal_from(channel)
      .filter(|n: &i32| n % 2 == 1)
      .map(|n| n.to_string())
      .then(move |s: &String| collected.lock().unwrap().push(s.clone()))
  };

  let scheduler = Scheduler::new();
  signal.run_on(&scheduler);

  let n = 200;
  for i in 1..=n {
    sender.push(i);
  }
  thread::sleep(Duration::from_millis(100));

  scheduler.halt();
  scheduler.wait();

  let expected: Vec<String> = (1..=n).filter(|i| i % 2 == 1).map(|i| i.to_string()).collect();
  assert_eq!(*collected.lock().unwrap(), expected);
}

#[test]
fn parallel_signal_finalizes_exactly_once() {
  init_logger();

  let channel = Channel::<i32>::new();
  let sender = channel.sender();
  let finalize_count = Arc::new(AtomicUsize::new(0));
  let seen = Arc::new(Mutex::new(HashSet::new()));

  let signal = {
    let finalize_count = finalize_count.clone();
    let seen = seen.clone();
    signal_from(channel)
      .then(move |n: &i32| {
        seen.lock().unwrap().insert(*n);
      })
      .finally(move || {
        finalize_count.fetch_add(1, Ordering::SeqCst);
      })
  };

  let scheduler = Scheduler::new();
  signal.run_on_parallel(&scheduler, 4);

  for i in 0..300 {
    sender.push(i);
  }
  thread::sleep(Duration::from_millis(150));

  scheduler.halt();
  scheduler.wait();

  assert_eq!(finalize_count.load(Ordering::SeqCst), 1);
  assert_eq!(seen.lock().unwrap().len(), 300);
}

#[test]
fn close_before_run_on_still_finalizes_and_terminates_promptly() {
  init_logger();

  let channel = Channel::<i32>::new();
  channel.close();

  let finalize_count = Arc::new(AtomicUsize::new(0));

  let signal = {
    let finalize_count = finalize_count.clone();
    signal_from(channel).finally(move || {
      finalize_count.fetch_add(1, Ordering::SeqCst);
    })
  };

  let scheduler = Scheduler::new();
  signal.run_on_parallel(&scheduler, 4);

  scheduler.halt();
  scheduler.wait();

  assert_eq!(finalize_count.load(Ordering::SeqCst), 1);
}

#[test]
fn closing_a_channel_is_visible_through_every_handle() {
  let channel = Channel::<i32>::new();
  channel.close();

  let (sender, receiver) = channel.split();
  assert!(sender.is_closed());
  assert!(receiver.is_closed());
}
