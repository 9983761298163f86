mod common;

use common::{init_tracing, wait_until, within, RecordingSink};
use dmxp_bounded::{
    Config, ConfigError, Item, ItemSink, ShutdownError, StartError, Supervisor, SystemBuilder,
};
use dmxp_bounded::MPMC::{WorkerKind, WorkerState};
use serial_test::serial;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

fn config(capacity: usize, producers: usize, consumers: usize) -> Config {
    SystemBuilder::new()
        .with_capacity(capacity)
        .with_producers(producers)
        .with_consumers(consumers)
        .build()
        .unwrap()
}

#[test]
#[serial]
fn start_rejects_invalid_config() {
    let bad = Config {
        capacity: 0,
        producers: 1,
        consumers: 1,
        operation_delay: Duration::ZERO,
    };
    let err = dmxp_bounded::start(bad).unwrap_err();
    assert!(matches!(err, StartError::Config(ConfigError::ZeroCapacity)));
    assert_eq!(err.as_label(), "config_zero_capacity");
}

#[test]
#[serial]
fn start_reports_unreservable_buffer() {
    let huge = Config {
        capacity: usize::MAX,
        producers: 1,
        consumers: 1,
        operation_delay: Duration::ZERO,
    };
    let err = dmxp_bounded::start(huge).unwrap_err();
    assert!(matches!(err, StartError::Allocation(ref failure) if failure.capacity == usize::MAX));
    assert_eq!(err.as_label(), "start_allocation_failure");
}

#[test]
#[serial]
fn empty_pools_start_and_stop() {
    init_tracing();
    let system = dmxp_bounded::start(config(4, 0, 0)).unwrap();
    assert!(system.worker_states().is_empty());
    assert_eq!(system.occupancy(), 0);

    let report = within(Duration::from_secs(5), move || system.stop()).unwrap();
    assert_eq!(report.stats.produced, 0);
    assert_eq!(report.stats.consumed, 0);
    assert_eq!(report.drained, 0);
}

#[test]
#[serial]
fn workers_are_named_and_running() {
    init_tracing();
    let system = SystemBuilder::new()
        .with_capacity(2)
        .with_producers(2)
        .with_consumers(3)
        .with_operation_delay(Duration::from_millis(5))
        .start()
        .unwrap();

    let states = system.worker_states();
    let names: Vec<&str> = states.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["producer-0", "producer-1", "consumer-0", "consumer-1", "consumer-2"]
    );
    assert_eq!(
        states.iter().filter(|s| s.kind == WorkerKind::Producer).count(),
        2
    );
    assert!(states.iter().all(|s| s.state == WorkerState::Running));
    println!("Supervisor Struct: {:#?}", system);

    within(Duration::from_secs(5), move || system.stop()).unwrap();
}

#[test]
#[serial]
fn three_slots_two_producers_one_consumer_reaches_hundred() {
    init_tracing();
    let system = dmxp_bounded::start(config(3, 2, 1)).unwrap();

    let mut max_sampled = 0;
    let reached = wait_until(Duration::from_secs(20), || {
        let occupancy = system.occupancy();
        max_sampled = max_sampled.max(occupancy);
        system.stats().consumed >= 100
    });
    assert!(reached, "consumer never reached 100 items: {:?}", system.stats());
    assert!(max_sampled <= 3);

    let report = within(Duration::from_secs(10), move || system.stop()).unwrap();
    assert!(report.stats.consumed >= 100);
    assert!(report.drained <= 3);
    assert!(report.stats.peak_occupancy <= 3);
    assert_eq!(
        report.stats.produced,
        report.stats.consumed + report.drained as u64
    );
    assert_eq!(report.stats.rejected_enqueues, 0);
    assert_eq!(report.stats.empty_dequeues, 0);
}

#[test]
#[serial]
fn single_slot_pair_makes_progress_on_both_sides() {
    init_tracing();
    let system = dmxp_bounded::start(config(1, 1, 1)).unwrap();

    let reached = wait_until(Duration::from_secs(20), || system.stats().consumed >= 1_000);
    assert!(reached, "no steady progress: {:?}", system.stats());

    let report = within(Duration::from_secs(10), move || system.stop()).unwrap();
    // With one slot the two counters can never drift apart by more than it.
    assert!(report.stats.produced >= 1_000);
    assert!(report.drained <= 1);
    assert_eq!(
        report.stats.produced,
        report.stats.consumed + report.drained as u64
    );
    assert_eq!(report.stats.peak_occupancy, 1);
}

#[test]
#[serial]
fn parked_consumers_without_producers_shut_down() {
    init_tracing();
    let system = dmxp_bounded::start(config(1, 0, 5)).unwrap();

    // Give every consumer time to park on the filled-slot signal.
    thread::sleep(Duration::from_millis(50));
    assert!(system
        .worker_states()
        .iter()
        .all(|s| s.state == WorkerState::Running));

    let started = Instant::now();
    let report = within(Duration::from_secs(5), move || system.stop()).unwrap();
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(report.stats.consumed, 0);
    assert_eq!(report.drained, 0);
    // Each parked consumer is woken exactly once by the releaser.
    assert_eq!(report.stats.interrupted_waits, 5);
}

#[test]
#[serial]
fn parked_producers_on_full_buffer_shut_down() {
    init_tracing();
    let system = dmxp_bounded::start(config(1, 5, 0)).unwrap();

    assert!(wait_until(Duration::from_secs(5), || system.stats().produced == 1));
    thread::sleep(Duration::from_millis(30));
    assert_eq!(system.occupancy(), 1);

    let report = within(Duration::from_secs(5), move || system.stop()).unwrap();
    assert_eq!(report.stats.produced, 1);
    assert_eq!(report.stats.consumed, 0);
    assert_eq!(report.drained, 1);
}

#[test]
#[serial]
fn long_delay_does_not_hold_up_shutdown() {
    init_tracing();
    let system = SystemBuilder::new()
        .with_capacity(2)
        .with_producers(2)
        .with_consumers(2)
        .with_operation_delay(Duration::from_secs(30))
        .start()
        .unwrap();

    thread::sleep(Duration::from_millis(20));
    let started = Instant::now();
    let report = within(Duration::from_secs(5), move || system.stop()).unwrap();
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(report.stats.produced, 0);
}

#[test]
#[serial]
fn delay_throttles_throughput() {
    init_tracing();
    let system = SystemBuilder::new()
        .with_capacity(4)
        .with_producers(1)
        .with_consumers(1)
        .with_operation_delay(Duration::from_millis(20))
        .start()
        .unwrap();

    thread::sleep(Duration::from_millis(200));
    let report = within(Duration::from_secs(5), move || system.stop()).unwrap();
    // Roughly ten iterations fit in 200ms; unthrottled it would be thousands.
    assert!(report.stats.produced < 50, "{:?}", report.stats);
}

#[test]
#[serial]
fn consumed_and_drained_items_reach_the_sink() {
    init_tracing();
    let sink = Arc::new(RecordingSink::default());
    let system = Supervisor::start_with_sink(config(4, 2, 1), sink.clone()).unwrap();

    assert!(wait_until(Duration::from_secs(10), || system.stats().consumed >= 50));
    let report = within(Duration::from_secs(10), move || system.stop()).unwrap();

    let consumed = sink.consumed_sequences();
    let drained = sink.drained_sequences();
    assert_eq!(consumed.len() as u64, report.stats.consumed);
    assert_eq!(drained.len(), report.drained);

    let mut all: Vec<u64> = consumed.into_iter().chain(drained).collect();
    all.sort_unstable();
    let expected: Vec<u64> = (1..=report.stats.produced).collect();
    assert_eq!(all, expected);
}

#[test]
#[serial]
fn dropping_a_running_system_joins_every_thread() {
    init_tracing();
    let sink = Arc::new(RecordingSink::default());
    let system = Supervisor::start_with_sink(config(2, 2, 2), sink.clone()).unwrap();
    thread::sleep(Duration::from_millis(20));

    within(Duration::from_secs(5), move || drop(system));
    // Every worker held a clone of the shared state, and with it the sink.
    assert_eq!(Arc::strong_count(&sink), 1);
}

struct PanickingSink;

impl ItemSink for PanickingSink {
    fn consumed(&self, item: Item) {
        panic!("sink refused item {}", item.sequence());
    }
}

#[test]
#[serial]
fn panicked_worker_is_reported_and_rest_still_stop() {
    init_tracing();
    let system = Supervisor::start_with_sink(config(2, 1, 1), Arc::new(PanickingSink)).unwrap();

    assert!(wait_until(Duration::from_secs(5), || system.stats().consumed >= 1));
    assert!(wait_until(Duration::from_secs(5), || {
        system
            .worker_states()
            .iter()
            .any(|s| s.name == "consumer-0" && s.state == WorkerState::Finished)
    }));

    let err = within(Duration::from_secs(5), move || system.stop()).unwrap_err();
    assert_eq!(err.as_label(), "shutdown_join_failed");
    match &err {
        ShutdownError::Join { failed, report } => {
            assert_eq!(failed, &vec!["consumer-0".to_string()]);
            assert_eq!(report.stats.consumed, 1);
            assert_eq!(
                report.stats.produced,
                report.stats.consumed + report.drained as u64
            );
        }
        _ => unreachable!(),
    }
}
