//! End-to-end state machine scenarios.
//!
//! Same geometry throughout: 10 s window, one bucket per second, threshold
//! 0.5, stages [0.1, 0.3, 0.5, 0.75, 1.0]. Cooling and substage durations
//! are scaled down to milliseconds to keep the suite fast; the transition
//! logic only sees the configured durations.

use std::thread::sleep;
use std::time::Duration;

use breakwater::{Breaker, BreakerError, State};

mod common;
use common::{fail, scenario_config, succeed, BackendDown};

/// Drive a fresh breaker into OPEN: ten straight failures fill the
/// min_samples guard and push the ratio to 1.0.
fn tripped_breaker() -> Breaker {
    common::init_tracing();
    let breaker = Breaker::new("scenario", scenario_config()).expect("valid config");
    for _ in 0..10 {
        let _ = fail(&breaker);
    }
    assert_eq!(breaker.state(), State::Open);
    breaker
}

#[test]
fn test_healthy_traffic_stays_closed() {
    common::init_tracing();
    let breaker = Breaker::new("healthy", scenario_config()).expect("valid config");

    for _ in 0..20 {
        assert_eq!(succeed(&breaker).unwrap(), 1);
        assert_eq!(breaker.state(), State::Closed);
    }
}

#[test]
fn test_failure_burst_trips_and_short_circuits() {
    common::init_tracing();
    let breaker = Breaker::new("burst", scenario_config()).expect("valid config");

    for _ in 0..4 {
        assert!(succeed(&breaker).is_ok());
    }
    for i in 0..6 {
        let err = fail(&breaker).unwrap_err();
        // All six failures reach the backend; none is dropped.
        assert_eq!(err.into_downstream(), Some(BackendDown), "failure {i}");
    }
    assert_eq!(breaker.state(), State::Open);

    // The eleventh call is dropped without touching the downstream.
    let mut invoked = false;
    let result: Result<u32, BreakerError<BackendDown>> = breaker.execute(|| {
        invoked = true;
        Ok(1)
    });
    assert!(matches!(result, Err(BreakerError::RequestDropped)));
    assert!(!invoked);
}

#[test]
fn test_exactly_at_threshold_does_not_trip() {
    common::init_tracing();
    let breaker = Breaker::new("strict", scenario_config()).expect("valid config");

    for _ in 0..5 {
        assert!(succeed(&breaker).is_ok());
    }
    for _ in 0..5 {
        let _ = fail(&breaker);
    }
    // 5 failures in 10 requests is exactly the threshold: not yet tripping.
    assert_eq!(breaker.state(), State::Closed);
}

#[test]
fn test_cooldown_admits_probe_into_half_open() {
    let breaker = tripped_breaker();

    // Within the cooling period every call is dropped.
    assert!(matches!(succeed(&breaker), Err(BreakerError::RequestDropped)));

    sleep(Duration::from_millis(150));
    let result: Result<u32, BreakerError<BackendDown>> = breaker.execute(|| {
        // Observed mid-call: the probe itself is the one admitted slot.
        assert_eq!(breaker.state(), State::HalfOpen);
        assert_eq!(breaker.snapshot().in_flight, 1);
        Ok(1)
    });
    assert!(result.is_ok());
    assert_eq!(breaker.state(), State::HalfOpen);
    assert_eq!(breaker.snapshot().in_flight, 0);
}

#[test]
fn test_paced_successes_climb_ladder_to_closed() {
    let breaker = tripped_breaker();

    sleep(Duration::from_millis(150));
    assert!(succeed(&breaker).is_ok()); // probe enters half-open at stage 0
    assert_eq!(breaker.state(), State::HalfOpen);

    // One success per substage interval: five advancements clear the
    // five-stage ladder.
    for _ in 0..4 {
        sleep(Duration::from_millis(80));
        assert!(succeed(&breaker).is_ok());
        assert_eq!(breaker.state(), State::HalfOpen);
    }
    sleep(Duration::from_millis(80));
    assert!(succeed(&breaker).is_ok());
    assert_eq!(breaker.state(), State::Closed);

    // Promotion starts from an empty window.
    let snapshot = breaker.snapshot();
    assert_eq!(snapshot.total_requests, 0);
    assert_eq!(snapshot.total_failures, 0);
}

#[test]
fn test_probe_failure_demotes_and_restarts_cooldown() {
    let breaker = tripped_breaker();

    sleep(Duration::from_millis(150));
    assert!(succeed(&breaker).is_ok());
    assert_eq!(breaker.state(), State::HalfOpen);

    // One success then one failure over the probe window: ratio 0.5 meets
    // the threshold, back to OPEN.
    let _ = fail(&breaker);
    assert_eq!(breaker.state(), State::Open);

    // The demotion re-arms the cooling period.
    assert!(matches!(succeed(&breaker), Err(BreakerError::RequestDropped)));
    sleep(Duration::from_millis(150));
    assert!(succeed(&breaker).is_ok());
    assert_eq!(breaker.state(), State::HalfOpen);
}

#[test]
fn test_trip_counter_tracks_demotions() {
    let breaker = tripped_breaker();
    assert_eq!(breaker.snapshot().trip_count, 1);

    sleep(Duration::from_millis(150));
    assert!(succeed(&breaker).is_ok());
    let _ = fail(&breaker);
    assert_eq!(breaker.state(), State::Open);
    assert_eq!(breaker.snapshot().trip_count, 2);
}
