use std::time::Duration;

use voxrelay::application::services::{RetryPolicy, MAX_JITTER_MS};

#[test]
fn given_first_attempt_when_computing_delay_then_base_plus_bounded_jitter() {
    let policy = RetryPolicy::new(5, Duration::from_millis(100));

    for _ in 0..20 {
        let delay = policy.delay_after(1);
        assert!(delay >= Duration::from_millis(100));
        assert!(delay <= Duration::from_millis(100 + MAX_JITTER_MS));
    }
}

#[test]
fn given_later_attempts_when_computing_delay_then_backoff_doubles_per_attempt() {
    let policy = RetryPolicy::new(5, Duration::from_millis(100));

    let third = policy.delay_after(3);
    assert!(third >= Duration::from_millis(400));
    assert!(third <= Duration::from_millis(400 + MAX_JITTER_MS));

    let fifth = policy.delay_after(5);
    assert!(fifth >= Duration::from_millis(1600));
    assert!(fifth <= Duration::from_millis(1600 + MAX_JITTER_MS));
}

#[test]
fn given_zero_attempt_ceiling_when_constructing_then_at_least_one_attempt_remains() {
    let policy = RetryPolicy::new(0, Duration::from_millis(10));

    assert_eq!(policy.max_attempts(), 1);
}

#[test]
fn given_default_policy_when_inspecting_then_five_attempts_with_one_second_base() {
    let policy = RetryPolicy::default();

    assert_eq!(policy.max_attempts(), 5);
    let first = policy.delay_after(1);
    assert!(first >= Duration::from_secs(1));
    assert!(first <= Duration::from_secs(1) + Duration::from_millis(MAX_JITTER_MS));
}
