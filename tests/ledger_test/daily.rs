//! Tests for complete_daily_challenge

use chrono::Duration;

use xpledger::{ErrorKind, LedgerError};

use crate::common::clocked_ledger;

#[test]
fn test_same_day_rejected_next_day_allowed() {
    let (_dir, clock, ledger) = clocked_ledger();
    ledger.users().register("u1", None).unwrap();

    let first = ledger.complete_daily_challenge("u1", "DAILY_SPARK_A").unwrap();
    assert_eq!(first.xp_gained, 30);
    assert_eq!(first.xp, 30);

    clock.advance(Duration::hours(14));
    let err = ledger
        .complete_daily_challenge("u1", "DAILY_SPARK_A")
        .unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyCompletedToday { .. }));
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(ledger.users().get("u1").unwrap().xp, 30);

    // 2024-05-02 00:00 UTC
    clock.advance(Duration::hours(1));
    let next = ledger.complete_daily_challenge("u1", "DAILY_SPARK_A").unwrap();
    assert_eq!(next.xp, 60);
    assert_eq!(next.awarded_achievements[0].earn_count, 2);
}

#[test]
fn test_status_shows_todays_completions() {
    let (_dir, clock, ledger) = clocked_ledger();
    ledger.users().register("u1", None).unwrap();
    ledger.complete_daily_challenge("u1", "DAILY_SPARK_B").unwrap();

    let board = ledger.get_xp_status("u1").unwrap().daily_challenges;
    assert_eq!(board.day, "2024-05-01");
    assert_eq!(board.max_daily, 3);
    assert_eq!(board.completed_today, 1);
    let done: Vec<&str> = board
        .available
        .iter()
        .filter(|c| c.completed)
        .map(|c| c.key.as_str())
        .collect();
    assert_eq!(done, vec!["DAILY_SPARK_B"]);

    clock.advance(Duration::days(1));
    let board = ledger.get_xp_status("u1").unwrap().daily_challenges;
    assert_eq!(board.completed_today, 0);
}

#[test]
fn test_all_three_sparks_in_one_day() {
    let (_dir, _clock, ledger) = clocked_ledger();
    ledger.users().register("u1", None).unwrap();
    for key in ["DAILY_SPARK_A", "DAILY_SPARK_B", "DAILY_SPARK_C"] {
        ledger.complete_daily_challenge("u1", key).unwrap();
    }
    let status = ledger.get_xp_status("u1").unwrap();
    assert_eq!(status.xp, 90);
    assert_eq!(status.daily_challenges.completed_today, 3);
}

#[test]
fn test_unknown_challenge_is_not_found() {
    let (_dir, _clock, ledger) = clocked_ledger();
    ledger.users().register("u1", None).unwrap();

    // A regular achievement key is not a daily challenge
    let err = ledger
        .complete_daily_challenge("u1", "APPLICATION_ACE")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = ledger
        .complete_daily_challenge("ghost", "DAILY_SPARK_A")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
