//! Tests for status, progress views, claims and the leaderboard

use xpledger::catalog::AchievementCategory;
use xpledger::ledger::Counter;
use xpledger::{ErrorKind, LedgerError};

use crate::common::{builtin_ledger, test_ledger};

#[test]
fn test_xp_status_level_math() {
    let (_dir, ledger) = test_ledger();
    ledger.users().register("u1", None).unwrap();
    ledger.trigger_event("u1", "SEED_290", None).unwrap();
    ledger.trigger_event("u1", "FIFTY", None).unwrap();
    ledger.trigger_event("u1", "CAPPED", None).unwrap();

    let status = ledger.get_xp_status("u1").unwrap();
    assert_eq!(status.xp, 350);
    assert_eq!(status.level, 1);
    assert_eq!(status.current_level_xp, 300);
    assert_eq!(status.next_level_xp, 600);
    assert_eq!(status.progress_xp, 50);
    assert!((status.progress_percent - 16.666).abs() < 0.01);
    assert_eq!(status.xp_per_level, 300);
    assert_eq!(status.display_range, "350/600 XP");

    // Newest first
    let keys: Vec<&str> = status.achievements.iter().map(|a| a.key.as_str()).collect();
    assert_eq!(keys, vec!["CAPPED", "FIFTY", "SEED_290"]);
    assert_eq!(status.current_badge.unwrap().level, 1);
}

#[test]
fn test_current_badge_is_most_recent() {
    let (_dir, ledger) = test_ledger();
    ledger.users().register("u1", None).unwrap();
    ledger.trigger_event("u1", "JUMP_900", None).unwrap();

    let status = ledger.get_xp_status("u1").unwrap();
    assert_eq!(status.badges.len(), 3);
    assert_eq!(status.badges[0].level, 3);
    assert_eq!(status.current_badge.unwrap().level, 3);
}

#[test]
fn test_progress_view() {
    let (_dir, ledger) = builtin_ledger();
    ledger.users().register("u1", None).unwrap();
    for _ in 0..3 {
        ledger.activity().record("u1", Counter::Applications).unwrap();
    }
    ledger.activity().set("u1", Counter::Skills, 12).unwrap();
    ledger.check_milestone_achievements("u1").unwrap();

    let views = ledger.get_achievement_definitions_with_progress("u1").unwrap();
    assert_eq!(views.len(), 19);
    assert_eq!(views[0].category, AchievementCategory::Daily);

    let ace = views.iter().find(|v| v.key == "APPLICATION_ACE").unwrap();
    assert_eq!((ace.progress.current, ace.progress.target), (3, 5));
    assert_eq!(ace.progress.percent, 60);
    assert!(!ace.earned);
    assert!(ace.user_achievement_id.is_none());

    let master = views.iter().find(|v| v.key == "SKILL_MASTER").unwrap();
    assert_eq!((master.progress.current, master.progress.target), (10, 10));
    assert_eq!(master.progress.percent, 100);
    assert!(master.earned);
    assert_eq!(master.earn_count, 1);
    assert!(master.awarded_at.is_some());

    let pioneer = views.iter().find(|v| v.key == "PROFILE_PIONEER").unwrap();
    assert_eq!(pioneer.progress.current, 1);
    assert!(!pioneer.earned);

    let advisor = views.iter().find(|v| v.key == "ADVISOR").unwrap();
    assert_eq!(advisor.progress.current, 0);
}

#[test]
fn test_catalog_views() {
    let (_dir, ledger) = builtin_ledger();
    let defs = ledger.get_achievement_definitions();
    assert_eq!(defs.len(), 19);
    assert!(defs.windows(2).all(|w| w[0].category <= w[1].category));

    let badges = ledger.get_badge_definitions();
    let levels: Vec<u32> = badges.iter().map(|b| b.level).collect();
    assert_eq!(levels, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 12, 15, 20]);

    assert_eq!(ledger.report().event_keys().len(), 19);
}

#[test]
fn test_redeem_twice() {
    let (_dir, ledger) = builtin_ledger();
    ledger.users().register("u1", None).unwrap();
    let earned = ledger.trigger_event("u1", "ADVISOR", None).unwrap();
    let id = earned.awarded_achievements[0].id;

    let claim = ledger.redeem_achievement("u1", id).unwrap();
    assert!(claim.claimed);
    assert!(claim.claimed_at.is_some());
    assert_eq!(claim.key, "ADVISOR");
    assert_eq!(claim.title, "Career Navigator");
    assert_eq!(claim.xp_reward, 50);

    let err = ledger.redeem_achievement("u1", id).unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyClaimed { .. }));
    assert_eq!(err.kind(), ErrorKind::Conflict);

    // Claiming does not change XP
    assert_eq!(ledger.users().get("u1").unwrap().xp, 50);
}

#[test]
fn test_redeem_foreign_or_missing_row() {
    let (_dir, ledger) = builtin_ledger();
    ledger.users().register("u1", None).unwrap();
    ledger.users().register("u2", None).unwrap();
    let earned = ledger.trigger_event("u1", "ADVISOR", None).unwrap();
    let id = earned.awarded_achievements[0].id;

    let err = ledger.redeem_achievement("u2", id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let err = ledger.redeem_achievement("u1", id + 100).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_leaderboard_active_only() {
    let (_dir, ledger) = test_ledger();
    let users = ledger.users();
    users.register("alice", Some("Alice")).unwrap();
    users.register("bob", Some("Bob")).unwrap();
    users.register("carol", None).unwrap();
    users.register("dave", Some("Dave")).unwrap();
    users.register("eve", Some("Eve")).unwrap();

    ledger.trigger_event("eve", "JUMP_900", None).unwrap();
    ledger.trigger_event("alice", "SEED_600", None).unwrap();
    ledger.trigger_event("bob", "SEED_290", None).unwrap();
    ledger.trigger_event("carol", "SEED_290", None).unwrap();
    ledger.trigger_event("dave", "FIFTY", None).unwrap();
    users.set_active("eve", false).unwrap();

    let board = ledger.get_leaderboard(Some(3)).unwrap();
    assert_eq!(board.len(), 3);
    let ranks: Vec<usize> = board.iter().map(|e| e.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
    let ids: Vec<&str> = board.iter().map(|e| e.user_id.as_str()).collect();
    // bob and carol tie on XP; id breaks the tie
    assert_eq!(ids, vec!["alice", "bob", "carol"]);
    assert_eq!(board[2].name, "Anonymous");
    assert!(board.windows(2).all(|w| w[0].xp >= w[1].xp));
    assert_eq!(board[0].current_badge.as_ref().unwrap().level, 2);
    assert!(board[1].current_badge.is_none());

    // Default limit covers everyone active
    assert_eq!(ledger.get_leaderboard(None).unwrap().len(), 4);

    users.set_active("eve", true).unwrap();
    assert_eq!(ledger.get_leaderboard(Some(1)).unwrap()[0].user_id, "eve");
}
