//! Tests for trigger_event

use xpledger::ErrorKind;
use xpledger::ledger::{Meta, TriggerEventResult, level_for_xp};

use crate::common::{builtin_ledger, test_ledger};

#[test]
fn test_thought_leader_one_time() {
    let (_dir, ledger) = test_ledger();
    ledger.users().register("u1", None).unwrap();

    let first = ledger.trigger_event("u1", "THOUGHT_LEADER", None).unwrap();
    assert_eq!(first.xp, 20);
    assert_eq!(first.level, 0);
    assert_eq!(first.xp_gained, 20);
    assert_eq!(first.awarded_achievements[0].key, "THOUGHT_LEADER");

    let second = ledger.trigger_event("u1", "THOUGHT_LEADER", None).unwrap();
    assert_eq!(second.xp, 20);
    assert_eq!(second.xp_gained, 0);
    assert!(second.awarded_achievements.is_empty());
    assert!(!second.leveled_up);
}

#[test]
fn test_level_up_awards_first_badge() {
    let (_dir, ledger) = test_ledger();
    ledger.users().register("u1", None).unwrap();
    ledger.trigger_event("u1", "SEED_290", None).unwrap();

    let result = ledger.trigger_event("u1", "FIFTY", None).unwrap();
    assert_eq!(result.xp, 340);
    assert_eq!(result.level, 1);
    assert!(result.leveled_up);
    assert_eq!(result.new_level, Some(1));
    assert_eq!(result.new_badges.len(), 1);
    assert_eq!(result.new_badges[0].level, 1);
    assert_eq!(result.new_badges[0].name, "Badge 1");
}

#[test]
fn test_multi_level_jump_awards_every_crossed_badge() {
    let (_dir, ledger) = test_ledger();
    ledger.users().register("u1", None).unwrap();

    let seed = ledger.trigger_event("u1", "SEED_600", None).unwrap();
    assert_eq!(seed.level, 2);
    assert_eq!(seed.new_badges.len(), 2);

    let jump = ledger.trigger_event("u1", "JUMP_900", None).unwrap();
    assert_eq!(jump.xp, 1_500);
    assert_eq!(jump.level, 5);
    let levels: Vec<u32> = jump.new_badges.iter().map(|b| b.level).collect();
    assert_eq!(levels, vec![3, 4, 5]);

    // Level 6 has no badge in this catalog; nothing is awarded and nothing fails
    let beyond = ledger.trigger_event("u1", "JUMP_900", None).unwrap();
    assert_eq!(beyond.level, 8);
    assert!(beyond.leveled_up);
    assert!(beyond.new_badges.is_empty());

    let status = ledger.get_xp_status("u1").unwrap();
    assert_eq!(status.badges.len(), 5);
}

#[test]
fn test_repeat_cap_bounds_xp() {
    let (_dir, ledger) = test_ledger();
    ledger.users().register("u1", None).unwrap();

    let mut gained = 0;
    for _ in 0..10 {
        gained += ledger.trigger_event("u1", "CAPPED", None).unwrap().xp_gained;
    }
    assert_eq!(gained, 30);
    assert_eq!(ledger.events().earn_count("u1", "CAPPED").unwrap(), 3);
    assert_eq!(ledger.users().get("u1").unwrap().xp, 30);
}

#[test]
fn test_repeat_earn_resets_claim() {
    let (_dir, ledger) = test_ledger();
    ledger.users().register("u1", None).unwrap();

    let first = ledger.trigger_event("u1", "FIFTY", None).unwrap();
    let id = first.awarded_achievements[0].id;
    ledger.redeem_achievement("u1", id).unwrap();

    let second = ledger.trigger_event("u1", "FIFTY", None).unwrap();
    assert_eq!(second.awarded_achievements[0].id, id);
    assert_eq!(second.awarded_achievements[0].earn_count, 2);

    let status = ledger.get_xp_status("u1").unwrap();
    let row = status.achievements.iter().find(|a| a.id == id).unwrap();
    assert!(!row.claimed);
    assert_eq!(row.earn_count, 2);
}

#[test]
fn test_level_matches_xp_after_every_write() {
    let (_dir, ledger) = builtin_ledger();
    ledger.users().register("u1", None).unwrap();

    let keys = [
        "RESUME_ARCHIVIST",
        "ADVISOR",
        "THOUGHT_LEADER",
        "COMMUNITY_VOICE",
        "PROJECT_BUILDER",
        "UNKNOWN_KEY",
        "CAREER_CLIMBER",
        "INTERVIEW_INSIGHT",
    ];
    for round in 0..6 {
        for key in keys {
            let result = ledger.trigger_event("u1", key, None).unwrap();
            assert_eq!(
                result.level,
                level_for_xp(result.xp, 300),
                "round {round}, key {key}"
            );
            let stored = ledger.users().get("u1").unwrap();
            assert_eq!(stored.level, level_for_xp(stored.xp, 300));
        }
    }
}

#[test]
fn test_unknown_key_and_unknown_user() {
    let (_dir, ledger) = builtin_ledger();
    ledger.users().register("u1", None).unwrap();
    ledger.trigger_event("u1", "ADVISOR", None).unwrap();

    let noop = ledger.trigger_event("u1", "NOT_A_KEY", None).unwrap();
    assert_eq!(noop, TriggerEventResult::unchanged(50, 0));

    let err = ledger.trigger_event("ghost", "ADVISOR", None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    // Unknown user wins over unknown key
    let err = ledger.trigger_event("ghost", "NOT_A_KEY", None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_meta_kept_from_first_earn() {
    let (_dir, ledger) = builtin_ledger();
    ledger.users().register("u1", None).unwrap();

    let mut meta = Meta::new();
    meta.insert("postId".to_string(), serde_json::json!("post-1"));
    ledger.trigger_event("u1", "THOUGHT_LEADER", Some(&meta)).unwrap();

    let mut other = Meta::new();
    other.insert("postId".to_string(), serde_json::json!("post-2"));
    ledger.trigger_event("u1", "THOUGHT_LEADER", Some(&other)).unwrap();

    let status = ledger.get_xp_status("u1").unwrap();
    let earned = &status.achievements[0];
    assert_eq!(earned.earn_count, 2);
    assert_eq!(earned.meta.as_ref().unwrap()["postId"], "post-1");
}
