//! Commands that write progression: trigger, action, scan, daily, redeem, record

use anyhow::{Result, anyhow};

use xpledger::ledger::{CollaboratorAction, Counter};

use super::{CliContext, parse_meta, print_trigger_result};

pub fn trigger_command(ctx: &CliContext, user: &str, key: &str, meta: Option<&str>) -> Result<()> {
    let ledger = ctx.open_ledger()?;
    let meta = parse_meta(meta)?;

    if ledger.catalog().achievement(key).is_none() {
        match ledger.catalog().suggest_key(key) {
            Some(hint) => eprintln!("Unknown event key '{}'. Did you mean '{}'?", key, hint),
            None => eprintln!("Unknown event key '{}'. Run `xpledger keys` to list them.", key),
        }
    }

    let result = ledger.trigger_event(user, key, meta.as_ref())?;
    ctx.emit(&result, print_trigger_result)
}

pub fn action_command(ctx: &CliContext, user: &str, action: &str, meta: Option<&str>) -> Result<()> {
    let action = CollaboratorAction::from_str(action).ok_or_else(|| {
        let known: Vec<&str> = CollaboratorAction::all().iter().map(|a| a.as_str()).collect();
        anyhow!("Unknown action '{}'. Known actions: {}", action, known.join(", "))
    })?;
    let ledger = ctx.open_ledger()?;
    let meta = parse_meta(meta)?;
    let result = ledger.report_action(user, action, meta.as_ref())?;
    ctx.emit(&result, print_trigger_result)
}

pub fn scan_command(ctx: &CliContext, user: &str) -> Result<()> {
    let ledger = ctx.open_ledger()?;
    let result = ledger.check_milestone_achievements(user)?;
    ctx.emit(&result, print_trigger_result)
}

pub fn daily_command(ctx: &CliContext, user: &str, challenge: &str) -> Result<()> {
    let ledger = ctx.open_ledger()?;
    let result = ledger.complete_daily_challenge(user, challenge)?;
    ctx.emit(&result, print_trigger_result)
}

pub fn redeem_command(ctx: &CliContext, user: &str, user_achievement_id: i64) -> Result<()> {
    let ledger = ctx.open_ledger()?;
    let claim = ledger.redeem_achievement(user, user_achievement_id)?;
    ctx.emit(&claim, |c| {
        println!("Claimed #{} {} ({} XP)", c.id, c.title, c.xp_reward);
    })
}

/// How `record` changes a counter
pub enum CounterUpdate {
    Increment,
    Decrement,
    Set(u64),
}

pub fn record_command(ctx: &CliContext, user: &str, counter: &str, update: CounterUpdate) -> Result<()> {
    let counter = Counter::from_str(counter).ok_or_else(|| {
        let known: Vec<&str> = Counter::all().iter().map(|c| c.as_str()).collect();
        anyhow!("Unknown counter '{}'. Known counters: {}", counter, known.join(", "))
    })?;
    let ledger = ctx.open_ledger()?;
    let activity = ledger.activity();
    let total = match update {
        CounterUpdate::Increment => activity.record(user, counter)?,
        CounterUpdate::Decrement => activity.retract(user, counter)?,
        CounterUpdate::Set(n) => activity.set(user, counter, n)?,
    };
    ctx.emit(&total, |t| println!("{} {} = {}", user, counter, t))
}
