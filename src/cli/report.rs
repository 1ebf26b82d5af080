//! Read-only commands: status, achievements, badges, leaderboard, keys

use anyhow::Result;

use super::CliContext;

pub fn status_command(ctx: &CliContext, user: &str) -> Result<()> {
    let ledger = ctx.open_ledger()?;
    let status = ledger.get_xp_status(user)?;

    ctx.emit(&status, |s| {
        println!("Level {}  {}  ({:.0}%)", s.level, s.display_range, s.progress_percent);
        if let Some(badge) = &s.current_badge {
            println!("Badge: {} {}", badge.icon.as_deref().unwrap_or("*"), badge.name);
        }

        println!(
            "\nDaily challenges ({}/{} on {}):",
            s.daily_challenges.completed_today, s.daily_challenges.max_daily, s.daily_challenges.day
        );
        for c in &s.daily_challenges.available {
            let mark = if c.completed { "x" } else { " " };
            println!("  [{}] {} {} (+{} XP)", mark, c.key, c.title, c.xp_reward);
        }

        if !s.achievements.is_empty() {
            println!("\nAchievements ({}):", s.achievements.len());
            for a in &s.achievements {
                let claimed = if a.claimed { "claimed" } else { "unclaimed" };
                println!("  #{} {} x{} [{}]", a.id, a.title, a.earn_count, claimed);
            }
        }

        if !s.badges.is_empty() {
            println!("\nBadges ({}):", s.badges.len());
            for b in &s.badges {
                println!("  L{} {}", b.level, b.name);
            }
        }
    })
}

/// List catalog achievements, with one user's progress when `user` is given
pub fn achievements_command(ctx: &CliContext, user: Option<&str>) -> Result<()> {
    let ledger = ctx.open_ledger()?;

    let Some(user) = user else {
        let defs = ledger.get_achievement_definitions();
        return ctx.emit(&defs, |defs| {
            for d in defs {
                let repeat = match (d.repeatable, d.max_repeats) {
                    (true, Some(max)) => format!(" (repeatable x{max})"),
                    (true, None) => " (repeatable)".to_string(),
                    (false, _) => String::new(),
                };
                println!("  {:<22} {:<10} {:>4} XP  {}{}", d.key, d.category.as_str(), d.xp_reward, d.title, repeat);
            }
        });
    };

    let views = ledger.get_achievement_definitions_with_progress(user)?;
    ctx.emit(&views, |views| {
        for v in views {
            let mark = if v.earned { "x" } else { " " };
            println!(
                "  [{}] {:<22} {:>3}/{:<3} {:>3}%  {}",
                mark, v.key, v.progress.current, v.progress.target, v.progress.percent, v.title
            );
        }
    })
}

pub fn badges_command(ctx: &CliContext) -> Result<()> {
    let ledger = ctx.open_ledger()?;
    let badges = ledger.get_badge_definitions();
    ctx.emit(&badges, |badges| {
        for b in badges {
            println!("  L{:<3} {} {}", b.level, b.icon.as_deref().unwrap_or("*"), b.name);
        }
    })
}

pub fn leaderboard_command(ctx: &CliContext, limit: Option<usize>) -> Result<()> {
    let ledger = ctx.open_ledger()?;
    let entries = ledger.get_leaderboard(limit)?;
    ctx.emit(&entries, |entries| {
        if entries.is_empty() {
            println!("No active users.");
        }
        for e in entries {
            let badge = e.current_badge.as_ref().map(|b| b.name.as_str()).unwrap_or("-");
            println!("  {:>3}. {:<24} {:>7} XP  L{:<3} {}", e.rank, e.name, e.xp, e.level, badge);
        }
    })
}

pub fn keys_command(ctx: &CliContext) -> Result<()> {
    let ledger = ctx.open_ledger()?;
    let keys = ledger.report().event_keys();
    ctx.emit(&keys, |keys| {
        for k in keys {
            println!("{}", k);
        }
    })
}
