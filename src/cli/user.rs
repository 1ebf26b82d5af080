//! User management commands

use anyhow::Result;

use xpledger::ledger::UserRecord;

use super::CliContext;

fn print_user(user: &UserRecord) {
    println!(
        "{}  {}  xp={} level={}{}",
        user.id,
        user.name.as_deref().unwrap_or("Anonymous"),
        user.xp,
        user.level,
        if user.is_active { "" } else { "  (inactive)" }
    );
}

/// Register a user; a random id is generated when none is given
pub fn user_add_command(ctx: &CliContext, id: Option<String>, name: Option<String>) -> Result<()> {
    let ledger = ctx.open_ledger()?;
    let id = id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let user = ledger.users().register(&id, name.as_deref())?;
    ctx.emit(&user, print_user)
}

pub fn user_set_active_command(ctx: &CliContext, id: &str, active: bool) -> Result<()> {
    let ledger = ctx.open_ledger()?;
    let user = ledger.users().set_active(id, active)?;
    ctx.emit(&user, print_user)
}
