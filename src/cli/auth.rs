//! Login, logout and whoami commands

use super::helpers::{prompt_line, Context};
use appraise_core::{error::Result, router::Route, types::User};
use tracing::debug;

/// Handle `appraise login`
pub async fn handle_login(ctx: &Context, username: &str, password: Option<String>) -> Result<()> {
    ctx.enter(Route::Login)?;

    let password = match password {
        Some(p) => p,
        None => prompt_line("Password: ")?,
    };

    let response = ctx.client.auth().login(username, &password).await?;
    debug!("Logged in against {}", ctx.config.api_url);
    ctx.enter(Route::Dashboard)?;

    println!("Logged in as {}", response.user.display_name());
    Ok(())
}

/// Handle `appraise logout`
pub async fn handle_logout(ctx: &Context) -> Result<()> {
    if !ctx.client.auth().is_authenticated() {
        // Wipe any leftover keys so a stale or unreadable file does not linger
        ctx.client.session().destroy()?;
        println!("Not logged in");
        return Ok(());
    }
    ctx.client.auth().logout().await?;
    ctx.enter(Route::Login)?;
    println!("Logged out");
    Ok(())
}

/// Handle `appraise whoami`: refresh the profile from the backend
pub async fn handle_whoami(ctx: &Context) -> Result<()> {
    ctx.enter(Route::Dashboard)?;
    let user = ctx.client.auth().me().await?;
    print_profile(&user);
    Ok(())
}

pub fn print_profile(user: &User) {
    println!("{} ({})", user.display_name(), user.username);
    println!("  Email:    {}", or_not_set(&user.email));
    println!("  Position: {}", or_not_set(&user.position));
    println!("  Division: {}", or_not_set(&user.division));
}

fn or_not_set(value: &str) -> &str {
    if value.is_empty() {
        "Not set"
    } else {
        value
    }
}
