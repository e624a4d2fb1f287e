//! Dashboard command

use super::auth::print_profile;
use super::helpers::Context;
use appraise_core::{error::Result, pages::DashboardPage, router::Route};

/// Handle `appraise dashboard`
pub async fn handle(ctx: &Context) -> Result<()> {
    ctx.enter(Route::Dashboard)?;

    let mut page = DashboardPage::new(ctx.client.clone());
    page.load().await;

    println!("{}", page.greeting());
    println!("Employee Appraisal Dashboard");
    println!();
    if let Some(user) = page.user() {
        print_profile(user);
        println!();
    }

    println!("Quick stats");
    match (page.stats(), page.error()) {
        (Some(stats), _) => {
            println!("  My projects:          {}", stats.projects);
            println!("  Open appraisals:      {}", stats.open);
            println!("  Completed appraisals: {}", stats.completed);
        }
        (None, Some(error)) => println!("  {}", error),
        (None, None) => println!("  Unavailable"),
    }
    Ok(())
}
