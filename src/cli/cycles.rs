//! Appraisal cycle listing

use super::helpers::Context;
use appraise_core::{error::Result, router::Route, types::CycleStatus};

/// Handle `appraise cycles [--status S]`
pub async fn handle(ctx: &Context, status: Option<String>) -> Result<()> {
    ctx.enter(Route::CreateAppraisal)?;

    let cycles = ctx.client.cycles();
    let cycles = match status {
        Some(status) => cycles.list_by_status(status.parse::<CycleStatus>()?).await?,
        None => cycles.list().await?,
    };

    if cycles.is_empty() {
        println!("No appraisal cycles found");
        return Ok(());
    }
    for cycle in cycles {
        println!("{:<6} {}", cycle.id, cycle);
    }
    Ok(())
}
