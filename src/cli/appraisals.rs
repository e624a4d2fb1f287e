//! Appraisal commands: list, create, show, rate, sign, evaluate

use super::helpers::{truncate, Context};
use appraise_core::{
    criteria::Criterion,
    error::{AppraiseError, Result},
    pages::{
        AppraisalDetailPage, AppraisalListPage, CreateAppraisalPage, DetailState, ListState,
        LoadedAppraisal,
    },
    router::Route,
    signature::parse_stroke,
    types::{AppraisalStatus, AppraisalUpdate, OverallEvaluationUpdate, RatingCategory, RatingLevel},
};
use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use tracing::debug;

#[derive(Subcommand)]
pub enum AppraisalsAction {
    /// List appraisals visible to you
    List {
        /// Only show appraisals in this status (pending, in-progress, completed)
        #[arg(long)]
        status: Option<String>,
    },

    /// Create a pending appraisal
    Create {
        /// Appraisal cycle id (must be active)
        #[arg(long)]
        cycle: i64,

        /// Project id
        #[arg(long)]
        project: i64,

        /// User id of the appraisee (a non-reporter member of the project)
        #[arg(long)]
        appraisee: i64,

        /// Discussion date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
    },

    /// Show an appraisal with your rating sheet
    Show {
        /// Appraisal id
        id: i64,
    },

    /// Rate criteria on your review and save
    Rate {
        /// Appraisal id
        id: i64,

        /// CRITERION=LEVEL, criterion by number (1-10) or name, level 1-5
        #[arg(short, long = "rating", value_parser = parse_rating)]
        ratings: Vec<(Criterion, RatingLevel)>,

        /// CRITERION=TEXT comment on a criterion
        #[arg(short, long = "comment", value_parser = parse_comment)]
        comments: Vec<(Criterion, String)>,
    },

    /// Sign your review, completing it
    Sign {
        /// Appraisal id
        id: i64,

        /// Pen stroke as space-separated x,y points; repeat for more strokes
        #[arg(long = "stroke", required = true)]
        strokes: Vec<String>,
    },

    /// Update the overall evaluation of an appraisal
    Evaluate {
        /// Appraisal id
        id: i64,

        /// Summary comment
        #[arg(long)]
        summary: Option<String>,

        /// Ready for advanced work
        #[arg(long)]
        advanced_work: Option<bool>,

        /// Ready for promotion
        #[arg(long)]
        promotion: Option<bool>,

        /// Mark the evaluation finalized now
        #[arg(long)]
        finalize: bool,
    },

    /// Change the status of an appraisal
    Status {
        /// Appraisal id
        id: i64,

        /// New status (pending, in-progress, completed)
        status: String,
    },

    /// Delete an appraisal
    Delete {
        /// Appraisal id
        id: i64,
    },
}

/// Handle appraisal commands
pub async fn handle(ctx: &Context, action: AppraisalsAction) -> Result<()> {
    let result = dispatch(ctx, action).await;
    ctx.report_forced_logout();
    result
}

async fn dispatch(ctx: &Context, action: AppraisalsAction) -> Result<()> {
    match action {
        AppraisalsAction::List { status } => list(ctx, status).await,
        AppraisalsAction::Create {
            cycle,
            project,
            appraisee,
            date,
        } => create(ctx, cycle, project, appraisee, date).await,
        AppraisalsAction::Show { id } => {
            ctx.enter(Route::AppraisalDetail(id))?;
            let page = load_detail(ctx, id).await?;
            if let Some(loaded) = page.loaded() {
                print_detail(loaded);
            }
            Ok(())
        }
        AppraisalsAction::Rate {
            id,
            ratings,
            comments,
        } => rate(ctx, id, ratings, comments).await,
        AppraisalsAction::Sign { id, strokes } => sign(ctx, id, strokes).await,
        AppraisalsAction::Evaluate {
            id,
            summary,
            advanced_work,
            promotion,
            finalize,
        } => {
            ctx.enter(Route::AppraisalDetail(id))?;
            let evaluation = ctx
                .client
                .evaluations()
                .for_appraisal(id)
                .await?
                .ok_or_else(|| {
                    AppraiseError::NotFound(format!("overall evaluation of appraisal {}", id))
                })?;
            let update = OverallEvaluationUpdate {
                summary_comment: summary,
                ready_for_advanced_work: advanced_work,
                ready_for_promotion: promotion,
                finalized_at: finalize.then(Utc::now),
                ..Default::default()
            };
            let updated = ctx.client.evaluations().update(evaluation.id, &update).await?;
            println!(
                "Overall evaluation {} updated{}",
                updated.id,
                if updated.is_finalized() { " (finalized)" } else { "" }
            );
            Ok(())
        }
        AppraisalsAction::Status { id, status } => {
            ctx.enter(Route::AppraisalDetail(id))?;
            let status: AppraisalStatus = status.parse()?;
            let update = AppraisalUpdate {
                status: Some(status),
                ..Default::default()
            };
            let updated = ctx.client.appraisals().update(id, &update).await?;
            println!("Appraisal {} is now {}", updated.id, updated.status.as_str());
            Ok(())
        }
        AppraisalsAction::Delete { id } => {
            ctx.enter(Route::AppraisalDetail(id))?;
            ctx.client.appraisals().delete(id).await?;
            ctx.enter(Route::Appraisals)?;
            println!("Deleted appraisal {}", id);
            Ok(())
        }
    }
}

async fn list(ctx: &Context, status: Option<String>) -> Result<()> {
    ctx.enter(Route::Appraisals)?;
    let filter = status.map(|s| s.parse::<AppraisalStatus>()).transpose()?;

    let mut page = AppraisalListPage::new(ctx.client.clone());
    page.load().await;
    let appraisals = match page.state() {
        ListState::Populated(items) => items,
        ListState::Error(message) => return Err(AppraiseError::Other(message.clone())),
        ListState::Loading => return Ok(()),
    };

    let shown: Vec<_> = appraisals
        .iter()
        .filter(|a| filter.map_or(true, |f| a.status == f))
        .collect();
    if shown.is_empty() {
        println!("No appraisals found");
        return Ok(());
    }

    println!(
        "{:<6} {:<25} {:<20} {:<24} {:<12} {}",
        "ID", "APPRAISEE", "PROJECT", "CYCLE", "DISCUSSION", "STATUS"
    );
    for a in shown {
        let cycle = a
            .cycle_info
            .as_ref()
            .map(|c| format!("{} to {}", c.period_start, c.period_end))
            .unwrap_or_else(|| format!("#{}", a.cycle));
        let discussion = a
            .discussion_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<6} {:<25} {:<20} {:<24} {:<12} {}",
            a.id,
            truncate(&a.appraisee_name, 25),
            truncate(&a.project_name, 20),
            cycle,
            discussion,
            a.status.as_str()
        );
    }
    Ok(())
}

async fn create(
    ctx: &Context,
    cycle: i64,
    project: i64,
    appraisee: i64,
    date: NaiveDate,
) -> Result<()> {
    ctx.enter(Route::CreateAppraisal)?;

    let mut page = CreateAppraisalPage::new(ctx.client.clone());
    page.load().await;
    if let Some(error) = page.error() {
        return Err(AppraiseError::Other(error.to_string()));
    }
    if !page.cycles().iter().any(|c| c.id == cycle) {
        return Err(AppraiseError::InvalidOperation(format!(
            "cycle {} is not an active appraisal cycle",
            cycle
        )));
    }

    page.select_cycle(Some(cycle));
    page.select_project(Some(project)).await;
    if let Some(error) = page.error() {
        return Err(AppraiseError::Other(error.to_string()));
    }
    if !page.members().iter().any(|m| m.user == appraisee) {
        return Err(AppraiseError::InvalidOperation(format!(
            "user {} is not an appraisable member of project {}",
            appraisee, project
        )));
    }
    page.select_appraisee(Some(appraisee));
    page.set_discussion_date(Some(date));

    match page.submit().await {
        Some(id) => {
            println!("Created appraisal {}", id);
            println!("  {}", ctx.history.current());
            Ok(())
        }
        None => Err(AppraiseError::Other(
            page.error()
                .unwrap_or("Failed to create appraisal")
                .to_string(),
        )),
    }
}

async fn load_detail(ctx: &Context, id: i64) -> Result<AppraisalDetailPage> {
    let mut page = AppraisalDetailPage::new(ctx.client.clone(), id);
    page.load().await;
    match page.state() {
        DetailState::Loaded(_) => Ok(page),
        DetailState::NotFound(message) => Err(AppraiseError::NotFound(message.clone())),
        DetailState::Loading => Err(AppraiseError::Other("Failed to load appraisal".to_string())),
    }
}

async fn rate(
    ctx: &Context,
    id: i64,
    ratings: Vec<(Criterion, RatingLevel)>,
    comments: Vec<(Criterion, String)>,
) -> Result<()> {
    if ratings.is_empty() && comments.is_empty() {
        return Err(AppraiseError::InvalidOperation(
            "nothing to save; pass --rating or --comment".to_string(),
        ));
    }
    ctx.enter(Route::AppraisalDetail(id))?;
    let mut page = load_detail(ctx, id).await?;

    for (criterion, level) in ratings {
        debug!("{} -> {}", criterion, level);
        page.set_rating(criterion, level);
    }
    for (criterion, text) in comments {
        page.set_comment(criterion, text);
    }
    page.save_ratings().await;

    let notice = page.loaded().and_then(|l| l.ratings_notice.clone());
    match notice {
        Some(notice) if notice.is_error() => Err(AppraiseError::Other(notice.message().to_string())),
        Some(notice) => {
            println!("{}", notice.message());
            Ok(())
        }
        None => Ok(()),
    }
}

async fn sign(ctx: &Context, id: i64, strokes: Vec<String>) -> Result<()> {
    ctx.enter(Route::AppraisalDetail(id))?;
    let mut page = load_detail(ctx, id).await?;

    let Some(loaded) = page.loaded_mut() else {
        return Ok(());
    };
    if loaded.signature.is_signed() {
        println!("Review already signed");
        return Ok(());
    }
    for stroke in &strokes {
        loaded.signature.stroke(&parse_stroke(stroke)?);
    }

    page.save_signature().await;
    let notice = page.loaded().and_then(|l| l.signature_notice.clone());
    match notice {
        Some(notice) if notice.is_error() => Err(AppraiseError::Other(notice.message().to_string())),
        Some(notice) => {
            println!("{}", notice.message());
            Ok(())
        }
        None => Err(AppraiseError::InvalidOperation(
            "signature is empty".to_string(),
        )),
    }
}

fn print_detail(loaded: &LoadedAppraisal) {
    let a = &loaded.appraisal;
    println!("Appraisal {} ({})", a.id, a.status.as_str());
    println!("  Appraisee:  {}", a.appraisee_name);
    println!("  Project:    {}", a.project_name);
    if let Some(cycle) = &a.cycle_info {
        println!(
            "  Cycle:      {} to {} ({})",
            cycle.period_start, cycle.period_end, cycle.status
        );
    }
    if let Some(date) = a.discussion_date {
        println!("  Discussion: {}", date);
    }
    if let Some(avg) = loaded.overall_average() {
        println!("  Average:    {:.2}", avg);
    }

    println!();
    println!("Reviews");
    for review in &a.reviews {
        let state = match (review.is_completed, review.is_signed()) {
            (true, true) => "completed, signed",
            (true, false) => "completed",
            (false, true) => "signed",
            (false, false) => "open",
        };
        println!("  #{} {} ({})", review.id, review.reviewer_name, state);
    }

    if let Some(sheet) = &loaded.sheet {
        println!();
        println!("My ratings");
        let mut number = 0;
        for category in RatingCategory::ALL {
            println!("  {}", category.display_name());
            for (criterion, entry) in sheet.category(category) {
                number += 1;
                let rating = entry
                    .and_then(|e| e.rating)
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!("    {:>2}. {:<42} {}", number, criterion.name(), rating);
                if let Some(entry) = entry.filter(|e| !e.comments.is_empty()) {
                    println!("        {}", entry.comments);
                }
            }
        }
        if let Some(avg) = sheet.average() {
            println!("  Sheet average: {:.2}", avg);
        }
        println!(
            "  Signature: {}",
            if loaded.signature.is_signed() { "signed" } else { "not signed" }
        );
    }

    if let Some(evaluation) = &loaded.evaluation {
        println!();
        println!("Overall evaluation");
        if let Some(avg) = evaluation.overall_rating_avg {
            println!("  Average rating:          {:.2}", avg);
        }
        println!("  Ready for advanced work: {}", evaluation.ready_for_advanced_work);
        println!("  Ready for promotion:     {}", evaluation.ready_for_promotion);
        if !evaluation.summary_comment.is_empty() {
            println!("  Summary: {}", evaluation.summary_comment);
        }
        if evaluation.is_finalized() {
            println!("  Finalized");
        }
    }
}

fn parse_rating(input: &str) -> std::result::Result<(Criterion, RatingLevel), String> {
    let (criterion, level) = input
        .rsplit_once('=')
        .ok_or_else(|| format!("expected CRITERION=LEVEL, got '{}'", input))?;
    let criterion = Criterion::parse(criterion).map_err(|e| e.to_string())?;
    let level: u8 = level
        .trim()
        .parse()
        .map_err(|_| format!("rating must be a number from 1 to 5, got '{}'", level))?;
    let level = RatingLevel::try_from(level).map_err(|e| e.to_string())?;
    Ok((criterion, level))
}

fn parse_comment(input: &str) -> std::result::Result<(Criterion, String), String> {
    let (criterion, text) = input
        .split_once('=')
        .ok_or_else(|| format!("expected CRITERION=TEXT, got '{}'", input))?;
    let criterion = Criterion::parse(criterion).map_err(|e| e.to_string())?;
    Ok((criterion, text.trim().to_string()))
}
