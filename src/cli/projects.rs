//! Project commands

use super::helpers::{truncate, Context};
use appraise_core::{
    error::{AppraiseError, Result},
    pages::{ListState, ProjectListPage},
    router::Route,
    types::ProjectMembership,
};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum ProjectsAction {
    /// List projects visible to you
    List,

    /// List members of a project
    Members {
        /// Project id
        id: i64,
    },

    /// List reporters of a project
    Reporters {
        /// Project id
        id: i64,
    },
}

/// Handle project commands
pub async fn handle(ctx: &Context, action: ProjectsAction) -> Result<()> {
    ctx.enter(Route::Projects)?;

    match action {
        ProjectsAction::List => {
            let mut page = ProjectListPage::new(ctx.client.clone());
            page.load().await;
            match page.state() {
                ListState::Populated(projects) if projects.is_empty() => {
                    println!("No projects found");
                }
                ListState::Populated(projects) => {
                    println!("{:<6} {:<30} {:<20} {}", "ID", "NAME", "COMPANY", "ACTIVE");
                    for project in projects {
                        println!(
                            "{:<6} {:<30} {:<20} {}",
                            project.id,
                            truncate(&project.name, 30),
                            truncate(&project.company_name, 20),
                            if project.is_active { "yes" } else { "no" }
                        );
                    }
                }
                ListState::Error(message) => return Err(AppraiseError::Other(message.clone())),
                ListState::Loading => {}
            }
        }
        ProjectsAction::Members { id } => {
            let members = ctx.client.projects().members(id).await?;
            print_memberships(&members);
        }
        ProjectsAction::Reporters { id } => {
            let reporters = ctx.client.projects().reporters(id).await?;
            print_memberships(&reporters);
        }
    }
    Ok(())
}

fn print_memberships(memberships: &[ProjectMembership]) {
    if memberships.is_empty() {
        println!("No members found");
        return;
    }
    println!("{:<8} {:<25} {:<30} {}", "USER", "NAME", "EMAIL", "ROLE");
    for m in memberships {
        println!(
            "{:<8} {:<25} {:<30} {}",
            m.user,
            truncate(&m.user_name, 25),
            truncate(&m.user_email, 30),
            m.role
        );
    }
}
