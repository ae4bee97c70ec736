//! Command implementations for the CLI interface.
//!
//! Every handler goes through the [`RemoteStore`], so the command line, the
//! TUI and any backend share the same validation and the same cache rules.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::fields::{TaskStatus, Theme};
use crate::store::RemoteStore;
use crate::task::{CreateTaskInput, CreateTemplateInput, Task, Template, UpdateTaskPayload};
use crate::tui::run::run_tui;
use crate::tui::utils::truncate;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive home screen.
    Ui,

    /// Open the kanban board of one template.
    Board {
        /// Template id or name.
        template: String,
    },

    /// Manage templates.
    Template {
        #[command(subcommand)]
        action: TemplateAction,
    },

    /// Manage tasks.
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Show the most recently created tasks across all templates.
    Latest {
        /// Number of tasks to show.
        #[arg(long, short = 'n', default_value_t = 5)]
        limit: usize,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum TemplateAction {
    /// Create a template.
    Create {
        name: String,
        /// What the template is for.
        #[arg(long, short, default_value = "")]
        description: String,
    },
    /// List all templates.
    List,
    /// Delete a template and all of its tasks.
    Delete {
        /// Template id or name.
        template: String,
    },
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to a template.
    Add {
        /// Template id or name.
        template: String,
        name: String,
        #[arg(long, short, value_enum, default_value_t = TaskStatus::Todo)]
        status: TaskStatus,
    },
    /// Change a task's name and/or status. Omitted fields are kept.
    Update {
        /// Task id or a unique id prefix.
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, short, value_enum)]
        status: Option<TaskStatus>,
    },
    /// Delete a task.
    Delete {
        /// Task id or a unique id prefix.
        id: String,
    },
    /// List the tasks of a template, grouped by status.
    List {
        /// Template id or name.
        template: String,
        #[arg(long, short, value_enum)]
        status: Option<TaskStatus>,
    },
}

/// Find a template by exact id, then by case-insensitive name.
pub async fn resolve_template(store: &RemoteStore, ident: &str) -> Result<Template> {
    let templates = store.fetch_templates().await.context("Failed to load templates")?;
    if let Some(t) = templates.iter().find(|t| t.id == ident) {
        return Ok(t.clone());
    }
    let matches: Vec<&Template> = templates.iter().filter(|t| t.name.eq_ignore_ascii_case(ident)).collect();
    match matches.as_slice() {
        [one] => Ok((*one).clone()),
        [] => bail!("Template '{ident}' not found"),
        _ => bail!("Template name '{ident}' is ambiguous; use its id"),
    }
}

/// Find a task by exact id or by a unique id prefix.
pub async fn resolve_task(store: &RemoteStore, ident: &str) -> Result<Task> {
    let tasks = store.fetch_latest_tasks(usize::MAX).await.context("Failed to load tasks")?;
    if let Some(t) = tasks.iter().find(|t| t.id == ident) {
        return Ok(t.clone());
    }
    let matches: Vec<&Task> = tasks.iter().filter(|t| t.id.starts_with(ident)).collect();
    match matches.as_slice() {
        [one] => Ok((*one).clone()),
        [] => bail!("Task '{ident}' not found"),
        _ => bail!("Task id prefix '{ident}' matches {} tasks", matches.len()),
    }
}

/// Short form of an id for tables.
fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn print_tasks(tasks: &[Task]) {
    println!("{:<10} {:<8} {:<40} {:<16}", "ID", "Status", "Name", "Created");
    for task in tasks {
        println!(
            "{:<10} {:<8} {:<40} {:<16}",
            short_id(&task.id),
            task.status,
            truncate(&task.name, 40),
            task.created_at.format("%Y-%m-%d %H:%M")
        );
    }
}

/// Launch the TUI on the home screen, or straight onto a template's board.
pub async fn cmd_ui(store: Arc<RemoteStore>, theme: Theme, template: Option<String>) -> Result<()> {
    let initial = match template {
        Some(ident) => Some(resolve_template(&store, &ident).await?.id),
        None => None,
    };
    run_tui(store, theme, initial).await.context("Terminal UI failed")
}

pub async fn cmd_template(store: &RemoteStore, action: TemplateAction) -> Result<()> {
    match action {
        TemplateAction::Create { name, description } => {
            let template = store
                .create_template(CreateTemplateInput { name, description })
                .await
                .context("Failed to create template")?;
            println!("Created template '{}' ({})", template.name, template.id);
        }
        TemplateAction::List => {
            let templates = store.fetch_templates().await.context("Failed to load templates")?;
            if templates.is_empty() {
                println!("No templates found.");
                return Ok(());
            }
            println!("{:<10} {:<20} {:<40}", "ID", "Name", "Description");
            for template in &templates {
                println!(
                    "{:<10} {:<20} {:<40}",
                    short_id(&template.id),
                    truncate(&template.name, 20),
                    truncate(&template.description, 40)
                );
            }
        }
        TemplateAction::Delete { template } => {
            let template = resolve_template(store, &template).await?;
            store.delete_template(&template.id).await.context("Failed to delete template")?;
            println!("Deleted template '{}'", template.name);
        }
    }
    Ok(())
}

pub async fn cmd_task(store: &RemoteStore, action: TaskAction) -> Result<()> {
    match action {
        TaskAction::Add { template, name, status } => {
            let template = resolve_template(store, &template).await?;
            let task = store
                .create_task(CreateTaskInput { template_id: template.id, status, name })
                .await
                .context("Failed to create task")?;
            println!("Added task {} '{}' [{}]", short_id(&task.id), task.name, task.status);
        }
        TaskAction::Update { id, name, status } => {
            if name.is_none() && status.is_none() {
                bail!("Nothing to update; pass --name and/or --status");
            }
            let task = resolve_task(store, &id).await?;
            let mut payload = UpdateTaskPayload::new(&task.id);
            if let Some(name) = name {
                payload = payload.name(name);
            }
            if let Some(status) = status {
                payload = payload.status(status);
            }
            match store.update_task(payload).await.context("Failed to update task")? {
                Some(task) => println!("Updated task {} '{}' [{}]", short_id(&task.id), task.name, task.status),
                None => println!("Nothing updated."),
            }
        }
        TaskAction::Delete { id } => {
            let task = resolve_task(store, &id).await?;
            store.delete_task(&task.id).await.context("Failed to delete task")?;
            println!("Deleted task {} '{}'", short_id(&task.id), task.name);
        }
        TaskAction::List { template, status } => {
            let template = resolve_template(store, &template).await?;
            let tasks = store.fetch_tasks(&template.id).await.context("Failed to load tasks")?;
            let statuses: Vec<TaskStatus> = match status {
                Some(s) => vec![s],
                None => TaskStatus::ALL.to_vec(),
            };
            println!("{}", template.name);
            for status in statuses {
                let column: Vec<Task> = tasks.iter().filter(|t| t.status == status).cloned().collect();
                println!("\n[{}] {}", column.len(), status);
                if !column.is_empty() {
                    print_tasks(&column);
                }
            }
        }
    }
    Ok(())
}

pub async fn cmd_latest(store: &RemoteStore, limit: usize) -> Result<()> {
    let tasks = store.fetch_latest_tasks(limit).await.context("Failed to load tasks")?;
    if tasks.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }
    print_tasks(&tasks);
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
