//! services/app/src/commands.rs
//!
//! Runs one CLI command against the session context and prints the result.

use crate::adapters::TerminalPrompt;
use crate::cli::{Command, ItemsCommand};
use crate::client::SessionContext;
use crate::error::AppError;
use crate::views::{CountrySelector, Dashboard, DashboardView, LoginView, Navbar, RegisterView};
use dashboard_core::guard::{guard, resolve, RouteDecision};
use dashboard_core::validation::RegistrationForm;
use std::sync::Arc;

pub async fn run(command: Command, context: &SessionContext) -> Result<(), AppError> {
    match command {
        Command::Login { username, password } => {
            let mut view = LoginView::new(context.clone());
            view.username = username;
            view.password = password;
            let next = view.submit().await?;
            if let Some(label) = Navbar::new(context.clone()).label() {
                println!("Signed in as {}", label);
            }
            println!("-> {}", next);
        }
        Command::Register {
            username,
            password,
            confirm_password,
            role,
            country,
        } => {
            let mut view = RegisterView::new(context.clone());
            view.form = RegistrationForm {
                username,
                password,
                confirm_password,
                role,
                country,
            };
            let next = view.submit().await?;
            println!("Account created for {}. Sign in to continue.", view.form.username);
            println!("-> {}", next);
        }
        Command::Logout => {
            let next = Navbar::new(context.clone()).logout();
            println!("Signed out");
            println!("-> {}", next);
        }
        Command::Whoami { json } => match context.user() {
            Some(user) if json => println!("{}", serde_json::to_string_pretty(&user)?),
            Some(_) => {
                let label = Navbar::new(context.clone()).label().unwrap_or_default();
                println!("{}", label);
            }
            None => println!("Not signed in"),
        },
        Command::Country { country } => {
            require_session(context)?;
            let mut selector = CountrySelector::new(context.clone());
            selector.select(country).await?;
            println!("Country set to {} ({})", country.name(), country.code());
        }
        Command::Items { action } => {
            require_session(context)?;
            run_items(action, context).await?;
        }
        Command::Open { path } => {
            println!("{}", resolve(&path, &context.session()));
        }
    }
    Ok(())
}

fn require_session(context: &SessionContext) -> Result<(), AppError> {
    match guard(&context.session()) {
        RouteDecision::Allow => Ok(()),
        RouteDecision::Redirect(route) => Err(AppError::Redirect(route)),
    }
}

async fn run_items(action: ItemsCommand, context: &SessionContext) -> Result<(), AppError> {
    let assume_yes = matches!(action, ItemsCommand::Delete { yes: true, .. });
    let mut dashboard = Dashboard::new(context, Arc::new(TerminalPrompt::new(assume_yes)));

    match action {
        ItemsCommand::List => {
            dashboard.fetch().await?;
        }
        ItemsCommand::Add { name } => {
            dashboard.set_draft(name);
            dashboard.submit().await?;
        }
        ItemsCommand::Edit { id, name } => {
            dashboard.fetch().await?;
            dashboard.begin_edit_by_id(&id)?;
            dashboard.set_draft(name);
            dashboard.submit().await?;
        }
        ItemsCommand::Delete { id, .. } => {
            if !dashboard.delete(&id).await? {
                println!("Cancelled");
                return Ok(());
            }
        }
    }
    print_table(&dashboard.view());
    Ok(())
}

fn print_table(view: &DashboardView) {
    let mut lines: Vec<Vec<String>> = vec![view.columns.iter().map(|c| c.to_string()).collect()];
    for row in &view.rows {
        let mut cells = vec![row.name.clone(), row.created_by.clone(), row.created_at.clone()];
        if row.actions {
            cells.push(row.id.clone());
        }
        lines.push(cells);
    }

    let widths: Vec<usize> = (0..view.columns.len())
        .map(|col| {
            lines
                .iter()
                .filter_map(|line| line.get(col))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    for line in &lines {
        let rendered: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        println!("{}", rendered.join("  ").trim_end());
    }
    if view.rows.is_empty() {
        println!("(no items)");
    }
}
