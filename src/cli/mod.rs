//! Command-line shell.
//!
//! One-shot commands over the client library. Every invocation restores
//! the persisted session first and the route table gates each command the
//! same way interactive navigation would.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use jiff::Timestamp;

use crate::{
    config::ClientConfig,
    context::AppContext,
    routes::{self, RouteDecision, View},
    session::{SessionIdentity, SessionStore},
};

mod categories;
mod medicines;
mod pos;
mod profile;
mod sales;
mod session;
mod users;

const NOT_SIGNED_IN: &str = "not signed in; run `pharmalink login` first";
const ACCESS_DENIED: &str = "access denied: this command requires an administrator";

/// Parsed invocation of the `pharmalink` binary.
#[derive(Debug, Parser)]
#[command(name = "pharmalink", about = "PharmaLink pharmacy POS client", long_about = None)]
pub struct Cli {
    /// Connection and logging settings shared by every command.
    #[command(flatten)]
    pub config: ClientConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign in and persist the session token
    Login(session::LoginArgs),
    /// Discard the persisted session token
    Logout,
    /// Show who is signed in
    Whoami,
    /// Show today's aggregate figures
    Dashboard,
    /// Manage the medicine inventory (administrator only)
    Medicines(medicines::MedicinesCommand),
    /// Manage categories (administrator only)
    Categories(categories::CategoriesCommand),
    /// Manage staff accounts (administrator only)
    Users(users::UsersCommand),
    /// View or update the signed-in account
    Profile(profile::ProfileCommand),
    /// Ring up a sale at the terminal
    Sell(pos::SellArgs),
    /// Browse, export, reprint and void sales
    Sales(sales::SalesCommand),
}

impl Cli {
    /// Dispatch the parsed command.
    ///
    /// # Errors
    ///
    /// Returns an operator-facing message when the command is not
    /// authorized or the backend rejects it.
    pub async fn run(self) -> Result<(), String> {
        let context = AppContext::from_config(&self.config);
        let mut store =
            SessionStore::new(Arc::clone(&context.credentials), Arc::clone(&context.auth));

        store.restore(Timestamp::now());

        match self.command {
            Commands::Login(args) => session::login(&mut store, args).await,
            Commands::Logout => {
                store.logout();
                println!("signed out");
                Ok(())
            }
            Commands::Whoami => session::whoami(&store),
            Commands::Dashboard => {
                guard(View::Dashboard, store.identity())?;
                dashboard(&context).await
            }
            Commands::Medicines(command) => {
                guard(View::Inventory, store.identity())?;
                medicines::run(&context, command).await
            }
            Commands::Categories(command) => {
                guard(View::Categories, store.identity())?;
                categories::run(&context, command).await
            }
            Commands::Users(command) => {
                guard(View::Users, store.identity())?;
                users::run(&context, command).await
            }
            Commands::Profile(command) => {
                guard(View::Profile, store.identity())?;
                profile::run(&context, command).await
            }
            Commands::Sell(args) => {
                let identity = guard(View::PosTerminal, store.identity())?.clone();
                pos::run(&context, &identity, args).await
            }
            Commands::Sales(command) => {
                let identity = guard(View::SalesHistory, store.identity())?.clone();
                sales::run(&context, &identity, command).await
            }
        }
    }
}

fn guard(
    view: View,
    identity: Option<&SessionIdentity>,
) -> Result<&SessionIdentity, String> {
    match routes::authorize(view, identity) {
        RouteDecision::Allow => identity.ok_or_else(|| NOT_SIGNED_IN.to_string()),
        RouteDecision::RedirectToLogin => Err(NOT_SIGNED_IN.to_string()),
        RouteDecision::RedirectToUnauthorized => Err(ACCESS_DENIED.to_string()),
    }
}

async fn dashboard(context: &AppContext) -> Result<(), String> {
    let stats = context
        .dashboard
        .stats()
        .await
        .map_err(|error| format!("failed to fetch dashboard: {error}"))?;

    println!("revenue today:   P {:.2}", stats.total_revenue_today);
    println!("sales today:     {}", stats.total_sales_today);
    println!("low stock items: {}", stats.low_stock_items);
    println!("expiring soon:   {}", stats.expiring_soon_items);
    println!("total medicines: {}", stats.total_medicines);

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::session::Role;

    use super::*;

    fn identity(role: Role) -> SessionIdentity {
        SessionIdentity {
            id: 3,
            username: "alice".to_string(),
            role,
        }
    }

    #[test]
    fn guard_rejects_anonymous_invocations() {
        let error = guard(View::PosTerminal, None).err();

        assert_eq!(error, Some(NOT_SIGNED_IN.to_string()));
    }

    #[test]
    fn guard_rejects_pharmacists_on_admin_commands() {
        let user = identity(Role::Pharmacist);

        let error = guard(View::Inventory, Some(&user)).err();

        assert_eq!(error, Some(ACCESS_DENIED.to_string()));
    }

    #[test]
    fn guard_passes_the_identity_through() {
        let user = identity(Role::Admin);

        let allowed = guard(View::Inventory, Some(&user));

        assert_eq!(allowed.map(|identity| identity.username.as_str()), Ok("alice"));
    }
}
