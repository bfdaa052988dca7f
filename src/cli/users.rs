use clap::{Args, Subcommand};

use crate::{
    api::auth::{NewUser, ProfileUpdate},
    context::AppContext,
    session::Role,
};

#[derive(Debug, Args)]
pub(crate) struct UsersCommand {
    #[command(subcommand)]
    command: UsersSubcommand,
}

#[derive(Debug, Subcommand)]
enum UsersSubcommand {
    /// List all staff accounts
    List,
    /// Register a staff account
    Add(AddArgs),
    /// Update a staff account
    Update(UpdateArgs),
    /// Delete a staff account
    Delete(IdArg),
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Login name
    #[arg(long)]
    username: String,

    /// Initial password
    #[arg(long)]
    password: String,

    /// Assigned role
    #[arg(long, value_enum)]
    role: Role,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    /// User id
    #[arg(long)]
    id: i64,

    /// New login name
    #[arg(long)]
    username: Option<String>,

    /// New password
    #[arg(long)]
    password: Option<String>,
}

#[derive(Debug, Args)]
struct IdArg {
    /// User id
    #[arg(long)]
    id: i64,
}

pub(crate) async fn run(context: &AppContext, command: UsersCommand) -> Result<(), String> {
    match command.command {
        UsersSubcommand::List => {
            let users = context
                .auth
                .list_users()
                .await
                .map_err(|error| format!("failed to list users: {error}"))?;

            for user in &users {
                println!(
                    "{:>5}  {:<20}  {:<10}  {}",
                    user.id,
                    user.user_name,
                    user.role,
                    user.email.as_deref().unwrap_or("-"),
                );
            }

            Ok(())
        }
        UsersSubcommand::Add(args) => {
            context
                .auth
                .register_user(&NewUser {
                    user_name: args.username,
                    password: args.password,
                    role: args.role,
                })
                .await
                .map_err(|error| format!("failed to register user: {error}"))?;

            println!("user registered");
            Ok(())
        }
        UsersSubcommand::Update(args) => {
            if args.username.is_none() && args.password.is_none() {
                return Err("nothing to update: pass --username or --password".to_string());
            }

            context
                .auth
                .update_user(
                    args.id,
                    &ProfileUpdate {
                        user_name: args.username,
                        password: args.password,
                    },
                )
                .await
                .map_err(|error| format!("failed to update user: {error}"))?;

            println!("user {} updated", args.id);
            Ok(())
        }
        UsersSubcommand::Delete(args) => {
            context
                .auth
                .delete_user(args.id)
                .await
                .map_err(|error| format!("failed to delete user: {error}"))?;

            println!("user {} deleted", args.id);
            Ok(())
        }
    }
}
