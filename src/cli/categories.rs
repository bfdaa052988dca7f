use clap::{Args, Subcommand};

use crate::{api::categories::NewCategory, context::AppContext};

#[derive(Debug, Args)]
pub(crate) struct CategoriesCommand {
    #[command(subcommand)]
    command: CategoriesSubcommand,
}

#[derive(Debug, Subcommand)]
enum CategoriesSubcommand {
    /// List all categories
    List,
    /// Add a category
    Add(NameArg),
    /// Rename a category
    Rename(RenameArgs),
    /// Delete a category
    Delete(IdArg),
}

#[derive(Debug, Args)]
struct NameArg {
    /// Display name
    #[arg(long)]
    name: String,
}

#[derive(Debug, Args)]
struct RenameArgs {
    /// Category id
    #[arg(long)]
    id: i64,

    /// New display name
    #[arg(long)]
    name: String,
}

#[derive(Debug, Args)]
struct IdArg {
    /// Category id
    #[arg(long)]
    id: i64,
}

pub(crate) async fn run(context: &AppContext, command: CategoriesCommand) -> Result<(), String> {
    match command.command {
        CategoriesSubcommand::List => {
            let categories = context
                .categories
                .list_categories()
                .await
                .map_err(|error| format!("failed to list categories: {error}"))?;

            for category in &categories {
                println!("{:>5}  {}", category.id, category.name);
            }

            Ok(())
        }
        CategoriesSubcommand::Add(args) => {
            let created = context
                .categories
                .create_category(&NewCategory { name: args.name })
                .await
                .map_err(|error| format!("failed to add category: {error}"))?;

            println!("category {} added", created.id);
            Ok(())
        }
        CategoriesSubcommand::Rename(args) => {
            context
                .categories
                .update_category(args.id, &NewCategory { name: args.name })
                .await
                .map_err(|error| format!("failed to rename category: {error}"))?;

            println!("category {} renamed", args.id);
            Ok(())
        }
        CategoriesSubcommand::Delete(args) => {
            context
                .categories
                .delete_category(args.id)
                .await
                .map_err(|error| format!("failed to delete category: {error}"))?;

            println!("category {} deleted", args.id);
            Ok(())
        }
    }
}
