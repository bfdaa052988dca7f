use std::{fs, path::PathBuf};

use clap::{Args, Subcommand};

use crate::{api::auth::ProfileUpdate, context::AppContext};

#[derive(Debug, Args)]
pub(crate) struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProfileSubcommand {
    /// Show the signed-in account as the backend sees it
    Show,
    /// Change the signed-in account's name or password
    Update(UpdateArgs),
    /// Upload a profile photo
    Photo(PhotoArgs),
}

#[derive(Debug, Args)]
struct UpdateArgs {
    /// New login name
    #[arg(long)]
    username: Option<String>,

    /// New password
    #[arg(long)]
    password: Option<String>,
}

#[derive(Debug, Args)]
struct PhotoArgs {
    /// Image file to upload
    #[arg(long)]
    file: PathBuf,
}

pub(crate) async fn run(context: &AppContext, command: ProfileCommand) -> Result<(), String> {
    match command.command {
        ProfileSubcommand::Show => {
            let user = context
                .auth
                .me()
                .await
                .map_err(|error| format!("failed to fetch profile: {error}"))?;

            println!("user:  {}", user.user_name);
            println!("id:    {}", user.id);
            println!("role:  {}", user.role);
            println!("email: {}", user.email.as_deref().unwrap_or("-"));

            Ok(())
        }
        ProfileSubcommand::Update(args) => {
            if args.username.is_none() && args.password.is_none() {
                return Err("nothing to update: pass --username or --password".to_string());
            }

            context
                .auth
                .update_profile(&ProfileUpdate {
                    user_name: args.username,
                    password: args.password,
                })
                .await
                .map_err(|error| format!("failed to update profile: {error}"))?;

            println!("profile updated; sign in again if you changed your password");
            Ok(())
        }
        ProfileSubcommand::Photo(args) => {
            let bytes = fs::read(&args.file)
                .map_err(|error| format!("failed to read {}: {error}", args.file.display()))?;

            let file_name = args
                .file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or_else(|| format!("{} has no file name", args.file.display()))?;

            context
                .auth
                .upload_photo(&file_name, bytes)
                .await
                .map_err(|error| format!("failed to upload photo: {error}"))?;

            println!("photo uploaded");
            Ok(())
        }
    }
}
