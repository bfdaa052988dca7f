use clap::Args;

use crate::session::{LoginOutcome, SessionStore};

#[derive(Debug, Args)]
pub(crate) struct LoginArgs {
    /// Login name
    #[arg(long)]
    username: String,

    /// Password
    #[arg(long, env = "PHARMALINK_PASSWORD", hide_env_values = true)]
    password: String,
}

pub(crate) async fn login(store: &mut SessionStore, args: LoginArgs) -> Result<(), String> {
    match store.login(&args.username, &args.password).await {
        LoginOutcome::Success => {
            if let Some(identity) = store.identity() {
                println!("signed in as {} ({})", identity.username, identity.role);
            }

            Ok(())
        }
        LoginOutcome::Failure(message) => Err(message),
    }
}

pub(crate) fn whoami(store: &SessionStore) -> Result<(), String> {
    let identity = store
        .identity()
        .ok_or_else(|| "not signed in".to_string())?;

    println!("user: {}", identity.username);
    println!("id:   {}", identity.id);
    println!("role: {}", identity.role);

    Ok(())
}
