use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::model::TaskId;

#[derive(Parser)]
#[command(name = "jot", about = concat!("jot v", env!("CARGO_PKG_VERSION"), " - a to-do list that lives on your server"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Talk to this server for this run only
    #[arg(long, global = true, env = "JOT_API_URL", value_name = "URL")]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an account and sign in
    Register(AuthArgs),
    /// Sign in
    Login(AuthArgs),
    /// Sign out and forget the stored token
    Logout,
    /// Show whether a token is stored and which server is used
    Status,
    /// List your tasks
    #[command(visible_alias = "ls")]
    List,
    /// Add a task
    Add(AddArgs),
    /// Flip a task between done and not done
    Toggle(IdArgs),
    /// Change a task's title, description or completion
    Edit(EditArgs),
    /// Delete a task
    #[command(visible_alias = "rm")]
    Delete(IdArgs),
    /// Show configuration, or set the server address
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct AuthArgs {
    pub username: String,
    /// Password (otherwise read from JOT_PASSWORD or one line of stdin)
    #[arg(long, env = "JOT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    pub title: String,
    /// Optional longer description
    pub description: Option<String>,
}

#[derive(Args)]
pub struct IdArgs {
    /// Task ID (a leading # is accepted)
    pub id: TaskId,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID (a leading # is accepted)
    pub id: TaskId,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New description
    #[arg(long)]
    pub description: Option<String>,
    /// Mark done
    #[arg(long, conflicts_with = "undone")]
    pub done: bool,
    /// Mark not done
    #[arg(long)]
    pub undone: bool,
}

impl EditArgs {
    /// Requested completion, None when neither flag is given
    pub fn completed(&self) -> Option<bool> {
        match (self.done, self.undone) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Persist a new server address
    #[arg(long = "set-api-url", value_name = "URL")]
    pub set_api_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn ids_accept_hash_prefix() {
        let cli = Cli::try_parse_from(["jot", "toggle", "#12"]).unwrap();
        match cli.command {
            Some(Commands::Toggle(args)) => assert_eq!(args.id, TaskId(12)),
            _ => panic!("expected toggle"),
        }
    }

    #[test]
    fn aliases() {
        assert!(matches!(
            Cli::try_parse_from(["jot", "ls"]).unwrap().command,
            Some(Commands::List)
        ));
        assert!(matches!(
            Cli::try_parse_from(["jot", "rm", "3"]).unwrap().command,
            Some(Commands::Delete(_))
        ));
    }

    #[test]
    fn done_and_undone_conflict() {
        assert!(Cli::try_parse_from(["jot", "edit", "1", "--done", "--undone"]).is_err());
        let cli = Cli::try_parse_from(["jot", "edit", "1", "--undone"]).unwrap();
        match cli.command {
            Some(Commands::Edit(args)) => assert_eq!(args.completed(), Some(false)),
            _ => panic!("expected edit"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["jot", "list", "--json", "--config", "/tmp/x.toml"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/x.toml")));
    }
}
