mod auth;

use std::error::Error;
use std::path::Path;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::client::ClientError;
use crate::io::config_io;
use crate::model::{ClientConfig, NewTask, TaskEdit, TaskId, find_task};
use crate::ops::controller::Controller;

type CmdResult = Result<(), Box<dyn Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Run one subcommand. `config_path` is where `config` writes changes.
pub fn dispatch(
    command: Commands,
    json: bool,
    config: &ClientConfig,
    config_path: &Path,
) -> CmdResult {
    match command {
        // Local only
        Commands::Status => cmd_status(config, json),
        Commands::Config(args) => cmd_config(args, config, config_path, json),

        // Session
        Commands::Register(args) => auth::cmd_register(args, config, json),
        Commands::Login(args) => auth::cmd_login(args, config, json),
        Commands::Logout => auth::cmd_logout(config),

        // Tasks
        Commands::List => cmd_list(config, json),
        Commands::Add(args) => cmd_add(args, config, json),
        Commands::Toggle(args) => cmd_toggle(args, config, json),
        Commands::Edit(args) => cmd_edit(args, config, json),
        Commands::Delete(args) => cmd_delete(args, config),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Controller for a command that needs a stored token. Fails before any
/// network call when there is none.
fn signed_in_controller(config: &ClientConfig) -> Result<Controller, ClientError> {
    let controller = Controller::from_config(config)?;
    if !controller.session().is_logged_in() {
        return Err(ClientError::NotLoggedIn);
    }
    Ok(controller)
}

/// Load the list, then confirm `id` is in it
fn loaded_with(config: &ClientConfig, id: TaskId) -> Result<Controller, ClientError> {
    let mut controller = signed_in_controller(config)?;
    controller.load_tasks()?;
    if find_task(&controller.tasks(), id).is_none() {
        return Err(ClientError::NotFoundLocal(id));
    }
    Ok(controller)
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

/// Warn on stderr when the reload after an accepted change failed. The
/// change stands, so the command still succeeds.
fn reloaded(reload: Result<(), ClientError>) -> bool {
    match reload {
        Ok(()) => true,
        Err(e) => {
            eprintln!("warning: reload failed: {}", e);
            false
        }
    }
}

/// Print the task with `id` from the controller's current list
fn print_task(controller: &Controller, id: TaskId, json: bool) -> CmdResult {
    let tasks = controller.tasks();
    match find_task(&tasks, id) {
        Some(task) if json => println!("{}", to_json(task)?),
        Some(task) => print_lines(format_task(task)),
        None => {}
    }
    Ok(())
}

/// Fallback output when the task could not be re-read after a change
fn changed(verb: &str, id: TaskId, json: bool) -> CmdResult {
    if !json {
        println!("{} {}", verb, id);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Local commands
// ---------------------------------------------------------------------------

fn cmd_status(config: &ClientConfig, json: bool) -> CmdResult {
    let controller = Controller::from_config(config)?;
    let logged_in = controller.session().is_logged_in();
    if json {
        let status = StatusJson {
            logged_in,
            base_url: controller.base_url(),
            cookie_file: controller.session().jar_path().display().to_string(),
        };
        println!("{}", to_json(&status)?);
    } else if logged_in {
        println!("logged in to {}", controller.base_url());
    } else {
        println!("not logged in (server {})", controller.base_url());
    }
    Ok(())
}

fn cmd_config(
    args: ConfigArgs,
    config: &ClientConfig,
    config_path: &Path,
    json: bool,
) -> CmdResult {
    if let Some(url) = args.set_api_url {
        config_io::set_base_url(config_path, &url)?;
        println!("api.base_url = {}", url);
        return Ok(());
    }
    if json {
        println!("{}", to_json(config)?);
    } else {
        println!("# {}", config_path.display());
        print!("{}", toml::to_string_pretty(config)?);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Task commands
// ---------------------------------------------------------------------------

fn cmd_list(config: &ClientConfig, json: bool) -> CmdResult {
    let mut controller = signed_in_controller(config)?;
    controller.load_tasks()?;
    let tasks = controller.tasks();
    if json {
        println!("{}", to_json(&*tasks)?);
    } else {
        print_lines(format_task_list(&tasks));
    }
    Ok(())
}

fn cmd_add(args: AddArgs, config: &ClientConfig, json: bool) -> CmdResult {
    let title = args.title.trim().to_string();
    if title.is_empty() {
        return Err("title must not be empty".into());
    }
    let mut controller = signed_in_controller(config)?;
    let task = NewTask {
        title,
        description: args.description.unwrap_or_default().trim().to_string(),
    };
    let applied = controller.create_task(&task)?;
    reloaded(applied.reload);
    let created = applied.value;
    if json {
        println!("{}", to_json(&created)?);
    } else {
        print_lines(format_task(&created));
    }
    Ok(())
}

fn cmd_toggle(args: IdArgs, config: &ClientConfig, json: bool) -> CmdResult {
    let mut controller = loaded_with(config, args.id)?;
    let applied = controller.toggle_task(args.id)?;
    if reloaded(applied.reload) {
        print_task(&controller, args.id, json)
    } else {
        changed("toggled", args.id, json)
    }
}

fn cmd_edit(args: EditArgs, config: &ClientConfig, json: bool) -> CmdResult {
    let mut controller = loaded_with(config, args.id)?;
    let current = controller.begin_edit(args.id)?;
    let mut edit = TaskEdit::from(&current);
    if let Some(title) = &args.title {
        edit.title = title.trim().to_string();
    }
    if let Some(description) = &args.description {
        edit.description = description.trim().to_string();
    }
    if let Some(completed) = args.completed() {
        edit.completed = completed;
    }
    if edit.title.is_empty() {
        return Err("title must not be empty".into());
    }
    let applied = controller.submit_edit(args.id, &edit)?;
    if reloaded(applied.reload) {
        print_task(&controller, args.id, json)
    } else {
        changed("updated", args.id, json)
    }
}

fn cmd_delete(args: IdArgs, config: &ClientConfig) -> CmdResult {
    let mut controller = signed_in_controller(config)?;
    let applied = controller.delete_task(args.id)?;
    reloaded(applied.reload);
    println!("deleted {}", args.id);
    Ok(())
}
