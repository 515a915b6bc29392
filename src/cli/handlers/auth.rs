use std::io::{self, BufRead, IsTerminal, Write};

use crate::cli::commands::AuthArgs;
use crate::cli::output::to_json;
use crate::model::{ClientConfig, Credentials};
use crate::ops::controller::Controller;

use super::{CmdResult, print_lines, reloaded, signed_in_controller};

/// Password from the flag or env var, else one line of stdin
fn read_password(args: &AuthArgs) -> io::Result<String> {
    if let Some(password) = &args.password {
        return Ok(password.clone());
    }
    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprint!("Password: ");
        io::stderr().flush()?;
    }
    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn credentials(args: &AuthArgs) -> Result<Credentials, Box<dyn std::error::Error>> {
    let username = args.username.trim();
    if username.is_empty() {
        return Err("username must not be empty".into());
    }
    let password = read_password(args)?;
    if password.is_empty() {
        return Err("password must not be empty".into());
    }
    Ok(Credentials::new(username, password))
}

pub(super) fn cmd_register(args: AuthArgs, config: &ClientConfig, json: bool) -> CmdResult {
    let credentials = credentials(&args)?;
    let mut controller = Controller::from_config(config)?;
    let applied = controller.register(&credentials)?;
    let loaded = reloaded(applied.reload);
    signed_in(&controller, &credentials, "registered", loaded, json)
}

pub(super) fn cmd_login(args: AuthArgs, config: &ClientConfig, json: bool) -> CmdResult {
    let credentials = credentials(&args)?;
    let mut controller = Controller::from_config(config)?;
    let applied = controller.login(&credentials)?;
    let loaded = reloaded(applied.reload);
    signed_in(&controller, &credentials, "logged in", loaded, json)
}

fn signed_in(
    controller: &Controller,
    credentials: &Credentials,
    verb: &str,
    loaded: bool,
    json: bool,
) -> CmdResult {
    let tasks = controller.tasks();
    if json {
        println!("{}", to_json(&*tasks)?);
    } else if !loaded {
        println!("{} as {}", verb, credentials.username);
    } else {
        let noun = if tasks.len() == 1 { "task" } else { "tasks" };
        print_lines(vec![format!(
            "{} as {} ({} {})",
            verb,
            credentials.username,
            tasks.len(),
            noun
        )]);
    }
    Ok(())
}

pub(super) fn cmd_logout(config: &ClientConfig) -> CmdResult {
    let mut controller = signed_in_controller(config)?;
    let result = controller.logout();
    println!("logged out");
    result?;
    Ok(())
}
