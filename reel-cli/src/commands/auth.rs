//! Login, register, logout and whoami commands

use std::time::Duration;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use dialoguer::{Input, Password};
use indicatif::{ProgressBar, ProgressStyle};

use super::{get_context, get_logger, log_event, open_context};
use crate::output;
use reel_core::services::LogEvent;
use reel_core::{Identity, OperationResult, Session};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Use the flag value, or prompt for it on an interactive terminal
fn resolve(value: Option<String>, prompt: &str, secret: bool) -> Result<String> {
    if let Some(v) = value {
        return Ok(v);
    }
    if atty::isnt(atty::Stream::Stdin) {
        bail!("Missing --{} (no terminal to prompt on)", prompt.to_lowercase());
    }
    let answer = if secret {
        Password::new().with_prompt(prompt).interact()?
    } else {
        Input::<String>::new().with_prompt(prompt).interact_text()?
    };
    Ok(answer)
}

/// Run `f` behind a spinner unless printing JSON
fn with_spinner<T>(message: &'static str, json: bool, f: impl FnOnce() -> T) -> T {
    if json || atty::isnt(atty::Stream::Stderr) {
        return f();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    let result = f();
    spinner.finish_and_clear();
    result
}

pub fn run_login(email: Option<String>, password: Option<String>, json: bool) -> Result<()> {
    let email = resolve(email, "Email", false)?;
    let password = resolve(password, "Password", true)?;

    let mut watched = open_context()?;
    watched.session_update();
    with_spinner("Signing in...", json, || watched.ctx.session.login(&email, &password))?;

    // A rejected login leaves the session unchanged, so nothing is published
    let signed_in = signed_in_identity(watched.session_update());
    let event = if signed_in.is_ok() { "login_succeeded" } else { "login_rejected" };
    log_event(&get_logger(), LogEvent::new(event));

    if json {
        let envelope = match &signed_in {
            Ok(identity) => OperationResult::ok(Some(identity)),
            Err(e) => OperationResult::fail(e.to_string()),
        };
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    }

    let identity = signed_in?;
    if !json {
        output::success(&format!("Logged in as {}", identity.name));
    }
    Ok(())
}

/// The identity a session update carries, or the rejection error
fn signed_in_identity(update: Option<Session>) -> Result<Identity> {
    update
        .and_then(|session| session.current)
        .context(INVALID_CREDENTIALS)
}

pub fn run_register(
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    json: bool,
) -> Result<()> {
    let name = resolve(name, "Name", false)?;
    let email = resolve(email, "Email", false)?;
    let password = resolve(password, "Password", true)?;

    let mut watched = open_context()?;
    watched.session_update();
    with_spinner("Creating account...", json, || {
        watched.ctx.session.register(&name, &email, &password)
    })?;

    let identity = signed_in_identity(watched.session_update())?;
    log_event(&get_logger(), LogEvent::new("registered"));

    if json {
        let envelope = OperationResult::ok(Some(&identity));
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        return Ok(());
    }

    output::success(&format!("Welcome, {}! You are now logged in.", identity.name));
    Ok(())
}

pub fn run_logout() -> Result<()> {
    let mut watched = open_context()?;
    watched.session_update();

    watched.ctx.session.logout()?;
    match watched.session_update() {
        Some(_) => {
            log_event(&get_logger(), LogEvent::new("logged_out"));
            output::success("Logged out.");
        }
        None => output::info("Not logged in."),
    }
    Ok(())
}

pub fn run_whoami(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let session = ctx.session.snapshot();

    if json {
        println!("{}", serde_json::to_string_pretty(&OperationResult::ok(&session))?);
        return Ok(());
    }

    match &session.current {
        Some(identity) => {
            println!("{} {}", "Logged in as".green(), identity.name.bold());
            println!("  Email: {}", identity.email);
            println!("  ID: {}", identity.id.dimmed());
        }
        None => println!("Not logged in. Run 'reel login' to sign in."),
    }
    Ok(())
}
