use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tasklist::client::ScriptClient;
use tasklist::config::Config;
use tasklist::controller::{AlertLevel, Controller, Effect};
use tasklist::protocol::TaskId;
use tasklist::runtime::drive;

/// Environment variable read instead of prompting for a password.
const PASSWORD_ENV: &str = "TASKLIST_PASSWORD";

#[derive(Parser)]
#[command(name = "tasklist", about = "tasklist CLI")]
struct Cli {
    /// Task endpoint URL (overrides config and TASKLIST_ENDPOINT).
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Config file (default: $XDG_CONFIG_HOME/tasklist/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account.
    Signup {
        /// Username to register.
        username: String,
    },
    /// Show your tasks.
    List {
        #[arg(short, long)]
        username: String,
    },
    /// Add a task.
    Add {
        #[arg(short, long)]
        username: String,
        /// Task text.
        text: String,
    },
    /// Flip a task between complete and not complete.
    Toggle {
        #[arg(short, long)]
        username: String,
        task_id: String,
    },
    /// Delete a task.
    Delete {
        #[arg(short, long)]
        username: String,
        task_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tasklist=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?.with_endpoint_override(cli.endpoint)?;
    let client = ScriptClient::new(&config)?;
    tracing::debug!(endpoint = %client.endpoint(), "using endpoint");
    let mut controller = Controller::new();

    match cli.command {
        Command::Signup { username } => {
            let password = read_password(true)?;
            controller.toggle_auth_mode(true);
            fill_credentials(&mut controller, username, password);
            let effect = controller.submit_signup();
            run(&mut controller, &client, effect).await?;
            if let Some(alert) = controller.alert() {
                println!("{}", alert.message);
            }
        }
        Command::List { username } => {
            login(&mut controller, &client, username).await?;
            print_tasks(&controller);
        }
        Command::Add { username, text } => {
            login(&mut controller, &client, username).await?;
            *controller.draft_mut() = text;
            let effect = controller.submit_new_task();
            if effect.is_none() {
                bail!("task text must not be empty");
            }
            run(&mut controller, &client, effect).await?;
            print_tasks(&controller);
        }
        Command::Toggle { username, task_id } => {
            login(&mut controller, &client, username).await?;
            let effect = controller
                .toggle_task(&TaskId::from(task_id.as_str()))
                .with_context(|| format!("no task with id {task_id}"))?;
            run(&mut controller, &client, Some(effect)).await?;
            print_tasks(&controller);
        }
        Command::Delete { username, task_id } => {
            login(&mut controller, &client, username).await?;
            let effect = controller
                .delete_task(&TaskId::from(task_id.as_str()))
                .with_context(|| format!("no task with id {task_id}"))?;
            run(&mut controller, &client, Some(effect)).await?;
            print_tasks(&controller);
        }
    }

    Ok(())
}

/// Log in and load the task list. There is no stored session, so every
/// command starts here.
async fn login(controller: &mut Controller, client: &ScriptClient, username: String) -> Result<()> {
    let password = read_password(false)?;
    fill_credentials(controller, username, password);
    let effect = controller.submit_login();
    run(controller, client, effect).await?;
    if controller.session().is_none() {
        bail!("login failed");
    }
    Ok(())
}

/// Drive `effect` to completion and turn an error alert into a failure.
async fn run(controller: &mut Controller, client: &ScriptClient, effect: Option<Effect>) -> Result<()> {
    drive(controller, client, effect).await;
    match controller.alert() {
        Some(alert) if alert.level == AlertLevel::Error => bail!("{}", alert.message),
        _ => Ok(()),
    }
}

fn fill_credentials(controller: &mut Controller, username: String, password: String) {
    let form = controller.auth_form_mut();
    form.username = username;
    form.password = password.into();
}

fn read_password(confirm: bool) -> Result<String> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(password);
    }
    let password = rpassword::prompt_password("Password: ").context("failed to read password")?;
    if confirm {
        let again =
            rpassword::prompt_password("Confirm password: ").context("failed to read password")?;
        if password != again {
            bail!("passwords do not match");
        }
    }
    Ok(password)
}

fn print_tasks(controller: &Controller) {
    let tasks = controller.tasks();
    if tasks.is_empty() {
        println!("No tasks.");
        return;
    }
    for item in tasks.items() {
        let mark = if item.completed { "x" } else { " " };
        println!("[{mark}] {:<8} {}", item.task_id, item.text);
    }
}
