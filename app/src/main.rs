use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use todo_app::command::{Command, HELP};
use todo_app::config::SETUP_INSTRUCTIONS;
use todo_app::render::render;
use todo_app::{Config, HttpTodoStore, Session};
use todo_core::TodoClient;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Logs go to stderr so they never interleave with the rendered list.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::parse();
    let owner = match config.owner() {
        Ok(owner) => owner,
        Err(_) => {
            println!("{SETUP_INSTRUCTIONS}");
            return Ok(ExitCode::FAILURE);
        }
    };

    info!(api_url = %config.api_url, owner, "starting session");
    let store = HttpTodoStore::new(TodoClient::new(&config.api_url, owner));
    let session = Session::with_error_timeout(store, config.error_timeout());
    let mut updates = session.subscribe();

    // Nothing is accepted until the first load resolves.
    if let Err(err) = session.load().await {
        warn!(error = %err, "initial load failed, starting with an empty list");
    }
    print!("{}", render(&updates.borrow_and_update()));
    println!("type `help` for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match Command::parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(Command::Help) => println!("{HELP}"),
                    Ok(Command::List) => print!("{}", render(&updates.borrow_and_update())),
                    Ok(command) => {
                        let verdict = command.check(&updates.borrow());
                        match verdict {
                            Ok(()) => dispatch(&session, command),
                            Err(refusal) => println!("{refusal}"),
                        }
                    }
                    Err(err) => println!("{err}"),
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                print!("{}", render(&updates.borrow_and_update()));
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Run one command on its own task so several can be in flight at once.
/// Results are reported through the published snapshots.
fn dispatch(session: &Session<HttpTodoStore>, command: Command) {
    let session = session.clone();
    tokio::spawn(async move {
        match command {
            Command::Add(title) => {
                let _ = session.add(&title).await;
            }
            Command::Delete(id) => {
                let _ = session.delete(id).await;
            }
            Command::Toggle(id) => match session.todo(id).await {
                Some(todo) => {
                    let _ = session.toggle(&todo).await;
                }
                None => println!("no todo with id {id}"),
            },
            Command::ToggleAll => {
                session.toggle_all().await;
            }
            Command::Rename(id, title) => {
                let _ = session.rename(id, &title).await;
            }
            Command::ClearCompleted => {
                session.delete_completed().await;
            }
            Command::Filter(filter) => session.set_filter(filter).await,
            Command::Dismiss => session.dismiss_error().await,
            Command::List | Command::Help | Command::Quit => {}
        }
    });
}
