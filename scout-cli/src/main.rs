// ABOUTME: Interactive research assistant - reads queries and prints tool-assisted answers.
// ABOUTME: Wires configuration, logging, and the scout agent into a line-editing REPL.

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use scout::prelude::*;

const SEPARATOR: &str = "--------------------------------------------------";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();
    init_tracing();

    let agent = match Config::from_env()
        .map_err(ScoutError::from)
        .and_then(|config| Agent::from_config(&config))
    {
        Ok(agent) => agent,
        Err(e) => {
            println!("Failed to initialize agent: {}", e);
            return Ok(());
        }
    };

    info!(
        model = %agent.settings().model,
        tools = ?agent.tools().names(),
        "agent ready"
    );

    run_loop(&agent).await
}

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    });
}

fn print_banner(agent: &Agent) {
    println!("Scout - research assistant");
    println!("Tools: {}", agent.tools().names().join(", "));
    println!("Ask anything. Current events go to web search, scientific topics to arXiv.");
    println!("Type 'exit', 'quit' or 'q' to leave.");
}

fn is_exit(line: &str) -> bool {
    matches!(line.to_lowercase().as_str(), "exit" | "quit" | "q")
}

async fn run_loop(agent: &Agent) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    print_banner(agent);

    loop {
        let line = match rl.readline("\nYour query: ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("\nExiting agent.");
                break;
            }
            Err(e) => {
                warn!(error = %e, "readline failed");
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if is_exit(line) {
            println!("Exiting agent.");
            break;
        }

        let _ = rl.add_history_entry(line);

        match agent.run(line).await {
            Ok(answer) => {
                println!("\n{}", SEPARATOR);
                println!("{}", answer);
                println!("{}", SEPARATOR);
            }
            Err(e) => {
                println!("Error: {}", e);
                println!("Please try again.");
            }
        }
    }

    Ok(())
}
