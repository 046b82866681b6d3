use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};

use tft_rivals::achievements::BadgeType;
use tft_rivals::config::Config;
use tft_rivals::rivalry::ParticipantSpec;
use tft_rivals::{AppError, Tracker, logging};

#[derive(Parser)]
#[command(version, about = "Track TFT accounts, badges and rivalries")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Refresh standings, matches and badges of an account.
    Renew { game_name: String, tag_line: String },
    /// Recent matches, synced on first lookup.
    Matches { game_name: String, tag_line: String },
    /// Stored badges of an account, or a single one with `--badge`.
    Badges {
        game_name: String,
        tag_line: String,
        #[arg(long)]
        badge: Option<BadgeType>,
    },
    /// Ranked standings, fetched on first lookup.
    Entries { game_name: String, tag_line: String },
    /// Create a rivalry from `<account_id>:<LEFT|RIGHT>` seats.
    RivalryCreate {
        #[arg(required = true)]
        participants: Vec<ParticipantSpec>,
    },
    /// Both sides of a rivalry with their ranked status.
    Rivalry { id: i64 },
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, client_error = e.is_client_error(), "❌ Command failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<(), AppError> {
    let config = Config::from_env()?;
    let tracker = Tracker::from_config(&config).await?;
    info!("🐙 Tracker ready");

    match command {
        Command::Renew {
            game_name,
            tag_line,
        } => print(&tracker.renew_all(&game_name, &tag_line).await?),
        Command::Matches {
            game_name,
            tag_line,
        } => print(&tracker.find_and_process_matches(&game_name, &tag_line).await?),
        Command::Badges {
            game_name,
            tag_line,
            badge: Some(badge_type),
        } => print(&tracker.badge(&game_name, &tag_line, badge_type).await?),
        Command::Badges {
            game_name,
            tag_line,
            badge: None,
        } => print(&tracker.badges(&game_name, &tag_line).await?),
        Command::Entries {
            game_name,
            tag_line,
        } => print(&tracker.entries(&game_name, &tag_line).await?),
        Command::RivalryCreate { participants } => {
            let rivalry_id = tracker.create_rivalry(&participants).await?;
            print(&serde_json::json!({ "rivalry_id": rivalry_id }))
        }
        Command::Rivalry { id } => print(&tracker.rivalry_detail(id).await?),
    }
}

fn print<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
