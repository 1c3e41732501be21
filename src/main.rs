use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use league_tracker::api::{build_router, state::AppState};
use league_tracker::calculate::{group_by_week, search_matches, LeagueSummary};
use league_tracker::config::AppConfig;
use league_tracker::ingest;
use league_tracker::models::MatchSubmission;
use league_tracker::roster;
use league_tracker::storage::{JsonlStore, LeagueStore};

#[derive(Parser)]
#[command(name = "league-tracker")]
#[command(about = "Doubles league tracker: results, standings and player stats")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./league.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides the config file)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the league table
    Standings,

    /// List players with their statistics
    Players,

    /// Show one player's statistics and match history
    Player { name: String },

    /// List matches, newest first, grouped by week
    Matches {
        /// Case-insensitive filter on team names
        #[arg(long)]
        search: Option<String>,
    },

    /// Record a single match
    AddMatch {
        #[arg(long)]
        a1: String,

        #[arg(long)]
        a2: String,

        #[arg(long)]
        b1: String,

        #[arg(long)]
        b2: String,

        #[arg(long)]
        score_a: u32,

        #[arg(long)]
        score_b: u32,

        /// Game number for the day
        #[arg(long, default_value = "1")]
        game: u32,

        /// Match date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },

    /// Upload matches from a bulk text file
    Upload {
        /// File with one match per line
        file: PathBuf,

        /// Parse and show the matches without storing them
        #[arg(long)]
        preview: bool,
    },

    /// Register players from a roster, e.g. "Nick & Tim, Paul & Steve"
    Setup { roster: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = dir;
    }
    if let Some(level) = cli.log_level.clone() {
        config.log_level = level;
    }
    config.validate()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(cli.json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!cli.json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!("Starting league-tracker v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Data directory: {:?}", config.data_dir);

    let store: Arc<dyn LeagueStore> = Arc::new(JsonlStore::new(config.storage()));

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            let addr = config.server.bind_addr();
            let app = build_router(AppState::new(store, config));
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Dashboard: http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Standings => {
            let summary = load_summary(store.as_ref()).await?;
            if summary.standings.is_empty() {
                println!("No matches recorded yet.");
                return Ok(());
            }

            println!(
                "{:>3}  {:<30} {:>3} {:>3} {:>3} {:>5} {:>5} {:>5}",
                "#", "Team", "P", "W", "L", "PF", "PA", "+/-"
            );
            for (i, team) in summary.standings.iter().enumerate() {
                println!(
                    "{:>3}  {:<30} {:>3} {:>3} {:>3} {:>5} {:>5} {:>+5}",
                    i + 1,
                    team.name,
                    team.played,
                    team.wins,
                    team.losses,
                    team.points_for,
                    team.points_against,
                    team.points_difference
                );
            }
        }
        Commands::Players => {
            let summary = load_summary(store.as_ref()).await?;
            let registered = store.list_players().await?;

            println!(
                "{:<20} {:>3} {:>3} {:>3} {:>5} {:>5} {:>5}",
                "Player", "P", "W", "L", "Win%", "PF", "PA"
            );
            for player in &registered {
                match summary.player_stats.get(&player.name) {
                    Some(s) => println!(
                        "{:<20} {:>3} {:>3} {:>3} {:>4}% {:>5} {:>5}",
                        s.name, s.played, s.wins, s.losses, s.win_rate, s.points_for,
                        s.points_against
                    ),
                    None => println!("{:<20} (no matches)", player.name),
                }
            }
        }
        Commands::Player { name } => {
            let summary = load_summary(store.as_ref()).await?;
            let Some((stats, history)) = summary.player_profile(&name) else {
                bail!("No matches found for player '{}'", name);
            };

            println!("=== {} ===", stats.name);
            println!("Played:   {}", stats.played);
            println!("Record:   {}W - {}L ({}%)", stats.wins, stats.losses, stats.win_rate);
            println!("Points:   {} for, {} against", stats.points_for, stats.points_against);
            println!();
            for m in &history {
                print_match(m);
            }
        }
        Commands::Matches { search } => {
            let summary = load_summary(store.as_ref()).await?;
            let matches = match search.as_deref() {
                Some(term) => search_matches(&summary.matches, term),
                None => summary.matches,
            };

            if matches.is_empty() {
                println!("No matches found.");
            }
            for week in group_by_week(&matches) {
                println!("\n{}", week.label);
                for m in &week.matches {
                    print_match(m);
                }
            }
        }
        Commands::AddMatch {
            a1,
            a2,
            b1,
            b2,
            score_a,
            score_b,
            game,
            date,
        } => {
            let match_date = match date {
                Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                    .with_context(|| format!("Invalid --date (expected YYYY-MM-DD): {}", raw))?,
                None => chrono::Utc::now().date_naive(),
            };

            let submission = MatchSubmission {
                team_a_player1: a1,
                team_a_player2: a2,
                team_b_player1: b1,
                team_b_player2: b2,
                team_a_score: score_a,
                team_b_score: score_b,
                game_number: game,
                match_date,
            };

            ingest::add_match(store.as_ref(), &submission).await?;
            println!(
                "Recorded {} {} - {} {}",
                submission.team_a(),
                score_a,
                score_b,
                submission.team_b()
            );
        }
        Commands::Upload { file, preview } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {:?}", file))?;

            if preview {
                let preview = ingest::preview_bulk(&text)?;
                println!("Preview: {}", preview.summary());
                for row in &preview.rows {
                    println!(
                        "  {}  #{}  {} vs {}  {}",
                        row.match_date, row.game_number, row.team_a, row.team_b, row.score
                    );
                }
                println!("\n(preview - no data written to disk)");
                return Ok(());
            }

            let matches = ingest::parse_bulk_text(&text)?;
            match ingest::commit_batch(store.as_ref(), &matches).await {
                Ok(stored) => println!("Uploaded {} matches", stored.len()),
                Err(e) => {
                    tracing::error!("{}", e);
                    bail!(
                        "Upload stopped: {} of {} matches were stored",
                        e.committed,
                        matches.len()
                    );
                }
            }
        }
        Commands::Setup { roster } => {
            let players = roster::setup_league(store.as_ref(), &roster).await?;
            println!("League ready with {} players:", players.len());
            for player in &players {
                println!("  - {}", player.name);
            }
        }
    }

    Ok(())
}

async fn load_summary(store: &dyn LeagueStore) -> Result<LeagueSummary> {
    let records = store.list_matches_with_player_names().await?;
    Ok(LeagueSummary::from_matches(&records))
}

fn print_match(m: &league_tracker::models::MatchRecord) {
    println!(
        "  {}  #{:<2} {:<25} {:>2} - {:<2} {}",
        m.date, m.game_number, m.team_a, m.score_a, m.score_b, m.team_b
    );
}
