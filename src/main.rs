use std::path::{Path, PathBuf};

use anyhow::{bail, ensure, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use matchday::api::build_router;
use matchday::api::state::AppState;
use matchday::calculate::vsport::{calculate_betting_value, find_vsport_betting_patterns};
use matchday::calculate::{
    build_match_prediction, calculate_league_statistics, calculate_standings, calculate_value_bets,
    get_head_to_head_stats, predict_match_outcome, run_prediction,
};
use matchday::config::AppConfig;
use matchday::i18n::{Language, Translator};
use matchday::ingest::{load_matches_file, IngestOptions};
use matchday::models::{team_key, MarketOdds, Match};
use matchday::session::Session;
use matchday::ticker::Ticker;

#[derive(Parser)]
#[command(name = "matchday")]
#[command(about = "Football match analytics: standings, predictions and value bets")]
#[command(version)]
struct Cli {
    /// Path to configuration file (optional)
    #[arg(long, default_value = "./matchday.toml")]
    config: PathBuf,

    /// Match CSV file, overrides `data_file` from the config
    #[arg(long)]
    data: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Label language (en, hu)
    #[arg(long)]
    lang: Option<Language>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the league table
    Standings,

    /// Print league-wide statistics
    Overview,

    /// Predict a fixture
    Predict {
        home: String,
        away: String,

        #[arg(long, value_enum, default_value = "full")]
        mode: PredictMode,
    },

    /// Summarise previous meetings of two teams
    HeadToHead { home: String, away: String },

    /// Betting patterns for a fixture
    ValueBets { home: String, away: String },

    /// Compare bookmaker odds with the model for a fixture
    VsportValue {
        home: String,
        away: String,

        #[arg(long)]
        home_odds: f64,

        #[arg(long)]
        draw_odds: f64,

        #[arg(long)]
        away_odds: f64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PredictMode {
    /// Scoreline from scoring averages
    Quick,
    /// Sub-model bundle
    Advanced,
    /// Prediction with patterns, HT/FT analysis and head-to-head
    Full,
}

fn load_config(path: &Path) -> Result<(AppConfig, bool)> {
    if !path.exists() {
        return Ok((AppConfig::default(), false));
    }
    let config = AppConfig::from_file(path).with_context(|| format!("loading config {}", path.display()))?;
    Ok((config, true))
}

fn load_matches(config: &AppConfig) -> Result<Vec<Match>> {
    let Some(path) = &config.data_file else {
        return Ok(Vec::new());
    };
    let matches = load_matches_file(path, &IngestOptions::default())
        .with_context(|| format!("loading matches from {}", path.display()))?;
    Ok(matches)
}

fn require_matches(config: &AppConfig) -> Result<Vec<Match>> {
    if config.data_file.is_none() {
        bail!("no match data: pass --data or set data_file in the config");
    }
    load_matches(config)
}

fn check_pair(home: &str, away: &str) -> Result<()> {
    ensure!(
        team_key(home) != team_key(away),
        "home and away teams must differ"
    );
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, from_file) = load_config(&cli.config)?;
    if let Some(data) = cli.data {
        config.data_file = Some(data);
    }
    if let Some(lang) = cli.lang {
        config.language = lang;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting matchday v{}", env!("CARGO_PKG_VERSION"));
    if from_file {
        tracing::info!("Loaded configuration from {}", cli.config.display());
    } else {
        tracing::debug!("No config at {}, using defaults", cli.config.display());
    }

    let translator = Translator::new(config.language);

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            let matches = load_matches(&config)?;
            if matches.is_empty() {
                tracing::warn!("Starting with no match data; upload a CSV to /api/matches");
            } else {
                tracing::info!("Loaded {} matches", matches.len());
            }

            let ticker = if config.ticker.enabled {
                Ticker::new(config.ticker.seed, Utc::now())
            } else {
                Ticker::with_matches(config.ticker.seed, Vec::new())
            };

            let state = AppState::new(Session::new(matches, ticker), config.language);
            let app = build_router(state, &config.server);
            let addr = config.server.bind_addr();
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("API: http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Standings => {
            let matches = require_matches(&config)?;
            print_json(&calculate_standings(&matches))?;
        }
        Commands::Overview => {
            let matches = require_matches(&config)?;
            print_json(&calculate_league_statistics(&matches))?;
        }
        Commands::Predict { home, away, mode } => {
            check_pair(&home, &away)?;
            let matches = require_matches(&config)?;
            match mode {
                PredictMode::Quick => print_json(&predict_match_outcome(&home, &away, &matches))?,
                PredictMode::Advanced => print_json(&run_prediction(&home, &away, &matches))?,
                PredictMode::Full => print_json(&build_match_prediction(
                    &home,
                    &away,
                    &matches,
                    &translator,
                    Utc::now().naive_utc(),
                ))?,
            }
        }
        Commands::HeadToHead { home, away } => {
            check_pair(&home, &away)?;
            let matches = require_matches(&config)?;
            print_json(&get_head_to_head_stats(&home, &away, &matches))?;
        }
        Commands::ValueBets { home, away } => {
            check_pair(&home, &away)?;
            let matches = require_matches(&config)?;
            print_json(&calculate_value_bets(&home, &away, &matches))?;
        }
        Commands::VsportValue {
            home,
            away,
            home_odds,
            draw_odds,
            away_odds,
        } => {
            check_pair(&home, &away)?;
            let odds = MarketOdds::new(home_odds, draw_odds, away_odds)?;
            let matches = require_matches(&config)?;
            print_json(&serde_json::json!({
                "value": calculate_betting_value(&odds, &home, &away, &matches),
                "patterns": find_vsport_betting_patterns(&odds, &home, &away, &matches),
            }))?;
        }
    }

    Ok(())
}
