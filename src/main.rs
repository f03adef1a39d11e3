use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ssport_analytics::agents::narrative::NarrativeAgent;
use ssport_analytics::api::{build_router, state::AppState};
use ssport_analytics::config::AppConfig;
use ssport_analytics::fetch::SportsClient;
use ssport_analytics::models::{
    FavoriteLeague, FixtureId, LeagueId, PlayerId, SortConfig, SortDirection, StandingSortKey,
    TeamId, TrendStat,
};
use ssport_analytics::parse_interval;
use ssport_analytics::screens::Screens;
use ssport_analytics::selection::{fetch_and_apply, SelectionState};
use ssport_analytics::storage::{FavoritesStore, StorageConfig};

#[derive(Parser)]
#[command(name = "ssport-analytics")]
#[command(about = "Football analytics over a sports-data API with AI match analysis")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
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
    /// Start the HTTP API server
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },

    /// Leagues grouped by country
    Leagues {
        /// Filter by league or country name
        #[arg(long)]
        query: Option<String>,
    },

    /// Upcoming fixtures, recent results and top players of a league
    Dashboard {
        league: u32,

        #[arg(long)]
        season: Option<i32>,
    },

    /// Fixtures of one round
    Matches {
        league: u32,

        #[arg(long)]
        season: Option<i32>,

        /// Round name, e.g. "Regular Season - 3"
        #[arg(long)]
        round: Option<String>,
    },

    /// League table, or every tracked table of a country
    Standings {
        #[arg(long, required_unless_present = "country")]
        league: Option<u32>,

        #[arg(long, conflicts_with = "league")]
        country: Option<String>,

        #[arg(long)]
        season: Option<i32>,

        /// Column to sort by (rank, points, goal_difference, win_percentage, ...)
        #[arg(long, default_value = "rank")]
        sort: StandingSortKey,

        #[arg(long, default_value = "asc")]
        direction: SortDirection,
    },

    /// Statistics, prediction and squads of a fixture
    Fixture { id: u32 },

    /// Live fixtures, or live statistics of one fixture
    Live {
        /// Fixture to follow; lists live fixtures when omitted
        #[arg(long)]
        fixture: Option<u32>,

        /// Restrict the live list to one league
        #[arg(long)]
        league: Option<u32>,

        /// Polling interval (e.g. 30s, 2m)
        #[arg(long, default_value = "30s")]
        interval: String,

        /// Fetch once and exit
        #[arg(long)]
        once: bool,
    },

    /// Head-to-head record of two teams
    H2h { team_a: u32, team_b: u32 },

    /// Player statistics
    Player {
        id: u32,

        #[arg(long)]
        season: Option<i32>,

        /// Prefer entries of this league
        #[arg(long)]
        league: Option<u32>,
    },

    /// Two players side by side
    Compare {
        first: u32,
        second: u32,

        #[arg(long)]
        season: Option<i32>,

        #[arg(long)]
        league: Option<u32>,
    },

    /// One stat of a player across seasons
    Trends {
        id: u32,

        /// goals, assists, minutes or cards
        #[arg(long, default_value = "goals")]
        stat: TrendStat,

        /// Comma-separated seasons; defaults to the last five
        #[arg(long, value_delimiter = ',')]
        seasons: Vec<i32>,
    },

    /// Transfers of a league, falling back to the previous season
    Transfers {
        league: u32,

        #[arg(long)]
        season: Option<i32>,
    },

    /// Season statistics and squad of a team
    TeamStats {
        league: u32,
        team: u32,

        #[arg(long)]
        season: Option<i32>,
    },

    /// Rule-based match preview
    Preview { fixture: u32 },

    /// AI narrative for a fixture or a player
    Analyze {
        #[arg(long, required_unless_present = "player")]
        fixture: Option<u32>,

        #[arg(long, conflicts_with = "fixture")]
        player: Option<u32>,

        #[arg(long)]
        season: Option<i32>,
    },

    /// Walk the country → league → team chain and print the options
    Select {
        #[arg(long)]
        country: Option<String>,

        #[arg(long)]
        league: Option<u32>,

        #[arg(long)]
        team: Option<u32>,

        #[arg(long)]
        season: Option<i32>,
    },

    /// Favorite leagues
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List favorite leagues
    List,

    /// Add a league, or remove it when already a favorite
    Toggle {
        league: u32,

        /// Display name; looked up from the provider when omitted
        #[arg(long)]
        name: Option<String>,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let (plain, json) = if json {
        (None, Some(tracing_subscriber::fmt::layer().json()))
    } else {
        (Some(tracing_subscriber::fmt::layer()), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(json)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    init_tracing(&config.log_level, cli.json_logs);
    tracing::info!("Starting ssport-analytics v{}", env!("CARGO_PKG_VERSION"));

    let client = SportsClient::from_provider(&config.provider)?;
    if !client.has_credential() {
        tracing::warn!(
            "{} is not set; provider requests will fail",
            config.provider.api_key_env
        );
    }
    let narrative = Arc::new(NarrativeAgent::from_config(&config.ai));
    let screens = Screens::new(client, narrative, config.provider.default_season);
    let storage = StorageConfig::new(config.data_dir.clone());

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let favorites = Arc::new(FavoritesStore::open(&storage)?);

            let state = AppState {
                screens,
                favorites,
                config: Arc::new(config),
            };
            let app = build_router(state);

            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("API listening on {}", addr);
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = tokio::signal::ctrl_c().await;
                    tracing::info!("Shutting down");
                })
                .await?;
        }

        Commands::Leagues { query } => {
            print_json(&screens.leagues(query.as_deref()).await)?;
        }

        Commands::Dashboard { league, season } => {
            let today = Utc::now().date_naive();
            print_json(&screens.dashboard(LeagueId::new(league), season, today).await)?;
        }

        Commands::Matches {
            league,
            season,
            round,
        } => {
            print_json(
                &screens
                    .league_matches(LeagueId::new(league), season, round.as_deref())
                    .await,
            )?;
        }

        Commands::Standings {
            league,
            country,
            season,
            sort,
            direction,
        } => {
            let sort = SortConfig {
                key: sort,
                direction,
            };
            match (league, country) {
                (Some(league), _) => {
                    print_json(&screens.standings(LeagueId::new(league), season, sort).await)?
                }
                (None, Some(country)) => {
                    let tables = screens.country_tables(&country, season, sort).await;
                    if tables.is_empty() {
                        bail!("No tracked leagues for {}", country);
                    }
                    print_json(&tables)?
                }
                (None, None) => bail!("Pass --league or --country"),
            }
        }

        Commands::Fixture { id } => {
            print_json(&screens.fixture_details(FixtureId::new(id)).await?)?;
        }

        Commands::Live {
            fixture,
            league,
            interval,
            once,
        } => {
            let interval = parse_interval(&interval)
                .with_context(|| format!("Invalid --interval: {}", interval))?;

            let Some(fixture) = fixture else {
                print_json(&screens.live_fixtures(league.map(LeagueId::new)).await)?;
                return Ok(());
            };

            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let stats = screens.live_stats(FixtureId::new(fixture)).await?;
                print_json(&stats)?;
                if once || !stats.fixture.status.code.is_live() {
                    break;
                }
            }
        }

        Commands::H2h { team_a, team_b } => {
            if team_a == team_b {
                bail!("Head-to-head needs two different teams");
            }
            print_json(
                &screens
                    .head_to_head(TeamId::new(team_a), TeamId::new(team_b))
                    .await,
            )?;
        }

        Commands::Player { id, season, league } => {
            print_json(
                &screens
                    .player_details(PlayerId::new(id), season, league.map(LeagueId::new))
                    .await,
            )?;
        }

        Commands::Compare {
            first,
            second,
            season,
            league,
        } => {
            print_json(
                &screens
                    .compare_players(
                        PlayerId::new(first),
                        PlayerId::new(second),
                        season,
                        league.map(LeagueId::new),
                    )
                    .await,
            )?;
        }

        Commands::Trends { id, stat, seasons } => {
            let seasons = (!seasons.is_empty()).then_some(seasons);
            print_json(
                &screens
                    .player_trends(PlayerId::new(id), stat, seasons)
                    .await,
            )?;
        }

        Commands::Transfers { league, season } => {
            print_json(&screens.transfers(LeagueId::new(league), season).await)?;
        }

        Commands::TeamStats {
            league,
            team,
            season,
        } => {
            print_json(
                &screens
                    .team_analytics(LeagueId::new(league), season, TeamId::new(team))
                    .await,
            )?;
        }

        Commands::Preview { fixture } => {
            print_json(&screens.match_preview(FixtureId::new(fixture)).await?)?;
        }

        Commands::Analyze {
            fixture,
            player,
            season,
        } => {
            let narrative = match (fixture, player) {
                (Some(id), _) => screens.fixture_narrative(FixtureId::new(id)).await?,
                (None, Some(id)) => screens.player_narrative(PlayerId::new(id), season).await?,
                (None, None) => bail!("Pass --fixture or --player"),
            };
            match narrative.text() {
                Some(text) => println!("{}", text),
                None => print_json(&narrative)?,
            }
        }

        Commands::Select {
            country,
            league,
            team,
            season,
        } => {
            let client = screens.client();
            let mut chain = SelectionState::new(season.unwrap_or(screens.default_season()));
            if country.is_none() && league.is_none() {
                let request = chain.load_countries();
                fetch_and_apply(client, &mut chain, request).await?;
            }
            if let Some(request) = chain.set_country(country) {
                fetch_and_apply(client, &mut chain, request).await?;
            }
            if let Some(request) = chain.set_league(league.map(LeagueId::new)) {
                fetch_and_apply(client, &mut chain, request).await?;
            }
            if let Some(request) = chain.set_team(team.map(TeamId::new)) {
                fetch_and_apply(client, &mut chain, request).await?;
            }
            print_json(&chain)?;
        }

        Commands::Favorites { action } => {
            let favorites = FavoritesStore::open(&storage)?;
            match action {
                FavoritesAction::List => print_json(&favorites.list())?,
                FavoritesAction::Toggle { league, name } => {
                    let id = LeagueId::new(league);
                    let entry = match name {
                        Some(name) => FavoriteLeague::new(id, name),
                        None if favorites.contains(id) => FavoriteLeague::new(id, ""),
                        None => match screens.client().league(id).await? {
                            Some(found) => FavoriteLeague::from(&found),
                            None => bail!("League {} not found", league),
                        },
                    };
                    print_json(&favorites.toggle(entry)?)?;
                }
            }
        }
    }

    Ok(())
}
