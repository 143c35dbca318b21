use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use finals_stats::api::state::AppState;
use finals_stats::calculate::{
    accumulate_solved, build_overlap_graph, build_place_table, clamp_min_participations,
    count_country_finalists, count_country_participations, count_team_overlaps,
    count_university_participations, medal_table, participation_ranking,
    per_edition_solve_stats, per_entity_place_and_solved_series, quartile_boundaries,
    quartile_solved_values, rank_team_repeats, university_rosters, EntityKind, Scope, YearRange,
};
use finals_stats::config::AppConfig;
use finals_stats::models::{Dataset, RepeatMetric, GRAPH_FIRST_YEAR, GRAPH_LAST_YEAR};
use finals_stats::storage::DatasetReader;

#[derive(Parser)]
#[command(name = "finals-stats")]
#[command(about = "Rankings and statistics for programming contest finals")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Dataset file (overrides the configuration)
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Print results as JSON instead of tables
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Period and region selection shared by the query commands.
#[derive(Args, Debug, Clone)]
struct FilterArgs {
    /// First year (defaults to the earliest selectable year)
    #[arg(long)]
    first: Option<u16>,

    /// Last year (defaults to the latest edition)
    #[arg(long)]
    last: Option<u16>,

    /// Region display names, comma-separated ("Todas" for all)
    #[arg(long, value_delimiter = ',')]
    regions: Option<Vec<String>>,

    /// Minimum participations
    #[arg(long)]
    min: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address (overrides the configuration)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides the configuration)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Editions attended per country
    Countries {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Editions attended per university
    Universities {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Distinct finalist universities per country
    Finalists {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Universities ranked by returning contestants
    Repeats {
        #[command(flatten)]
        filter: FilterArgs,

        /// teams, teams_percent, players or players_percent
        #[arg(long, default_value = "teams")]
        metric: RepeatMetric,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Place-frequency table (places 1 to 12)
    Places {
        #[command(flatten)]
        filter: FilterArgs,

        /// university or country
        #[arg(long, default_value = "university")]
        kind: EntityKind,

        /// Only these entities, comma-separated
        #[arg(long, value_delimiter = ',')]
        entities: Vec<String>,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Gold/silver/bronze table
    Medals {
        #[command(flatten)]
        filter: FilterArgs,

        #[arg(long, default_value = "university")]
        kind: EntityKind,

        #[arg(long, value_delimiter = ',')]
        entities: Vec<String>,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Solved-count statistics per edition
    Solved {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Standings bands per edition and the solved count at each band start
    Quartiles {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Place and solved series for selected entities
    Series {
        #[command(flatten)]
        filter: FilterArgs,

        #[arg(long, default_value = "university")]
        kind: EntityKind,

        /// Entities to chart, comma-separated
        #[arg(long, value_delimiter = ',', required = true)]
        entities: Vec<String>,
    },

    /// Accumulated solved problems per university
    Accumulated {
        #[command(flatten)]
        filter: FilterArgs,

        /// Rank by share of available problems instead of total
        #[arg(long)]
        by_percent: bool,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Roster overlap graph for one university
    Graph {
        university: String,

        /// Emit Graphviz DOT
        #[arg(long)]
        dot: bool,
    },
}

fn init_tracing(level: &str, json_logs: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if json_logs {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn scope<'a>(dataset: &'a Dataset, config: &AppConfig, filter: &FilterArgs) -> Scope<'a> {
    let bounds = dataset
        .year_bounds(config.defaults.minimal_year)
        .unwrap_or((0, 0));
    let range = YearRange::clamped(filter.first, filter.last, bounds);
    Scope::new(dataset, range, filter.regions.as_deref())
}

fn min_participations(config: &AppConfig, filter: &FilterArgs, scope: &Scope) -> u32 {
    let requested = filter.min.unwrap_or(config.defaults.min_participations);
    clamp_min_participations(requested, scope.editions.len())
}

/// Print `value` as JSON, or run `table` to print it for humans.
fn emit<T: Serialize>(json: bool, value: &T, table: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        table(value);
    }
    Ok(())
}

fn opt(value: Option<u32>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(Some(cli.config.as_path()))
        .with_context(|| format!("loading configuration from {:?}", cli.config))?;
    if let Some(data_file) = cli.data_file.clone() {
        config.data_file = data_file;
    }
    if let Some(level) = cli.log_level.clone() {
        config.log_level = level;
    }

    init_tracing(&config.log_level, cli.json_logs);
    tracing::info!("Starting finals-stats v{}", env!("CARGO_PKG_VERSION"));

    let dataset = DatasetReader::new(config.data_file.clone())
        .read()
        .with_context(|| format!("reading dataset {:?}", config.data_file))?;

    match cli.command {
        Commands::Serve { host, port } => {
            let mut server = config.server.clone();
            if let Some(host) = host {
                server.host = host;
            }
            if let Some(port) = port {
                server.port = port;
            }

            let state = AppState::new(Arc::new(dataset), Arc::new(config.defaults.clone()))
                .with_cors_origin(server.cors_origin.clone());
            let app = finals_stats::api::build_router(state);
            let addr = server.bind_address();
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("API listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Countries { filter } => {
            let scope = scope(&dataset, &config, &filter);
            let min = min_participations(&config, &filter, &scope);
            let counts = count_country_participations(&scope.editions, &scope.regions);
            let rows = participation_ranking(counts.iter().map(|(c, n)| (c.as_str(), *n)), min);
            emit(cli.json, &rows, |rows| {
                println!("{:<8} {:>6}", "Country", "Count");
                for row in rows {
                    println!("{:<8} {:>6}", row.name, row.count);
                }
            })?;
        }
        Commands::Universities { filter } => {
            let scope = scope(&dataset, &config, &filter);
            let min = min_participations(&config, &filter, &scope);
            let counts = count_university_participations(&scope.editions, &scope.regions);
            let rows =
                participation_ranking(counts.iter().map(|(u, p)| (u.as_str(), p.count)), min);
            emit(cli.json, &rows, |rows| {
                println!("{:<48} {:<8} {:>6}", "University", "Country", "Count");
                for row in rows {
                    let country = counts.get(&row.name).map_or("", |p| p.country.as_str());
                    println!("{:<48} {:<8} {:>6}", row.name, country, row.count);
                }
            })?;
        }
        Commands::Finalists { filter } => {
            let scope = scope(&dataset, &config, &filter);
            let min = filter.min.unwrap_or(config.defaults.min_finalists);
            let rows = count_country_finalists(&scope.editions, &scope.regions, min);
            emit(cli.json, &rows, |rows| {
                println!("{:<8} {:>12}", "Country", "Universities");
                for row in rows {
                    println!("{:<8} {:>12}", row.country, row.universities);
                }
            })?;
        }
        Commands::Repeats {
            filter,
            metric,
            limit,
        } => {
            let scope = scope(&dataset, &config, &filter);
            let overlaps = count_team_overlaps(&scope.editions, &scope.regions);
            let limit = limit.unwrap_or(config.defaults.display_limit);
            let rows = rank_team_repeats(&overlaps, metric, Some(limit));
            emit(cli.json, &rows, |rows| {
                for row in rows {
                    println!("{:<48} {:>8.2}", row.university, row.value);
                }
            })?;
        }
        Commands::Places {
            filter,
            kind,
            entities,
            limit,
        } => {
            let scope = scope(&dataset, &config, &filter);
            let min = min_participations(&config, &filter, &scope);
            let mut table = build_place_table(&scope.editions, kind, &scope.regions, min);
            if !entities.is_empty() {
                table = table.select(&entities);
            }
            if let Some(limit) = limit {
                table.rows.truncate(limit);
            }
            emit(cli.json, &table, |table| {
                let header: Vec<String> = (1..=12).map(|p| format!("{:>3}", p)).collect();
                println!(
                    "{:<40} {} {:>5} {:>5}",
                    kind.to_string(),
                    header.join(""),
                    "Tot",
                    "Part"
                );
                for row in &table.rows {
                    let cells: Vec<String> =
                        row.places.as_slice().iter().map(|c| format!("{:>3}", c)).collect();
                    println!(
                        "{:<40} {} {:>5} {:>5}",
                        row.entity,
                        cells.join(""),
                        row.total,
                        row.participations
                    );
                }
            })?;
        }
        Commands::Medals {
            filter,
            kind,
            entities,
            limit,
        } => {
            let scope = scope(&dataset, &config, &filter);
            let min = min_participations(&config, &filter, &scope);
            let mut table = build_place_table(&scope.editions, kind, &scope.regions, min);
            if !entities.is_empty() {
                table = table.select(&entities);
            }
            let mut rows = medal_table(&table);
            if let Some(limit) = limit {
                rows.truncate(limit);
            }
            emit(cli.json, &rows, |rows| {
                println!(
                    "{:<40} {:>5} {:>6} {:>6} {:>5} {:>5}",
                    kind.to_string(),
                    "Gold",
                    "Silver",
                    "Bronze",
                    "Tot",
                    "Part"
                );
                for row in rows {
                    println!(
                        "{:<40} {:>5} {:>6} {:>6} {:>5} {:>5}",
                        row.entity, row.gold, row.silver, row.bronze, row.total, row.participations
                    );
                }
            })?;
        }
        Commands::Solved { filter } => {
            let scope = scope(&dataset, &config, &filter);
            let rows = per_edition_solve_stats(&scope.editions, &scope.regions);
            emit(cli.json, &rows, |rows| {
                println!(
                    "{:<6} {:>4} {:>4} {:>5} {:>7} {:>7}",
                    "Year", "Min", "Max", "Mode", "Mean", "Median"
                );
                for s in rows {
                    println!(
                        "{:<6} {:>4} {:>4} {:>5} {:>7.2} {:>7}",
                        s.year, s.min, s.max, s.mode, s.mean, s.median
                    );
                }
            })?;
        }
        Commands::Quartiles { filter } => {
            let scope = scope(&dataset, &config, &filter);
            let bands = quartile_boundaries(&scope.editions, &scope.regions);
            let solved = quartile_solved_values(&scope.editions, &scope.regions);
            let value = serde_json::json!({ "boundaries": bands, "solved": solved });
            emit(cli.json, &value, |_| {
                println!("{:<6} {:>4} {:>4} {:>4} {:>4}", "Year", "Q1", "Q2", "Q3", "Q4");
                for b in &bands {
                    println!(
                        "{:<6} {:>4} {:>4} {:>4} {:>4}",
                        b.year, b.q1_rank, b.q2_rank, b.q3_rank, b.q4_rank
                    );
                }
                println!();
                println!("Solved at band start");
                for s in &solved {
                    println!("{:<6} {:>4} {:>4} {:>4} {:>4}", s.year, s.q1, s.q2, s.q3, s.q4);
                }
            })?;
        }
        Commands::Series {
            filter,
            kind,
            entities,
        } => {
            let scope = scope(&dataset, &config, &filter);
            let series =
                per_entity_place_and_solved_series(&scope.editions, &entities, kind, &scope.regions);
            let years = scope.years();
            let value = serde_json::json!({ "years": years, "series": series });
            emit(cli.json, &value, |_| {
                for (entity, s) in &series {
                    println!("{}", entity);
                    for (i, year) in years.iter().enumerate() {
                        println!(
                            "  {}  place {:>4}  solved {:>3}",
                            year,
                            opt(s.place[i]),
                            opt(s.solved[i])
                        );
                    }
                }
            })?;
        }
        Commands::Accumulated {
            filter,
            by_percent,
            limit,
        } => {
            let scope = scope(&dataset, &config, &filter);
            let ranking = accumulate_solved(&scope.editions, &scope.regions);
            let limit = Some(limit.unwrap_or(config.defaults.display_limit));
            let rows = if by_percent {
                ranking.by_percent(limit)
            } else {
                ranking.by_solved(limit)
            };
            emit(cli.json, &rows, |rows| {
                println!("{:<48} {:>6} {:>9} {:>7}", "University", "Solved", "Available", "%");
                for row in rows {
                    println!(
                        "{:<48} {:>6} {:>9} {:>7.2}",
                        row.university, row.solved, row.available, row.percent
                    );
                }
            })?;
        }
        Commands::Graph { university, dot } => {
            let editions = dataset.filter_by_period(GRAPH_FIRST_YEAR, GRAPH_LAST_YEAR);
            let rosters = university_rosters(&editions, &university);
            if rosters.is_empty() {
                tracing::warn!(
                    "{} has no teams between {} and {}",
                    university,
                    GRAPH_FIRST_YEAR,
                    GRAPH_LAST_YEAR
                );
            }
            let graph = build_overlap_graph(&university, &rosters);
            if dot {
                print!("{}", graph.to_dot()?);
            } else {
                emit(cli.json, &graph, |graph| {
                    let years: Vec<String> =
                        graph.participated_years().map(|y| y.to_string()).collect();
                    println!("{}: {}", graph.university, years.join(", "));
                    for edge in &graph.edges {
                        println!("  {} -> {}: {} shared", edge.from, edge.to, edge.shared);
                    }
                })?;
            }
        }
    }

    Ok(())
}
