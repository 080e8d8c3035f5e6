use clap::{ArgAction, Parser, Subcommand};
use cinestream_config::PathManager;
use cinestream_models::MediaType;
use cinestream_sources::{ListCategory, TimeWindow};
use commands::{browse, config, list};
use context::AppContext;
use std::path::PathBuf;

mod commands;
mod context;
mod display;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "cinestream")]
#[command(about = "CineStream - browse movies and TV, and keep My List")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Also write logs to a daily-rotated file (defaults to the app log directory)
    #[arg(long, global = true, value_name = "PATH", num_args = 0..=1)]
    log_file: Option<Option<PathBuf>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show My List
    List {
        /// Only show movies or TV series
        #[arg(long = "type", value_name = "TYPE")]
        media_type: Option<MediaType>,
    },
    /// Save a title to My List
    #[command(long_about = "Save a title to My List. Pass <type> <id> (e.g. `movie 550`) or a key like `tv-1399` to look the title up in the catalog, or --json with a catalog record ('-' reads it from stdin).")]
    Add {
        #[arg(value_name = "TITLE", num_args = 1..=2, required_unless_present = "json")]
        target: Vec<String>,

        /// Catalog record as JSON; must carry an id
        #[arg(long, value_name = "RECORD", conflicts_with = "target")]
        json: Option<String>,
    },
    /// Remove a title from My List
    Remove {
        #[arg(value_name = "TITLE", num_args = 1..=2, required = true)]
        target: Vec<String>,
    },
    /// Add a title if it is not saved, remove it otherwise
    Toggle {
        #[arg(value_name = "TITLE", num_args = 1..=2, required = true)]
        target: Vec<String>,
    },
    /// Remove everything from My List
    Clear {
        /// Confirm removal
        #[arg(long, action = ArgAction::SetTrue)]
        yes: bool,
    },
    /// Trending titles
    Trending {
        #[arg(long = "type", value_name = "TYPE", default_value = "movie")]
        media_type: MediaType,

        /// day or week
        #[arg(long, default_value = "week")]
        window: TimeWindow,

        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },
    /// Popular titles
    Popular {
        #[arg(long = "type", value_name = "TYPE", default_value = "movie")]
        media_type: MediaType,

        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },
    /// Top rated titles
    TopRated {
        #[arg(long = "type", value_name = "TYPE", default_value = "movie")]
        media_type: MediaType,

        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },
    /// Movies coming to theaters
    Upcoming {
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },
    /// Movies in theaters now
    NowPlaying {
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },
    /// List catalog genres
    Genres {
        #[arg(long = "type", value_name = "TYPE", default_value = "movie")]
        media_type: MediaType,
    },
    /// Popular titles in one genre
    Discover {
        #[arg(value_name = "TYPE")]
        media_type: MediaType,

        #[arg(value_name = "GENRE_ID")]
        genre: u32,

        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },
    /// Search movies and TV series
    Search {
        query: String,

        /// Only keep movies or TV series
        #[arg(long = "type", value_name = "TYPE")]
        media_type: Option<MediaType>,

        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },
    /// Full details for one title
    Show {
        #[arg(value_name = "TITLE", num_args = 1..=2, required = true)]
        target: Vec<String>,
    },
    /// View or change configuration
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
    /// Save the TMDB API key (prompts when not given)
    SetApiKey {
        api_key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_file = cli
        .log_file
        .map(|path| path.unwrap_or_else(|| PathManager::default().log_file()));
    logging::init_logging(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    let result = run(cli.command, &output).await;
    if let Err(e) = &result {
        tracing::error!("{:#}", e);
    }
    result
}

async fn run(command: Commands, output: &output::Output) -> color_eyre::Result<()> {
    if let Commands::Config { cmd } = command {
        return match cmd.unwrap_or(ConfigCommands::Show { full: false }) {
            ConfigCommands::Show { full } => config::run_show(full, output),
            ConfigCommands::Init { force } => config::run_init(force, output),
            ConfigCommands::SetApiKey { api_key } => config::run_set_api_key(api_key, output),
        };
    }

    let ctx = AppContext::load()?;
    match command {
        Commands::List { media_type } => list::run_list(&ctx, media_type, output),
        Commands::Add { target, json } => list::run_add(&ctx, target, json, output).await,
        Commands::Remove { target } => list::run_remove(&ctx, target, output),
        Commands::Toggle { target } => list::run_toggle(&ctx, target, output).await,
        Commands::Clear { yes } => list::run_clear(&ctx, yes, output),
        Commands::Trending { media_type, window, page } => {
            browse::run_trending(&ctx, media_type, window, page, output).await
        }
        Commands::Popular { media_type, page } => {
            browse::run_category(&ctx, media_type, ListCategory::Popular, page, output).await
        }
        Commands::TopRated { media_type, page } => {
            browse::run_category(&ctx, media_type, ListCategory::TopRated, page, output).await
        }
        Commands::Upcoming { page } => {
            browse::run_category(&ctx, MediaType::Movie, ListCategory::Upcoming, page, output).await
        }
        Commands::NowPlaying { page } => {
            browse::run_category(&ctx, MediaType::Movie, ListCategory::NowPlaying, page, output).await
        }
        Commands::Genres { media_type } => browse::run_genres(&ctx, media_type, output).await,
        Commands::Discover { media_type, genre, page } => {
            browse::run_discover(&ctx, media_type, genre, page, output).await
        }
        Commands::Search { query, media_type, page } => {
            browse::run_search(&ctx, &query, media_type, page, output).await
        }
        Commands::Show { target } => browse::run_show(&ctx, target, output).await,
        Commands::Config { .. } => Ok(()),
    }
}
