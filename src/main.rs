use anyhow::{bail, Context, Result};
use book_finder::catalog::{Catalog, OpenLibraryCatalog};
use book_finder::config::{
    default_config_path, find_config_file, get_config, load_config, save_config, Config,
    ConfigFileError,
};
use book_finder::models::Book;
use book_finder::search::{
    fetch_page, fetch_work, load_detail, BookDetail, FetchOutcome, QueryDebouncer, ScrollTrigger,
    SearchSession, SearchState, Viewport, DETAILS_FAILED_MESSAGE, TRENDING_SEARCHES,
};
use book_finder::ui::{self, Spinner, Status, CARD_HEIGHT};
use book_finder::utils::{terminal_dimensions, CoverResolver, CoverSize, HttpClient};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Book Finder - search the Open Library catalog by title
#[derive(Parser, Debug)]
#[command(name = "book-finder")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search the Open Library catalog by title", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Results per page (overrides the configuration)
    #[arg(long, global = true)]
    page_size: Option<usize>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

impl OutputFormat {
    fn resolve(self) -> Self {
        match self {
            OutputFormat::Auto if std::io::stdout().is_terminal() => OutputFormat::Table,
            OutputFormat::Auto => OutputFormat::Json,
            other => other,
        }
    }
}

/// Cover size variant
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Size {
    /// Card thumbnail
    Medium,
    /// Detail view image
    Large,
}

impl From<Size> for CoverSize {
    fn from(size: Size) -> Self {
        match size {
            Size::Medium => CoverSize::Medium,
            Size::Large => CoverSize::Large,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search books by title
    #[command(alias = "s")]
    Search {
        /// Title to search for
        title: String,

        /// Fetch this single page instead of paging from the first
        #[arg(long, conflicts_with = "pages")]
        page: Option<u32>,

        /// Number of pages to fetch (stops early when the catalog runs out)
        #[arg(long, short, default_value_t = 1)]
        pages: u32,
    },

    /// Show the description of a work
    #[command(alias = "d")]
    Details {
        /// Catalog key, e.g. /works/OL82563W
        key: String,
    },

    /// Print the cover URL for a cover id
    Cover {
        /// Numeric cover id; `-` or nothing for the placeholder
        id: Option<String>,

        /// Cover size
        #[arg(long, short, value_enum, default_value_t = Size::Medium)]
        size: Size,
    },

    /// List suggested searches
    Trending,

    /// Browse results interactively
    #[command(alias = "b")]
    Browse {
        /// Initial title to search for
        title: Option<String>,
    },

    /// Search as you type: read the input box content line by line from stdin
    Live,

    /// Write a default configuration file
    InitConfig {
        /// Destination (defaults to the platform config directory)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from file if specified or found in default locations
    let mut config = if let Some(config_path) = &cli.config {
        load_config(config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?
    } else if let Some(config_path) = find_config_file() {
        load_config(&config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?
    } else {
        get_config()?
    };
    if let Some(page_size) = cli.page_size {
        config.catalog.page_size = page_size;
    }

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("book_finder={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let covers = CoverResolver::new(&config.catalog.covers_url);

    match cli.command {
        Some(Commands::Search {
            title,
            page: Some(page),
            ..
        }) => {
            let catalog = open_catalog(&config)?;
            let format = cli.output.resolve();

            let spinner = spinner(format, cli.quiet, "Searching books...");
            let state = fetch_page(
                catalog.as_ref(),
                &title,
                page,
                config.catalog.page_size(),
            )
            .await;
            spinner.finish();

            if let Some(error) = &state.error {
                bail!("{}", error);
            }
            output_state(&state, format, &covers, cli.quiet)?;
        }

        Some(Commands::Search { title, pages, .. }) => {
            let session = SearchSession::new(open_catalog(&config)?, config.catalog.page_size());
            let format = cli.output.resolve();
            let spinner = spinner(format, cli.quiet, "Searching books...");

            session.start_search(&title).await;
            for _ in 1..pages {
                if !matches!(session.load_more().await, FetchOutcome::Loaded { .. }) {
                    break;
                }
            }
            spinner.finish();

            let state = session.state();
            if let Some(error) = &state.error {
                bail!("{}", error);
            }
            output_state(&state, format, &covers, cli.quiet)?;
        }

        Some(Commands::Details { key }) => {
            let catalog = open_catalog(&config)?;
            let Some(details) = fetch_work(catalog.as_ref(), &key).await else {
                bail!("{}", DETAILS_FAILED_MESSAGE);
            };

            match cli.output.resolve() {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&details)?),
                _ => {
                    let detail = BookDetail::from_work(&key, &details, &covers);
                    ui::print_detail(&detail, terminal_dimensions().0);
                }
            }
        }

        Some(Commands::Cover { id, size }) => {
            let id = match id.as_deref().map(str::trim) {
                None | Some("-") | Some("") => None,
                Some(raw) => Some(
                    raw.parse::<u64>()
                        .with_context(|| format!("Invalid cover id: {}", raw))?,
                ),
            };
            println!("{}", covers.resolve(id, size.into()));
        }

        Some(Commands::Trending) => match cli.output.resolve() {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&TRENDING_SEARCHES)?),
            OutputFormat::Plain => TRENDING_SEARCHES.iter().for_each(|t| println!("{}", t)),
            _ => ui::print_trending(),
        },

        Some(Commands::Browse { title }) => {
            let session = SearchSession::new(open_catalog(&config)?, config.catalog.page_size());
            browse(&session, &config, &covers, title, cli.quiet).await?;
        }

        Some(Commands::Live) => {
            let session = Arc::new(SearchSession::new(
                open_catalog(&config)?,
                config.catalog.page_size(),
            ));
            live(session, &config, &covers, cli.output.resolve(), cli.quiet).await?;
        }

        Some(Commands::InitConfig { path, force }) => {
            let path = path.unwrap_or_else(default_config_path);
            if path.exists() && !force {
                return Err(ConfigFileError::AlreadyExists(path.display().to_string()).into());
            }
            save_config(&Config::default(), &path)?;
            if !cli.quiet {
                ui::print_status(
                    Status::Success,
                    &format!("Wrote configuration to {}", path.display()),
                );
            }
        }

        None => {
            ui::print_banner();
            ui::print_trending();
            println!();
            println!("Run `book-finder browse` to start searching, or `book-finder --help`.");
        }
    }

    Ok(())
}

fn open_catalog(config: &Config) -> Result<Arc<dyn Catalog>> {
    let client = HttpClient::with_timeout(config.catalog.timeout())
        .context("Failed to create HTTP client")?;
    Ok(Arc::new(OpenLibraryCatalog::with_base_url(
        client,
        &config.catalog.base_url,
    )))
}

fn spinner(format: OutputFormat, quiet: bool, msg: &str) -> Spinner {
    Spinner::when(!quiet && format == OutputFormat::Table, msg)
}

fn output_state(
    state: &SearchState,
    format: OutputFormat,
    covers: &CoverResolver,
    quiet: bool,
) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(state)?),
        OutputFormat::Plain => {
            for line in ui::plain_lines(&state.results, covers) {
                println!("{}", line);
            }
        }
        OutputFormat::Table | OutputFormat::Auto => {
            if !quiet {
                if let Some(summary) = ui::state_summary(state) {
                    ui::print_status(Status::Search, &summary);
                }
            }
            if !state.results.is_empty() {
                println!(
                    "{}",
                    ui::results_table(&state.results, 0, terminal_dimensions().0)
                );
            }
        }
    }
    Ok(())
}

/// Browse results with a scrolling list.
///
/// Commands: an empty line scrolls one screen down (loading the next page
/// near the bottom), `more` loads the next page, `open N` shows details,
/// `top` scrolls back up, `trending [N]` lists or runs a suggestion, `quit`
/// exits. Anything else starts a new search.
async fn browse(
    session: &SearchSession<dyn Catalog>,
    config: &Config,
    covers: &CoverResolver,
    initial: Option<String>,
    quiet: bool,
) -> Result<()> {
    let mut trigger = ScrollTrigger::new(config.search.scroll_threshold);
    let mut offset: u32 = 0;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    ui::print_banner();
    match initial {
        Some(title) => {
            run_with_spinner(quiet, "Searching books...", session.start_search(&title)).await;
        }
        None => ui::print_trending(),
    }

    loop {
        let (width, height) = terminal_dimensions();
        let view_height = (height as u32).saturating_sub(4).max(CARD_HEIGHT);
        let state = session.state();
        let rendered = ui::result_lines(&state, width);
        let content_height = rendered.len() as u32;
        offset = offset.min(content_height.saturating_sub(1));

        rendered
            .iter()
            .skip(offset as usize)
            .take(view_height as usize)
            .for_each(|line| println!("{}", line));
        if let Some(summary) = ui::state_summary(&state) {
            let status = if state.error.is_some() {
                Status::Error
            } else {
                Status::Info
            };
            ui::print_status(status, &summary);
        }
        print_prompt(&state);

        let Some(input) = lines.next_line().await? else {
            break;
        };
        let input = input.trim();

        match input {
            "" => {
                if offset + view_height < content_height {
                    offset += view_height;
                }
                let viewport = Viewport::new(view_height, offset, content_height);
                if trigger.should_load_on_scroll(viewport, &state) {
                    run_with_spinner(quiet, "Loading more books...", session.load_more()).await;
                }
            }
            "more" | "m" => {
                if trigger.should_load_on_activate(&state) {
                    run_with_spinner(quiet, "Loading more books...", session.load_more()).await;
                }
            }
            "top" => offset = 0,
            "quit" | "q" | "exit" => break,
            "trending" => ui::print_trending(),
            _ => {
                if let Some(arg) = input
                    .strip_prefix("open ")
                    .or_else(|| input.strip_prefix("o "))
                {
                    open_book(session, &state.results, arg, covers, width, quiet).await;
                    continue;
                }

                let query = match input.strip_prefix("trending ") {
                    Some(n) => match parse_index(n, TRENDING_SEARCHES.len()) {
                        Some(i) => TRENDING_SEARCHES[i].to_string(),
                        None => {
                            ui::print_status(Status::Warning, "No such trending search");
                            continue;
                        }
                    },
                    None => input.to_string(),
                };

                offset = 0;
                trigger.reset();
                run_with_spinner(quiet, "Searching books...", session.start_search(&query)).await;
            }
        }
    }

    Ok(())
}

/// Search as you type.
///
/// Each stdin line is the full current content of the input box. Queries are
/// debounced, and every published snapshot is summarized on stderr.
async fn live(
    session: Arc<SearchSession<dyn Catalog>>,
    config: &Config,
    covers: &CoverResolver,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let mut updates = session.subscribe();
    let reporter = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            if let Some(summary) = ui::state_summary(&snapshot) {
                if !quiet {
                    eprintln!("{}", summary);
                }
            }
        }
    });

    let mut debouncer = QueryDebouncer::new(Arc::clone(&session), config.search.debounce());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        debouncer.input(line);
    }
    debouncer.flush().await;
    reporter.abort();

    let state = session.state();
    if let Some(error) = &state.error {
        bail!("{}", error);
    }
    output_state(&state, format, covers, true)
}

async fn open_book(
    session: &SearchSession<dyn Catalog>,
    results: &[Book],
    arg: &str,
    covers: &CoverResolver,
    width: usize,
    quiet: bool,
) {
    let Some(index) = parse_index(arg, results.len()) else {
        ui::print_status(Status::Warning, "No book with that number");
        return;
    };

    let book = &results[index];
    let spinner = spinner(OutputFormat::Table, quiet, "Loading details...");
    let detail = load_detail(session.catalog().as_ref(), book, covers).await;
    spinner.finish();
    ui::print_detail(&detail, width);
}

async fn run_with_spinner(
    quiet: bool,
    msg: &str,
    fut: impl std::future::Future<Output = FetchOutcome>,
) {
    let spinner = spinner(OutputFormat::Table, quiet, msg);
    fut.await;
    spinner.finish();
}

/// Parse a 1-based index into a 0-based one below `len`.
fn parse_index(arg: &str, len: usize) -> Option<usize> {
    arg.trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=len).contains(n))
        .map(|n| n - 1)
}

fn print_prompt(state: &SearchState) {
    let hint = if state.can_load_more() {
        "[enter] scroll  [more]  [open N]  [q]uit  or type a title"
    } else {
        "[enter] scroll  [open N]  [q]uit  or type a title"
    };
    println!("{}", hint);
}
