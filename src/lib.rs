pub mod config;
pub mod logging;
pub mod model;
pub mod output;
pub mod search;
pub mod session;
pub mod ui;

use anyhow::{Context, Result, anyhow, bail};
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

use config::{CliOverrides, ClientConfig};
use model::types::SearchMethod;
use search::client::{HttpSearchClient, SEARCH_FAILED_MESSAGE};
use session::{FileSessionStore, SessionStore};
use ui::Alert;
use ui::results::{ResultsView, SearchOutcome};

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "alphaquery",
    version,
    about = "Terminal client for the AlphaQuery document search service"
)]
pub struct Cli {
    /// Base URL of the search service (defaults to http://127.0.0.1:5000)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Directory holding the session cache and TUI log (defaults to platform data dir)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// HTTP timeout in milliseconds
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch interactive TUI
    Tui {
        /// Render once and exit (headless-friendly)
        #[arg(long, default_value_t = false)]
        once: bool,
    },
    /// Run a search and print the first page of results
    Search {
        query: String,

        #[arg(short, long, value_enum, default_value_t = SearchMethod::Tfidf)]
        method: SearchMethod,

        /// Only keep results whose categories contain this label
        #[arg(long)]
        category: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: usize,

        #[arg(long)]
        json: bool,
    },
    /// Print the cached results without contacting the service
    Results {
        /// Change the category filter ("" clears it)
        #[arg(long)]
        category: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: usize,

        #[arg(long)]
        json: bool,
    },
    /// Show the full text of the N-th cached result (1-based, after filtering)
    Show {
        index: usize,

        #[arg(long)]
        json: bool,
    },
    /// Inspect or clear the cached session
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Generate shell completions to stdout
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate man page to stdout
    Man,
}

#[derive(Subcommand, Debug)]
pub enum SessionAction {
    /// Print the cached query, method, result count, filter and metrics
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Delete the cached session
    Clear,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let overrides = CliOverrides {
        endpoint: cli.endpoint.clone(),
        data_dir: cli.data_dir.clone(),
        timeout_ms: cli.timeout_ms,
    };

    match cli.command {
        Commands::Tui { once } => {
            let config = ClientConfig::load(&overrides)?;
            let _guard = logging::init_file(config.log_dir())?;
            let backend = HttpSearchClient::from_config(&config)?;
            tokio::task::block_in_place(|| ui::tui::run_tui(config, backend, once))
        }
        Commands::Search {
            query,
            method,
            category,
            page,
            json,
        } => {
            logging::init_stderr();
            let config = ClientConfig::load(&overrides)?;
            run_search(&config, &query, method, category.as_deref(), page, json).await
        }
        Commands::Results {
            category,
            page,
            json,
        } => {
            logging::init_stderr();
            let config = ClientConfig::load(&overrides)?;
            run_results(&config, category.as_deref(), page, json)
        }
        Commands::Show { index, json } => {
            logging::init_stderr();
            let config = ClientConfig::load(&overrides)?;
            run_show(&config, index, json)
        }
        Commands::Session { action } => {
            logging::init_stderr();
            let config = ClientConfig::load(&overrides)?;
            run_session(&config, action)
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "alphaquery", &mut std::io::stdout());
            Ok(())
        }
        Commands::Man => {
            let cmd = Cli::command();
            let man = clap_mangen::Man::new(cmd);
            let mut out = std::io::stdout();
            man.render(&mut out)?;
            Ok(())
        }
    }
}

fn alert_error(alert: Alert) -> anyhow::Error {
    match alert.detail {
        Some(detail) => anyhow!("{} ({detail})", alert.message),
        None => anyhow!(alert.message),
    }
}

fn apply_view_args<S: SessionStore>(
    view: &mut ResultsView<S>,
    category: Option<&str>,
    page: usize,
) -> Result<()> {
    if let Some(category) = category {
        view.filter_by_category(category);
    }
    if !view.paginate(page) {
        bail!(
            "page {page} out of range (1..={})",
            view.page_count().max(1)
        );
    }
    Ok(())
}

fn render_view<S: SessionStore>(view: &ResultsView<S>, json: bool) -> Result<()> {
    if json {
        output::print_json(&output::ResultsPageJson::from_view(view))
    } else {
        output::print_results(view);
        Ok(())
    }
}

async fn run_search(
    config: &ClientConfig,
    query: &str,
    method: SearchMethod,
    category: Option<&str>,
    page: usize,
    json: bool,
) -> Result<()> {
    let backend = HttpSearchClient::from_config(config).context("building HTTP client")?;
    let store = FileSessionStore::new(config.session_path());
    let mut view = ResultsView::initialize(store, config.category_match, None);

    match view.run_search(&backend, query, method).await {
        SearchOutcome::Applied => {}
        SearchOutcome::Failed(alert) => return Err(alert_error(alert)),
        SearchOutcome::Stale => bail!(SEARCH_FAILED_MESSAGE),
    }

    apply_view_args(&mut view, category, page)?;
    render_view(&view, json)
}

fn cached_view(config: &ClientConfig) -> Result<ResultsView<FileSessionStore>> {
    let store = FileSessionStore::new(config.session_path());
    if store.load().is_none() {
        bail!(
            "no cached session at {}; run `alphaquery search <QUERY>` first",
            store.path().display()
        );
    }
    Ok(ResultsView::initialize(store, config.category_match, None))
}

fn run_results(config: &ClientConfig, category: Option<&str>, page: usize, json: bool) -> Result<()> {
    let mut view = cached_view(config)?;
    apply_view_args(&mut view, category, page)?;
    render_view(&view, json)
}

fn run_show(config: &ClientConfig, index: usize, json: bool) -> Result<()> {
    let view = cached_view(config)?;
    let detail = index
        .checked_sub(1)
        .and_then(|i| view.open_detail_absolute(i))
        .ok_or_else(|| {
            anyhow!(
                "no result #{index}; the cached list has {} entries",
                view.results().len()
            )
        })?;
    if json {
        output::print_json(&output::DetailJson::from(&detail))
    } else {
        output::print_detail(&detail);
        Ok(())
    }
}

fn run_session(config: &ClientConfig, action: SessionAction) -> Result<()> {
    let mut store = FileSessionStore::new(config.session_path());
    match action {
        SessionAction::Show { json } => {
            let Some(session) = store.load() else {
                bail!("no cached session at {}", store.path().display());
            };
            if json {
                output::print_json(&session)
            } else {
                let saved = store
                    .saved_at()
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string());
                output::print_session(&session, saved);
                Ok(())
            }
        }
        SessionAction::Clear => {
            store.clear()?;
            println!("session cleared");
            Ok(())
        }
    }
}
