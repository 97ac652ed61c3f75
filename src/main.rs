use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use job_tracker::api::ApiClient;
use job_tracker::config::{self, Config};
use job_tracker::db;
use job_tracker::model::{ApplicationStatus, PageQuery};
use job_tracker::operations::Tracker;
use job_tracker::poller::Poller;
use job_tracker::preferences::{self, PreferencesAction, PreferencesState, PAGE_SIZE_CHOICES};
use job_tracker::validation::JobApplicationForm;
use job_tracker::view;

#[derive(Debug, Parser)]
#[command(author, version, about = "Track job applications against the tracker API")]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch one page and print it
    List {
        /// Page number (defaults to the saved current page)
        #[arg(long)]
        page: Option<u32>,
        /// Page size (defaults to the saved page size)
        #[arg(long, value_parser = parse_page_size)]
        page_size: Option<u32>,
    },
    /// Record a new application
    Create {
        #[arg(long)]
        company: String,
        #[arg(long)]
        position: String,
        #[arg(long, value_enum, default_value_t = StatusArg::Applied)]
        status: StatusArg,
    },
    /// Replace company, position and status of an application
    Update {
        id: i64,
        #[arg(long)]
        company: String,
        #[arg(long)]
        position: String,
        #[arg(long, value_enum)]
        status: StatusArg,
    },
    /// Remove an application
    Delete { id: i64 },
    /// Keep the list on screen, refreshing on the configured interval
    Watch,
    /// Show or change local preferences
    Prefs {
        #[command(subcommand)]
        action: Option<PrefsCommand>,
    },
    /// Print a sample config file
    Config,
}

#[derive(Debug, Subcommand)]
enum PrefsCommand {
    Show,
    /// Change the page size (moves back to page 1)
    PageSize {
        #[arg(value_parser = parse_page_size)]
        size: u32,
    },
    /// Change the current page
    Page {
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },
    Sidebar {
        #[arg(value_enum)]
        state: Toggle,
    },
    Reset,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StatusArg {
    Applied,
    Interview,
    Offer,
    Rejected,
    Accepted,
}

impl From<StatusArg> for ApplicationStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Applied => ApplicationStatus::Applied,
            StatusArg::Interview => ApplicationStatus::Interview,
            StatusArg::Offer => ApplicationStatus::Offer,
            StatusArg::Rejected => ApplicationStatus::Rejected,
            StatusArg::Accepted => ApplicationStatus::Accepted,
        }
    }
}

fn parse_page_size(raw: &str) -> Result<u32, String> {
    let size: u32 = raw.parse().map_err(|_| format!("'{raw}' is not a number"))?;
    if PAGE_SIZE_CHOICES.contains(&size) {
        Ok(size)
    } else {
        Err(format!("page size must be one of {PAGE_SIZE_CHOICES:?}"))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    if let Command::Config = args.command {
        print!("{}", config::example());
        return Ok(());
    }

    let cfg = config::load_or_default(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;
    cfg.ensure_dirs()?;

    let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| cfg.database_url());
    let pool = db::init_pool(&database_url).await?;
    db::run_migrations(&pool).await?;
    let mut prefs = db::load_preferences(&pool).await?;

    let api = ApiClient::from_config(&cfg)?;
    info!(base_url = %api.base_url(), "using tracker API");
    let tracker = Arc::new(Tracker::new(Arc::new(api)));

    match args.command {
        Command::List { page, page_size } => {
            if let Some(size) = page_size {
                prefs = preferences::reduce(prefs, PreferencesAction::SetPageSize(size));
            }
            if let Some(page) = page {
                prefs = preferences::reduce(prefs, PreferencesAction::SetCurrentPage(page));
            }
            db::save_preferences(&pool, &prefs).await?;
            list_page(&tracker, prefs.page_query(), &mut std::io::stdout()).await?;
        }
        Command::Create {
            company,
            position,
            status,
        } => {
            let form = submit_form(company, position, status)?;
            let created = tracker.create(form.into()).await?;
            println!(
                "Created #{}: {} at {} ({})",
                created.id,
                created.position,
                created.company_name,
                created.status.display_name()
            );
        }
        Command::Update {
            id,
            company,
            position,
            status,
        } => {
            let form = submit_form(company, position, status)?;
            tracker.update(id, form.into()).await?;
            println!("Updated #{id}");
        }
        Command::Delete { id } => {
            tracker.delete(id).await?;
            println!("Deleted #{id}");
        }
        Command::Watch => watch(&cfg, tracker, prefs).await?,
        Command::Prefs { action } => {
            prefs = apply_prefs_command(prefs, action);
            db::save_preferences(&pool, &prefs).await?;
            println!(
                "page size: {}\ncurrent page: {}\nsidebar: {}",
                prefs.page_size,
                prefs.current_page,
                if prefs.sidebar_open { "open" } else { "closed" }
            );
        }
        Command::Config => {}
    }

    Ok(())
}

/// Fetch and print one page. A rejected fetch is printed like any other
/// state, then returned so the process exits non-zero.
async fn list_page(tracker: &Tracker, query: PageQuery, out: &mut impl Write) -> Result<()> {
    let fetched = tracker.fetch_all(query).await;
    write!(out, "{}", view::render_state(&tracker.snapshot()))?;
    fetched?;
    Ok(())
}

fn submit_form(
    company: String,
    position: String,
    status: StatusArg,
) -> Result<job_tracker::validation::ValidForm> {
    let form = JobApplicationForm {
        company_name: company,
        position,
        status: status.into(),
    };
    form.validate().map_err(|errors| {
        for (field, message) in errors.iter() {
            eprintln!("{field}: {message}");
        }
        anyhow!(errors)
    })
}

fn apply_prefs_command(prefs: PreferencesState, action: Option<PrefsCommand>) -> PreferencesState {
    let action = match action {
        None | Some(PrefsCommand::Show) => return prefs,
        Some(PrefsCommand::PageSize { size }) => PreferencesAction::SetPageSize(size),
        Some(PrefsCommand::Page { page }) => PreferencesAction::SetCurrentPage(page),
        Some(PrefsCommand::Sidebar { state }) => {
            PreferencesAction::SetSidebarOpen(matches!(state, Toggle::On))
        }
        Some(PrefsCommand::Reset) => PreferencesAction::Reset,
    };
    preferences::reduce(prefs, action)
}

async fn watch(cfg: &Config, tracker: Arc<Tracker>, prefs: PreferencesState) -> Result<()> {
    let mut updates = tracker.store().subscribe();
    let query: PageQuery = prefs.page_query();
    let handle = Poller::spawn(Arc::clone(&tracker), query, cfg.poll_interval());

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                // Clear the screen and redraw.
                print!("\x1B[2J\x1B[H{}", view::render_state(&state));
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(err) = signal {
                    warn!(?err, "failed to listen for ctrl-c");
                }
                break;
            }
        }
    }

    handle.stop();
    info!("stopped watching");
    Ok(())
}
