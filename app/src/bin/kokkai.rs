use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use kokkai_app::catalogue::{self, HOUSE_OF_COUNCILLORS, HOUSE_OF_REPRESENTATIVES};
use kokkai_app::{AppContext, SearchCriteria, SearchScreen, SummaryScreen};
use kokkai_core::config::{get_default_config_file, ClientConfig, ClientSettings, APP_NAME};
use kokkai_core::Transport;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "kokkai",
    about = "Search Diet meeting records and read their summaries",
    version
)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Query endpoint URL. Falls back to the config file, then KOKKAI_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Attempts per query before giving up on transient failures
    #[arg(long, global = true)]
    max_attempts: Option<u32>,

    /// Delay between attempts in milliseconds
    #[arg(long, global = true)]
    retry_delay_ms: Option<u64>,

    /// Per-attempt timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "KOKKAI_LOG_LEVEL", default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List Diet sessions
    Sessions,

    /// List the meeting names of a session
    MeetingNames {
        #[arg(long)]
        session: i32,
    },

    /// Search meetings of a session
    Search {
        #[arg(long)]
        session: i32,

        #[arg(long)]
        meeting_name: Option<String>,

        /// 衆議院 / 参議院 (or shugiin / sangiin); repeat for both
        #[arg(long = "house", value_parser = parse_house)]
        houses: Vec<String>,

        /// Include meetings that have not been summarized yet
        #[arg(long)]
        include_unsummarized: bool,
    },

    /// Show the summary of one meeting
    Summary {
        issue_id: String,

        /// Afterwards, go back to the search filtered on this meeting
        #[arg(long)]
        back: bool,
    },
}

fn parse_house(value: &str) -> Result<String, String> {
    match value.to_lowercase().as_str() {
        "衆議院" | "shugiin" | "representatives" => Ok(HOUSE_OF_REPRESENTATIVES.to_string()),
        "参議院" | "sangiin" | "councillors" => Ok(HOUSE_OF_COUNCILLORS.to_string()),
        _ => Err(format!(
            "unknown house {:?}, expected {} or {}",
            value, HOUSE_OF_REPRESENTATIVES, HOUSE_OF_COUNCILLORS
        )),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize tracing (logging)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)))
        .init();

    let settings = load_settings(&args)?;
    info!(endpoint = %settings.endpoint, "Using query endpoint");

    let context =
        AppContext::from_settings(&settings).context("Failed to initialize query client")?;

    match args.command {
        Command::Sessions => {
            let sessions = catalogue::fetch_sessions(context.client()).await?;
            for session in sessions {
                println!("{}\t{}", session.session, session.name);
            }
        }
        Command::MeetingNames { session } => {
            let names = catalogue::fetch_meeting_names(context.client(), session).await?;
            for name in names {
                println!("{}", name);
            }
        }
        Command::Search {
            session,
            meeting_name,
            houses,
            include_unsummarized,
        } => {
            let criteria = SearchCriteria {
                session: Some(session),
                meeting_name,
                houses: houses.into_iter().collect(),
            };
            // Route to the search screen the same way another screen would
            context.handoff().publish(criteria);
            let mut screen = context.search_screen();
            screen.set_include_unsummarized(include_unsummarized);
            screen.mount().await;
            print_search(&screen)?;
        }
        Command::Summary { issue_id, back } => {
            let mut screen = context.summary_screen(issue_id);
            screen.mount().await;
            print_summary(&screen)?;

            if back {
                if screen.back_to_search().is_none() {
                    bail!("No meeting loaded, nothing to search for");
                }
                let mut search = context.search_screen();
                search.mount().await;
                println!();
                print_search(&search)?;
            }
        }
    }

    Ok(())
}

fn load_settings(args: &Args) -> Result<ClientSettings> {
    let file_config = match &args.config {
        Some(path) => ClientConfig::load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => match get_default_config_file(APP_NAME) {
            Ok(path) => ClientConfig::load_from_file(&path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
            Err(e) => {
                warn!(error = %e, "No default config location, continuing without a config file");
                ClientConfig::default()
            }
        },
    };

    let flags = ClientConfig {
        api_url: args.api_url.clone(),
        max_attempts: args.max_attempts,
        retry_delay_ms: args.retry_delay_ms,
        request_timeout_ms: args.timeout_ms,
    };

    Ok(file_config.merge(&flags).resolve()?)
}

fn print_search<X: Transport>(screen: &SearchScreen<X>) -> Result<()> {
    if let Some(error) = screen.last_error() {
        return Err(anyhow!("{}", error));
    }

    let selection = screen.selection();
    println!(
        "回次 {} / {} / {}",
        selection
            .session
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string()),
        selection.meeting_name.as_deref().unwrap_or("全会議"),
        selection.house_filter().unwrap_or("両院"),
    );

    if screen.meetings().is_empty() {
        println!("(no meetings)");
    }
    for meeting in screen.meetings() {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            meeting
                .date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "----------".to_string()),
            meeting.name_of_house,
            meeting.name_of_meeting.as_deref().unwrap_or("-"),
            meeting.issue,
            meeting.issue_id
        );
    }
    Ok(())
}

fn print_summary<X: Transport>(screen: &SummaryScreen<X>) -> Result<()> {
    if let Some(error) = screen.last_error() {
        return Err(anyhow!("{}", error));
    }
    let Some(detail) = screen.meeting() else {
        bail!("Meeting {} is not loaded", screen.issue_id());
    };

    let meeting = &detail.meeting;
    println!(
        "{} {} {}",
        meeting.name_of_house,
        meeting.name_of_meeting.as_deref().unwrap_or("-"),
        meeting.issue
    );
    if let Some(date) = meeting.date {
        println!("{}", date);
    }
    println!("{}", detail.meeting_url);
    if let Some(pdf_url) = &detail.pdf_url {
        println!("{}", pdf_url);
    }
    println!();

    match detail.summary.as_ref().and_then(|s| s.summary.as_deref()) {
        Some(text) => println!("{}", text),
        None => println!("(no summary yet)"),
    }
    Ok(())
}
