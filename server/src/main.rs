use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand};
use incidash_core::domain::{IncidentStatus, Priority, Urgency};
use incidash_core::filter::actions::DateRangePreset;
use incidash_core::filter::SortDirection;
use incidash_core::source::IncidentSource;
use incidash_lib::config::{fetch_limit_from_lookup, source_config_from_lookup, ServerConfig};
use incidash_lib::dashboard::ViewOptions;
use incidash_lib::view::run_view;
use incidash_lib::wait_for_interrupt;
use incidash_source::pagerduty::PagerDutyClient;
use incidash_source::proxy::ProxyClient;

#[derive(Parser)]
#[command(name = "incidash")]
#[command(about = "Incident dashboard: credential-hiding proxy and terminal view")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the incident proxy
    Serve,
    /// Load incidents and print the dashboard
    View(ViewArgs),
}

#[derive(Args)]
struct ViewArgs {
    /// Proxy origin to read incidents from
    #[arg(long, env = "INCIDASH_PROXY_URL", default_value = "http://127.0.0.1:5001")]
    proxy_url: String,

    /// Call the incident source directly (requires PAGERDUTY_API_KEY)
    #[arg(long)]
    direct: bool,

    /// Status filter (repeatable)
    #[arg(long = "status", value_parser = parse_status)]
    statuses: Vec<IncidentStatus>,

    /// Priority filter (repeatable)
    #[arg(long = "priority", value_parser = parse_priority)]
    priorities: Vec<Priority>,

    /// Urgency filter (repeatable)
    #[arg(long = "urgency", value_parser = parse_urgency)]
    urgencies: Vec<Urgency>,

    /// Case-insensitive title substring
    #[arg(long)]
    title: Option<String>,

    /// Only incidents created in the last 5, 10 or 30 days
    #[arg(long, value_parser = parse_preset)]
    last_days: Option<DateRangePreset>,

    /// Sort by creation date: asc or desc
    #[arg(long, default_value = "asc", value_parser = parse_sort)]
    sort: SortDirection,
}

fn parse_status(s: &str) -> Result<IncidentStatus, String> {
    s.parse().map_err(|e: incidash_core::error::AppError| e.to_string())
}

fn parse_priority(s: &str) -> Result<Priority, String> {
    s.parse().map_err(|e: incidash_core::error::AppError| e.to_string())
}

fn parse_urgency(s: &str) -> Result<Urgency, String> {
    s.parse().map_err(|e: incidash_core::error::AppError| e.to_string())
}

fn parse_sort(s: &str) -> Result<SortDirection, String> {
    s.parse().map_err(|e: incidash_core::error::AppError| e.to_string())
}

fn parse_preset(s: &str) -> Result<DateRangePreset, String> {
    s.parse::<i64>()
        .ok()
        .and_then(DateRangePreset::from_days)
        .ok_or_else(|| format!("expected one of 5, 10, 30; got {s}"))
}

impl ViewArgs {
    fn options(&self) -> ViewOptions {
        ViewOptions {
            statuses: self.statuses.clone(),
            priorities: self.priorities.clone(),
            urgencies: self.urgencies.clone(),
            title: self.title.clone(),
            last_days: self.last_days,
            sort: self.sort,
        }
    }
}

async fn view(args: ViewArgs) -> anyhow::Result<()> {
    let lookup = |var: &str| std::env::var(var).ok();
    let limit = fetch_limit_from_lookup(&lookup).map_err(|e| anyhow!(e))?;

    let source: Box<dyn IncidentSource + Send> = if args.direct {
        let cfg = source_config_from_lookup(&lookup).map_err(|e| anyhow!(e))?;
        Box::new(PagerDutyClient::new(cfg))
    } else {
        Box::new(ProxyClient::new(&args.proxy_url).map_err(|e| anyhow!(e))?)
    };

    let cancel = wait_for_interrupt(tokio::signal::ctrl_c());
    let Some(output) = run_view(source, &args.options(), limit, cancel).await else {
        return Ok(());
    };

    if let Some(notice) = output.notice {
        eprintln!("{notice}");
    }
    print!("{}", output.body);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve => {
            let config = ServerConfig::from_env()
                .map_err(|e| anyhow!(e))
                .context("invalid configuration")?;
            incidash_lib::serve(config).await
        }
        Command::View(args) => view(args).await,
    }
}
