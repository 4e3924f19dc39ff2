//! Agency Analytics CLI
//!
//! Builds the admin dashboard analytics from exported files or straight from the agency API

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use agency_analytics::records::{
    load_customers, load_customers_json, load_policies, load_policies_json,
};
use agency_analytics::{
    AnalyticsReport, ApiClient, ClientConfig, CustomerRecord, Dashboard, Notice, NoticeLevel,
    PolicyRecord, Session,
};
use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "agency-analytics", version, about = "Insurance agency dashboard analytics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the report from policy and customer exports (CSV, or JSON by extension)
    Report {
        #[arg(long)]
        policies: PathBuf,

        #[arg(long)]
        customers: PathBuf,

        /// Date ages are computed against (defaults to today)
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Write JSON here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Fetch customers and policies from the API and build the report
    Fetch {
        /// Overrides AGENCY_API_URL
        #[arg(long)]
        base_url: Option<String>,

        /// Bearer token; overrides AGENCY_API_TOKEN and skips login
        #[arg(long)]
        token: Option<String>,

        #[arg(long, env = "AGENCY_API_EMAIL")]
        email: Option<String>,

        #[arg(long, env = "AGENCY_API_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Also fetch documents for every policy and include per-policy counts
        #[arg(long)]
        documents: bool,

        #[arg(long)]
        today: Option<NaiveDate>,

        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FetchOutput {
    report: AnalyticsReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    document_counts: Option<BTreeMap<String, usize>>,
    /// Failures and confirmations collected while fetching
    #[serde(skip_serializing_if = "Vec::is_empty")]
    notices: Vec<Notice>,
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

fn read_policies(path: &Path) -> Result<Vec<PolicyRecord>> {
    let policies = if is_json(path) {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        load_policies_json(BufReader::new(file))
    } else {
        load_policies(path)
    };
    policies.with_context(|| format!("loading policies from {}", path.display()))
}

fn read_customers(path: &Path) -> Result<Vec<CustomerRecord>> {
    let customers = if is_json(path) {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        load_customers_json(BufReader::new(file))
    } else {
        load_customers(path)
    };
    customers.with_context(|| format!("loading customers from {}", path.display()))
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
            serde_json::to_writer_pretty(&mut file, value)?;
            writeln!(file)?;
            log::info!("Report written to {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, value)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

async fn fetch(
    base_url: Option<String>,
    token: Option<String>,
    email: Option<String>,
    password: Option<String>,
    documents: bool,
    today: NaiveDate,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut config = ClientConfig::from_env().context("reading API configuration")?;
    if let Some(url) = base_url {
        config = config.with_base_url(&url);
    }
    if token.is_some() {
        config.token = token;
    }

    let api = ApiClient::new(&config).context("building API client")?;
    let mut dashboard = match (config.token.clone(), email, password) {
        (Some(token), _, _) => Dashboard::new(api, Session::with_token(token)),
        (None, Some(email), Some(password)) => Dashboard::connect(api, &email, &password)
            .await
            .context("logging in")?,
        _ => bail!("either --token (or AGENCY_API_TOKEN) or both --email and --password are required"),
    };

    dashboard.refresh().await.context("fetching customers and policies")?;

    let document_counts = if documents {
        dashboard.load_documents().await;
        Some(
            dashboard
                .state()
                .documents
                .iter()
                .map(|(policy_id, docs)| (policy_id.clone(), docs.len()))
                .collect(),
        )
    } else {
        None
    };

    let notices = dashboard.take_notices();
    for notice in notices.iter().filter(|n| n.level == NoticeLevel::Error) {
        eprintln!("warning: {}", notice.message);
    }

    let output_value = FetchOutput {
        report: dashboard.report(today),
        document_counts,
        notices,
    };
    write_json(&output_value, output.as_deref())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Report { policies, customers, today, output } => {
            let policies = read_policies(&policies)?;
            let customers = read_customers(&customers)?;
            log::info!("Loaded {} policies and {} customers", policies.len(), customers.len());

            let today = today.unwrap_or_else(|| Local::now().date_naive());
            let report = AnalyticsReport::build(&policies, &customers, today);
            write_json(&report, output.as_deref())
        }
        Command::Fetch { base_url, token, email, password, documents, today, output } => {
            let today = today.unwrap_or_else(|| Local::now().date_naive());
            fetch(base_url, token, email, password, documents, today, output).await
        }
    }
}
