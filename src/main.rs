use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::{info, warn};

use itjobs_lib::config::{DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECS};
use itjobs_lib::exporter::{self, DEFAULT_JOB_COLUMNS};
use itjobs_lib::{
    logger, ClientConfig, CsvSink, DateWindow, Extractor, FetchQuery, FilterCriteria, HttpPageFetcher, JobRecord,
    PageDelay, Paginator, Pipeline,
};

#[derive(Parser)]
#[command(name = "itjobs")]
#[command(about = "Query itjobs.pt postings: filter, summarise, export to CSV", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API key for the listing service
    #[arg(long, env = "ITJOBS_API_KEY", hide_env_values = true)]
    api_key: String,

    #[arg(long, env = "ITJOBS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[arg(long, env = "ITJOBS_USER_AGENT", default_value = "")]
    user_agent: String,

    #[arg(long, env = "ITJOBS_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Pause between page requests, in milliseconds (0 disables)
    #[arg(long, env = "ITJOBS_PAGE_DELAY_MS", default_value_t = 0)]
    page_delay_ms: u64,

    #[arg(long, env = "ITJOBS_LOG", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// The N most recently published jobs
    Top {
        n: usize,
        #[arg(long)]
        export_csv: bool,
        #[arg(long, default_value = "top_jobs.csv")]
        output: PathBuf,
    },

    /// Jobs at a given company in a given city
    Search {
        city: String,
        company: String,
        /// How many jobs to fetch before filtering
        #[arg(short, long, default_value_t = 10)]
        n: usize,
        #[arg(long)]
        export_csv: bool,
        #[arg(long, default_value = "search_jobs.csv")]
        output: PathBuf,
    },

    /// Wage for a single job, falling back to the description text
    Salary { job_id: i64 },

    /// Jobs requiring every listed skill, published within a date range
    Skills {
        #[arg(required = true)]
        skills: Vec<String>,
        /// YYYY-MM-DD, inclusive
        #[arg(long)]
        start_date: NaiveDate,
        /// YYYY-MM-DD, inclusive (midnight)
        #[arg(long)]
        end_date: NaiveDate,
        #[arg(short, long, default_value_t = 10)]
        n: usize,
        #[arg(long)]
        export_csv: bool,
        #[arg(long, default_value = "skills_jobs.csv")]
        output: PathBuf,
    },

    /// Job counts per zone and job type, written to CSV
    Statistics {
        #[arg(short, long, default_value_t = 100)]
        n: usize,
        #[arg(long, default_value = "statistics_zone.csv")]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logger::init(logger::parse_level(&cli.log_level));

    let config = ClientConfig::new(cli.api_key.clone())
        .with_base_url(cli.base_url.clone())
        .with_user_agent(cli.user_agent.clone())
        .with_timeout(Duration::from_secs(cli.timeout_secs));
    let fetcher = HttpPageFetcher::new(&config)?;

    let paginator = Paginator::new(fetcher)
        .with_page_size(DEFAULT_PAGE_SIZE)
        .with_delay(PageDelay::fixed(cli.page_delay_ms));
    let pipeline = Pipeline::new(paginator);

    match cli.command {
        Commands::Top { n, export_csv, output } => {
            let jobs = pipeline.top(n);
            print_jobs(&jobs)?;
            if export_csv {
                write_jobs(&jobs, &output)?;
            } else {
                info!("CSV export skipped, pass --export-csv to write {:?}", output);
            }
        }
        Commands::Search { city, company, n, export_csv, output } => {
            let criteria = FilterCriteria::new().location(city).company(company);
            let jobs = pipeline.run(&FetchQuery::new(), &criteria, Some(n));
            print_jobs(&jobs)?;
            if export_csv {
                write_jobs(&jobs, &output)?;
            }
        }
        Commands::Skills { skills, start_date, end_date, n, export_csv, output } => {
            if start_date > end_date {
                warn!("Start date {} is after end date {}; nothing can match", start_date, end_date);
            }
            let criteria = FilterCriteria::new()
                .skills(skills)
                .window(DateWindow::from_dates(start_date, end_date));
            let jobs = pipeline.run(&FetchQuery::new(), &criteria, Some(n));
            print_jobs(&jobs)?;
            if export_csv {
                write_jobs(&jobs, &output)?;
            }
        }
        Commands::Statistics { n, output } => {
            let stats = pipeline.statistics(&FetchQuery::new(), &FilterCriteria::new(), Some(n));
            let mut sink = CsvSink::create(&output)?;
            exporter::export_statistics(&mut sink, &stats)?;
            info!("Statistics written to {:?} ({} rows)", output, stats.len());
        }
        Commands::Salary { job_id } => {
            let job = pipeline.paginator().fetcher().fetch_job(job_id)?;
            match Extractor::new().resolve_wage(&job) {
                Some(wage) => println!("{}", wage),
                None => println!("wage not specified"),
            }
        }
    }

    Ok(())
}

fn print_jobs(jobs: &[JobRecord]) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(jobs)?);
    Ok(())
}

fn write_jobs(jobs: &[JobRecord], output: &Path) -> Result<(), Box<dyn Error>> {
    let mut sink = CsvSink::create(output)?;
    exporter::export_jobs(&mut sink, jobs, &DEFAULT_JOB_COLUMNS)?;
    info!("Wrote {} jobs to {:?}", jobs.len(), output);
    Ok(())
}
