use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use lodescraper::{
    fetch::{mirror, names, HttpSource, LocalSource, SourceFiles},
    geo::{CrosswalkFiles, TractFiles},
    output::{self, Format},
    params::validate_year,
    Characteristics, Config, JobType, Level, Lodes, OdKind, Request,
};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(author, version, about = "Tract-level LODES employment tables")]
struct Cli {
    /// YAML settings file; defaults apply to anything it leaves out.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Workplace (wac) or residence (rac) characteristics per tract.
    Longform {
        #[arg(long, default_value = "wac")]
        key: Characteristics,
        #[command(flatten)]
        common: TableArgs,
    },
    /// Resident / non-resident origin-destination summary per tract.
    Summary {
        #[arg(long, default_value = "work")]
        kind: OdKind,
        #[command(flatten)]
        common: TableArgs,
    },
    /// Download raw source files into `raw_dir` for offline runs.
    Mirror {
        #[arg(long, value_delimiter = ',', required = true)]
        years: Vec<u16>,
        #[arg(long, value_delimiter = ',', default_value = "all")]
        job_types: Vec<JobType>,
    },
}

#[derive(Args)]
struct TableArgs {
    /// Defaults to `default_year` from the config.
    #[arg(long)]
    year: Option<u16>,
    #[arg(long, default_value = "all")]
    job_type: JobType,
    #[arg(long, default_value = "tract")]
    level: Level,
    /// Rebuild from source even when a stored table exists.
    #[arg(long)]
    fresh: bool,
    #[arg(long, value_enum, default_value_t = SourceKind::Local)]
    source: SourceKind,
    #[arg(long, default_value = "csv")]
    format: Format,
    /// Write here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum SourceKind {
    /// Files previously mirrored into `raw_dir`.
    Local,
    /// Straight from `base_url`.
    Http,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Longform { key, common } => {
            let year = common.year.unwrap_or(config.default_year);
            let request = Request::longform(key, year, common.job_type)?;
            run_table(config, request, &common)
        }
        Command::Summary { kind, common } => {
            let year = common.year.unwrap_or(config.default_year);
            let request = Request::summary(kind, year, common.job_type)?;
            run_table(config, request, &common)
        }
        Command::Mirror { years, job_types } => run_mirror(&config, &years, &job_types),
    }
}

fn run_table(config: Config, request: Request, args: &TableArgs) -> Result<()> {
    let sources: Box<dyn SourceFiles> = match args.source {
        SourceKind::Local => Box::new(LocalSource::new(config.raw_dir.clone())),
        SourceKind::Http => Box::new(HttpSource::new(&config.base_url)?),
    };
    let tracts = TractFiles::new(config.data_dir.clone());
    let crosswalk = CrosswalkFiles::new(config.data_dir.clone());
    let lodes = Lodes::new(config, sources, Box::new(tracts), Box::new(crosswalk));

    let table = lodes.get(&request, args.fresh, args.level)?;
    info!(
        dataset = %request.dataset,
        rows = table.len(),
        columns = table.columns.len(),
        "writing output"
    );

    match &args.out {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            output::write(&table, args.format, &mut writer)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            output::write(&table, args.format, stdout.lock())?;
        }
    }
    Ok(())
}

fn run_mirror(config: &Config, years: &[u16], job_types: &[JobType]) -> Result<()> {
    let mut ids = Vec::new();
    for &year in years {
        validate_year(year)?;
        for &jt in job_types {
            ids.extend(names::all_files(&config.state, jt, year));
        }
    }
    ids.sort();
    ids.dedup();
    info!(files = ids.len(), dest = %config.raw_dir.display(), "mirroring");

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;
    let client = reqwest::Client::new();
    let report = rt.block_on(mirror::mirror(
        &client,
        &config.base_url,
        &ids,
        &config.raw_dir,
        config.max_concurrent_downloads,
    ))?;

    if !report.failed.is_empty() {
        for (id, err) in &report.failed {
            eprintln!("{id}: {err}");
        }
        bail!("{} of {} files failed to download", report.failed.len(), ids.len());
    }
    Ok(())
}
