// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

use kuntahaku::format::{area_sentence, format_count, format_percentage, national_sentence, not_found_message};
use kuntahaku::{load_index, percentage_foreign, source_for, AreaRecord, Config, Loaded};

/// Look up foreign-language children in early childhood education by municipality
#[derive(Parser, Debug)]
#[command(name = "kuntahaku")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// CSV export to load (file path or http(s) URL)
    #[arg(long, global = true)]
    source: Option<String>,

    /// Statistics year to keep
    #[arg(long, global = true)]
    year: Option<i32>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive search (default)
    Tui,

    /// Exact municipality lookup, compared with the whole country
    Find {
        name: String,
        #[arg(long)]
        json: bool,
    },

    /// Municipalities whose name contains the text
    Suggest {
        partial: String,
        #[arg(long)]
        json: bool,
    },

    /// Every retained municipality in collation order
    List {
        #[arg(long)]
        json: bool,
    },

    /// Ingestion report for the source
    Summary,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(source) = cli.source {
        config.source = source;
    }
    if let Some(year) = cli.year {
        config.target_year = year;
    }

    init_logging(config.log_file.as_deref())?;

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => run_ui_mode(&config),
        Command::Find { name, json } => run_find(&config, &name, json),
        Command::Suggest { partial, json } => run_suggest(&config, &partial, json),
        Command::List { json } => run_list(&config, json),
        Command::Summary => run_summary(&config),
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt::Subscriber::builder().with_env_filter(env);

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            builder.with_writer(Mutex::new(file)).with_ansi(false).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }

    Ok(())
}

fn load(config: &Config) -> Result<Loaded> {
    let source = source_for(&config.source)?;
    load_index(source.as_ref(), config)
        .with_context(|| format!("Failed to load {}", config.source))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_find(config: &Config, name: &str, json: bool) -> Result<()> {
    let loaded = load(config)?;
    let national = loaded.index.national_aggregate();

    let Some(record) = loaded.index.find_exact(name) else {
        if json {
            print_json(&serde_json::Value::Null)?;
        } else {
            eprintln!("{}", not_found_message(name));
        }
        std::process::exit(1);
    };

    if json {
        return print_json(&serde_json::json!({
            "area": record,
            "percentage_foreign": percentage_foreign(record),
            "national": national.map(|n| serde_json::json!({
                "area": n,
                "percentage_foreign": percentage_foreign(n),
            })),
        }));
    }

    println!("{}", record.area_name);
    println!("{}", area_sentence(record));
    if let Some(n) = national {
        println!();
        println!("Vertailu: koko maa");
        println!("{}", national_sentence(n));
    }

    Ok(())
}

fn print_rows(records: &[&AreaRecord]) {
    for record in records {
        println!(
            "{:<28} {:>10} {:>10} {:>7}",
            record.area_name,
            format_count(record.total()),
            format_count(record.foreign()),
            format_percentage(percentage_foreign(record)),
        );
    }
}

fn run_suggest(config: &Config, partial: &str, json: bool) -> Result<()> {
    let loaded = load(config)?;
    let suggestions = loaded.index.suggest(partial);

    if json {
        return print_json(&suggestions);
    }
    print_rows(&suggestions);
    Ok(())
}

fn run_list(config: &Config, json: bool) -> Result<()> {
    let loaded = load(config)?;

    if json {
        return print_json(&loaded.index.records());
    }
    let all: Vec<&AreaRecord> = loaded.index.records().iter().collect();
    print_rows(&all);
    Ok(())
}

fn run_summary(config: &Config) -> Result<()> {
    let loaded = load(config)?;
    let report = &loaded.report;

    println!("Source:           {}", config.source);
    println!("SHA-256:          {}", loaded.digest);
    println!("Year:             {}", config.target_year);
    println!("Data lines:       {}", report.data_lines);
    println!("Short rows:       {}", report.short_rows);
    println!("Unreadable rows:  {}", report.unreadable_rows);
    println!("Excluded rows:    {}", report.excluded);
    println!("Retained areas:   {}", report.retained);
    println!("Defaulted counts: {}", report.defaulted_counts);
    match loaded.index.national_aggregate() {
        Some(n) => println!("National share:   {}", format_percentage(percentage_foreign(n))),
        None => println!("National share:   (no {} row)", config.national_sentinel),
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config) -> Result<()> {
    use kuntahaku::AreaIndex;

    // A failed load still opens the UI; every search then answers not-found
    let (index, load_error) = match load(config) {
        Ok(loaded) => (loaded.index, None),
        Err(err) => {
            error!("Datan haku epäonnistui: {:#}", err);
            (AreaIndex::empty(&config.national_sentinel), Some(format!("{:#}", err)))
        }
    };

    let mut app = ui::App::new(index, config.target_year, load_error);
    ui::run_ui(&mut app)
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &Config) -> Result<()> {
    error!("TUI mode not available");
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use: kuntahaku find <name>");
    std::process::exit(1);
}
