//! # Butterfly-waystore CLI
//!
//! Command-line interface for the butterfly-waystore library.
//! Inspects, dumps, and verifies compiled ways files.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use butterfly_waystore::core::types::{allowed_name_list, highways_name_list, properties_name_list};
use butterfly_waystore::{verify_store, StoreMode, StoreOptions, WayStore, WaySummary};
use clap::{Parser, Subcommand};
use log::{debug, error};

mod cli;

use cli::{ErrorLog, ProgressManager};

/// Command-line interface for butterfly-waystore
#[derive(Parser)]
#[command(name = "butterfly-waystore")]
#[command(about = "Inspect and verify compiled way attribute files")]
#[command(long_about = "Reads ways files through either storage backend:
  butterfly-waystore info ways.mem               # Header summary
  butterfly-waystore dump ways.mem --index 42    # One way
  butterfly-waystore dump ways.mem --json        # Every way as JSON lines
  butterfly-waystore verify ways.mem --errorlog bad.log
  butterfly-waystore --mode slim --cache-slots 4096 verify ways.mem

Backend selection:
  --mode mapped                    # Map the whole file (default)
  --mode slim                      # Bounded record cache, low memory")]
#[command(version = env!("BUTTERFLY_VERSION"))]
struct Cli {
    /// Storage backend: "mapped" or "slim"
    #[arg(long, global = true)]
    mode: Option<StoreMode>,

    /// Number of slim cache slots
    #[arg(long, global = true)]
    cache_slots: Option<usize>,

    /// TOML file with store options; flags override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show way count, name table size and header summaries
    Info { file: PathBuf },

    /// Print ways, all of them unless --index is given
    Dump {
        file: PathBuf,

        /// Way index to print (repeatable)
        #[arg(long = "index")]
        indices: Vec<u32>,

        /// Print one JSON object per way
        #[arg(long)]
        json: bool,
    },

    /// Print the name stored at a name table offset
    Name { file: PathBuf, offset: u32 },

    /// Check every way and report problems
    Verify {
        file: PathBuf,

        /// Write problems to this file instead of stderr
        #[arg(long)]
        errorlog: Option<PathBuf>,

        /// Append to the error log instead of truncating it
        #[arg(long, requires = "errorlog")]
        append: bool,
    },

    /// Compare the attributes of two ways
    Compare { file: PathBuf, a: u32, b: u32 },
}

/// Build store options from the config file, then apply flag overrides
fn resolve_options(
    config: Option<&Path>,
    mode: Option<StoreMode>,
    cache_slots: Option<usize>,
) -> Result<StoreOptions> {
    let mut options = match config {
        Some(path) => StoreOptions::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => StoreOptions::default(),
    };

    if let Some(mode) = mode {
        options.mode = mode;
    }
    if let Some(slots) = cache_slots {
        options.cache_slots = slots;
    }
    options.validate()?;

    Ok(options)
}

fn ordering_symbol(ordering: Ordering) -> &'static str {
    match ordering {
        Ordering::Less => "<",
        Ordering::Equal => "=",
        Ordering::Greater => ">",
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            error!("❌ Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging to stderr
    let mut builder = env_logger::Builder::from_default_env();
    builder.target(env_logger::Target::Stderr);
    if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    if cli.verbose {
        eprintln!("🦋 Butterfly-waystore v{} starting...", env!("BUTTERFLY_VERSION"));
    }

    let options = resolve_options(cli.config.as_deref(), cli.mode, cli.cache_slots)?;
    debug!("Store options: {:?}", options);

    match cli.command {
        Command::Info { file } => {
            let store = open_store(&file, &options)?;
            show_info(&store);
        }
        Command::Dump { file, indices, json } => {
            let store = open_store(&file, &options)?;
            dump_ways(&store, &indices, json)?;
        }
        Command::Name { file, offset } => {
            let store = open_store(&file, &options)?;
            println!("{}", store.name_at(offset)?);
        }
        Command::Verify {
            file,
            errorlog,
            append,
        } => {
            let store = open_store(&file, &options)?;
            return verify(&store, errorlog.as_deref(), append, cli.verbose);
        }
        Command::Compare { file, a, b } => {
            let store = open_store(&file, &options)?;
            let ordering = store.compare_at(a, b)?;
            println!("way {a} {} way {b}", ordering_symbol(ordering));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn open_store(file: &Path, options: &StoreOptions) -> Result<WayStore> {
    WayStore::load(file, options).with_context(|| format!("Failed to load {}", file.display()))
}

/// Print the header summary
fn show_info(store: &WayStore) {
    let header = store.header();
    println!("📁 File:       {}", store.path().display());
    println!("🗄️  Backend:    {}", store.mode());
    println!("Ways:          {}", store.count());
    println!("Name table:    {} bytes", store.names_len());
    println!("Highways:      {}", highways_name_list(header.highways));
    println!("Allowed:       {}", allowed_name_list(header.allow));
    println!("Properties:    {}", properties_name_list(header.props));
}

fn dump_ways(store: &WayStore, indices: &[u32], json: bool) -> Result<()> {
    let all: Vec<u32>;
    let indices = if indices.is_empty() {
        all = (0..store.count()).collect();
        &all
    } else {
        indices
    };

    for &index in indices {
        let summary = WaySummary::load(store, index)?;
        if json {
            println!("{}", serde_json::to_string(&summary)?);
        } else {
            print!("{summary}");
        }
    }

    Ok(())
}

/// Scan the whole store; exits non-zero when any problem is found
fn verify(store: &WayStore, errorlog: Option<&Path>, append: bool, verbose: bool) -> Result<ExitCode> {
    let mut error_log = errorlog.map(|path| ErrorLog::open(path, append)).transpose()?;

    let progress = ProgressManager::new(
        store.count() as u64,
        &format!("🔍 Verifying {}", store.path().display()),
        false,
    );

    let mut log_failure = None;
    let report = verify_store(
        store,
        |issue| match error_log.as_mut() {
            Some(log) => {
                if let Err(e) = log.log(&issue.to_string()) {
                    log_failure.get_or_insert(e);
                }
            }
            None => progress.pb.suspend(|| eprintln!("⚠️  {issue}")),
        },
        |done| progress.update(done as u64),
    )?;

    if let Some(e) = log_failure {
        return Err(e);
    }
    if let Some(log) = error_log.as_mut() {
        log.flush()?;
    }

    if report.is_clean() {
        progress.finish("✅ Verification completed!");
        eprintln!("✅ {} ways, no problems found", report.ways);
    } else {
        progress.finish("❌ Verification found problems");
        eprintln!("❌ {} ways, {} problems found", report.ways, report.issues);
        if let Some(log) = error_log.as_ref() {
            eprintln!("📝 {} problems written to {}", log.lines(), log.path().display());
        }
    }

    if verbose {
        if let Some(stats) = store.cache_stats() {
            eprintln!(
                "Cache: {} slots, {} hits, {} misses ({:.1}% hit ratio)",
                stats.slots,
                stats.hits,
                stats.misses,
                stats.hit_ratio() * 100.0
            );
        }
    }

    Ok(if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
