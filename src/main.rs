use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use bkpconsensus::io::{write_consensus_path, write_pairs_path};
use bkpconsensus::{consensus, load_breakpoints, match_pairs, BreakpointRecord, CallerKind, MatchConfig};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bkpconsensus", about = "Breakpoint consensus across SV callers")]
struct Cli {
    /// Log debug detail (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,
    /// Worker threads for matching (1 disables parallel querying).
    #[arg(long, global = true)]
    threads: Option<usize>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a consensus call set from two or more callers.
    Multi {
        /// destruct breakpoint table.
        #[arg(long)]
        destruct: Option<PathBuf>,
        /// lumpy VCF.
        #[arg(long)]
        lumpy: Option<PathBuf>,
        /// svaba VCF.
        #[arg(long)]
        svaba: Option<PathBuf>,
        /// gridss VCF.
        #[arg(long)]
        gridss: Option<PathBuf>,
        /// Output consensus CSV.
        #[arg(long, short)]
        output: PathBuf,
        /// Extension radius applied to each breakend.
        #[arg(long, default_value_t = 500)]
        window: u64,
    },
    /// List every match between a reference and a query call set.
    Pairwise {
        /// Reference call set.
        reference: PathBuf,
        /// Format of the reference call set.
        #[arg(value_enum)]
        reference_type: CallerKind,
        /// Query call set.
        query: PathBuf,
        /// Format of the query call set.
        #[arg(value_enum)]
        query_type: CallerKind,
        /// Output pair CSV.
        output: PathBuf,
        /// Extension radius applied to each breakend.
        #[arg(long, default_value_t = 200)]
        min_dist: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let parallel = configure_threads(cli.threads)?;

    match cli.command {
        Commands::Multi {
            destruct,
            lumpy,
            svaba,
            gridss,
            output,
            window,
        } => {
            let sources = [
                (CallerKind::Destruct, destruct),
                (CallerKind::Lumpy, lumpy),
                (CallerKind::Svaba, svaba),
                (CallerKind::Gridss, gridss),
            ];
            let config = MatchConfig::multi_way()
                .with_window(window)
                .with_parallel(parallel);
            run_multi(sources, output, config)?
        }
        Commands::Pairwise {
            reference,
            reference_type,
            query,
            query_type,
            output,
            min_dist,
        } => {
            let config = MatchConfig::pairwise()
                .with_window(min_dist)
                .with_parallel(parallel);
            run_pairwise(
                (reference, reference_type),
                (query, query_type),
                output,
                config,
            )?
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn configure_threads(threads: Option<usize>) -> Result<bool> {
    let Some(threads) = threads else {
        return Ok(true);
    };
    if threads == 0 {
        bail!("--threads must be at least 1");
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .context("failed to configure worker threads")?;
    Ok(threads > 1)
}

fn run_multi(
    sources: [(CallerKind, Option<PathBuf>); 4],
    output: PathBuf,
    config: MatchConfig,
) -> Result<()> {
    let mut records: Vec<BreakpointRecord> = Vec::new();
    let mut loaded = 0;
    for (kind, path) in sources {
        let Some(path) = path else {
            continue;
        };
        let calls = load_breakpoints(&path, kind)
            .with_context(|| format!("failed to load {} calls from {}", kind, path.display()))?;
        records.extend(calls.iter().map(BreakpointRecord::qualified_by_caller));
        loaded += 1;
    }
    if loaded < 2 {
        bail!("consensus needs at least two call sets, got {loaded}");
    }

    let table = consensus(&records, config).context("consensus clustering failed")?;
    write_consensus_path(&output, &table)
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!(output = %output.display(), calls = table.len(), "wrote consensus calls");
    Ok(())
}

fn run_pairwise(
    (reference_path, reference_kind): (PathBuf, CallerKind),
    (query_path, query_kind): (PathBuf, CallerKind),
    output: PathBuf,
    config: MatchConfig,
) -> Result<()> {
    let reference = load_breakpoints(&reference_path, reference_kind).with_context(|| {
        format!("failed to load reference from {}", reference_path.display())
    })?;
    let query = load_breakpoints(&query_path, query_kind)
        .with_context(|| format!("failed to load query from {}", query_path.display()))?;

    let table = match_pairs(&reference, &query, config).context("pairwise matching failed")?;
    write_pairs_path(&output, &table)
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!(output = %output.display(), pairs = table.len(), "wrote breakpoint pairs");
    Ok(())
}
