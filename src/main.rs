use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use lemmatch::index::slow;
use lemmatch::utils::progress::spinner;
use lemmatch::utils::{AppConfig, get_config_path};
use lemmatch::{
    CollectVisitor, ExactIndex, MatchRecord, MatchSet, RadixMatcher, ShardedConfig, ShardedMatcher,
    StencilIndex, StencilModel, SymbolSequence, corpus, logging, output,
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "lemmatch")]
#[command(about = "Find shared runs of symbols across a corpus of token sequences")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print one JSON object per match
    #[arg(long, global = true)]
    json: bool,

    /// Only print match counts per text pair
    #[arg(short, long, global = true)]
    count: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Exact matches of a fixed length, via the online hash index
    Exact {
        /// Corpus file (JSON array of sequences)
        corpus: PathBuf,

        /// Match length (defaults to the configured match_length)
        #[arg(short = 'l', long)]
        length: Option<usize>,
    },
    /// Gapped matches, via the online stencil index
    Stencil {
        corpus: PathBuf,

        /// Sampled positions per pattern
        #[arg(long)]
        size: usize,

        /// Window every pattern spans
        #[arg(long)]
        width: usize,

        /// Compare samples as multisets
        #[arg(long)]
        sorted: bool,
    },
    /// Gapped matches over the whole corpus with the multi-threaded matcher
    Sharded {
        corpus: PathBuf,

        #[arg(long)]
        size: usize,

        #[arg(long)]
        width: usize,

        #[arg(long)]
        sorted: bool,

        /// Worker threads (defaults to the configured workers)
        #[arg(short, long)]
        workers: Option<usize>,
    },
    /// Exact matches via radix sorting of the corpus tape
    Radix {
        corpus: PathBuf,

        /// Match depth (defaults to the configured match_length)
        #[arg(short, long)]
        depth: Option<usize>,
    },
    /// Exact matches by brute force (small corpora only)
    Slow {
        corpus: PathBuf,

        #[arg(short, long)]
        depth: Option<usize>,
    },
    /// Check that the exact, radix and brute-force engines agree
    Verify {
        corpus: PathBuf,

        #[arg(short = 'l', long)]
        length: Option<usize>,
    },
    /// Show the effective configuration
    Config {
        /// Write the current configuration to the config file
        #[arg(long)]
        save: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "using default configuration");
        AppConfig::default()
    });

    let records = match cli.command {
        Commands::Exact { corpus: ref path, length } => {
            let texts = corpus::load(path)?;
            let length = length.unwrap_or(config.match_length);
            run(&cli, "exact", || exact_all(&texts, length))?
        }
        Commands::Stencil {
            corpus: ref path,
            size,
            width,
            sorted,
        } => {
            let texts = corpus::load(path)?;
            let model = StencilModel::gapped(size, width, sorted)
                .with_context(|| format!("Cannot build stencils of {} in {}", size, width))?;
            run(&cli, "stencil", || stencil_all(&texts, model))?
        }
        Commands::Sharded {
            corpus: ref path,
            size,
            width,
            sorted,
            workers,
        } => {
            let texts = corpus::load(path)?;
            let model = StencilModel::gapped(size, width, sorted)
                .with_context(|| format!("Cannot build stencils of {} in {}", size, width))?;
            let mut sharded = ShardedConfig::from(&config);
            if let Some(workers) = workers {
                sharded.workers = workers;
            }
            run(&cli, "sharded", || sharded_all(&texts, &model, sharded))?
        }
        Commands::Radix { corpus: ref path, depth } => {
            let texts = corpus::load(path)?;
            let depth = depth.unwrap_or(config.match_length);
            run(&cli, "radix", || {
                let collect = CollectVisitor::new();
                RadixMatcher::search_sequences(&collect, &texts, depth)?;
                Ok(collect.into_records())
            })?
        }
        Commands::Slow { corpus: ref path, depth } => {
            let texts = corpus::load(path)?;
            let depth = depth.unwrap_or(config.match_length);
            run(&cli, "slow", || {
                let collect = CollectVisitor::new();
                slow::search(&collect, &texts, depth)?;
                Ok(collect.into_records())
            })?
        }
        Commands::Verify { corpus: ref path, length } => {
            let length = length.unwrap_or(config.match_length);
            return verify(path, length);
        }
        Commands::Config { save } => {
            return show_config(&config, save);
        }
    };

    if cli.count {
        output::print_pair_counts(&records, !cli.no_color)?;
    } else if cli.json {
        output::print_json_lines(&records)?;
    } else {
        output::print_matches(&records, !cli.no_color)?;
    }

    Ok(())
}

/// Run one engine under a spinner and return its matches in sorted order
fn run<F>(cli: &Cli, engine: &str, f: F) -> Result<Vec<MatchRecord>>
where
    F: FnOnce() -> lemmatch::Result<Vec<MatchRecord>>,
{
    let start = Instant::now();
    let progress = spinner(format!("Matching with the {} engine...", engine), cli.json);

    let result = f();
    progress.finish_and_clear();
    let mut records = result.with_context(|| format!("{} engine failed", engine))?;

    records.sort();
    info!(
        engine,
        matches = records.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "matching complete"
    );
    Ok(records)
}

/// Index every text, then query every text against the full index
fn exact_all(texts: &[SymbolSequence], length: usize) -> lemmatch::Result<Vec<MatchRecord>> {
    let mut index = ExactIndex::new(length)?;
    for text in texts {
        index.add(text)?;
    }

    let collect = CollectVisitor::new();
    for text in texts {
        index.search(text, &collect);
    }
    Ok(collect.into_records())
}

fn stencil_all(texts: &[SymbolSequence], model: StencilModel) -> lemmatch::Result<Vec<MatchRecord>> {
    let mut index = StencilIndex::new(model);
    for text in texts {
        index.add(text)?;
    }

    let collect = CollectVisitor::new();
    for text in texts {
        index.search(text, &collect);
    }
    Ok(collect.into_records())
}

fn sharded_all(
    texts: &[SymbolSequence],
    model: &StencilModel,
    config: ShardedConfig,
) -> lemmatch::Result<Vec<MatchRecord>> {
    let mut matcher = ShardedMatcher::with_config(config)?;
    let collect = CollectVisitor::new();
    matcher.search(texts, model, &collect)?;
    Ok(collect.into_records())
}

/// Each unordered pair once, from online search-then-add
fn exact_online(texts: &[SymbolSequence], length: usize) -> lemmatch::Result<Vec<MatchRecord>> {
    let mut index = ExactIndex::new(length)?;
    let collect = CollectVisitor::new();
    for text in texts {
        index.search(text, &collect);
        index.add(text)?;
    }
    Ok(collect.into_records())
}

fn verify(path: &Path, length: usize) -> Result<()> {
    let texts = corpus::load(path)?;

    let exact = exact_online(&texts, length)?;

    let radix = CollectVisitor::new();
    RadixMatcher::search_sequences(&radix, &texts, length)?;
    let radix = radix.into_records();

    let brute = CollectVisitor::new();
    slow::search(&brute, &texts, length)?;
    let brute = brute.into_records();

    let reference = MatchSet::from_records(&brute, true);
    let mut failed = false;
    for (name, records) in [("exact", &exact), ("radix", &radix)] {
        let set = MatchSet::from_records(records, true);
        let diff = set.difference(&reference);
        if diff.is_empty() && !set.has_duplicates() {
            println!("{:<6} agrees: {} matches", name, set.total());
            continue;
        }

        failed = true;
        println!("{:<6} DISAGREES: {} differing keys", name, diff.len());
        for ((a, b, oa, ob), mine, theirs) in diff.iter().take(10) {
            println!("  {}:{}  {}:{}  {} vs {}", a, oa, b, ob, mine, theirs);
        }
    }
    println!("{:<6} reference: {} matches", "slow", reference.total());

    if failed {
        bail!("engines disagree on {}", path.display());
    }
    Ok(())
}

fn show_config(config: &AppConfig, save: bool) -> Result<()> {
    let path = get_config_path()?;
    if save {
        config.save()?;
        println!("Saved {}", path.display());
    } else {
        println!("Config file: {}", path.display());
    }

    println!("{}", serde_json::to_string_pretty(config).context("Failed to serialize config")?);
    println!("Effective workers: {}", config.effective_workers());
    Ok(())
}
