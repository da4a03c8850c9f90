//! Multi-threaded stencil matching over a whole corpus.
//!
//! A run has two parallel phases, separated by a join of all workers:
//!
//! 1. **Linking** - workers claim chunks of corpus positions from a shared
//!    cursor. For every pattern that fits inside its text, a worker hashes
//!    the sample and pushes a link onto the bin's chain by swapping the bin
//!    head. Chains are singly-linked lists of integer indices into one flat
//!    link array, so no two workers ever write the same cell apart from the
//!    atomic heads.
//! 2. **Reading** - workers claim chunks of bins, walk each chain, and
//!    report every pair of postings from different texts whose samples are
//!    equal. Each pair is reported in both directions.
//!
//! The link index of a posting is `position * nstencils + stencil`, so both
//! the corpus position and the pattern are recovered from the index alone.

use super::bins::{NBINS, bin_of, window_fits};
use super::stencil::StencilModel;
use crate::error::{MatchError, Result};
use crate::model::SymbolSequence;
use crate::utils::{AppConfig, hash_premixed, premix};
use crate::visitor::{Match, MatchVisitor, Side};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::any::Any;
use std::borrow::Borrow;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, error, info, warn};

pub const DEFAULT_WORKERS: usize = 16;
pub const DEFAULT_CHUNK_SIZE: usize = 16;
pub const DEFAULT_MAX_CHAIN: usize = 1000;

/// Empty chain / end of chain
const NONE: u32 = u32::MAX;

/// Run state of a [`ShardedMatcher`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Linking,
    Reading,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Idle => "idle",
            Phase::Linking => "linking",
            Phase::Reading => "reading",
        })
    }
}

/// Worker pool and work partitioning settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardedConfig {
    /// Threads in the pool
    pub workers: usize,
    /// Positions or bins claimed per cursor bump
    pub chunk_size: usize,
    /// Chains of this length or longer are skipped as degenerate
    pub max_chain: usize,
}

impl Default for ShardedConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_chain: DEFAULT_MAX_CHAIN,
        }
    }
}

impl From<&AppConfig> for ShardedConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            workers: config.effective_workers(),
            chunk_size: config.chunk_size,
            max_chain: config.max_chain,
        }
    }
}

impl ShardedConfig {
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(MatchError::InvalidConfig("at least one worker is required".into()));
        }
        if self.chunk_size == 0 {
            return Err(MatchError::InvalidConfig("chunk size must be positive".into()));
        }
        if self.max_chain < 2 {
            return Err(MatchError::InvalidConfig(format!(
                "max chain {} cannot hold a pair",
                self.max_chain
            )));
        }
        Ok(())
    }
}

/// Counters for one completed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShardedStats {
    pub texts: usize,
    pub symbols: usize,
    /// Links pushed onto bin chains
    pub postings: usize,
    /// Bins whose chain was paired up
    pub bins_read: usize,
    /// Bins skipped for reaching the chain limit
    pub degenerate_bins: usize,
    /// Confirmed pairs; each produced two visitor calls
    pub pairs: usize,
}

/// Corpus-scale stencil matcher owning a fixed worker pool.
///
/// Storage is kept between runs and only grows.
pub struct ShardedMatcher {
    config: ShardedConfig,
    pool: ThreadPool,
    phase: Phase,
    heads: Vec<AtomicU32>,
    links: Vec<AtomicU32>,
    /// Pre-mixed symbol per corpus position
    mixed: Vec<u32>,
    /// Text index per corpus position
    owners: Vec<u32>,
    /// Offset within its text per corpus position
    locals: Vec<u32>,
    cursor: AtomicUsize,
    abort: AtomicBool,
}

impl ShardedMatcher {
    /// Matcher with the default pool size
    pub fn new() -> Result<Self> {
        Self::with_config(ShardedConfig::default())
    }

    pub fn with_config(config: ShardedConfig) -> Result<Self> {
        config.validate()?;

        let pool = ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .thread_name(|i| format!("lemmatch-shard-{}", i))
            .build()
            .map_err(|e| MatchError::ThreadPool(e.to_string()))?;

        Ok(Self {
            config,
            pool,
            phase: Phase::Idle,
            heads: (0..NBINS).map(|_| AtomicU32::new(NONE)).collect(),
            links: Vec::new(),
            mixed: Vec::new(),
            owners: Vec::new(),
            locals: Vec::new(),
            cursor: AtomicUsize::new(0),
            abort: AtomicBool::new(false),
        })
    }

    pub fn workers(&self) -> usize {
        self.config.workers
    }

    pub fn config(&self) -> &ShardedConfig {
        &self.config
    }

    /// Current phase. `Idle` whenever no run is in progress
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Match every text against every other text under `model`.
    ///
    /// The visitor is called from the pool's threads, twice per confirmed
    /// pair (once from each side). All workers are joined before this
    /// returns; if any of them panicked, the run fails with
    /// [`MatchError::WorkerFailed`] and the matches already reported must be
    /// treated as incomplete.
    pub fn search<T, V>(&mut self, texts: &[T], model: &StencilModel, visitor: &V) -> Result<ShardedStats>
    where
        T: Borrow<SymbolSequence> + Sync,
        V: MatchVisitor + Sync + ?Sized,
    {
        let started = Instant::now();
        self.populate(texts, model)?;
        debug!(elapsed_ms = started.elapsed().as_millis() as u64, "populating");

        let mut stats = ShardedStats {
            texts: texts.len(),
            symbols: self.mixed.len(),
            ..ShardedStats::default()
        };

        let result = self
            .run_linking(texts, model, &mut stats)
            .and_then(|()| self.run_reading(texts, model, visitor, &mut stats));
        self.phase = Phase::Idle;
        result?;

        info!(
            texts = stats.texts,
            postings = stats.postings,
            pairs = stats.pairs,
            degenerate_bins = stats.degenerate_bins,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "sharded run complete"
        );
        Ok(stats)
    }

    /// Flatten the corpus and size link storage for this run
    fn populate<T: Borrow<SymbolSequence>>(&mut self, texts: &[T], model: &StencilModel) -> Result<()> {
        if u32::try_from(texts.len()).is_err() {
            return Err(MatchError::TooManyTexts(texts.len()));
        }

        let nsymbols: usize = texts.iter().map(|t| t.borrow().len()).sum();
        let nlinks = nsymbols
            .checked_mul(model.len())
            .filter(|&n| n < NONE as usize)
            .ok_or(MatchError::CorpusTooLarge {
                symbols: nsymbols,
                stencils: model.len(),
            })?;

        self.mixed.clear();
        self.owners.clear();
        self.locals.clear();
        for (itext, text) in texts.iter().enumerate() {
            let symbols = text.borrow().symbols();
            self.mixed.extend(symbols.iter().map(|&s| premix(s)));
            self.owners.extend(std::iter::repeat_n(itext as u32, symbols.len()));
            self.locals.extend(0..symbols.len() as u32);
        }

        // Unreached cells are never read, so the arena only has to grow
        if self.links.len() < nlinks {
            self.links.resize_with(nlinks, || AtomicU32::new(NONE));
        }
        for head in &self.heads {
            head.store(NONE, Ordering::Relaxed);
        }
        Ok(())
    }

    fn run_linking<T>(&mut self, texts: &[T], model: &StencilModel, stats: &mut ShardedStats) -> Result<()>
    where
        T: Borrow<SymbolSequence> + Sync,
    {
        self.phase = Phase::Linking;
        let started = Instant::now();
        let linked = AtomicUsize::new(0);

        let this = &*self;
        this.broadcast(Phase::Linking, |_| {
            let count = this.make_links(texts, model);
            linked.fetch_add(count, Ordering::Relaxed);
        })?;

        stats.postings = linked.into_inner();
        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            postings = stats.postings,
            "linking"
        );
        Ok(())
    }

    fn run_reading<T, V>(
        &mut self,
        texts: &[T],
        model: &StencilModel,
        visitor: &V,
        stats: &mut ShardedStats,
    ) -> Result<()>
    where
        T: Borrow<SymbolSequence> + Sync,
        V: MatchVisitor + Sync + ?Sized,
    {
        self.phase = Phase::Reading;
        let started = Instant::now();
        let bins_read = AtomicUsize::new(0);
        let degenerate = AtomicUsize::new(0);
        let pairs = AtomicUsize::new(0);

        let this = &*self;
        this.broadcast(Phase::Reading, |_| {
            let local = this.read_links(texts, model, visitor);
            bins_read.fetch_add(local.bins_read, Ordering::Relaxed);
            degenerate.fetch_add(local.degenerate_bins, Ordering::Relaxed);
            pairs.fetch_add(local.pairs, Ordering::Relaxed);
        })?;

        stats.bins_read = bins_read.into_inner();
        stats.degenerate_bins = degenerate.into_inner();
        stats.pairs = pairs.into_inner();
        if stats.degenerate_bins > 0 {
            warn!(
                bins = stats.degenerate_bins,
                max_chain = self.config.max_chain,
                "skipped overfull bins"
            );
        }
        debug!(elapsed_ms = started.elapsed().as_millis() as u64, "reading");
        Ok(())
    }

    /// Run `work` once on every pool thread and join them all.
    ///
    /// A panicking worker raises the abort flag so its siblings stop
    /// claiming chunks; the first failure is returned after the join.
    fn broadcast<F>(&self, phase: Phase, work: F) -> Result<()>
    where
        F: Fn(usize) + Sync,
    {
        self.cursor.store(0, Ordering::Relaxed);
        self.abort.store(false, Ordering::Relaxed);

        let outcomes = self.pool.broadcast(|ctx| {
            let worker = ctx.index();
            catch_unwind(AssertUnwindSafe(|| work(worker))).map_err(|payload| {
                self.abort.store(true, Ordering::Relaxed);
                (worker, panic_message(payload.as_ref()))
            })
        });

        let mut failure = None;
        for (worker, message) in outcomes.into_iter().filter_map(|o| o.err()) {
            error!(%phase, worker, %message, "worker failed");
            failure.get_or_insert(MatchError::WorkerFailed {
                phase,
                worker,
                message,
            });
        }
        failure.map_or(Ok(()), Err)
    }

    /// Claim the next chunk of `0..limit`, or `None` when exhausted or aborted
    fn claim(&self, limit: usize) -> Option<std::ops::Range<usize>> {
        if self.abort.load(Ordering::Relaxed) {
            return None;
        }
        let start = self.cursor.fetch_add(self.config.chunk_size, Ordering::Relaxed);
        if start >= limit {
            return None;
        }
        Some(start..(start + self.config.chunk_size).min(limit))
    }

    /// Linking worker body. Returns the number of links pushed
    fn make_links<T: Borrow<SymbolSequence>>(&self, texts: &[T], model: &StencilModel) -> usize {
        let nstencils = model.len();
        let mut buffer = vec![0u32; model.size()];
        let mut linked = 0;

        while let Some(chunk) = self.claim(self.mixed.len()) {
            for pos in chunk {
                let text_len = texts[self.owners[pos] as usize].borrow().len();
                let local = self.locals[pos] as usize;

                for stencil in 0..nstencils {
                    // Samples never straddle two texts
                    if !window_fits(local, model.width(stencil), text_len) {
                        continue;
                    }

                    model.sample(&mut buffer, &self.mixed, pos, stencil);
                    let hash = hash_premixed(&buffer);

                    let link = (pos * nstencils + stencil) as u32;
                    let prev = self.heads[bin_of(hash)].swap(link, Ordering::Relaxed);
                    self.links[link as usize].store(prev, Ordering::Relaxed);
                    linked += 1;
                }
            }
        }
        linked
    }

    /// Reading worker body
    fn read_links<T, V>(&self, texts: &[T], model: &StencilModel, visitor: &V) -> ShardedStats
    where
        T: Borrow<SymbolSequence>,
        V: MatchVisitor + ?Sized,
    {
        let nstencils = model.len();
        let size = model.size();
        let max_chain = self.config.max_chain;

        // (text, offset, width) per chain entry, samples back to back
        let mut chain: Vec<(usize, usize, usize)> = Vec::new();
        let mut samples: Vec<u32> = Vec::new();
        let mut stats = ShardedStats::default();

        while let Some(chunk) = self.claim(NBINS) {
            for bin in chunk {
                chain.clear();
                let mut link = self.heads[bin].load(Ordering::Relaxed);
                while link != NONE && chain.len() < max_chain {
                    let pos = link as usize / nstencils;
                    let stencil = link as usize % nstencils;
                    let itext = self.owners[pos] as usize;
                    let local = self.locals[pos] as usize;

                    let slot = chain.len() * size;
                    if samples.len() < slot + size {
                        samples.resize(slot + size, 0);
                    }
                    let text = texts[itext].borrow();
                    model.sample(&mut samples[slot..slot + size], text.symbols(), local, stencil);
                    chain.push((itext, local, model.width(stencil)));

                    link = self.links[link as usize].load(Ordering::Relaxed);
                }

                if chain.len() < 2 {
                    continue;
                }
                if chain.len() >= max_chain {
                    stats.degenerate_bins += 1;
                    continue;
                }
                stats.bins_read += 1;

                for (i1, &(itext1, local1, width1)) in chain.iter().enumerate() {
                    let sample1 = &samples[i1 * size..(i1 + 1) * size];
                    let text1 = texts[itext1].borrow();

                    for (i2, &(itext2, local2, width2)) in chain.iter().enumerate().skip(i1 + 1) {
                        let text2 = texts[itext2].borrow();
                        if itext1 == itext2 || text1 == text2 {
                            continue;
                        }

                        let sample2 = &samples[i2 * size..(i2 + 1) * size];
                        if sample1[0] != sample2[0] || sample1[size - 1] != sample2[size - 1] {
                            continue;
                        }
                        // A shared bin can still hold a colliding sample
                        if sample1 != sample2 {
                            continue;
                        }

                        let m = Match::new(
                            Side::new(text1, local1, width1),
                            Side::new(text2, local2, width2),
                        );
                        visitor.matched(&m);
                        visitor.matched(&m.inverted());
                        stats.pairs += 1;
                    }
                }
            }
        }
        stats
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}
