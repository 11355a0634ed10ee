//! Counting words with one engine and reporting what it cost.

use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

use log::info;
use polydict::{DictStats, DictStatsTrait, Dictionary, DictionaryType, DynamicDictionary};

use crate::error::AppError;
use crate::text::TextProcessor;

/// The outcome of counting one text with one engine.
#[derive(Debug, Clone)]
pub struct Report {
    pub stats: DictStats,
    pub total_words: u64,
    pub elapsed: Duration,
    /// Every distinct word with its count, in ascending word order.
    pub words: Vec<(String, u32)>,
}

impl Report {
    pub fn structure(&self) -> DictionaryType {
        self.stats.structure
    }

    pub fn distinct_words(&self) -> usize {
        self.stats.num_entries
    }

    /// The `n` most frequent words, ties broken by word order.
    pub fn top(&self, n: usize) -> Vec<(&str, u32)> {
        let mut ranked: Vec<(&str, u32)> =
            self.words.iter().map(|(w, c)| (w.as_str(), *c)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(n);
        ranked
    }

    pub fn write_to<W: Write>(&self, out: &mut W, top: Option<usize>) -> std::io::Result<()> {
        let stats = &self.stats;
        writeln!(out, "== {} ==", stats.structure)?;
        writeln!(out, "distinct words: {}", stats.num_entries)?;
        writeln!(out, "total words: {}", self.total_words)?;
        writeln!(out, "elapsed: {:?}", self.elapsed)?;
        writeln!(out, "comparisons: {}", stats.comparisons)?;
        if let Some(rotations) = stats.rotations {
            writeln!(out, "rotations: {rotations}")?;
        }
        if let Some(height) = stats.max_height {
            writeln!(out, "height: {height}")?;
        }
        if let Some(collisions) = stats.collisions {
            writeln!(out, "collisions: {collisions}")?;
        }
        if let (Some(size), Some(lf)) = (stats.table_size, stats.load_factor) {
            writeln!(out, "table size: {size}")?;
            writeln!(out, "load factor: {lf:.3}")?;
        }
        writeln!(out)?;

        match top {
            Some(n) => {
                for (word, count) in self.top(n) {
                    writeln!(out, "{word}: {count}")?;
                }
            }
            None => {
                for (word, count) in &self.words {
                    writeln!(out, "{word}: {count}")?;
                }
            }
        }
        writeln!(out)
    }
}

/// Counts every word of `text` in a fresh engine of the given kind.
pub fn count_words(kind: DictionaryType, text: &TextProcessor) -> Result<Report, AppError> {
    let mut dict: DynamicDictionary<String, u32> = DynamicDictionary::new(kind);
    let mut total_words = 0u64;

    let start = Instant::now();
    text.process(|word| {
        *dict.get_or_insert_default(word)? += 1;
        total_words += 1;
        Ok(())
    })?;
    let elapsed = start.elapsed();

    let mut words = Vec::with_capacity(dict.len());
    dict.for_each(|w, c| words.push((w.clone(), *c)));
    if !kind.is_tree() {
        words.sort_unstable();
    }

    info!(
        "{kind}: {} distinct of {total_words} words in {elapsed:?}",
        dict.len()
    );
    Ok(Report {
        stats: dict.get_dict_stats(),
        total_words,
        elapsed,
        words,
    })
}

/// Counts `text` with each of `kinds`, one thread and one dictionary per engine. Reports come
/// back in the order of `kinds`.
pub fn count_words_parallel(
    kinds: &[DictionaryType],
    text: &TextProcessor,
) -> Result<Vec<Report>, AppError> {
    thread::scope(|s| {
        let handles: Vec<_> = kinds
            .iter()
            .map(|kind| (*kind, s.spawn(move || count_words(*kind, text))))
            .collect();

        handles
            .into_iter()
            .map(|(kind, handle)| {
                handle
                    .join()
                    .map_err(|_| AppError::Worker(kind.to_string()))?
            })
            .collect()
    })
}
