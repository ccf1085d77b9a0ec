use std::sync::Arc;
use std::time::Duration;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{debounce::Debouncer, models::Alternative, provider::DataProvider};

/// Free-text matching over listing names and descriptions
pub struct SearchMatcher;

impl SearchMatcher {
    /// Case-insensitive substring match; a blank query matches nothing
    pub fn matches(item: &Alternative, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }
        item.name.to_lowercase().contains(&needle)
            || item.description.to_lowercase().contains(&needle)
    }

    /// Unranked: matching items in their original order
    pub fn filter(items: &[Alternative], query: &str) -> Vec<Alternative> {
        items
            .iter()
            .filter(|item| Self::matches(item, query))
            .cloned()
            .collect()
    }

    /// Ranked: every item, best fuzzy match first
    ///
    /// Name hits count double. Items with no fuzzy score keep their relative
    /// order at the end - the source already decided they match somehow.
    pub fn rank(items: &[Alternative], query: &str) -> Vec<Alternative> {
        let query = query.trim();
        if query.is_empty() {
            return items.to_vec();
        }

        let matcher = SkimMatcherV2::default().ignore_case();
        let mut scored: Vec<(i64, &Alternative)> = items
            .iter()
            .map(|item| {
                let name = matcher.fuzzy_match(&item.name, query).unwrap_or(0) * 2;
                let description = matcher.fuzzy_match(&item.description, query).unwrap_or(0);
                (name + description, item)
            })
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, item)| item.clone()).collect()
    }
}

/// What the latest search produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
    pub generation: u64,
    pub query: String,
    pub results: Vec<Alternative>,
    /// Something the user should be told, e.g. that the search failed
    pub notice: Option<String>,
}

/// Search-as-you-type over a DataProvider
///
/// `input` is called per keystroke and debounced; `submit` runs right away
/// and cancels any pending keystroke search. Outcomes are published on a
/// watch channel, and only the newest generation is ever published.
pub struct DebouncedSearch {
    provider: Arc<dyn DataProvider>,
    debouncer: Debouncer,
    ranked: bool,
    tx: Arc<watch::Sender<SearchOutcome>>,
}

impl DebouncedSearch {
    pub fn new(provider: Arc<dyn DataProvider>, delay: Duration) -> Self {
        let (tx, _rx) = watch::channel(SearchOutcome::default());
        Self {
            provider,
            debouncer: Debouncer::new(delay),
            ranked: false,
            tx: Arc::new(tx),
        }
    }

    pub fn ranked(mut self, ranked: bool) -> Self {
        self.ranked = ranked;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchOutcome> {
        self.tx.subscribe()
    }

    pub fn latest(&self) -> SearchOutcome {
        self.tx.borrow().clone()
    }

    /// Keystroke entry point; returns the generation the call was issued as
    pub fn input(&self, query: &str) -> u64 {
        let query = query.trim().to_string();

        if query.is_empty() {
            let generation = self.debouncer.begin();
            self.tx.send_replace(SearchOutcome {
                generation: generation.value(),
                ..SearchOutcome::default()
            });
            return generation.value();
        }

        let provider = Arc::clone(&self.provider);
        let tx = Arc::clone(&self.tx);
        let ranked = self.ranked;

        let generation = self.debouncer.schedule(move |generation| async move {
            let outcome = run_query(provider.as_ref(), &query, ranked, generation.value()).await;
            if generation.is_current() {
                tx.send_replace(outcome);
            } else {
                debug!("Dropping stale results for '{}'", query);
            }
        });

        generation.value()
    }

    /// Enter-key entry point: no waiting, and no late keystroke search afterwards
    pub async fn submit(&self, query: &str) -> SearchOutcome {
        let generation = self.debouncer.begin();
        let query = query.trim();

        let outcome = if query.is_empty() {
            SearchOutcome {
                generation: generation.value(),
                ..SearchOutcome::default()
            }
        } else {
            run_query(self.provider.as_ref(), query, self.ranked, generation.value()).await
        };

        if generation.is_current() {
            self.tx.send_replace(outcome.clone());
        }
        outcome
    }

    pub fn cancel(&self) {
        self.debouncer.cancel();
    }
}

async fn run_query(
    provider: &dyn DataProvider,
    query: &str,
    ranked: bool,
    generation: u64,
) -> SearchOutcome {
    debug!("Searching for '{}' (generation {})", query, generation);

    match provider.search(query).await {
        Ok(results) => {
            let results = if ranked {
                SearchMatcher::rank(&results, query)
            } else {
                results
            };
            SearchOutcome {
                generation,
                query: query.to_string(),
                results,
                notice: None,
            }
        }
        Err(e) => {
            warn!("Search for '{}' failed: {}", query, e);
            SearchOutcome {
                generation,
                query: query.to_string(),
                results: Vec::new(),
                notice: Some(format!("Search failed: {}", e)),
            }
        }
    }
}
