//! One-time index construction and the search entry point.
//!
//! The engine moves `Uninitialized → Building → Ready`, or `Building → Failed`.
//! Only the first caller of [`SearchEngine::initialize`] builds; concurrent
//! callers block until that build finishes and then see the same outcome. A
//! failed engine never retries: construct a new one from a fresh snapshot. A
//! build that panics leaves the engine `Failed` with [`BuildError::Interrupted`].

use crate::error::{BuildError, SearchError};
use crate::index::Index;
use crate::item::CatalogRecord;
use crate::request::{SearchRequest, SearchResponse};
use crate::tokenizer::Tokenizer;
use parking_lot::{Condvar, Mutex};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineStatus {
    Uninitialized,
    Building,
    Ready,
    Failed,
}

enum State {
    Uninitialized { records: Vec<CatalogRecord>, tokenizer: Tokenizer },
    Building,
    Ready(Arc<Index>),
    Failed(BuildError),
}

pub struct SearchEngine {
    state: Mutex<State>,
    built: Condvar,
}

impl SearchEngine {
    /// An engine over a corpus snapshot. Nothing is built until
    /// [`initialize`](Self::initialize) or the first search.
    pub fn new(records: Vec<CatalogRecord>, tokenizer: Tokenizer) -> Self {
        Self {
            state: Mutex::new(State::Uninitialized { records, tokenizer }),
            built: Condvar::new(),
        }
    }

    /// An engine whose build already failed, e.g. because the catalog schema
    /// has no title column. Every search reports `err`.
    pub fn failed(err: BuildError) -> Self {
        Self { state: Mutex::new(State::Failed(err)), built: Condvar::new() }
    }

    /// An engine around an index that is already built.
    pub fn from_index(index: Index) -> Self {
        Self { state: Mutex::new(State::Ready(Arc::new(index))), built: Condvar::new() }
    }

    pub fn status(&self) -> EngineStatus {
        match &*self.state.lock() {
            State::Uninitialized { .. } => EngineStatus::Uninitialized,
            State::Building => EngineStatus::Building,
            State::Ready(_) => EngineStatus::Ready,
            State::Failed(_) => EngineStatus::Failed,
        }
    }

    /// The built index, if the engine is ready.
    pub fn index(&self) -> Option<Arc<Index>> {
        match &*self.state.lock() {
            State::Ready(index) => Some(Arc::clone(index)),
            _ => None,
        }
    }

    /// Build the index if nobody has yet, otherwise wait for or return the
    /// outcome of the build that already ran.
    pub fn initialize(&self) -> Result<Arc<Index>, BuildError> {
        self.initialize_with(Index::build)
    }

    fn initialize_with<F>(&self, build: F) -> Result<Arc<Index>, BuildError>
    where
        F: FnOnce(Vec<CatalogRecord>, Tokenizer) -> Result<Index, BuildError>,
    {
        let mut state = self.state.lock();
        let (records, tokenizer) = loop {
            match std::mem::replace(&mut *state, State::Building) {
                State::Uninitialized { records, tokenizer } => break (records, tokenizer),
                State::Building => self.built.wait(&mut state),
                State::Ready(index) => {
                    *state = State::Ready(Arc::clone(&index));
                    return Ok(index);
                }
                State::Failed(err) => {
                    *state = State::Failed(err.clone());
                    return Err(err);
                }
            }
        };
        drop(state);

        let _guard = BuildGuard { engine: self };
        tracing::info!(records = records.len(), "building index");
        let outcome = build(records, tokenizer).map(Arc::new);

        let mut state = self.state.lock();
        *state = match &outcome {
            Ok(index) => State::Ready(Arc::clone(index)),
            Err(err) => {
                tracing::warn!(error = %err, "index build failed");
                State::Failed(err.clone())
            }
        };
        drop(state);
        outcome
    }

    /// Validate `request` and run it against the index, building it first if needed.
    pub fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        let index = self.initialize()?;
        let parsed = request.parse()?;
        Ok(index.search(&parsed.query, &parsed.filters, parsed.options))
    }
}

/// Wakes waiters when a build ends, and marks the engine failed if the build
/// unwound before storing its outcome.
struct BuildGuard<'a> {
    engine: &'a SearchEngine,
}

impl Drop for BuildGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.engine.state.lock();
        if matches!(*state, State::Building) {
            tracing::error!("index build panicked");
            *state = State::Failed(BuildError::Interrupted);
        }
        drop(state);
        self.engine.built.notify_all();
    }
}
