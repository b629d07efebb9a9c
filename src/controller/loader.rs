//! Document loading service
//!
//! The actual decode lives in an external collaborator behind
//! [`DocumentLoader`]. The service runs it on a worker thread fed through
//! flume channels, so the UI thread only ever polls. Every request
//! carries a generation number; when a new source supersedes an
//! in-flight load, the stale completion is recognized by its generation
//! and discarded instead of clobbering the fresh document.

use std::path::{Path, PathBuf};

use flume::{Receiver, Sender};

use crate::error::ViewerError;

/// Opaque identifier the rendering collaborator hands back for a loaded
/// document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DocumentHandle(pub u64);

/// Result of a successful load.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DocumentInfo {
    pub handle: DocumentHandle,
    pub page_count: usize,
    pub page_width: f32,
    pub page_height: f32,
}

impl DocumentInfo {
    /// Page width over height; a degenerate page box becomes square.
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        if self.page_height <= 0.0 || !self.page_height.is_finite() {
            1.0
        } else {
            self.page_width / self.page_height
        }
    }
}

/// The external decode collaborator.
pub trait DocumentLoader: Send + 'static {
    /// Open and measure a document. Failures (bad path, wrong password,
    /// corrupt file) surface verbatim as [`ViewerError::Load`].
    fn load_document(&self, path: &Path, password: &str) -> Result<DocumentInfo, ViewerError>;
}

enum LoadRequest {
    Load {
        generation: u64,
        path: PathBuf,
        password: String,
    },
    Shutdown,
}

/// Completion of a load request, tagged with its generation.
#[derive(Clone, Debug)]
pub enum LoadOutcome {
    Loaded { generation: u64, info: DocumentInfo },
    Failed { generation: u64, error: String },
}

impl LoadOutcome {
    fn generation(&self) -> u64 {
        match self {
            Self::Loaded { generation, .. } | Self::Failed { generation, .. } => *generation,
        }
    }
}

/// Owns the loader worker and the request/response channels.
pub struct LoaderService {
    request_tx: Sender<LoadRequest>,
    outcome_rx: Receiver<LoadOutcome>,
    generation: u64,
}

impl LoaderService {
    /// Spawn the worker thread around a loader collaborator.
    #[must_use]
    pub fn spawn(loader: impl DocumentLoader) -> Self {
        let (request_tx, request_rx) = flume::unbounded();
        let (outcome_tx, outcome_rx) = flume::unbounded();

        std::thread::spawn(move || {
            load_worker(loader, &request_rx, &outcome_tx);
        });

        Self {
            request_tx,
            outcome_rx,
            generation: 0,
        }
    }

    /// Issue a load. Bumping the generation implicitly cancels the
    /// effect of any in-flight request for the previous source.
    pub fn request_load(&mut self, path: &Path, password: &str) -> u64 {
        self.generation += 1;
        let _ = self.request_tx.send(LoadRequest::Load {
            generation: self.generation,
            path: path.to_path_buf(),
            password: password.to_string(),
        });
        self.generation
    }

    #[must_use]
    pub fn current_generation(&self) -> u64 {
        self.generation
    }

    /// Drain completed loads, dropping completions for superseded
    /// generations.
    pub fn poll(&mut self) -> Vec<LoadOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            if outcome.generation() == self.generation {
                outcomes.push(outcome);
            } else {
                log::debug!(
                    "discarding stale load completion (generation {} != {})",
                    outcome.generation(),
                    self.generation
                );
            }
        }
        outcomes
    }

    pub fn shutdown(&self) {
        let _ = self.request_tx.send(LoadRequest::Shutdown);
    }
}

impl Drop for LoaderService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn load_worker(
    loader: impl DocumentLoader,
    request_rx: &Receiver<LoadRequest>,
    outcome_tx: &Sender<LoadOutcome>,
) {
    while let Ok(request) = request_rx.recv() {
        match request {
            LoadRequest::Load {
                generation,
                path,
                password,
            } => {
                log::info!("loading document {}", path.display());
                let outcome = match loader.load_document(&path, &password) {
                    Ok(info) => LoadOutcome::Loaded { generation, info },
                    Err(err) => LoadOutcome::Failed {
                        generation,
                        error: err.to_string(),
                    },
                };
                if outcome_tx.send(outcome).is_err() {
                    break;
                }
            }
            LoadRequest::Shutdown => break,
        }
    }
}
