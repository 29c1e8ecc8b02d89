//! Canned bot replies drawn from line-oriented pool files.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use rand::Rng;
use rand::seq::IndexedRandom;
use strum::Display;
use tracing::warn;

/// Which reply pool to draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Pool {
    Normal,
    Profanity,
}

impl Pool {
    /// Reply used when the pool file is missing, unreadable or empty.
    pub fn fallback(self) -> &'static str {
        match self {
            Pool::Normal => "I'm here to help!",
            Pool::Profanity => "Please watch your language!",
        }
    }
}

/// Picks a uniformly random non-empty line from a pool file.
///
/// The file is re-read on every call so edits take effect without a restart.
#[derive(Debug, Clone)]
pub struct ResponseSelector {
    normal: PathBuf,
    profanity: PathBuf,
}

impl ResponseSelector {
    pub fn new(normal: impl Into<PathBuf>, profanity: impl Into<PathBuf>) -> Self {
        Self {
            normal: normal.into(),
            profanity: profanity.into(),
        }
    }

    pub fn path(&self, pool: Pool) -> &Path {
        match pool {
            Pool::Normal => &self.normal,
            Pool::Profanity => &self.profanity,
        }
    }

    /// Trimmed non-empty lines of the pool file; empty if it cannot be read.
    pub async fn candidates(&self, pool: Pool) -> Vec<String> {
        let path = self.path(pool);
        match tokio::fs::read_to_string(path).await {
            Ok(text) => text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_owned)
                .collect(),
            Err(e) => {
                warn!(%pool, path = %path.display(), error = %e, "response pool unavailable");
                Vec::new()
            }
        }
    }

    /// Draw a reply from `pool` using the shared random source.
    pub async fn pick<R: Rng>(&self, pool: Pool, rng: &Mutex<R>) -> String {
        let lines = self.candidates(pool).await;
        let mut rng = rng.lock().unwrap_or_else(PoisonError::into_inner);
        choose(pool, &lines, &mut *rng)
    }
}

/// Uniform choice over `lines`, or the pool's fallback when there are none.
pub fn choose<R: Rng + ?Sized>(pool: Pool, lines: &[String], rng: &mut R) -> String {
    lines
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| pool.fallback().to_owned())
}
