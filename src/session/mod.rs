//! File-backed session store
//!
//! Each session holds one structured resume, the last gap report and the
//! additions accepted so far. Sessions live as pretty-printed JSON files named
//! `<id>.json` under the store directory. The analysis components never see the
//! store; callers load a session and pass plain values into them.

use crate::error::{Result, ResumeTailorError};
use crate::processing::composer::Addition;
use crate::processing::document::StructuredResume;
use crate::processing::gap_analyzer::GapReport;
use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static SESSION_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub created_at: DateTime<Utc>,
    /// File name the resume was loaded from
    pub source_name: String,
    pub resume: StructuredResume,
    pub gap_report: Option<GapReport>,
    pub additions: Vec<Addition>,
}

impl Session {
    pub fn is_expired(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        now - self.created_at > max_age
    }
}

pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Open the store, creating its directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn create(
        &self,
        source_name: impl Into<String>,
        resume: StructuredResume,
        gap_report: Option<GapReport>,
    ) -> Result<Session> {
        let session = Session {
            id: next_session_id(),
            created_at: Utc::now(),
            source_name: source_name.into(),
            resume,
            gap_report,
            additions: Vec::new(),
        };
        self.save(&session)?;
        info!("Created session {}", session.id);
        Ok(session)
    }

    pub fn load(&self, id: &str) -> Result<Session> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Err(ResumeTailorError::SessionNotFound(id.to_string()));
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the session, replacing any previous version
    pub fn save(&self, session: &Session) -> Result<()> {
        let path = self.path_for(&session.id)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(session)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    pub fn add_addition(&self, id: &str, addition: Addition) -> Result<Session> {
        let mut session = self.load(id)?;
        session.additions.push(addition);
        self.save(&session)?;
        Ok(session)
    }

    pub fn clear_additions(&self, id: &str) -> Result<Session> {
        let mut session = self.load(id)?;
        session.additions.clear();
        self.save(&session)?;
        Ok(session)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Err(ResumeTailorError::SessionNotFound(id.to_string()));
        }
        fs::remove_file(path)?;
        info!("Deleted session {}", id);
        Ok(())
    }

    /// Ids of all stored sessions, oldest first
    pub fn list(&self) -> Result<Vec<String>> {
        let mut ids: Vec<String> = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                if let Some(stem) = path.file_stem() {
                    ids.push(stem.to_string_lossy().to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Remove sessions older than `max_age`, returning how many were removed
    pub fn purge_expired(&self, max_age: Duration) -> Result<usize> {
        let now = Utc::now();
        let mut removed = 0;

        for id in self.list()? {
            match self.load(&id) {
                Ok(session) if session.is_expired(max_age, now) => {
                    self.delete(&id)?;
                    removed += 1;
                }
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable session {}: {}", id, e),
            }
        }

        Ok(removed)
    }

    fn path_for(&self, id: &str) -> Result<PathBuf> {
        let valid = !id.is_empty()
            && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(ResumeTailorError::InvalidInput(format!("Invalid session id: {:?}", id)));
        }
        Ok(self.dir.join(format!("{}.json", id)))
    }
}

/// UTC timestamp with nanoseconds plus a process-wide counter
fn next_session_id() -> String {
    let counter = SESSION_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}-{:04}", Utc::now().format("%Y%m%dT%H%M%S%9fZ"), counter % 10_000)
}
