use std::path::{Path, PathBuf};

use anyhow::Context as _;
use fitbuddy_types::Session;

/// Sessions kept as a JSON array on disk.
#[derive(Clone, Debug)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> anyhow::Result<Vec<Session>> {
        if !self.path.exists() {
            warn!("{} does not exist, starting empty", self.path.display());
            return Ok(Vec::new());
        }

        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        let sessions: Vec<Session> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing {}", self.path.display()))?;

        for (i, session) in sessions.iter().enumerate() {
            session.input().validate().with_context(|| {
                format!(
                    "session #{} ({} on {})",
                    i, session.activity_type, session.session_date
                )
            })?;
        }

        debug!("loaded {} sessions from {}", sessions.len(), self.path.display());
        Ok(sessions)
    }

    pub fn save(&self, sessions: &[Session]) -> anyhow::Result<()> {
        let mut sorted = sessions.to_vec();
        sorted.sort_by_key(|s| s.session_date);

        let json = serde_json::to_string_pretty(&sorted)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("writing {}", self.path.display()))?;

        info!("saved {} sessions to {}", sorted.len(), self.path.display());
        Ok(())
    }

    /// Adds `sessions` to whatever is stored and returns the new total.
    pub fn append(&self, sessions: Vec<Session>) -> anyhow::Result<usize> {
        let mut all = self.load()?;
        all.extend(sessions);
        self.save(&all)?;
        Ok(all.len())
    }
}
