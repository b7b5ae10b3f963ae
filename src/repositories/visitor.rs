use std::{
    collections::BTreeMap,
    io::ErrorKind,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use tokio::{fs, sync::Mutex};
use tracing::debug;

use crate::{dirs::Dirs, models::VisitorRecord};

type Visitors = BTreeMap<String, VisitorRecord>;

/// Registry of every nickname that reached the welcome page.
pub struct VisitorRepository {
    dirs: Arc<Dirs>,
    write: Mutex<()>,
}

impl VisitorRepository {
    pub fn new(dirs: Arc<Dirs>) -> Self {
        Self {
            dirs,
            write: Mutex::new(()),
        }
    }

    /// Record a visit of `nickname`, creating its record on first sight.
    pub async fn store_user(&self, nickname: &str) -> Result<()> {
        let _guard = self.write.lock().await;

        let mut visitors = self.load_all().await?;
        let record = visitors.entry(nickname.to_owned()).or_default();
        record.visits += 1;
        record.last_seen = unix_now();

        debug!(nickname, visits = record.visits, "stored visitor");

        self.save_all(&visitors).await
    }

    #[cfg(test)]
    pub async fn load(&self, nickname: &str) -> Result<Option<VisitorRecord>> {
        Ok(self.load_all().await?.remove(nickname))
    }

    async fn load_all(&self) -> Result<Visitors> {
        match fs::read(self.dirs.visitors_file()).await {
            Ok(buf) => serde_json::from_slice(&buf).context("failed parsing visitors"),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Visitors::default()),
            Err(e) => Err(e).context("failed loading visitors"),
        }
    }

    async fn save_all(&self, visitors: &Visitors) -> Result<()> {
        fs::create_dir_all(self.dirs.data_dir()).await?;

        let real_file = self.dirs.visitors_file();
        let temp_file = self.dirs.visitors_temp_file();

        let buf = serde_json::to_vec_pretty(visitors)?;
        fs::write(&temp_file, &buf).await?;
        fs::rename(temp_file, real_file).await?;

        Ok(())
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
