use std::io::ErrorKind;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::dirs::Dirs;

#[derive(Serialize, Deserialize)]
pub struct Settings {
    #[serde(with = "crate::ser::hex")]
    pub key: [u8; 64],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            key: crate::cookies::generate_key(),
        }
    }
}

/// Load the settings, creating and persisting fresh defaults on first start.
pub async fn load(dirs: &Dirs) -> Result<Settings> {
    let buf = match fs::read(dirs.settings_file()).await {
        Ok(buf) => buf,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let settings = Settings::default();
            save(dirs, &settings)
                .await
                .context("failed saving default settings")?;
            return Ok(settings);
        }
        Err(e) => return Err(e).context("failed loading settings"),
    };

    serde_json::from_slice(&buf).context("failed parsing settings")
}

async fn save(dirs: &Dirs, settings: &Settings) -> Result<()> {
    fs::create_dir_all(dirs.data_dir()).await?;

    let real_file = dirs.settings_file();
    let temp_file = dirs.settings_temp_file();

    let buf = serde_json::to_vec_pretty(settings)?;
    fs::write(&temp_file, &buf).await?;
    fs::rename(temp_file, real_file).await?;

    Ok(())
}
