use std::env;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use directories_next::ProjectDirs;

const DATA_DIR_ENV: &str = "VOTEBOX_DATA_DIR";

/// Locations of all files the server reads and writes.
pub struct Dirs {
    data_dir: Utf8PathBuf,
}

impl Dirs {
    /// Use the directory from `VOTEBOX_DATA_DIR` if set, otherwise the platform's project data
    /// directory.
    pub fn new() -> Result<Self> {
        if let Some(dir) = env::var_os(DATA_DIR_ENV) {
            let data_dir = Utf8PathBuf::from_path_buf(dir.into())
                .map_err(|_| anyhow::anyhow!("{DATA_DIR_ENV} is not valid UTF-8"))?;

            return Ok(Self::from_base(data_dir));
        }

        let dirs = ProjectDirs::from("rocks", "dnaka91", env!("CARGO_PKG_NAME"))
            .context("failed finding project dirs")?;

        let data_dir = Utf8Path::from_path(dirs.data_dir())
            .context("project data dir is not valid UTF-8")?
            .to_owned();

        Ok(Self::from_base(data_dir))
    }

    pub fn from_base(data_dir: Utf8PathBuf) -> Self {
        Self { data_dir }
    }

    #[inline]
    pub fn data_dir(&self) -> &Utf8Path {
        &self.data_dir
    }

    pub fn settings_file(&self) -> Utf8PathBuf {
        self.data_dir.join("settings.json")
    }

    pub fn settings_temp_file(&self) -> Utf8PathBuf {
        self.data_dir.join("~settings.json")
    }

    pub fn visitors_file(&self) -> Utf8PathBuf {
        self.data_dir.join("visitors.json")
    }

    pub fn visitors_temp_file(&self) -> Utf8PathBuf {
        self.data_dir.join("~visitors.json")
    }

    pub fn users_dir(&self) -> Utf8PathBuf {
        self.data_dir.join("users")
    }

    pub fn user_dir(&self, user: &str) -> Utf8PathBuf {
        self.users_dir().join(user)
    }

    pub fn user_info_file(&self, user: &str) -> Utf8PathBuf {
        self.user_dir(user).join("user.json")
    }

    pub fn user_tokens_file(&self, user: &str) -> Utf8PathBuf {
        self.user_dir(user).join("tokens.json")
    }

    pub fn user_tokens_temp_file(&self, user: &str) -> Utf8PathBuf {
        self.user_dir(user).join("~tokens.json")
    }

    /// Fresh, not yet existing data directory below the system temp dir.
    #[cfg(test)]
    pub fn temp() -> Self {
        let dir = env::temp_dir().join(format!("votebox-test-{}", uuid::Uuid::new_v4()));
        Self::from_base(Utf8PathBuf::from_path_buf(dir).unwrap())
    }
}
