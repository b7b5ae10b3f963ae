use std::{collections::HashSet, io::ErrorKind};

use anyhow::Result;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use tokio::{
    fs::{self, OpenOptions},
    io::AsyncWriteExt,
};
use uuid::Uuid;

use crate::{dirs::Dirs, models::UserAccount};

/// Accounts and session tokens of the built-in identity provider.
pub struct UserRepository<'a> {
    dirs: &'a Dirs,
    user: &'a str,
}

impl<'a> UserRepository<'a> {
    pub fn for_user(dirs: &'a Dirs, user: &'a str) -> Self {
        Self { dirs, user }
    }

    pub async fn exists(&self) -> bool {
        fs::metadata(self.dirs.user_info_file(self.user))
            .await
            .is_ok()
    }

    /// Create the account, returning `false` if the name is already taken.
    pub async fn create_user(&self, password: &str) -> Result<bool> {
        if self.exists().await {
            return Ok(false);
        }

        let data = serde_json::to_vec_pretty(&UserAccount {
            username: self.user.to_owned(),
            password: hash_password(password)?,
        })?;

        fs::create_dir_all(self.dirs.user_dir(self.user)).await?;

        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.dirs.user_info_file(self.user))
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(e.into()),
        };

        file.write_all(&data).await?;
        file.flush().await?;

        Ok(true)
    }

    pub async fn is_valid_password(&self, password: &str) -> Result<bool> {
        let data = self.load_info().await?;

        verify_password(password, &data.password)
    }

    pub async fn is_valid_token(&self, token: Uuid) -> Result<bool> {
        Ok(self.load_tokens().await?.contains(&token))
    }

    pub async fn add_token(&self, token: Uuid) -> Result<()> {
        self.edit_tokens(|tokens| {
            tokens.insert(token);
        })
        .await
    }

    pub async fn remove_token(&self, token: Uuid) -> Result<()> {
        self.edit_tokens(|tokens| {
            tokens.remove(&token);
        })
        .await
    }

    async fn load_tokens(&self) -> Result<HashSet<Uuid>> {
        match fs::read(self.dirs.user_tokens_file(self.user)).await {
            Ok(buf) => Ok(serde_json::from_slice(&buf)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HashSet::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn edit_tokens(&self, edit: impl FnOnce(&mut HashSet<Uuid>)) -> Result<()> {
        let real_file = self.dirs.user_tokens_file(self.user);
        let temp_file = self.dirs.user_tokens_temp_file(self.user);

        let mut tokens = self.load_tokens().await?;

        edit(&mut tokens);

        let buf = serde_json::to_vec_pretty(&tokens)?;
        fs::write(&temp_file, &buf).await?;
        fs::rename(temp_file, real_file).await?;

        Ok(())
    }

    async fn load_info(&self) -> Result<UserAccount> {
        let data = fs::read(self.dirs.user_info_file(self.user)).await?;
        serde_json::from_slice(&data).map_err(Into::into)
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hasher = Argon2::default();

    Ok(hasher
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let hash = PasswordHash::new(hash)?;
    let hasher = Argon2::default();

    Ok(hasher.verify_password(password.as_bytes(), &hash).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_and_verify() {
        let dirs = Dirs::temp();
        let repo = UserRepository::for_user(&dirs, "Alice");

        assert!(!repo.exists().await);
        assert!(repo.create_user("secret").await.unwrap());
        assert!(repo.exists().await);
        assert!(!repo.create_user("other").await.unwrap());

        assert!(repo.is_valid_password("secret").await.unwrap());
        assert!(!repo.is_valid_password("other").await.unwrap());
    }

    #[tokio::test]
    async fn only_one_of_simultaneous_sign_ups_wins() {
        let dirs = Dirs::temp();
        let first = UserRepository::for_user(&dirs, "Alice");
        let second = UserRepository::for_user(&dirs, "Alice");

        let (a, b) = tokio::join!(first.create_user("first1"), second.create_user("second"));
        let (a, b) = (a.unwrap(), b.unwrap());
        assert!(a ^ b);

        let winner = if a { "first1" } else { "second" };
        assert!(first.is_valid_password(winner).await.unwrap());
    }

    #[tokio::test]
    async fn tokens() {
        let dirs = Dirs::temp();
        let repo = UserRepository::for_user(&dirs, "Alice");
        repo.create_user("secret").await.unwrap();

        let token = Uuid::new_v4();
        assert!(!repo.is_valid_token(token).await.unwrap());

        repo.add_token(token).await.unwrap();
        assert!(repo.is_valid_token(token).await.unwrap());
        assert!(!repo.is_valid_token(Uuid::new_v4()).await.unwrap());

        repo.remove_token(token).await.unwrap();
        assert!(!repo.is_valid_token(token).await.unwrap());
    }
}
