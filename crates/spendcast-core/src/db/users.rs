//! User accounts

use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use rand::Rng;
use rusqlite::{params, OptionalExtension};
use tracing::{info, warn};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{User, MIN_PASSWORD_LEN, MIN_USERNAME_LEN};

/// Hash a password with Argon2id and a fresh random salt (PHC string output)
fn hash_password(password: &str) -> Result<String> {
    let salt_bytes: [u8; 16] = rand::thread_rng().gen();
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| Error::Encryption(format!("Failed to create salt: {}", e)))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Encryption(format!("Failed to hash password: {}", e)))
}

impl Database {
    /// Register a new user
    pub fn create_user(&self, username: &str, password: &str) -> Result<()> {
        let username = username.trim();
        if username.chars().count() < MIN_USERNAME_LEN || password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::InvalidInput(
                "Username must be at least 3 chars and password at least 6 chars.".to_string(),
            ));
        }

        let conn = self.conn()?;
        let exists: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM users WHERE username = ?",
                params![username],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_some() {
            return Err(Error::InvalidInput("Username already exists.".to_string()));
        }

        let hash = hash_password(password)?;
        conn.execute(
            "INSERT INTO users (username, password_hash) VALUES (?, ?)",
            params![username, hash],
        )?;

        info!(user = %username, "User created");
        Ok(())
    }

    /// Check a username/password pair
    ///
    /// Unknown users and unreadable stored hashes both verify as false.
    pub fn verify_user(&self, username: &str, password: &str) -> Result<bool> {
        let conn = self.conn()?;
        let stored: Option<String> = conn
            .query_row(
                "SELECT password_hash FROM users WHERE username = ?",
                params![username.trim()],
                |row| row.get(0),
            )
            .optional()?;

        let Some(stored) = stored else {
            return Ok(false);
        };

        let parsed = match PasswordHash::new(&stored) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(user = %username, "Stored password hash is malformed: {}", e);
                return Ok(false);
            }
        };

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Look up a single user
    pub fn get_user(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT username, created_at FROM users WHERE username = ?",
                params![username.trim()],
                |row| {
                    let created_at: String = row.get(1)?;
                    Ok(User {
                        username: row.get(0)?,
                        created_at: parse_datetime(&created_at),
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    /// List all registered users, oldest first
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT username, created_at FROM users ORDER BY created_at, username")?;

        let users = stmt
            .query_map([], |row| {
                let created_at: String = row.get(1)?;
                Ok(User {
                    username: row.get(0)?,
                    created_at: parse_datetime(&created_at),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(users)
    }
}
