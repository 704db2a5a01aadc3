//! Token storage.
//!
//! Reads/writes ~/.config/gdoctable/auth.json (0600 on Unix). The token is
//! an OAuth access token with the documents scope; obtaining it is left to
//! the caller's own tooling.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable consulted before the saved credentials.
pub const TOKEN_ENV: &str = "GDOCTABLE_TOKEN";

/// Authentication credentials stored locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthCredentials {
    /// Bearer token for the Docs API
    pub token: String,
    /// Account label (for display)
    #[serde(default)]
    pub account: Option<String>,
}

impl AuthCredentials {
    pub fn new(token: String) -> Self {
        Self { token, account: None }
    }
}

/// Returns the path to the auth credentials file.
pub fn auth_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|c| c.join("gdoctable/auth.json"))
}

/// Load saved auth credentials from disk.
/// Returns None if no credentials are saved or if the file is invalid.
pub fn load_auth() -> Option<AuthCredentials> {
    load_auth_from(&auth_file_path()?)
}

pub fn load_auth_from(path: &Path) -> Option<AuthCredentials> {
    let contents = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(creds) => Some(creds),
        Err(e) => {
            log::warn!("ignoring unreadable credentials at {}: {}", path.display(), e);
            None
        }
    }
}

/// Save auth credentials to disk.
pub fn save_auth(creds: &AuthCredentials) -> Result<PathBuf, String> {
    let path = auth_file_path().ok_or("Could not determine config directory")?;
    save_auth_to(&path, creds)?;
    Ok(path)
}

/// Creates the parent directory if it doesn't exist. Sets 0600 permissions on Unix.
pub fn save_auth_to(path: &Path, creds: &AuthCredentials) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }

    let contents = serde_json::to_string_pretty(creds)
        .map_err(|e| format!("Failed to serialize credentials: {}", e))?;

    std::fs::write(path, &contents)
        .map_err(|e| format!("Failed to write auth file: {}", e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions)
            .map_err(|e| format!("Failed to set file permissions: {}", e))?;
    }

    Ok(())
}

/// Delete saved auth credentials. Returns whether a file was removed.
pub fn delete_auth() -> Result<bool, String> {
    let Some(path) = auth_file_path() else {
        return Ok(false);
    };
    delete_auth_at(&path)
}

pub fn delete_auth_at(path: &Path) -> Result<bool, String> {
    if !path.exists() {
        return Ok(false);
    }
    std::fs::remove_file(path)
        .map_err(|e| format!("Failed to delete auth file: {}", e))?;
    Ok(true)
}

/// First non-empty token of: explicit value, environment value, saved file.
pub fn resolve_token(explicit: Option<&str>, env: Option<&str>, saved: Option<AuthCredentials>) -> Option<String> {
    [explicit, env]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|t| !t.is_empty())
        .map(String::from)
        .or_else(|| saved.map(|c| c.token).filter(|t| !t.trim().is_empty()))
}
