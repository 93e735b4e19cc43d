use serde::{Deserialize, Serialize};

const AVATAR_BASE_URL: &str = "https://api.dicebear.com/7.x/avataaars/svg?seed=";

/// Account entity - a registered user's stored credentials and profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Whatever the configured password service produced; plaintext by default.
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Account {
    /// Create a new account with an avatar derived from the name.
    pub fn new(id: String, name: String, email: String, password: String) -> Self {
        let avatar = Some(avatar_url(&name));
        Self {
            id,
            name,
            email,
            password,
            bio: None,
            avatar,
        }
    }

    /// Password-stripped projection.
    pub fn session(&self) -> Session {
        Session::from(self)
    }
}

/// The currently authenticated identity: an account without its password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl From<&Account> for Session {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            name: account.name.clone(),
            email: account.email.clone(),
            bio: account.bio.clone(),
            avatar: account.avatar.clone(),
        }
    }
}

/// Deterministic avatar URL for a display name.
pub fn avatar_url(name: &str) -> String {
    format!("{AVATAR_BASE_URL}{name}")
}
