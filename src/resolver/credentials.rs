// Copyright (c) 2026 Gantry Contributors
// SPDX-License-Identifier: MIT

//! Credential store collaborator contract.
//!
//! Durable credential storage (the on-disk credential file) lives outside
//! this core; the core only resolves which stored record to attach.
//! Environment variables take precedence over any stored record and are
//! applied by wrapping a store in [`EnvOverrides`].

use serde::{Deserialize, Serialize};

/// Core platform login variables. Both user and password must be set for
/// the override to apply.
pub const ENV_CORE_USER: &str = "GANTRY_USER";
pub const ENV_CORE_PASSWORD: &str = "GANTRY_PASSWORD";
pub const ENV_CORE_HOST: &str = "GANTRY_HOST";

/// Image registry login variables. Both must be set for the override to
/// apply; when they are, they shadow every stored registry record.
pub const ENV_IMAGE_USER: &str = "GANTRY_IMAGE_USER";
pub const ENV_IMAGE_TOKEN: &str = "GANTRY_IMAGE_TOKEN";

const DEFAULT_CORE_HOST: &str = "https://core.gantry.dev";

/// A stored core platform login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreLogin {
    pub user: String,
    pub password: String,
    pub host: String,
}

/// A stored image registry login, matched against image references by
/// prefix (e.g. `ghcr.io/org`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageLogin {
    /// Registry reference prefix this login applies to.
    pub reference: String,
    pub user: String,
    pub token: String,
}

/// Read access to stored credentials.
///
/// `image_logins` returns every known registry record; longest-prefix
/// selection among them is the resolver's job, not the store's.
pub trait CredentialStore: Send + Sync {
    fn core_login(&self, username: &str) -> Option<CoreLogin>;

    fn image_logins(&self) -> Vec<ImageLogin>;
}

/// In-memory credential store for embedding and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    core: Vec<CoreLogin>,
    image: Vec<ImageLogin>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_core_login(&mut self, login: CoreLogin) {
        // Last write for a user wins, matching replace semantics of the
        // durable store this stands in for.
        self.core.retain(|existing| existing.user != login.user);
        self.core.push(login);
    }

    pub fn add_image_login(&mut self, login: ImageLogin) {
        self.image
            .retain(|existing| existing.reference != login.reference);
        self.image.push(login);
    }
}

impl CredentialStore for MemoryStore {
    fn core_login(&self, username: &str) -> Option<CoreLogin> {
        self.core.iter().find(|login| login.user == username).cloned()
    }

    fn image_logins(&self) -> Vec<ImageLogin> {
        self.image.clone()
    }
}

/// Applies environment-variable overrides on top of any underlying store,
/// in fixed priority: explicit core login variables shadow stored core
/// records, and the image login pair shadows every stored registry record.
#[derive(Debug, Clone)]
pub struct EnvOverrides<S> {
    inner: S,
}

impl<S: CredentialStore> EnvOverrides<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: CredentialStore> CredentialStore for EnvOverrides<S> {
    fn core_login(&self, username: &str) -> Option<CoreLogin> {
        let user = std::env::var(ENV_CORE_USER).ok();
        let password = std::env::var(ENV_CORE_PASSWORD).ok();
        if let (Some(user), Some(password)) = (user, password) {
            let host = std::env::var(ENV_CORE_HOST)
                .unwrap_or_else(|_| DEFAULT_CORE_HOST.to_string());
            return Some(CoreLogin {
                user,
                password,
                host,
            });
        }
        self.inner.core_login(username)
    }

    fn image_logins(&self) -> Vec<ImageLogin> {
        let user = std::env::var(ENV_IMAGE_USER).ok();
        let token = std::env::var(ENV_IMAGE_TOKEN).ok();
        if let (Some(user), Some(token)) = (user, token) {
            // The empty prefix matches every image path, so the override
            // wins any longest-prefix selection over an empty record set.
            return vec![ImageLogin {
                reference: String::new(),
                user,
                token,
            }];
        }
        self.inner.image_logins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.add_core_login(CoreLogin {
            user: "alice".to_string(),
            password: "stored-pw".to_string(),
            host: "https://core.internal".to_string(),
        });
        store.add_image_login(ImageLogin {
            reference: "ghcr.io/org".to_string(),
            user: "stored-user".to_string(),
            token: "stored-token".to_string(),
        });
        store
    }

    #[test]
    fn test_memory_store_lookup() {
        let store = stored();
        let login = store.core_login("alice").unwrap();
        assert_eq!(login.password, "stored-pw");
        assert!(store.core_login("bob").is_none());
        assert_eq!(store.image_logins().len(), 1);
    }

    #[test]
    fn test_memory_store_replaces_on_add() {
        let mut store = stored();
        store.add_image_login(ImageLogin {
            reference: "ghcr.io/org".to_string(),
            user: "rotated".to_string(),
            token: "rotated-token".to_string(),
        });
        let logins = store.image_logins();
        assert_eq!(logins.len(), 1);
        assert_eq!(logins[0].user, "rotated");
    }

    #[test]
    fn test_env_overrides_precedence() {
        // Env mutation: covers core and image overrides in one test to
        // avoid interleaving with parallel tests touching the same vars.
        let store = EnvOverrides::new(stored());

        std::env::set_var(ENV_CORE_USER, "env-user");
        std::env::set_var(ENV_CORE_PASSWORD, "env-pw");
        std::env::set_var(ENV_IMAGE_USER, "env-image-user");
        std::env::set_var(ENV_IMAGE_TOKEN, "env-image-token");

        let core = store.core_login("alice").unwrap();
        assert_eq!(core.user, "env-user");
        assert_eq!(core.password, "env-pw");

        let image = store.image_logins();
        assert_eq!(image.len(), 1);
        assert_eq!(image[0].user, "env-image-user");
        assert_eq!(image[0].reference, "");

        std::env::remove_var(ENV_CORE_USER);
        std::env::remove_var(ENV_CORE_PASSWORD);
        std::env::remove_var(ENV_IMAGE_USER);
        std::env::remove_var(ENV_IMAGE_TOKEN);

        let core = store.core_login("alice").unwrap();
        assert_eq!(core.password, "stored-pw");
        assert_eq!(store.image_logins()[0].user, "stored-user");
    }
}
