use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::error::LfsError;
use crate::models::User;
use crate::services::auth::credentials::{Credentials, hash_token};
use crate::stores::{AccessTokensStore, StoreError, Stores, UsersStore};

/// Turns an `Authorization` header into a `User`.
///
/// - Basic: password first; a 2FA account stops here with `TwoFactorRequired`.
///   Bad credentials fall back to treating the username, then the password, as a token.
/// - Bearer: token only.
#[derive(Clone)]
pub struct CredentialResolver {
    users: Arc<dyn UsersStore>,
    tokens: Arc<dyn AccessTokensStore>,
}

impl CredentialResolver {
    pub fn new(users: Arc<dyn UsersStore>, tokens: Arc<dyn AccessTokensStore>) -> Self {
        Self { users, tokens }
    }

    pub fn from_stores(stores: &Stores) -> Self {
        Self::new(stores.users.clone(), stores.tokens.clone())
    }

    pub async fn resolve(&self, authorization: Option<&str>) -> Result<User, LfsError> {
        let credentials = authorization
            .and_then(Credentials::parse)
            .ok_or(LfsError::CredentialsNeeded)?;

        let user = match credentials {
            Credentials::Basic { username, password } => {
                self.by_password(&username, &password).await?
            }
            Credentials::Bearer(token) => self
                .by_token(&token)
                .await?
                .ok_or(LfsError::CredentialsNeeded)?,
        };

        debug!(user = %user.name, "lfs: authenticated");
        Ok(user)
    }

    async fn by_password(&self, username: &str, password: &str) -> Result<User, LfsError> {
        match self.users.authenticate(username, password).await {
            Ok(user) if user.two_factor_enabled => {
                debug!(user = %user.name, "lfs: password login refused for 2FA account");
                return Err(LfsError::TwoFactorRequired);
            }
            Ok(user) => return Ok(user),
            Err(StoreError::BadCredentials) => {}
            Err(err) => {
                error!(error = %err, "lfs: failed to authenticate user");
                return Err(LfsError::Internal);
            }
        }

        // Git clients put the token in either half of the pair.
        for candidate in [username, password] {
            if candidate.is_empty() {
                continue;
            }
            if let Some(user) = self.by_token(candidate).await? {
                return Ok(user);
            }
        }

        Err(LfsError::CredentialsNeeded)
    }

    /// `Ok(None)` when the token, or the user it belongs to, does not exist.
    async fn by_token(&self, token: &str) -> Result<Option<User>, LfsError> {
        let token = match self.tokens.get_by_sha256(&hash_token(token)).await {
            Ok(token) => token,
            Err(err) if err.is_not_exist() => return Ok(None),
            Err(err) => {
                error!(error = %err, "lfs: failed to look up access token");
                return Err(LfsError::Internal);
            }
        };

        let user = match self.users.get_by_id(token.user_id).await {
            Ok(user) => user,
            Err(err) if err.is_not_exist() => {
                warn!(token_id = token.id, "lfs: access token owner does not exist");
                return Ok(None);
            }
            Err(err) => {
                error!(user_id = token.user_id, error = %err, "lfs: failed to get token owner");
                return Err(LfsError::Internal);
            }
        };

        // only tokens that actually log someone in count as used
        if let Err(err) = self.tokens.touch(token.id).await {
            warn!(token_id = token.id, error = %err, "lfs: failed to touch access token");
        }

        Ok(Some(user))
    }
}
