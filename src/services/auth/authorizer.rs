use std::sync::Arc;

use tracing::{debug, error};

use crate::context::RepoCtx;
use crate::error::LfsError;
use crate::models::{AccessMode, AccessModeOptions};
use crate::stores::{PermsStore, ReposStore, Stores, UsersStore};

/// Resolves `/{username}/{reponame}` and checks the caller holds `required` on it.
///
/// Every negative outcome is `LfsError::NotFound`, so an unauthorized caller
/// cannot tell a private repository from a missing one.
#[derive(Clone)]
pub struct AccessAuthorizer {
    users: Arc<dyn UsersStore>,
    repos: Arc<dyn ReposStore>,
    perms: Arc<dyn PermsStore>,
}

impl AccessAuthorizer {
    pub fn new(
        users: Arc<dyn UsersStore>,
        repos: Arc<dyn ReposStore>,
        perms: Arc<dyn PermsStore>,
    ) -> Self {
        Self {
            users,
            repos,
            perms,
        }
    }

    pub fn from_stores(stores: &Stores) -> Self {
        Self::new(
            stores.users.clone(),
            stores.repos.clone(),
            stores.perms.clone(),
        )
    }

    pub async fn authorize(
        &self,
        actor_id: i64,
        username: &str,
        reponame: &str,
        required: AccessMode,
    ) -> Result<RepoCtx, LfsError> {
        let reponame = reponame.strip_suffix(".git").unwrap_or(reponame);

        let owner = match self.users.get_by_username(username).await {
            Ok(owner) => owner,
            Err(err) if err.is_not_exist() => return Err(LfsError::NotFound),
            Err(err) => {
                error!(username, error = %err, "lfs: failed to get owner");
                return Err(LfsError::Internal);
            }
        };

        let repo = match self.repos.get_by_name(owner.id, reponame).await {
            Ok(repo) => repo,
            Err(err) if err.is_not_exist() => return Err(LfsError::NotFound),
            Err(err) => {
                error!(username, reponame, error = %err, "lfs: failed to get repository");
                return Err(LfsError::Internal);
            }
        };

        let allowed = self
            .perms
            .authorize(actor_id, repo.id, required, AccessModeOptions::from(&repo))
            .await
            .map_err(|err| {
                error!(actor_id, repo_id = repo.id, error = %err, "lfs: failed to check permission");
                LfsError::Internal
            })?;
        if !allowed {
            return Err(LfsError::NotFound);
        }

        debug!(actor_id, repo = %format!("{}/{}", owner.name, repo.name), %required, "lfs: authorized");
        Ok(RepoCtx { owner, repo })
    }
}
