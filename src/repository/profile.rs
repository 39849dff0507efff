//! Profile storage at `users/{uid}`.

use std::sync::Arc;

use validator::Validate;

use crate::db::{collections, encode, DocumentStore};
use crate::error::AppError;
use crate::models::Profile;

#[derive(Clone)]
pub struct ProfileRepository {
    store: Arc<dyn DocumentStore>,
}

impl ProfileRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Read the profile, if one was ever saved.
    pub async fn get(&self, uid: &str) -> Result<Option<Profile>, AppError> {
        let Some(doc) = self.store.get(collections::USERS, uid).await? else {
            return Ok(None);
        };

        match doc.decode::<Profile>() {
            Ok(profile) => Ok(Some(profile)),
            Err(e) => {
                tracing::warn!(uid, error = %e, "Stored profile is malformed");
                Ok(None)
            }
        }
    }

    /// Validate and fully replace the profile.
    pub async fn save(&self, uid: &str, profile: &Profile) -> Result<(), AppError> {
        profile.validate()?;
        self.store
            .set(collections::USERS, uid, encode(profile)?)
            .await?;
        tracing::info!(uid, "Profile saved");
        Ok(())
    }
}
