use crate::database::profile_repository::BankProfile;
use crate::database::repository::ProfileStore;
use crate::error::{AppError, DomainError};
use std::sync::Arc;
use tracing::info;

/// Resolves recipient identifiers against the bank profile store.
///
/// Runs before any money moves: a payment is never initiated toward an
/// identifier without a matching profile, and the check repeats at
/// verification time in case the profile disappeared in between.
pub struct RecipientValidator {
    profiles: Arc<dyn ProfileStore>,
}

impl RecipientValidator {
    pub fn new(profiles: Arc<dyn ProfileStore>) -> Self {
        Self { profiles }
    }

    pub async fn resolve(&self, email: &str) -> Result<BankProfile, AppError> {
        let profile = self.profiles.find_by_email(email).await?;

        match profile {
            Some(profile) => Ok(profile),
            None => {
                info!(recipient = %email, "recipient lookup returned no profile");
                Err(AppError::domain(DomainError::RecipientNotFound {
                    email: email.to_string(),
                }))
            }
        }
    }
}
