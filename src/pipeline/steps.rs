use std::sync::Arc;

use async_trait::async_trait;

use super::{PipelineError, SavePipeline, SaveStep};
use crate::database::models::bootcamp::BootcampDraft;
use crate::database::models::user::UserDraft;
use crate::services::geocoder::{GeocodeError, Geocoder};

/// URL slug from a listing name: lowercase, alphanumerics kept, everything
/// else collapsed into single dashes.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// `slug`: derive the URL slug from the bootcamp name.
pub struct SlugStep;

#[async_trait]
impl SaveStep<BootcampDraft> for SlugStep {
    fn name(&self) -> &'static str {
        "slug"
    }

    async fn apply(&self, draft: &mut BootcampDraft) -> Result<(), PipelineError> {
        let slug = slugify(&draft.input.name);
        if slug.is_empty() {
            return Err(PipelineError::Validation(
                "Name must contain at least one alphanumeric character".to_string(),
            ));
        }
        draft.slug = Some(slug);
        Ok(())
    }
}

/// `geocode`: resolve the free-form address into location fields via the
/// geocoding collaborator.
pub struct GeocodeStep {
    geocoder: Arc<Geocoder>,
}

impl GeocodeStep {
    pub fn new(geocoder: Arc<Geocoder>) -> Self {
        Self { geocoder }
    }
}

#[async_trait]
impl SaveStep<BootcampDraft> for GeocodeStep {
    fn name(&self) -> &'static str {
        "geocode"
    }

    async fn apply(&self, draft: &mut BootcampDraft) -> Result<(), PipelineError> {
        match self.geocoder.geocode(&draft.input.address).await {
            Ok(point) => {
                draft.location = Some(point);
                Ok(())
            }
            Err(GeocodeError::NoResult(addr)) => Err(PipelineError::Validation(format!(
                "Could not geocode address: {}",
                addr
            ))),
            Err(other) => Err(PipelineError::Step {
                step: "geocode",
                message: other.to_string(),
            }),
        }
    }
}

/// `hash-password`: enforce the minimum length, then replace the cleartext
/// password with its bcrypt hash.
pub struct HashPasswordStep;

#[async_trait]
impl SaveStep<UserDraft> for HashPasswordStep {
    fn name(&self) -> &'static str {
        "hash-password"
    }

    async fn apply(&self, draft: &mut UserDraft) -> Result<(), PipelineError> {
        if draft.password.len() < 6 {
            return Err(PipelineError::Validation(
                "Password must be at least 6 characters".to_string(),
            ));
        }
        draft.password = crate::auth::hash_password(&draft.password).map_err(|e| {
            PipelineError::Step {
                step: "hash-password",
                message: e.to_string(),
            }
        })?;
        Ok(())
    }
}

/// Steps run before a bootcamp row is written, in order.
pub fn bootcamp_save_pipeline(geocoder: Arc<Geocoder>) -> SavePipeline<BootcampDraft> {
    SavePipeline::new()
        .register(Box::new(SlugStep))
        .register(Box::new(GeocodeStep::new(geocoder)))
}

/// Steps run before a user row is written, in order.
pub fn user_save_pipeline() -> SavePipeline<UserDraft> {
    SavePipeline::new().register(Box::new(HashPasswordStep))
}
