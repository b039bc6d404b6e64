//! User profile context strategy.
//!
//! Surfaces the consolidated user profile as a facet listing. When no
//! consolidation has run yet the strategy degrades to Empty so the tier
//! falls back to recent-turns-only behavior instead of failing.

use async_trait::async_trait;
use recall_core::{ContextSection, StoreSet};
use tracing::debug;

use super::strategy::{ContextRequest, ContextStrategy};

/// Strategy rendering the consolidated user profile.
#[derive(Debug, Clone, Default)]
pub struct ProfileFacetsStrategy;

impl ProfileFacetsStrategy {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ContextStrategy for ProfileFacetsStrategy {
    fn name(&self) -> &'static str {
        "profile_facets"
    }

    async fn build_context(
        &self,
        stores: &StoreSet,
        request: &ContextRequest,
    ) -> Result<ContextSection, anyhow::Error> {
        let profile = stores.profiles.load(&request.user_id).await?;

        match profile {
            Some(profile) if !profile.is_empty() => {
                debug!(
                    user_id = %request.user_id,
                    fact_count = profile.fact_count(),
                    "ProfileFacetsStrategy: rendering profile"
                );
                Ok(ContextSection::Profile(profile.render()))
            }
            _ => {
                debug!(
                    user_id = %request.user_id,
                    "ProfileFacetsStrategy: no profile yet, returning Empty"
                );
                Ok(ContextSection::Empty)
            }
        }
    }
}
