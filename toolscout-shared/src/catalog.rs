//! Tool catalog administration
//!
//! Create, read, update and delete tools. Deleting a tool also deletes all of
//! its reviews. None of these operations touch `avg_rating`/`review_count`.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::auth::{authorization::require_admin, middleware::AuthContext};
use crate::error::{ServiceError, ServiceResult};
use crate::models::tool::{CreateTool, Tool, UpdateTool};
use crate::reviews::ReviewService;
use crate::store::{CatalogStore, ToolStore};

#[derive(Clone)]
pub struct ToolService {
    store: Arc<dyn CatalogStore>,
    reviews: ReviewService,
}

impl ToolService {
    pub fn new(store: Arc<dyn CatalogStore>, reviews: ReviewService) -> Self {
        Self { store, reviews }
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<Tool> {
        self.store
            .find_tool(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Tool not found"))
    }

    /// Adds a tool with an empty rating
    pub async fn create(&self, actor: &AuthContext, data: CreateTool) -> ServiceResult<Tool> {
        require_admin(actor)?;

        let tool = self.store.create_tool(data).await?;
        info!(tool_id = %tool.id, name = %tool.name, "Tool created");

        Ok(tool)
    }

    /// Writes the fields present in `data`; an empty update is rejected
    pub async fn update(
        &self,
        actor: &AuthContext,
        id: Uuid,
        data: UpdateTool,
    ) -> ServiceResult<Tool> {
        require_admin(actor)?;

        // Existence is checked before emptiness
        self.get(id).await?;

        if data.is_empty() {
            return Err(ServiceError::invalid("No fields to update"));
        }

        let tool = self
            .store
            .update_tool(id, data)
            .await?
            .ok_or_else(|| ServiceError::not_found("Tool not found"))?;
        info!(tool_id = %id, "Tool updated");

        Ok(tool)
    }

    /// Deletes the tool, then every review that references it
    pub async fn delete(&self, actor: &AuthContext, id: Uuid) -> ServiceResult<()> {
        require_admin(actor)?;

        if !self.store.delete_tool(id).await? {
            return Err(ServiceError::not_found("Tool not found"));
        }
        self.reviews.delete_all_for_tool(id).await?;
        info!(tool_id = %id, "Tool deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        pagination::PageRequest,
        review::ReviewFilter,
        tool::PricingModel,
        user::UserRole,
    };
    use crate::reviews::{ModerationDecision, NameJoin};
    use crate::store::InMemoryStore;

    fn ctx(role: UserRole) -> AuthContext {
        AuthContext {
            user_id: Uuid::new_v4(),
            email: "x@example.com".to_string(),
            role,
        }
    }

    fn services() -> (ToolService, ReviewService) {
        let store: Arc<dyn CatalogStore> = Arc::new(InMemoryStore::new());
        let reviews = ReviewService::new(store.clone());
        (ToolService::new(store, reviews.clone()), reviews)
    }

    fn new_tool() -> CreateTool {
        CreateTool {
            name: "Transcriber".to_string(),
            short_description: "Speech to text".to_string(),
            category: "Audio".to_string(),
            pricing_display: "Free + Paid".to_string(),
            pricing_model: PricingModel::FreePlusPaid,
            official_url: None,
            source_url: "https://source.example".to_string(),
            released_ago: "5 days ago".to_string(),
            votes: Some(3),
            rating_seed: None,
            logo_url: None,
        }
    }

    #[tokio::test]
    async fn test_create_starts_unrated() {
        let (tools, _) = services();
        let tool = tools.create(&ctx(UserRole::Admin), new_tool()).await.unwrap();

        assert_eq!(tool.avg_rating, 0.0);
        assert_eq!(tool.review_count, 0);
        assert_eq!(tools.get(tool.id).await.unwrap().name, "Transcriber");
    }

    #[tokio::test]
    async fn test_admin_only() {
        let (tools, _) = services();
        let result = tools.create(&ctx(UserRole::User), new_tool()).await;
        assert!(matches!(result, Err(ServiceError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_update_rules() {
        let (tools, _) = services();
        let admin = ctx(UserRole::Admin);
        let tool = tools.create(&admin, new_tool()).await.unwrap();

        let empty = tools.update(&admin, tool.id, UpdateTool::default()).await;
        assert!(matches!(empty, Err(ServiceError::InvalidArgument(_))));

        let missing = tools
            .update(&admin, Uuid::new_v4(), UpdateTool::default())
            .await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));

        let updated = tools
            .update(
                &admin,
                tool.id,
                UpdateTool {
                    category: Some("Speech".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.category, "Speech");
        assert_eq!(updated.name, "Transcriber");
    }

    #[tokio::test]
    async fn test_delete_cascades_reviews() {
        let (tools, reviews) = services();
        let admin = ctx(UserRole::Admin);
        let tool = tools.create(&admin, new_tool()).await.unwrap();

        for _ in 0..3 {
            let review = reviews
                .create(&ctx(UserRole::User), tool.id, 4, String::new())
                .await
                .unwrap();
            reviews
                .moderate(&admin, review.id, ModerationDecision::Approved, None)
                .await
                .unwrap();
        }

        tools.delete(&admin, tool.id).await.unwrap();

        assert!(matches!(tools.get(tool.id).await, Err(ServiceError::NotFound(_))));
        let page = reviews
            .list(ReviewFilter::by_tool(tool.id), PageRequest::default(), NameJoin::NONE)
            .await
            .unwrap();
        assert!(page.items.is_empty());

        let again = tools.delete(&admin, tool.id).await;
        assert!(matches!(again, Err(ServiceError::NotFound(_))));
    }
}
