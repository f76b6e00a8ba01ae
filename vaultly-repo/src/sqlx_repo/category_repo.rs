use crate::category_repo::CategoryRepoError::{CategoryAlreadyExists, CategoryNotFound};
use crate::category_repo::{Category, CategoryRepo, CategoryRepoError, NewCategory};
use crate::sqlx_repo::SqlxRepo;
use crate::transaction_repo::TransactionType;
use anyhow::Context;
use async_trait::async_trait;
use sqlx::{query_as, QueryBuilder};
use tracing::instrument;

const CATEGORY_COLUMNS: &str = "id, name, category_type, color, icon, description";

#[derive(sqlx::FromRow)]
struct CategoryEntry {
    id: i32,
    name: String,
    category_type: TransactionType,
    color: String,
    icon: String,
    description: Option<String>,
}

impl From<CategoryEntry> for Category {
    fn from(value: CategoryEntry) -> Self {
        Category::new(
            value.id,
            value.name,
            value.category_type,
            value.color,
            value.icon,
            value.description,
        )
    }
}

#[async_trait]
impl CategoryRepo for SqlxRepo {
    #[instrument(skip(self))]
    async fn get_category(
        &self,
        user: &str,
        category_id: i32,
    ) -> Result<Category, CategoryRepoError> {
        let entry: Option<CategoryEntry> = query_as(&format!(
            "SELECT {} FROM categories WHERE id = $1 AND user_id = $2",
            CATEGORY_COLUMNS
        ))
        .bind(category_id)
        .bind(user)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to get category {}", category_id))?;
        entry.ok_or(CategoryNotFound(category_id)).map(|c| c.into())
    }

    #[instrument(skip(self))]
    async fn get_all_categories(
        &self,
        user: &str,
        category_type: Option<TransactionType>,
    ) -> Result<Vec<Category>, CategoryRepoError> {
        let mut query_builder = QueryBuilder::new(format!(
            "SELECT {} FROM categories WHERE user_id = ",
            CATEGORY_COLUMNS
        ));
        query_builder.push_bind(user);
        if let Some(category_type) = category_type {
            query_builder
                .push(" AND category_type = ")
                .push_bind(category_type);
        }
        query_builder.push(" ORDER BY name");
        let entries: Vec<CategoryEntry> = query_builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Unable to get categories for user {}", user))?;
        Ok(entries.into_iter().map(|entry| entry.into()).collect())
    }

    #[instrument(skip(self, new_category))]
    async fn create_category(
        &self,
        user: &str,
        new_category: NewCategory,
    ) -> Result<Category, CategoryRepoError> {
        let entry: Option<CategoryEntry> = query_as(&format!(
            "INSERT INTO categories(user_id, name, category_type, color, icon, description) \
             VALUES ($1, $2, $3, $4, $5, $6) ON CONFLICT DO NOTHING RETURNING {}",
            CATEGORY_COLUMNS
        ))
        .bind(user)
        .bind(&new_category.name)
        .bind(new_category.category_type)
        .bind(&new_category.color)
        .bind(&new_category.icon)
        .bind(&new_category.description)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to create category {}", new_category.name))?;
        entry
            .ok_or(CategoryAlreadyExists(new_category.name))
            .map(|c| c.into())
    }

    #[instrument(skip(self, updated_category))]
    async fn update_category(
        &self,
        user: &str,
        category_id: i32,
        updated_category: NewCategory,
    ) -> Result<Category, CategoryRepoError> {
        let result = query_as(&format!(
            "UPDATE categories SET name = $1, category_type = $2, color = $3, icon = $4, \
             description = $5 WHERE user_id = $6 AND id = $7 RETURNING {}",
            CATEGORY_COLUMNS
        ))
        .bind(&updated_category.name)
        .bind(updated_category.category_type)
        .bind(&updated_category.color)
        .bind(&updated_category.icon)
        .bind(&updated_category.description)
        .bind(user)
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await;

        let entry: Option<CategoryEntry> = match result {
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                return Err(CategoryAlreadyExists(updated_category.name));
            }
            other => {
                other.with_context(|| format!("Unable to update category {}", category_id))?
            }
        };
        entry.ok_or(CategoryNotFound(category_id)).map(|c| c.into())
    }

    #[instrument(skip(self))]
    async fn delete_category(
        &self,
        user: &str,
        category_id: i32,
    ) -> Result<Category, CategoryRepoError> {
        let entry: Option<CategoryEntry> = query_as(&format!(
            "DELETE FROM categories WHERE user_id = $1 AND id = $2 RETURNING {}",
            CATEGORY_COLUMNS
        ))
        .bind(user)
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to delete category {}", category_id))?;
        entry.ok_or(CategoryNotFound(category_id)).map(|c| c.into())
    }
}
