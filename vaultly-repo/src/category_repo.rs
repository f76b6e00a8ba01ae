use crate::transaction_repo::TransactionType;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[async_trait]
pub trait CategoryRepo: Sync + Send {
    async fn get_category(
        &self,
        user: &str,
        category_id: i32,
    ) -> Result<Category, CategoryRepoError>;

    async fn get_all_categories(
        &self,
        user: &str,
        category_type: Option<TransactionType>,
    ) -> Result<Vec<Category>, CategoryRepoError>;

    async fn create_category(
        &self,
        user: &str,
        new_category: NewCategory,
    ) -> Result<Category, CategoryRepoError>;

    async fn update_category(
        &self,
        user: &str,
        category_id: i32,
        updated_category: NewCategory,
    ) -> Result<Category, CategoryRepoError>;

    async fn delete_category(
        &self,
        user: &str,
        category_id: i32,
    ) -> Result<Category, CategoryRepoError>;
}

#[derive(Error, Debug)]
pub enum CategoryRepoError {
    #[error("Category with id {0} not found")]
    CategoryNotFound(i32),
    #[error("Category {0} already exists")]
    CategoryAlreadyExists(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub category_type: TransactionType,
    pub color: String,
    pub icon: String,
    pub description: Option<String>,
}

impl Category {
    pub const fn new(
        id: i32,
        name: String,
        category_type: TransactionType,
        color: String,
        icon: String,
        description: Option<String>,
    ) -> Category {
        Category {
            id,
            name,
            category_type,
            color,
            icon,
            description,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewCategory {
    pub name: String,
    pub category_type: TransactionType,
    pub color: String,
    pub icon: String,
    pub description: Option<String>,
}

impl NewCategory {
    pub const fn new(
        name: String,
        category_type: TransactionType,
        color: String,
        icon: String,
        description: Option<String>,
    ) -> NewCategory {
        NewCategory {
            name,
            category_type,
            color,
            icon,
            description,
        }
    }

    pub fn to_category(self, id: i32) -> Category {
        Category {
            id,
            name: self.name,
            category_type: self.category_type,
            color: self.color,
            icon: self.icon,
            description: self.description,
        }
    }
}
