use crate::category_repo::CategoryRepoError::{CategoryAlreadyExists, CategoryNotFound};
use crate::category_repo::{Category, CategoryRepo, CategoryRepoError, NewCategory};
use crate::transaction_repo::TransactionType;
use anyhow::anyhow;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

struct State {
    categories: HashMap<i32, Category>,
    user_categories: HashMap<String, HashSet<i32>>,
    next_id: i32,
}

pub struct MemCategoryRepo {
    state: RwLock<State>,
}

impl MemCategoryRepo {
    pub fn new() -> MemCategoryRepo {
        let state = State {
            categories: HashMap::new(),
            user_categories: HashMap::new(),
            next_id: 1,
        };
        MemCategoryRepo {
            state: RwLock::new(state),
        }
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<State>, anyhow::Error> {
        self.state
            .read()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<State>, anyhow::Error> {
        self.state
            .write()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }
}

impl State {
    fn user_category(&self, user: &str, category_id: i32) -> Option<&Category> {
        let owned = self
            .user_categories
            .get(user)
            .map(|ids| ids.contains(&category_id))
            .unwrap_or(false);
        if owned {
            self.categories.get(&category_id)
        } else {
            None
        }
    }

    fn is_duplicate(&self, user: &str, new_category: &NewCategory, skip_id: Option<i32>) -> bool {
        let Some(ids) = self.user_categories.get(user) else {
            return false;
        };
        ids.iter()
            .filter(|id| Some(**id) != skip_id)
            .filter_map(|id| self.categories.get(id))
            .any(|c| {
                c.name == new_category.name && c.category_type == new_category.category_type
            })
    }
}

#[async_trait]
impl CategoryRepo for MemCategoryRepo {
    async fn get_category(
        &self,
        user: &str,
        category_id: i32,
    ) -> Result<Category, CategoryRepoError> {
        let read_guard = self.read_lock()?;
        read_guard
            .user_category(user, category_id)
            .cloned()
            .ok_or(CategoryNotFound(category_id))
    }

    async fn get_all_categories(
        &self,
        user: &str,
        category_type: Option<TransactionType>,
    ) -> Result<Vec<Category>, CategoryRepoError> {
        let read_guard = self.read_lock()?;

        let Some(category_ids) = read_guard.user_categories.get(user) else {
            return Ok(Vec::new());
        };

        let mut categories: Vec<Category> = category_ids
            .iter()
            .map(|id| {
                read_guard
                    .categories
                    .get(id)
                    .expect("categories should have all the ids from user_categories")
            })
            .filter(|c| category_type.map(|t| c.category_type == t).unwrap_or(true))
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(categories)
    }

    async fn create_category(
        &self,
        user: &str,
        new_category: NewCategory,
    ) -> Result<Category, CategoryRepoError> {
        let mut write_guard = self.write_lock()?;

        if write_guard.is_duplicate(user, &new_category, None) {
            return Err(CategoryAlreadyExists(new_category.name));
        }

        let id = write_guard.next_id;
        write_guard.next_id += 1;

        let category = new_category.to_category(id);
        write_guard.categories.insert(id, category.clone());
        write_guard
            .user_categories
            .entry(user.to_owned())
            .or_insert_with(HashSet::new)
            .insert(id);

        Ok(category)
    }

    async fn update_category(
        &self,
        user: &str,
        category_id: i32,
        updated_category: NewCategory,
    ) -> Result<Category, CategoryRepoError> {
        let mut write_guard = self.write_lock()?;

        if write_guard.user_category(user, category_id).is_none() {
            return Err(CategoryNotFound(category_id));
        }
        if write_guard.is_duplicate(user, &updated_category, Some(category_id)) {
            return Err(CategoryAlreadyExists(updated_category.name));
        }

        let category = updated_category.to_category(category_id);
        write_guard.categories.insert(category_id, category.clone());
        Ok(category)
    }

    async fn delete_category(
        &self,
        user: &str,
        category_id: i32,
    ) -> Result<Category, CategoryRepoError> {
        let mut write_guard = self.write_lock()?;

        if write_guard.user_category(user, category_id).is_none() {
            return Err(CategoryNotFound(category_id));
        }

        let category = write_guard
            .categories
            .remove(&category_id)
            .expect("checked to be present under the write lock");
        write_guard
            .user_categories
            .get_mut(user)
            .expect("ids in categories should be present in user_categories")
            .remove(&category_id);
        Ok(category)
    }
}
