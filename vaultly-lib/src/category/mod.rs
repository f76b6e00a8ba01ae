use actix_web::{web, Scope};
use vaultly_repo::category_repo::NewCategory;
use vaultly_repo::transaction_repo::TransactionType::{Expense, Income};

pub mod handlers;

pub fn category_service() -> Scope {
    web::scope("/categories")
        .service(handlers::seed_categories)
        .service(handlers::get_all_categories)
        .service(handlers::create_category)
        .service(handlers::update_category)
        .service(handlers::delete_category)
}

/// The starter set installed for a fresh account. Colors and icons line up
/// with the dashboard's palette and Material Symbols names.
pub fn default_categories() -> Vec<NewCategory> {
    vec![
        NewCategory::new("Salary".to_owned(), Income, "#36e27b".to_owned(), "payments".to_owned(), None),
        NewCategory::new("Freelance".to_owned(), Income, "#4ade80".to_owned(), "work".to_owned(), None),
        NewCategory::new("Investments".to_owned(), Income, "#22d3ee".to_owned(), "trending_up".to_owned(), None),
        NewCategory::new("Other Income".to_owned(), Income, "#a3e635".to_owned(), "savings".to_owned(), None),
        NewCategory::new("Food & Dining".to_owned(), Expense, "#f87171".to_owned(), "restaurant".to_owned(), None),
        NewCategory::new("Transportation".to_owned(), Expense, "#fb923c".to_owned(), "directions_car".to_owned(), None),
        NewCategory::new("Housing".to_owned(), Expense, "#facc15".to_owned(), "home".to_owned(), None),
        NewCategory::new("Utilities".to_owned(), Expense, "#38bdf8".to_owned(), "bolt".to_owned(), None),
        NewCategory::new("Entertainment".to_owned(), Expense, "#c084fc".to_owned(), "movie".to_owned(), None),
        NewCategory::new("Shopping".to_owned(), Expense, "#f472b6".to_owned(), "shopping_bag".to_owned(), None),
        NewCategory::new("Health".to_owned(), Expense, "#34d399".to_owned(), "favorite".to_owned(), None),
        NewCategory::new("Other Expense".to_owned(), Expense, "#94a3b8".to_owned(), "category".to_owned(), None),
    ]
}
