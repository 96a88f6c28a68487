//! Category queries

use crate::{
    catalog::Catalog,
    categories::{Category, CategoryInfo},
    products::Product,
};

/// Number of categories returned by [`Catalog::category_recommendations`] by default.
pub const DEFAULT_RECOMMENDATIONS: usize = 4;

/// A category together with its (derived) products.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryView<'c> {
    /// Category display information
    pub info: &'c CategoryInfo,

    /// Products listed under the category, in catalog order
    pub products: Vec<&'c Product>,
}

impl CategoryView<'_> {
    /// Category id
    #[must_use]
    pub fn category(&self) -> Category {
        self.info.category
    }

    /// Number of products flagged as popular.
    #[must_use]
    pub fn popular_count(&self) -> usize {
        self.products.iter().filter(|product| product.popular).count()
    }
}

impl Catalog {
    /// Display information for a category.
    #[must_use]
    pub fn category_info(&self, category: Category) -> &CategoryInfo {
        self.categories.get(category)
    }

    /// A category with its products.
    #[must_use]
    pub fn category(&self, category: Category) -> CategoryView<'_> {
        CategoryView {
            info: self.category_info(category),
            products: self.by_category(category),
        }
    }

    /// Every category with its products, in menu order.
    #[must_use]
    pub fn categories(&self) -> Vec<CategoryView<'_>> {
        Category::ALL
            .into_iter()
            .map(|category| self.category(category))
            .collect()
    }

    /// Categories that list at least one product.
    #[must_use]
    pub fn categories_with_products(&self) -> Vec<CategoryView<'_>> {
        self.categories_where(|view| !view.products.is_empty())
    }

    /// Categories with at least one popular product.
    #[must_use]
    pub fn featured_categories(&self) -> Vec<CategoryView<'_>> {
        self.categories_where(|view| view.products.iter().any(|product| product.popular))
    }

    /// Categories with at least one promotional product.
    #[must_use]
    pub fn promotional_categories(&self) -> Vec<CategoryView<'_>> {
        self.categories_where(|view| view.products.iter().any(|product| product.promotional))
    }

    /// Case-insensitive search over category names and descriptions.
    #[must_use]
    pub fn search_categories(&self, term: &str) -> Vec<CategoryView<'_>> {
        let term = term.to_lowercase();

        self.categories_where(|view| view.info.matches_term(&term))
    }

    /// The `limit` categories with the most popular products.
    ///
    /// Ties keep menu order.
    #[must_use]
    pub fn category_recommendations(&self, limit: usize) -> Vec<CategoryView<'_>> {
        let mut views = self.categories();

        // `sort_by` is stable, so equal scores stay in menu order.
        views.sort_by(|a, b| b.popular_count().cmp(&a.popular_count()));
        views.truncate(limit);

        views
    }

    fn categories_where(
        &self,
        predicate: impl Fn(&CategoryView<'_>) -> bool,
    ) -> Vec<CategoryView<'_>> {
        self.categories()
            .into_iter()
            .filter(|view| predicate(view))
            .collect()
    }
}
