//! Category Fixtures

use serde::Deserialize;

use crate::{
    categories::{Category, CategoryDetails, CategoryInfo, CategoryMap},
    fixtures::FixtureError,
};

/// Wrapper for categories in YAML
#[derive(Debug, Deserialize)]
pub struct CategoriesFixture {
    /// One entry per category
    pub categories: Vec<CategoryFixture>,
}

/// Category Fixture
#[derive(Debug, Deserialize)]
pub struct CategoryFixture {
    /// Category id
    pub id: Category,

    /// Display name
    pub name: String,

    /// Description
    #[serde(default)]
    pub description: String,

    /// Icon glyph
    #[serde(default)]
    pub icon: String,

    /// Extra display details
    #[serde(default)]
    pub details: CategoryDetails,
}

impl From<CategoryFixture> for CategoryInfo {
    fn from(fixture: CategoryFixture) -> Self {
        CategoryInfo {
            category: fixture.id,
            name: fixture.name,
            description: fixture.description,
            icon: fixture.icon,
            details: fixture.details,
        }
    }
}

impl CategoriesFixture {
    /// Turn the fixture list into a complete category map.
    ///
    /// # Errors
    ///
    /// - [`FixtureError::DuplicateCategory`]: a category is listed twice.
    /// - [`FixtureError::MissingCategory`]: a category is not listed.
    pub fn into_map(self) -> Result<CategoryMap<CategoryInfo>, FixtureError> {
        let mut slots: CategoryMap<Option<CategoryInfo>> = CategoryMap::default();

        for fixture in self.categories {
            let slot = slots.get_mut(fixture.id);

            if slot.is_some() {
                return Err(FixtureError::DuplicateCategory(fixture.id));
            }

            *slot = Some(fixture.into());
        }

        CategoryMap::try_from_fn(|category| {
            slots
                .get_mut(category)
                .take()
                .ok_or(FixtureError::MissingCategory(category))
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn listing(ids: &[&str]) -> String {
        let mut yaml = String::from("categories:\n");

        for id in ids {
            yaml.push_str(&format!("  - id: {id}\n    name: \"{id}\"\n"));
        }

        yaml
    }

    const ALL_IDS: [&str; 8] = [
        "promociones",
        "encebollados",
        "ceviches",
        "bollos",
        "cazuelas",
        "congelados",
        "acompañamientos",
        "bebidas",
    ];

    #[test]
    fn complete_listing_builds_a_map() -> TestResult {
        let fixture: CategoriesFixture = serde_norway::from_str(&listing(&ALL_IDS))?;

        let map = fixture.into_map()?;

        assert_eq!(map[Category::Drinks].name, "bebidas");
        assert_eq!(map[Category::Frozen].category, Category::Frozen);

        Ok(())
    }

    #[test]
    fn missing_category_is_rejected() -> TestResult {
        let without_drinks = ALL_IDS.get(..7).ok_or("short id list")?;
        let fixture: CategoriesFixture = serde_norway::from_str(&listing(without_drinks))?;

        assert!(matches!(
            fixture.into_map(),
            Err(FixtureError::MissingCategory(Category::Drinks))
        ));

        Ok(())
    }

    #[test]
    fn duplicate_category_is_rejected() -> TestResult {
        let mut ids = ALL_IDS.to_vec();
        ids.push("ceviches");

        let fixture: CategoriesFixture = serde_norway::from_str(&listing(&ids))?;

        assert!(matches!(
            fixture.into_map(),
            Err(FixtureError::DuplicateCategory(Category::Ceviches))
        ));

        Ok(())
    }
}
