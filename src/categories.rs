//! Categories
//!
//! The menu is split into a closed set of eight categories. Products point at their
//! category through [`Product::category`](crate::products::Product::category); the
//! category itself never owns its products, the catalog derives them on demand.

use std::{fmt, ops::Index, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when parsing an unknown category id.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown category: {0}")]
pub struct UnknownCategory(pub String);

/// Menu category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// WhatsApp promotional bundles
    #[serde(rename = "promociones")]
    Promotions,

    /// Encebollados (fish and yuca soup)
    #[serde(rename = "encebollados")]
    Encebollados,

    /// Fish and shrimp ceviches
    #[serde(rename = "ceviches")]
    Ceviches,

    /// Bollos, guatitas and banderas
    #[serde(rename = "bollos")]
    Bollos,

    /// Cazuelas
    #[serde(rename = "cazuelas")]
    Cazuelas,

    /// Vacuum packed frozen dishes
    #[serde(rename = "congelados")]
    Frozen,

    /// Side dishes
    #[serde(rename = "acompañamientos")]
    Sides,

    /// Drinks
    #[serde(rename = "bebidas")]
    Drinks,
}

impl Category {
    /// Every category, in menu order.
    pub const ALL: [Category; 8] = [
        Category::Promotions,
        Category::Encebollados,
        Category::Ceviches,
        Category::Bollos,
        Category::Cazuelas,
        Category::Frozen,
        Category::Sides,
        Category::Drinks,
    ];

    /// Stable identifier, as used by the catalog fixtures and persisted data.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Category::Promotions => "promociones",
            Category::Encebollados => "encebollados",
            Category::Ceviches => "ceviches",
            Category::Bollos => "bollos",
            Category::Cazuelas => "cazuelas",
            Category::Frozen => "congelados",
            Category::Sides => "acompañamientos",
            Category::Drinks => "bebidas",
        }
    }

    /// Short label used for headings, e.g. in the order message.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Category::Promotions => "Promociones",
            Category::Encebollados => "Encebollados",
            Category::Ceviches => "Ceviches",
            Category::Bollos => "Bollos",
            Category::Cazuelas => "Cazuelas",
            Category::Frozen => "Congelados",
            Category::Sides => "Acompañamientos",
            Category::Drinks => "Bebidas",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();

        // Accept the unaccented spelling for terminals without `ñ`.
        if needle == "acompanamientos" {
            return Ok(Category::Sides);
        }

        Category::ALL
            .into_iter()
            .find(|category| category.id() == needle)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// A value for every category.
///
/// Lookups are exhaustive matches, so adding a category is a compile error until every
/// map is taught about it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoryMap<V> {
    promotions: V,
    encebollados: V,
    ceviches: V,
    bollos: V,
    cazuelas: V,
    frozen: V,
    sides: V,
    drinks: V,
}

impl<V> CategoryMap<V> {
    /// Build a map by calling `f` once per category, in menu order.
    pub fn from_fn(mut f: impl FnMut(Category) -> V) -> Self {
        Self {
            promotions: f(Category::Promotions),
            encebollados: f(Category::Encebollados),
            ceviches: f(Category::Ceviches),
            bollos: f(Category::Bollos),
            cazuelas: f(Category::Cazuelas),
            frozen: f(Category::Frozen),
            sides: f(Category::Sides),
            drinks: f(Category::Drinks),
        }
    }

    /// Build a map from a fallible per-category constructor.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`.
    pub fn try_from_fn<E>(mut f: impl FnMut(Category) -> Result<V, E>) -> Result<Self, E> {
        Ok(Self {
            promotions: f(Category::Promotions)?,
            encebollados: f(Category::Encebollados)?,
            ceviches: f(Category::Ceviches)?,
            bollos: f(Category::Bollos)?,
            cazuelas: f(Category::Cazuelas)?,
            frozen: f(Category::Frozen)?,
            sides: f(Category::Sides)?,
            drinks: f(Category::Drinks)?,
        })
    }

    /// Get the value for a category.
    pub fn get(&self, category: Category) -> &V {
        match category {
            Category::Promotions => &self.promotions,
            Category::Encebollados => &self.encebollados,
            Category::Ceviches => &self.ceviches,
            Category::Bollos => &self.bollos,
            Category::Cazuelas => &self.cazuelas,
            Category::Frozen => &self.frozen,
            Category::Sides => &self.sides,
            Category::Drinks => &self.drinks,
        }
    }

    /// Get a mutable reference to the value for a category.
    pub fn get_mut(&mut self, category: Category) -> &mut V {
        match category {
            Category::Promotions => &mut self.promotions,
            Category::Encebollados => &mut self.encebollados,
            Category::Ceviches => &mut self.ceviches,
            Category::Bollos => &mut self.bollos,
            Category::Cazuelas => &mut self.cazuelas,
            Category::Frozen => &mut self.frozen,
            Category::Sides => &mut self.sides,
            Category::Drinks => &mut self.drinks,
        }
    }

    /// Iterate over `(category, value)` pairs in menu order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &V)> {
        Category::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }

    /// Transform every value, keeping the category association.
    pub fn map<U>(self, mut f: impl FnMut(Category, V) -> U) -> CategoryMap<U> {
        CategoryMap {
            promotions: f(Category::Promotions, self.promotions),
            encebollados: f(Category::Encebollados, self.encebollados),
            ceviches: f(Category::Ceviches, self.ceviches),
            bollos: f(Category::Bollos, self.bollos),
            cazuelas: f(Category::Cazuelas, self.cazuelas),
            frozen: f(Category::Frozen, self.frozen),
            sides: f(Category::Sides, self.sides),
            drinks: f(Category::Drinks, self.drinks),
        }
    }
}

impl<V> Index<Category> for CategoryMap<V> {
    type Output = V;

    fn index(&self, category: Category) -> &Self::Output {
        self.get(category)
    }
}

/// Extra marketing copy shown alongside a category.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryDetails {
    /// Featured dish for the category
    pub highlight: String,

    /// Selling point (savings, tradition, freshness...)
    pub feature: String,

    /// When the category is recommended
    pub recommendation: String,
}

/// Category display information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInfo {
    /// Category this information describes
    pub category: Category,

    /// Display name
    pub name: String,

    /// Description
    pub description: String,

    /// Icon glyph
    pub icon: String,

    /// Extra marketing copy
    pub details: CategoryDetails,
}

impl CategoryInfo {
    /// Case-insensitive match of an already lowercased term against name or description.
    pub(crate) fn matches_term(&self, lowered_term: &str) -> bool {
        self.name.to_lowercase().contains(lowered_term)
            || self.description.to_lowercase().contains(lowered_term)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn ids_round_trip_through_from_str() -> TestResult {
        for category in Category::ALL {
            assert_eq!(category.id().parse::<Category>()?, category);
        }

        Ok(())
    }

    #[test]
    fn from_str_accepts_unaccented_sides() -> TestResult {
        assert_eq!("acompanamientos".parse::<Category>()?, Category::Sides);
        assert_eq!(" Bebidas ".parse::<Category>()?, Category::Drinks);

        Ok(())
    }

    #[test]
    fn from_str_rejects_unknown_ids() {
        assert_eq!(
            "postres".parse::<Category>(),
            Err(UnknownCategory("postres".to_string()))
        );
    }

    #[test]
    fn serde_uses_spanish_ids() -> TestResult {
        let json = serde_json::to_string(&Category::Sides)?;

        assert_eq!(json, "\"acompañamientos\"");
        assert_eq!(serde_json::from_str::<Category>("\"congelados\"")?, Category::Frozen);

        Ok(())
    }

    #[test]
    fn category_map_lookups_follow_the_key() {
        let map = CategoryMap::from_fn(Category::id);

        for category in Category::ALL {
            assert_eq!(map[category], category.id());
        }
    }

    #[test]
    fn category_map_iterates_in_menu_order() {
        let map = CategoryMap::from_fn(|_| 0_usize);
        let order: Vec<Category> = map.iter().map(|(category, _)| category).collect();

        assert_eq!(order, Category::ALL.to_vec());
    }

    #[test]
    fn category_map_try_from_fn_stops_on_error() {
        let result: Result<CategoryMap<u8>, Category> = CategoryMap::try_from_fn(|category| {
            if category == Category::Ceviches {
                Err(category)
            } else {
                Ok(1)
            }
        });

        assert_eq!(result, Err(Category::Ceviches));
    }

    #[test]
    fn category_map_get_mut_and_map() {
        let mut map = CategoryMap::from_fn(|_| 1_u32);

        *map.get_mut(Category::Drinks) += 4;

        let doubled = map.map(|_, value| value * 2);

        assert_eq!(doubled[Category::Drinks], 10);
        assert_eq!(doubled[Category::Bollos], 2);
    }
}
