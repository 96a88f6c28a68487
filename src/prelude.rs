//! Encebollado prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{
        AddOutcome, Adjustment, Cart, CartError, CartItem, CategoryGroup,
        engine::CartEngine,
        storage::{
            CART_STORAGE_KEY, CartStorage, FileStorage, MemoryStorage, StorageError,
            StoredCartItem,
        },
    },
    catalog::{
        Catalog, CatalogError,
        categories::CategoryView,
        filters::ProductFilter,
        statistics::{
            CategoryOverview, CategoryStatistics, PriceStatistics, ProductStatistics,
            PromotionStatistics, StatisticsError,
        },
    },
    categories::{Category, CategoryDetails, CategoryInfo, CategoryMap},
    config::{ConfigError, RestaurantSettings, Settings, StorageSettings},
    fixtures::{Fixture, FixtureError, embedded_catalog, load_catalog},
    notifications::{
        Notification, NotificationId, NotificationKind, NotificationQueue, NotificationSettings,
    },
    order::{
        OrderError,
        channel::{MemoryChannel, OrderChannel, WriterChannel, order_link},
        message::{OrderTemplate, format_order},
    },
    pricing::{TotalPriceError, line_total, total_price},
    products::{Product, ProductId, PromotionDetails},
    promotions::{Promotion, PromotionId, PromotionItem, PromotionSummary},
};
