use std::io::Write;

use clap::Args;
use decimal_percentage::Percentage;
use encebollado::{
    catalog::{Catalog, filters::ProductFilter},
    categories::Category,
    products::Product,
    promotions::{Promotion, percent_points},
};
use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::cli::{CliError, align_prices, flag, table, write_table};

#[derive(Debug, Args)]
pub(crate) struct CategoriesArgs {
    /// Only categories whose name or description contains this term
    #[arg(short, long)]
    search: Option<String>,

    /// Only categories listing at least one product
    #[arg(long)]
    non_empty: bool,
}

#[derive(Debug, Args)]
pub(crate) struct ProductsArgs {
    /// Only products in this category (e.g. encebollados, bebidas)
    #[arg(short, long)]
    category: Option<Category>,

    /// Only products whose name or description contains this term
    #[arg(short, long)]
    search: Option<String>,

    /// Lowest price, in major units (e.g. 2.50)
    #[arg(long)]
    min_price: Option<Decimal>,

    /// Highest price, in major units
    #[arg(long)]
    max_price: Option<Decimal>,

    /// Only popular products
    #[arg(long)]
    popular: bool,

    /// Only promotional products
    #[arg(long)]
    promotions: bool,

    /// Include products that cannot be ordered right now
    #[arg(long)]
    all: bool,
}

impl ProductsArgs {
    fn filter(&self) -> ProductFilter {
        let mut filter = ProductFilter::default();

        if let Some(category) = self.category {
            filter = filter.with_category(category);
        }

        if let Some(term) = &self.search {
            filter = filter.with_search(term.as_str());
        }

        if let Some(min) = self.min_price {
            filter.min_price = min;
        }

        if let Some(max) = self.max_price {
            filter.max_price = max;
        }

        filter.only_popular = self.popular;
        filter.only_promotions = self.promotions;
        filter.only_available = !self.all;

        filter
    }
}

#[derive(Debug, Args)]
pub(crate) struct PromotionsArgs {
    /// Only promotions whose name or description contains this term
    #[arg(short, long)]
    search: Option<String>,

    /// Only promotions valid right now
    #[arg(long)]
    valid: bool,

    /// Only popular promotions
    #[arg(long)]
    popular: bool,

    /// Lowest advertised discount, in percent (e.g. 20)
    #[arg(long)]
    min_discount: Option<Decimal>,

    /// Show only the N promotions saving the most
    #[arg(long, value_name = "N")]
    best: Option<usize>,
}

pub(crate) fn categories(
    catalog: &Catalog,
    args: &CategoriesArgs,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let views = match &args.search {
        Some(term) => catalog.search_categories(term),
        None => catalog.categories(),
    };

    let rows = views
        .iter()
        .filter(|view| !args.non_empty || !view.products.is_empty())
        .map(|view| {
            [
                format!("{} {}", view.info.icon, view.info.name),
                view.category().to_string(),
                view.products.len().to_string(),
                view.popular_count().to_string(),
                view.info.details.highlight.clone(),
            ]
        });

    let table = table(
        ["Categoría", "Id", "Productos", "Populares", "Destacado"],
        rows,
    );

    write_table(out, &table)?;

    Ok(())
}

pub(crate) fn products(
    catalog: &Catalog,
    args: &ProductsArgs,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let products = catalog.filter(&args.filter());

    write_products(out, &products)?;
    writeln!(out, "{} productos", products.len())?;

    Ok(())
}

fn write_products(out: &mut impl Write, products: &[&Product]) -> Result<(), CliError> {
    let rows = products.iter().map(|product| {
        let original = product
            .promotion_details
            .as_ref()
            .map(|details| details.original_price.to_string())
            .unwrap_or_default();

        [
            product.id.to_string(),
            product.name.clone(),
            product.category.label().to_string(),
            product.price.to_string(),
            original,
            flag(product.popular),
            flag(product.available),
        ]
    });

    let mut table = table(
        ["#", "Producto", "Categoría", "Precio", "Antes", "Popular", "Disponible"],
        rows,
    );

    align_prices(&mut table, 3, 5);
    write_table(out, &table)?;

    Ok(())
}

pub(crate) fn promotions(
    catalog: &Catalog,
    args: &PromotionsArgs,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let now = Timestamp::now();

    let mut promotions: Vec<&Promotion> = match args.best {
        Some(limit) => catalog.best_value_promotions(limit),
        None => catalog.promotions().iter().collect(),
    };

    if let Some(term) = &args.search {
        let matching = catalog.search_promotions(term);
        promotions.retain(|promotion| matching.contains(promotion));
    }

    if let Some(min) = args.min_discount {
        let floor = Percentage::from(min / Decimal::ONE_HUNDRED);
        let matching = catalog.promotions_by_min_discount(floor);
        promotions.retain(|promotion| matching.contains(promotion));
    }

    promotions.retain(|promotion| {
        (!args.valid || promotion.is_valid_at(now)) && (!args.popular || promotion.popular)
    });

    let rows = promotions
        .iter()
        .map(|promotion| promotion.summary(now))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|summary| {
            [
                summary.id.to_string(),
                summary.name,
                summary.price,
                summary.original_price,
                summary.savings,
                format!("{}%", summary.savings_percent),
                flag(summary.valid),
            ]
        });

    let mut table = table(
        ["#", "Promoción", "Precio", "Antes", "Ahorro", "%", "Vigente"],
        rows,
    );

    align_prices(&mut table, 2, 6);
    write_table(out, &table)?;

    Ok(())
}

pub(crate) fn stats(catalog: &Catalog, out: &mut impl Write) -> Result<(), CliError> {
    let products = catalog.product_statistics()?;
    let overview = catalog.category_overview();

    writeln!(
        out,
        "{} productos ({} disponibles, {} populares, {} en promoción)",
        products.total, products.available, products.popular, products.promotional
    )?;
    writeln!(
        out,
        "Precios: mínimo {}, máximo {}, promedio ${:.2}",
        products.prices.min, products.prices.max, products.prices.average
    )?;

    let rows = overview.statistics.iter().map(|(category, statistics)| {
        let (min, max) = statistics
            .prices
            .map(|prices| (prices.min.to_string(), prices.max.to_string()))
            .unwrap_or_default();

        [
            category.label().to_string(),
            statistics.total.to_string(),
            statistics.available.to_string(),
            statistics.popular.to_string(),
            min,
            max,
        ]
    });

    let mut table = table(
        ["Categoría", "Productos", "Disponibles", "Populares", "Mínimo", "Máximo"],
        rows,
    );

    align_prices(&mut table, 4, 6);
    write_table(out, &table)?;

    if let Ok(promotions) = catalog.promotion_statistics(Timestamp::now()) {
        writeln!(
            out,
            "{} promociones ({} vigentes, {} por vencer), ahorro total {}, descuento promedio {:.0}%",
            promotions.total,
            promotions.valid,
            promotions.expiring_soon,
            promotions.total_savings,
            percent_points(promotions.average_discount)
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use encebollado::fixtures::embedded_catalog;
    use testresult::TestResult;

    use super::*;

    fn products_args() -> ProductsArgs {
        ProductsArgs {
            category: None,
            search: None,
            min_price: None,
            max_price: None,
            popular: false,
            promotions: false,
            all: false,
        }
    }

    #[test]
    fn product_args_build_a_filter() -> TestResult {
        let catalog = embedded_catalog()?;
        let args = ProductsArgs {
            category: Some(Category::Drinks),
            min_price: Some(Decimal::new(150, 2)),
            ..products_args()
        };

        let filter = args.filter();

        assert_eq!(filter.category, Some(Category::Drinks));
        assert_eq!(filter.min_price, Decimal::new(150, 2));
        assert!(filter.only_available);

        let drinks = catalog.filter(&filter);

        assert!(!drinks.is_empty());
        assert!(
            drinks
                .iter()
                .all(|product| *product.price.amount() >= Decimal::new(150, 2))
        );

        let unbounded = ProductsArgs {
            max_price: Some(Decimal::new(100_000_000_000_000_000, 0)),
            ..products_args()
        };

        assert_eq!(catalog.filter(&unbounded.filter()).len(), 46);

        Ok(())
    }

    #[test]
    fn products_table_lists_matches() -> TestResult {
        let catalog = embedded_catalog()?;
        let args = ProductsArgs {
            search: Some("encebollado mixto".to_string()),
            ..products_args()
        };
        let mut out = Vec::new();

        products(&catalog, &args, &mut out)?;

        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("Encebollado Mixto"));
        assert!(!rendered.contains("Chifle"));

        Ok(())
    }

    #[test]
    fn stats_render_without_errors() -> TestResult {
        let catalog = embedded_catalog()?;
        let mut out = Vec::new();

        stats(&catalog, &mut out)?;

        assert!(String::from_utf8(out)?.starts_with("46 productos"));

        Ok(())
    }
}
