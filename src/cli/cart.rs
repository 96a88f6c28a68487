use std::io::{self, Write};

use clap::{Args, Subcommand};
use encebollado::{
    cart::{Adjustment, Cart, engine::CartEngine, storage::CartStorage},
    catalog::Catalog,
    config::Settings,
    order::channel::WriterChannel,
    products::ProductId,
};
use jiff::Timestamp;
use tracing::info;

use crate::cli::{CliError, align_prices, table, write_table};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: Option<CartSubcommand>,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart
    Show,

    /// Add a product to the cart
    Add(QuantityArgs),

    /// Remove a product from the cart
    Remove(ProductArgs),

    /// Set the quantity of a product already in the cart; 0 removes it
    Set(SetArgs),

    /// Add one unit of a product already in the cart
    Inc(ProductArgs),

    /// Take one unit of a product out of the cart
    Dec(ProductArgs),

    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct ProductArgs {
    /// Product id
    id: u32,
}

#[derive(Debug, Args)]
struct QuantityArgs {
    /// Product id
    id: u32,

    /// Number of units
    #[arg(short, long, default_value_t = 1)]
    quantity: u32,
}

#[derive(Debug, Args)]
struct SetArgs {
    /// Product id
    id: u32,

    /// New number of units
    quantity: u32,
}

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Print the order message without sending it or clearing the cart
    #[arg(long)]
    dry_run: bool,
}

pub(crate) fn run(
    command: CartCommand,
    catalog: &Catalog,
    settings: &Settings,
    storage: impl CartStorage,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut engine = engine(catalog, settings, storage);
    let now = Timestamp::now();

    match command.command.unwrap_or(CartSubcommand::Show) {
        CartSubcommand::Show => {}
        CartSubcommand::Add(args) => {
            let outcome = engine.add_by_id(ProductId::new(args.id), args.quantity, now)?;

            info!(product_id = args.id, quantity = outcome.quantity(), "cart updated");
        }
        CartSubcommand::Remove(args) => {
            if !engine.remove_item(ProductId::new(args.id), now) {
                return Err(CliError::NotInCart(args.id));
            }
        }
        CartSubcommand::Set(args) => {
            adjusted(engine.set_quantity(ProductId::new(args.id), args.quantity, now), args.id)?;
        }
        CartSubcommand::Inc(args) => {
            adjusted(engine.increment(ProductId::new(args.id), now), args.id)?;
        }
        CartSubcommand::Dec(args) => {
            adjusted(engine.decrement(ProductId::new(args.id), now), args.id)?;
        }
        CartSubcommand::Clear => engine.clear(now),
    }

    for notification in engine.notifications().visible() {
        writeln!(out, "{}", notification.message)?;
    }

    write_cart(out, engine.cart())
}

pub(crate) fn checkout(
    args: &CheckoutArgs,
    catalog: &Catalog,
    settings: &Settings,
    storage: impl CartStorage,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut engine = engine(catalog, settings, storage);
    let now = Timestamp::now();

    if args.dry_run {
        writeln!(out, "{}", engine.preview(&settings.restaurant.template(), now)?)?;

        return Ok(());
    }

    let mut channel = WriterChannel::new(io::stdout());

    engine.checkout(&mut channel, &settings.restaurant, now)?;

    if let Some(notification) = engine.notifications().current() {
        writeln!(out, "{}", notification.message)?;
    }

    Ok(())
}

fn engine<'a, S: CartStorage>(
    catalog: &'a Catalog,
    settings: &Settings,
    storage: S,
) -> CartEngine<'a, S> {
    CartEngine::load(
        catalog,
        storage,
        settings.storage.key.clone(),
        settings.notifications,
    )
}

fn adjusted(adjustment: Adjustment, id: u32) -> Result<(), CliError> {
    match adjustment {
        Adjustment::Missing => Err(CliError::NotInCart(id)),
        Adjustment::Updated(_) | Adjustment::Removed => Ok(()),
    }
}

fn write_cart(out: &mut impl Write, cart: &Cart<'_>) -> Result<(), CliError> {
    if cart.is_empty() {
        writeln!(out, "El carrito está vacío")?;

        return Ok(());
    }

    let mut rows = Vec::with_capacity(cart.len());

    for group in cart.grouped_by_category() {
        for item in &group.items {
            rows.push([
                item.product_id().to_string(),
                item.product().name.clone(),
                group.category.label().to_string(),
                item.quantity().to_string(),
                item.unit_price().to_string(),
                item.subtotal()?.to_string(),
            ]);
        }
    }

    let mut table = table(
        ["#", "Producto", "Categoría", "Cantidad", "Precio", "Subtotal"],
        rows,
    );

    align_prices(&mut table, 3, 6);
    write_table(out, &table)?;

    writeln!(
        out,
        "{} artículos, total {}",
        cart.total_item_count(),
        cart.total_price()?
    )?;

    Ok(())
}
