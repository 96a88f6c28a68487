//! Cart to order hand-off over the built-in menu.

use jiff::Timestamp;
use rusty_money::{Money, iso::USD};
use testresult::TestResult;

use encebollado::{
    cart::{
        Adjustment, Cart, CartError,
        engine::CartEngine,
        storage::{CartStorage, MemoryStorage},
    },
    config::RestaurantSettings,
    fixtures::embedded_catalog,
    notifications::NotificationKind,
    order::{OrderError, channel::MemoryChannel},
    products::ProductId,
};

const NORMAL: ProductId = ProductId::new(4);
const MARACUYA: ProductId = ProductId::new(35);

#[test]
fn checkout_sends_the_cart_and_clears_it() -> TestResult {
    let catalog = embedded_catalog()?;
    let now: Timestamp = "2024-03-09T19:05:07Z".parse()?;
    let mut engine = CartEngine::with_defaults(&catalog, MemoryStorage::new());
    let mut channel = MemoryChannel::new();

    engine.add_by_id(NORMAL, 2, now)?;
    engine.add_by_id(MARACUYA, 1, now)?;

    assert_eq!(engine.cart().total_item_count(), 3);
    assert_eq!(engine.cart().total_price()?, Money::from_minor(1060, USD));

    let link = engine.checkout(&mut channel, &RestaurantSettings::default(), now)?;

    assert_eq!(link.host_str(), Some("wa.me"));
    assert_eq!(link.path(), "/593987654321");

    let message = link
        .query_pairs()
        .find(|(key, _)| key == "text")
        .map(|(_, value)| value.into_owned())
        .ok_or("link carries no message")?;

    assert!(message.contains("• Encebollado Normal\n  Cantidad: 2"));
    assert!(message.contains("• Jugo de Maracuyá 500ml\n  Cantidad: 1"));
    assert!(message.contains("💰 *TOTAL: $10.60*"));
    assert!(message.contains("📅 Fecha: 09/03/2024"));

    assert_eq!(channel.sent().len(), 1);
    assert!(engine.cart().is_empty());
    assert_eq!(
        engine.storage().read("casa-encebollado-cart")?,
        Some("[]".to_string())
    );
    assert_eq!(
        engine.notifications().current().map(|n| n.kind),
        Some(NotificationKind::Success)
    );

    Ok(())
}

#[test]
fn empty_cart_cannot_be_checked_out() -> TestResult {
    let catalog = embedded_catalog()?;
    let mut engine = CartEngine::with_defaults(&catalog, MemoryStorage::new());
    let mut channel = MemoryChannel::new();

    let result = engine.checkout(&mut channel, &RestaurantSettings::default(), Timestamp::now());

    assert!(matches!(result, Err(OrderError::EmptyCart)));
    assert!(channel.sent().is_empty());

    Ok(())
}

#[test]
fn decrementing_the_last_unit_removes_the_line() -> TestResult {
    let catalog = embedded_catalog()?;
    let now = Timestamp::UNIX_EPOCH;
    let mut engine = CartEngine::with_defaults(&catalog, MemoryStorage::new());

    engine.add_by_id(NORMAL, 2, now)?;

    assert_eq!(engine.decrement(NORMAL, now), Adjustment::Updated(1));
    assert_eq!(engine.decrement(NORMAL, now), Adjustment::Removed);
    assert!(!engine.cart().contains(NORMAL));
    assert_eq!(engine.cart().total_price()?, Money::from_minor(0, USD));

    Ok(())
}

#[test]
fn unavailable_products_are_rejected() -> TestResult {
    let catalog = embedded_catalog()?;
    let mut sold_out = catalog.by_id(NORMAL).ok_or("missing product 4")?.clone();
    sold_out.available = false;

    let mut cart = Cart::new(catalog.currency());

    assert_eq!(
        cart.add_item(&sold_out, 1, Timestamp::UNIX_EPOCH),
        Err(CartError::Unavailable {
            id: NORMAL,
            name: "Encebollado Normal".to_string(),
        })
    );
    assert!(cart.is_empty());

    Ok(())
}
