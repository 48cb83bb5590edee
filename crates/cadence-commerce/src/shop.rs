//! The shop facade: catalog, configuration and locked mutable state.

use std::sync::{Mutex, MutexGuard};

use tracing::info;

use crate::admin::{AdminService, GenerateReport, Statistics};
use crate::cart::{CartStore, CartView};
use crate::catalog::Catalog;
use crate::checkout::{CheckoutEngine, CheckoutReceipt};
use crate::config::ShopConfig;
use crate::discount::DiscountRegistry;
use crate::error::CommerceError;
use crate::ids::{ItemId, UserId};
use crate::ledger::OrderLedger;

/// Everything that changes after construction.
#[derive(Debug)]
struct ShopState {
    carts: CartStore,
    discounts: DiscountRegistry,
    ledger: OrderLedger,
}

impl ShopState {
    fn new(config: &ShopConfig) -> Self {
        Self {
            carts: CartStore::new(),
            discounts: DiscountRegistry::new(config),
            ledger: OrderLedger::new(config.currency),
        }
    }
}

/// A single in-process shop.
///
/// Every operation holds one lock for its whole duration, so a checkout is
/// atomic with respect to other checkouts and to manual issuance.
#[derive(Debug)]
pub struct Shop {
    config: ShopConfig,
    catalog: Catalog,
    state: Mutex<ShopState>,
}

impl Shop {
    /// Build a shop after validating the configuration.
    pub fn new(config: ShopConfig, catalog: Catalog) -> Result<Self, CommerceError> {
        config.validate()?;
        if let Some(item) = catalog.items().iter().find(|i| i.price.currency != config.currency) {
            return Err(CommerceError::CurrencyMismatch {
                expected: config.currency.code().to_string(),
                got: item.price.currency.code().to_string(),
            });
        }

        info!(
            shop = %config.name,
            items = catalog.len(),
            nth_order = config.nth_order,
            discount_percent = config.discount_percent,
            "shop ready"
        );

        Ok(Self {
            state: Mutex::new(ShopState::new(&config)),
            config,
            catalog,
        })
    }

    /// Shop over the default seeded catalog.
    pub fn seeded(config: ShopConfig) -> Result<Self, CommerceError> {
        let catalog = Catalog::seeded(config.currency);
        Self::new(config, catalog)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &ShopConfig {
        &self.config
    }

    /// Add `quantity` of an item to the user's cart.
    pub fn add_to_cart(
        &self,
        user_id: &str,
        item_id: &str,
        quantity: i64,
    ) -> Result<CartView, CommerceError> {
        let user_id = parse_user(user_id)?;
        let item_id = ItemId::new(item_id.trim());

        let mut state = self.lock()?;
        state.carts.add_item(
            &self.catalog,
            &user_id,
            &item_id,
            quantity,
            self.config.max_quantity_per_item,
            self.config.currency,
        )
    }

    /// The user's cart priced at current catalog prices.
    pub fn cart_view(&self, user_id: &str) -> Result<CartView, CommerceError> {
        let user_id = parse_user(user_id)?;
        let state = self.lock()?;
        state.carts.view(&self.catalog, &user_id, self.config.currency)
    }

    /// Convert the user's cart into an order.
    pub fn checkout(
        &self,
        user_id: &str,
        discount_code: Option<&str>,
    ) -> Result<CheckoutReceipt, CommerceError> {
        let user_id = parse_user(user_id)?;

        let mut guard = self.lock()?;
        let state = &mut *guard;
        CheckoutEngine::new(
            &self.catalog,
            &self.config,
            &mut state.carts,
            &mut state.discounts,
            &mut state.ledger,
        )
        .checkout(&user_id, discount_code)
    }

    /// Manually request a discount code.
    pub fn admin_generate_discount(&self) -> Result<GenerateReport, CommerceError> {
        let mut guard = self.lock()?;
        let state = &mut *guard;
        Ok(AdminService::new(&mut state.discounts, &state.ledger).generate_discount())
    }

    /// Snapshot of aggregates and code history.
    pub fn admin_statistics(&self) -> Result<Statistics, CommerceError> {
        let state = self.lock()?;
        Ok(Statistics::collect(&state.ledger, &state.discounts))
    }

    /// Current global order count.
    pub fn order_count(&self) -> Result<u64, CommerceError> {
        Ok(self.lock()?.ledger.order_count())
    }

    /// Drop carts, orders and codes. The catalog is untouched.
    pub fn reset(&self) -> Result<(), CommerceError> {
        let mut state = self.lock()?;
        state.carts.reset();
        state.discounts.reset();
        state.ledger.reset();
        info!(shop = %self.config.name, "shop state reset");
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, ShopState>, CommerceError> {
        self.state.lock().map_err(|_| CommerceError::StatePoisoned)
    }
}

fn parse_user(user_id: &str) -> Result<UserId, CommerceError> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        return Err(CommerceError::MissingUserId);
    }
    Ok(UserId::new(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Item;
    use crate::money::{Currency, Money};

    fn shop() -> Shop {
        Shop::seeded(ShopConfig::default()).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(Shop::seeded(ShopConfig::default().with_nth_order(0)).is_err());
    }

    #[test]
    fn test_catalog_currency_must_match() {
        let catalog =
            Catalog::new(vec![Item::new("x", "Thing", Money::new(100, Currency::EUR))]).unwrap();
        assert!(matches!(
            Shop::new(ShopConfig::default(), catalog),
            Err(CommerceError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_ids_are_trimmed() {
        let shop = shop();
        shop.add_to_cart("  user1 ", " item002 ", 1).unwrap();
        let view = shop.cart_view("user1").unwrap();
        assert_eq!(view.item_count(), 1);
        assert_eq!(view.items[0].item_id.as_str(), "item002");
    }

    #[test]
    fn test_blank_user_rejected() {
        let shop = shop();
        assert_eq!(
            shop.add_to_cart("  ", "item001", 1).unwrap_err(),
            CommerceError::MissingUserId
        );
        assert!(shop.checkout("", None).is_err());
    }

    #[test]
    fn test_unknown_user_has_empty_cart() {
        let view = shop().cart_view("ghost").unwrap();
        assert!(view.is_empty());
        assert!(view.total.is_zero());
    }

    #[test]
    fn test_reset_clears_everything() {
        let shop = shop();
        for _ in 0..5 {
            shop.add_to_cart("user1", "item002", 1).unwrap();
            shop.checkout("user1", None).unwrap();
        }
        assert_eq!(shop.order_count().unwrap(), 5);

        shop.reset().unwrap();
        let stats = shop.admin_statistics().unwrap();
        assert_eq!(stats.order_count, 0);
        assert!(stats.discount_codes.is_empty());
        assert_eq!(shop.catalog().len(), 6);
    }

    #[test]
    fn test_concurrent_checkouts_count_exactly() {
        use std::sync::Arc;
        use std::thread;

        let shop = Arc::new(shop());
        let handles: Vec<_> = (0..10)
            .map(|i| {
                let shop = Arc::clone(&shop);
                thread::spawn(move || {
                    let user = format!("user{}", i);
                    shop.add_to_cart(&user, "item002", 1).unwrap();
                    shop.checkout(&user, None).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = shop.admin_statistics().unwrap();
        assert_eq!(stats.order_count, 10);
        assert_eq!(stats.total_items_purchased, 10);
        assert_eq!(
            stats.discount_codes.iter().filter(|c| !c.is_used()).count(),
            1
        );
    }
}
