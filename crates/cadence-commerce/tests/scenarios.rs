//! End-to-end shop scenarios and state-machine properties.

use cadence_commerce::prelude::*;
use proptest::prelude::*;

fn shop() -> Shop {
    Shop::seeded(ShopConfig::default()).unwrap()
}

fn place(shop: &Shop, user: &str) -> CheckoutReceipt {
    shop.add_to_cart(user, "item002", 1).unwrap();
    shop.checkout(user, None).unwrap()
}

#[test]
fn scenario_checkout_without_code() {
    let shop = shop();
    let view = shop.add_to_cart("user1", "item001", 2).unwrap();
    assert_eq!(view.subtotal.to_decimal(), 1999.98);

    let receipt = shop.checkout("user1", None).unwrap();
    assert!(receipt.success);
    assert_eq!(receipt.order.subtotal.to_decimal(), 1999.98);
    assert_eq!(receipt.order.total.to_decimal(), 1999.98);
    assert!(receipt.order.discount_amount.is_zero());
    assert!(shop.cart_view("user1").unwrap().is_empty());
}

#[test]
fn scenario_fifth_order_mints_code() {
    let shop = shop();
    for _ in 0..4 {
        place(&shop, "user1");
    }

    let report = shop.admin_generate_discount().unwrap();
    assert!(!report.success);
    assert_eq!(report.current_order_count, 4);
    assert_eq!(report.orders_remaining, Some(1));

    let fifth = place(&shop, "user1");
    assert_eq!(fifth.order_count, 5);
    assert_eq!(fifth.new_discount_code.as_deref(), Some("DISCOUNT1"));
    assert_eq!(
        fifth.message,
        "Order placed successfully. New discount code 'DISCOUNT1' generated!"
    );
}

#[test]
fn scenario_code_is_single_use() {
    let shop = shop();
    for _ in 0..5 {
        place(&shop, "user1");
    }

    shop.add_to_cart("user2", "item001", 2).unwrap();
    let first = shop.checkout("user2", Some("DISCOUNT1")).unwrap();
    assert_eq!(first.order.discount_amount.to_decimal(), 200.0);
    assert_eq!(first.order.total.to_decimal(), 1799.98);

    let stats = shop.admin_statistics().unwrap();
    let code = &stats.discount_codes[0];
    assert_eq!(code.status, CodeStatus::Used);
    assert_eq!(code.used_by_order.as_ref(), Some(&first.order.order_id));

    shop.add_to_cart("user2", "item001", 2).unwrap();
    let second = shop.checkout("user2", Some("DISCOUNT1")).unwrap();
    assert!(second.success);
    assert!(second.order.discount_amount.is_zero());
    assert_eq!(
        second.rejected_code.map(|r| r.reason),
        Some(RejectReason::AlreadyUsed)
    );
}

#[test]
fn scenario_double_generate_reports_existing() {
    // Orders recorded straight into the ledger never trigger auto-issuance,
    // so the manual path is the one that mints.
    let config = ShopConfig::default();
    let catalog = Catalog::seeded(config.currency);
    let mut ledger = OrderLedger::new(config.currency);
    let mut discounts = DiscountRegistry::new(&config);

    for _ in 0..5 {
        let line = LineItem::from_item(catalog.get(&ItemId::new("item002")).unwrap(), 1).unwrap();
        let subtotal = line.subtotal;
        let order = Order::new(
            ledger.next_order_id(),
            UserId::new("user1"),
            vec![line],
            subtotal,
            None,
            Money::zero(config.currency),
        )
        .unwrap();
        ledger.append(order).unwrap();
    }

    let mut admin = AdminService::new(&mut discounts, &ledger);
    let first = admin.generate_discount();
    assert!(first.success);
    assert_eq!(first.code.as_deref(), Some("DISCOUNT1"));
    assert_eq!(first.current_order_count, 5);

    let second = admin.generate_discount();
    assert!(!second.success);
    assert_eq!(second.code, first.code);
    assert_eq!(second.message, "Unused discount code 'DISCOUNT1' already exists");
    assert_eq!(admin.statistics().discount_codes.len(), 1);
}

#[test]
fn scenario_generate_after_auto_issue() {
    let shop = shop();
    for _ in 0..5 {
        place(&shop, "user1");
    }
    let report = shop.admin_generate_discount().unwrap();
    assert!(!report.success);
    assert_eq!(report.code.as_deref(), Some("DISCOUNT1"));
    assert_eq!(report.next_threshold, 10);
}

#[test]
fn scenario_manual_generate_after_consumption() {
    let shop = shop();
    for _ in 0..5 {
        place(&shop, "user1");
    }
    shop.add_to_cart("user1", "item003", 1).unwrap();
    shop.checkout("user1", Some("DISCOUNT1")).unwrap();
    for _ in 0..4 {
        place(&shop, "user1");
    }

    // The tenth order minted DISCOUNT2, so a manual request sees it outstanding.
    let first = shop.admin_generate_discount().unwrap();
    assert!(!first.success);
    assert_eq!(first.code.as_deref(), Some("DISCOUNT2"));
    assert_eq!(first.current_order_count, 10);
    assert_eq!(first.next_threshold, 15);

    let second = shop.admin_generate_discount().unwrap();
    assert_eq!(second, first);
}

#[test]
fn statistics_accumulate() {
    let shop = shop();
    for _ in 0..5 {
        place(&shop, "user1");
    }
    shop.add_to_cart("user2", "item004", 1).unwrap();
    shop.add_to_cart("user2", "item006", 2).unwrap();
    shop.checkout("user2", Some("DISCOUNT1")).unwrap();

    let stats = shop.admin_statistics().unwrap();
    assert_eq!(stats.order_count, 6);
    assert_eq!(stats.total_items_purchased, 8);
    // 5 mice, then (299.99 + 2 * 89.99) - 10%
    let discounted = 29999 + 2 * 8999;
    let discount = 4800;
    assert_eq!(stats.total_discount_amount.amount_cents, discount);
    assert_eq!(
        stats.total_purchase_amount.amount_cents,
        5 * 2999 + discounted - discount
    );

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["totalItemsPurchased"], 8);
    assert_eq!(json["discountCodes"][0]["status"], "used");
}

#[test]
fn unknown_code_does_not_fail_checkout() {
    let shop = shop();
    shop.add_to_cart("user1", "item005", 1).unwrap();
    let receipt = shop.checkout("user1", Some("BOGUS")).unwrap();
    assert!(receipt.order.discount_code.is_none());
    assert_eq!(
        receipt.rejected_code.map(|r| r.reason),
        Some(RejectReason::Unknown)
    );
    assert_eq!(shop.order_count().unwrap(), 1);
}

#[test]
fn failed_operations_leave_state_untouched() {
    let shop = shop();
    assert_eq!(
        shop.add_to_cart("user1", "item999", 1).unwrap_err(),
        CommerceError::ItemNotFound("item999".into())
    );
    assert_eq!(
        shop.add_to_cart("user1", "item001", 0).unwrap_err(),
        CommerceError::InvalidQuantity(0)
    );
    assert!(matches!(
        shop.add_to_cart("user1", "item001", 1001),
        Err(CommerceError::QuantityExceedsLimit(1001, 1000))
    ));
    assert!(matches!(
        shop.checkout("user1", None),
        Err(CommerceError::EmptyCart(_))
    ));

    let stats = shop.admin_statistics().unwrap();
    assert_eq!(stats.order_count, 0);
    assert!(stats.discount_codes.is_empty());
}

#[test]
fn receipt_wire_shape() {
    let shop = shop();
    for _ in 0..4 {
        place(&shop, "user1");
    }
    let receipt = place(&shop, "user1");
    let json = serde_json::to_value(&receipt).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["newDiscountCode"], "DISCOUNT1");
    assert_eq!(json["order"]["userId"], "user1");
    assert_eq!(json["order"]["orderId"], "order005");
    assert!(json.get("rejectedCode").is_none());
}

proptest! {
    #[test]
    fn repeated_adds_sum_quantities(quantities in prop::collection::vec(1i64..=50, 1..20)) {
        let shop = shop();
        let mut last = 0;
        for q in &quantities {
            let view = shop.add_to_cart("user1", "item003", *q).unwrap();
            let now = view.item_count();
            prop_assert!(now > last);
            last = now;
        }
        prop_assert_eq!(last, quantities.iter().sum::<i64>());
    }

    #[test]
    fn issuance_only_at_multiples_without_outstanding(
        n in 1u64..=6,
        plan in prop::collection::vec(any::<bool>(), 1..30),
    ) {
        let shop = Shop::seeded(ShopConfig::default().with_nth_order(n)).unwrap();
        for (i, redeem) in plan.iter().enumerate() {
            let before = shop.admin_statistics().unwrap();
            let outstanding = before
                .discount_codes
                .iter()
                .find(|c| !c.is_used())
                .map(|c| c.code.clone());

            shop.add_to_cart("user1", "item002", 1).unwrap();
            let code = if *redeem { outstanding.clone() } else { None };
            let receipt = shop.checkout("user1", code.as_deref()).unwrap();

            let count = i as u64 + 1;
            prop_assert_eq!(receipt.order_count, count);

            let was_free = outstanding.is_none() || code.is_some();
            let expect_issue = count % n == 0 && was_free;
            prop_assert_eq!(receipt.new_discount_code.is_some(), expect_issue);

            let after = shop.admin_statistics().unwrap();
            let unused = after.discount_codes.iter().filter(|c| !c.is_used()).count();
            prop_assert!(unused <= 1);
        }
    }

    #[test]
    fn total_is_subtotal_minus_discount(qty in 1i64..=1000, percent in 1u32..=100) {
        let shop = Shop::seeded(
            ShopConfig::default().with_nth_order(1).with_discount_percent(percent),
        )
        .unwrap();
        place(&shop, "user1");

        shop.add_to_cart("user1", "item001", qty).unwrap();
        let receipt = shop.checkout("user1", Some("DISCOUNT1")).unwrap();
        let order = &receipt.order;
        prop_assert_eq!(
            order.total.amount_cents,
            order.subtotal.amount_cents - order.discount_amount.amount_cents
        );
        let expected = (order.subtotal.amount_cents * percent as i64 + 50) / 100;
        prop_assert_eq!(order.discount_amount.amount_cents, expected);
    }
}
