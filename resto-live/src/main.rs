use resto_core::models::{OrderCreate, OrderItem, OrderType, Priority};
use resto_core::order::{kitchen_board, summarize};
use resto_core::util::now_millis;
use resto_live::{LiveConfig, LiveOrders, MemoryStore, OrderDesk, OrderFilter, init_logger};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

fn walk_in(name: &str, items: Vec<OrderItem>, priority: Priority) -> OrderCreate {
    OrderCreate {
        customer_name: name.to_string(),
        customer_phone: "000-000".to_string(),
        order_type: OrderType::Takeaway,
        delivery_address: None,
        items,
        delivery_fee: Decimal::ZERO,
        notes: None,
        priority,
    }
}

fn print_board(orders: &[resto_core::Order], late_after_minutes: i64) {
    let board = kitchen_board(orders, now_millis(), late_after_minutes);
    for column in &board.columns {
        println!("== {} ({})", column.status.label(), column.tickets.len());
        for ticket in &column.tickets {
            println!(
                "   #{:<3} {:<10} {:>8}  next: {}",
                ticket.order.order_number,
                ticket.order.customer_name,
                ticket.time_ago,
                ticket
                    .next_status
                    .map(|s| s.label())
                    .unwrap_or_else(|| "-".to_string()),
            );
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment and logging
    dotenv::dotenv().ok();
    let config = LiveConfig::from_env();
    init_logger(&config.log_level, config.log_json, config.log_dir.as_deref())?;

    tracing::info!(page_size = config.page_size, "resto-live demo starting");

    // 2. Seed the store
    let store = Arc::new(MemoryStore::new());
    store.insert_order(walk_in(
        "Ana",
        vec![OrderItem::new("Burger", 2, Decimal::from(10))],
        Priority::Normal,
    ))?;
    store.insert_order(walk_in(
        "Luis",
        vec![
            OrderItem::new("Pizza", 1, Decimal::from(14)),
            OrderItem::new("Soda", 2, Decimal::from(2)),
        ],
        Priority::High,
    ))?;

    // 3. Live view over every order
    let live = LiveOrders::spawn(store.clone(), &config, OrderFilter::All).await?;
    let mut alerts = live.alerts();
    let snapshot = live.wait_until(|s| !s.loading).await?;
    print_board(&snapshot.orders, config.late_after_minutes);

    // 4. A new order arrives, the kitchen starts on the oldest one
    store.insert_order(walk_in(
        "Marta",
        vec![OrderItem::new("Salad", 1, Decimal::from(9))],
        Priority::Normal,
    ))?;
    if let Ok(Ok(alert)) = tokio::time::timeout(Duration::from_secs(1), alerts.recv()).await {
        println!("New order #{} for {}", alert.order_number, alert.customer_name);
    }

    let desk = OrderDesk::new(store.clone());
    if let Some(oldest) = snapshot.orders.last() {
        let preparing = desk.bump(oldest).await?;
        let id = preparing.id.clone();
        live.select_order(&id).await?;
        let updated = live
            .wait_until(|s| s.selected.as_ref().is_some_and(|o| o.status == preparing.status))
            .await?;
        print_board(&updated.orders, config.late_after_minutes);
    }

    let summary = summarize(&live.current().orders);
    println!(
        "{} orders, {} active, delivered revenue {}",
        summary.total_orders,
        summary.active_count(),
        summary.delivered_revenue
    );

    live.shutdown().await;
    Ok(())
}
