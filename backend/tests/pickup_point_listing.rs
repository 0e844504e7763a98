//! Behavioural coverage for the paginated pickup point aggregation.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Duration;
use rstest::{fixture, rstest};
use uuid::Uuid;

use pvz_backend::domain::ports::ListPickupPointsRequest;
use pvz_backend::domain::{City, ItemType, RequestContext, TimeWindow};
use pvz_backend::outbound::memory::InMemoryStore;

mod support;

use support::{Services, at};

#[fixture]
fn services() -> Services {
    let store = Arc::new(InMemoryStore::new());
    Services::over(store.clone(), store.clone(), store)
}

fn request(page: u32, page_size: u32, window: TimeWindow) -> ListPickupPointsRequest {
    ListPickupPointsRequest {
        page_size,
        page,
        window,
    }
}

async fn open_with_items(services: &Services, pvz_id: Uuid, minutes: i64, items: &[ItemType]) {
    let ctx = RequestContext::detached();
    services.clock.set(at(minutes));
    services
        .receptions
        .open_reception(&ctx, pvz_id)
        .await
        .expect("reception opened");
    for item_type in items {
        services.clock.advance(Duration::seconds(1));
        services
            .receptions
            .add_item(&ctx, pvz_id, *item_type)
            .await
            .expect("item added");
    }
    services
        .receptions
        .close_reception(&ctx, pvz_id)
        .await
        .expect("reception closed");
}

#[rstest]
#[tokio::test]
async fn pages_are_disjoint_and_newest_first(services: Services) {
    let oldest = services.register_at(City::Moscow, 0).await;
    let middle = services.register_at(City::Kazan, 10).await;
    let newest = services.register_at(City::SaintPetersburg, 20).await;
    let ctx = RequestContext::detached();

    let first = services
        .listing
        .list_pickup_points(&ctx, request(1, 2, TimeWindow::default()))
        .await
        .expect("first page");
    let second = services
        .listing
        .list_pickup_points(&ctx, request(2, 2, TimeWindow::default()))
        .await
        .expect("second page");

    assert_eq!(first.total, 3);
    assert_eq!(second.total, 3);
    let first_ids: Vec<Uuid> = first.items.iter().map(|d| d.pickup_point.id).collect();
    let second_ids: Vec<Uuid> = second.items.iter().map(|d| d.pickup_point.id).collect();
    assert_eq!(first_ids, vec![newest, middle]);
    assert_eq!(second_ids, vec![oldest]);

    let beyond = services
        .listing
        .list_pickup_points(&ctx, request(3, 2, TimeWindow::default()))
        .await
        .expect("empty page");
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total, 3);
}

#[rstest]
#[tokio::test]
async fn details_nest_receptions_newest_first_and_items_oldest_first(services: Services) {
    let pvz_id = services.register_at(City::Moscow, 0).await;
    open_with_items(&services, pvz_id, 5, &[ItemType::Clothing]).await;
    open_with_items(
        &services,
        pvz_id,
        30,
        &[ItemType::Electronics, ItemType::Shoes],
    )
    .await;

    let page = services
        .listing
        .list_pickup_points(
            &RequestContext::detached(),
            request(1, 10, TimeWindow::default()),
        )
        .await
        .expect("listing");

    let details = &page.items[0];
    assert_eq!(details.receptions.len(), 2);
    assert_eq!(details.receptions[0].reception.started_at, at(30));
    assert_eq!(details.receptions[1].reception.started_at, at(5));
    let newest_items: Vec<ItemType> = details.receptions[0]
        .items
        .iter()
        .map(|item| item.item_type)
        .collect();
    assert_eq!(newest_items, vec![ItemType::Electronics, ItemType::Shoes]);
}

#[rstest]
#[tokio::test]
async fn window_filters_points_and_receptions_inclusively(services: Services) {
    let early = services.register_at(City::Moscow, 0).await;
    let late = services.register_at(City::Kazan, 1).await;
    let idle = services.register_at(City::SaintPetersburg, 2).await;
    open_with_items(&services, early, 10, &[ItemType::Shoes]).await;
    open_with_items(&services, early, 100, &[]).await;
    open_with_items(&services, late, 60, &[ItemType::Clothing]).await;

    let window = TimeWindow::new(Some(at(10)), Some(at(60)));
    let page = services
        .listing
        .list_pickup_points(&RequestContext::detached(), request(1, 10, window))
        .await
        .expect("listing");

    assert_eq!(page.total, 2);
    let ids: HashSet<Uuid> = page.items.iter().map(|d| d.pickup_point.id).collect();
    assert_eq!(ids, HashSet::from([early, late]));
    assert!(!ids.contains(&idle));
    for details in &page.items {
        for reception in &details.receptions {
            assert!(window.contains(reception.reception.started_at));
        }
    }
    let early_details = page
        .items
        .iter()
        .find(|d| d.pickup_point.id == early)
        .expect("early point listed");
    assert_eq!(early_details.receptions.len(), 1);
}

#[rstest]
#[tokio::test]
async fn list_all_returns_every_point(services: Services) {
    let mut expected = vec![
        services.register_at(City::Moscow, 0).await,
        services.register_at(City::Kazan, 1).await,
    ];
    let mut ids: Vec<Uuid> = services
        .listing
        .list_all_pickup_points(&RequestContext::detached())
        .await
        .expect("list all")
        .into_iter()
        .map(|point| point.id)
        .collect();
    ids.sort();
    expected.sort();
    assert_eq!(ids, expected);
}
