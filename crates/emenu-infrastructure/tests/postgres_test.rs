//! Runs against a disposable PostgreSQL database named by `EMENU_TEST_DATABASE_URL`.
//! Every table is truncated first.
//!
//! `EMENU_TEST_DATABASE_URL=postgres://... cargo test -p emenu-infrastructure -- --ignored`

use std::time::Duration;

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use emenu_core::repositories::{DishRepository, MenuRepository};
use emenu_core::{DishDraft, DomainError, MenuDraft, MenuQuery};
use emenu_infrastructure::{create_pool, run_migrations, PgDishRepository, PgMenuRepository};
use emenu_shared::config::DatabaseSettings;

async fn fresh_pool() -> PgPool {
    let url = std::env::var("EMENU_TEST_DATABASE_URL").expect("EMENU_TEST_DATABASE_URL not set");
    let settings = DatabaseSettings {
        url,
        max_connections: 2,
        min_connections: 1,
        run_migrations: true,
    };
    let pool = create_pool(&settings).await.unwrap();
    run_migrations(&pool).await.unwrap();
    sqlx::query("TRUNCATE menu_dishes, menus, dishes, users RESTART IDENTITY CASCADE")
        .execute(&pool)
        .await
        .unwrap();
    pool
}

#[tokio::test]
#[ignore]
async fn test_public_query_against_postgres() {
    let pool = fresh_pool().await;
    let dishes = PgDishRepository::new(pool.clone());
    let menus = PgMenuRepository::new(pool);
    let at = Utc.with_ymd_and_hms(2021, 9, 12, 12, 0, 0).unwrap();

    let mut ids = Vec::new();
    for n in 1..=5 {
        let draft = DishDraft::new(
            format!("Dish {}", n),
            String::new(),
            Decimal::new(990, 2),
            Duration::from_secs(35 * 60),
            false,
        )
        .unwrap();
        ids.push(dishes.create(&draft, at).await.unwrap().id);
    }

    for (name, dish_ids) in [
        ("September Menu", ids[0..2].to_vec()),
        ("August Menu", ids[2..4].to_vec()),
        ("October Menu", ids.clone()),
        ("Empty Menu", vec![]),
    ] {
        let draft = MenuDraft::new(name.to_string(), String::new(), dish_ids).unwrap();
        menus.create(&draft, at).await.unwrap();
    }

    let query = MenuQuery::from_pairs([("ordering", "-dishes__count,name")]).unwrap();
    let listed = menus.list_public(&query, None).await.unwrap();
    let names: Vec<&str> = listed.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["October Menu", "August Menu", "September Menu"]);
    assert_eq!(listed[0].dish_ids, ids);

    let dish = dishes.find_by_id(ids[0]).await.unwrap().unwrap();
    assert_eq!(dish.price.to_string(), "9.90");
    assert_eq!(dish.preparation_time, Duration::from_secs(35 * 60));

    assert!(dishes.delete(ids[0]).await.unwrap());
    let september = menus.find_by_name("September Menu").await.unwrap().unwrap();
    assert_eq!(september.dish_ids, vec![ids[1]]);

    let duplicate = MenuDraft::new("August Menu".to_string(), String::new(), vec![]).unwrap();
    assert!(matches!(
        menus.create(&duplicate, at).await,
        Err(DomainError::MenuNameAlreadyExists(_))
    ));
}
