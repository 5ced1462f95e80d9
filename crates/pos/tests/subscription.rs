mod support;

use chrono::{Duration, Utc};
use pos::{
    abstract_trait::store::{DynSubscriptionService, SubscriptionServiceTrait},
    service::subscription::{SubscriptionService, spawn_expiry_sweep},
};
use prometheus_client::registry::Registry;
use shared::errors::ServiceError;
use std::sync::Arc;
use support::{BrokenStores, InMemoryStores, store};

fn service(stores: &Arc<InMemoryStores>) -> SubscriptionService {
    SubscriptionService::new(stores.clone(), &mut Registry::default())
}

#[tokio::test]
async fn active_store_within_term_passes() {
    let stores = InMemoryStores::new();
    stores.insert_store(store("s1", true, Some(Utc::now() + Duration::days(10))));

    let status = service(&stores).check_subscription("s1").await.unwrap();

    assert!(status.is_active);
    assert!(!status.subscription_expired);
    assert!(status.subscription_end_date.is_some());
    assert_eq!(stores.deactivations(), 0);
}

#[tokio::test]
async fn expired_store_is_deactivated_once() {
    let stores = InMemoryStores::new();
    stores.insert_store(store("s1", true, Some(Utc::now() - Duration::days(1))));
    let svc = service(&stores);

    let status = svc.check_subscription("s1").await.unwrap();
    assert!(!status.is_active);
    assert!(status.subscription_expired);
    assert!(!stores.store("s1").unwrap().is_active);

    let again = svc.check_subscription("s1").await.unwrap();
    assert_eq!(status, again);
    assert_eq!(stores.deactivations(), 1);
}

#[tokio::test]
async fn open_ended_subscription_never_expires() {
    let stores = InMemoryStores::new();
    stores.insert_store(store("s1", true, None));

    let status = service(&stores).check_subscription("s1").await.unwrap();

    assert!(status.is_active);
    assert!(!status.subscription_expired);
    assert_eq!(status.subscription_end_date, None);
}

#[tokio::test]
async fn inactive_store_in_term_is_reported_inactive() {
    let stores = InMemoryStores::new();
    stores.insert_store(store("s1", false, Some(Utc::now() + Duration::days(10))));

    let status = service(&stores).check_subscription("s1").await.unwrap();

    assert!(!status.is_active);
    assert!(!status.subscription_expired);
}

#[tokio::test]
async fn store_id_is_case_insensitive() {
    let stores = InMemoryStores::new();
    stores.insert_store(store("s1", true, None));

    assert!(service(&stores).check_subscription("S1").await.unwrap().is_active);
}

#[tokio::test]
async fn unknown_store_is_not_found() {
    let stores = InMemoryStores::new();

    let err = service(&stores).check_subscription("ghost").await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn repository_failure_is_reported() {
    let svc = SubscriptionService::new(Arc::new(BrokenStores), &mut Registry::default());

    let err = svc.check_subscription("s1").await.unwrap_err();
    assert!(matches!(err, ServiceError::Repo(_)));
}

#[tokio::test]
async fn reactivation_extends_the_term() {
    let stores = InMemoryStores::new();
    stores.insert_store(store("s1", false, Some(Utc::now() - Duration::days(3))));
    let svc = service(&stores);

    let new_end = Utc::now() + Duration::days(30);
    let response = svc.reactivate("s1", Some(new_end)).await.unwrap();

    assert!(response.data.is_active);
    assert_eq!(response.data.subscription_end_date, Some(new_end.to_rfc3339()));

    let status = svc.check_subscription("s1").await.unwrap();
    assert!(status.is_active);
    assert!(!status.subscription_expired);
}

#[tokio::test]
async fn reactivating_unknown_store_is_not_found() {
    let stores = InMemoryStores::new();

    let err = service(&stores).reactivate("ghost", None).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn sweep_only_touches_expired_active_stores() {
    let stores = InMemoryStores::new();
    stores.insert_store(store("expired", true, Some(Utc::now() - Duration::hours(1))));
    stores.insert_store(store("current", true, Some(Utc::now() + Duration::days(1))));
    stores.insert_store(store("forever", true, None));
    stores.insert_store(store("already", false, Some(Utc::now() - Duration::days(9))));

    assert_eq!(service(&stores).sweep_expired().await.unwrap(), 1);

    assert!(!stores.store("expired").unwrap().is_active);
    assert!(stores.store("current").unwrap().is_active);
    assert!(stores.store("forever").unwrap().is_active);
}

#[tokio::test(start_paused = true)]
async fn background_sweep_runs_on_its_interval() {
    let stores = InMemoryStores::new();
    stores.insert_store(store("s1", true, Some(Utc::now() - Duration::hours(1))));
    let svc: DynSubscriptionService = Arc::new(service(&stores));

    let handle = spawn_expiry_sweep(svc, std::time::Duration::from_secs(60));

    tokio::time::sleep(std::time::Duration::from_secs(30)).await;
    assert!(stores.store("s1").unwrap().is_active);

    tokio::time::sleep(std::time::Duration::from_secs(31)).await;
    assert!(!stores.store("s1").unwrap().is_active);

    handle.abort();
}
