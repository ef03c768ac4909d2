use super::*;
use crate::net::mock::Harness;
use serde_json::json;

fn domain_json(id: i64, name: &str, verified: bool) -> serde_json::Value {
    json!({
        "id": id,
        "user_id": 1,
        "domain": name,
        "verified": verified,
        "created_at": "2025-03-01T10:00:00Z",
        "updated_at": "2025-03-01T10:00:00Z"
    })
}

async fn seeded(h: &Harness, domains: serde_json::Value) -> DomainsStore {
    let store = DomainsStore::new(h.api.clone());
    h.transport.reply(200, domains);
    store.fetch_domains().await.unwrap();
    store
}

#[tokio::test]
async fn fetch_domains_replaces_list() {
    let h = Harness::logged_in("tok");
    let store = seeded(&h, json!([domain_json(1, "a.example", false)])).await;
    h.transport.reply(200, json!([domain_json(2, "b.example", true), domain_json(3, "c.example", false)]));

    store.fetch_domains().await.unwrap();

    assert_eq!(store.domains().iter().map(|d| d.id).collect::<Vec<_>>(), vec![2, 3]);
    assert!(!store.is_loading());
}

#[tokio::test]
async fn fetch_failure_uses_fallback_message() {
    let h = Harness::logged_in("tok");
    let store = DomainsStore::new(h.api.clone());
    h.transport.reply(500, json!({}));

    store.fetch_domains().await.unwrap_err();

    assert_eq!(store.error().as_deref(), Some("Failed to fetch domains"));
}

#[tokio::test]
async fn create_appends_server_record() {
    let h = Harness::logged_in("tok");
    let store = seeded(&h, json!([domain_json(1, "a.example", false)])).await;
    h.transport.reply(201, domain_json(8, "status.example.com", false));

    let created = store
        .create_domain(&DomainInput { domain: "status.example.com".into() })
        .await
        .unwrap();

    assert_eq!(created.id, 8);
    assert_eq!(store.domains().len(), 2);
    assert_eq!(store.domains()[1].domain, "status.example.com");
}

#[tokio::test]
async fn create_failure_prefers_server_message() {
    let h = Harness::logged_in("tok");
    let store = DomainsStore::new(h.api.clone());
    h.transport.reply(400, json!({ "error": "Key: 'CustomDomainCreation.Domain' Error:Field validation" }));

    store.create_domain(&DomainInput { domain: "not a domain".into() }).await.unwrap_err();

    assert_eq!(
        store.error().as_deref(),
        Some("Key: 'CustomDomainCreation.Domain' Error:Field validation")
    );
    assert!(store.domains().is_empty());
}

#[tokio::test]
async fn verify_merges_only_verification_fields() {
    let h = Harness::logged_in("tok");
    let store = seeded(&h, json!([domain_json(1, "a.example", false), domain_json(2, "b.example", false)])).await;
    let before = store.domains()[0].clone();
    h.transport.reply(200, json!({
        "id": 1,
        "domain": "rewritten.example",
        "verified": true,
        "verificationStatus": "verified",
        "updated_at": "2030-01-01T00:00:00Z"
    }));

    let verification = store.verify_domain(1).await.unwrap();

    assert!(verification.verified);
    let after = store.domains()[0].clone();
    assert!(after.verified);
    assert_eq!(after.verification_status.as_deref(), Some("verified"));
    assert_eq!(after.domain, before.domain);
    assert_eq!(after.updated_at, before.updated_at);
    assert_eq!(after.created_at, before.created_at);
    assert!(!store.domains()[1].verified);
}

#[tokio::test]
async fn verify_absent_id_is_silent_noop() {
    let h = Harness::logged_in("tok");
    let store = seeded(&h, json!([domain_json(1, "a.example", false)])).await;
    let before = store.domains();
    h.transport.reply(200, json!({ "verified": true, "verificationStatus": "verified" }));

    store.verify_domain(42).await.unwrap();

    assert_eq!(store.domains(), before);
    assert_eq!(store.error(), None);
}

#[tokio::test]
async fn verify_failure_records_fallback() {
    let h = Harness::logged_in("tok");
    let store = seeded(&h, json!([domain_json(1, "a.example", false)])).await;
    h.transport.fail("dns lookup timed out");

    store.verify_domain(1).await.unwrap_err();

    assert_eq!(store.error().as_deref(), Some("Failed to verify domain"));
    assert!(!store.domains()[0].verified);
}

#[tokio::test]
async fn delete_filters_matching_domains() {
    let h = Harness::logged_in("tok");
    let store = seeded(
        &h,
        json!([domain_json(1, "a.example", false), domain_json(2, "b.example", true), domain_json(1, "a2.example", false)]),
    )
    .await;
    h.transport.reply(200, json!({ "message": "Custom domain deleted successfully" }));

    store.delete_domain(1).await.unwrap();

    assert_eq!(store.domains().iter().map(|d| d.id).collect::<Vec<_>>(), vec![2]);
}

#[tokio::test]
async fn delete_failure_keeps_list() {
    let h = Harness::logged_in("tok");
    let store = seeded(&h, json!([domain_json(1, "a.example", false)])).await;
    h.transport.reply(404, json!({ "error": "Custom domain not found" }));

    let err = store.delete_domain(1).await.unwrap_err();

    assert_eq!(err.server_message(), Some("Custom domain not found"));
    assert_eq!(store.domains().len(), 1);
    assert!(!store.is_loading());
}

#[tokio::test]
async fn fetch_domains_reads_null_as_empty_list() {
    let h = Harness::logged_in("tok");
    let store = seeded(&h, json!([domain_json(1, "a.example", false)])).await;
    h.transport.reply_raw(200, "null");

    assert!(store.fetch_domains().await.unwrap().is_empty());
    assert!(store.domains().is_empty());
    assert_eq!(store.error(), None);
}
