use super::*;
use serde_json::json;

#[test]
fn user_keeps_unknown_fields() {
    let user: User = serde_json::from_value(json!({
        "id": 7,
        "username": "alice",
        "email": "alice@example.com",
        "created_at": "2025-01-01T00:00:00Z",
        "plan": "pro"
    }))
    .unwrap();
    assert_eq!(user.id, 7);
    assert_eq!(user.username, "alice");
    assert_eq!(user.extra.get("plan"), Some(&json!("pro")));

    let back = serde_json::to_value(&user).unwrap();
    assert_eq!(back["plan"], "pro");
}

#[test]
fn user_email_optional() {
    let user: User = serde_json::from_value(json!({ "id": 1, "username": "bob" })).unwrap();
    assert_eq!(user.email, None);
    let back = serde_json::to_value(&user).unwrap();
    assert!(back.get("email").is_none());
}

#[test]
fn domain_reads_camel_case_verification_status() {
    let domain: Domain = serde_json::from_value(json!({
        "id": 3,
        "user_id": 1,
        "domain": "status.example.com",
        "verified": false,
        "verificationStatus": "pending"
    }))
    .unwrap();
    assert_eq!(domain.verification_status.as_deref(), Some("pending"));
    assert!(!domain.verified);
}

#[test]
fn domain_verified_defaults_false() {
    let domain: Domain = serde_json::from_value(json!({ "id": 3, "domain": "a.example" })).unwrap();
    assert!(!domain.verified);
    assert_eq!(domain.verification_status, None);
}

#[test]
fn site_stats_tolerates_missing_current_status() {
    let stats: SiteStats = serde_json::from_value(json!({
        "site": { "id": 1, "name": "Blog", "url": "https://blog.example" },
        "current_status": null,
        "lifetime_stats": {
            "total_checks": 10,
            "successful_checks": 9,
            "uptime_percentage": 90.0,
            "average_response_time": 120
        }
    }))
    .unwrap();
    assert!(stats.current_status.is_none());
    assert_eq!(stats.lifetime_stats.successful_checks, 9);
    assert_eq!(stats.last_7_days_stats, UptimeStats::default());
}

#[test]
fn domain_dashboard_parses_owner_and_sites() {
    let dashboard: DomainDashboard = serde_json::from_value(json!({
        "domain": "status.example.com",
        "user": { "id": 2, "username": "carol" },
        "sites": [{ "id": 5, "name": "Shop", "url": "https://shop.example" }]
    }))
    .unwrap();
    assert_eq!(dashboard.user.username, "carol");
    assert_eq!(dashboard.sites.len(), 1);
}

#[test]
fn user_update_skips_absent_fields() {
    let update = UserUpdate { email: Some("new@example.com".into()), ..UserUpdate::default() };
    assert_eq!(serde_json::to_value(&update).unwrap(), json!({ "email": "new@example.com" }));
}

#[test]
fn null_site_lists_read_as_empty() {
    let profile: UserProfile = serde_json::from_value(json!({
        "user": { "id": 3, "username": "dave" },
        "sites": null
    }))
    .unwrap();
    assert!(profile.sites.is_empty());

    let dashboard: DomainDashboard = serde_json::from_value(json!({
        "domain": "status.example.com",
        "user": { "id": 3, "username": "dave" },
        "sites": null
    }))
    .unwrap();
    assert!(dashboard.sites.is_empty());
}

#[test]
fn missing_site_list_reads_as_empty() {
    let profile: UserProfile = serde_json::from_value(json!({ "user": { "id": 3, "username": "dave" } })).unwrap();
    assert!(profile.sites.is_empty());
}
