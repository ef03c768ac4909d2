use super::*;

#[test]
fn location_defaults_to_root() {
    let location = Location::default();
    assert_eq!(location.href(), "/");
    assert_eq!(location.hard_navigations(), 0);
}

#[test]
fn hard_navigate_replaces_href_and_counts() {
    let location = Location::new("/dashboard");
    location.hard_navigate("/login");
    assert_eq!(location.href(), "/login");
    assert_eq!(location.hard_navigations(), 1);
}

#[test]
fn push_does_not_count_as_hard_navigation() {
    let location = Location::default();
    location.push("/settings");
    assert_eq!(location.href(), "/settings");
    assert_eq!(location.hard_navigations(), 0);
}

#[test]
fn clones_share_state() {
    let location = Location::default();
    let other = location.clone();
    other.hard_navigate("/login");
    assert_eq!(location.href(), "/login");
}
