use super::*;
use crate::state::test_helpers;
use time::Duration;
use time::macros::datetime;

fn geo(country: Option<&str>, city: Option<&str>, tz: Option<&str>) -> GeoInfo {
    GeoInfo {
        country_name: country.map(ToOwned::to_owned),
        region_name: None,
        city: city.map(ToOwned::to_owned),
        time_zone: tz.map(ToOwned::to_owned),
    }
}

fn message_at(created_at: OffsetDateTime, geo: Option<GeoInfo>) -> ChatMessage {
    ChatMessage {
        id: Uuid::new_v4(),
        creator: Creator { id: Uuid::new_v4(), name: "guest".into(), avatar_url: None },
        text: "Hello friend !!".into(),
        geo,
        created_at,
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

#[test]
fn text_within_bounds_is_valid() {
    assert!(validate_message("x", None).is_empty());
    assert!(validate_message(&"y".repeat(255), None).is_empty());
}

#[test]
fn empty_text_is_rejected() {
    let violations = validate_message("", None);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].field, "text");
}

#[test]
fn text_of_256_chars_is_rejected() {
    let violations = validate_message(&"z".repeat(256), None);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].field, "text");
}

#[test]
fn oversized_geo_field_is_rejected() {
    let bad = geo(Some(&"c".repeat(300)), None, None);
    let violations = validate_message("hi", Some(&bad));
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].field, "geo.country_name");
}

#[tokio::test]
async fn invalid_post_neither_persists_nor_broadcasts() {
    let state = test_helpers::test_app_state_unreachable_db(2, 2);
    let (_, mut rx) = test_helpers::attach_client(&state).await;

    let creator = Creator { id: Uuid::new_v4(), name: "guest".into(), avatar_url: None };
    let result = post_message(&state, creator, &"a".repeat(256), None).await;

    assert!(matches!(result, Err(ChatError::Validation(_))));
    // No event was fanned out. (An insert would have failed loudly anyway:
    // the test pool points at an unreachable database.)
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn failed_persistence_fails_the_post_without_broadcast() {
    let state = test_helpers::test_app_state_unreachable_db(2, 2);
    let (_, mut rx) = test_helpers::attach_client(&state).await;

    let creator = Creator { id: Uuid::new_v4(), name: "guest".into(), avatar_url: None };
    let result = post_message(&state, creator, "hello", None).await;

    assert!(matches!(result, Err(ChatError::Database(_))));
    assert!(rx.try_recv().is_err());
}

// =============================================================================
// PRESENTATION
// =============================================================================

#[test]
fn age_buckets_match_the_table() {
    let now = datetime!(2020-01-10 12:00:00 UTC);
    let age = |secs: i64| relative_age(now - Duration::seconds(secs), now);

    assert_eq!(age(0), "just now");
    assert_eq!(age(25), "just now");
    assert_eq!(age(45), "45 seconds ago");
    assert_eq!(age(59), "59 seconds ago");
    assert_eq!(age(61), "a minute ago");
    assert_eq!(age(119), "a minute ago");
    assert_eq!(age(15 * 60), "15 minutes ago");
    assert_eq!(age(59 * 60 + 59), "59 minutes ago");
    assert_eq!(age(60 * 60), "1 hour ago");
    assert_eq!(age(119 * 60), "1 hour ago");
    assert_eq!(age(5 * 60 * 60), "5 hours ago");
    assert_eq!(age(25 * 60 * 60), "yesterday");
    assert_eq!(age(3 * 24 * 60 * 60), "3 days ago");
    assert_eq!(age(8 * 24 * 60 * 60), "a long time ago");
}

#[test]
fn future_timestamps_read_as_just_now() {
    let now = datetime!(2020-01-10 12:00:00 UTC);
    assert_eq!(relative_age(now + Duration::seconds(90), now), "just now");
}

#[test]
fn location_prefers_time_zone() {
    let g = geo(Some("France"), Some("Paris"), Some("Europe/Paris"));
    assert_eq!(location(Some(&g)).as_deref(), Some("Europe/Paris"));
}

#[test]
fn location_falls_back_to_city_slash_country() {
    let g = geo(Some("France"), Some("Paris"), None);
    assert_eq!(location(Some(&g)).as_deref(), Some("Paris/France"));
}

#[test]
fn location_absent_when_either_part_missing() {
    assert!(location(Some(&geo(Some("France"), None, None))).is_none());
    assert!(location(Some(&geo(None, Some("Paris"), None))).is_none());
    assert!(location(Some(&geo(Some(""), Some("Paris"), Some("")))).is_none());
    assert!(location(None).is_none());
}

#[test]
fn footer_joins_age_and_location() {
    let now = datetime!(2020-01-10 12:00:00 UTC);
    let with_geo = message_at(now - Duration::seconds(45), Some(geo(None, None, Some("Europe/Paris"))));
    assert_eq!(footer(&with_geo, now), "45 seconds ago, Europe/Paris");

    let without_geo = message_at(now - Duration::seconds(45), None);
    assert_eq!(footer(&without_geo, now), "45 seconds ago");
}

#[test]
fn view_serde_round_trip() {
    let now = datetime!(2020-01-10 12:00:00 UTC);
    let view = render(&message_at(now - Duration::minutes(5), None), now);

    let json = serde_json::to_string(&view).unwrap();
    let restored: ChatMessageView = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, view);
    assert_eq!(restored.footer, "5 minutes ago");
}
