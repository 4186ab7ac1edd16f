use std::collections::HashMap;

use super::*;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn defaults_point_at_local_service() {
    let settings = ClientSettings::default();
    assert_eq!(settings.api_url, "http://localhost:8000");
    assert_eq!(settings.user_id, UserId(1));
    assert_eq!(settings.poll_interval(), Duration::from_secs(2));
    assert!(!settings.use_mock_data);
}

#[test]
fn file_values_override_defaults() {
    let mut settings = ClientSettings::default();
    settings
        .apply_file(
            r#"
            api_url = "http://exams.internal:9000"
            user_id = 7
            poll_interval_ms = 500
            use_mock_data = true
            "#,
        )
        .expect("parse");

    assert_eq!(settings.api_url, "http://exams.internal:9000");
    assert_eq!(settings.user_id, UserId(7));
    assert_eq!(settings.poll_interval_ms, 500);
    assert!(settings.use_mock_data);
    assert_eq!(settings.request_timeout_secs, 30);
}

#[test]
fn malformed_file_is_an_error() {
    let mut settings = ClientSettings::default();
    assert!(settings.apply_file("user_id = \"seven\"").is_err());
    assert_eq!(settings, ClientSettings::default());
}

#[test]
fn app_prefixed_env_wins_over_alias() {
    let mut settings = ClientSettings::default();
    settings.apply_env(env(&[
        ("EXAM_API_URL", "http://alias:1"),
        ("APP__API_URL", "http://prefixed:2"),
        ("APP__USE_MOCK_DATA", "yes"),
        ("APP__POLL_INTERVAL_MS", "250"),
    ]));

    assert_eq!(settings.api_url, "http://prefixed:2");
    assert!(settings.use_mock_data);
    assert_eq!(settings.poll_interval_ms, 250);
}

#[test]
fn unparsable_env_values_are_ignored() {
    let mut settings = ClientSettings::default();
    settings.apply_env(env(&[("APP__USER_ID", "abc"), ("APP__USE_MOCK_DATA", "maybe")]));
    assert_eq!(settings.user_id, UserId(1));
    assert!(!settings.use_mock_data);
}

#[test]
fn zero_poll_interval_is_raised_to_one_millisecond() {
    let settings = ClientSettings {
        poll_interval_ms: 0,
        ..ClientSettings::default()
    };
    assert_eq!(settings.poll_interval(), Duration::from_millis(1));
}

#[test]
fn build_service_rejects_bad_url() {
    let settings = ClientSettings {
        api_url: "ftp://nowhere".to_string(),
        ..ClientSettings::default()
    };
    let err = match build_service(&settings) {
        Ok(_) => panic!("bad url must be rejected"),
        Err(err) => err,
    };
    assert!(err.is_invalid_input());
}

#[tokio::test]
async fn build_service_returns_mock_when_requested() {
    let settings = ClientSettings {
        use_mock_data: true,
        ..ClientSettings::default()
    };
    let service = build_service(&settings).expect("service");
    let stats = service.question_stats().await.expect("stats");
    assert_eq!(stats.total(), 3);
}
