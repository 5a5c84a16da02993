//! End-to-end runs against mock target sites and a mock email provider

use std::fs;

use serde_json::{Value, json};
use sitecheck::AppError;
use sitecheck::config::{
    API_KEY_VAR, ConfigError, Credentials, Profile, ProfileName, RECIPIENT_VAR, SENDER_VAR,
};
use sitecheck::monitoring::{Prober, Target};
use sitecheck::notify::ResendNotifier;
use sitecheck::runner;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn credentials() -> Credentials {
    Credentials {
        api_key: "re_test".to_string(),
        sender: "alerts@example.com".to_string(),
        recipient: "ops@example.com".to_string(),
    }
}

fn profile(targets: Vec<Target>) -> Profile {
    Profile {
        timeout_seconds: 5,
        max_attempts: 2,
        retry_delay_seconds: 0,
        user_agent: "sitecheck-test/1.0".to_string(),
        targets,
    }
}

async fn sites() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/up"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    server
}

async fn provider(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "id": "email_1" })))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_all_up_makes_no_email_call() {
    logger::init_tracing();
    let sites = sites().await;
    let provider = provider(200).await;

    let profile = profile(vec![Target::new(format!("{}/up", sites.uri()))]);
    let prober = Prober::http(&profile).unwrap();
    let notifier = ResendNotifier::with_base_url("re_test", provider.uri()).unwrap();

    let summary = runner::run(&credentials(), &profile, &prober, &notifier).await.unwrap();

    assert!(summary.all_up());
    assert!(provider.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_down_site_is_emailed_once() {
    let sites = sites().await;
    let provider = provider(200).await;

    let up = format!("{}/up", sites.uri());
    let down = format!("{}/down", sites.uri());
    let profile = profile(vec![Target::new(&up), Target::new(&down)]);
    let prober = Prober::http(&profile).unwrap();
    let notifier = ResendNotifier::with_base_url("re_test", provider.uri()).unwrap();

    let summary = runner::run(&credentials(), &profile, &prober, &notifier).await.unwrap();

    assert_eq!(summary.message_id.as_deref(), Some("email_1"));
    let down_urls: Vec<_> = summary.down.iter().map(|r| r.target.clone()).collect();
    assert_eq!(down_urls, vec![down.clone()]);

    let down_probes = sites
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|request| request.url.path() == "/down")
        .count();
    assert_eq!(down_probes, 2);

    let emails = provider.received_requests().await.unwrap();
    assert_eq!(emails.len(), 1);
    let body: Value = serde_json::from_slice(&emails[0].body).unwrap();
    assert_eq!(body["to"], json!(["ops@example.com"]));
    let html = body["html"].as_str().unwrap();
    assert_eq!(html.matches("<li>").count(), 1);
    assert!(html.contains(&format!("{} (status 500)", tera::escape_html(&down))));
    assert!(!html.contains("/up"));
    assert!(!html.contains(&tera::escape_html("/up")));
}

#[tokio::test]
async fn test_provider_failure_fails_run() {
    let sites = sites().await;
    let provider = provider(500).await;

    let profile = profile(vec![Target::new(format!("{}/down", sites.uri()))]);
    let prober = Prober::http(&profile).unwrap();
    let notifier = ResendNotifier::with_base_url("re_test", provider.uri()).unwrap();

    let err = runner::run(&credentials(), &profile, &prober, &notifier).await.unwrap_err();

    assert!(matches!(err, AppError::Notify { down: 1, .. }), "got {err:?}");
    assert_eq!(provider.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_credentials_stop_before_probing() {
    let sites = sites().await;
    let dir = tempdir().unwrap();
    let config = profile(vec![Target::new(format!("{}/up", sites.uri()))])
        .write_config(&dir.path().join("sites.toml"))
        .unwrap();

    for missing in [API_KEY_VAR, SENDER_VAR, RECIPIENT_VAR] {
        let lookup = |name: &str| (name != missing).then(|| "value".to_string());
        let load = || Credentials::from_lookup(lookup);

        let err = runner::preflight(load, Some(config.as_path()), ProfileName::Retrying)
            .unwrap_err();

        assert!(matches!(err, AppError::Config(ConfigError::Missing(name)) if name == missing));
    }

    assert!(sites.received_requests().await.unwrap().is_empty());
}

#[test]
fn test_preflight_loads_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sites.toml");
    fs::write(
        &path,
        "timeout_seconds = 20\nmax_attempts = 1\nuser_agent = \"probe\"\n\n[[targets]]\nurl = \"https://example.com\"\n",
    )
    .unwrap();

    let (credentials, profile) = runner::preflight(
        || Credentials::from_lookup(|_| Some("value".to_string())),
        Some(path.as_path()),
        ProfileName::Retrying,
    )
    .unwrap();

    assert_eq!(credentials.sender, "value");
    assert_eq!(profile.timeout_seconds, 20);
    assert_eq!(profile.targets, vec![Target::new("https://example.com")]);
}
