use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use marketdir::domain::Notification;
use marketdir::remote::NotificationSource;
use marketdir::session::{AuthorizeRequest, ClearSessionRequest, Credentials, IdentityProvider};
use marketdir::storage::{JsonFileStore, KeyValueStore};
use marketdir::{AppContext, Collaborators, Config, MarketdirError, Result, ThemeMode};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct StaticIdentity;

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn authorize(&self, request: &AuthorizeRequest) -> Result<Credentials> {
        if request.connection != "google-oauth2" {
            return Err(MarketdirError::LoginFailed("unknown connection".to_string()));
        }
        let claims = URL_SAFE_NO_PAD.encode(r#"{"sub":"google-oauth2|42","name":"Chidi"}"#);
        Ok(Credentials {
            access_token: "access-42".to_string(),
            id_token: format!("eyJhbGciOiJub25lIn0.{claims}."),
        })
    }

    async fn clear_session(&self, _request: &ClearSessionRequest) -> Result<()> {
        Ok(())
    }
}

#[derive(Default)]
struct CountingFeed {
    calls: AtomicUsize,
}

#[async_trait]
impl NotificationSource for CountingFeed {
    async fn fetch_notifications(&self) -> Result<Vec<Notification>> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![Notification::new(format!("remote-{n}"), "Weekly digest", "")])
    }
}

async fn start(dir: &Path, feed: Arc<CountingFeed>) -> AppContext {
    let config = Config {
        data_dir: dir.to_path_buf(),
        ..Config::default()
    };
    let storage = JsonFileStore::open(dir.join("marketdir.json")).await.unwrap();
    let collaborators = Collaborators {
        storage: Arc::new(storage),
        identity: Arc::new(StaticIdentity),
        notifications: feed,
    };
    AppContext::start(&config, collaborators).await
}

#[tokio::test]
async fn first_start_uses_defaults_and_fetches_feed() {
    let dir = tempfile::tempdir().unwrap();
    let feed = Arc::new(CountingFeed::default());

    let app = start(dir.path(), feed.clone()).await;
    let session = app.session().state();
    assert!(!session.loading);
    assert!(session.user().is_none());

    let settings = app.settings().snapshot();
    assert!(!settings.loading);
    assert_eq!(settings.theme, ThemeMode::Light);
    assert_eq!(settings.notifications.len(), 1);
    assert_eq!(feed.calls.load(Ordering::SeqCst), 1);

    app.shutdown().await;
}

#[tokio::test]
async fn state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let feed = Arc::new(CountingFeed::default());

    let app = start(dir.path(), feed.clone()).await;
    app.session().login("google-oauth2").await.unwrap();
    app.settings().toggle_theme();
    app.settings().set_selected_region("Kaduna");
    app.settings().set_online_mode(false).await;
    app.settings().add_notification(Notification::new("local-1", "Saved search", "3 new matches"));
    app.shutdown().await;

    let app = start(dir.path(), feed.clone()).await;
    let session = app.session().state();
    assert_eq!(session.access_token(), Some("access-42"));
    assert_eq!(session.user().map(|u| u.id.as_str()), Some("google-oauth2|42"));

    let settings = app.settings().snapshot();
    assert_eq!(settings.theme, ThemeMode::Dark);
    assert_eq!(settings.selected_region, "Kaduna");
    assert!(!settings.online_mode);
    let ids: Vec<_> = settings.notifications.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, ["local-1", "remote-0"]);
    assert_eq!(feed.calls.load(Ordering::SeqCst), 1);

    app.session().logout().await.unwrap();
    app.shutdown().await;

    let store = JsonFileStore::open(dir.path().join("marketdir.json")).await.unwrap();
    assert_eq!(store.get("accessToken").await.unwrap(), None);
    assert_eq!(store.get("user").await.unwrap(), None);
    assert_eq!(store.get("theme").await.unwrap().as_deref(), Some("\"dark\""));
}

#[tokio::test]
async fn rejected_login_leaves_app_signed_out() {
    let dir = tempfile::tempdir().unwrap();
    let app = start(dir.path(), Arc::new(CountingFeed::default())).await;

    let err = app.session().login("facebook").await.unwrap_err();
    assert!(matches!(err, MarketdirError::LoginFailed(_)));
    assert!(!app.session().is_authenticated());
    app.shutdown().await;
}
