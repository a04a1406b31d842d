use app_state::{AppSettings, load_settings_from_path};
use color_eyre::Result;
use color_eyre::eyre::eyre;
use common_services::api::auth::token::create_access_token;
use common_services::database::app_user::UserRole;
use common_services::database::get_db_pool;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use sqlx::{Executor, PgPool};
use std::net::TcpListener;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use url::Url;

pub struct TestContext {
    pub pool: PgPool,
    pub settings: AppSettings,
    pub http_client: Client,
    db_name: String,
    management_pool: PgPool,
    api_handle: JoinHandle<()>,
}

impl TestContext {
    pub async fn new() -> Result<Self> {
        info!("Setting up test environment...");

        let settings_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/settings.yaml");
        let mut settings = load_settings_from_path(&settings_path, None)?;
        if let Ok(url) = std::env::var("TEST_DATABASE_URL") {
            settings.secrets.database_url = url;
        }

        // 1. Create a throwaway database next to the configured one.
        let db_name = format!("map_test_{}", std::process::id());
        let mut management_settings = settings.database.clone();
        management_settings.run_migrations = false;
        let management_pool = get_db_pool(
            database_url_with_name(&settings.secrets.database_url, "postgres")?.as_str(),
            &management_settings,
        )
        .await?;
        force_drop_db(&management_pool, &db_name).await;
        management_pool
            .execute(format!("CREATE DATABASE \"{db_name}\"").as_str())
            .await?;

        // 2. Point the settings at it. Migrations run when the pool is created.
        settings.secrets.database_url =
            database_url_with_name(&settings.secrets.database_url, &db_name)?.to_string();
        let pool = get_db_pool(&settings.secrets.database_url, &settings.database).await?;

        let port = get_free_port()?;
        settings.api.port = port;
        settings.api.public_url = format!("http://127.0.0.1:{port}");

        // 3. Serve the API in the background.
        let api_pool = pool.clone();
        let api_settings = settings.clone();
        let api_handle = tokio::spawn(async move {
            if let Err(e) = api::serve(api_pool, api_settings).await {
                error!("API server failed: {}", e);
            }
        });

        let http_client = Client::new();
        wait_for_healthy_api(&settings, &http_client).await?;

        info!("Test environment is ready.");
        Ok(Self {
            pool,
            settings,
            http_client,
            db_name,
            management_pool,
            api_handle,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.settings.api.public_url)
    }

    /// A valid bearer token for `user_id`.
    pub fn token_for(&self, user_id: i32) -> Result<String> {
        create_access_token(
            &self.settings.secrets.jwt,
            user_id,
            UserRole::User,
            chrono::Duration::hours(1),
        )
        .map_err(|e| eyre!("Could not sign access token: {e:?}"))
    }

    pub async fn get_status(&self, token: &str, path: &str, query: &[(&str, String)]) -> Result<StatusCode> {
        let response = self
            .http_client
            .get(self.url(path))
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;
        Ok(response.status())
    }

    /// GETs `path` as the token's user and decodes a successful JSON response.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .http_client
            .get(self.url(path))
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(eyre!("GET {path} returned {status}: {body}"));
        }
        Ok(response.json().await?)
    }

    pub async fn teardown(self) {
        self.api_handle.abort();
        self.pool.close().await;
        info!("Dropping test database: {}", self.db_name);
        force_drop_db(&self.management_pool, &self.db_name).await;
        self.management_pool.close().await;
        info!("Teardown complete.");
    }
}

fn database_url_with_name(base_url: &str, database_name: &str) -> Result<Url> {
    let mut url = Url::parse(base_url)?;
    url.set_path(&format!("/{database_name}"));
    Ok(url)
}

async fn force_drop_db(management_pool: &PgPool, db_name: &str) {
    if let Err(e) = management_pool
        .execute(format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)").as_str())
        .await
    {
        warn!("Could not drop test database {}: {}", db_name, e);
    }
}

fn get_free_port() -> Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}

/// Polls `/health` until the API answers or the attempts run out.
async fn wait_for_healthy_api(settings: &AppSettings, http_client: &Client) -> Result<()> {
    let health_url = format!("{}/health", settings.api.public_url);
    for attempt in 1..=20 {
        match http_client.get(&health_url).send().await {
            Ok(response) if response.status().is_success() => {
                info!("API is healthy after {} attempt(s).", attempt);
                return Ok(());
            }
            Ok(response) => warn!("API health check returned {}", response.status()),
            Err(e) => warn!("API health check failed: {}. Retrying...", e),
        }
        tokio::time::sleep(Duration::from_millis(250)).await;
    }
    Err(eyre!("API did not become healthy within the timeout period."))
}
