#![allow(dead_code)]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use stock_portfolio_api::auth::TokenService;
use stock_portfolio_api::config::AppConfig;
use stock_portfolio_api::database::Store;
use stock_portfolio_api::{router, AppState};

pub const SECRET: &str = "integration-test-secret";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Serve the real router with a fresh in-memory store on an unused port.
    /// The server lives on the calling test's runtime, so every test gets
    /// its own isolated store.
    pub async fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let config = AppConfig::from_lookup(|key| match key {
            "SECRET_KEY" => Some(SECRET.to_string()),
            "DATABASE_URL" => Some("memory://".to_string()),
            "API_ENABLE_REQUEST_LOGGING" => Some("false".to_string()),
            _ => None,
        })?;
        let store = Store::connect(&config.database).await?;
        let app = router(AppState::new(config, store)?);

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind port {}", port))?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let server = Self {
            port,
            base_url,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn signup(&self, username: &str, email: &str, password: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url("/api/auth/signup"))
            .json(&json!({ "username": username, "email": email, "password": password }))
            .send()
            .await?)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?)
    }

    /// Sign up and log in; returns `(user id, bearer token)`.
    pub async fn register(&self, username: &str) -> Result<(Uuid, String)> {
        let email = format!("{}@example.com", username);

        let created: Value = self.signup(username, &email, "correct horse").await?.json().await?;
        let id = created["id"]
            .as_str()
            .context("signup response has no id")?
            .parse()?;

        let body: Value = self.login(&email, "correct horse").await?.json().await?;
        let token = body["token"]
            .as_str()
            .context("login response has no token")?
            .to_string();

        Ok((id, token))
    }

    pub async fn add_holding(&self, token: &str, ticker: &str, quantity: f64, buy_price: f64) -> Result<Value> {
        let resp = self
            .client
            .post(self.url("/api/stocks"))
            .bearer_auth(token)
            .json(&json!({
                "name": format!("{} Inc", ticker),
                "ticker": ticker,
                "quantity": quantity,
                "buyPrice": buy_price,
            }))
            .send()
            .await?;
        anyhow::ensure!(resp.status() == StatusCode::CREATED, "create failed: {}", resp.status());
        Ok(resp.json().await?)
    }
}

/// A correctly signed token that expired two hours ago.
pub fn expired_token(user_id: Uuid) -> String {
    TokenService::new(SECRET, chrono::Duration::hours(-2))
        .and_then(|tokens| tokens.issue(user_id))
        .expect("token service")
}
