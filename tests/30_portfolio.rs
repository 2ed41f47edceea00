mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

use common::TestServer;

async fn get_json(server: &TestServer, token: &str, path: &str) -> Result<(StatusCode, Value)> {
    let res = server.client.get(server.url(path)).bearer_auth(token).send().await?;
    let status = res.status();
    Ok((status, res.json().await?))
}

#[tokio::test]
async fn portfolio_value_is_zero_without_holdings() -> Result<()> {
    let server = TestServer::spawn().await?;
    let (_, token) = server.register("alice").await?;

    let (status, body) = get_json(&server, &token, "/api/stocks/portfolio-value").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalValue"], 0.0);
    Ok(())
}

#[tokio::test]
async fn portfolio_value_sums_own_holdings() -> Result<()> {
    let server = TestServer::spawn().await?;
    let (_, alice) = server.register("alice").await?;
    let (_, bob) = server.register("bob").await?;
    server.add_holding(&alice, "AAPL", 10.0, 150.0).await?;
    server.add_holding(&alice, "MSFT", 2.0, 250.0).await?;
    server.add_holding(&bob, "TSLA", 100.0, 100.0).await?;

    let (status, body) = get_json(&server, &alice, "/api/stocks/portfolio-value").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalValue"], 2000.0);
    Ok(())
}

#[tokio::test]
async fn portfolio_value_that_overflows_is_unprocessable() -> Result<()> {
    let server = TestServer::spawn().await?;
    let (_, token) = server.register("alice").await?;
    server.add_holding(&token, "A", 1e308, 1.0).await?;
    server.add_holding(&token, "B", 1e308, 1.0).await?;

    for path in ["/api/stocks/portfolio-value", "/api/stocks/dashboard"] {
        let (status, body) = get_json(&server, &token, path).await?;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", path);
        assert!(body["error"].is_string(), "{}", path);
    }
    Ok(())
}

#[tokio::test]
async fn dashboard_without_holdings_is_not_found() -> Result<()> {
    let server = TestServer::spawn().await?;
    let (_, token) = server.register("alice").await?;

    let (status, body) = get_json(&server, &token, "/api/stocks/dashboard").await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No stocks found for this user.");
    Ok(())
}

#[tokio::test]
async fn dashboard_summarises_portfolio() -> Result<()> {
    let server = TestServer::spawn().await?;
    let (user_id, token) = server.register("alice").await?;
    server.add_holding(&token, "A", 1.0, 100.0).await?;
    server.add_holding(&token, "B", 1.0, 300.0).await?;

    let (status, body) = get_json(&server, &token, "/api/stocks/dashboard").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["userId"], user_id.to_string());
    assert_eq!(body["totalValue"], 400.0);
    assert_eq!(body["topPerformingStock"]["ticker"], "B");
    assert_eq!(body["portfolioDistribution"]["A"], "25.00");
    assert_eq!(body["portfolioDistribution"]["B"], "75.00");
    Ok(())
}

#[tokio::test]
async fn dashboard_rounds_half_shares_up() -> Result<()> {
    let server = TestServer::spawn().await?;
    let (_, token) = server.register("alice").await?;
    server.add_holding(&token, "A", 1.0, 1.0).await?;
    server.add_holding(&token, "B", 1.0, 799.0).await?;

    let (_, body) = get_json(&server, &token, "/api/stocks/dashboard").await?;

    assert_eq!(body["portfolioDistribution"]["A"], "0.13");
    assert_eq!(body["portfolioDistribution"]["B"], "99.88");
    Ok(())
}

#[tokio::test]
async fn dashboard_tie_goes_to_first_holding() -> Result<()> {
    let server = TestServer::spawn().await?;
    let (_, token) = server.register("alice").await?;
    server.add_holding(&token, "A", 1.0, 100.0).await?;
    server.add_holding(&token, "B", 1.0, 100.0).await?;

    let (_, body) = get_json(&server, &token, "/api/stocks/dashboard").await?;

    assert_eq!(body["topPerformingStock"]["ticker"], "A");
    Ok(())
}

#[tokio::test]
async fn dashboard_with_zero_value_is_unprocessable() -> Result<()> {
    let server = TestServer::spawn().await?;
    let (_, token) = server.register("alice").await?;
    server.add_holding(&token, "A", 0.0, 100.0).await?;

    let (status, body) = get_json(&server, &token, "/api/stocks/dashboard").await?;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
    Ok(())
}

#[tokio::test]
async fn metrics_require_authentication() -> Result<()> {
    let server = TestServer::spawn().await?;

    for path in ["/api/stocks/portfolio-value", "/api/stocks/dashboard"] {
        let res = server.client.get(server.url(path)).send().await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{}", path);
    }
    Ok(())
}
