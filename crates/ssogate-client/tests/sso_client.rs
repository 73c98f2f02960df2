use mockito::{Matcher, Server};
use reqwest::StatusCode;
use serde_json::json;
use ssogate_client::SsoClient;
use ssogate_core::SsoToken;

#[tokio::test]
async fn request_sso_redirect_encodes_return_url() {
    let mut server = Server::new_async().await;
    let token = server
        .mock("GET", "/token")
        .match_query(Matcher::UrlEncoded(
            "redirect_url".into(),
            "https://app.example.com/projects?tab=open".into(),
        ))
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(json!({ "redirect_url": "https://sso.example.com/login?x=1" }).to_string())
        .expect(1)
        .create_async()
        .await;

    let sso = SsoClient::new(reqwest::Client::new(), &server.url()).expect("client");
    let redirect = sso
        .request_sso_redirect("https://app.example.com/projects?tab=open")
        .await
        .expect("redirect");
    assert_eq!(redirect.redirect_url, "https://sso.example.com/login?x=1");
    token.assert_async().await;
}

#[tokio::test]
async fn exchange_returns_access_token() {
    let mut server = Server::new_async().await;
    let exchange = server
        .mock("GET", "/token")
        .match_query(Matcher::UrlEncoded("sso_token".into(), "code-1".into()))
        .with_status(200)
        .with_body(json!({ "token": "access-1" }).to_string())
        .expect(1)
        .create_async()
        .await;

    let sso = SsoClient::new(reqwest::Client::new(), &server.url()).expect("client");
    let token = sso
        .exchange_sso_token(&SsoToken::parse("code-1").expect("code"))
        .await
        .expect("token");
    assert_eq!(token.as_str(), "access-1");
    exchange.assert_async().await;
}

#[tokio::test]
async fn exchange_forwards_errors() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/token")
        .with_status(422)
        .with_body("sso token already used")
        .create_async()
        .await;

    let sso = SsoClient::new(reqwest::Client::new(), &server.url()).expect("client");
    let err = sso
        .exchange_sso_token(&SsoToken::parse("code-1").expect("code"))
        .await
        .expect_err("rejected");
    assert_eq!(err.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
    assert!(err.to_string().contains("sso token already used"));
}

#[tokio::test]
async fn empty_token_in_exchange_is_an_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/token")
        .with_status(200)
        .with_body(json!({ "token": "" }).to_string())
        .create_async()
        .await;

    let sso = SsoClient::new(reqwest::Client::new(), &server.url()).expect("client");
    let err = sso
        .exchange_sso_token(&SsoToken::parse("code-1").expect("code"))
        .await
        .expect_err("empty token");
    assert_eq!(err.to_string(), "response missing token");
}
