// tests/auth_test.rs

use mockito::Matcher;
use moodle_dl::{
    auth,
    client::RobustClient,
    config::{AppConfig, credentials::Credentials},
    error::AppError,
};
use std::sync::Arc;
use url::Url;

fn client_for(server: &mockito::ServerGuard) -> RobustClient {
    let config = AppConfig {
        base_url: Url::parse(&format!("{}/", server.url())).unwrap(),
        ..AppConfig::default()
    };
    RobustClient::new(Arc::new(config)).expect("client")
}

fn credentials() -> Credentials {
    Credentials {
        username: "alice".to_string(),
        password: "s3cret!".to_string(),
    }
}

const LOGIN_PAGE: &str = r#"<html><body>
<form action="/login/index.php" method="post" id="login">
  <input type="hidden" name="logintoken" value="tok42">
  <input type="text" name="username">
  <input type="password" name="password">
</form></body></html>"#;

#[tokio::test(flavor = "multi_thread")]
async fn test_login_forwards_token_and_detects_dashboard() {
    // --- Arrange ---
    let mut server = mockito::Server::new_async().await;
    let login_page = server
        .mock("GET", "/login/index.php")
        .with_status(200)
        .with_body(LOGIN_PAGE)
        .create_async()
        .await;
    let login_post = server
        .mock("POST", "/login/index.php")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("username".into(), "alice".into()),
            Matcher::UrlEncoded("password".into(), "s3cret!".into()),
            Matcher::UrlEncoded("logintoken".into(), "tok42".into()),
        ]))
        .with_status(200)
        .with_body("<html><head><title>Dashboard</title></head><body>Welcome back</body></html>")
        .expect(1)
        .create_async()
        .await;

    // --- Act ---
    let client = client_for(&server);
    let result = auth::login(&client, &credentials()).await;

    // --- Assert ---
    assert!(result.is_ok(), "login should succeed: {:?}", result.err());
    login_page.assert_async().await;
    login_post.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_without_dashboard_fails() {
    let mut server = mockito::Server::new_async().await;
    let _login_page = server
        .mock("GET", "/login/index.php")
        .with_status(200)
        .with_body(LOGIN_PAGE)
        .create_async()
        .await;
    let _login_post = server
        .mock("POST", "/login/index.php")
        .with_status(200)
        .with_body("<html><body><div class=\"alert\">Invalid login, please try again</div></body></html>")
        .create_async()
        .await;

    let client = client_for(&server);
    let err = auth::login(&client, &credentials()).await.unwrap_err();
    assert!(matches!(err, AppError::AuthFailed(_)));
    assert!(err.is_fatal());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_page_unreachable_is_auth_failure() {
    let mut server = mockito::Server::new_async().await;
    let _login_page = server
        .mock("GET", "/login/index.php")
        .with_status(403)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = auth::login(&client, &credentials()).await.unwrap_err();
    assert!(matches!(err, AppError::AuthFailed(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_sesskey_from_dashboard() {
    let mut server = mockito::Server::new_async().await;
    let dashboard = server
        .mock("GET", "/my/")
        .with_status(200)
        .with_body(
            r#"<html><head><script>
                //<![CDATA[
                M.cfg = {"wwwroot":"http:\/\/localhost","sesskey":"Qw3rTy12","themerev":"1"};
                //]]>
            </script></head><body>Dashboard</body></html>"#,
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let sesskey = auth::fetch_sesskey(&client).await.unwrap();
    assert_eq!(sesskey, "Qw3rTy12");
    dashboard.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_sesskey_is_auth_failure() {
    let mut server = mockito::Server::new_async().await;
    let _dashboard = server
        .mock("GET", "/my/")
        .with_status(200)
        .with_body("<html><body>Dashboard without any key</body></html>")
        .create_async()
        .await;

    let client = client_for(&server);
    let err = auth::fetch_sesskey(&client).await.unwrap_err();
    assert!(matches!(err, AppError::AuthFailed(_)));
}
