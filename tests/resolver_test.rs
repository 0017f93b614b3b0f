// tests/resolver_test.rs

use moodle_dl::{
    client::RobustClient,
    config::AppConfig,
    error::AppError,
    models::{LinkCandidate, LinkKind},
    resolver::Resolver,
};
use std::sync::Arc;
use url::Url;

fn resolver_for(server: &mockito::ServerGuard) -> Resolver {
    let config = AppConfig {
        base_url: Url::parse(&format!("{}/", server.url())).unwrap(),
        ..AppConfig::default()
    };
    let client = RobustClient::new(Arc::new(config)).expect("client");
    Resolver::new(Arc::new(client))
}

fn candidate(server: &mockito::ServerGuard, href: &str) -> LinkCandidate {
    LinkCandidate {
        href: href.to_string(),
        data_filename: None,
        text: "Open".to_string(),
        base_url: Url::parse(&format!("{}/course/view.php?id=5", server.url())).unwrap(),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_landing_page_object_data_is_resolved() {
    // --- Arrange ---
    let mut server = mockito::Server::new_async().await;
    let page = server
        .mock("GET", "/mod/page/view.php")
        .match_query(mockito::Matcher::UrlEncoded("id".into(), "31".into()))
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(
            r#"<html><body><div class="resourcecontent">
                <object data="/files/x.pdf" type="application/pdf"></object>
            </div></body></html>"#,
        )
        .expect(1)
        .create_async()
        .await;

    // --- Act ---
    let resolver = resolver_for(&server);
    let target = resolver
        .resolve(&candidate(&server, "/mod/page/view.php?id=31"))
        .await
        .expect("landing page should resolve");

    // --- Assert ---
    assert_eq!(target.kind, LinkKind::Landing);
    assert_eq!(target.url.as_str(), format!("{}/files/x.pdf", server.url()));
    page.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_direct_links_need_no_request() {
    let mut server = mockito::Server::new_async().await;
    let untouched = server
        .mock("GET", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let resolver = resolver_for(&server);
    let target = resolver
        .resolve(&candidate(&server, "/pluginfile.php/4/mod_folder/content/0/a.pdf"))
        .await
        .unwrap();
    assert_eq!(target.kind, LinkKind::FileServing);
    assert_eq!(
        target.url.as_str(),
        format!("{}/pluginfile.php/4/mod_folder/content/0/a.pdf", server.url())
    );

    let target = resolver
        .resolve(&candidate(&server, "/mod/resource/view.php?id=9"))
        .await
        .unwrap();
    assert_eq!(target.kind, LinkKind::Resource);

    untouched.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_landing_page_without_file_is_unresolvable() {
    let mut server = mockito::Server::new_async().await;
    let _page = server
        .mock("GET", "/mod/url/view.php")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body("<html><body><p>This activity links to an external site.</p></body></html>")
        .create_async()
        .await;

    let resolver = resolver_for(&server);
    let err = resolver
        .resolve(&candidate(&server, "/mod/url/view.php?id=2"))
        .await
        .expect_err("nothing to find");
    assert!(matches!(err, AppError::Unresolvable(_)));
}
