// src/auth.rs

//! Form login and session key extraction.

use crate::{
    client::RobustClient, config::credentials::Credentials, constants::moodle, error::*,
};
use log::{debug, info, warn};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

static SESSKEY_SCRIPT_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r#"M\.cfg\.sesskey\s*=\s*["']([^"']+)["']"#).unwrap(),
        Regex::new(r#""sesskey"\s*:\s*"([^"]+)""#).unwrap(),
    ]
});

type SesskeyStrategy = fn(&Html) -> Option<String>;

const SESSKEY_STRATEGIES: &[(&str, SesskeyStrategy)] = &[
    ("page script", sesskey_from_scripts),
    ("link query", sesskey_from_links),
    ("hidden input", sesskey_from_input),
];

fn auth_failed(stage: &str) -> impl FnOnce(AppError) -> AppError + '_ {
    move |e| AppError::AuthFailed(format!("{}: {}", stage, e))
}

fn input_value(html: &str, name: &'static str) -> Option<String> {
    let document = Html::parse_document(html);
    let css = Selector::parse("input[name]").ok()?;
    document
        .select(&css)
        .find(|el| el.value().attr("name") == Some(name))
        .and_then(|el| el.value().attr("value"))
        .map(str::to_string)
}

/// The hidden `logintoken` of the login form.
pub fn extract_login_token(html: &str) -> Option<String> {
    input_value(html, "logintoken").filter(|t| !t.is_empty())
}

fn sesskey_from_scripts(document: &Html) -> Option<String> {
    let css = Selector::parse("script").ok()?;
    document.select(&css).find_map(|script| {
        let source: String = script.text().collect();
        SESSKEY_SCRIPT_RES
            .iter()
            .find_map(|re| re.captures(&source))
            .map(|caps| caps[1].to_string())
    })
}

fn sesskey_from_links(document: &Html) -> Option<String> {
    let css = Selector::parse("a[href]").ok()?;
    document
        .select(&css)
        .filter_map(|a| a.value().attr("href"))
        .find_map(|href| {
            let (_, rest) = href.split_once("sesskey=")?;
            let key = rest.split('&').next().unwrap_or_default();
            (!key.is_empty()).then(|| key.to_string())
        })
}

fn sesskey_from_input(document: &Html) -> Option<String> {
    let css = Selector::parse("input[name]").ok()?;
    document
        .select(&css)
        .find(|el| el.value().attr("name") == Some("sesskey"))
        .and_then(|el| el.value().attr("value"))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Finds the session key on an authenticated page.
pub fn extract_sesskey(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    SESSKEY_STRATEGIES.iter().find_map(|(source, strategy)| {
        let key = strategy(&document)?;
        debug!("session key found in {}", source);
        Some(key)
    })
}

/// Logs in through the site's login form. The session cookies stay in the
/// client's cookie store.
pub async fn login(client: &RobustClient, credentials: &Credentials) -> AppResult<()> {
    let login_url = client.config().login_url()?;
    info!("fetching login page {}", login_url);
    let (_, page) = client
        .get_page(login_url.clone())
        .await
        .map_err(auth_failed("login page unavailable"))?;

    let token = extract_login_token(&page).unwrap_or_else(|| {
        warn!("no login token on the login page, trying without one");
        String::new()
    });

    info!("logging in as '{}'", credentials.username);
    let form = [
        ("username", credentials.username.as_str()),
        ("password", credentials.password.as_str()),
        ("logintoken", token.as_str()),
    ];
    let res = client
        .post_form(login_url, &form)
        .await
        .map_err(auth_failed("login request failed"))?;
    let final_url = res.url().clone();
    let body = res
        .text()
        .await
        .map_err(|e| auth_failed("login response unreadable")(e.into()))?;
    debug!("login answered from {}", final_url);

    if body.contains(moodle::DASHBOARD_MARKER) {
        info!("login successful");
        Ok(())
    } else {
        debug!("login response starts with: {}", body.chars().take(500).collect::<String>());
        Err(AppError::AuthFailed(
            "the site did not show the dashboard after login, check the user name and password"
                .into(),
        ))
    }
}

pub async fn fetch_sesskey(client: &RobustClient) -> AppResult<String> {
    let dashboard_url = client.config().dashboard_url()?;
    let (_, page) = client
        .get_page(dashboard_url)
        .await
        .map_err(auth_failed("dashboard unavailable"))?;
    extract_sesskey(&page)
        .ok_or_else(|| AppError::AuthFailed("no session key found on the dashboard".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_login_token() {
        let html = r#"<form><input type="hidden" name="logintoken" value="tok123"><input name="username"></form>"#;
        assert_eq!(extract_login_token(html).as_deref(), Some("tok123"));
        assert_eq!(extract_login_token("<form></form>"), None);
    }

    #[test]
    fn test_sesskey_from_cfg_script() {
        let html = r#"<script>var M = {}; M.cfg = {}; M.cfg.sesskey = 'abcDEF123';</script>"#;
        assert_eq!(extract_sesskey(html).as_deref(), Some("abcDEF123"));
    }

    #[test]
    fn test_sesskey_from_json_config() {
        let html = r#"<script>M.cfg = {"wwwroot":"https:\/\/lms.example.edu","sesskey":"Zx9Yw8","sessiontimeout":"7200"};</script>"#;
        assert_eq!(extract_sesskey(html).as_deref(), Some("Zx9Yw8"));
    }

    #[test]
    fn test_sesskey_from_link_then_input() {
        let html = r#"<a href="/course/view.php?id=2">c</a><a href="/login/logout.php?sesskey=LINKKEY&amp;x=1">Log out</a>"#;
        assert_eq!(extract_sesskey(html).as_deref(), Some("LINKKEY"));

        let html = r#"<form><input type="hidden" name="sesskey" value="INPUTKEY"></form>"#;
        assert_eq!(extract_sesskey(html).as_deref(), Some("INPUTKEY"));

        assert_eq!(extract_sesskey("<p>nothing</p>"), None);
    }
}
