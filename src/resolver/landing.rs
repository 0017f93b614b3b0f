// src/resolver/landing.rs

//! Finds the real file behind a resource view page.

use crate::{constants, utils};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

static DOWNLOAD_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Download|View").unwrap());
static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());
static OBJECT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("object[data]").unwrap());
static EMBED_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("embed[src]").unwrap());

type LandingStrategy = fn(&Html) -> Option<String>;

/// Searched in order; the first hit wins.
const LANDING_STRATEGIES: &[(&str, LandingStrategy)] = &[
    ("resourceworkaround anchor", workaround_anchor),
    ("embedded object", embedded_object),
    ("download label", download_label_anchor),
    ("file-serving anchor", file_serving_anchor),
];

fn workaround_anchor(document: &Html) -> Option<String> {
    document
        .select(&ANCHOR_SELECTOR)
        .find(|a| {
            a.value()
                .classes()
                .any(|class| class == constants::moodle::RESOURCE_WORKAROUND_CLASS)
        })
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
}

fn embedded_object(document: &Html) -> Option<String> {
    document
        .select(&OBJECT_SELECTOR)
        .find_map(|el| el.value().attr("data"))
        .or_else(|| document.select(&EMBED_SELECTOR).find_map(|el| el.value().attr("src")))
        .map(str::to_string)
}

fn download_label_anchor(document: &Html) -> Option<String> {
    document
        .select(&ANCHOR_SELECTOR)
        .find(|a| DOWNLOAD_LABEL_RE.is_match(a.text().collect::<String>().trim()))
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
}

fn file_serving_anchor(document: &Html) -> Option<String> {
    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|a| a.value().attr("href"))
        .find(|href| href.contains(constants::moodle::FILE_SERVING_MARKER))
        .map(str::to_string)
}

/// Returns the absolute file URL advertised by a view page, if any.
pub fn find_file_url(html: &str, page_url: &Url) -> Option<Url> {
    let document = Html::parse_document(html);
    LANDING_STRATEGIES.iter().find_map(|(name, strategy)| {
        let href = strategy(&document)?;
        log::debug!("view page {} resolved through {}: {}", page_url, name, href);
        utils::absolutize_url(&href, page_url)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Url {
        Url::parse("https://lms.example.edu/mod/resource/view.php?id=12").unwrap()
    }

    #[test]
    fn test_workaround_anchor_wins() {
        let html = r#"
            <object data="/files/embedded.pdf"></object>
            <a class="btn resourceworkaround" href="https://lms.example.edu/pluginfile.php/1/mod_resource/content/1/real.pdf">real.pdf</a>
        "#;
        assert_eq!(
            find_file_url(html, &page()).unwrap().as_str(),
            "https://lms.example.edu/pluginfile.php/1/mod_resource/content/1/real.pdf"
        );
    }

    #[test]
    fn test_object_data() {
        let html = r#"<div class="resourcecontent"><object data="/files/x.pdf" type="application/pdf"></object></div>"#;
        assert_eq!(
            find_file_url(html, &page()).unwrap().as_str(),
            "https://lms.example.edu/files/x.pdf"
        );
    }

    #[test]
    fn test_download_label_then_file_serving_anchor() {
        let html = r#"
            <a href="/course/view.php?id=3">Back to course</a>
            <a href="/mod/resource/download.php?id=12"> Download file </a>
        "#;
        assert_eq!(
            find_file_url(html, &page()).unwrap().as_str(),
            "https://lms.example.edu/mod/resource/download.php?id=12"
        );

        let html = r#"
            <a href="/course/view.php?id=3">Back</a>
            <a href="pluginfile.php/77/mod_resource/content/2/notes.docx">notes</a>
        "#;
        assert_eq!(
            find_file_url(html, &page()).unwrap().as_str(),
            "https://lms.example.edu/mod/resource/pluginfile.php/77/mod_resource/content/2/notes.docx"
        );
    }

    #[test]
    fn test_nothing_found() {
        let html = r#"<html><body><p>Nothing to see</p><a href="/my/">Dashboard</a></body></html>"#;
        assert!(find_file_url(html, &page()).is_none());
    }
}
