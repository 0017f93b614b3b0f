// src/resolver/mod.rs

//! Turns scraped anchors into absolute, downloadable URLs.

mod landing;

pub use landing::find_file_url;

use crate::{
    client::RobustClient,
    constants::moodle,
    error::*,
    models::{LinkCandidate, LinkKind, ResolvedTarget},
    utils,
};
use scraper::{Html, Selector};
use std::sync::Arc;
use url::Url;

/// Classifies an href by the markers it carries.
pub fn classify(href: &str) -> LinkKind {
    if href.contains(moodle::FILE_SERVING_MARKER) {
        LinkKind::FileServing
    } else if href.contains(moodle::RESOURCE_MARKER) {
        LinkKind::Resource
    } else {
        LinkKind::Landing
    }
}

/// Anchors on a course page that point at a file or a resource module.
pub fn collect_candidates(html: &str, base_url: &Url) -> Vec<LinkCandidate> {
    let document = Html::parse_document(html);
    let Ok(anchors) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    document
        .select(&anchors)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            if !href.contains(moodle::FILE_SERVING_MARKER) && !href.contains(moodle::RESOURCE_MARKER) {
                return None;
            }
            Some(LinkCandidate {
                href: href.to_string(),
                data_filename: a.value().attr("data-filename").map(str::to_string),
                text: a.text().collect::<String>().trim().to_string(),
                base_url: base_url.clone(),
            })
        })
        .collect()
}

pub struct Resolver {
    http_client: Arc<RobustClient>,
}

impl Resolver {
    pub fn new(http_client: Arc<RobustClient>) -> Self {
        Self { http_client }
    }

    pub async fn resolve(&self, candidate: &LinkCandidate) -> AppResult<ResolvedTarget> {
        let url = utils::absolutize_url(&candidate.href, &candidate.base_url)
            .ok_or_else(|| AppError::Unresolvable(candidate.href.clone()))?;
        let kind = classify(&candidate.href);
        let url = match kind {
            LinkKind::Landing => self.resolve_landing(&url).await?,
            LinkKind::FileServing | LinkKind::Resource => url,
        };
        Ok(ResolvedTarget { url, kind })
    }

    /// Fetches a view page and returns the file URL it advertises.
    pub async fn resolve_landing(&self, page_url: &Url) -> AppResult<Url> {
        let (final_url, body) = self.http_client.get_page(page_url.clone()).await?;
        find_file_url(&body, &final_url).ok_or_else(|| AppError::Unresolvable(page_url.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(
            classify("https://lms.example.edu/pluginfile.php/9/mod_folder/content/0/a.pdf"),
            LinkKind::FileServing
        );
        assert_eq!(
            classify("https://lms.example.edu/mod/resource/view.php?id=4"),
            LinkKind::Resource
        );
        assert_eq!(classify("https://lms.example.edu/mod/page/view.php?id=4"), LinkKind::Landing);
    }

    #[test]
    fn test_collect_candidates() {
        let base = Url::parse("https://lms.example.edu/course/view.php?id=5").unwrap();
        let html = r#"
            <ul>
              <li><a href="/mod/resource/view.php?id=10"><span>Week 1 slides</span></a></li>
              <li><a href="/mod/forum/view.php?id=11">Announcements</a></li>
              <li><a data-filename="notes.pdf" href="https://lms.example.edu/pluginfile.php/3/mod_folder/content/0/notes.pdf?forcedownload=1"> notes.pdf </a></li>
              <li><a>no href</a></li>
            </ul>
        "#;
        let candidates = collect_candidates(html, &base);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].href, "/mod/resource/view.php?id=10");
        assert_eq!(candidates[0].text, "Week 1 slides");
        assert_eq!(candidates[0].data_filename, None);
        assert_eq!(candidates[1].data_filename.as_deref(), Some("notes.pdf"));
        assert_eq!(candidates[1].text, "notes.pdf");
        assert_eq!(candidates[1].base_url, base);
    }
}
