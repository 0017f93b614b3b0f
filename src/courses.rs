// src/courses.rs

//! Course enumeration and course page metadata.

use crate::{
    client::RobustClient,
    constants::{self, moodle},
    error::*,
    models::api::{AjaxCall, EnrolledCoursesResponse, TimelineClassificationArgs},
    utils,
};
use log::{debug, info, warn};
use regex::Regex;
use scraper::{Html, Selector};
use std::{collections::BTreeSet, fs, path::Path, sync::LazyLock};

static COURSE_LINK_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"course/view\.php\?id=(\d+)").unwrap());

/// Course ids from a service response: JSON in either of its shapes, or
/// course links when the body is HTML.
pub fn parse_course_ids(body: &str) -> Vec<u64> {
    match serde_json::from_str::<EnrolledCoursesResponse>(body) {
        Ok(response) => {
            for message in response.errors() {
                warn!("course service rejected the call: {}", message);
            }
            response.course_ids()
        }
        Err(e) => {
            debug!("service response is not a course list ({}), scanning for links", e);
            course_ids_from_links(body)
        }
    }
}

fn course_ids_from_links(html: &str) -> Vec<u64> {
    let document = Html::parse_document(html);
    let Ok(anchors) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    document
        .select(&anchors)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| COURSE_LINK_ID_RE.captures(href))
        .filter_map(|caps| caps[1].parse().ok())
        .collect()
}

/// Asks both enrolled-course web services and merges their answers.
/// Failures are logged; the result is empty when nothing worked.
pub async fn discover_course_ids(client: &RobustClient, sesskey: &str) -> Vec<u64> {
    let service_url = match client.config().ajax_service_url() {
        Ok(url) => url,
        Err(e) => {
            warn!("cannot build the service URL: {}", e);
            return Vec::new();
        }
    };

    let mut ids = BTreeSet::new();
    for method in moodle::ENROLLED_COURSES_METHODS {
        info!("asking {} for enrolled courses", method);
        let call = [AjaxCall {
            index: 0,
            methodname: method.to_string(),
            args: TimelineClassificationArgs::for_method(method),
        }];
        let found = match query_service(client, &service_url, sesskey, &call).await {
            Ok(found) => found,
            Err(e) => {
                warn!("{} failed: {}", method, e);
                continue;
            }
        };
        debug!("{} returned course ids {:?}", method, found);
        ids.extend(found);
    }
    ids.into_iter().collect()
}

async fn query_service(
    client: &RobustClient,
    service_url: &url::Url,
    sesskey: &str,
    call: &[AjaxCall<TimelineClassificationArgs>],
) -> AppResult<Vec<u64>> {
    let body = serde_json::to_value(call)?;
    let res = client
        .post_json(service_url.clone(), &[("sesskey", sesskey)], &body)
        .await?;
    let text = res.text().await?;
    Ok(parse_course_ids(&text))
}

/// Writes one id per line to `course_ids.txt` in `dir`.
pub fn save_course_ids(dir: &Path, ids: &[u64]) -> AppResult<()> {
    fs::create_dir_all(dir)?;
    let path = dir.join(constants::COURSE_IDS_FILE_NAME);
    let content: String = ids.iter().map(|id| format!("{}\n", id)).collect();
    fs::write(&path, content)?;
    info!("course ids saved to {}", path.display());
    Ok(())
}

/// Course display name from the course page, `Course_<id>` when the page has none.
pub fn course_name_from_html(html: &str, course_id: u64) -> String {
    let document = Html::parse_document(html);
    let from_title = Selector::parse("title").ok().and_then(|css| {
        let title: String = document.select(&css).next()?.text().collect();
        let name = title.rsplit(':').next().unwrap_or_default().trim().to_string();
        (!name.is_empty()).then_some(name)
    });
    let from_heading = || {
        let css = Selector::parse("h1").ok()?;
        let heading: String = document.select(&css).next()?.text().collect();
        let heading = heading.trim().to_string();
        (!heading.is_empty()).then_some(heading)
    };
    let name = from_title
        .or_else(from_heading)
        .map(|name| utils::sanitize_filename(&name))
        .filter(|name| !name.is_empty());
    name.unwrap_or_else(|| format!("Course_{}", course_id))
}
