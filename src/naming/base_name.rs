// src/naming/base_name.rs

//! Ordered extractors that propose a file name for a candidate.

use crate::{constants, models::LinkCandidate};
use log::trace;
use percent_encoding::percent_decode_str;
use url::Url;

type BaseNameExtractor = fn(&LinkCandidate, &Url) -> Option<String>;

/// Tried left to right; the first extractor returning a name wins.
const BASE_NAME_EXTRACTORS: &[(&str, BaseNameExtractor)] = &[
    ("data-filename attribute", from_metadata),
    ("link text", from_link_text),
    ("query parameter", from_query),
    ("file-serving path", from_file_serving_path),
    ("last path segment", from_last_segment),
];

pub fn pick_base_name(candidate: &LinkCandidate, url: &Url) -> Option<String> {
    BASE_NAME_EXTRACTORS.iter().find_map(|(source, extract)| {
        extract(candidate, url).inspect(|name| trace!("name '{}' taken from {}", name, source))
    })
}

pub fn is_disallowed_label(name: &str) -> bool {
    let lowered = name.trim().to_lowercase();
    constants::naming::DISALLOWED_LABELS.contains(&lowered.as_str())
}

fn decode(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

fn from_metadata(candidate: &LinkCandidate, _url: &Url) -> Option<String> {
    candidate
        .data_filename
        .as_ref()
        .filter(|name| !name.trim().is_empty())
        .cloned()
}

/// Link text is only trusted when it reads like a file name rather than a label:
/// more than 3 characters, not a URL, and either dotted or longer than 10 characters.
fn from_link_text(candidate: &LinkCandidate, _url: &Url) -> Option<String> {
    let text = candidate.text.trim();
    let length = text.chars().count();
    let looks_like_name = length > 3
        && !text.starts_with("http")
        && (text.contains('.') || length > 10);
    looks_like_name.then(|| text.to_string())
}

fn from_query(_candidate: &LinkCandidate, url: &Url) -> Option<String> {
    constants::naming::QUERY_NAME_PARAMS.iter().find_map(|param| {
        url.query_pairs()
            .find(|(key, value)| key == param && !value.is_empty())
            .map(|(_, value)| value.into_owned())
    })
}

fn from_file_serving_path(_candidate: &LinkCandidate, url: &Url) -> Option<String> {
    let marker = format!("{}/", constants::moodle::FILE_SERVING_MARKER);
    let (_, rest) = url.path().split_once(&marker)?;
    rest.rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(decode)
}

fn from_last_segment(_candidate: &LinkCandidate, url: &Url) -> Option<String> {
    url.path()
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(decode)
}
