// src/utils.rs

use crate::constants;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Makes an arbitrary string safe to use as a file name.
///
/// Forbidden characters become `_`, surrounding whitespace and periods are
/// stripped, whitespace runs collapse to one space and the stem (the part
/// before the last period) is capped at [`constants::MAX_STEM_CHARS`]
/// characters. The extension is never shortened. Empty input stays empty.
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if constants::FORBIDDEN_FILENAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect();
    let trimmed = replaced.trim_matches(|c: char| c == '.' || c.is_whitespace());
    let collapsed = WHITESPACE_RE.replace_all(trimmed, " ");

    let (stem, ext) = split_extension(&collapsed);
    if stem.chars().count() <= constants::MAX_STEM_CHARS {
        return collapsed.into_owned();
    }
    let truncated: String = stem.chars().take(constants::MAX_STEM_CHARS).collect();
    if ext.is_empty() {
        // keeps the result a fixed point of this function
        truncated.trim_end().to_string()
    } else {
        format!("{}{}", truncated, ext)
    }
}

/// Splits a file name on its last period, `("report", ".pdf")`.
///
/// Leading periods never start an extension, so `".bashrc"` has none.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if name[..idx].chars().any(|c| c != '.') => (&name[..idx], &name[idx..]),
        _ => (name, ""),
    }
}

/// Resolves a possibly relative reference against the page it was found on.
pub fn absolutize_url(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    base.join(href).ok()
}

pub fn truncate_text(text: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut end_pos = 0;
    for (i, c) in text.char_indices() {
        width += if c.is_ascii() { 1 } else { 2 };
        if width > max_width.saturating_sub(3) {
            end_pos = i;
            break;
        }
    }
    if end_pos == 0 { text.to_string() } else { format!("{}...", &text[..end_pos]) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        // forbidden characters
        assert_eq!(sanitize_filename("a\\b/c:d*e?f\"g<h>i|j"), "a_b_c_d_e_f_g_h_i_j");

        // surrounding spaces and periods
        assert_eq!(sanitize_filename(" . my file. "), "my file");

        // whitespace runs
        assert_eq!(sanitize_filename("a  b\t\n  c.pdf"), "a b c.pdf");

        // empty stays empty
        assert_eq!(sanitize_filename(""), "");
        assert_eq!(sanitize_filename(" ... "), "");
    }

    #[test]
    fn test_sanitize_filename_caps_stem_but_keeps_extension() {
        let long = format!("{}.pdf", "x".repeat(250));
        let cleaned = sanitize_filename(&long);
        assert_eq!(cleaned, format!("{}.pdf", "x".repeat(200)));

        // multi-byte characters are counted, not bytes
        let long_utf8 = format!("{}.docx", "é".repeat(201));
        let cleaned = sanitize_filename(&long_utf8);
        assert_eq!(cleaned.chars().count(), 200 + ".docx".len());
        assert!(cleaned.ends_with(".docx"));
    }

    #[test]
    fn test_sanitize_filename_properties() {
        let samples = [
            "Lecture 1: Intro/Overview?.pdf",
            "  \t weird   spacing .. ",
            "<<>>",
            "a.b.c",
            ".hidden",
            "report.",
            "日本語 ファイル*名.txt",
        ];
        let mut inputs: Vec<String> = samples.iter().map(|s| s.to_string()).collect();
        inputs.push(format!("{} tail", "word ".repeat(60)));
        inputs.push(format!("{}   {}.zip", "a".repeat(199), "b".repeat(10)));

        for input in &inputs {
            let once = sanitize_filename(input);
            assert!(
                !once.contains(constants::FORBIDDEN_FILENAME_CHARS),
                "forbidden character left in {:?}",
                once
            );
            let (stem, _) = split_extension(&once);
            assert!(stem.chars().count() <= constants::MAX_STEM_CHARS);
            assert_eq!(sanitize_filename(&once), once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("syllabus.pdf"), ("syllabus", ".pdf"));
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_extension("README"), ("README", ""));
        assert_eq!(split_extension(".bashrc"), (".bashrc", ""));
    }

    #[test]
    fn test_absolutize_url() {
        let base = Url::parse("https://lms.example.edu/course/view.php?id=3").unwrap();
        assert_eq!(
            absolutize_url("/files/x.pdf", &base).unwrap().as_str(),
            "https://lms.example.edu/files/x.pdf"
        );
        assert_eq!(
            absolutize_url("https://cdn.example.edu/a.pdf", &base).unwrap().as_str(),
            "https://cdn.example.edu/a.pdf"
        );
        assert!(absolutize_url("   ", &base).is_none());
    }
}
