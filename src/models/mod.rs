// src/models/mod.rs

pub mod api;

use crate::error::AppError;
use crate::symbols;
use colored::{ColoredString, Colorize};
use std::path::PathBuf;
use url::Url;

/// An anchor scraped from a course page, considered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCandidate {
    pub href: String,
    pub data_filename: Option<String>,
    pub text: String,
    /// URL of the page the anchor was found on.
    pub base_url: Url,
}

/// How an href was classified by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Points at the file-serving script.
    FileServing,
    /// Points into a resource module; usually redirects to the file.
    Resource,
    /// A view page wrapping the file.
    Landing,
}

#[derive(Debug, Clone)]
pub struct HeadInfo {
    pub status: u16,
    /// URL after redirects were followed.
    pub final_url: Url,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResolvedTarget {
    pub url: Url,
    pub kind: LinkKind,
}

/// Extension candidates, most trusted first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionEvidence {
    pub existing: Option<String>,
    pub url: Option<String>,
    pub header: Option<String>,
    pub signature: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferredName {
    pub base_name: String,
    pub extension: Option<String>,
}

impl InferredName {
    pub fn file_name(&self) -> String {
        format!("{}{}", self.base_name, self.extension.as_deref().unwrap_or(""))
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedFile {
    pub name: InferredName,
    pub path: PathBuf,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DownloadStatus {
    Unresolvable,
    HttpError,
    NetworkError,
    ConnectionError,
    TimeoutError,
    WriteError,
    UnexpectedError,
}

impl DownloadStatus {
    pub fn get_display_info(
        &self,
    ) -> (
        &'static ColoredString,
        fn(ColoredString) -> ColoredString,
        &'static str,
    ) {
        match self {
            DownloadStatus::Unresolvable => (&symbols::SKIP, |s| s.dimmed(), "file location not found"),
            DownloadStatus::HttpError => (&symbols::ERROR, |s| s.red(), "server returned an error"),
            DownloadStatus::NetworkError => (&symbols::ERROR, |s| s.red(), "network request failed"),
            DownloadStatus::ConnectionError => (&symbols::ERROR, |s| s.red(), "could not connect"),
            DownloadStatus::TimeoutError => (&symbols::WARN, |s| s.yellow(), "request timed out"),
            DownloadStatus::WriteError => (&symbols::ERROR, |s| s.red(), "writing the file failed"),
            DownloadStatus::UnexpectedError => (&symbols::ERROR, |s| s.red(), "unexpected error"),
        }
    }
}

impl From<&AppError> for DownloadStatus {
    fn from(error: &AppError) -> Self {
        match error {
            AppError::Network(err)
            | AppError::NetworkMiddleware(reqwest_middleware::Error::Reqwest(err)) => {
                if err.is_timeout() {
                    DownloadStatus::TimeoutError
                } else if err.is_connect() {
                    DownloadStatus::ConnectionError
                } else if err.is_status() {
                    DownloadStatus::HttpError
                } else {
                    DownloadStatus::NetworkError
                }
            }
            AppError::NetworkMiddleware(_) => DownloadStatus::NetworkError,
            AppError::Unresolvable(_) => DownloadStatus::Unresolvable,
            AppError::WriteFailure { .. } | AppError::Io(_) => DownloadStatus::WriteError,
            _ => DownloadStatus::UnexpectedError,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CourseReport {
    pub course_id: u64,
    pub course_name: String,
    pub folder: PathBuf,
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
}
