// src/naming/mod.rs

//! File identity inference: decides the base name and extension a candidate
//! is saved under. Nothing in here performs I/O; the crawler collects the
//! HEAD and byte sniffing and hands them in.

mod base_name;
mod extension;

pub use base_name::{is_disallowed_label, pick_base_name};
pub use extension::{
    extension_from_content_type, extension_from_signature, extension_from_url, select_extension,
};

use crate::{
    constants,
    models::{ExtensionEvidence, InferredName, LinkCandidate},
    utils,
};
use log::debug;
use url::Url;

/// Produces `file_<timestamp>_<n>` names for candidates no signal could name.
#[derive(Debug, Default)]
pub struct FallbackNamer {
    counter: u64,
}

impl FallbackNamer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_name(&mut self) -> String {
        self.next_name_at(chrono::Utc::now().timestamp())
    }

    pub fn next_name_at(&mut self, unix_timestamp: i64) -> String {
        let name = format!(
            "{}_{}_{}",
            constants::naming::FALLBACK_PREFIX,
            unix_timestamp,
            self.counter
        );
        self.counter += 1;
        name
    }
}

/// A name decision in progress: the base name is fixed, the extension
/// evidence can still be completed by sniffing the first bytes.
#[derive(Debug, Clone)]
pub struct NamePlan {
    base_name: String,
    evidence: ExtensionEvidence,
}

impl NamePlan {
    pub fn new(
        candidate: &LinkCandidate,
        url: &Url,
        content_type: Option<&str>,
        fallback: impl FnOnce() -> String,
    ) -> Self {
        let chosen = pick_base_name(candidate, url)
            .filter(|name| !is_disallowed_label(name))
            .map(|name| utils::sanitize_filename(&name))
            .filter(|name| !name.is_empty());
        let sanitized = match chosen {
            Some(name) => name,
            None => {
                let name = utils::sanitize_filename(&fallback());
                debug!("no usable name for '{}', using '{}'", candidate.href, name);
                name
            }
        };

        let (stem, existing) = utils::split_extension(&sanitized);
        let evidence = ExtensionEvidence {
            existing: (existing.len() > 1).then(|| existing.to_string()),
            url: extension_from_url(url),
            header: content_type.and_then(extension_from_content_type),
            signature: None,
        };
        Self {
            base_name: stem.to_string(),
            evidence,
        }
    }

    /// True while no tier short of the byte signature yields an extension.
    pub fn needs_signature(&self) -> bool {
        select_extension(&self.evidence).is_none()
    }

    pub fn add_signature(&mut self, leading_bytes: &[u8]) {
        self.evidence.signature = extension_from_signature(leading_bytes);
    }

    pub fn evidence(&self) -> &ExtensionEvidence {
        &self.evidence
    }

    pub fn finish(self) -> InferredName {
        let extension = select_extension(&self.evidence);
        InferredName {
            base_name: self.base_name,
            extension,
        }
    }
}

/// One-shot inference over already collected evidence.
pub fn infer_name(
    candidate: &LinkCandidate,
    url: &Url,
    content_type: Option<&str>,
    leading_bytes: Option<&[u8]>,
    fallback: impl FnOnce() -> String,
) -> InferredName {
    let mut plan = NamePlan::new(candidate, url, content_type, fallback);
    if let Some(bytes) = leading_bytes {
        plan.add_signature(bytes);
    }
    plan.finish()
}
