// src/naming/extension.rs

use crate::{catalog, constants, models::ExtensionEvidence, utils};
use percent_encoding::percent_decode_str;
use url::Url;

type ExtensionTier = fn(&ExtensionEvidence) -> Option<&String>;

/// Trust order of the evidence. `.php` is never accepted from any tier.
const EXTENSION_TIERS: &[ExtensionTier] = &[existing_tier, url_tier, header_tier, signature_tier];

fn existing_tier(e: &ExtensionEvidence) -> Option<&String> {
    e.existing.as_ref()
}

fn url_tier(e: &ExtensionEvidence) -> Option<&String> {
    e.url.as_ref()
}

fn header_tier(e: &ExtensionEvidence) -> Option<&String> {
    e.header.as_ref()
}

fn signature_tier(e: &ExtensionEvidence) -> Option<&String> {
    e.signature.as_ref()
}

fn is_usable(ext: &str) -> bool {
    ext.len() > 1 && !ext.eq_ignore_ascii_case(constants::naming::REJECTED_EXTENSION)
}

pub fn select_extension(evidence: &ExtensionEvidence) -> Option<String> {
    EXTENSION_TIERS
        .iter()
        .filter_map(|tier| tier(evidence))
        .find(|ext| is_usable(ext))
        .cloned()
}

/// Extension of the URL's last path segment, lower-cased.
pub fn extension_from_url(url: &Url) -> Option<String> {
    let segment = url.path().rsplit('/').next()?;
    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    let (_, ext) = utils::split_extension(&decoded);
    (ext.len() > 1).then(|| ext.to_lowercase())
}

pub fn extension_from_content_type(content_type: &str) -> Option<String> {
    catalog::extension_for_mime(content_type).map(str::to_string)
}

pub fn extension_from_signature(leading_bytes: &[u8]) -> Option<String> {
    catalog::extension_for_signature(leading_bytes).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evidence(
        existing: Option<&str>,
        url: Option<&str>,
        header: Option<&str>,
        signature: Option<&str>,
    ) -> ExtensionEvidence {
        ExtensionEvidence {
            existing: existing.map(str::to_string),
            url: url.map(str::to_string),
            header: header.map(str::to_string),
            signature: signature.map(str::to_string),
        }
    }

    #[test]
    fn test_priority_order() {
        let e = evidence(Some(".docx"), Some(".pdf"), Some(".txt"), Some(".zip"));
        assert_eq!(select_extension(&e).as_deref(), Some(".docx"));

        let e = evidence(None, Some(".pdf"), Some(".txt"), None);
        assert_eq!(select_extension(&e).as_deref(), Some(".pdf"));

        let e = evidence(None, None, None, Some(".png"));
        assert_eq!(select_extension(&e).as_deref(), Some(".png"));

        assert_eq!(select_extension(&ExtensionEvidence::default()), None);
    }

    #[test]
    fn test_php_is_rejected_at_every_tier() {
        let header = extension_from_content_type("application/pdf");
        let e = ExtensionEvidence {
            existing: Some(".php".into()),
            url: Some(".php".into()),
            header,
            signature: None,
        };
        assert_eq!(select_extension(&e).as_deref(), Some(".pdf"));

        let e = evidence(Some(".PHP"), Some(".php"), None, Some(".zip"));
        assert_eq!(select_extension(&e).as_deref(), Some(".zip"));

        let e = evidence(Some(".php"), None, None, None);
        assert_eq!(select_extension(&e), None);
    }

    #[test]
    fn test_extension_from_url() {
        let u = Url::parse("https://lms.example.edu/pluginfile.php/1/c/0/Notes.PDF?forcedownload=1").unwrap();
        assert_eq!(extension_from_url(&u).as_deref(), Some(".pdf"));

        let u = Url::parse("https://lms.example.edu/mod/resource/view.php?id=3").unwrap();
        assert_eq!(extension_from_url(&u).as_deref(), Some(".php"));

        let u = Url::parse("https://lms.example.edu/a.b/folder/").unwrap();
        assert_eq!(extension_from_url(&u), None);

        let u = Url::parse("https://lms.example.edu/files/report%2Efinal.xlsx").unwrap();
        assert_eq!(extension_from_url(&u).as_deref(), Some(".xlsx"));
    }
}
