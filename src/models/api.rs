// src/models/api.rs

//! Payloads of Moodle's `lib/ajax/service.php` endpoint.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug, Clone)]
pub struct AjaxCall<A: Serialize> {
    pub index: u32,
    pub methodname: String,
    pub args: A,
}

#[derive(Serialize, Debug, Clone)]
pub struct TimelineClassificationArgs {
    pub offset: u32,
    /// 0 means no limit
    pub limit: u32,
    pub classification: String,
    pub sort: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customfieldname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customfieldvalue: Option<String>,
}

impl Default for TimelineClassificationArgs {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 0,
            classification: "all".into(),
            sort: "fullname".into(),
            customfieldname: None,
            customfieldvalue: None,
        }
    }
}

impl TimelineClassificationArgs {
    /// The core web service also expects the (empty) custom field filter.
    pub fn for_method(methodname: &str) -> Self {
        if methodname.starts_with("core_") {
            Self {
                customfieldname: Some(String::new()),
                customfieldvalue: Some(String::new()),
                ..Self::default()
            }
        } else {
            Self::default()
        }
    }
}

/// The service answers a batch of calls with an array, but some deployments
/// return a bare course list object.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum EnrolledCoursesResponse {
    Batch(Vec<AjaxResult>),
    Single(CourseList),
}

#[derive(Deserialize, Debug, Clone)]
pub struct AjaxResult {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub data: Option<CourseList>,
    /// Set when the entry is itself a course rather than a call result.
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub exception: Option<AjaxException>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct CourseList {
    #[serde(default)]
    pub courses: Vec<EnrolledCourse>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct EnrolledCourse {
    pub id: Option<u64>,
    #[serde(default)]
    pub fullname: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AjaxException {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errorcode: Option<String>,
}

impl EnrolledCoursesResponse {
    pub fn course_ids(&self) -> Vec<u64> {
        match self {
            EnrolledCoursesResponse::Single(list) => {
                list.courses.iter().filter_map(|c| c.id).collect()
            }
            EnrolledCoursesResponse::Batch(items) => items
                .iter()
                .flat_map(|item| match &item.data {
                    Some(list) => list.courses.iter().filter_map(|c| c.id).collect::<Vec<_>>(),
                    None => item.id.into_iter().collect(),
                })
                .collect(),
        }
    }

    /// Messages of calls the service rejected.
    pub fn errors(&self) -> Vec<String> {
        match self {
            EnrolledCoursesResponse::Single(_) => Vec::new(),
            EnrolledCoursesResponse::Batch(items) => items
                .iter()
                .filter(|item| item.error)
                .map(|item| match &item.exception {
                    Some(AjaxException { message, errorcode }) => format!(
                        "{} ({})",
                        message.as_deref().unwrap_or("no message"),
                        errorcode.as_deref().unwrap_or("no code")
                    ),
                    None => "unknown error".to_string(),
                })
                .collect(),
        }
    }
}
