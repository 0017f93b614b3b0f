// src/constants.rs

pub const UI_WIDTH: usize = 88;
pub const FILENAME_TRUNCATE_LENGTH: usize = 65;
pub const MAX_STEM_CHARS: usize = 200;
pub const CONFIG_DIR_NAME: &str = concat!(".", clap::crate_name!());
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_FILE_NAME: &str = concat!(clap::crate_name!(), ".log");
pub const COURSE_IDS_FILE_NAME: &str = "course_ids.txt";
pub const DEFAULT_BASE_URL: &str = "https://moodle.iitb.ac.in";
pub const DEFAULT_SAVE_DIR: &str = "moodle_downloads";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Buffer size used when streaming a response body to disk.
pub const WRITE_CHUNK_SIZE: usize = 8192;
/// Number of leading body bytes inspected by signature sniffing.
pub const SNIFF_LEN: usize = 8;
/// Bodies smaller than this are most likely an error page.
pub const SUSPICIOUS_BODY_LEN: usize = 100;

pub const FORBIDDEN_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

pub mod env {
    pub const BASE_URL: &str = "MOODLE_URL";
    pub const USERNAME: &str = "MOODLE_USERNAME";
    pub const PASSWORD: &str = "MOODLE_PASSWORD";
    pub const DOWNLOAD_FOLDER: &str = "MOODLE_DOWNLOAD_FOLDER";
    pub const RETRY_ATTEMPTS: &str = "MOODLE_RETRY_ATTEMPTS";
    pub const RETRY_BACKOFF: &str = "MOODLE_RETRY_BACKOFF";
    pub const REQUEST_DELAY: &str = "MOODLE_REQUEST_DELAY";
}

pub mod moodle {
    pub const LOGIN_PATH: &str = "login/index.php";
    pub const DASHBOARD_PATH: &str = "my/";
    pub const COURSE_VIEW_PATH: &str = "course/view.php";
    pub const AJAX_SERVICE_PATH: &str = "lib/ajax/service.php";
    pub const DASHBOARD_MARKER: &str = "Dashboard";

    /// Path segment of URLs that serve file bytes directly.
    pub const FILE_SERVING_MARKER: &str = "pluginfile.php";
    /// Path segment of resource module links.
    pub const RESOURCE_MARKER: &str = "/resource/";
    pub const RESOURCE_WORKAROUND_CLASS: &str = "resourceworkaround";

    pub const ENROLLED_COURSES_METHODS: &[&str] = &[
        "core_course_get_enrolled_courses_by_timeline_classification",
        "block_myoverview_get_enrolled_courses_by_timeline_classification",
    ];
}

pub mod naming {
    /// Link labels that never make a usable file name.
    pub const DISALLOWED_LABELS: &[&str] = &["click", "download", "file", "pluginfile.php"];
    pub const REJECTED_EXTENSION: &str = ".php";
    pub const QUERY_NAME_PARAMS: &[&str] = &["file", "forcedownload"];
    pub const FALLBACK_PREFIX: &str = "file";
}

pub const HELP_COURSE_ID_GUIDE: &str = r#"
No course IDs could be discovered automatically. To find them by hand:
1. Log in to your Moodle site in a browser.
2. Open any course.
3. Look at the address bar, it reads like: .../course/view.php?id=XXXX
4. The number after "id=" is the course ID.
5. Collect the IDs of every course you want to download.

Then pass them on the command line:
----------------------------------------------
  moodle-dl COURSE_ID1 COURSE_ID2 ...
----------------------------------------------"#;
