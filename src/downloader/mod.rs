// src/downloader/mod.rs

mod course;
pub mod writer;

pub use course::CourseCrawler;

use crate::{
    models::{CourseReport, DownloadStatus},
    symbols, ui,
};
use colored::*;
use log::info;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

#[derive(Clone, Default, Debug)]
pub struct DownloadStats {
    pub courses: usize,
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Run-wide tally shared by every course crawl.
#[derive(Clone)]
pub struct DownloadManager {
    stats: Arc<Mutex<DownloadStats>>,
    failed_downloads: Arc<Mutex<Vec<(String, String)>>>,
    skipped_downloads: Arc<Mutex<Vec<(String, String)>>>,
    course_reports: Arc<Mutex<Vec<CourseReport>>>,
}

impl Default for DownloadManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadManager {
    pub fn new() -> Self {
        Self {
            stats: Arc::new(Mutex::new(DownloadStats::default())),
            failed_downloads: Arc::new(Mutex::new(Vec::new())),
            skipped_downloads: Arc::new(Mutex::new(Vec::new())),
            course_reports: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn record_success(&self) {
        self.stats.lock().unwrap().written += 1;
    }

    pub fn record_skip(&self, label: &str, reason: &str) {
        info!("skipped '{}': {}", label, reason);
        self.stats.lock().unwrap().skipped += 1;
        self.skipped_downloads
            .lock()
            .unwrap()
            .push((label.to_string(), reason.to_string()));
    }

    pub fn record_failure(&self, label: &str, status: DownloadStatus) {
        log::error!("'{}' failed with status {:?}", label, status);
        self.stats.lock().unwrap().failed += 1;
        let (_, _, msg) = status.get_display_info();
        self.failed_downloads
            .lock()
            .unwrap()
            .push((label.to_string(), msg.to_string()));
    }

    pub fn record_course(&self, report: CourseReport) {
        self.stats.lock().unwrap().courses += 1;
        self.course_reports.lock().unwrap().push(report);
    }

    pub fn get_stats(&self) -> DownloadStats {
        self.stats.lock().unwrap().clone()
    }

    pub fn course_reports(&self) -> Vec<CourseReport> {
        self.course_reports.lock().unwrap().clone()
    }

    pub fn print_report(&self) {
        let stats = self.get_stats();
        let skipped = self.skipped_downloads.lock().unwrap();
        let failed = self.failed_downloads.lock().unwrap();
        info!(
            "download report: courses={}, written={}, skipped={}, failed={}",
            stats.courses, stats.written, stats.skipped, stats.failed
        );

        let reports = self.course_reports.lock().unwrap();
        if !reports.is_empty() {
            ui::print_sub_header("Courses");
            for report in reports.iter() {
                println!(
                    "  {} {} (ID: {}): {} written, {} skipped, {} failed",
                    *symbols::INFO,
                    report.course_name,
                    report.course_id,
                    report.written,
                    report.skipped,
                    report.failed
                );
            }
        }

        if !skipped.is_empty() || !failed.is_empty() {
            ui::print_sub_header("Details");
            if !skipped.is_empty() {
                println!("\n{} Skipped ({}):", *symbols::SKIP, stats.skipped);
                print_grouped_report(&skipped, |s| s.cyan());
            }
            if !failed.is_empty() {
                println!("\n{} Failed ({}):", *symbols::ERROR, stats.failed);
                print_grouped_report(&failed, |s| s.red());
            }
        }
        ui::print_sub_header("Summary");
        if stats.failed == 0 && stats.skipped == 0 {
            println!(
                "{} {} files downloaded from {} courses.",
                *symbols::OK,
                stats.written,
                stats.courses
            );
        } else {
            let summary = format!(
                "{} | {} | {}",
                format!("Written: {}", stats.written).green(),
                format!("Failed: {}", stats.failed).red(),
                format!("Skipped: {}", stats.skipped).yellow()
            );
            println!("{}", summary);
        }
    }
}

fn print_grouped_report(items: &[(String, String)], color_fn: fn(ColoredString) -> ColoredString) {
    let mut grouped: HashMap<&String, Vec<&String>> = HashMap::new();
    for (label, reason) in items {
        grouped.entry(reason).or_default().push(label);
    }
    let mut sorted_reasons: Vec<_> = grouped.keys().copied().collect();
    sorted_reasons.sort();
    for reason in sorted_reasons {
        println!("  - {}", color_fn(format!("Reason: {}", reason).into()));
        let mut labels = grouped.get(reason).cloned().unwrap_or_default();
        labels.sort();
        for label in labels {
            println!("    - {}", label);
        }
    }
}
