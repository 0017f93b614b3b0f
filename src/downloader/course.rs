// src/downloader/course.rs

use super::writer;
use crate::{
    CrawlContext, catalog, constants, courses,
    error::*,
    models::{CourseReport, DownloadStatus, HeadInfo, LinkCandidate, LinkKind, ResolvedFile},
    naming::NamePlan,
    resolver::{self, Resolver},
    symbols, ui, utils,
};
use futures::StreamExt;
use indicatif::ProgressBar;
use log::{debug, error, info, warn};
use reqwest::header;
use std::{fs, path::Path, sync::atomic::Ordering};
use url::Url;

/// Downloads every file linked from one course page, one candidate at a time.
pub struct CourseCrawler {
    context: CrawlContext,
    resolver: Resolver,
}

impl CourseCrawler {
    pub fn new(context: CrawlContext) -> Self {
        let resolver = Resolver::new(context.http_client.clone());
        Self { context, resolver }
    }

    fn is_cancelled(&self) -> bool {
        self.context.cancellation_token.load(Ordering::Relaxed)
    }

    pub async fn crawl(&self, course_id: u64) -> AppResult<CourseReport> {
        let course_url = self.context.config.course_url(course_id)?;
        let (page_url, html) = self.context.http_client.get_page(course_url).await?;

        let course_name = courses::course_name_from_html(&html, course_id);
        let folder = self
            .context
            .config
            .output_dir
            .join(utils::sanitize_filename(&course_name));
        fs::create_dir_all(&folder)?;

        let candidates = resolver::collect_candidates(&html, &page_url);
        info!(
            "course {} '{}': {} candidate links, saving to {}",
            course_id,
            course_name,
            candidates.len(),
            folder.display()
        );
        ui::print_course_banner(&course_name, course_id, candidates.len(), &folder);

        let mut report = CourseReport {
            course_id,
            course_name,
            folder: folder.clone(),
            ..Default::default()
        };

        let pbar = ui::new_tasks_progress_bar(candidates.len() as u64, "Files");
        for candidate in &candidates {
            if self.is_cancelled() {
                pbar.finish_and_clear();
                return Err(AppError::UserInterrupt);
            }
            let label = candidate_label(candidate);
            pbar.set_message(utils::truncate_text(&label, constants::FILENAME_TRUNCATE_LENGTH));

            match self.process_candidate(candidate, &folder).await {
                Ok(file) => {
                    report.written += 1;
                    self.context.manager.record_success();
                    pbar.println(format!("{} {}", *symbols::OK, file_display_name(&file)));
                }
                Err(e) if e.is_fatal() => {
                    pbar.finish_and_clear();
                    return Err(e);
                }
                Err(e) => {
                    let status = DownloadStatus::from(&e);
                    self.report_failure(&pbar, &label, status, &e);
                    if status == DownloadStatus::Unresolvable {
                        report.skipped += 1;
                    } else {
                        report.failed += 1;
                    }
                }
            }
            pbar.inc(1);
        }
        pbar.finish_and_clear();

        info!(
            "course {} done: {} written, {} skipped, {} failed",
            course_id, report.written, report.skipped, report.failed
        );
        self.context.manager.record_course(report.clone());
        Ok(report)
    }

    fn report_failure(&self, pbar: &ProgressBar, label: &str, status: DownloadStatus, e: &AppError) {
        let (symbol, color_fn, default_msg) = status.get_display_info();
        if status == DownloadStatus::Unresolvable {
            warn!("skipping '{}': {}", label, e);
            self.context.manager.record_skip(label, default_msg);
        } else {
            error!("'{}' failed: {}", label, e);
            self.context.manager.record_failure(label, status);
        }
        pbar.println(format!(
            "{} {} {}",
            symbol,
            utils::truncate_text(label, constants::FILENAME_TRUNCATE_LENGTH),
            color_fn(format!("{} ({})", default_msg, e).into())
        ));
    }

    async fn fetch_head(&self, url: &Url) -> AppResult<HeadInfo> {
        let res = self.context.http_client.head(url.clone()).await?;
        let content_type = res
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Ok(HeadInfo {
            status: res.status().as_u16(),
            final_url: res.url().clone(),
            content_type,
        })
    }

    async fn process_candidate(
        &self,
        candidate: &LinkCandidate,
        folder: &Path,
    ) -> AppResult<ResolvedFile> {
        let mut target = self.resolver.resolve(candidate).await?;
        let mut head = self.fetch_head(&target.url).await?;
        debug!(
            "HEAD {} -> {} {:?} at {}",
            target.url, head.status, head.content_type, head.final_url
        );

        let is_view_page = head.content_type.as_deref().is_some_and(catalog::is_html);
        if target.kind == LinkKind::Resource && is_view_page {
            debug!("{} is a view page, looking for the file behind it", head.final_url);
            let file_url = self.resolver.resolve_landing(&head.final_url).await?;
            target.kind = LinkKind::Landing;
            head = self.fetch_head(&file_url).await?;
        }
        target.url = head.final_url.clone();

        let mut plan = NamePlan::new(
            candidate,
            &target.url,
            head.content_type.as_deref(),
            || self.next_fallback_name(),
        );

        let res = self.context.http_client.get(target.url.clone()).await?;
        let mut body = Box::pin(res.bytes_stream());
        let mut prefix = Vec::new();
        if plan.needs_signature() {
            let mut sniffed = Vec::with_capacity(constants::SNIFF_LEN);
            while sniffed.len() < constants::SNIFF_LEN {
                match body.next().await {
                    Some(chunk) => {
                        let chunk = chunk?;
                        sniffed.extend_from_slice(&chunk);
                        prefix.push(chunk);
                    }
                    None => break,
                }
            }
            sniffed.truncate(constants::SNIFF_LEN);
            plan.add_signature(&sniffed);
        }

        debug!("name evidence for {}: {:?}", target.url, plan.evidence());
        let name = plan.finish();
        let path = writer::write_stream(folder, &name.file_name(), prefix, body).await?;
        info!("saved {} ({:?} link) as {}", target.url, target.kind, path.display());
        Ok(ResolvedFile { name, path })
    }

    fn next_fallback_name(&self) -> String {
        match self.context.fallback_names.lock() {
            Ok(mut namer) => namer.next_name(),
            Err(poisoned) => poisoned.into_inner().next_name(),
        }
    }
}

fn candidate_label(candidate: &LinkCandidate) -> String {
    candidate
        .data_filename
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| Some(candidate.text.as_str()).filter(|s| !s.is_empty()))
        .unwrap_or(&candidate.href)
        .to_string()
}

fn file_display_name(file: &ResolvedFile) -> String {
    file.path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.name.file_name())
}
