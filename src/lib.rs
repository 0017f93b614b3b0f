// src/lib.rs

pub mod auth;
pub mod catalog;
pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod courses;
pub mod downloader;
pub mod error;
pub mod logging;
pub mod models;
pub mod naming;
pub mod resolver;
pub mod symbols;
pub mod ui;
pub mod utils;

use crate::{
    cli::Cli,
    client::RobustClient,
    config::{AppConfig, credentials::resolve_credentials},
    downloader::{CourseCrawler, DownloadManager},
    error::{AppError, AppResult},
    models::CourseReport,
    naming::FallbackNamer,
};
use colored::*;
use log::{debug, error, info, warn};
use std::{
    fs,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

/// State shared by every course crawl of a run.
#[derive(Clone)]
pub struct CrawlContext {
    pub manager: DownloadManager,
    pub config: Arc<AppConfig>,
    pub http_client: Arc<RobustClient>,
    pub fallback_names: Arc<Mutex<FallbackNamer>>,
    pub cancellation_token: Arc<AtomicBool>,
}

impl CrawlContext {
    pub fn new(
        config: Arc<AppConfig>,
        http_client: Arc<RobustClient>,
        cancellation_token: Arc<AtomicBool>,
    ) -> Self {
        Self {
            manager: DownloadManager::new(),
            config,
            http_client,
            fallback_names: Arc::new(Mutex::new(FallbackNamer::new())),
            cancellation_token,
        }
    }
}

/// Library entry point called by `main.rs`.
pub async fn run_from_cli(args: Arc<Cli>, cancellation_token: Arc<AtomicBool>) -> AppResult<()> {
    debug!("CLI arguments: {:?}", args);
    let config = Arc::new(AppConfig::new(&args)?);
    debug!("effective configuration: {:?}", config);

    ui::print_header(&format!(
        "{} {} (press {} to stop)",
        clap::crate_name!(),
        clap::crate_version!(),
        *symbols::CTRL_C
    ));

    let credentials = resolve_credentials(args.username.as_deref())?;
    let http_client = Arc::new(RobustClient::new(config.clone())?);

    println!(
        "\n{} Logging in to {} as '{}'...",
        *symbols::INFO,
        config.base_url,
        credentials.username
    );
    auth::login(&http_client, &credentials).await?;
    println!("{} Logged in.", *symbols::OK);

    let course_ids = if args.course_ids.is_empty() {
        let sesskey = auth::fetch_sesskey(&http_client).await?;
        println!("{} Looking up enrolled courses...", *symbols::INFO);
        let ids = courses::discover_course_ids(&http_client, &sesskey).await;
        if ids.is_empty() {
            error!("no course ids discovered");
            ui::box_message(
                "No courses found",
                constants::HELP_COURSE_ID_GUIDE.lines(),
                |s| s.yellow(),
            );
            return Ok(());
        }
        info!("discovered {} courses: {:?}", ids.len(), ids);
        println!("{} Found {} courses: {:?}", *symbols::OK, ids.len(), ids);
        if let Err(e) = courses::save_course_ids(&config.output_dir, &ids) {
            warn!("saving course ids failed: {}", e);
        }
        ids
    } else {
        info!("using course ids from the command line: {:?}", args.course_ids);
        args.course_ids.clone()
    };

    let context = CrawlContext::new(config, http_client, cancellation_token);
    let result = run_courses(&context, &course_ids).await;
    context.manager.print_report();
    result.map(drop)
}

/// Crawls the given courses in order, pausing between them. A course that
/// fails is reported and the next one is started.
pub async fn run_courses(context: &CrawlContext, course_ids: &[u64]) -> AppResult<Vec<CourseReport>> {
    let output_dir = &context.config.output_dir;
    fs::create_dir_all(output_dir)?;
    let absolute_path = dunce::canonicalize(output_dir)?;
    info!("saving files below \"{}\"", absolute_path.display());
    println!(
        "\n{} Files will be saved below \"{}\"",
        *symbols::INFO,
        absolute_path.display()
    );

    let crawler = CourseCrawler::new(context.clone());
    let mut reports = Vec::with_capacity(course_ids.len());
    for (i, &course_id) in course_ids.iter().enumerate() {
        if context.cancellation_token.load(Ordering::Relaxed) {
            return Err(AppError::UserInterrupt);
        }
        match crawler.crawl(course_id).await {
            Ok(report) => reports.push(report),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                error!("course {} failed: {}", course_id, e);
                eprintln!(
                    "\n{} {}",
                    *symbols::ERROR,
                    format!("Course {} failed: {}", course_id, e).red()
                );
            }
        }
        if i + 1 < course_ids.len() && !context.config.course_delay.is_zero() {
            tokio::time::sleep(context.config.course_delay).await;
        }
    }
    Ok(reports)
}
