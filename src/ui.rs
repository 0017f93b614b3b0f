// src/ui.rs

//! Console output. Everything the user reads goes through here or through
//! the progress bar; the log file gets its own records.

use crate::{constants, error::*, symbols};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::{
    fmt::Display,
    io::{self, Write},
    path::Path,
    time::Duration,
};

const PROGRESS_TEMPLATE: &str =
    "{prefix:7.bold.cyan} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}/{len:3} {wide_msg}";

fn rule(ch: char) -> String {
    ch.to_string().repeat(constants::UI_WIDTH)
}

pub fn print_header(title: &str) {
    println!("\n{}\n {}\n{}", rule('═'), title.cyan().bold(), rule('═'));
}

pub fn print_sub_header(title: &str) {
    println!("\n--- {} ---", title.bold());
}

/// Banner printed when a course crawl starts.
pub fn print_course_banner(course_name: &str, course_id: u64, candidates: usize, folder: &Path) {
    print_sub_header(&format!("{} (ID: {})", course_name, course_id));
    println!(
        "{} {} candidate links, saving to \"{}\"",
        *symbols::INFO,
        candidates,
        folder.display()
    );
}

/// Framed block of text, one line per item.
pub fn box_message<'a>(
    title: &str,
    lines: impl IntoIterator<Item = &'a str>,
    color_func: fn(ColoredString) -> ColoredString,
) {
    let inner = "─".repeat(constants::UI_WIDTH - 2);
    println!("\n┌{}┐\n  {}\n├{}┤", inner, color_func(title.bold()), inner);
    for line in lines {
        println!("  {}", line);
    }
    println!("└{}┘", inner);
}

/// Prints `>>> message: ` and flushes, so the answer is typed on the same line.
fn ask(message: impl Display) -> AppResult<()> {
    print!("\n>>> {}: ", message);
    io::stdout().flush()?;
    Ok(())
}

/// Reads one trimmed line. A closed stdin counts as the user walking away.
pub fn prompt(message: &str, default: Option<&str>) -> AppResult<String> {
    match default {
        Some(d) => ask(format_args!("{} (default: {})", message, d))?,
        None => ask(message)?,
    }
    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Err(AppError::UserInterrupt);
    }
    let input = input.trim();
    Ok(if input.is_empty() {
        default.unwrap_or_default().to_string()
    } else {
        input.to_string()
    })
}

/// Yes/no question; anything unreadable counts as the default.
pub fn confirm(question: &str, default_yes: bool) -> bool {
    let options = if default_yes { "(Y/n)" } else { "(y/N)" };
    let message = format!("{} {} ({} to cancel)", question, options, *symbols::CTRL_C);
    loop {
        let Ok(answer) = prompt(&message, None) else {
            return default_yes;
        };
        match answer.to_lowercase().as_str() {
            "" => return default_yes,
            "y" | "yes" => return true,
            "n" | "no" => return false,
            _ => println!("{}", "Please answer 'y' or 'n'.".red()),
        }
    }
}

pub fn prompt_hidden(message: &str) -> AppResult<String> {
    ask(message)?;
    rpassword::read_password().map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => AppError::UserInterrupt,
        _ => AppError::Io(e),
    })
}

/// Bar counting the candidates of one course; per-file results are printed
/// above it with `println`.
pub fn new_tasks_progress_bar(len: u64, prefix: &str) -> ProgressBar {
    let style = ProgressStyle::with_template(PROGRESS_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    let pbar = ProgressBar::new(len).with_style(style).with_prefix(prefix.to_string());
    pbar.enable_steady_tick(Duration::from_millis(100));
    pbar
}
