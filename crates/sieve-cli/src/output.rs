//! Terminal output formatting.

use colored::Colorize;
use sieve_core::{AnalysisResult, Outcome};
use unicode_width::UnicodeWidthStr;

/// Print analysis results, one line per URL.
pub fn print_results(results: &[AnalysisResult]) {
    if results.is_empty() {
        println!("{}", "No URLs analyzed.".dimmed());
        return;
    }

    let url_width = url_column_width(results, term_width());

    for result in results {
        let url = pad_right(&truncate_visual(&result.url, url_width), url_width);
        match &result.outcome {
            Outcome::Classified(v) if v.is_appropriate => {
                println!("{} {}  {}", "✓".green().bold(), url, v.reason.dimmed());
            }
            Outcome::Classified(v) => {
                println!("{} {}  {}", "✗".red().bold(), url.red(), v.reason);
            }
            Outcome::Failed { error } => {
                println!("{} {}  {}", "!".yellow().bold(), url.yellow(), error.dimmed());
            }
        }
    }

    let flagged = results
        .iter()
        .filter(|r| matches!(&r.outcome, Outcome::Classified(v) if !v.is_appropriate))
        .count();
    let failed = results.iter().filter(|r| r.error().is_some()).count();

    println!();
    println!(
        "{} URL(s): {} appropriate, {} flagged, {} failed",
        results.len(),
        results.len() - flagged - failed,
        flagged,
        failed
    );
}

/// Width of the URL column: the longest URL, capped at half the terminal.
fn url_column_width(results: &[AnalysisResult], term_width: usize) -> usize {
    let longest = results
        .iter()
        .map(|r| UnicodeWidthStr::width(r.url.as_str()))
        .max()
        .unwrap_or(0);
    longest.min((term_width / 2).max(20))
}

/// Get terminal width, defaulting to 80.
fn term_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

/// Pad a plain string to a given visual width (right-padded).
fn pad_right(s: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(s);
    if visual >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visual))
    }
}

/// Truncate a string respecting visual width.
fn truncate_visual(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut result = String::new();
    let mut current_width = 0;
    for ch in s.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > max_width - 2 {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }
    result.push_str("..");
    result
}
