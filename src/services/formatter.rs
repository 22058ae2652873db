use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::{
    fmt::{self, Write},
    sync::LazyLock,
};

use crate::models::{CombinedResults, DetailsRecord, MediaItem, MediaType};

/// Appended to every chat reply
pub const FOLLOW_UP: &str = "\n\nCan I help you with anything else?";

pub const NO_RESULTS: &str = "I couldn't find any movies or shows matching your description. \
Could you try describing it differently?";
pub const ASK_FOR_TITLE: &str = "Which movie or show would you like to know more about?";
pub const TITLE_NOT_FOUND: &str =
    "I couldn't find that title. Could you try rephrasing or providing more information?";
pub const SEARCH_HEADER: &str = "Here are some recommendations based on your request:\n\n";
pub const UPCOMING_HEADER: &str = "Here are some upcoming releases:\n\n";

pub const TECHNICAL_MENU: &str = "I can help you with technical issues. \
Please specify your problem:\n\n\
1. Playback issues\n\
2. Login problems\n\
3. Payment concerns\n\
4. Account settings\n\n\
What kind of help do you need?";

pub const CAPABILITIES: &str = "How can I help you today? I can:\n\n\
🔍 Search for movies and shows\n\
ℹ️ Provide detailed information about titles\n\
🆕 Tell you about upcoming releases\n\
🛠️ Help with technical issues\n\n\
What would you like to know?";

/// Maximum number of titles listed in one reply
pub const MAX_LISTED: usize = 5;

static ABOUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)about\s+["']?([^"']+)["']?"#).unwrap());
static WHAT_IS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)what\s+is\s+["']?([^"']+)["']?"#).unwrap());

/// Data a chat reply is rendered from, one variant per outcome
#[derive(Debug, Clone, Copy)]
pub enum Reply<'a> {
    Search(&'a CombinedResults),
    Details {
        item: &'a MediaItem,
        record: &'a DetailsRecord,
    },
    AskForTitle,
    TitleNotFound,
    Technical,
    Upcoming(&'a [MediaItem]),
    Default,
}

/// Pulls the title out of `about "X"` or `what is X`
pub fn extract_title(message: &str) -> Option<String> {
    ABOUT_RE
        .captures(message)
        .or_else(|| WHAT_IS_RE.captures(message))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|title| !title.is_empty())
}

/// Renders a reply, always ending with the follow-up line
pub fn format(reply: &Reply<'_>) -> String {
    let mut out = String::new();
    // writing into a String never fails
    render(&mut out, reply).unwrap_or_default();
    out.push_str(FOLLOW_UP);
    out
}

fn render(out: &mut impl Write, reply: &Reply<'_>) -> fmt::Result {
    match reply {
        Reply::Search(results) => write_search(out, results),
        Reply::Details { item, record } => write_details(out, item, record),
        Reply::AskForTitle => out.write_str(ASK_FOR_TITLE),
        Reply::TitleNotFound => out.write_str(TITLE_NOT_FOUND),
        Reply::Technical => out.write_str(TECHNICAL_MENU),
        Reply::Upcoming(items) => write_upcoming(out, items),
        Reply::Default => out.write_str(CAPABILITIES),
    }
}

fn write_search(out: &mut impl Write, results: &CombinedResults) -> fmt::Result {
    if results.is_empty() {
        return out.write_str(NO_RESULTS);
    }

    out.write_str(SEARCH_HEADER)?;
    for item in results.results.iter().take(MAX_LISTED) {
        let kind = match item.media_type {
            MediaType::Tv => "📺 TV Show",
            MediaType::Movie => "🎬 Movie",
        };
        let year = release_year(item.release_date.as_deref())
            .map(|y| y.to_string())
            .unwrap_or_else(|| "N/A".to_string());

        writeln!(out, "{}: {} ({})", kind, item.title, year)?;
        writeln!(out, "⭐ Rating: {}", display_rating(item.vote_average))?;
        if let Some(overview) = &item.overview {
            writeln!(out, "📝 {}", overview)?;
        }
        out.write_char('\n')?;
    }
    Ok(())
}

fn write_details(out: &mut impl Write, item: &MediaItem, record: &DetailsRecord) -> fmt::Result {
    let runtime = record
        .runtime_minutes()
        .map(|m| format!("{} minutes", m))
        .unwrap_or_else(|| "N/A".to_string());

    write!(out, "Here's what I found about \"{}\":\n\n", item.title)?;
    writeln!(
        out,
        "📅 Release Date: {}",
        item.release_date.as_deref().unwrap_or("N/A")
    )?;
    writeln!(out, "⭐ Rating: {}", display_rating(item.vote_average))?;
    writeln!(out, "⏱ Runtime: {}\n", runtime)?;
    writeln!(
        out,
        "📝 Overview:\n{}\n",
        item.overview.as_deref().unwrap_or("No overview available.")
    )?;

    if !record.credits.cast.is_empty() {
        writeln!(out, "🎭 Main Cast:")?;
        for actor in record.credits.cast.iter().take(MAX_LISTED) {
            writeln!(out, "- {} as {}", actor.name, actor.character)?;
        }
        out.write_char('\n')?;
    }
    Ok(())
}

fn write_upcoming(out: &mut impl Write, items: &[MediaItem]) -> fmt::Result {
    out.write_str(UPCOMING_HEADER)?;
    for movie in items.iter().take(MAX_LISTED) {
        writeln!(out, "🎬 {}", movie.title)?;
        writeln!(
            out,
            "📅 Release Date: {}",
            movie.release_date.as_deref().unwrap_or("N/A")
        )?;
        if let Some(overview) = &movie.overview {
            writeln!(out, "📝 {}", overview)?;
        }
        out.write_char('\n')?;
    }
    Ok(())
}

fn display_rating(vote_average: Option<f64>) -> String {
    rating(vote_average)
        .map(|r| format!("{}/10", r))
        .unwrap_or_else(|| "N/A".to_string())
}

/// Year of a `YYYY-MM-DD` date, tolerating a bare or partial year
fn release_year(date: Option<&str>) -> Option<i32> {
    let date = date?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.year())
        .ok()
        .or_else(|| date.get(..4).and_then(|y| y.parse().ok()))
}

/// Rating rounded to one decimal; a zero rating means "unrated"
fn rating(vote_average: Option<f64>) -> Option<f64> {
    vote_average
        .filter(|v| *v > 0.0)
        .map(|v| (v * 10.0).round() / 10.0)
}
