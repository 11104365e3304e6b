//! News article input
//!
//! Article metadata, the text block sent to the backend, the climate topic
//! filter and ISO week grouping.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Keywords marking an article as climate/environment related
pub const CLIMATE_KEYWORDS: &[&str] = &[
    "climate",
    "environment",
    "emission",
    "carbon",
    "fossil fuel",
    "renewable",
    "greenhouse",
    "global warming",
    "net zero",
    "biodiversity",
    "deforestation",
    "pollution",
    "sustainability",
    "energy transition",
    "sea level",
    "wildfire",
    "drought",
    "flood",
    "extreme weather",
    "paris agreement",
    "cop",
    "methane",
    "solar",
    "wind power",
    "electric vehicle",
    "oil",
    "gas",
    "coal",
    "arctic",
    "glacier",
    "ecosystem",
    "species",
    "extinction",
];

/// A newspaper article to classify
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub source: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub excerpt: String,
    pub link: Option<String>,
}

impl Article {
    pub fn new(title: impl Into<String>, excerpt: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            source: None,
            date: None,
            excerpt: excerpt.into(),
            link: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Source name, `Unknown` when not given
    pub fn source_name(&self) -> &str {
        self.source.as_deref().unwrap_or("Unknown")
    }

    /// Text block handed to the backend as the article body
    pub fn prompt_text(&self) -> String {
        let mut text = format!("Title: {}\nSource: {}\n", self.title, self.source_name());
        if let Some(date) = self.date {
            text.push_str(&format!("Date: {}\n", date.to_rfc2822()));
        }
        text.push('\n');
        text.push_str(&self.excerpt);
        text
    }

    /// Whether title or excerpt mention a climate keyword
    pub fn is_climate_related(&self) -> bool {
        is_climate_related(&self.title, &self.excerpt)
    }

    /// ISO week of the publication date
    pub fn iso_week(&self) -> Option<(i32, u32)> {
        self.date.map(iso_week)
    }
}

/// Case-insensitive keyword match over title and excerpt
pub fn is_climate_related(title: &str, excerpt: &str) -> bool {
    let text = format!("{} {}", title, excerpt).to_lowercase();
    CLIMATE_KEYWORDS.iter().any(|kw| text.contains(kw))
}

/// ISO-8601 (year, week) of a date
pub fn iso_week(date: DateTime<Utc>) -> (i32, u32) {
    let week = date.iso_week();
    (week.year(), week.week())
}

/// Week grouping key, e.g. `2024-W07`
pub fn week_key(year: i32, week: u32) -> String {
    format!("{}-W{:02}", year, week)
}
