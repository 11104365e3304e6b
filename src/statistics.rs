//! Framing statistics over classified articles
//!
//! Counts labels across a collection of results. `NONE` actor slots and
//! failed task slots contribute nothing; articles without a date are counted
//! in totals but not in weekly groupings.

use crate::article::week_key;
use crate::orchestrator::ArticleClassification;
use crate::sources::{sources_with_bias, SourceBias};
use crate::taxonomy::NONE_LABEL;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Label → occurrence count
pub type LabelCounts = BTreeMap<String, usize>;

/// Hero/villain/victim/focus counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CharacterCounts {
    pub heroes: LabelCounts,
    pub villains: LabelCounts,
    pub victims: LabelCounts,
    pub focus: LabelCounts,
}

/// Aggregate counts over a set of classified articles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FramingStatistics {
    pub total_articles: usize,
    pub by_source: LabelCounts,
    pub by_week: LabelCounts,
    pub characters: CharacterCounts,
    pub actions: LabelCounts,
    pub stories: LabelCounts,
}

/// Counts for one ISO week
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyTrend {
    pub week: String,
    pub year: i32,
    pub week_number: u32,
    pub count: usize,
    pub heroes: LabelCounts,
    pub villains: LabelCounts,
    pub victims: LabelCounts,
    pub actions: LabelCounts,
    pub stories: LabelCounts,
}

impl WeeklyTrend {
    fn new(year: i32, week_number: u32) -> Self {
        Self {
            week: week_key(year, week_number),
            year,
            week_number,
            count: 0,
            heroes: LabelCounts::new(),
            villains: LabelCounts::new(),
            victims: LabelCounts::new(),
            actions: LabelCounts::new(),
            stories: LabelCounts::new(),
        }
    }
}

/// Article selection applied before counting.
///
/// Year and week refer to the ISO week of the publication date, so a set
/// year or week excludes undated articles. A bias keeps only articles from
/// known sources with that bias.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatisticsFilter {
    pub year: Option<i32>,
    pub weeks: BTreeSet<u32>,
    pub bias: Option<SourceBias>,
}

impl StatisticsFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_weeks(mut self, weeks: impl IntoIterator<Item = u32>) -> Self {
        self.weeks.extend(weeks);
        self
    }

    pub fn with_bias(mut self, bias: SourceBias) -> Self {
        self.bias = Some(bias);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.year.is_none() && self.weeks.is_empty() && self.bias.is_none()
    }

    pub fn matches(&self, item: &ArticleClassification) -> bool {
        if let Some(bias) = self.bias {
            let source = item.article.source_name();
            if !sources_with_bias(bias).iter().any(|name| *name == source) {
                return false;
            }
        }

        if self.year.is_none() && self.weeks.is_empty() {
            return true;
        }

        let Some((year, week)) = item.article.iso_week() else {
            return false;
        };
        self.year.map_or(true, |y| y == year) && (self.weeks.is_empty() || self.weeks.contains(&week))
    }
}

fn bump(counts: &mut LabelCounts, label: &str) {
    *counts.entry(label.to_string()).or_insert(0) += 1;
}

fn bump_slot(counts: &mut LabelCounts, label: Option<&str>) {
    if let Some(label) = label.filter(|l| *l != NONE_LABEL) {
        bump(counts, label);
    }
}

impl FramingStatistics {
    /// Compute statistics over the classified articles the filter keeps
    pub fn compute(items: &[ArticleClassification], filter: &StatisticsFilter) -> Self {
        let mut stats = Self::default();

        for item in items.iter().filter(|item| filter.matches(item)) {
            stats.total_articles += 1;
            bump(&mut stats.by_source, item.article.source_name());

            if let Some((year, week)) = item.article.iso_week() {
                bump(&mut stats.by_week, &week_key(year, week));
            }

            if let Some(record) = item.result.actor.record() {
                bump_slot(&mut stats.characters.heroes, record.get("hero_class"));
                bump_slot(&mut stats.characters.villains, record.get("villain_class"));
                bump_slot(&mut stats.characters.victims, record.get("victim_class"));
                bump_slot(&mut stats.characters.focus, record.get("focus"));
            }

            if let Some(record) = item.result.action.record() {
                bump_slot(&mut stats.actions, record.get("action"));
            }

            if let Some(record) = item.result.story.record() {
                bump_slot(&mut stats.stories, record.get("story"));
            }
        }

        stats
    }
}

/// Per-week counts, newest week first, at most `limit` weeks
pub fn weekly_trends(
    items: &[ArticleClassification],
    filter: &StatisticsFilter,
    limit: usize,
) -> Vec<WeeklyTrend> {
    let mut weeks: BTreeMap<(i32, u32), WeeklyTrend> = BTreeMap::new();

    for item in items.iter().filter(|item| filter.matches(item)) {
        let Some((year, week_number)) = item.article.iso_week() else {
            continue;
        };

        let trend = weeks
            .entry((year, week_number))
            .or_insert_with(|| WeeklyTrend::new(year, week_number));
        trend.count += 1;

        if let Some(record) = item.result.actor.record() {
            bump_slot(&mut trend.heroes, record.get("hero_class"));
            bump_slot(&mut trend.villains, record.get("villain_class"));
            bump_slot(&mut trend.victims, record.get("victim_class"));
        }
        if let Some(record) = item.result.action.record() {
            bump_slot(&mut trend.actions, record.get("action"));
        }
        if let Some(record) = item.result.story.record() {
            bump_slot(&mut trend.stories, record.get("story"));
        }
    }

    weeks.into_values().rev().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::Article;
    use crate::orchestrator::{AggregatedResult, TaskOutcome, TaskState};
    use crate::task::TaskSpec;
    use crate::validation::{RawCandidate, ResultValidator};
    use chrono::{TimeZone, Utc};

    fn ok(spec: TaskSpec, candidate: RawCandidate) -> TaskOutcome {
        TaskOutcome::Ok {
            record: ResultValidator::new().validate(&spec, &candidate).unwrap(),
        }
    }

    fn failed() -> TaskOutcome {
        TaskOutcome::Failed {
            state: TaskState::BackendFailed,
            reason: "down".to_string(),
        }
    }

    fn item(source: &str, day: u32, hero: &str, action: Option<&str>) -> ArticleClassification {
        let article = Article::new("t", "e")
            .with_source(source)
            .with_date(Utc.with_ymd_and_hms(2024, 5, day, 9, 0, 0).unwrap());

        let actor = ok(
            TaskSpec::actor(),
            RawCandidate::new()
                .with("hero_class", hero)
                .with("villain_class", "NONE")
                .with("victim_class", "GENERAL_PUBLIC")
                .with("focus", "HERO"),
        );
        let action = match action {
            Some(label) => ok(TaskSpec::action(), RawCandidate::new().with("action", label)),
            None => failed(),
        };

        ArticleClassification {
            article,
            result: AggregatedResult {
                actor,
                action,
                story: failed(),
            },
        }
    }

    #[test]
    fn test_counts_skip_none_and_failures() {
        let items = vec![
            item("Al Jazeera", 6, "ENV.ORGS_ACTIVISTS", Some("FUEL_RESOLUTION")),
            item("Al Jazeera", 7, "NONE", None),
        ];

        let stats = FramingStatistics::compute(&items, &StatisticsFilter::new());
        assert_eq!(stats.total_articles, 2);
        assert_eq!(stats.by_source["Al Jazeera"], 2);
        assert_eq!(stats.characters.heroes.len(), 1);
        assert_eq!(stats.characters.heroes["ENV.ORGS_ACTIVISTS"], 1);
        assert!(stats.characters.villains.is_empty());
        assert_eq!(stats.characters.victims["GENERAL_PUBLIC"], 2);
        assert_eq!(stats.characters.focus["HERO"], 2);
        assert_eq!(stats.actions["FUEL_RESOLUTION"], 1);
        assert!(stats.stories.is_empty());
    }

    #[test]
    fn test_by_week_key() {
        let stats = FramingStatistics::compute(&[item("Src", 6, "NONE", None)], &StatisticsFilter::new());
        // 2024-05-06 is a Monday in ISO week 19
        assert_eq!(stats.by_week["2024-W19"], 1);
    }

    #[test]
    fn test_weekly_trends_newest_first() {
        let items = vec![
            item("A", 1, "CLIMATE_CHANGE", None),
            item("A", 13, "CLIMATE_CHANGE", Some("PREVENT_CONFLICT")),
            item("B", 14, "MEDIA_JOURNALISTS", None),
        ];

        let trends = weekly_trends(&items, &StatisticsFilter::new(), 12);
        assert_eq!(trends.len(), 2);
        assert_eq!(trends[0].week, "2024-W20");
        assert_eq!(trends[0].count, 2);
        assert_eq!(trends[0].actions["PREVENT_CONFLICT"], 1);
        assert_eq!(trends[1].week, "2024-W18");
    }

    #[test]
    fn test_weekly_trends_limit() {
        let items = vec![item("A", 1, "NONE", None), item("A", 13, "NONE", None)];
        assert_eq!(weekly_trends(&items, &StatisticsFilter::new(), 1).len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let stats = FramingStatistics::compute(&[], &StatisticsFilter::new());
        assert_eq!(stats, FramingStatistics::default());
        assert!(weekly_trends(&[], &StatisticsFilter::new(), 5).is_empty());
    }

    #[test]
    fn test_filter_by_bias() {
        let items = vec![
            item("Democracy Now!", 6, "ENV.ORGS_ACTIVISTS", None),
            item("Al Jazeera", 6, "CLIMATE_CHANGE", None),
            item("Some Blog", 6, "MEDIA_JOURNALISTS", None),
        ];

        let left = StatisticsFilter::new().with_bias(SourceBias::Left);
        let stats = FramingStatistics::compute(&items, &left);
        assert_eq!(stats.total_articles, 1);
        assert_eq!(stats.characters.heroes["ENV.ORGS_ACTIVISTS"], 1);
        assert!(!stats.by_source.contains_key("Al Jazeera"));

        let center = StatisticsFilter::new().with_bias(SourceBias::Center);
        let trends = weekly_trends(&items, &center, 12);
        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].count, 1);
        assert_eq!(trends[0].heroes["CLIMATE_CHANGE"], 1);
    }

    #[test]
    fn test_filter_by_year_and_weeks() {
        // May 1 is ISO week 18, May 13 and 14 are week 20
        let items = vec![
            item("A", 1, "NONE", None),
            item("A", 13, "NONE", None),
            item("A", 14, "NONE", None),
        ];

        let week_20 = StatisticsFilter::new().with_year(2024).with_weeks([20]);
        let stats = FramingStatistics::compute(&items, &week_20);
        assert_eq!(stats.total_articles, 2);
        assert_eq!(stats.by_week.len(), 1);
        assert_eq!(stats.by_week["2024-W20"], 2);

        let other_year = StatisticsFilter::new().with_year(2023);
        assert_eq!(FramingStatistics::compute(&items, &other_year).total_articles, 0);

        let both_weeks = StatisticsFilter::new().with_weeks([18, 20]);
        assert_eq!(weekly_trends(&items, &both_weeks, 12).len(), 2);
    }

    #[test]
    fn test_date_filter_excludes_undated() {
        let undated = ArticleClassification {
            article: Article::new("t", "e").with_source("Al Jazeera"),
            result: item("A", 1, "NONE", None).result,
        };
        let items = vec![undated];

        assert_eq!(FramingStatistics::compute(&items, &StatisticsFilter::new()).total_articles, 1);
        let year = StatisticsFilter::new().with_year(2024);
        assert_eq!(FramingStatistics::compute(&items, &year).total_articles, 0);
        let bias = StatisticsFilter::new().with_bias(SourceBias::Center);
        assert_eq!(FramingStatistics::compute(&items, &bias).total_articles, 1);
    }
}
