//! Label sets for the framing taxonomies
//!
//! Every label is a case-sensitive canonical string. Backends are free to
//! vary case; the validator upper-cases before parsing into these enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel accepted by nullable fields
pub const NONE_LABEL: &str = "NONE";

/// Entity framed as hero, villain or victim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActorClass {
    #[serde(rename = "GOVERNMENTS_POLITICIANS_POLIT.ORGS")]
    GovernmentsPoliticians,
    #[serde(rename = "INDUSTRY_EMISSIONS")]
    IndustryEmissions,
    #[serde(rename = "LEGISLATION_POLICIES_RESPONSES")]
    LegislationPolicies,
    #[serde(rename = "GENERAL_PUBLIC")]
    GeneralPublic,
    #[serde(rename = "ANIMALS_NATURE_ENVIRONMENT")]
    AnimalsNatureEnvironment,
    #[serde(rename = "ENV.ORGS_ACTIVISTS")]
    EnvOrgsActivists,
    #[serde(rename = "SCIENCE_EXPERTS_SCI.REPORTS")]
    ScienceExperts,
    #[serde(rename = "CLIMATE_CHANGE")]
    ClimateChange,
    #[serde(rename = "GREEN_TECHNOLOGY_INNOVATION")]
    GreenTechnology,
    #[serde(rename = "MEDIA_JOURNALISTS")]
    MediaJournalists,
}

impl ActorClass {
    pub const ALL: [ActorClass; 10] = [
        ActorClass::GovernmentsPoliticians,
        ActorClass::IndustryEmissions,
        ActorClass::LegislationPolicies,
        ActorClass::GeneralPublic,
        ActorClass::AnimalsNatureEnvironment,
        ActorClass::EnvOrgsActivists,
        ActorClass::ScienceExperts,
        ActorClass::ClimateChange,
        ActorClass::GreenTechnology,
        ActorClass::MediaJournalists,
    ];

    /// Canonical label string
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorClass::GovernmentsPoliticians => "GOVERNMENTS_POLITICIANS_POLIT.ORGS",
            ActorClass::IndustryEmissions => "INDUSTRY_EMISSIONS",
            ActorClass::LegislationPolicies => "LEGISLATION_POLICIES_RESPONSES",
            ActorClass::GeneralPublic => "GENERAL_PUBLIC",
            ActorClass::AnimalsNatureEnvironment => "ANIMALS_NATURE_ENVIRONMENT",
            ActorClass::EnvOrgsActivists => "ENV.ORGS_ACTIVISTS",
            ActorClass::ScienceExperts => "SCIENCE_EXPERTS_SCI.REPORTS",
            ActorClass::ClimateChange => "CLIMATE_CHANGE",
            ActorClass::GreenTechnology => "GREEN_TECHNOLOGY_INNOVATION",
            ActorClass::MediaJournalists => "MEDIA_JOURNALISTS",
        }
    }

    /// Parse an exact canonical label
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == label)
    }
}

/// Whether the article fuels or prevents resolution/conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionClass {
    FuelResolution,
    FuelConflict,
    PreventResolution,
    PreventConflict,
}

impl ActionClass {
    pub const ALL: [ActionClass; 4] = [
        ActionClass::FuelResolution,
        ActionClass::FuelConflict,
        ActionClass::PreventResolution,
        ActionClass::PreventConflict,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionClass::FuelResolution => "FUEL_RESOLUTION",
            ActionClass::FuelConflict => "FUEL_CONFLICT",
            ActionClass::PreventResolution => "PREVENT_RESOLUTION",
            ActionClass::PreventConflict => "PREVENT_CONFLICT",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == label)
    }
}

/// Cultural story reflected by the article
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StoryClass {
    Hierarchical,
    Individualistic,
    Egalitarian,
}

impl StoryClass {
    pub const ALL: [StoryClass; 3] = [
        StoryClass::Hierarchical,
        StoryClass::Individualistic,
        StoryClass::Egalitarian,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoryClass::Hierarchical => "HIERARCHICAL",
            StoryClass::Individualistic => "INDIVIDUALISTIC",
            StoryClass::Egalitarian => "EGALITARIAN",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == label)
    }
}

/// Which role the article emphasizes. Never `NONE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FocusClass {
    Hero,
    Villain,
    Victim,
}

impl FocusClass {
    pub const ALL: [FocusClass; 3] = [FocusClass::Hero, FocusClass::Villain, FocusClass::Victim];

    pub fn as_str(&self) -> &'static str {
        match self {
            FocusClass::Hero => "HERO",
            FocusClass::Villain => "VILLAIN",
            FocusClass::Victim => "VICTIM",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == label)
    }
}

macro_rules! impl_display {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

impl_display!(ActorClass, ActionClass, StoryClass, FocusClass);

/// A named label set bound to one or more task fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Taxonomy {
    Actor,
    Action,
    Story,
    Focus,
}

impl Taxonomy {
    pub const ALL: [Taxonomy; 4] = [
        Taxonomy::Actor,
        Taxonomy::Action,
        Taxonomy::Story,
        Taxonomy::Focus,
    ];

    /// Type name used in listings
    pub fn name(&self) -> &'static str {
        match self {
            Taxonomy::Actor => "ActorClass",
            Taxonomy::Action => "ActionClass",
            Taxonomy::Story => "StoryClass",
            Taxonomy::Focus => "FocusClass",
        }
    }

    /// Ordered canonical labels, excluding the `NONE` sentinel
    pub fn labels(&self) -> Vec<&'static str> {
        match self {
            Taxonomy::Actor => ActorClass::ALL.iter().map(|c| c.as_str()).collect(),
            Taxonomy::Action => ActionClass::ALL.iter().map(|c| c.as_str()).collect(),
            Taxonomy::Story => StoryClass::ALL.iter().map(|c| c.as_str()).collect(),
            Taxonomy::Focus => FocusClass::ALL.iter().map(|c| c.as_str()).collect(),
        }
    }

    /// Exact membership check against canonical labels
    pub fn contains(&self, label: &str) -> bool {
        match self {
            Taxonomy::Actor => ActorClass::parse(label).is_some(),
            Taxonomy::Action => ActionClass::parse(label).is_some(),
            Taxonomy::Story => StoryClass::parse(label).is_some(),
            Taxonomy::Focus => FocusClass::parse(label).is_some(),
        }
    }
}

impl fmt::Display for Taxonomy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy_sizes() {
        assert_eq!(Taxonomy::Actor.labels().len(), 10);
        assert_eq!(Taxonomy::Action.labels().len(), 4);
        assert_eq!(Taxonomy::Story.labels().len(), 3);
        assert_eq!(Taxonomy::Focus.labels().len(), 3);
    }

    #[test]
    fn test_dotted_actor_labels_parse() {
        assert_eq!(
            ActorClass::parse("ENV.ORGS_ACTIVISTS"),
            Some(ActorClass::EnvOrgsActivists)
        );
        assert_eq!(
            ActorClass::parse("SCIENCE_EXPERTS_SCI.REPORTS"),
            Some(ActorClass::ScienceExperts)
        );
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!(ActionClass::parse("fuel_resolution").is_none());
        assert!(!Taxonomy::Story.contains("egalitarian"));
    }

    #[test]
    fn test_none_is_not_a_member() {
        for taxonomy in Taxonomy::ALL {
            assert!(!taxonomy.contains(NONE_LABEL));
        }
    }

    #[test]
    fn test_serde_uses_canonical_labels() {
        let json = serde_json::to_string(&ActorClass::GovernmentsPoliticians).unwrap();
        assert_eq!(json, "\"GOVERNMENTS_POLITICIANS_POLIT.ORGS\"");

        let action: ActionClass = serde_json::from_str("\"PREVENT_CONFLICT\"").unwrap();
        assert_eq!(action, ActionClass::PreventConflict);
    }

    #[test]
    fn test_display_matches_as_str() {
        for story in StoryClass::ALL {
            assert_eq!(story.to_string(), story.as_str());
        }
    }
}
