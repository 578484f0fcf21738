//! Synthetic user profiles
//!
//! A [`Profile`] is built once per session and never mutated afterwards. Every
//! construction path goes through [`ProfileInput`], which substitutes documented
//! defaults for missing, empty or unrecognised values instead of failing.

use serde::{Deserialize, Serialize};

pub const MAX_INTERESTS: usize = 5;
pub const MAX_TRAITS: usize = 5;
pub const DEFAULT_AGE: i64 = 30;
pub const DEFAULT_SOCIAL_CONNECTIVITY: i64 = 50;
const DEFAULT_NAME: &str = "Anonymous User";
const NOT_SPECIFIED: &str = "Not specified";

/// Normalise a free-text choice for table lookup: lowercase, `-`/space → `_`.
fn normalize_key(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '-' || c == ' ' { '_' } else { c })
        .collect()
}

/// Look `raw` up in a constant table of accepted spellings, else `default`.
fn lookup<T: Copy>(table: &[(&str, T)], raw: &str, default: T) -> T {
    let key = normalize_key(raw);
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
        .unwrap_or(default)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    NonBinary,
    #[default]
    NotSpecified,
}

impl Gender {
    const TABLE: &'static [(&'static str, Gender)] = &[
        ("a", Gender::Male),
        ("b", Gender::Female),
        ("c", Gender::NonBinary),
        ("d", Gender::NotSpecified),
        ("male", Gender::Male),
        ("female", Gender::Female),
        ("non_binary", Gender::NonBinary),
        ("nonbinary", Gender::NonBinary),
        ("not_specified", Gender::NotSpecified),
        ("prefer_not_to_say", Gender::NotSpecified),
    ];

    /// Resolve a menu letter or name; anything else is `NotSpecified`.
    pub fn parse(raw: &str) -> Self {
        lookup(Self::TABLE, raw, Self::default())
    }

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::NonBinary => "Non-binary",
            Gender::NotSpecified => "Not specified",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Low,
    #[default]
    Moderate,
    High,
}

impl ActivityLevel {
    const TABLE: &'static [(&'static str, ActivityLevel)] = &[
        ("a", ActivityLevel::Low),
        ("b", ActivityLevel::Moderate),
        ("c", ActivityLevel::High),
        ("low", ActivityLevel::Low),
        ("moderate", ActivityLevel::Moderate),
        ("high", ActivityLevel::High),
    ];

    pub fn parse(raw: &str) -> Self {
        lookup(Self::TABLE, raw, Self::default())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Low => "low",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TechSavviness {
    Low,
    #[default]
    Average,
    High,
}

impl TechSavviness {
    const TABLE: &'static [(&'static str, TechSavviness)] = &[
        ("a", TechSavviness::Low),
        ("b", TechSavviness::Average),
        ("c", TechSavviness::High),
        ("low", TechSavviness::Low),
        ("average", TechSavviness::Average),
        ("high", TechSavviness::High),
    ];

    pub fn parse(raw: &str) -> Self {
        lookup(Self::TABLE, raw, Self::default())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TechSavviness::Low => "low",
            TechSavviness::Average => "average",
            TechSavviness::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    HighSchool,
    College,
    Graduate,
    #[default]
    Other,
}

impl EducationLevel {
    const TABLE: &'static [(&'static str, EducationLevel)] = &[
        ("a", EducationLevel::HighSchool),
        ("b", EducationLevel::College),
        ("c", EducationLevel::Graduate),
        ("d", EducationLevel::Other),
        ("high_school", EducationLevel::HighSchool),
        ("highschool", EducationLevel::HighSchool),
        ("college", EducationLevel::College),
        ("university", EducationLevel::College),
        ("graduate", EducationLevel::Graduate),
        ("other", EducationLevel::Other),
    ];

    pub fn parse(raw: &str) -> Self {
        lookup(Self::TABLE, raw, Self::default())
    }

    /// College or graduate education
    pub fn is_tertiary(&self) -> bool {
        matches!(self, EducationLevel::College | EducationLevel::Graduate)
    }

    pub fn label(&self) -> &'static str {
        match self {
            EducationLevel::HighSchool => "High School",
            EducationLevel::College => "College",
            EducationLevel::Graduate => "Graduate",
            EducationLevel::Other => "Other",
        }
    }
}

/// Network-size menu letters mapped to a 0-100 connectivity value.
const SOCIAL_CHOICES: &[(&str, i64)] = &[("a", 25), ("b", 60), ("c", 75), ("d", 90)];

/// Resolve a network-size menu letter (`a`-`d`); anything else is 50.
pub fn social_connectivity_from_choice(raw: &str) -> u8 {
    lookup(SOCIAL_CHOICES, raw, DEFAULT_SOCIAL_CONNECTIVITY) as u8
}

/// Lenient, unvalidated profile fields as they arrive from a caller or a JSON file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileInput {
    pub name: String,
    pub age: Option<i64>,
    pub gender: String,
    pub location: String,
    pub occupation: String,
    pub interests: Vec<String>,
    pub personality_traits: Vec<String>,
    pub activity_level: String,
    pub tech_savviness: String,
    pub social_connectivity: Option<i64>,
    pub education_level: String,
}

impl ProfileInput {
    pub fn build(self) -> Profile {
        Profile::from(self)
    }
}

/// Immutable synthetic user profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ProfileInput")]
pub struct Profile {
    name: String,
    age: u8,
    gender: Gender,
    location: String,
    occupation: String,
    interests: Vec<String>,
    personality_traits: Vec<String>,
    activity_level: ActivityLevel,
    tech_savviness: TechSavviness,
    social_connectivity: u8,
    education_level: EducationLevel,
}

fn text_or(raw: String, default: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

fn list_or(raw: Vec<String>, cap: usize, default: &str) -> Vec<String> {
    let list: Vec<String> = raw
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .take(cap)
        .collect();
    if list.is_empty() {
        vec![default.to_string()]
    } else {
        list
    }
}

impl From<ProfileInput> for Profile {
    fn from(input: ProfileInput) -> Self {
        Self {
            name: text_or(input.name, DEFAULT_NAME),
            age: input.age.unwrap_or(DEFAULT_AGE).clamp(1, 120) as u8,
            gender: Gender::parse(&input.gender),
            location: text_or(input.location, NOT_SPECIFIED),
            occupation: text_or(input.occupation, NOT_SPECIFIED),
            interests: list_or(input.interests, MAX_INTERESTS, "general"),
            personality_traits: list_or(input.personality_traits, MAX_TRAITS, "balanced"),
            activity_level: ActivityLevel::parse(&input.activity_level),
            tech_savviness: TechSavviness::parse(&input.tech_savviness),
            social_connectivity: input
                .social_connectivity
                .unwrap_or(DEFAULT_SOCIAL_CONNECTIVITY)
                .clamp(0, 100) as u8,
            education_level: EducationLevel::parse(&input.education_level),
        }
    }
}

impl Profile {
    /// The canned demo profile.
    pub fn sample() -> Self {
        ProfileInput {
            name: "Alex Demo".into(),
            age: Some(28),
            gender: "non-binary".into(),
            location: "San Francisco, USA".into(),
            occupation: "Software Engineer".into(),
            interests: ["technology", "gaming", "ai", "music", "fitness"]
                .map(String::from)
                .to_vec(),
            personality_traits: ["analytical", "creative", "introverted", "curious"]
                .map(String::from)
                .to_vec(),
            activity_level: "high".into(),
            tech_savviness: "high".into(),
            social_connectivity: Some(70),
            education_level: "college".into(),
        }
        .build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn occupation(&self) -> &str {
        &self.occupation
    }

    pub fn interests(&self) -> &[String] {
        &self.interests
    }

    /// The first `n` interests, in the order the user gave them
    pub fn top_interests(&self, n: usize) -> &[String] {
        &self.interests[..n.min(self.interests.len())]
    }

    pub fn personality_traits(&self) -> &[String] {
        &self.personality_traits
    }

    pub fn activity_level(&self) -> ActivityLevel {
        self.activity_level
    }

    pub fn tech_savviness(&self) -> TechSavviness {
        self.tech_savviness
    }

    pub fn social_connectivity(&self) -> u8 {
        self.social_connectivity
    }

    pub fn education_level(&self) -> EducationLevel {
        self.education_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_lists_get_defaults() {
        let profile = ProfileInput::default().build();
        assert_eq!(profile.interests(), ["general".to_string()]);
        assert_eq!(profile.personality_traits(), ["balanced".to_string()]);
    }

    #[test]
    fn test_defaults_are_idempotent() {
        let once = ProfileInput::default().build();
        let json = serde_json::to_string(&once).unwrap();
        let twice: Profile = serde_json::from_str(&json).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_blank_text_fields_get_defaults() {
        let profile = ProfileInput {
            name: "   ".into(),
            ..Default::default()
        }
        .build();
        assert_eq!(profile.name(), "Anonymous User");
        assert_eq!(profile.location(), "Not specified");
        assert_eq!(profile.occupation(), "Not specified");
        assert_eq!(profile.age(), DEFAULT_AGE as u8);
        assert_eq!(profile.social_connectivity(), 50);
    }

    #[test]
    fn test_lists_trimmed_and_capped() {
        let profile = ProfileInput {
            interests: vec![" a ", "", "b", "c", "d", "e", "f"]
                .into_iter()
                .map(String::from)
                .collect(),
            ..Default::default()
        }
        .build();
        assert_eq!(profile.interests(), ["a", "b", "c", "d", "e"]);
        assert_eq!(profile.top_interests(2), ["a", "b"]);
        assert_eq!(profile.top_interests(10).len(), 5);
    }

    #[test]
    fn test_out_of_range_numbers_clamped() {
        let profile = ProfileInput {
            age: Some(400),
            social_connectivity: Some(-3),
            ..Default::default()
        }
        .build();
        assert_eq!(profile.age(), 120);
        assert_eq!(profile.social_connectivity(), 0);

        let profile = ProfileInput {
            age: Some(0),
            ..Default::default()
        }
        .build();
        assert_eq!(profile.age(), 1);
    }

    #[test]
    fn test_enum_choices_by_letter_and_name() {
        assert_eq!(Gender::parse("C"), Gender::NonBinary);
        assert_eq!(Gender::parse("Non-binary"), Gender::NonBinary);
        assert_eq!(Gender::parse("zzz"), Gender::NotSpecified);
        assert_eq!(EducationLevel::parse("High School"), EducationLevel::HighSchool);
        assert_eq!(EducationLevel::parse("b"), EducationLevel::College);
        assert_eq!(EducationLevel::parse("phd?"), EducationLevel::Other);
        assert_eq!(ActivityLevel::parse("c"), ActivityLevel::High);
        assert_eq!(ActivityLevel::parse(""), ActivityLevel::Moderate);
        assert_eq!(TechSavviness::parse("a"), TechSavviness::Low);
        assert_eq!(TechSavviness::parse("guru"), TechSavviness::Average);
    }

    #[test]
    fn test_social_choice_table() {
        assert_eq!(social_connectivity_from_choice("a"), 25);
        assert_eq!(social_connectivity_from_choice("D"), 90);
        assert_eq!(social_connectivity_from_choice("x"), 50);
    }

    #[test]
    fn test_deserialize_goes_through_defaults() {
        let profile: Profile = serde_json::from_str(
            r#"{"name":"Sam","age":16,"tech_savviness":"wizard","interests":[]}"#,
        )
        .unwrap();
        assert_eq!(profile.age(), 16);
        assert_eq!(profile.tech_savviness(), TechSavviness::Average);
        assert_eq!(profile.interests(), ["general".to_string()]);
    }

    #[test]
    fn test_sample_profile() {
        let p = Profile::sample();
        assert_eq!(p.name(), "Alex Demo");
        assert_eq!(p.interests().len(), 5);
        assert_eq!(p.personality_traits().len(), 4);
        assert_eq!(p.gender(), Gender::NonBinary);
        assert!(p.education_level().is_tertiary());
    }
}
