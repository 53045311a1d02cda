//! Data model for the three pre-generated documents.
//!
//! All structs mirror the camelCase JSON produced by the external generator. Optional
//! fields default so that a partially filled document still renders (empty sections
//! instead of a failed load).

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// File names resolved against every candidate base.
pub const CHARACTER_FILE: &str = "character-data.json";
pub const REPORTS_FILE: &str = "reports-data.json";
pub const PROJECTS_FILE: &str = "projects-data.json";

/// JSON object kept in document order (category order drives render order).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderedMap<T>(pub Vec<(String, T)>);

impl<T> Default for OrderedMap<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> OrderedMap<T> {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for OrderedMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for OrderedVisitor<T> {
            type Value = OrderedMap<T>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((k, v)) = access.next_entry::<String, T>()? {
                    entries.push((k, v));
                }
                Ok(OrderedMap(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor(PhantomData))
    }
}

// ---------------------------------------------------------------------------
// character-data.json
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterData {
    #[serde(default)]
    pub generated_at: String,
    pub character: Character,
    #[serde(default)]
    pub skills: Skills,
    #[serde(default)]
    pub knowledge: Knowledge,
    #[serde(default)]
    pub memories: Memories,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Character {
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub stats: Stats,
}

fn default_level() -> u32 {
    1
}

/// Six stat scores, 0-100, in radar axis order.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Stats {
    pub reasoning: f64,
    pub memory: f64,
    pub execution: f64,
    pub learning: f64,
    pub insight: f64,
    pub creativity: f64,
}

impl Stats {
    pub fn as_array(&self) -> [f64; 6] {
        [
            self.reasoning,
            self.memory,
            self.execution,
            self.learning,
            self.insight,
            self.creativity,
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Skills {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub categories: OrderedMap<SkillCategory>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillCategory {
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub avg_level: Option<f64>,
    #[serde(default)]
    pub skills: Vec<Skill>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Skill {
    pub name: String,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Knowledge {
    #[serde(default)]
    pub total_files: u32,
    #[serde(default)]
    pub categories: OrderedMap<KnowledgeCategory>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeCategory {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub file_count: u32,
    #[serde(default, rename = "sizeKB")]
    pub size_kb: Option<f64>,
    #[serde(default)]
    pub heat_level: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Memories {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub items: Vec<MemoryItem>,
    #[serde(default)]
    pub by_category: OrderedMap<MemoryCategoryInfo>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MemoryItem {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub importance: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MemoryCategoryInfo {
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub count: u32,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Achievement {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub unlocked: bool,
    #[serde(default)]
    pub date: Option<String>,
}

// ---------------------------------------------------------------------------
// reports-data.json
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReportsData {
    #[serde(default)]
    pub reports: Vec<DailyReport>,
    #[serde(default)]
    pub trend: Option<Trend>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyReport {
    pub date: String,
    pub day_of_week: String,
    pub active_projects: u32,
    pub total_commits: u32,
    pub conversation_count: u32,
    pub skill_count: u32,
    pub skill_change: i64,
    pub knowledge_count: u32,
    pub knowledge_change: i64,
    pub memory_count: u32,
    pub memory_change: i64,
    pub highlights: Vec<String>,
    pub core_progress: Vec<ProgressItem>,
    pub deliveries: Vec<Delivery>,
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProgressItem {
    pub title: String,
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Delivery {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Parallel series for the trend charts; index `i` of every array is the same day.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Trend {
    pub dates: Vec<String>,
    pub skills: Vec<f64>,
    pub knowledge: Vec<f64>,
    pub memory: Vec<f64>,
}

// ---------------------------------------------------------------------------
// projects-data.json
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProjectsData {
    #[serde(default)]
    pub summary: ProjectSummary,
    #[serde(default)]
    pub categories: OrderedMap<ProjectCategory>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectSummary {
    pub total: u32,
    pub deployed: u32,
    pub in_development: u32,
    pub archived: u32,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProjectCategory {
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub count: u32,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
}

/// Three-way status mapping; anything unrecognized is shown as archived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectStatus {
    Deployed,
    Development,
    Archived,
}

impl ProjectStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "deployed" => Self::Deployed,
            "development" => Self::Development,
            _ => Self::Archived,
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            Self::Deployed => "status-deployed",
            Self::Development => "status-development",
            Self::Archived => "status-archived",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Deployed => "✅ Deployed",
            Self::Development => "🔧 In development",
            Self::Archived => "📦 Archived",
        }
    }
}

impl Project {
    pub fn status(&self) -> ProjectStatus {
        ProjectStatus::parse(&self.status)
    }
}

/// Immutable snapshot of all three documents, loaded once.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub character: CharacterData,
    pub reports: ReportsData,
    pub projects: ProjectsData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_map_keeps_document_order() {
        let json = r#"{"zeta": {"icon": "z"}, "alpha": {"icon": "a"}, "mid": {"icon": "m"}}"#;
        let map: OrderedMap<ProjectCategory> = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(map.get("alpha").map(|c| c.icon.as_str()), Some("a"));
    }

    #[test]
    fn report_missing_optional_fields_defaults() {
        let report: DailyReport = serde_json::from_str(r#"{"date": "2026-01-02"}"#).unwrap();
        assert_eq!(report.date, "2026-01-02");
        assert!(report.highlights.is_empty());
        assert!(report.html_url.is_none());
        assert_eq!(report.skill_change, 0);
    }

    #[test]
    fn unknown_status_maps_to_archived() {
        assert_eq!(ProjectStatus::parse("deployed"), ProjectStatus::Deployed);
        assert_eq!(ProjectStatus::parse("development"), ProjectStatus::Development);
        assert_eq!(ProjectStatus::parse("paused"), ProjectStatus::Archived);
        assert_eq!(ProjectStatus::parse(""), ProjectStatus::Archived);
    }

    #[test]
    fn knowledge_size_field_uses_upper_kb() {
        let cat: KnowledgeCategory =
            serde_json::from_str(r#"{"icon": "📚", "fileCount": 12, "sizeKB": 40.5}"#).unwrap();
        assert_eq!(cat.file_count, 12);
        assert_eq!(cat.size_kb, Some(40.5));
    }
}
