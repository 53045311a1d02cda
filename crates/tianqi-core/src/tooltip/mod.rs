//! Hover registry: stable composite keys mapped to tagged tooltip records.
//!
//! Keys are `view:id` where `id` is the entity's position in its source document
//! (`skill:2/0` is the first skill of the third category). Names may repeat or
//! contain the separator, positions cannot, and a snapshot never reorders them.
//! Unknown keys simply miss.

mod panel;
mod position;

pub use panel::TooltipPanel;
pub use position::{place, Point, Rect, Size, ANCHOR_OFFSET, EDGE_MARGIN};

use crate::model::Snapshot;
use crate::render::{
    clamp_level, knowledge_level, memory_level, rounded_average, KNOWLEDGE_THRESHOLDS,
    MEMORY_THRESHOLDS,
};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Kind of hover target; the prefix of every key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HoverView {
    Skill,
    SkillCategory,
    Knowledge,
    Memory,
    MemoryItem,
    Achievement,
    Project,
    Stat,
}

impl HoverView {
    pub fn prefix(self) -> &'static str {
        match self {
            HoverView::Skill => "skill",
            HoverView::SkillCategory => "skill-category",
            HoverView::Knowledge => "knowledge",
            HoverView::Memory => "memory",
            HoverView::MemoryItem => "memory-item",
            HoverView::Achievement => "achievement",
            HoverView::Project => "project",
            HoverView::Stat => "stat",
        }
    }
}

/// Composite `view:id` key.
pub fn key(view: HoverView, id: impl fmt::Display) -> String {
    format!("{}:{}", view.prefix(), id)
}

/// Key for the `index`th entity under the `parent`th category (`view:parent/index`).
pub fn nested_key(view: HoverView, parent: usize, index: usize) -> String {
    format!("{}:{}/{}", view.prefix(), parent, index)
}

/// What each hover target shows; each variant carries only what its tooltip needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HoverRecord {
    Skill {
        name: String,
        category: String,
        category_icon: String,
        level: u32,
        description: Option<String>,
        source: Option<String>,
    },
    SkillCategory {
        name: String,
        icon: String,
        level: u32,
        count: u32,
    },
    KnowledgeCategory {
        name: String,
        icon: String,
        level: u32,
        file_count: u32,
        size_kb: f64,
        description: Option<String>,
    },
    MemoryCategory {
        label: String,
        icon: String,
        level: u32,
        item_count: u32,
    },
    MemoryItem {
        title: String,
        icon: String,
        importance: u32,
        description: Option<String>,
        keywords: Vec<String>,
        source: Option<String>,
    },
    Achievement {
        name: String,
        icon: String,
        description: String,
        unlocked: bool,
        date: Option<String>,
    },
    Project {
        name: String,
        icon: String,
        status_label: String,
        summary: Option<String>,
        tech_stack: Vec<String>,
    },
    Stat {
        name: String,
        icon: String,
        value: u32,
        description: String,
        details: String,
    },
}

/// Progress bar state under the level line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    pub percent: f64,
    pub current: String,
    pub next: String,
}

/// Fully resolved fields of the shared tooltip element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipContent {
    pub icon: String,
    pub name: String,
    pub type_label: &'static str,
    pub level_text: String,
    pub accent: &'static str,
    pub description: String,
    pub source_title: &'static str,
    pub source: Option<String>,
    pub progress: Option<Progress>,
    pub upgrade_hint: Option<String>,
}

const NO_DESCRIPTION: &str = "No description";
const ACCENT_SKILL: &str = "var(--green)";
const ACCENT_KNOWLEDGE: &str = "var(--purple)";
const ACCENT_MEMORY: &str = "var(--orange)";

fn progress(level: u32) -> Progress {
    let lv = clamp_level(level);
    Progress {
        percent: lv as f64 / 5.0 * 100.0,
        current: format!("Current: Lv.{}", lv),
        next: if lv >= 5 {
            "Max level".to_string()
        } else {
            format!("Next: Lv.{}", lv + 1)
        },
    }
}

/// Generic practice hint per skill level.
fn skill_hint(category: &str, level: u32) -> Option<String> {
    let step = match clamp_level(level) {
        1 => "learn the fundamentals and finish a tutorial project",
        2 => "apply it to small real tasks",
        3 => "use it in a shipped project",
        4 => "teach it or publish a write-up",
        _ => return None,
    };
    Some(format!("{}: {} to reach Lv.{}", category, step, clamp_level(level) + 1))
}

/// "Add N more" hint from the bucket thresholds of a count-derived level.
fn count_hint(count: u32, thresholds: &[u32; 4], unit: &str) -> Option<String> {
    let next = thresholds.iter().find(|&&t| count <= t)?;
    let needed = next + 1 - count;
    let level = thresholds.iter().position(|t| t == next).map(|i| i as u32 + 2)?;
    Some(format!("Add {} more {} to reach Lv.{}", needed, unit, level))
}

impl HoverRecord {
    /// Tooltip box size used for placement when the client does not report one.
    pub fn estimated_size(&self) -> Size {
        match self {
            HoverRecord::Stat { .. } => Size { width: 280.0, height: 200.0 },
            _ => Size { width: 280.0, height: 250.0 },
        }
    }

    pub fn content(&self) -> TooltipContent {
        match self {
            HoverRecord::Skill {
                name,
                category,
                category_icon,
                level,
                description,
                source,
            } => TooltipContent {
                icon: if category_icon.is_empty() { "⚡".to_string() } else { category_icon.clone() },
                name: name.clone(),
                type_label: "Skill",
                level_text: format!("Lv.{}", clamp_level(*level)),
                accent: ACCENT_SKILL,
                description: description.clone().unwrap_or_else(|| NO_DESCRIPTION.to_string()),
                source_title: "📍 Source",
                source: source.clone().or_else(|| Some(format!("{} skills", category))),
                progress: Some(progress(*level)),
                upgrade_hint: skill_hint(category, *level),
            },
            HoverRecord::SkillCategory { name, icon, level, count } => TooltipContent {
                icon: icon.clone(),
                name: name.clone(),
                type_label: "Skill",
                level_text: format!("Lv.{}", clamp_level(*level)),
                accent: ACCENT_SKILL,
                description: format!(
                    "{} skills, {} in total. Average level Lv.{}",
                    name,
                    count,
                    clamp_level(*level)
                ),
                source_title: "📍 Source",
                source: Some("Skill category".to_string()),
                progress: Some(progress(*level)),
                upgrade_hint: skill_hint(name, *level),
            },
            HoverRecord::KnowledgeCategory {
                name,
                icon,
                level,
                file_count,
                size_kb,
                description,
            } => TooltipContent {
                icon: icon.clone(),
                name: name.clone(),
                type_label: "Knowledge",
                level_text: format!("Lv.{}", clamp_level(*level)),
                accent: ACCENT_KNOWLEDGE,
                description: description
                    .clone()
                    .unwrap_or_else(|| format!("{}, {} documents.", name, file_count)),
                source_title: "📍 Source",
                source: Some(format!("{}KB stored", size_kb)),
                progress: Some(progress(*level)),
                upgrade_hint: count_hint(*file_count, &KNOWLEDGE_THRESHOLDS, "documents"),
            },
            HoverRecord::MemoryCategory { label, icon, level, item_count } => TooltipContent {
                icon: icon.clone(),
                name: label.clone(),
                type_label: "Memory",
                level_text: format!("Lv.{}", clamp_level(*level)),
                accent: ACCENT_MEMORY,
                description: format!("{} memories in {}.", item_count, label),
                source_title: "📍 Source",
                source: Some("Memory category".to_string()),
                progress: Some(progress(*level)),
                upgrade_hint: count_hint(*item_count, &MEMORY_THRESHOLDS, "memories"),
            },
            HoverRecord::MemoryItem {
                title,
                icon,
                importance,
                description,
                keywords,
                source,
            } => TooltipContent {
                icon: icon.clone(),
                name: title.clone(),
                type_label: "Memory",
                level_text: format!("Lv.{}", clamp_level(*importance)),
                accent: ACCENT_MEMORY,
                description: description.clone().unwrap_or_else(|| {
                    if keywords.is_empty() {
                        "Core memory".to_string()
                    } else {
                        format!("Keywords: {}", keywords.join(", "))
                    }
                }),
                source_title: "📍 Source",
                source: Some(source.clone().unwrap_or_else(|| "Recorded explicitly".to_string())),
                progress: Some(progress(*importance)),
                upgrade_hint: None,
            },
            HoverRecord::Achievement {
                name,
                icon,
                description,
                unlocked,
                date,
            } => TooltipContent {
                icon: icon.clone(),
                name: name.clone(),
                type_label: "Achievement",
                level_text: if *unlocked { "Unlocked".to_string() } else { "Locked".to_string() },
                accent: ACCENT_SKILL,
                description: if description.is_empty() {
                    NO_DESCRIPTION.to_string()
                } else {
                    description.clone()
                },
                source_title: "📅 Unlocked on",
                source: if *unlocked { date.clone() } else { None },
                progress: None,
                upgrade_hint: None,
            },
            HoverRecord::Project {
                name,
                icon,
                status_label,
                summary,
                tech_stack,
            } => TooltipContent {
                icon: icon.clone(),
                name: name.clone(),
                type_label: "Project",
                level_text: status_label.clone(),
                accent: ACCENT_KNOWLEDGE,
                description: summary.clone().unwrap_or_else(|| NO_DESCRIPTION.to_string()),
                source_title: "🛠️ Tech stack",
                source: if tech_stack.is_empty() { None } else { Some(tech_stack.join(" · ")) },
                progress: None,
                upgrade_hint: None,
            },
            HoverRecord::Stat {
                name,
                icon,
                value,
                description,
                details,
            } => TooltipContent {
                icon: icon.clone(),
                name: name.clone(),
                type_label: "Statistics",
                level_text: value.to_string(),
                accent: ACCENT_SKILL,
                description: description.clone(),
                source_title: "📊 Details",
                source: if details.is_empty() { None } else { Some(details.clone()) },
                progress: None,
                upgrade_hint: None,
            },
        }
    }
}

/// Skill category level: explicit average if present, else from children, else 3.
pub fn skill_category_level(cat: &crate::model::SkillCategory) -> u32 {
    cat.avg_level
        .map(|avg| (avg + 0.5).floor().max(0.0) as u32)
        .or_else(|| rounded_average(cat.skills.iter().map(|s| s.level)))
        .unwrap_or(3)
}

/// Knowledge category level: explicit heat level if present, else the file-count bucket.
pub fn knowledge_category_level(cat: &crate::model::KnowledgeCategory) -> u32 {
    cat.heat_level.unwrap_or_else(|| knowledge_level(cat.file_count))
}

/// Key → record table for one snapshot.
#[derive(Debug, Clone, Default)]
pub struct TooltipRegistry {
    records: HashMap<String, HoverRecord>,
}

impl TooltipRegistry {
    pub fn build(snapshot: &Snapshot) -> Self {
        let mut records = HashMap::new();
        let ch = &snapshot.character;

        for (ci, (cat_name, cat)) in ch.skills.categories.iter().enumerate() {
            records.insert(
                key(HoverView::SkillCategory, ci),
                HoverRecord::SkillCategory {
                    name: cat_name.to_string(),
                    icon: cat.icon.clone(),
                    level: skill_category_level(cat),
                    count: cat.count,
                },
            );
            for (si, skill) in cat.skills.iter().enumerate() {
                records.insert(
                    nested_key(HoverView::Skill, ci, si),
                    HoverRecord::Skill {
                        name: skill.name.clone(),
                        category: cat_name.to_string(),
                        category_icon: cat.icon.clone(),
                        level: skill.level,
                        description: skill.description.clone(),
                        source: skill.source.clone(),
                    },
                );
            }
        }

        for (ki, (cat_key, cat)) in ch.knowledge.categories.iter().enumerate() {
            records.insert(
                key(HoverView::Knowledge, ki),
                HoverRecord::KnowledgeCategory {
                    name: cat.name.clone().unwrap_or_else(|| cat_key.to_string()),
                    icon: cat.icon.clone(),
                    level: knowledge_category_level(cat),
                    file_count: cat.file_count,
                    size_kb: cat.size_kb.unwrap_or(0.0),
                    description: cat.description.clone(),
                },
            );
        }

        for (gi, group) in crate::render::abilities::group_memories(&ch.memories).iter().enumerate() {
            records.insert(
                key(HoverView::Memory, gi),
                HoverRecord::MemoryCategory {
                    label: group.label.clone(),
                    icon: group.icon.clone(),
                    level: memory_level(group.items.len() as u32),
                    item_count: group.items.len() as u32,
                },
            );
            for (ii, item) in group.items.iter().enumerate() {
                records.insert(
                    nested_key(HoverView::MemoryItem, gi, ii),
                    HoverRecord::MemoryItem {
                        title: item.title.clone(),
                        icon: item.icon.clone(),
                        importance: item.importance.unwrap_or(3),
                        description: item.description.clone(),
                        keywords: item.keywords.clone(),
                        source: item.source.clone(),
                    },
                );
            }
        }

        for (ai, a) in ch.achievements.iter().enumerate() {
            records.insert(
                key(HoverView::Achievement, ai),
                HoverRecord::Achievement {
                    name: a.name.clone(),
                    icon: a.icon.clone(),
                    description: a.desc.clone(),
                    unlocked: a.unlocked,
                    date: a.date.clone(),
                },
            );
        }

        for (pi, p) in snapshot.projects.projects.iter().enumerate() {
            records.insert(
                key(HoverView::Project, pi),
                HoverRecord::Project {
                    name: p.name.clone(),
                    icon: p.icon.clone(),
                    status_label: p.status().label().to_string(),
                    summary: p.subtitle.clone().or_else(|| p.goal.clone()),
                    tech_stack: p.tech_stack.clone(),
                },
            );
        }

        for (id, record) in crate::render::sidebar::stat_records(snapshot) {
            records.insert(key(HoverView::Stat, id), record);
        }

        tracing::debug!(records = records.len(), "tooltip registry rebuilt");
        Self { records }
    }

    pub fn lookup(&self, key: &str) -> Option<&HoverRecord> {
        self.records.get(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
