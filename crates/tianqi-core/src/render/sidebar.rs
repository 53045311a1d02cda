//! Sidebar: hero level, core totals, last update, mini achievement strip.

use super::tip_attr;
use crate::model::Snapshot;
use crate::theme::html_escape;
use crate::tooltip::{key, HoverRecord, HoverView};
use crate::view::{Fragment, Layout};

pub const HERO_LEVEL: &str = "hero-level";
pub const STAT_SKILLS: &str = "stat-skills";
pub const STAT_KNOWLEDGE: &str = "stat-knowledge";
pub const STAT_MEMORY: &str = "stat-memory";
pub const STAT_PROJECTS: &str = "stat-projects";
pub const LAST_UPDATE: &str = "last-update";
pub const ACHIEVEMENTS_MINI: &str = "achievements-mini";

const MINI_ACHIEVEMENTS: usize = 8;
const DETAIL_ROWS: usize = 5;

/// Date part of the generator timestamp.
fn update_date(generated_at: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(generated_at)
        .map(|dt| dt.date_naive().to_string())
        .unwrap_or_else(|_| generated_at.split('T').next().unwrap_or_default().to_string())
}

pub fn render(snapshot: &Snapshot, layout: &Layout) -> Fragment {
    let ch = &snapshot.character;
    let mut frag = Fragment::new();

    frag.text(layout, HERO_LEVEL, format!("LV.{}", ch.character.level));
    frag.text(layout, STAT_SKILLS, ch.skills.total.to_string());
    frag.text(layout, STAT_KNOWLEDGE, ch.knowledge.total_files.to_string());
    frag.text(layout, STAT_MEMORY, ch.memories.total.to_string());
    frag.text(layout, STAT_PROJECTS, snapshot.projects.summary.total.to_string());
    frag.text(layout, LAST_UPDATE, update_date(&ch.generated_at));

    let mini: String = ch
        .achievements
        .iter()
        .enumerate()
        .filter(|(_, a)| a.unlocked)
        .take(MINI_ACHIEVEMENTS)
        .map(|(ai, a)| {
            format!(
                r#"<div class="ach-mini-item"{} title="{}: {}">{}</div>"#,
                tip_attr(&key(HoverView::Achievement, ai)),
                html_escape(&a.name),
                html_escape(&a.desc),
                html_escape(&a.icon)
            )
        })
        .collect();
    frag.html(layout, ACHIEVEMENTS_MINI, mini);

    frag
}

/// Hover records for the four sidebar stats, keyed by stat id.
pub fn stat_records(snapshot: &Snapshot) -> Vec<(&'static str, HoverRecord)> {
    let ch = &snapshot.character;
    let projects = &snapshot.projects;

    let skill_details = ch
        .skills
        .categories
        .iter()
        .map(|(name, cat)| format!("{} {}: {}", cat.icon, name, cat.count))
        .collect::<Vec<_>>()
        .join("\n");
    let knowledge_details = ch
        .knowledge
        .categories
        .iter()
        .take(DETAIL_ROWS)
        .map(|(k, cat)| format!("{} {}: {} docs", cat.icon, cat.name.as_deref().unwrap_or(k), cat.file_count))
        .collect::<Vec<_>>()
        .join("\n");
    let memory_details = ch
        .memories
        .by_category
        .iter()
        .take(DETAIL_ROWS)
        .map(|(_, info)| format!("{} {}: {}", info.icon, info.label, info.count))
        .collect::<Vec<_>>()
        .join("\n");

    vec![
        (
            "skills",
            HoverRecord::Stat {
                name: "SKILLS".to_string(),
                icon: "⚡".to_string(),
                value: ch.skills.total,
                description: format!(
                    "{} skills across {} domains.",
                    ch.skills.total,
                    ch.skills.categories.len()
                ),
                details: skill_details,
            },
        ),
        (
            "knowledge",
            HoverRecord::Stat {
                name: "KNOWLEDGE".to_string(),
                icon: "📚".to_string(),
                value: ch.knowledge.total_files,
                description: format!(
                    "{} documents covering {} knowledge areas.",
                    ch.knowledge.total_files,
                    ch.knowledge.categories.len()
                ),
                details: knowledge_details,
            },
        ),
        (
            "memory",
            HoverRecord::Stat {
                name: "MEMORY".to_string(),
                icon: "🧠".to_string(),
                value: ch.memories.total,
                description: format!(
                    "{} core memories, including preferences and project experience.",
                    ch.memories.total
                ),
                details: memory_details,
            },
        ),
        (
            "projects",
            HoverRecord::Stat {
                name: "PROJECTS".to_string(),
                icon: "📁".to_string(),
                value: projects.summary.total,
                description: format!(
                    "{} projects in the portfolio, {} deployed.",
                    projects.summary.total, projects.summary.deployed
                ),
                details: format!(
                    "✅ Deployed: {}\n🔧 In development: {}\n📦 Archived: {}",
                    projects.summary.deployed,
                    projects.summary.in_development,
                    projects.summary.archived
                ),
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_date_takes_date_part() {
        assert_eq!(update_date("2026-03-04T08:09:10+08:00"), "2026-03-04");
        assert_eq!(update_date("2026-03-04T08:09:10"), "2026-03-04");
        assert_eq!(update_date(""), "");
    }

    #[test]
    fn sidebar_shows_level_and_totals() {
        let mut snap = Snapshot::default();
        snap.character.character.level = 12;
        snap.character.skills.total = 40;
        snap.projects.summary.total = 9;
        let frag = render(&snap, &Layout::default());
        assert_eq!(frag.text_of(HERO_LEVEL), Some("LV.12"));
        assert_eq!(frag.text_of(STAT_SKILLS), Some("40"));
        assert_eq!(frag.text_of(STAT_PROJECTS), Some("9"));
    }

    #[test]
    fn project_stat_details_list_statuses() {
        let mut snap = Snapshot::default();
        snap.projects.summary.deployed = 3;
        let records = stat_records(&snap);
        let (_, projects) = records.iter().find(|(id, _)| *id == "projects").unwrap();
        match projects {
            HoverRecord::Stat { details, .. } => assert!(details.contains("Deployed: 3")),
            other => panic!("unexpected record {other:?}"),
        }
    }

    #[test]
    fn mini_achievements_key_by_document_position() {
        let mut snap = Snapshot::default();
        snap.character.achievements = vec![
            crate::model::Achievement {
                name: "Locked".into(),
                unlocked: false,
                ..Default::default()
            },
            crate::model::Achievement {
                name: "Open".into(),
                unlocked: true,
                ..Default::default()
            },
        ];
        let frag = render(&snap, &Layout::default());
        let html = frag.html_of(ACHIEVEMENTS_MINI).unwrap();
        assert!(html.contains(r#"data-tip="achievement:1""#));
        assert!(!html.contains(r#"data-tip="achievement:0""#));
    }
}
