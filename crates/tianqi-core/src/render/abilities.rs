//! Abilities view: skill, knowledge and memory trees, achievement wall, skill tag cloud.

use super::{clamp_level, level_class, memory_level, tip_attr};
use crate::model::{Achievement, Memories, MemoryItem, Skill, Snapshot};
use crate::theme::html_escape;
use crate::tooltip::{key, knowledge_category_level, nested_key, skill_category_level, HoverView};
use crate::view::{Fragment, Layout};

pub const SKILL_TOTAL: &str = "skill-total";
pub const KNOWLEDGE_TOTAL: &str = "knowledge-total";
pub const MEMORY_TOTAL: &str = "memory-total";
pub const SKILL_TREE: &str = "skill-tree";
pub const KNOWLEDGE_TREE: &str = "knowledge-tree";
pub const MEMORY_TREE: &str = "memory-tree";
pub const ACHIEVEMENTS_FULL: &str = "achievements-full";
pub const SKILL_TAGS: &str = "skill-tags";

/// Memory items of one category, in first-seen order.
#[derive(Debug, Clone)]
pub struct MemoryGroup<'a> {
    pub key: String,
    pub label: String,
    pub icon: String,
    pub color: String,
    pub items: Vec<&'a MemoryItem>,
}

pub fn group_memories(memories: &Memories) -> Vec<MemoryGroup<'_>> {
    let mut groups: Vec<MemoryGroup<'_>> = Vec::new();
    for item in &memories.items {
        if let Some(g) = groups.iter_mut().find(|g| g.key == item.category) {
            g.items.push(item);
            continue;
        }
        let info = memories.by_category.get(&item.category);
        groups.push(MemoryGroup {
            key: item.category.clone(),
            label: info
                .map(|i| i.label.clone())
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| item.category.clone()),
            icon: info.map(|i| i.icon.clone()).unwrap_or_else(|| "📝".to_string()),
            color: info
                .and_then(|i| i.color.clone())
                .unwrap_or_else(|| "var(--orange)".to_string()),
            items: vec![item],
        });
    }
    groups
}

/// All skills with their tooltip key, highest level first; ties keep document order.
pub fn skills_by_level(snapshot: &Snapshot) -> Vec<(String, &Skill)> {
    let mut all: Vec<(String, &Skill)> = snapshot
        .character
        .skills
        .categories
        .iter()
        .enumerate()
        .flat_map(|(ci, (_, c))| {
            c.skills
                .iter()
                .enumerate()
                .map(move |(si, s)| (nested_key(HoverView::Skill, ci, si), s))
        })
        .collect();
    all.sort_by(|a, b| b.1.level.cmp(&a.1.level));
    all
}

fn leaf(icon: &str, level: u32, tip_key: &str) -> String {
    format!(
        r#"<div class="leaf-node {}"{}><span class="leaf-icon">{}</span><span class="leaf-level">{}</span></div>"#,
        level_class(level),
        tip_attr(tip_key),
        html_escape(icon),
        clamp_level(level)
    )
}

fn category_node(icon: &str, name: &str, level: u32, count: u32, color: &str, tip_key: &str) -> String {
    let color = html_escape(color);
    format!(
        r#"<div class="category-node {}" style="border-color: {c}; color: {c};"{}><span class="cat-icon">{}</span><span class="cat-name">{}</span><span class="cat-level">{}</span><span class="cat-count">{}</span></div>"#,
        level_class(level),
        tip_attr(tip_key),
        html_escape(icon),
        html_escape(name),
        clamp_level(level),
        count,
        c = color
    )
}

fn tree(root_icon: &str, root_label: &str, color: &str, branches: &str) -> String {
    if branches.is_empty() {
        return format!(
            r#"<div class="tree-graph empty" style="color: {};">{} {}: nothing recorded yet</div>"#,
            color, root_icon, root_label
        );
    }
    format!(
        r#"<div class="tree-graph"><div class="tree-root" style="color: {c};"><div class="root-node" style="border-color: {c};"><span class="node-icon">{}</span><span class="node-level">{}</span></div><div class="root-line"></div><div class="branches">{}</div></div></div>"#,
        root_icon,
        root_label,
        branches,
        c = color
    )
}

fn skill_tree(snapshot: &Snapshot) -> String {
    let branches: String = snapshot
        .character
        .skills
        .categories
        .iter()
        .enumerate()
        .map(|(ci, (name, cat))| {
            let color = cat.color.as_deref().unwrap_or("var(--green)");
            let leaves: String = cat
                .skills
                .iter()
                .enumerate()
                .map(|(si, s)| leaf("⚡", s.level, &nested_key(HoverView::Skill, ci, si)))
                .collect();
            format!(
                r#"<div class="branch" style="color: {};">{}<div class="leaves">{}</div></div>"#,
                html_escape(color),
                category_node(
                    &cat.icon,
                    name,
                    skill_category_level(cat),
                    cat.count,
                    color,
                    &key(HoverView::SkillCategory, ci)
                ),
                leaves
            )
        })
        .collect();
    tree("⚡", "SKILLS", "var(--green)", &branches)
}

fn knowledge_tree(snapshot: &Snapshot) -> String {
    let branches: String = snapshot
        .character
        .knowledge
        .categories
        .iter()
        .enumerate()
        .map(|(ki, (k, cat))| {
            let color = cat.color.as_deref().unwrap_or("var(--purple)");
            format!(
                r#"<div class="branch branch-leaf" style="color: {};">{}</div>"#,
                html_escape(color),
                category_node(
                    &cat.icon,
                    cat.name.as_deref().unwrap_or(k),
                    knowledge_category_level(cat),
                    cat.file_count,
                    color,
                    &key(HoverView::Knowledge, ki)
                )
            )
        })
        .collect();
    tree("📚", "KNOWLEDGE", "var(--purple)", &branches)
}

fn memory_tree(memories: &Memories) -> String {
    let branches: String = group_memories(memories)
        .iter()
        .enumerate()
        .map(|(gi, g)| {
            let leaves: String = g
                .items
                .iter()
                .enumerate()
                .map(|(ii, m)| {
                    leaf(
                        &m.icon,
                        m.importance.unwrap_or(3),
                        &nested_key(HoverView::MemoryItem, gi, ii),
                    )
                })
                .collect();
            let count = g.items.len() as u32;
            format!(
                r#"<div class="branch" style="color: {};">{}<div class="leaves">{}</div></div>"#,
                html_escape(&g.color),
                category_node(
                    &g.icon,
                    &g.label,
                    memory_level(count),
                    count,
                    &g.color,
                    &key(HoverView::Memory, gi)
                ),
                leaves
            )
        })
        .collect();
    tree("🧠", "MEMORY", "var(--orange)", &branches)
}

fn achievement_wall(achievements: &[Achievement]) -> String {
    achievements
        .iter()
        .enumerate()
        .map(|(ai, a)| {
            let date = match (&a.date, a.unlocked) {
                (Some(d), true) => format!(r#"<div class="ach-date">📅 {}</div>"#, html_escape(d)),
                _ => String::new(),
            };
            format!(
                r#"<div class="achievement-item {}"{}><div class="ach-icon">{}</div><div class="ach-info"><div class="ach-name">{}</div><div class="ach-desc">{}</div>{}</div></div>"#,
                if a.unlocked { "unlocked" } else { "locked" },
                tip_attr(&key(HoverView::Achievement, ai)),
                html_escape(&a.icon),
                html_escape(&a.name),
                html_escape(&a.desc),
                date
            )
        })
        .collect()
}

fn tag_cloud(snapshot: &Snapshot) -> String {
    skills_by_level(snapshot)
        .into_iter()
        .map(|(tip_key, s)| {
            format!(
                r#"<span class="skill-tag {}"{}>{} <small>Lv.{}</small></span>"#,
                level_class(s.level),
                tip_attr(&tip_key),
                html_escape(&s.name),
                clamp_level(s.level)
            )
        })
        .collect()
}

pub fn render(snapshot: &Snapshot, layout: &Layout) -> Fragment {
    let ch = &snapshot.character;
    let mut frag = Fragment::new();

    frag.text(layout, SKILL_TOTAL, ch.skills.total.to_string());
    frag.text(layout, KNOWLEDGE_TOTAL, ch.knowledge.total_files.to_string());
    frag.text(layout, MEMORY_TOTAL, ch.memories.total.to_string());

    frag.html(layout, SKILL_TREE, skill_tree(snapshot));
    frag.html(layout, KNOWLEDGE_TREE, knowledge_tree(snapshot));
    frag.html(layout, MEMORY_TREE, memory_tree(&ch.memories));

    if layout.toggles.achievements {
        frag.html(layout, ACHIEVEMENTS_FULL, achievement_wall(&ch.achievements));
    }
    if layout.toggles.tag_cloud {
        frag.html(layout, SKILL_TAGS, tag_cloud(snapshot));
    }
    frag
}
