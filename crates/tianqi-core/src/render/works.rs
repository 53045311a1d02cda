//! Works view: project summary, category tabs, and the project grid.

use super::tip_attr;
use crate::model::{Project, ProjectStatus, ProjectsData, Snapshot};
use crate::theme::html_escape;
use crate::tooltip::{key, HoverView};
use crate::view::{Fragment, Layout, ViewState};

pub const P_TOTAL: &str = "p-total";
pub const P_DEPLOYED: &str = "p-deployed";
pub const P_DEV: &str = "p-dev";
pub const P_ARCHIVED: &str = "p-archived";
pub const CATEGORY_TABS: &str = "project-category-tabs";
pub const PROJECTS_GRID: &str = "projects-grid";

/// Deployed projects first; input order is kept otherwise (stable sort).
/// Each project travels with its position in the document, which keys its tooltip.
pub fn sorted_projects(projects: &[Project]) -> Vec<(usize, &Project)> {
    let mut out: Vec<(usize, &Project)> = projects.iter().enumerate().collect();
    out.sort_by_key(|(_, p)| p.status() != ProjectStatus::Deployed);
    out
}

/// Sorted projects, narrowed to one category when a filter is set.
pub fn visible_projects<'a>(data: &'a ProjectsData, category: Option<&str>) -> Vec<(usize, &'a Project)> {
    sorted_projects(&data.projects)
        .into_iter()
        .filter(|(_, p)| match category {
            Some(c) => p.category.as_deref() == Some(c),
            None => true,
        })
        .collect()
}

fn category_tabs(data: &ProjectsData, active: Option<&str>) -> String {
    let mut html = format!(
        r#"<button class="cat-tab{}" data-category="all">🌟 All <span class="cat-count">{}</span></button>"#,
        if active.is_none() { " active" } else { "" },
        data.projects.len()
    );
    for (k, cat) in data.categories.iter() {
        html.push_str(&format!(
            r#"<button class="cat-tab{}" data-category="{}">{} {} <span class="cat-count">{}</span></button>"#,
            if active == Some(k) { " active" } else { "" },
            html_escape(k),
            html_escape(&cat.icon),
            html_escape(&cat.name),
            cat.count
        ));
    }
    html
}

fn section(label: &str, content: &str) -> String {
    format!(
        r#"<div class="project-section"><div class="project-section-label">{}</div><div class="project-section-content">{}</div></div>"#,
        label, content
    )
}

fn project_card(index: usize, p: &Project) -> String {
    let status = p.status();
    let tech: String = p
        .tech_stack
        .iter()
        .map(|t| format!(r#"<span class="tech-tag">{}</span>"#, html_escape(t)))
        .collect();
    let highlights: String = p
        .highlights
        .iter()
        .map(|h| format!(r#"<span class="project-highlight">✓ {}</span>"#, html_escape(h)))
        .collect();
    let link = match &p.url {
        Some(url) => format!(
            r#"<a href="{}" target="_blank" rel="noopener" class="project-link">🔗 Visit project</a>"#,
            html_escape(url)
        ),
        None => r#"<span class="project-link disabled">🔒 Local project</span>"#.to_string(),
    };

    let mut body = String::new();
    if let Some(goal) = &p.goal {
        body.push_str(&section("🎯 Goal", &html_escape(goal)));
    }
    if let Some(outcome) = &p.outcome {
        body.push_str(&section("📦 Outcome", &html_escape(outcome)));
    }
    if !highlights.is_empty() {
        body.push_str(&section("✨ Highlights", &highlights));
    }
    if !tech.is_empty() {
        body.push_str(&section("🛠️ Tech stack", &tech));
    }
    let date = p
        .completed_at
        .as_deref()
        .map(|d| format!(r#"<span class="project-date">📅 {}</span>"#, html_escape(d)))
        .unwrap_or_default();

    format!(
        r#"<div class="project-card {}"{}><div class="project-header"><div class="project-icon">{}</div><div class="project-title-area"><div class="project-name">{}</div><div class="project-subtitle">{}</div></div><span class="project-status {}">{}</span></div><div class="project-body">{}</div><div class="project-footer">{}{}</div></div>"#,
        status.class(),
        tip_attr(&key(HoverView::Project, index)),
        html_escape(&p.icon),
        html_escape(&p.name),
        html_escape(p.subtitle.as_deref().unwrap_or_default()),
        status.class(),
        status.label(),
        body,
        date,
        link
    )
}

pub fn render(snapshot: &Snapshot, view: &ViewState, layout: &Layout) -> Fragment {
    let data = &snapshot.projects;
    let mut frag = Fragment::new();

    frag.text(layout, P_TOTAL, data.summary.total.to_string());
    frag.text(layout, P_DEPLOYED, data.summary.deployed.to_string());
    frag.text(layout, P_DEV, data.summary.in_development.to_string());
    frag.text(layout, P_ARCHIVED, data.summary.archived.to_string());

    let filter = view.category_filter();
    if layout.toggles.category_tabs {
        frag.html(layout, CATEGORY_TABS, category_tabs(data, filter));
    }

    let cards: Vec<String> = visible_projects(data, filter)
        .into_iter()
        .map(|(i, p)| project_card(i, p))
        .collect();
    let grid = if cards.is_empty() {
        r#"<div class="empty">No projects</div>"#.to_string()
    } else {
        cards.concat()
    };
    frag.html(layout, PROJECTS_GRID, grid);
    frag
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(name: &str, status: &str, category: Option<&str>) -> Project {
        Project {
            name: name.to_string(),
            status: status.to_string(),
            category: category.map(str::to_string),
            ..Default::default()
        }
    }

    fn names(list: &[(usize, &Project)]) -> Vec<String> {
        list.iter().map(|(_, p)| p.name.clone()).collect()
    }

    #[test]
    fn deployed_first_and_stable() {
        let projects = vec![
            project("a", "archived", None),
            project("b", "deployed", None),
            project("c", "development", None),
            project("d", "deployed", None),
            project("e", "paused", None),
        ];
        assert_eq!(names(&sorted_projects(&projects)), ["b", "d", "a", "c", "e"]);
    }

    #[test]
    fn category_filter_keeps_sort_order() {
        let data = ProjectsData {
            projects: vec![
                project("a", "development", Some("web")),
                project("b", "deployed", Some("tool")),
                project("c", "deployed", Some("web")),
            ],
            ..Default::default()
        };
        assert_eq!(names(&visible_projects(&data, Some("web"))), ["c", "a"]);
        assert_eq!(names(&visible_projects(&data, None)), ["b", "c", "a"]);
    }

    #[test]
    fn card_without_url_is_marked_local() {
        let html = project_card(4, &project("site", "deployed", None));
        assert!(html.contains("Local project"));
        assert!(html.contains("✅ Deployed"));
        assert!(html.contains(r#"data-tip="project:4""#));
    }

    #[test]
    fn sorted_cards_keep_document_position_keys() {
        let projects = vec![project("same", "archived", None), project("same", "deployed", None)];
        let order: Vec<usize> = sorted_projects(&projects).iter().map(|(i, _)| *i).collect();
        assert_eq!(order, [1, 0]);

        let snap = Snapshot {
            projects: ProjectsData {
                projects,
                ..Default::default()
            },
            ..Default::default()
        };
        let frag = render(&snap, &ViewState::default(), &Layout::default());
        let grid = frag.html_of(PROJECTS_GRID).unwrap();
        let first = grid.find(r#"data-tip="project:1""#).unwrap();
        let second = grid.find(r#"data-tip="project:0""#).unwrap();
        assert!(first < second);
    }

    #[test]
    fn tabs_follow_layout_toggle() {
        let snap = Snapshot::default();
        let layout = Layout::new(crate::view::LayoutToggles {
            category_tabs: false,
            ..Default::default()
        });
        let frag = render(&snap, &ViewState::default(), &layout);
        assert!(frag.get(CATEGORY_TABS).is_none());
        assert!(frag.html_of(PROJECTS_GRID).unwrap().contains("No projects"));
    }
}
