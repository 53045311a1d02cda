//! Daily view (one selected report) and the report history timeline.

use super::{format_delta, trend_label};
use crate::model::{DailyReport, Snapshot};
use crate::theme::html_escape;
use crate::view::{Binding, Fragment, Layout, ViewState};

pub const REPORT_SELECT: &str = "report-select";
pub const TODAY_DATE: &str = "today-date";
pub const DAILY_PROJECTS: &str = "daily-projects";
pub const DAILY_COMMITS: &str = "daily-commits";
pub const DAILY_CONVERSATIONS: &str = "daily-conversations";
pub const DAILY_TREND: &str = "daily-trend";
pub const DAILY_TREND_ICON: &str = "daily-trend-icon";
pub const TODAY_HIGHLIGHTS: &str = "today-highlights";
pub const CAP_SKILL_CURRENT: &str = "cap-skill-current";
pub const CAP_KNOWLEDGE_CURRENT: &str = "cap-knowledge-current";
pub const CAP_MEMORY_CURRENT: &str = "cap-memory-current";
pub const CAP_SKILL_CHANGE: &str = "cap-skill-change";
pub const CAP_KNOWLEDGE_CHANGE: &str = "cap-knowledge-change";
pub const CAP_MEMORY_CHANGE: &str = "cap-memory-change";
pub const CORE_PROGRESS: &str = "core-progress";
pub const DELIVERIES: &str = "deliveries";
pub const DAILY_IFRAME: &str = "daily-iframe";
pub const VIEW_FULL_DAILY: &str = "view-full-daily";
pub const REPORTS_TIMELINE: &str = "reports-timeline";

const NO_REPORTS: &str = "No reports yet";

/// Selected report; an out-of-range index falls back to the newest report.
pub fn select_report(reports: &[DailyReport], index: usize) -> Option<(usize, &DailyReport)> {
    reports
        .get(index)
        .map(|r| (index, r))
        .or_else(|| reports.first().map(|r| (0, r)))
}

fn selector(reports: &[DailyReport], selected: usize) -> String {
    reports
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                r#"<option value="{}"{}>{} ({})</option>"#,
                i,
                if i == selected { " selected" } else { "" },
                html_escape(&r.date),
                html_escape(&r.day_of_week)
            )
        })
        .collect()
}

fn highlight_tags(highlights: &[String], class: &str) -> String {
    highlights
        .iter()
        .map(|h| format!(r#"<span class="{}">✓ {}</span>"#, class, html_escape(h)))
        .collect()
}

fn core_progress(report: &DailyReport) -> String {
    if report.core_progress.is_empty() {
        return String::new();
    }
    let items: String = report
        .core_progress
        .iter()
        .map(|p| match &p.detail {
            Some(d) => format!(
                r#"<li class="progress-item"><span class="progress-title">{}</span><span class="progress-detail">{}</span></li>"#,
                html_escape(&p.title),
                html_escape(d)
            ),
            None => format!(
                r#"<li class="progress-item"><span class="progress-title">{}</span></li>"#,
                html_escape(&p.title)
            ),
        })
        .collect();
    format!(r#"<ul class="progress-list">{}</ul>"#, items)
}

fn deliveries(report: &DailyReport) -> String {
    if report.deliveries.is_empty() {
        return String::new();
    }
    let items: String = report
        .deliveries
        .iter()
        .map(|d| match &d.url {
            Some(url) => format!(
                r#"<li class="delivery"><a href="{}" target="_blank" rel="noopener">📦 {}</a></li>"#,
                html_escape(url),
                html_escape(&d.name)
            ),
            None => format!(r#"<li class="delivery">📦 {}</li>"#, html_escape(&d.name)),
        })
        .collect();
    format!(r#"<ul class="delivery-list">{}</ul>"#, items)
}

/// Binds every daily container from `reports[view.report]` only.
pub fn render(snapshot: &Snapshot, view: &ViewState, layout: &Layout) -> Fragment {
    let reports = &snapshot.reports.reports;
    let mut frag = Fragment::new();

    let Some((index, report)) = select_report(reports, view.report) else {
        frag.text(layout, TODAY_DATE, NO_REPORTS);
        frag.html(layout, TODAY_HIGHLIGHTS, format!(r#"<div class="empty">{}</div>"#, NO_REPORTS));
        return frag;
    };

    frag.html(layout, REPORT_SELECT, selector(reports, index));
    frag.text(layout, TODAY_DATE, format!("{} ({})", report.date, report.day_of_week));
    frag.text(layout, DAILY_PROJECTS, report.active_projects.to_string());
    frag.text(layout, DAILY_COMMITS, report.total_commits.to_string());
    frag.text(layout, DAILY_CONVERSATIONS, report.conversation_count.to_string());

    let trend = trend_label(report);
    frag.bind(
        layout,
        DAILY_TREND,
        Binding::Styled {
            text: trend.text().to_string(),
            class: format!("daily-trend {}", trend.class()),
        },
    );
    frag.text(layout, DAILY_TREND_ICON, trend.icon());

    frag.html(layout, TODAY_HIGHLIGHTS, highlight_tags(&report.highlights, "highlight-item"));

    frag.text(layout, CAP_SKILL_CURRENT, report.skill_count.to_string());
    frag.text(layout, CAP_KNOWLEDGE_CURRENT, report.knowledge_count.to_string());
    frag.text(layout, CAP_MEMORY_CURRENT, report.memory_count.to_string());
    frag.bind(layout, CAP_SKILL_CHANGE, format_delta(report.skill_change).binding());
    frag.bind(layout, CAP_KNOWLEDGE_CHANGE, format_delta(report.knowledge_change).binding());
    frag.bind(layout, CAP_MEMORY_CHANGE, format_delta(report.memory_change).binding());

    frag.html(layout, CORE_PROGRESS, core_progress(report));
    frag.html(layout, DELIVERIES, deliveries(report));

    if let Some(url) = &report.html_url {
        frag.bind(layout, DAILY_IFRAME, Binding::Href(url.clone()));
        frag.bind(layout, VIEW_FULL_DAILY, Binding::Href(url.clone()));
    }

    frag
}

fn history_cap(value: u32, change: i64, kind: &str, label: &str) -> String {
    let delta = format_delta(change);
    format!(
        r#"<div class="report-cap {}"><div class="report-cap-value">{}</div><div class="report-cap-change {}">{}</div><div class="report-cap-label">{}</div></div>"#,
        kind,
        value,
        delta.class,
        html_escape(&delta.text),
        label
    )
}

/// Timeline of every report, newest first.
pub fn render_history(snapshot: &Snapshot, layout: &Layout) -> Fragment {
    let mut frag = Fragment::new();
    if !layout.toggles.history {
        return frag;
    }
    let reports = &snapshot.reports.reports;
    if reports.is_empty() {
        frag.html(layout, REPORTS_TIMELINE, format!(r#"<div class="empty">{}</div>"#, NO_REPORTS));
        return frag;
    }

    let items: String = reports
        .iter()
        .map(|r| {
            let highlights = highlight_tags(&r.highlights, "report-highlight-tag");
            let highlights = if highlights.is_empty() {
                String::new()
            } else {
                format!(r#"<div class="report-highlights">{}</div>"#, highlights)
            };
            let link = match &r.html_url {
                Some(url) => format!(
                    r#"<div class="report-footer"><a href="{}" target="_blank" rel="noopener" class="view-report-btn">📄 View details</a></div>"#,
                    html_escape(url)
                ),
                None => String::new(),
            };
            format!(
                r#"<div class="timeline-item"><div class="timeline-dot"></div><div class="report-card"><div class="report-header"><div><span class="report-date">{}</span> <span class="report-day">{}</span></div><div class="report-stats"><div class="report-stat"><div class="report-stat-num">{}</div><div class="report-stat-lbl">Projects</div></div><div class="report-stat"><div class="report-stat-num">{}</div><div class="report-stat-lbl">Commits</div></div><div class="report-stat"><div class="report-stat-num">{}</div><div class="report-stat-lbl">Conversations</div></div></div></div><div class="report-body"><div class="report-caps">{}{}{}</div>{}</div>{}</div></div>"#,
                html_escape(&r.date),
                html_escape(&r.day_of_week),
                r.active_projects,
                r.total_commits,
                r.conversation_count,
                history_cap(r.skill_count, r.skill_change, "skill", "Skills"),
                history_cap(r.knowledge_count, r.knowledge_change, "knowledge", "Knowledge"),
                history_cap(r.memory_count, r.memory_change, "memory", "Memory"),
                highlights,
                link
            )
        })
        .collect();
    frag.html(layout, REPORTS_TIMELINE, items);
    frag
}
