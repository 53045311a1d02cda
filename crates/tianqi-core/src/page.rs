//! Page composition: the full dashboard document and the section bodies the
//! fragment endpoints return.
//!
//! Every section body starts life as a `loading` placeholder. A successful load fills
//! it from the renderers; a failed load replaces every placeholder with the failure
//! message and no renderer runs.

use crate::chart::{chart_specs, ChartSpec, MINI_TREND_CANVAS, RADAR_CANVAS, TREND_CANVAS};
use crate::model::Snapshot;
use crate::render::{abilities, daily, sidebar, works};
use crate::theme::{html_escape, Theme};
use crate::tooltip::{key, HoverView, TooltipPanel};
use crate::view::{Binding, Fragment, Layout, Section, ViewState};

pub const SIDEBAR_BODY: &str = "sidebar-body";
pub const DAILY_BODY: &str = "daily-body";
pub const HISTORY_BODY: &str = "history-body";
pub const WORKS_BODY: &str = "works-body";
pub const ABILITIES_BODY: &str = "abilities-body";

// Body ids in page order; each is a `loading` placeholder until filled.
const PLACEHOLDERS: [&str; 5] = [SIDEBAR_BODY, DAILY_BODY, HISTORY_BODY, WORKS_BODY, ABILITIES_BODY];

const CHART_JS: &str = "https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js";

/// Text shown in place of every placeholder when the data cannot be loaded.
pub fn failure_message(reason: &str) -> String {
    format!("❌ Failed to load data: {}", reason)
}

fn slot(frag: &Fragment, layout: &Layout, tag: &str, id: &str, class: &str) -> String {
    if !layout.has(id) {
        return String::new();
    }
    format!(
        r#"<{tag} id="{id}" class="{}">{}</{tag}>"#,
        html_escape(frag.class_of(id, class)),
        frag.slot(id)
    )
}

fn labeled(frag: &Fragment, layout: &Layout, id: &str, label: &str) -> String {
    if !layout.has(id) {
        return String::new();
    }
    format!(
        r#"<div class="stat-box"><div class="stat-num">{}</div><div class="stat-lbl">{}</div></div>"#,
        slot(frag, layout, "span", id, "num"),
        label
    )
}

fn canvas(layout: &Layout, id: &str, class: &str) -> String {
    if !layout.toggles.charts || !layout.has(id) {
        return String::new();
    }
    format!(r#"<div class="{}"><canvas id="{}"></canvas></div>"#, class, id)
}

fn stat_card(frag: &Fragment, layout: &Layout, id: &str, stat: &str, icon: &str, label: &str) -> String {
    if !layout.has(id) {
        return String::new();
    }
    format!(
        r#"<div class="stat-card" data-tip="{}"><span class="stat-icon">{}</span>{}<span class="stat-label">{}</span></div>"#,
        html_escape(&key(HoverView::Stat, stat)),
        icon,
        slot(frag, layout, "span", id, "stat-value"),
        label
    )
}

pub fn sidebar_body(snapshot: &Snapshot, layout: &Layout) -> String {
    let frag = sidebar::render(snapshot, layout);
    let achievements = if layout.toggles.achievements {
        slot(&frag, layout, "div", sidebar::ACHIEVEMENTS_MINI, "achievements-mini")
    } else {
        String::new()
    };
    [
        slot(&frag, layout, "div", sidebar::HERO_LEVEL, "hero-level"),
        canvas(layout, RADAR_CANVAS, "radar-wrap"),
        r#"<div class="stat-cards">"#.to_string(),
        stat_card(&frag, layout, sidebar::STAT_SKILLS, "skills", "⚡", "Skills"),
        stat_card(&frag, layout, sidebar::STAT_KNOWLEDGE, "knowledge", "📚", "Knowledge"),
        stat_card(&frag, layout, sidebar::STAT_MEMORY, "memory", "🧠", "Memory"),
        stat_card(&frag, layout, sidebar::STAT_PROJECTS, "projects", "📁", "Projects"),
        "</div>".to_string(),
        canvas(layout, MINI_TREND_CANVAS, "mini-trend-wrap"),
        achievements,
        format!(
            r#"<div class="last-update">Updated {}</div>"#,
            slot(&frag, layout, "span", sidebar::LAST_UPDATE, "")
        ),
    ]
    .concat()
}

fn capability(frag: &Fragment, layout: &Layout, current: &str, change: &str, label: &str) -> String {
    format!(
        r#"<div class="cap-item"><div class="cap-label">{}</div>{}{}</div>"#,
        label,
        slot(frag, layout, "div", current, "cap-current"),
        slot(frag, layout, "div", change, "cap-change")
    )
}

pub fn daily_body(snapshot: &Snapshot, view: &ViewState, layout: &Layout) -> String {
    let frag = daily::render(snapshot, view, layout);

    let report_link = match frag.get(daily::VIEW_FULL_DAILY) {
        Some(Binding::Href(url)) => format!(
            r#"<a id="{}" class="view-full" href="{}" target="_blank" rel="noopener">📄 Full report</a>"#,
            daily::VIEW_FULL_DAILY,
            html_escape(url)
        ),
        _ => String::new(),
    };
    let iframe = match frag.get(daily::DAILY_IFRAME) {
        Some(Binding::Href(url)) => format!(
            r#"<iframe id="{}" class="daily-iframe" src="{}" loading="lazy"></iframe>"#,
            daily::DAILY_IFRAME,
            html_escape(url)
        ),
        _ => String::new(),
    };

    [
        r#"<div class="daily-header">"#.to_string(),
        slot(&frag, layout, "select", daily::REPORT_SELECT, "report-select"),
        slot(&frag, layout, "h2", daily::TODAY_DATE, "today-date"),
        report_link,
        "</div>".to_string(),
        r#"<div class="daily-stats">"#.to_string(),
        labeled(&frag, layout, daily::DAILY_PROJECTS, "Active projects"),
        labeled(&frag, layout, daily::DAILY_COMMITS, "Commits"),
        labeled(&frag, layout, daily::DAILY_CONVERSATIONS, "Conversations"),
        format!(
            r#"<div class="stat-box">{}{}</div>"#,
            slot(&frag, layout, "span", daily::DAILY_TREND_ICON, "trend-icon"),
            slot(&frag, layout, "span", daily::DAILY_TREND, "daily-trend")
        ),
        "</div>".to_string(),
        slot(&frag, layout, "div", daily::TODAY_HIGHLIGHTS, "highlights"),
        r#"<div class="capabilities">"#.to_string(),
        capability(&frag, layout, daily::CAP_SKILL_CURRENT, daily::CAP_SKILL_CHANGE, "⚡ Skills"),
        capability(&frag, layout, daily::CAP_KNOWLEDGE_CURRENT, daily::CAP_KNOWLEDGE_CHANGE, "📚 Knowledge"),
        capability(&frag, layout, daily::CAP_MEMORY_CURRENT, daily::CAP_MEMORY_CHANGE, "🧠 Memory"),
        "</div>".to_string(),
        slot(&frag, layout, "div", daily::CORE_PROGRESS, "core-progress"),
        slot(&frag, layout, "div", daily::DELIVERIES, "deliveries"),
        iframe,
    ]
    .concat()
}

pub fn history_body(snapshot: &Snapshot, layout: &Layout) -> String {
    let frag = daily::render_history(snapshot, layout);
    format!(
        "{}{}",
        canvas(layout, TREND_CANVAS, "trend-wrap"),
        slot(&frag, layout, "div", daily::REPORTS_TIMELINE, "timeline")
    )
}

pub fn works_body(snapshot: &Snapshot, view: &ViewState, layout: &Layout) -> String {
    let frag = works::render(snapshot, view, layout);
    let tabs = if layout.toggles.category_tabs {
        slot(&frag, layout, "div", works::CATEGORY_TABS, "category-tabs")
    } else {
        String::new()
    };
    [
        r#"<div class="project-summary">"#.to_string(),
        labeled(&frag, layout, works::P_TOTAL, "Total"),
        labeled(&frag, layout, works::P_DEPLOYED, "Deployed"),
        labeled(&frag, layout, works::P_DEV, "In development"),
        labeled(&frag, layout, works::P_ARCHIVED, "Archived"),
        "</div>".to_string(),
        tabs,
        slot(&frag, layout, "div", works::PROJECTS_GRID, "projects-grid"),
    ]
    .concat()
}

fn tree_panel(frag: &Fragment, layout: &Layout, total: &str, tree: &str, title: &str) -> String {
    format!(
        r#"<div class="tree-panel"><div class="tree-title">{} {}</div>{}</div>"#,
        title,
        slot(frag, layout, "span", total, "tree-total"),
        slot(frag, layout, "div", tree, "tree")
    )
}

pub fn abilities_body(snapshot: &Snapshot, layout: &Layout) -> String {
    let frag = abilities::render(snapshot, layout);
    let mut html = [
        r#"<div class="trees">"#.to_string(),
        tree_panel(&frag, layout, abilities::SKILL_TOTAL, abilities::SKILL_TREE, "⚡ Skills"),
        tree_panel(&frag, layout, abilities::KNOWLEDGE_TOTAL, abilities::KNOWLEDGE_TREE, "📚 Knowledge"),
        tree_panel(&frag, layout, abilities::MEMORY_TOTAL, abilities::MEMORY_TREE, "🧠 Memory"),
        "</div>".to_string(),
    ]
    .concat();
    if layout.toggles.tag_cloud {
        html.push_str(&slot(&frag, layout, "div", abilities::SKILL_TAGS, "skill-tags"));
    }
    if layout.toggles.achievements {
        html.push_str(&slot(&frag, layout, "div", abilities::ACHIEVEMENTS_FULL, "achievements-full"));
    }
    html
}

/// Body markup per placeholder id, in page order.
struct Bodies {
    sidebar: String,
    daily: String,
    history: String,
    works: String,
    abilities: String,
}

impl Bodies {
    fn failed(message: &str) -> Self {
        let m = || format!(r#"<div class="loading error">{}</div>"#, html_escape(message));
        Self {
            sidebar: m(),
            daily: m(),
            history: m(),
            works: m(),
            abilities: m(),
        }
    }
}

fn tabs(layout: &Layout, active: Section) -> String {
    Section::ALL
        .iter()
        .filter(|s| **s != Section::History || layout.toggles.history)
        .map(|s| {
            format!(
                r#"<button class="tab{}" data-tab="{}">{}</button>"#,
                if *s == active { " active" } else { "" },
                s.id(),
                s.label()
            )
        })
        .collect()
}

fn section(id: &str, body_id: &str, body: &str, active: bool) -> String {
    format!(
        r#"<section id="{}" class="tab-content{}"><div id="{}" class="section-body">{}</div></section>"#,
        id,
        if active { " active" } else { "" },
        body_id,
        body
    )
}

/// Chart configs as script-safe JSON.
fn charts_json(specs: &[ChartSpec]) -> String {
    serde_json::to_string(specs)
        .unwrap_or_else(|_| "[]".to_string())
        .replace("</", "<\\/")
}

fn document(title: &str, theme: Theme, layout: &Layout, view: &ViewState, bodies: &Bodies, charts: &str) -> String {
    let active = if view.section == Section::History && !layout.toggles.history {
        Section::Daily
    } else {
        view.section
    };
    let history = if layout.toggles.history {
        section(Section::History.id(), HISTORY_BODY, &bodies.history, active == Section::History)
    } else {
        String::new()
    };
    let chart_script = if layout.toggles.charts {
        format!(r#"<script src="{}"></script>"#, CHART_JS)
    } else {
        String::new()
    };

    let mut html = String::with_capacity(16 * 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{}</title>\n", html_escape(title)));
    html.push_str(&format!("<style>{}{}</style>\n", theme.palette().css_vars(), STYLE));
    html.push_str("</head>\n");
    html.push_str(&format!(r#"<body class="theme-{}">"#, theme.name()));
    html.push_str(&format!(
        r#"<div class="app"><aside class="sidebar"><div class="brand">{}</div><div id="{}" class="section-body">{}</div></aside><main class="main"><nav class="tabs">{}</nav>"#,
        html_escape(title),
        SIDEBAR_BODY,
        bodies.sidebar,
        tabs(layout, active)
    ));
    html.push_str(&section(Section::Daily.id(), DAILY_BODY, &bodies.daily, active == Section::Daily));
    html.push_str(&history);
    html.push_str(&section(Section::Works.id(), WORKS_BODY, &bodies.works, active == Section::Works));
    html.push_str(&section(
        Section::Abilities.id(),
        ABILITIES_BODY,
        &bodies.abilities,
        active == Section::Abilities,
    ));
    html.push_str("</main></div>\n");
    html.push_str(&TooltipPanel::hidden().render_html());
    html.push_str(&format!(
        "\n<script type=\"application/json\" id=\"chart-specs\">{}</script>\n",
        charts
    ));
    html.push_str(&chart_script);
    html.push_str(&format!("<script>{}</script>\n</body>\n</html>\n", SCRIPT));
    html
}

/// Full dashboard for a loaded snapshot.
pub fn render_page(snapshot: &Snapshot, view: &ViewState, layout: &Layout, theme: Theme, title: &str) -> String {
    let bodies = Bodies {
        sidebar: sidebar_body(snapshot, layout),
        daily: daily_body(snapshot, view, layout),
        history: history_body(snapshot, layout),
        works: works_body(snapshot, view, layout),
        abilities: abilities_body(snapshot, layout),
    };
    let charts = charts_json(&chart_specs(snapshot, theme, layout));
    document(title, theme, layout, view, &bodies, &charts)
}

/// Page whose placeholders all carry `message`; no renderer runs.
pub fn render_failure_page(title: &str, theme: Theme, layout: &Layout, message: &str) -> String {
    document(
        title,
        theme,
        layout,
        &ViewState::default(),
        &Bodies::failed(message),
        "[]",
    )
}

/// Number of `loading` placeholders a page with this layout carries.
pub fn placeholder_count(layout: &Layout) -> usize {
    PLACEHOLDERS
        .iter()
        .filter(|id| **id != HISTORY_BODY || layout.toggles.history)
        .count()
}

const STYLE: &str = r#"
*{box-sizing:border-box;margin:0;padding:0}
body{background:var(--bg);color:var(--text);font-family:"Press Start 2P","Courier New",monospace;font-size:13px}
.app{display:flex;min-height:100vh}
.sidebar{width:280px;padding:20px;background:var(--panel);border-right:3px solid var(--grid)}
.brand{font-size:18px;color:var(--green);margin-bottom:16px}
.main{flex:1;padding:20px}
.tabs{display:flex;gap:8px;margin-bottom:16px}
.tab{background:var(--panel);color:var(--muted);border:2px solid var(--grid);padding:8px 14px;cursor:pointer}
.tab.active{color:var(--green);border-color:var(--green)}
.tab-content{display:none}
.tab-content.active{display:block}
.loading{padding:24px;color:var(--muted)}
.loading.error{color:var(--orange)}
.hero-level{font-size:28px;color:var(--green)}
.stat-cards{display:grid;grid-template-columns:1fr 1fr;gap:8px;margin:12px 0}
.stat-card,.stat-box,.cap-item,.tree-panel,.project-card,.report-card{background:var(--panel);border:2px solid var(--grid);padding:10px}
.radar-wrap,.mini-trend-wrap{height:180px}
.trend-wrap{height:260px;margin-bottom:16px}
.daily-header,.daily-stats,.capabilities,.project-summary,.category-tabs{display:flex;gap:10px;flex-wrap:wrap;margin-bottom:12px}
.cap-change.up{color:var(--green)}.cap-change.down{color:var(--orange)}.cap-change.neutral{color:var(--muted)}
.trend-high{color:var(--green)}.trend-steady{color:var(--purple)}.trend-stable{color:var(--muted)}
.highlight-item,.skill-tag,.tech-tag,.project-highlight,.report-highlight-tag{display:inline-block;margin:3px;padding:3px 8px;border:1px solid var(--grid)}
.projects-grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(300px,1fr));gap:12px}
.project-status.status-deployed{color:var(--green)}.project-status.status-development{color:var(--purple)}.project-status.status-archived{color:var(--muted)}
.project-link.disabled{color:var(--muted)}
.cat-tab{background:none;color:var(--muted);border:2px solid var(--grid);padding:6px 10px;cursor:pointer}
.cat-tab.active{color:var(--green);border-color:var(--green)}
.trees{display:grid;grid-template-columns:repeat(auto-fit,minmax(260px,1fr));gap:12px}
.branches,.leaves{display:flex;flex-wrap:wrap;gap:6px}
.category-node,.leaf-node,.root-node{border:2px solid currentColor;padding:4px 8px}
.lv1{opacity:.55}.lv2{opacity:.7}.lv3{opacity:.85}.lv4{opacity:.95}.lv5{opacity:1;font-weight:bold}
.achievement-item.locked{opacity:.4;filter:grayscale(1)}
.daily-iframe{width:100%;height:480px;border:2px solid var(--grid)}
.timeline-item{margin-bottom:12px;padding-left:16px;border-left:3px solid var(--grid)}
.tooltip{position:fixed;display:none;width:280px;padding:12px;background:var(--panel);border:2px solid var(--purple);z-index:1000;pointer-events:none}
.tooltip.visible{display:block}
.tip-progress{height:6px;background:var(--grid);margin:8px 0}
.tip-progress-fill{height:100%}
"#;

const SCRIPT: &str = r#"
(function () {
  var charts = {};
  var pending = {};
  var hoverSeq = 0;

  function specs() {
    var el = document.getElementById('chart-specs');
    try { return el ? JSON.parse(el.textContent) : []; } catch (e) { return []; }
  }

  function mount(spec) {
    var canvas = document.getElementById(spec.canvas);
    if (!canvas || typeof Chart === 'undefined') return;
    if (canvas.offsetWidth === 0 || canvas.offsetHeight === 0) { pending[spec.canvas] = spec; return; }
    delete pending[spec.canvas];
    if (charts[spec.canvas]) charts[spec.canvas].destroy();
    charts[spec.canvas] = new Chart(canvas, spec.config);
  }

  function swap(url, target) {
    fetch(url).then(function (res) {
      if (!res.ok) return;
      return res.text().then(function (html) { document.getElementById(target).innerHTML = html; });
    });
  }

  function tooltip(html) {
    var el = document.getElementById('tooltip');
    if (el) el.outerHTML = html;
  }

  document.addEventListener('click', function (ev) {
    var tab = ev.target.closest('[data-tab]');
    if (tab) {
      document.querySelectorAll('[data-tab]').forEach(function (t) { t.classList.toggle('active', t === tab); });
      document.querySelectorAll('.tab-content').forEach(function (s) { s.classList.toggle('active', s.id === tab.dataset.tab); });
      Object.keys(pending).forEach(function (k) { mount(pending[k]); });
      return;
    }
    var cat = ev.target.closest('[data-category]');
    if (cat) swap('/fragments/works?category=' + encodeURIComponent(cat.dataset.category), 'works-body');
  });

  document.addEventListener('change', function (ev) {
    if (ev.target.id === 'report-select') swap('/fragments/daily?report=' + ev.target.value, 'daily-body');
  });

  document.addEventListener('mouseover', function (ev) {
    var el = ev.target.closest('[data-tip]');
    if (!el || el.contains(ev.relatedTarget)) return;
    var r = el.getBoundingClientRect();
    var q = new URLSearchParams({
      key: el.dataset.tip, left: r.left, top: r.top, width: r.width, height: r.height,
      vw: window.innerWidth, vh: window.innerHeight
    });
    var seq = ++hoverSeq;
    fetch('/fragments/tooltip?' + q).then(function (res) {
      if (res.status !== 200 || seq !== hoverSeq) return;
      return res.text().then(tooltip);
    });
  });

  document.addEventListener('mouseout', function (ev) {
    var el = ev.target.closest('[data-tip]');
    if (!el || el.contains(ev.relatedTarget)) return;
    hoverSeq++;
    var tip = document.getElementById('tooltip');
    if (tip) tip.classList.remove('visible');
  });

  window.addEventListener('load', function () { specs().forEach(mount); });
})();
"#;
