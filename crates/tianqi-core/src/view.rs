//! Transient view state, the layout descriptor, and the fragment type renderers produce.

use crate::theme::html_escape;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Logical tabs of the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Daily,
    History,
    Works,
    Abilities,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Daily,
        Section::History,
        Section::Works,
        Section::Abilities,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Section::Daily => "daily",
            Section::History => "history",
            Section::Works => "works",
            Section::Abilities => "abilities",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Section::Daily => "📅 Daily",
            Section::History => "🗂️ History",
            Section::Works => "📁 Works",
            Section::Abilities => "⚡ Abilities",
        }
    }
}

/// The only mutable state: which tab, which report, which project category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ViewState {
    #[serde(default)]
    pub section: Section,
    #[serde(default)]
    pub report: usize,
    #[serde(default)]
    pub category: Option<String>,
}

impl ViewState {
    /// Category filter, `None` when all projects are shown.
    pub fn category_filter(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty() && *c != "all")
    }
}

/// Optional sections a layout variant renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutToggles {
    pub history: bool,
    pub tag_cloud: bool,
    pub achievements: bool,
    pub category_tabs: bool,
    pub charts: bool,
}

impl Default for LayoutToggles {
    fn default() -> Self {
        Self {
            history: true,
            tag_cloud: true,
            achievements: true,
            category_tabs: true,
            charts: true,
        }
    }
}

/// Which containers exist on the page. Bindings aimed at absent containers are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    pub toggles: LayoutToggles,
    omitted: BTreeSet<String>,
}

impl Layout {
    pub fn new(toggles: LayoutToggles) -> Self {
        Self {
            toggles,
            omitted: BTreeSet::new(),
        }
    }

    pub fn without(mut self, ids: impl IntoIterator<Item = String>) -> Self {
        self.omitted.extend(ids);
        self
    }

    pub fn has(&self, id: &str) -> bool {
        !self.omitted.contains(id)
    }
}

/// Value written into one container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Binding {
    Text(String),
    Styled { text: String, class: String },
    Html(String),
    Href(String),
}

impl Binding {
    /// Markup of the binding inside its container element.
    pub fn to_inner_html(&self) -> String {
        match self {
            Binding::Text(t) => html_escape(t),
            Binding::Styled { text, .. } => html_escape(text),
            Binding::Html(h) => h.clone(),
            Binding::Href(h) => html_escape(h),
        }
    }
}

/// Ordered container bindings produced by one renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Fragment {
    bindings: Vec<(String, Binding)>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a binding when the layout has the container.
    pub fn bind(&mut self, layout: &Layout, id: &str, binding: Binding) {
        if layout.has(id) {
            self.bindings.push((id.to_string(), binding));
        }
    }

    pub fn text(&mut self, layout: &Layout, id: &str, text: impl Into<String>) {
        self.bind(layout, id, Binding::Text(text.into()));
    }

    pub fn html(&mut self, layout: &Layout, id: &str, html: impl Into<String>) {
        self.bind(layout, id, Binding::Html(html.into()));
    }

    pub fn get(&self, id: &str) -> Option<&Binding> {
        self.bindings.iter().find(|(k, _)| k == id).map(|(_, b)| b)
    }

    /// Text of a text or styled binding.
    pub fn text_of(&self, id: &str) -> Option<&str> {
        match self.get(id)? {
            Binding::Text(t) => Some(t),
            Binding::Styled { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn html_of(&self, id: &str) -> Option<&str> {
        match self.get(id)? {
            Binding::Html(h) => Some(h),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.bindings.iter().map(|(k, b)| (k.as_str(), b))
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn extend(&mut self, other: Fragment) {
        self.bindings.extend(other.bindings);
    }

    /// Inner markup for a container, empty when unbound.
    pub fn slot(&self, id: &str) -> String {
        self.get(id).map(Binding::to_inner_html).unwrap_or_default()
    }

    /// Class of a styled binding; `fallback` otherwise.
    pub fn class_of<'a>(&'a self, id: &str, fallback: &'a str) -> &'a str {
        match self.get(id) {
            Some(Binding::Styled { class, .. }) => class,
            _ => fallback,
        }
    }
}
