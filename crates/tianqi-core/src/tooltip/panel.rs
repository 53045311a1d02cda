use super::{place, Point, Rect, Size, TooltipContent, TooltipRegistry};
use crate::theme::html_escape;

/// The single shared tooltip element. Showing overwrites whatever was shown before.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TooltipPanel {
    shown: Option<(TooltipContent, Point)>,
}

impl TooltipPanel {
    pub fn hidden() -> Self {
        Self::default()
    }

    /// Looks up `key` and shows it at the placed position. A miss leaves the panel as it was.
    pub fn show(
        &mut self,
        registry: &TooltipRegistry,
        key: &str,
        anchor: Rect,
        size: Option<Size>,
        viewport: Size,
    ) -> bool {
        let Some(record) = registry.lookup(key) else {
            return false;
        };
        let size = size.unwrap_or_else(|| record.estimated_size());
        self.shown = Some((record.content(), place(anchor, size, viewport)));
        true
    }

    pub fn hide(&mut self) {
        self.shown = None;
    }

    pub fn is_visible(&self) -> bool {
        self.shown.is_some()
    }

    pub fn content(&self) -> Option<&TooltipContent> {
        self.shown.as_ref().map(|(c, _)| c)
    }

    pub fn position(&self) -> Option<Point> {
        self.shown.as_ref().map(|(_, p)| *p)
    }

    /// `#tooltip` element markup; hidden panels render an empty, invisible element.
    pub fn render_html(&self) -> String {
        let Some((c, pos)) = &self.shown else {
            return r#"<div id="tooltip" class="tooltip"></div>"#.to_string();
        };

        let source = match &c.source {
            Some(s) => format!(
                r#"<div class="tip-source-section"><div class="tip-section-title">{}</div><div class="tip-source">{}</div></div>"#,
                html_escape(c.source_title),
                html_escape(s)
            ),
            None => String::new(),
        };
        let progress = match &c.progress {
            Some(p) => format!(
                r#"<div class="tip-progress"><div class="tip-progress-fill" style="width: {:.0}%; background: {};"></div></div><div class="tip-progress-text"><span class="prog-cur">{}</span><span class="prog-next">{}</span></div>"#,
                p.percent,
                c.accent,
                html_escape(&p.current),
                html_escape(&p.next)
            ),
            None => String::new(),
        };
        let hint = match &c.upgrade_hint {
            Some(h) => format!(r#"<div class="tip-hint">💡 {}</div>"#, html_escape(h)),
            None => String::new(),
        };

        format!(
            r#"<div id="tooltip" class="tooltip visible" style="left: {:.0}px; top: {:.0}px;"><div class="tip-header"><span class="tip-icon">{}</span><span class="tip-name">{}</span><span class="tip-type">{}</span></div><div class="tip-level"><span class="tip-lv-num" style="color: {};">{}</span></div><div class="tip-desc">{}</div>{}{}{}</div>"#,
            pos.left,
            pos.top,
            html_escape(&c.icon),
            html_escape(&c.name),
            c.type_label,
            c.accent,
            html_escape(&c.level_text),
            html_escape(&c.description),
            source,
            progress,
            hint
        )
    }
}
