//! Chart adapter: numeric series into chart configurations.
//!
//! Drawing belongs to the external charting library. The page script mounts these
//! specs, keeping one instance per canvas and deferring zero-size surfaces.

use crate::model::{Stats, Trend};
use crate::theme::{with_alpha, Theme};
use crate::view::Layout;
use serde::Serialize;
use serde_json::{json, Value};

pub const RADAR_CANVAS: &str = "radarChart";
pub const MINI_TREND_CANVAS: &str = "miniTrendChart";
pub const TREND_CANVAS: &str = "trendChart";

const STAT_LABELS: [&str; 6] = ["Reasoning", "Memory", "Execution", "Learning", "Insight", "Creativity"];

/// One chart: the canvas it targets and the library config.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub canvas: &'static str,
    pub config: Value,
}

pub fn radar(stats: &Stats, theme: Theme) -> ChartSpec {
    let p = theme.palette();
    ChartSpec {
        canvas: RADAR_CANVAS,
        config: json!({
            "type": "radar",
            "data": {
                "labels": STAT_LABELS,
                "datasets": [{
                    "data": stats.as_array(),
                    "backgroundColor": with_alpha(p.green, 0.2),
                    "borderColor": p.green,
                    "borderWidth": 2,
                    "pointBackgroundColor": p.green,
                    "pointBorderColor": p.green,
                    "pointRadius": 4
                }]
            },
            "options": {
                "responsive": true,
                "maintainAspectRatio": false,
                "scales": {
                    "r": {
                        "angleLines": { "color": p.grid },
                        "grid": { "color": p.grid },
                        "pointLabels": { "color": p.text, "font": { "size": 10 } },
                        "ticks": { "display": false },
                        "min": 0,
                        "max": 100
                    }
                },
                "plugins": { "legend": { "display": false } }
            }
        }),
    }
}

pub fn mini_trend(trend: &Trend, theme: Theme) -> ChartSpec {
    let p = theme.palette();
    ChartSpec {
        canvas: MINI_TREND_CANVAS,
        config: json!({
            "type": "line",
            "data": {
                "labels": trend.dates,
                "datasets": [{
                    "data": trend.skills,
                    "borderColor": p.green,
                    "borderWidth": 2,
                    "fill": false,
                    "tension": 0.4,
                    "pointRadius": 0
                }]
            },
            "options": {
                "responsive": true,
                "maintainAspectRatio": false,
                "scales": { "x": { "display": false }, "y": { "display": false } },
                "plugins": { "legend": { "display": false } }
            }
        }),
    }
}

fn line_dataset(label: &str, data: &[f64], color: &str) -> Value {
    json!({
        "label": label,
        "data": data,
        "borderColor": color,
        "backgroundColor": with_alpha(color, 0.1),
        "fill": true,
        "tension": 0.4,
        "pointRadius": 5,
        "pointHoverRadius": 8
    })
}

pub fn trend(trend: &Trend, theme: Theme) -> ChartSpec {
    let p = theme.palette();
    let axis = json!({
        "grid": { "color": p.grid },
        "ticks": { "color": p.muted, "font": { "size": 10 } }
    });
    ChartSpec {
        canvas: TREND_CANVAS,
        config: json!({
            "type": "line",
            "data": {
                "labels": trend.dates,
                "datasets": [
                    line_dataset("Skills", &trend.skills, p.green),
                    line_dataset("Knowledge", &trend.knowledge, p.purple),
                    line_dataset("Memory", &trend.memory, p.orange)
                ]
            },
            "options": {
                "responsive": true,
                "maintainAspectRatio": false,
                "interaction": { "mode": "index", "intersect": false },
                "scales": { "x": axis.clone(), "y": axis },
                "plugins": {
                    "legend": {
                        "position": "top",
                        "labels": { "color": p.muted, "usePointStyle": true, "font": { "size": 11 } }
                    },
                    "tooltip": {
                        "enabled": true,
                        "backgroundColor": with_alpha(p.panel, 0.95),
                        "titleColor": p.text,
                        "bodyColor": p.muted,
                        "borderColor": p.purple,
                        "borderWidth": 1,
                        "cornerRadius": 8,
                        "padding": 12
                    }
                }
            }
        }),
    }
}

/// Every chart the page shows; trend charts are skipped when the series is absent.
pub fn chart_specs(snapshot: &crate::model::Snapshot, theme: Theme, layout: &Layout) -> Vec<ChartSpec> {
    if !layout.toggles.charts {
        return Vec::new();
    }
    let mut specs = Vec::new();
    if layout.has(RADAR_CANVAS) {
        specs.push(radar(&snapshot.character.character.stats, theme));
    }
    if let Some(t) = &snapshot.reports.trend {
        if layout.has(MINI_TREND_CANVAS) {
            specs.push(mini_trend(t, theme));
        }
        if layout.has(TREND_CANVAS) {
            specs.push(trend(t, theme));
        }
    }
    specs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radar_carries_six_scores_in_axis_order() {
        let stats = Stats {
            reasoning: 80.0,
            memory: 70.0,
            execution: 60.0,
            learning: 50.0,
            insight: 40.0,
            creativity: 30.0,
        };
        let spec = radar(&stats, Theme::Pixel);
        assert_eq!(spec.config["data"]["datasets"][0]["data"], json!([80.0, 70.0, 60.0, 50.0, 40.0, 30.0]));
        assert_eq!(spec.config["options"]["scales"]["r"]["max"], 100);
        assert_eq!(spec.config["data"]["datasets"][0]["borderColor"], "#3cb489");
    }

    #[test]
    fn trend_has_three_series_and_skips_without_data() {
        let t = Trend {
            dates: vec!["03-01".into(), "03-02".into()],
            skills: vec![10.0, 12.0],
            knowledge: vec![100.0, 104.0],
            memory: vec![20.0, 20.0],
        };
        let spec = trend(&t, Theme::Neon);
        let sets = spec.config["data"]["datasets"].as_array().unwrap();
        assert_eq!(sets.len(), 3);
        assert_eq!(sets[1]["data"], json!([100.0, 104.0]));

        let snap = crate::model::Snapshot::default();
        let specs = chart_specs(&snap, Theme::Pixel, &Layout::default());
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].canvas, RADAR_CANVAS);
    }
}
