//! Section renderers: pure functions from the snapshot and view state to container bindings.

pub mod abilities;
pub mod daily;
pub mod sidebar;
pub mod works;

use crate::model::DailyReport;
use crate::view::Binding;

/// Display form of a capability delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delta {
    pub text: String,
    pub class: &'static str,
}

impl Delta {
    pub fn binding(self) -> Binding {
        Binding::Styled {
            text: self.text,
            class: format!("cap-change {}", self.class),
        }
    }
}

/// `+N` / up, the signed number / down, em dash / neutral.
pub fn format_delta(change: i64) -> Delta {
    if change > 0 {
        Delta {
            text: format!("+{}", change),
            class: "up",
        }
    } else if change < 0 {
        Delta {
            text: change.to_string(),
            class: "down",
        }
    } else {
        Delta {
            text: "—".to_string(),
            class: "neutral",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendLabel {
    HighGrowth,
    SteadyGrowth,
    Stable,
}

impl TrendLabel {
    pub fn text(self) -> &'static str {
        match self {
            TrendLabel::HighGrowth => "high growth",
            TrendLabel::SteadyGrowth => "steady growth",
            TrendLabel::Stable => "stable",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            TrendLabel::HighGrowth => "🚀",
            TrendLabel::SteadyGrowth => "📈",
            TrendLabel::Stable => "—",
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            TrendLabel::HighGrowth => "trend-high",
            TrendLabel::SteadyGrowth => "trend-steady",
            TrendLabel::Stable => "trend-stable",
        }
    }
}

/// Sum of the three deltas: > 5 high growth, > 0 steady growth, otherwise stable.
pub fn trend_label(report: &DailyReport) -> TrendLabel {
    let total = report
        .skill_change
        .saturating_add(report.knowledge_change)
        .saturating_add(report.memory_change);
    if total > 5 {
        TrendLabel::HighGrowth
    } else if total > 0 {
        TrendLabel::SteadyGrowth
    } else {
        TrendLabel::Stable
    }
}

/// CSS bucket `lv1`..`lv5`.
pub fn level_class(level: u32) -> &'static str {
    match level {
        0 | 1 => "lv1",
        2 => "lv2",
        3 => "lv3",
        4 => "lv4",
        _ => "lv5",
    }
}

pub fn clamp_level(level: u32) -> u32 {
    level.clamp(1, 5)
}

pub const KNOWLEDGE_THRESHOLDS: [u32; 4] = [10, 30, 60, 100];
pub const MEMORY_THRESHOLDS: [u32; 4] = [1, 3, 6, 10];

/// Level from a count against inclusive upper bounds for levels 1-4.
pub fn bucket_level(count: u32, thresholds: &[u32; 4]) -> u32 {
    thresholds
        .iter()
        .position(|&t| count <= t)
        .map(|i| i as u32 + 1)
        .unwrap_or(5)
}

/// Knowledge level from file count: ≤10→1, ≤30→2, ≤60→3, ≤100→4, else 5.
pub fn knowledge_level(file_count: u32) -> u32 {
    bucket_level(file_count, &KNOWLEDGE_THRESHOLDS)
}

/// Memory category level from item count.
pub fn memory_level(item_count: u32) -> u32 {
    bucket_level(item_count, &MEMORY_THRESHOLDS)
}

/// Nearest-integer average, halves rounded up; `None` for an empty input.
pub fn rounded_average(levels: impl IntoIterator<Item = u32>) -> Option<u32> {
    let (sum, n) = levels
        .into_iter()
        .fold((0u64, 0u64), |(s, n), l| (s + l as u64, n + 1));
    if n == 0 {
        return None;
    }
    Some(((sum as f64 / n as f64) + 0.5).floor() as u32)
}

/// `data-tip` attribute for a hover target.
pub(crate) fn tip_attr(key: &str) -> String {
    format!(r#" data-tip="{}""#, crate::theme::html_escape(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(skill: i64, knowledge: i64, memory: i64) -> DailyReport {
        DailyReport {
            skill_change: skill,
            knowledge_change: knowledge,
            memory_change: memory,
            ..Default::default()
        }
    }

    #[test]
    fn delta_formatting() {
        assert_eq!(format_delta(3), Delta { text: "+3".into(), class: "up" });
        assert_eq!(format_delta(-2), Delta { text: "-2".into(), class: "down" });
        assert_eq!(format_delta(0), Delta { text: "—".into(), class: "neutral" });
    }

    #[test]
    fn trend_boundary_is_exclusive_at_five() {
        assert_eq!(trend_label(&report(2, 3, 0)), TrendLabel::SteadyGrowth);
        assert_eq!(trend_label(&report(3, 3, 0)), TrendLabel::HighGrowth);
        assert_eq!(trend_label(&report(3, 4, 0)), TrendLabel::HighGrowth);
        assert_eq!(trend_label(&report(1, 0, 0)), TrendLabel::SteadyGrowth);
        assert_eq!(trend_label(&report(0, 0, 0)), TrendLabel::Stable);
        assert_eq!(trend_label(&report(-4, 1, 0)), TrendLabel::Stable);
        assert_eq!(TrendLabel::SteadyGrowth.text(), "steady growth");
    }

    #[test]
    fn extreme_deltas_saturate() {
        assert_eq!(trend_label(&report(i64::MAX, i64::MAX, 1)), TrendLabel::HighGrowth);
        assert_eq!(trend_label(&report(i64::MIN, i64::MIN, 1)), TrendLabel::Stable);
        assert_eq!(trend_label(&report(i64::MAX, i64::MIN, 2)), TrendLabel::SteadyGrowth);
    }

    #[test]
    fn knowledge_bucket_boundaries() {
        assert_eq!(knowledge_level(0), 1);
        assert_eq!(knowledge_level(10), 1);
        assert_eq!(knowledge_level(11), 2);
        assert_eq!(knowledge_level(30), 2);
        assert_eq!(knowledge_level(31), 3);
        assert_eq!(knowledge_level(60), 3);
        assert_eq!(knowledge_level(61), 4);
        assert_eq!(knowledge_level(100), 4);
        assert_eq!(knowledge_level(101), 5);
    }

    #[test]
    fn memory_bucket_boundaries() {
        assert_eq!(memory_level(1), 1);
        assert_eq!(memory_level(2), 2);
        assert_eq!(memory_level(6), 3);
        assert_eq!(memory_level(7), 4);
        assert_eq!(memory_level(11), 5);
    }

    #[test]
    fn average_rounds_to_nearest() {
        assert_eq!(rounded_average([3, 4]), Some(4));
        assert_eq!(rounded_average([2, 2, 3]), Some(2));
        assert_eq!(rounded_average([5]), Some(5));
        assert_eq!(rounded_average(Vec::<u32>::new()), None);
    }

    #[test]
    fn level_classes() {
        assert_eq!(level_class(0), "lv1");
        assert_eq!(level_class(3), "lv3");
        assert_eq!(level_class(9), "lv5");
    }
}
