//! Dashboard pie charts
//!
//! A single parameterised chart serves every dashboard breakdown: the caller
//! picks a title and a key function returning a badge-style enum, and the
//! chart counts items per variant.
//!
//! ```rust,ignore
//! let chart = PieChart::from_items("Tasks by status", view.items(), |t: &Task| t.status);
//! let chart = PieChart::from_items("Projects", projects.items(), |p: &Project| p.status).omit_empty();
//! ```

use crate::core::badge::{BadgeColor, Badged};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub key: &'static str,
    pub label: &'static str,
    pub count: usize,
    /// Share of the total, 0 to 100
    pub percentage: f64,
    #[serde(serialize_with = "serialize_color")]
    pub color: BadgeColor,
}

fn serialize_color<S: serde::Serializer>(color: &BadgeColor, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(color.hex())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub total: usize,
    /// In variant declaration order
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    pub fn from_items<'a, T, K, I>(title: impl Into<String>, items: I, key: impl Fn(&T) -> K) -> Self
    where
        T: 'a,
        K: Badged,
        I: IntoIterator<Item = &'a T>,
    {
        let mut counts = vec![0usize; K::ALL.len()];
        let mut total = 0;
        for item in items {
            counts[key(item).ordinal() as usize] += 1;
            total += 1;
        }

        let slices = K::ALL
            .iter()
            .zip(counts)
            .map(|(variant, count)| {
                let badge = variant.badge();
                PieSlice {
                    key: variant.key(),
                    label: badge.label,
                    count,
                    percentage: if total == 0 {
                        0.0
                    } else {
                        count as f64 * 100.0 / total as f64
                    },
                    color: badge.color,
                }
            })
            .collect();

        Self {
            title: title.into(),
            total,
            slices,
        }
    }

    /// Drop slices with no items
    pub fn omit_empty(mut self) -> Self {
        self.slices.retain(|slice| slice.count > 0);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Horizontal bar rendering for terminals
    pub fn render_text(&self, width: usize) -> String {
        let mut out = format!("{} ({})\n", self.title, self.total);
        if self.is_empty() {
            out.push_str("No data\n");
            return out;
        }

        let label_width = self
            .slices
            .iter()
            .map(|s| s.label.chars().count())
            .max()
            .unwrap_or(0);
        for slice in &self.slices {
            let bar = ((slice.percentage / 100.0) * width as f64).round() as usize;
            let pad = label_width - slice.label.chars().count();
            out.push_str(&format!(
                "{}{}  {:<width$}  {:>3} ({:.1}%)\n",
                slice.label,
                " ".repeat(pad),
                "#".repeat(bar),
                slice.count,
                slice.percentage,
                width = width
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::badge::{ProjectStatus, TaskStatus};

    #[test]
    fn test_counts_follow_variant_order() {
        let statuses = [TaskStatus::Done, TaskStatus::Todo, TaskStatus::Done, TaskStatus::Done];
        let chart = PieChart::from_items("Tasks by status", statuses.iter(), |s: &TaskStatus| *s);

        assert_eq!(chart.total, 4);
        let keys: Vec<_> = chart.slices.iter().map(|s| (s.key, s.count)).collect();
        assert_eq!(keys, vec![("todo", 1), ("in_progress", 0), ("done", 3)]);
        assert_eq!(chart.slices[2].percentage, 75.0);
        assert_eq!(chart.slices[2].color, TaskStatus::Done.badge().color);
    }

    #[test]
    fn test_omit_empty() {
        let statuses = [ProjectStatus::Active, ProjectStatus::Active];
        let chart = PieChart::from_items("Projects", statuses.iter(), |s: &ProjectStatus| *s)
            .omit_empty();
        assert_eq!(chart.slices.len(), 1);
        assert_eq!(chart.slices[0].percentage, 100.0);
    }

    #[test]
    fn test_empty_chart() {
        let chart = PieChart::from_items("Tasks", std::iter::empty::<&TaskStatus>(), |s| *s);
        assert!(chart.is_empty());
        assert!(chart.slices.iter().all(|s| s.percentage == 0.0));
        assert!(chart.render_text(20).contains("No data"));
    }

    #[test]
    fn test_render_text_and_json() {
        let statuses = [TaskStatus::Todo, TaskStatus::Done];
        let chart = PieChart::from_items("Tasks", statuses.iter(), |s: &TaskStatus| *s).omit_empty();
        let text = chart.render_text(10);
        assert!(text.starts_with("Tasks (2)\n"));
        assert!(text.contains("#####"));
        assert!(text.contains("(50.0%)"));

        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["slices"][0]["color"], TaskStatus::Todo.badge().color.hex());
    }
}
