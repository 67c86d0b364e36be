//! Plain-text renderings of the list and chart screens.

use sales_config::Config;
use sales_core::{ChartsSnapshot, DateSection, ListView};
use sales_domain::{ChartPoint, SaleRecord};

use crate::cli::input::format_quantity;

const BAR_WIDTH: usize = 30;
const BAR_CHAR: char = '#';

pub fn sale_row(record: &SaleRecord, config: &Config) -> String {
    let marker = if record.edited { " (edited)" } else { "" };
    format!(
        "  {:<14} {:<20} {:>6}  {:>14}{}",
        record.id,
        record.item,
        format_quantity(record.quantity),
        config.format_amount(record.amount),
        marker
    )
}

fn section_lines(section: &DateSection, config: &Config, out: &mut Vec<String>) {
    out.push(format!("{} ({} sales)", section.date, section.items.len()));
    out.extend(section.items.iter().map(|record| sale_row(record, config)));
}

/// Sections under a date heading, or a flat list while a filter is active.
pub fn list_view(view: &ListView, config: &Config) -> Vec<String> {
    let mut out = Vec::new();
    match view {
        ListView::Sections(sections) => {
            for section in sections {
                section_lines(section, config, &mut out);
            }
        }
        ListView::Flat(records) => {
            out.extend(records.iter().map(|record| {
                let row = sale_row(record, config);
                format!("{row}  {}", record.date)
            }));
        }
    }
    out
}

pub fn sale_detail(record: &SaleRecord, config: &Config) -> Vec<String> {
    vec![
        format!("  Id       : {}", record.id),
        format!("  Item     : {}", record.item),
        format!("  Quantity : {}", format_quantity(record.quantity)),
        format!("  Amount   : {}", config.format_amount(record.amount)),
        format!("  Date     : {}", record.date),
        format!("  Edited   : {}", if record.edited { "yes" } else { "no" }),
    ]
}

/// Horizontal bars scaled to the largest value of the series.
pub fn bar_chart(points: &[ChartPoint], format_value: impl Fn(f64) -> String) -> Vec<String> {
    let max = points
        .iter()
        .map(|point| point.value)
        .fold(0.0_f64, f64::max);
    let label_width = points
        .iter()
        .map(|point| point.label.chars().count())
        .max()
        .unwrap_or(0);

    points
        .iter()
        .map(|point| {
            let len = if max > 0.0 {
                ((point.value / max) * BAR_WIDTH as f64).round() as usize
            } else {
                0
            };
            let bar: String = std::iter::repeat(BAR_CHAR).take(len).collect();
            format!(
                "  {:<width$} | {:<bar_width$} {}",
                point.label,
                bar,
                format_value(point.value),
                width = label_width,
                bar_width = BAR_WIDTH
            )
        })
        .collect()
}

pub fn charts(snapshot: &ChartsSnapshot, config: &Config) -> Vec<String> {
    let mut out = vec![format!("Total sales: {}", config.format_amount(snapshot.total_amount))];

    out.push(String::new());
    out.push("Top items by quantity".to_string());
    out.extend(bar_chart(&snapshot.top_by_quantity, format_quantity));

    out.push(String::new());
    out.push("Top items by revenue".to_string());
    out.extend(bar_chart(&snapshot.top_by_revenue, |value| {
        config.format_amount(value)
    }));

    out.push(String::new());
    out.push("Monthly revenue".to_string());
    out.extend(bar_chart(&snapshot.monthly, |value| config.format_amount(value)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sales_core::SummaryService;

    fn sample() -> Vec<SaleRecord> {
        vec![
            SaleRecord::new("1", "Crystal", 3.0, 10.0, "05/09/2025"),
            SaleRecord::new("2", "Bonafont", 1.0, 2.5, "05/09/2025"),
            SaleRecord::new("3", "Crystal", 2.0, 6.0, "01/08/2025"),
        ]
    }

    #[test]
    fn sections_render_a_heading_per_date() {
        let config = Config::default();
        let lines = list_view(&ListView::Sections(sales_core::group_by_date(&sample())), &config);

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "05/09/2025 (2 sales)");
        assert!(lines[1].contains("Crystal"));
        assert!(lines[1].contains("R$ 10,00"));
        assert_eq!(lines[3], "01/08/2025 (1 sales)");
    }

    #[test]
    fn edited_rows_are_marked() {
        let mut record = sample().remove(0);
        record.apply_edit("Crystal".into(), 4.0, 12.0, "05/09/2025".into());
        assert!(sale_row(&record, &Config::default()).ends_with("(edited)"));
    }

    #[test]
    fn bars_scale_to_the_largest_value() {
        let points = vec![
            ChartPoint {
                value: 10.0,
                label: "A".into(),
            },
            ChartPoint {
                value: 5.0,
                label: "B".into(),
            },
            ChartPoint {
                value: 0.0,
                label: "C".into(),
            },
        ];
        let lines = bar_chart(&points, |value| value.to_string());

        assert_eq!(lines[0].matches(BAR_CHAR).count(), BAR_WIDTH);
        assert_eq!(lines[1].matches(BAR_CHAR).count(), BAR_WIDTH / 2);
        assert_eq!(lines[2].matches(BAR_CHAR).count(), 0);
    }

    #[test]
    fn charts_screen_lists_all_twelve_months() {
        let snapshot = SummaryService::charts(&sample(), 5);
        let lines = charts(&snapshot, &Config::default());

        assert_eq!(lines[0], "Total sales: R$ 18,50");
        let monthly = lines
            .iter()
            .position(|line| line == "Monthly revenue")
            .expect("monthly header");
        assert_eq!(lines.len() - monthly - 1, 12);
        assert!(lines[monthly + 9].trim_start().starts_with("Sep"));
    }
}
