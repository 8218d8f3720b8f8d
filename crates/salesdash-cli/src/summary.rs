//! Text rendering of the dashboard metrics.

use std::fmt::Write;

use salesdash_core::metrics::{self, GroupTotal, RankBy};
use salesdash_core::{format_number, SalesRecord};

/// Render headline figures and the breakdown tables for `records`.
///
/// State and category tables are printed twice, ranked by revenue and then
/// by number of sales.
pub(crate) fn render_summary(records: &[&SalesRecord], top: usize) -> String {
    let rows = records.iter().copied();
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(
        out,
        "Revenue: {}    Sales: {}\n",
        format_number(metrics::total_revenue(rows.clone()), "R$"),
        format_number(count_as_f64(records.len()), "")
    );

    for rank in [RankBy::Revenue, RankBy::Sales] {
        let _ = writeln!(
            out,
            "{:<8}{:>18}{:>10}  by {}",
            "STATE",
            "REVENUE",
            "SALES",
            rank_label(rank)
        );
        for row in metrics::by_location(rows.clone(), rank) {
            let _ = writeln!(
                out,
                "{:<8}{:>18}{:>10}",
                row.location,
                format_number(row.revenue, "R$"),
                row.sales
            );
        }
        out.push('\n');
    }

    let _ = writeln!(out, "{:<10}{:>18}{:>10}", "MONTH", "REVENUE", "SALES");
    for row in metrics::monthly(rows.clone()) {
        let _ = writeln!(
            out,
            "{:<10}{:>18}{:>10}",
            format!("{:02}/{}", row.month, row.year),
            format_number(row.revenue, "R$"),
            row.sales
        );
    }
    out.push('\n');

    for rank in [RankBy::Revenue, RankBy::Sales] {
        let title = format!("CATEGORY by {}", rank_label(rank));
        write_groups(&mut out, &title, &metrics::by_category(rows.clone(), rank));
        out.push('\n');
    }
    for rank in [RankBy::Revenue, RankBy::Sales] {
        let title = format!("TOP SELLERS by {}", rank_label(rank));
        write_groups(&mut out, &title, &metrics::top_sellers(rows.clone(), rank, top));
        out.push('\n');
    }

    out
}

fn write_groups(out: &mut String, title: &str, groups: &[GroupTotal]) {
    let _ = writeln!(out, "{title:<32}{:>18}{:>10}", "REVENUE", "SALES");
    for group in groups {
        let key = if group.key.chars().count() > 30 {
            format!("{}...", group.key.chars().take(27).collect::<String>())
        } else {
            group.key.clone()
        };
        let _ = writeln!(
            out,
            "{key:<32}{:>18}{:>10}",
            format_number(group.revenue, "R$"),
            group.sales
        );
    }
}

fn rank_label(rank: RankBy) -> &'static str {
    match rank {
        RankBy::Revenue => "revenue",
        RankBy::Sales => "sales",
    }
}

#[allow(clippy::cast_precision_loss)]
fn count_as_f64(count: usize) -> f64 {
    count as f64
}
