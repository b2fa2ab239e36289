//! Expense category breakdown as a share-of-total pie

use super::payload::{ChartKind, ChartSeries, CostSlice, VisualPayload};
use super::{AnalysisContext, AnalystResponse};
use crate::models::ExpenseCategory;

pub(super) fn run(ctx: &AnalysisContext<'_>) -> AnalystResponse {
    // Category totals across the whole record set; zero-valued categories
    // are dropped so the pie only shows money actually spent.
    let mut slices: Vec<CostSlice> = ExpenseCategory::ALL
        .iter()
        .map(|category| CostSlice {
            name: category.label().to_string(),
            value: ctx.records.iter().map(|r| category.amount(r)).sum(),
            color: category.color().to_string(),
        })
        .filter(|slice| slice.value > 0.0)
        .collect();
    slices.sort_by(|a, b| b.value.total_cmp(&a.value));

    let total: f64 = slices.iter().map(|s| s.value).sum();

    let narrative = match slices.first() {
        Some(largest) => {
            let share = if total > 0.0 {
                largest.value / total * 100.0
            } else {
                0.0
            };
            format!(
                "💰 **経費構成分析**\n\n経費合計: {}\n最大項目: {}（{}、構成比{}）\n\n構成比の詳細は下の円グラフをご覧ください。",
                ctx.currency(total),
                largest.name,
                ctx.currency(largest.value),
                ctx.percent(share),
            )
        }
        None => "💰 **経費構成分析**\n\n経費の計上がまだありません。".to_string(),
    };

    AnalystResponse {
        narrative,
        visual: Some(VisualPayload::Chart {
            chart_type: ChartKind::Pie,
            series: ChartSeries::Slices(slices),
            title: "経費構成比".to_string(),
            metrics: None,
            total: Some(total),
        }),
        suggestions: vec![
            "経費削減戦略".to_string(),
            "最適な経費比率".to_string(),
            "コスト管理のベストプラクティス".to_string(),
        ],
    }
}
