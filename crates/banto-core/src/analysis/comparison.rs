//! Store-against-store performance ranking

use std::collections::BTreeMap;

use super::aggregate::AggregatedPeriod;
use super::payload::{ChartKind, StorePerformance, VisualPayload};
use super::{AnalysisContext, AnalystResponse};

/// Margin gap between the top and bottom store, in percentage points, above
/// which the ranking calls out the laggard by name.
const MARGIN_GAP_THRESHOLD: f64 = 5.0;

pub(super) fn run(ctx: &AnalysisContext<'_>) -> AnalystResponse {
    // Comparison always spans every store; a single-store filter would make
    // the ranking meaningless.
    let mut by_store: BTreeMap<&str, AggregatedPeriod> = BTreeMap::new();
    for record in ctx.records {
        by_store
            .entry(record.store_name.as_str())
            .or_default()
            .add(record);
    }

    let mut performances: Vec<StorePerformance> = by_store
        .into_iter()
        .map(|(name, totals)| StorePerformance {
            name: name.to_string(),
            sales: totals.sales,
            profit: totals.profit,
            profit_margin: totals.profit_margin(),
            efficiency: totals.sales_per_record(),
        })
        .collect();
    performances.sort_by(|a, b| b.sales.total_cmp(&a.sales));

    let mut recommendations = Vec::new();
    if performances.len() > 1 {
        let top = &performances[0];
        let bottom = &performances[performances.len() - 1];
        if top.profit_margin - bottom.profit_margin > MARGIN_GAP_THRESHOLD {
            recommendations.push(format!("{}の利益率改善が急務です", bottom.name));
        }
    }

    let narrative = match performances.first() {
        Some(top) => format!(
            "🏆 **店舗別パフォーマンス分析**\n\n売上トップ: {}（{}）\n利益率: {}\n\n全{}店舗の詳細は下のグラフをご覧ください。",
            top.name,
            ctx.currency(top.sales),
            ctx.percent(top.profit_margin),
            performances.len(),
        ),
        None => "🏆 **店舗別パフォーマンス分析**\n\n比較対象の店舗がありません。".to_string(),
    };

    AnalystResponse {
        narrative,
        visual: Some(VisualPayload::Comparison {
            chart_type: ChartKind::Bar,
            series: performances,
            title: "店舗別売上・利益比較".to_string(),
            recommendations,
        }),
        suggestions: vec![
            "トップ店舗の成功要因".to_string(),
            "改善が必要な店舗の対策".to_string(),
            "全店舗共通の課題".to_string(),
        ],
    }
}
