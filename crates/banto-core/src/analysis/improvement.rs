//! Canned improvement program sized against current-month figures

use super::payload::{Improvement, VisualPayload};
use super::{AnalysisContext, AnalystResponse};

pub(super) fn run(ctx: &AnalysisContext<'_>) -> AnalystResponse {
    let totals = ctx.current_month_totals();

    let improvements = vec![
        Improvement {
            category: "仕入最適化".to_string(),
            impact: "コスト5-8%削減".to_string(),
            timeframe: "2-3ヶ月".to_string(),
            actions: vec![
                "仕入先の見直し".to_string(),
                "ボリューム割引交渉".to_string(),
                "季節メニュー導入".to_string(),
            ],
            expected_savings: totals.expenses * 0.07,
        },
        Improvement {
            category: "デジタル化推進".to_string(),
            impact: "効率性15%向上".to_string(),
            timeframe: "1-2ヶ月".to_string(),
            actions: vec![
                "POSシステム導入".to_string(),
                "モバイルオーダー".to_string(),
                "キャッシュレス決済".to_string(),
            ],
            expected_savings: totals.sales * 0.03,
        },
        Improvement {
            category: "メニュー戦略".to_string(),
            impact: "客単価10%向上".to_string(),
            timeframe: "1ヶ月".to_string(),
            actions: vec![
                "高利益率メニュー推進".to_string(),
                "セット商品開発".to_string(),
                "アップセル研修".to_string(),
            ],
            expected_savings: totals.sales * 0.10,
        },
    ];

    let total_savings: f64 = improvements.iter().map(|i| i.expected_savings).sum();
    let current_margin = totals.profit_margin();
    let projected_profit = totals.profit + total_savings;
    let projected_margin = if totals.sales > 0.0 {
        projected_profit / totals.sales * 100.0
    } else {
        0.0
    };

    let narrative = format!(
        "💡 **経営改善提案**\n\n3つの施策で合計 {} の利益改善が見込めます。\n\n現在利益率: {} → 改善後: {}\n\n各施策の詳細は下のカードをご覧ください。",
        ctx.currency(total_savings),
        ctx.percent(current_margin),
        ctx.percent(projected_margin),
    );

    AnalystResponse {
        narrative,
        visual: Some(VisualPayload::Recommendations {
            improvements,
            current_profit: totals.profit,
            projected_profit,
            current_margin,
            projected_margin,
        }),
        suggestions: vec![
            "実装ロードマップ作成".to_string(),
            "優先度別の実行計画".to_string(),
            "ROI分析".to_string(),
        ],
    }
}
