//! Analysis query command

use anyhow::Result;
use chrono::Utc;
use banto_core::{Analyst, Database, RecordQuery, StoreFilter};

pub fn cmd_ask(db: &Database, query: &str, store: Option<&str>) -> Result<()> {
    let records = db.list_daily_records(&RecordQuery::default())?;
    let stores = db.list_stores()?;

    let filter = match store {
        Some(id) => StoreFilter::Store(id.to_string()),
        None => StoreFilter::All,
    };

    let analyst = Analyst::new(stores);
    let response = analyst.analyze(query, &records, &filter, Utc::now().date_naive());

    println!();
    println!("{}", response.narrative);

    if let Some(visual) = &response.visual {
        println!();
        println!("── グラフデータ ({}) ──", visual.kind());
        println!("{}", serde_json::to_string_pretty(visual)?);
    }

    if !response.suggestions.is_empty() {
        println!();
        println!("次の質問の候補:");
        for suggestion in &response.suggestions {
            println!("  ・{}", suggestion);
        }
    }

    println!();
    Ok(())
}
