//! System status command.

use anyhow::Result;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table, presets};
use console::style;

use tutorhub_types::config::AppConfig;

use crate::state::AppState;

/// Display the version, storage location and per-table row counts.
pub async fn status(state: &AppState, config: &AppConfig, json: bool) -> Result<()> {
    let counts = state.db_pool.table_counts().await?;
    let db_path = state.data_dir.join(&config.database.filename);

    if json {
        let tables: serde_json::Map<String, serde_json::Value> = counts
            .iter()
            .map(|(table, count)| (table.to_string(), serde_json::Value::from(*count)))
            .collect();
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "database": db_path.display().to_string(),
            "tables": tables,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} TutorHub v{}",
        style("⚡").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("  Data dir: {}", style(state.data_dir.display()).dim());
    println!("  Database: {}", style(db_path.display()).dim());
    println!();
    println!("{}", counts_table(&counts));
    println!();

    Ok(())
}

fn counts_table(counts: &[(&str, i64)]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Table").fg(Color::White),
        Cell::new("Rows").fg(Color::White),
    ]);

    for (name, count) in counts {
        let color = if *count == 0 { Color::DarkGrey } else { Color::Cyan };
        table.add_row(vec![
            Cell::new(name).fg(Color::White),
            Cell::new(count).fg(color).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_table_lists_every_table() {
        let table = counts_table(&[("cities", 3), ("bookings", 0)]);
        let rendered = table.to_string();
        assert!(rendered.contains("cities"));
        assert!(rendered.contains("bookings"));
        assert!(rendered.contains('3'));
    }
}
