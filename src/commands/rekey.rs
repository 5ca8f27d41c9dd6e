use std::path::Path;

use anyhow::{Context, Result};
use leadgate_core::{Database, DatabaseOptions, RekeyReport, Store};

/// Runs a rekey pass and prints its report. Returns the report for exit-code decisions.
pub async fn run_rekey(
    database_path: &Path,
    options: &DatabaseOptions,
    dry_run: bool,
) -> Result<RekeyReport> {
    let db = Database::new(database_path, options)
        .await
        .with_context(|| format!("Failed to open database '{}'", database_path.display()))?;
    let store = Store::new(db.clone());

    let report = store
        .rekey_resources(dry_run)
        .await
        .context("Rekey pass failed; no rows were changed")?;
    db.close().await;

    print_report(&report);
    Ok(report)
}

fn print_report(report: &RekeyReport) {
    let verb = if report.dry_run { "would rekey" } else { "rekeyed" };
    for row in &report.rekeyed {
        println!("{verb} #{}: {} -> {}", row.id, row.old_key, row.new_key);
    }
    for conflict in &report.conflicts {
        println!(
            "conflict #{}: {} -> {} already used by #{}",
            conflict.id, conflict.old_key, conflict.new_key, conflict.holder_id
        );
    }
    for (id, key) in &report.unresolvable {
        println!("unresolvable #{id}: {key}");
    }
    println!(
        "{} {verb}, {} already canonical, {} conflicts, {} unresolvable",
        report.rekeyed.len(),
        report.already_canonical,
        report.conflicts.len(),
        report.unresolvable.len()
    );
}
