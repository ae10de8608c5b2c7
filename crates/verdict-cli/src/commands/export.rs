//! Export command implementation.

use crate::cli::ExportArgs;
use crate::error::Result;
use crate::output::Formatter;
use verdict_store::SqliteStore;

/// Execute the export command.
pub fn execute_export(args: ExportArgs, store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    let count = store.export_results_csv(&args.output)?;
    println!(
        "{}",
        formatter.success(&format!("Exported {} result(s) to {}", count, args.output.display()))
    );
    Ok(())
}
