//! Import command implementation.

use crate::cli::ImportArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use verdict_store::SqliteStore;

/// Execute the import command.
pub fn execute_import(args: ImportArgs, store: &mut SqliteStore, formatter: &Formatter) -> Result<()> {
    if args.examples.is_none() && args.assignments.is_none() {
        return Err(CliError::InvalidInput(
            "Nothing to import. Pass --examples and/or --assignments".to_string(),
        ));
    }

    if let Some(path) = args.examples {
        let count = store.import_examples_csv(&path)?;
        println!("{}", formatter.bulk_result("Imported", count, "example"));
    }

    if let Some(path) = args.assignments {
        let count = store.import_assignments_csv(&path)?;
        println!("{}", formatter.bulk_result("Imported", count, "assignment"));
    }

    Ok(())
}
