//! Results command implementation.

use crate::cli::ResultsArgs;
use crate::error::Result;
use crate::output::Formatter;
use verdict_domain::{AnswerRecord, SurveyStore};
use verdict_store::SqliteStore;

/// Execute the results command.
pub fn execute_results(args: ResultsArgs, store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    let results = filter_results(store.load_results()?, args.user.as_deref(), args.limit);
    println!("{}", formatter.format_results(&results)?);
    Ok(())
}

/// Keep results for one user (if given), up to `limit` rows in append order.
fn filter_results(results: Vec<AnswerRecord>, user: Option<&str>, limit: Option<usize>) -> Vec<AnswerRecord> {
    results
        .into_iter()
        .filter(|r| user.map_or(true, |u| r.user_id == u))
        .take(limit.unwrap_or(usize::MAX))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdict_domain::{Decision, ExampleId};

    fn result(user: &str, id: i64) -> AnswerRecord {
        AnswerRecord {
            user_id: user.to_string(),
            example_id: ExampleId::new(id),
            claim: format!("C{}", id),
            decision: Decision::Support,
            timestamp: id as u64,
        }
    }

    #[test]
    fn test_filter_by_user_and_limit() {
        let all = vec![result("a", 1), result("b", 2), result("a", 3), result("a", 4)];

        let only_a = filter_results(all.clone(), Some("a"), None);
        assert_eq!(only_a.len(), 3);

        let limited = filter_results(all.clone(), Some("a"), Some(2));
        assert_eq!(
            limited.iter().map(|r| r.example_id.value()).collect::<Vec<_>>(),
            vec![1, 3]
        );

        assert_eq!(filter_results(all, None, None).len(), 4);
    }
}
