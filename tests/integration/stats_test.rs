//! Statistics Integration Tests

use pretty_assertions::assert_eq;

use docs_index::models::settings::IndexSettings;
use docs_index::services::docs_index::pipeline::run_pipeline;
use docs_index::services::docs_index::stats::{compute_stats, render_stats};

use crate::common::{taxonomy_tree, today};

#[test]
fn test_taxonomy_stats() {
    let dir = taxonomy_tree();
    let build = run_pipeline(dir.path(), &IndexSettings::default(), today()).unwrap();
    let stats = compute_stats(&build.documents);

    assert_eq!(stats.total_documents, 6);
    assert_eq!(stats.total_skills, 4);
    assert_eq!(stats.code_examples, 1);
    assert_eq!(stats.with_overview, 0);
    assert_eq!(stats.with_best_practices, 0);
    assert_eq!(stats.with_code_examples, 1);
    assert_eq!(stats.with_checklist, 0);

    let rows: Vec<(&str, usize)> = stats
        .categories
        .iter()
        .map(|c| (c.display_name.as_str(), c.documents))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("Foundations", 1),
            ("Messaging Queue", 1),
            ("Developer Experience", 2),
            ("Root", 1),
            ("Misc", 1),
        ]
    );

    let report = render_stats(&stats, today());
    assert!(report.contains("- **Total Skills**: 4"));
    assert!(report.contains("| Developer Experience | 2 | 1 |"));
    assert!(report.contains("- **With Code Examples**: 1/4"));
}
