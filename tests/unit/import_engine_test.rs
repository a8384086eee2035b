//! Unit tests for the import engine: batch runs end to end against an
//! in-memory catalog.

use linkcatalog::engine::{ImportEngine, Resolver};
use linkcatalog::types::catalog::{Catalog, Category, Link, TreeNode};
use linkcatalog::types::import::{
    FailureReason, Identifier, ImportBatch, ImportOperation, OperationKind, OperationPayload,
    OperationStatus, SkipReason, TargetKind,
};

fn op(kind: OperationKind, target: TargetKind, identifier: Identifier) -> ImportOperation {
    ImportOperation::new(kind, target, identifier)
}

fn add_category(path: &str) -> ImportOperation {
    op(OperationKind::Add, TargetKind::Category, Identifier::path(path))
}

fn add_link(path: &str, title: &str, url: &str) -> ImportOperation {
    op(OperationKind::Add, TargetKind::Link, Identifier::path(path).with_title(title)).with_payload(
        OperationPayload {
            url: Some(url.to_string()),
            ..OperationPayload::default()
        },
    )
}

fn delete_category(path: &str) -> ImportOperation {
    op(OperationKind::Delete, TargetKind::Category, Identifier::path(path))
}

fn run(catalog: &mut Catalog, ops: Vec<ImportOperation>) -> linkcatalog::types::import::ImportResult {
    ImportEngine::default().run(catalog, ImportBatch::new(ops))
}

/// Add a category, add a link into it, delete the category.
#[test]
fn test_add_link_then_delete_category_scenario() {
    let mut catalog = Catalog::default();
    let result = run(
        &mut catalog,
        vec![
            add_category("Work"),
            add_link("Work", "Site", "http://x"),
            delete_category("Work"),
        ],
    );

    assert_eq!(result.total_operations, 3);
    assert_eq!(result.successful, 3);
    assert_eq!(result.failed, 0);
    assert_eq!(result.skipped, 0);
    assert!(result.success);
    assert!(catalog.category_at("Work").is_none());
    assert!(catalog.is_empty());
}

/// Updating a category that does not exist fails with "target not found".
#[test]
fn test_update_missing_category_fails() {
    let mut catalog = Catalog::new(vec![TreeNode::category(Category::new("Home"))]);
    let update = op(OperationKind::Update, TargetKind::Category, Identifier::name("Ghost"))
        .with_payload(OperationPayload {
            description: Some("new".to_string()),
            ..OperationPayload::default()
        });
    let result = run(&mut catalog, vec![update]);

    assert_eq!(result.failed, 1);
    assert!(!result.success);
    assert!(result.outcomes[0].message.contains("target not found"));
    assert!(result.categories_modified.is_empty());
}

#[test]
fn test_order_matters_for_nested_adds() {
    let mut catalog = Catalog::default();
    let result = run(
        &mut catalog,
        vec![add_category("X"), add_link("X", "Y", "http://y")],
    );
    assert_eq!(result.successful, 2);

    let mut catalog = Catalog::default();
    let result = run(
        &mut catalog,
        vec![add_link("X", "Y", "http://y"), add_category("X")],
    );
    assert!(matches!(
        result.outcomes[0].status,
        OperationStatus::Failed(FailureReason::ParentNotFound(_))
    ));
    assert!(result.outcomes[1].status.is_succeeded());
    assert_eq!((result.successful, result.failed), (1, 1));
}

#[test]
fn test_failure_does_not_stop_the_batch() {
    let mut catalog = Catalog::default();
    let result = run(
        &mut catalog,
        vec![
            add_link("Nowhere", "A", "http://a"),
            add_category("Work"),
            op(OperationKind::Update, TargetKind::Link, Identifier::title("Missing"))
                .with_payload(OperationPayload::default()),
            add_link("Work", "B", "http://b"),
        ],
    );
    assert_eq!(result.total_operations, 4);
    assert_eq!((result.successful, result.failed, result.skipped), (2, 2, 0));
    assert_eq!(result.failed_outcomes().count(), 2);
    assert_eq!(catalog.category_at("Work").unwrap().children.len(), 1);
}

#[test]
fn test_second_run_of_same_batch_skips() {
    let batch = || {
        vec![
            add_category("Work"),
            add_link("Work", "Site", "http://x"),
            delete_category("Old"),
        ]
    };
    let mut catalog = Catalog::new(vec![TreeNode::category(Category::new("Old"))]);

    let first = run(&mut catalog, batch());
    assert_eq!(first.successful, 3);

    let second = run(&mut catalog, batch());
    assert_eq!(second.successful, 0);
    assert_eq!(second.failed, 0);
    assert_eq!(second.skipped, 3);
    assert!(matches!(
        second.outcomes[0].status,
        OperationStatus::Skipped(SkipReason::Duplicate(_))
    ));
    assert!(matches!(
        second.outcomes[2].status,
        OperationStatus::Skipped(SkipReason::AlreadyAbsent(_))
    ));
    assert!(second.categories_modified.is_empty());
}

#[test]
fn test_duplicate_check_ignores_case() {
    let mut catalog = Catalog::default();
    let result = run(
        &mut catalog,
        vec![
            add_category("Work"),
            add_category("WORK"),
            add_link("Work", "Site", "http://x"),
            add_link("Work", "site", "http://other"),
        ],
    );
    assert_eq!((result.successful, result.skipped), (2, 2));
    assert_eq!(catalog.roots.len(), 1);
}

#[test]
fn test_partial_update_keeps_other_fields() {
    let mut link = Link::new("Site", "http://x", "Work");
    link.created_at = 100;
    link.updated_at = 100;
    let mut work = TreeNode::category(Category::new("Work"));
    work.children.push(TreeNode::link(link));
    let mut catalog = Catalog::new(vec![work]);

    let update = op(
        OperationKind::Update,
        TargetKind::Link,
        Identifier::path("Work").with_title("Site"),
    )
    .with_payload(OperationPayload {
        description: Some("landing page".to_string()),
        ..OperationPayload::default()
    });
    let result = run(&mut catalog, vec![update]);
    assert!(result.success);

    let updated = catalog.roots[0].children[0].as_link().unwrap();
    assert_eq!(updated.description, "landing page");
    assert_eq!(updated.title, "Site");
    assert_eq!(updated.url, "http://x");
    assert_eq!(updated.created_at, 100);
    assert!(updated.updated_at >= 100);
}

#[test]
fn test_categories_modified_only_counts_succeeded_roots() {
    let mut catalog = Catalog::new(vec![
        TreeNode::category(Category::new("Work")),
        TreeNode::category(Category::new("Home")),
    ]);
    let result = run(
        &mut catalog,
        vec![
            add_category("Work/Tools"),
            add_category("Work/Tools/Rust"),
            add_category("Home"),
            add_link("Games", "X", "http://x"),
            delete_category("Home/Nothing"),
        ],
    );
    let modified: Vec<&str> = result.categories_modified.iter().map(String::as_str).collect();
    assert_eq!(modified, vec!["Work"]);
}

#[test]
fn test_delete_category_removes_descendants() {
    let mut catalog = Catalog::default();
    run(
        &mut catalog,
        vec![
            add_category("Work"),
            add_category("Work/Tools"),
            add_link("Work/Tools", "Docs", "https://docs.rs"),
        ],
    );
    let result = run(&mut catalog, vec![delete_category("Work/Tools")]);
    assert!(result.success);
    assert!(result.outcomes[0].message.contains("2 nodes"));

    assert!(Resolver::resolve_category_path(&catalog, "Work/Tools").is_err());
    let lookup = Resolver::default().resolve(
        &catalog,
        TargetKind::Link,
        &Identifier::title("Docs"),
    );
    assert!(lookup.is_err());
    assert!(catalog.category_at("Work").is_some());
}

#[test]
fn test_rename_root_reports_old_and_new_paths() {
    let mut catalog = Catalog::default();
    run(
        &mut catalog,
        vec![add_category("Work"), add_link("Work", "Site", "http://x")],
    );
    let rename = op(OperationKind::Update, TargetKind::Category, Identifier::path("Work"))
        .with_payload(OperationPayload {
            name: Some("Job".to_string()),
            ..OperationPayload::default()
        });
    let result = run(&mut catalog, vec![rename]);

    assert!(result.categories_modified.contains("Work"));
    assert!(result.categories_modified.contains("Job"));
    let link = catalog.category_at("Job").unwrap().children[0].as_link().unwrap();
    assert_eq!(link.category_path, "Job");
}

#[test]
fn test_engine_with_reject_ambiguous_policy() {
    use linkcatalog::types::settings::NameMatchPolicy;

    let mut catalog = Catalog::default();
    let engine = ImportEngine::new(NameMatchPolicy::RejectAmbiguous);
    engine.run(
        &mut catalog,
        ImportBatch::new(vec![
            add_category("A"),
            add_category("A/Misc"),
            add_category("B"),
            add_category("B/Misc"),
        ]),
    );
    let result = engine.run(
        &mut catalog,
        ImportBatch::new(vec![op(
            OperationKind::Delete,
            TargetKind::Category,
            Identifier::name("Misc"),
        )]),
    );
    assert!(matches!(
        result.outcomes[0].status,
        OperationStatus::Failed(FailureReason::AmbiguousTarget { matches: 2, .. })
    ));
    assert!(catalog.category_at("A/Misc").is_some());
    assert!(catalog.category_at("B/Misc").is_some());
}
