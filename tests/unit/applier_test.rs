//! Unit tests for single-operation application.

use linkcatalog::engine::Applier;
use linkcatalog::types::catalog::{Catalog, Category, Link, ProtectionMode, TreeNode};
use linkcatalog::types::import::{
    FailureReason, Identifier, ImportOperation, OperationKind, OperationPayload, OperationStatus,
    SkipReason, TargetKind,
};

fn seeded() -> Catalog {
    let mut work = TreeNode::category(Category::new("Work"));
    work.children
        .push(TreeNode::link(Link::new("Site", "http://x", "Work")));
    work.children.push(TreeNode::category(Category::new("Tools")));
    Catalog::new(vec![work])
}

fn payload() -> OperationPayload {
    OperationPayload::default()
}

#[test]
fn test_add_category_with_name_uses_path_as_parent() {
    let mut catalog = seeded();
    let op = ImportOperation::new(
        OperationKind::Add,
        TargetKind::Category,
        Identifier::path("Work/Tools"),
    )
    .with_payload(OperationPayload {
        name: Some("Rust".to_string()),
        description: Some("crates".to_string()),
        protection: Some(ProtectionMode::HideContents),
        ..payload()
    });

    let applied = Applier::default().apply(&mut catalog, &op);
    assert!(applied.outcome.status.is_succeeded(), "{}", applied.outcome.message);
    assert_eq!(applied.outcome.message, "added category 'Work/Tools/Rust'");

    let rust = catalog.category_at("Work/Tools/Rust").unwrap();
    let category = rust.as_category().unwrap();
    assert_eq!(category.description, "crates");
    assert_eq!(category.protection, Some(ProtectionMode::HideContents));
}

#[test]
fn test_add_root_category_by_name() {
    let mut catalog = seeded();
    let op = ImportOperation::new(OperationKind::Add, TargetKind::Category, Identifier::name("Home"));
    let applied = Applier::default().apply(&mut catalog, &op);
    assert!(applied.outcome.status.is_succeeded());
    assert_eq!(applied.touched_roots, vec!["Home".to_string()]);
    assert_eq!(catalog.roots.len(), 2);
    assert_eq!(catalog.roots[1].label(), "Home");
}

#[test]
fn test_add_link_appends_as_last_child_with_category_path() {
    let mut catalog = seeded();
    let op = ImportOperation::new(OperationKind::Add, TargetKind::Link, Identifier::path("/Work/"))
        .with_payload(OperationPayload {
            title: Some("Blog".to_string()),
            url: Some("http://blog".to_string()),
            is_directory: Some(true),
            ..payload()
        });
    let applied = Applier::default().apply(&mut catalog, &op);
    assert!(applied.outcome.status.is_succeeded());

    let last = catalog.roots[0].children.last().unwrap().as_link().unwrap();
    assert_eq!(last.title, "Blog");
    assert_eq!(last.category_path, "Work");
    assert!(last.is_directory);
}

#[test]
fn test_add_link_without_url_fails_and_leaves_tree() {
    let mut catalog = seeded();
    let before = catalog.clone();
    let op = ImportOperation::new(
        OperationKind::Add,
        TargetKind::Link,
        Identifier::path("Work").with_title("Blog"),
    );
    let applied = Applier::default().apply(&mut catalog, &op);
    assert!(matches!(
        applied.outcome.status,
        OperationStatus::Failed(FailureReason::InvalidPayload(_))
    ));
    assert!(applied.touched_roots.is_empty());
    assert_eq!(catalog, before);
}

#[test]
fn test_add_link_without_path_has_no_parent() {
    let mut catalog = seeded();
    let op = ImportOperation::new(OperationKind::Add, TargetKind::Link, Identifier::title("Blog"))
        .with_payload(OperationPayload {
            url: Some("http://blog".to_string()),
            ..payload()
        });
    let applied = Applier::default().apply(&mut catalog, &op);
    assert!(matches!(
        applied.outcome.status,
        OperationStatus::Failed(FailureReason::ParentNotFound(_))
    ));
}

#[test]
fn test_duplicate_add_is_skipped_with_message() {
    let mut catalog = seeded();
    let op = ImportOperation::new(
        OperationKind::Add,
        TargetKind::Category,
        Identifier::path("work/tools"),
    );
    // parent lookup is case-sensitive, so "work" is missing
    let applied = Applier::default().apply(&mut catalog, &op);
    assert!(applied.outcome.status.is_failed());

    let op = ImportOperation::new(
        OperationKind::Add,
        TargetKind::Category,
        Identifier::path("Work/TOOLS"),
    );
    let applied = Applier::default().apply(&mut catalog, &op);
    assert_eq!(
        applied.outcome.status,
        OperationStatus::Skipped(SkipReason::Duplicate("category 'Work/TOOLS'".to_string()))
    );
    assert!(applied.outcome.message.starts_with("duplicate; not re-added"));
}

#[test]
fn test_update_without_payload_fails() {
    let mut catalog = seeded();
    let op = ImportOperation::new(OperationKind::Update, TargetKind::Category, Identifier::path("Work"));
    let applied = Applier::default().apply(&mut catalog, &op);
    assert!(matches!(
        applied.outcome.status,
        OperationStatus::Failed(FailureReason::InvalidPayload(_))
    ));
}

#[test]
fn test_update_category_rename_conflict() {
    let mut catalog = seeded();
    catalog.roots.push(TreeNode::category(Category::new("Home")));
    let before = catalog.clone();
    let op = ImportOperation::new(OperationKind::Update, TargetKind::Category, Identifier::path("Home"))
        .with_payload(OperationPayload {
            name: Some("work".to_string()),
            ..payload()
        });
    let applied = Applier::default().apply(&mut catalog, &op);
    assert_eq!(
        applied.outcome.status,
        OperationStatus::Failed(FailureReason::NameConflict("work".to_string()))
    );
    assert_eq!(catalog, before);
}

#[test]
fn test_update_link_fields() {
    let mut catalog = seeded();
    let op = ImportOperation::new(OperationKind::Update, TargetKind::Link, Identifier::title("Site"))
        .with_payload(OperationPayload {
            url: Some("https://x.org".to_string()),
            is_directory: Some(true),
            ..payload()
        });
    let applied = Applier::default().apply(&mut catalog, &op);
    assert!(applied.outcome.status.is_succeeded());
    assert_eq!(applied.touched_roots, vec!["Work".to_string()]);

    let link = catalog.roots[0].children[0].as_link().unwrap();
    assert_eq!(link.url, "https://x.org");
    assert!(link.is_directory);
    assert_eq!(link.title, "Site");
}

#[test]
fn test_update_link_with_category_field_is_invalid() {
    let mut catalog = seeded();
    let op = ImportOperation::new(OperationKind::Update, TargetKind::Link, Identifier::title("Site"))
        .with_payload(OperationPayload {
            name: Some("x".to_string()),
            ..payload()
        });
    let applied = Applier::default().apply(&mut catalog, &op);
    assert!(applied.outcome.message.contains("does not apply to a link"));
}

#[test]
fn test_delete_link_and_missing_link() {
    let mut catalog = seeded();
    let delete = ImportOperation::new(
        OperationKind::Delete,
        TargetKind::Link,
        Identifier::path("Work").with_title("Site"),
    );
    let applied = Applier::default().apply(&mut catalog, &delete);
    assert!(applied.outcome.status.is_succeeded());
    assert_eq!(catalog.roots[0].children.len(), 1);

    let applied = Applier::default().apply(&mut catalog, &delete);
    assert!(matches!(
        applied.outcome.status,
        OperationStatus::Skipped(SkipReason::AlreadyAbsent(_))
    ));
    assert!(applied.touched_roots.is_empty());
}

#[test]
fn test_delete_with_empty_identifier_fails() {
    let mut catalog = seeded();
    let op = ImportOperation::new(OperationKind::Delete, TargetKind::Category, Identifier::default());
    let applied = Applier::default().apply(&mut catalog, &op);
    assert!(applied.outcome.status.is_failed());
    assert_eq!(catalog.roots.len(), 1);
}

#[test]
fn test_outcome_keeps_original_identifier() {
    let mut catalog = seeded();
    let id = Identifier::path("Work").with_name("ignored");
    let op = ImportOperation::new(OperationKind::Delete, TargetKind::Category, id.clone());
    let applied = Applier::default().apply(&mut catalog, &op);
    assert_eq!(applied.outcome.identifier, id);
    assert_eq!(applied.outcome.operation, OperationKind::Delete);
    assert_eq!(applied.outcome.target, TargetKind::Category);
    assert!(catalog.is_empty());
}

#[test]
fn test_blank_category_name_in_payload_is_invalid() {
    let mut catalog = seeded();
    let before = catalog.clone();

    let rename = ImportOperation::new(OperationKind::Update, TargetKind::Category, Identifier::path("Work"))
        .with_payload(OperationPayload {
            name: Some(String::new()),
            ..payload()
        });
    let applied = Applier::default().apply(&mut catalog, &rename);
    assert!(matches!(
        applied.outcome.status,
        OperationStatus::Failed(FailureReason::InvalidPayload(_))
    ));

    let add = ImportOperation::new(OperationKind::Add, TargetKind::Category, Identifier::path("Home"))
        .with_payload(OperationPayload {
            name: Some("   ".to_string()),
            ..payload()
        });
    let applied = Applier::default().apply(&mut catalog, &add);
    assert!(matches!(
        applied.outcome.status,
        OperationStatus::Failed(FailureReason::InvalidPayload(_))
    ));
    assert!(applied.touched_roots.is_empty());
    assert_eq!(catalog, before);
}

#[test]
fn test_blank_link_title_in_payload_is_invalid() {
    let mut catalog = seeded();
    let op = ImportOperation::new(
        OperationKind::Add,
        TargetKind::Link,
        Identifier::path("Work").with_title("Blog"),
    )
    .with_payload(OperationPayload {
        title: Some("  ".to_string()),
        url: Some("http://blog".to_string()),
        ..payload()
    });
    let applied = Applier::default().apply(&mut catalog, &op);
    assert!(matches!(
        applied.outcome.status,
        OperationStatus::Failed(FailureReason::InvalidPayload(_))
    ));
    assert_eq!(catalog.roots[0].children.len(), 2);
}

#[test]
fn test_rename_trims_payload_name() {
    let mut catalog = seeded();
    let op = ImportOperation::new(OperationKind::Update, TargetKind::Category, Identifier::path("Work/Tools"))
        .with_payload(OperationPayload {
            name: Some("  Gear ".to_string()),
            ..payload()
        });
    let applied = Applier::default().apply(&mut catalog, &op);
    assert!(applied.outcome.status.is_succeeded());
    assert!(catalog.category_at("Work/Gear").is_some());
}
