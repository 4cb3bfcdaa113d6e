use forkline::graph_labels::{BranchLabel, BranchLabelKind, MAX_BRANCH_LABELS, derive_branch_labels};

fn refs(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

fn label(name: &str, kind: BranchLabelKind, in_sync: bool) -> BranchLabel {
    BranchLabel {
        name: name.to_string(),
        kind,
        is_in_sync_with_origin: in_sync,
    }
}

#[test]
fn head_branch_folds_matching_origin_and_drops_tags() {
    let labels = derive_branch_labels(&refs(&["HEAD -> main", "origin/main", "v1.0"]));
    assert_eq!(labels, vec![label("main", BranchLabelKind::Head, true)]);
}

#[test]
fn head_branch_with_other_remote_keeps_both_remote_labels() {
    let labels = derive_branch_labels(&refs(&["HEAD -> feature", "origin/main", "origin/HEAD"]));
    assert_eq!(
        labels,
        vec![
            label("feature", BranchLabelKind::Head, false),
            label("origin/main", BranchLabelKind::Remote, false),
            label("origin/HEAD", BranchLabelKind::Remote, false),
        ]
    );
}

#[test]
fn origin_head_survives_when_head_branch_is_in_sync() {
    let labels = derive_branch_labels(&refs(&[
        "HEAD -> feature",
        "origin/feature",
        "origin/HEAD",
    ]));
    assert_eq!(
        labels,
        vec![
            label("feature", BranchLabelKind::Head, true),
            label("origin/HEAD", BranchLabelKind::Remote, false),
        ]
    );
}

#[test]
fn head_label_comes_first_regardless_of_ref_order() {
    let labels = derive_branch_labels(&refs(&["origin/dev", "topic", "HEAD -> dev"]));
    assert_eq!(labels[0], label("dev", BranchLabelKind::Head, true));
    assert_eq!(labels[1], label("topic", BranchLabelKind::Local, false));
    assert_eq!(labels.len(), 2, "origin/dev should be folded into the head label");
}

#[test]
fn labels_are_capped_in_priority_order() {
    let labels = derive_branch_labels(&refs(&[
        "origin/HEAD",
        "origin/dev",
        "HEAD -> main",
        "dev",
        "topic",
    ]));
    assert_eq!(labels.len(), MAX_BRANCH_LABELS);
    let names = labels.iter().map(|label| label.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["main", "dev", "topic"]);
}

#[test]
fn local_branches_precede_remote_branches_without_head() {
    let labels = derive_branch_labels(&refs(&["origin/main", "main"]));
    assert_eq!(
        labels,
        vec![
            label("main", BranchLabelKind::Local, false),
            label("origin/main", BranchLabelKind::Remote, false),
        ]
    );
}

#[test]
fn detached_head_and_tags_produce_no_labels() {
    assert!(derive_branch_labels(&refs(&["HEAD", "tag: v2.0", "refs/tags/nightly"])).is_empty());
    assert!(derive_branch_labels(&[]).is_empty());
}

#[test]
fn version_prefixed_branch_names_keep_their_chip() {
    let labels = derive_branch_labels(&refs(&["HEAD -> main", "v2-hotfix", "tag: v2.0"]));
    assert_eq!(
        labels,
        vec![
            label("main", BranchLabelKind::Head, false),
            label("v2-hotfix", BranchLabelKind::Local, false),
        ]
    );
}
