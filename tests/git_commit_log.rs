use std::fs;
use std::path::Path;
use std::process::Command;

use forkline::git::{CommitLogProvider, GitCli, LogOptions};
use forkline::graph_labels::derive_branch_labels;
use forkline::graph_tree::build_graph_layout;

#[test]
fn git_log_loads_merge_history_child_first() {
    let fixture = tempfile::tempdir().expect("temp repo directory should be created");
    let repo = fixture.path();
    init_repo(repo);

    commit_file(repo, "tracked.txt", "one\n", "initial");
    commit_file(repo, "tracked.txt", "one\ntwo\n", "second");
    run_git(repo, &["checkout", "-q", "-b", "feature"]);
    commit_file(repo, "feature.txt", "feature\n", "feature work");
    run_git(repo, &["checkout", "-q", "main"]);
    commit_file(repo, "main.txt", "main\n", "main work");
    run_git(repo, &["merge", "-q", "--no-ff", "feature", "-m", "merge feature"]);
    run_git(repo, &["tag", "v1.0"]);

    let git = GitCli::discover(repo).expect("repository should be discovered");
    let commits = git
        .load_commits(&LogOptions::default())
        .expect("commit log should load");

    assert_eq!(commits.len(), 5);
    let merge = &commits[0];
    assert_eq!(merge.subject, "merge feature");
    assert_eq!(merge.parents.len(), 2);
    assert!(merge.short_hash.len() >= 7);
    assert!(merge.hash.starts_with(&merge.short_hash));
    assert!(merge.refs.iter().any(|name| name == "HEAD -> main"));
    assert!(merge.refs.iter().any(|name| name == "tag: v1.0"));
    assert_eq!(merge.author, "Forkline Test");

    let labels = derive_branch_labels(&merge.refs);
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].name, "main");
    assert!(!labels[0].is_in_sync_with_origin);

    let layout = build_graph_layout(&commits);
    assert_eq!(layout.lane_count, 2);
    assert_eq!(layout.nodes[0].column, 0);
    assert_eq!(layout.nodes[4].column, 0);
    assert_eq!(layout.nodes[4].commit.subject, "initial");
    for (row, node) in layout.nodes.iter().enumerate() {
        for lane in &node.child_columns {
            let parent_row = layout
                .row_of(&lane.hash)
                .expect("every parent should be inside the window");
            assert!(parent_row > row, "git log should list children before parents");
        }
    }
}

#[test]
fn git_log_limit_and_author_filter_apply() {
    let fixture = tempfile::tempdir().expect("temp repo directory should be created");
    let repo = fixture.path();
    init_repo(repo);
    for ix in 0..4 {
        commit_file(repo, "tracked.txt", &format!("{ix}\n"), &format!("change {ix}"));
    }

    let git = GitCli::new(repo);
    let limited = git
        .load_commits(&LogOptions {
            limit: 2,
            ..LogOptions::default()
        })
        .expect("limited log should load");
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0].subject, "change 3");

    let layout = build_graph_layout(&limited);
    assert_eq!(
        layout.nodes[1].pending_lanes,
        vec![0],
        "the truncated parent lane should stay open"
    );

    let nobody = git
        .load_commits(&LogOptions {
            author: Some("nobody-matches-this".to_string()),
            ..LogOptions::default()
        })
        .expect("filtered log should load");
    assert!(nobody.is_empty());
}

#[test]
fn git_log_on_unborn_repository_is_empty() {
    let fixture = tempfile::tempdir().expect("temp repo directory should be created");
    init_repo(fixture.path());

    let commits = GitCli::new(fixture.path())
        .load_commits(&LogOptions::default())
        .expect("empty repository should not be an error");
    assert!(commits.is_empty());
}

#[test]
fn orphan_branch_is_empty_when_only_head_is_walked() {
    let fixture = tempfile::tempdir().expect("temp repo directory should be created");
    let repo = fixture.path();
    init_repo(repo);
    commit_file(repo, "tracked.txt", "one\n", "initial");
    run_git(repo, &["checkout", "-q", "--orphan", "fresh"]);

    let git = GitCli::discover(repo).expect("repository should be discovered");
    let head_only = git
        .load_commits(&LogOptions {
            all_refs: false,
            ..LogOptions::default()
        })
        .expect("unborn HEAD should not be an error");
    assert!(head_only.is_empty());

    let all_refs = git
        .load_commits(&LogOptions::default())
        .expect("other branches should still load");
    assert_eq!(all_refs.len(), 1);
    assert_eq!(all_refs[0].subject, "initial");
    assert_eq!(all_refs[0].refs, vec!["main".to_string()]);
}

#[test]
fn discover_resolves_worktree_root_from_subdirectory() {
    let fixture = tempfile::tempdir().expect("temp repo directory should be created");
    let repo = fixture.path();
    init_repo(repo);
    let nested = repo.join("src").join("deep");
    fs::create_dir_all(&nested).expect("nested directory should be created");

    let git = GitCli::discover(&nested).expect("repository should be discovered");
    let expected = repo.canonicalize().expect("repo path should resolve");
    let found = git.repo_root().canonicalize().expect("root path should resolve");
    assert_eq!(found, expected);
}

fn init_repo(path: &Path) {
    run_git(path, &["init", "-q"]);
    run_git(path, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    run_git(path, &["config", "user.email", "forkline@test.local"]);
    run_git(path, &["config", "user.name", "Forkline Test"]);
    run_git(path, &["config", "commit.gpgsign", "false"]);
    run_git(path, &["config", "tag.gpgsign", "false"]);
}

fn commit_file(repo: &Path, name: &str, contents: &str, message: &str) {
    fs::write(repo.join(name), contents).expect("file should be written");
    run_git(repo, &["add", "."]);
    run_git(repo, &["commit", "-q", "-m", message]);
}

fn run_git(cwd: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .status()
        .expect("git command should run");
    assert!(status.success(), "git {args:?} failed");
}
