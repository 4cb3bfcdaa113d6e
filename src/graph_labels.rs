pub const MAX_BRANCH_LABELS: usize = 3;

const REMOTE_PREFIX: &str = "origin/";
const REMOTE_HEAD: &str = "origin/HEAD";
const HEAD_POINTER_PREFIX: &str = "HEAD -> ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind<'a> {
    HeadBranch(&'a str),
    DetachedHead,
    LocalBranch(&'a str),
    RemoteBranch(&'a str),
    RemoteHead,
    Tag(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchLabelKind {
    Head,
    Local,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchLabel {
    pub name: String,
    pub kind: BranchLabelKind,
    pub is_in_sync_with_origin: bool,
}

impl BranchLabel {
    fn new(name: &str, kind: BranchLabelKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            is_in_sync_with_origin: false,
        }
    }

    pub fn is_head(&self) -> bool {
        self.kind == BranchLabelKind::Head
    }
}

pub fn classify_ref(raw: &str) -> RefKind<'_> {
    let name = raw.trim();
    if let Some(branch) = name.strip_prefix(HEAD_POINTER_PREFIX) {
        return RefKind::HeadBranch(branch.trim());
    }
    if name == "HEAD" {
        return RefKind::DetachedHead;
    }
    if let Some(tag) = name
        .strip_prefix("tag: ")
        .or_else(|| name.strip_prefix("refs/tags/"))
    {
        return RefKind::Tag(tag.trim());
    }
    if name == REMOTE_HEAD {
        return RefKind::RemoteHead;
    }
    if name.starts_with(REMOTE_PREFIX) {
        return RefKind::RemoteBranch(name);
    }
    if looks_like_version_tag(name) {
        return RefKind::Tag(name);
    }
    RefKind::LocalBranch(name)
}

fn looks_like_version_tag(name: &str) -> bool {
    let digits = name
        .strip_prefix('v')
        .or_else(|| name.strip_prefix('V'))
        .unwrap_or(name);
    digits.starts_with(|ch: char| ch.is_ascii_digit())
        && digits.chars().all(|ch| ch.is_ascii_digit() || ch == '.')
}

/// Derives up to three branch chips for a commit's ref decorations.
///
/// Order: the checked-out branch (flagged in sync when `origin/<branch>` sits
/// on the same commit, which then gets no chip of its own), other local
/// branches, remote-tracking branches, then `origin/HEAD`. Tags never get a
/// chip.
pub fn derive_branch_labels(refs: &[String]) -> Vec<BranchLabel> {
    let kinds = refs
        .iter()
        .map(|name| classify_ref(name))
        .collect::<Vec<_>>();

    let head_branch = kinds.iter().find_map(|kind| match kind {
        RefKind::HeadBranch(branch) if !branch.is_empty() => Some(*branch),
        _ => None,
    });
    let folded_remote = head_branch.map(|branch| format!("{REMOTE_PREFIX}{branch}"));
    let head_in_sync = folded_remote.as_deref().is_some_and(|remote| {
        kinds
            .iter()
            .any(|kind| matches!(kind, RefKind::RemoteBranch(name) if *name == remote))
    });

    let mut labels: Vec<BranchLabel> = Vec::new();
    let mut push = |label: BranchLabel| {
        if !labels.iter().any(|existing| existing.name == label.name) {
            labels.push(label);
        }
    };

    if let Some(branch) = head_branch {
        let mut label = BranchLabel::new(branch, BranchLabelKind::Head);
        label.is_in_sync_with_origin = head_in_sync;
        push(label);
    }

    for kind in &kinds {
        if let RefKind::LocalBranch(name) = kind {
            push(BranchLabel::new(name, BranchLabelKind::Local));
        }
    }

    for kind in &kinds {
        if let RefKind::RemoteBranch(name) = kind {
            let folded = head_in_sync && folded_remote.as_deref() == Some(*name);
            if !folded {
                push(BranchLabel::new(name, BranchLabelKind::Remote));
            }
        }
    }

    if kinds.iter().any(|kind| *kind == RefKind::RemoteHead) {
        push(BranchLabel::new(REMOTE_HEAD, BranchLabelKind::Remote));
    }

    labels.truncate(MAX_BRANCH_LABELS);
    labels
}
