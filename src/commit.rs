use anyhow::{Result, anyhow};

pub const SHORT_HASH_LEN: usize = 7;

pub(crate) const FIELD_SEPARATOR: char = '\u{1f}';
pub(crate) const RECORD_SEPARATOR: char = '\u{1e}';
const FIELD_COUNT: usize = 8;

/// A commit as supplied by the log provider, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub hash: String,
    pub short_hash: String,
    pub subject: String,
    pub author: String,
    pub date: String,
    pub relative_date: String,
    /// First parent is the mainline continuation.
    pub parents: Vec<String>,
    /// Ref decorations, used for labels only.
    pub refs: Vec<String>,
}

impl Commit {
    pub fn new(hash: impl Into<String>, parents: &[&str]) -> Self {
        let hash = hash.into();
        Self {
            short_hash: short_hash(&hash),
            hash,
            subject: String::new(),
            author: String::new(),
            date: String::new(),
            relative_date: String::new(),
            parents: parents.iter().map(|parent| (*parent).to_string()).collect(),
            refs: Vec::new(),
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn with_refs(mut self, refs: &[&str]) -> Self {
        self.refs = refs.iter().map(|name| (*name).to_string()).collect();
        self
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn is_head(&self) -> bool {
        self.refs
            .iter()
            .any(|name| name == "HEAD" || name.starts_with("HEAD -> "))
    }
}

pub fn short_hash(hash: &str) -> String {
    hash.chars().take(SHORT_HASH_LEN).collect()
}

/// Parses records emitted with the provider's `--format` string: fields
/// separated by 0x1f, records terminated by 0x1e.
pub fn parse_log_output(raw: &str) -> Result<Vec<Commit>> {
    let mut commits = Vec::new();
    for (record_ix, record) in raw.split(RECORD_SEPARATOR).enumerate() {
        let record = record.trim_start_matches(['\n', '\r']);
        if record.trim().is_empty() {
            continue;
        }
        commits.push(parse_record(record).map_err(|err| {
            anyhow!("malformed git log record #{record_ix}: {err}")
        })?);
    }
    Ok(commits)
}

fn parse_record(record: &str) -> Result<Commit> {
    let fields = record.split(FIELD_SEPARATOR).collect::<Vec<_>>();
    if fields.len() != FIELD_COUNT {
        return Err(anyhow!(
            "expected {FIELD_COUNT} fields, found {}",
            fields.len()
        ));
    }

    let hash = fields[0].trim().to_string();
    if hash.is_empty() {
        return Err(anyhow!("missing commit hash"));
    }
    let short = match fields[1].trim() {
        "" => short_hash(&hash),
        value => value.to_string(),
    };

    Ok(Commit {
        hash,
        short_hash: short,
        subject: fields[2].to_string(),
        author: fields[3].to_string(),
        date: fields[4].to_string(),
        relative_date: fields[5].to_string(),
        parents: fields[6].split_whitespace().map(str::to_string).collect(),
        refs: parse_decorations(fields[7]),
    })
}

fn parse_decorations(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
