use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context as _, Result, anyhow};
use git2::Repository;
use tracing::{debug, info};

use crate::commit::{Commit, parse_log_output};

const LOG_FORMAT: &str = "--format=%H%x1f%h%x1f%s%x1f%an%x1f%ad%x1f%ar%x1f%P%x1f%D%x1e";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    pub limit: usize,
    pub all_refs: bool,
    pub author: Option<String>,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            limit: 300,
            all_refs: true,
            author: None,
        }
    }
}

/// Source of commits in child-before-parent order.
pub trait CommitLogProvider {
    fn load_commits(&self, options: &LogOptions) -> Result<Vec<Commit>>;
}

#[derive(Debug, Clone)]
pub struct GitCli {
    repo_root: PathBuf,
}

impl GitCli {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    /// Resolves the top-level directory of the worktree containing `cwd`.
    pub fn discover(cwd: &Path) -> Result<Self> {
        let repo = Repository::discover(cwd).context("failed to discover git repository")?;
        Ok(Self::new(repo_root(&repo)?))
    }

    /// Whether `git log` has anything to walk. HEAD alone counts unless every
    /// ref is walked, so an unborn branch yields no commits under `--head-only`.
    fn has_commits(&self, all_refs: bool) -> Result<bool> {
        let repo = Repository::open(&self.repo_root)
            .or_else(|_| Repository::discover(&self.repo_root))
            .with_context(|| format!("failed to open repository {}", self.repo_root.display()))?;

        if repo.head().ok().and_then(|head| head.target()).is_some() {
            return Ok(true);
        }
        if !all_refs {
            return Ok(false);
        }

        let mut references = repo
            .references()
            .context("failed to list repository references")?;
        Ok(references.any(|reference| {
            reference.is_ok_and(|reference| reference.resolve().is_ok())
        }))
    }
}

fn repo_root(repo: &Repository) -> Result<PathBuf> {
    if let Some(workdir) = repo.workdir() {
        return Ok(workdir.to_path_buf());
    }

    repo.path()
        .parent()
        .map(Path::to_path_buf)
        .context("failed to resolve repository root")
}

impl CommitLogProvider for GitCli {
    fn load_commits(&self, options: &LogOptions) -> Result<Vec<Commit>> {
        if !self.has_commits(options.all_refs)? {
            debug!(repo = %self.repo_root.display(), "repository has no commits yet");
            return Ok(Vec::new());
        }

        let args = log_args(options);
        let arg_refs = args.iter().map(String::as_str).collect::<Vec<_>>();
        let stdout = run_git(&self.repo_root, &arg_refs)?;
        let commits = parse_log_output(&stdout)
            .with_context(|| format!("failed to parse git log for {}", self.repo_root.display()))?;
        info!(
            repo = %self.repo_root.display(),
            count = commits.len(),
            "loaded commit log"
        );
        Ok(commits)
    }
}

pub fn log_args(options: &LogOptions) -> Vec<String> {
    let mut args = vec!["log".to_string()];
    if options.all_refs {
        args.push("--all".to_string());
    }
    args.push("--date-order".to_string());
    args.push("--date=short".to_string());
    args.push("-n".to_string());
    args.push(options.limit.max(1).to_string());
    if let Some(author) = options
        .author
        .as_deref()
        .map(str::trim)
        .filter(|author| !author.is_empty())
    {
        args.push(format!("--author={author}"));
    }
    args.push(LOG_FORMAT.to_string());
    args
}

fn run_git(cwd: &Path, args: &[&str]) -> Result<String> {
    debug!(cwd = %cwd.display(), ?args, "running git");
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .with_context(|| format!("failed to spawn git in {}", cwd.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!(
            "git {} exited with {}: {}",
            args.first().copied().unwrap_or_default(),
            output.status,
            stderr.trim()
        ));
    }

    String::from_utf8(output.stdout).context("git produced non UTF-8 output")
}
