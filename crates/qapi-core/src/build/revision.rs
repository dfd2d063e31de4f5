use crate::error::RevisionError;
use crate::swagger::RevisionContext;

/// The version a document describes and its neighbours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRevision {
    pub version: String,
    pub context: RevisionContext,
}

/// Resolve a revision against a commit list ordered newest first.
///
/// Without a requested revision the newest commit is used. `previous` is the
/// next older commit and `next` the next newer one.
pub fn resolve_revision(
    commits: &[String],
    requested: Option<&str>,
) -> Result<ResolvedRevision, RevisionError> {
    let index = match requested {
        Some(rev) => commits
            .iter()
            .position(|c| c == rev)
            .ok_or_else(|| RevisionError::UnknownRevision(rev.to_string()))?,
        None if commits.is_empty() => return Err(RevisionError::NoCommits),
        None => 0,
    };

    Ok(ResolvedRevision {
        version: commits[index].clone(),
        context: RevisionContext {
            previous: commits.get(index + 1).cloned(),
            next: index.checked_sub(1).map(|i| commits[i].clone()),
        },
    })
}
