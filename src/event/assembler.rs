//! event::assembler
//!
//! Push event assembly and repository identity.

use crate::core::config::RepositoryConfig;
use crate::core::event::{CommitEvent, PushEvent, RefUpdate, RepositoryDescriptor};
use crate::git::RepoInfo;

/// Assemble the push event for one ref update.
///
/// `before`/`after` always mirror the ref update, however many commits
/// were resolved.
pub fn assemble(
    update: &RefUpdate,
    repository: &RepositoryDescriptor,
    commits: Vec<CommitEvent>,
) -> PushEvent {
    PushEvent {
        before: update.old.clone(),
        after: update.new.clone(),
        ref_name: update.ref_name.clone(),
        commits,
        repository: repository.clone(),
    }
}

/// Describe the repository, applying configured overrides.
///
/// Computed once per invocation; it does not depend on the ref.
pub fn describe_repository(info: &RepoInfo, overrides: &RepositoryConfig) -> RepositoryDescriptor {
    let name = overrides
        .name
        .clone()
        .unwrap_or_else(|| info.default_name());
    let owner = overrides.owner.clone().unwrap_or_else(|| name.clone());

    RepositoryDescriptor {
        url: overrides.url.clone().unwrap_or_else(|| info.location()),
        description: info.description.clone(),
        commit_url_template: overrides
            .commit_url
            .clone()
            .unwrap_or_else(|| RepositoryDescriptor::DEFAULT_COMMIT_URL.to_string()),
        name,
        owner,
    }
}
