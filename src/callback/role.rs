//! Role resolution for result grouping.
//!
//! Hosts expose role information in different places depending on how a task
//! was loaded. A [`RoleChain`] asks a fixed list of [`RoleResolver`]s in order
//! and takes the first non-empty answer.

use std::fmt::Debug;

use crate::traits::TaskRef;

/// Path segment that precedes a role name in task file paths.
const ROLES_SEGMENT: &str = "/roles/";

/// One strategy for finding a task's role.
pub trait RoleResolver: Debug + Send + Sync {
    /// Returns the role name, or `None` if this strategy cannot tell.
    fn resolve(&self, task: &TaskRef) -> Option<String>;
}

/// The role the task itself declares.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectRole;

impl RoleResolver for DirectRole {
    fn resolve(&self, task: &TaskRef) -> Option<String> {
        non_empty(task.role.as_deref())
    }
}

/// The role of the parent, for included and imported tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParentRole;

impl RoleResolver for ParentRole {
    fn resolve(&self, task: &TaskRef) -> Option<String> {
        task.parent
            .as_deref()
            .and_then(|parent| non_empty(parent.role.as_deref()))
    }
}

/// The directory name after `/roles/` in the task's source path,
/// e.g. `site/roles/nginx/tasks/main.yml` -> `nginx`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathRole;

impl RoleResolver for PathRole {
    fn resolve(&self, task: &TaskRef) -> Option<String> {
        let path = task.path.as_deref()?;
        let (_, rest) = path.split_once(ROLES_SEGMENT)?;
        non_empty(rest.split('/').next())
    }
}

/// Ordered list of resolvers; the first answer wins.
#[derive(Debug)]
pub struct RoleChain {
    resolvers: Vec<Box<dyn RoleResolver>>,
}

impl RoleChain {
    /// A chain with no resolvers; resolves every task to `""`.
    pub fn empty() -> Self {
        Self {
            resolvers: Vec::new(),
        }
    }

    /// Append a resolver to the end of the chain.
    pub fn with_resolver(mut self, resolver: Box<dyn RoleResolver>) -> Self {
        self.resolvers.push(resolver);
        self
    }

    /// Resolve a task's role; `""` when no resolver knows it.
    pub fn resolve(&self, task: &TaskRef) -> String {
        self.resolvers
            .iter()
            .find_map(|resolver| resolver.resolve(task))
            .unwrap_or_default()
    }
}

impl Default for RoleChain {
    /// Direct role, then parent role, then file path.
    fn default() -> Self {
        Self::empty()
            .with_resolver(Box::new(DirectRole))
            .with_resolver(Box::new(ParentRole))
            .with_resolver(Box::new(PathRole))
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_direct_role_wins() {
        let task = TaskRef::new("t", "apt")
            .with_role("web")
            .with_parent(TaskRef::new("p", "include_tasks").with_role("base"))
            .with_path("/srv/roles/db/tasks/main.yml");
        assert_eq!(RoleChain::default().resolve(&task), "web");
    }

    #[test]
    fn test_parent_role_used_when_direct_missing() {
        let task = TaskRef::new("t", "apt")
            .with_role("")
            .with_parent(TaskRef::new("p", "include_tasks").with_role("base"));
        assert_eq!(RoleChain::default().resolve(&task), "base");
    }

    #[test]
    fn test_path_role_is_last_resort() {
        let task = TaskRef::new("t", "apt").with_path("/srv/site/roles/nginx/tasks/main.yml");
        assert_eq!(RoleChain::default().resolve(&task), "nginx");
    }

    #[test]
    fn test_path_without_roles_dir() {
        let task = TaskRef::new("t", "apt").with_path("/srv/site/tasks/main.yml");
        assert_eq!(RoleChain::default().resolve(&task), "");
        let task = TaskRef::new("t", "apt").with_path("/srv/roles/");
        assert_eq!(RoleChain::default().resolve(&task), "");
    }

    #[test]
    fn test_no_role_resolves_to_empty() {
        assert_eq!(RoleChain::default().resolve(&TaskRef::new("t", "apt")), "");
        assert_eq!(
            RoleChain::empty().resolve(&TaskRef::new("t", "apt").with_role("web")),
            ""
        );
    }

    #[derive(Debug)]
    struct Counting(Arc<AtomicUsize>);

    impl RoleResolver for Counting {
        fn resolve(&self, _task: &TaskRef) -> Option<String> {
            self.0.fetch_add(1, Ordering::SeqCst);
            None
        }
    }

    #[test]
    fn test_later_resolvers_not_consulted() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = RoleChain::empty()
            .with_resolver(Box::new(DirectRole))
            .with_resolver(Box::new(Counting(Arc::clone(&calls))));

        chain.resolve(&TaskRef::new("t", "apt").with_role("web"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        chain.resolve(&TaskRef::new("t", "apt"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
