//! Entities: callables identified by a dotted path, and the modules they resolve into.

use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

const BUILTIN_MARKER: &str = "<builtin>";
const INIT_MARKER: &str = "__init__";

/// A fully-qualified dotted module name plus the on-disk file it resolves to, if any.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Module {
    pub dotted_path: String,
    pub file_path: Option<PathBuf>,
}

impl Module {
    pub fn new(dotted_path: impl Into<String>, file_path: Option<PathBuf>) -> Self {
        Self {
            dotted_path: dotted_path.into(),
            file_path,
        }
    }

    /// True iff this module's file path resolves on disk.
    pub fn exists(&self) -> bool {
        self.file_path.as_deref().is_some_and(Path::is_file)
    }

    /// Resolve the longest prefix of `id`'s segments that maps to an existing file under
    /// `repo_root`, preferring function-level resolution (i.e. the callable's own last
    /// segment is always dropped before the search starts, so a bare method name never
    /// shadows its containing module/class file).
    pub fn resolve(id: &str, repo_root: &Path) -> Option<Module> {
        let segments: Vec<&str> = id.split('.').collect();
        if segments.len() <= 1 {
            return None;
        }

        // Drop the callable's own name; search remaining prefixes longest-first.
        for end in (1..segments.len()).rev() {
            let prefix = &segments[..end];
            let dotted = prefix.join(".");
            let rel: PathBuf = prefix.iter().collect();
            let candidate = repo_root.join(&rel).with_extension("py");
            if candidate.is_file() {
                return Some(Module::new(dotted, Some(candidate)));
            }
        }
        None
    }
}

/// Classification of a callee, assigned once at call-graph insertion and never overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalleeKind {
    Builtin,
    Api,
    Local,
    External,
}

impl CalleeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalleeKind::Builtin => "BUILTIN",
            CalleeKind::Api => "API",
            CalleeKind::Local => "LOCAL",
            CalleeKind::External => "EXTERNAL",
        }
    }
}

/// Role an entity plays when it appears as a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallerRole {
    Function,
    Method,
    Class,
    Default,
}

/// A callable identified by a dotted path.
///
/// Identity is by `id` alone: two entities with the same id compare equal and hash equal
/// regardless of what module/kind/role they carry, so an `Entity` is safe to use as a map
/// key even before its module has been resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    id: Arc<str>,
    module: Option<Module>,
    simple_name: String,
    kind: Option<CalleeKind>,
    role: Option<CallerRole>,
}

impl Entity {
    /// Build an entity, resolving its module against `repo_root`.
    pub fn new(id: impl AsRef<str>, repo_root: &Path) -> Self {
        let id = id.as_ref();
        let module = Module::resolve(id, repo_root);
        let simple_name = Self::compute_simple_name(id);
        Self {
            id: Arc::from(id),
            module,
            simple_name,
            kind: None,
            role: None,
        }
    }

    /// Build an entity with an already-known module (used when the caller already did the
    /// filesystem resolution, e.g. while iterating files during call-graph construction).
    pub fn with_module(id: impl AsRef<str>, module: Option<Module>) -> Self {
        let id = id.as_ref();
        Self {
            id: Arc::from(id),
            simple_name: Self::compute_simple_name(id),
            module,
            kind: None,
            role: None,
        }
    }

    fn compute_simple_name(id: &str) -> String {
        let segments: Vec<&str> = id.split('.').collect();
        match segments.as_slice() {
            [] => String::new(),
            [only] => (*only).to_string(),
            _ => {
                let last = *segments.last().unwrap();
                if last == INIT_MARKER || last.starts_with("<lambda") {
                    segments[segments.len() - 2].to_string()
                } else {
                    last.to_string()
                }
            }
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn module(&self) -> Option<&Module> {
        self.module.as_ref()
    }

    pub fn simple_name(&self) -> &str {
        &self.simple_name
    }

    pub fn kind(&self) -> Option<CalleeKind> {
        self.kind
    }

    pub fn role(&self) -> Option<CallerRole> {
        self.role
    }

    pub fn with_kind(mut self, kind: CalleeKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_role(mut self, role: CallerRole) -> Self {
        self.role = Some(role);
        self
    }

    pub fn is_builtin_marker(&self) -> bool {
        self.id.contains(BUILTIN_MARKER)
    }

    /// Classify this entity as a callee of `caller`:
    /// - `<builtin>` marker and unresolved module -> BUILTIN
    /// - unresolved module -> API
    /// - same module path as the caller -> LOCAL
    /// - otherwise -> EXTERNAL
    pub fn classify_as_callee_of(&self, caller: &Entity) -> CalleeKind {
        let module_exists = self.module.as_ref().is_some_and(Module::exists);
        if self.is_builtin_marker() && !module_exists {
            return CalleeKind::Builtin;
        }
        if !module_exists {
            return CalleeKind::Api;
        }
        let same_module = match (caller.module(), self.module()) {
            (Some(a), Some(b)) => a.dotted_path == b.dotted_path,
            _ => false,
        };
        if same_module {
            CalleeKind::Local
        } else {
            CalleeKind::External
        }
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Entity {}

impl Hash for Entity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_name_drops_init_marker() {
        let e = Entity::with_module("pkg.mod.Widget.__init__", None);
        assert_eq!(e.simple_name(), "Widget");
    }

    #[test]
    fn simple_name_drops_lambda_marker() {
        let e = Entity::with_module("pkg.mod.make_handler.<lambda>", None);
        assert_eq!(e.simple_name(), "make_handler");
    }

    #[test]
    fn simple_name_plain_function() {
        let e = Entity::with_module("pkg.mod.helper", None);
        assert_eq!(e.simple_name(), "helper");
    }

    #[test]
    fn equality_is_by_id_only() {
        let a = Entity::with_module("pkg.f", None).with_kind(CalleeKind::Local);
        let b = Entity::with_module("pkg.f", None).with_kind(CalleeKind::External);
        assert_eq!(a, b);
    }

    #[test]
    fn classify_builtin() {
        let caller = Entity::with_module("pkg.mod.f", Some(Module::new("pkg.mod", None)));
        let callee = Entity::with_module("<builtin>.len", None);
        assert_eq!(callee.classify_as_callee_of(&caller), CalleeKind::Builtin);
    }

    #[test]
    fn classify_api_when_unresolved_non_builtin() {
        let caller = Entity::with_module("pkg.mod.f", Some(Module::new("pkg.mod", None)));
        let callee = Entity::with_module("requests.get", None);
        assert_eq!(callee.classify_as_callee_of(&caller), CalleeKind::Api);
    }
}
