//! Per-call load options: insertion mode, lifecycle hooks, error fallback.

use crate::dom::NodeRef;
use crate::error::RetrievalError;

/// How inserted markup relates to the target's existing children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertMode {
    /// Clear the target, then insert. Prior content (and anything attached to
    /// it) is discarded; cleanup of the outgoing content is the caller's job.
    #[default]
    Replace,
    /// Insert after the existing children.
    Append,
    /// Insert before the existing children, preserving fragment order.
    Prepend,
}

/// Insertion target: a selector resolved against the document, or a node the
/// caller already holds.
#[derive(Debug, Clone)]
pub enum Target {
    Selector(String),
    Node(NodeRef),
}

impl From<&str> for Target {
    fn from(selector: &str) -> Self {
        Target::Selector(selector.to_string())
    }
}

impl From<NodeRef> for Target {
    fn from(node: NodeRef) -> Self {
        Target::Node(node)
    }
}

/// Hook run between parse and insertion: `(fragment, target)`. The fragment is
/// a document node holding the parsed markup; mutations made here land in the
/// live target.
pub type BeforeInsertHook = Box<dyn FnMut(&NodeRef, &NodeRef) -> anyhow::Result<()>>;

/// Hook run after insertion (and script activation) against the populated
/// target.
pub type AfterInsertHook = Box<dyn FnMut(&NodeRef) -> anyhow::Result<()>>;

/// Receives each live script node once, in document order. This is where an
/// embedding runtime executes fragment scripts.
pub type ScriptSink = Box<dyn FnMut(&NodeRef)>;

/// Markup shown in the target when the fetch fails. Substitution is a
/// presentation concern only; the original error still propagates.
pub enum ErrorFallback {
    /// Literal markup.
    Markup(String),
    /// Markup generated from the failing path and error.
    Generate(Box<dyn Fn(&str, &RetrievalError) -> String>),
}

impl ErrorFallback {
    pub(crate) fn markup(&self, path: &str, error: &RetrievalError) -> String {
        match self {
            ErrorFallback::Markup(markup) => markup.clone(),
            ErrorFallback::Generate(f) => f(path, error),
        }
    }
}

/// Options for a single `load` call.
pub struct LoadOptions {
    pub mode: InsertMode,
    /// Read and populate the fragment cache. Disabled by `reload`'s forced
    /// fetch path; in-flight coalescing applies regardless.
    pub use_cache: bool,
    /// Re-materialize scripts after insertion and feed the sink.
    pub run_scripts: bool,
    /// Apply lazy-loading defaults to dimensionless images before insertion.
    pub prepare_images: bool,
    pub before_insert: Option<BeforeInsertHook>,
    pub after_insert: Option<AfterInsertHook>,
    pub error_fallback: Option<ErrorFallback>,
    pub script_sink: Option<ScriptSink>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            mode: InsertMode::Replace,
            use_cache: true,
            run_scripts: true,
            prepare_images: false,
            before_insert: None,
            after_insert: None,
            error_fallback: None,
            script_sink: None,
        }
    }
}
