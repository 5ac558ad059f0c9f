//! Fragment insertion: target resolution, insertion modes, lifecycle hooks,
//! script activation, error fallback.

use super::FragmentLoader;
use crate::dom::{images, parse, select, NodeRef};
use crate::error::LoadError;
use crate::options::{InsertMode, LoadOptions, Target};
use crate::scripts;

impl FragmentLoader {
    /// Fetch `path` and insert it into `target`, resolved against `doc`.
    ///
    /// The target is resolved before the fetch, so an unresolvable selector
    /// fails without a network call. On fetch failure with an
    /// `error_fallback`, the target is populated with the fallback markup and
    /// the original error still propagates. Returns the populated target.
    pub async fn load(
        &self,
        path: &str,
        doc: &NodeRef,
        target: impl Into<Target>,
        options: LoadOptions,
    ) -> Result<NodeRef, LoadError> {
        self.load_into(path, doc, target.into(), options).await
    }

    /// Force a fresh retrieval: drop the cache entry, then `load` with default
    /// options so the new result lands in the cache.
    pub async fn reload(
        &self,
        path: &str,
        doc: &NodeRef,
        target: impl Into<Target>,
    ) -> Result<NodeRef, LoadError> {
        self.drop_cache_entry(path);
        self.load_into(path, doc, target.into(), LoadOptions::default())
            .await
    }

    async fn load_into(
        &self,
        path: &str,
        doc: &NodeRef,
        target: Target,
        mut options: LoadOptions,
    ) -> Result<NodeRef, LoadError> {
        let target = resolve_target(doc, &target)?;

        let html = match self.fetch_with(path, options.use_cache).await {
            Ok(html) => html,
            Err(err) => {
                if let Some(fallback) = &options.error_fallback {
                    let markup = fallback.markup(path, &err);
                    tracing::debug!(%path, "populating target with error fallback");
                    // Fallback is presentation only: inserted without script
                    // activation, and the error below still reaches the caller.
                    let fragment = parse::parse_fragment(&markup);
                    target.clear_children();
                    for child in fragment.children() {
                        target.append(child);
                    }
                }
                return Err(err.into());
            }
        };

        let fragment = parse::parse_fragment(&html);
        if options.prepare_images {
            images::prepare_images(&fragment);
        }

        if let Some(hook) = options.before_insert.as_mut() {
            hook(&fragment, &target).map_err(|source| LoadError::Hook {
                hook: "before_insert",
                source,
            })?;
        }

        let inserted = fragment.children();
        match options.mode {
            InsertMode::Replace => {
                target.clear_children();
                for node in &inserted {
                    target.append(node.clone());
                }
            }
            InsertMode::Append => {
                for node in &inserted {
                    target.append(node.clone());
                }
            }
            InsertMode::Prepend => {
                for (index, node) in inserted.iter().enumerate() {
                    target.insert_child(index, node.clone());
                }
            }
        }

        if options.run_scripts {
            let live = scripts::activate_scripts(&inserted);
            if let Some(sink) = options.script_sink.as_mut() {
                for script in &live {
                    sink(script);
                }
            }
        }

        if let Some(hook) = options.after_insert.as_mut() {
            hook(&target).map_err(|source| LoadError::Hook {
                hook: "after_insert",
                source,
            })?;
        }

        self.mark_loaded(path);
        tracing::debug!(%path, mode = ?options.mode, "fragment loaded");
        Ok(target)
    }
}

fn resolve_target(doc: &NodeRef, target: &Target) -> Result<NodeRef, LoadError> {
    match target {
        Target::Node(node) => Ok(node.clone()),
        Target::Selector(selector) => {
            select::select_first(doc, selector).ok_or_else(|| LoadError::TargetNotFound {
                selector: selector.clone(),
            })
        }
    }
}
