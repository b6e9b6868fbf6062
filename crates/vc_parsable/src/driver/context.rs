use alloc::format;

use crate::error::{ErrorKind, Result, report};
use crate::registry::ParsableRegistry;

/// The default nesting limit of both drivers.
pub const DEFAULT_MAX_DEPTH: usize = 128;

// -----------------------------------------------------------------------------
// Context

/// State shared by every level of one traversal.
pub(crate) struct Context<'a> {
    registry: &'a ParsableRegistry,
    depth: usize,
    max_depth: usize,
    type_tag: bool,
}

impl<'a> Context<'a> {
    #[inline]
    pub(crate) const fn new(registry: &'a ParsableRegistry, max_depth: usize, type_tag: bool) -> Self {
        Self {
            registry,
            depth: 0,
            max_depth,
            type_tag,
        }
    }

    #[inline]
    pub(crate) const fn registry(&self) -> &'a ParsableRegistry {
        self.registry
    }

    #[inline]
    pub(crate) const fn type_tag(&self) -> bool {
        self.type_tag
    }

    /// Runs `f` one nesting level deeper.
    pub(crate) fn nested<R>(&mut self, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        if self.depth >= self.max_depth {
            return Err(report(
                ErrorKind::DepthLimit,
                format!("nesting exceeds the limit of {}", self.max_depth),
            ));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}
