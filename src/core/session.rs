// This module provides the handle for the front end's process-wide global session. Shader
// compilers such as Slang require one global session that outlives every per-request
// session and is expensive to create. GlobalSession wraps it in an explicitly initialised
// once_cell OnceCell: ensure_initialized() creates it on first use and returns the same
// instance afterwards, and concurrent first calls are serialised so at most one creation
// ever happens. A failed creation leaves the handle empty so a later call may retry. The
// handle is shared between compilers with Arc; it is never reset.

//! Lazily created global front-end session.

use log::info;
use once_cell::sync::OnceCell;

use super::error::{CompileError, CompileResult};

/// Owned handle to the global session of a front end.
#[derive(Debug)]
pub struct GlobalSession<G> {
    cell: OnceCell<G>,
}

impl<G> GlobalSession<G> {
    /// An empty handle; nothing is created until [`ensure_initialized`](Self::ensure_initialized).
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Return the global session, creating it with `create` on first use.
    pub fn ensure_initialized<F>(&self, create: F) -> CompileResult<&G>
    where
        F: FnOnce() -> Result<G, String>,
    {
        self.cell.get_or_try_init(|| {
            info!("CreateSession: Creating global session...");
            create().map_err(|reason| CompileError::GlobalSession { reason })
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn get(&self) -> Option<&G> {
        self.cell.get()
    }
}

impl<G> Default for GlobalSession<G> {
    fn default() -> Self {
        Self::new()
    }
}
