//! Per-call traversal state: path tracking, suppression scopes and
//! error/warning accumulation.
//!
//! A [`Context`] is created at the start of every `Model::validate` call and
//! dropped at the end; it is never shared between calls.

use crate::error::ErrorDetail;

/// One step of the property path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Root,
    Prop(String),
    Index(usize),
}

/// Handle for one entry of a [`ScopeStack`]. Releasing it excises the
/// matching entry wherever it sits in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeToken(u64);

#[derive(Debug, Clone, Copy)]
struct ScopeEntry {
    token: u64,
    /// Warning-list length at entry; used to roll back trial bookkeeping.
    checkpoint: usize,
}

/// Index-addressable scope stack with safe out-of-order release.
///
/// An ancestor's release must still find and remove its own entry even when
/// an intermediate frame bailed out without releasing (error-driven abort
/// paths), so release searches by token instead of assuming strict LIFO
/// discipline.
#[derive(Debug, Default)]
pub struct ScopeStack {
    entries: Vec<ScopeEntry>,
    next_token: u64,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&mut self, checkpoint: usize) -> ScopeToken {
        let token = self.next_token;
        self.next_token += 1;
        self.entries.push(ScopeEntry { token, checkpoint });
        ScopeToken(token)
    }

    /// Removes the entry belonging to `token`, and any entries stacked above
    /// it that were left behind by aborted descendants. Returns the entry's
    /// checkpoint, or `None` when the token was already released.
    pub fn release(&mut self, token: ScopeToken) -> Option<usize> {
        let pos = self.entries.iter().rposition(|e| e.token == token.0)?;
        let entry = self.entries[pos];
        self.entries.truncate(pos);
        Some(entry.checkpoint)
    }

    /// Checkpoint of the entry belonging to `token`, without releasing it.
    pub fn checkpoint_of(&self, token: ScopeToken) -> Option<usize> {
        self.entries
            .iter()
            .rfind(|e| e.token == token.0)
            .map(|e| e.checkpoint)
    }

    pub fn is_active(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }
}

/// Mutable state threaded by `&mut` through one whole recursive descent.
#[derive(Debug)]
pub struct Context {
    path: Vec<PathSegment>,
    /// Attribution names of the models currently on the descent path.
    names: Vec<Option<String>>,
    errors: Vec<ErrorDetail>,
    warnings: Vec<ErrorDetail>,
    /// Trial-matching: union/array alternatives are validated inside this
    /// scope; failed trials roll their bookkeeping back.
    matching: ScopeStack,
    /// Would-be errors register as warnings instead (remove-faulty filtering).
    warn_only: ScopeStack,
    /// Active while a `stop_on_error` node validates its subtree.
    stop: ScopeStack,
}

impl Context {
    pub fn new() -> Self {
        Context {
            path: vec![PathSegment::Root],
            names: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
            matching: ScopeStack::new(),
            warn_only: ScopeStack::new(),
            stop: ScopeStack::new(),
        }
    }

    // ------------------------------------------------------------- path

    pub fn push_prop(&mut self, key: &str) {
        self.path.push(PathSegment::Prop(key.to_string()));
    }

    pub fn push_index(&mut self, index: usize) {
        self.path.push(PathSegment::Index(index));
    }

    pub fn pop_path(&mut self) {
        if self.path.len() > 1 {
            self.path.pop();
        }
    }

    /// Dot-joined names with bracketed indices, rooted at `<root>`.
    pub fn path_string(&self) -> String {
        let mut out = String::new();
        for seg in &self.path {
            match seg {
                PathSegment::Root => out.push_str("<root>"),
                PathSegment::Prop(k) => {
                    out.push('.');
                    out.push_str(k);
                }
                PathSegment::Index(i) => {
                    out.push('[');
                    out.push_str(&i.to_string());
                    out.push(']');
                }
            }
        }
        out
    }

    // ------------------------------------------------------------ names

    pub fn push_name(&mut self, name: Option<String>) {
        self.names.push(name);
    }

    pub fn pop_name(&mut self) {
        self.names.pop();
    }

    /// Nearest explicitly named ancestor model, for error attribution.
    pub fn current_name(&self) -> Option<&str> {
        self.names.iter().rev().flatten().next().map(String::as_str)
    }

    // ----------------------------------------------------------- scopes

    pub fn enter_matching(&mut self) -> ScopeToken {
        self.matching.enter(self.warnings.len())
    }

    pub fn exit_matching(&mut self, token: ScopeToken) {
        self.matching.release(token);
    }

    /// Discards warnings registered since the matching scope was entered.
    /// Called after a failed trial so that trial noise never reaches the
    /// final report.
    pub fn rollback_trial(&mut self, token: ScopeToken) {
        if let Some(checkpoint) = self.matching.checkpoint_of(token) {
            self.warnings.truncate(checkpoint);
        }
    }

    pub fn matching_active(&self) -> bool {
        self.matching.is_active()
    }

    pub fn enter_warn_only(&mut self) -> ScopeToken {
        self.warn_only.enter(self.warnings.len())
    }

    pub fn exit_warn_only(&mut self, token: ScopeToken) {
        self.warn_only.release(token);
    }

    pub fn warn_only_active(&self) -> bool {
        self.warn_only.is_active()
    }

    pub fn enter_stop(&mut self) -> ScopeToken {
        self.stop.enter(self.warnings.len())
    }

    pub fn exit_stop(&mut self, token: ScopeToken) {
        self.stop.release(token);
    }

    pub fn stop_active(&self) -> bool {
        self.stop.is_active()
    }

    // ------------------------------------------------- report collection

    /// Appends a demoted warning, skipping structurally identical repeats.
    pub fn register_warning(&mut self, detail: ErrorDetail) {
        if !self.warnings.contains(&detail) {
            self.warnings.push(detail);
        }
    }

    /// Appends a final error, skipping structurally identical repeats.
    pub fn register_error(&mut self, detail: ErrorDetail) {
        if !self.errors.contains(&detail) {
            self.errors.push(detail);
        }
    }

    pub fn take_warnings(&mut self) -> Vec<ErrorDetail> {
        std::mem::take(&mut self.warnings)
    }

    pub fn take_errors(&mut self) -> Vec<ErrorDetail> {
        std::mem::take(&mut self.errors)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
