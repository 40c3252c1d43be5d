//! The model node: one schema position, immutable and copy-on-write.

use std::sync::Arc;

use serde_json::Value;

use crate::config::ModelConfig;
use crate::context::Context;
use crate::error::{ErrorDetail, ErrorKind, ModelError, Validated};
use crate::metadata::{Kind, Metadata, Payload};
use crate::settings::Settings;
use crate::validate::validate_model;

/// One schema position.
///
/// A `Model` wraps shared references to its [`ModelConfig`], [`Settings`]
/// and [`Metadata`]; none of them is ever mutated after publishing. Every
/// modifier returns a *new* `Model` sharing the unchanged collaborators by
/// reference and owning a freshly derived copy of the one being changed,
/// which is what makes a published tree safe to validate against from any
/// number of threads at once.
#[derive(Debug, Clone)]
pub struct Model {
    key: Option<String>,
    config: Arc<ModelConfig>,
    settings: Arc<Settings>,
    meta: Arc<Metadata>,
}

impl Model {
    pub(crate) fn from_payload(payload: Payload, config: Arc<ModelConfig>) -> Model {
        Model {
            key: None,
            config,
            settings: Arc::new(Settings::new()),
            meta: Arc::new(Metadata::new(payload)),
        }
    }

    // -------------------------------------------------------- accessors

    pub fn kind(&self) -> Kind {
        self.meta.kind()
    }

    /// Property key this node validates under, `None` at the root.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn metadata(&self) -> &Metadata {
        &self.meta
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    // ------------------------------------------------------- validation

    /// Validates `value` against this model tree.
    ///
    /// Creates a fresh [`Context`] for the whole recursive descent and never
    /// mutates the model; concurrent calls against the same tree are safe.
    /// The returned value is freshly built (defaults substituted, faulty
    /// array items dropped, pipe stages applied).
    pub fn validate(&self, value: &Value) -> Validated {
        let mut ctx = Context::new();
        match validate_model(self, &mut ctx, value.clone()) {
            Ok(out) => {
                let warnings = ctx.take_warnings();
                let warning = ErrorDetail::combine(warnings, "<root>").map(Box::new);
                Validated::Valid { value: out, warning }
            }
            Err(detail) => {
                ctx.register_error(*detail);
                let errors = ctx.take_errors();
                let mut error = ErrorDetail::combine(errors, "<root>").unwrap_or_else(|| {
                    ErrorDetail::new(ErrorKind::Unknown, "<root>", "validation failed")
                });
                error.warnings = ctx.take_warnings();
                Validated::Invalid { error: Box::new(error) }
            }
        }
    }

    /// Like [`validate`](Self::validate), but surfaces failure as a typed
    /// [`ModelError`] and discards warnings.
    pub fn ensure(&self, value: &Value) -> Result<Value, ModelError> {
        match self.validate(value) {
            Validated::Valid { value, .. } => Ok(value),
            Validated::Invalid { error } => Err(ModelError::Validation(*error)),
        }
    }

    // ------------------------------------------------- configure errors

    /// Every schema-declaration mistake recorded anywhere in this tree.
    /// Pure and idempotent: the tree is immutable, so repeated calls return
    /// the same list.
    pub fn configure_errors(&self) -> Vec<ErrorDetail> {
        let mut out = Vec::new();
        self.collect_configure_errors(&mut out);
        out
    }

    fn collect_configure_errors(&self, out: &mut Vec<ErrorDetail>) {
        for detail in self.meta.config_errors() {
            if !out.contains(detail) {
                out.push(detail.clone());
            }
        }
        if let Payload::Array(Some(matcher)) = &self.meta.payload {
            matcher.collect_configure_errors(out);
        }
        for child in self.meta.child_nodes() {
            child.collect_configure_errors(out);
        }
    }

    /// Fails when any configure error was recorded while declaring this
    /// tree; the strict counterpart to [`configure_errors`](Self::configure_errors).
    pub fn checked(self) -> Result<Model, ModelError> {
        let errors = self.configure_errors();
        match ErrorDetail::combine(errors, "<root>") {
            None => Ok(self),
            Some(detail) => Err(ModelError::Configure(detail)),
        }
    }

    // -------------------------------------------- copy-on-write helpers

    fn derive_settings(&self, f: impl FnOnce(&mut Settings)) -> Model {
        let mut settings = (*self.settings).clone();
        f(&mut settings);
        Model {
            key: self.key.clone(),
            config: Arc::clone(&self.config),
            settings: Arc::new(settings),
            meta: Arc::clone(&self.meta),
        }
    }

    fn derive_meta(&self, f: impl FnOnce(&mut Metadata)) -> Model {
        let mut meta = (*self.meta).clone();
        f(&mut meta);
        Model {
            key: self.key.clone(),
            config: Arc::clone(&self.config),
            settings: Arc::clone(&self.settings),
            meta: Arc::new(meta),
        }
    }

    fn with_configure_error(&self, kind: ErrorKind, message: String) -> Model {
        let path = match &self.key {
            Some(k) => format!("<root>.{k}"),
            None => "<root>".to_string(),
        };
        let name = self.settings.name.clone();
        self.derive_meta(|meta| {
            meta.add_config_error(ErrorDetail::new(kind, path, message).with_name(name));
        })
    }

    pub(crate) fn with_recorded_error(&self, detail: ErrorDetail) -> Model {
        self.derive_meta(|meta| meta.add_config_error(detail))
    }

    fn reject_kind(&self, operation: &str) -> Model {
        self.with_configure_error(
            ErrorKind::Configure,
            format!("`{operation}` does not apply to a `{}` model", self.kind()),
        )
    }

    pub(crate) fn with_key(&self, key: impl Into<String>) -> Model {
        let mut out = self.clone();
        out.key = Some(key.into());
        out
    }

    fn without_key(&self) -> Model {
        let mut out = self.clone();
        out.key = None;
        out
    }

    // --------------------------------------------------------- modifiers

    /// Marks this node optional (an absent object property is skipped, or
    /// replaced by the default when one is set).
    pub fn optional(&self) -> Model {
        if self.settings.optional {
            return self.clone();
        }
        self.derive_settings(|s| s.optional = true)
    }

    /// Sets the default value substituted for absent optional properties and
    /// by stop-on-error resolution.
    pub fn with_default(&self, value: Value) -> Model {
        if self.settings.is_equal_default(&value) {
            return self.clone();
        }
        self.derive_settings(|s| s.set_default(value))
    }

    /// A failure of this node's subtree resolves to the default value (or
    /// `null`) plus a warning instead of propagating.
    pub fn stop_on_error(&self) -> Model {
        if self.settings.stop_on_error {
            return self.clone();
        }
        self.derive_settings(|s| s.stop_on_error = true)
    }

    /// Array-only: drop invalid items (demoted to warnings) instead of
    /// failing the whole array.
    pub fn remove_faulty(&self) -> Model {
        if self.kind() != Kind::Array {
            return self.reject_kind("remove_faulty");
        }
        if self.settings.remove_faulty {
            return self.clone();
        }
        self.derive_settings(|s| s.remove_faulty = true)
    }

    /// Attribution name attached to error details raised under this node.
    pub fn named(&self, name: impl Into<String>) -> Model {
        let name = name.into();
        if self.settings.name.as_deref() == Some(name.as_str()) {
            return self.clone();
        }
        self.derive_settings(|s| s.name = Some(name))
    }

    /// Lower bound: value for `num`, char count for `str`, element count for
    /// `array`.
    pub fn min(&self, min: f64) -> Model {
        if !self.meta.is_range_capable() {
            return self.reject_kind("min");
        }
        if self.meta.min == Some(min) {
            return self.clone();
        }
        self.derive_meta(|meta| meta.min = Some(min))
    }

    /// Upper bound, see [`min`](Self::min).
    pub fn max(&self, max: f64) -> Model {
        if !self.meta.is_range_capable() {
            return self.reject_kind("max");
        }
        if self.meta.max == Some(max) {
            return self.clone();
        }
        self.derive_meta(|meta| meta.max = Some(max))
    }

    /// Sets both bounds at once.
    pub fn range(&self, min: f64, max: f64) -> Model {
        if !self.meta.is_range_capable() {
            return self.reject_kind("range");
        }
        if min > max {
            return self.with_configure_error(
                ErrorKind::Configure,
                format!("invalid range: min {min} exceeds max {max}"),
            );
        }
        if self.meta.min == Some(min) && self.meta.max == Some(max) {
            return self.clone();
        }
        self.derive_meta(|meta| {
            meta.min = Some(min);
            meta.max = Some(max);
        })
    }

    /// Makes both bounds compare exclusively.
    pub fn exclusive(&self) -> Model {
        if !self.meta.is_range_capable() {
            return self.reject_kind("exclusive");
        }
        if self.meta.exclusive {
            return self.clone();
        }
        self.derive_meta(|meta| meta.exclusive = true)
    }

    /// Num-only: require an integral value.
    pub fn integer(&self) -> Model {
        match &self.meta.payload {
            Payload::Num { integer: true } => self.clone(),
            Payload::Num { integer: false } => self.derive_meta(|meta| {
                meta.payload = Payload::Num { integer: true };
            }),
            _ => self.reject_kind("integer"),
        }
    }

    /// Str-only: appends a regex alternative; a string matches when at least
    /// one configured alternative matches.
    pub fn pattern(&self, pattern: regex::Regex) -> Model {
        match &self.meta.payload {
            Payload::Str { patterns } => {
                let mut patterns: Vec<regex::Regex> = patterns.clone();
                patterns.push(pattern);
                self.derive_meta(|meta| meta.payload = Payload::Str { patterns })
            }
            _ => self.reject_kind("pattern"),
        }
    }

    /// Chains this model with further stages: each stage receives only the
    /// successfully transformed output of the previous one.
    pub fn pipe(&self, stages: Vec<Model>) -> Model {
        let mut chain = Vec::with_capacity(stages.len() + 1);
        chain.push(self.without_key());
        chain.extend(stages.iter().map(Model::without_key));
        Model {
            key: self.key.clone(),
            config: Arc::clone(&self.config),
            settings: Arc::new(Settings::new()),
            meta: Arc::new(Metadata::new(Payload::Pipe(chain))),
        }
    }

    // ------------------------------------------------------------ freeze

    /// Publishes this model as a [`FrozenModel`]: it keeps validating, but
    /// no modifier can produce a frozen derivative.
    pub fn freeze(&self) -> FrozenModel {
        self.freeze_named_opt(None)
    }

    /// [`freeze`](Self::freeze) with an attribution name recorded on the
    /// frozen settings.
    pub fn freeze_named(&self, name: impl Into<String>) -> FrozenModel {
        self.freeze_named_opt(Some(name.into()))
    }

    fn freeze_named_opt(&self, name: Option<String>) -> FrozenModel {
        let inner = Model {
            key: self.key.clone(),
            config: Arc::clone(&self.config),
            settings: Arc::new(self.settings.freeze(name)),
            meta: Arc::clone(&self.meta),
        };
        FrozenModel { inner }
    }
}

/// A published, immutable model.
///
/// `FrozenModel` only exposes validation; each modifier returns a new
/// **unfrozen** [`Model`] carrying a recorded [`ErrorKind::ModelFrozen`]
/// configure error instead of applying the change. The frozen value itself
/// keeps validating unchanged.
#[derive(Debug, Clone)]
pub struct FrozenModel {
    inner: Model,
}

impl FrozenModel {
    pub fn validate(&self, value: &Value) -> Validated {
        self.inner.validate(value)
    }

    pub fn ensure(&self, value: &Value) -> Result<Value, ModelError> {
        self.inner.ensure(value)
    }

    pub fn kind(&self) -> Kind {
        self.inner.kind()
    }

    pub fn settings(&self) -> &Settings {
        self.inner.settings()
    }

    pub fn metadata(&self) -> &Metadata {
        self.inner.metadata()
    }

    pub fn configure_errors(&self) -> Vec<ErrorDetail> {
        self.inner.configure_errors()
    }

    /// Returns an unfrozen derivative without recording anything.
    pub fn thaw(&self) -> Model {
        let mut out = self.inner.clone();
        out.settings = Arc::new(self.inner.settings.thaw());
        out
    }

    fn rejected(&self, operation: &str) -> Model {
        let name = self
            .inner
            .settings
            .name
            .clone()
            .unwrap_or_else(|| self.inner.kind().to_string());
        self.thaw().with_configure_error(
            ErrorKind::ModelFrozen,
            format!("cannot apply `{operation}`: model `{name}` is frozen"),
        )
    }

    pub fn optional(&self) -> Model {
        self.rejected("optional")
    }

    pub fn with_default(&self, _value: Value) -> Model {
        self.rejected("with_default")
    }

    pub fn stop_on_error(&self) -> Model {
        self.rejected("stop_on_error")
    }

    pub fn remove_faulty(&self) -> Model {
        self.rejected("remove_faulty")
    }

    pub fn min(&self, _min: f64) -> Model {
        self.rejected("min")
    }

    pub fn max(&self, _max: f64) -> Model {
        self.rejected("max")
    }

    pub fn range(&self, _min: f64, _max: f64) -> Model {
        self.rejected("range")
    }

    pub fn exclusive(&self) -> Model {
        self.rejected("exclusive")
    }

    pub fn integer(&self) -> Model {
        self.rejected("integer")
    }

    pub fn pattern(&self, _pattern: regex::Regex) -> Model {
        self.rejected("pattern")
    }

    pub fn named(&self, _name: &str) -> Model {
        self.rejected("named")
    }
}
