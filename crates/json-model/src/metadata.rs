//! Per-node type-specific configuration payloads.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde_json::Value;

use crate::error::ErrorDetail;
use crate::model::Model;

/// Kind discriminant of a model node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Raw,
    None,
    Bool,
    Num,
    Str,
    Literal,
    Enum,
    Object,
    Array,
    Tuple,
    Union,
    Custom,
    Pipe,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::None => "none",
            Self::Bool => "bool",
            Self::Num => "num",
            Self::Str => "str",
            Self::Literal => "literal",
            Self::Enum => "enum",
            Self::Object => "object",
            Self::Array => "array",
            Self::Tuple => "tuple",
            Self::Union => "union",
            Self::Custom => "custom",
            Self::Pipe => "pipe",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-supplied validation function. Receives the current property path and
/// the value under validation; returns the (possibly transformed) value or a
/// failure message.
pub type CustomValidator = dyn Fn(&str, &Value) -> Result<Value, String> + Send + Sync;

/// Kind-specific payload of a [`Metadata`].
#[derive(Clone)]
pub enum Payload {
    Raw,
    None,
    Bool,
    Num { integer: bool },
    Str { patterns: Vec<Regex> },
    Literal(Value),
    Enum(Vec<Value>),
    Object(Vec<Model>),
    /// Optional single item matcher; `None` passes any array through.
    Array(Option<Box<Model>>),
    Tuple(Vec<Model>),
    Union(Vec<Model>),
    Custom(Arc<CustomValidator>),
    Pipe(Vec<Model>),
}

impl Payload {
    pub fn kind(&self) -> Kind {
        match self {
            Self::Raw => Kind::Raw,
            Self::None => Kind::None,
            Self::Bool => Kind::Bool,
            Self::Num { .. } => Kind::Num,
            Self::Str { .. } => Kind::Str,
            Self::Literal(_) => Kind::Literal,
            Self::Enum(_) => Kind::Enum,
            Self::Object(_) => Kind::Object,
            Self::Array(_) => Kind::Array,
            Self::Tuple(_) => Kind::Tuple,
            Self::Union(_) => Kind::Union,
            Self::Custom(_) => Kind::Custom,
            Self::Pipe(_) => Kind::Pipe,
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str { patterns } => f
                .debug_struct("Str")
                .field("patterns", &patterns.iter().map(Regex::as_str).collect::<Vec<_>>())
                .finish(),
            Self::Literal(v) => f.debug_tuple("Literal").field(v).finish(),
            Self::Enum(v) => f.debug_tuple("Enum").field(v).finish(),
            Self::Object(c) => f.debug_tuple("Object").field(c).finish(),
            Self::Array(m) => f.debug_tuple("Array").field(m).finish(),
            Self::Tuple(c) => f.debug_tuple("Tuple").field(c).finish(),
            Self::Union(c) => f.debug_tuple("Union").field(c).finish(),
            Self::Pipe(c) => f.debug_tuple("Pipe").field(c).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
            Self::Num { integer } => f.debug_struct("Num").field("integer", integer).finish(),
            other => f.write_str(other.kind().as_str()),
        }
    }
}

/// Immutable-once-published configuration of one model node: range bounds,
/// the kind payload and any configuration errors recorded while the node was
/// being declared.
#[derive(Debug, Clone)]
pub struct Metadata {
    /// Lower bound: value for `num`, char count for `str`, element count for
    /// `array`.
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// When set, both bounds compare exclusively.
    pub exclusive: bool,
    pub payload: Payload,
    config_errors: Vec<ErrorDetail>,
}

impl Metadata {
    pub fn new(payload: Payload) -> Self {
        Metadata {
            min: None,
            max: None,
            exclusive: false,
            payload,
            config_errors: Vec::new(),
        }
    }

    pub fn kind(&self) -> Kind {
        self.payload.kind()
    }

    /// Whether `min`/`max`/`range` apply to this kind.
    pub fn is_range_capable(&self) -> bool {
        matches!(self.kind(), Kind::Num | Kind::Str | Kind::Array)
    }

    /// Contained child nodes, for kinds that nest. Empty for `array` (its
    /// matcher is reached through [`Payload::Array`] directly) and for
    /// leaves.
    pub fn child_nodes(&self) -> &[Model] {
        match &self.payload {
            Payload::Object(c) | Payload::Tuple(c) | Payload::Union(c) | Payload::Pipe(c) => c,
            _ => &[],
        }
    }

    /// Records a schema-declaration mistake. Only ever called on a freshly
    /// derived copy, before it is published inside an `Arc`.
    pub(crate) fn add_config_error(&mut self, detail: ErrorDetail) {
        if !self.config_errors.contains(&detail) {
            self.config_errors.push(detail);
        }
    }

    pub fn config_errors(&self) -> &[ErrorDetail] {
        &self.config_errors
    }
}
