//! Shorthand constructors for model trees, plus literal inference.
//!
//! The engine itself only consumes fully-formed [`Model`]s; everything here
//! is convenience on top of it.

use std::sync::Arc;

use regex::Regex;
use serde_json::Value;

use crate::config::ModelConfig;
use crate::error::{ErrorDetail, ErrorKind};
use crate::metadata::Payload;
use crate::model::Model;

/// Factory for model nodes sharing one [`ModelConfig`].
#[derive(Debug, Clone, Default)]
pub struct ModelFactory {
    config: Arc<ModelConfig>,
}

impl ModelFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ModelConfig) -> Self {
        ModelFactory {
            config: Arc::new(config),
        }
    }

    fn node(&self, payload: Payload) -> Model {
        Model::from_payload(payload, Arc::clone(&self.config))
    }

    // ------------------------------------------------------------ leaves

    /// Accepts any value unchanged.
    pub fn raw(&self) -> Model {
        self.node(Payload::Raw)
    }

    /// Accepts nothing; planted in place of a value that could not be
    /// classified during schema construction.
    pub fn none(&self) -> Model {
        self.node(Payload::None)
    }

    pub fn bool(&self) -> Model {
        self.node(Payload::Bool)
    }

    pub fn num(&self) -> Model {
        self.node(Payload::Num { integer: false })
    }

    pub fn int(&self) -> Model {
        self.node(Payload::Num { integer: true })
    }

    pub fn str(&self) -> Model {
        self.node(Payload::Str {
            patterns: Vec::new(),
        })
    }

    /// A string model that must match the given pattern; further
    /// alternatives can be appended with [`Model::pattern`].
    pub fn pattern(&self, pattern: Regex) -> Model {
        self.node(Payload::Str {
            patterns: vec![pattern],
        })
    }

    pub fn literal(&self, value: impl Into<Value>) -> Model {
        self.node(Payload::Literal(value.into()))
    }

    /// Membership in a set of literal values.
    pub fn enum_of(&self, members: Vec<Value>) -> Model {
        let empty = members.is_empty();
        let model = self.node(Payload::Enum(members));
        if empty {
            configure_error(model, "enum declared without any members")
        } else {
            model
        }
    }

    // -------------------------------------------------------- containers

    /// Object with an ordered list of `(key, model)` fields. Mark a field
    /// model [`Model::optional`] to allow it to be absent.
    pub fn object<K: Into<String>>(&self, fields: Vec<(K, Model)>) -> Model {
        let children = fields
            .into_iter()
            .map(|(key, model)| model.with_key(key))
            .collect();
        self.node(Payload::Object(children))
    }

    /// Array whose every item must satisfy `matcher`.
    pub fn array(&self, matcher: Model) -> Model {
        self.node(Payload::Array(Some(Box::new(matcher))))
    }

    /// Array with no item matcher; any array passes through.
    pub fn array_any(&self) -> Model {
        self.node(Payload::Array(None))
    }

    /// Fixed-length array with one model per position.
    pub fn tuple(&self, items: Vec<Model>) -> Model {
        self.node(Payload::Tuple(items))
    }

    /// First-match-wins alternatives, tried in declaration order.
    pub fn union(&self, alternatives: Vec<Model>) -> Model {
        let empty = alternatives.is_empty();
        let model = self.node(Payload::Union(alternatives));
        if empty {
            configure_error(model, "union declared without any alternatives")
        } else {
            model
        }
    }

    /// User-defined validation function; see
    /// [`CustomValidator`](crate::metadata::CustomValidator).
    pub fn custom<F>(&self, f: F) -> Model
    where
        F: Fn(&str, &Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.node(Payload::Custom(Arc::new(f)))
    }

    // --------------------------------------------------------- inference

    /// Infers a model from a JSON-like literal: primitives become type
    /// checks, `null` a literal, arrays become homogeneous arrays or tuples,
    /// objects become object models with required fields.
    pub fn from_value(&self, value: &Value) -> Model {
        match value {
            Value::Null => self.literal(Value::Null),
            Value::Bool(_) => self.bool(),
            Value::Number(_) => self.num(),
            Value::String(_) => self.str(),
            Value::Array(items) => {
                if items.is_empty() {
                    return self.array_any();
                }
                let first = self.from_value(&items[0]);
                let homogeneous = items
                    .iter()
                    .all(|item| self.from_value(item).kind() == first.kind());
                if homogeneous {
                    self.array(first)
                } else {
                    self.tuple(items.iter().map(|item| self.from_value(item)).collect())
                }
            }
            Value::Object(map) => {
                let fields = map
                    .iter()
                    .map(|(k, v)| (k.clone(), self.from_value(v)))
                    .collect();
                self.object(fields)
            }
        }
    }
}

fn configure_error(model: Model, message: &str) -> Model {
    let detail = ErrorDetail::new(ErrorKind::Configure, "<root>", message);
    model.with_recorded_error(detail)
}

// ---------------------------------------------------------------- free fns

/// See [`ModelFactory::raw`].
pub fn raw() -> Model {
    ModelFactory::new().raw()
}

/// See [`ModelFactory::none`].
pub fn none() -> Model {
    ModelFactory::new().none()
}

/// See [`ModelFactory::bool`].
pub fn bool_() -> Model {
    ModelFactory::new().bool()
}

/// See [`ModelFactory::num`].
pub fn num() -> Model {
    ModelFactory::new().num()
}

/// See [`ModelFactory::int`].
pub fn int() -> Model {
    ModelFactory::new().int()
}

/// See [`ModelFactory::str`].
pub fn str_() -> Model {
    ModelFactory::new().str()
}

/// See [`ModelFactory::pattern`].
pub fn pattern(pattern: Regex) -> Model {
    ModelFactory::new().pattern(pattern)
}

/// See [`ModelFactory::literal`].
pub fn literal(value: impl Into<Value>) -> Model {
    ModelFactory::new().literal(value)
}

/// See [`ModelFactory::enum_of`].
pub fn enum_of(members: Vec<Value>) -> Model {
    ModelFactory::new().enum_of(members)
}

/// See [`ModelFactory::object`].
pub fn object<K: Into<String>>(fields: Vec<(K, Model)>) -> Model {
    ModelFactory::new().object(fields)
}

/// See [`ModelFactory::array`].
pub fn array(matcher: Model) -> Model {
    ModelFactory::new().array(matcher)
}

/// See [`ModelFactory::array_any`].
pub fn array_any() -> Model {
    ModelFactory::new().array_any()
}

/// See [`ModelFactory::tuple`].
pub fn tuple(items: Vec<Model>) -> Model {
    ModelFactory::new().tuple(items)
}

/// See [`ModelFactory::union`].
pub fn union(alternatives: Vec<Model>) -> Model {
    ModelFactory::new().union(alternatives)
}

/// See [`ModelFactory::custom`].
pub fn custom<F>(f: F) -> Model
where
    F: Fn(&str, &Value) -> Result<Value, String> + Send + Sync + 'static,
{
    ModelFactory::new().custom(f)
}

/// See [`ModelFactory::from_value`].
pub fn from_value(value: &Value) -> Model {
    ModelFactory::new().from_value(value)
}
