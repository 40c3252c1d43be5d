//! `json-model` — composable runtime validators for JSON-like values.
//!
//! Schemas are immutable trees of [`Model`] nodes built programmatically
//! (see [`factory`]); validating returns either the accepted, possibly
//! transformed value or a structured error/warning report. A published tree
//! is never mutated — every modifier is copy-on-write — so one schema can
//! serve unlimited concurrent validations.
//!
//! # Example
//!
//! ```
//! use json_model::factory::{num, object, str_};
//! use serde_json::json;
//!
//! let schema = object(vec![
//!     ("id", num().min(1.0)),
//!     ("name", str_().optional()),
//! ]);
//!
//! let accepted = schema.validate(&json!({ "id": 7 }));
//! assert!(accepted.is_ok());
//! assert_eq!(accepted.value(), Some(&json!({ "id": 7 })));
//!
//! let rejected = schema.validate(&json!({ "id": 0 }));
//! let error = rejected.error().unwrap();
//! assert_eq!(error.property_path, "<root>.id");
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod factory;
pub mod metadata;
pub mod model;
pub mod settings;
pub mod util;

mod validate;

// Re-export the core public API
pub use config::ModelConfig;
pub use context::{Context, PathSegment, ScopeStack, ScopeToken};
pub use error::{ErrorDetail, ErrorKind, ModelError, Validated};
pub use factory::ModelFactory;
pub use metadata::{CustomValidator, Kind, Metadata, Payload};
pub use model::{FrozenModel, Model};
pub use settings::{Settings, SettingsPatch};
pub use util::json_equal;
