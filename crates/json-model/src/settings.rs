//! Per-node behavioral flags.

use serde_json::Value;

use crate::util::json_equal;

/// Behavioral flags attached to one model node.
///
/// The default value is an `Option<Value>` so that an intentional `null`
/// default (`Some(Value::Null)`) stays distinguishable from "no default"
/// (`None`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub optional: bool,
    pub stop_on_error: bool,
    pub remove_faulty: bool,
    pub frozen: bool,
    pub name: Option<String>,
    default: Option<Value>,
}

/// Partial flag set accepted by [`Settings::extend`]. `None` fields keep the
/// current value. Freezing is deliberately not expressible here; it is the
/// dedicated [`Model::freeze`](crate::Model::freeze) operation.
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub optional: Option<bool>,
    pub stop_on_error: Option<bool>,
    pub remove_faulty: Option<bool>,
    pub name: Option<String>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new `Settings` merging only the provided flags, preserving
    /// everything set on `self`. `new_default`, when given, replaces the
    /// current default value.
    pub fn extend(&self, patch: SettingsPatch, new_default: Option<Value>) -> Settings {
        Settings {
            optional: patch.optional.unwrap_or(self.optional),
            stop_on_error: patch.stop_on_error.unwrap_or(self.stop_on_error),
            remove_faulty: patch.remove_faulty.unwrap_or(self.remove_faulty),
            frozen: self.frozen,
            name: patch.name.or_else(|| self.name.clone()),
            default: new_default.or_else(|| self.default.clone()),
        }
    }

    /// Returns a frozen copy carrying the given attribution name.
    pub(crate) fn freeze(&self, name: Option<String>) -> Settings {
        let mut s = self.clone();
        s.frozen = true;
        if name.is_some() {
            s.name = name;
        }
        s
    }

    /// Returns an unfrozen copy.
    pub(crate) fn thaw(&self) -> Settings {
        let mut s = self.clone();
        s.frozen = false;
        s
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub(crate) fn set_default(&mut self, value: Value) {
        self.default = Some(value);
    }

    /// Strict equality check against the configured default; `false` when no
    /// default is set, even for `null`.
    pub fn is_equal_default(&self, value: &Value) -> bool {
        match &self.default {
            Some(d) => json_equal(d, value),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_null_is_distinct_from_unset() {
        let mut with_null = Settings::new();
        with_null.set_default(Value::Null);
        let unset = Settings::new();

        assert!(with_null.has_default());
        assert!(!unset.has_default());
        assert!(with_null.is_equal_default(&Value::Null));
        assert!(!unset.is_equal_default(&Value::Null));
    }

    #[test]
    fn extend_merges_only_provided_flags() {
        let mut base = Settings::new();
        base.optional = true;
        base.set_default(json!(1));

        let out = base.extend(
            SettingsPatch {
                stop_on_error: Some(true),
                ..Default::default()
            },
            None,
        );
        assert!(out.optional);
        assert!(out.stop_on_error);
        assert!(!out.remove_faulty);
        assert_eq!(out.default_value(), Some(&json!(1)));
    }

    #[test]
    fn extend_never_thaws_or_freezes() {
        let frozen = Settings::new().freeze(Some("m".into()));
        let out = frozen.extend(Default::default(), None);
        assert!(out.frozen);
        assert_eq!(out.name.as_deref(), Some("m"));
    }
}
