//! Per-kind validation algorithms.
//!
//! One recursive match dispatch over the node payload; the [`Context`] is
//! threaded by `&mut` through the whole descent.

use std::panic::{catch_unwind, AssertUnwindSafe};

use serde_json::{Map, Value};

use crate::context::Context;
use crate::error::{ErrorDetail, ErrorKind};
use crate::metadata::{Metadata, Payload};
use crate::model::Model;
use crate::util::json_equal;

type Outcome = Result<Value, Box<ErrorDetail>>;

/// Validates `value` against `model`, inside the entry/exit bracket shared
/// by every node: attribution-name push, stop-on-error scope, and the
/// demote-to-default resolution when the node's own subtree fails while its
/// `stop_on_error` flag is set.
pub(crate) fn validate_model(model: &Model, ctx: &mut Context, value: Value) -> Outcome {
    ctx.push_name(model.settings().name.clone());
    let stop = model.settings().stop_on_error || model.config().stop_on_error;
    let token = if stop { Some(ctx.enter_stop()) } else { None };

    let out = dispatch(model, ctx, value);
    let out = match out {
        Err(detail) if stop => {
            ctx.register_warning(*detail);
            Ok(model
                .settings()
                .default_value()
                .cloned()
                .unwrap_or(Value::Null))
        }
        other => other,
    };

    if let Some(token) = token {
        ctx.exit_stop(token);
    }
    ctx.pop_name();
    out
}

fn dispatch(model: &Model, ctx: &mut Context, value: Value) -> Outcome {
    let meta = model.metadata();
    match &meta.payload {
        Payload::Raw => Ok(value),

        Payload::None => Err(fail(
            ctx,
            ErrorKind::NotConfigured,
            "model is not configured and accepts no value",
            Some(&value),
        )),

        Payload::Bool => {
            if value.is_boolean() {
                Ok(value)
            } else {
                Err(fail(ctx, ErrorKind::FaultyValue, "expected a boolean", Some(&value)))
            }
        }

        Payload::Num { integer } => validate_num(meta, *integer, ctx, value),

        Payload::Str { patterns } => validate_str(meta, patterns, ctx, value),

        Payload::Literal(expected) => {
            if json_equal(&value, expected) {
                Ok(value)
            } else {
                Err(fail(
                    ctx,
                    ErrorKind::FaultyValue,
                    format!("expected the literal {expected}"),
                    Some(&value),
                ))
            }
        }

        Payload::Enum(members) => {
            if members.iter().any(|m| json_equal(&value, m)) {
                Ok(value)
            } else {
                Err(fail(
                    ctx,
                    ErrorKind::FaultyValue,
                    "value is not a member of the enum",
                    Some(&value),
                ))
            }
        }

        Payload::Object(children) => validate_object(children, ctx, value),

        Payload::Array(matcher) => validate_array(model, matcher.as_deref(), ctx, value),

        Payload::Tuple(children) => validate_tuple(children, ctx, value),

        Payload::Union(alternatives) => validate_union(alternatives, ctx, value),

        Payload::Custom(f) => validate_custom(f.as_ref(), ctx, value),

        Payload::Pipe(stages) => {
            let mut current = value;
            for stage in stages {
                current = validate_model(stage, ctx, current)?;
            }
            Ok(current)
        }
    }
}

// ------------------------------------------------------------------ leaves

fn validate_num(meta: &Metadata, integer: bool, ctx: &mut Context, value: Value) -> Outcome {
    let num = match value.as_f64() {
        Some(n) => n,
        None => return Err(fail(ctx, ErrorKind::FaultyValue, "expected a number", Some(&value))),
    };
    if integer && num.fract() != 0.0 {
        return Err(fail(ctx, ErrorKind::FaultyValue, "expected an integer", Some(&value)));
    }
    check_bounds(meta, num, "value", ctx, &value)?;
    Ok(value)
}

fn validate_str(
    meta: &Metadata,
    patterns: &[regex::Regex],
    ctx: &mut Context,
    value: Value,
) -> Outcome {
    let s = match value.as_str() {
        Some(s) => s,
        None => return Err(fail(ctx, ErrorKind::FaultyValue, "expected a string", Some(&value))),
    };
    check_bounds(meta, s.chars().count() as f64, "length", ctx, &value)?;
    if !patterns.is_empty() && !patterns.iter().any(|re| re.is_match(s)) {
        return Err(fail(
            ctx,
            ErrorKind::FaultyValue,
            "string matches none of the configured patterns",
            Some(&value),
        ));
    }
    Ok(value)
}

fn check_bounds(
    meta: &Metadata,
    num: f64,
    what: &str,
    ctx: &Context,
    value: &Value,
) -> Result<(), Box<ErrorDetail>> {
    if let Some(min) = meta.min {
        let below = if meta.exclusive { num <= min } else { num < min };
        if below {
            let op = if meta.exclusive { "above" } else { "at least" };
            return Err(fail(
                ctx,
                ErrorKind::FaultyValue,
                format!("{what} must be {op} {min}"),
                Some(value),
            ));
        }
    }
    if let Some(max) = meta.max {
        let above = if meta.exclusive { num >= max } else { num > max };
        if above {
            let op = if meta.exclusive { "below" } else { "at most" };
            return Err(fail(
                ctx,
                ErrorKind::FaultyValue,
                format!("{what} must be {op} {max}"),
                Some(value),
            ));
        }
    }
    Ok(())
}

// -------------------------------------------------------------- containers

fn validate_object(children: &[Model], ctx: &mut Context, value: Value) -> Outcome {
    let obj = match value.as_object() {
        Some(o) => o,
        None => return Err(fail(ctx, ErrorKind::FaultyValue, "expected an object", Some(&value))),
    };

    let mut out = Map::with_capacity(children.len());
    for child in children {
        let key = match child.key() {
            Some(k) => k,
            None => {
                return Err(fail(
                    ctx,
                    ErrorKind::Configure,
                    "object child model has no property key",
                    None,
                ))
            }
        };
        ctx.push_prop(key);
        let step = match obj.get(key) {
            Some(present) => match validate_model(child, ctx, present.clone()) {
                Ok(validated) => {
                    out.insert(key.to_string(), validated);
                    Ok(())
                }
                Err(e) => Err(e),
            },
            None if child.settings().optional => {
                if let Some(default) = child.settings().default_value() {
                    out.insert(key.to_string(), default.clone());
                }
                Ok(())
            }
            None => Err(fail(
                ctx,
                ErrorKind::RequiredProperty,
                format!("missing required property `{key}`"),
                None,
            )),
        };
        ctx.pop_path();
        step?;
    }
    Ok(Value::Object(out))
}

fn validate_array(
    model: &Model,
    matcher: Option<&Model>,
    ctx: &mut Context,
    value: Value,
) -> Outcome {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(fail(ctx, ErrorKind::FaultyValue, "expected an array", Some(&other)))
        }
    };

    check_length(model.metadata(), items.len(), ctx)?;

    let matcher = match matcher {
        Some(m) => m,
        None => return Ok(Value::Array(items)),
    };

    // An already-active warning-only scope wins over remove-faulty: the
    // array validates strictly and failures are demoted by the outer scope.
    let remove = (model.settings().remove_faulty || model.config().remove_faulty)
        && !ctx.warn_only_active();

    if remove {
        let token = ctx.enter_warn_only();
        let mut kept = Vec::with_capacity(items.len());
        for (i, item) in items.into_iter().enumerate() {
            ctx.push_index(i);
            match validate_model(matcher, ctx, item) {
                Ok(v) => kept.push(v),
                Err(detail) => ctx.register_warning(*detail),
            }
            ctx.pop_path();
        }
        ctx.exit_warn_only(token);
        // Bounds are re-checked against the post-filter count.
        check_length(model.metadata(), kept.len(), ctx)?;
        Ok(Value::Array(kept))
    } else {
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.into_iter().enumerate() {
            ctx.push_index(i);
            let step = validate_model(matcher, ctx, item);
            ctx.pop_path();
            out.push(step?);
        }
        Ok(Value::Array(out))
    }
}

fn check_length(meta: &Metadata, len: usize, ctx: &Context) -> Result<(), Box<ErrorDetail>> {
    check_bounds(meta, len as f64, "element count", ctx, &Value::from(len))
}

fn validate_tuple(children: &[Model], ctx: &mut Context, value: Value) -> Outcome {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(fail(ctx, ErrorKind::FaultyValue, "expected an array", Some(&other)))
        }
    };
    if items.len() != children.len() {
        return Err(fail(
            ctx,
            ErrorKind::FaultyValue,
            format!("expected exactly {} elements, got {}", children.len(), items.len()),
            Some(&Value::Array(items)),
        ));
    }
    let mut out = Vec::with_capacity(children.len());
    for (i, (child, item)) in children.iter().zip(items).enumerate() {
        ctx.push_index(i);
        let step = validate_model(child, ctx, item);
        ctx.pop_path();
        out.push(step?);
    }
    Ok(Value::Array(out))
}

fn validate_union(alternatives: &[Model], ctx: &mut Context, value: Value) -> Outcome {
    let token = ctx.enter_matching();
    let mut trial_errors: Vec<ErrorDetail> = Vec::new();
    for alternative in alternatives {
        match validate_model(alternative, ctx, value.clone()) {
            Ok(v) => {
                // First success wins; earlier alternatives break ties.
                ctx.exit_matching(token);
                return Ok(v);
            }
            Err(detail) => {
                ctx.rollback_trial(token);
                if !trial_errors.contains(detail.as_ref()) {
                    trial_errors.push(*detail);
                }
            }
        }
    }
    ctx.exit_matching(token);
    let mut detail = fail(
        ctx,
        ErrorKind::FaultyValue,
        format!("no union alternative matched ({} tried)", alternatives.len()),
        Some(&value),
    );
    detail.errors = trial_errors;
    Err(detail)
}

// ----------------------------------------------------------------- custom

fn validate_custom(
    f: &(dyn Fn(&str, &Value) -> Result<Value, String> + Send + Sync),
    ctx: &mut Context,
    value: Value,
) -> Outcome {
    let path = ctx.path_string();
    let outcome = catch_unwind(AssertUnwindSafe(|| f(&path, &value)));
    match outcome {
        Ok(Ok(out)) => Ok(out),
        Ok(Err(message)) => Err(fail(ctx, ErrorKind::FaultyValue, message, Some(&value))),
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "custom validator panicked".to_string());
            Err(fail(
                ctx,
                ErrorKind::Unknown,
                format!("custom validator panicked: {message}"),
                Some(&value),
            ))
        }
    }
}

fn fail(
    ctx: &Context,
    kind: ErrorKind,
    message: impl Into<String>,
    value: Option<&Value>,
) -> Box<ErrorDetail> {
    let mut detail = ErrorDetail::new(kind, ctx.path_string(), message)
        .with_name(ctx.current_name().map(str::to_string));
    if let Some(value) = value {
        detail = detail.with_value(value);
    }
    Box::new(detail)
}
