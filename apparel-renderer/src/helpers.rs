//! Handlebars helper library and matching Tera filters.
//!
//! Registered once on the Handlebars registry, next to the built-ins
//! (`if`, `each`, `eq`, `and`, `len`, …):
//!
//! | Group       | Helpers                                                                 |
//! |-------------|-------------------------------------------------------------------------|
//! | block       | `repeat`                                                                |
//! | string      | `uppercase` `lowercase` `capitalize` `trim` `append` `prepend` `replace` `truncate` `split` `startsWith` `endsWith` |
//! | case        | `camelcase` `pascalcase` `snakecase` `dashcase`                         |
//! | math        | `add` `subtract` `multiply` `divide` `modulo` `floor` `ceil` `round`    |
//! | collections | `join` `first` `last` `contains` `default` `json`                       |

use std::collections::HashMap;

use handlebars::{
    handlebars_helper, to_json, BlockContext, Context, Handlebars, Helper, HelperDef,
    HelperResult, JsonValue as Json, Output, RenderContext, RenderErrorReason, Renderable,
};
use heck::{ToKebabCase, ToLowerCamelCase, ToPascalCase, ToSnakeCase};

// ---------------------------------------------------------------------------
// repeat
// ---------------------------------------------------------------------------

/// `{{#repeat 3}}…{{/repeat}}` or `{{#repeat count=3 start=1 step=2}}…{{/repeat}}`.
///
/// `@index` holds the current counter (`start + i * step`); `@first` and
/// `@last` mark the ends. A zero count renders the `{{else}}` block.
#[derive(Clone, Copy, Debug)]
pub struct RepeatHelper;

impl HelperDef for RepeatHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let count = h
            .param(0)
            .map(|p| p.value())
            .or_else(|| h.hash_get("count").map(|p| p.value()))
            .and_then(as_integer)
            .ok_or_else(|| {
                RenderErrorReason::Other("repeat expects a count, e.g. {{#repeat 3}}".to_string())
            })?;
        let start = h.hash_get("start").and_then(|p| as_integer(p.value())).unwrap_or(0);
        let step = h.hash_get("step").and_then(|p| as_integer(p.value())).unwrap_or(1);

        if count <= 0 {
            if let Some(inverse) = h.inverse() {
                inverse.render(r, ctx, rc, out)?;
            }
            return Ok(());
        }

        let Some(template) = h.template() else {
            return Ok(());
        };

        // The counter is linear in `i`, so both ends fitting means every step fits.
        (count - 1)
            .checked_mul(step)
            .and_then(|span| start.checked_add(span))
            .ok_or_else(|| {
                RenderErrorReason::Other(format!(
                    "repeat counter overflows (count={count}, start={start}, step={step})"
                ))
            })?;

        // Inherit the enclosing block so relative paths keep resolving
        // against the current `each`/`with` scope.
        let block = rc.block().cloned().unwrap_or_else(BlockContext::new);
        rc.push_block(block);
        for i in 0..count {
            if let Some(block) = rc.block_mut() {
                block.set_local_var("index", to_json(start + i * step));
                block.set_local_var("first", to_json(i == 0));
                block.set_local_var("last", to_json(i == count - 1));
            }
            template.render(r, ctx, rc, out)?;
        }
        rc.pop_block();
        Ok(())
    }
}

fn as_integer(value: &Json) -> Option<i64> {
    match value {
        Json::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Json::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// string
// ---------------------------------------------------------------------------

fn display(value: &Json) -> String {
    match value {
        Json::Null => String::new(),
        Json::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(head) => head.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

handlebars_helper!(uppercase: |s: Json| display(s).to_uppercase());
handlebars_helper!(lowercase: |s: Json| display(s).to_lowercase());
handlebars_helper!(capitalize: |s: Json| capitalize_first(&display(s)));
handlebars_helper!(trim: |s: Json| display(s).trim().to_string());
handlebars_helper!(append: |s: Json, suffix: Json| format!("{}{}", display(s), display(suffix)));
handlebars_helper!(prepend: |s: Json, prefix: Json| format!("{}{}", display(prefix), display(s)));
handlebars_helper!(replace: |s: Json, from: str, to: str| display(s).replace(from, to));
handlebars_helper!(truncate: |s: Json, limit: u64| {
    display(s).chars().take(limit as usize).collect::<String>()
});
handlebars_helper!(split: |s: Json, sep: str| {
    display(s)
        .split(sep)
        .map(|part| Json::String(part.to_string()))
        .collect::<Vec<_>>()
});
handlebars_helper!(starts_with: |s: Json, prefix: str| display(s).starts_with(prefix));
handlebars_helper!(ends_with: |s: Json, suffix: str| display(s).ends_with(suffix));

// ---------------------------------------------------------------------------
// case
// ---------------------------------------------------------------------------

handlebars_helper!(camelcase: |s: Json| display(s).to_lower_camel_case());
handlebars_helper!(pascalcase: |s: Json| display(s).to_pascal_case());
handlebars_helper!(snakecase: |s: Json| display(s).to_snake_case());
handlebars_helper!(dashcase: |s: Json| display(s).to_kebab_case());

// ---------------------------------------------------------------------------
// math
// ---------------------------------------------------------------------------

fn as_float(value: &Json) -> f64 {
    match value {
        Json::Number(n) => n.as_f64().unwrap_or(0.0),
        Json::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        Json::Bool(b) => f64::from(u8::from(*b)),
        _ => f64::NAN,
    }
}

/// Integer arithmetic when both sides are integers and the result is exact,
/// float arithmetic otherwise.
fn arith(
    a: &Json,
    b: &Json,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Json {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        if let Some(result) = int_op(x, y) {
            return Json::from(result);
        }
    }
    Json::from(float_op(as_float(a), as_float(b)))
}

fn rounded(value: f64) -> Json {
    if value.is_finite() && value.abs() < i64::MAX as f64 {
        Json::from(value as i64)
    } else {
        Json::Null
    }
}

handlebars_helper!(add: |a: Json, b: Json| arith(a, b, i64::checked_add, |x, y| x + y));
handlebars_helper!(subtract: |a: Json, b: Json| arith(a, b, i64::checked_sub, |x, y| x - y));
handlebars_helper!(multiply: |a: Json, b: Json| arith(a, b, i64::checked_mul, |x, y| x * y));
handlebars_helper!(divide: |a: Json, b: Json| arith(
    a,
    b,
    |x, y| (y != 0 && x % y == 0).then(|| x / y),
    |x, y| x / y
));
handlebars_helper!(modulo: |a: Json, b: Json| arith(a, b, i64::checked_rem, |x, y| x % y));
handlebars_helper!(floor: |a: Json| rounded(as_float(a).floor()));
handlebars_helper!(ceil: |a: Json| rounded(as_float(a).ceil()));
handlebars_helper!(round: |a: Json| rounded(as_float(a).round()));

// ---------------------------------------------------------------------------
// collections
// ---------------------------------------------------------------------------

handlebars_helper!(join: |items: array, sep: str| {
    items.iter().map(display).collect::<Vec<_>>().join(sep)
});
handlebars_helper!(first: |items: array| items.first().cloned().unwrap_or(Json::Null));
handlebars_helper!(last: |items: array| items.last().cloned().unwrap_or(Json::Null));
handlebars_helper!(contains: |haystack: Json, needle: Json| match haystack {
    Json::Array(items) => items.contains(needle),
    Json::String(s) => s.contains(display(needle).as_str()),
    Json::Object(map) => map.contains_key(display(needle).as_str()),
    _ => false,
});
handlebars_helper!(default_value: |value: Json, fallback: Json| {
    match value {
        Json::Null => fallback.clone(),
        Json::String(s) if s.is_empty() => fallback.clone(),
        other => other.clone(),
    }
});
handlebars_helper!(json: |value: Json| value.to_string());

/// Register the full helper library on `registry`.
pub fn register_all(registry: &mut Handlebars<'_>) {
    registry.register_helper("repeat", Box::new(RepeatHelper));

    registry.register_helper("uppercase", Box::new(uppercase));
    registry.register_helper("lowercase", Box::new(lowercase));
    registry.register_helper("capitalize", Box::new(capitalize));
    registry.register_helper("trim", Box::new(trim));
    registry.register_helper("append", Box::new(append));
    registry.register_helper("prepend", Box::new(prepend));
    registry.register_helper("replace", Box::new(replace));
    registry.register_helper("truncate", Box::new(truncate));
    registry.register_helper("split", Box::new(split));
    registry.register_helper("startsWith", Box::new(starts_with));
    registry.register_helper("endsWith", Box::new(ends_with));

    registry.register_helper("camelcase", Box::new(camelcase));
    registry.register_helper("pascalcase", Box::new(pascalcase));
    registry.register_helper("snakecase", Box::new(snakecase));
    registry.register_helper("dashcase", Box::new(dashcase));

    registry.register_helper("add", Box::new(add));
    registry.register_helper("subtract", Box::new(subtract));
    registry.register_helper("multiply", Box::new(multiply));
    registry.register_helper("divide", Box::new(divide));
    registry.register_helper("modulo", Box::new(modulo));
    registry.register_helper("floor", Box::new(floor));
    registry.register_helper("ceil", Box::new(ceil));
    registry.register_helper("round", Box::new(round));

    registry.register_helper("join", Box::new(join));
    registry.register_helper("first", Box::new(first));
    registry.register_helper("last", Box::new(last));
    registry.register_helper("contains", Box::new(contains));
    registry.register_helper("default", Box::new(default_value));
    registry.register_helper("json", Box::new(json));
}

// ---------------------------------------------------------------------------
// Tera filters (jinja templates)
// ---------------------------------------------------------------------------

fn case_filter(
    name: &str,
    value: &tera::Value,
    convert: fn(&str) -> String,
) -> tera::Result<tera::Value> {
    let s = value
        .as_str()
        .ok_or_else(|| tera::Error::msg(format!("{name} filter expects a string")))?;
    Ok(tera::Value::String(convert(s)))
}

pub(crate) fn snake_case(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    case_filter("snake_case", value, |s| s.to_snake_case())
}

pub(crate) fn pascal_case(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    case_filter("pascal_case", value, |s| s.to_pascal_case())
}

pub(crate) fn camel_case(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    case_filter("camel_case", value, |s| s.to_lower_camel_case())
}

pub(crate) fn kebab_case(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    case_filter("kebab_case", value, |s| s.to_kebab_case())
}
