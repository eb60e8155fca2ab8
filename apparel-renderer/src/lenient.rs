//! Missing variables render as empty output.
//!
//! Liquid and Tera reject a template that names a variable the data does
//! not have. Handlebars renders it as empty, and so should they. The engine
//! renders, and when the only problem is a missing name, that name is set
//! to `null` in a copy of the data and the render is repeated. Any other
//! failure, or a name that cannot be filled (its parent is a scalar or an
//! array, or it is a loop variable), is returned unchanged.

use serde_json::{Map, Value};

/// Upper bound on distinct names filled for one render.
const MAX_FILLS: usize = 64;

/// Run `render` until it succeeds or fails for a reason other than a
/// fillable missing variable.
///
/// `missing` extracts the dotted path of the missing variable from an
/// engine error message. Non-object data is treated as an empty object.
pub(crate) fn render_filling_missing<R, M>(
    data: &Value,
    mut render: R,
    missing: M,
) -> Result<String, String>
where
    R: FnMut(&Value) -> Result<String, String>,
    M: Fn(&str) -> Option<String>,
{
    let mut data = match data {
        Value::Object(_) => data.clone(),
        _ => Value::Object(Map::new()),
    };

    let mut fills = 0;
    loop {
        let message = match render(&data) {
            Ok(output) => return Ok(output),
            Err(message) => message,
        };
        if fills == MAX_FILLS {
            return Err(message);
        }
        let Some(path) = missing(&message) else {
            return Err(message);
        };
        let segments: Vec<&str> = path.split('.').collect();
        if !fill_missing(&mut data, &segments) {
            return Err(message);
        }
        tracing::debug!(variable = %path, "rendering missing variable as empty");
        fills += 1;
    }
}

/// Set `path` to `null`, creating intermediate objects.
///
/// Returns `false` when the leaf already exists or a non-object value sits
/// on the path.
fn fill_missing(data: &mut Value, path: &[&str]) -> bool {
    let Some((leaf, parents)) = path.split_last() else {
        return false;
    };
    if leaf.is_empty() {
        return false;
    }

    let mut current = data;
    for segment in parents {
        let Value::Object(map) = current else {
            return false;
        };
        current = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    match current {
        Value::Object(map) if !map.contains_key(*leaf) => {
            map.insert(leaf.to_string(), Value::Null);
            true
        }
        _ => false,
    }
}

/// Tera: ``Variable `user.nick` not found in context while rendering '…'``.
///
/// Subscripted names (`items[0]`) are not fillable.
pub(crate) fn tera_missing_variable(message: &str) -> Option<String> {
    const OPEN: &str = "Variable `";
    let start = message.find(OPEN)? + OPEN.len();
    let rest = &message[start..];
    let end = rest.find('`')?;
    let name = &rest[..end];
    let fillable = rest[end..].starts_with("` not found in context")
        && !name.is_empty()
        && !name.contains('[');
    fillable.then(|| name.to_string())
}

/// Liquid: `Unknown variable` with `requested variable=nick`, or
/// `Unknown index` with `variable=user` and `requested index=nick`.
pub(crate) fn liquid_missing_variable(message: &str) -> Option<String> {
    let headline = message.lines().next()?;
    let mut requested_variable = None;
    let mut variable = None;
    let mut requested_index = None;
    for line in message.lines().skip(1) {
        match line.trim().split_once('=') {
            Some(("requested variable", v)) => {
                requested_variable.get_or_insert(v);
            }
            Some(("variable", v)) => {
                variable.get_or_insert(v);
            }
            Some(("requested index", v)) => {
                requested_index.get_or_insert(v);
            }
            _ => {}
        }
    }

    if headline.ends_with("Unknown variable") {
        requested_variable
            .filter(|name| *name != "nil")
            .map(str::to_string)
    } else if headline.ends_with("Unknown index") {
        Some(format!("{}.{}", variable?, requested_index?))
    } else {
        None
    }
}
