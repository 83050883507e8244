use std::path::Path;

use toml_edit::{DocumentMut, Item, Value};

use crate::error::{ManifestError, Result};
use crate::requirements::{SpecifierKind, find_pin, rewrite_pin};

pub(crate) fn parse(path: &Path, content: &str) -> Result<DocumentMut> {
    content
        .parse::<DocumentMut>()
        .map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Every requirement string under `project.dependencies` and
/// `project.optional-dependencies.*`, in document order.
fn requirement_values(doc: &mut DocumentMut) -> Vec<&mut Value> {
    let mut values = Vec::new();
    let Some(project) = doc.get_mut("project").and_then(Item::as_table_like_mut) else {
        return values;
    };

    let mut arrays = Vec::new();
    for (key, item) in project.iter_mut() {
        match key.get() {
            "dependencies" => arrays.extend(item.as_array_mut()),
            "optional-dependencies" => {
                if let Some(groups) = item.as_table_like_mut() {
                    arrays.extend(groups.iter_mut().filter_map(|(_, g)| g.as_array_mut()));
                }
            }
            _ => {}
        }
    }

    for array in arrays {
        values.extend(array.iter_mut().filter(|v| v.is_str()));
    }
    values
}

pub(crate) fn find(
    doc: &mut DocumentMut,
    package: &str,
) -> Result<Option<(SpecifierKind, String)>> {
    for value in requirement_values(doc) {
        if let Some(found) = value.as_str().map(|s| find_pin(s, package)).transpose()?.flatten() {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

/// Rewrites the pin in place, keeping each string's surrounding decor.
pub(crate) fn rewrite(
    doc: &mut DocumentMut,
    package: &str,
    version: &str,
) -> Result<Option<SpecifierKind>> {
    let Some((kind, _)) = find(doc, package)? else {
        return Ok(None);
    };

    for value in requirement_values(doc) {
        let Some(current) = value.as_str() else {
            continue;
        };
        let Some((updated, matched)) = rewrite_pin(current, package, version)? else {
            continue;
        };
        if matched != kind {
            continue;
        }
        let decor = value.decor().clone();
        *value = Value::from(updated);
        *value.decor_mut() = decor;
    }

    Ok(Some(kind))
}
