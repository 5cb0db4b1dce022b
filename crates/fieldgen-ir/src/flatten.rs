//! Flat-view projection: replacing selected embedded fields with their
//! nested model's fields under composite `parent.child` names.
//!
//! This is a derived view. The input model is never modified and the
//! composite names are naming-only; they are not legal identifiers until
//! sanitized.

use std::collections::BTreeSet;
use tracing::warn;

use crate::model::{Model, ModelArena, ModelId};

/// Projects `id` with every field named in `selected` (that is embedded or
/// otherwise carries a nested model) replaced by its nested fields.
///
/// Selection descends through composite names: selecting `base` and
/// `base.meta` flattens two levels. Selected names without a nested model
/// are left as-is.
pub fn flatten(arena: &ModelArena, id: ModelId, selected: &BTreeSet<String>) -> Model {
    let model = &arena[id];
    let mut out = Model::placeholder(&model.type_name, model.generics.clone());
    out.module_path = model.module_path.clone();

    for name in &model.field_names {
        let Some(ty) = model.fields_type.get(name) else {
            continue;
        };
        let nested = ty.model.filter(|_| selected.contains(name));
        match nested {
            Some(nested_id) => {
                let inner = flatten(arena, nested_id, &descend(selected, name));
                for child in &inner.field_names {
                    let composite = format!("{name}.{child}");
                    if out.fields_type.contains_key(&composite) {
                        warn!(field = %composite, "duplicate flattened field, keeping the first");
                        continue;
                    }
                    let Some(child_ty) = inner.fields_type.get(child) else {
                        continue;
                    };
                    out.field_names.push(composite.clone());
                    out.fields_type.insert(composite.clone(), child_ty.clone());
                    if let Some(tags) = inner.fields_tag_value.get(child) {
                        out.fields_tag_value.insert(composite, tags.clone());
                    }
                }
            }
            None => {
                if out.fields_type.contains_key(name) {
                    warn!(field = %name, "duplicate flattened field, keeping the first");
                    continue;
                }
                out.field_names.push(name.clone());
                out.fields_type.insert(name.clone(), ty.clone());
                if let Some(tags) = model.fields_tag_value.get(name) {
                    out.fields_tag_value.insert(name.clone(), tags.clone());
                }
            }
        }
    }
    out
}

/// Selection entries below `parent`, with the prefix stripped.
fn descend(selected: &BTreeSet<String>, parent: &str) -> BTreeSet<String> {
    let prefix = format!("{parent}.");
    selected
        .iter()
        .filter_map(|s| s.strip_prefix(&prefix))
        .map(str::to_string)
        .collect()
}
