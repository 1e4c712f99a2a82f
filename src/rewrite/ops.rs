use crate::config::{EditSpec, KeyOption};
use crate::tag::{Tag, TagItem};

/// Apply an edit to one field's tag
///
/// Steps run in a fixed order: clear, clear options, remove keys, remove
/// options, add keys, add options, sort. `clear` short-circuits the rest.
pub fn apply_edit(tag: &mut Tag, field_name: &str, edit: &EditSpec) {
    if edit.clear {
        tag.clear();
        return;
    }

    if edit.clear_options {
        for item in tag.items_mut() {
            item.clear_options();
        }
    }

    for key in &edit.remove {
        tag.remove_key(key);
    }

    for KeyOption { key, option } in &edit.remove_options {
        if let Some(item) = tag.get_mut(key) {
            item.remove_option(option);
        }
    }

    for add in &edit.add {
        let explicit = add
            .value
            .as_deref()
            .map(|value| TagItem::from_value(add.key.as_str(), value));

        if let Some(item) = tag.get_mut(&add.key) {
            // Existing names only change on override
            if edit.override_existing {
                match explicit {
                    Some(literal) => {
                        item.name = literal.name.clone();
                        for option in literal.options() {
                            item.add_option(option.as_str());
                        }
                    }
                    None => item.name = edit.transform.apply(field_name),
                }
            }
            continue;
        }

        let item = explicit
            .unwrap_or_else(|| TagItem::new(add.key.as_str(), edit.transform.apply(field_name)));
        tag.set(item);
    }

    // Options never create the key they belong to
    for KeyOption { key, option } in &edit.add_options {
        if let Some(item) = tag.get_mut(key) {
            item.add_option(option.as_str());
        }
    }

    if edit.sort {
        tag.sort_by_key();
    }
}
