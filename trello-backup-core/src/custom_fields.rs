//! Resolution of card custom field items against the board's definitions.

use std::collections::HashMap;

use crate::models::{CustomFieldDefinition, CustomFieldItem, CustomFieldValue};

pub const CUSTOM_FIELD_SEPARATOR: &str = " | ";

/// Index definitions by id for lookup while building rows.
pub fn index_definitions(
    definitions: Vec<CustomFieldDefinition>,
) -> HashMap<String, CustomFieldDefinition> {
    definitions
        .into_iter()
        .map(|def| (def.id.clone(), def))
        .collect()
}

/// Render one item as `name=value`, or `None` when its definition is unknown.
///
/// Precedence: text, number, date, checkbox, selected option, then `[unknown]`.
pub fn resolve_custom_field(
    item: &CustomFieldItem,
    definitions: &HashMap<String, CustomFieldDefinition>,
) -> Option<String> {
    let definition = definitions.get(&item.definition_id)?;
    let name = definition.display_name();

    let rendered = match (&item.value, &item.selected_option_id) {
        (CustomFieldValue::Text(v), _)
        | (CustomFieldValue::Number(v), _)
        | (CustomFieldValue::Date(v), _) => v.clone(),
        (CustomFieldValue::Checked(checked), _) => checked.to_string(),
        (CustomFieldValue::None, Some(option_id)) => definition
            .options
            .iter()
            .find(|opt| &opt.id == option_id)
            .map(|opt| opt.display_value().to_string())
            .unwrap_or_else(|| "option".to_string()),
        (CustomFieldValue::None, None) => "[unknown]".to_string(),
    };

    Some(format!("{name}={rendered}"))
}

/// Resolve every item, drop unresolved ones and join the rest.
pub fn format_custom_fields(
    items: &[CustomFieldItem],
    definitions: &HashMap<String, CustomFieldDefinition>,
) -> String {
    items
        .iter()
        .filter_map(|item| resolve_custom_field(item, definitions))
        .collect::<Vec<_>>()
        .join(CUSTOM_FIELD_SEPARATOR)
}
