//! Naming conventions shared by every container
//!
//! Element attributes come in two flavours:
//! - **Fixed fields**: the same well-known names for every container
//! - **Properties**: container-specific attributes, addressed as
//!   `PROPERTY_<code>` everywhere in this crate
//!
//! The prefix is both the allowlist convention and the discriminator the
//! persister uses to route a value into the nested property payload.

use serde_json::Value;

/// Prefix that turns a property code into an attribute name
pub const PROPERTY_PREFIX: &str = "PROPERTY_";

/// Payload key under which property values are nested on write
pub const PROPERTY_VALUES_KEY: &str = "PROPERTY_VALUES";

/// Field carrying the owning container id
pub const CONTAINER_FIELD: &str = "IBLOCK_ID";

/// Field carrying the element id
pub const ID_FIELD: &str = "ID";

/// Field carrying the active flag
pub const ACTIVE_FIELD: &str = "ACTIVE";

/// Value of [`ACTIVE_FIELD`] for active elements
pub const ACTIVE_YES: &str = "Y";

/// Marker the element service puts in front of unescaped duplicate keys
const SERVICE_ALIAS_MARKER: char = '~';

/// Suffixes the element service appends to enumerated/multi-language helpers
const SERVICE_ALIAS_SUFFIXES: [&str; 2] = ["_VALUE", "_VALUE_ID"];

/// Fixed fields accepted for every element, independent of its container
pub const FIXED_FIELD_NAMES: [&str; 33] = [
    "ID",
    "CODE",
    "EXTERNAL_ID",
    "XML_ID",
    "IBLOCK_ID",
    "IBLOCK_SECTION_ID",
    "IBLOCK_CODE",
    "ACTIVE",
    "ACTIVE_FROM",
    "ACTIVE_TO",
    "SORT",
    "PREVIEW_PICTURE",
    "PREVIEW_TEXT",
    "PREVIEW_TEXT_TYPE",
    "DETAIL_PICTURE",
    "DETAIL_TEXT",
    "DETAIL_TEXT_TYPE",
    "SEARCHABLE_CONTENT",
    "DATE_CREATE",
    "CREATED_BY",
    "CREATED_USER_NAME",
    "TIMESTAMP_X",
    "MODIFIED_BY",
    "USER_NAME",
    "LANG_DIR",
    "LIST_PAGE_URL",
    "DETAIL_PAGE_URL",
    "SHOW_COUNTER",
    "SHOW_COUNTER_START",
    "WF_COMMENTS",
    "WF_STATUS_ID",
    "LOCK_STATUS",
    "TAGS",
];

/// Check whether `name` is one of the fixed fields
pub fn is_fixed_field(name: &str) -> bool {
    FIXED_FIELD_NAMES.contains(&name)
}

/// Build the attribute name for a property code
pub fn property_name(code: &str) -> String {
    format!("{PROPERTY_PREFIX}{code}")
}

/// Extract the property code from an attribute name, if it is one
pub fn property_code(name: &str) -> Option<&str> {
    name.strip_prefix(PROPERTY_PREFIX)
}

/// Check whether a raw field key is a service-side helper rather than a field
///
/// The element service returns, next to each field, an unescaped copy
/// (`~NAME`) and for enumerations `<NAME>_VALUE` / `<NAME>_VALUE_ID` helpers.
/// None of these are fields of their own.
pub fn is_service_alias(name: &str) -> bool {
    name.starts_with(SERVICE_ALIAS_MARKER)
        || SERVICE_ALIAS_SUFFIXES
            .iter()
            .any(|suffix| name.ends_with(suffix))
}

/// Loose truthiness as the content platform evaluates filter values
///
/// `null`, `false`, `0`, `""`, `"0"` and empty arrays/objects are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !(text.is_empty() || text == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Parse an id the way the platform reports it: a JSON number or a string of
/// ASCII digits. Zero is not an id.
pub fn parse_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => parse_id_literal(text),
        _ => None,
    }
    .filter(|id| *id > 0)
}

/// Parse a non-negative integer literal made only of ASCII digits
pub fn parse_id_literal(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
