//! Holds constant string values used throughout the Twist compiler.
#![allow(clippy::missing_docs_in_private_items)]

pub const STYLE_ATTR: &str = "style";
pub const STYLE_PREFIX: &str = "style-";
pub const CLASS_ATTR: &str = "class";
pub const CLASS_NAME_ATTR: &str = "className";
pub const CLASS_PREFIX: &str = "class-";
pub const REF_ATTR: &str = "ref";
pub const KEY_ATTR: &str = "key";
pub const AS_ATTR: &str = "as";
pub const TYPE_ATTR: &str = "type";
pub const ON_CHANGE_ATTR: &str = "onChange";
pub const BIND_NS: &str = "bind";

pub const CONDITION_ATTR: &str = "condition";
pub const VALUE_ATTR: &str = "value";
pub const CHECKED_ATTR: &str = "checked";
pub const FOR_ATTR: &str = "for";
pub const COLLECTION_ATTR: &str = "collection";

pub const MAP_TO_ARRAY: &str = "mapToArray";
pub const MAP: &str = "map";
pub const CALL: &str = "call";
pub const TARGET: &str = "target";
pub const OBJECT: &str = "Object";
pub const ASSIGN: &str = "assign";
pub const SYMBOL: &str = "Symbol";
pub const FUNCTION_TYPE: &str = "function";
pub const UNDEFINED: &str = "undefined";

pub const PROPS: &str = "props";
pub const CONTEXT: &str = "context";
pub const COMPONENT_SUFFIX: &str = "Component";

pub const THROTTLE_UPDATES: &str = "throttleUpdates";
pub const THROTTLE_UPDATES_KEY: &str = "throttleUpdatesProperty";

pub const CLASSES_HELPER: &str = "classes";
pub const STYLES_HELPER: &str = "styles";
pub const RUNTIME_PATH: &str = "src/runtime";

pub const HINT_EVENT: &str = "ev";
pub const HINT_VALUE: &str = "val";
pub const HINT_ELEMENT: &str = "el";
pub const HINT_CHANGE_EVENT: &str = "e";
pub const HINT_ITEM: &str = "item";
pub const HINT_INDEX: &str = "index";
pub const HINT_HANDLER: &str = "handler";
pub const HINT_OBJECT: &str = "object";
pub const HINT_THROTTLE: &str = "t";
