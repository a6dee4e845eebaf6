//! Transform options.
//!
//! Every transform can be toggled independently; all of them are on by
//! default. Options deserialize from the same camel-cased JSON shape the
//! build configuration uses, e.g.
//!
//! ```json
//! {
//! 	"moduleName": "@twist/react",
//! 	"arrowLifting": false,
//! 	"autoImport": {
//! 		"ui:button": { "module": "my-ui-library", "export": "Button" }
//! 	}
//! }
//! ```

use indexmap::IndexMap;
use serde::Deserialize;

/// Options accepted by [`crate::transform()`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[expect(clippy::struct_excessive_bools)]
pub struct TransformOptions {
	/// Normalize `ref` attributes into callbacks.
	pub ref_attribute: bool,
	/// Canonicalize constructors of decorated components to `(props, context)`.
	pub constructor_props: bool,
	/// Merge `style`, `style-*` and spread styles.
	pub style_attribute: bool,
	/// Merge `class`, `className`, `class-*` and spread class names.
	pub class_attribute: bool,
	/// Lower `if`, `switch`, `repeat`, `using` and `g` tags.
	pub control_flow: bool,
	/// Hoist `<Parent:slot>` children into attributes of the parent.
	pub named_children: bool,
	/// Turn children of elements with an `as` attribute into a render function.
	pub as_attribute: bool,
	/// Expand `bind:*` directives.
	pub bind_attribute: bool,
	/// Lift arrow-function attribute values out of render methods.
	pub arrow_lifting: bool,
	/// Lift plain object literal attribute values out of render methods.
	pub object_lifting: bool,
	/// Guard `onChange` handlers of form inputs inside components.
	pub controlled_input: bool,
	/// Tags and decorators that are imported on use.
	pub auto_import: AutoImportTable,
	/// Package that provides the runtime helpers.
	///
	/// When absent, helpers are inlined into the output.
	pub module_name: Option<String>,
}

impl Default for TransformOptions {
	fn default() -> Self {
		Self {
			ref_attribute: true,
			constructor_props: true,
			style_attribute: true,
			class_attribute: true,
			control_flow: true,
			named_children: true,
			as_attribute: true,
			bind_attribute: true,
			arrow_lifting: true,
			object_lifting: true,
			controlled_input: true,
			auto_import: AutoImportTable::default(),
			module_name: None,
		}
	}
}

/// Maps a tag name (`ui:button`, `Button`) or decorator name to the import
/// that provides it.
pub type AutoImportTable = IndexMap<String, ImportDescriptor>;

/// Describes a single named import.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImportDescriptor {
	/// The module specifier to import from.
	pub module: String,
	/// The exported name.
	pub export: String,
	/// For decorators: the base class that decorated classes extend when
	/// they do not declare one.
	#[serde(default)]
	pub inherits: Option<Box<ImportDescriptor>>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_enable_everything() {
		let options: TransformOptions = serde_json::from_str("{}").unwrap();
		assert!(options.ref_attribute && options.control_flow && options.arrow_lifting);
		assert!(options.auto_import.is_empty());
		assert_eq!(options.module_name, None);
	}

	#[test]
	fn reads_camel_case_json() {
		let options: TransformOptions = serde_json::from_str(
			r#"{
				"moduleName": "@twist/react",
				"bindAttribute": false,
				"autoImport": {
					"Component": {
						"module": "@twist/core",
						"export": "Component",
						"inherits": { "module": "@twist/core", "export": "BaseComponent" }
					}
				}
			}"#,
		)
		.unwrap();

		assert!(!options.bind_attribute);
		assert!(options.style_attribute);
		assert_eq!(options.module_name.as_deref(), Some("@twist/react"));

		let component = &options.auto_import["Component"];
		assert_eq!(component.export, "Component");
		assert_eq!(
			component.inherits.as_deref().map(|d| d.export.as_str()),
			Some("BaseComponent")
		);
	}
}
