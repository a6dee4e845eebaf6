//! Runtime helpers shipped alongside compiled output, and the compile-time
//! mirror of their semantics.
//!
//! The style transform folds what it can statically and hands the rest to
//! `styles` at run time; class contributions always go to `classes`. The
//! style parsing functions here follow the `styles` helper, so folded and
//! merged values agree.

/// A helper function that compiled output may call at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeHelper {
	/// `classes(...values)`: joins class tokens.
	Classes,
	/// `styles(...values)`: merges style strings and objects.
	Styles,
}

impl RuntimeHelper {
	/// All helpers, in a stable order.
	pub const ALL: [Self; 2] = [Self::Classes, Self::Styles];

	/// The helper's function name, also used as its module file stem.
	#[must_use]
	pub fn name(self) -> &'static str {
		match self {
			Self::Classes => crate::constants::CLASSES_HELPER,
			Self::Styles => crate::constants::STYLES_HELPER,
		}
	}

	/// The helper's JavaScript module source (a single default export).
	#[must_use]
	pub fn source(self) -> &'static str {
		match self {
			Self::Classes => include_str!("../runtime/classes.js"),
			Self::Styles => include_str!("../runtime/styles.js"),
		}
	}

	/// The import specifier of this helper within the runtime package.
	#[must_use]
	pub fn module_specifier(self, module_name: &str) -> String {
		format!(
			"{module_name}/{}/{}",
			crate::constants::RUNTIME_PATH,
			self.name()
		)
	}
}

/// Camel-cases a hyphenated CSS property name (`font-size` → `fontSize`).
///
/// Runs of hyphens collapse; the character after them is upper-cased.
#[must_use]
pub fn camel_case(name: &str) -> String {
	let mut out = String::with_capacity(name.len());
	let mut chars = name.chars().peekable();

	while let Some(c) = chars.next() {
		if c == '-' {
			while chars.next_if_eq(&'-').is_some() {}
			if let Some(next) = chars.next() {
				out.extend(next.to_uppercase());
			}
		} else {
			out.push(c);
		}
	}

	out
}

/// Whether a style string contains at least one `key: value` declaration.
///
/// A lone string without one is passed through untouched by the runtime
/// helper (some libraries use `style` for non-CSS data).
#[must_use]
pub fn looks_like_css(source: &str) -> bool {
	source.contains(':')
}

/// Splits an inline style string into declarations.
///
/// Semicolons directly followed by `base64` do not split, so `data:` URIs
/// survive. This is a heuristic, not a CSS grammar.
fn split_declarations(source: &str) -> impl Iterator<Item = &str> {
	let mut start = 0;
	let mut pieces = Vec::new();

	for (index, _) in source.match_indices(';') {
		if !source[index + 1..].starts_with("base64") {
			pieces.push(&source[start..index]);
			start = index + 1;
		}
	}

	pieces.push(&source[start..]);
	pieces.into_iter()
}

/// Parses an inline style string into camel-cased `(property, value)` pairs.
///
/// Each declaration splits on its first `:`; both halves are trimmed.
/// Declarations without a colon are skipped. A repeated property keeps its
/// first position and takes the last value.
#[must_use]
pub fn parse_style_declarations(source: &str) -> Vec<(String, String)> {
	let mut declarations: Vec<(String, String)> = Vec::new();

	for declaration in split_declarations(source) {
		let Some((key, value)) = declaration.split_once(':') else {
			continue;
		};

		let key = camel_case(key.trim());
		let value = value.trim().to_string();

		if let Some(existing) = declarations.iter_mut().find(|(k, _)| *k == key) {
			existing.1 = value;
		} else {
			declarations.push((key, value));
		}
	}

	declarations
}

#[cfg(test)]
mod tests {
	use super::*;

	/// A single argument to the class joiner.
	#[derive(Debug, Clone, PartialEq, Eq)]
	enum ClassValue<'s> {
		/// A class string, kept as one token.
		Str(&'s str),
		/// An array; its entries are flattened in.
		List(Vec<&'s str>),
		/// An object; keys with truthy values become tokens.
		Flags(Vec<(&'s str, bool)>),
		/// `null`, `undefined`, `false` and friends.
		Empty,
	}

	/// Joins class values the way `runtime/classes.js` does.
	fn join_classes(values: &[ClassValue<'_>]) -> String {
		let mut tokens: Vec<&str> = Vec::new();

		for value in values {
			match value {
				ClassValue::Str(s) => tokens.push(s),
				ClassValue::List(list) => tokens.extend(list.iter().copied()),
				ClassValue::Flags(flags) => {
					tokens.extend(flags.iter().filter(|(_, on)| *on).map(|(k, _)| *k));
				}
				ClassValue::Empty => {}
			}
		}

		tokens.retain(|t| !t.is_empty());
		tokens.join(" ")
	}

	fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
		list.iter()
			.map(|(k, v)| ((*k).to_string(), (*v).to_string()))
			.collect()
	}

	#[test]
	fn camel_cases_property_names() {
		assert_eq!(camel_case("font-size"), "fontSize");
		assert_eq!(camel_case("-webkit-transition"), "WebkitTransition");
		assert_eq!(camel_case("border--top"), "borderTop");
		assert_eq!(camel_case("trailing-"), "trailing");
		assert_eq!(camel_case("color"), "color");
	}

	#[test]
	fn parses_simple_declarations() {
		assert_eq!(
			parse_style_declarations("font-size: 10px; font-weight: bold"),
			pairs(&[("fontSize", "10px"), ("fontWeight", "bold")])
		);
	}

	#[test]
	fn keeps_data_uris_intact() {
		assert_eq!(
			parse_style_declarations(
				"background: url(data:image/png;base64,abcde); color: red"
			),
			pairs(&[
				("background", "url(data:image/png;base64,abcde)"),
				("color", "red")
			])
		);
	}

	#[test]
	fn later_declarations_override() {
		assert_eq!(
			parse_style_declarations("color: red; margin: 0; color: blue;"),
			pairs(&[("color", "blue"), ("margin", "0")])
		);
	}

	#[test]
	fn skips_fragments_without_colon() {
		assert!(parse_style_declarations("just-a-string").is_empty());
		assert!(!looks_like_css("just-a-string"));
		assert!(looks_like_css("color: red"));
	}

	#[test]
	fn joins_class_values() {
		assert_eq!(
			join_classes(&[
				ClassValue::List(vec!["a", "b"]),
				ClassValue::Str("c d"),
				ClassValue::Flags(vec![("e", true), ("f", false)]),
			]),
			"a b c d e"
		);
	}

	#[test]
	fn drops_falsy_class_tokens() {
		assert_eq!(
			join_classes(&[
				ClassValue::Empty,
				ClassValue::Str(""),
				ClassValue::List(vec!["", "x"]),
				ClassValue::Str("y"),
			]),
			"x y"
		);
		assert_eq!(join_classes(&[]), "");
	}

	#[test]
	fn helper_sources_are_default_exports() {
		for helper in RuntimeHelper::ALL {
			assert!(helper.source().contains(&format!(
				"export default function {}",
				helper.name()
			)));
		}
		assert_eq!(
			RuntimeHelper::Styles.module_specifier("@twist/react"),
			"@twist/react/src/runtime/styles"
		);
	}
}
