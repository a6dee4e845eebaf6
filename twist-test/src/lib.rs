//! Fixture harness for the Twist compiler.
//!
//! Each `tests/<suite>.jsx` is compiled with the options in
//! `tests/<suite>.json` (if present) and compared against
//! `tests/<suite>.out.jsx`. The build script generates one test per suite.
//!
//! Both sides are re-parsed and printed before comparison, so formatting,
//! redundant parentheses and JSX indentation do not matter.

use oxc::{
	allocator::{Allocator, Box, Vec},
	ast::ast::{
		JSXChild, JSXElement, JSXExpression, JSXExpressionContainer, JSXFragment, StringLiteral,
	},
	codegen::{Codegen, CodegenOptions},
	parser::{ParseOptions, Parser},
	span::{Atom, SourceType},
};
use oxc_ast_visit::{VisitMut, walk_mut};

/// A compiled fixture and what it must produce.
#[derive(Debug)]
pub struct Fixture {
	/// The suite name, for messages.
	pub name: &'static str,
	/// The dialect source.
	pub source: &'static str,
	/// The expected output.
	pub expected: &'static str,
	/// Path of the options file, if the suite has one.
	pub config: Option<&'static str>,
	/// One substring per expected warning, in emission order.
	pub warnings: &'static [&'static str],
}

/// Compiles a fixture and asserts on its output and warnings.
///
/// # Panics
///
/// On any mismatch.
pub fn check(fixture: &Fixture) {
	let args = twist_cli::Args {
		config: fixture.config.map(Into::into),
		..twist_cli::Args::default()
	};

	let output = twist_cli::run(fixture.source.to_string(), &args).expect("compilation failed");

	if !output.errors.is_empty() {
		for error in &output.errors {
			eprintln!("{error}");
		}
		panic!("{}: compilation failed", fixture.name);
	}

	eprintln!("--------------- OUTPUT ---------------");
	eprintln!("{}", output.code);

	for warning in &output.warnings {
		eprintln!("{warning}");
	}
	assert_eq!(
		output.warning_messages.len(),
		fixture.warnings.len(),
		"{}: unexpected number of warnings",
		fixture.name
	);
	for (warning, expected) in output.warning_messages.iter().zip(fixture.warnings) {
		assert!(
			warning.contains(expected),
			"{}: expected a warning containing {expected:?}, got:\n{warning}",
			fixture.name
		);
	}

	assert_eq!(
		normalize(&output.code),
		normalize(fixture.expected),
		"{}: output does not match {}.out.jsx",
		fixture.name,
		fixture.name
	);
}

/// Re-prints JSX source in a canonical form.
///
/// # Panics
///
/// If the source does not parse.
#[must_use]
pub fn normalize(source: &str) -> String {
	let allocator = Allocator::default();
	let parsed = Parser::new(&allocator, source, SourceType::jsx())
		.with_options(ParseOptions {
			preserve_parens: false,
			..ParseOptions::default()
		})
		.parse();

	assert!(
		parsed.errors.is_empty(),
		"failed to parse:\n{source}\n{:?}",
		parsed.errors
	);

	let mut program = parsed.program;
	JsxTextNormalizer {
		allocator: &allocator,
	}
	.visit_program(&mut program);

	Codegen::new()
		.with_options(CodegenOptions {
			comments: false,
			..CodegenOptions::default()
		})
		.build(&program)
		.code
}

/// Drops whitespace-only JSX text and turns the rest into string literal
/// children with collapsed whitespace.
struct JsxTextNormalizer<'a> {
	/// Holds the replacement children.
	allocator: &'a Allocator,
}

impl<'a> JsxTextNormalizer<'a> {
	/// Normalizes one children list.
	fn normalize_children(&self, children: &mut Vec<'a, JSXChild<'a>>) {
		let old = std::mem::replace(children, Vec::new_in(self.allocator));

		for child in old {
			match child {
				JSXChild::Text(text) => {
					let collapsed = text.value.split_whitespace().collect::<std::vec::Vec<_>>().join(" ");
					if collapsed.is_empty() {
						continue;
					}
					let literal = StringLiteral {
						span: text.span,
						value: Atom::from(&*self.allocator.alloc_str(&collapsed)),
						raw: None,
						lossy: false,
					};
					children.push(JSXChild::ExpressionContainer(Box::new_in(
						JSXExpressionContainer {
							span: text.span,
							expression: JSXExpression::StringLiteral(Box::new_in(
								literal,
								self.allocator,
							)),
						},
						self.allocator,
					)));
				}
				other => children.push(other),
			}
		}
	}
}

impl<'a> VisitMut<'a> for JsxTextNormalizer<'a> {
	fn visit_jsx_element(&mut self, it: &mut JSXElement<'a>) {
		self.normalize_children(&mut it.children);
		walk_mut::walk_jsx_element(self, it);
	}

	fn visit_jsx_fragment(&mut self, it: &mut JSXFragment<'a>) {
		self.normalize_children(&mut it.children);
		walk_mut::walk_jsx_fragment(self, it);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ignores_formatting() {
		assert_eq!(
			normalize("const a = (<div>\n\t<b>x</b>\n</div>);"),
			normalize("const a = <div><b>x</b></div>;")
		);
	}

	#[test]
	fn keeps_meaningful_text() {
		assert_ne!(normalize("<p>a b</p>;"), normalize("<p>ab</p>;"));
	}
}

#[cfg(test)]
mod fixtures {
	include!(concat!(env!("OUT_DIR"), "/tests.rs"));
}
