//! Text-level preparation of dialect sources before they reach the parser.
//!
//! The binder lists of `for={item, index in items}` and `as={a, b}` are comma
//! expressions, which JSX does not allow directly inside an expression
//! container. [`PreparedSource`] wraps exactly those containers' contents in
//! parentheses so the module parses, and maps positions in the prepared text
//! back to the text as written.

use oxc::{
	allocator::Allocator,
	diagnostics::{LabeledSpan, OxcDiagnostic},
	parser::Parser,
	span::{SourceType, Span},
};

use crate::constants::{AS_ATTR, FOR_ATTR};

/// Message of the parser diagnostic for a comma inside a JSX expression.
const COMMA_OPERATOR: &str = "may not use the comma operator";

/// A source with its binder lists parenthesized.
#[derive(Debug, Clone)]
pub struct PreparedSource {
	/// The text to parse.
	pub text: String,
	/// Offsets in `text` of every inserted character, ascending.
	inserted: Vec<u32>,
}

impl PreparedSource {
	/// Prepares `source` for parsing as `source_type`.
	///
	/// Each round parses the current text; a comma-operator error that sits
	/// in a `for` or `as` attribute gets its expression parenthesized and the
	/// text is parsed again. Any other error is left for the caller's parse
	/// to report.
	#[must_use]
	pub fn new(source: &str, source_type: SourceType) -> Self {
		let mut prepared = Self {
			text: source.to_string(),
			inserted: Vec::new(),
		};

		// Every rewrite consumes one expression container.
		let mut budget = source.matches('{').count();
		while budget > 0
			&& let Some(span) = prepared.next_binder_list(source_type)
		{
			budget -= 1;
			prepared.insert(span.start, '(');
			prepared.insert(span.end + 1, ')');
		}

		prepared
	}

	/// Finds the first binder list the parser rejects in the current text.
	fn next_binder_list(&self, source_type: SourceType) -> Option<Span> {
		let allocator = Allocator::default();
		let parsed = Parser::new(&allocator, &self.text, source_type).parse();
		parsed
			.errors
			.iter()
			.find_map(|error| binder_list_span(&self.text, error))
	}

	/// Inserts `c` at `offset`, shifting the recorded insertions after it.
	fn insert(&mut self, offset: u32, c: char) {
		self.text.insert(offset as usize, c);
		for position in &mut self.inserted {
			if *position >= offset {
				*position += 1;
			}
		}
		let index = self.inserted.partition_point(|&position| position < offset);
		self.inserted.insert(index, offset);
	}

	/// Whether the text differs from the source as written.
	#[must_use]
	pub fn is_rewritten(&self) -> bool {
		!self.inserted.is_empty()
	}

	/// Maps an offset in the prepared text to the source as written.
	#[must_use]
	pub fn original_offset(&self, offset: u32) -> u32 {
		let before = self.inserted.partition_point(|&position| position < offset);
		offset - u32::try_from(before).unwrap_or(u32::MAX).min(offset)
	}

	/// Maps a span in the prepared text to the source as written.
	#[must_use]
	pub fn original_span(&self, span: Span) -> Span {
		Span::new(self.original_offset(span.start), self.original_offset(span.end))
	}

	/// Moves the labels of a diagnostic onto the source as written.
	#[must_use]
	pub fn remap(&self, diagnostic: OxcDiagnostic) -> OxcDiagnostic {
		if !self.is_rewritten() {
			return diagnostic;
		}
		let Some(labels) = diagnostic.labels.clone() else {
			return diagnostic;
		};

		let labels = labels.into_iter().map(|label| {
			let start = u32::try_from(label.offset()).unwrap_or(u32::MAX);
			let end = u32::try_from(label.offset() + label.len()).unwrap_or(u32::MAX);
			let span = self.original_span(Span::new(start, end));
			LabeledSpan::new(
				label.label().map(str::to_string),
				span.start as usize,
				span.size() as usize,
			)
		});
		diagnostic.with_labels(labels.collect::<Vec<_>>())
	}
}

/// The span to parenthesize if `error` rejects a comma list that is the
/// value of a `for` or `as` attribute.
fn binder_list_span(text: &str, error: &OxcDiagnostic) -> Option<Span> {
	if !error.message.contains(COMMA_OPERATOR) {
		return None;
	}
	let label = error.labels.as_ref()?.first()?;
	let mut start = label.offset();
	let mut end = label.offset() + label.len();

	let labelled = text.get(start..end)?;
	if labelled.starts_with('{') && labelled.ends_with('}') {
		start += 1;
		end -= 1;
	}

	let head = text[..start].trim_end().strip_suffix('{')?;
	let name = head.trim_end().strip_suffix('=')?.trim_end();
	let attribute = [FOR_ATTR, AS_ATTR]
		.into_iter()
		.find(|attribute| name.ends_with(attribute))?;
	let before = name[..name.len() - attribute.len()].chars().next_back()?;
	if !before.is_whitespace() {
		return None;
	}

	Some(Span::new(
		u32::try_from(start).ok()?,
		u32::try_from(end).ok()?,
	))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn prepare(source: &str) -> PreparedSource {
		PreparedSource::new(source, SourceType::jsx())
	}

	#[test]
	fn parenthesizes_binder_lists() {
		let prepared = prepare("<ul><repeat for={item, i in coll}><li /></repeat><X as={a, b} /></ul>;");
		assert_eq!(
			prepared.text,
			"<ul><repeat for={(item, i in coll)}><li /></repeat><X as={(a, b)} /></ul>;"
		);
	}

	#[test]
	fn leaves_parseable_sources_alone() {
		let source = "const a = <repeat for={(item, i) in coll}><li /></repeat>;";
		let prepared = prepare(source);
		assert_eq!(prepared.text, source);
		assert!(!prepared.is_rewritten());
	}

	#[test]
	fn leaves_other_comma_containers_alone() {
		let source = "const a = <div title={a, b} />;";
		assert_eq!(prepare(source).text, source);
	}

	#[test]
	fn maps_offsets_back() {
		let source = "<X as={a, b} />; bad";
		let prepared = prepare(source);
		let written = source.find("bad").unwrap();
		let shifted = prepared.text.find("bad").unwrap();
		assert_eq!(shifted, written + 2);
		assert_eq!(
			prepared.original_offset(u32::try_from(shifted).unwrap()),
			u32::try_from(written).unwrap()
		);
		assert_eq!(prepared.original_offset(7), 7);
	}
}
