//! Inspection and manipulation helpers for JSX elements, their attributes
//! and their children.

use std::collections::HashSet;

use oxc::{
	allocator::{CloneIn, Vec},
	ast::ast::{
		Expression, JSXAttribute, JSXAttributeItem, JSXAttributeName, JSXAttributeValue, JSXChild,
		JSXClosingElement, JSXElement, JSXElementName, JSXExpression, JSXMemberExpression,
		JSXMemberExpressionObject,
	},
	span::Span,
};

use crate::builder::NodeBuilder;

/// Renders an element name as written (`div`, `Foo`, `ui:button`, `a.b.C`).
pub fn element_tag(name: &JSXElementName<'_>) -> String {
	match name {
		JSXElementName::Identifier(ident) => ident.name.to_string(),
		JSXElementName::IdentifierReference(ident) => ident.name.to_string(),
		JSXElementName::NamespacedName(ns) => format!("{}:{}", ns.namespace.name, ns.name.name),
		JSXElementName::MemberExpression(member) => member_tag(member),
		JSXElementName::ThisExpression(_) => "this".to_string(),
	}
}

/// Renders a member-expression element name.
fn member_tag(member: &JSXMemberExpression<'_>) -> String {
	let object = match &member.object {
		JSXMemberExpressionObject::IdentifierReference(ident) => ident.name.to_string(),
		JSXMemberExpressionObject::MemberExpression(inner) => member_tag(inner),
		JSXMemberExpressionObject::ThisExpression(_) => "this".to_string(),
	};
	format!("{object}.{}", member.property.name)
}

/// Renders an attribute name as written (`value`, `bind:value`).
pub fn attribute_name(name: &JSXAttributeName<'_>) -> String {
	match name {
		JSXAttributeName::Identifier(ident) => ident.name.to_string(),
		JSXAttributeName::NamespacedName(ns) => format!("{}:{}", ns.namespace.name, ns.name.name),
	}
}

/// Returns the named attribute (not spreads) at the given item, if it is one.
pub fn as_attribute<'b, 'a>(item: &'b JSXAttributeItem<'a>) -> Option<&'b JSXAttribute<'a>> {
	match item {
		JSXAttributeItem::Attribute(attr) => Some(attr),
		JSXAttributeItem::SpreadAttribute(_) => None,
	}
}

/// Finds the position of the first attribute with the given name.
pub fn find_attribute(attributes: &[JSXAttributeItem<'_>], name: &str) -> Option<usize> {
	attributes
		.iter()
		.position(|item| as_attribute(item).is_some_and(|attr| attribute_name(&attr.name) == name))
}

/// Looks up the first attribute with the given name.
pub fn get_attribute<'b, 'a>(
	attributes: &'b [JSXAttributeItem<'a>],
	name: &str,
) -> Option<&'b JSXAttribute<'a>> {
	find_attribute(attributes, name).and_then(|index| as_attribute(&attributes[index]))
}

/// Whether an attribute with the given name is present.
pub fn has_attribute(attributes: &[JSXAttributeItem<'_>], name: &str) -> bool {
	find_attribute(attributes, name).is_some()
}

/// Removes the first attribute with the given name and returns it.
pub fn take_attribute<'a>(
	attributes: &mut Vec<'a, JSXAttributeItem<'a>>,
	name: &str,
) -> Option<JSXAttribute<'a>> {
	let index = find_attribute(attributes, name)?;
	match attributes.remove(index) {
		JSXAttributeItem::Attribute(attr) => Some(attr.unbox()),
		JSXAttributeItem::SpreadAttribute(_) => None,
	}
}

/// The expression inside an `attr={...}` value, if any.
pub fn attribute_expression<'b, 'a>(attr: &'b JSXAttribute<'a>) -> Option<&'b Expression<'a>> {
	match &attr.value {
		Some(JSXAttributeValue::ExpressionContainer(container)) => {
			container.expression.as_expression()
		}
		_ => None,
	}
}

/// The value of an `attr="..."` string attribute, if any.
pub fn attribute_string<'b>(attr: &'b JSXAttribute<'_>) -> Option<&'b str> {
	match &attr.value {
		Some(JSXAttributeValue::StringLiteral(lit)) => Some(lit.value.as_str()),
		_ => None,
	}
}

/// Converts an owned attribute value into the expression it evaluates to.
///
/// A valueless attribute (`<input disabled />`) evaluates to `true`.
pub fn value_to_expression<'a>(
	builder: NodeBuilder<'a>,
	span: Span,
	value: Option<JSXAttributeValue<'a>>,
) -> Expression<'a> {
	match value {
		None => builder.boolean(span, true),
		Some(JSXAttributeValue::StringLiteral(lit)) => Expression::StringLiteral(lit),
		Some(JSXAttributeValue::Element(element)) => Expression::JSXElement(element),
		Some(JSXAttributeValue::Fragment(fragment)) => Expression::JSXFragment(fragment),
		Some(JSXAttributeValue::ExpressionContainer(container)) => {
			jsx_expression_into(container.unbox().expression)
				.unwrap_or_else(|| builder.boolean(span, true))
		}
	}
}

/// Unwraps a JSX expression, yielding `None` for `{}`.
pub fn jsx_expression_into(expression: JSXExpression<'_>) -> Option<Expression<'_>> {
	match expression {
		JSXExpression::EmptyExpression(_) => None,
		other => Some(other.into_expression()),
	}
}

/// Collects identifier names from a binder expression such as
/// `item`, `item, index` or `(item, index)`.
///
/// Returns the names together with the spans of any entries that were not
/// plain identifiers.
pub fn binder_names(expr: &Expression<'_>) -> (std::vec::Vec<String>, std::vec::Vec<Span>) {
	let mut names = std::vec::Vec::new();
	let mut rejected = std::vec::Vec::new();

	let mut push = |expr: &Expression<'_>| match expr.get_inner_expression() {
		Expression::Identifier(ident) => names.push(ident.name.to_string()),
		other => rejected.push(oxc::span::GetSpan::span(other)),
	};

	match expr.get_inner_expression() {
		Expression::SequenceExpression(seq) => seq.expressions.iter().for_each(&mut push),
		other => push(other),
	}

	(names, rejected)
}

/// Cleans JSX text the way JSX runtimes do: lines are trimmed, lines that
/// only hold whitespace are dropped and the remaining lines are joined with
/// single spaces.
///
/// Returns `None` when nothing remains.
pub fn clean_jsx_text(text: &str) -> Option<String> {
	let lines: std::vec::Vec<&str> = text
		.split('\n')
		.map(|line| line.strip_suffix('\r').unwrap_or(line))
		.collect();
	let last_non_empty = lines
		.iter()
		.rposition(|line| line.chars().any(|c| c != ' ' && c != '\t'));

	let mut out = String::new();
	for (index, line) in lines.iter().enumerate() {
		let mut trimmed: &str = line;
		if index != 0 {
			trimmed = trimmed.trim_start_matches([' ', '\t']);
		}
		if index != lines.len() - 1 {
			trimmed = trimmed.trim_end_matches([' ', '\t']);
		}
		if trimmed.is_empty() {
			continue;
		}
		out.push_str(trimmed);
		if Some(index) != last_non_empty {
			out.push(' ');
		}
	}

	(!out.is_empty()).then_some(out)
}

/// Converts owned JSX children into a single expression: `null` for none,
/// the child itself for one, and an array otherwise.
pub fn children_to_expression<'a>(
	builder: NodeBuilder<'a>,
	span: Span,
	children: Vec<'a, JSXChild<'a>>,
) -> Expression<'a> {
	let mut expressions = children_to_expressions(builder, children);
	match expressions.len() {
		0 => builder.null(span),
		1 => expressions.remove(0),
		_ => builder.array(span, expressions),
	}
}

/// Converts owned JSX children into the expressions they render, dropping
/// whitespace-only text and empty containers.
pub fn children_to_expressions<'a>(
	builder: NodeBuilder<'a>,
	children: Vec<'a, JSXChild<'a>>,
) -> std::vec::Vec<Expression<'a>> {
	children
		.into_iter()
		.filter_map(|child| match child {
			JSXChild::Text(text) => {
				clean_jsx_text(&text.value).map(|value| builder.string(text.span, &value))
			}
			JSXChild::Element(element) => Some(Expression::JSXElement(element)),
			JSXChild::Fragment(fragment) => Some(Expression::JSXFragment(fragment)),
			JSXChild::ExpressionContainer(container) => {
				jsx_expression_into(container.unbox().expression)
			}
			JSXChild::Spread(spread) => Some(spread.unbox().expression),
		})
		.collect()
}

/// Turns `<Foo />` into `<Foo></Foo>` so that children can be added.
pub fn ensure_closing_element<'a>(builder: NodeBuilder<'a>, element: &mut JSXElement<'a>) {
	element.opening_element.self_closing = false;
	if element.closing_element.is_none() {
		element.closing_element = Some(builder.alloc(JSXClosingElement {
			span: element.opening_element.span,
			name: element.opening_element.name.clone_in(builder.allocator),
		}));
	}
}

/// Idempotence markers recorded per element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementMark {
	/// The `ref` attribute has been normalized.
	RefNormalized,
	/// The `onChange` handler has been wrapped.
	ControlledInputGuarded,
}

/// Side table of marks keyed by element identity.
///
/// Elements live in the arena and never move, so their address identifies
/// them for the lifetime of the pass.
#[derive(Debug, Default)]
pub struct ElementMarks {
	/// `(element address, mark)` pairs.
	marks: HashSet<(usize, ElementMark)>,
}

impl ElementMarks {
	/// Records the mark, returning `false` if the element already had it.
	pub fn mark(&mut self, element: &JSXElement<'_>, mark: ElementMark) -> bool {
		self.marks.insert((std::ptr::from_ref(element).addr(), mark))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cleans_multiline_text() {
		assert_eq!(clean_jsx_text("\n\t\tHello\n\t\tworld\n\t"), Some("Hello world".into()));
		assert_eq!(clean_jsx_text("  keep  inner  "), Some("  keep  inner  ".into()));
		assert_eq!(clean_jsx_text("a \n"), Some("a".into()));
	}

	#[test]
	fn drops_whitespace_only_text() {
		assert_eq!(clean_jsx_text("\n    \n  "), None);
		assert_eq!(clean_jsx_text(""), None);
	}
}
