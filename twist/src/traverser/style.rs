//! Collapses `style`, `style-*` shorthands and the implicit `.style` of
//! spreads into a single `style` attribute.
//!
//! Literal sources are folded into one object at compile time where the
//! evaluation order allows it; anything else is merged at run time by the
//! `styles` helper, with arguments in attribute order.

use std::collections::HashSet;

use oxc::{
	allocator::{CloneIn, Vec},
	ast::ast::{
		Expression, JSXAttributeItem, JSXAttributeValue, JSXElement, LogicalOperator,
		ObjectExpression, ObjectPropertyKind, PropertyKind,
	},
	span::Span,
};

use crate::{
	constants::{STYLE_ATTR, STYLE_PREFIX},
	element::{attribute_name, jsx_expression_into, value_to_expression},
	runtime::{RuntimeHelper, camel_case, looks_like_css, parse_style_declarations},
};

/// One resolved style contribution.
enum StyleItem<'a> {
	/// Statically known properties, camel-cased, in first-seen order.
	Properties(std::vec::Vec<(String, Expression<'a>)>),
	/// A value only known at run time.
	Dynamic(Expression<'a>),
}

impl<'a> StyleItem<'a> {
	/// The expression this item contributes.
	fn into_expression(self, build: crate::builder::NodeBuilder<'a>, span: Span) -> Expression<'a> {
		match self {
			Self::Properties(properties) => build.object(span, properties),
			Self::Dynamic(expr) => expr,
		}
	}
}

/// Whether an object literal only holds plain `key: value` properties with
/// distinct static names.
fn is_pure_object(object: &ObjectExpression<'_>) -> bool {
	let mut seen = HashSet::new();
	object.properties.iter().all(|property| match property {
		ObjectPropertyKind::ObjectProperty(property) => {
			property.kind == PropertyKind::Init
				&& !property.computed
				&& !property.method
				&& property
					.key
					.static_name()
					.is_some_and(|name| seen.insert(camel_case(&name)))
		}
		ObjectPropertyKind::SpreadProperty(_) => false,
	})
}

/// Whether dropping an expression cannot change what the program does.
fn is_side_effect_free(expr: &Expression<'_>) -> bool {
	match expr.get_inner_expression() {
		Expression::StringLiteral(_)
		| Expression::NumericLiteral(_)
		| Expression::BooleanLiteral(_)
		| Expression::NullLiteral(_)
		| Expression::BigIntLiteral(_)
		| Expression::Identifier(_)
		| Expression::ThisExpression(_) => true,
		Expression::TemplateLiteral(template) => template.expressions.is_empty(),
		_ => false,
	}
}

/// Whether `next` can be folded into `run` without changing what runs, or
/// in which order.
///
/// Folding drops every overridden value and moves the overriding one into
/// its slot. Overridden values must be free of side effects, and the values
/// that have side effects must still run in source order afterwards.
fn can_merge(run: &[(String, Expression<'_>)], next: &[(String, Expression<'_>)]) -> bool {
	let has_effects = |origin: usize| {
		let value = match origin.checked_sub(run.len()) {
			Some(offset) => &next[offset].1,
			None => &run[origin].1,
		};
		!is_side_effect_free(value)
	};

	// Source position of the value each folded slot ends up holding.
	let mut keys: std::vec::Vec<&str> = run.iter().map(|(key, _)| key.as_str()).collect();
	let mut origins: std::vec::Vec<usize> = (0..run.len()).collect();

	for (offset, (key, _)) in next.iter().enumerate() {
		let origin = run.len() + offset;
		match keys.iter().position(|existing| *existing == key.as_str()) {
			Some(slot) => {
				if has_effects(origins[slot]) {
					return false;
				}
				origins[slot] = origin;
			}
			None => {
				keys.push(key);
				origins.push(origin);
			}
		}
	}

	origins
		.into_iter()
		.filter(|&origin| has_effects(origin))
		.is_sorted()
}

/// Folds `next` into `run`; later values win and keep the first position.
fn merge_into<'a>(
	run: &mut std::vec::Vec<(String, Expression<'a>)>,
	next: std::vec::Vec<(String, Expression<'a>)>,
) {
	for (key, value) in next {
		match run.iter_mut().find(|(existing, _)| *existing == key) {
			Some(slot) => slot.1 = value,
			None => run.push((key, value)),
		}
	}
}

/// Merges consecutive literal items.
fn merge_items(items: std::vec::Vec<StyleItem<'_>>) -> std::vec::Vec<StyleItem<'_>> {
	let mut merged: std::vec::Vec<StyleItem<'_>> = std::vec::Vec::new();

	for item in items {
		if let Some(StyleItem::Properties(run)) = merged.last_mut()
			&& let StyleItem::Properties(next) = &item
			&& can_merge(run, next)
		{
			if let StyleItem::Properties(next) = item {
				merge_into(run, next);
			}
			continue;
		}
		merged.push(item);
	}

	merged
}

impl<'a> super::TwistTraverser<'a> {
	/// Resolves the value of a `style` attribute into an item.
	fn style_item(&self, span: Span, value: Option<JSXAttributeValue<'a>>) -> StyleItem<'a> {
		let expr = match value {
			Some(JSXAttributeValue::ExpressionContainer(container)) => {
				match jsx_expression_into(container.unbox().expression) {
					Some(expr) => expr.into_inner_expression(),
					None => return StyleItem::Properties(std::vec::Vec::new()),
				}
			}
			other => value_to_expression(self.build, span, other),
		};

		match expr {
			Expression::StringLiteral(literal) if looks_like_css(&literal.value) => {
				self.static_declarations(literal.span, &literal.value)
			}
			Expression::TemplateLiteral(template)
				if template.expressions.is_empty()
					&& template.quasis.len() == 1
					&& template.quasis[0]
						.value
						.cooked
						.is_some_and(|cooked| looks_like_css(&cooked)) =>
			{
				let source = template.quasis[0]
					.value
					.cooked
					.map(|cooked| cooked.to_string())
					.unwrap_or_default();
				self.static_declarations(template.span, &source)
			}
			Expression::ObjectExpression(object) if is_pure_object(&object) => {
				let object = object.unbox();
				StyleItem::Properties(
					object
						.properties
						.into_iter()
						.filter_map(|property| match property {
							ObjectPropertyKind::ObjectProperty(property) => {
								let property = property.unbox();
								let key = property.key.static_name()?;
								Some((camel_case(&key), property.value))
							}
							ObjectPropertyKind::SpreadProperty(_) => None,
						})
						.collect(),
				)
			}
			other => StyleItem::Dynamic(other),
		}
	}

	/// Parses a literal style string into string-valued properties.
	fn static_declarations(&self, span: Span, source: &str) -> StyleItem<'a> {
		StyleItem::Properties(
			parse_style_declarations(source)
				.into_iter()
				.map(|(key, value)| (key, self.build.string(span, &value)))
				.collect(),
		)
	}

	/// Merges every style source of an element into one `style` attribute.
	pub(crate) fn transform_style(&mut self, element: &mut JSXElement<'a>) {
		let attributes = &mut element.opening_element.attributes;

		let mut own = 0usize;
		let mut spreads = 0usize;
		let mut passthrough = false;
		for item in attributes.iter() {
			match item {
				JSXAttributeItem::SpreadAttribute(_) => spreads += 1,
				JSXAttributeItem::Attribute(attr) => {
					let name = attribute_name(&attr.name);
					if name == STYLE_ATTR {
						own += 1;
						passthrough = matches!(
							&attr.value,
							Some(JSXAttributeValue::StringLiteral(literal)) if !looks_like_css(&literal.value)
						);
					} else if name.starts_with(STYLE_PREFIX) {
						own += 1;
					}
				}
			}
		}

		if own + spreads == 0 || (own == 0 && spreads == 1) || (own == 1 && spreads == 0 && passthrough)
		{
			return;
		}

		let build = self.build;
		let old = std::mem::replace(attributes, Vec::new_in(build.allocator));
		let mut kept: std::vec::Vec<JSXAttributeItem<'a>> = std::vec::Vec::new();
		let mut items: std::vec::Vec<StyleItem<'a>> = std::vec::Vec::new();
		let mut slot: Option<usize> = None;
		let mut span = element.span;

		for item in old {
			match item {
				JSXAttributeItem::SpreadAttribute(spread) => {
					let contribution = build.logical(
						spread.span,
						build.static_member(
							spread.span,
							spread.argument.clone_in(build.allocator),
							STYLE_ATTR,
						),
						LogicalOperator::Or,
						build.object::<&str>(spread.span, []),
					);
					items.push(StyleItem::Dynamic(contribution));

					// The merged attribute already holds this spread's style,
					// so the spread must not override it.
					match slot.as_mut() {
						Some(position) => {
							kept.insert(*position, JSXAttributeItem::SpreadAttribute(spread));
							*position += 1;
						}
						None => kept.push(JSXAttributeItem::SpreadAttribute(spread)),
					}
				}
				JSXAttributeItem::Attribute(attr) => {
					let name = attribute_name(&attr.name);
					if name == STYLE_ATTR {
						if slot.is_none() {
							slot = Some(kept.len());
							span = attr.span;
						}
						let attr = attr.unbox();
						items.push(self.style_item(attr.span, attr.value));
					} else if let Some(property) = name.strip_prefix(STYLE_PREFIX) {
						let attr = attr.unbox();
						let value = value_to_expression(build, attr.span, attr.value);
						items.push(StyleItem::Properties(vec![(camel_case(property), value)]));
					} else {
						kept.push(JSXAttributeItem::Attribute(attr));
					}
				}
			}
		}

		let mut merged = merge_items(items);
		let value = match merged.len() {
			1 if matches!(merged[0], StyleItem::Properties(_)) => {
				merged.remove(0).into_expression(build, span)
			}
			_ => {
				let helper = self.unit.runtime_helper(RuntimeHelper::Styles);
				build.call(
					span,
					build.identifier(span, helper),
					merged
						.into_iter()
						.map(|item| item.into_expression(build, span).into()),
				)
			}
		};

		let merged_attribute = build.jsx_expression_attribute(span, STYLE_ATTR, value);
		match slot {
			Some(position) => kept.insert(position, merged_attribute),
			None => kept.push(merged_attribute),
		}
		*attributes = build.vec_from(kept);
	}
}
