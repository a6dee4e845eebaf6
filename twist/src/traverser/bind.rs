//! Two-way binding: `bind:<name>={target}` becomes a data-in attribute and
//! a data-out event handler that assigns back to `target`.

use oxc::{
	allocator::{CloneIn, Vec},
	ast::ast::{
		Expression, JSXAttributeItem, JSXAttributeName, JSXAttributeValue, JSXElement, Statement,
		UnaryOperator,
	},
};

use crate::{
	constants::{
		BIND_NS, CHECKED_ATTR, HINT_EVENT, HINT_VALUE, ON_CHANGE_ATTR, TARGET, TYPE_ATTR,
		VALUE_ATTR,
	},
	element::{
		attribute_string, element_tag, find_attribute, get_attribute, has_attribute, jsx_expression_into,
		take_attribute, value_to_expression,
	},
	tag::FormControl,
};

/// How the bound value is read back out of the change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BindTemplate {
	/// `(_ev) => target = !target`
	Checked,
	/// `(_ev) => target = _ev.target.value`
	Value,
	/// `(_val) => target = _val`
	Custom,
}

/// `value` → `Value`
fn capitalize(name: &str) -> String {
	let mut chars = name.chars();
	chars.next().map_or_else(String::new, |first| {
		first.to_uppercase().chain(chars).collect()
	})
}

/// Whether a handler is an arrow that does nothing but assign.
fn is_assigning_arrow(handler: &Expression<'_>) -> bool {
	let Expression::ArrowFunctionExpression(arrow) = handler.get_inner_expression() else {
		return false;
	};
	matches!(
		arrow.body.statements.as_slice(),
		[Statement::ExpressionStatement(statement)]
			if matches!(statement.expression.get_inner_expression(), Expression::AssignmentExpression(_))
	)
}

impl<'a> super::TwistTraverser<'a> {
	/// Expands every `bind:*` directive of an element.
	pub(crate) fn transform_bind(&mut self, element: &mut JSXElement<'a>) {
		let tag = element_tag(&element.opening_element.name);
		let attributes = &mut element.opening_element.attributes;

		if let Some(control) = FormControl::from_tag(&tag) {
			let input_type = get_attribute(attributes, TYPE_ATTR)
				.and_then(attribute_string)
				.map(str::to_string);

			match (control, input_type.as_deref()) {
				(FormControl::Input | FormControl::TextArea, Some("radio" | "checkbox")) => {
					self.expand_bind(attributes, CHECKED_ATTR, ON_CHANGE_ATTR, BindTemplate::Checked);
				}
				(FormControl::Input | FormControl::TextArea, Some("submit" | "reset" | "button")) => {}
				_ => {
					self.expand_bind(attributes, VALUE_ATTR, ON_CHANGE_ATTR, BindTemplate::Value);
				}
			}
		}

		let custom: std::vec::Vec<String> = attributes
			.iter()
			.filter_map(|item| match item {
				JSXAttributeItem::Attribute(attr) => match &attr.name {
					JSXAttributeName::NamespacedName(name) if name.namespace.name.as_str() == BIND_NS => {
						Some(name.name.name.to_string())
					}
					_ => None,
				},
				JSXAttributeItem::SpreadAttribute(_) => None,
			})
			.collect();

		for name in custom {
			let event = format!("on{}Change", capitalize(&name));
			self.expand_bind(attributes, &name, &event, BindTemplate::Custom);
		}
	}

	/// Expands one `bind:<name>` directive paired with `event`.
	fn expand_bind(
		&mut self,
		attributes: &mut Vec<'a, JSXAttributeItem<'a>>,
		name: &str,
		event: &str,
		template: BindTemplate,
	) {
		let directive = format!("{BIND_NS}:{name}");
		let Some(attr) = take_attribute(attributes, &directive) else {
			return;
		};
		let span = attr.span;
		let build = self.build;

		let target = match attr.value {
			Some(JSXAttributeValue::ExpressionContainer(container)) => {
				jsx_expression_into(container.unbox().expression)
			}
			_ => None,
		};
		let Some(target) = target else {
			self.warn(span, format!("`{directive}` must be bound to an expression"));
			return;
		};
		let Some(assignment_target) = build.assignment_target(target.clone_in(build.allocator))
		else {
			self.warn(
				span,
				format!("`{directive}` must be bound to an identifier or a member expression"),
			);
			return;
		};
		if has_attribute(attributes, name) {
			self.warn(
				span,
				format!("`{directive}` conflicts with the `{name}` attribute; the binding was dropped"),
			);
			return;
		}

		let hint = match template {
			BindTemplate::Checked | BindTemplate::Value => HINT_EVENT,
			BindTemplate::Custom => HINT_VALUE,
		};
		let param = self.unit.param_name(hint);
		let value = match template {
			BindTemplate::Checked => build.unary(
				span,
				UnaryOperator::LogicalNot,
				target.clone_in(build.allocator),
			),
			BindTemplate::Value => build.static_member(
				span,
				build.static_member(span, build.identifier(span, param), TARGET),
				VALUE_ATTR,
			),
			BindTemplate::Custom => build.identifier(span, param),
		};
		let assignment = build.assign(span, assignment_target, value);

		attributes.push(build.jsx_expression_attribute(span, name, target));

		let existing = match find_attribute(attributes, event) {
			Some(index) => match &mut attributes[index] {
				JSXAttributeItem::Attribute(attr) => Some(attr),
				JSXAttributeItem::SpreadAttribute(_) => None,
			},
			None => None,
		};

		match existing {
			Some(handler_attr) => {
				let handler_span = handler_attr.span;
				let handler = value_to_expression(build, handler_span, handler_attr.value.take());
				let redundant = is_assigning_arrow(&handler);
				let composed = build.arrow(
					span,
					&[param],
					build.sequence(
						span,
						[
							build.call(span, handler, [build.identifier(span, param).into()]),
							assignment,
						],
					),
				);
				handler_attr.value = Some(build.jsx_expression_value(handler_span, composed));
				if redundant {
					self.warn(
						handler_span,
						format!("`{event}` already assigns a value; `{directive}` makes it redundant"),
					);
				}
			}
			None => {
				let handler = build.arrow(span, &[param], assignment);
				attributes.push(build.jsx_expression_attribute(span, event, handler));
			}
		}
	}
}
