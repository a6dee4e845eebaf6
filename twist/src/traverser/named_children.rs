use oxc::{
	allocator::{Box, Vec},
	ast::ast::{Expression, JSXAttributeItem, JSXElement, JSXElementName},
};

use crate::{
	constants::AS_ATTR,
	element::{children_to_expression, find_attribute, take_attribute, value_to_expression},
};

impl<'a> super::TwistTraverser<'a> {
	/// Moves `<Parent:slot>children</Parent:slot>` onto the parent as
	/// `parent_slot={children}`. Repeated slots collect into an array, and a
	/// slot with `as={a, b}` becomes `parent_slot={(a, b) => children}`.
	pub(crate) fn hoist_named_child(
		&mut self,
		child: Box<'a, JSXElement<'a>>,
		attributes: &mut Vec<'a, JSXAttributeItem<'a>>,
	) {
		let mut child = child.unbox();
		let span = child.span;
		let binders = take_attribute(&mut child.opening_element.attributes, AS_ATTR)
			.map(|attr| self.binder_params(&attr));
		let JSXElementName::NamespacedName(name) = &child.opening_element.name else {
			return;
		};
		let attr_name = format!(
			"{}_{}",
			name.namespace.name.to_lowercase(),
			name.name.name
		);
		let mut value = children_to_expression(self.build, span, child.children);
		if let Some(params) = binders {
			value = self.build.arrow(span, &params, value);
		}

		let existing = match find_attribute(attributes, &attr_name) {
			Some(index) => match &mut attributes[index] {
				JSXAttributeItem::Attribute(attr) => Some(attr),
				JSXAttributeItem::SpreadAttribute(_) => None,
			},
			None => None,
		};

		match existing {
			Some(attr) => {
				let previous = value_to_expression(self.build, attr.span, attr.value.take());
				let collected = match previous {
					Expression::ArrayExpression(mut array) => {
						array.elements.push(value.into());
						Expression::ArrayExpression(array)
					}
					other => self.build.array(span, [other, value]),
				};
				attr.value = Some(self.build.jsx_expression_value(attr.span, collected));
			}
			None => {
				attributes.push(self.build.jsx_expression_attribute(span, &attr_name, value));
			}
		}
	}
}
