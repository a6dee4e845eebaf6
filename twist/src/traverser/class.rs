use oxc::{
	allocator::{CloneIn, Vec},
	ast::ast::{JSXAttributeItem, JSXElement, LogicalOperator},
};

use crate::{
	constants::{CLASS_ATTR, CLASS_NAME_ATTR, CLASS_PREFIX},
	element::{attribute_name, value_to_expression},
	runtime::RuntimeHelper,
};

impl<'a> super::TwistTraverser<'a> {
	/// Collapses `class`, `className`, `class-*` shorthands and the
	/// `.className` of spreads into one `className={classes(...)}` attribute,
	/// appended last.
	pub(crate) fn transform_class(&mut self, element: &mut JSXElement<'a>) {
		let attributes = &mut element.opening_element.attributes;

		let mut own = 0usize;
		let mut spreads = 0usize;
		for item in attributes.iter() {
			match item {
				JSXAttributeItem::SpreadAttribute(_) => spreads += 1,
				JSXAttributeItem::Attribute(attr) => {
					let name = attribute_name(&attr.name);
					if name == CLASS_ATTR || name == CLASS_NAME_ATTR || name.starts_with(CLASS_PREFIX)
					{
						own += 1;
					}
				}
			}
		}
		if own == 0 && spreads <= 1 {
			return;
		}

		let build = self.build;
		let old = std::mem::replace(attributes, Vec::new_in(build.allocator));
		let mut arguments = std::vec::Vec::new();
		let mut span = None;

		for item in old {
			match item {
				JSXAttributeItem::SpreadAttribute(spread) => {
					arguments.push(build.logical(
						spread.span,
						build.static_member(
							spread.span,
							spread.argument.clone_in(build.allocator),
							CLASS_NAME_ATTR,
						),
						LogicalOperator::Or,
						build.string(spread.span, ""),
					));
					attributes.push(JSXAttributeItem::SpreadAttribute(spread));
				}
				JSXAttributeItem::Attribute(attr) => {
					let name = attribute_name(&attr.name);
					if name == CLASS_ATTR || name == CLASS_NAME_ATTR {
						let attr = attr.unbox();
						span.get_or_insert(attr.span);
						arguments.push(value_to_expression(build, attr.span, attr.value));
					} else if let Some(token) = name.strip_prefix(CLASS_PREFIX) {
						let attr = attr.unbox();
						span.get_or_insert(attr.span);
						let token_literal = build.string(attr.span, token);
						arguments.push(match attr.value {
							None => token_literal,
							value => build.logical(
								attr.span,
								value_to_expression(build, attr.span, value),
								LogicalOperator::And,
								token_literal,
							),
						});
					} else {
						attributes.push(JSXAttributeItem::Attribute(attr));
					}
				}
			}
		}

		let span = span.unwrap_or(element.span);
		let helper = self.unit.runtime_helper(RuntimeHelper::Classes);
		let call = build.call(
			span,
			build.identifier(span, helper),
			arguments.into_iter().map(Into::into),
		);
		attributes.push(build.jsx_expression_attribute(span, CLASS_NAME_ATTR, call));
	}
}
