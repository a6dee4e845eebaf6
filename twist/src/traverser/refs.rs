use oxc::{
	allocator::CloneIn,
	ast::ast::{Expression, JSXAttributeItem, JSXAttributeValue, JSXElement, UnaryOperator},
};

use crate::{
	constants::{FUNCTION_TYPE, HINT_ELEMENT, REF_ATTR},
	element::{ElementMark, find_attribute},
};

impl<'a> super::TwistTraverser<'a> {
	/// Normalizes `ref={target}` into a callback ref that calls `target`
	/// when it is a function and assigns the element to it otherwise.
	pub(crate) fn transform_ref(&mut self, element: &mut JSXElement<'a>) {
		let Some(index) = find_attribute(&element.opening_element.attributes, REF_ATTR) else {
			return;
		};
		if !self.marks.mark(element, ElementMark::RefNormalized) {
			return;
		}

		let build = self.build;
		let attributes = &mut element.opening_element.attributes;
		let JSXAttributeItem::Attribute(attr) = &mut attributes[index] else {
			return;
		};
		let span = attr.span;

		let target = match &attr.value {
			Some(JSXAttributeValue::StringLiteral(_)) => None,
			Some(JSXAttributeValue::ExpressionContainer(container)) => {
				match container.expression.as_expression() {
					Some(
						Expression::ArrowFunctionExpression(_) | Expression::FunctionExpression(_),
					)
					| None => return,
					Some(expr) => Some(expr.clone_in(build.allocator)),
				}
			}
			_ => return,
		};
		let Some(target) = target else {
			attributes.remove(index);
			self.warn(
				span,
				"String refs are not supported; pass a callback or an assignable expression",
			);
			return;
		};

		let Some(assignment_target) = build.assignment_target(target.clone_in(build.allocator))
		else {
			return;
		};

		let el = self.unit.param_name(HINT_ELEMENT);
		let is_function = build.strict_equals(
			span,
			build.unary(
				span,
				UnaryOperator::Typeof,
				target.clone_in(build.allocator),
			),
			build.string(span, FUNCTION_TYPE),
		);
		let callback = build.conditional(
			span,
			is_function,
			build.call(span, target, [build.identifier(span, el).into()]),
			build.parenthesized(
				span,
				build.assign(span, assignment_target, build.identifier(span, el)),
			),
		);
		attr.value = Some(build.jsx_expression_value(span, build.arrow(span, &[el], callback)));
	}
}
