use oxc::ast::ast::{JSXAttributeItem, JSXElement};

use crate::{
	constants::{HINT_CHANGE_EVENT, ON_CHANGE_ATTR},
	element::{ElementMark, element_tag, find_attribute, value_to_expression},
	tag::FormControl,
};

impl<'a> super::TwistTraverser<'a> {
	/// Wraps the `onChange` handler of a form control inside a component so
	/// that the instance skips re-rendering while the handler runs:
	///
	/// `(_e) => (this[_t] = false, handler(_e), this[_t] = true)`
	pub(crate) fn transform_controlled_input(&mut self, element: &mut JSXElement<'a>) {
		if !self.in_component_class()
			|| FormControl::from_tag(&element_tag(&element.opening_element.name)).is_none()
		{
			return;
		}
		let Some(index) = find_attribute(&element.opening_element.attributes, ON_CHANGE_ATTR) else {
			return;
		};
		if !self.marks.mark(element, ElementMark::ControlledInputGuarded) {
			return;
		}

		let build = self.build;
		let key = self.unit.throttle_updates_key();
		let param = self.unit.param_name(HINT_CHANGE_EVENT);

		let JSXAttributeItem::Attribute(attr) = &mut element.opening_element.attributes[index] else {
			return;
		};
		let span = attr.span;
		let handler = value_to_expression(build, span, attr.value.take());

		let guarded = build.sequence(
			span,
			[
				build.assign(span, build.this_slot_target(span, key), build.boolean(span, false)),
				build.call(span, handler, [build.identifier(span, param).into()]),
				build.assign(span, build.this_slot_target(span, key), build.boolean(span, true)),
			],
		);
		attr.value = Some(build.jsx_expression_value(span, build.arrow(span, &[param], guarded)));
	}
}
