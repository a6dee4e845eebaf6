use oxc::{
	allocator::Vec,
	ast::ast::{JSXAttribute, JSXElement},
	span::Atom,
};

use crate::{
	constants::AS_ATTR,
	element::{
		attribute_expression, binder_names, children_to_expression, ensure_closing_element,
		take_attribute,
	},
};

impl<'a> super::TwistTraverser<'a> {
	/// Reads the identifiers of an `as={a, b}` attribute, warning about any
	/// entry that is not a plain identifier.
	pub(crate) fn binder_params(&mut self, attr: &JSXAttribute<'a>) -> std::vec::Vec<Atom<'a>> {
		let Some(expr) = attribute_expression(attr) else {
			self.warn(attr.span, "`as` expects a list of identifiers, e.g. as={item, index}");
			return std::vec::Vec::new();
		};

		let (names, rejected) = binder_names(expr);
		for span in rejected {
			self.warn(span, "`as` can only bind identifiers");
		}
		names.iter().map(|name| self.build.atom(name)).collect()
	}

	/// `<Foo as={a, b}>children</Foo>` → `<Foo>{(a, b) => children}</Foo>`
	pub(crate) fn transform_as_attribute(&mut self, element: &mut JSXElement<'a>) {
		let Some(attr) = take_attribute(&mut element.opening_element.attributes, AS_ATTR) else {
			return;
		};

		let params = self.binder_params(&attr);
		let span = element.span;
		let children = std::mem::replace(&mut element.children, Vec::new_in(self.build.allocator));
		let body = children_to_expression(self.build, span, children);
		let render = self.build.arrow(span, &params, body);

		element
			.children
			.push(self.build.jsx_expression_child(span, render));
		ensure_closing_element(self.build, element);
	}
}
