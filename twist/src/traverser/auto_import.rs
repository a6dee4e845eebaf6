use oxc::{
	allocator::CloneIn,
	ast::ast::{Class, Expression, IdentifierReference, JSXElement, JSXElementName},
	span::GetSpan,
};

use crate::element::element_tag;

/// The identifier a decorator is named by: `@Foo` or `@Foo(...)`.
pub(super) fn decorator_identifier<'b, 'a>(
	expr: &'b Expression<'a>,
) -> Option<&'b IdentifierReference<'a>> {
	match expr {
		Expression::Identifier(ident) => Some(ident),
		Expression::CallExpression(call) => match &call.callee {
			Expression::Identifier(ident) => Some(ident),
			_ => None,
		},
		_ => None,
	}
}

/// Mutable counterpart of [`decorator_identifier`].
fn decorator_identifier_mut<'b, 'a>(
	expr: &'b mut Expression<'a>,
) -> Option<&'b mut IdentifierReference<'a>> {
	match expr {
		Expression::Identifier(ident) => Some(&mut **ident),
		Expression::CallExpression(call) => match &mut call.callee {
			Expression::Identifier(ident) => Some(&mut **ident),
			_ => None,
		},
		_ => None,
	}
}

impl<'a> super::TwistTraverser<'a> {
	/// Renames a tag listed in the auto-import table to a local import of
	/// its export, unless the module already binds that name itself.
	pub(crate) fn auto_import_tag(&mut self, element: &mut JSXElement<'a>) {
		let tag = element_tag(&element.opening_element.name);
		if self.unit.is_top_level_binding(&tag) {
			return;
		}
		let Some(descriptor) = self.unit.options.auto_import.get(&tag).cloned() else {
			return;
		};

		let local = self.unit.add_descriptor_import(&descriptor);
		let build = self.build;
		let span = element.opening_element.name.span();
		let name = JSXElementName::IdentifierReference(
			build.alloc(build.identifier_reference(span, local)),
		);

		if let Some(closing) = &mut element.closing_element {
			closing.name = name.clone_in(build.allocator);
		}
		element.opening_element.name = name;
	}

	/// Renames class decorators listed in the auto-import table. A
	/// descriptor that `inherits` also supplies the superclass of a class
	/// that has none.
	pub(crate) fn auto_import_decorators(&mut self, class: &mut Class<'a>) {
		let mut inherited = None;

		for decorator in class.decorators.iter_mut() {
			let Some(ident) = decorator_identifier_mut(&mut decorator.expression) else {
				continue;
			};
			if self.unit.is_top_level_binding(&ident.name) {
				continue;
			}
			let Some(descriptor) = self.unit.options.auto_import.get(ident.name.as_str()).cloned()
			else {
				continue;
			};

			ident.name = self.unit.add_descriptor_import(&descriptor);
			if let Some(parent) = descriptor.inherits {
				inherited.get_or_insert((ident.span, parent));
			}
		}

		if class.super_class.is_none()
			&& let Some((span, parent)) = inherited
		{
			let local = self.unit.add_descriptor_import(&parent);
			class.super_class = Some(self.build.identifier(span, local));
		}
	}
}
