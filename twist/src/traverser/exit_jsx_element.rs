use oxc::ast::ast::JSXElement;

use crate::{
	constants::{AS_ATTR, FOR_ATTR},
	element::{attribute_expression, binder_names, element_tag, get_attribute},
	scope::ScopeKind,
	tag::{ControlFlowKind, SwitchArm},
};

impl<'a> super::TwistTraverser<'a> {
	/// Opens the binder scope holding the names an element's `as`/`for`
	/// attributes introduce for its children.
	pub(crate) fn inner_enter_jsx_element(&mut self, node: &mut JSXElement<'a>) {
		let attributes = &node.opening_element.attributes;

		let mut names = get_attribute(attributes, AS_ATTR)
			.and_then(attribute_expression)
			.map(|expr| binder_names(expr).0)
			.unwrap_or_default();

		if ControlFlowKind::from_tag(&element_tag(&node.opening_element.name))
			== Some(ControlFlowKind::Repeat)
			&& let Some(expr) = get_attribute(attributes, FOR_ATTR).and_then(attribute_expression)
		{
			names.extend(super::control_flow::repeat_binder_names(expr));
		}

		self.scopes.push(ScopeKind::Binder, names);
	}

	/// Runs the attribute stages on an element whose subtree is final,
	/// rewrites its children, and finally turns them into a render function
	/// if the element has an `as` attribute.
	pub(crate) fn inner_exit_jsx_element(&mut self, node: &mut JSXElement<'a>) {
		// Attribute values are evaluated outside the binder scope.
		self.scopes.pop();

		// Named children refer to the tag as written, before any renaming.
		let tag = element_tag(&node.opening_element.name);

		let is_dialect_tag =
			ControlFlowKind::from_tag(&tag).is_some() || SwitchArm::from_tag(&tag).is_some();

		if !is_dialect_tag {
			let options = self.options();
			let style = options.style_attribute;
			let class = options.class_attribute;
			let refs = options.ref_attribute;
			let bind = options.bind_attribute;
			let controlled = options.controlled_input;
			let lifting = options.arrow_lifting || options.object_lifting;
			let auto_import = !options.auto_import.is_empty();

			if style {
				self.transform_style(node);
			}
			if class {
				self.transform_class(node);
			}
			if refs {
				self.transform_ref(node);
			}
			if bind {
				self.transform_bind(node);
			}
			if controlled {
				self.transform_controlled_input(node);
			}
			if lifting {
				self.lift_attributes(node);
			}
			if auto_import {
				self.auto_import_tag(node);
			}
		}

		self.rewrite_children(
			&mut node.children,
			Some((tag.as_str(), &mut node.opening_element.attributes)),
		);

		if !is_dialect_tag && self.options().as_attribute {
			self.transform_as_attribute(node);
		}
	}
}
