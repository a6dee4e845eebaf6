//! Rewrites that replace an element in the position it occupies: a child
//! slot of an element or fragment, an expression, or an attribute value.

use oxc::{
	allocator::{Box, Vec},
	ast::ast::{Expression, JSXAttributeItem, JSXChild, JSXElement, JSXElementName},
};

use crate::{element::element_tag, tag::ControlFlowKind};

/// Control-flow kind of a child, if it is a control-flow element.
fn child_control_flow(child: Option<&JSXChild<'_>>) -> Option<ControlFlowKind> {
	match child {
		Some(JSXChild::Element(element)) => {
			ControlFlowKind::from_tag(&element_tag(&element.opening_element.name))
		}
		_ => None,
	}
}

/// Whether a child is `<Parent:slot>` for the given parent tag.
fn is_named_child(child: &JSXChild<'_>, parent_tag: &str) -> bool {
	matches!(child, JSXChild::Element(element) if is_named_child_element(element, parent_tag))
}

/// Whether an element is named `<Parent:slot>` for the given parent tag.
fn is_named_child_element(element: &JSXElement<'_>, parent_tag: &str) -> bool {
	matches!(
		&element.opening_element.name,
		JSXElementName::NamespacedName(name) if name.namespace.name.as_str() == parent_tag
	)
}

/// Positions of the `elseif`/`else` siblings that continue the chain started
/// by the `if` at `head`.
///
/// Text and expression containers in between are skipped; the scan stops
/// after an `else` or at any other element.
fn else_chain(slots: &[Option<JSXChild<'_>>], head: usize) -> std::vec::Vec<usize> {
	let mut chain = std::vec::Vec::new();
	for (index, slot) in slots.iter().enumerate().skip(head + 1) {
		if !matches!(slot, Some(JSXChild::Element(_))) {
			continue;
		}
		match child_control_flow(slot.as_ref()) {
			Some(ControlFlowKind::ElseIf) => chain.push(index),
			Some(ControlFlowKind::Else) => {
				chain.push(index);
				break;
			}
			_ => break,
		}
	}
	chain
}

/// Takes the element out of a slot.
fn take_element<'a>(slot: &mut Option<JSXChild<'a>>) -> Option<Box<'a, JSXElement<'a>>> {
	match slot.take() {
		Some(JSXChild::Element(element)) => Some(element),
		other => {
			*slot = other;
			None
		}
	}
}

impl<'a> super::TwistTraverser<'a> {
	/// Whether an element outside of a children list must be replaced by an
	/// expression.
	pub(crate) fn wants_standalone_rewrite(&self, element: &JSXElement<'a>) -> bool {
		self.options().control_flow
			&& ControlFlowKind::from_tag(&element_tag(&element.opening_element.name)).is_some()
	}

	/// Lowers a control-flow element that sits in expression or attribute
	/// position. An `if` there forms a chain on its own; a stray `elseif` or
	/// `else` renders nothing.
	pub(crate) fn rewrite_standalone(&mut self, element: Box<'a, JSXElement<'a>>) -> Expression<'a> {
		match ControlFlowKind::from_tag(&element_tag(&element.opening_element.name)) {
			Some(ControlFlowKind::If | ControlFlowKind::Unless) => {
				self.lower_if_chain(element, std::vec::Vec::new())
			}
			Some(kind @ (ControlFlowKind::Switch
			| ControlFlowKind::Repeat
			| ControlFlowKind::Using
			| ControlFlowKind::Group)) => self.lower_control_flow(kind, element),
			Some(ControlFlowKind::ElseIf | ControlFlowKind::Else) | None => {
				self.build.null(element.span)
			}
		}
	}

	/// Rewrites a children list: named children are hoisted onto the parent
	/// and control-flow elements are replaced by expression containers.
	///
	/// `parent` is the parent element's tag and attributes; fragments have
	/// none.
	pub(crate) fn rewrite_children(
		&mut self,
		children: &mut Vec<'a, JSXChild<'a>>,
		parent: Option<(&str, &mut Vec<'a, JSXAttributeItem<'a>>)>,
	) {
		if self.options().named_children
			&& let Some((tag, attributes)) = parent
			&& children.iter().any(|child| is_named_child(child, tag))
		{
			let old = std::mem::replace(children, Vec::new_in(self.build.allocator));
			for child in old {
				match child {
					JSXChild::Element(element) if is_named_child_element(&element, tag) => {
						self.hoist_named_child(element, attributes);
					}
					other => children.push(other),
				}
			}
		}

		if !self.options().control_flow
			|| !children
				.iter()
				.any(|child| child_control_flow(Some(child)).is_some())
		{
			return;
		}

		let old = std::mem::replace(children, Vec::new_in(self.build.allocator));
		let mut slots: std::vec::Vec<Option<JSXChild<'a>>> = old.into_iter().map(Some).collect();

		for index in 0..slots.len() {
			let Some(kind) = child_control_flow(slots[index].as_ref()) else {
				continue;
			};

			match kind {
				ControlFlowKind::If | ControlFlowKind::Unless => {
					let chain = else_chain(&slots, index);
					let Some(head) = take_element(&mut slots[index]) else {
						continue;
					};
					let span = head.span;
					let rest = chain
						.into_iter()
						.filter_map(|position| take_element(&mut slots[position]))
						.collect();
					let expr = self.lower_if_chain(head, rest);
					slots[index] = Some(self.build.jsx_expression_child(span, expr));
				}
				ControlFlowKind::ElseIf | ControlFlowKind::Else => {
					slots[index] = None;
				}
				ControlFlowKind::Switch
				| ControlFlowKind::Repeat
				| ControlFlowKind::Using
				| ControlFlowKind::Group => {
					let Some(element) = take_element(&mut slots[index]) else {
						continue;
					};
					let span = element.span;
					let expr = self.lower_control_flow(kind, element);
					slots[index] = Some(self.build.jsx_expression_child(span, expr));
				}
			}
		}

		children.extend(slots.into_iter().flatten());
	}
}
