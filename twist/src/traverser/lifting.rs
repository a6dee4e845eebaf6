//! Moves per-render closures and object literals out of attributes into
//! per-instance slots, so that they are built once per component instance.
//!
//! A candidate is lifted only when none of the identifiers it references
//! are bound between the attribute and the enclosing instance method; such
//! bindings would differ from one render to the next.

use oxc::{
	allocator::CloneIn,
	ast::ast::{
		Expression, JSXAttributeItem, JSXAttributeValue, JSXElement, LogicalOperator,
		ObjectPropertyKind,
	},
	span::{Atom, Span},
};

use crate::{
	constants::{ASSIGN, HINT_HANDLER, HINT_OBJECT, OBJECT},
	scope::{ScopeIndex, ScopeKind, free_identifiers},
};

/// The two kinds of liftable attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lift {
	/// `this[_handler] = this[_handler] || <arrow>`, read as `this[_handler]`.
	Handler,
	/// `this[_object] = this[_object] || {}`, read as
	/// `Object.assign(this[_object], <object>)`.
	Object,
}

/// Names that are never safe to capture, whatever the scope chain says.
const IMPLICIT_BINDINGS: [&str; 1] = ["arguments"];

impl<'a> super::TwistTraverser<'a> {
	/// Decides whether an attribute value can be lifted.
	fn lift_kind(&self, expr: &Expression<'a>) -> Option<Lift> {
		match expr.get_inner_expression() {
			Expression::ArrowFunctionExpression(_) if self.options().arrow_lifting => Some(Lift::Handler),
			Expression::ObjectExpression(object)
				if self.options().object_lifting
					&& !object.properties.is_empty()
					&& object
						.properties
						.iter()
						.all(|property| matches!(property, ObjectPropertyKind::ObjectProperty(_))) =>
			{
				Some(Lift::Object)
			}
			_ => None,
		}
	}

	/// Whether every free identifier of `candidate` resolves outside `owner`.
	fn is_capture_safe(&self, owner: ScopeIndex, candidate: &Expression<'a>) -> bool {
		free_identifiers(candidate).iter().all(|name| {
			!IMPLICIT_BINDINGS.contains(&name.as_str()) && !self.scopes.is_bound_within(owner, name)
		})
	}

	/// Builds the statement that initializes the slot, and the expression
	/// that replaces the attribute value.
	fn lifted_parts(
		&mut self,
		kind: Lift,
		span: Span,
		candidate: Expression<'a>,
	) -> (Expression<'a>, Expression<'a>) {
		let build = self.build;
		let slot = self
			.unit
			.instance_slot(if kind == Lift::Handler { HINT_HANDLER } else { HINT_OBJECT });

		let (initial, replacement) = match kind {
			Lift::Handler => (candidate, build.this_slot(span, slot)),
			Lift::Object => (
				build.object::<&str>(span, []),
				build.call(
					span,
					build.static_member(
						span,
						build.identifier(span, Atom::new_const(OBJECT)),
						ASSIGN,
					),
					[build.this_slot(span, slot).into(), candidate.into()],
				),
			),
		};

		let init = build.assign(
			span,
			build.this_slot_target(span, slot),
			build.logical(span, build.this_slot(span, slot), LogicalOperator::Or, initial),
		);
		(init, replacement)
	}

	/// Lifts every qualifying attribute value of an element.
	pub(crate) fn lift_attributes(&mut self, element: &mut JSXElement<'a>) {
		let Some(owner) = self.scopes.enclosing_function() else {
			return;
		};
		if self.scopes.get(owner).kind != (ScopeKind::Function { instance_method: true }) {
			return;
		}

		for item in element.opening_element.attributes.iter_mut() {
			let JSXAttributeItem::Attribute(attr) = item else {
				continue;
			};
			let Some(JSXAttributeValue::ExpressionContainer(container)) = &mut attr.value else {
				continue;
			};
			let Some(expr) = container.expression.as_expression() else {
				continue;
			};
			let Some(kind) = self.lift_kind(expr) else {
				continue;
			};
			if !self.is_capture_safe(owner, expr) {
				continue;
			}

			let span = container.span;
			let candidate = expr.clone_in(self.build.allocator);
			let (init, replacement) = self.lifted_parts(kind, span, candidate);

			let statement = self.build.expression_statement(span, init);
			self.scopes.get_mut(owner).queued.push(statement);
			container.expression = replacement.into();
		}
	}
}
