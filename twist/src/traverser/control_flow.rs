//! Lowering of the control-flow tags into plain expressions.
//!
//! Every lowering consumes the element and returns the expression that
//! replaces it. Children have already been rewritten by the time a
//! control-flow element is lowered, so nested control flow arrives here as
//! ordinary expression containers.

use std::cell::Cell;

use oxc::{
	allocator::{Box, CloneIn, Vec},
	ast::ast::{
		BinaryOperator, Expression, JSXAttributeItem, JSXChild, JSXElement, LogicalOperator,
		Statement, SwitchCase, SwitchStatement, UnaryOperator, VariableDeclarationKind,
	},
	diagnostics::OxcDiagnostic,
	span::{Atom, GetSpan},
};

use crate::{
	constants::{
		AS_ATTR, CALL, COLLECTION_ATTR, CONDITION_ATTR, FOR_ATTR, HINT_INDEX, HINT_ITEM, KEY_ATTR,
		MAP, MAP_TO_ARRAY, VALUE_ATTR,
	},
	element::{
		binder_names, children_to_expression, children_to_expressions, element_tag, has_attribute,
		take_attribute, value_to_expression,
	},
	tag::{ControlFlowKind, SwitchArm},
};

/// Names bound by a `for={...}` attribute of a `<repeat>`.
pub(super) fn repeat_binder_names(expr: &Expression<'_>) -> std::vec::Vec<String> {
	match expr.get_inner_expression() {
		Expression::BinaryExpression(binary) if binary.operator == BinaryOperator::In => {
			binder_names(&binary.left).0
		}
		Expression::SequenceExpression(sequence) => {
			let Some((last, leading)) = sequence.expressions.split_last() else {
				return std::vec::Vec::new();
			};
			let mut names: std::vec::Vec<String> = leading
				.iter()
				.filter_map(|expr| match expr.get_inner_expression() {
					Expression::Identifier(ident) => Some(ident.name.to_string()),
					_ => None,
				})
				.collect();
			names.extend(repeat_binder_names(last));
			names
		}
		_ => std::vec::Vec::new(),
	}
}

/// Splits `item, index in coll` / `(item, index) in coll` / `item in coll`
/// into its binders and its collection.
fn split_for_expression(
	expr: Expression<'_>,
) -> Option<(std::vec::Vec<Expression<'_>>, Expression<'_>)> {
	match expr.into_inner_expression() {
		Expression::BinaryExpression(binary) if binary.operator == BinaryOperator::In => {
			let binary = binary.unbox();
			let binders = match binary.left.into_inner_expression() {
				Expression::SequenceExpression(sequence) => {
					sequence.unbox().expressions.into_iter().collect()
				}
				other => vec![other],
			};
			Some((binders, binary.right))
		}
		Expression::SequenceExpression(sequence) => {
			let mut leading: std::vec::Vec<Expression<'_>> =
				sequence.unbox().expressions.into_iter().collect();
			let last = leading.pop()?;
			let (tail, collection) = split_for_expression(last)?;
			leading.extend(tail);
			Some((leading, collection))
		}
		_ => None,
	}
}

impl<'a> super::TwistTraverser<'a> {
	/// Removes a required attribute and returns its value.
	///
	/// A missing attribute is a compile error; `undefined` stands in for the
	/// value so that the rest of the element can still be lowered.
	fn required_attribute(
		&mut self,
		element: &mut JSXElement<'a>,
		tag: &str,
		name: &str,
	) -> Expression<'a> {
		match take_attribute(&mut element.opening_element.attributes, name) {
			Some(attr) => value_to_expression(self.build, attr.span, attr.value),
			None => {
				self.errors.push(
					OxcDiagnostic::error(format!("`<{tag}>` requires a `{name}` attribute"))
						.with_label(element.opening_element.span),
				);
				self.build.undefined(element.span)
			}
		}
	}

	/// Converts the children of a consumed element into one expression.
	fn take_children(&self, element: &mut JSXElement<'a>) -> Expression<'a> {
		let children = std::mem::replace(&mut element.children, Vec::new_in(self.build.allocator));
		children_to_expression(self.build, element.span, children)
	}

	/// Lowers `switch`, `repeat`, `using` and `g`.
	pub(super) fn lower_control_flow(
		&mut self,
		kind: ControlFlowKind,
		element: Box<'a, JSXElement<'a>>,
	) -> Expression<'a> {
		match kind {
			ControlFlowKind::Switch => self.lower_switch(element),
			ControlFlowKind::Repeat => self.lower_repeat(element),
			ControlFlowKind::Using => self.lower_using(element),
			ControlFlowKind::Group => self.lower_group(element),
			ControlFlowKind::If | ControlFlowKind::Unless => {
				self.lower_if_chain(element, std::vec::Vec::new())
			}
			ControlFlowKind::ElseIf | ControlFlowKind::Else => self.build.null(element.span),
		}
	}

	/// Lowers `<if>`/`<unless>` and the `elseif`/`else` siblings that follow
	/// it into nested conditionals.
	pub(super) fn lower_if_chain(
		&mut self,
		head: Box<'a, JSXElement<'a>>,
		rest: std::vec::Vec<Box<'a, JSXElement<'a>>>,
	) -> Expression<'a> {
		let span = head.span;
		let mut branches = std::vec::Vec::new();
		let mut fallback = None;

		for mut element in std::iter::once(head).chain(rest) {
			let tag = element_tag(&element.opening_element.name);
			match ControlFlowKind::from_tag(&tag) {
				Some(ControlFlowKind::Else) => {
					fallback = Some(self.take_children(&mut element));
				}
				kind => {
					let mut condition = self.required_attribute(&mut element, &tag, CONDITION_ATTR);
					if kind == Some(ControlFlowKind::Unless) {
						condition = self
							.build
							.unary(condition.span(), UnaryOperator::LogicalNot, condition);
					}
					branches.push((condition, self.take_children(&mut element)));
				}
			}
		}

		let mut expr = fallback.unwrap_or_else(|| self.build.null(span));
		for (condition, consequent) in branches.into_iter().rev() {
			expr = self.build.conditional(span, condition, consequent, expr);
		}
		expr
	}

	/// Lowers `<switch>` into an immediately invoked arrow holding a `switch`
	/// statement.
	fn lower_switch(&mut self, element: Box<'a, JSXElement<'a>>) -> Expression<'a> {
		let mut element = element.unbox();
		let span = element.span;
		let discriminant = self.required_attribute(&mut element, "switch", CONDITION_ATTR);

		let mut cases = Vec::new_in(self.build.allocator);
		let mut fallback = None;
		let children = std::mem::replace(&mut element.children, Vec::new_in(self.build.allocator));

		for child in children {
			let JSXChild::Element(mut arm) = child else {
				continue;
			};
			let tag = element_tag(&arm.opening_element.name);
			match SwitchArm::from_tag(&tag) {
				Some(SwitchArm::Case) => {
					let test = self.required_attribute(&mut arm, &tag, VALUE_ATTR);
					let consequent = self.take_children(&mut arm);
					cases.push(SwitchCase {
						span: arm.span,
						test: Some(test),
						consequent: Vec::from_array_in(
							[self.build.return_statement(arm.span, consequent)],
							self.build.allocator,
						),
					});
				}
				Some(SwitchArm::Default) => {
					fallback = Some(self.take_children(&mut arm));
				}
				None => break,
			}
		}

		let statement = Statement::SwitchStatement(self.build.alloc(SwitchStatement {
			span,
			discriminant,
			cases,
			scope_id: Cell::new(None),
		}));
		let fallback = fallback.unwrap_or_else(|| self.build.null(span));

		self.build
			.iife(span, [statement, self.build.return_statement(span, fallback)])
	}

	/// Lowers `<repeat>` into a guarded map over the collection.
	fn lower_repeat(&mut self, element: Box<'a, JSXElement<'a>>) -> Expression<'a> {
		let mut element = element.unbox();
		let span = element.span;

		let (mut params, collection) = self.repeat_head(&mut element);

		let key_target = {
			let mut elements = element.children.iter_mut().filter_map(|child| match child {
				JSXChild::Element(child) => Some(child),
				_ => None,
			});
			match (elements.next(), elements.next()) {
				(Some(only), None) if !has_attribute(&only.opening_element.attributes, KEY_ATTR) => {
					Some(&mut only.opening_element.attributes)
				}
				_ => None,
			}
		};

		if let Some(attributes) = key_target {
			while params.len() < 2 {
				let hint = if params.is_empty() { HINT_ITEM } else { HINT_INDEX };
				params.push(self.unit.param_name(hint));
			}
			let index = self.build.identifier(span, params[1]);
			attributes.push(self.build.jsx_expression_attribute(span, KEY_ATTR, index));
			self.warn(
				span,
				format!(
					"Added key={{{}}} to the contents of <repeat>; use a key based on the identity of each item instead",
					params[1]
				),
			);
		}

		let body = self.take_children(&mut element);
		let mapper = self.build.arrow(span, &params, body);

		let method = self.build.logical(
			span,
			self.build.static_member(
				span,
				collection.clone_in(self.build.allocator),
				MAP_TO_ARRAY,
			),
			LogicalOperator::Or,
			self.build
				.static_member(span, collection.clone_in(self.build.allocator), MAP),
		);
		let callee = self
			.build
			.static_member(span, self.build.parenthesized(span, method), CALL);
		let mapped = self.build.call(
			span,
			callee,
			[
				collection.clone_in(self.build.allocator).into(),
				mapper.into(),
			],
		);

		self.build
			.conditional(span, collection, mapped, self.build.null(span))
	}

	/// Reads the binders and the collection of a `<repeat>` from either its
	/// `for` attribute or its `as` and `collection` attributes.
	fn repeat_head(
		&mut self,
		element: &mut JSXElement<'a>,
	) -> (std::vec::Vec<Atom<'a>>, Expression<'a>) {
		let attributes = &mut element.opening_element.attributes;

		if let Some(attr) = take_attribute(attributes, FOR_ATTR) {
			let span = attr.span;
			let expr = value_to_expression(self.build, span, attr.value);
			let Some((binders, collection)) = split_for_expression(expr) else {
				self.errors.push(
					OxcDiagnostic::error("`for` must read `item in collection`").with_label(span),
				);
				return (std::vec::Vec::new(), self.build.undefined(span));
			};

			let mut params = std::vec::Vec::new();
			for binder in binders {
				match binder.into_inner_expression() {
					Expression::Identifier(ident) => params.push(ident.name),
					other => self.warn(other.span(), "`<repeat>` can only bind identifiers"),
				}
			}
			return (params, collection);
		}

		let params = match take_attribute(attributes, AS_ATTR) {
			Some(attr) => self.binder_params(&attr),
			None => {
				self.errors.push(
					OxcDiagnostic::error("`<repeat>` requires a `for` or an `as` attribute")
						.with_label(element.opening_element.span),
				);
				std::vec::Vec::new()
			}
		};
		let collection = self.required_attribute(element, "repeat", COLLECTION_ATTR);
		(params, collection)
	}

	/// Lowers `<using value={..} as={name}>` into an immediately invoked
	/// arrow that names the value for its children.
	fn lower_using(&mut self, element: Box<'a, JSXElement<'a>>) -> Expression<'a> {
		let mut element = element.unbox();
		let span = element.span;
		let value = self.required_attribute(&mut element, "using", VALUE_ATTR);

		let name = match take_attribute(&mut element.opening_element.attributes, AS_ATTR) {
			Some(attr) => self.binder_params(&attr).into_iter().next(),
			None => None,
		};
		let Some(name) = name else {
			self.errors.push(
				OxcDiagnostic::error("`<using>` requires an `as` attribute naming the value")
					.with_label(element.opening_element.span),
			);
			return self.build.undefined(span);
		};

		let body = self.take_children(&mut element);
		let guarded = self.build.conditional(
			span,
			self.build.identifier(span, name),
			body,
			self.build.null(span),
		);

		self.build.iife(
			span,
			[
				self.build
					.variable_declaration(span, VariableDeclarationKind::Const, name, value),
				self.build.return_statement(span, guarded),
			],
		)
	}

	/// Lowers `<g>` into an array of its children, keying every element.
	fn lower_group(&mut self, element: Box<'a, JSXElement<'a>>) -> Expression<'a> {
		let mut element = element.unbox();
		let span = element.span;

		let mut position = 0usize;
		for child in element.children.iter_mut() {
			if let JSXChild::Element(child) = child {
				let child_span = child.span;
				let attributes: &mut Vec<'a, JSXAttributeItem<'a>> =
					&mut child.opening_element.attributes;
				if !has_attribute(attributes, KEY_ATTR) {
					attributes.push(self.build.jsx_string_attribute(
						child_span,
						KEY_ATTR,
						&position.to_string(),
					));
				}
				position += 1;
			}
		}

		let children = std::mem::replace(&mut element.children, Vec::new_in(self.build.allocator));
		let entries = children_to_expressions(self.build, children);
		self.build.array(span, entries)
	}
}
