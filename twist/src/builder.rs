//! Constructors for the AST nodes the transforms synthesize.
//!
//! Nodes are built as plain struct literals in the arena; scope, symbol and
//! reference ids are left unset since synthesized code is never walked again.

use std::cell::Cell;

use oxc::{
	allocator::{Allocator, Box, FromIn, Vec},
	ast::ast::{
		Argument, ArrayExpression, ArrowFunctionExpression, AssignmentExpression,
		AssignmentOperator, AssignmentTarget, BinaryExpression, BinaryOperator, BindingIdentifier,
		BindingPattern, BindingPatternKind, BooleanLiteral, CallExpression, ComputedMemberExpression,
		ConditionalExpression, Expression, ExpressionStatement, FormalParameter,
		FormalParameterKind, FormalParameters, FunctionBody, IdentifierName, IdentifierReference,
		JSXAttribute, JSXAttributeItem, JSXAttributeName, JSXAttributeValue, JSXChild,
		JSXExpressionContainer, JSXIdentifier, LogicalExpression, LogicalOperator, NullLiteral,
		ObjectExpression, ObjectProperty, ObjectPropertyKind, ParenthesizedExpression,
		PropertyKey, PropertyKind, ReturnStatement, SequenceExpression, Statement,
		StaticMemberExpression, StringLiteral, ThisExpression, UnaryExpression, UnaryOperator,
		VariableDeclaration, VariableDeclarationKind, VariableDeclarator,
	},
	span::{Atom, Span},
	syntax::identifier::is_identifier_name,
};

/// Arena-backed node constructor.
#[derive(Clone, Copy)]
pub struct NodeBuilder<'a> {
	/// The underlying Bumpalo allocator.
	pub allocator: &'a Allocator,
}

impl<'a> NodeBuilder<'a> {
	/// Creates a builder over the given allocator.
	pub fn new(allocator: &'a Allocator) -> Self {
		Self { allocator }
	}

	/// Moves a value into the arena.
	pub fn alloc<T>(self, value: T) -> Box<'a, T> {
		Box::new_in(value, self.allocator)
	}

	/// Copies a string into the arena.
	pub fn atom(self, value: &str) -> Atom<'a> {
		Atom::from_in(value, self.allocator)
	}

	/// Collects into an arena vector.
	pub fn vec_from<T>(self, iter: impl IntoIterator<Item = T>) -> Vec<'a, T> {
		Vec::from_iter_in(iter, self.allocator)
	}

	/// `name`
	pub fn identifier(self, span: Span, name: Atom<'a>) -> Expression<'a> {
		Expression::Identifier(self.alloc(self.identifier_reference(span, name)))
	}

	/// An unresolved identifier reference.
	pub fn identifier_reference(self, span: Span, name: Atom<'a>) -> IdentifierReference<'a> {
		IdentifierReference {
			span,
			name,
			reference_id: Cell::new(None),
		}
	}

	/// A binding with no symbol attached.
	pub fn binding_identifier(self, span: Span, name: Atom<'a>) -> BindingIdentifier<'a> {
		BindingIdentifier {
			span,
			name,
			symbol_id: Cell::new(None),
		}
	}

	/// A plain identifier binding pattern.
	pub fn binding_pattern(self, span: Span, name: Atom<'a>) -> BindingPattern<'a> {
		BindingPattern {
			kind: BindingPatternKind::BindingIdentifier(
				self.alloc(self.binding_identifier(span, name)),
			),
			type_annotation: None,
			optional: false,
		}
	}

	/// A string literal node.
	pub fn string_literal(self, span: Span, value: &str) -> StringLiteral<'a> {
		StringLiteral {
			span,
			value: self.atom(value),
			raw: None,
			lossy: false,
		}
	}

	/// `"value"`
	pub fn string(self, span: Span, value: &str) -> Expression<'a> {
		Expression::StringLiteral(self.alloc(self.string_literal(span, value)))
	}

	/// `true` / `false`
	pub fn boolean(self, span: Span, value: bool) -> Expression<'a> {
		Expression::BooleanLiteral(self.alloc(BooleanLiteral { span, value }))
	}

	/// `null`
	pub fn null(self, span: Span) -> Expression<'a> {
		Expression::NullLiteral(self.alloc(NullLiteral { span }))
	}

	/// `undefined`
	pub fn undefined(self, span: Span) -> Expression<'a> {
		self.identifier(span, Atom::new_const(crate::constants::UNDEFINED))
	}

	/// `this`
	pub fn this(self, span: Span) -> Expression<'a> {
		Expression::ThisExpression(self.alloc(ThisExpression { span }))
	}

	/// `object.property`
	pub fn static_member(
		self,
		span: Span,
		object: Expression<'a>,
		property: &str,
	) -> Expression<'a> {
		Expression::StaticMemberExpression(self.alloc(StaticMemberExpression {
			span,
			object,
			property: IdentifierName {
				span,
				name: self.atom(property),
			},
			optional: false,
		}))
	}

	/// `this[slot]`
	fn this_slot_member(self, span: Span, slot: Atom<'a>) -> Box<'a, ComputedMemberExpression<'a>> {
		self.alloc(ComputedMemberExpression {
			span,
			object: self.this(span),
			expression: self.identifier(span, slot),
			optional: false,
		})
	}

	/// `this[slot]` as an expression.
	pub fn this_slot(self, span: Span, slot: Atom<'a>) -> Expression<'a> {
		Expression::ComputedMemberExpression(self.this_slot_member(span, slot))
	}

	/// `this[slot]` as an assignment target.
	pub fn this_slot_target(self, span: Span, slot: Atom<'a>) -> AssignmentTarget<'a> {
		AssignmentTarget::ComputedMemberExpression(self.this_slot_member(span, slot))
	}

	/// Converts an identifier or member expression into an assignment target.
	///
	/// Returns `None` for anything that cannot be assigned to.
	pub fn assignment_target(self, expr: Expression<'a>) -> Option<AssignmentTarget<'a>> {
		match expr.into_inner_expression() {
			Expression::Identifier(ident) => {
				Some(AssignmentTarget::AssignmentTargetIdentifier(ident))
			}
			Expression::StaticMemberExpression(member) => {
				Some(AssignmentTarget::StaticMemberExpression(member))
			}
			Expression::ComputedMemberExpression(member) => {
				Some(AssignmentTarget::ComputedMemberExpression(member))
			}
			Expression::PrivateFieldExpression(member) => {
				Some(AssignmentTarget::PrivateFieldExpression(member))
			}
			_ => None,
		}
	}

	/// `callee(...arguments)`
	pub fn call(
		self,
		span: Span,
		callee: Expression<'a>,
		arguments: impl IntoIterator<Item = Argument<'a>>,
	) -> Expression<'a> {
		let callee = match callee {
			Expression::ArrowFunctionExpression(_) | Expression::FunctionExpression(_) => {
				self.parenthesized(span, callee)
			}
			other => other,
		};

		Expression::CallExpression(self.alloc(CallExpression {
			span,
			callee,
			type_arguments: None,
			arguments: self.vec_from(arguments),
			optional: false,
			pure: false,
		}))
	}

	/// `left && right`, `left || right`, ...
	pub fn logical(
		self,
		span: Span,
		left: Expression<'a>,
		operator: LogicalOperator,
		right: Expression<'a>,
	) -> Expression<'a> {
		Expression::LogicalExpression(self.alloc(LogicalExpression {
			span,
			left,
			operator,
			right,
		}))
	}

	/// `test ? consequent : alternate`
	pub fn conditional(
		self,
		span: Span,
		test: Expression<'a>,
		consequent: Expression<'a>,
		alternate: Expression<'a>,
	) -> Expression<'a> {
		Expression::ConditionalExpression(self.alloc(ConditionalExpression {
			span,
			test,
			consequent,
			alternate,
		}))
	}

	/// `operator argument`
	pub fn unary(self, span: Span, operator: UnaryOperator, argument: Expression<'a>) -> Expression<'a> {
		Expression::UnaryExpression(self.alloc(UnaryExpression {
			span,
			operator,
			argument,
		}))
	}

	/// `left === right`
	pub fn strict_equals(
		self,
		span: Span,
		left: Expression<'a>,
		right: Expression<'a>,
	) -> Expression<'a> {
		Expression::BinaryExpression(self.alloc(BinaryExpression {
			span,
			left,
			operator: BinaryOperator::StrictEquality,
			right,
		}))
	}

	/// `(a, b, c)`
	pub fn sequence(
		self,
		span: Span,
		expressions: impl IntoIterator<Item = Expression<'a>>,
	) -> Expression<'a> {
		Expression::SequenceExpression(self.alloc(SequenceExpression {
			span,
			expressions: self.vec_from(expressions),
		}))
	}

	/// `target = right`
	pub fn assign(
		self,
		span: Span,
		left: AssignmentTarget<'a>,
		right: Expression<'a>,
	) -> Expression<'a> {
		Expression::AssignmentExpression(self.alloc(AssignmentExpression {
			span,
			operator: AssignmentOperator::Assign,
			left,
			right,
		}))
	}

	/// `[a, b, c]`
	pub fn array(
		self,
		span: Span,
		elements: impl IntoIterator<Item = Expression<'a>>,
	) -> Expression<'a> {
		Expression::ArrayExpression(self.alloc(ArrayExpression {
			span,
			elements: self.vec_from(elements.into_iter().map(Into::into)),
			trailing_comma: None,
		}))
	}

	/// `(expr)`
	pub fn parenthesized(self, span: Span, expression: Expression<'a>) -> Expression<'a> {
		Expression::ParenthesizedExpression(self.alloc(ParenthesizedExpression { span, expression }))
	}

	/// A property key, quoted only when the name is not an identifier.
	pub fn property_key(self, span: Span, name: &str) -> PropertyKey<'a> {
		if is_identifier_name(name) {
			PropertyKey::StaticIdentifier(self.alloc(IdentifierName {
				span,
				name: self.atom(name),
			}))
		} else {
			PropertyKey::StringLiteral(self.alloc(self.string_literal(span, name)))
		}
	}

	/// `{ key: value, ... }`
	pub fn object<S: AsRef<str>>(
		self,
		span: Span,
		properties: impl IntoIterator<Item = (S, Expression<'a>)>,
	) -> Expression<'a> {
		Expression::ObjectExpression(self.alloc(ObjectExpression {
			span,
			properties: self.vec_from(properties.into_iter().map(|(key, value)| {
				ObjectPropertyKind::ObjectProperty(self.alloc(ObjectProperty {
					span,
					kind: PropertyKind::Init,
					key: self.property_key(span, key.as_ref()),
					value,
					method: false,
					shorthand: false,
					computed: false,
				}))
			})),
			trailing_comma: None,
		}))
	}

	/// A plain identifier parameter.
	pub fn formal_parameter(self, span: Span, name: Atom<'a>) -> FormalParameter<'a> {
		FormalParameter {
			span,
			decorators: Vec::new_in(self.allocator),
			pattern: self.binding_pattern(span, name),
			accessibility: None,
			readonly: false,
			r#override: false,
		}
	}

	/// Arrow parameter list of plain identifiers.
	fn arrow_parameters(self, span: Span, params: &[Atom<'a>]) -> Box<'a, FormalParameters<'a>> {
		self.alloc(FormalParameters {
			span,
			kind: FormalParameterKind::ArrowFormalParameters,
			items: self.vec_from(params.iter().map(|name| self.formal_parameter(span, *name))),
			rest: None,
		})
	}

	/// Builds an arrow function from its parameters and body statements.
	fn arrow_function(
		self,
		span: Span,
		params: &[Atom<'a>],
		expression: bool,
		statements: Vec<'a, Statement<'a>>,
	) -> Expression<'a> {
		Expression::ArrowFunctionExpression(self.alloc(ArrowFunctionExpression {
			span,
			expression,
			r#async: false,
			type_parameters: None,
			params: self.arrow_parameters(span, params),
			return_type: None,
			body: self.alloc(FunctionBody {
				span,
				directives: Vec::new_in(self.allocator),
				statements,
			}),
			scope_id: Cell::new(None),
			pure: false,
		}))
	}

	/// `(params) => body`
	pub fn arrow(self, span: Span, params: &[Atom<'a>], body: Expression<'a>) -> Expression<'a> {
		let statements = Vec::from_array_in([self.expression_statement(span, body)], self.allocator);
		self.arrow_function(span, params, true, statements)
	}

	/// `(() => { statements })()`
	pub fn iife(
		self,
		span: Span,
		statements: impl IntoIterator<Item = Statement<'a>>,
	) -> Expression<'a> {
		let arrow = self.arrow_function(span, &[], false, self.vec_from(statements));
		self.call(span, arrow, [])
	}

	/// `expr;`
	pub fn expression_statement(self, span: Span, expression: Expression<'a>) -> Statement<'a> {
		Statement::ExpressionStatement(self.alloc(ExpressionStatement { span, expression }))
	}

	/// `return expr;`
	pub fn return_statement(self, span: Span, argument: Expression<'a>) -> Statement<'a> {
		Statement::ReturnStatement(self.alloc(ReturnStatement {
			span,
			argument: Some(argument),
		}))
	}

	/// `kind name = init;`
	pub fn variable_declaration(
		self,
		span: Span,
		kind: VariableDeclarationKind,
		name: Atom<'a>,
		init: Expression<'a>,
	) -> Statement<'a> {
		Statement::VariableDeclaration(self.alloc(VariableDeclaration {
			span,
			kind,
			declarations: Vec::from_array_in(
				[VariableDeclarator {
					span,
					kind,
					id: self.binding_pattern(span, name),
					init: Some(init),
					definite: false,
				}],
				self.allocator,
			),
			declare: false,
		}))
	}

	/// `{expr}` in attribute-value position.
	pub fn jsx_expression_value(self, span: Span, expr: Expression<'a>) -> JSXAttributeValue<'a> {
		JSXAttributeValue::ExpressionContainer(self.alloc(JSXExpressionContainer {
			span,
			expression: expr.into(),
		}))
	}

	/// `{expr}` in child position.
	pub fn jsx_expression_child(self, span: Span, expr: Expression<'a>) -> JSXChild<'a> {
		JSXChild::ExpressionContainer(self.alloc(JSXExpressionContainer {
			span,
			expression: expr.into(),
		}))
	}

	/// `name={value}`
	pub fn jsx_attribute(
		self,
		span: Span,
		name: &str,
		value: JSXAttributeValue<'a>,
	) -> JSXAttributeItem<'a> {
		JSXAttributeItem::Attribute(self.alloc(JSXAttribute {
			span,
			name: JSXAttributeName::Identifier(self.alloc(JSXIdentifier {
				span,
				name: self.atom(name),
			})),
			value: Some(value),
		}))
	}

	/// `name={expr}`
	pub fn jsx_expression_attribute(
		self,
		span: Span,
		name: &str,
		expr: Expression<'a>,
	) -> JSXAttributeItem<'a> {
		self.jsx_attribute(span, name, self.jsx_expression_value(span, expr))
	}

	/// `name="value"`
	pub fn jsx_string_attribute(self, span: Span, name: &str, value: &str) -> JSXAttributeItem<'a> {
		self.jsx_attribute(
			span,
			name,
			JSXAttributeValue::StringLiteral(self.alloc(self.string_literal(span, value))),
		)
	}
}
