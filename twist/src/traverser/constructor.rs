use oxc::{
	ast::ast::{
		BindingPattern, BindingPatternKind, Class, ClassElement, Expression, FunctionBody,
		MethodDefinitionKind, Statement,
	},
	span::{Atom, Span},
};

use super::auto_import::decorator_identifier;
use crate::{
	builder::NodeBuilder,
	constants::{COMPONENT_SUFFIX, CONTEXT, PROPS},
};

/// How a constructor parameter reads in a diagnostic.
fn describe_parameter(pattern: &BindingPattern<'_>) -> String {
	match &pattern.kind {
		BindingPatternKind::BindingIdentifier(ident) => ident.name.to_string(),
		BindingPatternKind::ObjectPattern(_) => "{...}".to_string(),
		BindingPatternKind::ArrayPattern(_) => "[...]".to_string(),
		BindingPatternKind::AssignmentPattern(assignment) => {
			format!("{} = ...", describe_parameter(&assignment.left))
		}
	}
}

/// Makes every top-level `super()` in a constructor body forward
/// `(props, context)`.
fn forward_to_super<'a>(build: NodeBuilder<'a>, body: &mut FunctionBody<'a>) {
	for statement in body.statements.iter_mut() {
		let Statement::ExpressionStatement(statement) = statement else {
			continue;
		};
		let Expression::CallExpression(call) = &mut statement.expression else {
			continue;
		};
		if !matches!(call.callee, Expression::Super(_)) {
			continue;
		}
		let span = call.span;
		call.arguments = build.vec_from(
			[PROPS, CONTEXT].map(|name| build.identifier(span, Atom::new_const(name)).into()),
		);
	}
}

impl<'a> super::TwistTraverser<'a> {
	/// Records whether the class is a decorated component and, if so,
	/// canonicalizes its constructor.
	pub(crate) fn inner_enter_class(&mut self, class: &mut Class<'a>) {
		if !self.options().auto_import.is_empty() {
			self.auto_import_decorators(class);
		}

		let is_component = class.decorators.iter().any(|decorator| {
			decorator_identifier(&decorator.expression)
				.is_some_and(|ident| ident.name.ends_with(COMPONENT_SUFFIX))
		});
		self.class_stack.push(is_component);

		if is_component && self.options().constructor_props {
			self.canonicalize_constructor(class);
		}
	}

	/// Gives a parameterless component constructor the `(props, context)`
	/// signature, and warns about any other signature.
	fn canonicalize_constructor(&mut self, class: &mut Class<'a>) {
		let class_name = class
			.id
			.as_ref()
			.map_or_else(|| "<anonymous>".to_string(), |id| id.name.to_string());
		let build = self.build;

		for element in class.body.body.iter_mut() {
			let ClassElement::MethodDefinition(method) = element else {
				continue;
			};
			if method.kind != MethodDefinitionKind::Constructor {
				continue;
			}

			let params = &mut method.value.params;
			let names: std::vec::Vec<String> = params
				.items
				.iter()
				.map(|param| describe_parameter(&param.pattern))
				.chain(
					params
						.rest
						.iter()
						.map(|rest| format!("...{}", describe_parameter(&rest.argument))),
				)
				.collect();

			if names.is_empty() {
				let span = params.span;
				params.items = build.vec_from(
					[PROPS, CONTEXT].map(|name| build.formal_parameter(span, Atom::new_const(name))),
				);
				if let Some(body) = &mut method.value.body {
					forward_to_super(build, body);
				}
			} else if names != [PROPS, CONTEXT] {
				let span: Span = params.span;
				self.warn(
					span,
					format!(
						"Class {class_name}'s constructor must have two arguments: (props, context). You supplied {} arguments ({})",
						names.len(),
						names.join(", ")
					),
				);
			}
			break;
		}
	}
}
