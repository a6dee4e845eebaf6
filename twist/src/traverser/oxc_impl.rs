use oxc::ast::ast::{
	ArrowFunctionExpression, BlockStatement, CatchClause, Class, Expression, ForInStatement,
	ForOfStatement, ForStatement, Function, FunctionType, JSXAttributeValue, JSXElement, JSXFragment,
	MethodDefinition, MethodDefinitionKind, Program, SwitchStatement,
};
use oxc_traverse::{Traverse, TraverseCtx};

use crate::scope::{
	ScopeKind, binding_names, for_init_names, for_left_names, lexical_names, parameter_names,
	var_names,
};

impl<'a> Traverse<'a> for super::TwistTraverser<'a> {
	fn enter_method_definition(
		&mut self,
		node: &mut MethodDefinition<'a>,
		_ctx: &mut TraverseCtx<'a>,
	) {
		if !node.r#static && node.kind != MethodDefinitionKind::Constructor {
			self.instance_methods
				.insert(Self::function_key(&node.value));
		}
	}

	fn enter_function(&mut self, node: &mut Function<'a>, _ctx: &mut TraverseCtx<'a>) {
		let instance_method = self.instance_methods.contains(&Self::function_key(node));

		let mut bindings = parameter_names(&node.params);
		if node.r#type == FunctionType::FunctionExpression
			&& let Some(id) = &node.id
		{
			bindings.push(id.name.to_string());
		}
		if let Some(body) = &node.body {
			bindings.extend(var_names(&body.statements));
			bindings.extend(lexical_names(&body.statements));
		}

		self.scopes
			.push(ScopeKind::Function { instance_method }, bindings);
	}

	fn exit_function(&mut self, node: &mut Function<'a>, _ctx: &mut TraverseCtx<'a>) {
		let scope = self.scopes.pop();
		let lifted = self.scopes.take_queued(scope);
		if lifted.is_empty() {
			return;
		}

		if let Some(body) = &mut node.body {
			let rest = std::mem::replace(&mut body.statements, self.build.vec_from(lifted));
			body.statements.extend(rest);
		}
	}

	fn enter_arrow_function_expression(
		&mut self,
		node: &mut ArrowFunctionExpression<'a>,
		_ctx: &mut TraverseCtx<'a>,
	) {
		let mut bindings = parameter_names(&node.params);
		bindings.extend(var_names(&node.body.statements));
		bindings.extend(lexical_names(&node.body.statements));
		self.scopes.push(ScopeKind::Arrow, bindings);
	}

	fn exit_arrow_function_expression(
		&mut self,
		_node: &mut ArrowFunctionExpression<'a>,
		_ctx: &mut TraverseCtx<'a>,
	) {
		self.scopes.pop();
	}

	fn enter_block_statement(&mut self, node: &mut BlockStatement<'a>, _ctx: &mut TraverseCtx<'a>) {
		self.scopes
			.push(ScopeKind::Block, lexical_names(&node.body));
	}

	fn exit_block_statement(&mut self, _node: &mut BlockStatement<'a>, _ctx: &mut TraverseCtx<'a>) {
		self.scopes.pop();
	}

	fn enter_catch_clause(&mut self, node: &mut CatchClause<'a>, _ctx: &mut TraverseCtx<'a>) {
		let bindings = node
			.param
			.as_ref()
			.map(|param| binding_names(&param.pattern))
			.unwrap_or_default();
		self.scopes.push(ScopeKind::Block, bindings);
	}

	fn exit_catch_clause(&mut self, _node: &mut CatchClause<'a>, _ctx: &mut TraverseCtx<'a>) {
		self.scopes.pop();
	}

	fn enter_for_statement(&mut self, node: &mut ForStatement<'a>, _ctx: &mut TraverseCtx<'a>) {
		self.scopes
			.push(ScopeKind::Block, for_init_names(node.init.as_ref()));
	}

	fn exit_for_statement(&mut self, _node: &mut ForStatement<'a>, _ctx: &mut TraverseCtx<'a>) {
		self.scopes.pop();
	}

	fn enter_for_in_statement(&mut self, node: &mut ForInStatement<'a>, _ctx: &mut TraverseCtx<'a>) {
		self.scopes
			.push(ScopeKind::Block, for_left_names(&node.left));
	}

	fn exit_for_in_statement(&mut self, _node: &mut ForInStatement<'a>, _ctx: &mut TraverseCtx<'a>) {
		self.scopes.pop();
	}

	fn enter_for_of_statement(&mut self, node: &mut ForOfStatement<'a>, _ctx: &mut TraverseCtx<'a>) {
		self.scopes
			.push(ScopeKind::Block, for_left_names(&node.left));
	}

	fn exit_for_of_statement(&mut self, _node: &mut ForOfStatement<'a>, _ctx: &mut TraverseCtx<'a>) {
		self.scopes.pop();
	}

	fn enter_switch_statement(
		&mut self,
		node: &mut SwitchStatement<'a>,
		_ctx: &mut TraverseCtx<'a>,
	) {
		let bindings = node
			.cases
			.iter()
			.flat_map(|case| lexical_names(&case.consequent))
			.collect::<std::vec::Vec<_>>();
		self.scopes.push(ScopeKind::Block, bindings);
	}

	fn exit_switch_statement(
		&mut self,
		_node: &mut SwitchStatement<'a>,
		_ctx: &mut TraverseCtx<'a>,
	) {
		self.scopes.pop();
	}

	fn enter_class(&mut self, node: &mut Class<'a>, _ctx: &mut TraverseCtx<'a>) {
		self.inner_enter_class(node);
	}

	fn exit_class(&mut self, _node: &mut Class<'a>, _ctx: &mut TraverseCtx<'a>) {
		self.class_stack.pop();
	}

	fn enter_jsx_element(&mut self, node: &mut JSXElement<'a>, _ctx: &mut TraverseCtx<'a>) {
		self.inner_enter_jsx_element(node);
	}

	fn exit_jsx_element(&mut self, node: &mut JSXElement<'a>, _ctx: &mut TraverseCtx<'a>) {
		self.inner_exit_jsx_element(node);
	}

	fn exit_jsx_fragment(&mut self, node: &mut JSXFragment<'a>, _ctx: &mut TraverseCtx<'a>) {
		self.rewrite_children(&mut node.children, None);
	}

	fn exit_expression(&mut self, node: &mut Expression<'a>, _ctx: &mut TraverseCtx<'a>) {
		if let Expression::JSXElement(element) = node
			&& self.wants_standalone_rewrite(element)
		{
			let span = element.span;
			if let Expression::JSXElement(element) =
				std::mem::replace(node, self.build.null(span))
			{
				*node = self.rewrite_standalone(element);
			}
		}
	}

	fn exit_jsx_attribute_value(
		&mut self,
		node: &mut JSXAttributeValue<'a>,
		_ctx: &mut TraverseCtx<'a>,
	) {
		if let JSXAttributeValue::Element(element) = node
			&& self.wants_standalone_rewrite(element)
		{
			let span = element.span;
			if let JSXAttributeValue::Element(element) =
				std::mem::replace(node, self.build.jsx_expression_value(span, self.build.null(span)))
			{
				let expr = self.rewrite_standalone(element);
				*node = self.build.jsx_expression_value(span, expr);
			}
		}
	}

	fn exit_program(&mut self, _node: &mut Program<'a>, _ctx: &mut TraverseCtx<'a>) {
		debug_assert!(self.scopes.is_balanced());
	}
}
