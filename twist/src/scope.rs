//! Scope chains for capture-safety analysis.
//!
//! Scopes are records in an arena, linked to their parent by index. The
//! traverser keeps one arena for the program being walked; each lifting
//! candidate is analyzed with a private arena of its own.

use std::{cell::Cell, collections::HashSet};

use oxc::{
	ast::ast::{
		BindingIdentifier, BindingPattern, Expression, ForStatementInit, ForStatementLeft,
		FormalParameters, Function, FunctionType, IdentifierReference, Statement,
		VariableDeclarationKind,
	},
	syntax::scope::{ScopeFlags, ScopeId},
};
use oxc_ast_visit::{Visit, walk};

/// Index of a record in a [`ScopeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeIndex(usize);

/// What introduced a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
	/// A non-arrow function. Instance methods carry a `this` that lifted
	/// values can be stored on.
	Function {
		/// Whether the function is a non-static class method.
		instance_method: bool,
	},
	/// An arrow function.
	Arrow,
	/// A block, loop head, catch clause or switch body.
	Block,
	/// Names bound by dialect attributes (`as`, `for`) of an element.
	Binder,
}

/// A single scope.
#[derive(Debug)]
pub struct ScopeRecord<T> {
	/// The enclosing scope.
	pub parent: Option<ScopeIndex>,
	/// What introduced this scope.
	pub kind: ScopeKind,
	/// Names declared directly in this scope.
	pub bindings: HashSet<String>,
	/// Items queued against this scope by the transforms.
	pub queued: std::vec::Vec<T>,
}

/// Arena of scope records with a cursor at the innermost open scope.
#[derive(Debug)]
pub struct ScopeArena<T = ()> {
	/// All records ever opened; closed records stay in place.
	records: std::vec::Vec<ScopeRecord<T>>,
	/// The innermost open scope.
	current: Option<ScopeIndex>,
}

impl<T> Default for ScopeArena<T> {
	fn default() -> Self {
		Self {
			records: std::vec::Vec::new(),
			current: None,
		}
	}
}

impl<T> ScopeArena<T> {
	/// Opens a child of the current scope.
	pub fn push(&mut self, kind: ScopeKind, bindings: impl IntoIterator<Item = String>) -> ScopeIndex {
		let index = ScopeIndex(self.records.len());
		self.records.push(ScopeRecord {
			parent: self.current,
			kind,
			bindings: bindings.into_iter().collect(),
			queued: std::vec::Vec::new(),
		});
		self.current = Some(index);
		index
	}

	/// Closes the current scope and returns it.
	///
	/// # Panics
	/// Panics when no scope is open; pushes and pops are paired by the
	/// enter/exit hooks.
	pub fn pop(&mut self) -> ScopeIndex {
		let index = self.current.expect("scope arena underflow");
		self.current = self.records[index.0].parent;
		index
	}

	/// The innermost open scope.
	pub fn current(&self) -> Option<ScopeIndex> {
		self.current
	}

	/// Whether every opened scope has been closed.
	pub fn is_balanced(&self) -> bool {
		self.current.is_none()
	}

	/// Returns a record.
	pub fn get(&self, index: ScopeIndex) -> &ScopeRecord<T> {
		&self.records[index.0]
	}

	/// Returns a record mutably.
	pub fn get_mut(&mut self, index: ScopeIndex) -> &mut ScopeRecord<T> {
		&mut self.records[index.0]
	}

	/// Adds a name to a scope.
	pub fn bind(&mut self, index: ScopeIndex, name: &str) {
		self.records[index.0].bindings.insert(name.to_string());
	}

	/// Iterates from `from` outwards to the root.
	pub fn ancestors(&self, from: Option<ScopeIndex>) -> impl Iterator<Item = ScopeIndex> + '_ {
		std::iter::successors(from, |index| self.records[index.0].parent)
	}

	/// Finds the scope that binds `name`, starting at `from`.
	pub fn resolve(&self, from: Option<ScopeIndex>, name: &str) -> Option<ScopeIndex> {
		self.ancestors(from)
			.find(|index| self.records[index.0].bindings.contains(name))
	}

	/// The innermost open non-arrow function scope.
	pub fn enclosing_function(&self) -> Option<ScopeIndex> {
		self.ancestors(self.current)
			.find(|index| matches!(self.records[index.0].kind, ScopeKind::Function { .. }))
	}

	/// Whether `name` is bound anywhere from the current scope out to `owner`,
	/// inclusive.
	pub fn is_bound_within(&self, owner: ScopeIndex, name: &str) -> bool {
		for index in self.ancestors(self.current) {
			if self.records[index.0].bindings.contains(name) {
				return true;
			}
			if index == owner {
				break;
			}
		}
		false
	}

	/// Drains the items queued on a scope.
	pub fn take_queued(&mut self, index: ScopeIndex) -> std::vec::Vec<T> {
		std::mem::take(&mut self.records[index.0].queued)
	}
}

/// Finds the identifiers an expression references but does not bind itself.
///
/// Names are returned in first-reference order without duplicates.
pub fn free_identifiers(expr: &Expression<'_>) -> std::vec::Vec<String> {
	let mut analyzer = CaptureAnalyzer::default();
	analyzer.scopes.push(ScopeKind::Block, []);
	analyzer.visit_expression(expr);
	analyzer.scopes.pop();

	let mut free: std::vec::Vec<String> = std::vec::Vec::new();
	for (name, scope) in analyzer.references {
		if analyzer.scopes.resolve(scope, &name).is_none() && !free.contains(&name) {
			free.push(name);
		}
	}
	free
}

/// Records bindings and references per scope while visiting a candidate.
///
/// Resolution happens after the visit so that hoisted bindings declared
/// after their use are still found.
#[derive(Default)]
struct CaptureAnalyzer {
	/// Scopes opened inside the candidate.
	scopes: ScopeArena,
	/// Every reference with the scope it occurred in.
	references: std::vec::Vec<(String, Option<ScopeIndex>)>,
}

impl<'a> Visit<'a> for CaptureAnalyzer {
	fn enter_scope(&mut self, _flags: ScopeFlags, _scope_id: &Cell<Option<ScopeId>>) {
		self.scopes.push(ScopeKind::Block, []);
	}

	fn leave_scope(&mut self) {
		self.scopes.pop();
	}

	fn visit_function(&mut self, it: &Function<'a>, flags: ScopeFlags) {
		if it.r#type == FunctionType::FunctionDeclaration
			&& let Some(id) = &it.id
			&& let Some(scope) = self.scopes.current()
		{
			self.scopes.bind(scope, &id.name);
		}
		walk::walk_function(self, it, flags);
	}

	fn visit_binding_identifier(&mut self, it: &BindingIdentifier<'a>) {
		if let Some(scope) = self.scopes.current() {
			self.scopes.bind(scope, &it.name);
		}
	}

	fn visit_identifier_reference(&mut self, it: &IdentifierReference<'a>) {
		self.references
			.push((it.name.to_string(), self.scopes.current()));
	}
}

/// Names bound by a parameter list.
pub fn parameter_names(params: &FormalParameters<'_>) -> std::vec::Vec<String> {
	let mut names = std::vec::Vec::new();
	for param in params.items.iter() {
		pattern_names(&param.pattern, &mut names);
	}
	if let Some(rest) = &params.rest {
		pattern_names(&rest.argument, &mut names);
	}
	names
}

/// Names bound by a (possibly destructuring) pattern.
pub fn binding_names(pattern: &BindingPattern<'_>) -> std::vec::Vec<String> {
	let mut names = std::vec::Vec::new();
	pattern_names(pattern, &mut names);
	names
}

/// Collects the names bound by a (possibly destructuring) pattern.
fn pattern_names(pattern: &BindingPattern<'_>, out: &mut std::vec::Vec<String>) {
	pattern
		.get_binding_identifiers()
		.iter()
		.for_each(|ident| out.push(ident.name.to_string()));
}

/// Names declared directly in a block: `let`, `const`, classes and
/// function declarations.
pub fn lexical_names(statements: &[Statement<'_>]) -> std::vec::Vec<String> {
	let mut names = std::vec::Vec::new();
	for statement in statements {
		match statement {
			Statement::VariableDeclaration(decl) if decl.kind != VariableDeclarationKind::Var => {
				for declarator in decl.declarations.iter() {
					pattern_names(&declarator.id, &mut names);
				}
			}
			Statement::FunctionDeclaration(func) => {
				if let Some(id) = &func.id {
					names.push(id.name.to_string());
				}
			}
			Statement::ClassDeclaration(class) => {
				if let Some(id) = &class.id {
					names.push(id.name.to_string());
				}
			}
			_ => {}
		}
	}
	names
}

/// Names declared with `var` anywhere in a function body, outside nested
/// functions.
pub fn var_names(statements: &[Statement<'_>]) -> std::vec::Vec<String> {
	let mut names = std::vec::Vec::new();
	for statement in statements {
		collect_var_names(statement, &mut names);
	}
	names
}

/// Recursive worker for [`var_names`].
fn collect_var_names(statement: &Statement<'_>, out: &mut std::vec::Vec<String>) {
	match statement {
		Statement::VariableDeclaration(decl) if decl.kind == VariableDeclarationKind::Var => {
			for declarator in decl.declarations.iter() {
				pattern_names(&declarator.id, out);
			}
		}
		Statement::BlockStatement(block) => {
			block.body.iter().for_each(|s| collect_var_names(s, out));
		}
		Statement::IfStatement(stmt) => {
			collect_var_names(&stmt.consequent, out);
			if let Some(alternate) = &stmt.alternate {
				collect_var_names(alternate, out);
			}
		}
		Statement::ForStatement(stmt) => {
			if let Some(ForStatementInit::VariableDeclaration(decl)) = &stmt.init
				&& decl.kind == VariableDeclarationKind::Var
			{
				decl.declarations
					.iter()
					.for_each(|d| pattern_names(&d.id, out));
			}
			collect_var_names(&stmt.body, out);
		}
		Statement::ForInStatement(stmt) => {
			for_left_var_names(&stmt.left, out);
			collect_var_names(&stmt.body, out);
		}
		Statement::ForOfStatement(stmt) => {
			for_left_var_names(&stmt.left, out);
			collect_var_names(&stmt.body, out);
		}
		Statement::WhileStatement(stmt) => collect_var_names(&stmt.body, out),
		Statement::DoWhileStatement(stmt) => collect_var_names(&stmt.body, out),
		Statement::LabeledStatement(stmt) => collect_var_names(&stmt.body, out),
		Statement::TryStatement(stmt) => {
			stmt.block.body.iter().for_each(|s| collect_var_names(s, out));
			if let Some(handler) = &stmt.handler {
				handler.body.body.iter().for_each(|s| collect_var_names(s, out));
			}
			if let Some(finalizer) = &stmt.finalizer {
				finalizer.body.iter().for_each(|s| collect_var_names(s, out));
			}
		}
		Statement::SwitchStatement(stmt) => {
			for case in stmt.cases.iter() {
				case.consequent.iter().for_each(|s| collect_var_names(s, out));
			}
		}
		_ => {}
	}
}

/// `var` names declared in a `for ... in` / `for ... of` head.
fn for_left_var_names(left: &ForStatementLeft<'_>, out: &mut std::vec::Vec<String>) {
	if let ForStatementLeft::VariableDeclaration(decl) = left
		&& decl.kind == VariableDeclarationKind::Var
	{
		decl.declarations
			.iter()
			.for_each(|d| pattern_names(&d.id, out));
	}
}

/// Lexical names declared in a `for (let ...;;)` head.
pub fn for_init_names(init: Option<&ForStatementInit<'_>>) -> std::vec::Vec<String> {
	let mut names = std::vec::Vec::new();
	if let Some(ForStatementInit::VariableDeclaration(decl)) = init
		&& decl.kind != VariableDeclarationKind::Var
	{
		decl.declarations
			.iter()
			.for_each(|d| pattern_names(&d.id, &mut names));
	}
	names
}

/// Lexical names declared in a `for (const x of ...)` head.
pub fn for_left_names(left: &ForStatementLeft<'_>) -> std::vec::Vec<String> {
	let mut names = std::vec::Vec::new();
	if let ForStatementLeft::VariableDeclaration(decl) = left
		&& decl.kind != VariableDeclarationKind::Var
	{
		decl.declarations
			.iter()
			.for_each(|d| pattern_names(&d.id, &mut names));
	}
	names
}

#[cfg(test)]
mod tests {
	use oxc::{allocator::Allocator, ast::ast::Statement, parser::Parser, span::SourceType};

	use super::*;

	fn free_in(source: &str) -> std::vec::Vec<String> {
		let allocator = Allocator::default();
		let ret = Parser::new(&allocator, source, SourceType::jsx()).parse();
		assert!(ret.errors.is_empty());
		let Some(Statement::ExpressionStatement(stmt)) = ret.program.body.first() else {
			panic!("expected an expression statement");
		};
		free_identifiers(&stmt.expression)
	}

	#[test]
	fn arrow_parameters_are_not_free() {
		assert_eq!(free_in("(e) => e.preventDefault()"), std::vec::Vec::<String>::new());
	}

	#[test]
	fn outer_references_are_free() {
		assert_eq!(free_in("(e) => handle(e, item, item)"), ["handle", "item"]);
	}

	#[test]
	fn nested_declarations_bind_later_uses() {
		assert_eq!(
			free_in("() => { const x = 1; return () => x + helper(); function helper() {} }"),
			std::vec::Vec::<String>::new()
		);
	}

	#[test]
	fn this_members_are_not_identifiers() {
		assert_eq!(free_in("() => this.props.onClick(this.state)"), std::vec::Vec::<String>::new());
	}

	#[test]
	fn arena_resolves_through_parents() {
		let mut arena: ScopeArena = ScopeArena::default();
		let method = arena.push(ScopeKind::Function { instance_method: true }, ["item".to_string()]);
		let block = arena.push(ScopeKind::Block, ["local".to_string()]);
		arena.push(ScopeKind::Binder, []);

		assert_eq!(arena.resolve(arena.current(), "item"), Some(method));
		assert_eq!(arena.resolve(arena.current(), "local"), Some(block));
		assert_eq!(arena.resolve(arena.current(), "window"), None);
		assert_eq!(arena.enclosing_function(), Some(method));
		assert!(arena.is_bound_within(method, "item"));

		arena.pop();
		arena.pop();
		arena.pop();
		assert!(arena.is_balanced());
	}
}
