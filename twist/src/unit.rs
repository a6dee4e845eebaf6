//! Per-file compilation state.
//!
//! The unit hands out collision-free names, records imports and top-level
//! helper declarations as the transforms request them, and writes all of
//! them to the top of the program once the pass has finished.

use std::collections::{HashMap, HashSet};

use oxc::{
	allocator::{Allocator, Vec},
	ast::ast::{
		BindingIdentifier, Declaration, ExportDefaultDeclarationKind, IdentifierName,
		IdentifierReference, ImportDeclaration, ImportDeclarationSpecifier, ImportDefaultSpecifier,
		ImportOrExportKind, ImportSpecifier, ModuleExportName, Program, Statement,
		VariableDeclarationKind,
	},
	diagnostics::OxcDiagnostic,
	parser::Parser,
	span::{Atom, SourceType, Span},
};
use oxc_ast_visit::Visit;

use crate::{
	builder::NodeBuilder,
	constants::{HINT_THROTTLE, SYMBOL, THROTTLE_UPDATES, THROTTLE_UPDATES_KEY},
	options::{ImportDescriptor, TransformOptions},
	runtime::RuntimeHelper,
};

/// An import requested during the pass.
struct ImportRecord<'a> {
	/// Module specifier.
	module: String,
	/// Imported name; `None` for the default export.
	export: Option<String>,
	/// Local binding.
	local: Atom<'a>,
}

/// Compilation-unit context shared by every transform.
pub struct CompilationUnit<'a> {
	/// Node constructor.
	build: NodeBuilder<'a>,
	/// The options the unit is compiled with.
	pub options: TransformOptions,
	/// Every identifier name that appears in the source or was generated.
	used_names: HashSet<String>,
	/// Names bound at module top level in the source.
	top_level: HashSet<String>,
	/// Imports in request order.
	imports: std::vec::Vec<ImportRecord<'a>>,
	/// Memoized helper bindings, keyed by a stable id.
	helpers: HashMap<String, Atom<'a>>,
	/// Top-level declarations in request order.
	declarations: std::vec::Vec<Statement<'a>>,
	/// Problems found while preparing helpers.
	pub errors: std::vec::Vec<OxcDiagnostic>,
}

impl<'a> CompilationUnit<'a> {
	/// Creates a unit for the given program.
	pub fn new(allocator: &'a Allocator, program: &Program<'a>, options: TransformOptions) -> Self {
		let mut collector = NameCollector::default();
		collector.visit_program(program);

		Self {
			build: NodeBuilder::new(allocator),
			options,
			used_names: collector.names,
			top_level: top_level_bindings(program),
			imports: std::vec::Vec::new(),
			helpers: HashMap::new(),
			declarations: std::vec::Vec::new(),
			errors: std::vec::Vec::new(),
		}
	}

	/// Generates a name that does not clash with anything in the file:
	/// `_hint`, then `_hint2`, `_hint3`, ...
	pub fn generate_uid(&mut self, hint: &str) -> Atom<'a> {
		let base = format!("_{}", hint.trim_start_matches('_'));
		let mut candidate = base.clone();
		let mut counter = 1;
		while self.used_names.contains(&candidate) {
			counter += 1;
			candidate = format!("{base}{counter}");
		}
		let atom = self.build.atom(&candidate);
		self.used_names.insert(candidate);
		atom
	}

	/// Returns a fresh name for a generated function parameter, shared by all
	/// generated functions that use the same hint.
	///
	/// Generated functions never reference user bindings by these names, so
	/// one name per hint is enough.
	pub fn param_name(&mut self, hint: &str) -> Atom<'a> {
		let key = format!("param:{hint}");
		if let Some(name) = self.helpers.get(&key) {
			return *name;
		}
		let name = self.generate_uid(hint);
		self.helpers.insert(key, name);
		name
	}

	/// Whether the source binds `name` at module top level.
	pub fn is_top_level_binding(&self, name: &str) -> bool {
		self.top_level.contains(name)
	}

	/// Adds an import once per `(module, export)` pair and returns its local
	/// name. `export` of `None` is a default import.
	pub fn add_import(&mut self, module: &str, export: Option<&str>, hint: &str) -> Atom<'a> {
		if let Some(existing) = self
			.imports
			.iter()
			.find(|i| i.module == module && i.export.as_deref() == export)
		{
			return existing.local;
		}

		let local = self.generate_uid(hint);
		self.imports.push(ImportRecord {
			module: module.to_string(),
			export: export.map(str::to_string),
			local,
		});
		local
	}

	/// Imports a named export described by the auto-import table.
	pub fn add_descriptor_import(&mut self, descriptor: &ImportDescriptor) -> Atom<'a> {
		self.add_import(&descriptor.module, Some(&descriptor.export), &descriptor.export)
	}

	/// Returns the binding of a helper, declaring it the first time it is
	/// requested under `key`.
	pub fn global_once(
		&mut self,
		key: &str,
		hint: &str,
		declare: impl FnOnce(NodeBuilder<'a>, Atom<'a>) -> Option<Statement<'a>>,
	) -> Atom<'a> {
		if let Some(name) = self.helpers.get(key) {
			return *name;
		}

		let name = self.generate_uid(hint);
		if let Some(statement) = declare(self.build, name) {
			self.declarations.push(statement);
		}
		self.helpers.insert(key.to_string(), name);
		name
	}

	/// Returns the binding for a runtime helper: an import from the runtime
	/// package when a module name is configured, an inlined copy otherwise.
	pub fn runtime_helper(&mut self, helper: RuntimeHelper) -> Atom<'a> {
		if let Some(module_name) = &self.options.module_name {
			let specifier = helper.module_specifier(module_name);
			return self.add_import(&specifier, None, helper.name());
		}

		let mut errors = std::vec::Vec::new();
		let name = self.global_once(helper.name(), helper.name(), |build, name| {
			inline_helper(build, helper, name, &mut errors)
		});
		self.errors.extend(errors);
		name
	}

	/// The `var _t = "throttleUpdates"` binding naming the per-instance
	/// re-render guard.
	pub fn throttle_updates_key(&mut self) -> Atom<'a> {
		self.global_once(THROTTLE_UPDATES_KEY, HINT_THROTTLE, |build, name| {
			Some(build.variable_declaration(
				Span::default(),
				VariableDeclarationKind::Var,
				name,
				build.string(Span::default(), THROTTLE_UPDATES),
			))
		})
	}

	/// Declares a fresh `const _hint = Symbol("hint")` instance slot.
	pub fn instance_slot(&mut self, hint: &str) -> Atom<'a> {
		let name = self.generate_uid(hint);
		let build = self.build;
		let symbol = build.call(
			Span::default(),
			build.identifier(Span::default(), Atom::new_const(SYMBOL)),
			[build.string(Span::default(), hint).into()],
		);
		self.declarations.push(build.variable_declaration(
			Span::default(),
			VariableDeclarationKind::Const,
			name,
			symbol,
		));
		name
	}

	/// Writes imports and declarations to the top of the program, in request
	/// order, and tears the unit down.
	pub fn finalize(self, program: &mut Program<'a>) -> std::vec::Vec<OxcDiagnostic> {
		if self.imports.is_empty() && self.declarations.is_empty() {
			return self.errors;
		}

		let build = self.build;
		let body = std::mem::replace(&mut program.body, Vec::new_in(build.allocator));

		program
			.body
			.extend(self.imports.into_iter().map(|import| import_declaration(build, import)));
		program.body.extend(self.declarations);
		program.body.extend(body);

		self.errors
	}
}

/// Builds `import local from "module"` or `import { export as local } from "module"`.
fn import_declaration<'a>(build: NodeBuilder<'a>, import: ImportRecord<'a>) -> Statement<'a> {
	let span = Span::default();
	let local = build.binding_identifier(span, import.local);
	let specifier = match &import.export {
		None => ImportDeclarationSpecifier::ImportDefaultSpecifier(
			build.alloc(ImportDefaultSpecifier { span, local }),
		),
		Some(export) => ImportDeclarationSpecifier::ImportSpecifier(build.alloc(ImportSpecifier {
			span,
			imported: ModuleExportName::IdentifierName(IdentifierName {
				span,
				name: build.atom(export),
			}),
			local,
			import_kind: ImportOrExportKind::Value,
		})),
	};

	Statement::ImportDeclaration(build.alloc(ImportDeclaration {
		span,
		specifiers: Some(Vec::from_array_in([specifier], build.allocator)),
		source: build.string_literal(span, &import.module),
		phase: None,
		with_clause: None,
		import_kind: ImportOrExportKind::Value,
	}))
}

/// Parses a runtime helper's module source and turns its default export
/// into a top-level `function name(...)` declaration.
fn inline_helper<'a>(
	build: NodeBuilder<'a>,
	helper: RuntimeHelper,
	name: Atom<'a>,
	errors: &mut std::vec::Vec<OxcDiagnostic>,
) -> Option<Statement<'a>> {
	let parsed = Parser::new(build.allocator, helper.source(), SourceType::mjs()).parse();
	if parsed.panicked || !parsed.errors.is_empty() {
		errors.extend(parsed.errors);
		errors.push(OxcDiagnostic::error(format!(
			"failed to parse the `{}` runtime helper",
			helper.name()
		)));
		return None;
	}

	parsed
		.program
		.body
		.into_iter()
		.find_map(|statement| match statement {
			Statement::ExportDefaultDeclaration(export) => match export.unbox().declaration {
				ExportDefaultDeclarationKind::FunctionDeclaration(mut function) => {
					function.id = Some(BindingIdentifier {
						span: Span::default(),
						name,
						symbol_id: std::cell::Cell::new(None),
					});
					Some(Statement::FunctionDeclaration(function))
				}
				_ => None,
			},
			_ => None,
		})
}

/// Collects every identifier name in a program.
#[derive(Default)]
struct NameCollector {
	/// Names seen so far.
	names: HashSet<String>,
}

impl<'a> Visit<'a> for NameCollector {
	fn visit_identifier_reference(&mut self, it: &IdentifierReference<'a>) {
		self.names.insert(it.name.to_string());
	}

	fn visit_binding_identifier(&mut self, it: &BindingIdentifier<'a>) {
		self.names.insert(it.name.to_string());
	}
}

/// Names bound at module top level: imports and declarations.
fn top_level_bindings(program: &Program<'_>) -> HashSet<String> {
	let mut names: HashSet<String> = crate::scope::lexical_names(&program.body)
		.into_iter()
		.chain(crate::scope::var_names(&program.body))
		.collect();

	for statement in program.body.iter() {
		match statement {
			Statement::ImportDeclaration(import) => {
				for specifier in import.specifiers.iter().flatten() {
					let local = match specifier {
						ImportDeclarationSpecifier::ImportSpecifier(s) => &s.local,
						ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => &s.local,
						ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => &s.local,
					};
					names.insert(local.name.to_string());
				}
			}
			Statement::ExportNamedDeclaration(export) => {
				match &export.declaration {
					Some(Declaration::VariableDeclaration(decl)) => {
						for declarator in decl.declarations.iter() {
							for ident in declarator.id.get_binding_identifiers() {
								names.insert(ident.name.to_string());
							}
						}
					}
					Some(Declaration::FunctionDeclaration(func)) => {
						names.extend(func.id.iter().map(|id| id.name.to_string()));
					}
					Some(Declaration::ClassDeclaration(class)) => {
						names.extend(class.id.iter().map(|id| id.name.to_string()));
					}
					_ => {}
				}
			}
			_ => {}
		}
	}

	names
}

#[cfg(test)]
mod tests {
	use oxc::{allocator::Allocator, parser::Parser, span::SourceType};

	use super::*;

	#[test]
	fn generates_unique_names() {
		let allocator = Allocator::default();
		let program = Parser::new(&allocator, "const _handler = 1, _ev = 2;", SourceType::mjs())
			.parse()
			.program;
		let mut unit = CompilationUnit::new(&allocator, &program, TransformOptions::default());

		assert_eq!(unit.generate_uid("handler").as_str(), "_handler2");
		assert_eq!(unit.generate_uid("handler").as_str(), "_handler3");
		assert_eq!(unit.generate_uid("slot").as_str(), "_slot");
		assert_eq!(unit.param_name("ev").as_str(), "_ev2");
		assert_eq!(unit.param_name("ev").as_str(), "_ev2");
	}

	#[test]
	fn deduplicates_imports_and_helpers() {
		let allocator = Allocator::default();
		let mut program =
			Parser::new(&allocator, "import { x } from 'y'; x();", SourceType::mjs())
				.parse()
				.program;
		let options = TransformOptions {
			module_name: Some("@twist/react".into()),
			..TransformOptions::default()
		};
		let mut unit = CompilationUnit::new(&allocator, &program, options);

		assert!(unit.is_top_level_binding("x"));
		let first = unit.runtime_helper(RuntimeHelper::Classes);
		let second = unit.runtime_helper(RuntimeHelper::Classes);
		assert_eq!(first, second);
		assert_eq!(unit.throttle_updates_key(), unit.throttle_updates_key());

		let errors = unit.finalize(&mut program);
		assert!(errors.is_empty());
		assert_eq!(program.body.len(), 4);
		assert!(matches!(program.body[0], Statement::ImportDeclaration(_)));
		assert!(matches!(program.body[1], Statement::VariableDeclaration(_)));
	}

	#[test]
	fn inlines_helpers_without_a_module_name() {
		let allocator = Allocator::default();
		let mut program = Parser::new(&allocator, "f();", SourceType::mjs()).parse().program;
		let mut unit = CompilationUnit::new(&allocator, &program, TransformOptions::default());

		assert_eq!(unit.runtime_helper(RuntimeHelper::Styles).as_str(), "_styles");
		assert!(unit.finalize(&mut program).is_empty());
		let Statement::FunctionDeclaration(function) = &program.body[0] else {
			panic!("expected the inlined helper first");
		};
		assert_eq!(function.id.as_ref().map(|id| id.name.as_str()), Some("_styles"));
	}
}
