mod as_attribute;
mod auto_import;
mod bind;
mod class;
mod constructor;
mod control_flow;
mod controlled_input;
mod exit_jsx_element;
mod lifting;
mod named_children;
mod oxc_impl;
mod refs;
mod slots;
mod style;

use std::collections::HashSet;

use oxc::{
	allocator::Allocator,
	ast::ast::{Function, Statement},
	diagnostics::OxcDiagnostic,
	span::Span,
};

use crate::{
	builder::NodeBuilder,
	element::ElementMarks,
	options::TransformOptions,
	scope::ScopeArena,
	unit::CompilationUnit,
};

/// Traverser that lowers the Twist JSX dialect.
pub struct TwistTraverser<'a> {
	/// Node constructor over the program's allocator.
	pub build: NodeBuilder<'a>,
	/// Per-file names, imports and helper declarations.
	pub unit: CompilationUnit<'a>,
	/// The scope chain of the walk; function records queue lifted
	/// statements.
	pub scopes: ScopeArena<Statement<'a>>,
	/// Idempotence markers.
	pub marks: ElementMarks,
	/// For each enclosing class, whether it is a decorated component.
	pub class_stack: std::vec::Vec<bool>,
	/// Addresses of functions that are non-static class methods.
	pub instance_methods: HashSet<usize>,
	/// Any errors that were emitted during compilation.
	pub errors: std::vec::Vec<OxcDiagnostic>,
}

impl<'a> TwistTraverser<'a> {
	/// Creates a new traverser using the given Bumpalo allocator.
	pub fn new_in(unit: CompilationUnit<'a>, allocator: &'a Allocator) -> Self {
		Self {
			build: NodeBuilder::new(allocator),
			unit,
			scopes: ScopeArena::default(),
			marks: ElementMarks::default(),
			class_stack: std::vec::Vec::new(),
			instance_methods: HashSet::new(),
			errors: std::vec::Vec::new(),
		}
	}

	/// The options of the unit being compiled.
	pub fn options(&self) -> &TransformOptions {
		&self.unit.options
	}

	/// Whether the innermost enclosing class is a decorated component.
	pub fn in_component_class(&self) -> bool {
		self.class_stack.last().copied().unwrap_or(false)
	}

	/// Emits a warning attributed to `span`.
	pub fn warn(&mut self, span: Span, message: impl Into<std::borrow::Cow<'static, str>>) {
		self.errors
			.push(OxcDiagnostic::warn(message).with_label(span));
	}

	/// Identity of a function node, for [`Self::instance_methods`].
	pub fn function_key(function: &Function<'a>) -> usize {
		std::ptr::from_ref(function).addr()
	}
}
