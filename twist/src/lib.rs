//! # Twist
//! This is the core library for the Twist JSX dialect compiler.
//!
//! [`transform()`] lowers the dialect's control-flow tags, attribute
//! shorthands, two-way bindings and component conventions into plain JSX
//! in a single walk over an `oxc` program. Helper imports and declarations
//! are written to the top of the program once the walk has finished.

mod builder;
mod constants;
mod element;
pub mod options;
pub mod runtime;
mod scope;
pub mod source;
mod tag;
mod traverser;
mod unit;

use oxc::{allocator::Allocator, ast::ast::Program, diagnostics::OxcDiagnostic, semantic::Scoping};

pub use self::{
	options::{AutoImportTable, ImportDescriptor, TransformOptions},
	source::PreparedSource,
};
use self::{traverser::TwistTraverser, unit::CompilationUnit};

/// The result of a [`transform()`] call.
pub struct TwistTransformResult {
	/// The scoping information handed back by the traversal.
	pub scoping: Scoping,
	/// Warnings and errors emitted during the transformation.
	pub errors: Vec<OxcDiagnostic>,
}

/// Transforms the given program in place.
///
/// `scoping` must come from a semantic analysis of `program`; synthesized
/// nodes are not registered with it, so callers that need exact symbol
/// tables afterwards (e.g. for mangling) should rebuild them.
#[must_use]
pub fn transform<'a>(
	allocator: &'a Allocator,
	program: &mut Program<'a>,
	scoping: Scoping,
	options: &TransformOptions,
) -> TwistTransformResult {
	let unit = CompilationUnit::new(allocator, program, options.clone());
	let mut traverser = TwistTraverser::new_in(unit, allocator);
	let scoping = oxc_traverse::traverse_mut(&mut traverser, allocator, program, scoping);

	let TwistTraverser {
		unit, mut errors, ..
	} = traverser;
	errors.extend(unit.finalize(program));

	TwistTransformResult { scoping, errors }
}
