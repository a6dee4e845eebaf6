//! High level CLI-as-a-library for the Twist compiler.
//!
//! This is directly called to by the `twist` CLI binary, and by the
//! fixture test harness. It's a thin wrapper; embedders that already hold
//! an `oxc` program should call [`twist::transform()`] instead.
use std::{
	path::{Path, PathBuf},
	sync::Arc,
};

use clap::Parser;
use oxc::{
	allocator::Allocator,
	codegen::{Codegen, CodegenOptions},
	diagnostics::{OxcDiagnostic, Severity},
	mangler::{MangleOptions, MangleOptionsKeepNames},
	semantic::SemanticBuilder,
	span::SourceType,
};
use twist::{PreparedSource, TransformOptions, runtime::RuntimeHelper};

/// The Twist JSX dialect compiler.
#[derive(Debug, Default, Parser)]
pub struct Args {
	/// Where to output the compiled module. Defaults to
	/// stdout; intermediate folders must exist
	#[arg(short = 'o', long = "output")]
	pub output: Option<String>,
	/// A JSON file with transform options
	/// (camel-cased, e.g. `{"arrowLifting": false}`)
	#[arg(short = 'c', long = "config")]
	pub config: Option<PathBuf>,
	/// The package that provides the runtime helpers;
	/// overrides `moduleName` from the config. Helpers
	/// are inlined when neither is given
	#[arg(short = 'M', long = "module-name")]
	pub module_name: Option<String>,
	/// Treat warnings as errors
	#[arg(short = 'W')]
	pub warnings_as_errors: bool,
	/// Minify (and mangle) the output
	#[arg(long = "minify")]
	pub minify: bool,
	/// When set, enables sourcemaps (embedded in the output).
	#[arg(short = 'm', long = "map")]
	pub generate_sourcemaps: bool,
	/// Allow typescript syntax in the input
	#[arg(short = 'T', long = "typescript")]
	pub typescript: bool,
	/// Write the runtime helper modules to this directory
	/// and exit
	#[arg(long = "emit-runtime")]
	pub emit_runtime: Option<PathBuf>,
	/// The module to compile
	/// (defaults to stdin)
	pub entry_point: Option<String>,
}

/// The `Ok` result type for the [`run`] function.
#[derive(Debug, Default)]
pub struct Compilation {
	/// The generated code.
	pub code: String,
	/// Any warnings
	pub warnings: Vec<String>,
	/// Any errors; if non-empty, `code` will be empty.
	pub errors: Vec<String>,
	/// The bare message of each warning, in the order of `warnings`.
	pub warning_messages: Vec<String>,
	/// The bare message of each error, in the order of `errors`.
	pub error_messages: Vec<String>,
}

impl Compilation {
	/// Renders diagnostics against the source and files them by severity.
	/// Returns the number of errors.
	fn report(
		&mut self,
		diagnostics: impl IntoIterator<Item = OxcDiagnostic>,
		source: &Arc<String>,
		prepared: &PreparedSource,
		warnings_as_errors: bool,
	) -> usize {
		let mut errors = 0;

		for mut diagnostic in diagnostics {
			if warnings_as_errors {
				diagnostic = diagnostic.with_severity(Severity::Error);
			}

			let is_error = diagnostic.severity == Severity::Error;
			let message = diagnostic.message.to_string();
			let rendered = format!(
				"{:?}",
				prepared
					.remap(diagnostic)
					.with_source_code(Arc::clone(source))
			);

			if is_error {
				errors += 1;
				self.errors.push(rendered);
				self.error_messages.push(message);
			} else {
				self.warnings.push(rendered);
				self.warning_messages.push(message);
			}
		}

		errors
	}
}

/// Reads the transform options for `args`.
///
/// The config file, if any, is read first; `--module-name` then overrides
/// its `moduleName`.
pub fn load_options(args: &Args) -> Result<TransformOptions, Box<dyn std::error::Error>> {
	let mut options = match &args.config {
		Some(path) => {
			let json = std::fs::read_to_string(path)
				.map_err(|err| format!("failed to read config {}: {err}", path.display()))?;
			serde_json::from_str::<TransformOptions>(&json)
				.map_err(|err| format!("invalid config {}: {err}", path.display()))?
		}
		None => TransformOptions::default(),
	};

	if let Some(module_name) = &args.module_name {
		options.module_name = Some(module_name.clone());
	}

	Ok(options)
}

/// Writes every runtime helper module to `dir` as `<name>.js`.
pub fn emit_runtime(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
	std::fs::create_dir_all(dir)?;

	RuntimeHelper::ALL
		.iter()
		.map(|helper| {
			let path = dir.join(format!("{}.js", helper.name()));
			std::fs::write(&path, helper.source())?;
			Ok(path)
		})
		.collect()
}

/// Runs the Twist compiler with the given arguments.
///
/// This is identical to running the twist CLI (except for parsing the
/// arguments and `--emit-runtime`).
///
/// `Err` results indicate fatal errors that prevent compilation from completing,
/// such as an unreadable or malformed config file.
/// This does **not** include warnings or syntax errors, which are included in the [`Compilation`]
/// result.
pub fn run(source: String, args: &Args) -> Result<Compilation, Box<dyn std::error::Error>> {
	let options = load_options(args)?;
	let mut result = Compilation::default();

	let source_type = if args.typescript {
		SourceType::tsx()
	} else {
		SourceType::jsx()
	};
	let prepared = PreparedSource::new(&source, source_type);
	let source = Arc::new(source);

	let allocator = Allocator::default();
	let parse_result = oxc::parser::Parser::new(&allocator, &prepared.text, source_type).parse();

	if parse_result.panicked || !parse_result.errors.is_empty() {
		if parse_result.errors.is_empty() {
			return Err("parser panicked, but no errors were reported".into());
		}

		if result.report(parse_result.errors, &source, &prepared, args.warnings_as_errors) > 0 {
			return Ok(result);
		}
	}

	let mut program = parse_result.program;

	let semantic = SemanticBuilder::new()
		.with_check_syntax_error(true)
		.build(&program);

	if result.report(semantic.errors, &source, &prepared, args.warnings_as_errors) > 0 {
		return Ok(result);
	}

	let scoping = semantic.semantic.into_scoping();
	let twist_result = twist::transform(&allocator, &mut program, scoping, &options);

	if result.report(twist_result.errors, &source, &prepared, args.warnings_as_errors) > 0 {
		return Ok(result);
	}

	let codegen_options = CodegenOptions {
		minify: args.minify,
		comments: !args.minify,
		source_map_path: if args.generate_sourcemaps {
			if let Some(ref entry) = args.entry_point {
				Some(entry.into())
			} else {
				Some("twist.js.map".into())
			}
		} else {
			None
		},
		..CodegenOptions::default()
	};

	let scoping = if args.minify {
		let semantic = SemanticBuilder::new()
			.with_check_syntax_error(false)
			.with_scope_tree_child_ids(true)
			.build(&program);

		debug_assert!(semantic.errors.is_empty());

		let options = MangleOptions {
			keep_names: MangleOptionsKeepNames::all_false(),
			top_level: true,
			..MangleOptions::default()
		};

		oxc::mangler::Mangler::new()
			.with_options(options)
			.build_with_semantic(semantic.semantic, &program)
	} else {
		twist_result.scoping
	};

	let generated = Codegen::new()
		.with_options(codegen_options)
		.with_scoping(Some(scoping))
		.build(&program);

	let sourcemap_string = if args.generate_sourcemaps {
		if let Some(ref sourcemap) = generated.map {
			Some(sourcemap.to_data_url())
		} else {
			let message = "sourcemap generation requested, but no sourcemap was generated";
			result.warnings.push(message.into());
			result.warning_messages.push(message.into());
			None
		}
	} else {
		None
	};

	result.code = generated.code;
	if let Some(ref sm) = sourcemap_string {
		result.code.push_str("\n//# sourceMappingURL=");
		result.code.push_str(sm);
	}

	Ok(result)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn compile(source: &str) -> Compilation {
		run(source.to_string(), &Args::default()).unwrap()
	}

	#[test]
	fn passes_plain_modules_through() {
		let result = compile("const a = 1;\n");
		assert!(result.errors.is_empty());
		assert!(result.warnings.is_empty());
		assert!(result.code.contains("const a = 1"));
	}

	#[test]
	fn reports_syntax_errors_without_code() {
		let result = compile("const = ;");
		assert!(!result.errors.is_empty());
		assert!(result.code.is_empty());
	}

	#[test]
	fn promotes_warnings() {
		let source = r#"const el = <div ref="name" />;"#;

		let result = compile(source);
		assert!(result.errors.is_empty());
		assert_eq!(result.warnings.len(), 1);

		let strict = run(source.to_string(), &Args {
			warnings_as_errors: true,
			..Args::default()
		})
		.unwrap();
		assert_eq!(strict.errors.len(), 1);
		assert!(strict.code.is_empty());
	}

	#[test]
	fn missing_condition_is_an_error() {
		let result = compile("const a = <div><if><b /></if></div>;");
		assert_eq!(result.errors.len(), 1);
		assert!(result.errors[0].contains("`<if>` requires a `condition` attribute"));
		assert!(result.code.is_empty());
	}

	#[test]
	fn compiles_comma_binder_lists() {
		let result = compile("const a = <ul><repeat for={item, i in coll}><li>{item}</li></repeat></ul>;");
		assert!(result.errors.is_empty(), "{:?}", result.errors);
		assert!(result.code.contains("key={i}"));
		assert!(result.code.contains("(item, i) =>"));
		assert_eq!(result.warning_messages.len(), 1);
		assert!(result.warning_messages[0].starts_with("Added key={i} to the contents of <repeat>"));
	}

	#[test]
	fn keeps_bare_messages_of_long_warnings() {
		let result = compile(
			"@MyComponent class Legacy { constructor(props) { this.props = props; } }",
		);
		assert_eq!(
			result.warning_messages,
			["Class Legacy's constructor must have two arguments: (props, context). You supplied 1 arguments (props)"]
		);
		assert_eq!(result.warnings.len(), 1);
	}

	#[test]
	fn inlines_helpers_without_module_name() {
		let result = compile(r#"const a = <div class="x" className={y} />;"#);
		assert!(result.errors.is_empty());
		assert!(result.code.contains("function _classes("));
		assert!(!result.code.contains("import"));
	}

	#[test]
	fn module_name_flag_overrides_config() {
		let options = load_options(&Args {
			module_name: Some("@twist/react".into()),
			..Args::default()
		})
		.unwrap();
		assert_eq!(options.module_name.as_deref(), Some("@twist/react"));
	}

	#[test]
	fn missing_config_is_fatal() {
		let result = run(String::new(), &Args {
			config: Some("does/not/exist.json".into()),
			..Args::default()
		});
		assert!(result.is_err());
	}

	#[test]
	fn emits_runtime_sources() {
		let dir = std::env::temp_dir().join(format!("twist-runtime-{}", std::process::id()));
		let written = emit_runtime(&dir).unwrap();
		assert_eq!(written.len(), RuntimeHelper::ALL.len());
		for path in &written {
			assert!(std::fs::read_to_string(path).unwrap().contains("export default"));
		}
		std::fs::remove_dir_all(&dir).unwrap();
	}
}
