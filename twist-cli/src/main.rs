//! CLI for the Twist JSX dialect compiler.
use std::io::{Read, Write};

use clap::Parser;
use twist_cli::Args;

fn main() {
	let args = Args::parse();

	if let Some(ref dir) = args.emit_runtime {
		match twist_cli::emit_runtime(dir) {
			Ok(paths) => {
				for path in paths {
					eprintln!("wrote {}", path.display());
				}
				return;
			}
			Err(err) => {
				eprintln!("error: failed to write runtime helpers: {err}");
				std::process::exit(1);
			}
		}
	}

	let source = if let Some(ref entry) = args.entry_point {
		std::fs::read_to_string(entry).unwrap_or_else(|err| {
			eprintln!("error: failed to read entry point {entry}: {err}");
			std::process::exit(1);
		})
	} else {
		let mut str = String::with_capacity(4096);
		if let Err(err) = std::io::stdin().read_to_string(&mut str) {
			eprintln!("error: failed to read stdin: {err}");
			std::process::exit(1);
		}
		str
	};

	let compilation = match twist_cli::run(source, &args) {
		Ok(compilation) => compilation,
		Err(err) => {
			eprintln!("error: {err}");
			std::process::exit(1);
		}
	};

	for warning in &compilation.warnings {
		eprintln!("{warning}");
	}

	if !compilation.errors.is_empty() {
		for error in &compilation.errors {
			eprintln!("{error}");
		}
		eprintln!("\nexiting due to {} errors", compilation.errors.len());
		std::process::exit(1);
	}

	let written = if let Some(ref output) = args.output {
		std::fs::File::create(output).and_then(|mut fd| fd.write_all(compilation.code.as_bytes()))
	} else {
		std::io::stdout().write_all(compilation.code.as_bytes())
	};

	if let Err(err) = written {
		eprintln!("error: failed to write output: {err}");
		std::process::exit(1);
	}
}
