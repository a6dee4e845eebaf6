#![allow(
	missing_docs,
	clippy::missing_docs_in_private_items,
	clippy::similar_names
)]

use std::{collections::BTreeMap, io::Write, path::PathBuf};

use quote::quote;

#[derive(Debug, Default)]
struct TestSuite {
	jsx_file: Option<PathBuf>,
	out_file: Option<PathBuf>,
	config_file: Option<PathBuf>,
	warnings_file: Option<PathBuf>,
}

fn main() {
	println!("cargo:rerun-if-changed=tests/");
	println!("cargo:rerun-if-changed=build.rs");

	let suites = discover_suites();
	let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
	let dest_path = out_dir.join("tests.rs");

	let mut tests = vec![];

	for (suite_name, suite) in suites {
		let jsx_file = suite
			.jsx_file
			.unwrap_or_else(|| panic!("Suite '{suite_name}' has no {suite_name}.jsx"));
		let out_file = suite
			.out_file
			.unwrap_or_else(|| panic!("Suite '{suite_name}' has no {suite_name}.out.jsx"));

		let jsx_src = read(&jsx_file);
		let out_src = read(&out_file);

		let config = match suite.config_file {
			Some(path) => {
				let path = path.to_string_lossy().to_string();
				quote! { Some(#path) }
			}
			None => quote! { None },
		};

		let warnings: Vec<String> = suite
			.warnings_file
			.map(|path| {
				read(&path)
					.lines()
					.map(str::trim)
					.filter(|line| !line.is_empty())
					.map(str::to_string)
					.collect()
			})
			.unwrap_or_default();

		let test_fn_name = syn::Ident::new(&suite_name, cs());

		tests.push(quote! {
			#[test]
			fn #test_fn_name() {
				crate::check(&crate::Fixture {
					name: #suite_name,
					source: #jsx_src,
					expected: #out_src,
					config: #config,
					warnings: &[#(#warnings),*],
				});
			}
		});
	}

	let ts = quote! {
		#(#tests)*
	};

	let f = syn::parse2::<syn::File>(ts).unwrap();

	let mut file = std::fs::File::create(dest_path).unwrap();
	write!(file, "{}", prettyplease::unparse(&f)).unwrap();
}

fn read(path: &PathBuf) -> String {
	std::fs::read_to_string(path)
		.unwrap_or_else(|_| panic!("Failed to read fixture file: {}", path.display()))
}

fn cs() -> proc_macro2::Span {
	proc_macro2::Span::call_site()
}

fn discover_suites() -> BTreeMap<String, TestSuite> {
	// 1. Crawl `CARGO_MANIFEST_DIR/tests`.
	// 2. Suites are `<suite>.jsx` with an `<suite>.out.jsx` expectation.
	// 3. `<suite>.json` (options) and `<suite>.warnings` are optional.
	// 4. Panic on any folders or unrecognized files.
	// 5. Suite names must be valid Rust identifiers.
	let mut suites: BTreeMap<String, TestSuite> = BTreeMap::new();
	let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
	let tests_dir = PathBuf::from(manifest_dir).join("tests");
	for entry in std::fs::read_dir(tests_dir).unwrap() {
		let entry = entry.unwrap();
		let path = entry.path();
		assert!(
			!path.is_dir(),
			"Directories are not allowed in the tests/ folder: {}",
			path.display()
		);
		let filename = path.file_name().unwrap().to_string_lossy().to_string();

		let (suite_name, kind) = [".out.jsx", ".jsx", ".json", ".warnings"]
			.into_iter()
			.find_map(|suffix| filename.strip_suffix(suffix).map(|name| (name, suffix)))
			.unwrap_or_else(|| panic!("Invalid file in tests/ folder: {filename}"));

		assert!(
			is_valid_rust_identifier(suite_name),
			"Suite name is not a valid Rust identifier: {suite_name}"
		);

		let suite = suites.entry(suite_name.to_string()).or_default();
		let slot = match kind {
			".out.jsx" => &mut suite.out_file,
			".jsx" => &mut suite.jsx_file,
			".json" => &mut suite.config_file,
			_ => &mut suite.warnings_file,
		};
		*slot = Some(path.clone());
	}
	suites
}

fn is_valid_rust_identifier(name: &str) -> bool {
	let mut chars = name.chars();
	match chars.next() {
		Some(c) if c.is_ascii_alphabetic() || c == '_' => (),
		_ => return false,
	}
	for c in chars {
		if !(c.is_ascii_alphanumeric() || c == '_') {
			return false;
		}
	}
	true
}
