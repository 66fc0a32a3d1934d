extern crate clap;

use clap::{App, Arg, SubCommand};
use pergola::{
	grammar,
	report::{Block, Severity},
	serialize, Grammar,
};
use source_span::fmt::Style;
use std::fs;
use std::io::{self, Read};

const CONTEXT_LINES: usize = 2;

fn main() -> io::Result<()> {
	// Parse options.
	let matches = App::new("pergola")
		.version(env!("CARGO_PKG_VERSION"))
		.about("PEG-style grammar interpreter")
		.arg(
			Arg::with_name("verbose")
				.short("v")
				.multiple(true)
				.help("Increase verbosity"),
		)
		.arg(
			Arg::with_name("GRAMMAR")
				.required(true)
				.help("Grammar file"),
		)
		.subcommand(
			SubCommand::with_name("parse")
				.about("Parse a file with the grammar and print its tree")
				.arg(
					Arg::with_name("INPUT")
						.help("File to parse, stdin if omitted"),
				),
		)
		.subcommand(
			SubCommand::with_name("fmt")
				.about("Reprint the grammar in canonical notation")
				.arg(
					Arg::with_name("minify")
						.long("minify")
						.help("Print as compactly as possible"),
				)
				.arg(
					Arg::with_name("tabs")
						.long("tabs")
						.help("Indent with tabs instead of spaces"),
				)
				.arg(
					Arg::with_name("indent-size")
						.long("indent-size")
						.takes_value(true)
						.default_value("2")
						.help("Indentation width"),
				),
		)
		.get_matches();

	// Init logger.
	let verbosity = matches.occurrences_of("verbose") as usize;
	stderrlog::new().verbosity(verbosity).init().unwrap();

	let grammar_path = matches.value_of("GRAMMAR").unwrap();
	let grammar_source = fs::read_to_string(grammar_path)?;

	log::info!("loading grammar `{}`...", grammar_path);
	let grammar = match Grammar::load(&grammar_source) {
		Ok(grammar) => grammar,
		Err(grammar::Error::Syntax(e)) => {
			let mut block = Block::new(Severity::Error, "malformed grammar");
			block.set_source(grammar_path);
			block.highlight(e.span(), Some(e.to_string()), Style::Error);
			eprintln!("{}", block.render(&grammar_source, CONTEXT_LINES));
			std::process::exit(1)
		}
		Err(e) => {
			eprintln!("error: {}", e);
			std::process::exit(1)
		}
	};

	match matches.subcommand() {
		("fmt", Some(m)) => {
			if m.is_present("minify") {
				print!("{}", serialize::minify(grammar.file()));
			} else {
				let indent_size = m
					.value_of("indent-size")
					.unwrap()
					.parse()
					.unwrap_or(2);
				print!(
					"{}",
					serialize::serialize(grammar.file(), m.is_present("tabs"), indent_size)
				);
			}
		}
		(_, sub) => {
			let (input_name, text) = match sub.and_then(|m| m.value_of("INPUT")) {
				Some(path) => (path.to_string(), fs::read_to_string(path)?),
				None => {
					let mut text = String::new();
					io::stdin().read_to_string(&mut text)?;
					("<stdin>".to_string(), text)
				}
			};

			log::info!("parsing `{}`...", input_name);
			match grammar.parse(&text) {
				Ok(tree) => println!("{}", tree),
				Err(grammar::Error::Parse(e)) => {
					let mut block = e.to_block(&text);
					block.set_source(&input_name);
					eprintln!("{}", block.render(&text, CONTEXT_LINES));
					std::process::exit(1)
				}
				Err(e) => {
					eprintln!("error: {}", e);
					std::process::exit(1)
				}
			}
		}
	}

	Ok(())
}
