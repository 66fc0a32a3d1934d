use crate::eval::{self, Context, Rules};
use crate::expression::Expression;
use crate::input::Input;
use crate::report::{self, Block, Severity};
use crate::result::{deepest, CondenseError, EvaluateResult, TreeItem};
use crate::syntax;
use source_span::fmt::Style;
use source_span::{Loc, Position};
use std::fmt;

/// A loaded grammar: the `File` expression tree plus the rule registry.
/// Immutable once loaded, so one grammar can be evaluated against any
/// number of subject texts.
pub struct Grammar {
	file: Expression,
	rules: Rules,
	collapse_singletons: bool,
}

impl Grammar {
	/// Parses grammar notation into an evaluatable grammar.
	pub fn load(source: &str) -> Result<Grammar, Error> {
		log::debug!("lexing and parsing grammar...");
		let (file, rules) = syntax::parse(source).map_err(Error::Syntax)?;
		log::debug!("loaded {} rules", rules.len());

		Ok(Grammar {
			file,
			rules,
			collapse_singletons: true,
		})
	}

	/// Sets whether rule references unwrap single-item rule bodies instead
	/// of nesting them. Defaults to unwrapping.
	pub fn with_collapse_singletons(mut self, collapse: bool) -> Grammar {
		self.collapse_singletons = collapse;
		self
	}

	pub fn file(&self) -> &Expression {
		&self.file
	}

	pub fn rules(&self) -> &Rules {
		&self.rules
	}

	/// Evaluates the grammar against `text`, returning the raw result.
	/// A `NoMatch` outcome is returned as data; only a misconfigured grammar
	/// (undefined rule, no entry rule) is an error here.
	pub fn evaluate<'a>(&self, text: &'a str) -> eval::Result<EvaluateResult<'a>> {
		let ctx = Context::new(&self.rules, self.collapse_singletons);
		self.file.evaluate(Input::new(text), &ctx)
	}

	/// Evaluates the grammar against `text` and condenses the result,
	/// requiring all input to be consumed up to trailing trivia.
	///
	/// On failure the reported position is the deepest point any attempt in
	/// the whole evaluation reached, not the point where the top rule
	/// stopped.
	pub fn parse(&self, text: &str) -> Result<TreeItem, Error> {
		let result = self.evaluate(text).map_err(Error::Eval)?;

		match result {
			EvaluateResult::NoMatch { furthest } => Err(Error::Parse(ParseError::at(furthest))),
			result => {
				let remaining = result.remaining().trim_start();

				if !remaining.is_empty() {
					let at = match deepest(Some(remaining), result.furthest()) {
						Some(input) => input,
						None => remaining,
					};

					return Err(Error::Parse(ParseError::at(at)));
				}

				result.condense().map_err(Error::Condense)
			}
		}
	}
}

/// A failed top-level parse: the subject text does not conform to the
/// grammar. Carries the deepest position any attempt reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
	offset: usize,
	position: Position,
}

impl ParseError {
	fn at(input: Input) -> ParseError {
		ParseError {
			offset: input.offset(),
			position: input.position(),
		}
	}

	pub fn offset(&self) -> usize {
		self.offset
	}

	pub fn position(&self) -> Position {
		self.position
	}

	/// A renderable diagnostic block pointing into `text`, which must be the
	/// subject text this error was produced from.
	pub fn to_block(&self, text: &str) -> Block {
		let mut block = Block::new(Severity::Error, self.to_string());
		block.highlight(
			report::char_span(text, self.offset),
			Some("starting here".to_string()),
			Style::Error,
		);
		block
	}
}

impl fmt::Display for ParseError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(
			f,
			"unknown token beginning at {}:{}",
			self.position.line + 1,
			self.position.column + 1
		)
	}
}

pub enum Error {
	/// The grammar notation itself is malformed.
	Syntax(Loc<syntax::Error>),
	/// The grammar is well-formed but misconfigured.
	Eval(eval::Error),
	/// The subject text does not conform to the grammar.
	Parse(ParseError),
	/// The successful result carried no condensable content.
	Condense(CondenseError),
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Error::Syntax(e) => e.fmt(f),
			Error::Eval(e) => e.fmt(f),
			Error::Parse(e) => e.fmt(f),
			Error::Condense(e) => e.fmt(f),
		}
	}
}

impl fmt::Debug for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		fmt::Display::fmt(self, f)
	}
}
