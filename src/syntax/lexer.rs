use source_span::{Loc, Metrics, Span};
use std::fmt;
use std::iter::Peekable;

pub enum Error {
	IncompleteString,
	IncompleteRegex,
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		use self::Error::*;
		match self {
			IncompleteString => write!(f, "incomplete string literal"),
			IncompleteRegex => write!(f, "incomplete regular expression"),
		}
	}
}

impl fmt::Debug for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		fmt::Display::fmt(self, f)
	}
}

pub type Result<T> = std::result::Result<T, Loc<Error>>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
	Ident(String),
	Literal(String),
	Regex(String),
	Punct(char),
	Newline,
}

impl fmt::Display for Token {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		use self::Token::*;
		match self {
			Ident(s) => s.fmt(f),
			Literal(s) => write!(f, "{:?}", s),
			Regex(s) => write!(f, "/{}/", s),
			Punct(p) => p.fmt(f),
			Newline => write!(f, "newline"),
		}
	}
}

fn is_newline(c: char) -> bool {
	c == '\n' || c == '\r'
}

/// Line-internal whitespace. Newlines are significant and lex as their own
/// token.
fn is_space(c: char) -> bool {
	c == ' ' || c == '\t' || c == '\u{b}' || c == '\u{c}'
}

fn is_punct(c: char) -> bool {
	c == ':'
		|| c == '|'
		|| c == '^'
		|| c == '?'
		|| c == '*'
		|| c == '+'
		|| c == '<'
		|| c == '>'
		|| c == '('
		|| c == ')'
}

fn is_separator(c: char) -> bool {
	is_space(c) || is_newline(c) || is_punct(c) || c == '"' || c == '/' || c == '#'
}

pub struct Lexer<I: Iterator<Item = char>, M: Metrics> {
	input: Peekable<I>,
	metrics: M,
	span: Span,
}

impl<I: Iterator<Item = char>, M: Metrics> Lexer<I, M> {
	pub fn new(input: I, metrics: M) -> Lexer<I, M> {
		Lexer {
			input: input.peekable(),
			metrics,
			span: Span::default(),
		}
	}

	fn peek(&mut self) -> Option<char> {
		self.input.peek().copied()
	}

	fn consume(&mut self) -> Option<char> {
		match self.input.next() {
			Some(c) => {
				self.span.push(c, &self.metrics);
				Some(c)
			}
			None => None,
		}
	}

	fn parse_newline(&mut self) -> Loc<Token> {
		while let Some(c) = self.peek() {
			if is_newline(c) {
				self.consume();
			} else {
				break;
			}
		}

		Loc::new(Token::Newline, self.span)
	}

	fn parse_string(&mut self) -> Result<Loc<Token>> {
		self.consume();

		let mut string = String::new();

		loop {
			match self.consume() {
				Some('"') => break,
				Some('\\') => match self.consume() {
					Some('n') => string.push('\n'),
					Some('r') => string.push('\r'),
					Some('t') => string.push('\t'),
					Some(c) => string.push(c),
					None => return Err(Loc::new(Error::IncompleteString, self.span)),
				},
				Some(c) => string.push(c),
				None => return Err(Loc::new(Error::IncompleteString, self.span)),
			}
		}

		Ok(Loc::new(Token::Literal(string), self.span))
	}

	/// Regex bodies are kept raw so character classes survive untouched.
	/// Only the closing delimiter can be escaped.
	fn parse_regex(&mut self) -> Result<Loc<Token>> {
		self.consume();

		let mut source = String::new();

		loop {
			match self.consume() {
				Some('/') => break,
				Some('\\') => match self.consume() {
					Some('/') => source.push('/'),
					Some(c) => {
						source.push('\\');
						source.push(c);
					}
					None => return Err(Loc::new(Error::IncompleteRegex, self.span)),
				},
				Some(c) => source.push(c),
				None => return Err(Loc::new(Error::IncompleteRegex, self.span)),
			}
		}

		Ok(Loc::new(Token::Regex(source), self.span))
	}

	fn parse_ident(&mut self) -> Loc<Token> {
		let mut id = String::new();

		while let Some(c) = self.peek() {
			if is_separator(c) {
				break;
			}

			self.consume();
			id.push(c);
		}

		Loc::new(Token::Ident(id), self.span)
	}

	fn skip_spaces(&mut self) {
		loop {
			match self.peek() {
				Some(c) if is_space(c) => {
					self.consume();
				}
				// Comments run to the end of the line. The newline itself is
				// left in place so it still terminates the enclosing rule.
				Some('#') => loop {
					match self.peek() {
						Some(c) if !is_newline(c) => {
							self.consume();
						}
						_ => break,
					}
				},
				_ => break,
			}
		}
	}

	fn parse_token(&mut self) -> Result<Option<Loc<Token>>> {
		self.skip_spaces();
		self.span.clear();

		match self.peek() {
			Some(c) if is_newline(c) => Ok(Some(self.parse_newline())),
			Some('"') => Ok(Some(self.parse_string()?)),
			Some('/') => Ok(Some(self.parse_regex()?)),
			Some(c) if is_punct(c) => {
				self.consume();
				Ok(Some(Loc::new(Token::Punct(c), self.span)))
			}
			Some(_) => Ok(Some(self.parse_ident())),
			None => Ok(None),
		}
	}
}

impl<I: Iterator<Item = char>, M: Metrics> Iterator for Lexer<I, M> {
	type Item = Result<Loc<Token>>;

	fn next(&mut self) -> Option<Result<Loc<Token>>> {
		self.parse_token().transpose()
	}
}
