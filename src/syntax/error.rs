use super::lexer;
use source_span::Loc;
use std::fmt;

pub enum Error {
	Lexer(lexer::Error),
	UnexpectedEos,
	UnexpectedToken(lexer::Token),
	ExpectedRuleName(lexer::Token),
	InvalidRegex(regex::Error),
	AlreadyDefinedRule(String),
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		use self::Error::*;
		match self {
			Lexer(e) => e.fmt(f),
			UnexpectedEos => write!(f, "unexpected end of stream"),
			UnexpectedToken(token) => write!(f, "unexpected token `{}`", token),
			ExpectedRuleName(token) => write!(f, "expected a rule name, found `{}`", token),
			InvalidRegex(e) => write!(f, "invalid regular expression: {}", e),
			AlreadyDefinedRule(name) => write!(f, "rule `{}` is already defined", name),
		}
	}
}

impl fmt::Debug for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		fmt::Display::fmt(self, f)
	}
}

pub type Result<T> = std::result::Result<T, Loc<Error>>;

impl From<lexer::Error> for Error {
	fn from(e: lexer::Error) -> Error {
		Error::Lexer(e)
	}
}
