use source_span::{Loc, Span};
use std::iter::Peekable;

mod error;
pub mod lexer;

pub use error::{Error, Result};
pub use lexer::Lexer;

use crate::eval::Rules;
use crate::expression::{Expression, Pattern};
use crate::input::metrics;
use lexer::Token;

fn peek<L: Iterator<Item = lexer::Result<Loc<Token>>>>(
	lexer: &mut Peekable<L>,
) -> Result<Option<Loc<Token>>> {
	match lexer.peek() {
		Some(Ok(token)) => Ok(Some(token.clone())),
		Some(Err(_)) => {
			let mut dummy_span = Span::default();
			consume(lexer, &mut dummy_span)
		}
		None => Ok(None),
	}
}

fn consume<L: Iterator<Item = lexer::Result<Loc<Token>>>>(
	lexer: &mut Peekable<L>,
	span: &mut Span,
) -> Result<Option<Loc<Token>>> {
	match lexer.next() {
		Some(Ok(token)) => {
			if span.is_empty() {
				*span = token.span();
			} else {
				span.append(token.span());
			}
			Ok(Some(token))
		}
		Some(Err(e)) => Err(e.inner_into()),
		None => Ok(None),
	}
}

fn expect<L: Iterator<Item = lexer::Result<Loc<Token>>>>(
	lexer: &mut Peekable<L>,
	span: &mut Span,
) -> Result<Loc<Token>> {
	if let Some(token) = consume(lexer, span)? {
		Ok(token)
	} else {
		Err(Loc::new(Error::UnexpectedEos, span.end().into()))
	}
}

/// Parses the items between a group or union opener and `closer`.
fn parse_until<L: Iterator<Item = lexer::Result<Loc<Token>>>>(
	lexer: &mut Peekable<L>,
	span: &mut Span,
	closer: char,
) -> Result<Vec<Expression>> {
	let mut items = Vec::new();

	loop {
		match peek(lexer)? {
			Some(token) if *token.as_ref() == Token::Punct(closer) => {
				consume(lexer, span)?;
				return Ok(items);
			}
			Some(_) => items.push(parse_expression(lexer, span)?),
			None => return Err(Loc::new(Error::UnexpectedEos, span.end().into())),
		}
	}
}

fn parse_primary<L: Iterator<Item = lexer::Result<Loc<Token>>>>(
	lexer: &mut Peekable<L>,
	span: &mut Span,
) -> Result<Expression> {
	let token = expect(lexer, span)?;
	let (token, token_span) = token.into_raw_parts();

	match token {
		Token::Literal(val) => Ok(Expression::StringLiteral(val)),
		Token::Regex(source) => {
			let pattern = Pattern::new(&source)
				.map_err(|e| Loc::new(Error::InvalidRegex(e), token_span))?;
			Ok(Expression::RegularExpression(pattern))
		}
		Token::Punct('(') => Ok(Expression::Group(parse_until(lexer, span, ')')?)),
		Token::Punct('<') => Ok(Expression::Union(parse_until(lexer, span, '>')?)),
		Token::Ident(name) => {
			// `name:rule` labels the referenced rule's result.
			if let Some(token) = peek(lexer)? {
				if *token.as_ref() == Token::Punct(':') {
					consume(lexer, span)?;

					let token = expect(lexer, span)?;
					let (token, token_span) = token.into_raw_parts();

					return match token {
						Token::Ident(rule) => Ok(Expression::NamedRuleRef { name, rule }),
						token => Err(Loc::new(Error::UnexpectedToken(token), token_span)),
					};
				}
			}

			Ok(Expression::RuleRef(name))
		}
		token => Err(Loc::new(Error::UnexpectedToken(token), token_span)),
	}
}

/// One expression: a primary form, then at most one postfix repetition,
/// then at most one infix operator. Postfix binds tighter than infix, so
/// `a* | b` repeats only `a`. Infix operators are right-associative.
fn parse_expression<L: Iterator<Item = lexer::Result<Loc<Token>>>>(
	lexer: &mut Peekable<L>,
	span: &mut Span,
) -> Result<Expression> {
	let mut expr = parse_primary(lexer, span)?;

	if let Some(token) = peek(lexer)? {
		match token.as_ref() {
			Token::Punct('*') => {
				consume(lexer, span)?;
				expr = Expression::ZeroOrMore(Box::new(expr));
			}
			Token::Punct('+') => {
				consume(lexer, span)?;
				expr = Expression::OneOrMore(Box::new(expr));
			}
			Token::Punct('?') => {
				consume(lexer, span)?;
				expr = Expression::ZeroOrOne(Box::new(expr));
			}
			_ => (),
		}
	}

	if let Some(token) = peek(lexer)? {
		match token.as_ref() {
			Token::Punct('|') => {
				consume(lexer, span)?;
				let rhs = parse_expression(lexer, span)?;
				expr = Expression::Or(Box::new(expr), Box::new(rhs));
			}
			Token::Punct('^') => {
				consume(lexer, span)?;
				let rhs = parse_expression(lexer, span)?;
				expr = Expression::ExclusiveOr(Box::new(expr), Box::new(rhs));
			}
			_ => (),
		}
	}

	Ok(expr)
}

/// One rule definition: a name, a colon and the body expressions up to the
/// end of the line.
fn parse_rule<L: Iterator<Item = lexer::Result<Loc<Token>>>>(
	lexer: &mut Peekable<L>,
) -> Result<Loc<Expression>> {
	let mut span = Span::default();

	let token = expect(lexer, &mut span)?;
	let name = match token.as_ref() {
		Token::Ident(name) => name.clone(),
		_ => {
			let (token, token_span) = token.into_raw_parts();
			return Err(Loc::new(Error::ExpectedRuleName(token), token_span));
		}
	};

	let token = expect(lexer, &mut span)?;
	match token.as_ref() {
		Token::Punct(':') => (),
		_ => {
			let (token, token_span) = token.into_raw_parts();
			return Err(Loc::new(Error::UnexpectedToken(token), token_span));
		}
	}

	let mut contents = Vec::new();

	loop {
		match peek(lexer)? {
			Some(token) if *token.as_ref() == Token::Newline => {
				consume(lexer, &mut span)?;
				break;
			}
			Some(_) => contents.push(parse_expression(lexer, &mut span)?),
			None => break,
		}
	}

	Ok(Loc::new(Expression::Rule { name, contents }, span))
}

/// Parses a whole grammar file into its `File` expression and the rule
/// registry derived from it.
pub fn parse(source: &str) -> Result<(Expression, Rules)> {
	let mut lexer = Lexer::new(source.chars(), metrics()).peekable();
	let mut span = Span::default();
	let mut file_rules = Vec::new();
	let mut rules = Rules::new();

	loop {
		match peek(&mut lexer)? {
			Some(token) if *token.as_ref() == Token::Newline => {
				consume(&mut lexer, &mut span)?;
			}
			Some(_) => {
				let rule = parse_rule(&mut lexer)?;
				let rule_span = rule.span();

				if let Expression::Rule { name, contents } = rule.as_ref() {
					if rules
						.insert(name.clone(), contents.clone())
						.is_some()
					{
						return Err(Loc::new(
							Error::AlreadyDefinedRule(name.clone()),
							rule_span,
						));
					}
				}

				file_rules.push(rule.into_inner());
			}
			None => break,
		}
	}

	Ok((Expression::File(file_rules), rules))
}
