use regex::Regex;
use std::fmt;

/// A regular-expression terminal: the pattern as written in the grammar
/// notation together with its compiled, start-anchored form.
#[derive(Clone, Debug)]
pub struct Pattern {
	source: String,
	regex: Regex,
}

impl Pattern {
	/// Compiles `source`, anchoring it at the start of the remaining input.
	/// The pattern's own groups keep their numbering.
	pub fn new(source: &str) -> Result<Pattern, regex::Error> {
		let regex = Regex::new(&format!("^(?:{})", source))?;
		Ok(Pattern {
			source: source.to_string(),
			regex,
		})
	}

	pub fn source(&self) -> &str {
		&self.source
	}

	pub fn regex(&self) -> &Regex {
		&self.regex
	}
}

impl fmt::Display for Pattern {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "/{}/", self.source)
	}
}

/// A grammar node. One variant per combinator kind, each carrying its own
/// strongly-typed parameters. Immutable after construction.
#[derive(Clone, Debug)]
pub enum Expression {
	/// A verbatim terminal. Matches produce no tree content.
	StringLiteral(String),

	/// A regular-expression terminal, matched at the (trivia-trimmed) cursor.
	RegularExpression(Pattern),

	/// A finite ordered sequence. Also the shape of every rule body.
	Group(Vec<Expression>),

	/// Ordered choice. The first matching alternative is returned unchanged.
	Union(Vec<Expression>),

	/// Inclusive choice: left, right, or both in sequence.
	Or(Box<Expression>, Box<Expression>),

	/// Exclusive choice: exactly one side must match the same input.
	ExclusiveOr(Box<Expression>, Box<Expression>),

	ZeroOrOne(Box<Expression>),
	ZeroOrMore(Box<Expression>),
	OneOrMore(Box<Expression>),

	/// A reference to a named rule, resolved through the registry.
	RuleRef(String),

	/// A rule reference whose result is labeled with a caller-chosen name
	/// instead of the rule's own.
	NamedRuleRef {
		name: String,
		rule: String,
	},

	/// A named rule definition.
	Rule {
		name: String,
		contents: Vec<Expression>,
	},

	/// A whole grammar file: the ordered list of its rule definitions.
	File(Vec<Expression>),
}

impl Expression {
	pub fn kind(&self) -> &'static str {
		match self {
			Expression::StringLiteral(_) => "StringLiteral",
			Expression::RegularExpression(_) => "RegularExpression",
			Expression::Group(_) => "Group",
			Expression::Union(_) => "Union",
			Expression::Or(_, _) => "Or",
			Expression::ExclusiveOr(_, _) => "ExclusiveOr",
			Expression::ZeroOrOne(_) => "ZeroOrOne",
			Expression::ZeroOrMore(_) => "ZeroOrMore",
			Expression::OneOrMore(_) => "OneOrMore",
			Expression::RuleRef(_) => "RuleRef",
			Expression::NamedRuleRef { .. } => "NamedRuleRef",
			Expression::Rule { .. } => "Rule",
			Expression::File(_) => "File",
		}
	}
}

impl fmt::Display for Expression {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Expression::StringLiteral(val) => write!(f, "StringLiteral<{:?}>", val),
			Expression::RegularExpression(pattern) => {
				write!(f, "RegularExpression<{}>", pattern)
			}
			Expression::RuleRef(name) => write!(f, "RuleRef<{}>", name),
			Expression::NamedRuleRef { name, rule } => {
				write!(f, "NamedRuleRef<{}, {}>", name, rule)
			}
			Expression::Rule { name, contents } => {
				write!(f, "Rule<{}, {} items>", name, contents.len())
			}
			Expression::File(rules) => write!(f, "File<{} rules>", rules.len()),
			Expression::Group(items) => write!(f, "Group<{} items>", items.len()),
			Expression::Union(items) => write!(f, "Union<{} items>", items.len()),
			Expression::Or(lhs, rhs) => write!(f, "Or<{}, {}>", lhs, rhs),
			Expression::ExclusiveOr(lhs, rhs) => write!(f, "ExclusiveOr<{}, {}>", lhs, rhs),
			Expression::ZeroOrOne(expr) => write!(f, "ZeroOrOne<{}>", expr),
			Expression::ZeroOrMore(expr) => write!(f, "ZeroOrMore<{}>", expr),
			Expression::OneOrMore(expr) => write!(f, "OneOrMore<{}>", expr),
		}
	}
}
