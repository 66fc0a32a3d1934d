use crate::expression::Expression;
use itertools::Itertools;

/// Controls how grammar notation is printed back out.
#[derive(Clone, Copy, Debug)]
pub struct Config {
	pub use_tabs: bool,
	pub indent_size: usize,
	pub minify: bool,
}

impl Default for Config {
	fn default() -> Config {
		Config {
			use_tabs: false,
			indent_size: 2,
			minify: false,
		}
	}
}

impl Config {
	pub fn indent(&self, level: usize) -> String {
		if self.minify {
			return String::new();
		}

		let unit = if self.use_tabs { '\t' } else { ' ' };
		std::iter::repeat(unit)
			.take(self.indent_size * level)
			.collect()
	}

	/// `separator` normally, `alt` when minifying.
	pub fn sep<'a>(&self, separator: &'a str, alt: &'a str) -> &'a str {
		if self.minify {
			alt
		} else {
			separator
		}
	}
}

fn escape_literal(val: &str) -> String {
	let mut out = String::with_capacity(val.len());

	for c in val.chars() {
		match c {
			'\\' => out.push_str("\\\\"),
			'"' => out.push_str("\\\""),
			'\n' => out.push_str("\\n"),
			'\r' => out.push_str("\\r"),
			'\t' => out.push_str("\\t"),
			c => out.push(c),
		}
	}

	out
}

fn escape_pattern(source: &str) -> String {
	source.replace('/', "\\/")
}

/// True for forms a postfix operator can apply to directly, without
/// wrapping parentheses.
fn is_primary(expr: &Expression) -> bool {
	matches!(
		expr,
		Expression::StringLiteral(_)
			| Expression::RegularExpression(_)
			| Expression::Group(_)
			| Expression::Union(_)
			| Expression::RuleRef(_)
			| Expression::NamedRuleRef { .. }
	)
}

fn serialize_repeated(expr: &Expression, suffix: char, config: &Config, level: usize) -> String {
	if is_primary(expr) {
		format!("{}{}", expr.serialize(config, level), suffix)
	} else {
		format!("({}){}", expr.serialize(config, level), suffix)
	}
}

impl Expression {
	/// Prints this expression back as grammar notation. Loading the output
	/// again yields an equivalent expression tree.
	pub fn serialize(&self, config: &Config, level: usize) -> String {
		match self {
			Expression::StringLiteral(val) => format!("\"{}\"", escape_literal(val)),
			Expression::RegularExpression(pattern) => {
				format!("/{}/", escape_pattern(pattern.source()))
			}
			Expression::Group(items) => format!(
				"({})",
				items.iter().map(|e| e.serialize(config, level)).join(" ")
			),
			Expression::Union(items) => format!(
				"<{}>",
				items.iter().map(|e| e.serialize(config, level)).join(" ")
			),
			Expression::Or(lhs, rhs) => format!(
				"{}{}{}",
				lhs.serialize(config, level),
				config.sep(" | ", "|"),
				rhs.serialize(config, level)
			),
			Expression::ExclusiveOr(lhs, rhs) => format!(
				"{}{}{}",
				lhs.serialize(config, level),
				config.sep(" ^ ", "^"),
				rhs.serialize(config, level)
			),
			Expression::ZeroOrOne(expr) => serialize_repeated(expr, '?', config, level),
			Expression::ZeroOrMore(expr) => serialize_repeated(expr, '*', config, level),
			Expression::OneOrMore(expr) => serialize_repeated(expr, '+', config, level),
			Expression::RuleRef(name) => name.clone(),
			Expression::NamedRuleRef { name, rule } => format!("{}:{}", name, rule),
			Expression::Rule { name, contents } => format!(
				"{}{}: {}",
				config.indent(level),
				name,
				contents.iter().map(|e| e.serialize(config, level)).join(" ")
			),
			Expression::File(rules) => {
				let body = rules
					.iter()
					.map(|e| e.serialize(config, level))
					.join(config.sep("\n\n", "\n"));

				format!("{}\n", body)
			}
		}
	}
}

/// Pretty-prints an expression with the given indentation settings.
pub fn serialize(expr: &Expression, use_tabs: bool, indent_size: usize) -> String {
	let config = Config {
		use_tabs,
		indent_size,
		minify: false,
	};

	expr.serialize(&config, 0)
}

/// Prints an expression as compactly as the notation allows.
pub fn minify(expr: &Expression) -> String {
	let config = Config {
		use_tabs: false,
		indent_size: 0,
		minify: true,
	};

	expr.serialize(&config, 0)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::expression::Pattern;

	fn lit(s: &str) -> Expression {
		Expression::StringLiteral(s.to_string())
	}

	#[test]
	fn literal_is_escaped() {
		let expr = lit("a\"b\\c\nd");
		assert_eq!(minify(&expr), "\"a\\\"b\\\\c\\nd\"");
	}

	#[test]
	fn pattern_slashes_are_escaped() {
		let expr = Expression::RegularExpression(Pattern::new("a/b").unwrap());
		assert_eq!(minify(&expr), "/a\\/b/");
	}

	#[test]
	fn named_reference_notation() {
		let expr = Expression::NamedRuleRef {
			name: "key".to_string(),
			rule: "word".to_string(),
		};
		assert_eq!(minify(&expr), "key:word");
	}

	#[test]
	fn postfix_wraps_infix_children() {
		let expr = Expression::ZeroOrMore(Box::new(Expression::Or(
			Box::new(lit("a")),
			Box::new(lit("b")),
		)));
		assert_eq!(minify(&expr), "(\"a\"|\"b\")*");

		let starred_group = Expression::ZeroOrMore(Box::new(Expression::Group(vec![
			lit("a"),
			lit("b"),
		])));
		assert_eq!(minify(&starred_group), "(\"a\" \"b\")*");
	}

	#[test]
	fn file_layout() {
		let file = Expression::File(vec![
			Expression::Rule {
				name: "input".to_string(),
				contents: vec![Expression::RuleRef("word".to_string())],
			},
			Expression::Rule {
				name: "word".to_string(),
				contents: vec![Expression::RegularExpression(Pattern::new("\\w+").unwrap())],
			},
		]);

		assert_eq!(
			serialize(&file, false, 2),
			"input: word\n\nword: /\\w+/\n"
		);
		assert_eq!(minify(&file), "input: word\nword: /\\w+/\n");
	}
}
