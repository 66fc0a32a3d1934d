use pergola::eval::{Context, Error, Rules};
use pergola::expression::{Expression, Pattern};
use pergola::result::{CondenseError, EvaluateResult};
use pergola::Input;

fn lit(s: &str) -> Expression {
	Expression::StringLiteral(s.to_string())
}

fn re(s: &str) -> Expression {
	Expression::RegularExpression(Pattern::new(s).unwrap())
}

fn group(items: Vec<Expression>) -> Expression {
	Expression::Group(items)
}

#[test]
fn literal_discards_and_advances_exactly() {
	let rules = Rules::new();
	let ctx = Context::new(&rules, true);

	let result = lit("let").evaluate(Input::new("  let x"), &ctx).unwrap();
	assert!(result.is_discard());
	assert_eq!(result.remaining().offset(), 5);
	assert_eq!(result.remaining().as_str(), " x");
}

#[test]
fn literal_mismatch_fails_at_trimmed_start() {
	let rules = Rules::new();
	let ctx = Context::new(&rules, true);

	let result = lit("let").evaluate(Input::new("   const"), &ctx).unwrap();
	match result {
		EvaluateResult::NoMatch { furthest } => assert_eq!(furthest.offset(), 3),
		other => panic!("expected no match, got {}", other),
	}
}

#[test]
fn regex_captures_first_group_if_present() {
	let rules = Rules::new();
	let ctx = Context::new(&rules, true);

	let result = re("a(b+)c").evaluate(Input::new("abbbc!"), &ctx).unwrap();
	match result {
		EvaluateResult::String { value, remaining } => {
			assert_eq!(value.as_str(), "bbb");
			assert_eq!(value.offset(), 1);
			assert_eq!(remaining.as_str(), "!");
		}
		other => panic!("expected a capture, got {}", other),
	}
}

#[test]
fn regex_without_group_captures_whole_match() {
	let rules = Rules::new();
	let ctx = Context::new(&rules, true);

	let result = re("[0-9]+").evaluate(Input::new("42 rest"), &ctx).unwrap();
	match result {
		EvaluateResult::String { value, remaining } => {
			assert_eq!(value.as_str(), "42");
			assert_eq!(remaining.as_str(), " rest");
		}
		other => panic!("expected a capture, got {}", other),
	}
}

#[test]
fn regex_never_captures_trivia() {
	let rules = Rules::new();
	let ctx = Context::new(&rules, true);

	let result = re("\\w+").evaluate(Input::new("   hello"), &ctx).unwrap();
	match result {
		EvaluateResult::String { value, .. } => assert_eq!(value.as_str(), "hello"),
		other => panic!("expected a capture, got {}", other),
	}
}

#[test]
fn zero_or_more_accepts_zero_matches() {
	let rules = Rules::new();
	let ctx = Context::new(&rules, true);

	let expr = Expression::ZeroOrMore(Box::new(lit("a")));
	let result = expr.evaluate(Input::new("xyz"), &ctx).unwrap();

	match result {
		EvaluateResult::Multiple {
			items, remaining, ..
		} => {
			assert!(items.is_empty());
			assert_eq!(remaining.as_str(), "xyz");
		}
		other => panic!("expected an empty run, got {}", other),
	}
}

#[test]
fn zero_or_more_stops_on_zero_width_match() {
	let rules = Rules::new();
	let ctx = Context::new(&rules, true);

	let expr = Expression::ZeroOrMore(Box::new(re("x?")));
	let result = expr.evaluate(Input::new("yyy"), &ctx).unwrap();

	match result {
		EvaluateResult::Multiple { remaining, .. } => assert_eq!(remaining.offset(), 0),
		other => panic!("expected a run, got {}", other),
	}
}

#[test]
fn one_or_more_requires_a_match() {
	let rules = Rules::new();
	let ctx = Context::new(&rules, true);

	let expr = Expression::OneOrMore(Box::new(re("[0-9]")));

	let result = expr.evaluate(Input::new("x"), &ctx).unwrap();
	assert!(!result.is_match());

	let result = expr.evaluate(Input::new("1 2 3 x"), &ctx).unwrap();
	match result {
		EvaluateResult::Multiple {
			items, remaining, ..
		} => {
			assert_eq!(items.len(), 3);
			assert_eq!(remaining.as_str(), " x");
		}
		other => panic!("expected three matches, got {}", other),
	}
}

#[test]
fn union_is_transparent() {
	let rules = Rules::new();
	let ctx = Context::new(&rules, true);

	let expr = Expression::Union(vec![lit("a"), re("[0-9]+")]);

	let result = expr.evaluate(Input::new("7"), &ctx).unwrap();
	assert!(matches!(result, EvaluateResult::String { .. }));

	let result = expr.evaluate(Input::new("a"), &ctx).unwrap();
	assert!(result.is_discard());
}

#[test]
fn union_failure_reports_deepest_alternative() {
	let rules = Rules::new();
	let ctx = Context::new(&rules, true);

	let expr = Expression::Union(vec![
		group(vec![lit("a"), lit("b"), lit("x")]),
		lit("z"),
	]);

	let result = expr.evaluate(Input::new("a b y"), &ctx).unwrap();
	match result {
		EvaluateResult::NoMatch { furthest } => assert_eq!(furthest.offset(), 4),
		other => panic!("expected no match, got {}", other),
	}
}

#[test]
fn exclusive_or_failure_reports_deepest_side() {
	let rules = Rules::new();
	let ctx = Context::new(&rules, true);

	let expr = Expression::ExclusiveOr(
		Box::new(group(vec![lit("a"), lit("b")])),
		Box::new(group(vec![lit("a"), lit("c")])),
	);

	let result = expr.evaluate(Input::new("a d"), &ctx).unwrap();
	match result {
		EvaluateResult::NoMatch { furthest } => assert_eq!(furthest.offset(), 2),
		other => panic!("expected no match, got {}", other),
	}
}

#[test]
fn or_failure_reports_deeper_branch() {
	let rules = Rules::new();
	let ctx = Context::new(&rules, true);

	// lhs gets past "a" and "b" before failing, rhs fails immediately.
	let expr = Expression::Or(
		Box::new(group(vec![lit("a"), lit("b"), lit("x")])),
		Box::new(lit("z")),
	);

	let result = expr.evaluate(Input::new("a b y"), &ctx).unwrap();
	match result {
		EvaluateResult::NoMatch { furthest } => assert_eq!(furthest.offset(), 4),
		other => panic!("expected no match, got {}", other),
	}
}

#[test]
fn or_can_match_both_sides_in_sequence() {
	let rules = Rules::new();
	let ctx = Context::new(&rules, true);

	let expr = Expression::Or(Box::new(re("[0-9]+")), Box::new(re("[a-z]+")));
	let result = expr.evaluate(Input::new("42 abc"), &ctx).unwrap();

	match result {
		EvaluateResult::Multiple {
			items, remaining, ..
		} => {
			assert_eq!(items.len(), 2);
			assert!(remaining.trim_start().is_empty());
		}
		other => panic!("expected both branches, got {}", other),
	}
}

#[test]
fn exclusive_or_rejects_ambiguity() {
	let rules = Rules::new();
	let ctx = Context::new(&rules, true);

	let expr = Expression::ExclusiveOr(Box::new(re("a+")), Box::new(re("[a-z]+")));
	let result = expr.evaluate(Input::new("aa"), &ctx).unwrap();
	assert!(!result.is_match());

	let expr = Expression::ExclusiveOr(Box::new(re("[0-9]+")), Box::new(re("[a-z]+")));
	let result = expr.evaluate(Input::new("42"), &ctx).unwrap();
	match result {
		EvaluateResult::String { value, .. } => assert_eq!(value.as_str(), "42"),
		other => panic!("expected the numeric branch, got {}", other),
	}
}

#[test]
fn sequence_failure_carries_deepest_point() {
	let rules = Rules::new();
	let ctx = Context::new(&rules, true);

	let expr = group(vec![lit("a"), lit("b")]);
	let result = expr.evaluate(Input::new("a c"), &ctx).unwrap();

	match result {
		EvaluateResult::NoMatch { furthest } => assert_eq!(furthest.offset(), 2),
		other => panic!("expected no match, got {}", other),
	}
}

#[test]
fn undefined_rule_is_fatal() {
	let rules = Rules::new();
	let ctx = Context::new(&rules, true);

	let expr = Expression::RuleRef("nope".to_string());
	match expr.evaluate(Input::new("x"), &ctx) {
		Err(Error::UndefinedRule(name)) => assert_eq!(name, "nope"),
		other => panic!("expected an undefined-rule error, got {:?}", other),
	}
}

#[test]
fn condense_rejects_no_match_and_discard() {
	let rules = Rules::new();
	let ctx = Context::new(&rules, true);

	let result = lit("a").evaluate(Input::new("b"), &ctx).unwrap();
	assert_eq!(result.condense().unwrap_err(), CondenseError::NoMatch);

	let result = lit("a").evaluate(Input::new("a"), &ctx).unwrap();
	assert_eq!(result.condense().unwrap_err(), CondenseError::Discard);
}

#[test]
fn condense_never_fails_on_content() {
	let rules = Rules::new();
	let ctx = Context::new(&rules, true);

	let expr = Expression::ZeroOrMore(Box::new(re("[a-z]+")));
	let result = expr.evaluate(Input::new("ab cd ef"), &ctx).unwrap();
	let tree = result.condense().unwrap();

	assert_eq!(tree.to_string(), "Multiple[String<ab>, String<cd>, String<ef>]");
}
