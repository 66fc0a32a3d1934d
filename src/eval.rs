use crate::expression::Expression;
use crate::input::Input;
use crate::result::{deepest, EvaluateResult};
use std::collections::HashMap;
use std::fmt;

/// The rule registry: rule name to rule body. Built once when a grammar is
/// loaded, read-only during evaluation.
pub type Rules = HashMap<String, Vec<Expression>>;

/// The name of the rule a `File` evaluation starts from.
pub const ENTRY_RULE: &str = "input";

/// A fatal evaluation error. Unlike a `NoMatch`, which is ordinary data,
/// these indicate a misconfigured grammar and abort the whole parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
	UndefinedRule(String),
	NoEntryRule,
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Error::UndefinedRule(name) => write!(f, "could not find rule with name `{}`", name),
			Error::NoEntryRule => write!(f, "no top-level rule named `{}` found", ENTRY_RULE),
		}
	}
}

pub type Result<T> = std::result::Result<T, Error>;

/// Everything an evaluation step needs besides the expression and the input:
/// the rule registry and the rule-reference collapse policy.
#[derive(Clone, Copy)]
pub struct Context<'g> {
	rules: &'g Rules,
	collapse_singletons: bool,
}

impl<'g> Context<'g> {
	pub fn new(rules: &'g Rules, collapse_singletons: bool) -> Context<'g> {
		Context {
			rules,
			collapse_singletons,
		}
	}

	pub fn rules(&self) -> &'g Rules {
		self.rules
	}

	pub fn collapse_singletons(&self) -> bool {
		self.collapse_singletons
	}
}

/// Evaluates `items` as a left-to-right sequence. This is the shared body of
/// `Group`, `Rule` and rule-reference evaluation.
///
/// A failing item aborts the sequence; the failure carries the deepest point
/// seen so far, including points recorded inside earlier successful items
/// (a repetition may have looked further ahead than where it settled).
fn evaluate_sequence<'a>(
	items: &[Expression],
	input: Input<'a>,
	ctx: &Context,
) -> Result<EvaluateResult<'a>> {
	let mut results = Vec::new();
	let mut furthest = None;
	let mut current = input;

	for item in items {
		let result = item.evaluate(current, ctx)?;

		match result {
			EvaluateResult::NoMatch { furthest: failed } => {
				return Ok(EvaluateResult::NoMatch {
					furthest: deepest(furthest, Some(failed)).unwrap_or(failed),
				});
			}
			result => {
				furthest = deepest(furthest, result.furthest());
				current = result.remaining();

				if !result.is_discard() {
					results.push(result);
				}
			}
		}
	}

	Ok(EvaluateResult::Multiple {
		items: results,
		remaining: current,
		furthest,
	})
}

/// Greedy repetition shared by `ZeroOrMore` and `OneOrMore`.
/// Returns the accumulated non-discarded results, the remaining input, the
/// deepest point seen (always including the terminating failed attempt) and
/// the number of successful iterations.
fn evaluate_repetition<'a>(
	expr: &Expression,
	input: Input<'a>,
	ctx: &Context,
) -> Result<(Vec<EvaluateResult<'a>>, Input<'a>, Option<Input<'a>>, usize)> {
	let mut results = Vec::new();
	let mut furthest = None;
	let mut current = input;
	let mut count = 0;

	loop {
		let result = expr.evaluate(current, ctx)?;

		match result {
			EvaluateResult::NoMatch { furthest: failed } => {
				furthest = deepest(furthest, Some(failed));
				break;
			}
			result => {
				let remaining = result.remaining();

				// A zero-width match would repeat forever.
				if remaining.offset() == current.offset() {
					break;
				}

				furthest = deepest(furthest, result.furthest());
				current = remaining;
				count += 1;

				if !result.is_discard() {
					results.push(result);
				}
			}
		}
	}

	Ok((results, current, furthest, count))
}

/// Looks up `rule` in the registry, evaluates its body as a sequence and
/// wraps a successful result as `Single` labeled `identifier`. Plain rule
/// references pass the rule's own name; named references pass their label.
fn evaluate_reference<'a>(
	rule: &str,
	identifier: &str,
	input: Input<'a>,
	ctx: &Context,
) -> Result<EvaluateResult<'a>> {
	let contents = ctx
		.rules()
		.get(rule)
		.ok_or_else(|| Error::UndefinedRule(rule.to_string()))?;

	let result = evaluate_sequence(contents, input, ctx)?;

	match result {
		result @ EvaluateResult::NoMatch { .. } => Ok(result),
		result => {
			let remaining = result.remaining();

			Ok(EvaluateResult::Single {
				inner: Box::new(collapse(result, ctx)),
				remaining,
				identifier: identifier.to_string(),
			})
		}
	}
}

impl Expression {
	/// Evaluates this expression against `input`, skipping leading trivia
	/// first. The skip happens here, once, for every kind: trivia can never
	/// leak into a literal match or a terminal capture.
	pub fn evaluate<'a>(&self, input: Input<'a>, ctx: &Context) -> Result<EvaluateResult<'a>> {
		let input = input.trim_start();

		match self {
			Expression::StringLiteral(val) => {
				if input.as_str().starts_with(val.as_str()) {
					Ok(EvaluateResult::Discard {
						remaining: input.from_start_pos(val.len()),
					})
				} else {
					Ok(EvaluateResult::NoMatch { furthest: input })
				}
			}

			Expression::RegularExpression(pattern) => {
				match pattern.regex().captures(input.as_str()) {
					Some(captures) => {
						// Anchored, so the whole match starts at 0.
						let whole = captures.get(0).unwrap();
						let captured = captures.get(1).unwrap_or(whole);

						Ok(EvaluateResult::String {
							value: input.from_pos_range(captured.start(), captured.end()),
							remaining: input.from_start_pos(whole.end()),
						})
					}
					None => Ok(EvaluateResult::NoMatch { furthest: input }),
				}
			}

			Expression::Group(items) => evaluate_sequence(items, input, ctx),

			Expression::Union(items) => {
				let mut furthest = None;

				for item in items {
					let result = item.evaluate(input, ctx)?;

					if result.is_match() {
						// Unions are transparent.
						return Ok(result);
					}

					furthest = deepest(furthest, result.furthest());
				}

				Ok(EvaluateResult::NoMatch {
					furthest: match furthest {
						Some(furthest) => furthest,
						None => input,
					},
				})
			}

			Expression::Or(lhs, rhs) => {
				let mut results = Vec::new();
				let mut furthest = None;
				let mut current = input;

				let lhs_result = lhs.evaluate(current, ctx)?;
				let lhs_matched = lhs_result.is_match();
				furthest = deepest(furthest, lhs_result.furthest());

				if lhs_matched {
					current = lhs_result.remaining();

					if !lhs_result.is_discard() {
						results.push(lhs_result);
					}
				}

				let rhs_result = rhs.evaluate(current, ctx)?;
				let rhs_matched = rhs_result.is_match();
				furthest = deepest(furthest, rhs_result.furthest());

				if rhs_matched {
					current = rhs_result.remaining();

					if !rhs_result.is_discard() {
						results.push(rhs_result);
					}
				}

				if !lhs_matched && !rhs_matched {
					return Ok(EvaluateResult::NoMatch {
						furthest: match furthest {
							Some(furthest) => furthest,
							None => input,
						},
					});
				}

				Ok(EvaluateResult::Multiple {
					items: results,
					remaining: current,
					furthest,
				})
			}

			Expression::ExclusiveOr(lhs, rhs) => {
				let lhs_result = lhs.evaluate(input, ctx)?;
				let rhs_result = rhs.evaluate(input, ctx)?;

				match (lhs_result.is_match(), rhs_result.is_match()) {
					(true, false) => Ok(lhs_result),
					(false, true) => Ok(rhs_result),
					// Both or neither: ambiguity is rejected, not resolved.
					_ => {
						let lhs_reach = lhs_result.reach();
						Ok(EvaluateResult::NoMatch {
							furthest: deepest(Some(lhs_reach), Some(rhs_result.reach()))
								.unwrap_or(lhs_reach),
						})
					}
				}
			}

			Expression::ZeroOrOne(expr) => {
				let result = expr.evaluate(input, ctx)?;

				match result {
					EvaluateResult::NoMatch { furthest } => Ok(EvaluateResult::Multiple {
						items: Vec::new(),
						remaining: input,
						furthest: Some(furthest),
					}),
					result => {
						let remaining = result.remaining();
						let furthest = result.furthest();
						let items = if result.is_discard() {
							Vec::new()
						} else {
							vec![result]
						};

						Ok(EvaluateResult::Multiple {
							items,
							remaining,
							furthest,
						})
					}
				}
			}

			Expression::ZeroOrMore(expr) => {
				let (items, remaining, furthest, _) = evaluate_repetition(expr, input, ctx)?;

				// Zero matches still count as a match.
				Ok(EvaluateResult::Multiple {
					items,
					remaining,
					furthest,
				})
			}

			Expression::OneOrMore(expr) => {
				let (items, remaining, furthest, count) = evaluate_repetition(expr, input, ctx)?;

				if count == 0 {
					return Ok(EvaluateResult::NoMatch {
						furthest: match furthest {
							Some(furthest) => furthest,
							None => input,
						},
					});
				}

				Ok(EvaluateResult::Multiple {
					items,
					remaining,
					furthest,
				})
			}

			Expression::RuleRef(name) => evaluate_reference(name, name, input, ctx),

			Expression::NamedRuleRef { name, rule } => {
				evaluate_reference(rule, name, input, ctx)
			}

			Expression::Rule { contents, .. } => evaluate_sequence(contents, input, ctx),

			Expression::File(rules) => {
				for rule in rules {
					if let Expression::Rule { name, .. } = rule {
						if name == ENTRY_RULE {
							return rule.evaluate(input, ctx);
						}
					}
				}

				Err(Error::NoEntryRule)
			}
		}
	}
}

/// Applies the singleton-collapse policy to a successful rule-body result:
/// a `Multiple` holding exactly one item is unwrapped to that item, so rule
/// references around single-item bodies don't nest needlessly.
///
/// When the unwrapped item is itself a `Multiple`, the outer furthest point
/// is folded into it so the deepest-point bookkeeping survives the unwrap.
fn collapse<'a>(result: EvaluateResult<'a>, ctx: &Context) -> EvaluateResult<'a> {
	if !ctx.collapse_singletons() {
		return result;
	}

	match result {
		EvaluateResult::Multiple {
			mut items,
			furthest: outer,
			..
		} if items.len() == 1 => match items.remove(0) {
			EvaluateResult::Multiple {
				items,
				remaining,
				furthest,
			} => EvaluateResult::Multiple {
				items,
				remaining,
				furthest: deepest(furthest, outer),
			},
			item => item,
		},
		result => result,
	}
}
