use crate::input::Input;
use itertools::Itertools;
use std::fmt;

/// The outcome of evaluating one expression against one input view.
///
/// Every variant except `NoMatch` represents a successful match and carries
/// the input remaining after it. `NoMatch` is ordinary data, not a fault:
/// its position is the deepest point any sub-attempt consumed to, which is
/// not necessarily where the failing node itself started.
#[derive(Clone, Debug)]
pub enum EvaluateResult<'a> {
	NoMatch {
		furthest: Input<'a>,
	},

	/// A named wrapper around one successful sub-result, produced by rule
	/// references.
	Single {
		inner: Box<EvaluateResult<'a>>,
		remaining: Input<'a>,
		identifier: String,
	},

	/// An ordered run of sub-results from sequencing, repetition or
	/// inclusive choice. `furthest` records the deepest point any contained
	/// attempt reached, including attempts that were ultimately abandoned.
	Multiple {
		items: Vec<EvaluateResult<'a>>,
		remaining: Input<'a>,
		furthest: Option<Input<'a>>,
	},

	/// A leaf terminal capture.
	String {
		value: Input<'a>,
		remaining: Input<'a>,
	},

	/// A match that intentionally produces no tree content.
	Discard {
		remaining: Input<'a>,
	},
}

/// The deeper of two recorded positions. A strictly greater offset wins;
/// at equal offsets the earliest-computed one is kept.
pub fn deepest<'a>(a: Option<Input<'a>>, b: Option<Input<'a>>) -> Option<Input<'a>> {
	match (a, b) {
		(Some(a), Some(b)) => {
			if b.offset() > a.offset() {
				Some(b)
			} else {
				Some(a)
			}
		}
		(a, None) => a,
		(None, b) => b,
	}
}

impl<'a> EvaluateResult<'a> {
	pub fn is_match(&self) -> bool {
		!matches!(self, EvaluateResult::NoMatch { .. })
	}

	pub fn is_discard(&self) -> bool {
		matches!(self, EvaluateResult::Discard { .. })
	}

	/// The input left over after this result. For `NoMatch` this is the
	/// furthest point the attempt reached.
	pub fn remaining(&self) -> Input<'a> {
		match self {
			EvaluateResult::NoMatch { furthest } => *furthest,
			EvaluateResult::Single { remaining, .. } => *remaining,
			EvaluateResult::Multiple { remaining, .. } => *remaining,
			EvaluateResult::String { remaining, .. } => *remaining,
			EvaluateResult::Discard { remaining } => *remaining,
		}
	}

	/// The deepest point recorded inside this result, if any.
	pub fn furthest(&self) -> Option<Input<'a>> {
		match self {
			EvaluateResult::NoMatch { furthest } => Some(*furthest),
			EvaluateResult::Single { inner, .. } => inner.furthest(),
			EvaluateResult::Multiple { furthest, .. } => *furthest,
			_ => None,
		}
	}

	/// The deepest point this result is known to have reached: the greater
	/// of its remaining cursor and its recorded furthest point.
	pub fn reach(&self) -> Input<'a> {
		let remaining = self.remaining();
		deepest(Some(remaining), self.furthest()).unwrap_or(remaining)
	}

	/// Collapses this result into a host-facing tree.
	/// `NoMatch` and `Discard` carry no tree content and fail.
	pub fn condense(&self) -> Result<TreeItem, CondenseError> {
		match self {
			EvaluateResult::NoMatch { .. } => Err(CondenseError::NoMatch),
			EvaluateResult::Discard { .. } => Err(CondenseError::Discard),
			EvaluateResult::Single {
				inner, identifier, ..
			} => Ok(TreeItem {
				name: identifier.clone(),
				value: TreeValue::Item(Box::new(inner.condense()?)),
			}),
			EvaluateResult::Multiple { items, .. } => {
				let mut values = Vec::with_capacity(items.len());

				for item in items {
					values.push(item.condense()?);
				}

				Ok(TreeItem {
					name: "Multiple".to_string(),
					value: TreeValue::List(values),
				})
			}
			EvaluateResult::String { value, .. } => Ok(TreeItem {
				name: "String".to_string(),
				value: TreeValue::Leaf(value.as_str().to_string()),
			}),
		}
	}
}

impl<'a> fmt::Display for EvaluateResult<'a> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			EvaluateResult::NoMatch { .. } => write!(f, "NoMatch"),
			EvaluateResult::Single {
				inner, identifier, ..
			} => write!(f, "{}<{}>", identifier, inner),
			EvaluateResult::Multiple { items, .. } => {
				write!(f, "Multiple<{}>", items.iter().join(", "))
			}
			EvaluateResult::String { value, .. } => write!(f, "String<{}>", value.as_str()),
			EvaluateResult::Discard { .. } => write!(f, "Discard"),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CondenseError {
	NoMatch,
	Discard,
}

impl fmt::Display for CondenseError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			CondenseError::NoMatch => write!(f, "can't condense a non-match"),
			CondenseError::Discard => write!(f, "can't condense a discarded match"),
		}
	}
}

/// A condensed parse tree: a name and either leaf text, one nested item, or
/// an ordered list of items. Owns its content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeItem {
	pub name: String,
	pub value: TreeValue,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeValue {
	Leaf(String),
	Item(Box<TreeItem>),
	List(Vec<TreeItem>),
}

impl fmt::Display for TreeItem {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match &self.value {
			TreeValue::Leaf(text) => write!(f, "{}<{}>", self.name, text),
			TreeValue::Item(item) => write!(f, "{}<{}>", self.name, item),
			TreeValue::List(items) => write!(f, "{}[{}]", self.name, items.iter().join(", ")),
		}
	}
}
