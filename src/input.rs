use source_span::{DefaultMetrics, Position};
use std::fmt;

/// Characters skipped as trivia before every match attempt.
pub const TRIVIA: &str = " \t\r\n\u{b}\u{c}";

pub fn metrics() -> DefaultMetrics {
	DefaultMetrics::with_tab_stop(4)
}

/// A non-owning view of the remaining subject text together with its
/// absolute location in the original source.
///
/// `offset` counts consumed bytes from the start of the original text;
/// `position` is the zero-based line/column of the view's first character.
/// Every operation returns a new view; nothing is ever mutated or copied.
#[derive(Clone, Copy)]
pub struct Input<'a> {
	text: &'a str,
	offset: usize,
	position: Position,
}

impl<'a> Input<'a> {
	pub fn new(text: &'a str) -> Input<'a> {
		Input {
			text,
			offset: 0,
			position: Position::default(),
		}
	}

	pub fn as_str(&self) -> &'a str {
		self.text
	}

	pub fn offset(&self) -> usize {
		self.offset
	}

	pub fn position(&self) -> Position {
		self.position
	}

	pub fn is_empty(&self) -> bool {
		self.text.is_empty()
	}

	fn advanced_position(&self, prefix: &str) -> Position {
		let metrics = metrics();
		let mut position = self.position;

		for c in prefix.chars() {
			position = position.next(c, &metrics);
		}

		position
	}

	/// The view with the first `n` bytes dropped.
	/// `n` must lie on a character boundary.
	pub fn from_start_pos(&self, n: usize) -> Input<'a> {
		Input {
			text: &self.text[n..],
			offset: self.offset + n,
			position: self.advanced_position(&self.text[..n]),
		}
	}

	/// The sub-view `[start, stop)` of this view.
	pub fn from_pos_range(&self, start: usize, stop: usize) -> Input<'a> {
		Input {
			text: &self.text[start..stop],
			offset: self.offset + start,
			position: self.advanced_position(&self.text[..start]),
		}
	}

	/// The view starting at the first character contained in `targetset`,
	/// or the empty end-of-text view if there is none.
	pub fn from_first_matching(&self, targetset: &str) -> Input<'a> {
		for (i, c) in self.text.char_indices() {
			if targetset.contains(c) {
				return self.from_start_pos(i);
			}
		}

		self.from_start_pos(self.text.len())
	}

	/// The view starting at the first character not contained in `targetset`,
	/// or the empty end-of-text view if there is none.
	pub fn from_first_not_matching(&self, targetset: &str) -> Input<'a> {
		for (i, c) in self.text.char_indices() {
			if !targetset.contains(c) {
				return self.from_start_pos(i);
			}
		}

		self.from_start_pos(self.text.len())
	}

	/// The view with leading trivia dropped.
	pub fn trim_start(&self) -> Input<'a> {
		self.from_first_not_matching(TRIVIA)
	}
}

impl<'a> fmt::Display for Input<'a> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(
			f,
			"{:?} {}:{}",
			self.text,
			self.position.line + 1,
			self.position.column + 1
		)
	}
}

impl<'a> fmt::Debug for Input<'a> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		fmt::Display::fmt(self, f)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn from_start_pos_zero_is_identity() {
		let input = Input::new("ab\ncd");
		let same = input.from_start_pos(0);
		assert_eq!(same.as_str(), input.as_str());
		assert_eq!(same.offset(), input.offset());
		assert_eq!(same.position(), input.position());
	}

	#[test]
	fn position_accumulates_on_one_line() {
		let input = Input::new("abcdef").from_start_pos(2).from_start_pos(2);
		assert_eq!(input.as_str(), "ef");
		assert_eq!(input.offset(), 4);
		assert_eq!(input.position(), Position::new(0, 4));
	}

	#[test]
	fn position_resets_column_after_newline() {
		let input = Input::new("ab\ncd\nef");
		let at_d = input.from_start_pos(4);
		assert_eq!(at_d.as_str(), "d\nef");
		assert_eq!(at_d.offset(), 4);
		assert_eq!(at_d.position(), Position::new(1, 1));

		let at_e = at_d.from_start_pos(2);
		assert_eq!(at_e.position(), Position::new(2, 0));
	}

	#[test]
	fn range_keeps_start_position() {
		let input = Input::new("ab\ncd");
		let slice = input.from_pos_range(3, 5);
		assert_eq!(slice.as_str(), "cd");
		assert_eq!(slice.offset(), 3);
		assert_eq!(slice.position(), Position::new(1, 0));
	}

	#[test]
	fn charset_scans() {
		let input = Input::new("  \t x y");
		let trimmed = input.trim_start();
		assert_eq!(trimmed.as_str(), "x y");
		assert_eq!(trimmed.offset(), 4);

		let at_space = trimmed.from_first_matching(" ");
		assert_eq!(at_space.as_str(), " y");
	}

	#[test]
	fn scan_past_end_is_empty_at_end() {
		let input = Input::new("   ");
		let trimmed = input.trim_start();
		assert!(trimmed.is_empty());
		assert_eq!(trimmed.offset(), 3);
	}

	#[test]
	fn tab_advances_to_tab_stop() {
		let input = Input::new("\tx").from_start_pos(1);
		assert_eq!(input.position(), Position::new(0, 4));
	}
}
