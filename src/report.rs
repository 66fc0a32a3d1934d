use crate::input::metrics;
use source_span::fmt::Style;
use source_span::{Position, Span};
use std::convert::Infallible;
use std::fmt;
use yansi::Paint;

pub enum Severity {
	Warning,
	Error,
}

impl fmt::Display for Severity {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Warning => write!(f, "{}", Paint::yellow("warning").bold()),
			Self::Error => write!(f, "{}", Paint::red("error").bold()),
		}
	}
}

/// The one-character span starting at byte `offset` into `text`.
/// An offset at or past the end yields the empty end-of-text span.
pub fn char_span(text: &str, offset: usize) -> Span {
	let metrics = metrics();
	let mut position = Position::default();

	for (i, c) in text.char_indices() {
		if i >= offset {
			let mut span: Span = position.into();
			span.push(c, &metrics);
			return span;
		}

		position = position.next(c, &metrics);
	}

	position.into()
}

/// A diagnostic ready for terminal display: a severity, a one-line title,
/// highlighted spans into the offending text and optional trailing notes.
pub struct Block {
	severity: Severity,
	title: String,
	source: Option<String>,
	highlights: source_span::fmt::Formatter,
	extent: Option<Span>,
	notes: Vec<Note>,
}

impl Block {
	pub fn new<S: ToString>(severity: Severity, title: S) -> Block {
		Block {
			severity,
			title: title.to_string(),
			source: None,
			highlights: source_span::fmt::Formatter::new(),
			extent: None,
			notes: Vec::new(),
		}
	}

	pub fn source(&self) -> Option<&str> {
		self.source.as_ref().map(|s| s.as_str())
	}

	/// Names the text being highlighted, usually a file path.
	pub fn set_source<S: ToString>(&mut self, source: S) {
		self.source = Some(source.to_string())
	}

	pub fn highlight(&mut self, span: Span, label: Option<String>, style: Style) {
		self.extent = Some(match self.extent {
			Some(extent) => extent.union(span),
			None => span,
		});
		self.highlights.add(span, label, style)
	}

	pub fn add_note<S: ToString>(&mut self, ty: NoteType, content: S) {
		self.notes.push(Note {
			ty,
			content: content.to_string(),
		})
	}

	/// Renders the block against the text it points into, showing
	/// `context_lines` whole lines above and below the highlighted spans.
	pub fn render(&self, text: &str, context_lines: usize) -> Formatted {
		let metrics = metrics();

		let (first_line, last_line) = match self.extent {
			Some(extent) => (
				extent.start().line.saturating_sub(context_lines),
				extent.last().line.saturating_add(context_lines),
			),
			None => (0, usize::MAX),
		};

		let mut window = String::new();
		let mut line = 0;

		for c in text.chars() {
			if line >= first_line {
				window.push(c);
			}

			if c == '\n' {
				line += 1;

				if line > last_line {
					break;
				}
			}
		}

		let mut viewport: Span = Position::new(first_line, 0).into();
		for c in window.chars() {
			viewport.push(c, &metrics);
		}

		let result = self.highlights.render(
			window.chars().map(Ok::<char, Infallible>),
			viewport,
			&metrics,
		);

		let highlights = match result {
			Ok(highlights) => highlights,
			Err(e) => match e {},
		};

		let margin_len = self.highlights.margin_len(&viewport);

		Formatted {
			block: self,
			margin_len: if margin_len >= 2 { margin_len - 2 } else { 0 },
			highlights,
		}
	}
}

pub struct Formatted<'a> {
	block: &'a Block,
	margin_len: usize,
	highlights: source_span::fmt::Formatted,
}

impl<'a> fmt::Display for Formatted<'a> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let mut tab = String::with_capacity(self.margin_len);
		for _ in 0..self.margin_len {
			tab.push(' ')
		}

		write!(
			f,
			"{}{} {}\n",
			self.block.severity,
			Paint::new(':').bold(),
			Paint::new(&self.block.title).bold()
		)?;

		if let Some(source) = &self.block.source {
			write!(f, "{}--> {}\n", tab, source)?
		}

		write!(f, "{}{}", tab, Paint::blue('|').bold())?;
		self.highlights.fmt(f)?;
		write!(f, "{}{}\n", tab, Paint::blue('|').bold())?;

		for note in &self.block.notes {
			for (i, line) in note.content.lines().enumerate() {
				if i == 0 {
					write!(f, "{}= {}: {}\n", tab, note.ty, line)?;
				} else {
					write!(f, "{}  {}\n", tab, line)?
				}
			}
		}

		Ok(())
	}
}

pub enum NoteType {
	Note,
	Help,
}

impl fmt::Display for NoteType {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Note => write!(f, "{}", Paint::new("note").bold()),
			Self::Help => write!(f, "{}", Paint::green("help").bold()),
		}
	}
}

pub struct Note {
	ty: NoteType,
	content: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn char_span_points_at_offset() {
		let span = char_span("ab\ncd", 3);
		assert_eq!(span.start(), Position::new(1, 0));
		assert_eq!(span.last(), Position::new(1, 0));
	}

	#[test]
	fn char_span_past_end_is_empty() {
		let span = char_span("ab", 10);
		assert_eq!(span.start(), Position::new(0, 2));
		assert_eq!(span.start(), span.end());
	}
}
