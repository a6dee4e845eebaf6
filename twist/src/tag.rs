//! Dispatch over the tag names the dialect gives meaning to.
//!
//! Anything not listed here is an ordinary element and passes through the
//! structural stages untouched.

/// Reserved control-flow tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlowKind {
	/// `<if condition={..}>`
	If,
	/// `<unless condition={..}>`, a negated `if`.
	Unless,
	/// `<elseif condition={..}>`, consumed by a preceding `if`.
	ElseIf,
	/// `<else>`, consumed by a preceding `if`.
	Else,
	/// `<switch condition={..}>` holding `case`/`default` children.
	Switch,
	/// `<repeat for={item in items}>` or `<repeat collection={..} as={..}>`.
	Repeat,
	/// `<using value={..} as={name}>`
	Using,
	/// `<g>`, a keyed group of siblings.
	Group,
}

impl ControlFlowKind {
	/// Maps a tag name to its control-flow kind; `None` means "not handled".
	#[must_use]
	pub fn from_tag(tag: &str) -> Option<Self> {
		match tag {
			"if" => Some(Self::If),
			"unless" => Some(Self::Unless),
			"elseif" => Some(Self::ElseIf),
			"else" => Some(Self::Else),
			"switch" => Some(Self::Switch),
			"repeat" => Some(Self::Repeat),
			"using" => Some(Self::Using),
			"g" => Some(Self::Group),
			_ => None,
		}
	}
}

/// Children of a `<switch>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchArm {
	/// `<case value={..}>`
	Case,
	/// `<default>`
	Default,
}

impl SwitchArm {
	/// Maps a tag name to a switch arm.
	#[must_use]
	pub fn from_tag(tag: &str) -> Option<Self> {
		match tag {
			"case" => Some(Self::Case),
			"default" => Some(Self::Default),
			_ => None,
		}
	}
}

/// Native form controls with a value the user edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormControl {
	/// `<input>`
	Input,
	/// `<textarea>`
	TextArea,
	/// `<select>`
	Select,
}

impl FormControl {
	/// Maps a tag name to a form control.
	#[must_use]
	pub fn from_tag(tag: &str) -> Option<Self> {
		match tag {
			"input" => Some(Self::Input),
			"textarea" => Some(Self::TextArea),
			"select" => Some(Self::Select),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unknown_tags_are_not_handled() {
		assert_eq!(ControlFlowKind::from_tag("div"), None);
		assert_eq!(ControlFlowKind::from_tag("If"), None);
		assert_eq!(ControlFlowKind::from_tag("g"), Some(ControlFlowKind::Group));
		assert_eq!(SwitchArm::from_tag("case"), Some(SwitchArm::Case));
		assert_eq!(FormControl::from_tag("select"), Some(FormControl::Select));
		assert_eq!(FormControl::from_tag("button"), None);
	}
}
