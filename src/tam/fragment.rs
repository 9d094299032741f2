//! Composable instruction fragments.
//!
//! A fragment is an ordered sequence of target instructions decorated with
//! labels. Fragments compose by append; labels attach before the first or
//! after the last line and require the fragment to be non empty.

use std::fmt::{self, Display};

use super::instructions::TamInstruction;

/// One line of emitted code: a label or an instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Label(String),
    Instruction(TamInstruction),
}

/// An ordered, composable unit of emitted target instructions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    lines: Vec<Line>,
}

impl Fragment {
    pub fn new() -> Self {
        Fragment { lines: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Appends a single instruction.
    pub fn add(&mut self, instruction: TamInstruction) {
        self.lines.push(Line::Instruction(instruction));
    }

    /// Appends every line of `other`, preserving order.
    pub fn append(&mut self, other: Fragment) {
        self.lines.extend(other.lines);
    }

    /// Attaches a label before the first line. The fragment must not be
    /// empty: a label needs an instruction to designate.
    pub fn add_prefix(&mut self, label: impl Into<String>) {
        let label = label.into();
        if self.lines.is_empty() {
            panic!("label {label:?} attached to an empty fragment");
        }
        self.lines.insert(0, Line::Label(label));
    }

    /// Attaches a label after the last line. The fragment must not be empty.
    pub fn add_suffix(&mut self, label: impl Into<String>) {
        let label = label.into();
        if self.lines.is_empty() {
            panic!("label {label:?} attached to an empty fragment");
        }
        self.lines.push(Line::Label(label));
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter()
    }

    /// The emitted instructions, without label decoration.
    pub fn instructions(&self) -> impl Iterator<Item = &TamInstruction> {
        self.lines.iter().filter_map(|line| match line {
            Line::Instruction(instruction) => Some(instruction),
            Line::Label(_) => None,
        })
    }

    /// The attached labels, in order of appearance.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|line| match line {
            Line::Label(label) => Some(label.as_str()),
            Line::Instruction(_) => None,
        })
    }
}

impl Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            match line {
                Line::Label(label) => writeln!(f, "{label}:")?,
                Line::Instruction(instruction) => writeln!(f, "    {instruction}")?,
            }
        }
        Ok(())
    }
}
