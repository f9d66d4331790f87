//! Question nodes and their options.

use serde::{Deserialize, Serialize};

use super::{NodeId, OptionLetter};

/// One labelled choice at a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// Display text.
    pub label: String,

    /// Node (or terminal) this choice leads to.
    pub next: NodeId,

    /// Whether picking this option counts toward the "together" outcome.
    pub together: bool,
}

impl ChoiceOption {
    pub fn new(label: impl Into<String>, next: impl Into<NodeId>, together: bool) -> Self {
        Self {
            label: label.into(),
            next: next.into(),
            together,
        }
    }
}

/// A question step in the narrative, offering exactly two options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionNode {
    pub id: NodeId,

    /// Flavor text shown before the question.
    #[serde(default)]
    pub context: String,

    pub question: String,
    pub option_a: ChoiceOption,
    pub option_b: ChoiceOption,
}

impl QuestionNode {
    /// Create a node with empty context text.
    pub fn new(
        id: impl Into<NodeId>,
        question: impl Into<String>,
        option_a: ChoiceOption,
        option_b: ChoiceOption,
    ) -> Self {
        Self {
            id: id.into(),
            context: String::new(),
            question: question.into(),
            option_a,
            option_b,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// Get the option behind a letter.
    pub fn option(&self, letter: OptionLetter) -> &ChoiceOption {
        match letter {
            OptionLetter::A => &self.option_a,
            OptionLetter::B => &self.option_b,
        }
    }

    /// Both options paired with their letters, A first.
    pub fn options(&self) -> [(OptionLetter, &ChoiceOption); 2] {
        [
            (OptionLetter::A, &self.option_a),
            (OptionLetter::B, &self.option_b),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_by_letter() {
        let node = QuestionNode::new(
            "start",
            "Coffee or tea?",
            ChoiceOption::new("Coffee", "cafe", true),
            ChoiceOption::new("Tea", "end", false),
        )
        .with_context("A quiet morning.");

        assert_eq!(node.option(OptionLetter::A).label, "Coffee");
        assert_eq!(node.option(OptionLetter::B).next, NodeId::new("end"));
        assert!(!node.option(OptionLetter::B).together);
        assert_eq!(node.context, "A quiet morning.");
    }

    #[test]
    fn test_options_order() {
        let node = QuestionNode::new(
            "n",
            "?",
            ChoiceOption::new("first", "x", true),
            ChoiceOption::new("second", "y", false),
        );
        let letters: Vec<_> = node.options().iter().map(|(l, _)| *l).collect();
        assert_eq!(letters, vec![OptionLetter::A, OptionLetter::B]);
    }
}
