// Indentation-driven step tree construction
use serde::{Deserialize, Serialize};

/// Lines starting with this prefix are notes, not steps
pub const NOTE_PREFIX: &str = "注：";

/// Spaces per nesting level
const INDENT_WIDTH: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepNode {
    pub text: String,
    pub children: Vec<StepNode>,
}

impl StepNode {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            children: Vec::new(),
        }
    }

    /// Depth of the subtree rooted at this node (a leaf has depth 1)
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(StepNode::depth).max().unwrap_or(0)
    }

    /// Number of nodes in the subtree, this node included
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(StepNode::count).sum::<usize>()
    }
}

/// Builds a step forest from an indented list, one line at a time.
///
/// Open nodes live on a stack; a node is attached to its parent only when it is
/// closed, so the forest is assembled bottom-up and never holds back-references.
#[derive(Debug, Default)]
pub struct StepTreeBuilder {
    roots: Vec<StepNode>,
    open: Vec<StepNode>,
}

impl StepTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw line of the steps section
    pub fn push_line(&mut self, line: &str) {
        if line.trim().is_empty() || line.starts_with(NOTE_PREFIX) {
            return;
        }

        let indent = line.chars().take_while(|c| c.is_whitespace()).count();
        // An over-indented line attaches to the deepest open node
        let level = (indent / INDENT_WIDTH).min(self.open.len());

        while self.open.len() > level {
            self.close_top();
        }

        let text = line.trim().trim_matches(|c: char| c == '-' || c == ' ');
        self.open.push(StepNode::new(text));
    }

    fn close_top(&mut self) {
        if let Some(node) = self.open.pop() {
            match self.open.last_mut() {
                Some(parent) => parent.children.push(node),
                None => self.roots.push(node),
            }
        }
    }

    pub fn finish(mut self) -> Vec<StepNode> {
        while !self.open.is_empty() {
            self.close_top();
        }
        self.roots
    }
}

/// Parse a steps section body into an ordered forest
pub fn build_step_tree(body: &str) -> Vec<StepNode> {
    let mut builder = StepTreeBuilder::new();
    for line in body.lines() {
        builder.push_line(line);
    }
    builder.finish()
}
