//! Tree rendering functionality for debugging and visualization.

use super::{DecisionTree, NodeId};

impl DecisionTree {
    /// Render the tree structure as a string for debugging.
    ///
    /// The root is labelled `case`. Substituted values are marked with `*`.
    pub fn render(&self) -> String {
        let mut result = String::new();
        self.render_recursive(self.root(), &mut result, "", true);
        result
    }

    fn label(&self, node: NodeId) -> String {
        if node == self.root() {
            "case".to_string()
        } else if self.is_substituted(node) {
            format!("{}*", self.render_value(node))
        } else {
            self.render_value(node)
        }
    }

    fn render_recursive(&self, node: NodeId, result: &mut String, prefix: &str, is_last: bool) {
        result.push_str(prefix);
        if is_last {
            result.push_str("└── ");
        } else {
            result.push_str("├── ");
        }
        result.push_str(&format!("{}\n", self.label(node)));

        let child_prefix = if is_last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };

        let children = self.children(node);
        for (i, &child) in children.iter().enumerate() {
            let child_is_last = i == children.len() - 1;
            self.render_recursive(child, result, &child_prefix, child_is_last);
        }
    }

    /// Render the tree compactly, showing only values.
    pub fn render_compact(&self) -> String {
        self.render_compact_from(self.root())
    }

    fn render_compact_from(&self, node: NodeId) -> String {
        let children = self.children(node);
        if children.is_empty() {
            self.label(node)
        } else {
            let children_str: Vec<String> = children
                .iter()
                .map(|&child| self.render_compact_from(child))
                .collect();
            format!("{}[{}]", self.label(node), children_str.join(", "))
        }
    }
}
