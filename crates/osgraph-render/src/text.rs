//! Guide-line tree printer.

const BRANCH: &str = "├── ";
const LAST: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

/// A labelled tree printed with box-drawing guides.
///
/// ```text
/// Project: demo
/// ├── Servers (1)
/// │   └── web (s1)
/// └── Networks (1)
///     └── private (n1)
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextTree {
    label: String,
    children: Vec<TextTree>,
}

impl TextTree {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    /// Append a child and return it for further nesting.
    pub fn add(&mut self, label: impl Into<String>) -> &mut TextTree {
        self.children.push(TextTree::new(label));
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Append an already built subtree.
    pub fn push(&mut self, child: TextTree) {
        self.children.push(child);
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn children(&self) -> &[TextTree] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn render(&self) -> String {
        let mut output = String::with_capacity(256);
        output.push_str(&self.label);
        output.push('\n');
        let mut prefix = String::new();
        write_children(&mut output, &self.children, &mut prefix);
        output
    }
}

fn write_children(output: &mut String, children: &[TextTree], prefix: &mut String) {
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        output.push_str(prefix);
        output.push_str(if last { LAST } else { BRANCH });
        output.push_str(&child.label);
        output.push('\n');

        let len = prefix.len();
        prefix.push_str(if last { SPACE } else { PIPE });
        write_children(output, &child.children, prefix);
        prefix.truncate(len);
    }
}
