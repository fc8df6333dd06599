//! Flat per-type listing.

use std::fmt::Write;

use osgraph_core::GraphDocument;
use osgraph_core::meta::MetaExt;

const HEADERS: [&str; 3] = ["ID", "Name", "Status"];

/// Lists every node of one type with its id, name and status.
#[derive(Debug, Clone)]
pub struct TableRenderer {
    node_type: String,
}

impl TableRenderer {
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
        }
    }

    pub fn render(&self, doc: &GraphDocument) -> String {
        let rows: Vec<[String; 3]> = doc
            .nodes_of_type(&self.node_type)
            .map(|node| {
                [
                    node.id.clone(),
                    node.name.clone(),
                    node.meta.text_or("status", "UNKNOWN"),
                ]
            })
            .collect();

        if rows.is_empty() {
            return format!("No resources of type '{}' found.\n", self.node_type);
        }

        let mut widths = HEADERS.map(|h| h.chars().count());
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut output = String::new();
        let _ = writeln!(output, "{} List", capitalize(&self.node_type));
        write_row(&mut output, &HEADERS, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_row(&mut output, &rule, &widths);
        for row in &rows {
            write_row(&mut output, row, &widths);
        }
        output
    }
}

fn write_row<S: AsRef<str>>(output: &mut String, cells: &[S], widths: &[usize; 3]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| pad(cell.as_ref(), *width))
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(output, "{}", line.trim_end());
}

fn pad(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(cell.chars().count());
    format!("{cell}{}", " ".repeat(fill))
}

/// Upper-case the first character and lower-case the rest.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("server"), "Server");
        assert_eq!(capitalize("load_balancer"), "Load_balancer");
        assert_eq!(capitalize("FLOATING_IP"), "Floating_ip");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_pad() {
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("abcdef", 4), "abcdef");
    }
}
