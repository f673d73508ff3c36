//! Platform-neutral control tree model and text rendering.
//!
//! Backends produce [`TreeNode`] values; [`render_tree`] turns a tree into
//! the indented text block that check mode prints or writes to the dump
//! file.  One line per control, two spaces of indent per depth level.

use crate::geom::Rect;

/// One control in a window's accessibility tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub name: String,
    pub control_type: String,
    pub class_name: String,
    pub automation_id: String,
    pub rect: Rect,
    /// Distance from the window root; the root itself is 0.
    pub depth: usize,
    pub children: Vec<TreeNode>,
}

/// Render a control tree as indented text.
///
/// Lines look like:
///
/// ```text
/// Window 'Untitled - Notepad' (L0, T0, R800, B600)
///   Button 'Save' (L100, T100, R150, B130) auto_id=SaveButton
/// ```
///
/// `auto_id=` and `class=` are only appended when the backend reported a
/// value.  The returned string has no trailing newline.
pub fn render_tree(root: &TreeNode) -> String {
    let mut lines = Vec::new();
    render_node(root, &mut lines);
    lines.join("\n")
}

fn render_node(node: &TreeNode, lines: &mut Vec<String>) {
    let indent = "  ".repeat(node.depth);
    let mut line = format!(
        "{indent}{} '{}' {}",
        node.control_type, node.name, node.rect
    );
    if !node.automation_id.is_empty() {
        line.push_str(&format!(" auto_id={}", node.automation_id));
    }
    if !node.class_name.is_empty() {
        line.push_str(&format!(" class={}", node.class_name));
    }
    lines.push(line);
    for child in &node.children {
        render_node(child, lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Rect;

    fn node(
        name: &str,
        control_type: &str,
        depth: usize,
        children: Vec<TreeNode>,
    ) -> TreeNode {
        TreeNode {
            name: name.to_owned(),
            control_type: control_type.to_owned(),
            class_name: String::new(),
            automation_id: String::new(),
            rect: Rect::new(0, 0, 10, 10),
            depth,
            children,
        }
    }

    #[test]
    fn renders_single_node_without_trailing_newline() {
        let text = render_tree(&node("Untitled - Notepad", "Window", 0, vec![]));
        assert_eq!(text, "Window 'Untitled - Notepad' (L0, T0, R10, B10)");
    }

    #[test]
    fn indents_two_spaces_per_level() {
        let tree = node(
            "Root",
            "Window",
            0,
            vec![node(
                "Bar",
                "ToolBar",
                1,
                vec![node("Save", "Button", 2, vec![])],
            )],
        );
        let text = render_tree(&tree);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Window"));
        assert!(lines[1].starts_with("  ToolBar"));
        assert!(lines[2].starts_with("    Button"));
    }

    #[test]
    fn appends_automation_id_and_class_only_when_present() {
        let mut plain = node("Save", "Button", 0, vec![]);
        assert!(!render_tree(&plain).contains("auto_id="));
        assert!(!render_tree(&plain).contains("class="));

        plain.automation_id = "SaveButton".to_owned();
        plain.class_name = "Button".to_owned();
        assert_eq!(
            render_tree(&plain),
            "Button 'Save' (L0, T0, R10, B10) auto_id=SaveButton class=Button"
        );
    }

    #[test]
    fn preserves_child_order() {
        let tree = node(
            "Root",
            "Window",
            0,
            vec![
                node("First", "Button", 1, vec![]),
                node("Second", "Button", 1, vec![]),
                node("Third", "Button", 1, vec![]),
            ],
        );
        let text = render_tree(&tree);
        let first = text.find("First").unwrap();
        let second = text.find("Second").unwrap();
        let third = text.find("Third").unwrap();
        assert!(first < second && second < third);
    }
}
