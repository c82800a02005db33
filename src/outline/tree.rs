//! Nesting the flat heading list into an outline tree.

use crate::model::{Heading, OutlineNode};

/// Build the outline tree with a level stack.
///
/// Each heading closes every open heading at its own depth or deeper, then
/// opens as a child of whatever remains on top of the stack. Children are
/// therefore always strictly deeper than their parent, and siblings keep
/// reading order.
pub fn build_tree(headings: &[Heading]) -> Vec<OutlineNode> {
    let mut roots = Vec::new();
    let mut stack: Vec<OutlineNode> = Vec::new();

    for heading in headings {
        while stack
            .last()
            .is_some_and(|top| top.level.depth() >= heading.level.depth())
        {
            close_top(&mut stack, &mut roots);
        }
        stack.push(OutlineNode::new(heading.level, heading.text.clone(), heading.page));
    }
    while !stack.is_empty() {
        close_top(&mut stack, &mut roots);
    }

    roots
}

fn close_top(stack: &mut Vec<OutlineNode>, roots: &mut Vec<OutlineNode>) {
    if let Some(node) = stack.pop() {
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => roots.push(node),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeadingLevel;

    fn heading(level: HeadingLevel, text: &str, page: u32) -> Heading {
        Heading {
            level,
            text: text.to_string(),
            page,
            vertical_position: 0.0,
            runs: 0..0,
        }
    }

    fn assert_strictly_deeper(nodes: &[OutlineNode]) {
        for node in nodes {
            for child in &node.children {
                assert!(child.level.depth() > node.level.depth());
            }
            assert_strictly_deeper(&node.children);
        }
    }

    #[test]
    fn test_nests_by_level() {
        use HeadingLevel::*;
        let headings = vec![
            heading(H1, "Intro", 1),
            heading(H2, "Background", 1),
            heading(H3, "History", 2),
            heading(H2, "Goals", 2),
            heading(H1, "Method", 3),
            heading(H3, "Sampling", 3),
        ];
        let tree = build_tree(&headings);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].text, "Intro");
        assert_eq!(tree[0].children.len(), 2);
        assert_eq!(tree[0].children[0].children[0].text, "History");
        assert_eq!(tree[0].children[1].text, "Goals");
        // An H3 directly under an H1 stays an H3
        assert_eq!(tree[1].children[0].level, H3);
        assert_eq!(tree.iter().map(OutlineNode::total_nodes).sum::<usize>(), 6);
        assert_strictly_deeper(&tree);
    }

    #[test]
    fn test_leading_deep_heading_becomes_root() {
        use HeadingLevel::*;
        let tree = build_tree(&[heading(H2, "Orphan", 1), heading(H1, "Top", 2)]);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].level, H2);
        assert!(tree[0].children.is_empty());
    }

    #[test]
    fn test_empty() {
        assert!(build_tree(&[]).is_empty());
    }
}
