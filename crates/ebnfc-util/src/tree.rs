//! Generic indented tree rendering.
//!
//! Depth-first printer over any tree shape: the caller supplies a
//! `children` accessor and a `label` accessor and gets back one line per
//! node, indented two spaces per depth level. Used to dump syntax trees
//! for diagnostics.

/// Renders `root` as an indented tree.
///
/// # Examples
///
/// ```
/// use ebnfc_util::render_tree;
///
/// enum T {
///     Leaf(&'static str),
///     Node(Vec<T>),
/// }
///
/// let tree = T::Node(vec![T::Leaf("a"), T::Node(vec![T::Leaf("b")])]);
/// let out = render_tree(
///     &tree,
///     |t| match t {
///         T::Leaf(_) => Vec::new(),
///         T::Node(children) => children.iter().collect(),
///     },
///     |t| match t {
///         T::Leaf(s) => s.to_string(),
///         T::Node(_) => "(node)".to_string(),
///     },
/// );
/// assert_eq!(out, "(node)\n  a\n  (node)\n    b");
/// ```
pub fn render_tree<T, C, L>(root: &T, children: C, label: L) -> String
where
    C: Fn(&T) -> Vec<&T>,
    L: Fn(&T) -> String,
{
    let mut out = String::new();
    render_into(root, &children, &label, 0, &mut out);
    out
}

fn render_into<T, C, L>(node: &T, children: &C, label: &L, depth: usize, out: &mut String)
where
    C: Fn(&T) -> Vec<&T>,
    L: Fn(&T) -> String,
{
    if !out.is_empty() {
        out.push('\n');
    }
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push_str(&label(node));
    for child in children(node) {
        render_into(child, children, label, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct N {
        label: &'static str,
        children: Vec<N>,
    }

    fn leaf(label: &'static str) -> N {
        N {
            label,
            children: Vec::new(),
        }
    }

    #[test]
    fn test_single_node() {
        let root = leaf("root");
        let out = render_tree(&root, |n| n.children.iter().collect(), |n| n.label.into());
        assert_eq!(out, "root");
    }

    #[test]
    fn test_nested() {
        let root = N {
            label: "root",
            children: vec![
                leaf("a"),
                N {
                    label: "b",
                    children: vec![leaf("c"), leaf("d")],
                },
            ],
        };
        let out = render_tree(&root, |n| n.children.iter().collect(), |n| n.label.into());
        assert_eq!(out, "root\n  a\n  b\n    c\n    d");
    }
}
