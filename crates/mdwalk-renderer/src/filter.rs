//! Child selection helpers shared by the default rules.

use mdwalk_ast::NodeRef;

/// Children of a list that are list items; anything else is dropped.
pub(crate) fn list_items<'a>(list: NodeRef<'a>) -> impl Iterator<Item = NodeRef<'a>> {
    list.children().filter(|child| child.kind().is_list_item())
}

/// Every child, unfiltered.
pub(crate) fn all_children<'a>(node: NodeRef<'a>) -> impl Iterator<Item = NodeRef<'a>> {
    node.children()
}

/// Language of a fenced code block: the first word of its info string.
pub(crate) fn fence_language(info: &str) -> Option<&str> {
    info.split_whitespace().next()
}

/// Zero-based start index for an ordered list whose first number is `start`.
pub(crate) fn start_index(start: u64) -> i64 {
    i64::try_from(start).map_or(i64::MAX - 1, |n| n - 1)
}
