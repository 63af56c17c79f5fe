/// Assemble nested nodes from a flat pre-order list without recursion.
///
/// Each item carries the index of its parent in the same list. Parents must
/// precede their children (pre-order), which lets a single reverse sweep
/// attach every finished subtree to its parent. Items whose parent index
/// does not precede them are treated as roots.
///
/// `attach` receives each node together with its children in original order.
pub fn assemble_preorder<T>(
    items: Vec<(Option<usize>, T)>,
    mut attach: impl FnMut(&mut T, Vec<T>),
) -> Vec<T> {
    let mut parents = Vec::with_capacity(items.len());
    let mut slots = Vec::with_capacity(items.len());
    for (parent, item) in items {
        parents.push(parent);
        slots.push(Some(item));
    }

    let mut pending: Vec<Vec<T>> = (0..slots.len()).map(|_| Vec::new()).collect();
    let mut roots = Vec::new();

    for idx in (0..slots.len()).rev() {
        let Some(mut node) = slots[idx].take() else {
            continue;
        };

        // Children were pushed last-to-first during the reverse sweep
        let mut children = std::mem::take(&mut pending[idx]);
        children.reverse();
        attach(&mut node, children);

        match parents[idx] {
            Some(parent) if parent < idx => pending[parent].push(node),
            _ => roots.push(node),
        }
    }

    roots.reverse();
    roots
}
