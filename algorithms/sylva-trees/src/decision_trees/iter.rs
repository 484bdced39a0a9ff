use std::iter::Iterator;

use super::TreeNode;
use sylva::Float;

/// Depth-first pre-order iterator of nodes in a decision tree
///
/// Every node is visited exactly once, a parent before its children and the left subtree before
/// the right one.
pub struct NodeIter<'a, F> {
    stack: Vec<&'a TreeNode<F>>,
}

impl<'a, F> NodeIter<'a, F> {
    pub fn new(stack: Vec<&'a TreeNode<F>>) -> Self {
        NodeIter { stack }
    }
}

impl<'a, F: Float> Iterator for NodeIter<'a, F> {
    type Item = &'a TreeNode<F>;

    fn next(&mut self) -> Option<Self::Item> {
        self.stack.pop().map(|node| {
            if let Some((left, right)) = node.children() {
                self.stack.push(right);
                self.stack.push(left);
            }

            node
        })
    }
}
