//! Iterator of records in TernaryTree.
use super::TernaryTree;

#[derive(Clone, Copy)]
enum Step {
    Low,
    Equal,
    High,
}

#[derive(Clone, Copy)]
struct Frame {
    node: u32,
    step: Step,
}

/// Iterator of records stored in [`TernaryTree`], in the sorted order of keys.
///
/// The traversal keeps an explicit stack, so its depth is bounded by the tree
/// height and not by the number of keys.
pub struct RecordIter<'t> {
    tree: &'t TernaryTree,
    stack: Vec<Frame>,
    prefix: Vec<char>,
}

impl<'t> RecordIter<'t> {
    fn new(tree: &'t TernaryTree) -> Self {
        let mut iter = Self {
            tree,
            stack: vec![],
            prefix: vec![],
        };
        iter.push(tree.root);
        iter
    }

    #[inline(always)]
    fn push(&mut self, node: u32) {
        if node != 0 {
            self.stack.push(Frame {
                node,
                step: Step::Low,
            });
        }
    }
}

impl Iterator for RecordIter<'_> {
    type Item = (Vec<char>, u32);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(frame) = self.stack.last_mut() {
            let node = self.tree.nodes[frame.node as usize];
            match frame.step {
                Step::Low => {
                    frame.step = Step::Equal;
                    if !node.is_compressed() {
                        self.push(node.lo);
                    }
                }
                Step::Equal => {
                    frame.step = Step::High;
                    if node.is_compressed() {
                        let mut key = self.prefix.clone();
                        key.extend(self.tree.suffix(node.lo));
                        return Some((key, node.eq));
                    }
                    if node.is_terminator() {
                        return Some((self.prefix.clone(), node.eq));
                    }
                    self.prefix.push(node.sc);
                    self.push(node.eq);
                }
                Step::High => {
                    self.stack.pop();
                    if !node.is_compressed() && !node.is_terminator() {
                        self.prefix.pop();
                    }
                    self.push(node.hi);
                }
            }
        }
        None
    }
}

impl TernaryTree {
    /// Creates an iterator of records sorted by key.
    #[inline(always)]
    pub fn record_iter(&self) -> RecordIter<'_> {
        RecordIter::new(self)
    }
}
