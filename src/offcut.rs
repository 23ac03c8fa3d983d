use crate::guillotine::FreeSpaceNode;
use crate::types::{EPSILON, Offcut};

/// Collects every free leaf with positive area, right subtree before down
/// subtree. Abutting remnants are reported separately, never merged.
pub fn collect_offcuts(root: &FreeSpaceNode) -> Vec<Offcut> {
    let mut offcuts = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        match &node.split {
            Some(split) => {
                stack.push(&split.down);
                stack.push(&split.right);
            }
            None if node.rect.w > EPSILON && node.rect.h > EPSILON => offcuts.push(Offcut {
                x: node.x,
                y: node.y,
                width: node.rect.w,
                height: node.rect.h,
            }),
            None => {}
        }
    }
    offcuts
}
