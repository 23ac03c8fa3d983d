use crate::offcut::collect_offcuts;
use crate::types::{Panel, Piece, PlacedPiece, Rect};

/// Occupied slot of a used node plus the free space left to its right and below it.
#[derive(Debug)]
pub struct Split {
    pub occupied: Rect,
    pub right: FreeSpaceNode,
    pub down: FreeSpaceNode,
}

/// A node of the free-space tree. A node without a split is a free rectangle;
/// a split node is used and owns exactly two residual children.
#[derive(Debug)]
pub struct FreeSpaceNode {
    pub x: f64,
    pub y: f64,
    pub rect: Rect,
    pub split: Option<Box<Split>>,
}

impl FreeSpaceNode {
    pub fn new(x: f64, y: f64, rect: Rect) -> Self {
        Self {
            x,
            y,
            rect,
            split: None,
        }
    }

    pub fn is_used(&self) -> bool {
        self.split.is_some()
    }

    /// First free leaf, right child before down child, that can host `piece`.
    /// First fit: candidates are not compared.
    pub fn locate(&self, piece: Rect) -> Option<&FreeSpaceNode> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match &node.split {
                Some(split) => {
                    stack.push(&split.down);
                    stack.push(&split.right);
                }
                None if piece.fits_in(&node.rect) => return Some(node),
                None => {}
            }
        }
        None
    }

    pub fn locate_mut(&mut self, piece: Rect) -> Option<&mut FreeSpaceNode> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.split.is_none() {
                if piece.fits_in(&node.rect) {
                    return Some(node);
                }
                continue;
            }
            if let Some(split) = node.split.as_deref_mut() {
                stack.push(&mut split.down);
                stack.push(&mut split.right);
            }
        }
        None
    }

    /// Marks the node used by a `placed` piece at its top-left corner. The right
    /// child shares the piece's height; the down child spans the full node width.
    pub fn split(&mut self, placed: Rect, kerf: f64) {
        let right_w = (self.rect.w - placed.w - kerf).max(0.0);
        let down_h = (self.rect.h - placed.h - kerf).max(0.0);

        self.split = Some(Box::new(Split {
            occupied: placed,
            right: FreeSpaceNode::new(
                self.x + placed.w + kerf,
                self.y,
                Rect::new(right_w, placed.h),
            ),
            down: FreeSpaceNode::new(
                self.x,
                self.y + placed.h + kerf,
                Rect::new(self.rect.w, down_h),
            ),
        }));
    }

    /// Material removed by the saw blade (and slivers thinner than a kerf) below this node.
    pub fn kerf_loss(&self) -> f64 {
        let mut loss = 0.0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let Some(split) = &node.split {
                loss += node.rect.area()
                    - split.occupied.area()
                    - split.right.rect.area()
                    - split.down.rect.area();
                stack.push(&split.down);
                stack.push(&split.right);
            }
        }
        loss
    }
}

// Long chains of splits would overflow the stack with the derived recursive drop.
impl Drop for FreeSpaceNode {
    fn drop(&mut self) {
        let mut pending: Vec<Box<Split>> = self.split.take().into_iter().collect();
        while let Some(mut split) = pending.pop() {
            pending.extend(split.right.split.take());
            pending.extend(split.down.split.take());
        }
    }
}

/// One panel being filled: its free-space tree and the pieces placed so far.
#[derive(Debug)]
pub struct GuillotineBin {
    stock: Rect,
    kerf: f64,
    pub root: FreeSpaceNode,
    pub placements: Vec<PlacedPiece>,
}

impl GuillotineBin {
    pub fn new(stock: Rect, kerf: f64) -> Self {
        Self {
            stock,
            kerf,
            root: FreeSpaceNode::new(0.0, 0.0, stock),
            placements: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn kerf_loss(&self) -> f64 {
        self.root.kerf_loss()
    }

    /// Places `piece` following its rotation policy. The tree is only mutated
    /// when a slot is found.
    pub fn place(&mut self, piece: &Piece) -> Option<&PlacedPiece> {
        for &rotated in piece.rotation.attempts() {
            let rect = if rotated {
                piece.rect().rotated()
            } else {
                piece.rect()
            };
            if let Some(node) = self.root.locate_mut(rect) {
                let (x, y) = (node.x, node.y);
                node.split(rect, self.kerf);
                self.placements.push(PlacedPiece::new(piece, x, y, rotated));
                return self.placements.last();
            }
        }
        None
    }

    /// Freezes the bin into a panel, collecting its offcuts and kerf loss.
    pub fn into_panel(self) -> Panel {
        Panel {
            width: self.stock.w,
            height: self.stock.h,
            offcuts: collect_offcuts(&self.root),
            kerf_loss: self.root.kerf_loss(),
            pieces: self.placements,
        }
    }
}
