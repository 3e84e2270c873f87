//! Structural algorithms over the node arena.
//!
//! These functions only read and rewrite links and colors. They know nothing
//! about keys, comparators or the element count; the root, minimum and
//! maximum are read from and written to the header node.

use super::node::{Arena, Color, HEADER, NodeId};

/// Leftmost node of the subtree rooted at `x`.
#[inline]
pub(crate) fn minimum<V>(arena: &Arena<V>, mut x: NodeId) -> NodeId {
    while let Some(left) = arena.left(x) {
        x = left;
    }
    x
}

/// Rightmost node of the subtree rooted at `x`.
#[inline]
pub(crate) fn maximum<V>(arena: &Arena<V>, mut x: NodeId) -> NodeId {
    while let Some(right) = arena.right(x) {
        x = right;
    }
    x
}

#[inline]
pub(crate) fn is_left_child<V>(arena: &Arena<V>, x: NodeId) -> bool {
    arena.left(arena.parent(x)) == Some(x)
}

/// In-order successor of a real node; the header follows the maximum.
pub(crate) fn successor<V>(arena: &Arena<V>, x: NodeId) -> NodeId {
    if arena.is_header(x) {
        return x;
    }
    if let Some(right) = arena.right(x) {
        return minimum(arena, right);
    }

    let mut x = x;
    let mut parent = arena.parent(x);
    while parent != HEADER && !is_left_child(arena, x) {
        x = parent;
        parent = arena.parent(parent);
    }
    parent
}

/// In-order predecessor; the header precedes nothing and is preceded by the maximum.
pub(crate) fn predecessor<V>(arena: &Arena<V>, x: NodeId) -> NodeId {
    if arena.is_header(x) {
        return arena.rightmost();
    }
    if let Some(left) = arena.left(x) {
        return maximum(arena, left);
    }

    let mut x = x;
    let mut parent = arena.parent(x);
    while parent != HEADER && is_left_child(arena, x) {
        x = parent;
        parent = arena.parent(parent);
    }
    parent
}

/// Points `parent`'s link to `old` at `new` instead, updating the root when
/// `parent` is the header.
#[inline]
fn replace_child<V>(arena: &mut Arena<V>, parent: NodeId, old: NodeId, new: Option<NodeId>) {
    if parent == HEADER {
        arena.set_root(new);
    } else if arena.left(parent) == Some(old) {
        arena.set_left(parent, new);
    } else {
        arena.set_right(parent, new);
    }
}

pub(crate) fn rotate_left<V>(arena: &mut Arena<V>, x: NodeId) {
    let Some(y) = arena.right(x) else {
        return;
    };

    let y_left = arena.left(y);
    arena.set_right(x, y_left);
    if let Some(y_left) = y_left {
        arena.set_parent(y_left, x);
    }

    let x_parent = arena.parent(x);
    arena.set_parent(y, x_parent);
    replace_child(arena, x_parent, x, Some(y));

    arena.set_left(y, Some(x));
    arena.set_parent(x, y);
}

pub(crate) fn rotate_right<V>(arena: &mut Arena<V>, x: NodeId) {
    let Some(y) = arena.left(x) else {
        return;
    };

    let y_right = arena.right(y);
    arena.set_left(x, y_right);
    if let Some(y_right) = y_right {
        arena.set_parent(y_right, x);
    }

    let x_parent = arena.parent(x);
    arena.set_parent(y, x_parent);
    replace_child(arena, x_parent, x, Some(y));

    arena.set_right(y, Some(x));
    arena.set_parent(x, y);
}

/// Restores the red-black properties after `x` was linked in as a leaf.
pub(crate) fn insert_rebalance<V>(arena: &mut Arena<V>, mut x: NodeId) {
    arena.set_color(x, Color::Red);

    while Some(x) != arena.root() && arena.is_red(Some(arena.parent(x))) {
        let parent = arena.parent(x);
        let grandparent = arena.parent(parent);

        if arena.left(grandparent) == Some(parent) {
            let uncle = arena.right(grandparent);

            if arena.is_red(uncle) {
                arena.set_color(parent, Color::Black);
                arena.paint_black(uncle);
                arena.set_color(grandparent, Color::Red);
                x = grandparent;
            } else {
                if arena.right(parent) == Some(x) {
                    x = parent;
                    rotate_left(arena, x);
                }
                let parent = arena.parent(x);
                let grandparent = arena.parent(parent);
                arena.set_color(parent, Color::Black);
                arena.set_color(grandparent, Color::Red);
                rotate_right(arena, grandparent);
                break;
            }
        } else {
            let uncle = arena.left(grandparent);

            if arena.is_red(uncle) {
                arena.set_color(parent, Color::Black);
                arena.paint_black(uncle);
                arena.set_color(grandparent, Color::Red);
                x = grandparent;
            } else {
                if arena.left(parent) == Some(x) {
                    x = parent;
                    rotate_right(arena, x);
                }
                let parent = arena.parent(x);
                let grandparent = arena.parent(parent);
                arena.set_color(parent, Color::Black);
                arena.set_color(grandparent, Color::Red);
                rotate_left(arena, grandparent);
                break;
            }
        }
    }

    arena.paint_black(arena.root());
}

/// Unlinks `z` from the tree and rebalances.
///
/// Returns the node that left the structure, which is always `z`: when `z`
/// has two children its successor takes over `z`'s position and color.
/// The slot itself is not released.
pub(crate) fn erase_rebalance<V>(arena: &mut Arena<V>, z: NodeId) -> NodeId {
    let mut x;
    let mut xp;

    match (arena.left(z), arena.right(z)) {
        (Some(z_left), Some(z_right)) => {
            let y = minimum(arena, z_right);
            x = arena.right(y);

            arena.set_parent(z_left, y);
            arena.set_left(y, Some(z_left));

            if y != z_right {
                xp = arena.parent(y);
                if let Some(x) = x {
                    arena.set_parent(x, xp);
                }
                arena.set_left(xp, x);
                arena.set_right(y, Some(z_right));
                arena.set_parent(z_right, y);
            } else {
                xp = y;
            }

            let z_parent = arena.parent(z);
            replace_child(arena, z_parent, z, Some(y));
            arena.set_parent(y, z_parent);

            let y_color = arena.color(y);
            arena.set_color(y, arena.color(z));
            arena.set_color(z, y_color);
        }
        (z_left, z_right) => {
            x = z_left.or(z_right);
            xp = arena.parent(z);
            if let Some(x) = x {
                arena.set_parent(x, xp);
            }
            replace_child(arena, xp, z, x);

            if arena.leftmost() == z {
                let leftmost = x.map_or(xp, |x| minimum(arena, x));
                arena.set_leftmost(leftmost);
            }
            if arena.rightmost() == z {
                let rightmost = x.map_or(xp, |x| maximum(arena, x));
                arena.set_rightmost(rightmost);
            }
        }
    }

    if arena.color(z) == Color::Black {
        while x != arena.root() && !arena.is_red(x) {
            if arena.left(xp) == x {
                let Some(mut sibling) = arena.right(xp) else {
                    break;
                };

                if arena.color(sibling) == Color::Red {
                    arena.set_color(sibling, Color::Black);
                    arena.set_color(xp, Color::Red);
                    rotate_left(arena, xp);
                    let Some(next) = arena.right(xp) else {
                        break;
                    };
                    sibling = next;
                }

                if !arena.is_red(arena.left(sibling)) && !arena.is_red(arena.right(sibling)) {
                    arena.set_color(sibling, Color::Red);
                    x = Some(xp);
                    xp = arena.parent(xp);
                } else {
                    if !arena.is_red(arena.right(sibling)) {
                        arena.paint_black(arena.left(sibling));
                        arena.set_color(sibling, Color::Red);
                        rotate_right(arena, sibling);
                        let Some(next) = arena.right(xp) else {
                            break;
                        };
                        sibling = next;
                    }

                    arena.set_color(sibling, arena.color(xp));
                    arena.set_color(xp, Color::Black);
                    arena.paint_black(arena.right(sibling));
                    rotate_left(arena, xp);
                    break;
                }
            } else {
                let Some(mut sibling) = arena.left(xp) else {
                    break;
                };

                if arena.color(sibling) == Color::Red {
                    arena.set_color(sibling, Color::Black);
                    arena.set_color(xp, Color::Red);
                    rotate_right(arena, xp);
                    let Some(next) = arena.left(xp) else {
                        break;
                    };
                    sibling = next;
                }

                if !arena.is_red(arena.left(sibling)) && !arena.is_red(arena.right(sibling)) {
                    arena.set_color(sibling, Color::Red);
                    x = Some(xp);
                    xp = arena.parent(xp);
                } else {
                    if !arena.is_red(arena.left(sibling)) {
                        arena.paint_black(arena.right(sibling));
                        arena.set_color(sibling, Color::Red);
                        rotate_left(arena, sibling);
                        let Some(next) = arena.left(xp) else {
                            break;
                        };
                        sibling = next;
                    }

                    arena.set_color(sibling, arena.color(xp));
                    arena.set_color(xp, Color::Black);
                    arena.paint_black(arena.left(sibling));
                    rotate_right(arena, xp);
                    break;
                }
            }
        }
        arena.paint_black(x);
    }

    z
}
