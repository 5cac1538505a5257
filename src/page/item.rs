use crate::{layout::ScaledImage, style::TextStyle, Colour, Coord, Dim, LineStyle, Pt};
use std::{cmp::Ordering, collections::BTreeMap};

/// The z index of everything that doesn't ask for another one
pub const DEFAULT_Z: f32 = 0.0;

/// Background fills go behind everything else
pub const BACKGROUND_Z: f32 = -1.0;

/// A positioned drawing primitive waiting for its page to be committed
#[derive(Debug, Clone)]
pub enum DrawOp {
    Line {
        start: Coord,
        end: Coord,
        style: LineStyle,
    },
    FillRect {
        bottom_left: Coord,
        dim: Dim,
        colour: Colour,
    },
    Text {
        baseline_left: Coord,
        text: String,
        style: TextStyle,
    },
    Image {
        bottom_left: Coord,
        image: ScaledImage,
    },
}

impl DrawOp {
    /// The same primitive moved right by `dx`
    pub fn shifted(self, dx: Pt) -> DrawOp {
        let shift = |c: Coord| c.with_x(c.x + dx);
        match self {
            DrawOp::Line { start, end, style } => DrawOp::Line {
                start: shift(start),
                end: shift(end),
                style,
            },
            DrawOp::FillRect {
                bottom_left,
                dim,
                colour,
            } => DrawOp::FillRect {
                bottom_left: shift(bottom_left),
                dim,
                colour,
            },
            DrawOp::Text {
                baseline_left,
                text,
                style,
            } => DrawOp::Text {
                baseline_left: shift(baseline_left),
                text,
                style,
            },
            DrawOp::Image { bottom_left, image } => DrawOp::Image {
                bottom_left: shift(bottom_left),
                image,
            },
        }
    }
}

#[derive(Debug, Copy, Clone)]
struct ItemKey {
    z: f32,
    serial: u64,
}

impl Ord for ItemKey {
    fn cmp(&self, other: &ItemKey) -> Ordering {
        self.z
            .total_cmp(&other.z)
            .then_with(|| self.serial.cmp(&other.serial))
    }
}

impl PartialOrd for ItemKey {
    fn partial_cmp(&self, other: &ItemKey) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ItemKey {
    fn eq(&self, other: &ItemKey) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ItemKey {}

/// Primitives in paint order: lowest z first, and in insertion order among
/// equal z values.
#[derive(Debug, Clone, Default)]
pub struct ItemSet {
    items: BTreeMap<ItemKey, DrawOp>,
    next_serial: u64,
}

impl ItemSet {
    pub fn new() -> ItemSet {
        ItemSet::default()
    }

    pub fn insert(&mut self, z: f32, op: DrawOp) {
        let key = ItemKey {
            z,
            serial: self.next_serial,
        };
        self.next_serial += 1;
        self.items.insert(key, op);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawOp> {
        self.items.values()
    }

    /// Like [`iter`](ItemSet::iter) but with each primitive's z index
    pub fn iter_z(&self) -> impl Iterator<Item = (f32, &DrawOp)> {
        self.items.iter().map(|(key, op)| (key.z, op))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colours;

    fn marker(n: f32) -> DrawOp {
        DrawOp::FillRect {
            bottom_left: Coord::new(Pt(n), Pt::ZERO),
            dim: Dim::ZERO,
            colour: colours::BLACK,
        }
    }

    fn marker_x(op: &DrawOp) -> f32 {
        match op {
            DrawOp::FillRect { bottom_left, .. } => bottom_left.x.0,
            _ => panic!("not a marker"),
        }
    }

    #[test]
    fn paints_by_z_then_insertion() {
        let mut items = ItemSet::new();
        // x records the insertion order
        items.insert(2.0, marker(0.0));
        items.insert(1.0, marker(1.0));
        items.insert(1.0, marker(2.0));
        items.insert(0.0, marker(3.0));

        let order: Vec<(f32, f32)> = items.iter_z().map(|(z, op)| (z, marker_x(op))).collect();
        assert_eq!(order, vec![(0.0, 3.0), (1.0, 1.0), (1.0, 2.0), (2.0, 0.0)]);
        assert_eq!(items.len(), 4);
    }

    #[test]
    fn shifting_moves_only_x() {
        let moved = marker(5.0).shifted(Pt(10.0));
        assert_eq!(marker_x(&moved), 15.0);
        match moved {
            DrawOp::FillRect { bottom_left, .. } => assert_eq!(bottom_left.y, Pt::ZERO),
            _ => unreachable!(),
        }
    }
}
