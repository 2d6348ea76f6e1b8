//! Spatial level
//!
//! The core only needs a narrow view of the map: who stands where, what lies
//! on the ground, and whether one square can see another. [`Level`] is that
//! contract; [`GridLevel`] is a plain rectangular implementation.

use std::fmt::Debug;

use crate::creature::CreatureId;
use crate::geom::{Rect, Vec2};
use crate::object::{Item, ItemId};

/// Level services used by the simulation
pub trait Level: Debug {
    fn bounds(&self) -> Rect;

    fn in_bounds(&self, pos: Vec2) -> bool {
        self.bounds().contains(pos)
    }

    /// Whether the square can be stood on at all
    fn is_passable(&self, pos: Vec2) -> bool;

    /// Passable and free of creatures
    fn can_occupy(&self, pos: Vec2) -> bool {
        self.is_passable(pos) && self.creature_at(pos).is_none()
    }

    fn creature_at(&self, pos: Vec2) -> Option<CreatureId>;

    /// Put a creature on a free square. Returns false if it is taken.
    fn place_creature(&mut self, id: CreatureId, pos: Vec2) -> bool;

    fn move_creature(&mut self, from: Vec2, to: Vec2) -> bool;

    fn swap_creatures(&mut self, a: Vec2, b: Vec2) -> bool;

    fn remove_creature(&mut self, pos: Vec2) -> Option<CreatureId>;

    /// Creatures inside a rectangle, in scan order
    fn creatures_in(&self, area: Rect) -> Vec<CreatureId>;

    fn line_of_sight(&self, from: Vec2, to: Vec2) -> bool;

    /// Whether the sky is blocked over the square
    fn is_covered(&self, pos: Vec2) -> bool;

    fn items_at(&self, pos: Vec2) -> &[Item];

    fn drop_item(&mut self, pos: Vec2, item: Item);

    fn drop_items(&mut self, pos: Vec2, items: Vec<Item>) {
        for item in items {
            self.drop_item(pos, item);
        }
    }

    /// Take the listed items off the ground, skipping ids that are not there
    fn take_items(&mut self, pos: Vec2, ids: &[ItemId]) -> Vec<Item>;
}

/// Rectangular level with walls and roofs
#[derive(Debug, Clone)]
pub struct GridLevel {
    width: i32,
    height: i32,
    walls: Vec<bool>,
    covered: Vec<bool>,
    occupants: Vec<Option<CreatureId>>,
    items: Vec<Vec<Item>>,
}

impl GridLevel {
    /// Open level with no walls and open sky
    pub fn new(width: i32, height: i32) -> Self {
        let n = (width.max(0) * height.max(0)) as usize;
        Self {
            width,
            height,
            walls: vec![false; n],
            covered: vec![false; n],
            occupants: vec![None; n],
            items: vec![Vec::new(); n],
        }
    }

    fn idx(&self, pos: Vec2) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| (pos.y * self.width + pos.x) as usize)
    }

    pub fn set_wall(&mut self, pos: Vec2, wall: bool) {
        if let Some(i) = self.idx(pos) {
            self.walls[i] = wall;
        }
    }

    pub fn set_covered(&mut self, pos: Vec2, covered: bool) {
        if let Some(i) = self.idx(pos) {
            self.covered[i] = covered;
        }
    }

    fn blocks_sight(&self, pos: Vec2) -> bool {
        self.idx(pos).is_none_or(|i| self.walls[i])
    }
}

impl Level for GridLevel {
    fn bounds(&self) -> Rect {
        Rect::new(Vec2::ZERO, Vec2::new(self.width, self.height))
    }

    fn is_passable(&self, pos: Vec2) -> bool {
        self.idx(pos).is_some_and(|i| !self.walls[i])
    }

    fn creature_at(&self, pos: Vec2) -> Option<CreatureId> {
        self.idx(pos).and_then(|i| self.occupants[i])
    }

    fn place_creature(&mut self, id: CreatureId, pos: Vec2) -> bool {
        if !self.can_occupy(pos) {
            return false;
        }
        match self.idx(pos) {
            Some(i) => {
                self.occupants[i] = Some(id);
                true
            }
            None => false,
        }
    }

    fn move_creature(&mut self, from: Vec2, to: Vec2) -> bool {
        if !self.can_occupy(to) {
            return false;
        }
        let (Some(a), Some(b)) = (self.idx(from), self.idx(to)) else {
            return false;
        };
        match self.occupants[a].take() {
            Some(id) => {
                self.occupants[b] = Some(id);
                true
            }
            None => false,
        }
    }

    fn swap_creatures(&mut self, a: Vec2, b: Vec2) -> bool {
        let (Some(i), Some(j)) = (self.idx(a), self.idx(b)) else {
            return false;
        };
        if self.occupants[i].is_none() || self.occupants[j].is_none() {
            return false;
        }
        self.occupants.swap(i, j);
        true
    }

    fn remove_creature(&mut self, pos: Vec2) -> Option<CreatureId> {
        let i = self.idx(pos)?;
        self.occupants[i].take()
    }

    fn creatures_in(&self, area: Rect) -> Vec<CreatureId> {
        let mut ret = Vec::new();
        for y in area.min.y..area.max.y {
            for x in area.min.x..area.max.x {
                if let Some(id) = self.creature_at(Vec2::new(x, y)) {
                    ret.push(id);
                }
            }
        }
        ret
    }

    /// Bresenham walk; the end squares themselves never block.
    fn line_of_sight(&self, from: Vec2, to: Vec2) -> bool {
        let (mut x, mut y) = (from.x, from.y);
        let dx = (to.x - x).abs();
        let dy = -(to.y - y).abs();
        let sx = if x < to.x { 1 } else { -1 };
        let sy = if y < to.y { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            let here = Vec2::new(x, y);
            if here == to {
                return true;
            }
            if here != from && self.blocks_sight(here) {
                return false;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn is_covered(&self, pos: Vec2) -> bool {
        self.idx(pos).is_some_and(|i| self.covered[i])
    }

    fn items_at(&self, pos: Vec2) -> &[Item] {
        match self.idx(pos) {
            Some(i) => &self.items[i],
            None => &[],
        }
    }

    fn drop_item(&mut self, pos: Vec2, item: Item) {
        if let Some(i) = self.idx(pos) {
            self.items[i].push(item);
        }
    }

    fn take_items(&mut self, pos: Vec2, ids: &[ItemId]) -> Vec<Item> {
        let Some(i) = self.idx(pos) else {
            return Vec::new();
        };
        let (taken, kept) = std::mem::take(&mut self.items[i])
            .into_iter()
            .partition(|item| ids.contains(&item.id));
        self.items[i] = kept;
        taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_and_move() {
        let mut level = GridLevel::new(4, 4);
        assert!(level.place_creature(CreatureId(1), Vec2::new(0, 0)));
        assert!(!level.place_creature(CreatureId(2), Vec2::new(0, 0)));
        assert!(level.move_creature(Vec2::new(0, 0), Vec2::new(1, 1)));
        assert_eq!(level.creature_at(Vec2::new(1, 1)), Some(CreatureId(1)));
        assert_eq!(level.creature_at(Vec2::new(0, 0)), None);
    }

    #[test]
    fn test_walls_block_movement_and_sight() {
        let mut level = GridLevel::new(5, 3);
        level.set_wall(Vec2::new(2, 1), true);
        assert!(!level.is_passable(Vec2::new(2, 1)));
        assert!(!level.line_of_sight(Vec2::new(0, 1), Vec2::new(4, 1)));
        assert!(level.line_of_sight(Vec2::new(0, 0), Vec2::new(4, 0)));
        // a wall can itself be seen
        assert!(level.line_of_sight(Vec2::new(0, 1), Vec2::new(2, 1)));
    }

    #[test]
    fn test_out_of_bounds() {
        let level = GridLevel::new(3, 3);
        assert!(!level.in_bounds(Vec2::new(3, 0)));
        assert!(!level.is_passable(Vec2::new(-1, 0)));
        assert!(level.items_at(Vec2::new(7, 7)).is_empty());
    }

    #[test]
    fn test_swap() {
        let mut level = GridLevel::new(3, 3);
        level.place_creature(CreatureId(1), Vec2::new(0, 0));
        level.place_creature(CreatureId(2), Vec2::new(1, 0));
        assert!(level.swap_creatures(Vec2::new(0, 0), Vec2::new(1, 0)));
        assert_eq!(level.creature_at(Vec2::new(0, 0)), Some(CreatureId(2)));
        assert!(!level.swap_creatures(Vec2::new(0, 0), Vec2::new(2, 2)));
    }

    #[test]
    fn test_take_items_by_id() {
        let mut level = GridLevel::new(3, 3);
        let pos = Vec2::new(1, 1);
        level.drop_item(pos, Item::new(ItemId(1), "rock"));
        level.drop_item(pos, Item::new(ItemId(2), "bone"));
        let taken = level.take_items(pos, &[ItemId(2), ItemId(9)]);
        assert_eq!(taken.len(), 1);
        assert_eq!(taken[0].name, "bone");
        assert_eq!(level.items_at(pos).len(), 1);
    }

    #[test]
    fn test_creatures_in_rect() {
        let mut level = GridLevel::new(6, 6);
        level.place_creature(CreatureId(1), Vec2::new(1, 1));
        level.place_creature(CreatureId(2), Vec2::new(5, 5));
        let found = level.creatures_in(Rect::around(Vec2::new(1, 1), 2));
        assert_eq!(found, vec![CreatureId(1)]);
    }
}
