// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Items, their handles, and the ordered child collection.

use crate::swipe::SwipeReveal;

/// Identifier for an item in a stack.
///
/// This is a small, copyable handle that stays stable while the item lives
/// (including across reorders) and becomes invalid when the item is removed.
/// It consists of a slot index and a generation counter.
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `ItemId` for it is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `ItemId`.
///
/// Stale `ItemId`s never alias a different live item because the generation must match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ItemId(pub(crate) u32, pub(crate) u32);

impl ItemId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

/// Capability to report the height an item wants when laid out.
pub trait HeightProvider {
    /// Height in px the item occupies in the stack.
    fn intrinsic_height(&self) -> f64;
}

impl HeightProvider for f64 {
    fn intrinsic_height(&self) -> f64 {
        *self
    }
}

impl<T: HeightProvider + ?Sized> HeightProvider for Box<T> {
    fn intrinsic_height(&self) -> f64 {
        (**self).intrinsic_height()
    }
}

/// Compositing hint for the renderer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LayerHint {
    /// Draw directly.
    #[default]
    None,
    /// Promote to an offscreen layer (the item is partially transparent).
    Offscreen,
}

/// Whether the renderer should draw the item at all.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Visibility {
    /// Drawn.
    #[default]
    Visible,
    /// Kept in layout but not drawn.
    Hidden,
}

/// The renderable properties an item currently shows.
///
/// These are written by [`ViewStateStore::apply`](crate::ViewStateStore::apply),
/// by the external animator while it tweens, and by swipe progress.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LiveProperties {
    /// Vertical offset from the top of the stack.
    pub translation_y: f64,
    /// Horizontal offset; non-zero while the item is being swiped.
    pub translation_x: f64,
    /// Current height.
    pub height: f64,
    /// Uniform scale.
    pub scale: f64,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
    /// Pixels hidden at the top because the previous item overlaps them.
    pub clip_top_amount: f64,
    /// Compositing hint.
    pub layer: LayerHint,
    /// Draw or skip.
    pub visibility: Visibility,
    /// Swipe-action reveal under the item.
    pub swipe: SwipeReveal,
}

impl LiveProperties {
    /// Fully opaque, unscaled, untranslated properties with the given height.
    pub fn with_height(height: f64) -> Self {
        Self {
            translation_y: 0.0,
            translation_x: 0.0,
            height,
            scale: 1.0,
            alpha: 1.0,
            clip_top_amount: 0.0,
            layer: LayerHint::None,
            visibility: Visibility::Visible,
            swipe: SwipeReveal::NONE,
        }
    }
}

impl Default for LiveProperties {
    fn default() -> Self {
        Self::with_height(0.0)
    }
}

/// An item owned by the stack.
#[derive(Clone, Debug)]
pub struct Item<T> {
    /// Caller content.
    pub content: T,
    /// What the item currently shows.
    pub live: LiveProperties,
    /// Gone items keep their slot and order but take no part in layout.
    pub gone: bool,
    // Intrinsic height the container last accounted for.
    pub(crate) measured_height: f64,
}

/// The ordered child collection.
///
/// Items live in generational slots; `order` holds the child order as handles.
#[derive(Clone)]
pub struct ItemList<T> {
    slots: Vec<Option<Item<T>>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    order: Vec<ItemId>,
}

impl<T> core::fmt::Debug for ItemList<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let gone = self
            .iter()
            .filter(|(_, item)| item.gone)
            .count();
        f.debug_struct("ItemList")
            .field("len", &self.order.len())
            .field("gone", &gone)
            .field("slots_total", &self.slots.len())
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl<T> Default for ItemList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ItemList<T> {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            order: Vec::new(),
        }
    }

    /// Insert `content` at child `index` (clamped to the end) and return its handle.
    pub fn insert(&mut self, index: usize, content: T, live: LiveProperties) -> ItemId {
        let item = Item {
            content,
            measured_height: live.height,
            live,
            gone: false,
        };
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.slots[idx] = Some(item);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ItemId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.slots.push(Some(item));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ItemId uses 32-bit indices by design."
            )]
            ((self.slots.len() - 1) as u32, generation)
        };
        let id = ItemId::new(idx, generation);
        let index = index.min(self.order.len());
        self.order.insert(index, id);
        id
    }

    /// Append `content` as the last child.
    pub fn push(&mut self, content: T, live: LiveProperties) -> ItemId {
        self.insert(self.order.len(), content, live)
    }

    /// Remove an item. Returns `None` for a stale handle.
    pub fn remove(&mut self, id: ItemId) -> Option<Item<T>> {
        if !self.is_alive(id) {
            return None;
        }
        self.order.retain(|&other| other != id);
        let item = self.slots[id.idx()].take();
        self.free_list.push(id.idx());
        item
    }

    /// Move a live item to child position `new_index`.
    ///
    /// Returns false if the handle is stale or the index is past the end.
    pub fn move_to(&mut self, id: ItemId, new_index: usize) -> bool {
        let Some(current) = self.index_of(id) else {
            return false;
        };
        if new_index >= self.order.len() {
            return false;
        }
        let id = self.order.remove(current);
        self.order.insert(new_index, id);
        true
    }

    /// Child position of `id`.
    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        if !self.is_alive(id) {
            return None;
        }
        self.order.iter().position(|&other| other == id)
    }

    /// Handles in child order.
    pub fn children(&self) -> &[ItemId] {
        &self.order
    }

    /// Items in child order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &Item<T>)> + '_ {
        self.order.iter().filter_map(|&id| self.get(id).map(|item| (id, item)))
    }

    /// Item for `id`, if live.
    pub fn get(&self, id: ItemId) -> Option<&Item<T>> {
        if !self.is_alive(id) {
            return None;
        }
        self.slots[id.idx()].as_ref()
    }

    /// Mutable item for `id`, if live.
    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut Item<T>> {
        if !self.is_alive(id) {
            return None;
        }
        self.slots[id.idx()].as_mut()
    }

    /// Returns true if `id` refers to a live item.
    pub fn is_alive(&self, id: ItemId) -> bool {
        self.slots.get(id.idx()).is_some_and(|slot| slot.is_some())
            && self.generations.get(id.idx()) == Some(&id.generation())
    }

    /// Number of children, gone ones included.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if there are no children.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of children that take part in layout.
    pub fn not_gone_count(&self) -> usize {
        self.iter().filter(|(_, item)| !item.gone).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live() -> LiveProperties {
        LiveProperties::with_height(100.0)
    }

    #[test]
    fn liveness_insert_remove_reuse() {
        let mut list = ItemList::new();
        let a = list.push(1.0, live());
        let b = list.push(2.0, live());
        assert!(list.is_alive(a) && list.is_alive(b));

        let removed = list.remove(a).map(|item| item.content);
        assert_eq!(removed, Some(1.0));
        assert!(!list.is_alive(a), "removed handle is stale");
        assert!(list.remove(a).is_none(), "double remove is a no-op");

        let c = list.push(3.0, live());
        assert_eq!(c.idx(), a.idx(), "freed slot is reused");
        assert_ne!(c, a, "reuse bumps the generation");
        assert!(list.get(a).is_none());
        assert_eq!(list.children(), &[b, c]);
    }

    #[test]
    fn insert_and_move_keep_order() {
        let mut list = ItemList::new();
        let a = list.push(1.0, live());
        let b = list.push(2.0, live());
        let c = list.insert(0, 3.0, live());
        assert_eq!(list.children(), &[c, a, b]);

        assert!(list.move_to(c, 2));
        assert_eq!(list.children(), &[a, b, c]);
        assert!(!list.move_to(c, 3), "index past the end is rejected");
        assert_eq!(list.index_of(b), Some(1));
    }

    #[test]
    fn insert_index_is_clamped() {
        let mut list = ItemList::new();
        let a = list.insert(10, 1.0, live());
        let b = list.insert(10, 2.0, live());
        assert_eq!(list.children(), &[a, b]);
    }

    #[test]
    fn gone_items_are_counted_apart() {
        let mut list = ItemList::new();
        let a = list.push(1.0, live());
        list.push(2.0, live());
        list.get_mut(a).unwrap().gone = true;
        assert_eq!(list.len(), 2);
        assert_eq!(list.not_gone_count(), 1);
    }
}
