// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-item layout targets and the delta apply step.

use crate::item::{ItemId, ItemList, LayerHint, Visibility};

/// The computed, not yet applied, target for one item.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewState {
    /// Vertical offset from the top of the stack.
    pub y_translation: f64,
    /// Height.
    pub height: f64,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
    /// Uniform scale.
    pub scale: f64,
    /// Pixels to clip at the top, at most `height`.
    pub clip_top_amount: f64,
    /// How far the previous item reaches into this one.
    pub top_overlap: f64,
    /// Dense index over non-gone items, `-1` for gone items.
    pub not_gone_index: i32,
    /// Excluded from layout; other fields are meaningless.
    pub gone: bool,
}

impl ViewState {
    fn seeded(height: f64, gone: bool) -> Self {
        Self {
            y_translation: 0.0,
            height,
            alpha: 1.0,
            scale: 1.0,
            clip_top_amount: 0.0,
            top_overlap: 0.0,
            not_gone_index: -1,
            gone,
        }
    }
}

/// Counts from one [`ViewStateStore::apply`] call.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Individual property writes performed.
    pub writes: usize,
    /// Items skipped because they had no stored state.
    pub skipped: usize,
}

/// One [`ViewState`] per live item, keyed by handle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewStateStore {
    // Indexed by slot; the generation guards against stale handles.
    states: Vec<Option<(u32, ViewState)>>,
}

impl ViewStateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed one entry per child from its live values: full alpha, scale 1, the
    /// live height, no index. Existing entries are overwritten.
    pub fn reset<T>(&mut self, items: &ItemList<T>) {
        for (id, item) in items.iter() {
            let seeded = ViewState::seeded(item.live.height, item.gone);
            let idx = id.idx();
            if self.states.len() <= idx {
                self.states.resize(idx + 1, None);
            }
            self.states[idx] = Some((id.generation(), seeded));
        }
    }

    /// State for `id`.
    pub fn get(&self, id: ItemId) -> Option<&ViewState> {
        match self.states.get(id.idx()) {
            Some(Some((generation, state))) if *generation == id.generation() => Some(state),
            _ => None,
        }
    }

    /// Mutable state for `id`.
    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut ViewState> {
        match self.states.get_mut(id.idx()) {
            Some(Some((generation, state))) if *generation == id.generation() => Some(state),
            _ => None,
        }
    }

    /// Drop the entry for an item leaving the collection.
    pub fn remove(&mut self, id: ItemId) -> Option<ViewState> {
        let slot = self.states.get_mut(id.idx())?;
        if slot
            .as_ref()
            .is_some_and(|(generation, _)| *generation == id.generation())
        {
            slot.take().map(|(_, state)| state)
        } else {
            None
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.states.iter().filter(|s| s.is_some()).count()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Push every changed property of every non-gone child to its live values.
    ///
    /// Unchanged properties are never written, so a second call with no layout
    /// in between performs no writes.
    ///
    /// Alpha is only touched while the item is not mid-swipe. The layer hint
    /// is updated before alpha: offscreen while partially transparent, none at
    /// 0 or 1. A target alpha of 0 hides the item instead of writing the alpha.
    pub fn apply<T>(&self, items: &mut ItemList<T>) -> ApplyReport {
        let mut report = ApplyReport::default();
        let children: Vec<ItemId> = items.children().to_vec();
        for id in children {
            let Some(item) = items.get_mut(id) else {
                continue;
            };
            let Some(state) = self.get(id) else {
                log::error!("no view state for {id:?} while applying; skipping");
                report.skipped += 1;
                continue;
            };
            if state.gone {
                continue;
            }
            let live = &mut item.live;
            let new_alpha = state.alpha;
            let becomes_invisible = new_alpha == 0.0;
            if live.alpha != new_alpha && live.translation_x == 0.0 {
                let becomes_opaque = new_alpha == 1.0;
                let layer = if !becomes_invisible && !becomes_opaque {
                    LayerHint::Offscreen
                } else {
                    LayerHint::None
                };
                if live.layer != layer {
                    live.layer = layer;
                    report.writes += 1;
                }
                if !becomes_invisible {
                    live.alpha = new_alpha;
                    report.writes += 1;
                }
            }

            let visibility = if becomes_invisible {
                Visibility::Hidden
            } else {
                Visibility::Visible
            };
            if live.visibility != visibility {
                live.visibility = visibility;
                report.writes += 1;
            }
            if live.translation_y != state.y_translation {
                live.translation_y = state.y_translation;
                report.writes += 1;
            }
            if live.scale != state.scale {
                live.scale = state.scale;
                report.writes += 1;
            }
            if live.height != state.height {
                live.height = state.height;
                report.writes += 1;
            }
            if live.clip_top_amount != state.clip_top_amount {
                live.clip_top_amount = state.clip_top_amount;
                report.writes += 1;
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::LiveProperties;

    fn list(n: usize) -> (ItemList<f64>, Vec<ItemId>) {
        let mut items = ItemList::new();
        let ids = (0..n)
            .map(|_| items.push(100.0, LiveProperties::with_height(100.0)))
            .collect();
        (items, ids)
    }

    #[test]
    fn reset_seeds_defaults() {
        let (mut items, ids) = list(2);
        items.get_mut(ids[1]).unwrap().gone = true;
        items.get_mut(ids[0]).unwrap().live.alpha = 0.3;
        let mut store = ViewStateStore::new();
        store.reset(&items);
        let s = store.get(ids[0]).unwrap();
        assert_eq!((s.alpha, s.scale, s.height), (1.0, 1.0, 100.0));
        assert_eq!(s.not_gone_index, -1);
        assert!(store.get(ids[1]).unwrap().gone);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn apply_twice_is_idempotent() {
        let (mut items, ids) = list(3);
        let mut store = ViewStateStore::new();
        store.reset(&items);
        for (i, id) in ids.iter().enumerate() {
            let s = store.get_mut(*id).unwrap();
            s.y_translation = 110.0 * i as f64;
            s.alpha = [1.0, 0.6, 0.0][i];
        }
        let first = store.apply(&mut items);
        assert!(first.writes > 0);
        let second = store.apply(&mut items);
        assert_eq!(second.writes, 0, "second apply must not write anything");
    }

    #[test]
    fn partial_alpha_promotes_layer_first() {
        let (mut items, ids) = list(1);
        let mut store = ViewStateStore::new();
        store.reset(&items);
        store.get_mut(ids[0]).unwrap().alpha = 0.5;
        store.apply(&mut items);
        let live = items.get(ids[0]).unwrap().live;
        assert_eq!(live.layer, LayerHint::Offscreen);
        assert_eq!(live.alpha, 0.5);

        store.get_mut(ids[0]).unwrap().alpha = 1.0;
        store.apply(&mut items);
        let live = items.get(ids[0]).unwrap().live;
        assert_eq!(live.layer, LayerHint::None, "demoted at full opacity");
    }

    #[test]
    fn zero_alpha_hides_without_writing_alpha() {
        let (mut items, ids) = list(1);
        let mut store = ViewStateStore::new();
        store.reset(&items);
        store.get_mut(ids[0]).unwrap().alpha = 0.0;
        store.apply(&mut items);
        let live = items.get(ids[0]).unwrap().live;
        assert_eq!(live.visibility, Visibility::Hidden);
        assert_eq!(live.alpha, 1.0);
    }

    #[test]
    fn swiped_item_keeps_alpha() {
        let (mut items, ids) = list(1);
        items.get_mut(ids[0]).unwrap().live.translation_x = 40.0;
        let mut store = ViewStateStore::new();
        store.reset(&items);
        store.get_mut(ids[0]).unwrap().alpha = 0.6;
        store.apply(&mut items);
        assert_eq!(items.get(ids[0]).unwrap().live.alpha, 1.0);
    }

    #[test]
    fn missing_state_is_skipped() {
        let (mut items, ids) = list(2);
        let mut store = ViewStateStore::new();
        store.reset(&items);
        store.remove(ids[0]);
        store.get_mut(ids[1]).unwrap().y_translation = 50.0;
        let report = store.apply(&mut items);
        assert_eq!(report.skipped, 1);
        assert_eq!(items.get(ids[1]).unwrap().live.translation_y, 50.0);
    }

    #[test]
    fn stale_handle_does_not_alias() {
        let (mut items, ids) = list(1);
        let mut store = ViewStateStore::new();
        store.reset(&items);
        items.remove(ids[0]);
        let fresh = items.push(1.0, LiveProperties::with_height(1.0));
        assert!(store.get(fresh).is_none(), "old entry belongs to the old generation");
        assert!(store.remove(fresh).is_none());
        assert!(store.remove(ids[0]).is_some());
    }
}
