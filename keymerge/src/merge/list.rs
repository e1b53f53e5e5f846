//! List merging by primary key.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde_json::Value;
use tracing::{debug, instrument, trace};

use super::MergeRun;
use super::dedup::dedup;
use super::marker::is_marked;
use crate::error::{KeymergeError, KeymergeResult, PathSegment};
use crate::key::{ItemKey, KeyLookup, KeyStrategy};
use crate::options::{DupeMode, ScalarMode};
use crate::rules::FieldRules;

/// Result list under construction.
///
/// Deleted items leave a `None` slot so indexed positions stay valid until
/// the list is compacted.
struct KeyedList {
    slots: Vec<Option<Value>>,
    index: HashMap<ItemKey, usize>,
}

impl KeyedList {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    fn push(&mut self, item: Value) -> usize {
        self.slots.push(Some(item));
        self.slots.len() - 1
    }

    fn push_keyed(&mut self, key: ItemKey, item: Value) {
        let slot = self.push(item);
        self.index.insert(key, slot);
    }

    fn remove(&mut self, key: &ItemKey) -> bool {
        let Some(slot) = self.index.remove(key) else {
            return false;
        };
        if let Some(item) = self.slots.get_mut(slot) {
            *item = None;
        }
        true
    }

    fn into_items(self) -> Vec<Value> {
        self.slots.into_iter().flatten().collect()
    }
}

impl<'m> MergeRun<'m> {
    #[instrument(level = "trace", skip_all, fields(base = base.len(), overlay = overlay.len()))]
    pub(super) fn merge_lists(
        &mut self,
        base: Vec<Value>,
        overlay: Vec<Value>,
        rules: Option<&'m FieldRules>,
    ) -> KeymergeResult<Vec<Value>> {
        if overlay.is_empty() {
            return Ok(base);
        }
        let options = self.options;
        let declared = rules.map(FieldRules::primary_keys).unwrap_or_default();
        let Some(strategy) =
            KeyStrategy::discover(&overlay, declared, options.primary_key_names())
        else {
            let mode = rules
                .and_then(FieldRules::scalar_mode)
                .unwrap_or(options.scalar_mode());
            trace!(%mode, "merging keyless list");
            return Ok(merge_keyless(mode, base, overlay));
        };

        let dupe_mode = rules
            .and_then(FieldRules::dupe_mode)
            .unwrap_or(options.dupe_mode());
        debug!(key = ?strategy.fields(), %dupe_mode, "merging keyed list");

        let mut list = KeyedList::with_capacity(base.len() + overlay.len());
        for (position, item) in base.into_iter().enumerate() {
            self.index_base_item(&mut list, strategy, dupe_mode, position, item, rules)?;
        }
        if dupe_mode == DupeMode::Unique {
            self.check_overlay_unique(&overlay, strategy)?;
        }
        for (position, item) in overlay.into_iter().enumerate() {
            self.apply_overlay_item(&mut list, strategy, position, item, rules)?;
        }
        Ok(list.into_items())
    }

    fn index_base_item(
        &mut self,
        list: &mut KeyedList,
        strategy: KeyStrategy<'_>,
        dupe_mode: DupeMode,
        position: usize,
        item: Value,
        rules: Option<&'m FieldRules>,
    ) -> KeymergeResult<()> {
        let Some(key) = self.item_key(strategy, &item, position)? else {
            list.push(item);
            return Ok(());
        };
        let Some(&existing) = list.index.get(&key) else {
            list.push_keyed(key, item);
            return Ok(());
        };
        match dupe_mode {
            DupeMode::Unique => Err(self.duplicate(key, existing, position)),
            DupeMode::Consolidate => {
                trace!(%key, existing, position, "consolidating duplicate item");
                self.merge_into_slot(list, existing, item, rules)
            }
        }
    }

    /// Reject duplicate keys within `overlay`, ignoring deletion requests.
    fn check_overlay_unique(
        &self,
        overlay: &[Value],
        strategy: KeyStrategy<'_>,
    ) -> KeymergeResult<()> {
        let marker = self.options.delete_marker();
        let mut seen = HashMap::with_capacity(overlay.len());
        for (position, item) in overlay.iter().enumerate() {
            if is_marked(item, marker) {
                continue;
            }
            let Some(key) = self.item_key(strategy, item, position)? else {
                continue;
            };
            match seen.entry(key) {
                Entry::Occupied(entry) => {
                    let (repeated, first) = entry.remove_entry();
                    return Err(self.duplicate(repeated, first, position));
                }
                Entry::Vacant(entry) => {
                    entry.insert(position);
                }
            }
        }
        Ok(())
    }

    fn apply_overlay_item(
        &mut self,
        list: &mut KeyedList,
        strategy: KeyStrategy<'_>,
        position: usize,
        item: Value,
        rules: Option<&'m FieldRules>,
    ) -> KeymergeResult<()> {
        let lookup = self.item_key(strategy, &item, position)?;
        if is_marked(&item, self.options.delete_marker()) {
            if let Some(key) = lookup {
                if list.remove(&key) {
                    debug!(%key, "deleted list item");
                } else {
                    trace!(%key, "no item to delete");
                }
            }
            return Ok(());
        }
        match lookup {
            None => {
                list.push(item);
                Ok(())
            }
            Some(key) => match list.index.get(&key) {
                Some(&slot) => self.merge_into_slot(list, slot, item, rules),
                None => {
                    list.push_keyed(key, item);
                    Ok(())
                }
            },
        }
    }

    /// Merge `item` into the value at `slot`, reporting nested errors under
    /// that slot's position.
    fn merge_into_slot(
        &mut self,
        list: &mut KeyedList,
        slot: usize,
        item: Value,
        rules: Option<&'m FieldRules>,
    ) -> KeymergeResult<()> {
        let Some(target) = list.slots.get_mut(slot) else {
            return Ok(());
        };
        let existing = target.take().unwrap_or(Value::Null);
        let merged = self.descend(PathSegment::Index(slot), |run| {
            run.merge_values(existing, item, rules)
        })?;
        *target = Some(merged);
        Ok(())
    }

    fn item_key(
        &self,
        strategy: KeyStrategy<'_>,
        item: &Value,
        position: usize,
    ) -> KeymergeResult<Option<ItemKey>> {
        match strategy.extract(item) {
            KeyLookup::Missing => Ok(None),
            KeyLookup::Found(key) => Ok(Some(key)),
            KeyLookup::NonComparable(key) => Err(KeymergeError::NonComparableKey {
                key,
                position,
                path: self.ctx.snapshot_with(PathSegment::Index(position)),
                doc_index: self.ctx.doc_index(),
            }),
        }
    }

    fn duplicate(&self, key: ItemKey, first: usize, position: usize) -> KeymergeError {
        KeymergeError::DuplicateKey {
            key,
            positions: [first, position],
            path: self.ctx.snapshot_with(PathSegment::Index(position)),
            doc_index: self.ctx.doc_index(),
        }
    }
}

fn merge_keyless(mode: ScalarMode, mut base: Vec<Value>, overlay: Vec<Value>) -> Vec<Value> {
    match mode {
        ScalarMode::Concat => {
            base.extend(overlay);
            base
        }
        ScalarMode::Dedup => dedup(base, overlay),
        ScalarMode::Replace => overlay,
    }
}
