use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::{
    error::{Error, Result},
    types::{BasketId, Identifier, ItemId},
};

pub mod tidset;

use tidset::{intersection_len, Tidset};

/// Read-only view of a transaction set.
///
/// Holds the basket -> items mapping and the derived item -> baskets mapping.
/// Items are interned to ids assigned in item order; baskets to ids assigned
/// in first-seen order. Each item's baskets are kept as a [`Tidset`], so that
/// support counting is a tidset intersection and memory follows the number of
/// pairs rather than items times baskets.
#[derive(Debug, Clone)]
pub struct TransactionIndex<B, I> {
    baskets: Vec<B>,
    basket_lookup: HashMap<B, BasketId>,
    inventory: Vec<I>,
    reverse_lookup: HashMap<I, ItemId>,
    transactions: Vec<Vec<ItemId>>,
    tidsets: Vec<Tidset>,
}

impl<B: Identifier, I: Identifier> TransactionIndex<B, I> {
    /// Build the index from `(basket, item)` pairs. Duplicate pairs collapse.
    pub fn from_pairs<T>(pairs: T) -> Result<Self>
    where
        T: IntoIterator<Item = (B, I)>,
    {
        let mut baskets: Vec<B> = Vec::new();
        let mut basket_lookup: HashMap<B, BasketId> = HashMap::new();
        let mut raw_transactions: Vec<Vec<I>> = Vec::new();
        let mut unique_items: BTreeSet<I> = BTreeSet::new();

        for (position, (basket, item)) in pairs.into_iter().enumerate() {
            if basket.is_blank() {
                return Err(Error::invalid_input(position, "empty basket identifier"));
            }
            if item.is_blank() {
                return Err(Error::invalid_input(position, "empty item identifier"));
            }

            let basket_id = match basket_lookup.get(&basket) {
                Some(&id) => id,
                None => {
                    let id = baskets.len();
                    basket_lookup.insert(basket.clone(), id);
                    baskets.push(basket);
                    raw_transactions.push(Vec::new());
                    id
                }
            };

            if !unique_items.contains(&item) {
                unique_items.insert(item.clone());
            }
            raw_transactions[basket_id].push(item);
        }

        let inventory: Vec<I> = unique_items.into_iter().collect();
        let mut reverse_lookup: HashMap<I, ItemId> = HashMap::with_capacity(inventory.len());
        for (item_id, item) in inventory.iter().enumerate() {
            reverse_lookup.insert(item.clone(), item_id);
        }

        let mut members: Vec<Vec<BasketId>> = vec![Vec::new(); inventory.len()];

        let transactions: Vec<Vec<ItemId>> = raw_transactions
            .into_iter()
            .enumerate()
            .map(|(basket_id, raw_transaction)| {
                let mut items: Vec<ItemId> = raw_transaction
                    .iter()
                    .filter_map(|item| reverse_lookup.get(item).copied())
                    .collect();
                items.sort_unstable();
                items.dedup();
                for &item_id in &items {
                    members[item_id].push(basket_id);
                }
                items
            })
            .collect();

        let tidsets: Vec<Tidset> = members
            .into_iter()
            .map(|basket_ids| Tidset::from_sorted(basket_ids, baskets.len()))
            .collect();

        debug!(
            baskets = baskets.len(),
            items = inventory.len(),
            dense = tidsets.iter().filter(|tidset| tidset.is_dense()).count(),
            "built transaction index"
        );

        Ok(Self {
            baskets,
            basket_lookup,
            inventory,
            reverse_lookup,
            transactions,
            tidsets,
        })
    }

    /// Support denominator.
    pub fn num_baskets(&self) -> usize {
        self.baskets.len()
    }

    pub fn num_items(&self) -> usize {
        self.inventory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.baskets.is_empty()
    }

    /// All distinct items, sorted. The position of an item is its id.
    pub fn items(&self) -> &[I] {
        &self.inventory
    }

    /// All baskets in first-seen order. The position of a basket is its id.
    pub fn baskets(&self) -> &[B] {
        &self.baskets
    }

    pub fn item(&self, item_id: ItemId) -> Option<&I> {
        self.inventory.get(item_id)
    }

    pub fn item_id(&self, item: &I) -> Option<ItemId> {
        self.reverse_lookup.get(item).copied()
    }

    /// Items of `basket`, sorted, or `None` for an unknown basket.
    pub fn basket_items<'a>(&'a self, basket: &B) -> Option<impl Iterator<Item = &'a I> + 'a> {
        let basket_id = *self.basket_lookup.get(basket)?;
        Some(
            self.transactions[basket_id]
                .iter()
                .map(move |&item_id| &self.inventory[item_id]),
        )
    }

    /// Baskets containing `item`, in basket id order, or `None` for an unknown item.
    pub fn baskets_containing<'a>(
        &'a self,
        item: &I,
    ) -> Option<impl Iterator<Item = &'a B> + 'a> {
        let item_id = self.item_id(item)?;
        Some(
            self.tidsets[item_id]
                .iter()
                .map(move |basket_id| &self.baskets[basket_id]),
        )
    }

    pub fn tidset(&self, item_id: ItemId) -> Option<&Tidset> {
        self.tidsets.get(item_id)
    }

    /// Bytes held by all tidsets.
    pub fn tidset_bytes(&self) -> usize {
        self.tidsets.iter().map(Tidset::heap_bytes).sum()
    }

    /// Number of baskets containing `item_id`.
    pub fn item_count(&self, item_id: ItemId) -> usize {
        self.tidset(item_id).map_or(0, Tidset::len)
    }

    /// Number of baskets containing every item of `pattern`.
    ///
    /// Walks the baskets of the rarest item and probes the tidsets of the rest.
    /// An empty pattern is contained in every basket. Unknown ids count zero.
    pub fn support_count(&self, pattern: &[ItemId]) -> usize {
        if pattern.is_empty() {
            return self.num_baskets();
        }
        let tidsets: Option<Vec<&Tidset>> =
            pattern.iter().map(|&item_id| self.tidset(item_id)).collect();
        tidsets.map_or(0, intersection_len)
    }

    /// Fraction of baskets containing every item of `pattern`. Zero for an empty index.
    pub fn support(&self, pattern: &[ItemId]) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.support_count(pattern) as f64 / self.num_baskets() as f64
    }
}
