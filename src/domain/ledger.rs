use std::collections::HashSet;

use super::{Cents, Entry, EntryId};

/// The ordered collection of entries. Insertion order is display order and
/// every id is distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    entries: Vec<Entry>,
    next_id: EntryId,
}

/// Result of rebuilding a ledger from previously stored entries.
#[derive(Debug, Clone)]
pub struct Restored {
    pub ledger: Ledger,
    /// Number of entries that were given a fresh id because theirs was taken
    pub reassigned: usize,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// Rebuild a ledger from stored entries, keeping their order.
    ///
    /// The first entry carrying a given id keeps it; later duplicates are
    /// re-keyed from the counter, which starts past the largest stored id.
    pub fn restore(entries: Vec<Entry>) -> Restored {
        let max_id = entries.iter().map(|e| e.id).max().unwrap_or(0);
        let mut ledger = Self {
            entries,
            next_id: max_id.saturating_add(1).max(1),
        };

        // Every stored id is already in `entries`, so a fresh id can never
        // collide with one that has not been visited yet
        let mut seen = HashSet::with_capacity(ledger.entries.len());
        let mut reassigned = 0;
        for index in 0..ledger.entries.len() {
            if !seen.insert(ledger.entries[index].id) {
                let id = ledger.allocate_id();
                ledger.entries[index].id = id;
                seen.insert(id);
                reassigned += 1;
            }
        }

        Restored { ledger, reassigned }
    }

    /// Append a new entry with a fresh id and return a copy of it.
    pub fn add(&mut self, text: impl Into<String>, amount_cents: Cents) -> Entry {
        let entry = Entry::new(self.allocate_id(), text, amount_cents);
        self.entries.push(entry.clone());
        entry
    }

    /// Remove the entry with the given id. Unknown ids leave the ledger untouched.
    pub fn remove(&mut self, id: EntryId) -> Option<Entry> {
        let position = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(position))
    }

    /// Append copies of `entries`, each under a fresh id.
    pub fn extend_fresh(&mut self, entries: impl IntoIterator<Item = Entry>) -> Vec<Entry> {
        entries
            .into_iter()
            .map(|e| self.add(e.text, e.amount_cents))
            .collect()
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The id the next added entry will receive.
    pub fn next_id(&self) -> EntryId {
        self.next_id
    }

    /// Take the next id from the counter. Once the counter reaches
    /// `EntryId::MAX` it stops moving and the lowest positive id not held by
    /// any entry is used instead.
    fn allocate_id(&mut self) -> EntryId {
        if let Some(following) = self.next_id.checked_add(1) {
            let id = self.next_id;
            self.next_id = following;
            return id;
        }

        let taken: HashSet<EntryId> = self.entries.iter().map(|e| e.id).collect();
        let mut id = 1;
        while taken.contains(&id) {
            id += 1;
        }
        id
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_assigns_increasing_ids() {
        let mut ledger = Ledger::new();
        let salary = ledger.add("Salary", 100000);
        let rent = ledger.add("Rent", -40000);

        assert_eq!(salary.id, 1);
        assert_eq!(rent.id, 2);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.entries()[0].text, "Salary");
        assert_eq!(ledger.entries()[1].text, "Rent");
    }

    #[test]
    fn test_ids_not_reused_after_remove() {
        let mut ledger = Ledger::new();
        ledger.add("A", 100);
        let b = ledger.add("B", 200);
        ledger.remove(b.id);

        let c = ledger.add("C", 300);
        assert_eq!(c.id, 3);
    }

    #[test]
    fn test_remove_returns_entry() {
        let mut ledger = Ledger::new();
        let entry = ledger.add("Coffee", -350);

        let removed = ledger.remove(entry.id);
        assert_eq!(removed, Some(entry));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut ledger = Ledger::new();
        ledger.add("Salary", 100000);
        let before = ledger.clone();

        assert_eq!(ledger.remove(999), None);
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_restore_keeps_order_and_continues_counter() {
        let restored = Ledger::restore(vec![
            Entry::new(412, "Salary", 100000),
            Entry::new(7, "Rent", -40000),
        ]);

        assert_eq!(restored.reassigned, 0);
        let mut ledger = restored.ledger;
        assert_eq!(ledger.entries()[0].id, 412);
        assert_eq!(ledger.entries()[1].id, 7);
        assert_eq!(ledger.next_id(), 413);
        assert_eq!(ledger.add("Bonus", 5000).id, 413);
    }

    #[test]
    fn test_restore_rekeys_duplicate_ids() {
        let restored = Ledger::restore(vec![
            Entry::new(5, "First", 100),
            Entry::new(5, "Second", 200),
            Entry::new(9, "Third", 300),
            Entry::new(5, "Fourth", 400),
        ]);

        assert_eq!(restored.reassigned, 2);
        let ids: Vec<EntryId> = restored.ledger.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![5, 10, 9, 11]);
        assert_eq!(restored.ledger.get(5).map(|e| e.text.as_str()), Some("First"));
    }

    #[test]
    fn test_restore_at_id_ceiling() {
        let restored = Ledger::restore(vec![
            Entry::new(EntryId::MAX, "Top", 100),
            Entry::new(EntryId::MAX, "Top again", 200),
            Entry::new(1, "One", 300),
        ]);

        assert_eq!(restored.reassigned, 1);
        let mut ledger = restored.ledger;
        let ids: Vec<EntryId> = ledger.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![EntryId::MAX, 2, 1]);

        assert_eq!(ledger.add("Next", 400).id, 3);
        assert_eq!(ledger.add("After", 500).id, 4);
        ledger.remove(1);
        assert_eq!(ledger.add("Refill", 600).id, 1);
        assert_eq!(ledger.next_id(), EntryId::MAX);
    }

    #[test]
    fn test_add_after_single_ceiling_id() {
        let mut ledger = Ledger::restore(vec![Entry::new(EntryId::MAX, "a", 1)]).ledger;
        let entry = ledger.add("b", 2);

        assert_eq!(entry.id, 1);
        assert_eq!(ledger.get(EntryId::MAX).map(|e| e.text.as_str()), Some("a"));
    }

    #[test]
    fn test_counter_hands_out_id_below_ceiling() {
        let mut ledger = Ledger::restore(vec![Entry::new(EntryId::MAX - 1, "a", 1)]).ledger;
        assert_eq!(ledger.next_id(), EntryId::MAX);

        // The counter cannot step past MAX, so MAX itself is never issued
        assert_eq!(ledger.add("b", 2).id, 1);
        assert_eq!(ledger.add("c", 3).id, 2);
    }

    #[test]
    fn test_restore_empty() {
        let restored = Ledger::restore(Vec::new());
        assert!(restored.ledger.is_empty());
        assert_eq!(restored.ledger.next_id(), 1);
    }

    #[test]
    fn test_extend_fresh_ignores_incoming_ids() {
        let mut ledger = Ledger::new();
        ledger.add("Existing", 100);

        let added = ledger.extend_fresh(vec![
            Entry::new(1, "Imported", 200),
            Entry::new(1, "Imported again", 300),
        ]);

        let ids: Vec<EntryId> = added.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(ledger.len(), 3);
    }
}
