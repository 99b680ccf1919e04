//! Inheritance Resolver.
//!
//! Ancestors are listed breadth-first: every direct parent (in declared
//! order) before any grandparent. A visited set makes diamonds and cycles
//! harmless, and the starting interface never appears in its own list.

use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use tracing::trace;

use webir_common::{ExtendsMap, Ir, MemberEntry};

#[derive(Debug, Clone, Copy)]
pub struct InheritanceResolver<'a> {
    extends: &'a ExtendsMap,
}

impl<'a> InheritanceResolver<'a> {
    pub fn new(extends: &'a ExtendsMap) -> Self {
        InheritanceResolver { extends }
    }

    /// Transitive parents of `name`, nearest generation first.
    pub fn ancestors(&self, name: &str) -> Vec<String> {
        let mut visited: FxHashSet<&str> = FxHashSet::default();
        visited.insert(name);

        let mut ancestors = Vec::new();
        let mut queue: VecDeque<&str> = self
            .extends
            .parents(name)
            .iter()
            .map(String::as_str)
            .collect();
        while let Some(next) = queue.pop_front() {
            if !visited.insert(next) {
                continue;
            }
            ancestors.push(next.to_string());
            queue.extend(self.extends.parents(next).iter().map(String::as_str));
        }
        ancestors
    }

    /// Own entries followed by inherited ones, one entry per member name.
    ///
    /// Own entries win over inherited ones, the first own overload wins, and
    /// among ancestors the one listed first by [`Self::ancestors`] wins.
    pub fn merged_entries<'ir>(&self, name: &str, ir: &'ir Ir) -> Vec<&'ir MemberEntry> {
        let mut seen: FxHashSet<&'ir str> = FxHashSet::default();
        let mut merged = Vec::new();

        let mut register = |entry: &'ir MemberEntry, merged: &mut Vec<&'ir MemberEntry>| {
            if seen.insert(entry.name()) {
                merged.push(entry);
            } else {
                trace!(
                    interface = name,
                    member = entry.name(),
                    from = entry.interface(),
                    "member already provided, skipped"
                );
            }
        };

        for entry in ir.members(name) {
            register(entry, &mut merged);
        }
        for ancestor in self.ancestors(name) {
            for entry in ir.members(&ancestor) {
                register(entry, &mut merged);
            }
        }
        merged
    }
}
