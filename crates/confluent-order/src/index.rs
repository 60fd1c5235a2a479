use std::collections::HashMap;

use crate::config::LabelingConfig;
use crate::event::{Event, EventNode, Role};
use crate::labeling::Relabel;
use crate::{OrderError, Result};

pub type VersionId = usize;

/// The version every index starts with.
pub const ROOT_VERSION: VersionId = 0;

const INITIAL_UNIVERSE: u64 = 2;

/// Arena positions of a version's two brackets.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Brackets {
    pub(crate) begin: usize,
    pub(crate) end: usize,
}

/// Order-maintenance index over a tree of versions.
///
/// The tree is stored as a bracket sequence: a version's Begin event precedes
/// the brackets of all of its descendants and its End event follows them.
/// Every event carries a label in `[0, universe)` that increases along the
/// sequence, so ancestry is a containment test on two label pairs.
#[derive(Debug, Clone)]
pub struct VersionOrderIndex {
    pub(crate) config: LabelingConfig,
    pub(crate) nodes: Vec<EventNode>,
    pub(crate) head: Option<usize>,
    pub(crate) brackets: HashMap<VersionId, Brackets>,
    pub(crate) universe: u64,
}

impl VersionOrderIndex {
    pub fn new() -> Self {
        Self::seeded(LabelingConfig::default())
    }

    pub fn with_config(config: LabelingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::seeded(config))
    }

    fn seeded(config: LabelingConfig) -> Self {
        let mut index = Self {
            config,
            nodes: Vec::new(),
            head: None,
            brackets: HashMap::new(),
            universe: INITIAL_UNIVERSE,
        };
        index.seed_root();
        index
    }

    fn seed_root(&mut self) {
        self.nodes = vec![
            EventNode {
                event: Event::begin(ROOT_VERSION),
                label: 0,
                prev: None,
                next: Some(1),
            },
            EventNode {
                event: Event::end(ROOT_VERSION),
                label: INITIAL_UNIVERSE - 1,
                prev: Some(0),
                next: None,
            },
        ];
        self.head = Some(0);
        self.universe = INITIAL_UNIVERSE;
        self.brackets.clear();
        self.brackets
            .insert(ROOT_VERSION, Brackets { begin: 0, end: 1 });
    }

    pub fn config(&self) -> &LabelingConfig {
        &self.config
    }

    /// Register `version` as the new first child of `parent`.
    ///
    /// The version's brackets go right after the parent's Begin event, so
    /// siblings are ordered most-recent-first. On error nothing is inserted.
    pub fn insert(&mut self, version: VersionId, parent: VersionId) -> Result<()> {
        self.link_version(version, parent).map(|_| ())
    }

    /// Insert `version` under `parent` and report the relabel, if any, that
    /// each of its two events needed.
    pub(crate) fn link_version(
        &mut self,
        version: VersionId,
        parent: VersionId,
    ) -> Result<[Option<Relabel>; 2]> {
        if self.head.is_none() {
            return Err(OrderError::EmptyIndex);
        }
        let parent_begin = self
            .brackets
            .get(&parent)
            .ok_or(OrderError::UnknownParent(parent))?
            .begin;
        if self.brackets.contains_key(&version) {
            return Err(OrderError::DuplicateVersion(version));
        }

        let (begin, begin_relabel) = self.insert_after(parent_begin, Event::begin(version))?;
        let (end, end_relabel) = match self.insert_after(begin, Event::end(version)) {
            Ok(linked) => linked,
            Err(err) => {
                self.unlink_last();
                return Err(err);
            }
        };
        self.brackets.insert(version, Brackets { begin, end });
        Ok([begin_relabel, end_relabel])
    }

    /// Link a new event right after `prev` and give it a label.
    fn insert_after(&mut self, prev: usize, event: Event) -> Result<(usize, Option<Relabel>)> {
        // A Begin event is always followed, at the latest, by its own End.
        let next = self.nodes[prev].next.ok_or(OrderError::EmptyIndex)?;
        let (low, high) = (self.nodes[prev].label, self.nodes[next].label);

        let id = self.nodes.len();
        self.nodes.push(EventNode {
            event,
            label: low,
            prev: Some(prev),
            next: Some(next),
        });
        self.nodes[prev].next = Some(id);
        self.nodes[next].prev = Some(id);

        if high - low >= 2 {
            self.nodes[id].label = low + (high - low) / 2;
            return Ok((id, None));
        }
        match self.make_room(id) {
            Ok(relabel) => {
                if let Relabel::Range {
                    start,
                    size,
                    occupied,
                } = relabel
                {
                    tracing::debug!(start, size, occupied, "relabeled label range");
                }
                Ok((id, Some(relabel)))
            }
            Err(err) => {
                self.unlink_last();
                Err(err)
            }
        }
    }

    /// Detach and drop the most recently pushed event.
    fn unlink_last(&mut self) {
        let Some(node) = self.nodes.pop() else {
            return;
        };
        if let Some(prev) = node.prev {
            self.nodes[prev].next = node.next;
        }
        if let Some(next) = node.next {
            self.nodes[next].prev = node.prev;
        }
    }

    /// True iff `ancestor` is `descendant` or one of its ancestors.
    pub fn order(&self, ancestor: VersionId, descendant: VersionId) -> Result<bool> {
        let (a_begin, a_end) = self.labels_of(ancestor)?;
        let (d_begin, d_end) = self.labels_of(descendant)?;
        Ok(a_begin <= d_begin && d_end <= a_end)
    }

    /// Current Begin and End labels of `version`.
    pub fn labels_of(&self, version: VersionId) -> Result<(u64, u64)> {
        let brackets = self
            .brackets
            .get(&version)
            .ok_or(OrderError::UnknownVersion(version))?;
        Ok((
            self.nodes[brackets.begin].label,
            self.nodes[brackets.end].label,
        ))
    }

    pub fn contains(&self, version: VersionId) -> bool {
        self.brackets.contains_key(&version)
    }

    /// True when only the root version is tracked.
    pub fn is_empty(&self) -> bool {
        self.brackets.len() <= 1
    }

    /// Number of tracked versions, the root included.
    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    pub fn universe(&self) -> u64 {
        self.universe
    }

    pub fn versions(&self) -> impl Iterator<Item = VersionId> + '_ {
        self.brackets.keys().copied()
    }

    /// Events with their labels, in sequence order.
    pub fn events(&self) -> impl Iterator<Item = (Event, u64)> + '_ {
        std::iter::successors(self.head, move |&id| self.nodes[id].next)
            .map(move |id| (self.nodes[id].event, self.nodes[id].label))
    }

    /// Reset to the single root version.
    pub fn clear(&mut self) {
        self.seed_root();
    }

    /// Verify labels, bracket nesting and bookkeeping. Returns a description
    /// of the first violation found.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        if !self.universe.is_power_of_two() || self.universe < INITIAL_UNIVERSE {
            return Err(format!("universe {} is not a power of two", self.universe));
        }
        let mut open: Vec<VersionId> = Vec::new();
        let mut last_label: Option<u64> = None;
        let mut count = 0usize;
        for (event, label) in self.events() {
            count += 1;
            if label >= self.universe {
                return Err(format!("{event} has label {label} outside the universe"));
            }
            if last_label.is_some_and(|last| last >= label) {
                return Err(format!("{event} has non-increasing label {label}"));
            }
            last_label = Some(label);
            match event.role {
                Role::Begin => {
                    if count > 1 && open.is_empty() {
                        return Err(format!("{event} opens outside the root bracket"));
                    }
                    open.push(event.version);
                }
                Role::End => {
                    if open.pop() != Some(event.version) {
                        return Err(format!("{event} closes an unopened bracket"));
                    }
                }
            }
        }
        if !open.is_empty() {
            return Err(format!("unclosed brackets: {open:?}"));
        }
        if count != self.nodes.len() || count != self.brackets.len() * 2 {
            return Err(format!(
                "sequence has {count} events for {} versions",
                self.brackets.len()
            ));
        }
        for (&version, brackets) in &self.brackets {
            if self.nodes[brackets.begin].event != Event::begin(version)
                || self.nodes[brackets.end].event != Event::end(version)
            {
                return Err(format!("bracket map is stale for version {version}"));
            }
        }
        Ok(())
    }
}

impl Default for VersionOrderIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for VersionOrderIndex {
    fn eq(&self, other: &Self) -> bool {
        self.universe == other.universe
            && self.config == other.config
            && self.events().eq(other.events())
    }
}
