//! Label maintenance for the event sequence.
//!
//! A fresh event normally takes the midpoint between its neighbours. When the
//! neighbours are adjacent, the smallest power-of-two aligned range around
//! the predecessor whose density stays under the threshold is respaced
//! evenly, the fresh event included. If no range short of the whole universe
//! qualifies, the universe doubles and every label is respaced. Doubling stops
//! at the largest power of two a label can hold; past that point the whole
//! sequence is respaced over the saturated universe instead.

use crate::index::VersionOrderIndex;
use crate::{OrderError, Result};

/// Largest universe whose labels still fit in a `u64`.
pub(crate) const MAX_UNIVERSE: u64 = 1 << 63;

/// How room was made for a fresh event whose neighbours were adjacent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Relabel {
    /// The aligned range `[start, start + size)` was respaced in place and
    /// now holds `occupied` events.
    Range {
        start: u64,
        size: u64,
        occupied: usize,
    },
    /// Every event was respaced over the whole universe.
    Universe,
}

impl VersionOrderIndex {
    /// Assign a label to the freshly linked event `fresh`, whose neighbours
    /// have consecutive labels. Labels are only rewritten once a valid layout
    /// is known, so an error leaves every existing label in place.
    pub(crate) fn make_room(&mut self, fresh: usize) -> Result<Relabel> {
        let Some(prev) = self.nodes[fresh].prev else {
            return Err(OrderError::EmptyIndex);
        };
        let low = self.nodes[prev].label;

        // Outermost events known to sit inside the candidate range. A range
        // that stops short of the successor still keeps every new label
        // below it.
        let mut left = prev;
        let mut right = fresh;
        // prev and the pending label.
        let mut occupied = 2usize;

        let mut size: u64 = 2;
        while size < self.universe {
            let start = low & !(size - 1);
            let end = start + size;
            while let Some(before) = self.nodes[left].prev {
                if self.nodes[before].label < start {
                    break;
                }
                left = before;
                occupied += 1;
            }
            while let Some(after) = self.nodes[right].next {
                if self.nodes[after].label >= end {
                    break;
                }
                right = after;
                occupied += 1;
            }
            if self.config.fits(occupied, size) {
                self.spread(left, occupied, start, size);
                return Ok(Relabel::Range {
                    start,
                    size,
                    occupied,
                });
            }
            size <<= 1;
        }

        let total = self.nodes.len();
        let mut universe = self.universe;
        while universe < MAX_UNIVERSE {
            universe <<= 1;
            if self.config.fits(total, universe) {
                break;
            }
        }
        if (total as u128) > universe as u128 {
            return Err(OrderError::LabelSpaceExhausted(universe));
        }
        if universe > self.universe {
            tracing::debug!(
                from = self.universe,
                to = universe,
                events = total,
                "growing label universe"
            );
        } else {
            tracing::debug!(universe, events = total, "respacing saturated label universe");
        }
        self.universe = universe;
        if let Some(head) = self.head {
            self.spread(head, total, 0, universe);
        }
        Ok(Relabel::Universe)
    }

    /// Respace `count` consecutive events starting at `first` evenly over
    /// `[start, start + size)`.
    fn spread(&mut self, first: usize, count: usize, start: u64, size: u64) {
        let mut current = Some(first);
        for i in 0..count {
            let Some(id) = current else {
                break;
            };
            let offset = (i as u128 * size as u128 / count as u128) as u64;
            self.nodes[id].label = start + offset;
            current = self.nodes[id].next;
        }
    }
}
