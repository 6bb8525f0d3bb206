// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-to-frame mark diffing.

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::{Point, Rect};

use crate::mark::{Mark, MarkId};

/// A change between two frames.
#[derive(Clone, Debug)]
pub enum MarkDiff {
    /// A mark that did not exist in the previous frame.
    Enter {
        /// Mark id.
        id: MarkId,
        /// Z-index of the new mark.
        z_index: i32,
        /// The new mark.
        new: Box<Mark>,
    },
    /// A mark whose contents changed.
    Update {
        /// Mark id.
        id: MarkId,
        /// Previous z-index.
        old_z_index: i32,
        /// New z-index.
        new_z_index: i32,
        /// The new mark.
        new: Box<Mark>,
    },
    /// A mark that no longer exists.
    Exit {
        /// Mark id.
        id: MarkId,
    },
}

impl MarkDiff {
    /// Returns the id the diff refers to.
    pub fn id(&self) -> MarkId {
        match self {
            Self::Enter { id, .. } | Self::Update { id, .. } | Self::Exit { id } => *id,
        }
    }
}

/// The current frame of marks.
#[derive(Debug, Default)]
pub struct Scene {
    marks: HashMap<MarkId, Mark>,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of marks in the current frame.
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// Returns `true` if the frame is empty.
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Looks up a mark by id.
    pub fn mark(&self, id: MarkId) -> Option<&Mark> {
        self.marks.get(&id)
    }

    /// Marks in paint order (z-index, then id).
    pub fn ordered(&self) -> Vec<&Mark> {
        let mut out: Vec<&Mark> = self.marks.values().collect();
        out.sort_by_key(|m| (m.z_index, m.id));
        out
    }

    /// Union of all mark bounds.
    pub fn bounds(&self) -> Option<Rect> {
        self.marks
            .values()
            .map(Mark::bounds)
            .reduce(|a, b| a.union(b))
    }

    /// Incrementally moves to a new frame.
    ///
    /// Unchanged marks produce no diff. Exits are reported first (in id order), followed by
    /// enters and updates in input order.
    pub fn tick(&mut self, marks: Vec<Mark>) -> Vec<MarkDiff> {
        let mut next: HashMap<MarkId, Mark> = HashMap::with_capacity(marks.len());
        let mut order = Vec::with_capacity(marks.len());
        for mark in marks {
            if next.insert(mark.id, mark.clone()).is_none() {
                order.push(mark.id);
            }
        }

        let mut exits: Vec<MarkId> = self
            .marks
            .keys()
            .copied()
            .filter(|id| !next.contains_key(id))
            .collect();
        exits.sort_unstable();

        let mut diffs: Vec<MarkDiff> = exits.into_iter().map(|id| MarkDiff::Exit { id }).collect();
        for id in order {
            let Some(new) = next.get(&id) else {
                continue;
            };
            match self.marks.get(&id) {
                None => diffs.push(MarkDiff::Enter {
                    id,
                    z_index: new.z_index,
                    new: Box::new(new.clone()),
                }),
                Some(old) if !old.same_as(new) => diffs.push(MarkDiff::Update {
                    id,
                    old_z_index: old.z_index,
                    new_z_index: new.z_index,
                    new: Box::new(new.clone()),
                }),
                Some(_) => {}
            }
        }

        self.marks = next;
        diffs
    }

    /// Replaces the whole frame.
    ///
    /// Every previous mark exits before any new mark enters, so a backend applying the diffs in
    /// order never holds nodes from two renders at once.
    pub fn replace(&mut self, marks: Vec<Mark>) -> Vec<MarkDiff> {
        let mut diffs = self.clear();
        for mark in marks {
            let id = mark.id;
            if self.marks.contains_key(&id) {
                continue;
            }
            diffs.push(MarkDiff::Enter {
                id,
                z_index: mark.z_index,
                new: Box::new(mark.clone()),
            });
            self.marks.insert(id, mark);
        }
        diffs
    }

    /// Removes every mark.
    pub fn clear(&mut self) -> Vec<MarkDiff> {
        let mut ids: Vec<MarkId> = self.marks.keys().copied().collect();
        ids.sort_unstable();
        self.marks.clear();
        ids.into_iter().map(|id| MarkDiff::Exit { id }).collect()
    }

    /// Returns the topmost mark carrying a datum whose shape contains `pt`.
    pub fn hit_test(&self, pt: Point) -> Option<&Mark> {
        self.marks
            .values()
            .filter(|m| m.datum.is_some() && m.shape.contains(pt))
            .max_by_key(|m| (m.z_index, m.id))
    }
}
