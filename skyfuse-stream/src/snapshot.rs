// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Snapshot types emitted by the fusion combinators.

/// Latest value of each of N homogeneous sources, `None` where a source has
/// not emitted yet.
///
/// ```
/// use skyfuse_stream::{Slots, Snapshot};
///
/// let snapshot = Snapshot::from(vec![Some(1.5), None, Some(0.2)]);
/// assert_eq!(snapshot.len(), 3);
/// assert_eq!(snapshot.get(0), Some(&1.5));
/// assert_eq!(snapshot.get(1), None);
/// assert_eq!(snapshot.present(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Snapshot<T> {
    slots: Vec<Option<T>>,
}

impl<T> Snapshot<T> {
    /// A snapshot with `len` absent slots.
    pub fn absent(len: usize) -> Self {
        Self {
            slots: std::iter::repeat_with(|| None).take(len).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Latest value of source `index`, `None` when absent or out of range.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Overwrite slot `index`. Out of range indices are ignored.
    pub fn set(&mut self, index: usize, value: T) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = Some(value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&T>> {
        self.slots.iter().map(Option::as_ref)
    }

    pub fn as_slice(&self) -> &[Option<T>] {
        &self.slots
    }

    pub fn into_inner(self) -> Vec<Option<T>> {
        self.slots
    }
}

impl<T> From<Vec<Option<T>>> for Snapshot<T> {
    fn from(slots: Vec<Option<T>>) -> Self {
        Self { slots }
    }
}

impl<T> From<Snapshot<T>> for Vec<Option<T>> {
    fn from(snapshot: Snapshot<T>) -> Self {
        snapshot.slots
    }
}

/// Slot bookkeeping shared by every snapshot shape.
pub trait Slots {
    /// Number of sources the snapshot covers.
    fn arity(&self) -> usize;

    /// Number of sources that have produced a value.
    fn present(&self) -> usize;

    /// `true` once every source has produced a value.
    fn is_complete(&self) -> bool {
        self.present() == self.arity()
    }
}

impl<T> Slots for Snapshot<T> {
    fn arity(&self) -> usize {
        self.slots.len()
    }

    fn present(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

macro_rules! impl_slots_for_tuple {
    ($arity:expr; $($name:ident => $idx:tt),+) => {
        impl<$($name),+> Slots for ($(Option<$name>,)+) {
            fn arity(&self) -> usize {
                $arity
            }

            fn present(&self) -> usize {
                0 $(+ usize::from(self.$idx.is_some()))+
            }
        }
    };
}

impl_slots_for_tuple!(2; A => 0, B => 1);
impl_slots_for_tuple!(3; A => 0, B => 1, C => 2);
impl_slots_for_tuple!(4; A => 0, B => 1, C => 2, D => 3);
