//! Per-team object buckets for one spatial layer.

use std::collections::BTreeMap;

use tracing::debug;

use crate::team::Team;

use super::rigid_body::Collidable;

/// Objects of one layer, bucketed by team.
///
/// Buckets keep insertion order, so passes over a layer are deterministic.
#[derive(Debug, Clone)]
pub struct CollisionLayer<T> {
    buckets: BTreeMap<Team, Vec<T>>,
}

impl<T> Default for CollisionLayer<T> {
    fn default() -> Self {
        Self {
            buckets: BTreeMap::new(),
        }
    }
}

impl<T> CollisionLayer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object to the end of its team's bucket.
    pub fn insert(&mut self, team: Team, object: T) {
        self.buckets.entry(team).or_default().push(object);
    }

    /// Create an empty bucket for `team` if none exists. Returns `true` if one was created.
    pub fn ensure_bucket(&mut self, team: Team) -> bool {
        if self.buckets.contains_key(&team) {
            return false;
        }
        self.buckets.insert(team, Vec::new());
        true
    }

    /// Objects of `team`, empty if the team has no bucket.
    pub fn bucket(&self, team: Team) -> &[T] {
        self.buckets.get(&team).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn bucket_mut(&mut self, team: Team) -> Option<&mut Vec<T>> {
        self.buckets.get_mut(&team)
    }

    pub fn has_bucket(&self, team: Team) -> bool {
        self.buckets.contains_key(&team)
    }

    /// Teams with a bucket, in ascending id order.
    pub fn teams(&self) -> impl Iterator<Item = Team> + '_ {
        self.buckets.keys().copied()
    }

    /// Every object with its team.
    pub fn iter(&self) -> impl Iterator<Item = (Team, &T)> + '_ {
        self.buckets
            .iter()
            .flat_map(|(team, objects)| objects.iter().map(move |object| (*team, object)))
    }

    /// Total number of objects over all buckets.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(Vec::is_empty)
    }

    /// Empty every bucket, keeping the buckets themselves.
    pub fn clear(&mut self) {
        for objects in self.buckets.values_mut() {
            objects.clear();
        }
    }

    /// Move every object out, keeping the (now empty) buckets.
    pub fn drain(&mut self) -> impl Iterator<Item = (Team, T)> + '_ {
        self.buckets.iter_mut().flat_map(|(team, objects)| {
            let team = *team;
            objects.drain(..).map(move |object| (team, object))
        })
    }

    /// Detach a bucket so another one can be borrowed mutably alongside it.
    pub(crate) fn take_bucket(&mut self, team: Team) -> Option<Vec<T>> {
        self.buckets.remove(&team)
    }

    pub(crate) fn restore_bucket(&mut self, team: Team, objects: Vec<T>) {
        self.buckets.insert(team, objects);
    }
}

impl<T: Collidable> CollisionLayer<T> {
    /// Drop objects that became inactive during a pass. Returns how many were removed.
    pub fn retain_active(&mut self) -> usize {
        let mut removed = 0;
        for (team, objects) in self.buckets.iter_mut() {
            let before = objects.len();
            objects.retain(|object| object.is_active());
            let dropped = before - objects.len();
            if dropped > 0 {
                debug!("Removed {} inactive objects from {}", dropped, team);
            }
            removed += dropped;
        }
        removed
    }
}
