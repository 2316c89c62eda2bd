//! Colony view subscriptions.
//!
//! Players that watch a colony are its subscribers. Whenever the colony changes
//! it is marked dirty, and the next [`ColonyPackageManager::update_subscribers`]
//! pushes the affected views to everyone watching. Players that subscribed
//! since the last update always receive a full snapshot, dirty or not.
//!
//! Global subscribers only follow the colony overview (for example a colony
//! list screen) and never receive permission, work-order or schematic views.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::PlayerId;

/// A view pushed to a subscriber.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ColonyView {
    /// Colony overview; `full` carries the whole colony instead of a delta.
    Colony { full: bool },
    Permissions,
    WorkOrders,
    Schematics,
}

/// Delivers views to players; implemented by the host's networking layer.
pub trait ViewSink {
    fn send(&mut self, player: PlayerId, view: ColonyView);
}

impl<F> ViewSink for F
where
    F: FnMut(PlayerId, ColonyView),
{
    fn send(&mut self, player: PlayerId, view: ColonyView) {
        self(player, view)
    }
}

/// Subscription bookkeeping of one colony.
pub trait ColonyPackageManager {
    /// Hours since a colony member was last seen.
    fn last_contact_in_hours(&self) -> u32;

    fn set_last_contact_in_hours(&mut self, hours: u32);

    /// Players currently watching the colony.
    fn subscribers(&self) -> HashSet<PlayerId>;

    /// Pushes pending views to subscribers, then clears the dirty flag and
    /// the set of new subscribers.
    fn update_subscribers(&mut self);

    fn send_colony_view_packets(&mut self);

    fn send_permissions_packets(&mut self);

    fn send_work_order_packets(&mut self);

    fn send_schematics_packets(&mut self);

    /// Marks the colony as changed since the last update.
    fn set_dirty(&mut self);

    fn add_subscriber(&mut self, player: PlayerId);

    fn remove_subscriber(&mut self, player: PlayerId);

    fn add_global_subscriber(&mut self, player: PlayerId);

    fn remove_global_subscriber(&mut self, player: PlayerId);

    fn global_subscribers(&self) -> HashSet<PlayerId>;
}

/// Default [`ColonyPackageManager`] writing into a [`ViewSink`].
pub struct PackageManager<S: ViewSink> {
    sink: S,
    subscribers: HashSet<PlayerId>,
    new_subscribers: HashSet<PlayerId>,
    global_subscribers: HashSet<PlayerId>,
    dirty: bool,
    last_contact_in_hours: u32,
}

impl<S: ViewSink> PackageManager<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            subscribers: HashSet::new(),
            new_subscribers: HashSet::new(),
            global_subscribers: HashSet::new(),
            dirty: false,
            last_contact_in_hours: 0,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Players owed a view this update: everyone when dirty, otherwise only
    /// the new subscribers.
    fn recipients(&self) -> Vec<PlayerId> {
        let source = if self.dirty {
            &self.subscribers
        } else {
            &self.new_subscribers
        };
        let mut players: Vec<PlayerId> = source.iter().copied().collect();
        players.sort_unstable();
        players
    }

    fn send_to_recipients(&mut self, view: ColonyView) {
        for player in self.recipients() {
            trace!(target: "colony::package", %player, view = view.as_ref(), "sending view");
            self.sink.send(player, view);
        }
    }
}

impl<S: ViewSink> ColonyPackageManager for PackageManager<S> {
    fn last_contact_in_hours(&self) -> u32 {
        self.last_contact_in_hours
    }

    fn set_last_contact_in_hours(&mut self, hours: u32) {
        self.last_contact_in_hours = hours;
    }

    fn subscribers(&self) -> HashSet<PlayerId> {
        self.subscribers.clone()
    }

    fn update_subscribers(&mut self) {
        debug!(
            target: "colony::package",
            dirty = self.dirty,
            subscribers = self.subscribers.len(),
            new_subscribers = self.new_subscribers.len(),
            global_subscribers = self.global_subscribers.len(),
            "updating subscribers"
        );

        self.send_colony_view_packets();
        if !self.subscribers.is_empty() {
            self.send_permissions_packets();
            self.send_work_order_packets();
            self.send_schematics_packets();
        }

        self.dirty = false;
        self.new_subscribers.clear();
    }

    fn send_colony_view_packets(&mut self) {
        for player in self.recipients() {
            let full = self.new_subscribers.contains(&player);
            self.sink.send(player, ColonyView::Colony { full });
        }

        if self.dirty {
            let mut globals: Vec<PlayerId> = self
                .global_subscribers
                .difference(&self.subscribers)
                .copied()
                .collect();
            globals.sort_unstable();
            for player in globals {
                self.sink.send(player, ColonyView::Colony { full: false });
            }
        }
    }

    fn send_permissions_packets(&mut self) {
        self.send_to_recipients(ColonyView::Permissions);
    }

    fn send_work_order_packets(&mut self) {
        self.send_to_recipients(ColonyView::WorkOrders);
    }

    fn send_schematics_packets(&mut self) {
        self.send_to_recipients(ColonyView::Schematics);
    }

    fn set_dirty(&mut self) {
        self.dirty = true;
    }

    fn add_subscriber(&mut self, player: PlayerId) {
        if self.subscribers.insert(player) {
            debug!(target: "colony::package", %player, "subscriber added");
            self.new_subscribers.insert(player);
        }
    }

    fn remove_subscriber(&mut self, player: PlayerId) {
        if self.subscribers.remove(&player) {
            debug!(target: "colony::package", %player, "subscriber removed");
        }
        self.new_subscribers.remove(&player);
    }

    fn add_global_subscriber(&mut self, player: PlayerId) {
        self.global_subscribers.insert(player);
    }

    fn remove_global_subscriber(&mut self, player: PlayerId) {
        self.global_subscribers.remove(&player);
    }

    fn global_subscribers(&self) -> HashSet<PlayerId> {
        self.global_subscribers.clone()
    }
}
