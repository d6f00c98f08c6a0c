//! NotificationHub - declared-event publish/subscribe registry
//!
//! Events must be declared before anyone subscribes. Publishing resolves
//! subscriber uids through a directory at delivery time, so the hub
//! never owns recipients.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::ports::{
    DeliveryError, Notice, NotifiableDirectory, Snapshot, SnapshotStore, SnapshotValue,
};
use crate::domain::services::corrupt_snapshot;
use crate::error::{CirculationError, CirculationResult};

/// What happened during one publish
///
/// A delivery failure never aborts the fan-out; every subscriber is
/// attempted and failures are collected per uid.
#[derive(Debug, Default)]
pub struct PublishOutcome {
    pub delivered: usize,
    pub failed: Vec<(String, DeliveryError)>,
}

impl PublishOutcome {
    pub fn all_delivered(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Event registry mapping declared events to subscriber uids
pub struct NotificationHub {
    name: String,
    events: BTreeMap<String, Vec<String>>,
    store: Arc<dyn SnapshotStore>,
}

impl NotificationHub {
    pub fn new(name: impl Into<String>, store: Arc<dyn SnapshotStore>) -> Self {
        Self {
            name: name.into(),
            events: BTreeMap::new(),
            store,
        }
    }

    /// Register an event name
    ///
    /// Idempotent: re-declaring keeps existing subscribers.
    pub fn declare_event(&mut self, event: &str) {
        self.events.entry(event.to_string()).or_default();
    }

    pub fn is_declared(&self, event: &str) -> bool {
        self.events.contains_key(event)
    }

    /// Subscribe a uid to a declared event
    ///
    /// Idempotent per (event, uid); subscriber order is first-subscribe
    /// order.
    pub fn subscribe(&mut self, event: &str, uid: &str) -> CirculationResult<()> {
        let subscribers = self
            .events
            .get_mut(event)
            .ok_or_else(|| CirculationError::UnknownEvent {
                event: event.to_string(),
            })?;
        if !subscribers.iter().any(|subscriber| subscriber == uid) {
            subscribers.push(uid.to_string());
        }
        Ok(())
    }

    /// Drop a uid from a declared event; unknown uids are a no-op
    pub fn unsubscribe(&mut self, event: &str, uid: &str) -> CirculationResult<()> {
        let subscribers = self
            .events
            .get_mut(event)
            .ok_or_else(|| CirculationError::UnknownEvent {
                event: event.to_string(),
            })?;
        subscribers.retain(|subscriber| subscriber != uid);
        Ok(())
    }

    /// Current subscribers of an event; empty for undeclared events
    pub fn subscribers(&self, event: &str) -> &[String] {
        self.events
            .get(event)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Deliver a notice to every subscriber of an event
    ///
    /// Publishing to an undeclared event reaches nobody and is not an
    /// error.
    pub fn publish(
        &self,
        event: &str,
        notice: &Notice,
        directory: &dyn NotifiableDirectory,
    ) -> PublishOutcome {
        let mut outcome = PublishOutcome::default();
        let Some(subscribers) = self.events.get(event) else {
            return outcome;
        };
        for uid in subscribers {
            match directory.notifiable(uid) {
                Some(recipient) => match recipient.notify(notice) {
                    Ok(()) => outcome.delivered += 1,
                    Err(err) => outcome.failed.push((uid.clone(), err)),
                },
                None => outcome
                    .failed
                    .push((uid.clone(), DeliveryError::UnknownRecipient)),
            }
        }
        outcome
    }

    /// Persist the registry, one entry per declared event
    pub fn save(&self) -> CirculationResult<()> {
        let mut snapshot = Snapshot::new();
        for (event, subscribers) in &self.events {
            snapshot.push(event.clone(), SnapshotValue::Subscribers(subscribers.clone()));
        }
        self.store.save(&self.name, &snapshot)?;
        Ok(())
    }

    /// Rebuild from the stored snapshot, declared-but-empty events
    /// included
    ///
    /// On any failure the current state is left untouched.
    pub fn restore(&mut self) -> CirculationResult<()> {
        let snapshot = self.store.restore(&self.name)?;
        let mut events: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (event, value) in snapshot.iter() {
            match value {
                SnapshotValue::Subscribers(subscribers) => {
                    events.insert(event.to_string(), subscribers.clone());
                }
                _ => {
                    return Err(corrupt_snapshot(
                        &self.name,
                        format!("entry '{event}' is not a subscriber list"),
                    ))
                }
            }
        }
        self.events = events;
        Ok(())
    }
}
