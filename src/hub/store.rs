//! Authoritative state store: one record per portlet on the page.
//!
//! The store is only mutated by [`StateStore::apply_update`], i.e. as the
//! result of a completed round trip.

use crate::bootstrap::{PageBootstrap, PortletDescriptor};
use crate::events::{ChangeReason, StateChangeEvent};
use crate::state::RenderState;
use crate::transport::StateUpdate;

#[derive(Debug, Clone)]
pub(crate) struct PortletRecord {
    pub descriptor: PortletDescriptor,
    pub state: RenderState,
    pub registered: bool,
}

impl PortletRecord {
    pub fn is_public(&self, name: &str) -> bool {
        self.descriptor.is_public(name)
    }
}

/// Page-ordered portlet records.
#[derive(Debug, Default)]
pub(crate) struct StateStore {
    records: Vec<PortletRecord>,
}

impl StateStore {
    pub fn from_bootstrap(page: &PageBootstrap) -> Self {
        let records = page
            .portlets
            .iter()
            .map(|descriptor| PortletRecord {
                descriptor: descriptor.clone(),
                state: descriptor.state.clone(),
                registered: false,
            })
            .collect();
        Self { records }
    }

    pub fn get(&self, portlet_id: &str) -> Option<&PortletRecord> {
        self.records.iter().find(|r| r.descriptor.id == portlet_id)
    }

    pub fn get_mut(&mut self, portlet_id: &str) -> Option<&mut PortletRecord> {
        self.records.iter_mut().find(|r| r.descriptor.id == portlet_id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.records.iter().map(|r| r.descriptor.id.clone()).collect()
    }

    /// Commit a server response.
    ///
    /// The submitter's record is replaced by `update.state`; every other
    /// portlet declaring a changed public parameter public gets the new
    /// value. Returns one event per affected portlet: the submitter first
    /// (always), then the others in page order (only if something changed
    /// for them).
    pub fn apply_update(
        &mut self,
        submitter: &str,
        update: StateUpdate,
        reason: ChangeReason,
    ) -> Vec<StateChangeEvent> {
        let mut events = Vec::new();

        if let Some(record) = self.get_mut(submitter) {
            let previous = std::mem::replace(&mut record.state, update.state);
            let changed = previous.parameters().changed_names(record.state.parameters());
            let event =
                StateChangeEvent::new(submitter, reason, record.state.clone(), changed)
                    .with_mode_changes(
                        previous.portlet_mode() != record.state.portlet_mode(),
                        previous.window_state() != record.state.window_state(),
                    );
            events.push(event);
        }

        if update.public_parameters.is_empty() {
            return events;
        }

        for record in self
            .records
            .iter_mut()
            .filter(|r| r.descriptor.id != submitter)
        {
            let mut changed = Vec::new();
            for change in &update.public_parameters {
                if record.is_public(&change.name) && change.apply_to(record.state.parameters_mut())
                {
                    changed.push(change.name.clone());
                }
            }
            if !changed.is_empty() {
                events.push(StateChangeEvent::new(
                    record.descriptor.id.as_str(),
                    ChangeReason::PublicParameter,
                    record.state.clone(),
                    changed,
                ));
            }
        }

        events
    }
}
