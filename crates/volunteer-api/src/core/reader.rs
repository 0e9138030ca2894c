//! Public read paths. No authorization is applied.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;

use volunteer_core::projection::{project_event, project_organisation, project_organisation_detail};
use volunteer_core::{Event, EventFormat, EventView, OrganisationDetailView, OrganisationView};

use crate::storage::{StorageError, Store};

/// Loads records and formats them for output
#[derive(Debug, Clone)]
pub struct ResourceReader {
    store: Arc<dyn Store>,
}

impl ResourceReader {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Format one event with its organisation and participants
    pub async fn view_event(&self, event: &Event) -> Result<EventView, StorageError> {
        let organisation = self
            .store
            .get_organisation(event.organisation_id)
            .await?
            .ok_or_else(|| {
                StorageError::NotFound(format!("organisation {}", event.organisation_id))
            })?;
        let ids: Vec<i64> = event.participants.iter().copied().collect();
        let participants = self.store.get_users(&ids).await?;

        Ok(project_event(event, &organisation, &participants, EventFormat::default()))
    }

    pub async fn list_events(&self) -> Result<Vec<EventView>, StorageError> {
        let events = self.store.list_events().await?;
        let organisations: HashMap<i64, _> = self
            .store
            .list_organisations()
            .await?
            .into_iter()
            .map(|o| (o.id, o))
            .collect();

        let mut views = Vec::with_capacity(events.len());
        for event in &events {
            let organisation = organisations.get(&event.organisation_id).ok_or_else(|| {
                StorageError::NotFound(format!("organisation {}", event.organisation_id))
            })?;
            let ids: Vec<i64> = event.participants.iter().copied().collect();
            let participants = self.store.get_users(&ids).await?;
            views.push(project_event(
                event,
                organisation,
                &participants,
                EventFormat::default(),
            ));
        }
        Ok(views)
    }

    /// `Ok(None)` when no event has this id
    pub async fn get_event(&self, id: i64) -> Result<Option<EventView>, StorageError> {
        match self.store.get_event(id).await? {
            Some(event) => self.view_event(&event).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn list_organisations(&self) -> Result<Vec<OrganisationView>, StorageError> {
        let organisations = self.store.list_organisations().await?;
        Ok(organisations.iter().map(project_organisation).collect())
    }

    /// Organisation details with its events split into past and upcoming at
    /// the current time. `Ok(None)` when no organisation has this id.
    pub async fn get_organisation(
        &self,
        id: i64,
    ) -> Result<Option<OrganisationDetailView>, StorageError> {
        let Some(organisation) = self.store.get_organisation(id).await? else {
            return Ok(None);
        };

        let events = self.store.list_events_for_organisation(id).await?;
        let mut with_participants = Vec::with_capacity(events.len());
        for event in events {
            let ids: Vec<i64> = event.participants.iter().copied().collect();
            let participants = self.store.get_users(&ids).await?;
            with_participants.push((event, participants));
        }

        let now = Utc::now().naive_utc();
        Ok(Some(project_organisation_detail(
            &organisation,
            &with_participants,
            now,
        )))
    }
}
