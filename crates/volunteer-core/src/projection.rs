//! Read projections
//!
//! Pure formatting of entities for output. No authorization happens here.

use serde::Serialize;

use crate::model::{Event, Organisation, Timestamp, User};

/// Controls which related records are embedded in an [`EventView`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventFormat {
    pub include_organisation: bool,
    pub include_participants: bool,
}

impl Default for EventFormat {
    fn default() -> Self {
        Self {
            include_organisation: true,
            include_participants: true,
        }
    }
}

impl EventFormat {
    /// Format for events nested under their organisation
    pub fn nested() -> Self {
        Self {
            include_organisation: false,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganisationSummary {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantSummary {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventView {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub start_datetime: Option<Timestamp>,
    pub end_datetime: Option<Timestamp>,
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organisation: Option<OrganisationSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participants: Option<Vec<ParticipantSummary>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganisationView {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone_contact: Option<String>,
    pub email_contact: Option<String>,
}

/// An organisation together with its events split around "now"
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganisationDetailView {
    #[serde(flatten)]
    pub organisation: OrganisationView,
    pub past_events: Vec<EventView>,
    pub upcoming_events: Vec<EventView>,
}

/// Membership of one event after a participant change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipationView {
    pub event_id: i64,
    pub event_participants: Vec<i64>,
}

impl ParticipationView {
    pub fn from_event(event: &Event) -> Self {
        Self {
            event_id: event.id,
            event_participants: event.participants.iter().copied().collect(),
        }
    }
}

/// Format an event. `participants` are the users listed in `event.participants`.
pub fn project_event(
    event: &Event,
    organisation: &Organisation,
    participants: &[User],
    format: EventFormat,
) -> EventView {
    EventView {
        id: event.id,
        name: event.name.clone(),
        description: event.description.clone(),
        start_datetime: event.start_datetime,
        end_datetime: event.end_datetime,
        address: event.address.clone(),
        organisation: format.include_organisation.then(|| OrganisationSummary {
            id: organisation.id,
            name: organisation.name.clone(),
        }),
        participants: format.include_participants.then(|| {
            participants
                .iter()
                .map(|user| ParticipantSummary {
                    id: user.id,
                    name: user.name.clone(),
                })
                .collect()
        }),
    }
}

pub fn project_organisation(organisation: &Organisation) -> OrganisationView {
    OrganisationView {
        id: organisation.id,
        name: organisation.name.clone(),
        description: organisation.description.clone(),
        website: organisation.website.clone(),
        phone_contact: organisation.phone_contact.clone(),
        email_contact: organisation.email_contact.clone(),
    }
}

/// Format an organisation and partition its events.
///
/// An event whose end time is at or before `now` is past; every other event,
/// including one with no end time, is upcoming. Nested events omit the
/// organisation.
pub fn project_organisation_detail(
    organisation: &Organisation,
    events: &[(Event, Vec<User>)],
    now: Timestamp,
) -> OrganisationDetailView {
    let (past, upcoming): (Vec<_>, Vec<_>) = events
        .iter()
        .partition(|(event, _)| event.has_ended(now));

    let project = |(event, participants): &(Event, Vec<User>)| {
        project_event(event, organisation, participants, EventFormat::nested())
    };

    OrganisationDetailView {
        organisation: project_organisation(organisation),
        past_events: past.into_iter().map(project).collect(),
        upcoming_events: upcoming.into_iter().map(project).collect(),
    }
}
