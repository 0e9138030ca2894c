//! Sample dataset for local runs and tests
//!
//! Seeding an empty store yields organisations 1..=3, users 1..=4 and events
//! 1..=5. Only organisation 1 and user 1 have identities.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::info;

use volunteer_core::{IdentityRef, NewEvent, Organisation, User};

use crate::storage::{StorageError, Store};

/// Identity of organisation 1
pub const ORGANISATION_IDENTITY: &str = "auth0|60c58135612d820070a5f049";

/// Identity of user 1
pub const USER_IDENTITY: &str = "auth0|60c58174612d820070a5f057";

fn at(year: i32, month: u32, day: u32, hour: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day).and_then(|d| d.and_hms_opt(hour, 0, 0))
}

fn organisations() -> Vec<Organisation> {
    let organisation = |identity: Option<&str>, name: &str, description: &str| Organisation {
        id: 0,
        identity: identity.and_then(IdentityRef::new),
        name: name.into(),
        description: Some(description.into()),
        website: None,
        phone_contact: None,
        email_contact: None,
    };

    vec![
        Organisation {
            website: Some("http://mywebsite.com".into()),
            phone_contact: Some("1111111".into()),
            email_contact: Some("test_org_01@test.com".into()),
            ..organisation(
                Some(ORGANISATION_IDENTITY),
                "Test Organisation",
                "Test organisation authenticated through Auth0",
            )
        },
        Organisation {
            website: Some("https://www.catwelfare.org/".into()),
            phone_contact: Some("96111111".into()),
            email_contact: Some("info@catwelfare.org".into()),
            ..organisation(None, "Pet Welfare Society", "Open your heart to a cat in need")
        },
        Organisation {
            website: Some("eastyouths.org".into()),
            email_contact: Some("hey@eastyouths.org".into()),
            ..organisation(
                None,
                "East Youths",
                "An organisation of youths for the community",
            )
        },
    ]
}

fn user(
    identity: Option<&str>,
    name: &str,
    age: i32,
    email: &str,
    join_date: Option<NaiveDateTime>,
    skills: Option<&[&str]>,
) -> User {
    User {
        id: 0,
        identity: identity.and_then(IdentityRef::new),
        name: name.into(),
        age: Some(age),
        email_contact: Some(email.into()),
        phone_contact: Some("1111111".into()),
        join_date,
        skills: skills.map(|s| s.iter().map(|s| s.to_string()).collect()),
    }
}

fn users() -> Vec<User> {
    vec![
        user(
            Some(USER_IDENTITY),
            "Test User",
            17,
            "test_user_01@test.com",
            NaiveDate::from_ymd_opt(2020, 5, 21).and_then(|d| d.and_hms_opt(21, 30, 0)),
            Some(&["cooking", "web development"]),
        ),
        user(None, "User01", 31, "user01@test.com", at(2020, 7, 1, 0), Some(&["counselling"])),
        user(None, "User02", 45, "user02@test.com", at(2019, 12, 12, 0), None),
        user(None, "User03", 28, "user03@test.com", at(2020, 12, 12, 0), Some(&["counselling"])),
    ]
}

/// (organisation index, start, end, participant indices), all indices into
/// the lists above
fn events() -> Vec<(usize, Option<NaiveDateTime>, Option<NaiveDateTime>, Vec<usize>)> {
    vec![
        (0, at(2021, 1, 12, 10), at(2021, 1, 12, 12), vec![0, 1]),
        (1, at(2021, 1, 12, 17), at(2021, 1, 12, 18), vec![0]),
        (2, at(2021, 3, 1, 10), at(2021, 3, 1, 12), vec![1, 3]),
        (2, at(2021, 4, 1, 10), at(2021, 4, 1, 12), vec![0, 1, 3]),
        (2, at(2021, 5, 1, 10), at(2021, 5, 1, 12), vec![0, 2, 3]),
    ]
}

/// Insert the fixture dataset
pub async fn seed(store: &dyn Store) -> Result<(), StorageError> {
    let mut organisation_ids = Vec::new();
    for organisation in organisations() {
        organisation_ids.push(store.insert_organisation(organisation).await?.id);
    }

    let mut user_ids = Vec::new();
    for user in users() {
        user_ids.push(store.insert_user(user).await?.id);
    }

    for (index, (organisation, start, end, participants)) in events().into_iter().enumerate() {
        let event = store
            .insert_event(NewEvent {
                name: format!("test event {}", index),
                description: Some("this is a test event".into()),
                start_datetime: start,
                end_datetime: end,
                address: Some("London SW1A 0AA, UK".into()),
                organisation_id: organisation_ids[organisation],
            })
            .await?;

        for participant in participants {
            store.add_participant(event.id, user_ids[participant]).await?;
        }
    }

    info!(
        organisations = organisation_ids.len(),
        users = user_ids.len(),
        "Seeded fixture dataset"
    );
    Ok(())
}
