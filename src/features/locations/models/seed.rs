use chrono::{DateTime, TimeZone, Utc};

use super::location::{Location, LocationCategory, LocationId, LocationStatus};

/// Contributor id owning the demo submissions that belong to the signed-in demo account
pub const DEMO_USER_ID: &str = "demo-user";

fn added_on(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn demo(
    id: &str,
    name: &str,
    category: LocationCategory,
    status: LocationStatus,
    (lat, lng): (f64, f64),
    (contributor, contributor_id): (&str, &str),
    date_added: DateTime<Utc>,
    description: &str,
) -> Location {
    Location {
        id: LocationId::from(id),
        name: name.to_string(),
        description: Some(description.to_string()),
        category,
        status,
        lat,
        lng,
        contributor: contributor.to_string(),
        contributor_id: contributor_id.to_string(),
        date_added,
        images: Vec::new(),
    }
}

/// Demo dataset around Lusaka used when `MAP_SEED_DEMO_DATA` is enabled
pub fn demo_locations() -> Vec<Location> {
    use LocationCategory::*;
    use LocationStatus::*;

    vec![
        demo(
            "1",
            "Cosmopolitan Mall",
            Business,
            Verified,
            (-15.4075, 28.2678),
            ("John Doe", "user1"),
            added_on(2023, 5, 15),
            "Modern shopping mall in Lusaka",
        ),
        demo(
            "2",
            "Cairo Road",
            Road,
            Verified,
            (-15.4167, 28.2833),
            ("Jane Smith", "user2"),
            added_on(2023, 6, 2),
            "Main commercial road in Lusaka CBD",
        ),
        demo(
            "3",
            "National Museum",
            Landmark,
            Pending,
            (-15.3981, 28.3066),
            ("Sam Wilson", "user3"),
            added_on(2023, 7, 10),
            "Cultural heritage museum",
        ),
        demo(
            "4",
            "New Shopping Center",
            Business,
            Pending,
            (-15.4254, 28.2911),
            ("User", DEMO_USER_ID),
            added_on(2023, 8, 1),
            "Under construction shopping center",
        ),
        demo(
            "5",
            "Rejected Business",
            Business,
            Rejected,
            (-15.4119, 28.3051),
            ("User", DEMO_USER_ID),
            added_on(2023, 7, 20),
            "Duplicate entry",
        ),
    ]
}
