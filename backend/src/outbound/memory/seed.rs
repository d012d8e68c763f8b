//! Reference data loaded into a seeded in-memory backend.

use chrono::{DateTime, Utc};
use uuid::Uuid;
use zeroize::Zeroizing;

use super::{StoredAccount, Tables};
use crate::domain::{
    Activity, AuthAccount, CategoryType, DEFAULT_CURRENCY, Destination, UserId, UserProfile,
    UserRole,
};

/// Email of the seeded traveller account.
pub const DEMO_EMAIL: &str = "demo@roamwise.test";
/// Password of the seeded traveller account.
pub const DEMO_PASSWORD: &str = "wander-demo";
/// Email of the seeded moderator account.
pub const MODERATOR_EMAIL: &str = "moderator@roamwise.test";
/// Password of the seeded moderator account.
pub const MODERATOR_PASSWORD: &str = "keep-it-kind";

const ACTIVITY_TYPES: [(&str, &str); 5] = [
    ("Adventure", "mountain"),
    ("Culture", "landmark"),
    ("Food & Drink", "utensils"),
    ("Nature", "leaf"),
    ("Relaxation", "spa"),
];

const BOOKING_TYPES: [(&str, &str); 5] = [
    ("Car Rental", "car"),
    ("Flight", "plane"),
    ("Hotel", "bed"),
    ("Restaurant", "utensils"),
    ("Tour", "map"),
];

struct SeedDestination {
    name: &'static str,
    country: &'static str,
    description: &'static str,
    best_time_to_visit: &'static str,
    average_cost_per_day: f64,
    language: &'static str,
    timezone: &'static str,
    average_rating: f64,
    trip_count: i64,
}

const DESTINATIONS: [SeedDestination; 4] = [
    SeedDestination {
        name: "Kyoto",
        country: "Japan",
        description: "Temples, gardens and wooden machiya townhouses.",
        best_time_to_visit: "March to May",
        average_cost_per_day: 140.0,
        language: "Japanese",
        timezone: "Asia/Tokyo",
        average_rating: 4.8,
        trip_count: 42,
    },
    SeedDestination {
        name: "Lisbon",
        country: "Portugal",
        description: "Hillside miradouros, trams and pastel de nata.",
        best_time_to_visit: "April to October",
        average_cost_per_day: 95.0,
        language: "Portuguese",
        timezone: "Europe/Lisbon",
        average_rating: 4.6,
        trip_count: 35,
    },
    SeedDestination {
        name: "Reykjavik",
        country: "Iceland",
        description: "Gateway to glaciers, geysers and the northern lights.",
        best_time_to_visit: "June to August",
        average_cost_per_day: 210.0,
        language: "Icelandic",
        timezone: "Atlantic/Reykjavik",
        average_rating: 4.5,
        trip_count: 18,
    },
    SeedDestination {
        name: "Cusco",
        country: "Peru",
        description: "Inca stonework and the road to Machu Picchu.",
        best_time_to_visit: "May to September",
        average_cost_per_day: 60.0,
        language: "Spanish",
        timezone: "America/Lima",
        average_rating: 4.7,
        trip_count: 27,
    },
];

pub(super) fn populate(tables: &mut Tables, now: DateTime<Utc>) {
    tables.activity_types = categories(&ACTIVITY_TYPES);
    tables.booking_types = categories(&BOOKING_TYPES);
    tables.destinations = DESTINATIONS
        .iter()
        .map(|seed| destination(seed, now))
        .collect();

    let first_type = |name: &str| {
        tables
            .activity_types
            .iter()
            .find(|kind| kind.name == name)
            .map(|kind| kind.id)
    };
    let activities = [
        ("Kyoto", "Culture", "Fushimi Inari dawn walk", "Fushimi", 0.0, 3.0),
        ("Kyoto", "Food & Drink", "Nishiki market tasting", "Nakagyo", 45.0, 2.5),
        ("Lisbon", "Culture", "Alfama fado evening", "Alfama", 35.0, 3.0),
        ("Reykjavik", "Nature", "Golden Circle day tour", "Thingvellir", 120.0, 8.0),
        ("Cusco", "Adventure", "Rainbow Mountain trek", "Vinicunca", 70.0, 12.0),
    ];
    let mut seeded = Vec::with_capacity(activities.len());
    for (place, kind, name, location, price, hours) in activities {
        let destination = tables.destinations.iter().find(|d| d.name == place);
        if let (Some(destination), Some(type_id)) = (destination, first_type(kind)) {
            seeded.push(Activity {
                id: Uuid::new_v4(),
                destination_id: destination.id,
                type_id,
                name: name.to_owned(),
                description: None,
                location: location.to_owned(),
                price: Some(price),
                currency: DEFAULT_CURRENCY.to_owned(),
                duration_hours: Some(hours),
                image_urls: Vec::new(),
                is_public: true,
                average_rating: 0.0,
                rating_count: 0,
                created_by: None,
                created_at: now,
                updated_at: None,
            });
        }
    }
    tables.activities = seeded;

    add_account(tables, DEMO_EMAIL, DEMO_PASSWORD, "Demo Traveller", UserRole::Traveler, now);
    add_account(
        tables,
        MODERATOR_EMAIL,
        MODERATOR_PASSWORD,
        "Community Moderator",
        UserRole::Moderator,
        now,
    );
}

fn categories(entries: &[(&str, &str)]) -> Vec<CategoryType> {
    entries
        .iter()
        .map(|(name, icon)| CategoryType {
            id: Uuid::new_v4(),
            name: (*name).to_owned(),
            icon: Some((*icon).to_owned()),
            description: None,
        })
        .collect()
}

fn destination(seed: &SeedDestination, now: DateTime<Utc>) -> Destination {
    Destination {
        id: Uuid::new_v4(),
        name: seed.name.to_owned(),
        country: seed.country.to_owned(),
        description: Some(seed.description.to_owned()),
        image_url: None,
        best_time_to_visit: Some(seed.best_time_to_visit.to_owned()),
        average_cost_per_day: Some(seed.average_cost_per_day),
        currency: DEFAULT_CURRENCY.to_owned(),
        timezone: Some(seed.timezone.to_owned()),
        language: Some(seed.language.to_owned()),
        visa_requirements: None,
        safety_rating: None,
        average_rating: Some(seed.average_rating),
        trip_count: seed.trip_count,
        created_by: None,
        created_at: now,
    }
}

fn add_account(
    tables: &mut Tables,
    email: &str,
    password: &str,
    name: &str,
    role: UserRole,
    now: DateTime<Utc>,
) {
    let id = UserId::random();
    tables.accounts.push(StoredAccount {
        account: AuthAccount {
            id,
            email: email.to_owned(),
            name: Some(name.to_owned()),
            role,
        },
        password: Zeroizing::new(password.to_owned()),
    });
    tables.users.push(UserProfile {
        id,
        email: email.to_owned(),
        name: name.to_owned(),
        bio: None,
        profile_picture: None,
        preferences: None,
        created_at: now,
        updated_at: None,
    });
}
