#![allow(dead_code)]

use safety_scope::data::{LocationRecord, RawRating};

pub fn location(id: i64, name: &str, description: &str, rating: impl Into<RawRating>) -> LocationRecord {
    LocationRecord {
        id: Some(id),
        location_name: Some(name.to_string()),
        description: Some(description.to_string()),
        surrounding: None,
        rating: Some(rating.into()),
        latitude: Some(12.97 + id as f64 * 0.01),
        longitude: Some(77.59),
        created_by: Some(id % 3),
        created_at: Some(format!("2024-03-{:02} 18:30:00", id)),
        reporter_name: if id % 2 == 0 { Some("Asha".to_string()) } else { None },
    }
}

/// Ten mixed-rating reports with overlapping vocabulary.
pub fn ten_locations() -> Vec<LocationRecord> {
    vec![
        location(1, "Central Market", "crowded busy lanes well lit shops", 4.0),
        location(2, "Old Bus Depot", "dark alley broken streetlights isolated", 1.0),
        location(3, "Lake Park", "police patrol families well lit paths", 5.0),
        location(4, "Railway Underpass", "dark isolated harassment reported", 2.0),
        location(5, "College Road", "busy students police patrol", 4.0),
        location(6, "Warehouse Lane", "broken streetlights dark alley drunk crowd", 1.0),
        location(7, "Mall Plaza", "security guards crowded well lit", 5.0),
        location(8, "Canal Bank", "isolated dark harassment night", 2.0),
        location(9, "Temple Street", "families crowded shops busy", 3.0),
        location(10, "Factory Gate", "drunk crowd dark night isolated", 1.0),
    ]
}
