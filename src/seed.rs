//! In-memory demo supply positions served by the read endpoints.
//!
//! The promising engine itself is stateless; these contexts stand in for the
//! material master data a production deployment would pull from its ERP.

use chrono::NaiveDate;

use crate::services::promising::AtpContext;

/// Builds the demo supply positions the list and lookup endpoints answer over.
///
/// The mix covers fully stocked, boundary-covered, partially covered, and
/// over-committed positions so every promise status shows up in the list
/// response.
pub fn demo_contexts() -> Vec<AtpContext> {
    let rows = [
        (
            "MAT-1001",
            "Cold rolled steel coil",
            12_000.0,
            3_000.0,
            4_000.0,
            1_000.0,
            8_000.0,
            ymd(2026, 10, 1),
        ),
        (
            "MAT-1002",
            "Forged crankshaft blank",
            8_000.0,
            2_000.0,
            5_000.0,
            3_000.0,
            5_000.0,
            ymd(2026, 10, 8),
        ),
        (
            "MAT-1003",
            "Lithium cell 21700",
            630.0,
            0.0,
            630.0,
            2_000.0,
            18_000.0,
            ymd(2026, 10, 8),
        ),
        (
            "MAT-1004",
            "Anodized housing, rev C",
            500.0,
            250.0,
            150.0,
            100.0,
            500.0,
            ymd(2026, 11, 15),
        ),
        (
            "MAT-1005",
            "M8 titanium fastener",
            1_200.0,
            0.0,
            1_500.0,
            200.0,
            300.0,
            ymd(2026, 9, 20),
        ),
        (
            "MAT-1006",
            "Ceramic bearing, sealed",
            90.0,
            20.0,
            40.0,
            30.0,
            75.0,
            ymd(2026, 12, 1),
        ),
    ];

    rows.into_iter()
        .map(
            |(
                material_id,
                material_name,
                on_hand,
                incoming,
                reserved,
                safety_stock,
                requested_qty,
                requested_date,
            )| AtpContext {
                material_id: material_id.to_string(),
                material_name: material_name.to_string(),
                on_hand,
                incoming,
                reserved,
                safety_stock,
                requested_qty,
                requested_date,
            },
        )
        .collect()
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    // All call sites pass literal calendar dates.
    NaiveDate::from_ymd_opt(y, m, d).expect("literal date is valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::promising::{calculate_atp, validate_context, AtpStatus, PromisingPolicy};

    #[test]
    fn demo_contexts_are_valid_and_cover_every_status() {
        let contexts = demo_contexts();
        let policy = PromisingPolicy::default();

        let mut statuses = Vec::new();
        for context in &contexts {
            validate_context(context).unwrap();
            statuses.push(calculate_atp(context, &policy).unwrap().status);
        }

        assert!(statuses.contains(&AtpStatus::Available));
        assert!(statuses.contains(&AtpStatus::Partial));
        assert!(statuses.contains(&AtpStatus::Unavailable));
    }

    #[test]
    fn demo_material_ids_are_unique() {
        let contexts = demo_contexts();
        let mut ids: Vec<_> = contexts
            .iter()
            .map(|context| context.material_id.as_str())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), contexts.len());
    }
}
