//! Property-based tests for the promising engine.
//!
//! These tests use proptest to verify invariants across a wide range of
//! supply positions, helping to catch edge cases the unit tests might miss.

use chrono::{Duration, NaiveDate};
use promise_api::services::promising::{
    calculate_atp, ctp_date, validate_context, AtpContext, AtpStatus, PromisingPolicy,
    ZeroQuantityPolicy,
};
use proptest::prelude::*;

// Strategies for generating supply positions
fn quantity_strategy() -> impl Strategy<Value = f64> {
    // Whole-unit quantities stay exact under f64, which keeps recomputed
    // expectations byte-identical to the engine's arithmetic.
    (0i64..1_000_000).prop_map(|units| units as f64)
}

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2020i32..2035, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).expect("generated date is valid"))
}

fn context_strategy() -> impl Strategy<Value = AtpContext> {
    (
        quantity_strategy(),
        quantity_strategy(),
        quantity_strategy(),
        quantity_strategy(),
        quantity_strategy(),
        date_strategy(),
    )
        .prop_map(
            |(on_hand, incoming, reserved, safety_stock, requested_qty, requested_date)| {
                AtpContext {
                    material_id: "MAT-PROP".to_string(),
                    material_name: "Property material".to_string(),
                    on_hand,
                    incoming,
                    reserved,
                    safety_stock,
                    requested_qty,
                    requested_date,
                }
            },
        )
}

fn raw_position(ctx: &AtpContext) -> f64 {
    ctx.on_hand + ctx.incoming - ctx.reserved - ctx.safety_stock
}

fn net_shortfall(ctx: &AtpContext) -> f64 {
    ctx.requested_qty - ctx.on_hand - ctx.incoming + ctx.reserved + ctx.safety_stock
}

// Property: the status cascade is decided by the signed raw position
proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn generated_contexts_always_validate(ctx in context_strategy()) {
        prop_assert!(validate_context(&ctx).is_ok());
    }

    #[test]
    fn reported_quantity_is_never_negative(ctx in context_strategy()) {
        let result = calculate_atp(&ctx, &PromisingPolicy::default()).unwrap();
        prop_assert!(result.available_qty >= 0.0);
    }

    #[test]
    fn covered_requests_are_available_at_the_requested_date(ctx in context_strategy()) {
        let result = calculate_atp(&ctx, &PromisingPolicy::default()).unwrap();
        if raw_position(&ctx) >= ctx.requested_qty {
            prop_assert_eq!(result.status, AtpStatus::Available);
            prop_assert_eq!(result.atp_date, ctx.requested_date);
        } else {
            prop_assert_ne!(result.status, AtpStatus::Available);
        }
    }

    #[test]
    fn uncovered_positive_positions_are_partial(ctx in context_strategy()) {
        let raw = raw_position(&ctx);
        let result = calculate_atp(&ctx, &PromisingPolicy::default()).unwrap();
        if raw < ctx.requested_qty && raw > 0.0 {
            prop_assert_eq!(result.status, AtpStatus::Partial);
        }
    }

    #[test]
    fn depleted_positions_with_demand_are_unavailable(ctx in context_strategy()) {
        let result = calculate_atp(&ctx, &PromisingPolicy::default()).unwrap();
        if raw_position(&ctx) <= 0.0 && ctx.requested_qty > 0.0 {
            prop_assert_eq!(result.status, AtpStatus::Unavailable);
        }
    }
}

// Property: shortfalls are promised by whole days of capacity
proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn unmet_demand_is_promised_strictly_later(ctx in context_strategy()) {
        let result = calculate_atp(&ctx, &PromisingPolicy::default()).unwrap();
        if result.status != AtpStatus::Available {
            prop_assert!(result.atp_date > ctx.requested_date);
        }
    }

    #[test]
    fn promise_shift_matches_whole_days_of_capacity(ctx in context_strategy()) {
        let policy = PromisingPolicy::default();
        let promised = ctp_date(&ctx, &policy).unwrap();
        let needed = net_shortfall(&ctx);
        if needed <= 0.0 {
            prop_assert_eq!(promised, ctx.requested_date);
        } else {
            let expected_days = (needed / policy.daily_capacity_units).ceil() as i64;
            prop_assert_eq!(promised - ctx.requested_date, Duration::days(expected_days));
        }
    }

    #[test]
    fn checks_are_deterministic(ctx in context_strategy()) {
        let policy = PromisingPolicy::default();
        let first = calculate_atp(&ctx, &policy).unwrap();
        let second = calculate_atp(&ctx, &policy).unwrap();
        prop_assert_eq!(first, second);
    }
}

// Property: policy switches only affect the cases they name
proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn zero_requests_short_circuit_when_configured(ctx in context_strategy()) {
        let policy = PromisingPolicy {
            zero_quantity_policy: ZeroQuantityPolicy::ShortCircuit,
            ..PromisingPolicy::default()
        };
        let mut ctx = ctx;
        ctx.requested_qty = 0.0;

        let result = calculate_atp(&ctx, &policy).unwrap();
        prop_assert_eq!(result.status, AtpStatus::Available);
        prop_assert_eq!(result.atp_date, ctx.requested_date);
    }

    #[test]
    fn positive_requests_ignore_the_zero_quantity_policy(ctx in context_strategy()) {
        let mut ctx = ctx;
        ctx.requested_qty = ctx.requested_qty.max(1.0);

        let literal = calculate_atp(&ctx, &PromisingPolicy::default()).unwrap();
        let short_circuit = calculate_atp(
            &ctx,
            &PromisingPolicy {
                zero_quantity_policy: ZeroQuantityPolicy::ShortCircuit,
                ..PromisingPolicy::default()
            },
        )
        .unwrap();
        prop_assert_eq!(literal, short_circuit);
    }

    #[test]
    fn negative_quantities_never_validate(
        ctx in context_strategy(),
        negative in -1_000_000.0f64..-0.001,
    ) {
        let mut ctx = ctx;
        ctx.requested_qty = negative;
        prop_assert!(validate_context(&ctx).is_err());
    }
}
