//! Available-to-promise and capable-to-promise calculations.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::{
    config::{AppConfig, DEFAULT_DAILY_CAPACITY_UNITS},
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Supply position and demand for a single material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtpContext {
    pub material_id: String,
    pub material_name: String,
    pub on_hand: f64,
    pub incoming: f64,
    pub reserved: f64,
    pub safety_stock: f64,
    pub requested_qty: f64,
    pub requested_date: NaiveDate,
}

/// Availability verdict for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AtpStatus {
    Available,
    Partial,
    Unavailable,
}

/// Supply components echoed back for display and audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtpBreakdown {
    pub on_hand: f64,
    pub incoming: f64,
    pub reserved: f64,
    pub safety_stock: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtpResult {
    /// Quantity promisable today, clamped at zero for display
    pub available_qty: f64,
    /// Date the requested quantity can be delivered
    pub atp_date: NaiveDate,
    pub status: AtpStatus,
    pub breakdown: AtpBreakdown,
}

/// How a zero-quantity request is answered.
///
/// `Literal` runs the status cascade unchanged, so a zero-quantity request
/// against an over-committed position is reported unavailable with a shifted
/// promise date. `ShortCircuit` answers such requests as available at the
/// requested date before the cascade runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ZeroQuantityPolicy {
    #[default]
    Literal,
    ShortCircuit,
}

/// Tunable assumptions the promise calculations run under
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PromisingPolicy {
    /// Assumed throughput for covering shortfalls, in units per calendar day
    pub daily_capacity_units: f64,
    pub zero_quantity_policy: ZeroQuantityPolicy,
}

impl Default for PromisingPolicy {
    fn default() -> Self {
        Self {
            daily_capacity_units: DEFAULT_DAILY_CAPACITY_UNITS,
            zero_quantity_policy: ZeroQuantityPolicy::default(),
        }
    }
}

impl PromisingPolicy {
    /// Builds the runtime policy from validated configuration
    pub fn from_config(config: &AppConfig) -> Self {
        let zero_quantity_policy = match config.zero_quantity_policy.to_ascii_lowercase().as_str()
        {
            "short-circuit" => ZeroQuantityPolicy::ShortCircuit,
            _ => ZeroQuantityPolicy::Literal,
        };
        Self {
            daily_capacity_units: config.daily_capacity_units,
            zero_quantity_policy,
        }
    }
}

/// Rejects contexts whose quantities cannot safely participate in promise
/// arithmetic. Field names in messages match the wire format.
pub fn validate_context(context: &AtpContext) -> Result<(), ServiceError> {
    let quantities = [
        ("onHand", context.on_hand),
        ("incoming", context.incoming),
        ("reserved", context.reserved),
        ("safetyStock", context.safety_stock),
        ("requestedQty", context.requested_qty),
    ];

    for (field, value) in quantities {
        if !value.is_finite() || value < 0.0 {
            return Err(ServiceError::ValidationError(format!(
                "{} must be a finite, non-negative quantity (got {})",
                field, value
            )));
        }
    }

    Ok(())
}

/// Net supply position. Positive means stock is free to promise, negative
/// means existing commitments already exceed supply.
fn raw_position(context: &AtpContext) -> f64 {
    context.on_hand + context.incoming - context.reserved - context.safety_stock
}

/// Net amount that must be produced or sourced before the request is covered.
///
/// Evaluated exactly as written rather than derived from the raw position:
/// the two forms can round differently under f64, and this operand order is
/// the compatibility contract.
fn net_shortfall(context: &AtpContext) -> f64 {
    context.requested_qty - context.on_hand - context.incoming
        + context.reserved
        + context.safety_stock
}

/// Computes the date a shortfall could be covered, shifting the requested
/// date by whole calendar days of assumed throughput.
pub fn ctp_date(
    context: &AtpContext,
    policy: &PromisingPolicy,
) -> Result<NaiveDate, ServiceError> {
    let needed = net_shortfall(context);

    if needed <= 0.0 {
        // Nothing is missing; the requested date stands.
        return Ok(context.requested_date);
    }

    let days_needed = (needed / policy.daily_capacity_units).ceil();

    // The cast saturates for values beyond i64, and chrono rejects spans or
    // dates outside its calendar range.
    let days = days_needed as i64;
    Duration::try_days(days)
        .and_then(|span| context.requested_date.checked_add_signed(span))
        .ok_or_else(|| {
            ServiceError::ComputationError(format!(
                "promise date for {} exceeds the supported calendar range ({} days past {})",
                context.material_id, days, context.requested_date
            ))
        })
}

/// Answers an availability check for one validated context.
///
/// Status and promise date are decided on the signed raw position; only the
/// reported quantity is clamped at zero. Keeping the clamp out of the
/// decision path is what lets over-committed positions fall through to the
/// capable-to-promise heuristic.
pub fn calculate_atp(
    context: &AtpContext,
    policy: &PromisingPolicy,
) -> Result<AtpResult, ServiceError> {
    let raw = raw_position(context);

    let breakdown = AtpBreakdown {
        on_hand: context.on_hand,
        incoming: context.incoming,
        reserved: context.reserved,
        safety_stock: context.safety_stock,
    };

    if policy.zero_quantity_policy == ZeroQuantityPolicy::ShortCircuit
        && context.requested_qty == 0.0
    {
        return Ok(AtpResult {
            available_qty: raw.max(0.0),
            atp_date: context.requested_date,
            status: AtpStatus::Available,
            breakdown,
        });
    }

    let status = if raw >= context.requested_qty {
        AtpStatus::Available
    } else if raw > 0.0 {
        AtpStatus::Partial
    } else {
        AtpStatus::Unavailable
    };

    let atp_date = match status {
        AtpStatus::Available => context.requested_date,
        AtpStatus::Partial | AtpStatus::Unavailable => ctp_date(context, policy)?,
    };

    Ok(AtpResult {
        available_qty: raw.max(0.0),
        atp_date,
        status,
        breakdown,
    })
}

/// Order promising service answering availability checks
#[derive(Clone)]
pub struct PromisingService {
    policy: PromisingPolicy,
    event_sender: EventSender,
}

impl PromisingService {
    pub fn new(policy: PromisingPolicy, event_sender: EventSender) -> Self {
        Self {
            policy,
            event_sender,
        }
    }

    pub fn policy(&self) -> &PromisingPolicy {
        &self.policy
    }

    /// Validates and answers a single availability check
    #[instrument(skip(self))]
    pub async fn check(&self, context: AtpContext) -> Result<AtpCheckOutcome, ServiceError> {
        validate_context(&context)?;
        let result = calculate_atp(&context, &self.policy)?;

        self.event_sender
            .send(Event::AtpComputed {
                material_id: context.material_id.clone(),
                requested_qty: context.requested_qty,
                available_qty: result.available_qty,
                status: result.status,
                atp_date: result.atp_date,
            })
            .await
            .map_err(ServiceError::EventError)?;

        if result.status != AtpStatus::Available {
            self.event_sender
                .send(Event::ShortfallPromised {
                    material_id: context.material_id.clone(),
                    shortfall_qty: net_shortfall(&context).max(0.0),
                    days_needed: (result.atp_date - context.requested_date).num_days(),
                    atp_date: result.atp_date,
                })
                .await
                .map_err(ServiceError::EventError)?;
        }

        info!(
            material_id = %context.material_id,
            status = %result.status,
            available_qty = result.available_qty,
            atp_date = %result.atp_date,
            "ATP check completed"
        );

        Ok(AtpCheckOutcome { context, result })
    }

    /// Answers availability for every supplied context, preserving input order
    #[instrument(skip(self, contexts))]
    pub async fn check_all(
        &self,
        contexts: &[AtpContext],
    ) -> Result<Vec<AtpCheckOutcome>, ServiceError> {
        let mut outcomes = Vec::with_capacity(contexts.len());
        for context in contexts {
            validate_context(context)?;
            let result = calculate_atp(context, &self.policy)?;
            outcomes.push(AtpCheckOutcome {
                context: context.clone(),
                result,
            });
        }

        let unavailable = outcomes
            .iter()
            .filter(|outcome| outcome.result.status == AtpStatus::Unavailable)
            .count();
        self.event_sender
            .send(Event::AtpBatchComputed {
                total: outcomes.len(),
                unavailable,
            })
            .await
            .map_err(ServiceError::EventError)?;

        info!(
            total = outcomes.len(),
            unavailable, "ATP batch check completed"
        );
        Ok(outcomes)
    }
}

/// A context answered with its promise result, serialized as one merged object
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AtpCheckOutcome {
    #[serde(flatten)]
    pub context: AtpContext,
    #[serde(flatten)]
    pub result: AtpResult,
}
