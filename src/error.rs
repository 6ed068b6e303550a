//! Error types.

use thiserror::Error;

use crate::models::{FamilyId, OrderId};

/// A malformed instance or a solution that references data the instance
/// does not contain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StructuralError {
    #[error("duplicate order id {0}")]
    DuplicateOrder(OrderId),

    #[error("duplicate vehicle family id {0}")]
    DuplicateFamily(FamilyId),

    #[error("order {order} has invalid demand {demand}")]
    InvalidDemand { order: OrderId, demand: f64 },

    #[error("order {order} has invalid service duration {duration}")]
    InvalidServiceDuration { order: OrderId, duration: f64 },

    #[error("order {order} has invalid time window [{start}, {end}]")]
    InvalidTimeWindow { order: OrderId, start: f64, end: f64 },

    #[error("order {0} has a non-finite location")]
    InvalidLocation(OrderId),

    #[error("depot has a non-finite location")]
    InvalidDepot,

    #[error("vehicle family {family} has invalid {field}: {value}")]
    InvalidFamily {
        family: FamilyId,
        field: &'static str,
        value: f64,
    },

    #[error("unknown order {0}")]
    UnknownOrder(OrderId),

    #[error("unknown vehicle family {0}")]
    UnknownFamily(FamilyId),

    #[error("order {0} is assigned more than once")]
    DuplicateAssignment(OrderId),
}

/// Errors surfaced by the heuristics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Structural(#[from] StructuralError),

    /// No vehicle family can serve the order, even alone.
    #[error("order {order} cannot be served by any vehicle family")]
    InfeasibleInput { order: OrderId },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
