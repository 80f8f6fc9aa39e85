//! Order id minting. Ids must be stable across replays of the same seed, so
//! the uuid payload is drawn from the simulation rng instead of OS entropy.

use rand::Rng;
use uuid::Uuid;

use crate::types::OrderId;

fn deterministic_uuid(rng: &mut impl Rng) -> Uuid {
    let bytes: [u8; 16] = rng.gen();
    uuid::Builder::from_random_bytes(bytes).into_uuid()
}

/// Mint the id for a newly created order.
pub(crate) fn order_id(rng: &mut impl Rng) -> OrderId {
    OrderId(format!("order_{}", deterministic_uuid(rng)))
}
