//! L1 to L2 address aliasing.
//!
//! Contracts sending messages from L1 appear on L2 under their address plus a
//! fixed offset, modulo 2^160.

use alloy_primitives::{address, aliases::U160, Address};

pub const L1_TO_L2_ALIAS_OFFSET: Address = address!("1111000000000000000000000000000000001111");

fn offset() -> U160 {
    U160::from_be_slice(L1_TO_L2_ALIAS_OFFSET.as_slice())
}

fn to_address(value: U160) -> Address {
    Address::from(value.to_be_bytes::<20>())
}

pub fn apply_l1_to_l2_alias(l1_address: Address) -> Address {
    let value = U160::from_be_slice(l1_address.as_slice());
    to_address(value.wrapping_add(offset()))
}

pub fn undo_l1_to_l2_alias(l2_address: Address) -> Address {
    let value = U160::from_be_slice(l2_address.as_slice());
    to_address(value.wrapping_sub(offset()))
}
