//! End-to-end scenarios: the real coordinator, page agents and popup
//! running against a simulated browser and an on-disk profile.

mod harness;
