//! Bound view tests against a live linear memory.

mod growth;
mod pointers;
mod rebind;
mod roundtrip;
