//! Shared test harness modules for the shelfload CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;
use crate::load::{LoadConfig, config_from_layers_for_test};

mod helpers;
mod pipeline;
mod unit;
