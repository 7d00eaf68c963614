//! Shared test harness modules for the tripgeo CLI.

use super::*;
use crate::assemble::{
    AssembleConfig, DEFAULT_CACHE_DIR, HttpServiceFactory, ServiceFactory, Services, load_trip,
    run_assemble_with,
};

mod helpers;
