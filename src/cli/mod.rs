//! # CLI Module
//!
//! Build-time tooling for the Pets API.
//!
//! ## Commands
//!
//! ### `openapi`
//!
//! Write the API description, used to drive client generation:
//!
//! ```bash
//! pets-api openapi --format yaml --output openapi.yaml
//! ```
//!
//! ### `routes`
//!
//! Print the routing table.
//!
//! ### `invoke`
//!
//! Run one platform event through the entry point, the same path a deployed
//! function takes:
//!
//! ```bash
//! ENVIRONMENT=dev pets-api invoke --event event.json
//! ```

mod commands;


pub use commands::{
    invoke_event, pets_description, render_description, run, run_cli, write_description, Cli,
    Commands, DescriptionFormat,
};
