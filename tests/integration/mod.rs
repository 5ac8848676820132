//! Integration tests for the zettelgraph hierarchy engine

mod allocation;
mod cli_contracts;
mod hierarchy_build;
mod properties;
mod workspace_scan;
