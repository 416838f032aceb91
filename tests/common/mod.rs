//! Shared test doubles for integration tests

#![allow(dead_code)]

pub mod mock_client;
pub mod mock_desktop;
pub mod mock_presenter;
