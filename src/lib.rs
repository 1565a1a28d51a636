//! Client-side feed state with optimistic updates.
//!
//! [`feed::FeedStore`] holds the posts the viewer sees and applies changes
//! before the server confirms them, rolling back exactly what failed.
//! [`actions::FeedActions`] pairs the store with an [`api::FeedApi`] backend.

pub mod actions;
pub mod api;
pub mod cli;
pub mod composer;
pub mod config;
pub mod feed;
pub mod logging;
pub mod model;
pub mod mvi;
