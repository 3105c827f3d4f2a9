//! poiscrape - Scrape points of interest for a city from OpenStreetMap

pub mod api;
pub mod config;
pub mod domain;
pub mod jobs;
pub mod logging;
pub mod osm;
pub mod output;
