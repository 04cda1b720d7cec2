//! # Starsift API
//!
//! Stateless REST surface over [`starsift_core`]. Every request carries its
//! own catalog and criteria; nothing is kept between requests.

pub mod rest;

pub use rest::RestApi;
