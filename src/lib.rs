//! Home price estimation over a pre-trained regression model.
//!
//! A [`form::FormState`] holds the house attributes, the
//! [`estimator::Estimator`] turns them into a [`models::FeatureRecord`] and
//! asks a [`regressor::RegressionModel`] for a price.

pub mod config;
pub mod currency;
pub mod estimator;
pub mod form;
pub mod models;
pub mod regressor;
pub mod shell;
