//! Counsel Engine - Psychological safety for AI counseling chat
//!
//! This crate scores how safe a user feels in a counseling conversation,
//! paces the conversation through stages, generates easy-to-answer choice
//! questions, and reads the model's judgment of whether the user's concern
//! has been resolved.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
