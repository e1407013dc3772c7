//! The main library of the Starboard leaderboard system.
//!
//! Starboard tracks speedruns of a star-collection hack: players submit timed
//! runs for the stars of each course, moderators approve or reject them, and the
//! site shows per-star leaderboards and the history of their records. The hosted
//! store owns persistence, authentication and authorization; this crate is the
//! engine behind it, pure and synchronous:
//!
//! * [`time`]: parsing and formatting of handwritten run times;
//! * [`models`]: the run model and the normalizations of the store boundary;
//! * [`key`]: the entry and personal-best identity keys;
//! * [`compare`]: chronological ordering, prior-run selection and record
//!   classification;
//! * [`timeline`]: record narratives and entry history replay;
//! * [`leaderboard`]: personal bests and ranked leaderboard rows;
//! * [`moderation`]: lifecycle checks, supersede plans and archive audits;
//! * [`catalog`]: the fixed course and star table of the hack;
//! * [`submit`]: validation of raw submissions into pending runs.
//!
//! Nothing in here does I/O, so every operation can be driven from a service,
//! a CLI or a test with the same behavior.

#![warn(missing_docs)]

pub mod catalog;
pub mod compare;
pub mod error;
pub mod key;
pub mod leaderboard;
pub mod models;
pub mod moderation;
pub mod must;
pub mod submit;
pub mod time;
pub mod timeline;
