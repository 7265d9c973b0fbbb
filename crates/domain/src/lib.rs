#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod catalog;
pub mod contraindication;

mod adjustment;
mod allocation;
mod body_part;
mod course;
mod difficulty;
mod eligibility;
mod error;
mod exercise;
mod name;
mod priority;
mod section;
mod service;

pub use adjustment::*;
pub use allocation::*;
pub use body_part::*;
pub use contraindication::{Contraindication, Severity, SeverityError, Verdict};
pub use course::*;
pub use difficulty::*;
pub use eligibility::*;
pub use error::*;
pub use exercise::*;
pub use name::*;
pub use priority::*;
pub use section::*;
pub use service::*;
