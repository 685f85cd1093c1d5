//! ECS components attached to tag entities.
//!
//! Submodules overview:
//! - [`tag`] – label, colour, icon and measured extent of a tag
//! - [`physicsbody`] – handle of the rigid body driving a tag
//! - [`registration`] – registration order, used for hit priority and draw order

pub mod physicsbody;
pub mod registration;
pub mod tag;
