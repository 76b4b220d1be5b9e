//! Services the match consumes but does not specify: locomotion and
//! spatial queries. Each is a trait with a built-in implementation so the
//! engine runs headless; a host can swap in its own.

pub mod navigation;
pub mod spatial;

pub use navigation::{DirectNavigation, Navigation};
pub use spatial::{Attachments, ColliderOf, Hit, SpatialQuery, WorldColliders};
