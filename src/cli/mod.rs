//! CLI infrastructure for the gridrover binary

pub mod run;
