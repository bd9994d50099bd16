//! Property versus index comparison: the merged result, its narrative, and
//! default holding-period selection.

pub mod compare;
pub mod narrative;
pub mod period;
