//! Project timelines and the valuation operations over them

mod timeline;
mod valuation;
mod report;
pub mod irr;

pub use timeline::Project;
pub use report::Report;
pub use irr::calculate_irr;
