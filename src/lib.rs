
pub mod config;
pub mod cooccurrence;
pub mod entropy;
pub mod files_handling;
pub mod invcl;
pub mod pipeline;
pub mod plmi;
pub mod slqs;
pub mod slqs_row;
pub mod space;
pub mod weeds_prec;

pub use pipeline::Pipeline;
