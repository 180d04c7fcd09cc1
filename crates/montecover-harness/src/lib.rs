pub mod manifest;
pub mod report;

pub use manifest::{load_manifest, load_truth_size, HarnessError, Instance};
pub use report::{manifest_tag, output_file_name, run_manifest, write_csv, InstanceReport};
