pub use crate::final_report::{write_final_report, FinalReportRow};
pub use crate::formats::Format;
pub use crate::generator::{megabytes, BatchProgress, Generator};
pub use crate::reader::{FinalReportReader, FinalReportSample};
pub use crate::{sample_name, snp_name, AbCall, Base, Genotype, Panel, SampleId, SnpId};
