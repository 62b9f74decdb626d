#![crate_name = "snp_fixtures"]
use rand::distributions::{Distribution, Standard};
use rand::Rng;
use std::fmt;
use std::io::Write;

use crate::error::{Error, Result};

pub mod prelude;

pub mod error;
pub mod final_report;
pub mod formats;
pub mod generator;
pub mod reader;

pub type SnpId = u64;
pub type SampleId = u64;

/// Marker name as it appears in every fixture format, e.g. `SNP12`
pub fn snp_name(id: SnpId) -> String {
    format!("SNP{}", id)
}

/// Sample name as it appears in every fixture format, e.g. `SAM3`
pub fn sample_name(id: SampleId) -> String {
    format!("SAM{}", id)
}

/// A nucleotide call.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Base {
    A,
    T,
    C,
    G,
}

impl Base {
    pub const ALL: [Base; 4] = [Base::A, Base::T, Base::C, Base::G];

    pub fn as_str(self) -> &'static str {
        match self {
            Base::A => "A",
            Base::T => "T",
            Base::C => "C",
            Base::G => "G",
        }
    }

    pub fn from_field(field: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.as_str() == field)
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Distribution<Base> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Base {
        Base::ALL[rng.gen_range(0..Base::ALL.len())]
    }
}

/// An allele in Illumina's A/B encoding.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum AbCall {
    A,
    B,
}

impl AbCall {
    pub fn as_str(self) -> &'static str {
        match self {
            AbCall::A => "A",
            AbCall::B => "B",
        }
    }

    pub fn from_field(field: &str) -> Option<Self> {
        match field {
            "A" => Some(AbCall::A),
            "B" => Some(AbCall::B),
            _ => None,
        }
    }
}

impl fmt::Display for AbCall {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Distribution<AbCall> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> AbCall {
        if rng.gen() {
            AbCall::A
        } else {
            AbCall::B
        }
    }
}

/// One genotype call in its three encodings.
///
/// The encodings are drawn independently, so a synthetic call is not
/// internally consistent across Forward, Top and AB.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Genotype {
    pub forward: (Base, Base),
    pub top: (Base, Base),
    pub ab: (AbCall, AbCall),
}

impl Distribution<Genotype> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Genotype {
        Genotype {
            forward: (rng.gen(), rng.gen()),
            top: (rng.gen(), rng.gen()),
            ab: (rng.gen(), rng.gen()),
        }
    }
}

/// Shape of a generated data set: how many samples, how many SNPs per
/// sample and where the sequential ids start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Panel {
    pub samples: u64,
    pub map_size: u64,
    pub first_snp_id: SnpId,
    pub first_sample_id: SampleId,
}

impl Panel {
    /// A panel whose SNP and sample ids both start at 1
    pub fn new(samples: u64, map_size: u64) -> Self {
        Self {
            samples,
            map_size,
            first_snp_id: 1,
            first_sample_id: 1,
        }
    }

    pub fn first_snp_id(mut self, id: SnpId) -> Self {
        self.first_snp_id = id;
        self
    }

    pub fn first_sample_id(mut self, id: SampleId) -> Self {
        self.first_sample_id = id;
        self
    }

    /// Number of rows of a sample-major report: one per (sample, SNP) pair.
    ///
    /// Saturates; `validate` rejects panels where the product overflows.
    pub fn row_count(&self) -> u64 {
        self.samples.saturating_mul(self.map_size)
    }

    /// Checks that every id and the row count fit in a `u64`.
    pub fn validate(&self) -> Result<()> {
        last_id(self.first_snp_id, self.map_size)
            .ok_or_else(|| overflow(format!("SNP ids from {} for {} SNPs", self.first_snp_id, self.map_size)))?;
        last_id(self.first_sample_id, self.samples).ok_or_else(|| {
            overflow(format!(
                "sample ids from {} for {} samples",
                self.first_sample_id, self.samples
            ))
        })?;
        self.samples
            .checked_mul(self.map_size)
            .ok_or_else(|| overflow(format!("{} samples x {} SNPs rows", self.samples, self.map_size)))?;
        Ok(())
    }

    /// SNP id of row `index` in sample-major order.
    ///
    /// `None` for an empty map or when the id does not fit in a `u64`.
    pub fn snp_id(&self, index: u64) -> Option<SnpId> {
        self.first_snp_id.checked_add(index.checked_rem(self.map_size)?)
    }

    /// Sample id of row `index` in sample-major order.
    pub fn sample_id(&self, index: u64) -> Option<SampleId> {
        self.first_sample_id.checked_add(index.checked_div(self.map_size)?)
    }

    /// Ids stop at `u64::MAX`; `validate` first to get all of them.
    pub fn snp_ids(&self) -> impl Iterator<Item = SnpId> {
        let first = self.first_snp_id;
        (0..self.map_size).map_while(move |i| first.checked_add(i))
    }

    pub fn sample_ids(&self) -> impl Iterator<Item = SampleId> {
        let first = self.first_sample_id;
        (0..self.samples).map_while(move |i| first.checked_add(i))
    }

    /// The panel for the `file`-th file of a batch: ids continue where the
    /// previous file's ids stopped.
    pub fn offset(&self, file: u64) -> Result<Self> {
        let shift = |first: u64, per_file: u64| {
            file.checked_mul(per_file)
                .and_then(|ids| first.checked_add(ids))
                .ok_or_else(|| overflow(format!("batch file {} ids", file.saturating_add(1))))
        };
        let panel = Self {
            first_snp_id: shift(self.first_snp_id, self.map_size)?,
            first_sample_id: shift(self.first_sample_id, self.samples)?,
            ..*self
        };
        panel.validate()?;
        Ok(panel)
    }
}

/// Last of `count` sequential ids starting at `first`; `Some(first)` when
/// there are none.
fn last_id(first: u64, count: u64) -> Option<u64> {
    first.checked_add(count.saturating_sub(1))
}

fn overflow(what: String) -> Error {
    Error::IdOverflow(what)
}

/// Delimited writer shared by every fixture format: no quoting, `\n` line
/// endings, and records of varying length so header lines can be written
/// through the same writer as the data.
pub(crate) fn delimited_writer<W: Write>(wtr: W, delimiter: u8) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Never)
        .flexible(true)
        .from_writer(wtr)
}
