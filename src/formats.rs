//! Fixture formats other than the Final Report, and the `Format` switch
//! that selects between all of them.
use crate::delimited_writer;
use crate::error::{Error, Result};
use crate::final_report::write_final_report;
use crate::prelude::*;
use rand::Rng;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

const MIN_POSITION: u64 = 100_000;
const MAX_POSITION: u64 = 999_999;
const AUTOSOMES: u32 = 29;
const ZERO125_CALLS: [char; 4] = ['0', '1', '2', '5'];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    FinalReport,
    Vcf,
    Zero125Map,
    Zero125Samples,
    PlinkMap,
    PlinkSamples,
    IdMapping,
}

impl Format {
    pub const ALL: [Format; 7] = [
        Format::FinalReport,
        Format::Vcf,
        Format::Zero125Map,
        Format::Zero125Samples,
        Format::PlinkMap,
        Format::PlinkSamples,
        Format::IdMapping,
    ];

    /// Short name used on the command line and as the file extension
    pub fn name(self) -> &'static str {
        match self {
            Format::FinalReport => "fr",
            Format::Vcf => "vcf",
            Format::Zero125Map => "0125map",
            Format::Zero125Samples => "0125ped",
            Format::PlinkMap => "plmap",
            Format::PlinkSamples => "plped",
            Format::IdMapping => "ids",
        }
    }

    pub fn extension(self) -> &'static str {
        self.name()
    }

    /// Human readable name for progress output
    pub fn title(self) -> &'static str {
        match self {
            Format::FinalReport => "Final Report",
            Format::Vcf => "VCF",
            Format::Zero125Map => "0125 Map",
            Format::Zero125Samples => "0125 Samples",
            Format::PlinkMap => "PLINK Map",
            Format::PlinkSamples => "PLINK Samples",
            Format::IdMapping => "ID Mapping",
        }
    }

    /// Writes a random file of this format for `panel`.
    ///
    /// Map formats only use the panel's SNPs, sample formats only its
    /// samples; the id mapping ignores the map size entirely.
    pub fn write<W, R>(self, wtr: W, panel: &Panel, rng: &mut R) -> Result<()>
    where
        W: Write,
        R: Rng + ?Sized,
    {
        panel.validate()?;
        match self {
            Format::FinalReport => write_final_report(wtr, panel, rng),
            Format::Vcf => write_vcf(wtr, panel, rng),
            Format::Zero125Map => write_zero125_map(wtr, panel, rng),
            Format::Zero125Samples => write_zero125_samples(wtr, panel, rng),
            Format::PlinkMap => write_plink_map(wtr, panel, rng),
            Format::PlinkSamples => write_plink_samples(wtr, panel, rng),
            Format::IdMapping => write_id_mapping(wtr, panel),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|format| format.name() == s)
            .ok_or_else(|| Error::UnknownFormat(s.to_string()))
    }
}

/// Chromosome `1..=29`, `X` or `Y`
fn random_chromosome<R: Rng + ?Sized>(rng: &mut R) -> String {
    match rng.gen_range(1..=AUTOSOMES + 2) {
        n if n <= AUTOSOMES => n.to_string(),
        n if n == AUTOSOMES + 1 => "X".to_string(),
        _ => "Y".to_string(),
    }
}

fn random_position<R: Rng + ?Sized>(rng: &mut R) -> String {
    rng.gen_range(MIN_POSITION..=MAX_POSITION).to_string()
}

fn write_zero125_map<W, R>(wtr: W, panel: &Panel, rng: &mut R) -> Result<()>
where
    W: Write,
    R: Rng + ?Sized,
{
    let mut wtr = delimited_writer(wtr, b'\t');
    wtr.write_record(&["Name", "Chromosome", "Position"])?;
    for snp in panel.snp_ids() {
        wtr.write_record(&[snp_name(snp), random_chromosome(rng), random_position(rng)])?;
    }
    wtr.flush()?;
    Ok(())
}

/// One line per sample holding `map_size` calls, one character per SNP
fn write_zero125_samples<W, R>(wtr: W, panel: &Panel, rng: &mut R) -> Result<()>
where
    W: Write,
    R: Rng + ?Sized,
{
    let mut wtr = delimited_writer(wtr, b'\t');
    wtr.write_record(&["ID", "CALL..."])?;
    for sample in panel.sample_ids() {
        let calls: String = (0..panel.map_size)
            .map(|_| ZERO125_CALLS[rng.gen_range(0..ZERO125_CALLS.len())])
            .collect();
        wtr.write_record(&[sample_name(sample), calls])?;
    }
    wtr.flush()?;
    Ok(())
}

/// PLINK `.map`: chromosome, marker, genetic distance (always 0), position
fn write_plink_map<W, R>(wtr: W, panel: &Panel, rng: &mut R) -> Result<()>
where
    W: Write,
    R: Rng + ?Sized,
{
    let mut wtr = delimited_writer(wtr, b' ');
    for snp in panel.snp_ids() {
        let chromosome = random_chromosome(rng);
        wtr.write_record(&[chromosome, snp_name(snp), "0".to_string(), random_position(rng)])?;
    }
    wtr.flush()?;
    Ok(())
}

/// PLINK `.ped`: family, sample, father, mother, sex, phenotype, then two
/// bases per SNP
fn write_plink_samples<W, R>(wtr: W, panel: &Panel, rng: &mut R) -> Result<()>
where
    W: Write,
    R: Rng + ?Sized,
{
    let mut wtr = delimited_writer(wtr, b' ');
    for sample in panel.sample_ids() {
        let sex = if rng.gen() { "1" } else { "2" };
        let mut record = vec![
            "0".to_string(),
            sample_name(sample),
            "0".to_string(),
            "0".to_string(),
            sex.to_string(),
            "0".to_string(),
        ];
        for _ in 0..panel.map_size {
            record.push(rng.gen::<Base>().to_string());
            record.push(rng.gen::<Base>().to_string());
        }
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// VCF body with one column per sample and a phased `GT` per call
fn write_vcf<W, R>(wtr: W, panel: &Panel, rng: &mut R) -> Result<()>
where
    W: Write,
    R: Rng + ?Sized,
{
    let mut wtr = delimited_writer(wtr, b'\t');
    let mut header: Vec<String> = ["#CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER", "INFO", "FORMAT"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    header.extend(panel.sample_ids().map(sample_name));
    wtr.write_record(&header)?;

    for snp in panel.snp_ids() {
        let mut record = vec![
            random_chromosome(rng),
            random_position(rng),
            snp_name(snp),
            rng.gen::<Base>().to_string(),
            rng.gen::<Base>().to_string(),
            rng.gen_range(1..=100u32).to_string(),
            "PASS".to_string(),
            "RND".to_string(),
            "GT".to_string(),
        ];
        record.extend(
            (0..panel.samples)
                .map(|_| format!("{}|{}", rng.gen_range(0..=1u8), rng.gen_range(0..=1u8))),
        );
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Associates every sample with an individual `IND1..`
fn write_id_mapping<W: Write>(wtr: W, panel: &Panel) -> Result<()> {
    let mut wtr = delimited_writer(wtr, b'\t');
    for (k, sample) in panel.sample_ids().enumerate() {
        wtr.write_record(&[sample_name(sample), format!("IND{}", k + 1)])?;
    }
    wtr.flush()?;
    Ok(())
}
