use crate::delimited_writer;
use crate::error::{Error, Result};
use crate::prelude::*;
use rand::Rng;
use std::io::Write;

pub const HEADER_SECTION: &str = "[Header]";
pub const DATA_SECTION: &str = "[Data]";

/// Column header line that follows `[Data]`
pub const COLUMNS: [&str; 11] = [
    "SNP Name",
    "Sample ID",
    "Allele1 - Forward",
    "Allele2 - Forward",
    "Allele1 - Top",
    "Allele2 - Top",
    "Allele1 - AB",
    "Allele2 - AB",
    "GC Score",
    "X",
    "Y",
];

/// A single data line of a Final Report
#[derive(Clone, Debug, PartialEq)]
pub struct FinalReportRow {
    pub snp: SnpId,
    pub sample: SampleId,
    pub genotype: Genotype,
    pub gc_score: f64,
    pub x: f64,
    pub y: f64,
}

impl FinalReportRow {
    /// Draws row `index` of `panel`.
    ///
    /// Ids come from the panel's index arithmetic; the genotype and the three
    /// scores are uniform draws, scores in `[0, 1)`. `None` when the panel
    /// has no SNPs or the row's ids overflow.
    pub fn random<R: Rng + ?Sized>(panel: &Panel, index: u64, rng: &mut R) -> Option<Self> {
        Some(Self {
            snp: panel.snp_id(index)?,
            sample: panel.sample_id(index)?,
            genotype: rng.gen(),
            gc_score: rng.gen(),
            x: rng.gen(),
            y: rng.gen(),
        })
    }

    /// The row rendered in `COLUMNS` order
    pub fn fields(&self) -> [String; 11] {
        let g = &self.genotype;
        [
            snp_name(self.snp),
            sample_name(self.sample),
            g.forward.0.to_string(),
            g.forward.1.to_string(),
            g.top.0.to_string(),
            g.top.1.to_string(),
            g.ab.0.to_string(),
            g.ab.1.to_string(),
            format!("{:.4}", self.gc_score),
            format!("{:.3}", self.x),
            format!("{:.3}", self.y),
        ]
    }
}

/// Writes a complete Final Report for `panel` to `wtr`.
///
/// The output is the two section lines, the column header and then
/// `panel.row_count()` data lines, all samples' SNPs in order. A panel
/// whose ids overflow is rejected before anything is written.
pub fn write_final_report<W, R>(wtr: W, panel: &Panel, rng: &mut R) -> Result<()>
where
    W: Write,
    R: Rng + ?Sized,
{
    panel.validate()?;
    let mut wtr = delimited_writer(wtr, b'\t');
    wtr.write_record(&[HEADER_SECTION])?;
    wtr.write_record(&[DATA_SECTION])?;
    wtr.write_record(&COLUMNS)?;

    for index in 0..panel.row_count() {
        let row = FinalReportRow::random(panel, index, rng)
            .ok_or_else(|| Error::IdOverflow(format!("row {}", index)))?;
        wtr.write_record(&row.fields())?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::error::Error;

    fn report(panel: &Panel, seed: u64) -> Result<String> {
        let mut buf = vec![];
        write_final_report(&mut buf, panel, &mut StdRng::seed_from_u64(seed))?;
        Ok(String::from_utf8(buf).expect("report is ascii"))
    }

    #[test]
    fn test_header_is_exact() -> std::result::Result<(), Box<dyn Error>> {
        let text = report(&Panel::new(1, 1), 1)?;
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("[Header]"));
        assert_eq!(lines.next(), Some("[Data]"));
        assert_eq!(
            lines.next(),
            Some(
                "SNP Name\tSample ID\tAllele1 - Forward\tAllele2 - Forward\tAllele1 - Top\t\
                 Allele2 - Top\tAllele1 - AB\tAllele2 - AB\tGC Score\tX\tY"
            )
        );
        assert!(text.ends_with('\n'));
        assert!(!text.contains('\r'));
        Ok(())
    }

    #[test]
    fn test_two_samples_three_snps() -> std::result::Result<(), Box<dyn Error>> {
        let text = report(&Panel::new(2, 3), 2)?;
        let rows: Vec<Vec<&str>> = text.lines().skip(3).map(|l| l.split('\t').collect()).collect();
        assert_eq!(text.lines().count(), 3 + 6);
        assert_eq!(rows.len(), 6);
        assert_eq!(&rows[0][..2], &["SNP1", "SAM1"]);
        assert_eq!(&rows[3][..2], &["SNP1", "SAM2"]);
        assert_eq!(&rows[5][..2], &["SNP3", "SAM2"]);
        Ok(())
    }

    #[test]
    fn test_row_fields_are_well_formed() -> std::result::Result<(), Box<dyn Error>> {
        let panel = Panel::new(4, 25).first_snp_id(10).first_sample_id(50);
        let text = report(&panel, 3)?;
        for (i, line) in text.lines().skip(3).enumerate() {
            let fields: Vec<&str> = line.split('\t').collect();
            assert_eq!(fields.len(), 11);
            assert_eq!(fields[0], format!("SNP{}", 10 + i as u64 % 25));
            assert_eq!(fields[1], format!("SAM{}", 50 + i as u64 / 25));
            for allele in &fields[2..6] {
                assert!(["A", "T", "C", "G"].contains(allele));
            }
            for ab in &fields[6..8] {
                assert!(["A", "B"].contains(ab));
            }
            assert_eq!(fields[8].split('.').nth(1).map(str::len), Some(4));
            assert_eq!(fields[9].split('.').nth(1).map(str::len), Some(3));
            for score in &fields[8..11] {
                let value: f64 = score.parse()?;
                assert!((0.0..=1.0).contains(&value));
            }
        }
        Ok(())
    }

    #[test]
    fn test_empty_map_writes_headers_only() -> std::result::Result<(), Box<dyn Error>> {
        assert_eq!(report(&Panel::new(5, 0), 4)?.lines().count(), 3);
        assert_eq!(report(&Panel::new(0, 5), 4)?.lines().count(), 3);
        Ok(())
    }

    #[test]
    fn test_overflowing_ids_write_nothing() {
        let mut buf = vec![];
        let panel = Panel::new(1, 2).first_snp_id(u64::MAX);
        let result = write_final_report(&mut buf, &panel, &mut StdRng::seed_from_u64(5));
        assert!(matches!(result, Err(crate::error::Error::IdOverflow(_))));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_random_row_outside_empty_map() {
        let mut rng = StdRng::seed_from_u64(6);
        assert!(FinalReportRow::random(&Panel::new(1, 0), 0, &mut rng).is_none());
        let row = FinalReportRow::random(&Panel::new(1, 1).first_snp_id(u64::MAX), 0, &mut rng);
        assert_eq!(row.map(|r| r.snp), Some(u64::MAX));
    }

    #[test]
    fn test_same_seed_same_report() -> std::result::Result<(), Box<dyn Error>> {
        let panel = Panel::new(3, 7);
        assert_eq!(report(&panel, 99)?, report(&panel, 99)?);
        assert_ne!(report(&panel, 99)?, report(&panel, 100)?);
        Ok(())
    }
}
