use crate::error::{Error, Result};
use crate::final_report::{COLUMNS, DATA_SECTION};
use crate::prelude::*;
use csv;
use ndarray::{Array2, ArrayView1};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const GC_SCORE: usize = 0;
const X: usize = 1;
const Y: usize = 2;

/// All rows of one sample in a Final Report
#[derive(Debug)]
pub struct FinalReportSample {
    pub id: String,
    pub snps: Vec<String>,
    pub genotypes: Vec<Genotype>,
    /// One row per SNP: GC score, X, Y
    pub scores: Array2<f32>,
}

impl FinalReportSample {
    pub fn len(&self) -> usize {
        self.snps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snps.is_empty()
    }

    pub fn gc_scores(&self) -> ArrayView1<f32> {
        self.scores.column(GC_SCORE)
    }

    pub fn x(&self) -> ArrayView1<f32> {
        self.scores.column(X)
    }

    pub fn y(&self) -> ArrayView1<f32> {
        self.scores.column(Y)
    }

    pub fn mean_gc_score(&self) -> Option<f32> {
        if self.is_empty() {
            None
        } else {
            Some(self.gc_scores().sum() / self.len() as f32)
        }
    }
}

struct Row {
    snp: String,
    sample: String,
    genotype: Genotype,
    scores: [f32; 3],
}

impl Row {
    fn parse(record: &csv::StringRecord) -> Result<Self> {
        let line = record.position().map_or(0, |p| p.line());
        let invalid = |reason: String| Error::InvalidRow { line, reason };

        if record.len() != COLUMNS.len() {
            return Err(invalid(format!(
                "expected {} fields, found {}",
                COLUMNS.len(),
                record.len()
            )));
        }

        let base = |i: usize| {
            Base::from_field(&record[i]).ok_or_else(|| invalid(format!("bad allele {:?}", &record[i])))
        };
        let ab = |i: usize| {
            AbCall::from_field(&record[i]).ok_or_else(|| invalid(format!("bad AB call {:?}", &record[i])))
        };
        let score = |i: usize| {
            record[i]
                .parse::<f32>()
                .map_err(|e| invalid(format!("bad {} {:?}: {}", COLUMNS[i], &record[i], e)))
        };

        Ok(Self {
            snp: record[0].to_string(),
            sample: record[1].to_string(),
            genotype: Genotype {
                forward: (base(2)?, base(3)?),
                top: (base(4)?, base(5)?),
                ab: (ab(6)?, ab(7)?),
            },
            scores: [score(8)?, score(9)?, score(10)?],
        })
    }
}

/// Reads a Final Report back one sample at a time.
///
/// Everything up to and including the line holding `[Data]` is skipped,
/// as is the column header after it. Rows are grouped into samples by
/// consecutive runs of the same Sample ID.
pub struct FinalReportReader<R: Read> {
    records: csv::StringRecordsIntoIter<R>,
    pending: Option<Row>,
}

impl FinalReportReader<File> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_reader(File::open(path)?)
    }
}

impl<R: Read> FinalReportReader<R> {
    pub fn from_reader(reader: R) -> Result<Self> {
        let mut records = csv::ReaderBuilder::new()
            .has_headers(false)
            .delimiter(b'\t')
            .flexible(true)
            .quoting(false)
            .from_reader(reader)
            .into_records();

        loop {
            match records.next() {
                None => return Err(Error::MissingDataSection),
                Some(record) => {
                    if record?.iter().any(|field| field.contains(DATA_SECTION)) {
                        break;
                    }
                }
            }
        }
        // Column header line
        records.next().transpose()?;

        Ok(Self {
            records,
            pending: None,
        })
    }

    /// SNP names of the first sample, in file order
    pub fn map_snps(mut self) -> Result<Vec<String>> {
        Ok(self
            .next()
            .transpose()?
            .map(|sample| sample.snps)
            .unwrap_or_default())
    }

    fn next_row(&mut self) -> Option<Result<Row>> {
        self.records
            .next()
            .map(|record| record.map_err(Error::from).and_then(|r| Row::parse(&r)))
    }
}

impl<R: Read> Iterator for FinalReportReader<R> {
    type Item = Result<FinalReportSample>;

    fn next(&mut self) -> Option<Result<FinalReportSample>> {
        let first = match self.pending.take() {
            Some(row) => row,
            None => match self.next_row()? {
                Ok(row) => row,
                Err(err) => return Some(Err(err)),
            },
        };

        let id = first.sample.clone();
        let mut rows = vec![first];
        loop {
            match self.next_row() {
                None => break,
                Some(Err(err)) => return Some(Err(err)),
                Some(Ok(row)) if row.sample != id => {
                    self.pending = Some(row);
                    break;
                }
                Some(Ok(row)) => rows.push(row),
            }
        }

        let n = rows.len();
        let mut snps = Vec::with_capacity(n);
        let mut genotypes = Vec::with_capacity(n);
        let mut flat = Vec::with_capacity(n * 3);
        for row in rows {
            snps.push(row.snp);
            genotypes.push(row.genotype);
            flat.extend_from_slice(&row.scores);
        }

        Some(
            Array2::from_shape_vec((n, 3), flat)
                .map(|scores| FinalReportSample {
                    id,
                    snps,
                    genotypes,
                    scores,
                })
                .map_err(Error::from),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    const REPORT: &str = "[Header]\n\
        GSGT Version\t2.0.4\n\
        [Data]\n\
        SNP Name\tSample ID\tAllele1 - Forward\tAllele2 - Forward\tAllele1 - Top\tAllele2 - Top\tAllele1 - AB\tAllele2 - AB\tGC Score\tX\tY\n\
        SNP1\tSAM1\tA\tG\tA\tG\tA\tB\t0.9000\t0.100\t0.200\n\
        SNP2\tSAM1\tC\tC\tG\tG\tB\tB\t0.5000\t0.300\t0.400\n\
        SNP1\tSAM2\tT\tT\tA\tA\tA\tA\t0.7000\t0.500\t0.600\n\
        SNP2\tSAM2\tA\tC\tA\tC\tA\tB\t0.1000\t0.700\t0.800\n";

    fn reader(text: &'static str) -> crate::error::Result<FinalReportReader<&'static [u8]>> {
        FinalReportReader::from_reader(text.as_bytes())
    }

    #[test]
    fn test_groups_rows_by_sample() -> std::result::Result<(), Box<dyn Error>> {
        let samples = reader(REPORT)?.collect::<crate::error::Result<Vec<_>>>()?;
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].id, "SAM1");
        assert_eq!(samples[1].id, "SAM2");
        assert_eq!(samples[1].snps, vec!["SNP1", "SNP2"]);
        assert_eq!(samples[0].genotypes[1].forward, (Base::C, Base::C));
        assert_eq!(samples[0].genotypes[0].ab, (AbCall::A, AbCall::B));
        assert_eq!(samples[1].scores.dim(), (2, 3));
        assert_eq!(samples[1].x().to_vec(), vec![0.5, 0.7]);
        assert_eq!(samples[0].gc_scores().to_vec(), vec![0.9, 0.5]);
        let mean = samples[0].mean_gc_score().ok_or("empty sample")?;
        assert!((mean - 0.7).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn test_map_snps_reads_first_sample() -> std::result::Result<(), Box<dyn Error>> {
        assert_eq!(reader(REPORT)?.map_snps()?, vec!["SNP1", "SNP2"]);
        Ok(())
    }

    #[test]
    fn test_empty_data_section() -> std::result::Result<(), Box<dyn Error>> {
        let text = "[Header]\n[Data]\nSNP Name\tSample ID\n";
        assert_eq!(reader(text)?.count(), 0);
        assert!(reader(text)?.map_snps()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_data_section() {
        assert!(matches!(
            reader("[Header]\nSNP1\tSAM1\n"),
            Err(crate::error::Error::MissingDataSection)
        ));
    }

    #[test]
    fn test_invalid_rows() -> std::result::Result<(), Box<dyn Error>> {
        let short = "[Data]\nheader\nSNP1\tSAM1\tA\n";
        match reader(short)?.next() {
            Some(Err(crate::error::Error::InvalidRow { line, .. })) => assert_eq!(line, 3),
            other => panic!("expected invalid row, got {:?}", other),
        }

        let bad_base = "[Data]\nheader\nSNP1\tSAM1\tN\tA\tA\tA\tA\tB\t0.1\t0.2\t0.3\n";
        assert!(matches!(
            reader(bad_base)?.next(),
            Some(Err(crate::error::Error::InvalidRow { .. }))
        ));

        let bad_score = "[Data]\nheader\nSNP1\tSAM1\tA\tA\tA\tA\tA\tB\thigh\t0.2\t0.3\n";
        assert!(matches!(
            reader(bad_score)?.next(),
            Some(Err(crate::error::Error::InvalidRow { .. }))
        ));
        Ok(())
    }

    #[test]
    fn test_reads_generated_report() -> std::result::Result<(), Box<dyn Error>> {
        let panel = Panel::new(3, 40).first_snp_id(5).first_sample_id(9);
        let mut buf = vec![];
        Generator::with_seed(8).write(&mut buf, Format::FinalReport, &panel)?;

        let samples = FinalReportReader::from_reader(buf.as_slice())?
            .collect::<crate::error::Result<Vec<_>>>()?;
        assert_eq!(samples.len(), 3);
        for (sample, id) in samples.iter().zip(panel.sample_ids()) {
            assert_eq!(sample.id, sample_name(id));
            assert_eq!(sample.len(), 40);
            assert_eq!(sample.snps[0], "SNP5");
            assert_eq!(sample.snps[39], "SNP44");
            assert!(sample.scores.iter().all(|s| (0.0..=1.0).contains(s)));
        }
        Ok(())
    }
}
