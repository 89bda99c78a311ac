//! Readers for the comma separated reference model tables distributed
//! by the IRIS Earth Model Collaboration.
//!
//! | model  | columns                                                     |
//! |--------|-------------------------------------------------------------|
//! | AK135F | depth, density, vp, vs, Qκ, Qμ                              |
//! | PREM   | radius, depth, density, vpv, vph, vsv, vsh, η, Qμ, Qκ       |
//! | IASP91 | depth, radius, vp, vs                                       |
//!
//! PREM is reduced to an isotropic model by averaging the vertically
//! and horizontally polarized velocities. IASP91 carries no density;
//! see [`Iasp91Table::with_density_from`].

use crate::{ModelError, ReferenceModel};
use log::debug;
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

/// Reads an AK135F table.
pub fn read_ak135<R: Read>(rdr: R) -> Result<ReferenceModel, ModelError> {
    let (mut depth, mut vp, mut vs, mut rho) = (Vec::new(), Vec::new(), Vec::new(), Vec::new());
    for row in csv_rows(rdr, 4) {
        let row = row?;
        depth.push(row[0]);
        rho.push(row[1]);
        vp.push(row[2]);
        vs.push(row[3]);
    }
    ReferenceModel::new(depth, vp, vs, rho)
}

/// Reads a PREM table.
pub fn read_prem<R: Read>(rdr: R) -> Result<ReferenceModel, ModelError> {
    let (mut depth, mut vp, mut vs, mut rho) = (Vec::new(), Vec::new(), Vec::new(), Vec::new());
    for row in csv_rows(rdr, 7) {
        let row = row?;
        depth.push(row[1]);
        rho.push(row[2]);
        vp.push((row[3] + row[4]) / 2.0);
        vs.push((row[5] + row[6]) / 2.0);
    }
    ReferenceModel::new(depth, vp, vs, rho)
}

/// An IASP91 table, which has velocities but no density.
#[derive(Debug, Clone, PartialEq)]
pub struct Iasp91Table {
    pub depth: Vec<f64>,
    pub radius: Vec<f64>,
    pub vp: Vec<f64>,
    pub vs: Vec<f64>,
}

impl Iasp91Table {
    /// Returns a full reference model whose density is linearly
    /// interpolated from `density_model` (typically PREM) at this
    /// table's depths.
    pub fn with_density_from(
        self,
        density_model: &ReferenceModel,
    ) -> Result<ReferenceModel, ModelError> {
        let rho = self
            .depth
            .iter()
            .map(|&d| density_model.value_at(d).rho)
            .collect();
        ReferenceModel::new(self.depth, self.vp, self.vs, rho)
    }
}

/// Reads an IASP91 table.
pub fn read_iasp91<R: Read>(rdr: R) -> Result<Iasp91Table, ModelError> {
    let mut table = Iasp91Table {
        depth: Vec::new(),
        radius: Vec::new(),
        vp: Vec::new(),
        vs: Vec::new(),
    };
    for row in csv_rows(rdr, 4) {
        let row = row?;
        table.depth.push(row[0]);
        table.radius.push(row[1]);
        table.vp.push(row[2]);
        table.vs.push(row[3]);
    }
    Ok(table)
}

pub fn read_ak135_file<P: AsRef<Path>>(path: P) -> Result<ReferenceModel, ModelError> {
    read_ak135(open(path)?)
}

pub fn read_prem_file<P: AsRef<Path>>(path: P) -> Result<ReferenceModel, ModelError> {
    read_prem(open(path)?)
}

pub fn read_iasp91_file<P: AsRef<Path>>(path: P) -> Result<Iasp91Table, ModelError> {
    read_iasp91(open(path)?)
}

pub(crate) fn open<P: AsRef<Path>>(path: P) -> Result<BufReader<File>, ModelError> {
    debug!("loading {:?}", path.as_ref());
    Ok(BufReader::new(File::open(path)?))
}

/// Yields the leading `min_cols` numeric fields of every record in a
/// headerless comma separated table.
fn csv_rows<R: Read>(
    rdr: R,
    min_cols: usize,
) -> impl Iterator<Item = Result<Vec<f64>, ModelError>> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(rdr)
        .into_records()
        .map(move |record| {
            let record = record?;
            let line_no = record.position().map_or(0, |pos| pos.line() as usize);
            parse_fields(record.iter(), line_no, min_cols)
        })
}

/// Yields the leading `min_cols` numeric fields of every non-blank,
/// whitespace separated line after the first `skip` lines.
pub(crate) fn whitespace_rows<R: BufRead>(
    rdr: R,
    skip: usize,
    min_cols: usize,
) -> impl Iterator<Item = Result<Vec<f64>, ModelError>> {
    rdr.lines()
        .enumerate()
        .skip(skip)
        .filter_map(move |(idx, line)| {
            let line = match line {
                Ok(line) => line,
                Err(e) => return Some(Err(ModelError::Io(e))),
            };
            if line.trim().is_empty() {
                return None;
            }
            Some(parse_fields(line.split_whitespace(), idx + 1, min_cols))
        })
}

fn parse_fields<'a>(
    fields: impl Iterator<Item = &'a str>,
    line_no: usize,
    min_cols: usize,
) -> Result<Vec<f64>, ModelError> {
    let fields: Vec<&str> = fields.collect();
    if fields.len() < min_cols {
        return Err(ModelError::Parse {
            line: line_no,
            msg: format!("expected at least {min_cols} columns, found {}", fields.len()),
        });
    }
    fields[..min_cols]
        .iter()
        .map(|field| {
            field.parse::<f64>().map_err(|e| ModelError::Parse {
                line: line_no,
                msg: format!("'{field}': {e}"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{read_ak135, read_iasp91, read_prem};
    use crate::ModelError;
    use approx::assert_relative_eq;

    const AK135: &str = "\
0.00,2.72,5.8,3.46,1340,600
20.00,2.72,5.8,3.46,1340,600
20.01,2.92,6.5,3.85,1340,600

35.00,2.92,6.5,3.85,1340,600
";

    const PREM: &str = "\
6371.0,0.0,2.6,5.8,5.8,3.2,3.2,1.0,600,57823
6356.0,15.0,2.6,5.8,5.8,3.2,3.2,1.0,600,57823
6346.6,24.4,3.38,7.9,8.0,4.4,4.6,0.9,600,57823
";

    const IASP91: &str = "\
0.0,6371.0,5.8,3.36
20.0,6351.0,6.5,3.75
";

    #[test]
    fn test_read_ak135() {
        let model = read_ak135(AK135.as_bytes()).unwrap();
        assert_eq!(model.len(), 4);
        assert_eq!(model.depth(), &[0.0, 20.0, 20.01, 35.0]);
        assert_eq!(model.rho()[2], 2.92);
        assert_eq!(model.vs()[3], 3.85);
    }

    #[test]
    fn test_read_prem_averages_polarizations() {
        let model = read_prem(PREM.as_bytes()).unwrap();
        assert_relative_eq!(model.vp()[2], 7.95);
        assert_relative_eq!(model.vs()[2], 4.5);
        assert_eq!(model.depth()[2], 24.4);
    }

    #[test]
    fn test_iasp91_density_from_prem() {
        let prem = read_prem(PREM.as_bytes()).unwrap();
        let model = read_iasp91(IASP91.as_bytes())
            .unwrap()
            .with_density_from(&prem)
            .unwrap();
        assert_eq!(model.rho()[0], 2.6);
        // 20 km sits between PREM's 15 km and 24.4 km rows.
        assert_relative_eq!(
            model.rho()[1],
            2.6 + (3.38 - 2.6) * 5.0 / 9.4,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_bad_row_reports_line() {
        let err = read_ak135("0.0,2.7,5.8,3.4\n1.0,2.7,oops,3.4\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ModelError::Parse { line: 2, .. }));

        let err = read_ak135("0.0,2.7\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ModelError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_fields_are_trimmed() {
        let text = " 0.0 , 6371.0,5.8 ,3.36\n\n20.0,6351.0, 6.5,3.75\n";
        let model = read_iasp91(text.as_bytes()).unwrap();
        assert_eq!(model.depth, vec![0.0, 20.0]);
        assert_eq!(model.vp, vec![5.8, 6.5]);
    }
}
