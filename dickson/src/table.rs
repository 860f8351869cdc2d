//! Tables of value sets for many (p, n) pairs and their CSV form.
//!
//! A table row is a [`Record`]. The CSV files have the header
//! `p,n,value_count,is_permutation,values`, where `values` is the sorted,
//! comma-separated list of distinct values (quoted when there is more than
//! one) and `is_permutation` is `True` or `False`.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use itertools::Itertools;

use crate::error::{Error, Result};
use crate::rings::Fp;
use crate::sequence::{Sweep, ValueSet};

/// The table in natural (p, n) order.
pub const VALUES_FILE: &str = "reversed_dickson_values.csv";

/// The table sorted by [`sort_by_cardinality`].
pub const BY_CARDINALITY_FILE: &str = "reversed_dickson_values_by_cardinality.csv";

const HEADER: &str = "p,n,value_count,is_permutation,values";

/// One row of a value table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub p: u64,
    pub n: u64,
    pub value_count: usize,
    pub is_permutation: bool,
    /// The distinct values in increasing order.
    pub values: Vec<u64>,
}

impl From<ValueSet> for Record {
    fn from(vs: ValueSet) -> Self {
        Self {
            p: vs.p(),
            n: vs.n(),
            value_count: vs.cardinality(),
            is_permutation: vs.is_permutation(),
            values: vs.values().iter().copied().collect(),
        }
    }
}

impl Record {
    /// Returns a struct that formats the record as a CSV line.
    pub fn csv(&self) -> CsvRecord<'_> {
        CsvRecord(self)
    }

    fn parse(line: &str) -> std::result::Result<Self, String> {
        let mut fields = line.splitn(5, ',');
        let Some((p, n, count, perm, values)) = fields.next_tuple() else {
            return Err(format!("expected 5 fields: {line}"));
        };

        fn int<T: std::str::FromStr>(name: &str, s: &str) -> std::result::Result<T, String> {
            s.trim().parse().map_err(|_| format!("invalid {name}: '{s}'"))
        }

        let is_permutation = match perm.trim() {
            s if s.eq_ignore_ascii_case("true") => true,
            s if s.eq_ignore_ascii_case("false") => false,
            s => return Err(format!("invalid is_permutation: '{s}'")),
        };

        let values = values.trim();
        let values = values
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(values);
        let values: Vec<u64> = values
            .split(',')
            .map(|v| int("value", v))
            .collect::<std::result::Result<_, _>>()?;

        let record = Self {
            p: int("p", p)?,
            n: int("n", n)?,
            value_count: int("value_count", count)?,
            is_permutation,
            values,
        };

        let p = Fp::new(record.p).map_err(|e| e.to_string())?.modulus();
        if let Some(v) = record.values.iter().find(|&&v| v >= p) {
            return Err(format!("value {v} is not a residue mod {p}"));
        }

        if record.value_count != record.values.len() {
            return Err(format!(
                "value_count is {} but {} values are listed",
                record.value_count,
                record.values.len()
            ));
        }

        Ok(record)
    }
}

pub struct CsvRecord<'a>(&'a Record);

impl std::fmt::Display for CsvRecord<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let r = self.0;
        let perm = if r.is_permutation { "True" } else { "False" };
        write!(f, "{},{},{},{perm},", r.p, r.n, r.value_count)?;
        match &r.values[..] {
            [v] => write!(f, "{v}"),
            values => write!(f, "\"{}\"", values.iter().join(",")),
        }
    }
}

/// The records for one prime, for `n` in `0..p^2`.
pub fn records_for(r: &Fp) -> impl Iterator<Item = Record> + '_ {
    let end = r.modulus() * r.modulus();
    Sweep::new(r)
        .take_while(move |vs| vs.n() < end)
        .map(Record::from)
}

/// Generates the table for the given primes, in natural (p, n) order.
///
/// Fails if one of the numbers is not a prime.
pub fn generate(primes: &[u64]) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for &p in primes {
        let r = Fp::new(p)?;
        records.extend(records_for(&r));
    }
    Ok(records)
}

/// Sorts by `value_count` (descending), then `p` and `n` (ascending).
pub fn sort_by_cardinality(records: &mut [Record]) {
    records.sort_by(|a, b| {
        b.value_count.cmp(&a.value_count)
            .then(a.p.cmp(&b.p))
            .then(a.n.cmp(&b.n))
    });
}

/// Writes the records to a CSV file.
/// Missing parent directories are created.
pub fn write_csv(path: &Path, records: &[Record]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }

    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut w = BufWriter::new(file);
    let mut write = || -> std::io::Result<()> {
        writeln!(w, "{HEADER}")?;
        for record in records {
            writeln!(w, "{}", record.csv())?;
        }
        w.flush()
    };
    write().map_err(|e| Error::io(path, e))
}

/// Reads the records from a CSV file written by [`write_csv`].
pub fn read_csv(path: &Path) -> Result<Vec<Record>> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    read_records(BufReader::new(file), path)
}

fn read_records<B: BufRead>(reader: B, path: &Path) -> Result<Vec<Record>> {
    let csv_error = |line, message| Error::Csv {
        path: path.to_owned(),
        line,
        message,
    };

    let mut lines = reader.lines().enumerate();
    match lines.next() {
        Some((_, Ok(header))) if header.trim() == HEADER => {},
        Some((_, Ok(header))) => {
            return Err(csv_error(1, format!("unexpected header: {header}")));
        },
        Some((_, Err(e))) => return Err(Error::io(path, e)),
        None => return Err(csv_error(1, "missing header".to_owned())),
    }

    let mut records = Vec::new();
    for (i, line) in lines {
        let line = line.map_err(|e| Error::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let record = Record::parse(&line).map_err(|m| csv_error(i + 1, m))?;
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod test {
    use super::*;

    fn table() -> Vec<Record> {
        generate(&[3, 5]).unwrap()
    }

    #[test]
    fn natural_order() {
        let records = table();
        assert_eq!(records.len(), 9 + 25);
        assert_eq!((records[0].p, records[0].n), (3, 0));
        assert_eq!((records[8].p, records[8].n), (3, 8));
        assert_eq!((records[9].p, records[9].n), (5, 0));
        assert_eq!(records[9].values, [2]);
        assert_eq!(records[10].values, [1]);
        let last = records.last().unwrap();
        assert_eq!((last.p, last.n, &last.values[..]), (5, 24, &[1, 2][..]));
    }

    #[test]
    fn rejects_composite() {
        assert!(matches!(generate(&[5, 9]), Err(Error::NotPrime(9))));
    }

    #[test]
    fn cardinality_order() {
        let mut records = table();
        sort_by_cardinality(&mut records);
        assert!(records.windows(2).all(|w| {
            let (a, b) = (&w[0], &w[1]);
            a.value_count > b.value_count
                || a.value_count == b.value_count && (a.p, a.n) < (b.p, b.n)
        }));
        assert!(records[0].is_permutation);
        assert_eq!(records[0].p, 5);
    }

    #[test]
    fn csv_lines() {
        let records = table();
        assert_eq!(records[9].csv().to_string(), "5,0,1,False,2");
        assert_eq!(records[33].csv().to_string(), "5,24,2,False,\"1,2\"");
        let perm = records.iter().find(|r| r.p == 5 && r.n == 2).unwrap();
        assert_eq!(perm.csv().to_string(), "5,2,5,True,\"0,1,2,3,4\"");
    }

    #[test]
    fn csv_file() {
        let dir = std::env::temp_dir().join(format!("dickson-table-{}", std::process::id()));
        let path = dir.join("nested").join(VALUES_FILE);
        let records = table();
        write_csv(&path, &records).unwrap();
        assert_eq!(read_csv(&path).unwrap(), records);
        std::fs::remove_dir_all(&dir).unwrap();

        let err = read_csv(&path).unwrap_err();
        assert!(err.is_not_found(), "{err}");
    }

    #[test]
    fn malformed_lines() {
        let path = Path::new("table.csv");
        let read = |s: &str| read_records(s.as_bytes(), path);

        assert!(read(&format!("{HEADER}\n7,3,1,true,1\n\n")).is_ok());
        assert!(matches!(read(""), Err(Error::Csv { line: 1, .. })));
        assert!(matches!(read("a,b\n"), Err(Error::Csv { line: 1, .. })));
        assert!(matches!(
            read(&format!("{HEADER}\n7,3,1,True,1\n7,4,2,True,1\n")),
            Err(Error::Csv { line: 3, .. })
        ));
        assert!(matches!(
            read(&format!("{HEADER}\n7,x,1,True,1\n")),
            Err(Error::Csv { line: 2, .. })
        ));
        assert!(matches!(
            read(&format!("{HEADER}\n7,3,1,maybe,1\n")),
            Err(Error::Csv { line: 2, .. })
        ));

        // The prime column has to be a usable modulus, and the values
        // residues mod p.
        for row in ["0,1,2,False,\"1,2\"", "9,1,1,False,1", "5,1,1,False,5"] {
            assert!(
                matches!(read(&format!("{HEADER}\n{row}\n")), Err(Error::Csv { line: 2, .. })),
                "{row}"
            );
        }
    }
}
