//! `dickson`: generates and analyzes value tables of the reversed Dickson
//! polynomials D_n(1, x) mod p.
//!
//! `dickson generate` writes the tables, most other commands read them.

use std::path::{Path, PathBuf};
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};
use itertools::Itertools;

use dickson::fit::{derive_series, fit_polynomial};
use dickson::pattern::{
    self, IndexMap, Pattern, cardinality_two_indices, check_patterns, divisibility,
    exhaustive_cardinality_two, residual_hypothesis, residual_indices, verify_formulas,
    verify_value_sets,
};
use dickson::plot::{cardinality_chart, indices_chart};
use dickson::primes::odd_primes;
use dickson::rings::Fp;
use dickson::sequence::dickson_poly;
use dickson::table::{self, BY_CARDINALITY_FILE, Record, VALUES_FILE};
use dickson::{Error, compute_value_set};

/// Value sets of the reversed Dickson polynomials over prime fields.
#[derive(Parser)]
#[command(name = "dickson", version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute the value sets for all odd primes in a range and n < p^2 and
    /// write them to the data directory.
    Generate {
        #[arg(long, default_value_t = 3)]
        min_prime: u64,
        #[arg(long, default_value_t = 97)]
        max_prime: u64,
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
        /// Also print every record.
        #[arg(long)]
        print: bool,
    },

    /// Print the value set of D_n(1, x) mod p.
    ValueSet { p: u64, n: u64 },

    /// Print the polynomial D_n(1, x) mod p.
    Poly { p: u64, n: u64 },

    /// Print the indices with exactly two values, by prime.
    Indices {
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },

    /// Check the value sets at the three closed-form indices.
    VerifySets {
        #[arg(long, value_delimiter = ',', default_values_t = [5, 7, 11, 13, 17, 19, 23])]
        primes: Vec<u64>,
        /// Also check that no other n < p^2 has exactly two values.
        #[arg(long)]
        exhaustive: bool,
    },

    /// Check for (p^2 + 1)/2 and a multiple of (p^2 - 1)/2 in the table.
    VerifyPatterns {
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },

    /// Compare the table with all three closed forms.
    VerifyFormulas {
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },

    /// Print the indices not explained by the first two patterns.
    Residual {
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
        /// Include twin primes.
        #[arg(long)]
        all_primes: bool,
    },

    /// Fit polynomials n(p) to the indices of each pattern.
    Derive {
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
        #[arg(long = "degree", default_values_t = [2, 3])]
        degrees: Vec<usize>,
    },

    /// Draw the charts as SVG.
    Plot {
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
        #[arg(long, default_value = "output/plots")]
        out_dir: PathBuf,
        /// Also draw cardinality against n for every prime.
        #[arg(long)]
        scatter: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let passed = match args.command {
        Command::Generate { min_prime, max_prime, data_dir, print } => {
            generate(min_prime, max_prime, &data_dir, print)?
        },
        Command::ValueSet { p, n } => {
            let vs = compute_value_set(n, p)?;
            println!("D_{n}(1, x) mod {p} = {{{}}}", vs.values().iter().join(", "));
            println!("Cardinality: {}", vs.cardinality());
            println!("Permutation: {}", vs.is_permutation());
            true
        },
        Command::Poly { p, n } => {
            let r = Fp::new(p)?;
            println!("D_{n}(1, x) = {} (mod {p})", dickson_poly(n, &r));
            true
        },
        Command::Indices { data_dir } => with_groups(&data_dir, print_indices)?,
        Command::VerifySets { primes, exhaustive } => verify_sets(&primes, exhaustive)?,
        Command::VerifyPatterns { data_dir } => with_groups(&data_dir, verify_patterns)?,
        Command::VerifyFormulas { data_dir } => with_groups(&data_dir, print_formula_report)?,
        Command::Residual { data_dir, all_primes } => {
            with_groups(&data_dir, |groups| print_residuals(groups, all_primes))?
        },
        Command::Derive { data_dir, degrees } => {
            with_groups(&data_dir, |groups| derive(groups, &degrees))?
        },
        Command::Plot { data_dir, out_dir, scatter } => plot(&data_dir, &out_dir, scatter)?,
    };

    if !passed {
        eprintln!("Some checks failed.");
        process::exit(1);
    }

    Ok(())
}

fn generate(min_prime: u64, max_prime: u64, data_dir: &Path, print: bool) -> Result<bool> {
    let primes = odd_primes(min_prime..=max_prime);
    println!("Generating value sets for {} primes...", primes.len());

    let mut records = Vec::new();
    for &p in &primes {
        let r = Fp::new(p)?;
        let start = records.len();
        records.extend(table::records_for(&r));
        if print {
            for record in &records[start..] {
                println!("{}", record.csv());
            }
        }
        println!("p = {p}: {} indices", records.len() - start);
    }

    let path = data_dir.join(VALUES_FILE);
    table::write_csv(&path, &records)?;
    println!("Wrote {}", path.display());

    table::sort_by_cardinality(&mut records);
    let path = data_dir.join(BY_CARDINALITY_FILE);
    table::write_csv(&path, &records)?;
    println!("Wrote {}", path.display());

    Ok(true)
}

/// Reads the table in natural order. A missing file is reported and
/// results in `None`.
fn load(data_dir: &Path) -> Result<Option<Vec<Record>>> {
    let path = data_dir.join(VALUES_FILE);
    match table::read_csv(&path) {
        Ok(records) => Ok(Some(records)),
        Err(e) if e.is_not_found() => {
            println!(
                "Error: '{}' not found. Run `dickson generate` first.",
                path.display()
            );
            Ok(None)
        },
        Err(e) => Err(e.into()),
    }
}

/// Runs `f` on the cardinality-2 indices of the table, if there is one.
fn with_groups(data_dir: &Path, f: impl FnOnce(&IndexMap) -> Result<bool>) -> Result<bool> {
    let Some(records) = load(data_dir)? else {
        return Ok(true);
    };
    let groups = cardinality_two_indices(&records);
    if groups.is_empty() {
        println!("No indices with exactly two values in the table.");
        return Ok(true);
    }
    f(&groups)
}

fn print_indices(groups: &IndexMap) -> Result<bool> {
    println!("Indices n with exactly two values\n");
    for (&p, ns) in groups {
        println!("p = {p}: n = [{}]", ns.iter().join(", "));
        for &n in ns {
            let d = divisibility(p, n);
            let mut notes = Vec::new();
            if d.p_plus_one {
                notes.push(format!("divisible by p + 1 = {}", p + 1));
            }
            if d.p_minus_one {
                notes.push(format!("divisible by p - 1 = {}", p - 1));
            }
            if !notes.is_empty() {
                println!("  n = {n}: {}", notes.join(", "));
            }
        }
    }
    Ok(true)
}

fn verify_sets(primes: &[u64], exhaustive: bool) -> Result<bool> {
    let mut passed = true;
    for &p in primes {
        let r = Fp::new(p)?;
        let Some(checks) = verify_value_sets(&r) else {
            println!("p = {p}: skipped, the closed forms need p > 3");
            continue;
        };

        println!("p = {p}:");
        for check in &checks {
            let status = if check.passed() { "PASS" } else { "FAIL" };
            println!(
                "  [{status}] n = {} ({}): {{{}}}, expected {{{}}}",
                check.actual.n(),
                check.pattern.formula(),
                check.actual.values().iter().join(", "),
                check.expected.iter().join(", "),
            );
            passed &= check.passed();
        }

        if exhaustive {
            let found = exhaustive_cardinality_two(&r);
            let expected: Vec<u64> = Pattern::ALL.iter().map(|pat| pat.index(p)).sorted().collect();
            let ok = found == expected;
            let status = if ok { "PASS" } else { "FAIL" };
            println!("  [{status}] all n < p^2 with two values: [{}]", found.iter().join(", "));
            passed &= ok;
        }
    }
    Ok(passed)
}

fn verify_patterns(groups: &IndexMap) -> Result<bool> {
    let mut passed = true;
    for check in check_patterns(groups) {
        let p = check.p;
        println!("p = {p}: n = [{}]", check.observed.iter().join(", "));

        match check.half_square_plus_one {
            None => println!("  [SKIP] (p^2 + 1)/2 is not checked for p <= 3"),
            Some(found) => {
                let status = if found { "PASS" } else { "FAIL" };
                println!(
                    "  [{status}] n = (p^2 + 1)/2 = {}",
                    Pattern::HalfSquarePlusOne.index(p)
                );
                passed &= found;
            },
        }

        match check.multiple {
            Some((n, k)) => println!("  [PASS] n = {n} = {k} * (p^2 - 1)/2"),
            None => {
                println!("  [FAIL] no multiple of (p^2 - 1)/2 = {}", (p * p - 1) / 2);
                passed = false;
            },
        }
    }
    Ok(passed)
}

fn print_formula_report(groups: &IndexMap) -> Result<bool> {
    let report = verify_formulas(groups);
    println!("Checked {} primes p > 3.", report.primes_checked);

    for m in &report.mismatches {
        println!(
            "[FAIL] p = {}: n = [{}], expected [{}]",
            m.p,
            m.actual.iter().join(", "),
            m.expected.iter().join(", ")
        );
    }

    for a in &report.accuracy {
        println!("{}: {} primes, RMSE {:.4}", a.pattern, a.pairs, a.rmse());
    }

    if report.passed() {
        println!("All formulas are exact.");
    }
    Ok(report.passed())
}

fn print_residuals(groups: &IndexMap, all_primes: bool) -> Result<bool> {
    let residuals = residual_indices(groups, !all_primes);
    if residuals.is_empty() {
        println!("No remaining indices.");
        return Ok(true);
    }

    for (&p, ns) in &residuals {
        for &n in ns {
            println!("p = {p}: remaining n = {n}");
            let guess = residual_hypothesis(p);
            if n == guess {
                println!("  [PASS] n = (p^2 - p + 2)/2 = {guess}");
            } else {
                println!("  [FAIL] (p^2 - p + 2)/2 = {guess}");
            }
            if pattern::general_case(p) && n == Pattern::HalfSquarePlusTwoP.index(p) {
                println!("  n = {}", Pattern::HalfSquarePlusTwoP.formula());
            }
        }
    }

    // The hypothesis is exploratory, a miss is not a failure.
    Ok(true)
}

fn derive(groups: &IndexMap, degrees: &[usize]) -> Result<bool> {
    for (name, points) in derive_series(groups) {
        println!("--- {name} ---");
        if points.is_empty() {
            println!("No data points to fit.\n");
            continue;
        }
        println!("Data points: {}", points.len());
        for &degree in degrees {
            match fit_polynomial(&points, degree) {
                Ok(fit) => println!(
                    "Degree {degree}: n(p) = {}, RMSE {:.4}",
                    fit.poly.display("p"),
                    fit.rmse()
                ),
                Err(e @ Error::UnderdeterminedFit { .. }) => println!("Degree {degree}: {e}"),
                Err(e) => return Err(e.into()),
            }
        }
        println!();
    }
    Ok(true)
}

fn plot(data_dir: &Path, out_dir: &Path, scatter: bool) -> Result<bool> {
    let Some(records) = load(data_dir)? else {
        return Ok(true);
    };

    let path = out_dir.join("cardinality_2_indices.svg");
    indices_chart(&cardinality_two_indices(&records)).save(&path)?;
    println!("Wrote {}", path.display());

    if scatter {
        for p in records.iter().map(|r| r.p).dedup() {
            let path = out_dir.join(format!("scatter_p_{p}.svg"));
            cardinality_chart(p, &records).save(&path)?;
        }
        println!("Scatter plots written to {}", out_dir.display());
    }

    Ok(true)
}
