// src/output.rs
use crate::mc::mc_engine::PriceEstimate;
use std::fs::File;
use std::io::{self, Write};

/// Write one row per estimate, e.g. the rows of a convergence study
pub fn write_estimates_to_csv(filename: &str, estimates: &[PriceEstimate]) -> io::Result<()> {
    let mut file = File::create(filename)?;
    writeln!(
        file,
        "method,paths,price,standard_error,analytical_price,abs_error,beta"
    )?;
    for e in estimates {
        writeln!(
            file,
            "{:?},{},{},{},{},{},{}",
            e.method,
            e.effective_simulation_count,
            e.price,
            e.standard_error,
            e.diagnostics.analytical_price,
            (e.price - e.diagnostics.analytical_price).abs(),
            e.diagnostics.beta.map(|b| b.to_string()).unwrap_or_default()
        )?;
    }
    Ok(())
}

pub fn write_summary_to_csv(filename: &str, summary_data: &[(&str, &str)]) -> io::Result<()> {
    let mut file = File::create(filename)?;
    for (key, value) in summary_data {
        writeln!(file, "{},{}", key, value)?;
    }
    Ok(())
}
