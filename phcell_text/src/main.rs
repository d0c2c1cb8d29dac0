use std::{
    fs::File,
    io::{self, BufReader, BufWriter},
    path::PathBuf,
};

use clap::Parser;
use log::info;
use ordered_float::NotNan;
use phcell::{
    complex::{CellComplex, SimplicialComplex},
    filtration::Filtration, homology::PersistentHomology,
    reduction::ReductionAlgorithm,
};
use phcell_text::{read_filtration, write_boundary_matrix, write_intervals, TextError};

/// Computes Betti numbers and persistence intervals of a filtered simplicial complex.
///
/// The input has one cell per line, vertices followed by the filtration value, e.g. `0,1,0.5`.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Serialized filtration, read from stdin if omitted
    input: Option<PathBuf>,
    /// Compute reduced homology
    #[arg(long)]
    reduced: bool,
    #[arg(long, default_value_t = ReductionAlgorithm::Standard)]
    algorithm: ReductionAlgorithm,
    /// Keep intervals of length zero
    #[arg(long)]
    length0: bool,
    /// Also write the boundary matrix to this file
    #[arg(long, value_name = "PATH")]
    dump_boundary: Option<PathBuf>,
    /// Write zero-based row indices in the boundary dump
    #[arg(long, requires = "dump_boundary")]
    zero_based: bool,
}

type CliFiltration = Filtration<NotNan<f64>, SimplicialComplex<i64>>;

pub fn main() -> Result<(), TextError> {
    env_logger::init();
    let args = Args::parse();

    let filtration: CliFiltration = match &args.input {
        Some(path) => read_filtration(BufReader::new(File::open(path)?))?,
        None => read_filtration(io::stdin().lock())?,
    };
    info!(
        "Read {} cells up to dimension {}",
        filtration.len(),
        filtration.complex().dimension()
    );

    let mut homology = PersistentHomology::new(filtration, args.algorithm, args.reduced);

    if let Some(path) = &args.dump_boundary {
        let writer = BufWriter::new(File::create(path)?);
        write_boundary_matrix(homology.boundary_matrix()?, writer, args.zero_based)?;
        info!("Wrote boundary matrix to {}", path.display());
    }

    println!("Betti numbers:");
    for result in homology.betti_numbers() {
        let (dim, beta) = result?;
        println!(" dim={dim}: {beta}");
    }

    println!("\nIntervals:");
    let intervals = homology.intervals(args.length0)?;
    write_intervals(&intervals, io::stdout().lock())?;

    Ok(())
}
