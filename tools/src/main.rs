use anyhow::Result;
use clap::Parser;
use libmabiao_core::CodeTable;
use std::path::PathBuf;

/// Compile a source code table (TSV or JSON) into the bincode artifact the
/// runtime loads. The output is validated, normalized and sorted, so the
/// engine can search it without any further preparation.
#[derive(Parser)]
struct Args {
    /// Input table file (.tsv/.txt or .json)
    #[arg(long)]
    input: PathBuf,

    /// Output artifact path
    #[arg(long, default_value = "mabiao.bin")]
    out: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let table = CodeTable::load(&args.input)?;
    table.save(&args.out)?;

    println!(
        "compiled {} entries: {} -> {}",
        table.len(),
        args.input.display(),
        args.out.display()
    );
    Ok(())
}
