use clap::Parser;
use snp_fixtures::prelude::*;
use std::error::Error;
use tracing_subscriber::EnvFilter;

/// Generate synthetic SNP genotyping files for use as test fixtures.
#[derive(Debug, Parser)]
#[command(author, version, about = "Synthetic genotyping fixture generator")]
struct Args {
    /// Output file, or the file name prefix when --files is greater than 1
    file_name: String,

    number_of_samples: u64,

    /// Number of SNPs per sample
    map_size: u64,

    #[arg(default_value_t = 1)]
    start_snps_from_id: u64,

    #[arg(default_value_t = 1)]
    start_samples_from_id: u64,

    /// fr, vcf, 0125map, 0125ped, plmap, plped or ids
    #[arg(long, default_value = "fr")]
    format: Format,

    /// Number of files to generate; ids continue across files
    #[arg(short = 'k', long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    files: u64,

    /// Seed for reproducible output. Omitted means system entropy.
    #[arg(long)]
    seed: Option<u64>,
}

impl Args {
    fn panel(&self) -> Panel {
        Panel::new(self.number_of_samples, self.map_size)
            .first_snp_id(self.start_snps_from_id)
            .first_sample_id(self.start_samples_from_id)
    }
}

fn main() {
    init_tracing();
    if let Err(err) = try_main() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn try_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    run(&args)
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let mut generator = match args.seed {
        Some(seed) => Generator::with_seed(seed),
        None => Generator::new(),
    };
    let title = args.format.title();
    let panel = args.panel();

    if args.files == 1 {
        println!(
            "Generating {} File ({}): {} samples, {}SNPs",
            title, args.file_name, args.number_of_samples, args.map_size
        );
        let size = generator.generate(&args.file_name, args.format, &panel)?;
        println!("Generated {} File: {:.6}MB", title, megabytes(size));
    } else {
        println!(
            "Generating {} {} Files ({}_*.{}): {} samples, {}SNPs each",
            args.files,
            title,
            args.file_name,
            args.format.extension(),
            args.number_of_samples,
            args.map_size
        );
        generator.generate_batch(&args.file_name, args.format, &panel, args.files, |event| match event {
            BatchProgress::Started(path) => println!("Generating {}...", path.display()),
            BatchProgress::Written(path, size) => {
                println!("Generated {} File ({}): {:.6}MB", title, path.display(), megabytes(size))
            }
        })?;
    }
    Ok(())
}
