use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use anyhow::Context;
use structopt::StructOpt;
use seqgrid::axis::GridAxes;
use seqgrid::config::Config;
use seqgrid::grid::writer::{ramp_stack, RecordWriter};
use seqgrid::handoff::HandOff;
use seqgrid::{accepted_lengths, decode, ByteOrder, ByteSource, GridSpec, RecordLayout};

#[macro_use] extern crate log;

#[derive(Debug, StructOpt)]
#[structopt(name = "seqgrid", about = "Decode grids written with Fortran sequential unformatted I/O")]
struct Cli {
    /// config file
    #[structopt(long = "config", short = "c", default_value = "config.yaml")]
    config_file: String,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Decode a grid file and write the JSON hand-off document
    Decode {
        #[structopt(parse(from_os_str))]
        file: PathBuf,
        /// stdout when absent
        #[structopt(long, short, parse(from_os_str))]
        output: Option<PathBuf>,
        #[structopt(flatten)]
        overrides: Overrides,
    },
    /// Print the byte length each layout accepts, and which one a file matches
    Layouts {
        #[structopt(parse(from_os_str))]
        file: Option<PathBuf>,
        #[structopt(flatten)]
        overrides: Overrides,
    },
    /// Write a synthetic grid file (field k holds 1000 * k + i)
    Synth {
        #[structopt(parse(from_os_str))]
        file: PathBuf,
        /// marked, header, raw, offset or offset:N
        #[structopt(long, default_value = "marked")]
        layout: RecordLayout,
        #[structopt(flatten)]
        overrides: Overrides,
    },
}

#[derive(Debug, StructOpt)]
struct Overrides {
    #[structopt(long)]
    nx: Option<usize>,
    #[structopt(long)]
    ny: Option<usize>,
    #[structopt(long = "fields")]
    field_count: Option<usize>,
    #[structopt(long, conflicts_with = "little-endian")]
    big_endian: bool,
    #[structopt(long)]
    little_endian: bool,
    #[structopt(long)]
    flip_rows: bool,
    /// first longitude
    #[structopt(long, allow_hyphen_values = true)]
    lon_start: Option<f64>,
    #[structopt(long, allow_hyphen_values = true)]
    lon_step: Option<f64>,
    /// first latitude
    #[structopt(long, allow_hyphen_values = true)]
    lat_start: Option<f64>,
    #[structopt(long, allow_hyphen_values = true)]
    lat_step: Option<f64>,
}

impl Overrides {
    /// `--nx` and `--ny` resize the matching axis as well.
    fn apply(&self, config: &Config) -> (GridSpec, GridAxes) {
        let mut spec: GridSpec = (&config.decoder).into();
        let mut axes = config.axes;

        if let Some(nx) = self.nx {
            spec.nx = nx;
            axes.lon.count = nx;
        }
        if let Some(ny) = self.ny {
            spec.ny = ny;
            axes.lat.count = ny;
        }
        if let Some(start) = self.lon_start {
            axes.lon.start = start;
        }
        if let Some(step) = self.lon_step {
            axes.lon.step = step;
        }
        if let Some(start) = self.lat_start {
            axes.lat.start = start;
        }
        if let Some(step) = self.lat_step {
            axes.lat.step = step;
        }
        if let Some(field_count) = self.field_count {
            spec.field_count = field_count;
        }
        if self.big_endian {
            spec.byte_order = ByteOrder::BigEndian;
        } else if self.little_endian {
            spec.byte_order = ByteOrder::LittleEndian;
        }
        if self.flip_rows {
            spec.flip_rows = true;
        }

        (spec, axes)
    }
}

fn main() {

    std::env::var("RUST_LOG").map_err(|_| {
        std::env::set_var("RUST_LOG", "error,seqgrid=info");
    }).unwrap_or_default();
    env_logger::init();

    let args = Cli::from_args();

    if let Err(e) = run(args) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Cli) -> anyhow::Result<()> {
    let config: Config = confy::load_path(Path::new(&args.config_file))
        .with_context(|| format!("Error loading config `{}`", args.config_file))?;

    match args.command {
        Command::Decode { file, output, overrides } => {
            let (spec, axes) = overrides.apply(&config);
            let source = ByteSource::from_path(&file).with_context(|| format!("Error reading {:?}", file))?;

            let (stack, report) = decode(&source, &spec).with_context(|| format!("Error decoding {:?}", file))?;
            report.log();

            let handoff = HandOff::build(&spec, &stack, &report, &axes, &config.times)?;
            match output {
                Some(path) => {
                    handoff.write_json(BufWriter::new(File::create(&path)?))?;
                    info!("{} fields written to {:?}", handoff.fields.len(), path);
                }
                None => {
                    let mut stdout = io::stdout().lock();
                    handoff.write_json(&mut stdout)?;
                    writeln!(stdout)?;
                }
            }
        }
        Command::Layouts { file, overrides } => {
            let (spec, _) = overrides.apply(&config);

            for length in accepted_lengths(&spec)? {
                println!("{}", length);
            }

            if let Some(file) = file {
                let source = ByteSource::from_path(&file).with_context(|| format!("Error reading {:?}", file))?;
                match decode(&source, &spec) {
                    Ok((_, report)) => println!("{:?} : {} bytes, {}, {} left over", file, source.len(), report.layout, report.bytes_leftover),
                    Err(e) => println!("{:?} : {}", file, e),
                }
            }
        }
        Command::Synth { file, layout, overrides } => {
            let (spec, _) = overrides.apply(&config);
            spec.validate()?;

            let stack = ramp_stack(spec.nx, spec.ny, spec.field_count);
            RecordWriter::for_spec(&spec).write_to(BufWriter::new(File::create(&file)?), &stack, layout)?;

            info!("{} fields of {}x{} written to {:?} as {}", stack.len(), spec.nx, spec.ny, file, layout);
        }
    }

    Ok(())
}
