use std::{path::PathBuf, str::FromStr};

use cgmath::Vector3;
use clap::ValueHint;

#[derive(Debug, clap::Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Logging output filters; comma-separated
    #[arg(short, long, default_value = "info", env = "SCONE_LOG", global = true)]
    pub log_filter: String,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Convert GLB files and BGL packages into one AC3D model
    Convert {
        /// Files or directories to convert
        #[arg(num_args = 1.., required = true, value_hint = ValueHint::AnyPath)]
        inputs: Vec<PathBuf>,
        /// AC3D file to write; textures are copied next to it
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: PathBuf,
        /// Directory searched for texture files
        #[arg(short, long, env = "SCONE_TEXTURES", value_hint = ValueHint::DirPath)]
        textures: Option<PathBuf>,
        /// Search input directories recursively
        #[arg(short, long)]
        recursive: bool,
        /// Scale applied to every input
        #[arg(long, default_value = "1,1,1", value_parser = parse_vec3::<f32>, value_name = "X,Y,Z")]
        scale: Vector3<f32>,
        /// Translation applied to every input
        #[arg(long, default_value = "0,0,0", value_parser = parse_vec3::<f32>, value_name = "X,Y,Z")]
        offset: Vector3<f32>,
    },
    /// Write the glTF JSON of every GLB in a file or directory
    ExtractJson {
        /// GLB file, BGL package or directory
        #[arg(value_hint = ValueHint::AnyPath)]
        input: PathBuf,
        /// Directory the JSON files are written to
        #[arg(value_hint = ValueHint::DirPath)]
        output_dir: PathBuf,
        /// Search the input directory recursively
        #[arg(short, long)]
        recursive: bool,
    },
}

fn parse_vec3<R: FromStr>(
    s: &str,
) -> Result<Vector3<R>, Box<dyn std::error::Error + Send + Sync + 'static>>
where
    <R as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    let mut split = s.trim().split(',');
    let mut next = || {
        split
            .next()
            .map(str::trim)
            .ok_or_else(|| format!("expected three comma-separated values, got {s:?}"))
    };
    let x = R::from_str(next()?)?;
    let y = R::from_str(next()?)?;
    let z = R::from_str(next()?)?;
    Ok(Vector3::new(x, y, z))
}

/// Set up log output
pub(crate) fn initialize_logging(log_filter: &str) {
    env_logger::Builder::new()
        .parse_filters(log_filter)
        .format_timestamp(None)
        .init();
}
