use anyhow::Context;
use cgmath::Matrix4;
use clap::Parser;
use scone::resources::{self, ConvertOptions};

mod cli;

use cli::{Cli, Command};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli::initialize_logging(&cli.log_filter);

    match cli.command {
        Command::Convert {
            inputs,
            output,
            textures,
            recursive,
            scale,
            offset,
        } => {
            let options = ConvertOptions {
                texture_root: textures,
                transform: Some(
                    Matrix4::from_translation(offset) * Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z),
                ),
                recursive,
            };
            let inputs = resources::collect_inputs(&inputs, options.recursive)?;
            log::info!("converting {} input files", inputs.len());
            let scene = resources::convert_all(&inputs, &options)?;
            scone::write_ac_file(&scene, &output).with_context(|| format!("failed to write {}", output.display()))?;
        }
        Command::ExtractJson {
            input,
            output_dir,
            recursive,
        } => {
            let inputs = resources::collect_inputs(&[input], recursive)?;
            log::info!("found {} input files", inputs.len());
            let mut total = 0;
            for input in &inputs {
                total += resources::extract_json(input, &output_dir)?.len();
            }
            log::info!("extracted {total} JSON documents");
        }
    }
    Ok(())
}
