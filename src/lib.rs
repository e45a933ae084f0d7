//! Denoises Monte Carlo path-traced renders with a pretrained convolutional
//! network. Re-exports [`polish_tensor`] and [`polish_nn`] alongside this
//! crate's CLI glue, the way the workspace this project is descended from
//! has its root package front its members.

pub mod cli;
pub mod error;

pub use polish_nn;
pub use polish_tensor;

use std::path::Path;

use polish_nn::ModelKind;
use polish_tensor::image_bridge;
use polish_tensor::{Tensor, WeightMap};

use cli::Cli;
use error::{IOError, PolishError, UsageError};

/// Runs one end-to-end denoise: decode input (and aux maps, if required),
/// build the selected model, run it (patched or whole-image), encode the
/// output.
pub fn run(cli: &Cli) -> Result<(), PolishError> {
    let model: ModelKind = cli
        .model
        .parse()
        .map_err(UsageError::UnknownModel)?;

    if model.aux() && (cli.albedo.is_none() || cli.incidence.is_none()) {
        return Err(UsageError::MissingAuxInputs {
            model: model.to_string(),
        }
        .into());
    }
    if cli.patch_border < -1 {
        return Err(UsageError::InvalidPatchBorder(cli.patch_border).into());
    }

    let input_image = decode_image(&cli.input)?;
    let mut tensor = image_bridge::rgb_tensor_from_image(&input_image);

    if model.aux() {
        let albedo_path = cli.albedo.as_ref().expect("checked above");
        let incidence_path = cli.incidence.as_ref().expect("checked above");
        let albedo = image_bridge::rgb_tensor_from_image(&decode_image(albedo_path)?);
        let incidence = image_bridge::gray_tensor_from_image(&decode_image(incidence_path)?);
        tensor = polish_nn::features::assemble_aux_tensor(&tensor, &albedo, &incidence);
    }

    let layer = build_model(model)?;

    let lcd = model.lcd();
    let (h, w, _) = tensor.shape();
    let right_pad = (lcd - w % lcd) % lcd;
    let bottom_pad = (lcd - h % lcd) % lcd;
    let padded = tensor.pad(0, right_pad, bottom_pad, 0);

    let forward = |t: &Tensor| layer.apply(t);
    let denoised = if cli.patch > 0 {
        polish_nn::run_patched(&padded, cli.patch, cli.patch_border as isize, forward)?
    } else {
        forward(&padded)?
    };

    let (out_h, out_w, _) = denoised.shape();
    let cropped = denoised.unpad(0, out_w - w, out_h - h, 0)?;

    let output_image = image_bridge::image_from_rgb_tensor(&cropped);
    output_image
        .save(&cli.output)
        .map_err(|source| IOError::Encode {
            path: cli.output.clone(),
            source,
        })?;
    log::info!("wrote {}", cli.output.display());
    Ok(())
}

fn build_model(model: ModelKind) -> Result<polish_tensor::Layer, PolishError> {
    match model.default_weights() {
        Some(bytes) => {
            let weights = WeightMap::from_zip_bytes(bytes)?;
            Ok(model.build(&weights)?)
        }
        None => Ok(model.build(&WeightMap::default())?),
    }
}

fn decode_image(path: &Path) -> Result<image::DynamicImage, IOError> {
    image::open(path).map_err(|source| IOError::Decode {
        path: path.to_path_buf(),
        source,
    })
}
