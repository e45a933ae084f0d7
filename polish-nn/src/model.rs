//! The model catalog: the five pretrained denoiser kinds and the composite
//! blocks (`Pad→Conv→Bias`, depthwise-separable, residual) their weight
//! bundles assemble into. Grounded directly on the upstream project's
//! `models.go`/`model_data.go` builder functions.

use polish_tensor::layer::{Bias, Bilateral, Conv, Deconv, GroupNorm, Layer, Mul, Pad, ReLU, Residual, SpatialConv, Unpad};
use polish_tensor::{WeightError, WeightMap};

/// One of the five shipped denoiser kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Bilateral,
    Shallow,
    Deep,
    ShallowAux,
    DeepAux,
}

static SHALLOW_WEIGHTS: &[u8] = include_bytes!("../../weights/shallow.zip");
static SHALLOW_AUX_WEIGHTS: &[u8] = include_bytes!("../../weights/shallow_aux.zip");
static DEEP_WEIGHTS: &[u8] = include_bytes!("../../weights/deep.zip");
static DEEP_AUX_WEIGHTS: &[u8] = include_bytes!("../../weights/deep_aux.zip");

impl ModelKind {
    pub fn all() -> [ModelKind; 5] {
        [
            ModelKind::Bilateral,
            ModelKind::Shallow,
            ModelKind::Deep,
            ModelKind::ShallowAux,
            ModelKind::DeepAux,
        ]
    }

    /// The image-dimension divisor the patched driver and CLI must pad up to
    /// before running the network, and crop back afterward.
    pub fn lcd(&self) -> usize {
        match self {
            ModelKind::Bilateral => 1,
            ModelKind::Shallow | ModelKind::ShallowAux => 1,
            ModelKind::Deep | ModelKind::DeepAux => 4,
        }
    }

    /// Documentation-only receptive-field radius, in pixels.
    pub fn rf(&self) -> usize {
        match self {
            ModelKind::Bilateral => 7,
            ModelKind::Shallow | ModelKind::ShallowAux => 4,
            ModelKind::Deep | ModelKind::DeepAux => 42,
        }
    }

    /// Whether this model expects a 7-channel (RGB + albedo + incidence)
    /// input tensor rather than plain 3-channel RGB.
    pub fn aux(&self) -> bool {
        matches!(self, ModelKind::ShallowAux | ModelKind::DeepAux)
    }

    fn input_depth(&self) -> usize {
        if self.aux() {
            7
        } else {
            3
        }
    }

    /// The `include_bytes!`-embedded weight bundle for this kind, or `None`
    /// for `Bilateral`, which carries no learned weights.
    pub fn default_weights(&self) -> Option<&'static [u8]> {
        match self {
            ModelKind::Bilateral => None,
            ModelKind::Shallow => Some(SHALLOW_WEIGHTS),
            ModelKind::ShallowAux => Some(SHALLOW_AUX_WEIGHTS),
            ModelKind::Deep => Some(DEEP_WEIGHTS),
            ModelKind::DeepAux => Some(DEEP_AUX_WEIGHTS),
        }
    }

    /// Assembles this model's `Layer` from a loaded weight map. `Bilateral`
    /// ignores `weights` entirely.
    pub fn build(&self, weights: &WeightMap) -> Result<Layer, WeightError> {
        match self {
            ModelKind::Bilateral => Ok(Layer::Bilateral(Bilateral::new(15, 1.7016, 0.4821))),
            ModelKind::Shallow => build_shallow(weights, 3),
            ModelKind::ShallowAux => build_shallow(weights, 7),
            ModelKind::Deep => build_deep(weights, 3),
            ModelKind::DeepAux => build_deep(weights, 7),
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ModelKind::Bilateral => "bilateral",
            ModelKind::Shallow => "shallow",
            ModelKind::Deep => "deep",
            ModelKind::ShallowAux => "shallow-aux",
            ModelKind::DeepAux => "deep-aux",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for ModelKind {
    /// The unrecognized name, so the caller can report it.
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bilateral" => Ok(ModelKind::Bilateral),
            "shallow" => Ok(ModelKind::Shallow),
            "deep" => Ok(ModelKind::Deep),
            "shallow-aux" => Ok(ModelKind::ShallowAux),
            "deep-aux" => Ok(ModelKind::DeepAux),
            other => Err(other.to_string()),
        }
    }
}

fn conv_block(weights: &WeightMap, key: &str, kernel: usize, stride: usize, in_depth: usize, out_depth: usize) -> Result<Layer, WeightError> {
    let w = weights.get_sized(&format!("{key}.weight"), out_depth * in_depth * kernel * kernel)?;
    let b = weights.get_sized(&format!("{key}.bias"), out_depth)?;
    let border = kernel / 2;
    Ok(Layer::Sequence(polish_tensor::layer::Sequence::new(vec![
        Layer::Pad(Pad::uniform(border)),
        Layer::Conv(Conv::new(out_depth, in_depth, kernel, stride, w)),
        Layer::Bias(Bias::new(b.to_vec())),
    ])))
}

fn deconv_block(weights: &WeightMap, key: &str, kernel: usize, stride: usize, in_depth: usize, out_depth: usize) -> Result<Layer, WeightError> {
    let w = weights.get_sized(&format!("{key}.weight"), in_depth * out_depth * kernel * kernel)?;
    let b = weights.get_sized(&format!("{key}.bias"), out_depth)?;
    let crop = (kernel - 1) / 2;
    Ok(Layer::Sequence(polish_tensor::layer::Sequence::new(vec![
        Layer::Deconv(Deconv::new(out_depth, in_depth, kernel, stride, w)),
        Layer::Unpad(Unpad::new(crop, crop, crop, crop)),
        Layer::Bias(Bias::new(b.to_vec())),
    ])))
}

fn depthwise_sep_block(weights: &WeightMap, key: &str, kernel: usize, stride: usize, in_depth: usize, out_depth: usize) -> Result<Layer, WeightError> {
    let spatial_w = weights.get_sized(&format!("{key}.spatial.weight"), in_depth * kernel * kernel)?;
    let spatial_b = weights.get_sized(&format!("{key}.spatial.bias"), in_depth)?;
    let depthwise_w = weights.get_sized(&format!("{key}.depthwise.weight"), out_depth * in_depth)?;
    let depthwise_b = weights.get_sized(&format!("{key}.depthwise.bias"), out_depth)?;
    let border = kernel / 2;
    Ok(Layer::Sequence(polish_tensor::layer::Sequence::new(vec![
        Layer::Pad(Pad::uniform(border)),
        Layer::SpatialConv(SpatialConv::new(in_depth, kernel, stride, spatial_w)),
        Layer::Bias(Bias::new(spatial_b.to_vec())),
        Layer::ReLU(ReLU),
        Layer::Conv(Conv::new(out_depth, in_depth, 1, 1, depthwise_w)),
        Layer::Bias(Bias::new(depthwise_b.to_vec())),
    ])))
}

fn build_shallow(weights: &WeightMap, in_depth: usize) -> Result<Layer, WeightError> {
    Ok(Layer::Sequence(polish_tensor::layer::Sequence::new(vec![
        conv_block(weights, "conv1", 5, 1, in_depth, 32)?,
        Layer::ReLU(ReLU),
        conv_block(weights, "conv2", 5, 1, 32, 3)?,
    ])))
}

/// Builds the per-residual-block normalization step, distinguishing the
/// GroupNorm-style bundle from the running-stats (batch-norm-folded) one by
/// the presence of `<key>.running_mean`.
fn residual_norm(weights: &WeightMap, key: &str, depth: usize) -> Result<Layer, WeightError> {
    let gamma = weights.get_sized(&format!("{key}.weight"), depth)?;
    let beta = weights.get_sized(&format!("{key}.bias"), depth)?;
    if weights.contains(&format!("{key}.running_mean")) {
        let mean = weights.get_sized(&format!("{key}.running_mean"), depth)?;
        let var = weights.get_sized(&format!("{key}.running_var"), depth)?;
        let scale: Vec<f32> = gamma
            .iter()
            .zip(var.iter())
            .map(|(&w, &v)| w / (v + 1e-5).sqrt())
            .collect();
        let neg_mean: Vec<f32> = mean.iter().map(|&m| -m).collect();
        Ok(Layer::Sequence(polish_tensor::layer::Sequence::new(vec![
            Layer::Bias(Bias::new(neg_mean)),
            Layer::Mul(Mul::new(scale)),
            Layer::Bias(Bias::new(beta.to_vec())),
        ])))
    } else {
        Ok(Layer::Sequence(polish_tensor::layer::Sequence::new(vec![
            Layer::GroupNorm(GroupNorm::new(8)),
            Layer::Mul(Mul::new(gamma.to_vec())),
            Layer::Bias(Bias::new(beta.to_vec())),
        ])))
    }
}

fn residual_block(weights: &WeightMap, index: usize) -> Result<Layer, WeightError> {
    let base = format!("residuals.{index}");
    let branch = vec![
        residual_norm(weights, &format!("{base}.0"), 128)?,
        Layer::ReLU(ReLU),
        depthwise_sep_block(weights, &format!("{base}.2"), 3, 1, 128, 256)?,
        Layer::ReLU(ReLU),
        depthwise_sep_block(weights, &format!("{base}.4"), 3, 1, 256, 128)?,
    ];
    Ok(Layer::Residual(Residual::new(Layer::Sequence(
        polish_tensor::layer::Sequence::new(branch),
    ))))
}

fn build_deep(weights: &WeightMap, in_depth: usize) -> Result<Layer, WeightError> {
    let mut layers = vec![
        conv_block(weights, "conv1", 5, 2, in_depth, 64)?,
        Layer::ReLU(ReLU),
        depthwise_sep_block(weights, "conv2", 5, 2, 64, 128)?,
    ];
    for i in 0..4 {
        layers.push(residual_block(weights, i)?);
    }
    layers.push(deconv_block(weights, "deconv1", 4, 2, 128, 64)?);
    layers.push(Layer::ReLU(ReLU));
    layers.push(deconv_block(weights, "deconv2", 4, 2, 64, 32)?);
    layers.push(Layer::ReLU(ReLU));
    layers.push(conv_block(weights, "conv3", 3, 1, 32, 3)?);
    Ok(Layer::Sequence(polish_tensor::layer::Sequence::new(layers)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_display_name_back_to_its_kind() {
        for kind in ModelKind::all() {
            assert_eq!(kind.to_string().parse::<ModelKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_model_name_is_rejected() {
        assert_eq!("nonexistent".parse::<ModelKind>(), Err("nonexistent".to_string()));
    }

    #[test]
    fn lcd_and_aux_match_the_catalog() {
        assert_eq!(ModelKind::Shallow.lcd(), 1);
        assert_eq!(ModelKind::Deep.lcd(), 4);
        assert!(!ModelKind::Shallow.aux());
        assert!(ModelKind::ShallowAux.aux());
        assert_eq!(ModelKind::ShallowAux.input_depth(), 7);
        assert_eq!(ModelKind::Deep.input_depth(), 3);
    }

    #[test]
    fn bilateral_has_no_embedded_weights() {
        assert!(ModelKind::Bilateral.default_weights().is_none());
        assert!(ModelKind::Shallow.default_weights().is_some());
    }

    #[test]
    fn shallow_builds_from_its_embedded_bundle() {
        let bytes = ModelKind::Shallow.default_weights().unwrap();
        let weights = WeightMap::from_zip_bytes(bytes).unwrap();
        let layer = ModelKind::Shallow.build(&weights).unwrap();
        let input = polish_tensor::Tensor::new(10, 10, 3);
        let out = layer.apply(&input).unwrap();
        assert_eq!(out.shape(), (10, 10, 3));
    }

    #[test]
    fn deep_builds_from_its_embedded_bundle_with_groupnorm_lineage() {
        let bytes = ModelKind::Deep.default_weights().unwrap();
        let weights = WeightMap::from_zip_bytes(bytes).unwrap();
        let layer = ModelKind::Deep.build(&weights).unwrap();
        let input = polish_tensor::Tensor::new(16, 16, 3);
        let out = layer.apply(&input).unwrap();
        assert_eq!(out.shape(), (16, 16, 3));
    }

    #[test]
    fn deep_aux_builds_with_running_stats_lineage() {
        let bytes = ModelKind::DeepAux.default_weights().unwrap();
        let weights = WeightMap::from_zip_bytes(bytes).unwrap();
        assert!(weights.contains("residuals.0.0.running_mean"));
        let layer = ModelKind::DeepAux.build(&weights).unwrap();
        let input = polish_tensor::Tensor::new(16, 16, 7);
        let out = layer.apply(&input).unwrap();
        assert_eq!(out.shape(), (16, 16, 3));
    }

    #[test]
    fn missing_key_surfaces_as_weight_error() {
        let weights = WeightMap::from_zip_bytes(&[]).unwrap_err();
        assert!(matches!(weights, WeightError::MalformedZip(_)));
    }
}
