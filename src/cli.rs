use std::path::PathBuf;

use clap::Parser;

/// Denoises a Monte Carlo path-traced render using a pretrained model.
#[derive(Parser, Debug)]
#[command(name = "polish", about, version)]
pub struct Cli {
    /// Input PNG to denoise.
    pub input: PathBuf,

    /// Where to write the denoised PNG.
    pub output: PathBuf,

    /// Which pretrained model to run: bilateral, shallow, deep, shallow-aux,
    /// or deep-aux. Validated against the catalog in `run`, not by clap,
    /// so an unknown name surfaces as a `UsageError` (exit code 1) rather
    /// than clap's own exit code 2.
    #[arg(long = "model", default_value = "deep")]
    pub model: String,

    /// Patch size for tiled inference; 0 disables tiling.
    #[arg(long = "patch", default_value_t = 0)]
    pub patch: usize,

    /// Overlap border per patch; -1 means patch/2.
    #[arg(long = "patch-border", default_value_t = -1)]
    pub patch_border: i64,

    /// Albedo map PNG, required for the `*-aux` models.
    #[arg(long = "albedo")]
    pub albedo: Option<PathBuf>,

    /// Incidence map PNG, required for the `*-aux` models.
    #[arg(long = "incidence")]
    pub incidence: Option<PathBuf>,
}

/// Rewrites Go `flag`-style single-dash long options (`-model foo`) into
/// clap's double-dash form (`--model foo`) before parsing, since the spec's
/// CLI contract follows the Go original's `flag` package, which treats `-x`
/// and `--x` identically. A token is rewritten only when it's a single dash
/// followed by two or more letters, so short flags (`-h`) and negative
/// numbers (`-1`) used as values are left alone.
pub fn normalize_args<I: IntoIterator<Item = String>>(args: I) -> Vec<String> {
    args.into_iter()
        .map(|arg| {
            let starts_with_letter = arg.chars().nth(1).is_some_and(|c| c.is_ascii_alphabetic());
            if arg.starts_with('-') && !arg.starts_with("--") && arg.len() > 2 && starts_with_letter {
                format!("-{arg}")
            } else {
                arg
            }
        })
        .collect()
}
