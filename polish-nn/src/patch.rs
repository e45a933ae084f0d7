//! Tiled inference driver: runs a forward function over overlapping patches
//! of a large tensor so peak memory scales with the patch size rather than
//! the whole image, while (for finite-receptive-field models) reproducing
//! the whole-image result.
//!
//! Unlike the rest of this crate, this driver has no direct counterpart in
//! the upstream Go project — its reference-test suite only exercises a
//! `PolishImagePatches` helper, not a standalone patch/unpad primitive — so
//! its tiling arithmetic is derived straight from the specification's
//! overlap-border contract rather than ported from an existing file.

use polish_tensor::error::ShapeError;
use polish_tensor::Tensor;

/// Runs `f` over `input` by tiling it into `patch_size`-by-`patch_size`
/// tiles with `border` pixels of overlap context on each side, pasting the
/// interior of each patch's output back into a full-size result.
///
/// `border < 0` means "use `patch_size / 2`". If `patch_size >= input`'s
/// height and width, `f` is called once on the whole tensor.
pub fn run_patched<F>(input: &Tensor, patch_size: usize, border: isize, mut f: F) -> Result<Tensor, ShapeError>
where
    F: FnMut(&Tensor) -> Result<Tensor, ShapeError>,
{
    let (height, width, _) = input.shape();
    if patch_size >= height && patch_size >= width {
        return f(input);
    }
    let border = if border < 0 { patch_size / 2 } else { border as usize };

    let mut out: Option<Tensor> = None;
    let mut y = 0;
    while y < height {
        let mut x = 0;
        let tile_h = patch_size.min(height - y);
        while x < width {
            let tile_w = patch_size.min(width - x);

            let extra_top = y.min(border);
            let extra_left = x.min(border);
            let extra_bottom = (height - y - tile_h).min(border);
            let extra_right = (width - x - tile_w).min(border);

            let carve_top = y - extra_top;
            let carve_left = x - extra_left;
            let carve_h = tile_h + extra_top + extra_bottom;
            let carve_w = tile_w + extra_left + extra_right;

            log::debug!(
                "patch at ({y}, {x}) size ({tile_h}, {tile_w}) context top={extra_top} left={extra_left} bottom={extra_bottom} right={extra_right}"
            );

            let patch = carve(input, carve_top, carve_left, carve_h, carve_w);
            let result = f(&patch)?;
            let cropped = result.unpad(extra_top, extra_right, extra_bottom, extra_left)?;

            let out_tensor = out.get_or_insert_with(|| Tensor::new(height, width, cropped.depth()));
            paste(out_tensor, &cropped, y, x);

            x += patch_size;
        }
        y += patch_size;
    }

    Ok(out.unwrap_or_else(|| Tensor::new(height, width, input.depth())))
}

fn carve(t: &Tensor, top: usize, left: usize, h: usize, w: usize) -> Tensor {
    let mut out = Tensor::new(h, w, t.depth());
    for dy in 0..h {
        for dx in 0..w {
            for z in 0..t.depth() {
                *out.at_mut(dy, dx, z) = t.at(top + dy, left + dx, z);
            }
        }
    }
    out
}

fn paste(dst: &mut Tensor, src: &Tensor, top: usize, left: usize) {
    let (h, w, d) = src.shape();
    for dy in 0..h {
        for dx in 0..w {
            for z in 0..d {
                *dst.at_mut(top + dy, left + dx, z) = src.at(dy, dx, z);
            }
        }
    }
}
