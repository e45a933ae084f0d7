//! Aux feature map builders: ray-casting an incidence map and a Monte-Carlo
//! albedo estimate against a minimal scene abstraction, grounded on the
//! upstream project's `features.go` (`CreateIncidenceMap`/`CreateAlbedoMap`),
//! which itself treats mesh loading and scene synthesis as purely an
//! external interface — the same role `Scene`/`Material` play here.

use rand::Rng;

use polish_tensor::Tensor;

/// A point in 3-space, also used as a direction vector.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Vec3 { x, y, z }
    }

    pub fn dot(&self, other: &Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn scale(&self, s: f64) -> Vec3 {
        Vec3::new(self.x * s, self.y * s, self.z * s)
    }

    pub fn add(&self, other: &Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn sub(&self, other: &Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn normalize(&self) -> Vec3 {
        let n = self.norm();
        if n == 0.0 {
            *self
        } else {
            self.scale(1.0 / n)
        }
    }
}

/// A ray cast from `origin` in `direction` (not necessarily unit length).
#[derive(Copy, Clone, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// A ray-geometry intersection.
#[derive(Copy, Clone, Debug)]
pub struct Hit {
    pub normal: Vec3,
    pub distance: f64,
}

/// A pinhole camera that casts one ray per pixel.
#[derive(Copy, Clone, Debug)]
pub struct Camera {
    pub origin: Vec3,
    /// Direction the camera looks, unit length.
    pub forward: Vec3,
    /// Camera-space up direction, unit length and orthogonal to `forward`.
    pub up: Vec3,
    /// Horizontal field of view, in radians.
    pub fov_x: f64,
}

impl Camera {
    /// The ray through pixel `(x, y)` of a `width x height` image.
    pub fn cast(&self, x: f64, y: f64, width: usize, height: usize) -> Ray {
        let right = self.forward.cross(&self.up).normalize();
        let aspect = height as f64 / width as f64;
        let half_width = (self.fov_x / 2.0).tan();
        let half_height = half_width * aspect;
        let u = if width <= 1 {
            0.0
        } else {
            (x / (width as f64 - 1.0)) * 2.0 - 1.0
        };
        let v = if height <= 1 {
            0.0
        } else {
            1.0 - (y / (height as f64 - 1.0)) * 2.0
        };
        let direction = self
            .forward
            .add(&right.scale(u * half_width))
            .add(&self.up.scale(v * half_height));
        Ray {
            origin: self.origin,
            direction: direction.normalize(),
        }
    }
}

/// Ray-geometry intersection, the one boundary mesh loading and scene
/// synthesis are expected to implement; out of scope for this crate per the
/// spec's non-goals.
pub trait Scene {
    fn cast(&self, ray: &Ray) -> Option<Hit>;
}

/// A surface's response to incoming light, sampled by the albedo estimator.
pub trait Material {
    /// Draws a source (incoming light) direction given the surface normal
    /// and outgoing (toward-camera) direction.
    fn sample_source(&self, rng: &mut dyn rand::RngCore, normal: Vec3, dest: Vec3) -> Vec3;
    /// The probability density of `sample_source` returning `source`.
    fn pdf(&self, normal: Vec3, source: Vec3, dest: Vec3) -> f64;
    /// The BSDF value for the `(source, dest)` direction pair.
    fn bsdf(&self, normal: Vec3, source: Vec3, dest: Vec3) -> Vec3;
}

/// A purely diffuse (Lambertian) material with a fixed reflectance color.
#[derive(Copy, Clone, Debug)]
pub struct Lambertian {
    pub reflectance: Vec3,
}

impl Lambertian {
    pub fn new(reflectance: Vec3) -> Self {
        Lambertian { reflectance }
    }

    fn cosine_sample_hemisphere(normal: Vec3, rng: &mut dyn rand::RngCore) -> Vec3 {
        let u1: f64 = rng.gen();
        let u2: f64 = rng.gen();
        let r = u1.sqrt();
        let theta = 2.0 * std::f64::consts::PI * u2;
        let x = r * theta.cos();
        let y = r * theta.sin();
        let z = (1.0 - u1).max(0.0).sqrt();

        let up = if normal.x.abs() < 0.9 {
            Vec3::new(1.0, 0.0, 0.0)
        } else {
            Vec3::new(0.0, 1.0, 0.0)
        };
        let tangent = up.cross(&normal).normalize();
        let bitangent = normal.cross(&tangent);
        tangent.scale(x).add(&bitangent.scale(y)).add(&normal.scale(z)).normalize()
    }
}

impl Material for Lambertian {
    fn sample_source(&self, rng: &mut dyn rand::RngCore, normal: Vec3, _dest: Vec3) -> Vec3 {
        Self::cosine_sample_hemisphere(normal, rng)
    }

    fn pdf(&self, normal: Vec3, source: Vec3, _dest: Vec3) -> f64 {
        (source.dot(&normal) / std::f64::consts::PI).max(1e-6)
    }

    fn bsdf(&self, normal: Vec3, source: Vec3, dest: Vec3) -> Vec3 {
        let above = source.dot(&normal) > 0.0 && dest.dot(&normal) > 0.0;
        if above {
            self.reflectance.scale(1.0 / std::f64::consts::PI)
        } else {
            Vec3::new(0.0, 0.0, 0.0)
        }
    }
}

/// Minimum number of BSDF samples the spec's Monte Carlo albedo estimate
/// calls for by default.
pub const DEFAULT_BSDF_SAMPLES: usize = 400;

/// Builds a grayscale `width x height` incidence tensor (depth 1): the
/// absolute cosine between the camera ray and the hit surface's normal, or
/// zero on a miss.
pub fn incidence_map(scene: &dyn Scene, camera: &Camera, width: usize, height: usize) -> Tensor {
    let mut out = Tensor::new(height, width, 1);
    for y in 0..height {
        for x in 0..width {
            let ray = camera.cast(x as f64, y as f64, width, height);
            if let Some(hit) = scene.cast(&ray) {
                let dir = ray.direction.normalize();
                *out.at_mut(y, x, 0) = hit.normal.dot(&dir).abs() as f32;
            }
        }
    }
    out
}

/// Builds an RGB `width x height` albedo tensor (depth 3) by Monte Carlo
/// integration of each hit surface's BSDF over `bsdf_samples` draws.
pub fn albedo_map(
    scene: &dyn Scene,
    material: &dyn Material,
    camera: &Camera,
    width: usize,
    height: usize,
    bsdf_samples: usize,
    rng: &mut dyn rand::RngCore,
) -> Tensor {
    let mut out = Tensor::new(height, width, 3);
    for y in 0..height {
        for x in 0..width {
            let ray = camera.cast(x as f64, y as f64, width, height);
            if let Some(hit) = scene.cast(&ray) {
                let dest = ray.direction.scale(-1.0).normalize();
                let mut sum = Vec3::new(0.0, 0.0, 0.0);
                for _ in 0..bsdf_samples {
                    let source = material.sample_source(rng, hit.normal, dest);
                    let density = material.pdf(hit.normal, source, dest);
                    let bsdf = material.bsdf(hit.normal, source, dest);
                    let source_dot = source.dot(&hit.normal).abs();
                    sum = sum.add(&bsdf.scale(source_dot / density));
                }
                let color = sum.scale(1.0 / bsdf_samples as f64);
                *out.at_mut(y, x, 0) = color.x as f32;
                *out.at_mut(y, x, 1) = color.y as f32;
                *out.at_mut(y, x, 2) = color.z as f32;
            }
        }
    }
    out
}

/// Assembles the 7-channel aux tensor: RGB (0-2) from the noisy render,
/// albedo (3-5), incidence (6).
pub fn assemble_aux_tensor(rgb: &Tensor, albedo: &Tensor, incidence: &Tensor) -> Tensor {
    debug_assert_eq!(rgb.depth(), 3);
    debug_assert_eq!(albedo.depth(), 3);
    debug_assert_eq!(incidence.depth(), 1);
    debug_assert_eq!(rgb.shape().0, albedo.shape().0);
    debug_assert_eq!(rgb.shape().1, albedo.shape().1);
    let (h, w, _) = rgb.shape();
    let mut out = Tensor::new(h, w, 7);
    for y in 0..h {
        for x in 0..w {
            for z in 0..3 {
                *out.at_mut(y, x, z) = rgb.at(y, x, z);
            }
            for z in 0..3 {
                *out.at_mut(y, x, 3 + z) = albedo.at(y, x, z);
            }
            *out.at_mut(y, x, 6) = incidence.at(y, x, 0);
        }
    }
    out
}
