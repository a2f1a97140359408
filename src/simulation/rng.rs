use std::f64::consts::TAU;

/// A generator of uniform(0,1) variates. The simulator only ever asks for
/// uniforms, so tests can swap in a seeded or scripted source.
pub trait UniformSource {
    /// Uniform draw in `[0, 1)`.
    fn next_uniform(&mut self) -> f64;

    /// Uniform integer in `[0, upper]`.
    #[inline]
    fn next_index(&mut self, upper: usize) -> usize {
        let scaled = self.next_uniform() * (upper as f64 + 1.0);
        (scaled as usize).min(upper)
    }
}

impl<R: rand::RngCore> UniformSource for R {
    #[inline]
    fn next_uniform(&mut self) -> f64 {
        rand::Rng::gen::<f64>(self)
    }

    #[inline]
    fn next_index(&mut self, upper: usize) -> usize {
        rand::Rng::gen_range(self, 0..=upper)
    }
}

/// One standard-normal variate via Box-Muller.
///
/// z = sqrt(-2 ln u1) * cos(2 pi u2)
///
/// Exact zeros are redrawn since ln(0) is undefined.
#[inline]
pub fn standard_normal<S: UniformSource + ?Sized>(src: &mut S) -> f64 {
    let u1 = nonzero_uniform(src);
    let u2 = nonzero_uniform(src);
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

#[inline]
fn nonzero_uniform<S: UniformSource + ?Sized>(src: &mut S) -> f64 {
    loop {
        let u = src.next_uniform();
        if u != 0.0 {
            return u;
        }
    }
}
