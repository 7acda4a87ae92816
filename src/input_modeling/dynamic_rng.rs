use rand::{RngCore, SeedableRng};

pub trait SimulationRng: std::fmt::Debug + RngCore + Send {}
impl<T: std::fmt::Debug + RngCore + Send> SimulationRng for T {}

/// Every engine owns its own stream, so independent engines never perturb
/// each other and a fixed seed replays a run exactly.
pub type DynRng = Box<dyn SimulationRng>;

/// The stream used when no other is supplied.  The fixed seed keeps runs
/// reproducible by default.
pub fn default_rng() -> DynRng {
    Box::new(rand_pcg::Pcg64Mcg::new(42))
}

pub fn seeded_rng(seed: u64) -> DynRng {
    Box::new(rand_pcg::Pcg64Mcg::seed_from_u64(seed))
}

/// A stream seeded from operating system (or browser) entropy, for runs
/// that are not meant to be replayed.
pub fn entropy_rng() -> DynRng {
    Box::new(rand_pcg::Pcg64Mcg::from_entropy())
}

pub fn dyn_rng<Rng: SimulationRng + 'static>(rng: Rng) -> DynRng {
    Box::new(rng)
}
