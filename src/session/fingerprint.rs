use xxhash_rust::xxh3::Xxh3;

use crate::foundation::core::{Point, Pose};
use crate::scene::obstacle::Obstacle;

const XXH3_SEED: u64 = 0x6567_6f76_6965_7721;

/// Stable fingerprint of one step's render inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct StepFingerprint {
    pub(crate) hi: u64,
    pub(crate) lo: u64,
}

/// Hash a pose and its obstacle snapshot.
///
/// The step index is not hashed, so a robot standing still in a static scene fingerprints the
/// same across steps.
pub(crate) fn fingerprint_step(pose: &Pose, obstacles: &[Obstacle]) -> StepFingerprint {
    let mut h = StableHasher::new();
    h.write_f64(pose.x);
    h.write_f64(pose.y);
    h.write_f64(pose.theta);
    h.write_u64(obstacles.len() as u64);
    for o in obstacles {
        match o {
            Obstacle::Polygonal {
                vertices,
                height,
                is_dynamic,
            } => {
                h.write_u8(0);
                h.write_u64(vertices.len() as u64);
                for p in vertices {
                    h.write_point(*p);
                }
                h.write_f64(*height);
                h.write_bool(*is_dynamic);
            }
            Obstacle::Circular {
                center,
                radius,
                height,
                is_dynamic,
            } => {
                h.write_u8(1);
                h.write_point(*center);
                h.write_f64(*radius);
                h.write_f64(*height);
                h.write_bool(*is_dynamic);
            }
        }
    }
    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_point(&mut self, p: Point) {
        self.write_f64(p.x);
        self.write_f64(p.y);
    }

    fn finish(self) -> StepFingerprint {
        let v = self.inner.digest128();
        StepFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/fingerprint.rs"]
mod tests;
