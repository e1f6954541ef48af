/// Step fingerprints for static-frame elision.
pub(crate) mod fingerprint;
/// Per-step rendering and episode sequencing.
pub mod sequencer;
