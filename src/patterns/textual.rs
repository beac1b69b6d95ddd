use crate::detect::Sketch;
use crate::ir::Observation;

use super::Candidate;

// Text-to-component linkage goes through annotations in the classifier, so this analysis has
// no signals of its own yet.
pub(super) fn detect_textual_patterns(
    _sketch: &Sketch,
    _observations: &[Observation],
) -> Vec<Candidate> {
    Vec::new()
}
