use super::analysis_error::AnalysisError;
use super::edge_scorer::EdgeResult;

/// Mean edge density, in percent, across the surviving regions.
///
/// Each region's density is taken over its own (possibly clipped) edge map,
/// so a region cut in half by the frame edge is not diluted. Every survivor
/// weighs the same regardless of size or how many regions survived; a single
/// surviving region stands in for the whole face.
pub fn aggregate(results: &[EdgeResult]) -> Result<f64, AnalysisError> {
    if results.is_empty() {
        return Err(AnalysisError::NoValidRegions);
    }
    let total: f64 = results.iter().map(|r| r.edge_map.density_percent()).sum();
    Ok(total / results.len() as f64)
}
