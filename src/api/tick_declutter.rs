use crate::core::PixelRect;

/// Outcome of one overlap sweep over the value-axis tick labels.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeclutterResult {
    /// Indices into the input, kept labels.
    pub kept: Vec<usize>,
    /// Indices into the input, labels to hide.
    pub hidden: Vec<usize>,
    /// Lowest bottom edge (pixels, y up) among kept labels.
    pub lowest_edge_px: Option<f64>,
}

/// Hides tick labels that would overlap a label to their right.
///
/// `boxes` must be ordered by tick position. The rightmost label always
/// survives; walking leftwards, a label is hidden when it strictly overlaps
/// the most recently kept label. Touching boxes both survive.
#[must_use]
pub fn declutter(boxes: &[PixelRect]) -> DeclutterResult {
    let Some((last, rest)) = boxes.split_last() else {
        return DeclutterResult::default();
    };

    let mut running = *last;
    let mut kept = vec![rest.len()];
    let mut hidden = Vec::new();
    let mut lowest_edge = last.y0;

    for (index, candidate) in rest.iter().enumerate().rev() {
        if candidate.overlaps(running) {
            hidden.push(index);
        } else {
            running = *candidate;
            lowest_edge = lowest_edge.min(candidate.y0);
            kept.push(index);
        }
    }

    kept.reverse();
    hidden.reverse();
    DeclutterResult {
        kept,
        hidden,
        lowest_edge_px: Some(lowest_edge),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(x0: f64, x1: f64) -> PixelRect {
        PixelRect::new(x0, 10.0, x1, 20.0)
    }

    #[test]
    fn empty_input_keeps_nothing() {
        let result = declutter(&[]);
        assert!(result.kept.is_empty());
        assert!(result.hidden.is_empty());
        assert_eq!(result.lowest_edge_px, None);
    }

    #[test]
    fn rightmost_label_is_always_kept() {
        let result = declutter(&[label(0.0, 50.0), label(10.0, 60.0)]);
        assert_eq!(result.kept, vec![1]);
        assert_eq!(result.hidden, vec![0]);
    }

    #[test]
    fn touching_labels_survive() {
        let result = declutter(&[label(0.0, 10.0), label(10.0, 20.0), label(20.0, 30.0)]);
        assert_eq!(result.kept, vec![0, 1, 2]);
        assert!(result.hidden.is_empty());
    }

    #[test]
    fn hidden_labels_do_not_block_their_neighbours() {
        // The middle label collides and is hidden; the first one only touches
        // the last kept label.
        let boxes = [label(0.0, 20.0), label(15.0, 35.0), label(20.0, 40.0)];
        let result = declutter(&boxes);
        assert_eq!(result.kept, vec![0, 2]);
        assert_eq!(result.hidden, vec![1]);
    }

    #[test]
    fn lowest_edge_ignores_hidden_labels() {
        let boxes = [
            PixelRect::new(0.0, 2.0, 30.0, 12.0),
            PixelRect::new(25.0, 5.0, 40.0, 15.0),
        ];
        let result = declutter(&boxes);
        assert_eq!(result.lowest_edge_px, Some(5.0));
    }
}
