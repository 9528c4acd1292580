use crate::constants::progress::{NUM_REF_LISTS, NUM_REF_LISTS_F32, PROGRESS_BAR_RANGE};
use crate::error::{invariant_violation, LoadingError, LoadingResult};

/// Level a progress report refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressDepth {
    /// A whole cell started loading
    Cell,
    /// A reference inside the current cell's sub-list
    Reference,
}

impl TryFrom<u32> for ProgressDepth {
    type Error = LoadingError;

    fn try_from(depth: u32) -> LoadingResult<Self> {
        match depth {
            0 => Ok(ProgressDepth::Cell),
            1 => Ok(ProgressDepth::Reference),
            other => Err(invariant_violation(
                "progress",
                format!("unsupported progress depth {}", other),
            )),
        }
    }
}

/// Raw counters behind the aggregated fraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressState {
    pub current_cell_index: u32,
    pub total_cells: u32,
    pub current_ref_index: u32,
    pub total_refs_in_current_list: u32,
    /// Completed reference sub-lists in the current cell (0..NUM_REF_LISTS)
    pub current_ref_list_number: u32,
}

impl ProgressState {
    /// Progress of the reference pipeline inside the current cell, in [0, 1]
    pub fn ref_sub_fraction(&self) -> f32 {
        let list_fraction = if self.total_refs_in_current_list <= 1 {
            1.0
        } else {
            self.current_ref_index as f32 / (self.total_refs_in_current_list - 1) as f32
        };
        (list_fraction + self.current_ref_list_number as f32) / NUM_REF_LISTS_F32
    }

    fn completes_ref_list(&self) -> bool {
        self.total_refs_in_current_list
            .checked_sub(1)
            .is_some_and(|last| self.current_ref_index == last)
    }
}

/// Folds nested cell/reference reports into one monotonic fraction
#[derive(Debug, Clone, Default)]
pub struct ProgressAggregator {
    state: ProgressState,
}

impl ProgressAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    /// Forget everything, ready for a new load
    pub fn reset(&mut self) {
        self.state = ProgressState::default();
    }

    /// Apply one report and return the overall fraction in [0, 1].
    ///
    /// A rejected report leaves the counters untouched.
    pub fn combine(&mut self, depth: ProgressDepth, current: u32, total: u32) -> LoadingResult<f32> {
        let mut next = self.state;

        match depth {
            ProgressDepth::Cell => {
                next.current_cell_index = current;
                next.total_cells = total;
                next.current_ref_index = 0;
                next.current_ref_list_number = 0;
            }
            ProgressDepth::Reference => {
                next.current_ref_index = current;
                next.total_refs_in_current_list = total;
            }
        }

        if next.total_cells == 0 {
            return Err(invariant_violation(
                "progress",
                "fraction requested before any cell count was reported",
            ));
        }

        let ref_progress = next.ref_sub_fraction();
        if !(0.0..=1.0).contains(&ref_progress) {
            return Err(invariant_violation(
                "progress",
                format!(
                    "reference progress {} out of range (ref {}/{}, list {} of {})",
                    ref_progress,
                    next.current_ref_index,
                    next.total_refs_in_current_list,
                    next.current_ref_list_number,
                    NUM_REF_LISTS
                ),
            ));
        }

        let fraction = (next.current_cell_index as f32 + ref_progress) / next.total_cells as f32;
        if !(0.0..=1.0).contains(&fraction) {
            return Err(invariant_violation(
                "progress",
                format!(
                    "overall progress {} out of range (cell {}/{})",
                    fraction, next.current_cell_index, next.total_cells
                ),
            ));
        }

        // The completing report is still scaled by the old list number
        if depth == ProgressDepth::Reference && next.completes_ref_list() {
            next.current_ref_list_number += 1;
        }

        self.state = next;
        Ok(fraction)
    }
}

/// Convert a fraction to the progress bar's integer position
pub fn progress_bar_position(fraction: f32) -> u32 {
    (fraction * PROGRESS_BAR_RANGE as f32) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregator_at_cell(current: u32, total: u32) -> ProgressAggregator {
        let mut aggregator = ProgressAggregator::new();
        aggregator
            .combine(ProgressDepth::Cell, current, total)
            .expect("Failed to report cell progress in test");
        aggregator
    }

    #[test]
    fn test_depth_conversion() {
        assert_eq!(ProgressDepth::try_from(0).ok(), Some(ProgressDepth::Cell));
        assert_eq!(ProgressDepth::try_from(1).ok(), Some(ProgressDepth::Reference));
        let err = ProgressDepth::try_from(2).unwrap_err();
        assert!(err.is_invariant_violation());
    }

    #[test]
    fn test_reference_example_fraction() {
        let mut aggregator = aggregator_at_cell(2, 5);
        // 1 of 0..=2 is half way through the sub-list
        let fraction = aggregator
            .combine(ProgressDepth::Reference, 1, 3)
            .expect("Failed to report reference progress");
        assert!((fraction - 0.405).abs() < 1e-6, "fraction was {}", fraction);
    }

    #[test]
    fn test_single_item_list_counts_as_done() {
        let mut aggregator = aggregator_at_cell(0, 1);
        let fraction = aggregator
            .combine(ProgressDepth::Reference, 0, 1)
            .expect("Failed to report reference progress");
        assert!((fraction - 1.0 / 20.0).abs() < 1e-6);

        let state = ProgressState {
            current_ref_index: 17,
            total_refs_in_current_list: 1,
            ..ProgressState::default()
        };
        assert!((state.ref_sub_fraction() - 1.0 / 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_completing_list_increments_after_fraction() {
        let mut aggregator = aggregator_at_cell(0, 1);
        let before = aggregator.state().current_ref_list_number;

        let completing = aggregator
            .combine(ProgressDepth::Reference, 9, 10)
            .expect("Failed to complete reference list");
        // Scaled by the old list number
        assert!((completing - 1.0 / 20.0).abs() < 1e-6);
        assert_eq!(aggregator.state().current_ref_list_number, before + 1);

        let next_list = aggregator
            .combine(ProgressDepth::Reference, 0, 4)
            .expect("Failed to start next reference list");
        assert!((next_list - 1.0 / 20.0).abs() < 1e-6);
        assert_eq!(aggregator.state().current_ref_list_number, before + 1);
    }

    #[test]
    fn test_monotonic_within_sub_list() {
        let mut aggregator = aggregator_at_cell(3, 8);
        let mut last = 0.0;
        for list in 0..3 {
            for i in 0..25 {
                let fraction = aggregator
                    .combine(ProgressDepth::Reference, i, 25)
                    .expect("Failed to report reference progress");
                assert!(fraction >= last, "list {} ref {}: {} < {}", list, i, fraction, last);
                last = fraction;
            }
        }
        assert_eq!(aggregator.state().current_ref_list_number, 3);
    }

    #[test]
    fn test_cell_report_resets_reference_state() {
        let mut aggregator = aggregator_at_cell(0, 2);
        for i in 0..4 {
            aggregator
                .combine(ProgressDepth::Reference, i, 4)
                .expect("Failed to report reference progress");
        }
        assert_eq!(aggregator.state().current_ref_list_number, 1);

        aggregator
            .combine(ProgressDepth::Cell, 1, 2)
            .expect("Failed to report next cell");
        let state = aggregator.state();
        assert_eq!(state.current_cell_index, 1);
        assert_eq!(state.current_ref_index, 0);
        assert_eq!(state.current_ref_list_number, 0);
        // List size survives a cell report
        assert_eq!(state.total_refs_in_current_list, 4);
    }

    #[test]
    fn test_zero_cells_is_invariant_violation() {
        let mut aggregator = ProgressAggregator::new();
        let err = aggregator.combine(ProgressDepth::Reference, 0, 5).unwrap_err();
        assert!(err.is_invariant_violation());

        let err = aggregator.combine(ProgressDepth::Cell, 0, 0).unwrap_err();
        assert!(err.is_invariant_violation());
        assert_eq!(*aggregator.state(), ProgressState::default());
    }

    #[test]
    fn test_out_of_range_report_is_rejected_without_mutation() {
        let mut aggregator = aggregator_at_cell(1, 4);
        let before = *aggregator.state();

        // Reference index past the end of its list
        let err = aggregator.combine(ProgressDepth::Reference, 900, 2).unwrap_err();
        assert!(err.is_invariant_violation());
        assert_eq!(*aggregator.state(), before);

        // Cell index past the total
        let err = aggregator.combine(ProgressDepth::Cell, 5, 4).unwrap_err();
        assert!(err.is_invariant_violation());
        assert_eq!(*aggregator.state(), before);
    }

    #[test]
    fn test_ref_list_budget_exhaustion() {
        let mut aggregator = aggregator_at_cell(0, 1);
        for _ in 0..NUM_REF_LISTS {
            aggregator
                .combine(ProgressDepth::Reference, 1, 2)
                .expect("Failed to complete reference list within budget");
        }
        assert_eq!(aggregator.state().current_ref_list_number, NUM_REF_LISTS);

        let err = aggregator.combine(ProgressDepth::Reference, 1, 2).unwrap_err();
        assert!(err.is_invariant_violation());
    }

    #[test]
    fn test_progress_bar_position() {
        assert_eq!(progress_bar_position(0.0), 0);
        assert_eq!(progress_bar_position(0.5), 500);
        assert_eq!(progress_bar_position(1.0), 1000);
    }
}
